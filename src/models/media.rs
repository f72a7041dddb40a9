use url::Url;

/// Returns the URL to show as an inline image preview, if any.
///
/// Only absolute `http`/`https` URLs with a host are previewed; relative
/// paths, `data:` and `javascript:` URLs are not.
pub fn previewable_image_url(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let url = Url::parse(raw).ok()?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Some(url.to_string()),
        _ => None,
    }
}
