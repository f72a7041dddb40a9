/// Derive a URL-friendly slug: lower-case, every run of whitespace
/// collapsed into a single hyphen.
///
/// Leading/trailing whitespace is not trimmed, so `" Hi"` becomes `"-hi"`,
/// matching what editors of the public site already rely on.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut in_whitespace = false;

    for c in input.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
                in_whitespace = true;
            }
        } else {
            slug.extend(c.to_lowercase());
            in_whitespace = false;
        }
    }

    slug
}

/// Resolve the slug to store: an explicit slug wins, an empty one is derived.
pub fn resolve_slug(explicit: &str, source: &str) -> String {
    if explicit.trim().is_empty() {
        slugify(source)
    } else {
        explicit.trim().to_string()
    }
}

/// Tracks whether a form's slug follows its source field or was typed by hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlugTracker {
    manual: bool,
}

impl SlugTracker {
    /// A fresh create form: the slug follows the source.
    pub fn auto() -> Self {
        Self { manual: false }
    }

    /// An edit form: the stored slug counts as manual unless it is exactly
    /// what the stored source would derive.
    pub fn for_existing(source: &str, slug: &str) -> Self {
        Self {
            manual: slugify(source) != slug,
        }
    }

    pub fn is_manual(&self) -> bool {
        self.manual
    }

    /// The source field changed. Returns the new slug when it should follow.
    pub fn source_changed(&self, source: &str) -> Option<String> {
        if self.manual {
            None
        } else {
            Some(slugify(source))
        }
    }

    /// The user typed into the slug field. Clearing it hands control back
    /// to the source field.
    pub fn slug_edited(&mut self, slug: &str) {
        self.manual = !slug.trim().is_empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
    }

    #[test]
    fn test_slugify_collapses_whitespace_runs() {
        assert_eq!(slugify("Rust  \t and\nWASM"), "rust-and-wasm");
    }

    #[test]
    fn test_slugify_keeps_punctuation() {
        assert_eq!(slugify("Q&A: Part 2"), "q&a:-part-2");
    }

    #[test]
    fn test_slugify_edges_not_trimmed() {
        assert_eq!(slugify(" Hi "), "-hi-");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_slugify_unicode_lowercase() {
        assert_eq!(slugify("Ünïcode Tïtle"), "ünïcode-tïtle");
    }

    #[test]
    fn test_resolve_slug() {
        assert_eq!(resolve_slug("", "Hello World"), "hello-world");
        assert_eq!(resolve_slug("   ", "Hello World"), "hello-world");
        assert_eq!(resolve_slug("custom-slug", "Hello World"), "custom-slug");
    }

    #[test]
    fn test_auto_tracker_follows_title() {
        let tracker = SlugTracker::auto();
        assert_eq!(tracker.source_changed("Hello World"), Some("hello-world".into()));
    }

    #[test]
    fn test_manual_slug_survives_title_edit() {
        let mut tracker = SlugTracker::auto();
        let mut slug = tracker.source_changed("Hello World").unwrap();
        assert_eq!(slug, "hello-world");

        slug = "my-custom".to_string();
        tracker.slug_edited(&slug);

        assert_eq!(tracker.source_changed("Hello Again"), None);
        assert_eq!(slug, "my-custom");
    }

    #[test]
    fn test_clearing_slug_resumes_auto() {
        let mut tracker = SlugTracker::auto();
        tracker.slug_edited("manual");
        assert!(tracker.is_manual());
        tracker.slug_edited("");
        assert!(!tracker.is_manual());
        assert_eq!(tracker.source_changed("New Title"), Some("new-title".into()));
    }

    #[test]
    fn test_existing_tracker() {
        assert!(!SlugTracker::for_existing("Hello World", "hello-world").is_manual());
        assert!(SlugTracker::for_existing("Hello World", "greeting").is_manual());
    }
}
