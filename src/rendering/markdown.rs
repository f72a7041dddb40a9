use pulldown_cmark::{html, Options, Parser};

/// Render a raw Markdown string to HTML.
///
/// Supports GitHub Flavored Markdown (GFM) features: tables,
/// footnotes, strikethrough, task lists, and smart punctuation.
/// The output is NOT sanitized; use [`render_preview`] for anything
/// that ends up in the DOM.
pub fn render_markdown(raw: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_SMART_PUNCTUATION;

    let parser = Parser::new_ext(raw, options);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

/// Render Markdown and sanitize the result for the preview pane.
///
/// `<script>` and `<style>` elements are dropped together with their
/// content; event-handler attributes and `javascript:` URLs are stripped.
/// Task-list checkboxes survive.
pub fn render_preview(raw: &str) -> String {
    let html = render_markdown(raw);
    ammonia::Builder::default()
        .add_tags(&["input"])
        .add_tag_attributes("input", &["type", "checked", "disabled"])
        .clean(&html)
        .to_string()
}
