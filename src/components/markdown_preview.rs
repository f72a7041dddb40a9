use leptos::prelude::*;

use crate::rendering::markdown::render_preview;

/// Sanitized live rendering of a markdown source signal.
#[component]
pub fn MarkdownPreview(#[prop(into)] source: Signal<String>) -> impl IntoView {
    let html = Memo::new(move |_| render_preview(&source.get()));

    view! {
        <div class="border border-base-300 rounded-lg p-4 bg-base-100 prose max-w-none min-h-[12rem]">
            <div inner_html=move || html.get()></div>
        </div>
    }
}
