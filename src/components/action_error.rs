use leptos::prelude::*;

use crate::error::display_error;

/// Inline alert for the last failed submission of an action.
#[component]
pub fn ActionError<T>(value: MappedSignal<Option<Result<T, ServerFnError>>>) -> impl IntoView
where
    T: Send + Sync + 'static,
{
    move || {
        value.with(|v| match v {
            Some(Err(e)) => Some(view! {
                <div class="alert alert-error mb-4"><span>{display_error(e)}</span></div>
            }),
            _ => None,
        })
    }
}
