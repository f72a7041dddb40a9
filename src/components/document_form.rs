use leptos::prelude::*;

use crate::components::markdown_preview::MarkdownPreview;
use crate::models::form::{FieldKind, FieldSpec, FormErrors, FormModel, FormValues};
use crate::models::media::previewable_image_url;
use crate::models::slug::SlugTracker;

/// Shared editing state handed to every field renderer.
#[derive(Clone, Copy)]
struct FormState {
    values: RwSignal<FormValues>,
    errors: RwSignal<FormErrors>,
    slug: RwSignal<SlugTracker>,
    /// Name of the slug field and the field it derives from.
    slug_link: Option<(&'static str, &'static str)>,
}

impl FormState {
    fn value(&self, name: &'static str) -> Signal<String> {
        let values = self.values;
        Signal::derive(move || values.with(|v| v.get(name).to_string()))
    }

    fn set(&self, name: &'static str, value: String) {
        if let Some((slug_field, source)) = self.slug_link {
            if name == source {
                if let Some(derived) = self.slug.get_untracked().source_changed(&value) {
                    self.values.update(|v| v.set(slug_field, derived));
                }
            } else if name == slug_field {
                self.slug.update(|t| t.slug_edited(&value));
            }
        }
        self.values.update(|v| v.set(name, value));
    }
}

/// Form for any [`FormModel`], laid out from its field specs.
///
/// Validation runs in the browser before `on_submit` is called; the server
/// repeats it.
#[component]
pub fn DocumentForm<M>(
    initial: FormValues,
    fields: Vec<FieldSpec>,
    slug_tracker: SlugTracker,
    submit_label: &'static str,
    on_submit: Callback<M>,
    #[prop(into)] pending: Signal<bool>,
) -> impl IntoView
where
    M: FormModel + Send + Sync + 'static,
{
    let slug_link = fields.iter().find_map(|f| match f.kind {
        FieldKind::Slug { source } => Some((f.name, source)),
        _ => None,
    });
    let state = FormState {
        values: RwSignal::new(initial),
        errors: RwSignal::new(FormErrors::default()),
        slug: RwSignal::new(slug_tracker),
        slug_link,
    };

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        match M::from_values(&state.values.get_untracked()) {
            Ok(model) => {
                state.errors.set(FormErrors::default());
                on_submit.run(model);
            }
            Err(errors) => state.errors.set(errors),
        }
    };

    view! {
        <form class="space-y-4 max-w-3xl" on:submit=submit>
            {fields.into_iter().map(|spec| render_field(spec, state)).collect_view()}
            <Show when=move || !state.errors.with(|e| e.is_empty())>
                <div class="alert alert-error">
                    <span>{move || state.errors.with(|e| e.to_string())}</span>
                </div>
            </Show>
            <button type="submit" class="btn btn-primary" prop:disabled=pending>
                {move || if pending.get() { "Saving..." } else { submit_label }}
            </button>
        </form>
    }
}

fn render_field(spec: FieldSpec, state: FormState) -> AnyView {
    let name = spec.name;
    let value = state.value(name);
    let on_input = move |ev| state.set(name, event_target_value(&ev));
    let error = move || {
        state.errors.with(|e| {
            e.for_field(name)
                .map(|msg| view! { <p class="text-error text-sm mt-1">{msg.to_string()}</p> })
        })
    };

    let control = match spec.kind {
        FieldKind::Text | FieldKind::Slug { .. } => view! {
            <input type="text" class="input input-bordered w-full" name=name
                prop:value=value on:input=on_input/>
        }
        .into_any(),
        FieldKind::Email => view! {
            <input type="email" class="input input-bordered w-full" name=name
                autocomplete="off" prop:value=value on:input=on_input/>
        }
        .into_any(),
        FieldKind::Password => view! {
            <input type="password" class="input input-bordered w-full" name=name
                autocomplete="new-password" prop:value=value on:input=on_input/>
        }
        .into_any(),
        FieldKind::TextArea => view! {
            <textarea class="textarea textarea-bordered w-full" rows="3" name=name
                prop:value=value on:input=on_input></textarea>
        }
        .into_any(),
        FieldKind::Pairs => view! {
            <textarea class="textarea textarea-bordered w-full font-mono" rows="4" name=name
                placeholder="twitter = https://twitter.com/handle"
                prop:value=value on:input=on_input></textarea>
        }
        .into_any(),
        FieldKind::Markdown => view! {
            <div class="grid grid-cols-1 lg:grid-cols-2 gap-4">
                <textarea class="textarea textarea-bordered w-full font-mono min-h-[12rem]" name=name
                    prop:value=value on:input=on_input></textarea>
                <MarkdownPreview source=value/>
            </div>
        }
        .into_any(),
        FieldKind::ImageUrl => view! {
            <div class="space-y-2">
                <input type="url" class="input input-bordered w-full" name=name
                    prop:value=value on:input=on_input/>
                {move || previewable_image_url(&value.get()).map(|src| view! {
                    <img class="max-h-40 rounded-lg border border-base-300" src=src alt=""/>
                })}
            </div>
        }
        .into_any(),
        FieldKind::Checkbox => view! {
            <input type="checkbox" class="checkbox" name=name
                prop:checked=move || state.values.with(|v| v.get_bool(name))
                on:change=move |ev| {
                    let checked = event_target_checked(&ev);
                    state.values.update(|v| v.set_bool(name, checked));
                }/>
        }
        .into_any(),
        FieldKind::Select(options) => view! {
            <select class="select select-bordered w-full" name=name
                prop:value=value
                on:change=move |ev| state.set(name, event_target_value(&ev))>
                <option value="">"Select..."</option>
                {options
                    .iter()
                    .map(|(value, label)| view! { <option value=*value>{*label}</option> })
                    .collect_view()}
            </select>
        }
        .into_any(),
    };

    let required = if spec.required { " *" } else { "" };
    if spec.kind == FieldKind::Checkbox {
        view! {
            <div class="form-control">
                <label class="label cursor-pointer justify-start gap-3">
                    {control}
                    <span class="label-text">{spec.label}</span>
                </label>
                {error}
            </div>
        }
        .into_any()
    } else {
        view! {
            <div class="form-control">
                <label class="label">
                    <span class="label-text font-semibold">{spec.label}{required}</span>
                </label>
                {control}
                {error}
            </div>
        }
        .into_any()
    }
}
