use leptos::prelude::*;
use leptos::server_fn::codec::Json;

use crate::components::action_error::ActionError;
use crate::components::document_form::DocumentForm;
use crate::db::models::{Author, MemberInput};
use crate::error::display_error;
use crate::models::form::FormModel;
use crate::models::slug::SlugTracker;
use crate::team::component::member_fields;

#[server(GetProfile, "/api")]
pub async fn get_profile() -> Result<Author, ServerFnError> {
    use crate::error::AppError;

    let staff = crate::auth::guard::current_staff().await?;
    let state = expect_context::<crate::app::AppState>();
    crate::api::profile::process_get_profile(state.authors.as_ref(), &staff)
        .await
        .map_err(AppError::into_server_fn_error)
}

#[server(name = UpdateProfile, prefix = "/api", input = Json)]
pub async fn update_profile(input: MemberInput) -> Result<Author, ServerFnError> {
    use crate::error::AppError;

    let staff = crate::auth::guard::current_staff().await?;
    let state = expect_context::<crate::app::AppState>();
    crate::api::profile::process_update_profile(state.authors.as_ref(), &staff, input)
        .await
        .map_err(AppError::into_server_fn_error)
}

#[server(ChangePassword, "/api")]
pub async fn change_password(new_password: String) -> Result<(), ServerFnError> {
    use crate::api::profile::{process_change_password, PasswordChange};
    use crate::error::AppError;

    let staff = crate::auth::guard::current_staff().await?;
    let state = expect_context::<crate::app::AppState>();
    process_change_password(
        state.identity.as_ref(),
        &staff,
        PasswordChange { new_password },
    )
    .await
    .map_err(AppError::into_server_fn_error)
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let profile = Resource::new(|| (), |_| get_profile());
    let update = ServerAction::<UpdateProfile>::new();

    let on_submit = Callback::new(move |input: MemberInput| {
        update.dispatch(UpdateProfile { input });
    });

    view! {
        <h1 class="text-3xl font-bold mb-6">"Profile"</h1>
        <ActionError value=update.value()/>
        {move || matches!(update.value().get(), Some(Ok(_))).then(|| view! {
            <div class="alert alert-success mb-4"><span>"Profile saved."</span></div>
        })}
        <Suspense fallback=move || view! { <span class="loading loading-spinner loading-lg"></span> }>
            {move || profile.get().map(|res| match res {
                Ok(author) => {
                    let input = MemberInput::from_author(&author);
                    view! {
                        <p class="mb-4 text-base-content/60">{author.email.clone()}</p>
                        <DocumentForm
                            initial=input.to_values()
                            fields=member_fields(false)
                            slug_tracker=SlugTracker::for_existing(&input.name, &input.slug)
                            submit_label="Save profile"
                            on_submit=on_submit
                            pending=update.pending()
                        />
                    }.into_any()
                }
                Err(e) => view! {
                    <div class="alert alert-error"><span>{display_error(&e)}</span></div>
                }.into_any(),
            })}
        </Suspense>

        <div class="divider my-10"></div>
        <PasswordForm/>
    }
}

#[component]
fn PasswordForm() -> impl IntoView {
    let change = ServerAction::<ChangePassword>::new();
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (mismatch, set_mismatch) = signal(false);

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if password.get_untracked() != confirm.get_untracked() {
            set_mismatch.set(true);
            return;
        }
        set_mismatch.set(false);
        change.dispatch(ChangePassword {
            new_password: password.get_untracked(),
        });
    };

    Effect::new(move |_| {
        if let Some(Ok(())) = change.value().get() {
            set_password.set(String::new());
            set_confirm.set(String::new());
        }
    });

    view! {
        <h2 class="text-2xl font-bold mb-4">"Change password"</h2>
        <form class="space-y-4 max-w-md" on:submit=submit>
            <input
                type="password"
                class="input input-bordered w-full"
                placeholder="New password"
                autocomplete="new-password"
                prop:value=password
                on:input=move |ev| set_password.set(event_target_value(&ev))
            />
            <input
                type="password"
                class="input input-bordered w-full"
                placeholder="Confirm new password"
                autocomplete="new-password"
                prop:value=confirm
                on:input=move |ev| set_confirm.set(event_target_value(&ev))
            />
            <Show when=move || mismatch.get()>
                <div class="alert alert-error"><span>"Passwords do not match."</span></div>
            </Show>
            <ActionError value=change.value()/>
            {move || matches!(change.value().get(), Some(Ok(()))).then(|| view! {
                <div class="alert alert-success"><span>"Password updated."</span></div>
            })}
            <button type="submit" class="btn btn-primary" prop:disabled=change.pending()>
                "Update password"
            </button>
        </form>
    }
}
