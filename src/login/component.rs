use leptos::prelude::*;

use crate::components::action_error::ActionError;

/// Sign in and set the session cookie.
#[server(Login, "/api")]
pub async fn login(email: String, password: String) -> Result<(), ServerFnError> {
    use axum::http::header::SET_COOKIE;
    use axum::http::HeaderValue;

    use crate::api::auth::{process_login, LoginRequest};
    use crate::error::AppError;

    let state = expect_context::<crate::app::AppState>();
    let request = LoginRequest { email, password };

    let (account, _staff) = process_login(state.identity.as_ref(), state.authors.as_ref(), &request)
        .await
        .map_err(AppError::into_server_fn_error)?;
    let token = state
        .sessions
        .issue(&account)
        .map_err(AppError::into_server_fn_error)?;

    let cookie = state.sessions.session_cookie(token);
    let header = HeaderValue::from_str(&cookie.to_string())
        .map_err(|e| ServerFnError::new(e.to_string()))?;
    expect_context::<leptos_axum::ResponseOptions>().append_header(SET_COOKIE, header);

    leptos_axum::redirect("/admin");
    Ok(())
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let login = ServerAction::<Login>::new();
    let (show_password, set_show_password) = signal(false);

    view! {
        <div class="min-h-screen flex items-center justify-center">
            <div class="card w-full max-w-sm bg-base-100 shadow-xl">
                <div class="card-body">
                    <h1 class="card-title text-2xl mb-2">"LAP CMS"</h1>
                    <p class="text-sm text-base-content/60 mb-4">"Sign in to the admin panel."</p>
                    <ActionError value=login.value()/>
                    <ActionForm action=login>
                        <div class="space-y-4">
                            <input
                                type="email"
                                name="email"
                                class="input input-bordered w-full"
                                placeholder="Email"
                                autocomplete="username"
                                required
                            />
                            <div class="join w-full">
                                <input
                                    type=move || if show_password.get() { "text" } else { "password" }
                                    name="password"
                                    class="input input-bordered join-item w-full"
                                    placeholder="Password"
                                    autocomplete="current-password"
                                    required
                                />
                                <button
                                    type="button"
                                    class="btn join-item"
                                    on:click=move |_| set_show_password.update(|v| *v = !*v)
                                >
                                    {move || if show_password.get() { "Hide" } else { "Show" }}
                                </button>
                            </div>
                            <button
                                type="submit"
                                class="btn btn-primary w-full"
                                prop:disabled=login.pending()
                            >
                                {move || if login.pending().get() { "Signing in..." } else { "Sign in" }}
                            </button>
                        </div>
                    </ActionForm>
                </div>
            </div>
        </div>
    }
}
