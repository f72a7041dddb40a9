use leptos::prelude::*;
use leptos_router::hooks::use_location;

use crate::components::auth_context::use_auth;

/// Clear the session cookie and return to the login page.
#[server(SignOut, "/api")]
pub async fn sign_out() -> Result<(), ServerFnError> {
    use axum::http::header::SET_COOKIE;
    use axum::http::HeaderValue;

    let removal = crate::auth::session::removal_cookie();
    let header = HeaderValue::from_str(&removal.to_string())
        .map_err(|e| ServerFnError::new(e.to_string()))?;
    expect_context::<leptos_axum::ResponseOptions>().append_header(SET_COOKIE, header);

    tracing::info!("Signed out");
    leptos_axum::redirect("/auth/login");
    Ok(())
}

const LINKS: &[(&str, &str)] = &[
    ("/admin", "Dashboard"),
    ("/admin/articles", "Posts"),
    ("/admin/team", "Team"),
    ("/admin/news", "News"),
    ("/admin/profile", "Profile"),
];

/// Whether `href` is the section the current path belongs to.
fn is_active(href: &str, path: &str) -> bool {
    if href == "/admin" {
        path == "/admin" || path == "/admin/"
    } else {
        path == href || path.starts_with(&format!("{href}/"))
    }
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let location = use_location();
    let auth = use_auth();
    let sign_out = ServerAction::<SignOut>::new();

    view! {
        <aside class="w-60 shrink-0 bg-base-100 border-r border-base-300 flex flex-col">
            <div class="p-6 text-xl font-bold">"LAP CMS"</div>
            <ul class="menu flex-1 px-2">
                {LINKS
                    .iter()
                    .map(|(href, label)| {
                        let href = *href;
                        view! {
                            <li>
                                <a
                                    href=href
                                    class=move || {
                                        if is_active(href, &location.pathname.get()) {
                                            "menu-active"
                                        } else {
                                            ""
                                        }
                                    }
                                >
                                    {*label}
                                </a>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
            <div class="p-4 border-t border-base-300 space-y-2">
                <p class="text-sm text-base-content/60">
                    {move || auth.role().map(|r| r.label()).unwrap_or_default()}
                </p>
                <ActionForm action=sign_out>
                    <button type="submit" class="btn btn-outline btn-sm w-full">
                        "Sign Out"
                    </button>
                </ActionForm>
            </div>
        </aside>
    }
}
