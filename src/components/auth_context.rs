use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::auth::models::{Role, StaffUser};
use crate::error::display_error;

/// The signed-in staff member, or the reason there is none.
#[server(GetCurrentStaff, "/api")]
pub async fn get_current_staff() -> Result<StaffUser, ServerFnError> {
    crate::auth::guard::current_staff().await
}

/// Staff member shared by every page under `/admin`.
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub staff: Resource<Result<StaffUser, ServerFnError>>,
}

impl AuthContext {
    /// Role of the loaded staff member; `None` while loading or when denied.
    pub fn role(&self) -> Option<Role> {
        self.staff
            .get()
            .and_then(|res| res.ok())
            .map(|staff| staff.role)
    }

    pub fn uid(&self) -> Option<String> {
        self.staff.get().and_then(|res| res.ok()).map(|staff| staff.uid)
    }
}

pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}

/// Fetches the staff member once and gates its children on a recognized role.
#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    let staff = Resource::new(|| (), |_| get_current_staff());
    provide_context(AuthContext { staff });

    let children = StoredValue::new(children);

    view! {
        <Suspense fallback=move || view! {
            <div class="flex justify-center py-24">
                <span class="loading loading-spinner loading-lg"></span>
            </div>
        }>
            {move || {
                staff.get().map(|result| match result {
                    Ok(_) => children.read_value()().into_any(),
                    Err(e) => view! { <AccessDenied reason=display_error(&e)/> }.into_any(),
                })
            }}
        </Suspense>
    }
}

/// Shown briefly before sending the visitor to the login page.
#[component]
fn AccessDenied(reason: String) -> impl IntoView {
    let navigate = use_navigate();
    Effect::new(move |_| {
        navigate("/auth/login", Default::default());
    });

    view! {
        <div class="flex justify-center py-24">
            <div class="alert alert-error max-w-md">
                <span>
                    <strong>"Access Denied"</strong>
                    " "
                    {reason}
                </span>
            </div>
        </div>
    }
}
