use leptos::prelude::*;
use leptos::server_fn::codec::Json;
use leptos_router::hooks::{use_navigate, use_params_map};

use crate::components::action_error::ActionError;
use crate::components::auth_context::use_auth;
use crate::components::document_form::DocumentForm;
use crate::components::document_table::DocumentTable;
use crate::db::models::{Author, MemberInput, NewMemberInput};
use crate::error::display_error;
use crate::models::form::{FieldSpec, FormModel};
use crate::models::slug::SlugTracker;
use crate::models::table::{TableRow, Tabular};

#[server(ListMembers, "/api")]
pub async fn list_members() -> Result<Vec<Author>, ServerFnError> {
    use crate::error::AppError;

    crate::auth::guard::current_staff().await?;
    let state = expect_context::<crate::app::AppState>();
    crate::api::team::process_list_members(state.authors.as_ref())
        .await
        .map_err(AppError::into_server_fn_error)
}

#[server(GetMember, "/api")]
pub async fn get_member(id: String) -> Result<Author, ServerFnError> {
    use crate::error::AppError;

    crate::auth::guard::current_staff().await?;
    let state = expect_context::<crate::app::AppState>();
    crate::api::team::process_get_member(state.authors.as_ref(), &id)
        .await
        .map_err(AppError::into_server_fn_error)
}

#[server(name = CreateMember, prefix = "/api", input = Json)]
pub async fn create_member(input: NewMemberInput) -> Result<Author, ServerFnError> {
    use crate::error::AppError;

    let staff = crate::auth::guard::current_staff().await?;
    let state = expect_context::<crate::app::AppState>();
    crate::api::team::process_create_member(
        state.authors.as_ref(),
        state.identity.as_ref(),
        &staff,
        input,
    )
    .await
    .map_err(AppError::into_server_fn_error)
}

#[server(name = UpdateMember, prefix = "/api", input = Json)]
pub async fn update_member(id: String, input: MemberInput) -> Result<Author, ServerFnError> {
    use crate::error::AppError;

    let staff = crate::auth::guard::current_staff().await?;
    let state = expect_context::<crate::app::AppState>();
    crate::api::team::process_update_member(state.authors.as_ref(), &staff, &id, input)
        .await
        .map_err(AppError::into_server_fn_error)
}

#[server(DeleteMember, "/api")]
pub async fn delete_member(id: String) -> Result<(), ServerFnError> {
    use crate::error::AppError;

    let staff = crate::auth::guard::current_staff().await?;
    let state = expect_context::<crate::app::AppState>();
    crate::api::team::process_delete_member(
        state.authors.as_ref(),
        state.identity.as_ref(),
        &staff,
        &id,
    )
    .await
    .map_err(AppError::into_server_fn_error)
}

/// Member edit fields; the role select only for users allowed to change roles.
pub fn member_fields(role_editable: bool) -> Vec<FieldSpec> {
    MemberInput::fields()
        .into_iter()
        .filter(|f| role_editable || f.name != "role")
        .collect()
}

#[component]
pub fn TeamListPage() -> impl IntoView {
    let auth = use_auth();
    let can_create = move || auth.role().is_some_and(|r| r.can_create_members());
    let can_delete = auth.role().is_some_and(|r| r.can_delete_members());

    let delete = ServerAction::<DeleteMember>::new();
    let members = Resource::new(move || delete.version().get(), |_| list_members());

    let rows = Signal::derive(move || -> Vec<TableRow> {
        members
            .get()
            .and_then(Result::ok)
            .map(|list| list.iter().map(Tabular::to_row).collect())
            .unwrap_or_default()
    });
    let on_delete = can_delete.then(|| {
        Callback::new(move |id: String| {
            delete.dispatch(DeleteMember { id });
        })
    });

    view! {
        <div class="flex items-center justify-between mb-6">
            <h1 class="text-3xl font-bold">"Team"</h1>
            <Show when=can_create>
                <a class="btn btn-primary" href="/admin/team/new">"New member"</a>
            </Show>
        </div>
        <ActionError value=delete.value()/>
        <Transition fallback=move || view! { <span class="loading loading-spinner loading-lg"></span> }>
            {move || members.get().map(|res| match res {
                Ok(_) => view! {
                    <DocumentTable
                        rows=rows
                        columns=Author::columns()
                        edit_base="/admin/team"
                        on_delete=on_delete
                    />
                }.into_any(),
                Err(e) => view! {
                    <div class="alert alert-error"><span>{display_error(&e)}</span></div>
                }.into_any(),
            })}
        </Transition>
    }
}

#[component]
pub fn MemberCreatePage() -> impl IntoView {
    let auth = use_auth();
    let create = ServerAction::<CreateMember>::new();
    let navigate = use_navigate();
    Effect::new(move |_| {
        if let Some(Ok(_)) = create.value().get() {
            navigate("/admin/team", Default::default());
        }
    });

    let on_submit = Callback::new(move |input: NewMemberInput| {
        create.dispatch(CreateMember { input });
    });

    view! {
        <h1 class="text-3xl font-bold mb-6">"New team member"</h1>
        <Show
            when=move || auth.role().is_some_and(|r| r.can_create_members())
            fallback=|| view! {
                <div class="alert alert-warning"><span>"Only admins can create team members."</span></div>
            }
        >
            <ActionError value=create.value()/>
            <DocumentForm
                initial=NewMemberInput::default().to_values()
                fields=NewMemberInput::fields()
                slug_tracker=SlugTracker::auto()
                submit_label="Create member"
                on_submit=on_submit
                pending=create.pending()
            />
        </Show>
    }
}

#[component]
pub fn MemberEditPage() -> impl IntoView {
    let auth = use_auth();
    let role_editable = auth.role().is_some_and(|r| r.can_change_roles());

    let params = use_params_map();
    let id = move || params.read().get("id").unwrap_or_default();
    let member = Resource::new(id, get_member);

    let update = ServerAction::<UpdateMember>::new();
    let navigate = use_navigate();
    Effect::new(move |_| {
        if let Some(Ok(_)) = update.value().get() {
            navigate("/admin/team", Default::default());
        }
    });

    let on_submit = Callback::new(move |input: MemberInput| {
        update.dispatch(UpdateMember { id: id(), input });
    });

    view! {
        <h1 class="text-3xl font-bold mb-6">"Edit team member"</h1>
        <ActionError value=update.value()/>
        <Suspense fallback=move || view! { <span class="loading loading-spinner loading-lg"></span> }>
            {move || member.get().map(|res| match res {
                Ok(author) => {
                    let input = MemberInput::from_author(&author);
                    view! {
                        <p class="mb-4 text-base-content/60">{author.email.clone()}</p>
                        <DocumentForm
                            initial=input.to_values()
                            fields=member_fields(role_editable)
                            slug_tracker=SlugTracker::for_existing(&input.name, &input.slug)
                            submit_label="Save member"
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
    }
}
