use leptos::prelude::*;
use leptos::server_fn::codec::Json;
use leptos_router::hooks::{use_navigate, use_params_map};

use crate::components::action_error::ActionError;
use crate::components::document_form::DocumentForm;
use crate::components::document_table::DocumentTable;
use crate::db::models::{NewsInput, NewsItem};
use crate::error::display_error;
use crate::models::form::FormModel;
use crate::models::slug::SlugTracker;
use crate::models::table::{TableRow, Tabular};

#[server(ListNews, "/api")]
pub async fn list_news() -> Result<Vec<NewsItem>, ServerFnError> {
    use crate::error::AppError;

    crate::auth::guard::current_staff().await?;
    let state = expect_context::<crate::app::AppState>();
    crate::api::news::process_list_news(state.news.as_ref())
        .await
        .map_err(AppError::into_server_fn_error)
}

#[server(GetNews, "/api")]
pub async fn get_news(id: String) -> Result<NewsItem, ServerFnError> {
    use crate::error::AppError;

    crate::auth::guard::current_staff().await?;
    let state = expect_context::<crate::app::AppState>();
    crate::api::news::process_get_news(state.news.as_ref(), &id)
        .await
        .map_err(AppError::into_server_fn_error)
}

#[server(name = CreateNews, prefix = "/api", input = Json)]
pub async fn create_news(input: NewsInput) -> Result<NewsItem, ServerFnError> {
    use crate::error::AppError;

    crate::auth::guard::current_staff().await?;
    let state = expect_context::<crate::app::AppState>();
    crate::api::news::process_create_news(state.news.as_ref(), input)
        .await
        .map_err(AppError::into_server_fn_error)
}

#[server(name = UpdateNews, prefix = "/api", input = Json)]
pub async fn update_news(id: String, input: NewsInput) -> Result<NewsItem, ServerFnError> {
    use crate::error::AppError;

    crate::auth::guard::current_staff().await?;
    let state = expect_context::<crate::app::AppState>();
    crate::api::news::process_update_news(state.news.as_ref(), &id, input)
        .await
        .map_err(AppError::into_server_fn_error)
}

#[server(DeleteNews, "/api")]
pub async fn delete_news(id: String) -> Result<(), ServerFnError> {
    use crate::error::AppError;

    crate::auth::guard::current_staff().await?;
    let state = expect_context::<crate::app::AppState>();
    crate::api::news::process_delete_news(state.news.as_ref(), &id)
        .await
        .map_err(AppError::into_server_fn_error)
}

#[component]
pub fn NewsListPage() -> impl IntoView {
    let delete = ServerAction::<DeleteNews>::new();
    let news = Resource::new(move || delete.version().get(), |_| list_news());

    let rows = Signal::derive(move || -> Vec<TableRow> {
        news.get()
            .and_then(Result::ok)
            .map(|list| list.iter().map(Tabular::to_row).collect())
            .unwrap_or_default()
    });
    let on_delete = Callback::new(move |id: String| {
        delete.dispatch(DeleteNews { id });
    });

    view! {
        <div class="flex items-center justify-between mb-6">
            <h1 class="text-3xl font-bold">"News"</h1>
            <a class="btn btn-primary" href="/admin/news/new">"New item"</a>
        </div>
        <ActionError value=delete.value()/>
        <Transition fallback=move || view! { <span class="loading loading-spinner loading-lg"></span> }>
            {move || news.get().map(|res| match res {
                Ok(_) => view! {
                    <DocumentTable
                        rows=rows
                        columns=NewsItem::columns()
                        edit_base="/admin/news"
                        on_delete=Some(on_delete)
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
pub fn NewsCreatePage() -> impl IntoView {
    let create = ServerAction::<CreateNews>::new();
    let navigate = use_navigate();
    Effect::new(move |_| {
        if let Some(Ok(_)) = create.value().get() {
            navigate("/admin/news", Default::default());
        }
    });

    let on_submit = Callback::new(move |input: NewsInput| {
        create.dispatch(CreateNews { input });
    });

    view! {
        <h1 class="text-3xl font-bold mb-6">"New news item"</h1>
        <ActionError value=create.value()/>
        <DocumentForm
            initial=NewsInput::default().to_values()
            fields=NewsInput::fields()
            slug_tracker=SlugTracker::auto()
            submit_label="Create"
            on_submit=on_submit
            pending=create.pending()
        />
    }
}

#[component]
pub fn NewsEditPage() -> impl IntoView {
    let params = use_params_map();
    let id = move || params.read().get("id").unwrap_or_default();
    let item = Resource::new(id, get_news);

    let update = ServerAction::<UpdateNews>::new();
    let navigate = use_navigate();
    Effect::new(move |_| {
        if let Some(Ok(_)) = update.value().get() {
            navigate("/admin/news", Default::default());
        }
    });

    let on_submit = Callback::new(move |input: NewsInput| {
        update.dispatch(UpdateNews { id: id(), input });
    });

    view! {
        <h1 class="text-3xl font-bold mb-6">"Edit news item"</h1>
        <ActionError value=update.value()/>
        <Suspense fallback=move || view! { <span class="loading loading-spinner loading-lg"></span> }>
            {move || item.get().map(|res| match res {
                Ok(item) => view! {
                    <DocumentForm
                        initial=NewsInput { title: item.title }.to_values()
                        fields=NewsInput::fields()
                        slug_tracker=SlugTracker::auto()
                        submit_label="Save"
                        on_submit=on_submit
                        pending=update.pending()
                    />
                }.into_any(),
                Err(e) => view! {
                    <div class="alert alert-error"><span>{display_error(&e)}</span></div>
                }.into_any(),
            })}
        </Suspense>
    }
}
