use leptos::prelude::*;
use leptos::server_fn::codec::Json;
use leptos_router::hooks::{use_navigate, use_params_map};

use crate::components::action_error::ActionError;
use crate::components::document_form::DocumentForm;
use crate::components::document_table::DocumentTable;
use crate::db::models::{Article, ArticleInput};
use crate::error::display_error;
use crate::models::form::FormModel;
use crate::models::slug::SlugTracker;
use crate::models::table::{TableRow, Tabular};

#[server(ListArticles, "/api")]
pub async fn list_articles() -> Result<Vec<Article>, ServerFnError> {
    use crate::error::AppError;

    crate::auth::guard::current_staff().await?;
    let state = expect_context::<crate::app::AppState>();
    crate::api::articles::process_list_articles(state.articles.as_ref())
        .await
        .map_err(AppError::into_server_fn_error)
}

#[server(GetArticle, "/api")]
pub async fn get_article(id: String) -> Result<Article, ServerFnError> {
    use crate::error::AppError;

    crate::auth::guard::current_staff().await?;
    let state = expect_context::<crate::app::AppState>();
    crate::api::articles::process_get_article(state.articles.as_ref(), &id)
        .await
        .map_err(AppError::into_server_fn_error)
}

#[server(name = CreateArticle, prefix = "/api", input = Json)]
pub async fn create_article(input: ArticleInput) -> Result<Article, ServerFnError> {
    use crate::error::AppError;

    let staff = crate::auth::guard::current_staff().await?;
    let state = expect_context::<crate::app::AppState>();
    crate::api::articles::process_create_article(state.articles.as_ref(), &staff, input)
        .await
        .map_err(AppError::into_server_fn_error)
}

#[server(name = UpdateArticle, prefix = "/api", input = Json)]
pub async fn update_article(id: String, input: ArticleInput) -> Result<Article, ServerFnError> {
    use crate::error::AppError;

    crate::auth::guard::current_staff().await?;
    let state = expect_context::<crate::app::AppState>();
    crate::api::articles::process_update_article(state.articles.as_ref(), &id, input)
        .await
        .map_err(AppError::into_server_fn_error)
}

#[server(DeleteArticle, "/api")]
pub async fn delete_article(id: String) -> Result<(), ServerFnError> {
    use crate::error::AppError;

    crate::auth::guard::current_staff().await?;
    let state = expect_context::<crate::app::AppState>();
    crate::api::articles::process_delete_article(state.articles.as_ref(), &id)
        .await
        .map_err(AppError::into_server_fn_error)
}

#[component]
pub fn ArticleListPage() -> impl IntoView {
    let delete = ServerAction::<DeleteArticle>::new();
    let articles = Resource::new(move || delete.version().get(), |_| list_articles());

    let rows = Signal::derive(move || -> Vec<TableRow> {
        articles
            .get()
            .and_then(Result::ok)
            .map(|list| list.iter().map(Tabular::to_row).collect())
            .unwrap_or_default()
    });
    let on_delete = Callback::new(move |id: String| {
        delete.dispatch(DeleteArticle { id });
    });

    view! {
        <div class="flex items-center justify-between mb-6">
            <h1 class="text-3xl font-bold">"Posts"</h1>
            <a class="btn btn-primary" href="/admin/articles/new">"New post"</a>
        </div>
        <ActionError value=delete.value()/>
        <Transition fallback=move || view! { <span class="loading loading-spinner loading-lg"></span> }>
            {move || articles.get().map(|res| match res {
                Ok(_) => view! {
                    <DocumentTable
                        rows=rows
                        columns=Article::columns()
                        edit_base="/admin/articles"
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
pub fn ArticleCreatePage() -> impl IntoView {
    let create = ServerAction::<CreateArticle>::new();
    let navigate = use_navigate();
    Effect::new(move |_| {
        if let Some(Ok(_)) = create.value().get() {
            navigate("/admin/articles", Default::default());
        }
    });

    let on_submit = Callback::new(move |input: ArticleInput| {
        create.dispatch(CreateArticle { input });
    });

    view! {
        <h1 class="text-3xl font-bold mb-6">"New post"</h1>
        <ActionError value=create.value()/>
        <DocumentForm
            initial=ArticleInput::default().to_values()
            fields=ArticleInput::fields()
            slug_tracker=SlugTracker::auto()
            submit_label="Create post"
            on_submit=on_submit
            pending=create.pending()
        />
    }
}

#[component]
pub fn ArticleEditPage() -> impl IntoView {
    let params = use_params_map();
    let id = move || params.read().get("id").unwrap_or_default();
    let article = Resource::new(id, get_article);

    let update = ServerAction::<UpdateArticle>::new();
    let navigate = use_navigate();
    Effect::new(move |_| {
        if let Some(Ok(_)) = update.value().get() {
            navigate("/admin/articles", Default::default());
        }
    });

    let on_submit = Callback::new(move |input: ArticleInput| {
        update.dispatch(UpdateArticle { id: id(), input });
    });

    view! {
        <h1 class="text-3xl font-bold mb-6">"Edit post"</h1>
        <ActionError value=update.value()/>
        <Suspense fallback=move || view! { <span class="loading loading-spinner loading-lg"></span> }>
            {move || article.get().map(|res| match res {
                Ok(article) => {
                    let input = ArticleInput::from_article(&article);
                    view! {
                        <DocumentForm
                            initial=input.to_values()
                            fields=ArticleInput::fields()
                            slug_tracker=SlugTracker::for_existing(&input.title, &input.slug)
                            submit_label="Save post"
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
