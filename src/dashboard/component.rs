use leptos::prelude::*;

use crate::api::dashboard::DashboardSummary;
use crate::error::display_error;

#[server(GetDashboard, "/api")]
pub async fn get_dashboard() -> Result<DashboardSummary, ServerFnError> {
    use crate::error::AppError;

    crate::auth::guard::current_staff().await?;
    let state = expect_context::<crate::app::AppState>();
    crate::api::dashboard::process_dashboard(
        state.articles.as_ref(),
        state.authors.as_ref(),
        state.news.as_ref(),
    )
    .await
    .map_err(AppError::into_server_fn_error)
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let summary = Resource::new(|| (), |_| get_dashboard());

    view! {
        <h1 class="text-3xl font-bold mb-6">"Dashboard"</h1>
        <Suspense fallback=move || view! { <span class="loading loading-spinner loading-lg"></span> }>
            {move || summary.get().map(|res| match res {
                Ok(summary) => view! { <SummaryView summary/> }.into_any(),
                Err(e) => view! {
                    <div class="alert alert-error"><span>{display_error(&e)}</span></div>
                }.into_any(),
            })}
        </Suspense>
    }
}

#[component]
fn SummaryView(summary: DashboardSummary) -> impl IntoView {
    view! {
        <div class="stats shadow mb-8">
            <a class="stat" href="/admin/articles">
                <div class="stat-title">"Posts"</div>
                <div class="stat-value">{summary.article_count}</div>
            </a>
            <a class="stat" href="/admin/team">
                <div class="stat-title">"Team members"</div>
                <div class="stat-value">{summary.member_count}</div>
            </a>
            <a class="stat" href="/admin/news">
                <div class="stat-title">"News"</div>
                <div class="stat-value">{summary.news_count}</div>
            </a>
        </div>

        <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h2 class="card-title">"Latest posts"</h2>
                    <ul class="space-y-2">
                        {summary
                            .latest_articles
                            .into_iter()
                            .map(|article| {
                                let href = format!("/admin/articles/{}", article.id);
                                view! {
                                    <li class="flex justify-between gap-4">
                                        <a class="link link-hover" href=href>{article.title}</a>
                                        <span class="text-sm text-base-content/60">
                                            {article.created_at.format("%Y-%m-%d").to_string()}
                                        </span>
                                    </li>
                                }
                            })
                            .collect_view()}
                    </ul>
                </div>
            </div>
            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h2 class="card-title">"Latest news"</h2>
                    <ul class="space-y-2">
                        {summary
                            .latest_news
                            .into_iter()
                            .map(|item| {
                                let href = format!("/admin/news/{}", item.id);
                                view! {
                                    <li class="flex justify-between gap-4">
                                        <a class="link link-hover" href=href>{item.title}</a>
                                        <span class="text-sm text-base-content/60">
                                            {item.created_at.format("%Y-%m-%d").to_string()}
                                        </span>
                                    </li>
                                }
                            })
                            .collect_view()}
                    </ul>
                </div>
            </div>
        </div>
    }
}
