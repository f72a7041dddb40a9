use axum::routing::{get, post};
use axum::Router;

use crate::api::{articles, auth, dashboard, news, preview, profile, team};
use crate::app::AppState;

/// REST routes under `/api/auth` and `/api/v1`, plus `robots.txt`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/auth/logout", post(auth::logout_handler))
        .route("/api/auth/me", get(auth::me_handler))
        .route("/api/auth/password", post(profile::change_password_handler))
        .route("/api/v1/dashboard", get(dashboard::dashboard_handler))
        .route(
            "/api/v1/articles",
            get(articles::list_articles_handler).post(articles::create_article_handler),
        )
        .route(
            "/api/v1/articles/{id}",
            get(articles::get_article_handler)
                .put(articles::update_article_handler)
                .delete(articles::delete_article_handler),
        )
        .route(
            "/api/v1/news",
            get(news::list_news_handler).post(news::create_news_handler),
        )
        .route(
            "/api/v1/news/{id}",
            get(news::get_news_handler)
                .put(news::update_news_handler)
                .delete(news::delete_news_handler),
        )
        .route(
            "/api/v1/team",
            get(team::list_members_handler).post(team::create_member_handler),
        )
        .route(
            "/api/v1/team/{id}",
            get(team::get_member_handler)
                .put(team::update_member_handler)
                .delete(team::delete_member_handler),
        )
        .route(
            "/api/v1/profile",
            get(profile::get_profile_handler).put(profile::update_profile_handler),
        )
        .route("/api/v1/preview", post(preview::preview_handler))
        .route("/robots.txt", get(robots_txt))
}

/// The REST surface with the `/admin` edge guard applied, ready to serve.
pub fn router(state: AppState) -> Router {
    api_routes()
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::guard::admin_edge_guard,
        ))
        .with_state(state)
}

/// Keep crawlers out of the admin panel.
async fn robots_txt() -> ([(axum::http::HeaderName, &'static str); 1], &'static str) {
    (
        [(axum::http::header::CONTENT_TYPE, "text/plain")],
        "User-agent: *\nDisallow: /\n",
    )
}
