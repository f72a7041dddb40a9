#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::mongo::Mongo;

use lap_cms::app::AppState;
use lap_cms::auth::demo_auth::DemoIdentityProvider;
use lap_cms::auth::identity::IdentityProvider;
use lap_cms::auth::models::Role;
use lap_cms::auth::session::SessionKeys;
use lap_cms::db::models::{Article, Author, NewsItem};
use lap_cms::db::repository::{MongoRepository, Repository};

pub const SESSION_SECRET: &str = "integration-test-secret";

/// Holds the running MongoDB container and the REST router wired to it.
///
/// The container is kept alive for as long as this struct lives. When
/// dropped, it is stopped and cleaned up automatically.
pub struct TestEnv {
    _mongo: ContainerAsync<Mongo>,
    pub router: Router,
    pub articles: Arc<dyn Repository<Article>>,
    pub news: Arc<dyn Repository<NewsItem>>,
    pub authors: Arc<dyn Repository<Author>>,
    pub identity: Arc<dyn IdentityProvider>,
    pub sessions: SessionKeys,
}

impl TestEnv {
    /// Start MongoDB and build the router against it, with the in-process
    /// identity provider standing in for the identity service.
    pub async fn start() -> Self {
        let mongo_container = Mongo::default()
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let mongo_port = mongo_container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");
        let mongo_uri = format!("mongodb://127.0.0.1:{}", mongo_port);
        let mongo_client = mongodb::Client::with_uri_str(&mongo_uri)
            .await
            .expect("Failed to connect to MongoDB");
        let mongo_db = mongo_client.database("lap_cms_test");

        let articles: Arc<dyn Repository<Article>> = Arc::new(MongoRepository::new(&mongo_db));
        let news: Arc<dyn Repository<NewsItem>> = Arc::new(MongoRepository::new(&mongo_db));
        let authors: Arc<dyn Repository<Author>> = Arc::new(MongoRepository::new(&mongo_db));
        let identity: Arc<dyn IdentityProvider> = Arc::new(DemoIdentityProvider::new());
        let sessions = SessionKeys::new(SESSION_SECRET, 3600);

        let leptos_options = leptos::prelude::LeptosOptions::builder()
            .output_name("lap-cms")
            .build();

        let state = AppState {
            articles: articles.clone(),
            news: news.clone(),
            authors: authors.clone(),
            identity: identity.clone(),
            sessions: sessions.clone(),
            demo_mode: false,
            leptos_options,
        };

        Self {
            _mongo: mongo_container,
            router: lap_cms::api::routes::router(state),
            articles,
            news,
            authors,
            identity,
            sessions,
        }
    }

    /// Build an `axum_test::TestServer` from this environment's router.
    ///
    /// Each server keeps its own cookie jar, so one server per signed-in user.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .save_cookies()
            .expect_success_by_default()
            .build(self.router.clone())
    }

    /// Build a `TestServer` that does NOT expect success by default (for error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .save_cookies()
            .build(self.router.clone())
    }

    /// Helper: provision a credential and a staff profile directly.
    pub async fn add_staff(&self, name: &str, email: &str, password: &str, role: Role) -> Author {
        lap_cms::demo_seeder::provision_member(
            self.authors.as_ref(),
            self.identity.as_ref(),
            name,
            email,
            password,
            role,
        )
        .await
        .expect("Failed to provision staff member")
    }

    /// Helper: a permissive server already signed in as a new member with `role`.
    pub async fn signed_in(&self, role: Role) -> (axum_test::TestServer, Author) {
        let email = format!("{}@example.com", role.as_str());
        let author = self.add_staff(role.label(), &email, "password1", role).await;

        let server = self.server_permissive();
        login(&server, &email, "password1").await.assert_status_ok();
        (server, author)
    }
}

/// Helper: sign in through the API.
pub async fn login(
    server: &axum_test::TestServer,
    email: &str,
    password: &str,
) -> axum_test::TestResponse {
    server
        .post("/api/auth/login")
        .json(&serde_json::json!({
            "email": email,
            "password": password
        }))
        .await
}

/// Helper: a complete article payload.
pub fn article_json(title: &str, author_name: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "content": format!("# {title}\n\nBody text."),
        "description": "A short description",
        "img": "https://example.com/cover.png",
        "img_alt": "Cover",
        "label": "General",
        "popularity": false,
        "read": "3 min",
        "slug": "",
        "author_name": author_name,
        "published": true
    })
}
