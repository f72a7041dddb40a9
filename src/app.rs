use leptos::prelude::*;
use leptos_meta::{provide_meta_context, MetaTags, Stylesheet, Title};
use leptos_router::components::{Outlet, ParentRoute, Redirect, Route, Router, Routes};
use leptos_router::path;

use crate::articles::component::{ArticleCreatePage, ArticleEditPage, ArticleListPage};
use crate::components::auth_context::AuthProvider;
use crate::components::sidebar::Sidebar;
use crate::dashboard::component::DashboardPage;
use crate::login::component::LoginPage;
use crate::news::component::{NewsCreatePage, NewsEditPage, NewsListPage};
use crate::profile::component::ProfilePage;
use crate::team::component::{MemberCreatePage, MemberEditPage, TeamListPage};

/// Shared application state available to Axum handlers and Leptos server functions.
#[cfg(feature = "ssr")]
#[derive(Clone)]
pub struct AppState {
    pub articles: std::sync::Arc<dyn crate::db::repository::Repository<crate::db::models::Article>>,
    pub news: std::sync::Arc<dyn crate::db::repository::Repository<crate::db::models::NewsItem>>,
    pub authors: std::sync::Arc<dyn crate::db::repository::Repository<crate::db::models::Author>>,
    pub identity: std::sync::Arc<dyn crate::auth::identity::IdentityProvider>,
    pub sessions: crate::auth::session::SessionKeys,
    /// In-memory store and demo identity service.
    pub demo_mode: bool,
    pub leptos_options: LeptosOptions,
}

#[cfg(feature = "ssr")]
impl axum::extract::FromRef<AppState> for LeptosOptions {
    fn from_ref(state: &AppState) -> Self {
        state.leptos_options.clone()
    }
}

/// HTML document wrapper used for server-side rendering.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en" data-theme="dark">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <meta name="robots" content="noindex, nofollow"/>
                <link rel="icon" type="image/svg+xml" href="/favicon.svg"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body class="min-h-screen bg-base-200">
                <App/>
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Stylesheet id="leptos" href="/pkg/lap-cms.css"/>
        <Title text="LAP CMS"/>

        <Router>
            <Routes fallback=|| view! { <p class="p-8">"Page not found."</p> }.into_view()>
                <Route path=path!("/") view=|| view! { <Redirect path="/admin"/> }/>
                <Route path=path!("/auth/login") view=LoginPage/>
                <ParentRoute path=path!("/admin") view=AdminLayout>
                    <Route path=path!("") view=DashboardPage/>
                    <Route path=path!("articles") view=ArticleListPage/>
                    <Route path=path!("articles/new") view=ArticleCreatePage/>
                    <Route path=path!("articles/:id") view=ArticleEditPage/>
                    <Route path=path!("news") view=NewsListPage/>
                    <Route path=path!("news/new") view=NewsCreatePage/>
                    <Route path=path!("news/:id") view=NewsEditPage/>
                    <Route path=path!("team") view=TeamListPage/>
                    <Route path=path!("team/new") view=MemberCreatePage/>
                    <Route path=path!("team/:id") view=MemberEditPage/>
                    <Route path=path!("profile") view=ProfilePage/>
                </ParentRoute>
            </Routes>
        </Router>
    }
}

/// Frame of every `/admin` page: staff check, sidebar, page outlet.
#[component]
fn AdminLayout() -> impl IntoView {
    view! {
        <AuthProvider>
            <div class="flex min-h-screen">
                <Sidebar/>
                <main class="flex-1 p-8 overflow-x-auto">
                    <Outlet/>
                </main>
            </div>
        </AuthProvider>
    }
}
