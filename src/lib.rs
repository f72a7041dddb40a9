pub mod app;
pub mod error;
pub mod auth;
#[cfg(feature = "ssr")]
pub mod config;
#[cfg(feature = "ssr")]
pub mod demo_seeder;
pub mod db {
    pub mod memory;
    pub mod models;
    pub mod repository;
}
pub mod models {
    pub mod form;
    pub mod media;
    pub mod slug;
    pub mod table;
}
pub mod rendering {
    pub mod markdown;
}
pub mod api {
    pub mod articles;
    pub mod auth;
    pub mod dashboard;
    pub mod errors;
    pub mod news;
    pub mod preview;
    pub mod profile;
    #[cfg(feature = "ssr")]
    pub mod routes;
    pub mod team;
}
pub mod components {
    pub mod action_error;
    pub mod auth_context;
    pub mod document_form;
    pub mod document_table;
    pub mod markdown_preview;
    pub mod sidebar;
}
pub mod login {
    pub mod component;
}
pub mod dashboard {
    pub mod component;
}
pub mod articles {
    pub mod component;
}
pub mod news {
    pub mod component;
}
pub mod team {
    pub mod component;
}
pub mod profile {
    pub mod component;
}

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(app::App);
}
