pub mod demo_auth;
pub mod guard;
pub mod identity;
pub mod models;
#[cfg(feature = "ssr")]
pub mod session;
