use std::path::Path;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

use crate::auth::identity::FirebaseSettings;

/// Prefix of configuration environment variables, e.g. `LAPCMS__MONGODB__URI`.
pub const ENV_PREFIX: &str = "LAPCMS";

const DEFAULT_SESSION_SECRET: &str = "change-me-in-production";

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub mongodb: MongoSettings,
    pub identity: IdentitySettings,
    pub session: SessionSettings,
    #[serde(default)]
    pub bootstrap: BootstrapSettings,
    /// In-memory store and identity service, seeded with sample data.
    #[serde(default)]
    pub demo_mode: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoSettings {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityBackend {
    Firebase,
    Demo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentitySettings {
    pub provider: IdentityBackend,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub project_id: String,
    pub endpoint: String,
    #[serde(default)]
    pub emulator: bool,
}

impl IdentitySettings {
    pub fn firebase(&self) -> FirebaseSettings {
        FirebaseSettings {
            api_key: self.api_key.clone(),
            project_id: self.project_id.clone(),
            endpoint: self.endpoint.clone(),
            emulator: self.emulator,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    pub secret: String,
    pub ttl_secs: i64,
}

/// First super user, provisioned when none exists.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BootstrapSettings {
    pub super_email: Option<String>,
    pub super_password: Option<String>,
    #[serde(default = "default_super_name")]
    pub super_name: String,
}

fn default_super_name() -> String {
    "Super Admin".to_string()
}

impl Settings {
    /// Load defaults, then the optional file, then `LAPCMS__*` variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Self::defaults()?;
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()?
            .validated()
    }

    /// Refuse to serve real identities with the built-in session secret,
    /// since anyone could sign a session cookie with it.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let real_identities = !self.demo_mode && self.identity.provider != IdentityBackend::Demo;
        if real_identities && self.uses_default_secret() {
            return Err(ConfigError::Message(format!(
                "session.secret must be set (e.g. {ENV_PREFIX}__SESSION__SECRET) outside demo mode"
            )));
        }
        Ok(self)
    }

    /// Load defaults overlaid with an inline TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("mongodb.uri", "mongodb://localhost:27017")?
            .set_default("mongodb.database", "lap_cms")?
            .set_default("identity.provider", "firebase")?
            .set_default("identity.endpoint", "https://identitytoolkit.googleapis.com")?
            .set_default("session.secret", DEFAULT_SESSION_SECRET)?
            .set_default("session.ttl_secs", 60 * 60 * 24 * 5)?
            .set_default("demo_mode", false)
    }

    /// Whether the session secret was left at its built-in default.
    pub fn uses_default_secret(&self) -> bool {
        self.session.secret == DEFAULT_SESSION_SECRET
    }

    /// Both bootstrap credentials, when configured.
    pub fn bootstrap_credentials(&self) -> Option<(&str, &str)> {
        match (&self.bootstrap.super_email, &self.bootstrap.super_password) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Some((email.as_str(), password.as_str()))
            }
            _ => None,
        }
    }
}
