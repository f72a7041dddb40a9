use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::AppError;

/// An account in the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

/// Identity-service failures, displayed with the text shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("The email address is invalid.")]
    InvalidEmail,

    #[error("No account found with this email address.")]
    UserNotFound,

    #[error("Incorrect password. Please try again.")]
    WrongPassword,

    #[error("Too many failed attempts. Please try again later.")]
    TooManyAttempts,

    #[error("An account already exists with this email address.")]
    EmailExists,

    #[error("Password should be at least 6 characters.")]
    WeakPassword,

    /// Anything else; the detail is logged, never shown.
    #[error("An error occurred. Please try again.")]
    Unknown(String),
}

impl IdentityError {
    /// Map an identity-service error code to a variant.
    ///
    /// Accepts both REST codes (`EMAIL_EXISTS`, `WEAK_PASSWORD : ...`) and
    /// client SDK codes (`auth/invalid-email`).
    pub fn from_code(code: &str) -> Self {
        let head = code.split(':').next().unwrap_or("").trim();

        match head {
            "INVALID_EMAIL" | "auth/invalid-email" => IdentityError::InvalidEmail,
            "EMAIL_NOT_FOUND" | "USER_NOT_FOUND" | "auth/user-not-found" => {
                IdentityError::UserNotFound
            }
            "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "auth/wrong-password"
            | "auth/invalid-credential" => IdentityError::WrongPassword,
            "TOO_MANY_ATTEMPTS_TRY_LATER" | "auth/too-many-requests" => {
                IdentityError::TooManyAttempts
            }
            "EMAIL_EXISTS" | "auth/email-already-in-use" => IdentityError::EmailExists,
            "WEAK_PASSWORD" | "auth/weak-password" => IdentityError::WeakPassword,
            _ => IdentityError::Unknown(code.to_string()),
        }
    }
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        let message = err.to_string();
        match err {
            IdentityError::InvalidEmail
            | IdentityError::EmailExists
            | IdentityError::WeakPassword => AppError::BadRequest(message),
            IdentityError::UserNotFound | IdentityError::WrongPassword => AppError::Auth(message),
            IdentityError::TooManyAttempts => AppError::TooManyRequests(message),
            IdentityError::Unknown(detail) => {
                tracing::warn!(detail = %detail, "Identity service call failed");
                AppError::Identity(message)
            }
        }
    }
}

/// Credential operations against the external identity service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify an email/password pair.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, IdentityError>;

    /// Provision a new credential and return its UID.
    async fn create_account(&self, email: &str, password: &str)
        -> Result<Identity, IdentityError>;

    async fn update_password(&self, uid: &str, new_password: &str) -> Result<(), IdentityError>;

    async fn delete_account(&self, uid: &str) -> Result<(), IdentityError>;
}

/// Connection settings for [`FirebaseIdentityClient`].
#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseSettings {
    /// Web API key used for password sign-in.
    pub api_key: String,
    pub project_id: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// When set, admin calls use the emulator's `owner` bearer.
    #[serde(default)]
    pub emulator: bool,
}

fn default_endpoint() -> String {
    "https://identitytoolkit.googleapis.com".to_string()
}

#[cfg(feature = "ssr")]
const IDENTITY_SCOPE: &str = "https://www.googleapis.com/auth/identitytoolkit";

/// Firebase Identity Toolkit REST client.
#[cfg(feature = "ssr")]
pub struct FirebaseIdentityClient {
    http: reqwest::Client,
    settings: FirebaseSettings,
    tokens: Option<std::sync::Arc<dyn gcp_auth::TokenProvider>>,
}

#[cfg(feature = "ssr")]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: String,
}

#[cfg(feature = "ssr")]
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[cfg(feature = "ssr")]
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[cfg(feature = "ssr")]
impl FirebaseIdentityClient {
    pub async fn new(settings: FirebaseSettings) -> Result<Self, AppError> {
        let tokens = if settings.emulator {
            None
        } else {
            let provider = gcp_auth::provider().await.map_err(|e| {
                AppError::Identity(format!("Failed to load service credentials: {e}"))
            })?;
            Some(provider)
        };

        Ok(Self {
            http: reqwest::Client::new(),
            settings,
            tokens,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.settings.endpoint.trim_end_matches('/'), path)
    }

    fn project_url(&self, action: &str) -> String {
        self.url(&format!("projects/{}/{}", self.settings.project_id, action))
    }

    async fn bearer(&self) -> Result<String, IdentityError> {
        match &self.tokens {
            None => Ok("owner".to_string()),
            Some(provider) => provider
                .token(&[IDENTITY_SCOPE])
                .await
                .map(|t| t.as_str().to_string())
                .map_err(|e| IdentityError::Unknown(format!("token: {e}"))),
        }
    }

    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, IdentityError> {
        let response = request
            .send()
            .await
            .map_err(|e| IdentityError::Unknown(e.to_string()))?;

        if response.status().is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| IdentityError::Unknown(e.to_string()));
        }

        let status = response.status();
        match response.json::<ErrorEnvelope>().await {
            Ok(envelope) => Err(IdentityError::from_code(&envelope.error.message)),
            Err(_) => Err(IdentityError::Unknown(format!("HTTP {status}"))),
        }
    }

    async fn admin_call<T: serde::de::DeserializeOwned>(
        &self,
        action: &str,
        body: serde_json::Value,
    ) -> Result<T, IdentityError> {
        let token = self.bearer().await?;
        let request = self
            .http
            .post(self.project_url(action))
            .bearer_auth(token)
            .json(&body);
        self.send(request).await
    }
}

#[cfg(feature = "ssr")]
#[async_trait]
impl IdentityProvider for FirebaseIdentityClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        let request = self
            .http
            .post(self.url("accounts:signInWithPassword"))
            .query(&[("key", self.settings.api_key.as_str())])
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }));

        let account: AccountResponse = self.send(request).await?;
        Ok(Identity {
            uid: account.local_id,
            email: account.email,
        })
    }

    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, IdentityError> {
        let account: AccountResponse = self
            .admin_call(
                "accounts",
                serde_json::json!({ "email": email, "password": password }),
            )
            .await?;

        tracing::info!(uid = %account.local_id, "Provisioned identity account");
        Ok(Identity {
            uid: account.local_id,
            email: email.to_string(),
        })
    }

    async fn update_password(&self, uid: &str, new_password: &str) -> Result<(), IdentityError> {
        let _: serde_json::Value = self
            .admin_call(
                "accounts:update",
                serde_json::json!({ "localId": uid, "password": new_password }),
            )
            .await?;
        Ok(())
    }

    async fn delete_account(&self, uid: &str) -> Result<(), IdentityError> {
        let _: serde_json::Value = self
            .admin_call("accounts:delete", serde_json::json!({ "localId": uid }))
            .await?;
        tracing::info!(uid = %uid, "Deleted identity account");
        Ok(())
    }
}
