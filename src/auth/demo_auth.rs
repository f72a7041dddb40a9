use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::auth::identity::{Identity, IdentityError, IdentityProvider};

/// Consecutive failed sign-ins before an account is locked.
pub const MAX_FAILED_ATTEMPTS: u32 = 5;

/// How long a locked account stays locked.
pub const LOCKOUT: Duration = Duration::from_secs(300);

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
struct DemoAccount {
    uid: String,
    email: String,
    salt: String,
    password_hash: String,
    failed_attempts: u32,
    locked_until: Option<Instant>,
}

/// In-process identity service for demo mode and tests.
///
/// Accounts live in memory only; passwords are stored as salted SHA-256.
#[derive(Default)]
pub struct DemoIdentityProvider {
    accounts: RwLock<HashMap<String, DemoAccount>>,
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

fn lock_poisoned() -> IdentityError {
    IdentityError::Unknown("demo account store lock poisoned".into())
}

impl DemoIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn normalize(email: &str) -> String {
        email.trim().to_lowercase()
    }
}

#[async_trait]
impl IdentityProvider for DemoIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        if !is_valid_email(email.trim()) {
            return Err(IdentityError::InvalidEmail);
        }

        let mut accounts = self.accounts.write().map_err(|_| lock_poisoned())?;
        let account = accounts
            .get_mut(&Self::normalize(email))
            .ok_or(IdentityError::UserNotFound)?;

        let now = Instant::now();
        if let Some(until) = account.locked_until {
            if now < until {
                return Err(IdentityError::TooManyAttempts);
            }
            account.locked_until = None;
            account.failed_attempts = 0;
        }

        if hash_password(&account.salt, password) != account.password_hash {
            account.failed_attempts += 1;
            if account.failed_attempts >= MAX_FAILED_ATTEMPTS {
                account.locked_until = Some(now + LOCKOUT);
                tracing::warn!(email = %account.email, "Demo account locked after repeated failures");
                return Err(IdentityError::TooManyAttempts);
            }
            return Err(IdentityError::WrongPassword);
        }

        account.failed_attempts = 0;
        Ok(Identity {
            uid: account.uid.clone(),
            email: account.email.clone(),
        })
    }

    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, IdentityError> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(IdentityError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(IdentityError::WeakPassword);
        }

        let mut accounts = self.accounts.write().map_err(|_| lock_poisoned())?;
        let key = Self::normalize(email);
        if accounts.contains_key(&key) {
            return Err(IdentityError::EmailExists);
        }

        let salt = uuid::Uuid::new_v4().simple().to_string();
        let account = DemoAccount {
            uid: uuid::Uuid::new_v4().simple().to_string(),
            email: email.to_string(),
            password_hash: hash_password(&salt, password),
            salt,
            failed_attempts: 0,
            locked_until: None,
        };
        let identity = Identity {
            uid: account.uid.clone(),
            email: account.email.clone(),
        };
        accounts.insert(key, account);

        Ok(identity)
    }

    async fn update_password(&self, uid: &str, new_password: &str) -> Result<(), IdentityError> {
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(IdentityError::WeakPassword);
        }

        let mut accounts = self.accounts.write().map_err(|_| lock_poisoned())?;
        let account = accounts
            .values_mut()
            .find(|a| a.uid == uid)
            .ok_or(IdentityError::UserNotFound)?;

        account.salt = uuid::Uuid::new_v4().simple().to_string();
        account.password_hash = hash_password(&account.salt, new_password);
        account.failed_attempts = 0;
        account.locked_until = None;
        Ok(())
    }

    async fn delete_account(&self, uid: &str) -> Result<(), IdentityError> {
        let mut accounts = self.accounts.write().map_err(|_| lock_poisoned())?;
        let before = accounts.len();
        accounts.retain(|_, a| a.uid != uid);
        if accounts.len() == before {
            return Err(IdentityError::UserNotFound);
        }
        Ok(())
    }
}
