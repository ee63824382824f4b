//! Sign-in, sign-out, registration, and bearer-session authentication.
//!
//! Session tokens follow the `st_<prefix>_<secret>` shape: the prefix is the
//! lookup key, the secret is stored only as a SHA-256 digest and compared in
//! constant time. Password hashing sits behind [`PasswordHasher`] so the
//! credential scheme stays a seam rather than a core concern.

use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    CreateUserParams, RepoError, SessionsRepo, UsersRepo,
};
use crate::domain::entities::{SessionRecord, UserRecord};
use crate::domain::types::Role;

const TOKEN_PREFIX: &str = "st";
const MIN_SECRET_LEN: usize = 32;
const MIN_PASSWORD_LEN: usize = 8;

pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;
    fn verify(&self, password: &str, hash: &str) -> bool;
}

#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordHashError(pub String);

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("account is inactive")]
    Inactive,
    #[error("email already exists")]
    DuplicateEmail,
    #[error("validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Hash(#[from] PasswordHashError),
}

#[derive(Debug, Error)]
pub enum SessionAuthError {
    #[error("missing session token")]
    Missing,
    #[error("invalid session token")]
    Invalid,
    #[error("expired session token")]
    Expired,
}

/// The request-scoped identity passed explicitly into every gated operation.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: Role,
}

impl Principal {
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), SessionAuthError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(SessionAuthError::Invalid)
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone)]
pub struct RegisterCitizen {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SessionIssued {
    pub token: String,
    pub user: UserRecord,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UsersRepo>,
    sessions: Arc<dyn SessionsRepo>,
    hasher: Arc<dyn PasswordHasher>,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UsersRepo>,
        sessions: Arc<dyn SessionsRepo>,
        hasher: Arc<dyn PasswordHasher>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            users,
            sessions,
            hasher,
            session_ttl,
        }
    }

    /// Self-service registration always creates a citizen account.
    pub async fn register_citizen(&self, cmd: RegisterCitizen) -> Result<UserRecord, AuthError> {
        let full_name = cmd.full_name.trim().to_string();
        let email = cmd.email.trim().to_ascii_lowercase();

        if full_name.is_empty() {
            return Err(AuthError::Validation("full name is required".into()));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::Validation("a valid email is required".into()));
        }
        if cmd.password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        if self.users.find_user_by_email(&email).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = self.hasher.hash(&cmd.password)?;
        let user = self
            .users
            .create_user(CreateUserParams {
                id: Uuid::new_v4(),
                full_name,
                email,
                role: Role::Citizen,
                address: cmd.address,
                is_active: true,
                password_hash,
                created_at: OffsetDateTime::now_utc(),
            })
            .await
            .map_err(|err| match err {
                RepoError::Duplicate { .. } => AuthError::DuplicateEmail,
                other => AuthError::Repo(other),
            })?;

        Ok(user)
    }

    /// Used by the seed command to provision fixed-role accounts.
    pub async fn provision_user(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<UserRecord, AuthError> {
        let email = email.trim().to_ascii_lowercase();
        if let Some(existing) = self.users.find_user_by_email(&email).await? {
            return Ok(existing);
        }
        let password_hash = self.hasher.hash(password)?;
        let user = self
            .users
            .create_user(CreateUserParams {
                id: Uuid::new_v4(),
                full_name: full_name.to_string(),
                email,
                role,
                address: None,
                is_active: true,
                password_hash,
                created_at: OffsetDateTime::now_utc(),
            })
            .await?;
        Ok(user)
    }

    /// Inactive accounts are refused before the credential outcome is
    /// revealed: a valid password never unlocks a deactivated user.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SessionIssued, AuthError> {
        let email = email.trim().to_ascii_lowercase();
        let credentials = self
            .users
            .credentials_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !credentials.user.is_active {
            return Err(AuthError::Inactive);
        }

        if !self.hasher.verify(password, &credentials.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let prefix = Self::generate_prefix();
        let secret = Self::generate_secret();
        let token = format!("{TOKEN_PREFIX}_{prefix}_{secret}");
        let now = OffsetDateTime::now_utc();

        self.sessions
            .insert_session(SessionRecord {
                id: Uuid::new_v4(),
                user_id: credentials.user.id,
                prefix,
                hashed_secret: Self::hash_secret(&secret),
                created_at: now,
                expires_at: now + self.session_ttl,
            })
            .await?;

        Ok(SessionIssued {
            token,
            user: credentials.user,
        })
    }

    pub async fn authenticate(&self, token: &str) -> Result<Principal, SessionAuthError> {
        let parsed = Self::parse_token(token).ok_or(SessionAuthError::Invalid)?;
        let session = self
            .sessions
            .find_session_by_prefix(&parsed.prefix)
            .await
            .map_err(|_| SessionAuthError::Invalid)?
            .ok_or(SessionAuthError::Invalid)?;

        if session.expires_at <= OffsetDateTime::now_utc() {
            return Err(SessionAuthError::Expired);
        }

        let hashed_input = Self::hash_secret(&parsed.secret);
        if session.hashed_secret.ct_eq(&hashed_input).unwrap_u8() == 0 {
            return Err(SessionAuthError::Invalid);
        }

        let user = self
            .users
            .find_user(session.user_id)
            .await
            .map_err(|_| SessionAuthError::Invalid)?
            .ok_or(SessionAuthError::Invalid)?;

        // Deactivation takes effect immediately, not at next sign-in.
        if !user.is_active {
            return Err(SessionAuthError::Invalid);
        }

        Ok(Principal {
            user_id: user.id,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
        })
    }

    pub async fn sign_out(&self, token: &str) -> Result<(), SessionAuthError> {
        let parsed = Self::parse_token(token).ok_or(SessionAuthError::Invalid)?;
        if let Ok(Some(session)) = self.sessions.find_session_by_prefix(&parsed.prefix).await {
            let _ = self.sessions.delete_session(session.id).await;
        }
        Ok(())
    }

    fn hash_secret(secret: &str) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hasher.finalize().to_vec()
    }

    fn generate_prefix() -> String {
        Uuid::new_v4().simple().to_string()[..12].to_string()
    }

    fn generate_secret() -> String {
        format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
    }

    fn parse_token(token: &str) -> Option<ParsedToken> {
        let mut parts = token.splitn(3, '_');
        let prefix_tag = parts.next()?;
        if prefix_tag != TOKEN_PREFIX {
            return None;
        }
        let prefix = parts.next()?;
        let secret = parts.next()?;
        if secret.len() < MIN_SECRET_LEN || prefix.is_empty() {
            return None;
        }
        Some(ParsedToken {
            prefix: prefix.to_string(),
            secret: secret.to_string(),
        })
    }
}

struct ParsedToken {
    prefix: String,
    secret: String,
}
