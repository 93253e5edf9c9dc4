//! Authentication service — signup, login, logout, and request
//! authentication.

use chrono::{Duration, Utc};
use siteround_core::error::{SiteroundError, SiteroundResult};
use siteround_core::models::session::CreateSession;
use siteround_core::models::user::{CreateUser, User};
use siteround_core::repository::{SessionRepository, UserRepository};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Input for the signup flow.
#[derive(Debug)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Successful signup/login result.
#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
    /// Signed JWT access token.
    pub access_token: String,
    /// Raw opaque session token (set as the HTTP-only cookie, not stored).
    pub session_token: String,
    /// Session ID.
    pub session_id: Uuid,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
}

/// An incoming request credential, as extracted by the HTTP layer.
#[derive(Debug, Clone, Copy)]
pub enum Credential<'a> {
    /// `Authorization: Bearer <jwt>` — verified statelessly.
    Bearer(&'a str),
    /// Session cookie value — resolved against the session store.
    SessionToken(&'a str),
}

/// Authentication service.
///
/// Generic over repository implementations so that the auth layer
/// has no dependency on the database crate.
pub struct AuthService<U: UserRepository, S: SessionRepository> {
    user_repo: U,
    session_repo: S,
    config: AuthConfig,
}

impl<U: UserRepository, S: SessionRepository> AuthService<U, S> {
    pub fn new(user_repo: U, session_repo: S, config: AuthConfig) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
        }
    }

    /// Register a new user and log them in.
    pub async fn signup(&self, input: SignupInput) -> SiteroundResult<LoginOutput> {
        // 1. Validate input.
        if input.name.trim().is_empty() || input.email.trim().is_empty() {
            return Err(SiteroundError::InvalidInput {
                message: "name and email are required".into(),
            });
        }
        if input.password.len() < self.config.min_password_length {
            return Err(SiteroundError::InvalidInput {
                message: format!(
                    "password must be at least {} characters",
                    self.config.min_password_length
                ),
            });
        }

        // 2. Reject duplicate emails before creating anything.
        match self.user_repo.get_by_email(&input.email).await {
            Ok(_) => {
                return Err(SiteroundError::Conflict {
                    message: "a user with this email already exists".into(),
                });
            }
            Err(SiteroundError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        // 3. Create the user (the repository hashes the password).
        let user = self
            .user_repo
            .create(CreateUser {
                name: input.name,
                email: input.email,
                password: input.password,
            })
            .await?;

        // 4. Open a session, same as login.
        self.open_session(user, input.ip_address, input.user_agent)
            .await
    }

    /// Authenticate a user with email + password and issue tokens.
    pub async fn login(&self, input: LoginInput) -> SiteroundResult<LoginOutput> {
        // 1. Look up user by email. An unknown email reads the same as a
        //    bad password.
        let user = self
            .user_repo
            .get_by_email(&input.email)
            .await
            .map_err(|_| AuthError::InvalidCredentials)?;

        // 2. Verify password.
        let valid = password::verify_password(
            &input.password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;

        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        // 3. Open a session and issue tokens.
        self.open_session(user, input.ip_address, input.user_agent)
            .await
    }

    async fn open_session(
        &self,
        user: User,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> SiteroundResult<LoginOutput> {
        let raw_token = token::generate_session_token();
        let token_hash = token::hash_session_token(&raw_token);
        let expires_at = Utc::now() + Duration::seconds(self.config.session_lifetime_secs as i64);

        let session = self
            .session_repo
            .create(CreateSession {
                user_id: user.id,
                token_hash,
                ip_address,
                user_agent,
                expires_at,
            })
            .await?;

        let access_token = token::issue_access_token(user.id, &self.config)?;

        Ok(LoginOutput {
            user,
            access_token,
            session_token: raw_token,
            session_id: session.id,
            expires_in: self.config.access_token_lifetime_secs,
        })
    }

    /// Resolve an incoming credential to an actor identity.
    ///
    /// This is the gateway contract consumed by the HTTP layer: every
    /// failure maps to `Unauthenticated`, and the returned user id is the
    /// explicit actor parameter for all core operations.
    pub async fn authenticate(&self, credential: Credential<'_>) -> SiteroundResult<Uuid> {
        match credential {
            Credential::Bearer(jwt) => {
                let claims = token::decode_access_token(jwt, &self.config)?;
                Uuid::parse_str(&claims.sub).map_err(|_| {
                    AuthError::TokenInvalid("subject is not a valid user id".into()).into()
                })
            }
            Credential::SessionToken(raw) => {
                let token_hash = token::hash_session_token(raw);
                let session = self
                    .session_repo
                    .get_by_token_hash(&token_hash)
                    .await
                    .map_err(|e| match e {
                        SiteroundError::NotFound { .. } => AuthError::InvalidCredentials.into(),
                        other => other,
                    })?;

                if session.expires_at <= Utc::now() {
                    // Drop the expired session and reject.
                    let _ = self.session_repo.invalidate(session.id).await;
                    return Err(AuthError::SessionExpired.into());
                }

                Ok(session.user_id)
            }
        }
    }

    /// Invalidate the session behind a raw cookie token (logout).
    ///
    /// Logging out an already-invalid session succeeds: the end state is
    /// the same either way.
    pub async fn logout(&self, raw_session_token: &str) -> SiteroundResult<()> {
        let token_hash = token::hash_session_token(raw_session_token);
        match self.session_repo.get_by_token_hash(&token_hash).await {
            Ok(session) => self.session_repo.invalidate(session.id).await,
            Err(SiteroundError::NotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Revoke all sessions for a user (account deletion, password change).
    pub async fn revoke_all_sessions(&self, user_id: Uuid) -> SiteroundResult<()> {
        self.session_repo.invalidate_user_sessions(user_id).await
    }
}
