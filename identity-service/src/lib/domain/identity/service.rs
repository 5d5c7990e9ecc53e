use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenIssuer;

use crate::domain::identity::models::AuthSession;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityProfile;
use crate::domain::identity::models::LoginCommand;
use crate::domain::identity::models::NewIdentity;
use crate::domain::identity::models::Password;
use crate::domain::identity::models::RegisterCommand;
use crate::identity::errors::AuthError;
use crate::identity::errors::StoreError;
use crate::identity::ports::AuthServicePort;
use crate::identity::ports::IdentityRepository;

/// Domain service implementation for authentication.
///
/// Composes an identity store, a password hasher and a token issuer handed
/// over at construction. Holds no mutable state, so one instance serves any
/// number of concurrent calls.
pub struct AuthService<R>
where
    R: IdentityRepository,
{
    repository: Arc<R>,
    password_hasher: Arc<PasswordHasher>,
    token_issuer: Arc<TokenIssuer>,
}

impl<R> AuthService<R>
where
    R: IdentityRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Identity store implementation
    /// * `password_hasher` - Credential hasher
    /// * `token_issuer` - Token issuer holding the process-wide signing key
    pub fn new(
        repository: Arc<R>,
        password_hasher: Arc<PasswordHasher>,
        token_issuer: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            repository,
            password_hasher,
            token_issuer,
        }
    }

    async fn find_identity(&self, email: &str) -> Result<Option<Identity>, AuthError> {
        self.repository
            .find_by_email(email)
            .await
            .map_err(store_unavailable)
    }

    async fn hash_password(&self, password: Password) -> Result<String, AuthError> {
        let hasher = Arc::clone(&self.password_hasher);

        tokio::task::spawn_blocking(move || hasher.hash(password.expose()))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing task aborted");
                AuthError::HashingFailure
            })?
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing failed");
                AuthError::HashingFailure
            })
    }

    async fn verify_password(
        &self,
        password: String,
        secret_hash: String,
    ) -> Result<bool, AuthError> {
        let hasher = Arc::clone(&self.password_hasher);

        tokio::task::spawn_blocking(move || hasher.verify(&password, &secret_hash))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Password verification task aborted");
                AuthError::HashingFailure
            })?
            .map_err(|e| {
                tracing::error!(error = %e, "Stored password hash could not be verified");
                AuthError::HashingFailure
            })
    }

    fn open_session(&self, identity: IdentityProfile) -> Result<AuthSession, AuthError> {
        let issued = self.token_issuer.issue(&identity).map_err(|e| {
            tracing::error!(identity_id = %identity.id, error = %e, "Token signing failed");
            AuthError::SigningFailure
        })?;

        Ok(AuthSession {
            identity,
            token: issued.token,
            expires_at: issued.expires_at,
        })
    }
}

fn store_unavailable(err: StoreError) -> AuthError {
    tracing::error!(error = %err, "Identity store operation failed");
    AuthError::StoreUnavailable
}

#[async_trait]
impl<R> AuthServicePort for AuthService<R>
where
    R: IdentityRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, AuthError> {
        let email = command.email;

        if self.find_identity(email.as_str()).await?.is_some() {
            tracing::warn!(email = %email, "Registration rejected: email already registered");
            return Err(AuthError::DuplicateIdentity(email.to_string()));
        }

        let secret_hash = self.hash_password(command.password).await?;

        let new_identity = NewIdentity {
            email: email.clone(),
            secret_hash,
            first_name: command.first_name,
            last_name: command.last_name,
        };

        let identity = self
            .repository
            .create(new_identity)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => {
                    tracing::warn!(email = %email, "Registration lost a race on the same email");
                    AuthError::DuplicateIdentity(email.to_string())
                }
                other => store_unavailable(other),
            })?;

        tracing::info!(identity_id = %identity.id, "Identity registered");

        self.open_session(IdentityProfile::from(&identity))
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthSession, AuthError> {
        let identity = self
            .find_identity(&command.email)
            .await?
            .ok_or_else(|| AuthError::IdentityNotFound(command.email.clone()))?;

        let is_valid = self
            .verify_password(command.password, identity.secret_hash.clone())
            .await?;

        if !is_valid {
            tracing::warn!(identity_id = %identity.id, "Login rejected: invalid password");
            return Err(AuthError::InvalidCredential);
        }

        tracing::info!(identity_id = %identity.id, "Identity authenticated");

        self.open_session(IdentityProfile::from(&identity))
    }

    async fn verify_token(&self, token: &str) -> Result<AuthSession, AuthError> {
        let profile = self
            .token_issuer
            .verify::<IdentityProfile>(token)
            .map_err(|_| AuthError::InvalidToken)?
            .into_subject();

        tracing::debug!(identity_id = %profile.id, "Token verified, renewing");

        self.open_session(profile)
    }
}
