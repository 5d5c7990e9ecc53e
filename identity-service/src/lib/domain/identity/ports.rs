use async_trait::async_trait;

use crate::domain::identity::models::AuthSession;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::LoginCommand;
use crate::domain::identity::models::NewIdentity;
use crate::domain::identity::models::RegisterCommand;
use crate::identity::errors::AuthError;
use crate::identity::errors::StoreError;

/// Port for authentication operations exposed to other services.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new identity and issue its first token.
    ///
    /// # Arguments
    /// * `command` - Validated email, password and profile fields
    ///
    /// # Returns
    /// Profile of the stored identity with a fresh token
    ///
    /// # Errors
    /// * `DuplicateIdentity` - Email is already registered
    /// * `StoreUnavailable` - Identity store failed or timed out
    /// * `HashingFailure` - Password could not be hashed
    /// * `SigningFailure` - Token could not be signed
    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, AuthError>;

    /// Authenticate a credential pair and issue a token.
    ///
    /// # Errors
    /// * `IdentityNotFound` - No identity with this email
    /// * `InvalidCredential` - Password does not match
    /// * `StoreUnavailable` - Identity store failed or timed out
    /// * `HashingFailure` - Stored hash could not be verified
    /// * `SigningFailure` - Token could not be signed
    async fn login(&self, command: LoginCommand) -> Result<AuthSession, AuthError>;

    /// Validate a token and renew it for the same identity.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is malformed, forged or expired
    /// * `SigningFailure` - Renewed token could not be signed
    async fn verify_token(&self, token: &str) -> Result<AuthSession, AuthError>;
}

/// Persistence operations for the identity aggregate.
///
/// Implementations own email uniqueness and case policy, and bound their own
/// round-trips in time.
#[async_trait]
pub trait IdentityRepository: Send + Sync + 'static {
    /// Persist a new identity, assigning its id.
    ///
    /// # Errors
    /// * `Conflict` - Email is already registered
    /// * `Unavailable` / `Timeout` - Store operation failed
    async fn create(&self, identity: NewIdentity) -> Result<Identity, StoreError>;

    /// Retrieve identity by email address.
    ///
    /// # Returns
    /// Optional identity (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` / `Timeout` - Store operation failed
    /// * `InvalidRecord` - Stored row does not form a valid identity
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError>;
}
