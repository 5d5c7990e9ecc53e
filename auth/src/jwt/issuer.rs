use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::claims::Claims;
use super::errors::JwtError;
use super::handler::JwtHandler;

/// A freshly signed token together with its validity window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies time-bounded tokens for a single issuer.
///
/// The signing key and TTL are fixed at construction; the issuer keeps no
/// other state and is safe to share across tasks.
pub struct TokenIssuer {
    handler: JwtHandler,
    issuer: String,
    ttl: Duration,
    validation: Validation,
}

impl TokenIssuer {
    /// Create a token issuer.
    ///
    /// # Arguments
    /// * `handler` - Signing/verification handler holding the process-wide key
    /// * `issuer` - Value of the `iss` claim, required on verification
    /// * `ttl` - Validity window of every issued token
    pub fn new(handler: JwtHandler, issuer: impl Into<String>, ttl: Duration) -> Self {
        let issuer = issuer.into();

        let mut validation = handler.validation();
        validation.set_issuer(&[&issuer]);
        validation.set_required_spec_claims(&["exp", "iss"]);

        Self {
            handler,
            issuer,
            ttl,
            validation,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign `subject` into a token valid from now for the configured TTL.
    pub fn issue<T: Serialize>(&self, subject: T) -> Result<IssuedToken, JwtError> {
        self.issue_at(subject, Utc::now())
    }

    /// Sign `subject` into a token issued at `now`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Timestamps out of range or serialization failed
    pub fn issue_at<T: Serialize>(
        &self,
        subject: T,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, JwtError> {
        let iat = now.timestamp();
        let exp = iat + self.ttl.num_seconds();

        let (issued_at, expires_at) = DateTime::from_timestamp(iat, 0)
            .zip(DateTime::from_timestamp(exp, 0))
            .ok_or_else(|| JwtError::EncodingFailed("Token lifetime out of range".to_string()))?;

        let claims = Claims {
            subject,
            iss: self.issuer.clone(),
            iat,
            exp,
        };
        let token = self.handler.encode(&claims)?;

        Ok(IssuedToken {
            token,
            issued_at,
            expires_at,
        })
    }

    /// Verify signature, issuer and expiry, then decode the claims.
    ///
    /// # Errors
    /// * `InvalidToken` - For any reason; the cause is only logged
    pub fn verify<T: DeserializeOwned>(&self, token: &str) -> Result<Claims<T>, JwtError> {
        let claims: Claims<T> = self.handler.decode(token, &self.validation)?;

        if claims.is_expired(Utc::now().timestamp()) {
            tracing::debug!(exp = claims.exp, "Token rejected: expired");
            return Err(JwtError::InvalidToken);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde::Deserialize;

    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Profile {
        id: String,
        email: String,
    }

    fn profile() -> Profile {
        Profile {
            id: "user123".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    fn issuer(name: &str, ttl: Duration) -> TokenIssuer {
        TokenIssuer::new(JwtHandler::new(SECRET).unwrap(), name, ttl)
    }

    #[test]
    fn test_issue_and_verify() {
        let issuer = issuer("identity", Duration::hours(1));

        let issued = issuer.issue(profile()).expect("Failed to issue token");
        let claims: Claims<Profile> = issuer.verify(&issued.token).expect("Failed to verify");

        assert_eq!(claims.subject, profile());
        assert_eq!(claims.iss, "identity");
        assert_eq!(claims.iat, issued.issued_at.timestamp());
        assert_eq!(claims.exp, issued.expires_at.timestamp());
    }

    #[test]
    fn test_expiry_follows_ttl() {
        let issuer = issuer("identity", Duration::minutes(15));

        let issued = issuer.issue(profile()).unwrap();

        assert_eq!(issued.expires_at - issued.issued_at, Duration::minutes(15));
        assert_eq!(issuer.ttl(), Duration::minutes(15));
    }

    #[test]
    fn test_verify_expired_token() {
        let issuer = issuer("identity", Duration::minutes(5));

        let issued = issuer
            .issue_at(profile(), Utc::now() - Duration::minutes(10))
            .unwrap();

        let result = issuer.verify::<Profile>(&issued.token);
        assert_eq!(result.unwrap_err(), JwtError::InvalidToken);
    }

    #[test]
    fn test_verify_backdated_but_unexpired_token() {
        let issuer = issuer("identity", Duration::minutes(5));

        let issued = issuer
            .issue_at(profile(), Utc::now() - Duration::minutes(1))
            .unwrap();

        assert!(issuer.verify::<Profile>(&issued.token).is_ok());
    }

    #[test]
    fn test_verify_rejects_other_issuer() {
        let ours = issuer("identity", Duration::hours(1));
        let theirs = issuer("someone-else", Duration::hours(1));

        let issued = theirs.issue(profile()).unwrap();

        let result = ours.verify::<Profile>(&issued.token);
        assert_eq!(result.unwrap_err(), JwtError::InvalidToken);
    }

    #[test]
    fn test_verify_rejects_missing_subject_fields() {
        let issuer = issuer("identity", Duration::hours(1));

        let mut partial = HashMap::new();
        partial.insert("id", "user123");
        let issued = issuer.issue(partial).unwrap();

        let result = issuer.verify::<Profile>(&issued.token);
        assert_eq!(result.unwrap_err(), JwtError::InvalidToken);
    }

    #[test]
    fn test_reissue_does_not_accumulate_metadata() {
        let issuer = issuer("identity", Duration::hours(1));

        let mut extended = HashMap::new();
        extended.insert("id", serde_json::json!("user123"));
        extended.insert("email", serde_json::json!("alice@example.com"));
        extended.insert("scope", serde_json::json!("admin"));
        let original = issuer.issue(extended).unwrap();

        let subject = issuer
            .verify::<Profile>(&original.token)
            .unwrap()
            .into_subject();
        let renewed = issuer.issue(subject).unwrap();

        let claims: Claims<HashMap<String, serde_json::Value>> =
            issuer.verify(&renewed.token).unwrap();
        let mut keys: Vec<&str> = claims.subject.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["email", "id"]);
    }
}
