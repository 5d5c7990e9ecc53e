use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// JWT claims envelope.
///
/// The service-defined `subject` is flattened next to the issuance metadata
/// (`iss`, `iat`, `exp`). Taking the subject back out with
/// [`Claims::into_subject`] discards that metadata, together with any claim
/// the subject type does not declare.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims<T> {
    #[serde(flatten)]
    pub subject: T,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl<T> Claims<T> {
    /// Issuance instant, if the timestamp is representable.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    /// Expiry instant, if the timestamp is representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// A token is valid strictly before `exp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }

    /// Drop issuance metadata and keep the reusable subject.
    pub fn into_subject(self) -> T {
        self.subject
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Subject {
        id: String,
        email: String,
    }

    fn subject() -> Subject {
        Subject {
            id: "user123".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    #[test]
    fn test_subject_is_flattened() {
        let claims = Claims {
            subject: subject(),
            iss: "identity".to_string(),
            iat: 1_000,
            exp: 2_000,
        };

        let value = serde_json::to_value(&claims).unwrap();

        assert_eq!(value["id"], "user123");
        assert_eq!(value["email"], "alice@example.com");
        assert_eq!(value["iss"], "identity");
        assert_eq!(value["iat"], 1_000);
        assert_eq!(value["exp"], 2_000);
        assert!(value.get("subject").is_none());
    }

    #[test]
    fn test_into_subject_drops_metadata_and_unknown_fields() {
        let json = serde_json::json!({
            "id": "user123",
            "email": "alice@example.com",
            "role": "admin",
            "iss": "identity",
            "iat": 1_000,
            "exp": 2_000,
        });

        let claims: Claims<Subject> = serde_json::from_value(json).unwrap();
        let reissued = serde_json::to_value(claims.into_subject()).unwrap();

        let fields: HashMap<String, serde_json::Value> =
            serde_json::from_value(reissued).unwrap();
        assert_eq!(fields.len(), 2);
        assert!(fields.contains_key("id"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn test_missing_metadata_is_rejected() {
        let json = serde_json::json!({
            "id": "user123",
            "email": "alice@example.com",
            "iss": "identity",
            "exp": 2_000,
        });

        let result = serde_json::from_value::<Claims<Subject>>(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims {
            subject: subject(),
            iss: "identity".to_string(),
            iat: 0,
            exp: 1000,
        };

        assert!(!claims.is_expired(999));
        assert!(claims.is_expired(1000));
        assert!(claims.is_expired(1001));
    }

    #[test]
    fn test_timestamps() {
        let claims = Claims {
            subject: subject(),
            iss: "identity".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_003_600,
        };

        let issued_at = claims.issued_at().unwrap();
        let expires_at = claims.expires_at().unwrap();
        assert_eq!((expires_at - issued_at).num_seconds(), 3600);
    }
}
