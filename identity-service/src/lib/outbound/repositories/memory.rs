use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::NewIdentity;
use crate::domain::identity::ports::IdentityRepository;
use crate::identity::errors::StoreError;

/// Process-local identity store.
///
/// Emails are matched case-insensitively using Unicode lowercase folding.
/// The Postgres store folds with `lower()`, which depends on the database
/// collation: the two agree on ASCII addresses but may differ on others.
/// Used by tests and local runs; contents are lost on restart.
#[derive(Default)]
pub struct InMemoryIdentityRepository {
    identities: RwLock<HashMap<String, Identity>>,
}

impl InMemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(email: &str) -> String {
        email.to_lowercase()
    }
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn create(&self, identity: NewIdentity) -> Result<Identity, StoreError> {
        let mut identities = self.identities.write().await;

        match identities.entry(Self::key(identity.email.as_str())) {
            Entry::Occupied(_) => Err(StoreError::Conflict(identity.email.to_string())),
            Entry::Vacant(slot) => {
                let stored = Identity {
                    id: IdentityId::new(),
                    email: identity.email,
                    secret_hash: identity.secret_hash,
                    first_name: identity.first_name,
                    last_name: identity.last_name,
                    created_at: Utc::now(),
                };
                Ok(slot.insert(stored).clone())
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        let identities = self.identities.read().await;
        Ok(identities.get(&Self::key(email)).cloned())
    }
}
