use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::NewIdentity;
use crate::domain::identity::models::PersonName;
use crate::domain::identity::ports::IdentityRepository;
use crate::identity::errors::StoreError;

const EMAIL_UNIQUE_INDEX: &str = "identities_email_lower_key";

pub struct PostgresIdentityRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl PostgresIdentityRepository {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn bounded<T, F>(&self, query: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        tokio::time::timeout(self.query_timeout, query)
            .await
            .map_err(|_| StoreError::Timeout(self.query_timeout))?
            .map_err(classify)
    }
}

fn classify(e: sqlx::Error) -> StoreError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or(EMAIL_UNIQUE_INDEX);
            return StoreError::Conflict(constraint.to_string());
        }
    }
    StoreError::Unavailable(e.to_string())
}

#[derive(sqlx::FromRow)]
struct IdentityRow {
    id: Uuid,
    email: String,
    secret_hash: String,
    first_name: String,
    last_name: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = StoreError;

    fn try_from(row: IdentityRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let invalid = |e: &dyn std::fmt::Display| {
            StoreError::InvalidRecord(format!("identity {}: {}", id, e))
        };

        Ok(Identity {
            id: IdentityId(id),
            email: EmailAddress::new(row.email).map_err(|e| invalid(&e))?,
            first_name: PersonName::new(row.first_name).map_err(|e| invalid(&e))?,
            last_name: PersonName::new(row.last_name).map_err(|e| invalid(&e))?,
            secret_hash: row.secret_hash,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl IdentityRepository for PostgresIdentityRepository {
    async fn create(&self, identity: NewIdentity) -> Result<Identity, StoreError> {
        let id = IdentityId::new();
        let created_at = Utc::now();

        self.bounded(
            sqlx::query(
                r#"
                INSERT INTO identities (id, email, secret_hash, first_name, last_name, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(id.0)
            .bind(identity.email.as_str())
            .bind(identity.secret_hash.as_str())
            .bind(identity.first_name.as_str())
            .bind(identity.last_name.as_str())
            .bind(created_at)
            .execute(&self.pool),
        )
        .await?;

        Ok(Identity {
            id,
            email: identity.email,
            secret_hash: identity.secret_hash,
            first_name: identity.first_name,
            last_name: identity.last_name,
            created_at,
        })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        let row = self
            .bounded(
                sqlx::query_as::<_, IdentityRow>(
                    r#"
                    SELECT id, email, secret_hash, first_name, last_name, created_at
                    FROM identities
                    WHERE lower(email) = lower($1)
                    "#,
                )
                .bind(email)
                .fetch_optional(&self.pool),
            )
            .await?;

        row.map(Identity::try_from).transpose()
    }
}
