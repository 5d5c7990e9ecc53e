use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::SessionResponseData;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Password;
use crate::domain::identity::models::PersonName;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::ports::AuthServicePort;
use crate::identity::errors::AuthError;
use crate::identity::errors::ValidationError;
use crate::inbound::http::router::AppState;

pub async fn register<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<SessionResponseData>, ApiError> {
    let command = body.try_into_command().map_err(AuthError::from)?;

    state
        .auth_service
        .register(command)
        .await
        .map_err(ApiError::from)
        .map(|session| ApiSuccess::new(StatusCode::CREATED, session.into()))
}

/// HTTP request body for registering an identity (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    email: String,
    password: String,
    first_name: String,
    last_name: String,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ValidationError> {
        let email = EmailAddress::new(self.email)?;
        let password = Password::new(self.password)?;
        let first_name = PersonName::new(self.first_name).map_err(ValidationError::FirstName)?;
        let last_name = PersonName::new(self.last_name).map_err(ValidationError::LastName)?;
        Ok(RegisterCommand::new(email, password, first_name, last_name))
    }
}
