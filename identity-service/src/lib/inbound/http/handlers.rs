use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::identity::errors::AuthError;
use crate::identity::errors::ErrorKind;
use crate::identity::errors::FaultClass;
use crate::identity::models::AuthSession;
use crate::identity::models::IdentityProfile;

pub mod login;
pub mod register;
pub mod verify_token;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Classified failure as seen by callers: status, kind, fault side, message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    kind: ErrorKind,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = match err {
            AuthError::DuplicateIdentity(_) => StatusCode::CONFLICT,
            AuthError::IdentityNotFound(_) => StatusCode::NOT_FOUND,
            AuthError::InvalidCredential => StatusCode::BAD_REQUEST,
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AuthError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::SigningFailure | AuthError::HashingFailure => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self {
            status,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let data = ApiErrorData {
            kind: self.kind,
            fault: self.kind.fault(),
            message: self.message,
        };

        (self.status, Json(ApiResponseBody::new(self.status, data))).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub kind: ErrorKind,
    pub fault: FaultClass,
    pub message: String,
}

/// Response payload shared by register, login and verify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResponseData {
    pub identity: IdentityData,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityData {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&IdentityProfile> for IdentityData {
    fn from(profile: &IdentityProfile) -> Self {
        Self {
            id: profile.id.to_string(),
            email: profile.email.as_str().to_string(),
            first_name: profile.first_name.as_str().to_string(),
            last_name: profile.last_name.as_str().to_string(),
        }
    }
}

impl From<AuthSession> for SessionResponseData {
    fn from(session: AuthSession) -> Self {
        Self {
            identity: (&session.identity).into(),
            token: session.token,
            expires_at: session.expires_at,
        }
    }
}
