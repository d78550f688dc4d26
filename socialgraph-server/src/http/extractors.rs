//! Custom Axum extractors

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::Json;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::error::ApiError;
use crate::models::{ExternalIdentity, Session, ValidationError};

/// Identity headers set by the authenticating proxy in front of the server
pub mod headers {
    pub const SUBJECT: &str = "x-auth-subject";
    pub const FIRST_NAME: &str = "x-auth-first-name";
    pub const LAST_NAME: &str = "x-auth-last-name";
    pub const USERNAME: &str = "x-auth-username";
    /// Comma-separated, primary first
    pub const EMAIL: &str = "x-auth-email";
    pub const IMAGE_URL: &str = "x-auth-image-url";
}

fn header(map: &HeaderMap, name: &'static str) -> Result<Option<String>, ValidationError> {
    let Some(value) = map.get(name) else {
        return Ok(None);
    };

    let value = value.to_str().map_err(|_| ValidationError::InvalidFormat {
        field: name,
        reason: "header is not valid UTF-8",
    })?;

    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_owned()))
}

/// Build a session from identity headers. No subject header means anonymous.
pub fn session_from_headers(map: &HeaderMap) -> Result<Session, ValidationError> {
    let Some(subject) = header(map, headers::SUBJECT)? else {
        return Ok(Session::anonymous());
    };

    let email_addresses = header(map, headers::EMAIL)?
        .map(|emails| {
            emails
                .split(',')
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();

    Ok(Session::authenticated(ExternalIdentity {
        subject,
        first_name: header(map, headers::FIRST_NAME)?,
        last_name: header(map, headers::LAST_NAME)?,
        username: header(map, headers::USERNAME)?,
        email_addresses,
        image_url: header(map, headers::IMAGE_URL)?,
    }))
}

/// The caller's session, possibly anonymous
pub struct CurrentSession(pub Session);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(session_from_headers(&parts.headers)?))
    }
}

/// Extract and validate a UUID from path
pub struct ValidUuid(pub Uuid);

impl<S> FromRequestParts<S> for ValidUuid
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ValidationError::Empty { field: "id" })?;

        let uuid = Uuid::parse_str(&id).map_err(|_| ValidationError::InvalidFormat {
            field: "id",
            reason: "invalid UUID format",
        })?;

        Ok(Self(uuid))
    }
}

/// JSON request body whose rejections use the API error envelope
pub struct JsonBody<T>(pub T);

fn body_rejection(rejection: &JsonRejection) -> ValidationError {
    let reason = match rejection {
        JsonRejection::JsonDataError(_) => "missing or mistyped field",
        JsonRejection::JsonSyntaxError(_) => "malformed JSON",
        JsonRejection::MissingJsonContentType(_) => "expected content-type application/json",
        _ => "unreadable request body",
    };
    ValidationError::InvalidFormat {
        field: "request body",
        reason,
    }
}

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "rejected request body");
                Err(body_rejection(&rejection).into())
            }
        }
    }
}
