use axum::extract::{rejection::JsonRejection, FromRequest, Request};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use libris_types::{
    parse_create, parse_update, BookPayload, BookRecord, BookUpdate, ValidationError,
};
use serde::de::DeserializeOwned;
use std::error::Error;
use std::fmt::Display;
use tracing::debug;

/// Typed value that is built from a raw JSON body by a validating parser.
pub trait ParsePayload: Sized {
    type Payload: DeserializeOwned + Send;

    fn parse(payload: Self::Payload) -> Result<Self, ValidationError>;
}

impl ParsePayload for BookRecord {
    type Payload = BookPayload;

    fn parse(payload: Self::Payload) -> Result<Self, ValidationError> {
        parse_create(payload)
    }
}

impl ParsePayload for BookUpdate {
    type Payload = BookPayload;

    fn parse(payload: Self::Payload) -> Result<Self, ValidationError> {
        parse_update(payload)
    }
}

/// Extractor reading a JSON body and parsing it into `T`.
///
/// Handlers taking it never see invalid input.
#[derive(Debug, Clone)]
pub struct Parsed<T>(pub T);

#[derive(Debug)]
pub enum ValidationRejection<V, E> {
    /// Body was well formed, but the parser rejected it
    Valid(V),
    /// Inner JSON extractor failed
    Inner(E),
}

impl<V: Display, E: Display> Display for ValidationRejection<V, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationRejection::Valid(errors) => write!(f, "{errors}"),
            ValidationRejection::Inner(error) => write!(f, "{error}"),
        }
    }
}

impl<V: Error + 'static, E: Error + 'static> Error for ValidationRejection<V, E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ValidationRejection::Valid(ve) => Some(ve),
            ValidationRejection::Inner(e) => Some(e),
        }
    }
}

impl<V: serde::Serialize, E: IntoResponse> IntoResponse for ValidationRejection<V, E> {
    fn into_response(self) -> Response {
        match self {
            ValidationRejection::Valid(v) => {
                (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(v)).into_response()
            }
            ValidationRejection::Inner(e) => e.into_response(),
        }
    }
}

pub type ParseRejection = ValidationRejection<ValidationError, JsonRejection>;

impl<S, T> FromRequest<S> for Parsed<T>
where
    S: Send + Sync,
    T: ParsePayload + Send,
{
    type Rejection = ParseRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T::Payload>::from_request(req, state)
            .await
            .map_err(|e| {
                debug!("Rejected request body: {e}");
                ValidationRejection::Inner(e)
            })?;

        T::parse(payload).map(Parsed).map_err(|e| {
            debug!("Invalid request body: {e}");
            ValidationRejection::Valid(e)
        })
    }
}
