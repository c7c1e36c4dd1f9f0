//! JSON extractor that reports rejections in the API error format

use axum::{
    extract::{rejection::JsonRejection as AxumRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;

use super::error::{ApiError, ApiErrorType};

/// Wrapper around `axum::Json` whose rejections are JSON error bodies
///
/// Malformed syntax, missing required fields and unparseable values (such as
/// a bad time of day) all become `400` with code `json_parse_error`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

/// Rejected request body
#[derive(Debug)]
pub struct JsonRejection {
    status: StatusCode,
    message: String,
}

impl From<AxumRejection> for JsonRejection {
    fn from(rejection: AxumRejection) -> Self {
        let status = match &rejection {
            AxumRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::BAD_REQUEST,
        };

        Self {
            status,
            message: rejection_message(&rejection),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(
            rejection.status,
            ApiErrorType::InvalidRequestError,
            rejection.message,
        )
        .with_code("json_parse_error")
    }
}

impl IntoResponse for JsonRejection {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let AxumJson(value) = AxumJson::<T>::from_request(req, state).await?;
        Ok(Json(value))
    }
}

fn rejection_message(rejection: &AxumRejection) -> String {
    match rejection {
        AxumRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err.body_text()),
        AxumRejection::JsonSyntaxError(err) => {
            format!("Invalid JSON syntax: {}", err.body_text())
        }
        AxumRejection::MissingJsonContentType(_) => {
            "Missing Content-Type header. Expected 'application/json'.".to_string()
        }
        AxumRejection::BytesRejection(err) => {
            format!("Failed to read request body: {}", err.body_text())
        }
        _ => "Invalid JSON request".to_string(),
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}
