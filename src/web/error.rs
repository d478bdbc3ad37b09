use crate::error::Error;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

pub struct ApiError(Error);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, label) = match &self.0 {
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found"),
            Error::Validation(_) => (StatusCode::BAD_REQUEST, "Bad Request"),
            Error::Database(_) | Error::Pool(_) => {
                tracing::error!("Request failed: {:?}", self.0);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "internal server error".to_string()
        } else {
            self.0.to_string()
        };
        let body = Json(serde_json::json!({
            "error": label,
            "message": message,
        }));
        (status, body).into_response()
    }
}
