use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::{auth::errors::AuthError, errors::ServiceError};
use tracing::error;

/// Uniform JSON error payload: `{"error": "<title>", "detail": "<detail>"}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: String,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: Option<String>) -> Self {
        Self { status, title: title.into(), detail }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = match self.detail {
            Some(detail) => serde_json::json!({ "error": self.title, "detail": detail }),
            None => serde_json::json!({ "error": self.title }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let detail = Some(e.to_string());
        match e {
            ServiceError::Validation(_) => JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", detail),
            ServiceError::MalformedInput(_) => JsonApiError::new(StatusCode::BAD_REQUEST, "Malformed Input", detail),
            ServiceError::NotFound(_) => JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", detail),
            ServiceError::Unauthorized(_) => JsonApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized", detail),
            ServiceError::Forbidden(_) => JsonApiError::new(StatusCode::FORBIDDEN, "Forbidden", detail),
            ServiceError::Db(_) => {
                error!(err = %e, "store call failed");
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", None)
            }
        }
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        let detail = Some(e.to_string());
        match e {
            AuthError::MissingToken => JsonApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized", detail),
            AuthError::Rejected(_) => JsonApiError::new(StatusCode::FORBIDDEN, "Forbidden", detail),
            AuthError::Validation(_) => JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", detail),
            AuthError::TokenError(_) => {
                error!(err = %e, code = e.code(), "token signing failed");
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", None)
            }
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        JsonApiError::new(StatusCode::BAD_REQUEST, "Invalid Body", Some(rejection.body_text()))
    }
}

/// `Json` extractor whose rejection is rendered as a [`JsonApiError`].
#[derive(Debug, axum::extract::FromRequest)]
#[from_request(via(axum::Json), rejection(JsonApiError))]
pub struct JsonBody<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: JsonApiError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn service_errors_map_to_statuses() {
        let (status, body) = render(ServiceError::MalformedInput("bad id".into()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Malformed Input");

        let (status, _) = render(ServiceError::not_found("service").into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = render(ServiceError::Db("connection reset".into()).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.get("detail").is_none(), "store details stay in the logs");
    }

    #[tokio::test]
    async fn auth_errors_distinguish_missing_from_rejected() {
        let (status, _) = render(AuthError::MissingToken.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, body) = render(AuthError::Rejected("token expired".into()).into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["detail"], "credential rejected: token expired");
    }
}
