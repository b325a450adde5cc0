use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::error::ErrorReport;
use crate::domain::error::DomainError;

/// JSON error payload: `{"error": ...}` plus `missing_fields` when fields were absent.
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_fields: Option<Vec<String>>,
}

pub mod codes {
    pub const INVALID_BODY: &str = "invalid_body";
    pub const INVALID_FIELD: &str = "invalid_field";
    pub const MISSING_FIELDS: &str = "missing_fields";
    pub const NOT_FOUND: &str = "not_found";
}

pub const INVALID_SORT_MESSAGE: &str =
    "Invalid sort_by field. Must be 'id', 'title', or 'content'.";
pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields";

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    missing_fields: Option<Vec<String>>,
    detail: String,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            missing_fields: None,
            detail: detail.into(),
        }
    }

    /// 404 for a post id that is absent or not a valid id at all.
    pub fn post_not_found(id: impl std::fmt::Display) -> Self {
        let message = format!("Post with id {id} not found");
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, message.clone(), message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let detail = err.to_string();
        match err {
            DomainError::InvalidField { .. } => Self::new(
                StatusCode::BAD_REQUEST,
                codes::INVALID_FIELD,
                INVALID_SORT_MESSAGE,
                detail,
            ),
            DomainError::MissingFields { fields } => Self {
                missing_fields: Some(fields.iter().map(|field| field.to_string()).collect()),
                ..Self::new(
                    StatusCode::BAD_REQUEST,
                    codes::MISSING_FIELDS,
                    MISSING_FIELDS_MESSAGE,
                    detail,
                )
            },
            DomainError::NotFound { id } => Self::post_not_found(id),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        Self::new(rejection.status(), codes::INVALID_BODY, message.clone(), message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.message,
            missing_fields: self.missing_fields,
        };
        let mut response = (self.status, Json(body)).into_response();
        // Attach a structured report so shared logging middleware can emit rich diagnostics.
        ErrorReport::from_message(
            "infra::http::api",
            self.status,
            format!("{}: {}", self.code, self.detail),
        )
        .attach(&mut response);
        response
    }
}
