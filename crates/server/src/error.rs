use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::{
    DbErr,
    models::{reminder::ReminderError, task::TaskError, validation::ValidationIssue},
};
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error(transparent)]
    Reminder(#[from] ReminderError),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_type) = match &self {
            ApiError::Task(err) => match err {
                TaskError::TaskNotFound => (StatusCode::NOT_FOUND, "TaskError"),
                TaskError::Validation(_) => (StatusCode::BAD_REQUEST, "TaskError"),
                TaskError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "TaskError"),
            },
            ApiError::Reminder(err) => match err {
                ReminderError::ReminderNotFound => (StatusCode::NOT_FOUND, "ReminderError"),
                // a reminder pointing at a missing task is a caller mistake
                ReminderError::TaskNotFound => (StatusCode::BAD_REQUEST, "ReminderError"),
                ReminderError::Validation(_) => (StatusCode::BAD_REQUEST, "ReminderError"),
                ReminderError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ReminderError"),
            },
            ApiError::Database(db_err) => match db_err {
                DbErr::RecordNotFound(_) => (StatusCode::NOT_FOUND, "DatabaseError"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "DatabaseError"),
            },
            ApiError::Multipart(_) => (StatusCode::BAD_REQUEST, "MultipartError"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "InternalError"),
        };

        if status_code.is_server_error() {
            tracing::error!(
                status = %status_code,
                error_type,
                error = %self,
                "API request failed"
            );
        }

        // 5xx detail stays in the server log.
        let response: ApiResponse<(), Vec<ValidationIssue>> = if status_code.is_server_error() {
            ApiResponse::error("Internal server error")
        } else {
            match self {
                ApiError::Task(TaskError::Validation(issues)) => {
                    ApiResponse::error_with_data("Invalid task data", issues)
                }
                ApiError::Reminder(ReminderError::Validation(issues)) => {
                    ApiResponse::error_with_data("Invalid reminder data", issues)
                }
                ApiError::Multipart(_) => ApiResponse::error(
                    "Failed to upload file. Please ensure the file is valid and try again.",
                ),
                ApiError::NotFound(msg) | ApiError::BadRequest(msg) => ApiResponse::error(&msg),
                other => ApiResponse::error(&other.to_string()),
            }
        };

        (status_code, Json(response)).into_response()
    }
}

impl From<&'static str> for ApiError {
    fn from(msg: &'static str) -> Self {
        ApiError::BadRequest(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_maps_to_expected_http_statuses() {
        assert_eq!(
            ApiError::BadRequest("bad".to_string())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("missing".to_string())
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal("boom".to_string())
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn domain_errors_map_to_expected_http_statuses() {
        assert_eq!(
            ApiError::from(TaskError::TaskNotFound)
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(TaskError::Validation(vec![ValidationIssue::new(
                "description",
                "description is required"
            )]))
            .into_response()
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ReminderError::TaskNotFound)
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(DbErr::RecordNotFound("task".to_string()))
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
    }
}
