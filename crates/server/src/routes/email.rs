use axum::{Json, Router, response::Json as ResponseJson, routing::post};
use serde::{Deserialize, Serialize};
use services::services::email;
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{Deployment, error::ApiError};

#[derive(Debug, Deserialize, TS)]
pub struct SendEmailRequest {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailResponse {
    pub message_id: String,
}

pub async fn send_email(
    Json(payload): Json<SendEmailRequest>,
) -> Result<ResponseJson<ApiResponse<SendEmailResponse>>, ApiError> {
    let message_id = email::send(&payload.to, &payload.subject, &payload.body);
    Ok(ResponseJson(ApiResponse::success(SendEmailResponse {
        message_id,
    })))
}

pub fn router() -> Router<Deployment> {
    Router::new().route("/send-email", post(send_email))
}
