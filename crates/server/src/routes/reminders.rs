use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::reminder::{CreateReminder, Reminder};
use serde::Deserialize;
use utils::response::ApiResponse;

use crate::{Deployment, error::ApiError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderQuery {
    pub task_id: Option<i64>,
}

/// Per-task reminders when `taskId` is given, otherwise all pending ones.
pub async fn get_reminders(
    State(deployment): State<Deployment>,
    Query(query): Query<ReminderQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Reminder>>>, ApiError> {
    let reminders = match query.task_id {
        Some(task_id) => Reminder::find_by_task_id(&deployment.db().pool, task_id).await?,
        None => Reminder::find_pending(&deployment.db().pool).await?,
    };
    Ok(ResponseJson(ApiResponse::success(reminders)))
}

pub async fn create_reminder(
    State(deployment): State<Deployment>,
    Json(payload): Json<CreateReminder>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Reminder>>), ApiError> {
    let reminder = Reminder::create(&deployment.db().pool, &payload).await?;
    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(reminder)),
    ))
}

pub fn router() -> Router<Deployment> {
    Router::new().route("/reminders", get(get_reminders).post(create_reminder))
}
