use axum::{Router, extract::State, response::Json as ResponseJson, routing::get};
use chrono::Utc;
use db::models::task::Task;
use services::services::stats::{self, TaskStats};
use utils::response::ApiResponse;

use crate::{Deployment, error::ApiError};

pub async fn get_stats(
    State(deployment): State<Deployment>,
) -> Result<ResponseJson<ApiResponse<TaskStats>>, ApiError> {
    let tasks = Task::find_all(&deployment.db().pool).await?;
    let stats = stats::aggregate(&tasks, Utc::now());
    Ok(ResponseJson(ApiResponse::success(stats)))
}

pub fn router() -> Router<Deployment> {
    Router::new().route("/stats", get(get_stats))
}
