use axum::{
    Extension, Json, Router,
    extract::{Multipart, Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{get, post},
};
use chrono::Utc;
use db::models::task::{CreateTask, Task, UpdateTask};
use serde::{Deserialize, Serialize};
use services::services::assistant::{self, ImageAttachment};
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{Deployment, error::ApiError, middleware::load_task_middleware};

pub async fn get_tasks(
    State(deployment): State<Deployment>,
) -> Result<ResponseJson<ApiResponse<Vec<Task>>>, ApiError> {
    let tasks = Task::find_all(&deployment.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(tasks)))
}

pub async fn get_todays_tasks(
    State(deployment): State<Deployment>,
) -> Result<ResponseJson<ApiResponse<Vec<Task>>>, ApiError> {
    let tasks = Task::find_due_today(&deployment.db().pool, Utc::now()).await?;
    Ok(ResponseJson(ApiResponse::success(tasks)))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub async fn search_tasks(
    State(deployment): State<Deployment>,
    Query(query): Query<SearchQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Task>>>, ApiError> {
    let q = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or(ApiError::BadRequest("Search query is required".to_string()))?;

    let tasks = Task::search(&deployment.db().pool, q).await?;
    Ok(ResponseJson(ApiResponse::success(tasks)))
}

pub async fn get_task(
    Extension(task): Extension<Task>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn create_task(
    State(deployment): State<Deployment>,
    Json(payload): Json<CreateTask>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Task>>), ApiError> {
    let task = Task::create(&deployment.db().pool, &payload).await?;
    tracing::debug!(task_id = task.id, "created task '{}'", task.title);
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(task))))
}

pub async fn update_task(
    Extension(existing): Extension<Task>,
    State(deployment): State<Deployment>,
    Json(payload): Json<UpdateTask>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    let task = Task::update(&deployment.db().pool, existing.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn delete_task(
    Extension(task): Extension<Task>,
    State(deployment): State<Deployment>,
) -> Result<StatusCode, ApiError> {
    Task::delete(&deployment.db().pool, task.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize, TS)]
pub struct AiAssistResponse {
    pub response: String,
}

/// Multipart form: `description` and `category` text fields, plus an
/// optional `image` file that is accepted but never inspected.
pub async fn ai_assist(
    mut multipart: Multipart,
) -> Result<ResponseJson<ApiResponse<AiAssistResponse>>, ApiError> {
    let mut description = String::new();
    let mut category = None;
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("description") => description = field.text().await?,
            Some("category") => category = Some(field.text().await?),
            Some("image") => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                image = Some(ImageAttachment {
                    file_name,
                    content_type,
                    size: bytes.len(),
                });
            }
            // `priority` and anything else the client sends along: accepted,
            // unused by the canned responder.
            _ => {}
        }
    }

    let response = assistant::generate_response(&description, category.as_deref(), image.as_ref());
    Ok(ResponseJson(ApiResponse::success(AiAssistResponse {
        response,
    })))
}

pub fn router(deployment: &Deployment) -> Router<Deployment> {
    let task_id_router = Router::new()
        .route(
            "/",
            get(get_task).patch(update_task).delete(delete_task),
        )
        .layer(from_fn_with_state(deployment.clone(), load_task_middleware));

    let inner = Router::new()
        .route("/", get(get_tasks).post(create_task))
        .route("/today", get(get_todays_tasks))
        .route("/search", get(search_tasks))
        .route("/ai-assist", post(ai_assist))
        .nest("/{task_id}", task_id_router);

    Router::new().nest("/tasks", inner)
}
