use axum::{
    extract::{Path, Request, State, rejection::PathRejection},
    middleware::Next,
    response::Response,
};
use db::models::task::{Task, TaskError};

use crate::{Deployment, error::ApiError};

/// Resolves the `{task_id}` path segment and injects the task as a request
/// extension, so handlers below it can take `Extension<Task>` and the 404
/// mapping lives in one place. A non-numeric id is a 400 in the shared
/// envelope rather than the extractor's plain-text rejection.
pub async fn load_task_middleware(
    State(deployment): State<Deployment>,
    task_id: Result<Path<i64>, PathRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Path(task_id) =
        task_id.map_err(|_| ApiError::BadRequest("Invalid task id".to_string()))?;
    let task = Task::find_by_id(&deployment.db().pool, task_id)
        .await?
        .ok_or(TaskError::TaskNotFound)?;
    request.extensions_mut().insert(task);
    Ok(next.run(request).await)
}
