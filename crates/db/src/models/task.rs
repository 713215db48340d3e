use chrono::{DateTime, Duration, Local, LocalResult, NaiveTime, Utc};
use sea_orm::sea_query::{Expr, ExprTrait, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use super::validation::ValidationIssue;
use crate::entities::task;
pub use crate::types::{TaskCategory, TaskPriority, TaskStatus};

/// Title derived from a description is clipped to this many characters.
const TITLE_MAX_CHARS: usize = 50;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Task not found")]
    TaskNotFound,
    #[error("Invalid task data")]
    Validation(Vec<ValidationIssue>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: TaskCategory,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    #[ts(type = "Date | null")]
    pub due_date: Option<DateTime<Utc>>,
    pub ai_response: Option<String>,
    pub image_url: Option<String>,
    pub voice_transcript: Option<String>,
    #[ts(type = "Date")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "Date | null")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<TaskCategory>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    #[ts(type = "Date | null")]
    pub due_date: Option<DateTime<Utc>>,
    pub ai_response: Option<String>,
    pub image_url: Option<String>,
    pub voice_transcript: Option<String>,
}

impl CreateTask {
    pub fn from_description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            category: Some(TaskCategory::General),
            priority: Some(TaskPriority::Medium),
            ..Default::default()
        }
    }

    fn validated(&self) -> Result<(String, TaskCategory, TaskPriority), TaskError> {
        let mut issues = Vec::new();

        let description = match self.description.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => Some(d.to_string()),
            _ => {
                issues.push(ValidationIssue::new("description", "description is required"));
                None
            }
        };
        let category = match self.category.clone() {
            Some(c) => Some(c),
            None => {
                issues.push(ValidationIssue::new("category", "category is required"));
                None
            }
        };
        let priority = match self.priority.clone() {
            Some(p) => Some(p),
            None => {
                issues.push(ValidationIssue::new("priority", "priority is required"));
                None
            }
        };

        match (description, category, priority) {
            (Some(d), Some(c), Some(p)) => Ok((d, c, p)),
            _ => Err(TaskError::Validation(issues)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<TaskCategory>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    #[ts(type = "Date | null")]
    pub due_date: Option<DateTime<Utc>>,
    pub ai_response: Option<String>,
    pub image_url: Option<String>,
    pub voice_transcript: Option<String>,
}

/// Escapes `%`, `_` and the escape character itself so a search query is
/// matched literally inside a LIKE pattern.
fn escape_like(query: &str) -> String {
    query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// First sentence of the description, clipped to [`TITLE_MAX_CHARS`].
fn derive_title(description: &str) -> String {
    let first_sentence = description.split('.').next().unwrap_or(description).trim();
    if first_sentence.chars().count() > TITLE_MAX_CHARS {
        let clipped: String = first_sentence.chars().take(TITLE_MAX_CHARS).collect();
        format!("{clipped}...")
    } else {
        first_sentence.to_string()
    }
}

impl Task {
    fn from_model(model: task::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            category: model.category,
            priority: model.priority,
            status: model.status,
            due_date: model.due_date.map(Into::into),
            ai_response: model.ai_response,
            image_url: model.image_url,
            voice_transcript: model.voice_transcript,
            created_at: model.created_at.into(),
            completed_at: model.completed_at.map(Into::into),
        }
    }

    pub async fn create<C: ConnectionTrait>(db: &C, data: &CreateTask) -> Result<Self, TaskError> {
        let (description, category, priority) = data.validated()?;
        let title = match data.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => derive_title(&description),
        };
        let status = data.status.clone().unwrap_or_default();
        let now = Utc::now();
        // Tasks created in a terminal state still satisfy the
        // completed_at-iff-completed invariant.
        let completed_at = (status == TaskStatus::Completed).then_some(now);

        let active = task::ActiveModel {
            title: Set(title),
            description: Set(description),
            category: Set(category),
            priority: Set(priority),
            status: Set(status),
            due_date: Set(data.due_date.map(Into::into)),
            ai_response: Set(data.ai_response.clone()),
            image_url: Set(data.image_url.clone()),
            voice_transcript: Set(data.voice_transcript.clone()),
            created_at: Set(now.into()),
            completed_at: Set(completed_at.map(Into::into)),
            ..Default::default()
        };

        let model = active.insert(db).await?;
        Ok(Self::from_model(model))
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Self>, DbErr> {
        let record = task::Entity::find_by_id(id).one(db).await?;
        Ok(record.map(Self::from_model))
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        let records = task::Entity::find()
            .order_by_desc(task::Column::CreatedAt)
            .order_by_desc(task::Column::Id)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    /// Tasks due within the server-local calendar day containing `now`.
    pub async fn find_due_today<C: ConnectionTrait>(
        db: &C,
        now: DateTime<Utc>,
    ) -> Result<Vec<Self>, DbErr> {
        let midnight = now.with_timezone(&Local).date_naive().and_time(NaiveTime::MIN);
        let day_start = match midnight.and_local_timezone(Local) {
            LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => t.with_timezone(&Utc),
            // Midnight skipped by a DST transition.
            LocalResult::None => now,
        };
        let day_end = day_start + Duration::days(1);

        let records = task::Entity::find()
            .filter(task::Column::DueDate.gte(day_start))
            .filter(task::Column::DueDate.lt(day_end))
            .order_by_asc(task::Column::DueDate)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    /// Case-insensitive substring match over title and description.
    pub async fn search<C: ConnectionTrait>(db: &C, query: &str) -> Result<Vec<Self>, DbErr> {
        let pattern = LikeExpr::new(format!("%{}%", escape_like(&query.to_lowercase())))
            .escape('\\');
        let matches = Condition::any()
            .add(
                Expr::expr(Func::lower(Expr::col((task::Entity, task::Column::Title))))
                    .like(pattern.clone()),
            )
            .add(
                Expr::expr(Func::lower(Expr::col((
                    task::Entity,
                    task::Column::Description,
                ))))
                .like(pattern),
            );

        let records = task::Entity::find()
            .filter(matches)
            .order_by_desc(task::Column::CreatedAt)
            .order_by_desc(task::Column::Id)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: i64,
        data: &UpdateTask,
    ) -> Result<Self, TaskError> {
        let record = task::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(TaskError::TaskNotFound)?;
        let previous_status = record.status.clone();
        let previous_completed_at = record.completed_at;

        let mut active: task::ActiveModel = record.into();
        if let Some(title) = &data.title {
            active.title = Set(title.clone());
        }
        if let Some(description) = &data.description {
            active.description = Set(description.clone());
        }
        if let Some(category) = &data.category {
            active.category = Set(category.clone());
        }
        if let Some(priority) = &data.priority {
            active.priority = Set(priority.clone());
        }
        if let Some(due_date) = data.due_date {
            active.due_date = Set(Some(due_date.into()));
        }
        if let Some(ai_response) = &data.ai_response {
            active.ai_response = Set(Some(ai_response.clone()));
        }
        if let Some(image_url) = &data.image_url {
            active.image_url = Set(Some(image_url.clone()));
        }
        if let Some(voice_transcript) = &data.voice_transcript {
            active.voice_transcript = Set(Some(voice_transcript.clone()));
        }
        if let Some(status) = &data.status {
            active.status = Set(status.clone());
            // completed_at is set exactly when the task is completed.
            active.completed_at = match status {
                TaskStatus::Completed if previous_status != TaskStatus::Completed => {
                    Set(Some(Utc::now().into()))
                }
                TaskStatus::Completed => Set(previous_completed_at),
                _ => Set(None),
            };
        }

        let updated = active.update(db).await?;
        Ok(Self::from_model(updated))
    }

    /// Returns whether a record existed.
    pub async fn delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<bool, DbErr> {
        let result = task::Entity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use super::*;

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    #[tokio::test]
    async fn create_assigns_unique_ids_and_monotonic_timestamps() {
        let db = setup_db().await;

        let first = Task::create(&db, &CreateTask::from_description("Fix the sink"))
            .await
            .unwrap();
        let second = Task::create(&db, &CreateTask::from_description("Paint the fence"))
            .await
            .unwrap();

        assert_ne!(first.id, second.id);
        assert!(second.created_at >= first.created_at);
        assert_eq!(first.status, TaskStatus::Pending);
        assert!(first.completed_at.is_none());
    }

    #[tokio::test]
    async fn create_derives_title_from_first_sentence() {
        let db = setup_db().await;

        let task = Task::create(
            &db,
            &CreateTask::from_description("My kitchen faucet is leaking. It drips all night."),
        )
        .await
        .unwrap();
        assert_eq!(task.title, "My kitchen faucet is leaking");

        let long = "a".repeat(80);
        let task = Task::create(&db, &CreateTask::from_description(long.clone()))
            .await
            .unwrap();
        assert_eq!(task.title, format!("{}...", "a".repeat(50)));

        let task = Task::create(
            &db,
            &CreateTask {
                title: Some("Explicit title".to_string()),
                ..CreateTask::from_description("Some description. More text.")
            },
        )
        .await
        .unwrap();
        assert_eq!(task.title, "Explicit title");
    }

    #[tokio::test]
    async fn create_rejects_missing_required_fields() {
        let db = setup_db().await;

        let err = Task::create(&db, &CreateTask::default()).await.unwrap_err();
        match err {
            TaskError::Validation(issues) => {
                let fields: Vec<_> = issues.iter().map(|i| i.field).collect();
                assert!(fields.contains(&"description"));
                assert!(fields.contains(&"category"));
                assert!(fields.contains(&"priority"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn created_task_roundtrips_through_find_by_id() {
        let db = setup_db().await;

        let created = Task::create(&db, &CreateTask::from_description("Fix the sink"))
            .await
            .unwrap();
        let fetched = Task::find_by_id(&db, created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let db = setup_db().await;

        let created = Task::create(&db, &CreateTask::from_description("Fix the sink"))
            .await
            .unwrap();
        assert!(Task::delete(&db, created.id).await.unwrap());
        assert!(Task::find_by_id(&db, created.id).await.unwrap().is_none());
        assert!(!Task::delete(&db, created.id).await.unwrap());
    }

    #[tokio::test]
    async fn search_matches_substrings_case_insensitively() {
        let db = setup_db().await;

        Task::create(
            &db,
            &CreateTask::from_description("My kitchen faucet is leaking"),
        )
        .await
        .unwrap();
        Task::create(&db, &CreateTask::from_description("Paint the fence"))
            .await
            .unwrap();

        let hits = Task::search(&db, "FAUCET").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].description, "My kitchen faucet is leaking");

        let hits = Task::search(&db, "faucet").await.unwrap();
        assert_eq!(hits.len(), 1);

        assert!(Task::search(&db, "chimney").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_treats_like_wildcards_as_literal_characters() {
        let db = setup_db().await;

        Task::create(&db, &CreateTask::from_description("Fix the sink"))
            .await
            .unwrap();
        Task::create(&db, &CreateTask::from_description("Repaint 100% of the wall"))
            .await
            .unwrap();
        Task::create(&db, &CreateTask::from_description("Label the junction_box"))
            .await
            .unwrap();

        let hits = Task::search(&db, "%").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].description, "Repaint 100% of the wall");

        let hits = Task::search(&db, "100%").await.unwrap();
        assert_eq!(hits.len(), 1);

        let hits = Task::search(&db, "_").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].description, "Label the junction_box");

        assert!(Task::search(&db, "\\").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_due_today_uses_the_local_calendar_day() {
        let db = setup_db().await;
        let now = Utc::now();

        let due_now = Task::create(
            &db,
            &CreateTask {
                due_date: Some(now),
                ..CreateTask::from_description("Water the garden")
            },
        )
        .await
        .unwrap();
        Task::create(
            &db,
            &CreateTask {
                due_date: Some(now + Duration::days(2)),
                ..CreateTask::from_description("Clean the gutters")
            },
        )
        .await
        .unwrap();
        Task::create(&db, &CreateTask::from_description("No due date"))
            .await
            .unwrap();

        let today = Task::find_due_today(&db, now).await.unwrap();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].id, due_now.id);
    }

    #[tokio::test]
    async fn update_merges_fields_and_maintains_completed_at() {
        let db = setup_db().await;

        let created = Task::create(&db, &CreateTask::from_description("Fix the sink"))
            .await
            .unwrap();

        let updated = Task::update(
            &db,
            created.id,
            &UpdateTask {
                status: Some(TaskStatus::Completed),
                ai_response: Some("Turn off the water supply first.".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.status, TaskStatus::Completed);
        assert!(updated.completed_at.is_some());
        assert_eq!(
            updated.ai_response.as_deref(),
            Some("Turn off the water supply first.")
        );
        // untouched fields survive the merge
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.created_at, created.created_at);

        let reverted = Task::update(
            &db,
            created.id,
            &UpdateTask {
                status: Some(TaskStatus::Pending),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(reverted.completed_at.is_none());
    }

    #[tokio::test]
    async fn update_unknown_id_reports_not_found() {
        let db = setup_db().await;

        let err = Task::update(&db, 4242, &UpdateTask::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::TaskNotFound));
    }
}
