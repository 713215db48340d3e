use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use super::validation::ValidationIssue;
use crate::entities::{reminder, task};

#[derive(Debug, Error)]
pub enum ReminderError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Reminder not found")]
    ReminderNotFound,
    #[error("Task not found")]
    TaskNotFound,
    #[error("Invalid reminder data")]
    Validation(Vec<ValidationIssue>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: i64,
    pub task_id: i64,
    #[ts(type = "Date")]
    pub reminder_time: DateTime<Utc>,
    pub sent: bool,
    #[serde(rename = "type")]
    pub channel: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateReminder {
    pub task_id: Option<i64>,
    #[ts(type = "Date | null")]
    pub reminder_time: Option<DateTime<Utc>>,
    pub sent: Option<bool>,
    #[serde(rename = "type")]
    pub channel: Option<String>,
}

impl CreateReminder {
    fn validated(&self) -> Result<(i64, DateTime<Utc>, String), ReminderError> {
        let mut issues = Vec::new();

        let task_id = match self.task_id {
            Some(id) => Some(id),
            None => {
                issues.push(ValidationIssue::new("taskId", "taskId is required"));
                None
            }
        };
        let reminder_time = match self.reminder_time {
            Some(t) => Some(t),
            None => {
                issues.push(ValidationIssue::new(
                    "reminderTime",
                    "reminderTime is required",
                ));
                None
            }
        };
        let channel = match self.channel.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => Some(c.to_string()),
            _ => {
                issues.push(ValidationIssue::new("type", "type is required"));
                None
            }
        };

        match (task_id, reminder_time, channel) {
            (Some(id), Some(t), Some(c)) => Ok((id, t, c)),
            _ => Err(ReminderError::Validation(issues)),
        }
    }
}

impl Reminder {
    fn from_model(model: reminder::Model) -> Self {
        Self {
            id: model.id,
            task_id: model.task_id,
            reminder_time: model.reminder_time.into(),
            sent: model.sent,
            channel: model.channel,
        }
    }

    /// Creates a reminder for an existing task. Orphan reminders are
    /// rejected rather than left dangling.
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreateReminder,
    ) -> Result<Self, ReminderError> {
        let (task_id, reminder_time, channel) = data.validated()?;

        let task_exists = task::Entity::find_by_id(task_id).one(db).await?.is_some();
        if !task_exists {
            return Err(ReminderError::TaskNotFound);
        }

        let active = reminder::ActiveModel {
            task_id: Set(task_id),
            reminder_time: Set(reminder_time.into()),
            sent: Set(data.sent.unwrap_or(false)),
            channel: Set(channel),
            ..Default::default()
        };

        let model = active.insert(db).await?;
        Ok(Self::from_model(model))
    }

    pub async fn find_by_task_id<C: ConnectionTrait>(
        db: &C,
        task_id: i64,
    ) -> Result<Vec<Self>, DbErr> {
        let records = reminder::Entity::find()
            .filter(reminder::Column::TaskId.eq(task_id))
            .order_by_asc(reminder::Column::ReminderTime)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    /// Undelivered reminders across all tasks.
    pub async fn find_pending<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        let records = reminder::Entity::find()
            .filter(reminder::Column::Sent.eq(false))
            .order_by_asc(reminder::Column::ReminderTime)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    /// Delivery hook: flips `sent` once the notification has gone out.
    pub async fn mark_sent<C: ConnectionTrait>(db: &C, id: i64) -> Result<Self, ReminderError> {
        let record = reminder::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ReminderError::ReminderNotFound)?;

        let mut active: reminder::ActiveModel = record.into();
        active.sent = Set(true);
        let updated = active.update(db).await?;
        Ok(Self::from_model(updated))
    }
}
