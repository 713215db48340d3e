use chrono::{DateTime, Utc};
use db::models::task::{Task, TaskStatus};
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
    pub progress_percent: u32,
}

/// Derives counts from the full task list at call time. No caching, no
/// incremental maintenance.
///
/// The progress denominator is completed + pending only; in_progress and
/// cancelled tasks do not count towards the percentage.
pub fn aggregate(tasks: &[Task], now: DateTime<Utc>) -> TaskStats {
    let completed = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .count();
    let pending = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Pending)
        .count();
    let overdue = tasks
        .iter()
        .filter(|t| {
            t.due_date.is_some_and(|due| due < now) && t.status != TaskStatus::Completed
        })
        .count();

    let total = completed + pending;
    let progress_percent = if total > 0 {
        ((completed as f64 / total as f64) * 100.0).round() as u32
    } else {
        0
    };

    TaskStats {
        completed,
        pending,
        overdue,
        progress_percent,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use db::models::task::{TaskCategory, TaskPriority};

    use super::*;

    fn task(status: TaskStatus, due_date: Option<DateTime<Utc>>) -> Task {
        Task {
            id: 0,
            title: "t".to_string(),
            description: "d".to_string(),
            category: TaskCategory::General,
            priority: TaskPriority::Medium,
            status,
            due_date,
            ai_response: None,
            image_url: None,
            voice_transcript: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    #[test]
    fn progress_rounds_to_the_nearest_percent() {
        let now = Utc::now();
        let tasks = vec![
            task(TaskStatus::Completed, None),
            task(TaskStatus::Completed, None),
            task(TaskStatus::Pending, None),
        ];

        let stats = aggregate(&tasks, now);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.overdue, 0);
        assert_eq!(stats.progress_percent, 67);
    }

    #[test]
    fn empty_list_reports_zero_progress() {
        let stats = aggregate(&[], Utc::now());
        assert_eq!(stats.progress_percent, 0);
        assert_eq!(stats.completed, 0);
        assert_eq!(stats.pending, 0);
        assert_eq!(stats.overdue, 0);
    }

    #[test]
    fn overdue_excludes_completed_tasks() {
        let now = Utc::now();
        let past = Some(now - Duration::hours(1));

        let stats = aggregate(&[task(TaskStatus::Pending, past)], now);
        assert_eq!(stats.overdue, 1);

        let stats = aggregate(&[task(TaskStatus::Completed, past)], now);
        assert_eq!(stats.overdue, 0);

        // an in_progress task past its due date is still overdue
        let stats = aggregate(&[task(TaskStatus::InProgress, past)], now);
        assert_eq!(stats.overdue, 1);
    }

    #[test]
    fn in_progress_and_cancelled_are_excluded_from_progress() {
        let now = Utc::now();
        let tasks = vec![
            task(TaskStatus::Completed, None),
            task(TaskStatus::InProgress, None),
            task(TaskStatus::Cancelled, None),
        ];

        let stats = aggregate(&tasks, now);
        assert_eq!(stats.progress_percent, 100);
    }
}
