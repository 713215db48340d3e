pub mod email;
pub mod health;
pub mod reminders;
pub mod stats;
pub mod tasks;
