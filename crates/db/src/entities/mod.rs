pub mod reminder;
pub mod task;
