use serde::Serialize;
use ts_rs::TS;

/// Field-level detail carried by validation failures, surfaced to the
/// client as the `error_data` list of a 400 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}
