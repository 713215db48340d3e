//! Simulated email dispatch. Logs the send and fabricates a message id;
//! a real mail provider integration would replace this module wholesale.

use chrono::Utc;

pub fn send(to: &str, subject: &str, body: &str) -> String {
    tracing::info!(to, subject, body_len = body.len(), "simulated email dispatch");
    format!("msg-{}", Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_returns_a_message_id() {
        let id = send("user@example.com", "Task reminder", "Your sink awaits.");
        assert!(id.starts_with("msg-"));
        assert!(id["msg-".len()..].parse::<i64>().is_ok());
    }
}
