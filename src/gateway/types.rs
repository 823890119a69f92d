//! Type definitions for gateway actions

use serde::Deserialize;
use serde_json::Value;

/// Destination of an outbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageTarget {
    Group(i64),
    Private(i64),
}

/// Gateway acknowledgment for an action call.
///
/// The gateway answers every action with `{"status": "ok"|"failed",
/// "retcode": n, "data": ...}`; some failure paths carry a bare `error`
/// string instead of a retcode.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionAck {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub retcode: i64,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub error: Option<String>,
}

impl ActionAck {
    pub fn is_ok(&self) -> bool {
        self.status != "failed"
    }

    /// Failure description, preferring the explicit error string
    pub fn failure_message(&self) -> String {
        match &self.error {
            Some(error) => error.clone(),
            None => format!("retcode {}", self.retcode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ack_parsing() {
        let ack: ActionAck =
            serde_json::from_value(json!({"status": "ok", "retcode": 0, "data": {"message_id": 7}}))
                .unwrap();
        assert!(ack.is_ok());
        assert_eq!(ack.data["message_id"], 7);
    }

    #[test]
    fn test_failed_ack_with_error_string() {
        let ack: ActionAck =
            serde_json::from_value(json!({"status": "failed", "error": "permission denied"}))
                .unwrap();
        assert!(!ack.is_ok());
        assert_eq!(ack.failure_message(), "permission denied");
    }

    #[test]
    fn test_failed_ack_without_error_string() {
        let ack: ActionAck =
            serde_json::from_value(json!({"status": "failed", "retcode": 100})).unwrap();
        assert!(!ack.is_ok());
        assert_eq!(ack.failure_message(), "retcode 100");
    }
}
