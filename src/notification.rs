use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::notification::Notification;
use tower_lsp::lsp_types::MessageType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Info,
    Error,
}

impl From<StatusLevel> for MessageType {
    fn from(level: StatusLevel) -> Self {
        match level {
            StatusLevel::Info => MessageType::INFO,
            StatusLevel::Error => MessageType::ERROR,
        }
    }
}

/// A short-lived message the client shows and dismisses after `duration_ms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusParams {
    pub level: StatusLevel,
    pub message: String,
    pub duration_ms: u64,
}

impl StatusParams {
    pub fn info(message: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            level: StatusLevel::Info,
            message: message.into(),
            duration_ms,
        }
    }

    pub fn error(message: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            level: StatusLevel::Error,
            message: message.into(),
            duration_ms,
        }
    }
}

pub enum StatusNotification {}

impl Notification for StatusNotification {
    type Params = StatusParams;
    const METHOD: &'static str = "vueFastScript/status";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_wire_format() {
        let value = serde_json::to_value(StatusParams::info("Script updated", 1500)).unwrap();
        assert_eq!(
            value,
            json!({ "level": "info", "message": "Script updated", "durationMs": 1500 })
        );
    }
}
