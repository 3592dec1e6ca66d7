use thiserror::Error;

use crate::config::ScriptConfig;
use crate::notification::{StatusLevel, StatusParams};

pub type Result<T> = std::result::Result<T, CommandError>;

/// Reasons the generate command stops without editing the document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Use this command inside a .vue file")]
    NotVueFile,
    #[error("Only Vue 3 <script setup> or composition API components are supported")]
    NotVue3,
    #[error("No variable or event found in the selection")]
    NothingFound,
    #[error("Document {uri} is not open")]
    DocumentNotOpen { uri: String },
    #[error("Invalid command arguments: {reason}")]
    InvalidArguments { reason: String },
}

impl CommandError {
    pub fn level(&self) -> StatusLevel {
        match self {
            CommandError::NotVueFile | CommandError::NothingFound => StatusLevel::Info,
            CommandError::NotVue3
            | CommandError::DocumentNotOpen { .. }
            | CommandError::InvalidArguments { .. } => StatusLevel::Error,
        }
    }

    pub fn to_status(&self, config: &ScriptConfig) -> StatusParams {
        StatusParams {
            level: self.level(),
            message: self.to_string(),
            duration_ms: config.message_duration_ms,
        }
    }
}
