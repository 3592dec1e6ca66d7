use serde::{Deserialize, Serialize};

pub const DEFAULT_LANG: &str = "ts";
pub const DEFAULT_EMPTY_VALUE: &str = "ref('')";
pub const DEFAULT_MESSAGE_DURATION_MS: u64 = 1500;

/// Settings a client may pass as `initializationOptions`. Missing fields fall
/// back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScriptConfig {
    /// Value of the `lang` attribute on generated script blocks.
    pub lang: String,
    /// Initializer used for generated value holders.
    pub empty_value: String,
    /// How long clients should keep a status message visible.
    pub message_duration_ms: u64,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            lang: DEFAULT_LANG.to_string(),
            empty_value: DEFAULT_EMPTY_VALUE.to_string(),
            message_duration_ms: DEFAULT_MESSAGE_DURATION_MS,
        }
    }
}

impl ScriptConfig {
    pub fn from_initialization_options(options: Option<serde_json::Value>) -> Self {
        let Some(options) = options else {
            return Self::default();
        };
        match serde_json::from_value(options) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("ignoring invalid initialization options: {err}");
                Self::default()
            }
        }
    }
}
