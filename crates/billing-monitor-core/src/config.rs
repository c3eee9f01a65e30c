//! Configuration management for BillingMonitor
//!
//! Settings are layered: built-in defaults, an optional TOML file,
//! `BILLING_MONITOR__SECTION__KEY` environment variables and finally the bare
//! `SLACK_WORKSPACE_ID` / `SLACK_CHANNEL_ID` variables.

use std::collections::HashMap;
use std::path::Path;

use ::config::{Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::stack::validate_stack_name;

/// Environment variable holding the Slack workspace id
pub const WORKSPACE_ID_VAR: &str = "SLACK_WORKSPACE_ID";

/// Environment variable holding the Slack channel id
pub const CHANNEL_ID_VAR: &str = "SLACK_CHANNEL_ID";

const ENV_PREFIX: &str = "BILLING_MONITOR";

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Stack configuration
    pub stack: StackSettings,

    /// Chat integration configuration
    pub chat: ChatSettings,

    /// Synthesis output configuration
    pub output: OutputSettings,

    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Stack configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackSettings {
    /// Name of the deployable unit
    pub name: String,
    /// Template description
    pub description: Option<String>,
    /// Region the stack is pinned to, if any
    pub region: Option<String>,
}

impl Default for StackSettings {
    fn default() -> Self {
        Self {
            name: "BillingMonitor".to_string(),
            description: None,
            region: None,
        }
    }
}

/// Chat integration configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Name of the chatbot channel configuration
    pub configuration_name: String,
    /// Slack workspace id
    pub workspace_id: Option<String>,
    /// Slack channel id
    pub channel_id: Option<String>,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            configuration_name: "BillingMonitor".to_string(),
            workspace_id: None,
            channel_id: None,
        }
    }
}

/// Resolved chat destination, both ids present and non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTarget {
    /// Name of the chatbot channel configuration
    pub configuration_name: String,
    /// Slack workspace id
    pub workspace_id: String,
    /// Slack channel id
    pub channel_id: String,
}

impl ChatSettings {
    /// Resolve the chat destination, failing on the first missing id
    pub fn require(&self) -> Result<ChatTarget> {
        let workspace_id = non_empty(self.workspace_id.as_deref())
            .ok_or_else(|| Error::missing(WORKSPACE_ID_VAR))?;
        let channel_id =
            non_empty(self.channel_id.as_deref()).ok_or_else(|| Error::missing(CHANNEL_ID_VAR))?;

        Ok(ChatTarget {
            configuration_name: self.configuration_name.clone(),
            workspace_id,
            channel_id,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

/// Synthesis output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Cloud assembly directory
    pub dir: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: "cdk.out".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level
    pub level: String,
    /// Log format (json or pretty)
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Load `.env` from the working directory into the process environment.
///
/// A missing file is fine; variables already set are not overridden.
pub fn load_dotenv() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(Error::config(format!("failed to read .env: {err}"))),
    }
}

impl Settings {
    /// Load settings from an optional file and the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(path, std::env::vars().collect())
    }

    /// Load settings from an optional file and an explicit set of variables
    pub fn load_from(path: Option<&Path>, vars: HashMap<String, String>) -> Result<Self> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        let workspace_id = vars.get(WORKSPACE_ID_VAR).cloned();
        let channel_id = vars.get(CHANNEL_ID_VAR).cloned();

        builder = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .source(Some(vars)),
            )
            .set_override_option("chat.workspace_id", workspace_id)?
            .set_override_option("chat.channel_id", channel_id)?;

        let settings: Self = builder.build()?.try_deserialize()?;
        validate_stack_name(&settings.stack.name)?;
        Ok(settings)
    }
}
