//! # BillingMonitor
//!
//! Declares an AWS billing monitor and synthesizes it to CloudFormation.
//!
//! The stack wires a monthly budget, one estimated-charges alarm per watched
//! service, an SNS topic and an AWS Chatbot Slack binding together. Nothing is
//! deployed from here; the synthesized cloud assembly is handed to the
//! deployment tool.
//!
//! ## Architecture
//!
//! - **Models**: typed resource records and references between them
//! - **Stack**: the declaration graph, built once and then immutable
//! - **Synth**: CloudFormation rendering and cloud assembly output
//!
//! ## Quick Start
//!
//! ```bash
//! export SLACK_WORKSPACE_ID=T0123456
//! export SLACK_CHANNEL_ID=C0123456
//! billing-monitor synth
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod stack;
pub mod synth;

pub use crate::config::Settings;
pub use crate::error::{Error, Result};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::config::Settings;
    pub use crate::error::{Error, Result};
    pub use crate::models::*;
    pub use crate::services::BilledService;
    pub use crate::stack::{Stack, StackBuilder, StackDefinition};
    pub use crate::synth::{CloudAssembly, CloudFormationSynthesizer, Synthesizer, Template};
}
