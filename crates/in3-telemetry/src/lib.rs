//! # In3 Telemetry
//!
//! Logging bootstrap for processes embedding the Incubed client.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use in3_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_logging(&config).expect("Failed to init logging");
//!
//!     // Client calls are now logged
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `in3-client` | Service name attached to the startup event |
//! | `IN3_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `IN3_CONSOLE_OUTPUT` | `true` | Write events to stdout |
//! | `IN3_JSON_LOGS` | `false` (`true` in containers) | JSON instead of pretty output |

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{init_logging, LoggingGuard};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The level filter could not be parsed.
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// A global subscriber was already installed.
    #[error("Failed to install log subscriber: {0}")]
    SubscriberInit(String),
}
