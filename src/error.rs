//! Error types for configuration, simulation and reporting

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the simulator
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration failed validation before any month was simulated
    #[error("invalid configuration: {field} {reason}")]
    InvalidConfiguration {
        field: &'static str,
        reason: String,
    },

    /// Configuration file could not be read
    #[error("failed to read configuration {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration JSON was malformed
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// A report could not be written
    #[error("failed to write report: {0}")]
    Report(#[from] csv::Error),

    /// Report file could not be created
    #[error("failed to create report {path}: {source}")]
    ReportIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SimulationError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SimulationError::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }

    /// True when the error came from configuration validation
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, SimulationError::InvalidConfiguration { .. })
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
