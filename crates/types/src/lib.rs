#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for the Sentinel Shopfloor event journal
//!
//! This crate provides the payload shapes carried by the journal: worker
//! access-scan outcomes and safety alerts, plus small shared CLI enums.

pub mod alert;
pub mod scan;

// Re-export commonly used types
pub use alert::{AlertKind, AlertStatus, SafetyAlert, Severity};
pub use scan::{AccessDecision, PpeItem, PpeStatus, ScanOutcome};

use serde::{Deserialize, Serialize};

/// Color output preference for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Detect terminal capabilities
    Auto,
    /// Force colored output
    Always,
    /// Disable colored output
    Never,
}

impl Default for ColorChoice {
    fn default() -> Self {
        Self::Auto
    }
}

impl std::fmt::Display for ColorChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Always => write!(f, "always"),
            Self::Never => write!(f, "never"),
        }
    }
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            other => Err(format!("unknown color choice: {other}")),
        }
    }
}
