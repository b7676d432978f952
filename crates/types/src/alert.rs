//! Safety-alert payload types
//!
//! Alerts follow a small triage lifecycle: raised as `active`, then
//! `acknowledged`, then `resolved`. Serde names match the wire strings the
//! dashboard already uses, including the spaced alert-kind labels.

use serde::{Deserialize, Serialize};

/// Category of safety violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum AlertKind {
    #[serde(rename = "No Helmet")]
    NoHelmet,
    #[serde(rename = "No Gloves")]
    NoGloves,
    #[serde(rename = "No Boots")]
    NoBoots,
    #[serde(rename = "Fire")]
    Fire,
    #[serde(rename = "Fall")]
    Fall,
    #[serde(rename = "Restricted Area")]
    RestrictedArea,
    #[serde(rename = "Equipment Misuse")]
    EquipmentMisuse,
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::NoHelmet => "No Helmet",
            Self::NoGloves => "No Gloves",
            Self::NoBoots => "No Boots",
            Self::Fire => "Fire",
            Self::Fall => "Fall",
            Self::RestrictedArea => "Restricted Area",
            Self::EquipmentMisuse => "Equipment Misuse",
        };
        write!(f, "{label}")
    }
}

/// Alert severity, ordered from least to most urgent
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Triage state of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Acknowledged,
    Resolved,
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Acknowledged => write!(f, "acknowledged"),
            Self::Resolved => write!(f, "resolved"),
        }
    }
}

/// One safety-alert record payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyAlert {
    pub zone: String,
    pub worker_id: String,
    pub worker_name: String,
    pub alert_type: AlertKind,
    pub severity: Severity,
    pub status: AlertStatus,
    /// Detection confidence as a percentage, 0-100
    pub confidence: u8,
}

impl SafetyAlert {
    /// Mark the alert acknowledged. Resolved alerts stay resolved.
    pub fn acknowledge(&mut self) {
        if self.status == AlertStatus::Active {
            self.status = AlertStatus::Acknowledged;
        }
    }

    /// Mark the alert resolved from any state.
    pub fn resolve(&mut self) {
        self.status = AlertStatus::Resolved;
    }
}
