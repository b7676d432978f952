//! Worker access-scan payload types
//!
//! A scan records which personal protective equipment was detected on a
//! worker and the resulting access decision. Access is granted only when
//! every required item is present.

use serde::{Deserialize, Serialize};

/// One item of personal protective equipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PpeItem {
    Helmet,
    Gloves,
    Boots,
}

impl PpeItem {
    /// All items required for access, in display order
    pub const REQUIRED: [Self; 3] = [Self::Helmet, Self::Gloves, Self::Boots];

    /// Human-readable name, capitalized for decision reasons
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Helmet => "Helmet",
            Self::Gloves => "Gloves",
            Self::Boots => "Boots",
        }
    }
}

impl std::fmt::Display for PpeItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Detection flags for the required protective equipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PpeStatus {
    pub helmet: bool,
    pub gloves: bool,
    pub boots: bool,
}

impl PpeStatus {
    #[must_use]
    pub fn new(helmet: bool, gloves: bool, boots: bool) -> Self {
        Self {
            helmet,
            gloves,
            boots,
        }
    }

    /// True when every required item was detected
    #[must_use]
    pub fn complete(&self) -> bool {
        self.helmet && self.gloves && self.boots
    }

    /// Items that were not detected, in display order
    #[must_use]
    pub fn missing(&self) -> Vec<PpeItem> {
        PpeItem::REQUIRED
            .into_iter()
            .filter(|item| !self.has(*item))
            .collect()
    }

    fn has(&self, item: PpeItem) -> bool {
        match item {
            PpeItem::Helmet => self.helmet,
            PpeItem::Gloves => self.gloves,
            PpeItem::Boots => self.boots,
        }
    }
}

/// Outcome of an access check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessDecision {
    Granted,
    Denied,
}

impl std::fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Granted => write!(f, "granted"),
            Self::Denied => write!(f, "denied"),
        }
    }
}

/// Full result of one access scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub worker_id: String,
    pub name: String,
    pub ppe_status: PpeStatus,
    pub access: AccessDecision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ScanOutcome {
    /// Evaluate a scan: access is granted only with complete PPE, and a
    /// denial carries the list of missing items as its reason.
    #[must_use]
    pub fn evaluate(worker_id: impl Into<String>, name: impl Into<String>, ppe: PpeStatus) -> Self {
        let (access, reason) = if ppe.complete() {
            (AccessDecision::Granted, None)
        } else {
            let missing = ppe
                .missing()
                .iter()
                .map(|item| item.display_name())
                .collect::<Vec<_>>()
                .join(", ");
            (AccessDecision::Denied, Some(format!("{missing} not detected")))
        };

        Self {
            worker_id: worker_id.into(),
            name: name.into(),
            ppe_status: ppe,
            access,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn complete_ppe_grants_access() {
        let outcome = ScanOutcome::evaluate("W101", "Rajesh Kumar", PpeStatus::new(true, true, true));
        assert_eq!(outcome.access, AccessDecision::Granted);
        assert!(outcome.reason.is_none());
    }

    #[test]
    fn missing_items_listed_in_reason() {
        let outcome = ScanOutcome::evaluate("W102", "Vijay B", PpeStatus::new(true, false, false));
        assert_eq!(outcome.access, AccessDecision::Denied);
        assert_eq!(outcome.reason.as_deref(), Some("Gloves, Boots not detected"));
    }

    #[test]
    fn decision_serializes_lowercase() {
        let json = serde_json::to_string(&AccessDecision::Granted).unwrap();
        assert_eq!(json, r#""granted""#);
    }

    proptest! {
        #[test]
        fn decision_matches_ppe_completeness(helmet: bool, gloves: bool, boots: bool) {
            let ppe = PpeStatus::new(helmet, gloves, boots);
            let outcome = ScanOutcome::evaluate("W000", "Worker", ppe);
            if ppe.complete() {
                prop_assert_eq!(outcome.access, AccessDecision::Granted);
                prop_assert!(outcome.reason.is_none());
            } else {
                prop_assert_eq!(outcome.access, AccessDecision::Denied);
                let reason = outcome.reason.unwrap();
                for item in ppe.missing() {
                    prop_assert!(reason.contains(item.display_name()));
                }
            }
        }
    }
}
