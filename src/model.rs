//! The classification capabilities a user can test an image against.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which remote classification capability a run targets.
///
/// The tag is fixed for the duration of a run; the flow takes it by value.
/// Whether a capability is actually callable depends on the endpoint mapping
/// in [`crate::config::ClassifierConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelChoice {
    /// Wall surface crack detection.
    StructuralAnalysis,
    /// Worker safety-helmet compliance.
    SafetyCompliance,
    /// Dust and micro-crack detection on solar panels.
    SolarPanelAnalysis,
}

impl ModelChoice {
    /// Every known capability, in display order.
    pub const ALL: [ModelChoice; 3] = [
        ModelChoice::StructuralAnalysis,
        ModelChoice::SafetyCompliance,
        ModelChoice::SolarPanelAnalysis,
    ];

    /// Stable kebab-case tag used in config files and on the command line.
    pub fn tag(self) -> &'static str {
        match self {
            ModelChoice::StructuralAnalysis => "structural-analysis",
            ModelChoice::SafetyCompliance => "safety-compliance",
            ModelChoice::SolarPanelAnalysis => "solar-panel-analysis",
        }
    }

    /// Human-readable title.
    pub fn title(self) -> &'static str {
        match self {
            ModelChoice::StructuralAnalysis => "Structural Analysis",
            ModelChoice::SafetyCompliance => "Safety Compliance",
            ModelChoice::SolarPanelAnalysis => "Solar Panel Analysis",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ModelChoice::StructuralAnalysis => {
                "Advanced wall surface crack detection for building integrity"
            }
            ModelChoice::SafetyCompliance => {
                "Real-time worker safety helmet compliance monitoring"
            }
            ModelChoice::SolarPanelAnalysis => {
                "AI-powered dust and crack detection for solar panel optimization"
            }
        }
    }
}

impl fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Returned when a string names no known capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown model '{0}' (expected one of: {known})", known = known_tags())]
pub struct UnknownModel(pub String);

fn known_tags() -> String {
    ModelChoice::ALL
        .iter()
        .map(|m| m.tag())
        .collect::<Vec<_>>()
        .join(", ")
}

impl FromStr for ModelChoice {
    type Err = UnknownModel;

    /// Accepts the kebab tag (`safety-compliance`) or the title
    /// (`Safety Compliance`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        ModelChoice::ALL
            .into_iter()
            .find(|m| m.tag() == needle)
            .ok_or_else(|| UnknownModel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tags_and_titles() {
        assert_eq!(
            "structural-analysis".parse::<ModelChoice>(),
            Ok(ModelChoice::StructuralAnalysis)
        );
        assert_eq!(
            "Safety Compliance".parse::<ModelChoice>(),
            Ok(ModelChoice::SafetyCompliance)
        );
        assert_eq!(
            "SOLAR_PANEL_ANALYSIS".parse::<ModelChoice>(),
            Ok(ModelChoice::SolarPanelAnalysis)
        );
    }

    #[test]
    fn rejects_unknown() {
        let err = "roof-inspection".parse::<ModelChoice>().unwrap_err();
        assert!(err.to_string().contains("roof-inspection"));
        assert!(err.to_string().contains("structural-analysis"));
    }

    #[test]
    fn unknown_model_is_a_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(UnknownModel("roof".into()));
        assert_eq!(
            err.to_string(),
            "unknown model 'roof' (expected one of: structural-analysis, \
             safety-compliance, solar-panel-analysis)"
        );
    }

    #[test]
    fn display_matches_serde_tag() {
        for m in ModelChoice::ALL {
            let json = serde_json::to_string(&m).unwrap();
            assert_eq!(json, format!("\"{}\"", m));
        }
    }
}
