use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

mod build;
mod part;
mod usage;

pub use build::{Build, CandidateSet, Recommendation};
pub use part::{Part, PartType, UnknownPartType};
pub use usage::{UnknownUsageProfile, UsageProfile};

// ============================================================================
// Build API Types
// ============================================================================

fn default_usage() -> String {
    UsageProfile::Gaming.as_str().to_string()
}

/// Query parameters for `GET /v1/build`
#[derive(Debug, Deserialize)]
pub struct BuildQuery {
    pub budget: f64,
    /// Free-form so that unknown profiles can fall back to gaming
    #[serde(default = "default_usage")]
    pub usage: String,
}

/// Socket compatibility summary of a recommended build
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompatibilityCheck {
    pub cpu_socket: Option<String>,
    pub motherboard_socket: Option<String>,
    pub compatible: bool,
}

impl From<&Build> for CompatibilityCheck {
    fn from(build: &Build) -> Self {
        let cpu_socket = build.cpu_socket().map(str::to_string);
        let motherboard_socket = build.motherboard_socket().map(str::to_string);
        let compatible = cpu_socket.is_some() && cpu_socket == motherboard_socket;

        Self {
            cpu_socket,
            motherboard_socket,
            compatible,
        }
    }
}

/// Response for a successful build recommendation
#[derive(Debug, Serialize)]
pub struct BuildResponse {
    pub build: BTreeMap<PartType, Part>,
    pub explanation: String,
    pub total_cost: f64,
    pub score: f64,
    /// The profile actually applied, after falling back for unknown names
    pub usage: UsageProfile,
    pub budget: f64,
    /// Closest alternatives per part type
    pub candidates: CandidateSet,
    pub compatibility: CompatibilityCheck,
    pub generated_at: DateTime<Utc>,
}

// ============================================================================
// Component Options API Types
// ============================================================================

/// Query parameters for `GET /v1/components/:part_type`
#[derive(Debug, Default, Deserialize)]
pub struct ComponentOptionsQuery {
    pub max_price: Option<f64>,
    pub limit: Option<usize>,
}

/// Best-scoring parts of one type
#[derive(Debug, Serialize)]
pub struct ComponentOptionsResponse {
    pub component_type: PartType,
    pub max_price: Option<f64>,
    pub options: Vec<Part>,
}
