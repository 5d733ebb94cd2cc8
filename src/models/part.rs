use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Category of a PC component
///
/// The declaration order is the canonical order used when enumerating builds
/// and when serializing part maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartType {
    Cpu,
    Motherboard,
    Memory,
    InternalHardDrive,
    VideoCard,
    Case,
    PowerSupply,
}

impl PartType {
    /// Every type a complete build must contain, in canonical order
    pub const ESSENTIAL: [PartType; 7] = [
        PartType::Cpu,
        PartType::Motherboard,
        PartType::Memory,
        PartType::InternalHardDrive,
        PartType::VideoCard,
        PartType::Case,
        PartType::PowerSupply,
    ];

    /// Snake-case identifier, also the name of the catalog table for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            PartType::Cpu => "cpu",
            PartType::Motherboard => "motherboard",
            PartType::Memory => "memory",
            PartType::InternalHardDrive => "internal_hard_drive",
            PartType::VideoCard => "video_card",
            PartType::Case => "case",
            PartType::PowerSupply => "power_supply",
        }
    }

    /// Human readable label used in explanations
    pub fn label(&self) -> &'static str {
        match self {
            PartType::Cpu => "CPU",
            PartType::Motherboard => "Motherboard",
            PartType::Memory => "Memory",
            PartType::InternalHardDrive => "Internal Hard Drive",
            PartType::VideoCard => "Video Card",
            PartType::Case => "Case",
            PartType::PowerSupply => "Power Supply",
        }
    }

    /// Whether parts of this type carry a socket used for compatibility checks
    pub fn has_socket(&self) -> bool {
        matches!(self, PartType::Cpu | PartType::Motherboard)
    }
}

impl Display for PartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown part type: {0}")]
pub struct UnknownPartType(pub String);

impl FromStr for PartType {
    type Err = UnknownPartType;

    /// Accepts snake_case and the hyphenated form used by the raw CSV file names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        PartType::ESSENTIAL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| UnknownPartType(s.to_string()))
    }
}

/// A single catalog row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(rename = "type")]
    pub part_type: PartType,
    pub name: String,
    pub price: f64,
    /// Performance metric, only comparable within the same part type
    pub score: f64,
    #[serde(default)]
    pub socket: Option<String>,
}

impl Part {
    pub fn new(part_type: PartType, name: impl Into<String>, price: f64, score: f64) -> Self {
        Self {
            part_type,
            name: name.into(),
            price,
            score,
            socket: None,
        }
    }

    pub fn with_socket(mut self, socket: impl Into<String>) -> Self {
        self.socket = Some(socket.into());
        self
    }

    /// Socket identifier, treating an empty string as absent
    pub fn socket(&self) -> Option<&str> {
        self.socket.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Price and score are finite and non-negative
    pub fn is_valid(&self) -> bool {
        self.price.is_finite() && self.price >= 0.0 && self.score.is_finite() && self.score >= 0.0
    }
}
