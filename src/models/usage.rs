use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// What the machine will mostly be used for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageProfile {
    #[default]
    Gaming,
    Design,
    VideoEditing,
    OfficeWork,
}

impl UsageProfile {
    pub const ALL: [UsageProfile; 4] = [
        UsageProfile::Gaming,
        UsageProfile::Design,
        UsageProfile::VideoEditing,
        UsageProfile::OfficeWork,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UsageProfile::Gaming => "gaming",
            UsageProfile::Design => "design",
            UsageProfile::VideoEditing => "video_editing",
            UsageProfile::OfficeWork => "office_work",
        }
    }

    /// Resolves a usage name, falling back to gaming for anything unrecognised
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl Display for UsageProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown usage profile: {0}")]
pub struct UnknownUsageProfile(pub String);

impl FromStr for UsageProfile {
    type Err = UnknownUsageProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        UsageProfile::ALL
            .into_iter()
            .find(|u| u.as_str() == normalized)
            .ok_or_else(|| UnknownUsageProfile(s.to_string()))
    }
}
