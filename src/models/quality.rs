use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Download quality understood by the downloader service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Quality {
    High,
    #[default]
    Medium,
    Low,
}

impl Quality {
    pub const ALL: [Quality; 3] = [Quality::High, Quality::Medium, Quality::Low];

    /// Parses a selector value; anything unrecognised means medium
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Quality::High,
            "low" => Quality::Low,
            _ => Quality::Medium,
        }
    }

    /// Path segment used in downloader URLs
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::High => "high",
            Quality::Medium => "medium",
            Quality::Low => "low",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Quality::High => "High",
            Quality::Medium => "Medium",
            Quality::Low => "Low",
        }
    }
}

impl From<String> for Quality {
    fn from(value: String) -> Self {
        Quality::parse(&value)
    }
}

impl From<Quality> for String {
    fn from(quality: Quality) -> Self {
        quality.as_str().to_string()
    }
}

impl Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
