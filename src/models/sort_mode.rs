use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Client-side ordering applied to the stored result set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortMode {
    /// Keep the order the API returned
    #[default]
    Unsorted,
    ViewsDesc,
    ViewsAsc,
    DurationDesc,
    DurationAsc,
}

impl SortMode {
    pub const ALL: [SortMode; 5] = [
        SortMode::Unsorted,
        SortMode::ViewsDesc,
        SortMode::ViewsAsc,
        SortMode::DurationDesc,
        SortMode::DurationAsc,
    ];

    /// Parses a selector value; unknown values keep the original order
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "views_desc" => SortMode::ViewsDesc,
            "views_asc" => SortMode::ViewsAsc,
            "duration_desc" => SortMode::DurationDesc,
            "duration_asc" => SortMode::DurationAsc,
            _ => SortMode::Unsorted,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Unsorted => "",
            SortMode::ViewsDesc => "views_desc",
            SortMode::ViewsAsc => "views_asc",
            SortMode::DurationDesc => "duration_desc",
            SortMode::DurationAsc => "duration_asc",
        }
    }

    /// Label shown in the sort selector
    pub fn label(&self) -> &'static str {
        match self {
            SortMode::Unsorted => "Relevance",
            SortMode::ViewsDesc => "Most viewed",
            SortMode::ViewsAsc => "Least viewed",
            SortMode::DurationDesc => "Longest",
            SortMode::DurationAsc => "Shortest",
        }
    }
}

impl From<String> for SortMode {
    fn from(value: String) -> Self {
        SortMode::parse(&value)
    }
}

impl From<SortMode> for String {
    fn from(mode: SortMode) -> Self {
        mode.as_str().to_string()
    }
}

impl Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
