use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};

pub mod quality;
pub mod sort_mode;

pub use quality::Quality;
pub use sort_mode::SortMode;

/// Hard cap on how many results the search API is asked for
pub const MAX_RESULTS_CAP: u32 = 50;

/// Channel or uploader attached to a result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub name: Option<String>,
}

/// A single video as returned by the search API
///
/// Every field is optional on the wire. Display defaults and link fallbacks
/// are resolved at render time, see [`crate::services::links`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_author", skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub seconds: Option<u64>,
    /// Pre-formatted duration such as `"4:05"`
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(
        default,
        rename = "uploadedAt",
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub uploaded_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub thumbnail_hq: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub thumbnail_sd: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub youtube_watch_url: Option<String>,
    /// Older field name for the watch link
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub youtube_music_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub youtube_short_url: Option<String>,
}

impl SearchResultItem {
    /// View count used for sorting; missing counts as zero
    pub fn view_count(&self) -> u64 {
        self.views.unwrap_or(0)
    }

    /// Duration in seconds used for sorting; missing counts as zero
    pub fn duration_secs(&self) -> u64 {
        self.seconds.unwrap_or(0)
    }

    pub fn author_name(&self) -> Option<&str> {
        self.author.as_ref().and_then(|a| a.name.as_deref())
    }
}

/// A validated search API response
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchPage {
    pub items: Vec<SearchResultItem>,
    /// Total reported by the API, which may exceed `items.len()`
    pub count: Option<u64>,
}

impl SearchPage {
    /// Total number of matches; falls back to the item count when the API
    /// omits `count` or reports zero
    pub fn reported_count(&self) -> u64 {
        match self.count {
            Some(count) if count > 0 => count,
            _ => self.items.len() as u64,
        }
    }
}

impl TryFrom<Value> for SearchPage {
    type Error = AppError;

    /// Accepts only `{ "ok": true, "items": [...] }`, with an optional `count`
    fn try_from(payload: Value) -> AppResult<Self> {
        let unexpected = || AppError::Format("API returned unexpected format".to_string());

        let Value::Object(mut body) = payload else {
            return Err(unexpected());
        };

        if body.get("ok") != Some(&Value::Bool(true)) {
            return Err(unexpected());
        }

        let items = match body.remove("items") {
            Some(Value::Array(items)) => items,
            _ => return Err(unexpected()),
        };

        let items = items
            .into_iter()
            .map(serde_json::from_value::<SearchResultItem>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                tracing::warn!(error = %e, "Search API item failed to decode");
                unexpected()
            })?;

        let count = body.get("count").and_then(count_from_value);

        Ok(SearchPage { items, count })
    }
}

fn count_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(count_from_value))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

/// Strings pass through, numbers become their text, anything else is absent
fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_author<'de, D>(deserializer: D) -> Result<Option<Author>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_deserialization_full() {
        let json = r#"{
            "id": "dQw4w9WgXcQ",
            "title": "Never Gonna Give You Up",
            "author": { "name": "Rick Astley" },
            "views": 1500000000,
            "seconds": 213,
            "timestamp": "3:33",
            "uploadedAt": "15 years ago",
            "thumbnail_hq": "https://img.example/hq.jpg",
            "youtube_watch_url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        }"#;

        let item: SearchResultItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, "dQw4w9WgXcQ");
        assert_eq!(item.author_name(), Some("Rick Astley"));
        assert_eq!(item.view_count(), 1_500_000_000);
        assert_eq!(item.duration_secs(), 213);
        assert_eq!(item.uploaded_at.as_deref(), Some("15 years ago"));
    }

    #[test]
    fn test_item_deserialization_lenient_fields() {
        let item: SearchResultItem = serde_json::from_value(json!({
            "id": 42,
            "author": "not an object",
            "views": "1200",
            "seconds": 61.9,
            "title": null
        }))
        .unwrap();

        assert_eq!(item.id, "42");
        assert_eq!(item.author, None);
        assert_eq!(item.views, Some(1200));
        assert_eq!(item.seconds, Some(61));
        assert_eq!(item.title, None);
    }

    #[test]
    fn test_mistyped_optional_strings_do_not_reject_page() {
        let page = SearchPage::try_from(json!({
            "ok": true,
            "items": [
                { "id": "good", "title": "fine" },
                {
                    "id": "odd",
                    "title": 12345,
                    "timestamp": 213,
                    "uploadedAt": false,
                    "thumbnail_hq": { "url": "x" },
                    "youtube_watch_url": ["https://example.com"]
                }
            ],
            "count": 2
        }))
        .unwrap();

        assert_eq!(page.items.len(), 2);
        let odd = &page.items[1];
        assert_eq!(odd.title.as_deref(), Some("12345"));
        assert_eq!(odd.timestamp.as_deref(), Some("213"));
        assert_eq!(odd.uploaded_at, None);
        assert_eq!(odd.thumbnail_hq, None);
        assert_eq!(odd.youtube_watch_url, None);
    }

    #[test]
    fn test_missing_numbers_count_as_zero() {
        let item: SearchResultItem = serde_json::from_value(json!({ "id": "x", "views": -3 })).unwrap();
        assert_eq!(item.view_count(), 0);
        assert_eq!(item.duration_secs(), 0);
    }

    #[test]
    fn test_page_accepts_ok_payload() {
        let page = SearchPage::try_from(json!({
            "ok": true,
            "items": [{ "id": "a" }, { "id": "b" }],
            "count": 25
        }))
        .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.reported_count(), 25);
    }

    #[test]
    fn test_page_count_falls_back_to_item_count() {
        let missing = SearchPage::try_from(json!({ "ok": true, "items": [{ "id": "a" }] })).unwrap();
        assert_eq!(missing.reported_count(), 1);

        let zero =
            SearchPage::try_from(json!({ "ok": true, "items": [{ "id": "a" }], "count": 0 })).unwrap();
        assert_eq!(zero.reported_count(), 1);
    }

    #[test]
    fn test_page_rejects_unexpected_shapes() {
        let cases = [
            json!({ "ok": false, "items": [] }),
            json!({ "ok": "true", "items": [] }),
            json!({ "ok": true }),
            json!({ "ok": true, "items": {} }),
            json!({ "ok": true, "items": [1, 2] }),
            json!([]),
        ];

        for payload in cases {
            let result = SearchPage::try_from(payload.clone());
            assert!(
                matches!(result, Err(AppError::Format(_))),
                "expected format error for {}",
                payload
            );
        }
    }
}
