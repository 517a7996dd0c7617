/// Render/sort pipeline
///
/// Everything here is a pure function of an explicit snapshot: the stored
/// results, the chosen sort mode and per-card UI state go in, HTML comes
/// out. Markup lives in minijinja templates with HTML auto-escaping on for
/// every template, so API- and user-supplied text is escaped on output.
use std::collections::HashMap;

use minijinja::{context, AutoEscape, Environment};
use serde::Serialize;

use crate::error::AppResult;
use crate::models::{Quality, SearchResultItem, SortMode};
use crate::services::downloads::{CardState, DownloadPhase};
use crate::services::links::{CardLinks, DownloadLinks};
use crate::services::sorting::sort_items;

pub mod page;

pub use page::{render_page, PageView};

const UNTITLED: &str = "Untitled";
const UNKNOWN_AUTHOR: &str = "Unknown";
const NO_DURATION: &str = "—";

const PAGE_TEMPLATE: &str = include_str!("templates/page.html.jinja");
const RESULTS_TEMPLATE: &str = include_str!("templates/results.html.jinja");
const CARD_TEMPLATE: &str = include_str!("templates/card.html.jinja");
const CSS_STYLES: &str = include_str!("templates/style.css");

/// Template environment shared by the page, results region and cards
fn environment() -> AppResult<Environment<'static>> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env.add_filter("thousands", format_count);
    env.add_template("page.html", PAGE_TEMPLATE)?;
    env.add_template("results.html", RESULTS_TEMPLATE)?;
    env.add_template("card.html", CARD_TEMPLATE)?;
    Ok(env)
}

/// One `<option>` of a select
#[derive(Debug, Serialize)]
struct Choice {
    value: &'static str,
    label: &'static str,
}

fn quality_choices() -> Vec<Choice> {
    Quality::ALL
        .iter()
        .map(|q| Choice {
            value: q.as_str(),
            label: q.label(),
        })
        .collect()
}

/// Formats a count with comma thousands separators
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `timestamp` when present, else `m:ss` from `seconds`, else a dash
pub fn format_duration(item: &SearchResultItem) -> String {
    if let Some(ts) = item.timestamp.as_deref().filter(|ts| !ts.is_empty()) {
        return ts.to_string();
    }
    match item.seconds {
        Some(secs) if secs > 0 => format!("{}:{:02}", secs / 60, secs % 60),
        _ => NO_DURATION.to_string(),
    }
}

/// Display-ready card with every default and fallback resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub id: String,
    pub title: String,
    pub author: String,
    pub duration: String,
    pub views: u64,
    pub uploaded_at: Option<String>,
    pub links: CardLinks,
    pub quality: Quality,
    /// Downloader URL for the card's current quality
    pub download_url: String,
    pub phase: DownloadPhase,
}

impl CardView {
    pub fn build(item: &SearchResultItem, state: CardState, downloads: &DownloadLinks) -> Self {
        let title = item
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTITLED)
            .to_string();
        let author = item
            .author_name()
            .filter(|a| !a.is_empty())
            .unwrap_or(UNKNOWN_AUTHOR)
            .to_string();

        Self {
            id: item.id.clone(),
            title,
            author,
            duration: format_duration(item),
            views: item.view_count(),
            uploaded_at: item.uploaded_at.clone().filter(|u| !u.is_empty()),
            links: CardLinks::resolve(item),
            quality: state.quality,
            download_url: downloads.url(&item.id, state.quality),
            phase: state.phase,
        }
    }
}

/// Sorted cards for the current snapshot
pub fn build_cards(
    items: &[SearchResultItem],
    sort: SortMode,
    states: &HashMap<String, CardState>,
    downloads: &DownloadLinks,
) -> Vec<CardView> {
    sort_items(items, sort)
        .into_iter()
        .map(|item| {
            let state = states.get(&item.id).copied().unwrap_or_default();
            CardView::build(item, state, downloads)
        })
        .collect()
}

/// Markup for the results region
///
/// An empty result set renders a single placeholder instead of an empty
/// region.
pub fn render_results(cards: &[CardView]) -> AppResult<String> {
    let env = environment()?;
    let html = env.get_template("results.html")?.render(context! {
        cards,
        qualities => quality_choices(),
    })?;
    Ok(html)
}

pub fn render_card(card: &CardView) -> AppResult<String> {
    let env = environment()?;
    let html = env.get_template("card.html")?.render(context! {
        card,
        qualities => quality_choices(),
    })?;
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Author;

    fn downloads() -> DownloadLinks {
        DownloadLinks::new("https://dl.example")
    }

    fn item(id: &str) -> SearchResultItem {
        SearchResultItem {
            id: id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_views_use_thousands_separators() {
        let mut it = item("v");
        it.views = Some(1_234_567);
        let html = render_card(&CardView::build(&it, CardState::default(), &downloads())).unwrap();
        assert!(html.contains("👁 1,234,567"));
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_format_duration() {
        let mut it = item("v");
        assert_eq!(format_duration(&it), "—");

        it.seconds = Some(125);
        assert_eq!(format_duration(&it), "2:05");

        it.timestamp = Some("1:02:03".to_string());
        assert_eq!(format_duration(&it), "1:02:03");
    }

    #[test]
    fn test_card_view_defaults() {
        let card = CardView::build(&item("abc123"), CardState::default(), &downloads());
        assert_eq!(card.title, "Untitled");
        assert_eq!(card.author, "Unknown");
        assert_eq!(card.views, 0);
        assert_eq!(card.quality, Quality::Medium);
        assert_eq!(card.download_url, "https://dl.example/medium/id=abc123");
        assert_eq!(card.phase, DownloadPhase::Idle);
    }

    #[test]
    fn test_script_title_is_escaped() {
        let mut it = item("x1");
        it.title = Some("<script>alert('pwned')</script>".to_string());
        it.author = Some(Author {
            name: Some("<b>bold</b>".to_string()),
        });

        let html = render_card(&CardView::build(&it, CardState::default(), &downloads())).unwrap();
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;script&gt;alert("));
        assert!(html.contains("&lt;b&gt;bold&lt;"));
    }

    #[test]
    fn test_attribute_injection_is_escaped() {
        let mut it = item(r#"x" onmouseover="steal()"#);
        it.youtube_watch_url = Some(r#"javascript:"><img src=x>"#.to_string());

        let html = render_card(&CardView::build(&it, CardState::default(), &downloads())).unwrap();
        assert!(!html.contains(r#"" onmouseover=""#));
        assert!(!html.contains("<img src=x>"));
    }

    #[test]
    fn test_empty_results_render_single_placeholder() {
        let html = render_results(&[]).unwrap();
        assert_eq!(html.matches("No results found.").count(), 1);
        assert!(!html.contains("<article"));
    }

    #[test]
    fn test_cards_follow_sort_order() {
        let mut low = item("low");
        low.views = Some(1);
        let mut high = item("high");
        high.views = Some(100);

        let cards = build_cards(
            &[low, high],
            SortMode::ViewsDesc,
            &HashMap::new(),
            &downloads(),
        );
        let html = render_results(&cards).unwrap();

        assert_eq!(html.matches("<article").count(), 2);
        let high_input = html.find(r#"name="id" value="high""#).unwrap();
        let low_input = html.find(r#"name="id" value="low""#).unwrap();
        assert!(high_input < low_input);
    }

    #[test]
    fn test_busy_card_disables_download() {
        let state = CardState::new(DownloadPhase::Preparing, Quality::High);
        let html = render_card(&CardView::build(&item("v"), state, &downloads())).unwrap();

        assert!(html.contains(r#"aria-label="Download" disabled"#));
        assert!(html.contains("Downloading…"));
        assert!(html.contains("loader-small"));
        assert!(html.contains(r#"<option value="high" selected>"#));
    }

    #[test]
    fn test_optional_upload_chip() {
        let mut it = item("v");
        let without = render_card(&CardView::build(&it, CardState::default(), &downloads())).unwrap();
        it.uploaded_at = Some("3 days ago".to_string());
        let with = render_card(&CardView::build(&it, CardState::default(), &downloads())).unwrap();

        assert_eq!(with.matches(r#"class="chip""#).count(), without.matches(r#"class="chip""#).count() + 1);
        assert!(with.contains("3 days ago"));
    }
}
