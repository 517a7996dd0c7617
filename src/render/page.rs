use minijinja::context;

use crate::error::AppResult;
use crate::models::{SortMode, MAX_RESULTS_CAP};
use crate::services::dispatcher::load_more_visible;
use crate::services::notifications::Notice;

use super::{environment, quality_choices, CardView, Choice, CSS_STYLES};

/// Everything the page shows, captured at one instant
#[derive(Debug, Clone, Default)]
pub struct PageView {
    /// Text shown in the query input
    pub query_input: String,
    /// Text shown in the max-results input
    pub max_input: String,
    pub sort: SortMode,
    /// Query of the applied result set; empty before the first search
    pub last_query: String,
    pub last_count: u64,
    pub cards: Vec<CardView>,
    pub notices: Vec<Notice>,
    pub error: Option<String>,
}

impl PageView {
    pub fn has_results(&self) -> bool {
        !self.last_query.is_empty()
    }

    pub fn status_line(&self) -> Option<String> {
        self.has_results().then(|| {
            format!(
                "Showing {} result(s) for \"{}\"",
                self.cards.len(),
                self.last_query
            )
        })
    }

    pub fn show_load_more(&self) -> bool {
        self.has_results() && load_more_visible(self.cards.len(), self.last_count)
    }
}

fn sort_choices() -> Vec<Choice> {
    SortMode::ALL
        .iter()
        .map(|mode| Choice {
            value: mode.as_str(),
            label: mode.label(),
        })
        .collect()
}

/// Full HTML document for the search page
pub fn render_page(view: &PageView) -> AppResult<String> {
    let env = environment()?;
    let html = env.get_template("page.html")?.render(context! {
        style => CSS_STYLES,
        query_input => &view.query_input,
        max_input => &view.max_input,
        cap => MAX_RESULTS_CAP,
        sort => view.sort.as_str(),
        sorts => sort_choices(),
        error => &view.error,
        status_line => view.status_line(),
        has_results => view.has_results(),
        cards => &view.cards,
        qualities => quality_choices(),
        show_load_more => view.show_load_more(),
        notices => &view.notices,
    })?;
    Ok(html)
}
