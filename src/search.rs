/// Workspace search for the popup and the omnibox
use serde::Serialize;

use crate::page_data::{TabSummary, Workspace};

/// UTF-16 code units of the workspace summary shown in an omnibox suggestion
pub const OMNIBOX_SUMMARY_PREVIEW: usize = 50;

/// One entry of `chrome.omnibox` suggestions
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OmniboxSuggestion {
    /// Workspace id, handed back on selection
    pub content: String,
    pub description: String,
}

/// Longest prefix of `text` within `max_units` UTF-16 code units, the way the
/// browser measures strings. A character is never split.
fn truncate_utf16(text: &str, max_units: usize) -> &str {
    let mut units = 0;
    for (index, c) in text.char_indices() {
        units += c.len_utf16();
        if units > max_units {
            return &text[..index];
        }
    }
    text
}

fn tab_matches(tab: &TabSummary, query: &str) -> bool {
    tab.title.to_lowercase().contains(query) || tab.summary.to_lowercase().contains(query)
}

/// Workspaces whose name, summary, or any tab title/summary contains `query`
/// (case-insensitive). An empty query matches everything.
pub fn search_workspaces<'a>(workspaces: &'a [Workspace], query: &str) -> Vec<&'a Workspace> {
    let query = query.to_lowercase();
    workspaces
        .iter()
        .filter(|workspace| {
            workspace.name.to_lowercase().contains(&query)
                || workspace.summary.to_lowercase().contains(&query)
                || workspace.tabs.iter().any(|tab| tab_matches(tab, &query))
        })
        .collect()
}

/// Existing workspaces a typed name could refer to
pub fn name_suggestions<'a>(workspaces: &'a [Workspace], typed: &str) -> Vec<&'a Workspace> {
    let term = typed.trim().to_lowercase();
    if term.is_empty() {
        return Vec::new();
    }
    workspaces
        .iter()
        .filter(|workspace| workspace.name.to_lowercase().contains(&term))
        .collect()
}

/// One suggestion per workspace with at least one tab whose title or summary
/// contains `text`
pub fn omnibox_suggestions(workspaces: &[Workspace], text: &str) -> Vec<OmniboxSuggestion> {
    let query = text.to_lowercase();
    workspaces
        .iter()
        .filter_map(|workspace| {
            let matching = workspace.tabs.iter().filter(|tab| tab_matches(tab, &query)).count();
            if matching == 0 {
                return None;
            }
            Some(OmniboxSuggestion {
                content: workspace.id.clone(),
                description: format!(
                    "{} ({} matching tabs) - {}...",
                    workspace.name,
                    matching,
                    truncate_utf16(&workspace.summary, OMNIBOX_SUMMARY_PREVIEW)
                ),
            })
        })
        .collect()
}
