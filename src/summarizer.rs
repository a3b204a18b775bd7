/// Per-tab summary records built from extracted page content
use futures::future::join_all;

use crate::channel::{ExtractionChannel, ExtractionHost};
use crate::page_data::{PageContent, TabDescriptor, TabSummary};

/// Shown when a page yields neither text nor a meta description
pub const NO_SUMMARY_TEXT: &str = "No summary available";

/// Combine a tab with whatever content could be extracted from it.
///
/// The favicon always comes from the tab itself; extracted content never
/// carries one.
pub fn build_summary(tab: &TabDescriptor, content: Option<PageContent>) -> TabSummary {
    let Some(content) = content else {
        return TabSummary {
            title: tab.title.clone(),
            url: tab.url.clone(),
            fav_icon_url: tab.fav_icon_url.clone(),
            summary: tab.title.clone(),
        };
    };

    let summary = if !content.content.is_empty() {
        content.content
    } else if !content.meta_description.is_empty() {
        content.meta_description
    } else {
        NO_SUMMARY_TEXT.to_string()
    };

    TabSummary {
        title: content.title,
        url: content.url,
        fav_icon_url: tab.fav_icon_url.clone(),
        summary,
    }
}

/// Record used when the summarizer itself could not be reached
pub fn unsummarized(tab: &TabDescriptor) -> TabSummary {
    TabSummary {
        title: tab.title.clone(),
        url: tab.url.clone(),
        fav_icon_url: tab.fav_icon_url.clone(),
        summary: NO_SUMMARY_TEXT.to_string(),
    }
}

/// Summarize one tab. Always resolves.
pub async fn summarize_tab<H: ExtractionHost>(channel: &ExtractionChannel<H>, tab: &TabDescriptor) -> TabSummary {
    let content = channel.extract(tab).await;
    build_summary(tab, content)
}

/// Summarize many tabs concurrently; output order matches `tabs`
pub async fn summarize_tabs<H: ExtractionHost>(channel: &ExtractionChannel<H>, tabs: &[TabDescriptor]) -> Vec<TabSummary> {
    let summaries = join_all(tabs.iter().map(|tab| summarize_tab(channel, tab))).await;
    log::debug!("Summarized {} tabs", summaries.len());
    summaries
}
