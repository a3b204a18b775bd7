/// Background worker: runtime message routing and omnibox handling
use crate::channel::{ExtractionChannel, ExtractionHost};
use crate::page_data::{RuntimeRequest, TabSummary};
use crate::search::{omnibox_suggestions, OmniboxSuggestion};
use crate::storage::WorkspaceStore;
use crate::summarizer::summarize_tab;

/// Reply to a runtime message. `None` means the message is not for the
/// background worker and gets no reply.
pub async fn route_request<H: ExtractionHost>(
    channel: &ExtractionChannel<H>,
    request: RuntimeRequest,
) -> Option<TabSummary> {
    match request {
        RuntimeRequest::SummarizeTab { tab } => Some(summarize_tab(channel, &tab).await),
        // Answered by content scripts
        RuntimeRequest::ExtractContent => None,
    }
}

pub fn omnibox_input_changed(store: &WorkspaceStore, text: &str) -> Vec<OmniboxSuggestion> {
    omnibox_suggestions(&store.workspaces, text)
}

/// URLs to open for the workspace picked in the omnibox
pub fn omnibox_input_entered(store: &WorkspaceStore, workspace_id: &str) -> Option<Vec<String>> {
    store
        .get_workspace(workspace_id)
        .map(|workspace| workspace.tabs.iter().map(|tab| tab.url.clone()).collect())
}
