/// Workspace collection persisted in chrome.storage.local

use std::collections::HashSet;

use crate::page_data::{TabSummary, Workspace};
use serde::{Deserialize, Serialize};

/// Storage key holding the workspace array
pub const WORKSPACES_KEY: &str = "workspaces";

/// How tabs are saved under a name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    New,
    AddToExisting,
}

/// What `WorkspaceStore::save_tabs` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created { name: String, tab_count: usize },
    /// Adding was requested but no workspace had that name
    CreatedInstead { name: String, tab_count: usize },
    Added { name: String, added: usize },
}

impl SaveOutcome {
    pub fn message(&self) -> String {
        match self {
            SaveOutcome::Created { name, tab_count } => {
                format!("Workspace \"{}\" saved with {} tabs!", name, tab_count)
            }
            SaveOutcome::CreatedInstead { name, tab_count } => format!(
                "No workspace named \"{}\" found. Created a new workspace with {} tabs instead.",
                name, tab_count
            ),
            SaveOutcome::Added { name, added } => format!("Added {} tabs to \"{}\"!", added, name),
        }
    }
}

/// A deletion made from the popup, replayed against freshly loaded storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEdit {
    RemoveWorkspace { workspace_id: String },
    /// `url` pins the tab in case the list changed since `index` was read
    RemoveTab { workspace_id: String, index: usize, url: String },
}

/// Root storage structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct WorkspaceStore {
    pub workspaces: Vec<Workspace>,
}

impl WorkspaceStore {
    pub fn new() -> Self {
        WorkspaceStore {
            workspaces: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.workspaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workspaces.is_empty()
    }

    pub fn add_workspace(&mut self, workspace: Workspace) {
        self.workspaces.push(workspace);
    }

    pub fn get_workspace(&self, workspace_id: &str) -> Option<&Workspace> {
        self.workspaces.iter().find(|w| w.id == workspace_id)
    }

    /// Case-insensitive name lookup
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        let name = name.to_lowercase();
        self.workspaces.iter().position(|w| w.name.to_lowercase() == name)
    }

    pub fn remove_workspace(&mut self, workspace_id: &str) -> bool {
        let original_len = self.workspaces.len();
        self.workspaces.retain(|w| w.id != workspace_id);
        self.workspaces.len() < original_len
    }

    /// Remove the tab at `index`. The workspace summary is left as it was.
    pub fn remove_tab(&mut self, workspace_id: &str, index: usize) -> Option<TabSummary> {
        let workspace = self.workspaces.iter_mut().find(|w| w.id == workspace_id)?;
        if index < workspace.tabs.len() {
            Some(workspace.tabs.remove(index))
        } else {
            None
        }
    }

    /// Apply `edit`, returning whether anything was removed
    pub fn apply(&mut self, edit: &StoreEdit) -> bool {
        match edit {
            StoreEdit::RemoveWorkspace { workspace_id } => self.remove_workspace(workspace_id),
            StoreEdit::RemoveTab { workspace_id, index, url } => {
                let Some(workspace) = self.get_workspace(workspace_id) else {
                    return false;
                };
                let position = match workspace.tabs.get(*index) {
                    Some(tab) if tab.url == *url => Some(*index),
                    _ => workspace.tabs.iter().position(|tab| tab.url == *url),
                };
                position.is_some_and(|position| self.remove_tab(workspace_id, position).is_some())
            }
        }
    }

    /// Save summarized tabs under `name`.
    ///
    /// When adding to an existing workspace only tabs whose URL was not saved
    /// there before this call are appended, and the workspace summary is rebuilt from all of
    /// its tab titles.
    pub fn save_tabs(
        &mut self,
        name: &str,
        tabs: Vec<TabSummary>,
        mode: SaveMode,
        created: f64,
        new_id: String,
    ) -> SaveOutcome {
        let existing = match mode {
            SaveMode::AddToExisting => self.find_by_name(name),
            SaveMode::New => None,
        };

        let Some(index) = existing else {
            let tab_count = tabs.len();
            self.add_workspace(Workspace {
                id: new_id,
                name: name.to_string(),
                summary: workspace_summary(&tabs),
                tabs,
                created,
            });
            return match mode {
                SaveMode::New => SaveOutcome::Created {
                    name: name.to_string(),
                    tab_count,
                },
                SaveMode::AddToExisting => SaveOutcome::CreatedInstead {
                    name: name.to_string(),
                    tab_count,
                },
            };
        };

        let workspace = &mut self.workspaces[index];
        let known: HashSet<String> = workspace.tabs.iter().map(|t| t.url.clone()).collect();
        let new_tabs: Vec<TabSummary> = tabs.into_iter().filter(|tab| !known.contains(&tab.url)).collect();
        let added = new_tabs.len();
        workspace.tabs.extend(new_tabs);
        workspace.summary = workspace_summary(&workspace.tabs);

        SaveOutcome::Added {
            name: workspace.name.clone(),
            added,
        }
    }

    pub fn extend(&mut self, workspaces: Vec<Workspace>) {
        self.workspaces.extend(workspaces);
    }
}

impl From<Vec<Workspace>> for WorkspaceStore {
    fn from(workspaces: Vec<Workspace>) -> Self {
        WorkspaceStore { workspaces }
    }
}

/// Workspace summary line: tab titles joined with ", "
pub fn workspace_summary(tabs: &[TabSummary]) -> String {
    tabs.iter().map(|tab| tab.title.as_str()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_tab(url: &str, title: &str) -> TabSummary {
        TabSummary {
            title: title.to_string(),
            url: url.to_string(),
            fav_icon_url: None,
            summary: format!("About {}", title),
        }
    }

    fn create_test_workspace(id: &str, name: &str) -> Workspace {
        let tabs = vec![create_test_tab("https://google.com", "Google")];
        Workspace {
            id: id.to_string(),
            name: name.to_string(),
            summary: workspace_summary(&tabs),
            tabs,
            created: 1698508200000.0,
        }
    }

    #[test]
    fn test_store_new() {
        let store = WorkspaceStore::new();
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_workspace() {
        let mut store = WorkspaceStore::new();
        store.add_workspace(create_test_workspace("ws-1", "One"));
        store.add_workspace(create_test_workspace("ws-2", "Two"));

        assert!(store.remove_workspace("ws-1"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.workspaces[0].id, "ws-2");
        assert!(!store.remove_workspace("missing"));
    }

    #[test]
    fn test_get_workspace() {
        let mut store = WorkspaceStore::new();
        store.add_workspace(create_test_workspace("ws-1", "Research"));

        assert_eq!(store.get_workspace("ws-1").map(|w| w.name.as_str()), Some("Research"));
        assert!(store.get_workspace("ws-2").is_none());
    }

    #[test]
    fn test_save_new_workspace() {
        let mut store = WorkspaceStore::new();
        let tabs = vec![
            create_test_tab("https://github.com", "GitHub"),
            create_test_tab("https://docs.rs", "Docs.rs"),
        ];

        let outcome = store.save_tabs("Rust", tabs, SaveMode::New, 10.0, "id-1".to_string());

        assert_eq!(
            outcome,
            SaveOutcome::Created {
                name: "Rust".to_string(),
                tab_count: 2
            }
        );
        let workspace = &store.workspaces[0];
        assert_eq!(workspace.id, "id-1");
        assert_eq!(workspace.created, 10.0);
        assert_eq!(workspace.summary, "GitHub, Docs.rs");
    }

    #[test]
    fn test_new_mode_never_merges() {
        let mut store = WorkspaceStore::new();
        store.add_workspace(create_test_workspace("ws-1", "Research"));

        store.save_tabs(
            "Research",
            vec![create_test_tab("https://a.test", "A")],
            SaveMode::New,
            1.0,
            "ws-2".to_string(),
        );

        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_add_to_existing_skips_known_urls() {
        let mut store = WorkspaceStore::new();
        store.add_workspace(create_test_workspace("ws-1", "Research"));
        let tabs = vec![
            create_test_tab("https://google.com", "Google again"),
            create_test_tab("https://rust-lang.org", "Rust"),
        ];

        let outcome = store.save_tabs("research", tabs, SaveMode::AddToExisting, 1.0, "unused".to_string());

        assert_eq!(
            outcome,
            SaveOutcome::Added {
                name: "Research".to_string(),
                added: 1
            }
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.workspaces[0].tabs.len(), 2);
        assert_eq!(store.workspaces[0].summary, "Google, Rust");
    }

    #[test]
    fn test_add_to_existing_keeps_repeated_urls_from_one_batch() {
        let mut store = WorkspaceStore::new();
        store.add_workspace(create_test_workspace("ws-1", "Research"));
        let tabs = vec![
            create_test_tab("https://rust-lang.org", "Rust"),
            create_test_tab("https://rust-lang.org", "Rust (pinned)"),
        ];

        let outcome = store.save_tabs("Research", tabs, SaveMode::AddToExisting, 1.0, "unused".to_string());

        assert!(matches!(outcome, SaveOutcome::Added { added: 2, .. }));
        assert_eq!(store.workspaces[0].tabs.len(), 3);
        assert_eq!(store.workspaces[0].summary, "Google, Rust, Rust (pinned)");
    }

    #[test]
    fn test_add_to_missing_workspace_creates_it() {
        let mut store = WorkspaceStore::new();

        let outcome = store.save_tabs(
            "Later",
            vec![create_test_tab("https://a.test", "A")],
            SaveMode::AddToExisting,
            5.0,
            "ws-9".to_string(),
        );

        assert!(matches!(outcome, SaveOutcome::CreatedInstead { tab_count: 1, .. }));
        assert_eq!(store.workspaces[0].id, "ws-9");
    }

    #[test]
    fn test_remove_tab() {
        let mut store = WorkspaceStore::new();
        store.save_tabs(
            "Pair",
            vec![create_test_tab("https://a.test", "A"), create_test_tab("https://b.test", "B")],
            SaveMode::New,
            1.0,
            "ws-1".to_string(),
        );

        let removed = store.remove_tab("ws-1", 0);

        assert_eq!(removed.map(|t| t.title), Some("A".to_string()));
        assert_eq!(store.workspaces[0].tabs.len(), 1);
        assert!(store.remove_tab("ws-1", 5).is_none());
        assert!(store.remove_tab("ws-2", 0).is_none());
    }

    #[test]
    fn test_edit_on_reloaded_store_keeps_other_windows_changes() {
        // This popup saw [ws-1, ws-2]; another window has since added ws-3
        let mut stored = WorkspaceStore::new();
        stored.add_workspace(create_test_workspace("ws-1", "One"));
        stored.add_workspace(create_test_workspace("ws-2", "Two"));
        stored.add_workspace(create_test_workspace("ws-3", "Three"));

        let removed = stored.apply(&StoreEdit::RemoveWorkspace {
            workspace_id: "ws-1".to_string(),
        });

        assert!(removed);
        let ids: Vec<&str> = stored.workspaces.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["ws-2", "ws-3"]);
    }

    #[test]
    fn test_tab_edit_follows_url_when_index_moved() {
        let mut store = WorkspaceStore::new();
        store.save_tabs(
            "Trio",
            vec![
                create_test_tab("https://a.test", "A"),
                create_test_tab("https://b.test", "B"),
                create_test_tab("https://c.test", "C"),
            ],
            SaveMode::New,
            1.0,
            "ws-1".to_string(),
        );
        // Seen at index 2 before another window removed "A"
        store.remove_tab("ws-1", 0);

        let removed = store.apply(&StoreEdit::RemoveTab {
            workspace_id: "ws-1".to_string(),
            index: 2,
            url: "https://c.test".to_string(),
        });

        assert!(removed);
        let urls: Vec<&str> = store.workspaces[0].tabs.iter().map(|t| t.url.as_str()).collect();
        assert_eq!(urls, vec!["https://b.test"]);
        assert!(!store.apply(&StoreEdit::RemoveTab {
            workspace_id: "ws-1".to_string(),
            index: 0,
            url: "https://gone.test".to_string(),
        }));
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let mut store = WorkspaceStore::new();
        store.add_workspace(create_test_workspace("ws-1", "Test"));

        let json = serde_json::to_value(&store).unwrap();
        assert!(json.is_array());

        let deserialized: WorkspaceStore = serde_json::from_value(json).unwrap();
        assert_eq!(deserialized, store);
    }

    #[test]
    fn test_outcome_messages() {
        let added = SaveOutcome::Added {
            name: "Work".to_string(),
            added: 3,
        };
        assert_eq!(added.message(), "Added 3 tabs to \"Work\"!");
    }
}
