/// JSON export and import of workspace collections
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::count_hostnames;
use crate::page_data::Workspace;

/// Format version written into every export
pub const EXPORT_VERSION: &str = "1.0.0";

/// Workspaces listed by name in an import preview
const PREVIEW_WORKSPACES: usize = 3;

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("No workspaces to export")]
    NothingToExport,
    #[error("Please select a valid JSON file")]
    NotJsonFile,
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Invalid backup file format")]
    MissingWorkspaces,
    #[error("No valid workspaces found in file")]
    NothingToImport,
}

/// Top-level structure of an export file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub version: String,
    pub export_date: String,
    pub workspace_count: usize,
    pub workspaces: Vec<Workspace>,
}

impl ExportBundle {
    /// `export_date` is an ISO-8601 timestamp
    pub fn new(workspaces: &[Workspace], export_date: &str) -> Result<ExportBundle, BackupError> {
        if workspaces.is_empty() {
            return Err(BackupError::NothingToExport);
        }
        Ok(ExportBundle {
            version: EXPORT_VERSION.to_string(),
            export_date: export_date.to_string(),
            workspace_count: workspaces.len(),
            workspaces: workspaces.to_vec(),
        })
    }

    pub fn to_json(&self) -> Result<String, BackupError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// `tabrecall-workspaces-YYYY-MM-DD.json`
    pub fn filename(&self) -> String {
        let day = self.export_date.split('T').next().unwrap_or_default();
        format!("tabrecall-workspaces-{}.json", day)
    }
}

/// Summary shown before an import is confirmed
#[derive(Debug, Clone, PartialEq)]
pub struct ImportPreview {
    pub workspace_count: usize,
    pub total_tabs: usize,
    pub domain_count: usize,
    pub export_date: Option<String>,
    /// Name and tab count of the first few workspaces in the file
    pub first_workspaces: Vec<(String, usize)>,
}

impl ImportPreview {
    fn from_entries(entries: &[Value], export_date: Option<String>) -> ImportPreview {
        let tab_lists: Vec<&Vec<Value>> = entries
            .iter()
            .filter_map(|entry| entry.get("tabs").and_then(Value::as_array))
            .collect();

        let urls = tab_lists
            .iter()
            .flat_map(|tabs| tabs.iter())
            .filter_map(|tab| tab.get("url").and_then(Value::as_str));

        let first_workspaces = entries
            .iter()
            .take(PREVIEW_WORKSPACES)
            .map(|entry| {
                let name = entry.get("name").and_then(Value::as_str).unwrap_or_default();
                let tab_count = entry.get("tabs").and_then(Value::as_array).map_or(0, Vec::len);
                (name.to_string(), tab_count)
            })
            .collect();

        ImportPreview {
            workspace_count: entries.len(),
            total_tabs: tab_lists.iter().map(|tabs| tabs.len()).sum(),
            domain_count: count_hostnames(urls),
            export_date,
            first_workspaces,
        }
    }

    pub fn message(&self) -> String {
        let date = self.export_date.as_deref().unwrap_or("unknown date");
        let mut message = format!(
            "This will import {} workspaces containing {} tabs across {} domains from {}.",
            self.workspace_count, self.total_tabs, self.domain_count, date
        );
        if !self.first_workspaces.is_empty() {
            message.push_str("\n\nPreview of workspaces:");
            for (name, tab_count) in &self.first_workspaces {
                message.push_str(&format!("\n• {} ({} tabs)", name, tab_count));
            }
            if self.workspace_count > PREVIEW_WORKSPACES {
                message.push_str("\n• ...");
            }
        }
        message.push_str("\n\nDuplicates will be renamed automatically.");
        message
    }
}

/// Workspaces ready to be appended, plus what was left out
#[derive(Debug, Clone, PartialEq)]
pub struct ImportPlan {
    pub workspaces: Vec<Workspace>,
    pub skipped: usize,
    pub preview: ImportPreview,
}

impl ImportPlan {
    pub fn message(&self) -> String {
        if self.skipped > 0 {
            format!("Imported {} workspaces ({} skipped)", self.workspaces.len(), self.skipped)
        } else {
            format!("Successfully imported {} workspaces!", self.workspaces.len())
        }
    }
}

pub fn is_json_filename(name: &str) -> bool {
    name.ends_with(".json")
}

/// JS-style truthiness of an optional JSON field
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// `"<name> (<n>)"` with the smallest n not already taken
fn unique_name(name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(&name.to_lowercase()) {
        return name.to_string();
    }
    let mut counter = 1;
    loop {
        let candidate = format!("{} ({})", name, counter);
        if !taken.contains(&candidate.to_lowercase()) {
            return candidate;
        }
        counter += 1;
    }
}

/// Validate an export file against the existing collection.
///
/// Entries without an id, name or tabs (or that otherwise fail to parse) are
/// skipped. Clashing names are renamed, and every imported workspace gets a
/// fresh id from `new_id`.
pub fn plan_import(
    json: &str,
    existing: &[Workspace],
    mut new_id: impl FnMut() -> String,
) -> Result<ImportPlan, BackupError> {
    let root: Value = serde_json::from_str(json)?;
    let entries = root
        .get("workspaces")
        .and_then(Value::as_array)
        .ok_or(BackupError::MissingWorkspaces)?;
    let export_date = root.get("exportDate").and_then(Value::as_str).map(str::to_string);

    let mut taken: HashSet<String> = existing.iter().map(|w| w.name.to_lowercase()).collect();
    let mut workspaces = Vec::new();
    let mut skipped = 0;

    for entry in entries {
        if !(is_present(entry.get("id")) && is_present(entry.get("name")) && is_present(entry.get("tabs"))) {
            log::warn!("Skipping invalid workspace: {}", entry);
            skipped += 1;
            continue;
        }

        // The id is replaced below, so its type in the file does not matter
        let mut entry = entry.clone();
        entry["id"] = Value::String(String::new());

        let mut workspace = match Workspace::deserialize(entry) {
            Ok(workspace) => workspace,
            Err(e) => {
                log::warn!("Skipping unreadable workspace: {}", e);
                skipped += 1;
                continue;
            }
        };

        workspace.name = unique_name(&workspace.name, &taken);
        taken.insert(workspace.name.to_lowercase());
        workspace.id = new_id();
        workspaces.push(workspace);
    }

    if workspaces.is_empty() {
        return Err(BackupError::NothingToImport);
    }

    Ok(ImportPlan {
        workspaces,
        skipped,
        preview: ImportPreview::from_entries(entries, export_date),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_data::TabSummary;

    fn create_test_workspace(id: &str, name: &str, urls: &[&str]) -> Workspace {
        Workspace {
            id: id.to_string(),
            name: name.to_string(),
            tabs: urls
                .iter()
                .map(|url| TabSummary {
                    title: url.to_string(),
                    url: url.to_string(),
                    fav_icon_url: None,
                    summary: String::new(),
                })
                .collect(),
            created: 1700000000000.0,
            summary: String::new(),
        }
    }

    fn sequential_ids() -> impl FnMut() -> String {
        let mut next = 0;
        move || {
            next += 1;
            format!("new-{}", next)
        }
    }

    #[test]
    fn test_export_bundle() {
        let workspaces = vec![create_test_workspace("1", "Work", &["https://a.test/"])];

        let bundle = ExportBundle::new(&workspaces, "2024-03-05T10:20:30.000Z").unwrap();

        assert_eq!(bundle.version, "1.0.0");
        assert_eq!(bundle.workspace_count, 1);
        assert_eq!(bundle.filename(), "tabrecall-workspaces-2024-03-05.json");

        let json: Value = serde_json::from_str(&bundle.to_json().unwrap()).unwrap();
        assert_eq!(json["exportDate"], "2024-03-05T10:20:30.000Z");
        assert_eq!(json["workspaceCount"], 1);
    }

    #[test]
    fn test_export_requires_workspaces() {
        assert!(matches!(ExportBundle::new(&[], "2024-03-05T10:20:30.000Z"), Err(BackupError::NothingToExport)));
    }

    #[test]
    fn test_import_renames_duplicates_and_assigns_ids() {
        let existing = vec![
            create_test_workspace("a", "Work", &[]),
            create_test_workspace("b", "work (1)", &[]),
        ];
        let file = r#"{
            "version": "1.0.0",
            "exportDate": "2024-03-05T10:20:30.000Z",
            "workspaces": [
                {"id": "1", "name": "WORK", "tabs": [{"title": "A", "url": "https://a.test/", "summary": "a"}]},
                {"id": "2", "name": "Play", "tabs": []},
                {"id": "3", "name": "play", "tabs": []}
            ]
        }"#;

        let plan = plan_import(file, &existing, sequential_ids()).unwrap();

        let names: Vec<&str> = plan.workspaces.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["WORK (2)", "Play", "play (1)"]);
        let ids: Vec<&str> = plan.workspaces.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["new-1", "new-2", "new-3"]);
        assert_eq!(plan.skipped, 0);
        assert_eq!(plan.message(), "Successfully imported 3 workspaces!");
    }

    #[test]
    fn test_import_skips_invalid_entries() {
        let file = r#"{"workspaces": [
            {"id": "1", "name": "Good", "tabs": []},
            {"name": "No id", "tabs": []},
            {"id": "3", "name": "", "tabs": []},
            {"id": "4", "name": "No tabs"},
            {"id": "5", "name": "Bad tabs", "tabs": "nope"}
        ]}"#;

        let plan = plan_import(file, &[], sequential_ids()).unwrap();

        assert_eq!(plan.workspaces.len(), 1);
        assert_eq!(plan.skipped, 4);
        assert_eq!(plan.message(), "Imported 1 workspaces (4 skipped)");
    }

    #[test]
    fn test_import_accepts_numeric_id_and_untitled_tab() {
        let file = r#"{"workspaces": [
            {"id": 17, "name": "N", "tabs": [{"url": "https://a.test/"}]}
        ]}"#;

        let plan = plan_import(file, &[], sequential_ids()).unwrap();

        assert_eq!(plan.skipped, 0);
        assert_eq!(plan.workspaces.len(), 1);
        let workspace = &plan.workspaces[0];
        assert_eq!(workspace.id, "new-1");
        assert_eq!(workspace.tabs[0].url, "https://a.test/");
        assert_eq!(workspace.tabs[0].title, "");
    }

    #[test]
    fn test_import_rejects_bad_files() {
        assert!(matches!(plan_import("not json", &[], sequential_ids()), Err(BackupError::InvalidJson(_))));
        assert!(matches!(
            plan_import(r#"{"workspaces": {}}"#, &[], sequential_ids()),
            Err(BackupError::MissingWorkspaces)
        ));
        assert!(matches!(
            plan_import(r#"{"workspaces": [{"name": "x"}]}"#, &[], sequential_ids()),
            Err(BackupError::NothingToImport)
        ));
    }

    #[test]
    fn test_import_preview() {
        let file = r#"{"exportDate": "2024-03-05T10:20:30.000Z", "workspaces": [
            {"id": "1", "name": "One", "tabs": [{"title": "a", "url": "https://a.test/x"}, {"title": "b", "url": "https://a.test/y"}]},
            {"id": "2", "name": "Two", "tabs": [{"title": "c", "url": "https://c.test/"}]},
            {"id": "3", "name": "Three", "tabs": [{"title": "d", "url": "not a url"}]},
            {"id": "4", "name": "Four", "tabs": []}
        ]}"#;

        let plan = plan_import(file, &[], sequential_ids()).unwrap();
        let preview = &plan.preview;

        assert_eq!(preview.workspace_count, 4);
        assert_eq!(preview.total_tabs, 4);
        assert_eq!(preview.domain_count, 2);
        assert_eq!(
            preview.first_workspaces,
            vec![("One".to_string(), 2), ("Two".to_string(), 1), ("Three".to_string(), 1)]
        );
        assert!(preview.message().contains("This will import 4 workspaces containing 4 tabs across 2 domains"));
        assert!(preview.message().ends_with("Duplicates will be renamed automatically."));
    }

    #[test]
    fn test_json_filename() {
        assert!(is_json_filename("backup.json"));
        assert!(!is_json_filename("backup.txt"));
    }
}
