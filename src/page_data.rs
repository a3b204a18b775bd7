/// Data structures shared by the extraction pipeline and the workspace store
use serde::{Deserialize, Serialize};

/// Sanitized content extracted from a loaded page
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    pub title: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub content: String,
    pub url: String,
}

/// A browser tab as reported by `chrome.tabs`; unknown fields are ignored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabDescriptor {
    pub id: i32,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fav_icon_url: Option<String>,
}

impl TabDescriptor {
    pub fn new(id: i32, url: &str, title: &str, fav_icon_url: Option<&str>) -> TabDescriptor {
        TabDescriptor {
            id,
            url: url.to_string(),
            title: title.to_string(),
            fav_icon_url: fav_icon_url.map(str::to_string),
        }
    }
}

/// The per-tab record stored inside a workspace
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabSummary {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fav_icon_url: Option<String>,
    #[serde(default)]
    pub summary: String,
}

/// A named, saved set of tabs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Workspace {
    pub id: String,
    pub name: String,
    pub tabs: Vec<TabSummary>,
    /// Milliseconds since the epoch
    #[serde(default)]
    pub created: f64,
    #[serde(default)]
    pub summary: String,
}

/// Messages understood by the background worker and the content script
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum RuntimeRequest {
    ExtractContent,
    SummarizeTab { tab: TabDescriptor },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_descriptor_ignores_extra_fields() {
        let json = r#"{
            "id": 7,
            "url": "https://example.com/",
            "title": "Example",
            "favIconUrl": "https://example.com/favicon.ico",
            "pinned": true,
            "windowId": 3
        }"#;

        let tab: TabDescriptor = serde_json::from_str(json).unwrap();

        assert_eq!(tab.id, 7);
        assert_eq!(tab.title, "Example");
        assert_eq!(tab.fav_icon_url.as_deref(), Some("https://example.com/favicon.ico"));
    }

    #[test]
    fn test_tab_descriptor_without_favicon() {
        let tab: TabDescriptor =
            serde_json::from_str(r#"{"id": 1, "url": "chrome://newtab/", "title": "New Tab"}"#).unwrap();

        assert_eq!(tab.fav_icon_url, None);
    }

    #[test]
    fn test_page_content_uses_camel_case() {
        let content = PageContent {
            title: "Test Page".to_string(),
            meta_description: "A test page.".to_string(),
            content: String::new(),
            url: "https://example.com/".to_string(),
        };

        let value = serde_json::to_value(&content).unwrap();

        assert_eq!(value["metaDescription"], "A test page.");
        assert!(value.get("meta_description").is_none());
    }

    #[test]
    fn test_runtime_request_actions() {
        let extract: RuntimeRequest = serde_json::from_str(r#"{"action": "extractContent"}"#).unwrap();
        assert_eq!(extract, RuntimeRequest::ExtractContent);

        let summarize: RuntimeRequest = serde_json::from_str(
            r#"{"action": "summarizeTab", "tab": {"id": 4, "url": "https://a.test/", "title": "A"}}"#,
        )
        .unwrap();
        match summarize {
            RuntimeRequest::SummarizeTab { tab } => assert_eq!(tab.id, 4),
            other => panic!("unexpected request: {:?}", other),
        }

        assert!(serde_json::from_str::<RuntimeRequest>(r#"{"action": "reload"}"#).is_err());
    }

    #[test]
    fn test_workspace_tolerates_missing_summary_fields() {
        let json = r#"{
            "id": "1700000000000",
            "name": "Research",
            "tabs": [{"title": "Rust", "url": "https://www.rust-lang.org/"}]
        }"#;

        let workspace: Workspace = serde_json::from_str(json).unwrap();

        assert_eq!(workspace.tabs[0].summary, "");
        assert_eq!(workspace.summary, "");
        assert_eq!(workspace.created, 0.0);
    }
}
