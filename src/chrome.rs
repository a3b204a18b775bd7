/// Bindings to the extension APIs exposed by `extension.js`
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::channel::{ChannelError, ExtractionHost};
use crate::page_data::{PageContent, RuntimeRequest, TabDescriptor, TabSummary, Workspace};
use crate::storage::{WorkspaceStore, WORKSPACES_KEY};

// Import JS bridge functions
#[wasm_bindgen(module = "/extension.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn sendTabMessage(tab_id: i32, message: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn executeExtractor(tab_id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn sendRuntimeMessage(message: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getCurrentWindowTabs() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn openWindow(urls: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn openTab(url: &str) -> Result<(), JsValue>;

    fn exportToFile(data: &str, filename: &str);
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("{operation} failed: {message}")]
    Js { operation: &'static str, message: String },
    #[error("Failed to convert {what}: {source}")]
    Convert {
        what: &'static str,
        #[source]
        source: serde_wasm_bindgen::Error,
    },
    #[error("{0} returned no value")]
    Empty(&'static str),
}

/// Best-effort message of a rejected promise
pub fn js_error_message(error: &JsValue) -> String {
    if let Some(error) = error.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    error.as_string().unwrap_or_else(|| format!("{:?}", error))
}

fn js_failure(operation: &'static str) -> impl Fn(JsValue) -> BridgeError {
    move |error| BridgeError::Js {
        operation,
        message: js_error_message(&error),
    }
}

fn to_js<T: serde::Serialize>(value: &T, what: &'static str) -> Result<JsValue, BridgeError> {
    serde_wasm_bindgen::to_value(value).map_err(|source| BridgeError::Convert { what, source })
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue, what: &'static str) -> Result<T, BridgeError> {
    if value.is_null() || value.is_undefined() {
        return Err(BridgeError::Empty(what));
    }
    serde_wasm_bindgen::from_value(value).map_err(|source| BridgeError::Convert { what, source })
}

fn page_content_from_reply(reply: JsValue) -> Result<PageContent, ChannelError> {
    from_js(reply, "page content").map_err(|e| ChannelError::Other(e.to_string()))
}

/// `ExtractionHost` backed by `chrome.tabs.sendMessage` and `chrome.scripting`
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeHost;

impl ExtractionHost for ChromeHost {
    async fn request_extraction(&self, tab_id: i32) -> Result<PageContent, ChannelError> {
        let message = to_js(&RuntimeRequest::ExtractContent, "extract request")
            .map_err(|e| ChannelError::Other(e.to_string()))?;
        let reply = sendTabMessage(tab_id, message)
            .await
            .map_err(|e| ChannelError::from_message(&js_error_message(&e)))?;
        page_content_from_reply(reply)
    }

    async fn inject_extractor(&self, tab_id: i32) -> Result<PageContent, ChannelError> {
        let result = executeExtractor(tab_id)
            .await
            .map_err(|e| ChannelError::Other(js_error_message(&e)))?;
        page_content_from_reply(result)
    }
}

pub async fn current_window_tabs() -> Result<Vec<TabDescriptor>, BridgeError> {
    let tabs = getCurrentWindowTabs().await.map_err(js_failure("Query tabs"))?;
    from_js(tabs, "tabs")
}

/// Ask the background worker to summarize one tab
pub async fn request_tab_summary(tab: &TabDescriptor) -> Result<TabSummary, BridgeError> {
    let message = to_js(&RuntimeRequest::SummarizeTab { tab: tab.clone() }, "summarize request")?;
    let reply = sendRuntimeMessage(message).await.map_err(js_failure("Summarize tab"))?;
    from_js(reply, "tab summary")
}

pub async fn load_workspaces() -> Result<WorkspaceStore, BridgeError> {
    let stored = getStorage(WORKSPACES_KEY).await.map_err(js_failure("Read storage"))?;
    if stored.is_null() || stored.is_undefined() {
        return Ok(WorkspaceStore::new());
    }
    let workspaces: Vec<Workspace> = from_js(stored, "workspaces")?;
    Ok(WorkspaceStore::from(workspaces))
}

pub async fn save_workspaces(store: &WorkspaceStore) -> Result<(), BridgeError> {
    let value = to_js(&store.workspaces, "workspaces")?;
    setStorage(WORKSPACES_KEY, value).await.map_err(js_failure("Write storage"))?;
    log::debug!("Stored {} workspaces", store.len());
    Ok(())
}

/// Open every URL in a new window
pub async fn open_in_window(urls: &[String]) -> Result<(), BridgeError> {
    let value = to_js(&urls, "urls")?;
    openWindow(value).await.map_err(js_failure("Open window"))
}

pub async fn open_in_tab(url: &str) -> Result<(), BridgeError> {
    openTab(url).await.map_err(js_failure("Open tab"))
}

pub fn download_file(data: &str, filename: &str) {
    exportToFile(data, filename);
}
