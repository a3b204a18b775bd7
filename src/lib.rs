/// Tab Recall - Chrome Extension for saving and searching tab workspaces
/// Built with Rust + WASM + Yew

pub mod background;
pub mod backup;
pub mod channel;
pub mod chrome;
pub mod domain;
pub mod extractor;
pub mod operations;
pub mod page_data;
pub mod search;
pub mod storage;
pub mod summarizer;
pub mod ui;

use wasm_bindgen::prelude::*;

use crate::channel::ExtractionChannel;
use crate::chrome::{js_error_message, ChromeHost};
use crate::page_data::RuntimeRequest;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

fn to_js_error(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Extract the current page. Called by the resident content script and by
/// the injected extractor alike.
#[wasm_bindgen]
pub fn extract_page() -> Result<JsValue, JsValue> {
    let content = extractor::extract_current_document().ok_or_else(|| JsValue::from_str("No document available"))?;
    serde_wasm_bindgen::to_value(&content).map_err(to_js_error)
}

/// Handle a `chrome.runtime` message in the background worker. Resolves to
/// `undefined` for messages the worker does not answer.
#[wasm_bindgen]
pub async fn handle_background_message(message: JsValue) -> Result<JsValue, JsValue> {
    let request: RuntimeRequest = match serde_wasm_bindgen::from_value(message) {
        Ok(request) => request,
        Err(e) => {
            log::debug!("Ignoring runtime message: {}", e);
            return Ok(JsValue::UNDEFINED);
        }
    };

    let channel = ExtractionChannel::new(ChromeHost);
    match background::route_request(&channel, request).await {
        Some(summary) => serde_wasm_bindgen::to_value(&summary).map_err(to_js_error),
        None => Ok(JsValue::UNDEFINED),
    }
}

#[wasm_bindgen]
pub async fn omnibox_input_changed(text: String) -> Result<JsValue, JsValue> {
    let store = chrome::load_workspaces().await.map_err(to_js_error)?;
    let suggestions = background::omnibox_input_changed(&store, &text);
    serde_wasm_bindgen::to_value(&suggestions).map_err(to_js_error)
}

#[wasm_bindgen]
pub async fn omnibox_input_entered(workspace_id: String) -> Result<(), JsValue> {
    let store = chrome::load_workspaces().await.map_err(to_js_error)?;
    match background::omnibox_input_entered(&store, &workspace_id) {
        Some(urls) => chrome::open_in_window(&urls).await.map_err(to_js_error),
        None => {
            log::debug!("No workspace with id {}", workspace_id);
            Ok(())
        }
    }
}

/// Log a failure raised by one of the JS bridge scripts
#[wasm_bindgen]
pub fn report_bridge_error(context: &str, error: JsValue) {
    log::error!("{}: {}", context, js_error_message(&error));
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}
