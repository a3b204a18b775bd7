/// Page content extraction
///
/// The same routine backs both the resident content script and the
/// on-demand injected extractor, so the two delivery paths always produce
/// identical `PageContent` for the same page.
use std::sync::LazyLock;

use regex::Regex;
use wasm_bindgen::JsCast;

use crate::page_data::PageContent;

/// Maximum number of characters kept from the visible page text
pub const MAX_CONTENT_CHARS: usize = 1000;

/// Elements whose text never counts as page content
pub const DENIED_TAGS: [&str; 7] = ["script", "style", "nav", "header", "footer", "iframe", "noscript"];

static DISALLOWED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s.,!?-]").expect("disallowed-character pattern"));

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Read-only view of a loaded page
pub trait PageDom {
    fn title(&self) -> String;

    /// Resolved location of the page
    fn url(&self) -> String;

    /// Content of `meta[name="description"]`, if the page declares one
    fn meta_description(&self) -> Option<String>;

    /// Text of the page body, in document order, with every element named in
    /// `denied` (and everything inside it) left out. Must not touch the live page.
    fn body_text_without(&self, denied: &[&str]) -> String;
}

/// Run the extraction algorithm against a page
pub fn extract_page_content<D: PageDom + ?Sized>(page: &D) -> PageContent {
    let raw_text = page.body_text_without(&DENIED_TAGS);
    let clean_text = sanitize_text(&raw_text);

    PageContent {
        title: page.title(),
        meta_description: page.meta_description().unwrap_or_default(),
        content: truncate_chars(&clean_text, MAX_CONTENT_CHARS).to_string(),
        url: page.url(),
    }
}

/// Drop characters outside `[A-Za-z0-9_\s.,!?-]`, collapse whitespace runs to
/// one space, and trim.
///
/// Stripping happens before collapsing so that removed characters never leave
/// a double space behind.
pub fn sanitize_text(raw: &str) -> String {
    let allowed = DISALLOWED_CHARS.replace_all(raw, "");
    WHITESPACE_RUN.replace_all(&allowed, " ").trim().to_string()
}

/// First `max` characters of `text`, cutting mid-word if needed
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Extract from the document of the current JS realm (content script or
/// injected script). `None` when there is no window or document.
pub fn extract_current_document() -> Option<PageContent> {
    let document = web_sys::window()?.document()?;
    Some(extract_page_content(&document))
}

impl PageDom for web_sys::Document {
    fn title(&self) -> String {
        web_sys::Document::title(self)
    }

    fn url(&self) -> String {
        self.location()
            .and_then(|location| location.href().ok())
            .unwrap_or_default()
    }

    fn meta_description(&self) -> Option<String> {
        self.query_selector(r#"meta[name="description"]"#)
            .ok()
            .flatten()
            .and_then(|meta| meta.get_attribute("content"))
    }

    fn body_text_without(&self, denied: &[&str]) -> String {
        let Some(body) = self.body() else {
            return String::new();
        };

        // Work on a detached deep copy; the live page is never modified
        let clone = match body.clone_node_with_deep(true) {
            Ok(node) => node,
            Err(e) => {
                log::debug!("Failed to clone page body: {:?}", e);
                return String::new();
            }
        };
        let Ok(clone) = clone.dyn_into::<web_sys::Element>() else {
            return String::new();
        };

        for tag in denied {
            // Live collection: it shrinks as matches are removed
            let matches = clone.get_elements_by_tag_name(tag);
            while let Some(element) = matches.item(0) {
                element.remove();
            }
        }

        clone.text_content().unwrap_or_default()
    }
}
