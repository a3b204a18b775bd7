/// Two-path delivery of page content from a tab to the background worker
///
/// Path A asks the resident content script for the page content. If that
/// fails for any reason, path B injects the extractor into the tab on demand.
/// Every failure collapses into `None`; nothing escapes `ExtractionChannel::extract`.
use thiserror::Error;
use url::Url;

use crate::page_data::{PageContent, TabDescriptor};

/// Substring Chrome uses when a message has no listener on the other end
pub const NO_RECEIVER_MESSAGE: &str = "Receiving end does not exist";

/// Failure reported by a messaging or scripting primitive
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChannelError {
    /// Nothing in the page is listening (content script not loaded yet)
    #[error("no receiver is listening in the page")]
    NoReceiver,
    #[error("{0}")]
    Other(String),
}

impl ChannelError {
    /// Classify a raw error message from the extension APIs.
    ///
    /// `chrome.tabs.sendMessage` rejects with a plain `Error` and no code,
    /// so the missing-listener case can only be told apart by its message.
    pub fn from_message(message: &str) -> ChannelError {
        if message.contains(NO_RECEIVER_MESSAGE) {
            ChannelError::NoReceiver
        } else {
            ChannelError::Other(message.to_string())
        }
    }
}

/// The delivery path a diagnostic came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelPath {
    Resident,
    Injected,
}

/// The extension primitives the channel is built on
#[allow(async_fn_in_trait)]
pub trait ExtractionHost {
    /// Send `{action: "extractContent"}` to the tab's resident listener
    async fn request_extraction(&self, tab_id: i32) -> Result<PageContent, ChannelError>;

    /// Inject the extractor into the tab and return its result
    async fn inject_extractor(&self, tab_id: i32) -> Result<PageContent, ChannelError>;

    /// Surface a non-silent failure
    fn report(&self, path: ChannelPath, error: &ChannelError) {
        match path {
            ChannelPath::Resident => log::warn!("Error extracting content via message: {}", error),
            ChannelPath::Injected => log::error!("Error extracting content via injected script: {}", error),
        }
    }
}

/// Only http(s) pages can host a content script
pub fn is_extractable_url(url: &str) -> bool {
    Url::parse(url)
        .map(|parsed| matches!(parsed.scheme(), "http" | "https"))
        .unwrap_or(false)
}

pub struct ExtractionChannel<H> {
    host: H,
}

impl<H: ExtractionHost> ExtractionChannel<H> {
    pub fn new(host: H) -> ExtractionChannel<H> {
        ExtractionChannel { host }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Page content for `tab`, or `None` when no path could provide it
    pub async fn extract(&self, tab: &TabDescriptor) -> Option<PageContent> {
        if !is_extractable_url(&tab.url) {
            return None;
        }

        if let Some(content) = self.try_resident(tab.id).await {
            return Some(content);
        }

        self.try_injected(tab.id).await
    }

    async fn try_resident(&self, tab_id: i32) -> Option<PageContent> {
        match self.host.request_extraction(tab_id).await {
            Ok(content) => Some(content),
            Err(ChannelError::NoReceiver) => None,
            Err(error) => {
                self.host.report(ChannelPath::Resident, &error);
                None
            }
        }
    }

    async fn try_injected(&self, tab_id: i32) -> Option<PageContent> {
        match self.host.inject_extractor(tab_id).await {
            Ok(content) => Some(content),
            Err(error) => {
                self.host.report(ChannelPath::Injected, &error);
                None
            }
        }
    }
}
