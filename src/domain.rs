/// Hostname helpers for workspace statistics and import previews
use std::collections::HashSet;

use url::Url;

/// Hostname of a URL; empty for URLs without a host (e.g. `about:blank`).
/// `None` when the URL does not parse.
pub fn hostname(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .map(|parsed| parsed.host_str().unwrap_or_default().to_lowercase())
}

/// Number of distinct hostnames; URLs that do not parse are ignored
pub fn count_hostnames<'a>(urls: impl IntoIterator<Item = &'a str>) -> usize {
    urls.into_iter().filter_map(hostname).collect::<HashSet<_>>().len()
}

/// Number of distinct hostnames, with every unparsable URL counted once as
/// "unknown"
pub fn count_hostnames_with_unknown<'a>(urls: impl IntoIterator<Item = &'a str>) -> usize {
    urls.into_iter()
        .map(|url| hostname(url).unwrap_or_else(|| "unknown".to_string()))
        .collect::<HashSet<_>>()
        .len()
}
