//! Hyperlink extraction from evidence text.
//!
//! Every occurrence of an `http`/`https` URL yields its own [`LinkReference`], in first-occurrence
//! order. Repeated URLs are kept: a document citing the same source several times carries that
//! signal into its bubble.

use crate::properties::LinkReference;
use once_cell::sync::Lazy;
use regex::Regex;

/// Scheme, host, optional port, then optional path, query and fragment.
const URL_PATTERN: &str =
    r"https?://(?:[-\w.])+(?:[:\d]+)?(?:/(?:[\w/_.])*(?:\?(?:[\w&=%.])*)?(?:#(?:[\w.])*)?)?";

/// Authority (`host[:port]`) of a matched URL.
const AUTHORITY_PATTERN: &str = r"https?://([^/]+)";

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(URL_PATTERN).expect("URL_PATTERN is valid"));
static AUTHORITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(AUTHORITY_PATTERN).expect("AUTHORITY_PATTERN is valid"));

/// Extract every URL in `text`, left to right.
pub fn extract_links(text: &str) -> Vec<LinkReference> {
    URL_RE
        .find_iter(text)
        .map(|m| {
            let href = m.as_str();
            LinkReference {
                href: href.to_string(),
                title: link_title(href),
            }
        })
        .collect()
}

/// The display title for a URL: its authority, or the URL itself if none can be recovered.
pub fn link_title(href: &str) -> String {
    AUTHORITY_RE
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|authority| authority.as_str().to_string())
        .unwrap_or_else(|| href.to_string())
}
