//! Runtime configuration read from the rendered page.
//!
//! The host server renders the backend base URL into
//! `<meta name="jobdesk-api-base" content="...">`; the browser reads it back at
//! startup so the same WASM bundle can target any backend.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// `name` attribute of the meta tag carrying the backend base URL.
pub const API_BASE_META: &str = "jobdesk-api-base";

/// Backend used when the page carries no usable base URL.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Trim whitespace and trailing slashes; blank input falls back to
/// [`DEFAULT_API_BASE`].
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_API_BASE.to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Backend base URL for this page.
pub fn api_base_url() -> String {
    #[cfg(feature = "hydrate")]
    {
        let content = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.query_selector(&format!("meta[name=\"{API_BASE_META}\"]")).ok().flatten())
            .and_then(|el| el.get_attribute("content"))
            .unwrap_or_default();
        normalize_base_url(&content)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        DEFAULT_API_BASE.to_owned()
    }
}
