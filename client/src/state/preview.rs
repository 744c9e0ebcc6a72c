//! Document preview state (HTML or paginated PDF).
//!
//! DESIGN
//! ======
//! A load is keyed on `(project_id, filename, mode)`. [`PreviewState::begin_load`]
//! answers whether the key changed, which is the only time the panel fetches;
//! results are applied only while their key is still current, so a slow
//! response for an old file or mode never overwrites the newer one.
//!
//! LIMITATIONS
//! ===========
//! PDF pages are shown through the browser's built-in viewer, opened at
//! `#page=N`. The viewer still lets the user scroll to other pages, so the
//! pager only moves the starting page. [`pdf_page_count`] scans for plain
//! page objects; PDFs that keep them in compressed object streams report no
//! count, and the pager stays hidden while the document opens on page 1.

#[cfg(test)]
#[path = "preview_test.rs"]
mod preview_test;

/// Message shown when no file is selected.
pub const NO_SELECTION_MESSAGE: &str = "Select a file to preview";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PreviewMode {
    #[default]
    Html,
    Pdf,
}

impl PreviewMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Html => "HTML",
            Self::Pdf => "PDF",
        }
    }
}

/// Identity of one preview load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewKey {
    pub project_id: String,
    pub filename: String,
    pub mode: PreviewMode,
}

/// Loaded preview body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PreviewContent {
    Html(String),
    /// Object URL for the PDF bytes plus its page count, when known.
    Pdf { url: String, page_count: Option<u32> },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreviewState {
    pub mode: PreviewMode,
    pub key: Option<PreviewKey>,
    pub loading: bool,
    pub error: Option<String>,
    pub content: Option<PreviewContent>,
    /// 1-based PDF page.
    pub page: u32,
}

impl PreviewState {
    /// Start loading `key`. Returns `false` when `key` is already current, in
    /// which case nothing changes and no fetch should be issued.
    pub fn begin_load(&mut self, key: PreviewKey) -> bool {
        if self.key.as_ref() == Some(&key) {
            return false;
        }
        self.mode = key.mode;
        self.key = Some(key);
        self.loading = true;
        self.error = None;
        self.content = None;
        self.page = 1;
        true
    }

    /// Drop the current key (no file selected).
    pub fn clear(&mut self) {
        self.key = None;
        self.loading = false;
        self.error = None;
        self.content = None;
        self.page = 1;
    }

    fn is_current(&self, key: &PreviewKey) -> bool {
        self.key.as_ref() == Some(key)
    }

    /// Store a loaded body for `key`. Returns `false` (and discards the body)
    /// if `key` is stale.
    pub fn finish_load(&mut self, key: &PreviewKey, content: PreviewContent) -> bool {
        if !self.is_current(key) {
            return false;
        }
        self.loading = false;
        self.error = None;
        self.content = Some(content);
        self.page = 1;
        true
    }

    /// Store a load failure for `key`. Returns `false` if `key` is stale.
    pub fn fail_load(&mut self, key: &PreviewKey, error: impl Into<String>) -> bool {
        if !self.is_current(key) {
            return false;
        }
        self.loading = false;
        self.error = Some(error.into());
        self.content = None;
        true
    }

    /// Known page count of the loaded PDF.
    pub fn page_count(&self) -> Option<u32> {
        match &self.content {
            Some(PreviewContent::Pdf { page_count, .. }) => *page_count,
            _ => None,
        }
    }

    /// Whether Previous/Next navigation applies.
    pub fn has_pagination(&self) -> bool {
        self.page_count().is_some_and(|n| n > 1)
    }

    pub fn can_go_previous(&self) -> bool {
        self.has_pagination() && self.page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.page_count().is_some_and(|n| self.page < n)
    }

    pub fn previous_page(&mut self) {
        if self.can_go_previous() {
            self.page -= 1;
        }
    }

    pub fn next_page(&mut self) {
        if self.can_go_next() {
            self.page += 1;
        }
    }

    /// `"Page X of Y"` for paginated documents.
    pub fn page_label(&self) -> Option<String> {
        self.page_count()
            .map(|count| format!("Page {} of {count}", self.page))
    }

    /// Object URL that opens the loaded PDF on the current page.
    pub fn pdf_page_url(&self) -> Option<String> {
        match &self.content {
            Some(PreviewContent::Pdf { url, .. }) => Some(format!("{url}#page={}", self.page)),
            _ => None,
        }
    }

    /// Object URL held by the current content, so it can be revoked.
    pub fn object_url(&self) -> Option<&str> {
        match &self.content {
            Some(PreviewContent::Pdf { url, .. }) => Some(url),
            _ => None,
        }
    }
}

/// Count page objects (`/Type /Page`, not `/Pages`) in raw PDF bytes.
///
/// Returns `None` when the bytes do not look like a PDF or hold no page
/// objects, e.g. when pages live inside compressed object streams.
pub fn pdf_page_count(bytes: &[u8]) -> Option<u32> {
    if !bytes.starts_with(b"%PDF") {
        return None;
    }
    let mut count = 0u32;
    let mut rest = bytes;
    while let Some(pos) = find(rest, b"/Type") {
        rest = &rest[pos + b"/Type".len()..];
        let value = skip_pdf_whitespace(rest);
        if let Some(after) = value.strip_prefix(b"/Page") {
            if !after.first().is_some_and(u8::is_ascii_alphanumeric) {
                count += 1;
            }
        }
    }
    (count > 0).then_some(count)
}

fn skip_pdf_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b'\x0c' | b'\0'))
        .unwrap_or(bytes.len());
    &bytes[start..]
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
