//! Next-step suggestions state and click-action parsing.
//!
//! Clicking a suggestion only surfaces a notice; running the named skill from
//! here is intentionally left unwired.

#[cfg(test)]
#[path = "suggestions_test.rs"]
mod suggestions_test;

use crate::net::types::Suggestion;

pub const UPLOAD_NOTICE: &str = "Please use the File Upload section above to add your job posting.";
pub const REVIEW_NOTICE: &str = "Review your completed documents in the preview panel.";

/// Parsed `action` string of a suggestion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SuggestionAction {
    /// `run_skill:<name>`
    RunSkill(String),
    /// `upload_file`
    UploadFile,
    /// `review`
    Review,
    Other(String),
}

impl SuggestionAction {
    pub fn parse(action: &str) -> Self {
        let action = action.trim();
        if let Some(skill) = action.strip_prefix("run_skill:") {
            return Self::RunSkill(skill.trim().to_owned());
        }
        match action {
            "upload_file" => Self::UploadFile,
            "review" => Self::Review,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Notice to show the user. `None` for actions that are only logged.
    pub fn notice(&self) -> Option<String> {
        match self {
            Self::RunSkill(skill) => Some(format!("Would run skill: {skill}")),
            Self::UploadFile => Some(UPLOAD_NOTICE.to_owned()),
            Self::Review => Some(REVIEW_NOTICE.to_owned()),
            Self::Other(_) => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SuggestionsState {
    pub items: Vec<Suggestion>,
    pub loading: bool,
    pub error: Option<String>,
    /// Last click notice.
    pub notice: Option<String>,
}

impl SuggestionsState {
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn finish_load(&mut self, items: Vec<Suggestion>) {
        self.loading = false;
        self.error = None;
        self.items = items;
    }

    /// Keep the previous items so a failed refresh does not blank the panel.
    pub fn fail_load(&mut self, error: impl Into<String>) {
        self.loading = false;
        self.error = Some(error.into());
    }

    /// Handle a click on `suggestion`; returns the parsed action.
    pub fn click(&mut self, suggestion: &Suggestion) -> SuggestionAction {
        let action = SuggestionAction::parse(&suggestion.action);
        self.notice = action.notice();
        action
    }
}
