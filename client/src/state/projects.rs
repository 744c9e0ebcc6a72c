//! Project list state for the dashboard.
//!
//! DESIGN
//! ======
//! The list is loaded once per dashboard visit. Created projects are prepended
//! locally from the create response and never reconciled against a reload.

#[cfg(test)]
#[path = "projects_test.rs"]
mod projects_test;

use crate::net::types::{CreateProjectRequest, HealthStatus, Project};

/// Backend reachability shown as a badge on the dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendHealth {
    #[default]
    Unknown,
    Healthy,
    Unreachable,
}

impl BackendHealth {
    pub fn from_check<E>(result: &Result<HealthStatus, E>) -> Self {
        match result {
            Ok(status) if status.is_healthy() => Self::Healthy,
            _ => Self::Unreachable,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "Checking backend...",
            Self::Healthy => "Backend online",
            Self::Unreachable => "Backend unreachable",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectsState {
    pub items: Vec<Project>,
    pub loading: bool,
    pub health: BackendHealth,
}

impl ProjectsState {
    /// Apply a list result. Failures leave the list empty; the caller logs them.
    pub fn finish_load<E>(&mut self, result: Result<Vec<Project>, E>) -> Option<E> {
        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                None
            }
            Err(err) => {
                self.items.clear();
                Some(err)
            }
        }
    }

    /// Put a freshly created project at the top of the list.
    pub fn prepend_created(&mut self, project: Project) {
        self.items.insert(0, project);
    }

    pub fn is_empty(&self) -> bool {
        !self.loading && self.items.is_empty()
    }
}

/// Validation failure of the create-project form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("{0} is required")]
    Missing(&'static str),
}

/// Create-project form contents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectDraft {
    pub institution: String,
    pub position: String,
    /// `YYYY-MM-DD`.
    pub date: String,
}

impl ProjectDraft {
    /// Empty form dated `today`.
    pub fn dated(today: String) -> Self {
        Self {
            date: today,
            ..Self::default()
        }
    }

    /// Build the request, trimming fields.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::Missing`] naming the first blank field.
    pub fn to_request(&self) -> Result<CreateProjectRequest, DraftError> {
        let institution = self.institution.trim();
        let position = self.position.trim();
        let date = self.date.trim();
        if institution.is_empty() {
            return Err(DraftError::Missing("Institution"));
        }
        if position.is_empty() {
            return Err(DraftError::Missing("Position"));
        }
        if date.is_empty() {
            return Err(DraftError::Missing("Date"));
        }
        Ok(CreateProjectRequest {
            institution: institution.to_owned(),
            position: position.to_owned(),
            date: date.to_owned(),
        })
    }
}
