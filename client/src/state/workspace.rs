//! Project workspace state: active project, socket status, file selection.

#[cfg(test)]
#[path = "workspace_test.rs"]
mod workspace_test;

use crate::net::types::{Frame, Project};

/// Documents the skills write into a project, in workflow order.
pub const PROJECT_FILES: [&str; 3] = ["01-job-analysis.md", "02-fit-analysis.md", "03-cover-letter.md"];

/// Lifecycle of the workspace websocket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Disconnected => "Disconnected",
            Self::Connecting => "Connecting...",
            Self::Connected => "Connected",
        }
    }

    pub fn css_modifier(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkspaceState {
    pub project_id: String,
    pub project: Option<Project>,
    /// The project list loaded but did not contain `project_id`.
    pub project_missing: bool,
    pub connection: ConnectionStatus,
    pub selected_file: Option<String>,
}

impl WorkspaceState {
    pub fn for_project(project_id: &str) -> Self {
        Self {
            project_id: project_id.to_owned(),
            ..Self::default()
        }
    }

    /// Pick this workspace's project out of the full list.
    pub fn resolve_project(&mut self, projects: &[Project]) {
        self.project = projects
            .iter()
            .find(|p| p.project_id == self.project_id)
            .cloned();
        self.project_missing = self.project.is_none();
    }

    /// Heading for the workspace page.
    pub fn title(&self) -> String {
        self.project
            .as_ref()
            .map_or_else(|| self.project_id.clone(), Project::title)
    }

    pub fn select_file(&mut self, filename: &str) {
        self.selected_file = Some(filename.to_owned());
    }

    /// Track connection-related frames. Returns `true` if the frame was
    /// consumed.
    pub fn apply_frame(&mut self, frame: &Frame) -> bool {
        match frame {
            Frame::Connection { status, .. } => {
                if status == "connected" {
                    self.connection = ConnectionStatus::Connected;
                }
                true
            }
            _ => false,
        }
    }
}
