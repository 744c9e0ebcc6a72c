//! Shared REST DTOs for the client/backend boundary.
//!
//! DESIGN
//! ======
//! These types mirror backend JSON payloads. Response types are lenient
//! (unknown fields ignored, optional fields defaulted) so backend additions
//! never break decoding; request types serialize exactly the fields the
//! backend expects.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

pub use frames::{Frame, FrameKind, Intent, Usage};

/// A job application tracked by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: String,
    pub institution: String,
    pub position: String,
    #[serde(default)]
    pub current_stage: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Project {
    /// Card heading, e.g. `"Acme - Engineer"`.
    pub fn title(&self) -> String {
        format!("{} - {}", self.institution, self.position)
    }
}

/// Body of `POST /api/projects`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreateProjectRequest {
    pub institution: String,
    pub position: String,
    pub date: String,
}

/// Urgency bucket of a next-step suggestion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionType {
    Critical,
    Recommended,
    #[default]
    #[serde(other)]
    Optional,
}

impl SuggestionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Recommended => "recommended",
            Self::Optional => "optional",
        }
    }
}

/// One next-step suggestion for a project.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "type")]
    pub kind: SuggestionType,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub action: String,
}

/// Response of `GET /suggestions/{project_id}/next-steps`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SuggestionsResponse {
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

/// Body of `POST /api/skills/invoke`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkillInvokeRequest {
    pub project_id: String,
    pub skill_name: String,
    pub prompt: String,
    pub stream: bool,
    pub use_api: bool,
}

/// Project details sent along with a chat message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ChatContext {
    pub institution: String,
    pub position: String,
    pub stage: String,
}

impl From<&Project> for ChatContext {
    fn from(project: &Project) -> Self {
        Self {
            institution: project.institution.clone(),
            position: project.position.clone(),
            stage: project.current_stage.clone(),
        }
    }
}

/// Body of `POST /api/chat/message`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatMessageRequest {
    pub project_id: String,
    pub message: String,
    pub context: ChatContext,
}

/// Acknowledgement of `POST /api/chat/message`. The reply itself streams
/// over the websocket.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ChatAck {
    #[serde(default)]
    pub message_id: String,
    #[serde(default)]
    pub intent: Option<Intent>,
    #[serde(default)]
    pub response_type: String,
    #[serde(default)]
    pub streaming: bool,
}

/// A persisted chat message from `GET /api/chat/history/{project_id}`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct HistoryMessage {
    #[serde(default)]
    pub id: Option<String>,
    pub role: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub messages: Vec<HistoryMessage>,
}

/// Response of `POST /api/files/upload/{project_id}`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct UploadAck {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Response of `GET /health`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.as_str(), "healthy" | "ok")
    }
}
