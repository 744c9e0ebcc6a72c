//! REST API client for the job-application backend.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): every call returns [`ApiError::Unavailable`] since these
//! endpoints are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Calls return `Result<_, ApiError>` and never retry. Callers decide whether a
//! failure becomes an alert, a log line, or inline error state.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::types::{
    ChatAck, ChatMessageRequest, CreateProjectRequest, HealthStatus, HistoryMessage, HistoryResponse, Project,
    SkillInvokeRequest, Suggestion, SuggestionsResponse,
};
#[cfg(feature = "hydrate")]
use super::types::UploadAck;
use crate::config;

/// Failure of a backend call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),
    /// The backend answered with a non-2xx status.
    #[error("{}", status_failed_message(*status, detail.as_deref()))]
    Status { status: u16, detail: Option<String> },
    /// The response body did not decode as expected.
    #[error("invalid response body: {0}")]
    Decode(String),
    /// Called outside a browser.
    #[error("not available on server")]
    Unavailable,
}

impl ApiError {
    /// The backend's `detail` text when it sent one, otherwise `fallback`.
    pub fn detail_or(&self, fallback: &str) -> String {
        match self {
            Self::Status { detail: Some(detail), .. } => detail.clone(),
            _ => fallback.to_owned(),
        }
    }
}

fn status_failed_message(status: u16, detail: Option<&str>) -> String {
    match detail {
        Some(detail) => format!("request failed with status {status}: {detail}"),
        None => format!("request failed with status {status}"),
    }
}

/// Pull the backend's `detail` string out of an error body, if it has one.
#[cfg(any(test, feature = "hydrate"))]
fn error_detail(body: &str) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

pub(crate) const HEALTH_ENDPOINT: &str = "/health";
pub(crate) const PROJECTS_ENDPOINT: &str = "/api/projects";
pub(crate) const SKILL_INVOKE_ENDPOINT: &str = "/api/skills/invoke";
pub(crate) const CHAT_MESSAGE_ENDPOINT: &str = "/api/chat/message";

#[cfg(any(test, feature = "hydrate"))]
fn upload_endpoint(project_id: &str) -> String {
    format!("/api/files/upload/{project_id}")
}

fn chat_history_endpoint(project_id: &str) -> String {
    format!("/api/chat/history/{project_id}")
}

fn preview_html_endpoint(project_id: &str, filename: &str) -> String {
    format!("/api/preview/html/{project_id}/{filename}")
}

fn preview_pdf_endpoint(project_id: &str, filename: &str) -> String {
    format!("/api/preview/pdf/{project_id}/{filename}")
}

fn next_steps_endpoint(project_id: &str) -> String {
    format!("/suggestions/{project_id}/next-steps")
}

#[cfg(feature = "hydrate")]
fn transport_error(err: gloo_net::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

#[cfg(feature = "hydrate")]
fn js_error(err: wasm_bindgen::JsValue) -> ApiError {
    ApiError::Transport(format!("{err:?}"))
}

/// Turn a non-2xx response into [`ApiError::Status`].
#[cfg(feature = "hydrate")]
async fn check_status(resp: gloo_net::http::Response) -> Result<gloo_net::http::Response, ApiError> {
    if resp.ok() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status,
        detail: error_detail(&body),
    })
}

/// HTTP client bound to one backend base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiClient {
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(config::DEFAULT_API_BASE)
    }
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: config::normalize_base_url(base_url),
        }
    }

    /// Client for the backend named by the page's config meta tag.
    pub fn from_page() -> Self {
        Self::new(&config::api_base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a backend path starting with `/`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    // =============================================================
    // Generic verbs
    // =============================================================

    /// `GET` a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or a body
    /// that does not decode as `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::get(&self.url(path))
                .send()
                .await
                .map_err(transport_error)?;
            let resp = check_status(resp).await?;
            resp.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = path;
            Err(ApiError::Unavailable)
        }
    }

    /// `GET` a text body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or non-2xx status.
    pub async fn get_text(&self, path: &str) -> Result<String, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::get(&self.url(path))
                .send()
                .await
                .map_err(transport_error)?;
            let resp = check_status(resp).await?;
            resp.text().await.map_err(|e| ApiError::Decode(e.to_string()))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = path;
            Err(ApiError::Unavailable)
        }
    }

    /// `GET` a binary body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or non-2xx status.
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::get(&self.url(path))
                .send()
                .await
                .map_err(transport_error)?;
            let resp = check_status(resp).await?;
            resp.binary().await.map_err(|e| ApiError::Decode(e.to_string()))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = path;
            Err(ApiError::Unavailable)
        }
    }

    /// `POST` a JSON body and decode a JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or a body
    /// that does not decode as `T`.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::post(&self.url(path))
                .json(body)
                .map_err(transport_error)?
                .send()
                .await
                .map_err(transport_error)?;
            let resp = check_status(resp).await?;
            resp.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (path, body);
            Err(ApiError::Unavailable)
        }
    }

    /// `POST` one file as multipart form data under `field`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the form cannot be built, on transport
    /// failure, non-2xx status, or an undecodable body.
    #[cfg(feature = "hydrate")]
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        field: &str,
        file: &web_sys::File,
    ) -> Result<T, ApiError> {
        let form = web_sys::FormData::new().map_err(js_error)?;
        form.append_with_blob_and_filename(field, file, &file.name())
            .map_err(js_error)?;
        let resp = gloo_net::http::Request::post(&self.url(path))
            .body(form)
            .map_err(transport_error)?
            .send()
            .await
            .map_err(transport_error)?;
        let resp = check_status(resp).await?;
        resp.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
    }

    // =============================================================
    // Backend operations
    // =============================================================

    /// `GET /health`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get_json`].
    pub async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        self.get_json(HEALTH_ENDPOINT).await
    }

    /// All projects, in backend order.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get_json`].
    pub async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.get_json(PROJECTS_ENDPOINT).await
    }

    /// Create a project and return it with its server-assigned id.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::post_json`].
    pub async fn create_project(&self, request: &CreateProjectRequest) -> Result<Project, ApiError> {
        self.post_json(PROJECTS_ENDPOINT, request).await
    }

    /// Upload one file into a project's directory.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::post_multipart`].
    #[cfg(feature = "hydrate")]
    pub async fn upload_file(&self, project_id: &str, file: &web_sys::File) -> Result<UploadAck, ApiError> {
        self.post_multipart(&upload_endpoint(project_id), "file", file)
            .await
    }

    /// Start a skill run. Output streams over the project websocket.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::post_json`].
    pub async fn invoke_skill(&self, request: &SkillInvokeRequest) -> Result<serde_json::Value, ApiError> {
        self.post_json(SKILL_INVOKE_ENDPOINT, request).await
    }

    /// Post a chat message. The reply streams over the project websocket.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::post_json`].
    pub async fn send_chat_message(&self, request: &ChatMessageRequest) -> Result<ChatAck, ApiError> {
        self.post_json(CHAT_MESSAGE_ENDPOINT, request).await
    }

    /// Persisted chat messages for a project.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get_json`].
    pub async fn chat_history(&self, project_id: &str) -> Result<Vec<HistoryMessage>, ApiError> {
        let resp: HistoryResponse = self.get_json(&chat_history_endpoint(project_id)).await?;
        Ok(resp.messages)
    }

    /// Rendered HTML for a project file.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get_text`].
    pub async fn preview_html(&self, project_id: &str, filename: &str) -> Result<String, ApiError> {
        self.get_text(&preview_html_endpoint(project_id, filename))
            .await
    }

    /// PDF rendering of a project file.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get_bytes`].
    pub async fn preview_pdf(&self, project_id: &str, filename: &str) -> Result<Vec<u8>, ApiError> {
        self.get_bytes(&preview_pdf_endpoint(project_id, filename))
            .await
    }

    /// Next-step suggestions for a project.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get_json`].
    pub async fn next_steps(&self, project_id: &str) -> Result<Vec<Suggestion>, ApiError> {
        let resp: SuggestionsResponse = self.get_json(&next_steps_endpoint(project_id)).await?;
        Ok(resp.suggestions)
    }
}
