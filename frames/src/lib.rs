//! Stream frame model and JSON codec for the project websocket channel.
//!
//! The backend pushes `type`-tagged JSON text frames over `/ws/{project_id}`.
//! This crate owns their typed representation so `client` and `cli` decode
//! the same shapes, and hosts the dispatch table (`dispatch`) that fans
//! decoded frames out to independent listeners.
//!
//! Frame payloads stay lenient: unknown fields are ignored and unknown frame
//! types decode to [`Frame::Unknown`] instead of failing, so a newer backend
//! never breaks an older client.

pub mod dispatch;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error returned by [`decode_frame`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The text is not a JSON document.
    #[error("frame is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),
    /// The JSON document has no string `type` tag.
    #[error("frame has no string `type` field")]
    MissingType,
    /// The `type` tag is known but the remaining fields do not match its shape.
    #[error("invalid `{kind}` frame: {source}")]
    Payload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Token accounting attached to a finished chat message or skill run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
}

impl Usage {
    /// Compact display form, e.g. `"10 in / 2 out"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} in / {} out", self.input_tokens, self.output_tokens)
    }
}

/// Intent classification the backend attaches to `chat_start`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// Skill name, or `"conversational"` for a plain reply. `null` reads as empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub skill: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub parameters: Value,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Intent {
    pub const CONVERSATIONAL: &'static str = "conversational";

    /// Whether the reply is produced by a named skill rather than small talk.
    #[must_use]
    pub fn runs_skill(&self) -> bool {
        !self.skill.is_empty() && self.skill != Self::CONVERSATIONAL
    }
}

/// Discriminant of a [`Frame`], used as the dispatch key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FrameKind {
    Connection,
    Pong,
    Echo,
    ChatStart,
    ChatToken,
    ChatComplete,
    ChatError,
    SkillStart,
    SkillToken,
    SkillOutput,
    SkillComplete,
    SkillError,
    FileCreated,
    Unknown,
}

impl FrameKind {
    /// Kinds that drive the chat message state machine.
    pub const CHAT: [Self; 4] = [Self::ChatStart, Self::ChatToken, Self::ChatComplete, Self::ChatError];

    /// Kinds that drive the workspace skill output buffer.
    pub const SKILL: [Self; 5] = [
        Self::SkillStart,
        Self::SkillToken,
        Self::SkillOutput,
        Self::SkillComplete,
        Self::SkillError,
    ];

    /// Wire `type` tag for this kind. `Unknown` has no fixed tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connection => "connection",
            Self::Pong => "pong",
            Self::Echo => "echo",
            Self::ChatStart => "chat_start",
            Self::ChatToken => "chat_token",
            Self::ChatComplete => "chat_complete",
            Self::ChatError => "chat_error",
            Self::SkillStart => "skill_start",
            Self::SkillToken => "skill_token",
            Self::SkillOutput => "skill_output",
            Self::SkillComplete => "skill_complete",
            Self::SkillError => "skill_error",
            Self::FileCreated => "file_created",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a wire `type` tag. Returns `None` for tags this crate does not model.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        let kind = match tag {
            "connection" => Self::Connection,
            "pong" => Self::Pong,
            "echo" => Self::Echo,
            "chat_start" => Self::ChatStart,
            "chat_token" => Self::ChatToken,
            "chat_complete" => Self::ChatComplete,
            "chat_error" => Self::ChatError,
            "skill_start" => Self::SkillStart,
            "skill_token" => Self::SkillToken,
            "skill_output" => Self::SkillOutput,
            "skill_complete" => Self::SkillComplete,
            "skill_error" => Self::SkillError,
            "file_created" => Self::FileCreated,
            _ => return None,
        };
        Some(kind)
    }
}

fn unknown_error() -> String {
    "unknown error".to_owned()
}

/// One decoded websocket message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
    /// Greeting sent by the backend right after the socket is accepted.
    Connection {
        status: String,
        #[serde(default)]
        project_id: Option<String>,
    },
    /// Heartbeat reply.
    Pong,
    /// Backend echo of a client-sent message.
    Echo {
        #[serde(default)]
        data: Value,
    },
    ChatStart {
        message_id: String,
        #[serde(default)]
        intent: Option<Intent>,
    },
    ChatToken {
        message_id: String,
        token: String,
    },
    ChatComplete {
        message_id: String,
        #[serde(default)]
        usage: Option<Usage>,
        #[serde(default)]
        result: Option<Value>,
    },
    ChatError {
        message_id: String,
        #[serde(default = "unknown_error")]
        error: String,
    },
    SkillStart {
        #[serde(default)]
        skill_name: Option<String>,
    },
    SkillToken {
        #[serde(alias = "content", alias = "text")]
        token: String,
    },
    SkillOutput {
        #[serde(alias = "content", alias = "text", alias = "token")]
        output: String,
    },
    SkillComplete {
        #[serde(default)]
        usage: Option<Usage>,
    },
    SkillError {
        #[serde(default = "unknown_error")]
        error: String,
    },
    /// A file appeared in the project directory.
    FileCreated {
        filename: String,
        #[serde(default)]
        path: Option<String>,
        #[serde(default)]
        extension: Option<String>,
        #[serde(default)]
        project_id: Option<String>,
    },
    /// Any frame whose `type` tag is not modeled above. `data` is the whole
    /// JSON object, tag included.
    #[serde(skip)]
    Unknown { kind: String, data: Value },
}

impl Frame {
    /// Dispatch key for this frame.
    #[must_use]
    pub fn kind(&self) -> FrameKind {
        match self {
            Self::Connection { .. } => FrameKind::Connection,
            Self::Pong => FrameKind::Pong,
            Self::Echo { .. } => FrameKind::Echo,
            Self::ChatStart { .. } => FrameKind::ChatStart,
            Self::ChatToken { .. } => FrameKind::ChatToken,
            Self::ChatComplete { .. } => FrameKind::ChatComplete,
            Self::ChatError { .. } => FrameKind::ChatError,
            Self::SkillStart { .. } => FrameKind::SkillStart,
            Self::SkillToken { .. } => FrameKind::SkillToken,
            Self::SkillOutput { .. } => FrameKind::SkillOutput,
            Self::SkillComplete { .. } => FrameKind::SkillComplete,
            Self::SkillError { .. } => FrameKind::SkillError,
            Self::FileCreated { .. } => FrameKind::FileCreated,
            Self::Unknown { .. } => FrameKind::Unknown,
        }
    }

    /// Wire `type` tag, including the original tag of an unknown frame.
    #[must_use]
    pub fn type_tag(&self) -> &str {
        match self {
            Self::Unknown { kind, .. } => kind,
            other => other.kind().as_str(),
        }
    }

    /// Chat message id carried by `chat_*` frames.
    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        match self {
            Self::ChatStart { message_id, .. }
            | Self::ChatToken { message_id, .. }
            | Self::ChatComplete { message_id, .. }
            | Self::ChatError { message_id, .. } => Some(message_id),
            _ => None,
        }
    }

    /// Text to append to a streaming buffer, for token-bearing frames.
    #[must_use]
    pub fn text_delta(&self) -> Option<&str> {
        match self {
            Self::ChatToken { token, .. } | Self::SkillToken { token } => Some(token),
            Self::SkillOutput { output } => Some(output),
            _ => None,
        }
    }

    /// Whether this frame ends a chat message or a skill run.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::ChatComplete { .. } | Self::ChatError { .. } | Self::SkillComplete { .. } | Self::SkillError { .. }
        )
    }
}

/// Decode one websocket text message.
///
/// # Errors
///
/// Returns [`CodecError::Json`] for text that is not JSON,
/// [`CodecError::MissingType`] when there is no string `type` tag, and
/// [`CodecError::Payload`] when a known tag carries fields of the wrong shape.
pub fn decode_frame(text: &str) -> Result<Frame, CodecError> {
    let value = serde_json::from_str::<Value>(text).map_err(CodecError::Json)?;
    decode_value(value)
}

/// Decode an already-parsed JSON value.
///
/// # Errors
///
/// Same as [`decode_frame`], minus the JSON syntax case.
pub fn decode_value(value: Value) -> Result<Frame, CodecError> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(CodecError::MissingType)?
        .to_owned();

    if FrameKind::parse(&kind).is_none() {
        return Ok(Frame::Unknown { kind, data: value });
    }

    serde_json::from_value::<Frame>(value).map_err(|source| CodecError::Payload { kind, source })
}

/// Encode a frame as websocket text.
#[must_use]
pub fn encode_frame(frame: &Frame) -> String {
    let value = match frame {
        Frame::Unknown { kind, data } => {
            let mut map = match data {
                Value::Object(map) => map.clone(),
                _ => Map::new(),
            };
            map.insert("type".to_owned(), Value::String(kind.clone()));
            Value::Object(map)
        }
        // Known variants only hold strings, numbers and JSON values, so
        // serialization cannot fail.
        known => serde_json::to_value(known).unwrap_or(Value::Null),
    };
    value.to_string()
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
