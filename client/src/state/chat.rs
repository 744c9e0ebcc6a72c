//! Chat message list and the streaming reply state machine.
//!
//! DESIGN
//! ======
//! Replies stream over the project websocket as `chat_start` -> `chat_token`*
//! -> `chat_complete | chat_error`. [`ChatState::apply_frame`] is pure so the
//! protocol can be tested without a browser; the chat panel feeds it frames
//! from its dispatcher listener.
//!
//! A message only mutates while `streaming` is set. Once a terminal frame
//! lands the message is frozen, so late or duplicated frames for that id are
//! dropped.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use crate::net::types::{Frame, HistoryMessage, Intent, Usage};

/// Text of the local message shown when posting a chat message fails.
pub const SEND_FAILED_MESSAGE: &str = "Sorry, I encountered an error processing your message. Please try again.";

/// Id for a message created locally rather than by the backend.
fn local_id(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4())
}

/// Canned prompt offered as a chip above the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuickPrompt {
    pub label: &'static str,
    pub message: &'static str,
}

pub const QUICK_PROMPTS: [QuickPrompt; 5] = [
    QuickPrompt {
        label: "Analyze job description",
        message: "analyze the job description",
    },
    QuickPrompt {
        label: "Align my resume",
        message: "align my resume to this job",
    },
    QuickPrompt {
        label: "Draft cover letter",
        message: "write a cover letter for this position",
    },
    QuickPrompt {
        label: "Format resume",
        message: "format my resume",
    },
    QuickPrompt {
        label: "Show project status",
        message: "what's the status of this project?",
    },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    fn parse(role: &str) -> Self {
        if role.eq_ignore_ascii_case("user") {
            Self::User
        } else {
            Self::Assistant
        }
    }
}

/// A chat message rendered in the conversation list.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub intent: Option<Intent>,
    pub streaming: bool,
    pub usage: Option<Usage>,
    pub error: bool,
    /// Epoch milliseconds.
    pub timestamp: f64,
}

impl ChatMessage {
    fn user(id: String, content: String, timestamp: f64) -> Self {
        Self {
            id,
            role: Role::User,
            content,
            intent: None,
            streaming: false,
            usage: None,
            error: false,
            timestamp,
        }
    }

    fn assistant(id: String, content: String, timestamp: f64) -> Self {
        Self {
            role: Role::Assistant,
            ..Self::user(id, content, timestamp)
        }
    }

    /// Convert a persisted message. `index` disambiguates messages stored
    /// without an id.
    pub fn from_history(message: HistoryMessage, index: usize, timestamp: f64) -> Self {
        let id = message.id.unwrap_or_else(|| format!("history-{index}"));
        let mut converted = Self::user(id, message.content, timestamp);
        converted.role = Role::parse(&message.role);
        converted
    }

    /// Skill name for the "Running: <skill>" badge, when the reply is
    /// produced by a skill.
    pub fn running_skill(&self) -> Option<&str> {
        self.intent
            .as_ref()
            .filter(|intent| intent.runs_skill())
            .map(|intent| intent.skill.as_str())
    }

    /// Whether the Copy action applies.
    pub fn copyable(&self) -> bool {
        self.role == Role::Assistant && !self.streaming && !self.error && !self.content.is_empty()
    }
}

/// Conversation state for one project workspace.
#[derive(Clone, Debug, Default)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    /// Id of the assistant message currently streaming.
    pub streaming_id: Option<String>,
    /// A send is in flight: set on send, cleared by a terminal frame or a
    /// failed POST.
    pub sending: bool,
}

impl ChatState {
    /// Whether `text` may be sent now.
    pub fn can_send(&self, text: &str) -> bool {
        !self.sending && !text.trim().is_empty()
    }

    /// Append the user's message and mark a send in flight. Returns `false`
    /// (and changes nothing) when [`ChatState::can_send`] refuses.
    pub fn begin_send(&mut self, text: &str, now_ms: f64) -> bool {
        if !self.can_send(text) {
            return false;
        }
        self.messages
            .push(ChatMessage::user(local_id("user"), text.to_owned(), now_ms));
        self.sending = true;
        true
    }

    /// Record a failed POST as a local assistant error message.
    pub fn send_failed(&mut self, now_ms: f64) {
        let mut message = ChatMessage::assistant(local_id("error"), SEND_FAILED_MESSAGE.to_owned(), now_ms);
        message.error = true;
        self.messages.push(message);
        self.sending = false;
    }

    /// Seed the list from persisted history. Ignored once the conversation
    /// has messages, so history arriving late never reorders live ones.
    pub fn load_history(&mut self, history: Vec<ChatMessage>) {
        if self.messages.is_empty() {
            self.messages = history;
        }
    }

    fn find_mut(&mut self, message_id: &str) -> Option<&mut ChatMessage> {
        self.messages.iter_mut().find(|m| m.id == message_id)
    }

    fn finish(&mut self, message_id: &str) {
        if self.streaming_id.is_none() || self.streaming_id.as_deref() == Some(message_id) {
            self.streaming_id = None;
            self.sending = false;
        }
    }

    /// Apply one `chat_*` frame. Returns `true` if the frame was a chat frame.
    pub fn apply_frame(&mut self, frame: &Frame, now_ms: f64) -> bool {
        match frame {
            Frame::ChatStart { message_id, intent } => {
                if self.find_mut(message_id).is_none() {
                    let mut message = ChatMessage::assistant(message_id.clone(), String::new(), now_ms);
                    message.intent.clone_from(intent);
                    message.streaming = true;
                    self.messages.push(message);
                    self.streaming_id = Some(message_id.clone());
                }
                true
            }
            Frame::ChatToken { message_id, token } => {
                if let Some(message) = self.find_mut(message_id).filter(|m| m.streaming) {
                    message.content.push_str(token);
                }
                true
            }
            Frame::ChatComplete { message_id, usage, .. } => {
                if let Some(message) = self.find_mut(message_id).filter(|m| m.streaming) {
                    message.streaming = false;
                    message.usage = *usage;
                }
                self.finish(message_id);
                true
            }
            Frame::ChatError { message_id, error } => {
                match self.find_mut(message_id) {
                    Some(message) if message.streaming => {
                        message.content = format!("Error: {error}");
                        message.streaming = false;
                        message.error = true;
                    }
                    Some(_) => {}
                    None => {
                        let mut message = ChatMessage::assistant(message_id.clone(), format!("Error: {error}"), now_ms);
                        message.error = true;
                        self.messages.push(message);
                    }
                }
                self.finish(message_id);
                true
            }
            _ => false,
        }
    }
}
