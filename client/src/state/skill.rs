//! Skill invocation state for the project workspace.
//!
//! DESIGN
//! ======
//! A skill run is triggered over HTTP and its output arrives as `skill_*`
//! frames on the project websocket. All output lands in one flat buffer; the
//! backend execution path (`use_api`) changes nothing on this side.

#[cfg(test)]
#[path = "skill_test.rs"]
mod skill_test;

use crate::net::types::{Frame, SkillInvokeRequest, Usage};

/// A backend skill the workspace can trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkillPreset {
    pub name: &'static str,
    pub label: &'static str,
    pub default_prompt: &'static str,
}

pub const SKILLS: [SkillPreset; 3] = [
    SkillPreset {
        name: "job-description-analysis",
        label: "Analyze Job Posting",
        default_prompt: "Analyze the job posting and save the analysis as JSON",
    },
    SkillPreset {
        name: "resume-alignment",
        label: "Align Resume",
        default_prompt: "Align my resume to the analyzed job requirements",
    },
    SkillPreset {
        name: "cover-letter-voice",
        label: "Draft Cover Letter",
        default_prompt: "Draft a cover letter for this position in my voice",
    },
];

/// Preset for a skill name, if it is one of [`SKILLS`].
pub fn preset(name: &str) -> Option<&'static SkillPreset> {
    SKILLS.iter().find(|p| p.name == name)
}

/// Workspace skill run state.
#[derive(Clone, Debug, PartialEq)]
pub struct SkillState {
    pub skill_name: String,
    pub prompt: String,
    pub use_api: bool,
    /// Accumulated streamed output.
    pub content: String,
    pub usage: Option<Usage>,
    pub processing: bool,
    pub error: Option<String>,
    /// Skill named by the latest `skill_start`, when the backend sent one.
    pub running: Option<String>,
}

impl Default for SkillState {
    fn default() -> Self {
        let first = &SKILLS[0];
        Self {
            skill_name: first.name.to_owned(),
            prompt: first.default_prompt.to_owned(),
            use_api: false,
            content: String::new(),
            usage: None,
            processing: false,
            error: None,
            running: None,
        }
    }
}

impl SkillState {
    /// Switch skills, replacing the prompt with the new skill's default.
    pub fn select(&mut self, name: &str) {
        self.skill_name = name.to_owned();
        if let Some(preset) = preset(name) {
            self.prompt = preset.default_prompt.to_owned();
        }
    }

    /// Request body for the current selection. `None` while a run is in
    /// progress or the prompt is blank.
    pub fn request(&self, project_id: &str) -> Option<SkillInvokeRequest> {
        if self.processing || self.prompt.trim().is_empty() {
            return None;
        }
        Some(SkillInvokeRequest {
            project_id: project_id.to_owned(),
            skill_name: self.skill_name.clone(),
            prompt: self.prompt.trim().to_owned(),
            stream: true,
            use_api: self.use_api,
        })
    }

    /// Enter processing as the trigger POST goes out.
    pub fn begin_invoke(&mut self) {
        self.processing = true;
        self.error = None;
    }

    /// The trigger POST failed.
    pub fn invoke_failed(&mut self, error: impl Into<String>) {
        self.processing = false;
        self.error = Some(error.into());
    }

    /// `"X in / Y out"` once a run reported usage.
    pub fn usage_label(&self) -> Option<String> {
        self.usage.as_ref().map(Usage::label)
    }

    /// Apply one `skill_*` frame. Returns `true` if the frame was a skill frame.
    pub fn apply_frame(&mut self, frame: &Frame) -> bool {
        match frame {
            Frame::SkillStart { skill_name } => {
                self.content.clear();
                self.usage = None;
                self.error = None;
                self.processing = true;
                self.running.clone_from(skill_name);
                true
            }
            Frame::SkillToken { token: text } | Frame::SkillOutput { output: text } => {
                self.content.push_str(text);
                true
            }
            Frame::SkillComplete { usage } => {
                self.processing = false;
                if usage.is_some() {
                    self.usage = *usage;
                }
                true
            }
            Frame::SkillError { error } => {
                self.processing = false;
                self.error = Some(error.clone());
                true
            }
            _ => false,
        }
    }
}
