//! Workspace status bar showing socket status and the active skill run.
//!
//! SYSTEM CONTEXT
//! ==============
//! Renders low-frequency workspace telemetry so users can see whether frames
//! can arrive and what the backend is working on.

#[cfg(test)]
#[path = "status_bar_test.rs"]
mod status_bar_test;

use leptos::prelude::*;

use crate::state::skill::SkillState;
use crate::state::workspace::{ConnectionStatus, WorkspaceState};

/// Status bar at the top of the workspace page.
#[component]
pub fn StatusBar() -> impl IntoView {
    let workspace = expect_context::<RwSignal<WorkspaceState>>();
    let skill = expect_context::<RwSignal<SkillState>>();

    let status = move || workspace.get().connection;
    let status_class = move || connection_status_class(status());
    let activity = move || skill_activity(&skill.get());

    view! {
        <div class="status-bar">
            <span class=status_class>
                <span class="status-bar__dot"></span>
                {move || status().label()}
            </span>
            <span class="status-bar__divider"></span>
            <span class="status-bar__activity">{activity}</span>
        </div>
    }
}

fn connection_status_class(status: ConnectionStatus) -> String {
    format!("status-bar__connection status-bar__connection--{}", status.css_modifier())
}

fn skill_activity(skill: &SkillState) -> String {
    if skill.processing {
        let name = skill.running.as_deref().unwrap_or(&skill.skill_name);
        return format!("Running {name}");
    }
    if let Some(label) = skill.usage_label() {
        return format!("Last run: {label}");
    }
    "Idle".to_owned()
}
