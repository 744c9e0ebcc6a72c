//! Project workspace page: upload, skill runs, chat, files, and preview.
//!
//! SYSTEM CONTEXT
//! ==============
//! `/project/:id` hosts every per-project panel. The page owns the project's
//! websocket: it connects on mount, disconnects on unmount or when the route
//! switches to another project, and registers the skill and connection
//! listeners on the frame dispatcher. The chat panel registers its own.
//!
//! ERROR HANDLING
//! ==============
//! A failed skill trigger clears processing and raises an alert. Frames with
//! no listener are logged. A missing project renders a notice with a link
//! back to the dashboard.

#[cfg(test)]
#[path = "workspace_test.rs"]
mod workspace_test;

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::components::chat_panel::ChatPanel;
use crate::components::file_list::FileList;
use crate::components::file_upload::FileUpload;
use crate::components::preview_panel::PreviewPanel;
use crate::components::status_bar::StatusBar;
use crate::components::streaming_display::StreamingDisplay;
use crate::components::suggestions_panel::SuggestionsPanel;
use crate::net::api::ApiClient;
use crate::state::chat::ChatState;
use crate::state::skill::{SKILLS, SkillState, preset};
use crate::state::workspace::WorkspaceState;

/// Alert text when the skill trigger POST fails.
pub const INVOKE_FAILED_MESSAGE: &str = "Failed to analyze job posting";

fn trigger_label(skill: &SkillState) -> &'static str {
    if skill.processing {
        return "Analyzing...";
    }
    preset(&skill.skill_name).map_or("Run Skill", |p| p.label)
}

/// Pretty-printed acknowledgement of a skill trigger.
fn format_ack(ack: &serde_json::Value) -> String {
    serde_json::to_string_pretty(ack).unwrap_or_else(|_| ack.to_string())
}

/// Route component; remounts the workspace whenever `:id` changes.
#[component]
pub fn WorkspacePage() -> impl IntoView {
    let params = use_params_map();
    let project_id = move || params.read().get("id").unwrap_or_default();

    move || {
        let id = project_id();
        view! { <Workspace project_id=id /> }
    }
}

#[component]
fn Workspace(project_id: String) -> impl IntoView {
    let api = expect_context::<ApiClient>();
    let workspace = RwSignal::new(WorkspaceState::for_project(&project_id));
    let skill = RwSignal::new(SkillState::default());
    let chat = RwSignal::new(ChatState::default());
    provide_context(workspace);
    provide_context(skill);
    provide_context(chat);

    #[cfg(feature = "hydrate")]
    {
        use crate::net::frame_client;
        use crate::net::types::{Frame, FrameKind};

        let listeners = [
            frame_client::subscribe(&FrameKind::SKILL, move |frame| {
                skill.update(|s| {
                    s.apply_frame(frame);
                });
            }),
            frame_client::subscribe(&[FrameKind::Connection], move |frame| {
                workspace.update(|w| {
                    w.apply_frame(frame);
                });
            }),
            frame_client::subscribe(&[FrameKind::FileCreated], |frame| {
                if let Frame::FileCreated { filename, .. } = frame {
                    leptos::logging::log!("file created: {filename}");
                }
            }),
            frame_client::subscribe_unhandled(|frame| {
                leptos::logging::log!("WS frame without listener: {}", frame.type_tag());
            }),
        ];
        let connection = frame_client::connect(api.base_url(), &project_id, move |status| {
            workspace.update(|w| w.connection = status);
        });
        on_cleanup(move || {
            frame_client::disconnect(connection);
            for id in listeners {
                frame_client::unsubscribe(id);
            }
        });
    }

    resolve_project(&api, workspace);

    let last_ack = RwSignal::new(None::<String>);
    let trigger = {
        let project_id = project_id.clone();
        Callback::new(move |()| {
            let Some(request) = skill.get_untracked().request(&project_id) else {
                return;
            };
            skill.update(SkillState::begin_invoke);
            invoke_skill(&api, skill, last_ack, request);
        })
    };

    let selected_file = Signal::derive(move || workspace.get().selected_file);
    // Chat remounts only when the resolved project changes.
    let project = Memo::new(move |_| workspace.get().project);

    view! {
        <div class="workspace-page">
            <header class="workspace-page__header">
                <a class="btn workspace-page__back" href="/">"← Back to Dashboard"</a>
                <h2>{move || workspace.get().title()}</h2>
                <Show when=move || workspace.get().project.is_some()>
                    <p class="workspace-page__stage">
                        {move || {
                            workspace.get().project.map(|p| format!("Status: {}", p.current_stage)).unwrap_or_default()
                        }}
                    </p>
                </Show>
                <StatusBar />
            </header>

            <Show when=move || workspace.get().project_missing>
                <p class="workspace-page__missing">"Project not found."</p>
            </Show>

            <section class="workspace-page__section">
                <h3>"Upload Job Posting"</h3>
                <FileUpload project_id=project_id.clone() />
            </section>

            <section class="workspace-page__section">
                <h3>"Actions"</h3>
                <div class="workspace-page__actions">
                    <select
                        class="workspace-page__skill"
                        disabled=move || skill.get().processing
                        on:change=move |ev| skill.update(|s| s.select(&event_target_value(&ev)))
                        prop:value=move || skill.get().skill_name
                    >
                        {SKILLS
                            .iter()
                            .map(|p| view! { <option value=p.name>{p.label}</option> })
                            .collect::<Vec<_>>()}
                    </select>
                    <label class="workspace-page__use-api">
                        <input
                            type="checkbox"
                            prop:checked=move || skill.get().use_api
                            on:change=move |ev| skill.update(|s| s.use_api = event_target_checked(&ev))
                        />
                        "Use API"
                    </label>
                    <textarea
                        class="workspace-page__prompt"
                        rows="2"
                        prop:value=move || skill.get().prompt
                        on:input=move |ev| skill.update(|s| s.prompt = event_target_value(&ev))
                    ></textarea>
                    <button
                        class="btn workspace-page__trigger"
                        disabled=move || skill.get().processing
                        on:click=move |_| trigger.run(())
                    >
                        {move || trigger_label(&skill.get())}
                    </button>
                </div>
                <Show when=move || last_ack.get().is_some()>
                    <div class="workspace-page__result">
                        <h3>"Result"</h3>
                        <pre>{move || last_ack.get().unwrap_or_default()}</pre>
                    </div>
                </Show>
                <StreamingDisplay />
            </section>

            <section class="workspace-page__split">
                <div class="workspace-page__files">
                    <FileList />
                </div>
                <div class="workspace-page__preview">
                    <h3>"Preview"</h3>
                    <PreviewPanel project_id=project_id.clone() filename=selected_file />
                </div>
            </section>

            <Show when=move || project.get().is_some()>
                <section class="workspace-page__chat">
                    {move || project.get().map(|project| view! { <ChatPanel project=project /> })}
                </section>
            </Show>

            <SuggestionsPanel project_id=project_id.clone() />
        </div>
    }
}

fn resolve_project(api: &ApiClient, workspace: RwSignal<WorkspaceState>) {
    #[cfg(feature = "hydrate")]
    {
        let api = api.clone();
        leptos::task::spawn_local(async move {
            match api.list_projects().await {
                Ok(projects) => workspace.update(|w| w.resolve_project(&projects)),
                Err(e) => leptos::logging::warn!("Failed to load project: {e}"),
            }
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (api, workspace);
    }
}

fn invoke_skill(
    api: &ApiClient,
    skill: RwSignal<SkillState>,
    last_ack: RwSignal<Option<String>>,
    request: crate::net::types::SkillInvokeRequest,
) {
    #[cfg(feature = "hydrate")]
    {
        let api = api.clone();
        leptos::task::spawn_local(async move {
            match api.invoke_skill(&request).await {
                Ok(ack) => {
                    leptos::logging::log!("skill {} accepted", request.skill_name);
                    last_ack.set(Some(format_ack(&ack)));
                }
                Err(e) => {
                    leptos::logging::warn!("Analysis failed: {e}");
                    skill.update(|s| s.invoke_failed(e.to_string()));
                    crate::util::dom::alert(INVOKE_FAILED_MESSAGE);
                }
            }
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (api, skill, last_ack, request);
    }
}
