//! "Smart Suggestions" list of next steps for a project.
//!
//! ERROR HANDLING
//! ==============
//! A failed load shows a Retry button. Clicks only surface a notice; unknown
//! actions are logged and otherwise ignored.

#[cfg(test)]
#[path = "suggestions_panel_test.rs"]
mod suggestions_panel_test;

use leptos::prelude::*;

use crate::net::api::ApiClient;
use crate::net::types::Suggestion;
use crate::state::suggestions::{SuggestionAction, SuggestionsState};

/// Error text for a failed suggestions load.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load suggestions";

/// Priority label, hidden for missing or zero priority.
fn priority_label(suggestion: &Suggestion) -> Option<String> {
    suggestion
        .priority
        .filter(|p| *p != 0)
        .map(|p| format!("Priority: {p}"))
}

#[component]
pub fn SuggestionsPanel(project_id: String) -> impl IntoView {
    let api = expect_context::<ApiClient>();
    let state = RwSignal::new(SuggestionsState::default());

    let reload = Callback::new(move |()| load_suggestions(&api, state, project_id.clone()));
    reload.run(());

    let on_click = move |suggestion: Suggestion| {
        let mut action = SuggestionAction::Review;
        state.update(|s| action = s.click(&suggestion));
        match action {
            SuggestionAction::RunSkill(skill) => leptos::logging::log!("suggestion wants skill {skill}"),
            SuggestionAction::UploadFile => leptos::logging::log!("suggestion wants upload"),
            SuggestionAction::Review => {}
            SuggestionAction::Other(other) => leptos::logging::warn!("unknown suggestion action: {other}"),
        }
    };

    view! {
        <Show
            when=move || !state.get().loading
            fallback=|| view! { <div class="suggestions-panel__loading">"Loading suggestions..."</div> }
        >
            <Show
                when=move || state.get().error.is_none()
                fallback=move || {
                    view! {
                        <div class="suggestions-panel__error">
                            {move || state.get().error.unwrap_or_default()}
                            <button class="btn suggestions-panel__retry" on:click=move |_| reload.run(())>
                                "Retry"
                            </button>
                        </div>
                    }
                }
            >
                <Show
                    when=move || !state.get().items.is_empty()
                    fallback=|| {
                        view! {
                            <div class="suggestions-panel__empty">
                                <p>"No suggestions at this time."</p>
                                <p>"Keep working on your application!"</p>
                            </div>
                        }
                    }
                >
                    <div class="suggestions-panel">
                        <h3 class="suggestions-panel__title">"Smart Suggestions"</h3>
                        <Show when=move || state.get().notice.is_some()>
                            <div class="suggestions-panel__notice">
                                {move || state.get().notice.unwrap_or_default()}
                                <button
                                    class="suggestions-panel__dismiss"
                                    title="Dismiss"
                                    on:click=move |_| state.update(|s| s.notice = None)
                                >
                                    "×"
                                </button>
                            </div>
                        </Show>
                        {move || {
                            state
                                .get()
                                .items
                                .into_iter()
                                .map(|suggestion| {
                                    let kind = suggestion.kind.as_str();
                                    let priority = priority_label(&suggestion);
                                    let title = suggestion.title.clone();
                                    let description = suggestion.description.clone();
                                    view! {
                                        <div
                                            class=format!("suggestions-panel__item suggestions-panel__item--{kind}")
                                            on:click=move |_| on_click(suggestion.clone())
                                        >
                                            <div class="suggestions-panel__header">
                                                <span class="suggestions-panel__item-title">{title}</span>
                                                <span class="suggestions-panel__badge">{kind}</span>
                                            </div>
                                            <p class="suggestions-panel__description">{description}</p>
                                            {priority
                                                .map(|label| {
                                                    view! { <span class="suggestions-panel__priority">{label}</span> }
                                                })}
                                        </div>
                                    }
                                })
                                .collect::<Vec<_>>()
                        }}
                        <button class="btn suggestions-panel__refresh" on:click=move |_| reload.run(())>
                            "Refresh Suggestions"
                        </button>
                    </div>
                </Show>
            </Show>
        </Show>
    }
}

fn load_suggestions(api: &ApiClient, state: RwSignal<SuggestionsState>, project_id: String) {
    state.update(SuggestionsState::begin_load);
    #[cfg(feature = "hydrate")]
    {
        let api = api.clone();
        leptos::task::spawn_local(async move {
            match api.next_steps(&project_id).await {
                Ok(items) => state.update(|s| s.finish_load(items)),
                Err(e) => {
                    leptos::logging::warn!("suggestions load failed: {e}");
                    state.update(|s| s.fail_load(LOAD_FAILED_MESSAGE));
                }
            }
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (api, project_id);
    }
}
