//! Passive view of streamed skill output.

use leptos::prelude::*;

use crate::state::skill::SkillState;
use crate::util::markdown::render_markdown_html;

/// Accumulated skill output with processing indicator and token usage.
#[component]
pub fn StreamingDisplay() -> impl IntoView {
    let skill = expect_context::<RwSignal<SkillState>>();

    let processing = move || skill.get().processing;
    let has_content = move || !skill.get().content.is_empty();
    let rendered = move || render_markdown_html(&skill.get().content);
    let usage = move || skill.get().usage_label();
    let error = move || skill.get().error;

    view! {
        <div class="streaming-display">
            <div class="streaming-display__header">
                <h3>"Output"</h3>
                <Show when=processing>
                    <span class="streaming-display__processing">"Processing..."</span>
                </Show>
            </div>
            <Show when=move || error().is_some()>
                <p class="streaming-display__error">{move || error().unwrap_or_default()}</p>
            </Show>
            <Show
                when=has_content
                fallback=move || {
                    view! {
                        <p class="streaming-display__empty">
                            {move || if processing() { "Waiting for output..." } else { "No output yet" }}
                        </p>
                    }
                }
            >
                <div class="streaming-display__content" inner_html=rendered></div>
            </Show>
            <Show when=move || usage().is_some()>
                <div class="streaming-display__usage">
                    {move || format!("Tokens: {}", usage().unwrap_or_default())}
                </div>
            </Show>
        </div>
    }
}
