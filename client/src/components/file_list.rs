//! Fixed list of generated project documents.

use leptos::prelude::*;

use crate::state::workspace::{PROJECT_FILES, WorkspaceState};

/// Buttons selecting which generated document the preview shows.
#[component]
pub fn FileList() -> impl IntoView {
    let workspace = expect_context::<RwSignal<WorkspaceState>>();

    view! {
        <div class="file-list">
            <h3 class="file-list__title">"Generated Files"</h3>
            {PROJECT_FILES
                .into_iter()
                .map(|filename| {
                    let selected = move || workspace.get().selected_file.as_deref() == Some(filename);
                    view! {
                        <button
                            class="file-list__item"
                            class:file-list__item--selected=selected
                            on:click=move |_| workspace.update(|w| w.select_file(filename))
                        >
                            {filename}
                        </button>
                    }
                })
                .collect::<Vec<_>>()}
        </div>
    }
}
