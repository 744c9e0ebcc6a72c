//! HTML / PDF preview of a generated project document.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend renders markdown documents either as an HTML page (fast) or a
//! PDF (accurate). The panel fetches whichever mode is selected and shows it
//! in an iframe.
//!
//! DESIGN
//! ======
//! An effect keyed on `(project, file, mode)` starts a load only when the key
//! changes. PDF bytes are wrapped in an object URL that is revoked when the
//! content is replaced or the panel unmounts.
//!
//! The PDF iframe uses the browser's own viewer opened at the current page;
//! it does not confine scrolling to that page. See `state::preview` for when
//! the page count is unknown.
//!
//! ERROR HANDLING
//! ==============
//! Load failures show the backend `detail` when present, otherwise a generic
//! message. Responses for a superseded key are dropped.

#[cfg(test)]
#[path = "preview_panel_test.rs"]
mod preview_panel_test;

use leptos::prelude::*;

use crate::net::api::ApiClient;
use crate::state::preview::{NO_SELECTION_MESSAGE, PreviewContent, PreviewKey, PreviewMode, PreviewState};

/// Fallback text for a failed preview load.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load preview";

fn mode_button_label(mode: PreviewMode) -> &'static str {
    match mode {
        PreviewMode::Html => "HTML (Fast)",
        PreviewMode::Pdf => "PDF (Accurate)",
    }
}

/// Preview panel for `filename` within `project_id`.
#[component]
pub fn PreviewPanel(project_id: String, #[prop(into)] filename: Signal<Option<String>>) -> impl IntoView {
    let api = expect_context::<ApiClient>();
    let preview = RwSignal::new(PreviewState::default());
    let mode = RwSignal::new(PreviewMode::Html);

    Effect::new(move || {
        let selected = filename.get();
        let current_mode = mode.get();
        let stale_url = preview.with_untracked(|p| p.object_url().map(str::to_owned));

        let Some(filename) = selected else {
            if let Some(url) = stale_url {
                crate::util::dom::revoke_object_url(&url);
            }
            preview.update(PreviewState::clear);
            return;
        };

        let key = PreviewKey {
            project_id: project_id.clone(),
            filename,
            mode: current_mode,
        };
        let mut changed = false;
        preview.update(|p| changed = p.begin_load(key.clone()));
        if !changed {
            return;
        }
        if let Some(url) = stale_url {
            crate::util::dom::revoke_object_url(&url);
        }
        load_preview(&api, preview, key);
    });

    on_cleanup(move || {
        if let Some(url) = preview.with_untracked(|p| p.object_url().map(str::to_owned)) {
            crate::util::dom::revoke_object_url(&url);
        }
    });

    let mode_button = move |target: PreviewMode| {
        view! {
            <button
                class="btn preview-panel__mode"
                class:preview-panel__mode--active=move || mode.get() == target
                on:click=move |_| mode.set(target)
            >
                {mode_button_label(target)}
            </button>
        }
    };

    let html_body = move || match preview.get().content {
        Some(PreviewContent::Html(html)) => Some(html),
        _ => None,
    };
    let pdf_src = move || preview.get().pdf_page_url();
    let show_body = move || {
        let p = preview.get();
        !p.loading && p.error.is_none()
    };

    view! {
        <Show
            when=move || filename.get().is_some()
            fallback=|| view! { <div class="preview-panel__empty">{NO_SELECTION_MESSAGE}</div> }
        >
            <div class="preview-panel">
                <div class="preview-panel__toolbar">
                    {mode_button(PreviewMode::Html)}
                    {mode_button(PreviewMode::Pdf)}
                    <span class="preview-panel__filename">{move || filename.get().unwrap_or_default()}</span>
                </div>
                <div class="preview-panel__body">
                    <Show when=move || preview.get().loading>
                        <div class="preview-panel__loading">"Loading preview..."</div>
                    </Show>
                    <Show when=move || preview.get().error.is_some()>
                        <div class="preview-panel__error">{move || preview.get().error.unwrap_or_default()}</div>
                    </Show>
                    <Show when=move || show_body() && html_body().is_some()>
                        <iframe
                            class="preview-panel__frame"
                            title="HTML Preview"
                            sandbox=""
                            srcdoc=move || html_body().unwrap_or_default()
                        ></iframe>
                    </Show>
                    <Show when=move || show_body() && pdf_src().is_some()>
                        <div class="preview-panel__pdf">
                            <iframe
                                class="preview-panel__frame"
                                title="PDF Preview"
                                src=move || pdf_src().unwrap_or_default()
                            ></iframe>
                            <Show when=move || preview.get().has_pagination()>
                                <div class="preview-panel__pager">
                                    <button
                                        class="btn"
                                        disabled=move || !preview.get().can_go_previous()
                                        on:click=move |_| preview.update(PreviewState::previous_page)
                                    >
                                        "Previous"
                                    </button>
                                    <span class="preview-panel__page">
                                        {move || preview.get().page_label().unwrap_or_default()}
                                    </span>
                                    <button
                                        class="btn"
                                        disabled=move || !preview.get().can_go_next()
                                        on:click=move |_| preview.update(PreviewState::next_page)
                                    >
                                        "Next"
                                    </button>
                                </div>
                            </Show>
                        </div>
                    </Show>
                </div>
            </div>
        </Show>
    }
}

fn load_preview(api: &ApiClient, preview: RwSignal<PreviewState>, key: PreviewKey) {
    #[cfg(feature = "hydrate")]
    {
        let api = api.clone();
        leptos::task::spawn_local(async move {
            let result = match key.mode {
                PreviewMode::Html => api
                    .preview_html(&key.project_id, &key.filename)
                    .await
                    .map(PreviewContent::Html)
                    .map_err(|e| e.detail_or(LOAD_FAILED_MESSAGE)),
                PreviewMode::Pdf => match api.preview_pdf(&key.project_id, &key.filename).await {
                    Ok(bytes) => {
                        let page_count = crate::state::preview::pdf_page_count(&bytes);
                        crate::util::dom::pdf_object_url(&bytes).map(|url| PreviewContent::Pdf { url, page_count })
                    }
                    Err(e) => Err(e.detail_or(LOAD_FAILED_MESSAGE)),
                },
            };
            match result {
                Ok(content) => {
                    let discarded_url = match &content {
                        PreviewContent::Pdf { url, .. } => Some(url.clone()),
                        PreviewContent::Html(_) => None,
                    };
                    let mut applied = false;
                    preview.update(|p| applied = p.finish_load(&key, content));
                    if !applied {
                        if let Some(url) = discarded_url {
                            crate::util::dom::revoke_object_url(&url);
                        }
                    }
                }
                Err(message) => {
                    leptos::logging::warn!("preview load failed for {}: {message}", key.filename);
                    preview.update(|p| {
                        p.fail_load(&key, message);
                    });
                }
            }
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (api, preview, key);
    }
}
