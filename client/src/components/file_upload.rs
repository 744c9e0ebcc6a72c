//! Drag-and-drop and click-to-select file upload widget.
//!
//! SYSTEM CONTEXT
//! ==============
//! Users attach job postings and resumes to a project. The widget collects
//! files from a hidden input or a drop zone and posts them one at a time.
//!
//! ERROR HANDLING
//! ==============
//! The first failing file stops the batch and raises an alert; files that
//! already uploaded stay on the backend.

use leptos::prelude::*;

#[cfg(feature = "hydrate")]
use crate::net::api::ApiClient;
use crate::state::upload::UploadState;

/// Upload widget for one project. `on_complete` fires after every file in
/// the batch uploaded.
#[component]
pub fn FileUpload(project_id: String, #[prop(optional)] on_complete: Option<Callback<()>>) -> impl IntoView {
    let state = RwSignal::new(UploadState::default());
    let input_ref = NodeRef::<leptos::html::Input>::new();

    #[cfg(feature = "hydrate")]
    let start_upload = {
        let api = expect_context::<ApiClient>();
        let project_id = project_id.clone();
        move |files: Vec<web_sys::File>| {
            if files.is_empty() || state.get_untracked().uploading {
                return;
            }
            state.update(|s| s.uploading = true);
            let api = api.clone();
            let project_id = project_id.clone();
            leptos::task::spawn_local(async move {
                let outcome = crate::state::upload::upload_sequentially(files, |file| {
                    let api = api.clone();
                    let project_id = project_id.clone();
                    async move { api.upload_file(&project_id, &file).await }
                })
                .await;
                state.update(|s| s.uploading = false);
                match outcome {
                    crate::state::upload::UploadOutcome::Completed { uploaded } => {
                        leptos::logging::log!("uploaded {uploaded} file(s)");
                        crate::util::dom::alert(crate::state::upload::UPLOAD_SUCCESS_MESSAGE);
                        if let Some(cb) = on_complete {
                            cb.run(());
                        }
                    }
                    crate::state::upload::UploadOutcome::Failed { index, uploaded, error } => {
                        leptos::logging::warn!("upload failed at file {index} after {uploaded} uploaded: {error}");
                        crate::util::dom::alert(crate::state::upload::UPLOAD_FAILED_MESSAGE);
                    }
                    crate::state::upload::UploadOutcome::Empty => {}
                }
            });
        }
    };
    #[cfg(not(feature = "hydrate"))]
    let _ = (&project_id, on_complete);

    #[cfg(feature = "hydrate")]
    let start_from_input = start_upload.clone();

    let on_browse = move |_| {
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    let on_input_change = move |_ev: leptos::ev::Event| {
        #[cfg(feature = "hydrate")]
        {
            let Some(input) = input_ref.get() else {
                return;
            };
            let files = input.files().map(file_list_to_vec).unwrap_or_default();
            // Reset so picking the same file again still fires `change`.
            input.set_value("");
            start_from_input(files);
        }
    };

    let on_drag_over = move |ev: leptos::ev::DragEvent| {
        ev.prevent_default();
        state.update(|s| s.drag_over = true);
    };

    let on_drag_leave = move |ev: leptos::ev::DragEvent| {
        ev.prevent_default();
        state.update(|s| s.drag_over = false);
    };

    let on_drop = move |ev: leptos::ev::DragEvent| {
        ev.prevent_default();
        state.update(|s| s.drag_over = false);
        #[cfg(feature = "hydrate")]
        {
            let files = ev
                .data_transfer()
                .and_then(|dt| dt.files())
                .map(file_list_to_vec)
                .unwrap_or_default();
            start_upload(files);
        }
    };

    view! {
        <div
            class="file-upload"
            class:file-upload--drag-over=move || state.get().drag_over
            on:dragover=on_drag_over
            on:dragleave=on_drag_leave
            on:drop=on_drop
        >
            <input
                node_ref=input_ref
                class="file-upload__input"
                type="file"
                multiple=true
                on:change=on_input_change
            />
            <Show
                when=move || state.get().uploading
                fallback=move || {
                    view! {
                        <p class="file-upload__hint">"Drag and drop files here, or click to select"</p>
                        <button class="btn file-upload__browse" on:click=on_browse>
                            "Select Files"
                        </button>
                    }
                }
            >
                <p class="file-upload__progress">"Uploading..."</p>
            </Show>
        </div>
    }
}

#[cfg(feature = "hydrate")]
fn file_list_to_vec(list: web_sys::FileList) -> Vec<web_sys::File> {
    (0..list.length()).filter_map(|i| list.item(i)).collect()
}
