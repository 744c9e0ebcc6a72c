//! Dashboard page listing job-application projects with a create form.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the landing route. It loads the project list and backend health
//! once per visit, and prepends newly created projects without reloading.
//!
//! ERROR HANDLING
//! ==============
//! List and create failures are logged; a failed list renders as empty.
//! Form validation errors render inline above the submit button.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;

use crate::components::project_card::ProjectCard;
use crate::net::api::ApiClient;
use crate::state::projects::{BackendHealth, ProjectDraft, ProjectsState};
use crate::util::time::today_iso;

/// Text shown when there are no projects.
pub const EMPTY_MESSAGE: &str = "No projects yet. Create your first job application project!";

fn create_toggle_label(form_open: bool) -> &'static str {
    if form_open { "Cancel" } else { "New Project" }
}

fn health_class(health: BackendHealth) -> &'static str {
    match health {
        BackendHealth::Unknown => "dashboard-page__health dashboard-page__health--unknown",
        BackendHealth::Healthy => "dashboard-page__health dashboard-page__health--ok",
        BackendHealth::Unreachable => "dashboard-page__health dashboard-page__health--down",
    }
}

/// Dashboard page: project cards plus a create-project form.
#[component]
pub fn DashboardPage() -> impl IntoView {
    let api = expect_context::<ApiClient>();
    let projects = RwSignal::new(ProjectsState {
        loading: true,
        ..ProjectsState::default()
    });

    load_dashboard(&api, projects);

    let show_create = RwSignal::new(false);
    let draft = RwSignal::new(ProjectDraft::dated(today_iso()));
    let form_error = RwSignal::new(None::<String>);

    let on_toggle = move |_| {
        show_create.update(|open| *open = !*open);
        form_error.set(None);
    };

    let submit = Callback::new(move |()| {
        let request = match draft.get_untracked().to_request() {
            Ok(request) => request,
            Err(e) => {
                form_error.set(Some(e.to_string()));
                return;
            }
        };
        form_error.set(None);
        create_project(&api, projects, request, move || {
            show_create.set(false);
            draft.set(ProjectDraft::dated(today_iso()));
        });
    });
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        submit.run(());
    };

    view! {
        <Show
            when=move || !projects.get().loading
            fallback=|| view! { <div class="dashboard-page"><p>"Loading projects..."</p></div> }
        >
            <div class="dashboard-page">
                <header class="dashboard-page__header">
                    <h1>"Job Applications"</h1>
                    <span class=move || health_class(projects.get().health)>
                        {move || projects.get().health.label()}
                    </span>
                    <button class="btn dashboard-page__new" on:click=on_toggle>
                        {move || create_toggle_label(show_create.get())}
                    </button>
                </header>

                <Show when=move || show_create.get()>
                    <form class="dashboard-page__form" on:submit=on_submit>
                        <label>
                            "Institution:"
                            <input
                                type="text"
                                required=true
                                prop:value=move || draft.get().institution
                                on:input=move |ev| draft.update(|d| d.institution = event_target_value(&ev))
                            />
                        </label>
                        <label>
                            "Position:"
                            <input
                                type="text"
                                required=true
                                prop:value=move || draft.get().position
                                on:input=move |ev| draft.update(|d| d.position = event_target_value(&ev))
                            />
                        </label>
                        <label>
                            "Date:"
                            <input
                                type="date"
                                required=true
                                prop:value=move || draft.get().date
                                on:input=move |ev| draft.update(|d| d.date = event_target_value(&ev))
                            />
                        </label>
                        <Show when=move || form_error.get().is_some()>
                            <p class="dashboard-page__error">{move || form_error.get().unwrap_or_default()}</p>
                        </Show>
                        <button class="btn" type="submit">"Create Project"</button>
                    </form>
                </Show>

                <Show
                    when=move || !projects.get().is_empty()
                    fallback=|| view! { <p class="dashboard-page__empty">{EMPTY_MESSAGE}</p> }
                >
                    <div class="dashboard-page__cards">
                        {move || {
                            projects
                                .get()
                                .items
                                .into_iter()
                                .map(|project| view! { <ProjectCard project=project /> })
                                .collect::<Vec<_>>()
                        }}
                    </div>
                </Show>
            </div>
        </Show>
    }
}

fn load_dashboard(api: &ApiClient, projects: RwSignal<ProjectsState>) {
    #[cfg(feature = "hydrate")]
    {
        let api = api.clone();
        leptos::task::spawn_local(async move {
            let health = api.health_check().await;
            projects.update(|p| p.health = BackendHealth::from_check(&health));

            let result = api.list_projects().await;
            let mut failure = None;
            projects.update(|p| failure = p.finish_load(result));
            if let Some(e) = failure {
                leptos::logging::warn!("Failed to load projects: {e}");
            }
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (api, projects);
    }
}

fn create_project(
    api: &ApiClient,
    projects: RwSignal<ProjectsState>,
    request: crate::net::types::CreateProjectRequest,
    on_created: impl FnOnce() + 'static,
) {
    #[cfg(feature = "hydrate")]
    {
        let api = api.clone();
        leptos::task::spawn_local(async move {
            match api.create_project(&request).await {
                Ok(project) => {
                    leptos::logging::log!("created project {}", project.project_id);
                    projects.update(|p| p.prepend_created(project));
                    on_created();
                }
                Err(e) => leptos::logging::warn!("Failed to create project: {e}"),
            }
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (api, projects, request, on_created);
    }
}
