//! Dashboard card for one project.

#[cfg(test)]
#[path = "project_card_test.rs"]
mod project_card_test;

use leptos::prelude::*;

use crate::net::types::Project;
use crate::util::time::display_date;

/// Route of a project's workspace.
pub fn project_href(project_id: &str) -> String {
    format!("/project/{project_id}")
}

/// A clickable card linking to the project workspace.
#[component]
pub fn ProjectCard(project: Project) -> impl IntoView {
    let href = project_href(&project.project_id);
    let title = project.title();
    let updated = display_date(&project.updated_at).to_owned();

    view! {
        <a class="project-card" href=href>
            <span class="project-card__title">{title}</span>
            <span class="project-card__stage">{format!("Stage: {}", project.current_stage)}</span>
            <span class="project-card__updated">{format!("Updated: {updated}")}</span>
        </a>
    }
}
