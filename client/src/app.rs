//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};

use crate::config::API_BASE_META;
use crate::net::api::ApiClient;
use crate::pages::{dashboard::DashboardPage, workspace::WorkspacePage};

/// HTML shell rendered on the server for SSR + hydration.
///
/// `api_base` is written into a meta tag so the browser bundle knows which
/// backend to call.
pub fn shell(options: LeptosOptions, api_base: String) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <meta name=API_BASE_META content=api_base/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the backend client and sets up client-side routing. Per-project
/// state is provided by the workspace page.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_context(ApiClient::from_page());

    view! {
        <Stylesheet id="leptos" href="/pkg/jobdesk.css"/>
        <Title text="Job Applications"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=DashboardPage/>
                <Route path=(StaticSegment("project"), ParamSegment("id")) view=WorkspacePage/>
            </Routes>
        </Router>
    }
}
