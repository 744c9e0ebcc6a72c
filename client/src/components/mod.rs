//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render workspace panels and dashboard cards while reading and
//! writing shared state from Leptos context providers.

pub mod chat_panel;
pub mod file_list;
pub mod file_upload;
pub mod preview_panel;
pub mod project_card;
pub mod status_bar;
pub mod streaming_display;
pub mod suggestions_panel;
