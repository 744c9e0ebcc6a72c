//! Client-side state containers shared through Leptos context.
//!
//! DESIGN
//! ======
//! Each module is a plain struct updated through `RwSignal`. Protocol handling
//! lives in pure methods (`apply_frame`, `begin_load`, ...) so it is testable
//! without a browser.

pub mod chat;
pub mod preview;
pub mod projects;
pub mod skill;
pub mod suggestions;
pub mod upload;
pub mod workspace;
