//! MCP tool handlers for the sessions server
//!
//! Each tool delegates to a `handle_*` method defined in one of these files,
//! grouped by the records they touch.

pub mod notes;
pub mod overview;
pub mod projects;
pub mod settings;
pub mod smart_input;
pub mod songs;
pub mod tasks;
