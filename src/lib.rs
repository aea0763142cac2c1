//! Music Sessions MCP Server Library
//!
//! This library provides a Model Context Protocol (MCP) server for tracking
//! music production work. Songs move through a fixed pipeline (idea, writing,
//! recording, production, mixing, mastering, release) and carry checklists of
//! tasks that can be captured as one line of smart input such as
//! `Fix reverb tail @mixing !high due:tomorrow`.
//!
//! # Architecture
//!
//! - **MCP Layer**: `SessionsServerHandler` and `handlers` - tool surface
//! - **Smart input**: `smart_input` - pure annotation and highlighting of task text
//! - **Domain Layer**: `sessions` - records, store operations and queries
//! - **Persistence Layer**: `storage` - file-based TOML storage
//!
//! # Example
//!
//! ```no_run
//! use sessions_mcp::SessionsServerHandler;
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let handler = SessionsServerHandler::new("sessions.toml")?;
//!     // Use handler with MCP server...
//!     Ok(())
//! }
//! ```

pub mod formatting;
pub mod handlers;
pub mod sessions;
pub mod smart_input;
mod storage;
pub mod validation;

use anyhow::Result;
use log::warn;
use mcp_attr::server::{McpServer, mcp_server};
use mcp_attr::{Result as McpResult, bail_public};
use std::sync::{Mutex, MutexGuard, PoisonError};

// Re-export commonly used types
pub use sessions::{
    Activity, ActivityKind, EntityType, Note, Priority, Project, Section, SessionsData, Settings,
    Song, StoreError, Task, Theme, Version,
};
pub use smart_input::{ParsedTaskDraft, annotate, annotate_on, highlight, resolve_due_date};
pub use storage::Storage;

/// MCP Server handler for music production sessions
///
/// All changes are persisted to a TOML file after every successful mutation.
pub struct SessionsServerHandler {
    pub(crate) data: Mutex<SessionsData>,
    pub(crate) storage: Storage,
}

impl SessionsServerHandler {
    /// Create a new handler backed by `storage_path`
    ///
    /// A missing file starts an empty tracker; it is created on first save.
    ///
    /// # Example
    /// ```no_run
    /// # use sessions_mcp::SessionsServerHandler;
    /// # use anyhow::Result;
    /// # fn main() -> Result<()> {
    /// let handler = SessionsServerHandler::new("sessions.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(storage_path: &str) -> Result<Self> {
        let storage = Storage::new(storage_path);
        let data = Mutex::new(storage.load()?);
        Ok(Self { data, storage })
    }

    /// Lock the store, recovering from a poisoned lock
    pub(crate) fn lock_data(&self) -> MutexGuard<'_, SessionsData> {
        self.data.lock().unwrap_or_else(|poisoned| {
            warn!("sessions data lock was poisoned, recovering");
            PoisonError::into_inner(poisoned)
        })
    }

    /// Persist `data`, reporting failures as a public tool error
    pub(crate) fn save_data(&self, data: &SessionsData) -> McpResult<()> {
        if let Err(e) = self.storage.save(data) {
            warn!("save failed: {:#}", e);
            bail_public!(_, "Failed to save: {:#}", e);
        }
        Ok(())
    }

    /// Copy of the current store contents
    pub fn snapshot(&self) -> SessionsData {
        self.lock_data().clone()
    }
}

/// Music production session tracker.
///
/// Songs move through seven stages: idea → writing → recording → production → mixing → mastering → release.
/// Each song has a checklist of tasks grouped by stage (section). Projects (EPs, albums) group songs
/// in track order.
///
/// Key concepts:
/// - **Smart input**: add_task takes one line; `@section`, `!priority` (low/medium/high/urgent),
///   `p1`..`p4` (p1 = urgent), `due:today|tomorrow|YYYY-MM-DD` and a bare `today`/`tomorrow` are
///   pulled out, the rest is the title
/// - **Dependencies**: a task cannot be completed while a task it depends on is still open
/// - **Today**: flag tasks for the current session, then review them with today
///
/// IDs are generated on creation and returned by every add_* tool.
#[mcp_server]
impl McpServer for SessionsServerHandler {
    /// **Capture a task**: One line of smart input becomes a task on a song.
    /// **Syntax**: "Fix reverb tail @mixing !high due:tomorrow". Tags are removed from the title.
    /// **Defaults**: No @section → settings default_section (or keyword guess when keyword_fallback is on).
    #[tool]
    async fn add_task(
        &self,
        /// Song ID the task belongs to
        song_id: String,
        /// Smart input text, e.g. "Comp lead vocals @recording p2 due:2025-03-01"
        text: String,
    ) -> McpResult<String> {
        self.handle_add_task(song_id, text).await
    }

    /// **Preview smart input**: Show title/section/priority/due that add_task would use, plus highlighted HTML.
    /// Nothing is created.
    #[tool]
    async fn preview_task(
        &self,
        /// Smart input text
        text: String,
    ) -> McpResult<String> {
        self.handle_preview_task(text).await
    }

    /// **Review tasks**: With song_id, tasks grouped by section in checklist order; without, all tasks.
    #[tool]
    async fn list_tasks(
        &self,
        /// Song ID (optional)
        song_id: Option<String>,
        /// Section filter: idea/writing/recording/production/mixing/mastering/release (optional)
        section: Option<String>,
        /// Include completed tasks (default true)
        include_done: Option<bool>,
    ) -> McpResult<String> {
        self.handle_list_tasks(song_id, section, include_done).await
    }

    /// **Edit a task**: Change title, section, priority, due date, estimate or today flag.
    /// **Tip**: Use empty string "" to clear priority or due_date; estimated_time 0 clears it.
    #[allow(clippy::too_many_arguments)]
    #[tool]
    async fn update_task(
        &self,
        /// Task ID
        id: String,
        /// New title (optional)
        title: Option<String>,
        /// New section (optional)
        section: Option<String>,
        /// low/medium/high/urgent, ""=clear (optional)
        priority: Option<String>,
        /// YYYY-MM-DD, ""=clear (optional)
        due_date: Option<String>,
        /// Estimate in minutes, 0=clear (optional)
        estimated_time: Option<u32>,
        /// Plan for today's session (optional)
        today: Option<bool>,
    ) -> McpResult<String> {
        self.handle_update_task(id, title, section, priority, due_date, estimated_time, today)
            .await
    }

    /// **Complete / reopen**: Toggle a task's done state.
    /// Completing fails while any task it depends on is still open.
    #[tool]
    async fn toggle_task(
        &self,
        /// Task ID
        id: String,
    ) -> McpResult<String> {
        self.handle_toggle_task(id).await
    }

    /// **Delete a task**: Also removes it from other tasks' dependencies.
    #[tool]
    async fn delete_task(
        &self,
        /// Task ID
        id: String,
    ) -> McpResult<String> {
        self.handle_delete_task(id).await
    }

    /// **Dependencies**: Make a task wait for another task of the same song. Cycles are refused.
    #[tool]
    async fn link_task(
        &self,
        /// Task that has to wait
        id: String,
        /// Task that must be done first
        depends_on: String,
        /// Remove the link instead of adding it (default false)
        remove: Option<bool>,
    ) -> McpResult<String> {
        self.handle_link_task(id, depends_on, remove).await
    }

    /// **Time tracking**: Add minutes spent on a task.
    #[tool]
    async fn log_time(
        &self,
        /// Task ID
        id: String,
        /// Minutes spent
        minutes: u32,
    ) -> McpResult<String> {
        self.handle_log_time(id, minutes).await
    }

    /// **New song**: Starts in the idea stage.
    #[tool]
    async fn add_song(
        &self,
        /// Song title
        title: String,
        /// Project ID to add it to (optional)
        project_id: Option<String>,
        /// Tempo (optional)
        bpm: Option<u32>,
        /// Musical key, e.g. "F# minor" (optional)
        key: Option<String>,
        /// Comma-separated mood tags (optional)
        mood_tags: Option<String>,
    ) -> McpResult<String> {
        self.handle_add_song(title, project_id, bpm, key, mood_tags)
            .await
    }

    /// **List songs**: With stage and progress; project_id limits to one project in track order.
    #[tool]
    async fn list_songs(
        &self,
        /// Project ID (optional)
        project_id: Option<String>,
    ) -> McpResult<String> {
        self.handle_list_songs(project_id).await
    }

    /// **Edit a song**: Move it to another stage or change its details.
    /// **Tip**: Use empty string "" to clear optional text fields; bpm 0 clears it.
    #[allow(clippy::too_many_arguments)]
    #[tool]
    async fn update_song(
        &self,
        /// Song ID
        id: String,
        /// New title (optional)
        title: Option<String>,
        /// Stage: idea/writing/recording/production/mixing/mastering/release (optional)
        status: Option<String>,
        /// Tempo, 0=clear (optional)
        bpm: Option<u32>,
        /// Musical key, ""=clear (optional)
        key: Option<String>,
        /// Comma-separated mood tags, ""=clear (optional)
        mood_tags: Option<String>,
        /// low/medium/high/urgent, ""=clear (optional)
        priority: Option<String>,
        /// YYYY-MM-DD, ""=clear (optional)
        due_date: Option<String>,
        /// Link to the DAW project file, ""=clear (optional)
        project_file_link: Option<String>,
        /// Link to shared drive folder, ""=clear (optional)
        drive_link: Option<String>,
    ) -> McpResult<String> {
        self.handle_update_song(
            id,
            title,
            status,
            bpm,
            key,
            mood_tags,
            priority,
            due_date,
            project_file_link,
            drive_link,
        )
        .await
    }

    /// **Delete a song**: Permanently removes its tasks, notes and versions too.
    #[tool]
    async fn delete_song(
        &self,
        /// Song ID
        id: String,
    ) -> McpResult<String> {
        self.handle_delete_song(id).await
    }

    /// **New project**: An EP or album that groups songs.
    #[tool]
    async fn add_project(
        &self,
        /// Project title
        title: String,
        /// Description (optional)
        description: Option<String>,
    ) -> McpResult<String> {
        self.handle_add_project(title, description).await
    }

    /// **List projects**: With track listing and overall progress.
    #[tool]
    async fn list_projects(&self) -> McpResult<String> {
        self.handle_list_projects().await
    }

    /// **Edit a project**: Empty string "" clears optional fields.
    #[tool]
    async fn update_project(
        &self,
        /// Project ID
        id: String,
        /// New title (optional)
        title: Option<String>,
        /// Description, ""=clear (optional)
        description: Option<String>,
        /// low/medium/high/urgent, ""=clear (optional)
        priority: Option<String>,
        /// YYYY-MM-DD, ""=clear (optional)
        due_date: Option<String>,
    ) -> McpResult<String> {
        self.handle_update_project(id, title, description, priority, due_date)
            .await
    }

    /// **Delete a project**: Its songs are kept and unlinked.
    #[tool]
    async fn delete_project(
        &self,
        /// Project ID
        id: String,
    ) -> McpResult<String> {
        self.handle_delete_project(id).await
    }

    /// **Track order**: Set the project's song order.
    #[tool]
    async fn reorder_project(
        &self,
        /// Project ID
        id: String,
        /// Comma-separated song IDs in the new order
        song_ids: String,
    ) -> McpResult<String> {
        self.handle_reorder_project(id, song_ids).await
    }

    /// **Note**: Attach free text (lyrics ideas, feedback) to a song.
    #[tool]
    async fn add_note(
        &self,
        /// Song ID
        song_id: String,
        /// Note text
        content: String,
    ) -> McpResult<String> {
        self.handle_add_note(song_id, content).await
    }

    /// **Edit a note**: Replace its text.
    #[tool]
    async fn update_note(
        &self,
        /// Note ID
        id: String,
        /// New text
        content: String,
    ) -> McpResult<String> {
        self.handle_update_note(id, content).await
    }

    /// **Notes and versions**: List everything attached to a song.
    #[tool]
    async fn list_notes(
        &self,
        /// Song ID
        song_id: String,
    ) -> McpResult<String> {
        self.handle_list_notes(song_id).await
    }

    /// **Delete**: Remove a note or a version by ID.
    #[tool]
    async fn delete_note(
        &self,
        /// Note or version ID
        id: String,
    ) -> McpResult<String> {
        self.handle_delete_note(id).await
    }

    /// **Version**: Record a named bounce or revision, e.g. "mix v3".
    #[tool]
    async fn add_version(
        &self,
        /// Song ID
        song_id: String,
        /// Version name
        name: String,
        /// What changed (optional)
        notes: Option<String>,
    ) -> McpResult<String> {
        self.handle_add_version(song_id, name, notes).await
    }

    /// **Edit a version**: Rename it or change its notes ("" clears notes).
    #[tool]
    async fn update_version(
        &self,
        /// Version ID
        id: String,
        /// New name (optional)
        name: Option<String>,
        /// Notes, ""=clear (optional)
        notes: Option<String>,
    ) -> McpResult<String> {
        self.handle_update_version(id, name, notes).await
    }

    /// **Progress**: Per-section completion of a song, a project's songs, or every song.
    #[tool]
    async fn progress(
        &self,
        /// Song ID (optional)
        song_id: Option<String>,
        /// Project ID (optional, ignored when song_id is given)
        project_id: Option<String>,
    ) -> McpResult<String> {
        self.handle_progress(song_id, project_id).await
    }

    /// **Today**: Open tasks flagged for today's session.
    #[tool]
    async fn today(&self) -> McpResult<String> {
        self.handle_today().await
    }

    /// **Search**: Case-insensitive match over song titles, moods and keys, projects, tasks and notes.
    #[tool]
    async fn search(
        &self,
        /// Text to look for
        query: String,
    ) -> McpResult<String> {
        self.handle_search(query).await
    }

    /// **Activity**: Recent changes, newest first.
    #[tool]
    async fn activity(
        &self,
        /// song/project/task/note/version (optional)
        entity_type: Option<String>,
        /// Only this record (optional)
        entity_id: Option<String>,
        /// Maximum entries (default 20)
        limit: Option<u32>,
    ) -> McpResult<String> {
        self.handle_activity(entity_type, entity_id, limit).await
    }

    /// **Settings**: Show preferences; pass any argument to change it.
    #[tool]
    async fn settings(
        &self,
        /// light/dark (optional)
        theme: Option<String>,
        /// Show stage auras (optional)
        auras_enabled: Option<bool>,
        /// Section for smart input without @section (optional)
        default_section: Option<String>,
        /// Guess the section from keywords when no @section is given (optional)
        keyword_fallback: Option<bool>,
    ) -> McpResult<String> {
        self.handle_settings(theme, auras_enabled, default_section, keyword_fallback)
            .await
    }
}
