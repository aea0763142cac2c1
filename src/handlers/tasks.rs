//! Task handlers: listing, editing, completion, dependencies, time tracking

use crate::SessionsServerHandler;
use crate::formatting;
use crate::sessions::{StoreError, TaskPatch};
use crate::validation;
use log::info;
use mcp_attr::{Result as McpResult, bail_public};

impl SessionsServerHandler {
    /// Lists tasks of one song (grouped by section) or across all songs.
    pub async fn handle_list_tasks(
        &self,
        song_id: Option<String>,
        section: Option<String>,
        include_done: Option<bool>,
    ) -> McpResult<String> {
        let section_filter = match section {
            Some(ref s) => Some(validation::parse_section(s)?),
            None => None,
        };
        let include_done = include_done.unwrap_or(true);

        let data = self.lock_data();
        let song = match song_id {
            Some(ref id) => {
                let id = validation::normalize_id(id);
                match data.find_song(&id) {
                    Some(song) => Some(song),
                    None => {
                        let msg = validation::format_invalid_song_error(&id, &data);
                        bail_public!(_, "{}", msg);
                    }
                }
            }
            None => None,
        };

        // Whole song without filters keeps the section grouping
        if let Some(song) = song
            && section_filter.is_none()
            && include_done
        {
            return Ok(formatting::format_song_tasks(&data, song));
        }

        let mut tasks = match song {
            Some(song) => data.tasks_by_song(&song.id),
            None => data.tasks().iter().collect(),
        };
        if let Some(section) = section_filter {
            tasks.retain(|t| t.section == section);
        }
        if !include_done {
            tasks.retain(|t| !t.done);
        }
        Ok(formatting::format_tasks(&tasks))
    }

    /// Edits task fields; empty strings clear optional fields.
    #[allow(clippy::too_many_arguments)]
    pub async fn handle_update_task(
        &self,
        id: String,
        title: Option<String>,
        section: Option<String>,
        priority: Option<String>,
        due_date: Option<String>,
        estimated_time: Option<u32>,
        today: Option<bool>,
    ) -> McpResult<String> {
        let id = validation::normalize_id(&id);

        if let Some(ref t) = title
            && t.trim().is_empty()
        {
            bail_public!(_, "Task title must not be empty");
        }
        let patch = TaskPatch {
            title: title.map(|t| t.trim().to_string()),
            section: match section {
                Some(ref s) => Some(validation::parse_section(s)?),
                None => None,
            },
            done: None,
            today,
            priority: validation::parse_clearable(priority, validation::parse_priority)?,
            due_date: validation::parse_clearable(due_date, validation::parse_date)?,
            // 0 clears the estimate
            estimated_time: estimated_time.map(|m| if m == 0 { None } else { Some(m) }),
        };

        let mut data = self.lock_data();
        let task = match data.update_task(&id, patch) {
            Ok(task) => task,
            Err(e) => {
                let msg = validation::format_store_error(&e, &data);
                drop(data);
                bail_public!(_, "{}", msg);
            }
        };
        self.save_data(&data)?;
        drop(data);

        Ok(format!(
            "Task updated\n{}",
            formatting::format_task_line(&task)
        ))
    }

    /// Completes an open task or reopens a done one.
    pub async fn handle_toggle_task(&self, id: String) -> McpResult<String> {
        let id = validation::normalize_id(&id);

        let mut data = self.lock_data();
        let task = match data.toggle_task_done(&id) {
            Ok(task) => task,
            Err(e) => {
                let msg = validation::format_store_error(&e, &data);
                drop(data);
                bail_public!(_, "{}", msg);
            }
        };
        self.save_data(&data)?;
        drop(data);

        let verb = if task.done { "completed" } else { "reopened" };
        Ok(format!("Task '{}' {}", task.title, verb))
    }

    pub async fn handle_delete_task(&self, id: String) -> McpResult<String> {
        let id = validation::normalize_id(&id);

        let mut data = self.lock_data();
        let task = match data.delete_task(&id) {
            Some(task) => task,
            None => {
                drop(data);
                bail_public!(_, "Task '{}' not found", id);
            }
        };
        self.save_data(&data)?;
        drop(data);

        info!("deleted task {}", id);
        Ok(format!("Task '{}' deleted", task.title))
    }

    /// Adds (or with `remove`, drops) a "must be done first" link between two tasks.
    pub async fn handle_link_task(
        &self,
        id: String,
        depends_on: String,
        remove: Option<bool>,
    ) -> McpResult<String> {
        let id = validation::normalize_id(&id);
        let depends_on = validation::normalize_id(&depends_on);

        let mut data = self.lock_data();
        let result = if remove.unwrap_or(false) {
            data.remove_dependency(&id, &depends_on)
                .ok_or_else(|| StoreError::TaskNotFound(id.clone()))
        } else {
            data.add_dependency(&id, &depends_on)
        };
        let task = match result {
            Ok(task) => task,
            Err(e) => {
                let msg = validation::format_store_error(&e, &data);
                drop(data);
                bail_public!(_, "{}", msg);
            }
        };
        self.save_data(&data)?;
        drop(data);

        if task.depends_on.is_empty() {
            Ok(format!("Task '{}' has no dependencies", task.title))
        } else {
            Ok(format!(
                "Task '{}' depends on: {}",
                task.title,
                task.depends_on.join(", ")
            ))
        }
    }

    pub async fn handle_log_time(&self, id: String, minutes: u32) -> McpResult<String> {
        let id = validation::normalize_id(&id);
        if minutes == 0 {
            bail_public!(_, "Minutes must be greater than zero");
        }

        let mut data = self.lock_data();
        let task = match data.log_time(&id, minutes) {
            Some(task) => task,
            None => {
                drop(data);
                bail_public!(_, "Task '{}' not found", id);
            }
        };
        self.save_data(&data)?;
        drop(data);

        Ok(format!(
            "Logged {} min on '{}' ({} min total)",
            minutes,
            task.title,
            task.actual_time.unwrap_or(0)
        ))
    }
}
