//! Project (EP / album) handlers

use crate::SessionsServerHandler;
use crate::formatting;
use crate::sessions::ProjectPatch;
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};

impl SessionsServerHandler {
    pub async fn handle_add_project(
        &self,
        title: String,
        description: Option<String>,
    ) -> McpResult<String> {
        let title = title.trim().to_string();
        if title.is_empty() {
            bail_public!(_, "Project title must not be empty");
        }
        let description = validation::clearable_text(description).flatten();

        let mut data = self.lock_data();
        let project = data.create_project(&title, description.as_deref());
        self.save_data(&data)?;
        drop(data);

        Ok(format!(
            "Project created with ID: {} ({})",
            project.id, project.title
        ))
    }

    pub async fn handle_list_projects(&self) -> McpResult<String> {
        let data = self.lock_data();
        Ok(formatting::format_projects(&data, data.projects()))
    }

    /// Edits project fields; empty strings clear optional fields.
    pub async fn handle_update_project(
        &self,
        id: String,
        title: Option<String>,
        description: Option<String>,
        priority: Option<String>,
        due_date: Option<String>,
    ) -> McpResult<String> {
        let id = validation::normalize_id(&id);

        if let Some(ref t) = title
            && t.trim().is_empty()
        {
            bail_public!(_, "Project title must not be empty");
        }
        let patch = ProjectPatch {
            title: title.map(|t| t.trim().to_string()),
            description: validation::clearable_text(description),
            priority: validation::parse_clearable(priority, validation::parse_priority)?,
            due_date: validation::parse_clearable(due_date, validation::parse_date)?,
        };

        let mut data = self.lock_data();
        let project = match data.update_project(&id, patch) {
            Some(project) => project,
            None => {
                let msg = validation::format_invalid_project_error(&id, &data);
                drop(data);
                bail_public!(_, "{}", msg);
            }
        };
        self.save_data(&data)?;
        drop(data);

        Ok(format!("Project '{}' updated", project.title))
    }

    /// Deletes a project; its songs are kept and unlinked.
    pub async fn handle_delete_project(&self, id: String) -> McpResult<String> {
        let id = validation::normalize_id(&id);

        let mut data = self.lock_data();
        let project = match data.delete_project(&id) {
            Some(project) => project,
            None => {
                let msg = validation::format_invalid_project_error(&id, &data);
                drop(data);
                bail_public!(_, "{}", msg);
            }
        };
        self.save_data(&data)?;
        drop(data);

        Ok(format!(
            "Project '{}' deleted; its {} song(s) were kept",
            project.title,
            project.song_ids.len()
        ))
    }

    /// Sets the track listing from a comma-separated list of song ids.
    pub async fn handle_reorder_project(&self, id: String, song_ids: String) -> McpResult<String> {
        let id = validation::normalize_id(&id);
        let song_ids = validation::split_list(&song_ids);

        let mut data = self.lock_data();
        let project = match data.reorder_project_songs(&id, song_ids) {
            Ok(project) => project,
            Err(e) => {
                let msg = validation::format_store_error(&e, &data);
                drop(data);
                bail_public!(_, "{}", msg);
            }
        };
        self.save_data(&data)?;

        let mut result = format!("Track listing of '{}':\n", project.title);
        for (index, song) in data.list_songs(Some(&project.id)).iter().enumerate() {
            result.push_str(&format!("  {}. {}\n", index + 1, song.title));
        }
        drop(data);
        Ok(result)
    }
}
