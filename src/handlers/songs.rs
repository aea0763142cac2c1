//! Song handlers

use crate::SessionsServerHandler;
use crate::formatting;
use crate::sessions::SongPatch;
use crate::validation;
use log::info;
use mcp_attr::{Result as McpResult, bail_public};

impl SessionsServerHandler {
    /// Creates a song in the idea stage, optionally inside a project.
    pub async fn handle_add_song(
        &self,
        title: String,
        project_id: Option<String>,
        bpm: Option<u32>,
        key: Option<String>,
        mood_tags: Option<String>,
    ) -> McpResult<String> {
        let title = title.trim().to_string();
        if title.is_empty() {
            bail_public!(_, "Song title must not be empty");
        }
        let project_id = project_id
            .map(|p| validation::normalize_id(&p))
            .filter(|p| !p.is_empty());

        let mut data = self.lock_data();
        if let Some(ref project_id) = project_id
            && data.find_project(project_id).is_none()
        {
            let msg = validation::format_invalid_project_error(project_id, &data);
            drop(data);
            bail_public!(_, "{}", msg);
        }

        let song = data.create_song(&title, project_id.as_deref());
        let has_details = bpm.is_some() || key.is_some() || mood_tags.is_some();
        let song = if has_details {
            let patch = SongPatch {
                bpm: bpm.filter(|b| *b > 0).map(Some),
                key: validation::clearable_text(key),
                mood_tags: mood_tags.map(|tags| validation::split_list(&tags)),
                ..Default::default()
            };
            data.update_song(&song.id, patch).unwrap_or(song)
        } else {
            song
        };
        self.save_data(&data)?;
        drop(data);

        Ok(format!("Song created with ID: {} ({})", song.id, song.title))
    }

    pub async fn handle_list_songs(&self, project_id: Option<String>) -> McpResult<String> {
        let data = self.lock_data();
        let project_id = project_id.map(|p| validation::normalize_id(&p));
        if let Some(ref project_id) = project_id
            && data.find_project(project_id).is_none()
        {
            let msg = validation::format_invalid_project_error(project_id, &data);
            bail_public!(_, "{}", msg);
        }

        let songs = data.list_songs(project_id.as_deref());
        Ok(formatting::format_songs(&data, &songs))
    }

    /// Edits song fields; empty strings (or bpm 0) clear optional fields.
    #[allow(clippy::too_many_arguments)]
    pub async fn handle_update_song(
        &self,
        id: String,
        title: Option<String>,
        status: Option<String>,
        bpm: Option<u32>,
        key: Option<String>,
        mood_tags: Option<String>,
        priority: Option<String>,
        due_date: Option<String>,
        project_file_link: Option<String>,
        drive_link: Option<String>,
    ) -> McpResult<String> {
        let id = validation::normalize_id(&id);

        if let Some(ref t) = title
            && t.trim().is_empty()
        {
            bail_public!(_, "Song title must not be empty");
        }
        let patch = SongPatch {
            title: title.map(|t| t.trim().to_string()),
            status: match status {
                Some(ref s) => Some(validation::parse_section(s)?),
                None => None,
            },
            bpm: bpm.map(|b| if b == 0 { None } else { Some(b) }),
            key: validation::clearable_text(key),
            mood_tags: mood_tags.map(|tags| validation::split_list(&tags)),
            priority: validation::parse_clearable(priority, validation::parse_priority)?,
            due_date: validation::parse_clearable(due_date, validation::parse_date)?,
            project_file_link: validation::clearable_text(project_file_link),
            drive_link: validation::clearable_text(drive_link),
        };

        let mut data = self.lock_data();
        let song = match data.update_song(&id, patch) {
            Some(song) => song,
            None => {
                let msg = validation::format_invalid_song_error(&id, &data);
                drop(data);
                bail_public!(_, "{}", msg);
            }
        };
        self.save_data(&data)?;
        let line = formatting::format_song_line(&data, &song);
        drop(data);

        Ok(format!("Song updated\n{}", line))
    }

    /// Deletes a song together with its tasks, notes and versions.
    pub async fn handle_delete_song(&self, id: String) -> McpResult<String> {
        let id = validation::normalize_id(&id);

        let mut data = self.lock_data();
        let tasks = data.tasks_by_song(&id).len();
        let song = match data.delete_song(&id) {
            Some(song) => song,
            None => {
                let msg = validation::format_invalid_song_error(&id, &data);
                drop(data);
                bail_public!(_, "{}", msg);
            }
        };
        self.save_data(&data)?;
        drop(data);

        info!("deleted song {} with {} task(s)", id, tasks);
        Ok(format!(
            "Song '{}' deleted along with {} task(s)",
            song.title, tasks
        ))
    }
}
