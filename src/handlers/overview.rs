//! Read-only overview handlers: progress, today list, search, activity feed

use crate::SessionsServerHandler;
use crate::formatting;
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};

/// Entries shown by the activity tool when no limit is given
const DEFAULT_ACTIVITY_LIMIT: usize = 20;

impl SessionsServerHandler {
    /// Progress of one song, one project, or every song when neither is given.
    pub async fn handle_progress(
        &self,
        song_id: Option<String>,
        project_id: Option<String>,
    ) -> McpResult<String> {
        let data = self.lock_data();

        if let Some(song_id) = song_id {
            let song_id = validation::normalize_id(&song_id);
            let Some(song) = data.find_song(&song_id) else {
                let msg = validation::format_invalid_song_error(&song_id, &data);
                bail_public!(_, "{}", msg);
            };
            return Ok(formatting::format_song_progress(&data, song));
        }

        if let Some(project_id) = project_id {
            let project_id = validation::normalize_id(&project_id);
            let Some(project) = data.find_project(&project_id) else {
                let msg = validation::format_invalid_project_error(&project_id, &data);
                bail_public!(_, "{}", msg);
            };
            let mut result = format!(
                "'{}': {}% done\n",
                project.title,
                data.project_progress(&project.id)
            );
            for song in data.list_songs(Some(&project.id)) {
                result.push_str(&format!(
                    "  {}: {}%\n",
                    song.title,
                    data.song_progress(&song.id)
                ));
            }
            return Ok(result);
        }

        if data.songs().is_empty() {
            return Ok("No songs found".to_string());
        }
        let mut result = String::new();
        for song in data.songs() {
            result.push_str(&formatting::format_song_progress(&data, song));
        }
        Ok(result)
    }

    /// Open tasks flagged for today, with their song.
    pub async fn handle_today(&self) -> McpResult<String> {
        let data = self.lock_data();
        let tasks = data.today_tasks();
        if tasks.is_empty() {
            return Ok("Nothing planned for today".to_string());
        }

        let mut result = format!("{} task(s) for today:\n\n", tasks.len());
        for task in tasks {
            let song = data
                .find_song(&task.song_id)
                .map_or(task.song_id.as_str(), |s| s.title.as_str());
            let line = formatting::format_task_line(task);
            result.push_str(&format!("- {}: {}", song, line.trim_start_matches("- ")));
        }
        Ok(result)
    }

    pub async fn handle_search(&self, query: String) -> McpResult<String> {
        if query.trim().is_empty() {
            bail_public!(_, "Search query must not be empty");
        }
        let data = self.lock_data();
        let results = data.search(&query);
        Ok(formatting::format_search(query.trim(), &results))
    }

    /// Newest activity first, optionally for one kind of record or one record.
    pub async fn handle_activity(
        &self,
        entity_type: Option<String>,
        entity_id: Option<String>,
        limit: Option<u32>,
    ) -> McpResult<String> {
        let entity_type = match entity_type {
            Some(ref s) => Some(validation::parse_entity_type(s)?),
            None => None,
        };
        let entity_id = entity_id.map(|id| validation::normalize_id(&id));
        let limit = limit.map_or(DEFAULT_ACTIVITY_LIMIT, |l| l as usize);

        let data = self.lock_data();
        let activities = data.activities(entity_type, entity_id.as_deref(), Some(limit));
        Ok(formatting::format_activities(&activities))
    }
}
