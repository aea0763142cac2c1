//! Note and version handlers

use crate::SessionsServerHandler;
use crate::formatting;
use crate::sessions::VersionPatch;
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};

impl SessionsServerHandler {
    pub async fn handle_add_note(&self, song_id: String, content: String) -> McpResult<String> {
        let song_id = validation::normalize_id(&song_id);
        if content.trim().is_empty() {
            bail_public!(_, "Note content must not be empty");
        }

        let mut data = self.lock_data();
        let note = match data.create_note(&song_id, &content) {
            Ok(note) => note,
            Err(e) => {
                let msg = validation::format_store_error(&e, &data);
                drop(data);
                bail_public!(_, "{}", msg);
            }
        };
        self.save_data(&data)?;
        drop(data);

        Ok(format!("Note created with ID: {}", note.id))
    }

    pub async fn handle_update_note(&self, id: String, content: String) -> McpResult<String> {
        let id = validation::normalize_id(&id);

        let mut data = self.lock_data();
        if data.update_note(&id, &content).is_none() {
            drop(data);
            bail_public!(_, "Note '{}' not found", id);
        }
        self.save_data(&data)?;
        drop(data);

        Ok(format!("Note '{}' updated", id))
    }

    /// Records a named bounce or revision of a song.
    pub async fn handle_add_version(
        &self,
        song_id: String,
        name: String,
        notes: Option<String>,
    ) -> McpResult<String> {
        let song_id = validation::normalize_id(&song_id);
        let name = name.trim().to_string();
        if name.is_empty() {
            bail_public!(_, "Version name must not be empty");
        }
        let notes = validation::clearable_text(notes).flatten();

        let mut data = self.lock_data();
        let version = match data.create_version(&song_id, &name, notes.as_deref()) {
            Ok(version) => version,
            Err(e) => {
                let msg = validation::format_store_error(&e, &data);
                drop(data);
                bail_public!(_, "{}", msg);
            }
        };
        self.save_data(&data)?;
        drop(data);

        Ok(format!(
            "Version created with ID: {} ({})",
            version.id, version.name
        ))
    }

    pub async fn handle_update_version(
        &self,
        id: String,
        name: Option<String>,
        notes: Option<String>,
    ) -> McpResult<String> {
        let id = validation::normalize_id(&id);
        if let Some(ref n) = name
            && n.trim().is_empty()
        {
            bail_public!(_, "Version name must not be empty");
        }
        let patch = VersionPatch {
            name: name.map(|n| n.trim().to_string()),
            notes: validation::clearable_text(notes),
        };

        let mut data = self.lock_data();
        let version = match data.update_version(&id, patch) {
            Some(version) => version,
            None => {
                drop(data);
                bail_public!(_, "Version '{}' not found", id);
            }
        };
        self.save_data(&data)?;
        drop(data);

        Ok(format!("Version '{}' updated", version.name))
    }

    /// Lists notes and versions of a song.
    pub async fn handle_list_notes(&self, song_id: String) -> McpResult<String> {
        let song_id = validation::normalize_id(&song_id);

        let data = self.lock_data();
        let Some(song) = data.find_song(&song_id) else {
            let msg = validation::format_invalid_song_error(&song_id, &data);
            bail_public!(_, "{}", msg);
        };
        let notes = data.notes_by_song(&song_id);
        let versions = data.versions_by_song(&song_id);
        if notes.is_empty() && versions.is_empty() {
            return Ok(format!("No notes or versions for '{}'", song.title));
        }
        Ok(format!(
            "Notes and versions for '{}':\n\n{}",
            song.title,
            formatting::format_notes(&notes, &versions)
        ))
    }

    /// Deletes a note or a version by id.
    pub async fn handle_delete_note(&self, id: String) -> McpResult<String> {
        let id = validation::normalize_id(&id);

        let mut data = self.lock_data();
        let deleted = if data.delete_note(&id).is_some() {
            "Note"
        } else if data.delete_version(&id).is_some() {
            "Version"
        } else {
            drop(data);
            bail_public!(_, "No note or version with ID '{}'", id);
        };
        self.save_data(&data)?;
        drop(data);

        Ok(format!("{} '{}' deleted", deleted, id))
    }
}
