use super::error::StoreError;
use super::records::{
    Activity, FieldChange, Note, Project, ProjectPatch, Settings, SettingsPatch, Song, SongPatch,
    Task, TaskPatch, Version, VersionPatch, activity_kind_for,
};
use super::vocab::{ActivityKind, EntityType, Priority, Section};
use super::{generate_id, now};
use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Oldest activity entries are dropped beyond this many
pub const MAX_ACTIVITIES: usize = 1000;

/// Current on-disk format version
const FORMAT_VERSION: u32 = 1;

/// Every record of the tracker, each kind in insertion order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionsData {
    pub format_version: u32,
    pub(crate) settings: Settings,
    pub(crate) songs: Vec<Song>,
    pub(crate) projects: Vec<Project>,
    pub(crate) tasks: Vec<Task>,
    pub(crate) notes: Vec<Note>,
    pub(crate) versions: Vec<Version>,
    pub(crate) activities: Vec<Activity>,
}

impl Default for SessionsData {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            settings: Settings::default(),
            songs: Vec::new(),
            projects: Vec::new(),
            tasks: Vec::new(),
            notes: Vec::new(),
            versions: Vec::new(),
            activities: Vec::new(),
        }
    }
}

impl SessionsData {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn find_song(&self, id: &str) -> Option<&Song> {
        self.songs.iter().find(|s| s.id == id)
    }

    pub fn find_project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn find_task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn find_note(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn find_version(&self, id: &str) -> Option<&Version> {
        self.versions.iter().find(|v| v.id == id)
    }

    fn find_task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Append an activity entry, keeping only the newest [`MAX_ACTIVITIES`]
    pub(crate) fn log_activity(
        &mut self,
        kind: ActivityKind,
        entity_type: EntityType,
        entity_id: &str,
        entity_title: Option<&str>,
        changes: Vec<FieldChange>,
    ) {
        self.activities.push(Activity {
            id: generate_id(),
            kind,
            entity_type,
            entity_id: entity_id.to_string(),
            entity_title: entity_title.map(str::to_string),
            changes,
            created_at: now(),
        });
        if self.activities.len() > MAX_ACTIVITIES {
            let excess = self.activities.len() - MAX_ACTIVITIES;
            self.activities.drain(..excess);
        }
    }

    // Songs

    /// Create a song in the `idea` stage
    ///
    /// When `project_id` names an existing project the song is appended to its
    /// track list; an unknown project id is kept on the song as given.
    pub fn create_song(&mut self, title: &str, project_id: Option<&str>) -> Song {
        let timestamp = now();
        let song = Song {
            id: generate_id(),
            title: title.to_string(),
            project_id: project_id.map(str::to_string),
            bpm: None,
            key: None,
            mood_tags: Vec::new(),
            status: Section::Idea,
            priority: None,
            due_date: None,
            order: None,
            project_file_link: None,
            drive_link: None,
            created_at: timestamp,
            updated_at: timestamp,
        };

        if let Some(project_id) = project_id
            && let Some(project) = self.projects.iter_mut().find(|p| p.id == project_id)
        {
            project.song_ids.push(song.id.clone());
            project.updated_at = timestamp;
        }

        self.songs.push(song.clone());
        debug!("created song {}", song.id);
        self.log_activity(
            ActivityKind::Created,
            EntityType::Song,
            &song.id,
            Some(&song.title),
            Vec::new(),
        );
        song
    }

    pub fn update_song(&mut self, id: &str, patch: SongPatch) -> Option<Song> {
        let song = self.songs.iter_mut().find(|s| s.id == id)?;
        let changes = song.apply(patch);
        song.updated_at = now();
        let song = song.clone();

        let kind = activity_kind_for(&changes, "status");
        self.log_activity(kind, EntityType::Song, &song.id, Some(&song.title), changes);
        Some(song)
    }

    /// Delete a song with its tasks, notes and versions
    pub fn delete_song(&mut self, id: &str) -> Option<Song> {
        let pos = self.songs.iter().position(|s| s.id == id)?;
        let song = self.songs.remove(pos);

        self.tasks.retain(|t| t.song_id != id);
        self.notes.retain(|n| n.song_id != id);
        self.versions.retain(|v| v.song_id != id);
        for project in &mut self.projects {
            project.song_ids.retain(|sid| sid != id);
        }

        info!("deleted song {} and its records", id);
        self.log_activity(
            ActivityKind::Deleted,
            EntityType::Song,
            id,
            Some(&song.title),
            Vec::new(),
        );
        Some(song)
    }

    // Tasks

    /// Create a task at the end of its (song, section) list
    pub fn create_task(
        &mut self,
        song_id: &str,
        section: Section,
        title: &str,
        priority: Option<Priority>,
        due_date: Option<NaiveDate>,
    ) -> Result<Task, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        if self.find_song(song_id).is_none() {
            return Err(StoreError::SongNotFound(song_id.to_string()));
        }

        let order = self
            .tasks
            .iter()
            .filter(|t| t.song_id == song_id && t.section == section)
            .count() as u32;
        let timestamp = now();
        let task = Task {
            id: generate_id(),
            song_id: song_id.to_string(),
            section,
            title: title.to_string(),
            done: false,
            order,
            today: false,
            priority,
            due_date,
            depends_on: Vec::new(),
            estimated_time: None,
            actual_time: None,
            created_at: timestamp,
            updated_at: timestamp,
        };

        self.tasks.push(task.clone());
        debug!("created task {} in {}/{}", task.id, song_id, section);
        self.log_activity(
            ActivityKind::Created,
            EntityType::Task,
            &task.id,
            Some(&task.title),
            Vec::new(),
        );
        Ok(task)
    }

    /// Apply `patch` to a task
    ///
    /// Setting `done` on an open task is refused while any dependency is
    /// unfinished, the same as [`Self::toggle_task_done`].
    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> Result<Task, StoreError> {
        let was_done = self
            .find_task(id)
            .map(|t| t.done)
            .ok_or_else(|| StoreError::TaskNotFound(id.to_string()))?;
        if patch.done == Some(true) && !was_done {
            let blocking: Vec<String> = self
                .blocking_tasks(id)
                .into_iter()
                .map(|t| t.id.clone())
                .collect();
            if !blocking.is_empty() {
                return Err(StoreError::Blocked {
                    task: id.to_string(),
                    blocking,
                });
            }
        }

        let task = self
            .find_task_mut(id)
            .ok_or_else(|| StoreError::TaskNotFound(id.to_string()))?;
        let changes = task.apply(patch);
        task.updated_at = now();
        let task = task.clone();

        let kind = activity_kind_for(&changes, "done");
        self.log_activity(kind, EntityType::Task, &task.id, Some(&task.title), changes);
        Ok(task)
    }

    /// Delete a task and prune it from every `depends_on` list
    pub fn delete_task(&mut self, id: &str) -> Option<Task> {
        let pos = self.tasks.iter().position(|t| t.id == id)?;
        let task = self.tasks.remove(pos);
        for other in &mut self.tasks {
            other.depends_on.retain(|dep| dep != id);
        }

        self.log_activity(
            ActivityKind::Deleted,
            EntityType::Task,
            id,
            Some(&task.title),
            Vec::new(),
        );
        Some(task)
    }

    /// Dependencies of `id` that are not done yet
    ///
    /// Ids that no longer resolve to a task do not block.
    pub fn blocking_tasks(&self, id: &str) -> Vec<&Task> {
        let Some(task) = self.find_task(id) else {
            return Vec::new();
        };
        self.tasks
            .iter()
            .filter(|t| task.depends_on.contains(&t.id) && !t.done)
            .collect()
    }

    pub fn can_complete_task(&self, id: &str) -> bool {
        self.blocking_tasks(id).is_empty()
    }

    /// Flip `done`
    ///
    /// Completing is refused while any dependency is unfinished; reopening is
    /// always allowed.
    pub fn toggle_task_done(&mut self, id: &str) -> Result<Task, StoreError> {
        let done = self
            .find_task(id)
            .map(|t| t.done)
            .ok_or_else(|| StoreError::TaskNotFound(id.to_string()))?;
        self.update_task(
            id,
            TaskPatch {
                done: Some(!done),
                ..Default::default()
            },
        )
    }

    /// Make `id` depend on `dependency`
    ///
    /// Both tasks must belong to the same song and the edge may not close a
    /// cycle. Adding an existing edge is a no-op.
    pub fn add_dependency(&mut self, id: &str, dependency: &str) -> Result<Task, StoreError> {
        if id == dependency {
            return Err(StoreError::SelfDependency(id.to_string()));
        }
        let task = self
            .find_task(id)
            .ok_or_else(|| StoreError::TaskNotFound(id.to_string()))?;
        let other = self
            .find_task(dependency)
            .ok_or_else(|| StoreError::TaskNotFound(dependency.to_string()))?;
        if task.song_id != other.song_id {
            return Err(StoreError::CrossSongDependency {
                task: id.to_string(),
                dependency: dependency.to_string(),
            });
        }
        if self.depends_transitively(dependency, id) {
            return Err(StoreError::DependencyCycle {
                task: id.to_string(),
                dependency: dependency.to_string(),
            });
        }

        let task = self
            .find_task_mut(id)
            .ok_or_else(|| StoreError::TaskNotFound(id.to_string()))?;
        if !task.depends_on.iter().any(|d| d == dependency) {
            task.depends_on.push(dependency.to_string());
            task.updated_at = now();
        }
        Ok(task.clone())
    }

    /// Remove the edge from `id` to `dependency`; `None` if `id` is unknown
    pub fn remove_dependency(&mut self, id: &str, dependency: &str) -> Option<Task> {
        let task = self.find_task_mut(id)?;
        let before = task.depends_on.len();
        task.depends_on.retain(|d| d != dependency);
        if task.depends_on.len() != before {
            task.updated_at = now();
        }
        Some(task.clone())
    }

    /// Whether `from` reaches `to` by following `depends_on` edges
    fn depends_transitively(&self, from: &str, to: &str) -> bool {
        let mut stack = vec![from.to_string()];
        let mut seen = HashSet::new();
        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(task) = self.find_task(&current) {
                stack.extend(task.depends_on.iter().cloned());
            }
        }
        false
    }

    pub fn set_today(&mut self, id: &str, today: bool) -> Option<Task> {
        self.update_task(
            id,
            TaskPatch {
                today: Some(today),
                ..Default::default()
            },
        )
        .ok()
    }

    /// Add `minutes` to the time logged on a task
    pub fn log_time(&mut self, id: &str, minutes: u32) -> Option<Task> {
        let task = self.find_task_mut(id)?;
        task.actual_time = Some(task.actual_time.unwrap_or(0).saturating_add(minutes));
        task.updated_at = now();
        let task = task.clone();

        self.log_activity(
            ActivityKind::Updated,
            EntityType::Task,
            &task.id,
            Some(&task.title),
            vec![FieldChange {
                field: "time_logged".to_string(),
                from: None,
                to: Some(minutes.to_string()),
            }],
        );
        Some(task)
    }

    // Projects

    pub fn create_project(&mut self, title: &str, description: Option<&str>) -> Project {
        let timestamp = now();
        let project = Project {
            id: generate_id(),
            title: title.to_string(),
            description: description.map(str::to_string),
            song_ids: Vec::new(),
            priority: None,
            due_date: None,
            created_at: timestamp,
            updated_at: timestamp,
        };
        self.projects.push(project.clone());
        self.log_activity(
            ActivityKind::Created,
            EntityType::Project,
            &project.id,
            Some(&project.title),
            Vec::new(),
        );
        project
    }

    pub fn update_project(&mut self, id: &str, patch: ProjectPatch) -> Option<Project> {
        let project = self.projects.iter_mut().find(|p| p.id == id)?;
        let changes = project.apply(patch);
        project.updated_at = now();
        let project = project.clone();

        let kind = activity_kind_for(&changes, "status");
        self.log_activity(
            kind,
            EntityType::Project,
            &project.id,
            Some(&project.title),
            changes,
        );
        Some(project)
    }

    /// Delete a project; its songs stay and lose their project link
    pub fn delete_project(&mut self, id: &str) -> Option<Project> {
        let pos = self.projects.iter().position(|p| p.id == id)?;
        let project = self.projects.remove(pos);
        for song in &mut self.songs {
            if song.project_id.as_deref() == Some(id) {
                song.project_id = None;
            }
        }

        self.log_activity(
            ActivityKind::Deleted,
            EntityType::Project,
            id,
            Some(&project.title),
            Vec::new(),
        );
        Some(project)
    }

    /// Replace the track listing and renumber each listed song's `order`
    pub fn reorder_project_songs(
        &mut self,
        project_id: &str,
        song_ids: Vec<String>,
    ) -> Result<Project, StoreError> {
        if let Some(missing) = song_ids.iter().find(|id| self.find_song(id).is_none()) {
            return Err(StoreError::SongNotFound(missing.clone()));
        }
        let timestamp = now();
        let project = self
            .projects
            .iter_mut()
            .find(|p| p.id == project_id)
            .ok_or_else(|| StoreError::ProjectNotFound(project_id.to_string()))?;
        project.song_ids = song_ids;
        project.updated_at = timestamp;
        let project = project.clone();

        for (index, song_id) in project.song_ids.iter().enumerate() {
            if let Some(song) = self.songs.iter_mut().find(|s| &s.id == song_id) {
                song.order = Some(index as u32);
                song.updated_at = timestamp;
            }
        }

        self.log_activity(
            ActivityKind::Updated,
            EntityType::Project,
            &project.id,
            Some(&project.title),
            vec![FieldChange {
                field: "song_order".to_string(),
                from: None,
                to: Some(project.song_ids.join(", ")),
            }],
        );
        Ok(project)
    }

    // Notes

    pub fn create_note(&mut self, song_id: &str, content: &str) -> Result<Note, StoreError> {
        if self.find_song(song_id).is_none() {
            return Err(StoreError::SongNotFound(song_id.to_string()));
        }
        let note = Note {
            id: generate_id(),
            song_id: song_id.to_string(),
            content: content.to_string(),
            updated_at: now(),
        };
        self.notes.push(note.clone());
        self.log_activity(
            ActivityKind::Created,
            EntityType::Note,
            &note.id,
            None,
            Vec::new(),
        );
        Ok(note)
    }

    pub fn update_note(&mut self, id: &str, content: &str) -> Option<Note> {
        let note = self.notes.iter_mut().find(|n| n.id == id)?;
        note.content = content.to_string();
        note.updated_at = now();
        Some(note.clone())
    }

    pub fn delete_note(&mut self, id: &str) -> Option<Note> {
        let pos = self.notes.iter().position(|n| n.id == id)?;
        Some(self.notes.remove(pos))
    }

    // Versions

    pub fn create_version(
        &mut self,
        song_id: &str,
        name: &str,
        notes: Option<&str>,
    ) -> Result<Version, StoreError> {
        if self.find_song(song_id).is_none() {
            return Err(StoreError::SongNotFound(song_id.to_string()));
        }
        let version = Version {
            id: generate_id(),
            song_id: song_id.to_string(),
            name: name.to_string(),
            notes: notes.map(str::to_string),
            created_at: now(),
        };
        self.versions.push(version.clone());
        self.log_activity(
            ActivityKind::Created,
            EntityType::Version,
            &version.id,
            Some(&version.name),
            Vec::new(),
        );
        Ok(version)
    }

    pub fn update_version(&mut self, id: &str, patch: VersionPatch) -> Option<Version> {
        let version = self.versions.iter_mut().find(|v| v.id == id)?;
        version.apply(patch);
        Some(version.clone())
    }

    pub fn delete_version(&mut self, id: &str) -> Option<Version> {
        let pos = self.versions.iter().position(|v| v.id == id)?;
        Some(self.versions.remove(pos))
    }

    // Settings

    pub fn update_settings(&mut self, patch: SettingsPatch) -> Settings {
        self.settings.apply(patch);
        self.settings.clone()
    }
}
