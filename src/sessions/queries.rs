//! Read-only queries over SessionsData
//!
//! Listing, progress arithmetic, the activity feed and search. These are kept
//! apart from the mutating operations in sessions_data.rs.

use super::records::{Activity, Note, Project, Song, Task, Version};
use super::sessions_data::SessionsData;
use super::vocab::{EntityType, Section};

/// Completion of one section of a song
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionProgress {
    /// Percentage, 0 when the section has no tasks
    pub progress: u32,
    /// True only when the section has tasks and all of them are done
    pub is_complete: bool,
    pub total: usize,
    pub completed: usize,
}

/// Records matching a search query, grouped by kind
#[derive(Debug, Default)]
pub struct SearchResults<'a> {
    pub songs: Vec<&'a Song>,
    pub projects: Vec<&'a Project>,
    pub tasks: Vec<&'a Task>,
    pub notes: Vec<&'a Note>,
}

impl SearchResults<'_> {
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
            && self.projects.is_empty()
            && self.tasks.is_empty()
            && self.notes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.songs.len() + self.projects.len() + self.tasks.len() + self.notes.len()
    }
}

fn percent(done: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (done as f64 / total as f64 * 100.0).round() as u32
}

impl SessionsData {
    /// Songs, optionally only those of one project
    ///
    /// A project's songs come in track listing order.
    pub fn list_songs(&self, project_id: Option<&str>) -> Vec<&Song> {
        match project_id {
            None => self.songs.iter().collect(),
            Some(project_id) => match self.find_project(project_id) {
                Some(project) => project
                    .song_ids
                    .iter()
                    .filter_map(|id| self.find_song(id))
                    .collect(),
                None => self
                    .songs
                    .iter()
                    .filter(|s| s.project_id.as_deref() == Some(project_id))
                    .collect(),
            },
        }
    }

    /// Tasks of a song sorted by section then `order`
    pub fn tasks_by_song(&self, song_id: &str) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.tasks.iter().filter(|t| t.song_id == song_id).collect();
        tasks.sort_by_key(|t| (t.section, t.order));
        tasks
    }

    /// Tasks of one section of a song sorted by `order`
    pub fn tasks_by_section(&self, song_id: &str, section: Section) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.song_id == song_id && t.section == section)
            .collect();
        tasks.sort_by_key(|t| t.order);
        tasks
    }

    /// Open tasks planned for today, across all songs
    pub fn today_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.today && !t.done).collect()
    }

    pub fn notes_by_song(&self, song_id: &str) -> Vec<&Note> {
        self.notes.iter().filter(|n| n.song_id == song_id).collect()
    }

    pub fn versions_by_song(&self, song_id: &str) -> Vec<&Version> {
        self.versions.iter().filter(|v| v.song_id == song_id).collect()
    }

    /// Percentage of a song's tasks that are done
    pub fn song_progress(&self, song_id: &str) -> u32 {
        let tasks: Vec<&Task> = self.tasks.iter().filter(|t| t.song_id == song_id).collect();
        percent(tasks.iter().filter(|t| t.done).count(), tasks.len())
    }

    pub fn section_progress(&self, song_id: &str, section: Section) -> SectionProgress {
        let tasks = self.tasks_by_section(song_id, section);
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.done).count();
        SectionProgress {
            progress: percent(completed, total),
            is_complete: total > 0 && completed == total,
            total,
            completed,
        }
    }

    /// Mean progress of a project's songs
    pub fn project_progress(&self, project_id: &str) -> u32 {
        let songs = self.list_songs(Some(project_id));
        if songs.is_empty() {
            return 0;
        }
        let sum: u32 = songs.iter().map(|s| self.song_progress(&s.id)).sum();
        (sum as f64 / songs.len() as f64).round() as u32
    }

    /// Activity entries, newest first
    pub fn activities(
        &self,
        entity_type: Option<EntityType>,
        entity_id: Option<&str>,
        limit: Option<usize>,
    ) -> Vec<&Activity> {
        self.activities
            .iter()
            .rev()
            .filter(|a| entity_type.is_none_or(|kind| a.entity_type == kind))
            .filter(|a| entity_id.is_none_or(|id| a.entity_id == id))
            .take(limit.unwrap_or(usize::MAX))
            .collect()
    }

    /// Case-insensitive substring search
    ///
    /// Matches song title, mood tags and key; project title and description;
    /// task title; note content. A blank query matches nothing.
    pub fn search(&self, query: &str) -> SearchResults<'_> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return SearchResults::default();
        }
        let hit = |text: &str| text.to_lowercase().contains(&needle);

        SearchResults {
            songs: self
                .songs
                .iter()
                .filter(|s| {
                    hit(&s.title)
                        || s.mood_tags.iter().any(|tag| hit(tag))
                        || s.key.as_deref().is_some_and(hit)
                })
                .collect(),
            projects: self
                .projects
                .iter()
                .filter(|p| hit(&p.title) || p.description.as_deref().is_some_and(hit))
                .collect(),
            tasks: self.tasks.iter().filter(|t| hit(&t.title)).collect(),
            notes: self.notes.iter().filter(|n| hit(&n.content)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::{SongPatch, TaskPatch};

    #[test]
    fn test_progress_rounds_to_nearest() {
        let mut data = SessionsData::new();
        let song = data.create_song("Tides", None);
        let a = data.create_task(&song.id, Section::Mixing, "a", None, None).unwrap();
        data.create_task(&song.id, Section::Mixing, "b", None, None).unwrap();
        data.create_task(&song.id, Section::Writing, "c", None, None).unwrap();
        assert_eq!(data.song_progress(&song.id), 0);

        data.toggle_task_done(&a.id).unwrap();
        // 1 of 3
        assert_eq!(data.song_progress(&song.id), 33);

        let mixing = data.section_progress(&song.id, Section::Mixing);
        assert_eq!(mixing.progress, 50);
        assert!(!mixing.is_complete);
        assert_eq!((mixing.completed, mixing.total), (1, 2));

        let empty = data.section_progress(&song.id, Section::Release);
        assert_eq!(empty.progress, 0);
        assert!(!empty.is_complete);
    }

    #[test]
    fn test_project_progress_is_mean_of_songs() {
        let mut data = SessionsData::new();
        let project = data.create_project("EP", None);
        assert_eq!(data.project_progress(&project.id), 0);

        let one = data.create_song("One", Some(&project.id));
        data.create_song("Two", Some(&project.id));
        let task = data.create_task(&one.id, Section::Idea, "t", None, None).unwrap();
        data.toggle_task_done(&task.id).unwrap();
        // (100 + 0) / 2
        assert_eq!(data.project_progress(&project.id), 50);
    }

    #[test]
    fn test_today_tasks_skip_done() {
        let mut data = SessionsData::new();
        let song = data.create_song("Glass", None);
        let a = data.create_task(&song.id, Section::Idea, "a", None, None).unwrap();
        let b = data.create_task(&song.id, Section::Idea, "b", None, None).unwrap();
        data.set_today(&a.id, true);
        data.update_task(
            &b.id,
            TaskPatch {
                today: Some(true),
                done: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
        let today: Vec<&str> = data.today_tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(today, vec![a.id.as_str()]);
    }

    #[test]
    fn test_search_covers_tags_and_notes() {
        let mut data = SessionsData::new();
        let song = data.create_song("Harbor Lights", None);
        data.update_song(
            &song.id,
            SongPatch {
                mood_tags: Some(vec!["Dreamy".to_string()]),
                key: Some(Some("A minor".to_string())),
                ..Default::default()
            },
        );
        data.create_note(&song.id, "try a dreamy pad in the bridge").unwrap();

        let results = data.search("DREAMY");
        assert_eq!(results.songs.len(), 1);
        assert_eq!(results.notes.len(), 1);
        assert!(results.tasks.is_empty());
        assert_eq!(data.search("a minor").songs.len(), 1);
        assert!(data.search("   ").is_empty());
    }

    #[test]
    fn test_activities_newest_first_with_filters() {
        let mut data = SessionsData::new();
        let song = data.create_song("Ember", None);
        let project = data.create_project("LP", None);
        data.create_task(&song.id, Section::Idea, "t", None, None).unwrap();

        let all = data.activities(None, None, None);
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].entity_type, EntityType::Task);

        let projects = data.activities(Some(EntityType::Project), None, None);
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].entity_id, project.id);

        assert_eq!(data.activities(None, Some(&song.id), None).len(), 1);
        assert_eq!(data.activities(None, None, Some(2)).len(), 2);
    }
}
