use super::vocab::{ActivityKind, EntityType, Priority, Section, Theme};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A song being worked on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub title: String,
    /// Owning project, kept in sync with `Project::song_ids`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm: Option<u32>,
    /// Musical key, e.g. "F# minor"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mood_tags: Vec<String>,
    /// Pipeline stage the song is in
    #[serde(default)]
    pub status: Section,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Position inside the owning project
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_file_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An EP or album grouping songs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Track listing order
    #[serde(default)]
    pub song_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A checklist item of a song
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub song_id: String,
    pub section: Section,
    pub title: String,
    #[serde(default)]
    pub done: bool,
    /// Position within (song_id, section), assigned at creation
    #[serde(default)]
    pub order: u32,
    /// Planned for today's session
    #[serde(default)]
    pub today: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Tasks of the same song that must be done first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    /// Minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<u32>,
    /// Minutes logged so far
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_time: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub song_id: String,
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

/// A named bounce or revision of a song
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Version {
    pub id: String,
    pub song_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One changed field of an update, values rendered as text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

/// Activity log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub kind: ActivityKind,
    pub entity_type: EntityType,
    pub entity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<FieldChange>,
    pub created_at: DateTime<Utc>,
}

/// User preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    pub auras_enabled: bool,
    /// Section for smart input that names none
    pub default_section: Section,
    /// Guess a section from keywords when smart input has no `@section`
    pub keyword_fallback: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            auras_enabled: true,
            default_section: Section::Idea,
            keyword_fallback: false,
        }
    }
}

// Patches: `None` leaves a field alone, `Some(None)` clears an optional field.

#[derive(Debug, Clone, Default)]
pub struct SongPatch {
    pub title: Option<String>,
    pub status: Option<Section>,
    pub bpm: Option<Option<u32>>,
    pub key: Option<Option<String>>,
    pub mood_tags: Option<Vec<String>>,
    pub priority: Option<Option<Priority>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub project_file_link: Option<Option<String>>,
    pub drive_link: Option<Option<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<Option<Priority>>,
    pub due_date: Option<Option<NaiveDate>>,
}

#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub section: Option<Section>,
    pub done: Option<bool>,
    pub today: Option<bool>,
    pub priority: Option<Option<Priority>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub estimated_time: Option<Option<u32>>,
}

#[derive(Debug, Clone, Default)]
pub struct VersionPatch {
    pub name: Option<String>,
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub theme: Option<Theme>,
    pub auras_enabled: Option<bool>,
    pub default_section: Option<Section>,
    pub keyword_fallback: Option<bool>,
}

fn set<T: PartialEq + Display>(
    changes: &mut Vec<FieldChange>,
    field: &str,
    slot: &mut T,
    value: Option<T>,
) {
    let Some(value) = value else {
        return;
    };
    if *slot != value {
        changes.push(FieldChange {
            field: field.to_string(),
            from: Some(slot.to_string()),
            to: Some(value.to_string()),
        });
        *slot = value;
    }
}

fn set_optional<T: PartialEq + Display>(
    changes: &mut Vec<FieldChange>,
    field: &str,
    slot: &mut Option<T>,
    value: Option<Option<T>>,
) {
    let Some(value) = value else {
        return;
    };
    if *slot != value {
        changes.push(FieldChange {
            field: field.to_string(),
            from: slot.as_ref().map(ToString::to_string),
            to: value.as_ref().map(ToString::to_string),
        });
        *slot = value;
    }
}

impl Song {
    /// Apply `patch`, returning the fields that actually changed
    pub(crate) fn apply(&mut self, patch: SongPatch) -> Vec<FieldChange> {
        let mut changes = Vec::new();
        set(&mut changes, "title", &mut self.title, patch.title);
        set(&mut changes, "status", &mut self.status, patch.status);
        set_optional(&mut changes, "bpm", &mut self.bpm, patch.bpm);
        set_optional(&mut changes, "key", &mut self.key, patch.key);
        if let Some(tags) = patch.mood_tags
            && tags != self.mood_tags
        {
            changes.push(FieldChange {
                field: "mood_tags".to_string(),
                from: Some(self.mood_tags.join(", ")),
                to: Some(tags.join(", ")),
            });
            self.mood_tags = tags;
        }
        set_optional(&mut changes, "priority", &mut self.priority, patch.priority);
        set_optional(&mut changes, "due_date", &mut self.due_date, patch.due_date);
        set_optional(
            &mut changes,
            "project_file_link",
            &mut self.project_file_link,
            patch.project_file_link,
        );
        set_optional(&mut changes, "drive_link", &mut self.drive_link, patch.drive_link);
        changes
    }
}

impl Project {
    pub(crate) fn apply(&mut self, patch: ProjectPatch) -> Vec<FieldChange> {
        let mut changes = Vec::new();
        set(&mut changes, "title", &mut self.title, patch.title);
        set_optional(
            &mut changes,
            "description",
            &mut self.description,
            patch.description,
        );
        set_optional(&mut changes, "priority", &mut self.priority, patch.priority);
        set_optional(&mut changes, "due_date", &mut self.due_date, patch.due_date);
        changes
    }
}

impl Task {
    pub(crate) fn apply(&mut self, patch: TaskPatch) -> Vec<FieldChange> {
        let mut changes = Vec::new();
        set(&mut changes, "title", &mut self.title, patch.title);
        set(&mut changes, "section", &mut self.section, patch.section);
        set(&mut changes, "done", &mut self.done, patch.done);
        set(&mut changes, "today", &mut self.today, patch.today);
        set_optional(&mut changes, "priority", &mut self.priority, patch.priority);
        set_optional(&mut changes, "due_date", &mut self.due_date, patch.due_date);
        set_optional(
            &mut changes,
            "estimated_time",
            &mut self.estimated_time,
            patch.estimated_time,
        );
        changes
    }
}

impl Version {
    pub(crate) fn apply(&mut self, patch: VersionPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }
}

impl Settings {
    pub(crate) fn apply(&mut self, patch: SettingsPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(enabled) = patch.auras_enabled {
            self.auras_enabled = enabled;
        }
        if let Some(section) = patch.default_section {
            self.default_section = section;
        }
        if let Some(enabled) = patch.keyword_fallback {
            self.keyword_fallback = enabled;
        }
    }
}

/// Pick the activity kind for an update from its changed fields
///
/// Later checks take precedence, so a change to both `done` and `priority`
/// is logged as a priority change.
pub(crate) fn activity_kind_for(changes: &[FieldChange], status_field: &str) -> ActivityKind {
    let changed = |field: &str| changes.iter().any(|c| c.field == field);
    let mut kind = ActivityKind::Updated;
    if changed(status_field) {
        kind = if status_field == "done" {
            ActivityKind::Completed
        } else {
            ActivityKind::StatusChanged
        };
    }
    if changed("priority") {
        kind = ActivityKind::PriorityChanged;
    }
    if changed("due_date") {
        kind = ActivityKind::DueDateChanged;
    }
    kind
}
