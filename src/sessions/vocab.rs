use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Production pipeline stage
///
/// Shared by task sections and song statuses. Variants are declared in
/// pipeline order, so `Ord` follows the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Loose ideas and general tasks
    #[default]
    Idea,
    Writing,
    Recording,
    Production,
    Mixing,
    Mastering,
    /// Distribution, artwork and promo
    Release,
}

impl Section {
    /// All sections in pipeline order
    pub const ALL: [Section; 7] = [
        Section::Idea,
        Section::Writing,
        Section::Recording,
        Section::Production,
        Section::Mixing,
        Section::Mastering,
        Section::Release,
    ];

    /// Identifier used in tags, TOML and tool parameters
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Idea => "idea",
            Section::Writing => "writing",
            Section::Recording => "recording",
            Section::Production => "production",
            Section::Mixing => "mixing",
            Section::Mastering => "mastering",
            Section::Release => "release",
        }
    }

    /// Human readable heading
    pub fn label(&self) -> &'static str {
        match self {
            Section::Idea => "General",
            Section::Writing => "Writing",
            Section::Recording => "Recording",
            Section::Production => "Production",
            Section::Mixing => "Mixing",
            Section::Mastering => "Mastering",
            Section::Release => "Release Prep",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == lower)
            .ok_or_else(|| {
                format!(
                    "Invalid section '{}'. Valid options are: idea, writing, recording, production, mixing, mastering, release",
                    s
                )
            })
    }
}

/// Task or song urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        }
    }

    /// Map the digit of a `p1`..`p4` shortcut to a level
    ///
    /// Numbering is inverted: `1` is the most urgent.
    pub fn from_shortcut(digit: &str) -> Option<Priority> {
        match digit {
            "1" => Some(Priority::Urgent),
            "2" => Some(Priority::High),
            "3" => Some(Priority::Medium),
            "4" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Priority::ALL
            .into_iter()
            .find(|priority| priority.as_str() == lower)
            .ok_or_else(|| {
                format!(
                    "Invalid priority '{}'. Valid options are: low, medium, high, urgent",
                    s
                )
            })
    }
}

/// What happened to an entity, as recorded in the activity log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Created,
    Updated,
    Deleted,
    Completed,
    StatusChanged,
    PriorityChanged,
    DueDateChanged,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActivityKind::Created => "created",
            ActivityKind::Updated => "updated",
            ActivityKind::Deleted => "deleted",
            ActivityKind::Completed => "completed",
            ActivityKind::StatusChanged => "status_changed",
            ActivityKind::PriorityChanged => "priority_changed",
            ActivityKind::DueDateChanged => "due_date_changed",
        };
        f.write_str(name)
    }
}

/// Kind of record an activity entry refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Song,
    Project,
    Task,
    Note,
    Version,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Song => "song",
            EntityType::Project => "project",
            EntityType::Task => "task",
            EntityType::Note => "note",
            EntityType::Version => "version",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "song" => Ok(EntityType::Song),
            "project" => Ok(EntityType::Project),
            "task" => Ok(EntityType::Task),
            "note" => Ok(EntityType::Note),
            "version" => Ok(EntityType::Version),
            _ => Err(format!(
                "Invalid entity type '{}'. Valid options are: song, project, task, note, version",
                s
            )),
        }
    }
}

/// Colour scheme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!(
                "Invalid theme '{}'. Valid options are: light, dark",
                s
            )),
        }
    }
}
