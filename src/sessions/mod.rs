//! Sessions domain models and business logic
//!
//! Songs, projects, production tasks, notes, versions, settings and the
//! activity log, kept in one in-memory container.
//! - `vocab`: closed vocabularies shared with the smart input parser
//! - `records`: persisted record types and their patches
//! - `sessions_data`: the container and its mutating operations
//! - `queries`: progress, search and listing
//! - `error`: failures of store operations

mod error;
mod queries;
mod records;
mod sessions_data;
mod vocab;

use chrono::{DateTime, Local, NaiveDate, Utc};

pub use error::StoreError;
pub use queries::{SearchResults, SectionProgress};
pub use records::{
    Activity, FieldChange, Note, Project, ProjectPatch, Settings, SettingsPatch, Song, SongPatch,
    Task, TaskPatch, Version, VersionPatch,
};
pub use sessions_data::{MAX_ACTIVITIES, SessionsData};
pub use vocab::{ActivityKind, EntityType, Priority, Section, Theme};

/// Get the current date in local timezone
pub fn local_date_today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn now() -> DateTime<Utc> {
    Utc::now()
}

pub(crate) fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
