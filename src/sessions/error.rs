use thiserror::Error;

/// Failure of a store operation that has more than one way to go wrong
///
/// Plain lookups return `Option` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("song '{0}' not found")]
    SongNotFound(String),

    #[error("task '{0}' not found")]
    TaskNotFound(String),

    #[error("project '{0}' not found")]
    ProjectNotFound(String),

    #[error("title must not be empty")]
    EmptyTitle,

    #[error("task '{task}' is blocked by unfinished tasks: {}", .blocking.join(", "))]
    Blocked { task: String, blocking: Vec<String> },

    #[error("task '{0}' cannot depend on itself")]
    SelfDependency(String),

    #[error("tasks '{task}' and '{dependency}' belong to different songs")]
    CrossSongDependency { task: String, dependency: String },

    #[error("making '{task}' depend on '{dependency}' would create a cycle")]
    DependencyCycle { task: String, dependency: String },
}
