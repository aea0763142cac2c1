//! Parameter parsing and reference checks for the MCP tools
//!
//! Tool arguments arrive as strings. These helpers turn them into domain
//! values and produce public error messages that list the valid options.

use crate::sessions::{EntityType, Priority, Section, SessionsData, StoreError, Theme};
use chrono::NaiveDate;
use mcp_attr::Result as McpResult;

fn invalid_params(message: String) -> mcp_attr::Error {
    mcp_attr::Error::new(mcp_attr::ErrorCode::INVALID_PARAMS).with_message(message, true)
}

/// Parse a section name (case-insensitive)
pub fn parse_section(section_str: &str) -> McpResult<Section> {
    section_str.trim().parse::<Section>().map_err(invalid_params)
}

pub fn parse_priority(priority_str: &str) -> McpResult<Priority> {
    priority_str.trim().parse::<Priority>().map_err(invalid_params)
}

pub fn parse_theme(theme_str: &str) -> McpResult<Theme> {
    theme_str.trim().parse::<Theme>().map_err(invalid_params)
}

pub fn parse_entity_type(entity_str: &str) -> McpResult<EntityType> {
    entity_str.trim().parse::<EntityType>().map_err(invalid_params)
}

/// Parse a calendar date in YYYY-MM-DD format
pub fn parse_date(date_str: &str) -> McpResult<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|_| {
        invalid_params(format!(
            "Invalid date '{}'. Use an existing calendar date in YYYY-MM-DD format (e.g., '2025-03-15')",
            date_str
        ))
    })
}

/// Parse an optional field where an empty string means "clear"
///
/// `None` leaves the field alone, `Some("")` clears it, anything else is
/// parsed with `parse`.
pub fn parse_clearable<T>(
    value: Option<String>,
    parse: impl Fn(&str) -> McpResult<T>,
) -> McpResult<Option<Option<T>>> {
    match value {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(Some(None)),
        Some(s) => Ok(Some(Some(parse(&s)?))),
    }
}

/// Text field where an empty string means "clear"
pub fn clearable_text(value: Option<String>) -> Option<Option<String>> {
    value.map(|s| {
        let s = s.trim().to_string();
        if s.is_empty() { None } else { Some(s) }
    })
}

/// Trim surrounding whitespace from an id argument
pub fn normalize_id(id: &str) -> String {
    id.trim().to_string()
}

/// Comma-separated list into trimmed, non-empty items
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Error message for an unknown song id, listing the songs that exist
pub fn format_invalid_song_error(song_id: &str, data: &SessionsData) -> String {
    let songs = data.songs();
    if songs.is_empty() {
        format!(
            "Song '{}' does not exist. No songs have been created yet. Create one first using add_song().",
            song_id
        )
    } else {
        let song_list: Vec<String> = songs
            .iter()
            .map(|s| format!("{} ({})", s.id, s.title))
            .collect();
        format!(
            "Song '{}' does not exist.\nAvailable songs: {}",
            song_id,
            song_list.join(", ")
        )
    }
}

pub fn format_invalid_project_error(project_id: &str, data: &SessionsData) -> String {
    let projects = data.projects();
    if projects.is_empty() {
        format!(
            "Project '{}' does not exist. No projects have been created yet. Create one first using add_project().",
            project_id
        )
    } else {
        let project_list: Vec<String> = projects
            .iter()
            .map(|p| format!("{} ({})", p.id, p.title))
            .collect();
        format!(
            "Project '{}' does not exist.\nAvailable projects: {}",
            project_id,
            project_list.join(", ")
        )
    }
}

/// Public message for a failed store operation
pub fn format_store_error(err: &StoreError, data: &SessionsData) -> String {
    match err {
        StoreError::SongNotFound(id) => format_invalid_song_error(id, data),
        StoreError::ProjectNotFound(id) => format_invalid_project_error(id, data),
        StoreError::Blocked { blocking, .. } => {
            let titles: Vec<String> = blocking
                .iter()
                .map(|id| match data.find_task(id) {
                    Some(task) => format!("[{}] {}", id, task.title),
                    None => id.clone(),
                })
                .collect();
            format!(
                "Cannot complete this task yet. Finish these first: {}",
                titles.join(", ")
            )
        }
        other => {
            let mut msg = other.to_string();
            if let Some(first) = msg.get(0..1) {
                let upper = first.to_uppercase();
                msg.replace_range(0..1, &upper);
            }
            msg
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_section_lists_options_on_error() {
        assert_eq!(parse_section("Mixing").unwrap(), Section::Mixing);
        assert!(parse_section("polishing").is_err());
    }

    #[test]
    fn test_parse_date_rejects_impossible_dates() {
        assert_eq!(
            parse_date("2025-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
        assert!(parse_date("2025-02-30").is_err());
        assert!(parse_date("tomorrow").is_err());
    }

    #[test]
    fn test_parse_clearable() {
        assert_eq!(parse_clearable(None, parse_priority).unwrap(), None);
        assert_eq!(
            parse_clearable(Some("".to_string()), parse_priority).unwrap(),
            Some(None)
        );
        assert_eq!(
            parse_clearable(Some("high".to_string()), parse_priority).unwrap(),
            Some(Some(Priority::High))
        );
        assert!(parse_clearable(Some("soon".to_string()), parse_priority).is_err());
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" a, b ,,c "), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_invalid_song_error_lists_songs() {
        let mut data = SessionsData::new();
        assert!(format_invalid_song_error("x", &data).contains("No songs"));
        let song = data.create_song("Night Drive", None);
        let msg = format_invalid_song_error("x", &data);
        assert!(msg.contains(&song.id));
        assert!(msg.contains("Night Drive"));
    }
}
