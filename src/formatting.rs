//! Formatting helper functions for the sessions MCP server
//!
//! Tool results are plain text meant to be read by an assistant: one record
//! per `- [id] title (...)` line with indented detail lines.

use crate::sessions::{
    Activity, Note, Project, SearchResults, Section, SessionsData, Settings, Song, Task, Version,
};
use crate::smart_input::ParsedTaskDraft;

/// Flags shown in parentheses after a task title
fn task_flags(task: &Task) -> String {
    let mut flags = vec![task.section.to_string()];
    if let Some(priority) = task.priority {
        flags.push(format!("priority: {}", priority));
    }
    if let Some(due) = task.due_date {
        flags.push(format!("due: {}", due));
    }
    if task.today {
        flags.push("today".to_string());
    }
    if task.done {
        flags.push("done".to_string());
    }
    flags.join(", ")
}

pub fn format_task_line(task: &Task) -> String {
    let mark = if task.done { "x" } else { " " };
    let mut line = format!("- [{}] [{}] {} ({})\n", task.id, mark, task.title, task_flags(task));
    if !task.depends_on.is_empty() {
        line.push_str(&format!("  Depends on: {}\n", task.depends_on.join(", ")));
    }
    match (task.estimated_time, task.actual_time) {
        (Some(est), Some(act)) => line.push_str(&format!("  Time: {}/{} min\n", act, est)),
        (Some(est), None) => line.push_str(&format!("  Estimate: {} min\n", est)),
        (None, Some(act)) => line.push_str(&format!("  Logged: {} min\n", act)),
        (None, None) => {}
    }
    line
}

/// Format tasks into a display string
pub fn format_tasks(tasks: &[&Task]) -> String {
    if tasks.is_empty() {
        return "No tasks found".to_string();
    }

    let mut result = format!("Found {} task(s):\n\n", tasks.len());
    for task in tasks {
        result.push_str(&format_task_line(task));
    }
    result
}

/// Tasks of one song grouped under section headings
pub fn format_song_tasks(data: &SessionsData, song: &Song) -> String {
    let tasks = data.tasks_by_song(&song.id);
    if tasks.is_empty() {
        return format!("No tasks for '{}'", song.title);
    }

    let mut result = format!("{} task(s) for '{}':\n", tasks.len(), song.title);
    let mut current: Option<Section> = None;
    for task in tasks {
        if current != Some(task.section) {
            let progress = data.section_progress(&song.id, task.section);
            result.push_str(&format!(
                "\n## {} ({}/{})\n",
                task.section.label(),
                progress.completed,
                progress.total
            ));
            current = Some(task.section);
        }
        result.push_str(&format_task_line(task));
    }
    result
}

pub fn format_song_line(data: &SessionsData, song: &Song) -> String {
    let mut line = format!(
        "- [{}] {} (status: {}, progress: {}%)\n",
        song.id,
        song.title,
        song.status,
        data.song_progress(&song.id)
    );
    let mut details = Vec::new();
    if let Some(bpm) = song.bpm {
        details.push(format!("{} bpm", bpm));
    }
    if let Some(ref key) = song.key {
        details.push(key.clone());
    }
    if !song.mood_tags.is_empty() {
        details.push(song.mood_tags.join(", "));
    }
    if !details.is_empty() {
        line.push_str(&format!("  {}\n", details.join(" | ")));
    }
    if let Some(priority) = song.priority {
        line.push_str(&format!("  Priority: {}\n", priority));
    }
    if let Some(due) = song.due_date {
        line.push_str(&format!("  Due: {}\n", due));
    }
    if let Some(ref project_id) = song.project_id {
        line.push_str(&format!("  Project: {}\n", project_id));
    }
    line
}

pub fn format_songs(data: &SessionsData, songs: &[&Song]) -> String {
    if songs.is_empty() {
        return "No songs found".to_string();
    }

    let mut result = format!("Found {} song(s):\n\n", songs.len());
    for song in songs {
        result.push_str(&format_song_line(data, song));
    }
    result
}

pub fn format_projects(data: &SessionsData, projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects found".to_string();
    }

    let mut result = format!("Found {} project(s):\n\n", projects.len());
    for project in projects {
        result.push_str(&format!(
            "- [{}] {} ({} song(s), progress: {}%)\n",
            project.id,
            project.title,
            project.song_ids.len(),
            data.project_progress(&project.id)
        ));
        if let Some(ref description) = project.description {
            result.push_str(&format!("  Description: {}\n", description));
        }
        if let Some(due) = project.due_date {
            result.push_str(&format!("  Due: {}\n", due));
        }
        for (index, song) in data.list_songs(Some(&project.id)).iter().enumerate() {
            result.push_str(&format!("  {}. {}\n", index + 1, song.title));
        }
    }
    result
}

/// What smart input would create, without creating it
pub fn format_draft(draft: &ParsedTaskDraft, highlighted: &str) -> String {
    let mut result = String::new();
    if draft.has_title() {
        result.push_str(&format!("Title: {}\n", draft.title));
    } else {
        result.push_str("Title: (empty, add a task title)\n");
    }
    result.push_str(&format!(
        "Section: {}\n",
        draft.section.map_or("(none)", |s| s.as_str())
    ));
    result.push_str(&format!(
        "Priority: {}\n",
        draft.priority.map_or("(none)", |p| p.as_str())
    ));
    result.push_str(&format!(
        "Due: {}\n",
        draft.due_date.as_deref().unwrap_or("(none)")
    ));
    result.push_str(&format!("Highlighted: {}\n", highlighted));
    result
}

pub fn format_song_progress(data: &SessionsData, song: &Song) -> String {
    let mut result = format!(
        "'{}': {}% done (status: {})\n",
        song.title,
        data.song_progress(&song.id),
        song.status
    );
    for section in Section::ALL {
        let progress = data.section_progress(&song.id, section);
        if progress.total == 0 {
            continue;
        }
        let mark = if progress.is_complete { " ✓" } else { "" };
        result.push_str(&format!(
            "  {}: {}/{} ({}%){}\n",
            section.label(),
            progress.completed,
            progress.total,
            progress.progress,
            mark
        ));
    }
    result
}

pub fn format_notes(notes: &[&Note], versions: &[&Version]) -> String {
    let mut result = String::new();
    for note in notes {
        result.push_str(&format!("- [{}] Note: {}\n", note.id, note.content));
    }
    for version in versions {
        result.push_str(&format!("- [{}] Version: {}\n", version.id, version.name));
        if let Some(ref notes) = version.notes {
            result.push_str(&format!("  {}\n", notes));
        }
    }
    result
}

pub fn format_search(query: &str, results: &SearchResults<'_>) -> String {
    if results.is_empty() {
        return format!("Nothing matches '{}'", query);
    }

    let mut result = format!("Found {} match(es) for '{}':\n", results.len(), query);
    if !results.songs.is_empty() {
        result.push_str("\nSongs:\n");
        for song in &results.songs {
            result.push_str(&format!("- [{}] {}\n", song.id, song.title));
        }
    }
    if !results.projects.is_empty() {
        result.push_str("\nProjects:\n");
        for project in &results.projects {
            result.push_str(&format!("- [{}] {}\n", project.id, project.title));
        }
    }
    if !results.tasks.is_empty() {
        result.push_str("\nTasks:\n");
        for task in &results.tasks {
            result.push_str(&format_task_line(task));
        }
    }
    if !results.notes.is_empty() {
        result.push_str("\nNotes:\n");
        for note in &results.notes {
            result.push_str(&format!("- [{}] {}\n", note.id, note.content));
        }
    }
    result
}

pub fn format_activities(activities: &[&Activity]) -> String {
    if activities.is_empty() {
        return "No activity yet".to_string();
    }

    let mut result = String::new();
    for activity in activities {
        let subject = activity
            .entity_title
            .as_deref()
            .unwrap_or(activity.entity_id.as_str());
        result.push_str(&format!(
            "- {} {} {} '{}'\n",
            activity.created_at.format("%Y-%m-%d %H:%M"),
            activity.kind,
            activity.entity_type,
            subject
        ));
        for change in &activity.changes {
            result.push_str(&format!(
                "  {}: {} -> {}\n",
                change.field,
                change.from.as_deref().unwrap_or("(none)"),
                change.to.as_deref().unwrap_or("(none)")
            ));
        }
    }
    result
}

pub fn format_settings(settings: &Settings) -> String {
    format!(
        "Settings:\n  theme: {}\n  auras_enabled: {}\n  default_section: {}\n  keyword_fallback: {}\n",
        settings.theme, settings.auras_enabled, settings.default_section, settings.keyword_fallback
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::Priority;

    #[test]
    fn test_format_tasks_empty() {
        assert_eq!(format_tasks(&[]), "No tasks found");
    }

    #[test]
    fn test_format_task_line_flags() {
        let mut data = SessionsData::new();
        let song = data.create_song("Tides", None);
        let task = data
            .create_task(
                &song.id,
                Section::Mixing,
                "Fix reverb tail",
                Some(Priority::High),
                None,
            )
            .unwrap();
        let line = format_task_line(&task);
        assert!(line.starts_with(&format!("- [{}] [ ] Fix reverb tail", task.id)));
        assert!(line.contains("(mixing, priority: high)"));
    }

    #[test]
    fn test_format_draft_without_title() {
        let draft = ParsedTaskDraft {
            title: String::new(),
            section: Some(Section::Idea),
            priority: None,
            due_date: None,
        };
        let text = format_draft(&draft, "x");
        assert!(text.contains("add a task title"));
        assert!(text.contains("Section: idea"));
        assert!(text.contains("Priority: (none)"));
    }
}
