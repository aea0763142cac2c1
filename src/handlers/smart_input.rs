//! Smart task input handlers
//!
//! A single line such as `Fix reverb tail @mixing !high due:tomorrow` becomes
//! a task; the preview tool shows what would be created.

use crate::SessionsServerHandler;
use crate::formatting;
use crate::sessions::{Section, Settings};
use crate::smart_input::{
    self, KeywordClassifier, LayeredClassifier, ParsedTaskDraft, SectionClassifier, TagClassifier,
};
use crate::validation;
use log::debug;
use mcp_attr::{Result as McpResult, bail_public};

/// Section for a new task: its own tag, then keywords if enabled, then the default
pub(crate) fn resolve_section(draft: &ParsedTaskDraft, text: &str, settings: &Settings) -> Section {
    if let Some(section) = draft.section {
        return section;
    }
    let suggested = if settings.keyword_fallback {
        LayeredClassifier::new(TagClassifier, KeywordClassifier).suggest(text)
    } else {
        TagClassifier.suggest(text)
    };
    suggested.unwrap_or(settings.default_section)
}

impl SessionsServerHandler {
    /// Parse a line of smart input and create the task it describes.
    pub async fn handle_add_task(&self, song_id: String, text: String) -> McpResult<String> {
        let song_id = validation::normalize_id(&song_id);
        let draft = smart_input::annotate(&text);
        debug!("annotated {:?} as {:?}", text, draft);

        if !draft.has_title() {
            bail_public!(
                _,
                "Task title is empty after removing tags. Add a title and try again. Input was: '{}'",
                text
            );
        }

        let due_date = match draft.due_date.as_deref() {
            Some(date) => match validation::parse_date(date) {
                Ok(d) => Some(d),
                Err(_) => {
                    bail_public!(
                        _,
                        "Due date '{}' is not a real calendar date. Nothing was created. Input was: '{}'",
                        date,
                        text
                    );
                }
            },
            None => None,
        };

        let mut data = self.lock_data();
        let section = resolve_section(&draft, &text, data.settings());

        let task = match data.create_task(&song_id, section, &draft.title, draft.priority, due_date)
        {
            Ok(task) => task,
            Err(e) => {
                let msg = validation::format_store_error(&e, &data);
                drop(data);
                bail_public!(_, "{} Input was: '{}'", msg, text);
            }
        };
        self.save_data(&data)?;
        drop(data);

        Ok(format!(
            "Task created with ID: {} (section: {})\n{}",
            task.id,
            task.section,
            formatting::format_task_line(&task)
        ))
    }

    /// Show the draft and highlighted markup for a line of smart input.
    pub async fn handle_preview_task(&self, text: String) -> McpResult<String> {
        let draft = smart_input::annotate(&text);
        let highlighted = smart_input::highlight(&text);
        Ok(formatting::format_draft(&draft, &highlighted))
    }
}
