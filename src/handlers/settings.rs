//! Settings handler

use crate::SessionsServerHandler;
use crate::formatting;
use crate::sessions::SettingsPatch;
use crate::validation;
use mcp_attr::Result as McpResult;

impl SessionsServerHandler {
    /// Shows settings; any argument given is changed first.
    pub async fn handle_settings(
        &self,
        theme: Option<String>,
        auras_enabled: Option<bool>,
        default_section: Option<String>,
        keyword_fallback: Option<bool>,
    ) -> McpResult<String> {
        let patch = SettingsPatch {
            theme: match theme {
                Some(ref t) => Some(validation::parse_theme(t)?),
                None => None,
            },
            auras_enabled,
            default_section: match default_section {
                Some(ref s) => Some(validation::parse_section(s)?),
                None => None,
            },
            keyword_fallback,
        };
        let changed = patch.theme.is_some()
            || patch.auras_enabled.is_some()
            || patch.default_section.is_some()
            || patch.keyword_fallback.is_some();

        let mut data = self.lock_data();
        let settings = if changed {
            let settings = data.update_settings(patch);
            self.save_data(&data)?;
            settings
        } else {
            data.settings().clone()
        };
        drop(data);

        Ok(formatting::format_settings(&settings))
    }
}
