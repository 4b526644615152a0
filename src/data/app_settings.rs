use crate::data::persistence::Persistable;
use crate::state::focus_timer::{clamp_minutes, MAX_FOCUS_MINUTES, MIN_FOCUS_MINUTES};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

const MIN_STEP_MINUTES: u32 = 1;
const MAX_STEP_MINUTES: u32 = 60;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppSettings {
    /// Focus session length shown when the widget opens.
    pub focus_minutes: u32,
    /// Minutes added or removed by the -/+ buttons.
    pub step_minutes: u32,
    /// Open with the calendar body collapsed.
    pub start_collapsed: bool,
    /// Default tracing filter, overridden by RUST_LOG and -v.
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            focus_minutes: 30,
            step_minutes: 5,
            start_collapsed: false,
            log_level: "info".to_string(),
        }
    }
}

/// Wrapper that reads the `settings` key from config.yaml.
#[derive(Serialize, Deserialize, Default, Debug)]
struct SettingsWrapper {
    #[serde(default)]
    settings: AppSettings,
}

impl Persistable for SettingsWrapper {
    fn filename() -> &'static str {
        "config.yaml"
    }
}

impl AppSettings {
    pub fn load() -> Result<Self> {
        Ok(SettingsWrapper::load()?.settings.normalized())
    }

    pub fn load_from(dir: &Path) -> Result<Self> {
        Ok(SettingsWrapper::load_from(dir)?.settings.normalized())
    }

    pub fn save_to(&self, dir: &Path) -> Result<()> {
        SettingsWrapper {
            settings: self.clone(),
        }
        .save_to(dir)
    }

    /// Clamps out-of-range values instead of rejecting the file.
    pub fn normalized(mut self) -> Self {
        let focus = clamp_minutes(self.focus_minutes as i64);
        if focus != self.focus_minutes {
            warn!(
                configured = self.focus_minutes,
                used = focus,
                min = MIN_FOCUS_MINUTES,
                max = MAX_FOCUS_MINUTES,
                "focus_minutes out of range"
            );
            self.focus_minutes = focus;
        }
        let step = self.step_minutes.clamp(MIN_STEP_MINUTES, MAX_STEP_MINUTES);
        if step != self.step_minutes {
            warn!(configured = self.step_minutes, used = step, "step_minutes out of range");
            self.step_minutes = step;
        }
        self
    }
}
