//! Console Effects
//!
//! Directives the console hands back to whoever drives it. The console
//! never performs these itself: the surface opens dialogs and applies the
//! theme, and the reveal scheduler turns `ScheduleReveal` into a timer.

use serde::{Deserialize, Serialize};

use crate::draft::RevealTick;
use crate::message::MessageId;

/// Light or dark presentation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Dark background
    #[default]
    Dark,
    /// Light background
    Light,
}

impl ThemeMode {
    /// Parse a theme name (case-insensitive)
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// The other mode
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outbound directive from the console
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsoleEffect {
    /// Deliver this tick back after one reveal interval
    ScheduleReveal(RevealTick),

    /// Open the external compose window
    OpenCompose {
        /// Message being replied to, if any
        reply_to: Option<MessageId>,
        /// Prefilled body, if any
        draft: Option<String>,
    },

    /// Open the external task-creation tray
    OpenTaskTray {
        /// Message the task is about, if any
        message_id: Option<MessageId>,
    },

    /// Switch the external theme setting to a specific mode
    SetTheme(ThemeMode),

    /// Flip the external theme setting (forwarded as-is)
    ToggleTheme,

    /// Shut the surface down
    Quit,
}
