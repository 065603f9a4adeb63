//! Display State
//!
//! Surface-only state derived from ConsoleEffects: the theme in force,
//! the transient notice in the status bar and whether to shut down.
//!
//! # Design Philosophy
//!
//! Compose windows and the task tray are someone else's job. The TUI
//! acknowledges those requests with a notice and moves on; it never tries
//! to implement them.

use std::time::Duration;

use triage_core::{ConsoleEffect, ThemeMode};

/// How long a notice stays in the status bar
pub const NOTICE_DURATION: Duration = Duration::from_secs(4);

/// A transient status-bar notice
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayNotification {
    /// Notice text
    pub message: String,
    /// Time left on screen
    pub remaining: Duration,
}

impl DisplayNotification {
    /// Notice shown for the default duration
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            remaining: NOTICE_DURATION,
        }
    }
}

/// The surface's own display state
#[derive(Debug, Default)]
pub struct DisplayState {
    /// Active theme
    pub theme: ThemeMode,
    /// Pending notification (if any)
    pub notification: Option<DisplayNotification>,
    /// Set once the console asked to quit
    pub quit_requested: bool,
}

impl DisplayState {
    /// Display state starting in `theme`
    pub fn new(theme: ThemeMode) -> Self {
        Self {
            theme,
            ..Self::default()
        }
    }

    /// Apply a ConsoleEffect to update display state
    pub fn apply_effect(&mut self, effect: &ConsoleEffect) {
        match effect {
            ConsoleEffect::SetTheme(mode) => {
                self.theme = *mode;
            }
            ConsoleEffect::ToggleTheme => {
                self.theme = self.theme.toggled();
            }
            ConsoleEffect::OpenCompose { reply_to, draft } => {
                let message = match (reply_to, draft) {
                    (Some(id), Some(draft)) => format!(
                        "Compose window requested: reply to {id} ({} chars)",
                        draft.chars().count()
                    ),
                    (Some(id), None) => format!("Compose window requested: reply to {id}"),
                    (None, _) => "Compose window requested: new message".to_string(),
                };
                self.notification = Some(DisplayNotification::new(message));
            }
            ConsoleEffect::OpenTaskTray { message_id } => {
                let message = match message_id {
                    Some(id) => format!("Task tray requested for {id}"),
                    None => "Task tray requested".to_string(),
                };
                self.notification = Some(DisplayNotification::new(message));
            }
            ConsoleEffect::Quit => {
                self.quit_requested = true;
            }
            ConsoleEffect::ScheduleReveal(_) => {
                // Handled by the console client
            }
        }
    }

    /// Count down the notice timer
    pub fn update(&mut self, delta: Duration) {
        if let Some(notice) = &mut self.notification {
            notice.remaining = notice.remaining.saturating_sub(delta);
            if notice.remaining.is_zero() {
                self.notification = None;
            }
        }
    }
}
