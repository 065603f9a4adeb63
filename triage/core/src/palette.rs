//! Command Palette State
//!
//! The palette only knows whether it is open, what has been typed and which
//! result row is highlighted. Results are always recomputed from the
//! registry, so `selected` is an index into whatever `query` currently
//! matches and is reset whenever the query changes.

use serde::{Deserialize, Serialize};

use crate::commands::{CommandAction, CommandRegistry};

/// Open flag, query text and highlighted row
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteState {
    /// Whether the palette is showing
    pub open: bool,
    /// Typed query
    pub query: String,
    /// Highlighted result row
    pub selected: usize,
}

impl PaletteState {
    /// Open when closed, close when open; opening starts from a blank query
    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open = true;
            self.query.clear();
            self.selected = 0;
        }
    }

    /// Close and forget the query
    pub fn close(&mut self) {
        self.open = false;
        self.query.clear();
        self.selected = 0;
    }

    /// Append a character to the query
    pub fn push_char(&mut self, ch: char) {
        if !self.open {
            return;
        }
        self.query.push(ch);
        self.selected = 0;
    }

    /// Remove the last character of the query
    pub fn pop_char(&mut self) {
        if !self.open {
            return;
        }
        if self.query.pop().is_some() {
            self.selected = 0;
        }
    }

    /// Move the highlight up, wrapping to the last row
    pub fn move_up(&mut self, result_count: usize) {
        if result_count == 0 {
            self.selected = 0;
            return;
        }
        self.selected = if self.selected == 0 {
            result_count - 1
        } else {
            (self.selected - 1).min(result_count - 1)
        };
    }

    /// Move the highlight down, wrapping to the first row
    pub fn move_down(&mut self, result_count: usize) {
        if result_count == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % result_count;
    }

    /// Run the highlighted command
    ///
    /// Closes the palette and returns the command's action. With no results
    /// nothing happens and the palette stays open.
    pub fn submit(&mut self, registry: &CommandRegistry) -> Option<CommandAction> {
        if !self.open {
            return None;
        }
        let action = {
            let results = registry.query(&self.query);
            results
                .get(self.selected.min(results.len().saturating_sub(1)))
                .map(|descriptor| descriptor.action.clone())
        }?;
        self.close();
        Some(action)
    }
}
