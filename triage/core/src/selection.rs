//! Selection Tracker
//!
//! Holds the id of the message the operator is looking at. Filtering never
//! evicts the selection: a message filtered out of the list stays selected
//! and keeps showing in the reader.

use serde::{Deserialize, Serialize};

use crate::message::{Message, MessageId};
use crate::store::MessageStore;

/// The selected message id
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    selected_id: Option<MessageId>,
}

impl SelectionState {
    /// Select the store's first message (nothing for an empty store)
    #[must_use]
    pub fn initial(store: &MessageStore) -> Self {
        Self {
            selected_id: store.first().map(|m| m.id),
        }
    }

    /// The selected id
    #[must_use]
    pub fn selected_id(&self) -> Option<MessageId> {
        self.selected_id
    }

    /// Select a message; returns whether the selection changed
    pub fn select(&mut self, id: MessageId) -> bool {
        if self.selected_id == Some(id) {
            return false;
        }
        self.selected_id = Some(id);
        true
    }

    /// Move to the next visible message; returns whether the selection changed
    ///
    /// Clamps at the end. When the selected message is not visible, the
    /// first visible message is chosen.
    pub fn next_in(&mut self, visible: &[MessageId]) -> bool {
        let target = match self.position_in(visible) {
            Some(pos) => visible.get(pos + 1).copied(),
            None => visible.first().copied(),
        };
        target.is_some_and(|id| self.select(id))
    }

    /// Move to the previous visible message; returns whether the selection changed
    ///
    /// Clamps at the start. When the selected message is not visible, the
    /// last visible message is chosen.
    pub fn previous_in(&mut self, visible: &[MessageId]) -> bool {
        let target = match self.position_in(visible) {
            Some(pos) => pos.checked_sub(1).and_then(|p| visible.get(p).copied()),
            None => visible.last().copied(),
        };
        target.is_some_and(|id| self.select(id))
    }

    /// Resolve against the store; see [`current_message`]
    #[must_use]
    pub fn current<'a>(&self, store: &'a MessageStore) -> Option<&'a Message> {
        current_message(store, self)
    }

    fn position_in(&self, visible: &[MessageId]) -> Option<usize> {
        let id = self.selected_id?;
        visible.iter().position(|v| *v == id)
    }
}

/// Resolve the selection to a message
///
/// An unknown id resolves to the store's first message, every time. Only an
/// empty store yields `None`.
#[must_use]
pub fn current_message<'a>(store: &'a MessageStore, selection: &SelectionState) -> Option<&'a Message> {
    selection
        .selected_id
        .and_then(|id| store.get(id))
        .or_else(|| store.first())
}
