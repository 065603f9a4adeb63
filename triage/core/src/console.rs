//! Console - The Triage Orchestrator
//!
//! The Console owns the message store and the one current state: filter,
//! selection, draft stream and palette. Surfaces push [`ConsoleEvent`]s in
//! through [`Console::handle_event`] and get back the [`ConsoleEffect`]s
//! they (or the reveal scheduler) must carry out.
//!
//! # Coordination
//!
//! The components never talk to each other directly; the console wires
//! them together:
//! - A selection change resets the draft stream
//! - A tone change resets the draft stream
//! - A palette command lands on the filter or becomes an effect
//!
//! Everything here is synchronous. The only timing lives in
//! [`crate::RevealScheduler`], which feeds ticks back in as events.

use serde::{Deserialize, Serialize};

use crate::commands::{CommandAction, CommandDescriptor, CommandRegistry};
use crate::draft::{DraftStreamController, StreamStatus, TickOutcome};
use crate::effects::ConsoleEffect;
use crate::events::ConsoleEvent;
use crate::filter::{compute_visible_set, Facet, FilterState};
use crate::message::{Message, MessageId, ToneId};
use crate::palette::PaletteState;
use crate::selection::{current_message, SelectionState};
use crate::store::MessageStore;

/// Renderable view of the draft stream
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftView {
    /// Lifecycle status
    pub status: StreamStatus,
    /// Active tone
    pub tone: ToneId,
    /// Revealed prefix
    pub text: String,
    /// Whether to draw the typing cursor
    pub streaming: bool,
    /// Whether edit/send are available
    pub ready: bool,
    /// Stream generation
    pub generation: u64,
}

/// Immutable picture of the console for rendering
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSnapshot {
    /// Active facet and search
    pub filter: FilterState,
    /// Visible message ids, in store order
    pub visible_ids: Vec<MessageId>,
    /// Selected id (may be filtered out of `visible_ids`)
    pub selected: Option<MessageId>,
    /// Message shown in the reader
    pub current: Option<MessageId>,
    /// Draft stream
    pub draft: DraftView,
    /// Palette open flag, query and highlight
    pub palette: PaletteState,
    /// Commands matching the palette query
    pub palette_results: Vec<CommandDescriptor>,
}

/// The triage orchestrator
pub struct Console {
    store: MessageStore,
    registry: CommandRegistry,
    filter: FilterState,
    selection: SelectionState,
    draft: DraftStreamController,
    palette: PaletteState,
}

impl Console {
    /// Console over `store`, first message selected, idle stream in `initial_tone`
    #[must_use]
    pub fn new(store: MessageStore, initial_tone: ToneId) -> Self {
        let registry = CommandRegistry::for_store(&store);
        let selection = SelectionState::initial(&store);

        tracing::info!(
            messages = store.len(),
            commands = registry.len(),
            tone = %initial_tone,
            "Console created"
        );

        Self {
            store,
            registry,
            filter: FilterState::new(),
            selection,
            draft: DraftStreamController::new(initial_tone),
            palette: PaletteState::default(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The message store
    #[must_use]
    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    /// The command registry
    #[must_use]
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Active filter
    #[must_use]
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Selection state
    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Draft stream controller
    #[must_use]
    pub fn draft(&self) -> &DraftStreamController {
        &self.draft
    }

    /// Palette state
    #[must_use]
    pub fn palette(&self) -> &PaletteState {
        &self.palette
    }

    /// Active tone
    #[must_use]
    pub fn tone(&self) -> ToneId {
        self.draft.tone()
    }

    /// Messages passing the current filter
    #[must_use]
    pub fn visible_set(&self) -> Vec<&Message> {
        compute_visible_set(&self.store, &self.filter)
    }

    /// Ids of the messages passing the current filter
    #[must_use]
    pub fn visible_ids(&self) -> Vec<MessageId> {
        self.visible_set().iter().map(|m| m.id).collect()
    }

    /// Message shown in the reader
    #[must_use]
    pub fn current_message(&self) -> Option<&Message> {
        current_message(&self.store, &self.selection)
    }

    /// Commands matching the palette query
    #[must_use]
    pub fn palette_results(&self) -> Vec<&CommandDescriptor> {
        self.registry.query(&self.palette.query)
    }

    /// Snapshot for rendering
    #[must_use]
    pub fn snapshot(&self) -> ConsoleSnapshot {
        ConsoleSnapshot {
            filter: self.filter.clone(),
            visible_ids: self.visible_ids(),
            selected: self.selection.selected_id(),
            current: self.current_message().map(|m| m.id),
            draft: DraftView {
                status: self.draft.status(),
                tone: self.draft.tone(),
                text: self.draft.revealed_text().to_string(),
                streaming: self.draft.is_streaming(),
                ready: self.draft.is_ready(),
                generation: self.draft.generation(),
            },
            palette: self.palette.clone(),
            palette_results: self.palette_results().into_iter().cloned().collect(),
        }
    }

    // ========================================================================
    // Event Handling
    // ========================================================================

    /// Apply one event and return the effects to carry out
    pub fn handle_event(&mut self, event: ConsoleEvent) -> Vec<ConsoleEffect> {
        match event {
            ConsoleEvent::FacetSelected(facet) => {
                self.set_facet(facet);
                Vec::new()
            }
            ConsoleEvent::SearchChanged(query) => {
                self.filter = self.filter.with_search(query);
                tracing::debug!(query = self.filter.search_query(), "Search changed");
                Vec::new()
            }
            ConsoleEvent::MessageSelected(id) => {
                if self.selection.select(id) {
                    self.on_selection_changed();
                }
                Vec::new()
            }
            ConsoleEvent::SelectNext => {
                let visible = self.visible_ids();
                if self.selection.next_in(&visible) {
                    self.on_selection_changed();
                }
                Vec::new()
            }
            ConsoleEvent::SelectPrevious => {
                let visible = self.visible_ids();
                if self.selection.previous_in(&visible) {
                    self.on_selection_changed();
                }
                Vec::new()
            }
            ConsoleEvent::ToneSelected(tone) => {
                if self.draft.set_tone(tone) {
                    tracing::debug!(tone = %tone, "Tone changed, draft reset");
                }
                Vec::new()
            }
            ConsoleEvent::GenerateRequested => self.generate(),
            ConsoleEvent::RevealTick(tick) => match self.draft.tick(tick) {
                TickOutcome::Advanced { next } => vec![ConsoleEffect::ScheduleReveal(next)],
                TickOutcome::Completed | TickOutcome::Stale => Vec::new(),
            },
            ConsoleEvent::DraftSendRequested | ConsoleEvent::DraftEditRequested => {
                self.compose_from_draft()
            }
            ConsoleEvent::PaletteToggled => {
                self.palette.toggle();
                tracing::debug!(open = self.palette.open, "Palette toggled");
                Vec::new()
            }
            ConsoleEvent::PaletteInput(ch) => {
                self.palette.push_char(ch);
                Vec::new()
            }
            ConsoleEvent::PaletteBackspace => {
                self.palette.pop_char();
                Vec::new()
            }
            ConsoleEvent::PaletteUp => {
                let count = self.palette_results().len();
                self.palette.move_up(count);
                Vec::new()
            }
            ConsoleEvent::PaletteDown => {
                let count = self.palette_results().len();
                self.palette.move_down(count);
                Vec::new()
            }
            ConsoleEvent::PaletteSubmitted => match self.palette.submit(&self.registry) {
                Some(action) => self.apply_action(action),
                None => Vec::new(),
            },
            ConsoleEvent::PaletteDismissed => {
                self.palette.close();
                Vec::new()
            }
            ConsoleEvent::ThemeToggleRequested => vec![ConsoleEffect::ToggleTheme],
            ConsoleEvent::ComposeRequested => vec![ConsoleEffect::OpenCompose {
                reply_to: None,
                draft: None,
            }],
            ConsoleEvent::TaskTrayRequested => vec![self.task_tray()],
            ConsoleEvent::QuitRequested => vec![ConsoleEffect::Quit],
        }
    }

    /// Run a command directly, bypassing the palette
    pub fn invoke(&mut self, command: &CommandDescriptor) -> Vec<ConsoleEffect> {
        tracing::debug!(command = %command.id, "Invoking command");
        self.apply_action(command.action.clone())
    }

    fn apply_action(&mut self, action: CommandAction) -> Vec<ConsoleEffect> {
        match action {
            CommandAction::ClearFilters => {
                self.filter = self.filter.cleared();
                Vec::new()
            }
            CommandAction::SetFacet(facet) => {
                self.set_facet(facet);
                Vec::new()
            }
            CommandAction::OpenCompose => vec![ConsoleEffect::OpenCompose {
                reply_to: None,
                draft: None,
            }],
            CommandAction::OpenTaskTray => vec![self.task_tray()],
            CommandAction::SetTheme(mode) => vec![ConsoleEffect::SetTheme(mode)],
        }
    }

    fn set_facet(&mut self, facet: Facet) {
        self.filter = self.filter.with_facet(facet);
        tracing::debug!(
            kind = ?self.filter.facet_kind(),
            value = self.filter.facet_value(),
            "Facet selected"
        );
    }

    fn on_selection_changed(&mut self) {
        self.draft.reset();
        tracing::debug!(selected = ?self.selection.selected_id(), "Selection changed, draft reset");
    }

    fn generate(&mut self) -> Vec<ConsoleEffect> {
        let tone = self.draft.tone();
        let Some(message) = current_message(&self.store, &self.selection) else {
            tracing::debug!("Generate requested with an empty store");
            return Vec::new();
        };
        self.draft
            .begin_stream(message, tone)
            .map(ConsoleEffect::ScheduleReveal)
            .into_iter()
            .collect()
    }

    fn compose_from_draft(&self) -> Vec<ConsoleEffect> {
        if !self.draft.is_ready() {
            tracing::debug!(status = ?self.draft.status(), "No finished draft to compose from");
            return Vec::new();
        }
        vec![ConsoleEffect::OpenCompose {
            reply_to: self.current_message().map(|m| m.id),
            draft: Some(self.draft.revealed_text().to_string()),
        }]
    }

    fn task_tray(&self) -> ConsoleEffect {
        ConsoleEffect::OpenTaskTray {
            message_id: self.current_message().map(|m| m.id),
        }
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("messages", &self.store.len())
            .field("filter", &self.filter)
            .field("selection", &self.selection)
            .field("draft", self.draft.state())
            .field("palette", &self.palette)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::RevealTick;
    use crate::effects::ThemeMode;
    use crate::message::{DraftSet, IntentCategory};
    use pretty_assertions::assert_eq;

    fn console() -> Console {
        let store = MessageStore::new(vec![
            Message::new(1, "Alice", "Quote request", IntentCategory::Quote, DraftSet::new("Hi"))
                .with_account("Acme")
                .with_carrier("Travelers"),
            Message::new(2, "Bob", "Claim filed", IntentCategory::Claim, DraftSet::new("Yo"))
                .with_account("Globex")
                .with_carrier("Chubb"),
        ]);
        Console::new(store, ToneId::Professional)
    }

    fn tick_of(effects: &[ConsoleEffect]) -> RevealTick {
        match effects {
            [ConsoleEffect::ScheduleReveal(tick)] => *tick,
            other => panic!("expected one ScheduleReveal, got {other:?}"),
        }
    }

    #[test]
    fn test_initial_state() {
        let console = console();
        let snapshot = console.snapshot();
        assert_eq!(snapshot.selected, Some(MessageId(1)));
        assert_eq!(snapshot.visible_ids, vec![MessageId(1), MessageId(2)]);
        assert_eq!(snapshot.draft.status, StreamStatus::Idle);
        assert!(!snapshot.palette.open);
    }

    #[test]
    fn test_generate_and_reveal() {
        let mut console = console();
        let tick = tick_of(&console.handle_event(ConsoleEvent::GenerateRequested));

        let next = tick_of(&console.handle_event(ConsoleEvent::RevealTick(tick)));
        assert_eq!(console.snapshot().draft.text, "H");

        assert!(console.handle_event(ConsoleEvent::RevealTick(next)).is_empty());
        let draft = console.snapshot().draft;
        assert_eq!(draft.text, "Hi");
        assert_eq!(draft.status, StreamStatus::Complete);
        assert!(draft.ready);
    }

    #[test]
    fn test_selection_change_cancels_stream() {
        let mut console = console();
        let tick = tick_of(&console.handle_event(ConsoleEvent::GenerateRequested));

        console.handle_event(ConsoleEvent::MessageSelected(MessageId(2)));
        assert_eq!(console.draft().status(), StreamStatus::Idle);
        assert!(console.handle_event(ConsoleEvent::RevealTick(tick)).is_empty());
        assert_eq!(console.draft().revealed_text(), "");
    }

    #[test]
    fn test_reselecting_same_message_keeps_stream() {
        let mut console = console();
        console.handle_event(ConsoleEvent::GenerateRequested);
        console.handle_event(ConsoleEvent::MessageSelected(MessageId(1)));
        assert!(console.draft().is_streaming());
    }

    #[test]
    fn test_keyboard_navigation_resets_stream() {
        let mut console = console();
        console.handle_event(ConsoleEvent::GenerateRequested);
        console.handle_event(ConsoleEvent::SelectNext);
        assert_eq!(console.selection().selected_id(), Some(MessageId(2)));
        assert_eq!(console.draft().status(), StreamStatus::Idle);
    }

    #[test]
    fn test_filtering_keeps_hidden_selection() {
        let mut console = console();
        console.handle_event(ConsoleEvent::FacetSelected(Facet::Account("Globex".into())));
        let snapshot = console.snapshot();
        assert_eq!(snapshot.visible_ids, vec![MessageId(2)]);
        assert_eq!(snapshot.selected, Some(MessageId(1)));
        assert_eq!(snapshot.current, Some(MessageId(1)));
    }

    #[test]
    fn test_draft_actions_need_finished_draft() {
        let mut console = console();
        assert!(console.handle_event(ConsoleEvent::DraftSendRequested).is_empty());

        let tick = tick_of(&console.handle_event(ConsoleEvent::GenerateRequested));
        let next = tick_of(&console.handle_event(ConsoleEvent::RevealTick(tick)));
        assert!(console.handle_event(ConsoleEvent::DraftEditRequested).is_empty());
        console.handle_event(ConsoleEvent::RevealTick(next));

        assert_eq!(
            console.handle_event(ConsoleEvent::DraftSendRequested),
            vec![ConsoleEffect::OpenCompose {
                reply_to: Some(MessageId(1)),
                draft: Some("Hi".into()),
            }]
        );
    }

    #[test]
    fn test_palette_flow_applies_facet() {
        let mut console = console();
        console.handle_event(ConsoleEvent::PaletteToggled);
        for ch in "globex".chars() {
            console.handle_event(ConsoleEvent::PaletteInput(ch));
        }
        assert_eq!(console.palette_results().len(), 1);

        assert!(console.handle_event(ConsoleEvent::PaletteSubmitted).is_empty());
        assert!(!console.palette().open);
        assert_eq!(console.filter().facet(), &Facet::Account("Globex".into()));
    }

    #[test]
    fn test_palette_theme_command_is_idempotent() {
        let mut console = console();
        let light = console
            .registry()
            .iter()
            .find(|c| c.action == CommandAction::SetTheme(ThemeMode::Light))
            .cloned()
            .unwrap();

        let first = console.invoke(&light);
        let second = console.invoke(&light);
        assert_eq!(first, vec![ConsoleEffect::SetTheme(ThemeMode::Light)]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_palette_dismiss() {
        let mut console = console();
        console.handle_event(ConsoleEvent::PaletteToggled);
        console.handle_event(ConsoleEvent::PaletteInput('x'));
        console.handle_event(ConsoleEvent::PaletteDismissed);
        assert_eq!(console.palette(), &PaletteState::default());
    }

    #[test]
    fn test_external_requests_are_forwarded() {
        let mut console = console();
        assert_eq!(
            console.handle_event(ConsoleEvent::ThemeToggleRequested),
            vec![ConsoleEffect::ToggleTheme]
        );
        assert_eq!(
            console.handle_event(ConsoleEvent::TaskTrayRequested),
            vec![ConsoleEffect::OpenTaskTray {
                message_id: Some(MessageId(1))
            }]
        );
        assert_eq!(
            console.handle_event(ConsoleEvent::QuitRequested),
            vec![ConsoleEffect::Quit]
        );
    }

    #[test]
    fn test_generate_on_empty_store_is_noop() {
        let mut console = Console::new(MessageStore::default(), ToneId::Direct);
        assert!(console.handle_event(ConsoleEvent::GenerateRequested).is_empty());
        assert_eq!(console.snapshot().current, None);
    }
}
