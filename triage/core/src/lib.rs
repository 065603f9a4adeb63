//! Triage Core - Headless Inbox Triage Logic
//!
//! This crate provides the state machines behind the triage console,
//! completely independent of any UI framework. It can drive a TUI, a GUI,
//! or run headless for testing.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         UI Surface                               │
//! │        (terminal, test harness, anything that renders)           │
//! │                              │                                   │
//! │              ConsoleEvent (up)  ConsoleEffect (down)             │
//! └──────────────────────────────┼───────────────────────────────────┘
//!                                │
//! ┌──────────────────────────────┼───────────────────────────────────┐
//! │                         TRIAGE CORE                              │
//! │  ┌───────────────────────────┴────────────────────────────────┐  │
//! │  │                         Console                            │  │
//! │  │  ┌──────────┐  ┌───────────┐  ┌──────────┐  ┌───────────┐  │  │
//! │  │  │  Filter  │  │ Selection │  │  Draft   │  │  Command  │  │  │
//! │  │  │  Engine  │  │  Tracker  │  │  Stream  │  │  Registry │  │  │
//! │  │  └──────────┘  └───────────┘  └────┬─────┘  └───────────┘  │  │
//! │  └────────────────────────────────────┼───────────────────────┘  │
//! │                                       │ RevealTick               │
//! │                               ┌───────┴────────┐                 │
//! │                               │ RevealScheduler│                 │
//! │                               └────────────────┘                 │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Console`]: owns the message store and the current state
//! - [`ConsoleEvent`]: everything a surface can report
//! - [`ConsoleEffect`]: directives for the surface and the scheduler
//! - [`FilterState`]: the active facet plus free-text search
//! - [`DraftStreamController`]: the generation-guarded reveal state machine
//! - [`CommandRegistry`]: palette commands and their matching rules
//!
//! # Quick Start
//!
//! ```ignore
//! use triage_core::{Console, ConsoleEvent, ConsoleEffect, MessageStore, RevealScheduler, ToneId};
//!
//! let mut console = Console::new(MessageStore::demo(), ToneId::Professional);
//! let mut scheduler = RevealScheduler::new(std::time::Duration::from_millis(30));
//!
//! for effect in console.handle_event(ConsoleEvent::GenerateRequested) {
//!     if let ConsoleEffect::ScheduleReveal(tick) = effect {
//!         scheduler.schedule(tick);
//!     }
//! }
//! ```
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework. The only asynchronous piece is [`RevealScheduler`].

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod commands;
pub mod config;
pub mod console;
pub mod draft;
pub mod effects;
pub mod events;
pub mod filter;
pub mod message;
pub mod palette;
pub mod reveal;
pub mod selection;
pub mod store;

pub use commands::{CommandAction, CommandCategory, CommandDescriptor, CommandId, CommandRegistry};
pub use console::{Console, ConsoleSnapshot, DraftView};
pub use draft::{DraftStreamController, DraftStreamState, RevealTick, StreamStatus, TickOutcome};
pub use effects::{ConsoleEffect, ThemeMode};
pub use events::ConsoleEvent;
pub use filter::{
    compute_visible_set, facet_count, facet_predicate, facet_values, search_predicate, Facet,
    FacetKind, FilterState,
};
pub use message::{DraftSet, IntentCategory, Message, MessageId, ToneId, UnknownIntent};
pub use palette::PaletteState;
pub use reveal::{RevealScheduler, DEFAULT_REVEAL_INTERVAL};
pub use selection::{current_message, SelectionState};
pub use store::{MessageStore, StoreError};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, load_config_with_env, ConfigError,
    ConfigOverrides, ConfigSource, ConsoleConfigFile, ConsoleToml,
};
