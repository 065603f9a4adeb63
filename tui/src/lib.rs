//! Triage TUI - Terminal surface for the triage console
//!
//! This crate renders the triage console in a full-screen terminal UI. All
//! triage logic lives in `triage-core`; this crate turns keystrokes and
//! clicks into console events and draws console snapshots.
//!
//! # Architecture
//!
//! - **Compositor**: Layered rendering with z-ordering for the palette overlay
//! - **ConsoleClient**: Embedded console plus the reveal scheduler
//! - **Keymap**: Key presses to console events, per input mode
//! - **Widgets**: Borderless scrollable text blocks

pub mod app;
pub mod compositor;
pub mod console_client;
pub mod display;
pub mod keymap;
pub mod theme;
pub mod widgets;

pub use app::App;
