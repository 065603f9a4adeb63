//! Console Events
//!
//! Everything a surface can report to the console. Surfaces don't decide
//! what an event means; they translate clicks and keystrokes into these and
//! let the console work out the consequences.

use serde::{Deserialize, Serialize};

use crate::draft::RevealTick;
use crate::filter::Facet;
use crate::message::{MessageId, ToneId};

/// Events from a surface (or the reveal scheduler) to the console
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsoleEvent {
    // ============================================
    // Filtering
    // ============================================
    /// A facet was chosen (`Facet::All` clears it)
    FacetSelected(Facet),

    /// The search box text changed
    SearchChanged(String),

    // ============================================
    // Selection
    // ============================================
    /// A message was clicked
    MessageSelected(MessageId),

    /// Move to the next visible message
    SelectNext,

    /// Move to the previous visible message
    SelectPrevious,

    // ============================================
    // Drafts
    // ============================================
    /// A tone was chosen
    ToneSelected(ToneId),

    /// "Generate reply" was triggered
    GenerateRequested,

    /// A scheduled reveal step fired
    RevealTick(RevealTick),

    /// Send the finished draft
    DraftSendRequested,

    /// Edit the finished draft
    DraftEditRequested,

    // ============================================
    // Command Palette
    // ============================================
    /// The palette activation key was pressed
    PaletteToggled,

    /// A character was typed into the palette
    PaletteInput(char),

    /// Backspace in the palette
    PaletteBackspace,

    /// Move the palette cursor up
    PaletteUp,

    /// Move the palette cursor down
    PaletteDown,

    /// Run the highlighted palette command
    PaletteSubmitted,

    /// Close the palette without running anything
    PaletteDismissed,

    // ============================================
    // External Collaborators
    // ============================================
    /// Theme toggle requested (forwarded, not interpreted)
    ThemeToggleRequested,

    /// Compose window requested
    ComposeRequested,

    /// Task tray requested for the current message
    TaskTrayRequested,

    /// The operator wants out
    QuitRequested,
}
