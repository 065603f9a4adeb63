//! Key Bindings
//!
//! Maps a key press to what it means in the current input mode. Most keys
//! become a ConsoleEvent directly; the rest drive surface-only state (the
//! search box, sidebar focus, reader scrolling).
//!
//! | Key | Normal mode |
//! |---|---|
//! | `Ctrl+K` | command palette |
//! | `/` | search |
//! | `j`/`k`, arrows | next/previous message |
//! | `1`/`2`/`3` | tone |
//! | `g` | generate reply |
//! | `e`/`s` | edit/send the draft |
//! | `c` | compose |
//! | `t` | task tray |
//! | `Ctrl+T` | toggle theme |
//! | `0` | clear facet |
//! | `Tab`/`Shift+Tab`, `Enter` | move sidebar focus, apply it |
//! | `PgUp`/`PgDn` | scroll the reader |
//! | `q`, `Esc`, `Ctrl+C` | quit |

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use triage_core::{ConsoleEvent, ToneId};

/// Lines moved by one PgUp/PgDn in the reader
pub const READER_PAGE: i32 = 5;

/// Which input the keyboard is currently driving
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    /// Panes have the keyboard
    Normal,
    /// Typing into the search box
    Search,
    /// The command palette is open
    Palette,
}

/// What a key press does
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Forward to the console
    Console(ConsoleEvent),
    /// Start typing a search
    EnterSearch,
    /// Append to the search query
    SearchInput(char),
    /// Delete from the search query
    SearchBackspace,
    /// Stop typing a search (the query stays)
    LeaveSearch,
    /// Drop the active facet
    ClearFacet,
    /// Move sidebar focus down
    FocusNextFacet,
    /// Move sidebar focus up
    FocusPreviousFacet,
    /// Apply the focused sidebar entry
    ApplyFocusedFacet,
    /// Scroll the reader body
    ScrollReader(i32),
    /// Nothing bound
    None,
}

/// Map a key press in `mode` to an action
pub fn map_key(mode: InputMode, key: KeyEvent) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Bindings that work everywhere
    match key.code {
        KeyCode::Char('c') if ctrl => return KeyAction::Console(ConsoleEvent::QuitRequested),
        KeyCode::Char('k') if ctrl => return KeyAction::Console(ConsoleEvent::PaletteToggled),
        _ => {}
    }

    match mode {
        InputMode::Normal => map_normal(key, ctrl),
        InputMode::Search => map_search(key, ctrl),
        InputMode::Palette => map_palette(key, ctrl),
    }
}

fn map_normal(key: KeyEvent, ctrl: bool) -> KeyAction {
    let event = match key.code {
        KeyCode::Char('t') if ctrl => ConsoleEvent::ThemeToggleRequested,
        _ if ctrl => return KeyAction::None,

        KeyCode::Char('/') => return KeyAction::EnterSearch,
        KeyCode::Char('0') => return KeyAction::ClearFacet,
        KeyCode::Tab => return KeyAction::FocusNextFacet,
        KeyCode::BackTab => return KeyAction::FocusPreviousFacet,
        KeyCode::Enter => return KeyAction::ApplyFocusedFacet,
        KeyCode::PageDown => return KeyAction::ScrollReader(READER_PAGE),
        KeyCode::PageUp => return KeyAction::ScrollReader(-READER_PAGE),

        KeyCode::Char('j') | KeyCode::Down => ConsoleEvent::SelectNext,
        KeyCode::Char('k') | KeyCode::Up => ConsoleEvent::SelectPrevious,
        KeyCode::Char(c @ '1'..='3') => {
            let index = usize::from(c as u8 - b'1');
            ConsoleEvent::ToneSelected(ToneId::ALL[index])
        }
        KeyCode::Char('g') => ConsoleEvent::GenerateRequested,
        KeyCode::Char('e') => ConsoleEvent::DraftEditRequested,
        KeyCode::Char('s') => ConsoleEvent::DraftSendRequested,
        KeyCode::Char('c') => ConsoleEvent::ComposeRequested,
        KeyCode::Char('t') => ConsoleEvent::TaskTrayRequested,
        KeyCode::Char('q') | KeyCode::Esc => ConsoleEvent::QuitRequested,
        _ => return KeyAction::None,
    };
    KeyAction::Console(event)
}

fn map_search(key: KeyEvent, ctrl: bool) -> KeyAction {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => KeyAction::LeaveSearch,
        KeyCode::Backspace => KeyAction::SearchBackspace,
        KeyCode::Char(c) if !ctrl => KeyAction::SearchInput(c),
        _ => KeyAction::None,
    }
}

fn map_palette(key: KeyEvent, ctrl: bool) -> KeyAction {
    let event = match key.code {
        KeyCode::Esc => ConsoleEvent::PaletteDismissed,
        KeyCode::Enter => ConsoleEvent::PaletteSubmitted,
        KeyCode::Up => ConsoleEvent::PaletteUp,
        KeyCode::Down | KeyCode::Tab => ConsoleEvent::PaletteDown,
        KeyCode::Backspace => ConsoleEvent::PaletteBackspace,
        KeyCode::Char('p') if ctrl => ConsoleEvent::PaletteUp,
        KeyCode::Char('n') if ctrl => ConsoleEvent::PaletteDown,
        KeyCode::Char(c) if !ctrl => ConsoleEvent::PaletteInput(c),
        _ => return KeyAction::None,
    };
    KeyAction::Console(event)
}
