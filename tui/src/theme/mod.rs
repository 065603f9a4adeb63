//! Theme and Colors
//!
//! Two palettes, dark and light. The console only ever says which mode it
//! wants; everything about how that mode looks lives here.

use ratatui::style::Color;

use triage_core::{IntentCategory, ThemeMode};

// ============================================================================
// Intent Badge Colors
// ============================================================================

/// Quote badge - blue
pub const INTENT_QUOTE: Color = Color::Rgb(96, 165, 250);

/// Claim badge - red
pub const INTENT_CLAIM: Color = Color::Rgb(248, 113, 113);

/// Renewal badge - green
pub const INTENT_RENEWAL: Color = Color::Rgb(74, 222, 128);

/// Service badge - purple
pub const INTENT_SERVICE: Color = Color::Rgb(192, 132, 252);

/// Draft accent - indigo (the "AI Draft" box)
pub const DRAFT_INDIGO: Color = Color::Rgb(129, 140, 248);

// ============================================================================
// Palettes
// ============================================================================

/// Colors for one theme mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Pane background
    pub background: Color,
    /// Sidebar background
    pub sidebar: Color,
    /// Primary text
    pub text: Color,
    /// Secondary text (previews, timestamps)
    pub dim: Color,
    /// Pane separators
    pub border: Color,
    /// Active facet, headings
    pub accent: Color,
    /// Selected/focused row background
    pub highlight: Color,
    /// Unread dot
    pub unread: Color,
    /// Status bar background
    pub status: Color,
    /// Transient notices
    pub notice: Color,
}

impl Palette {
    /// Slate dark
    pub const DARK: Self = Self {
        background: Color::Rgb(15, 23, 42),
        sidebar: Color::Rgb(2, 6, 23),
        text: Color::Rgb(226, 232, 240),
        dim: Color::Rgb(100, 116, 139),
        border: Color::Rgb(51, 65, 85),
        accent: DRAFT_INDIGO,
        highlight: Color::Rgb(30, 41, 59),
        unread: Color::Rgb(59, 130, 246),
        status: Color::Rgb(2, 6, 23),
        notice: Color::Rgb(251, 191, 36),
    };

    /// Slate light
    pub const LIGHT: Self = Self {
        background: Color::Rgb(248, 250, 252),
        sidebar: Color::Rgb(241, 245, 249),
        text: Color::Rgb(15, 23, 42),
        dim: Color::Rgb(100, 116, 139),
        border: Color::Rgb(203, 213, 225),
        accent: Color::Rgb(79, 70, 229),
        highlight: Color::Rgb(224, 231, 255),
        unread: Color::Rgb(37, 99, 235),
        status: Color::Rgb(226, 232, 240),
        notice: Color::Rgb(180, 83, 9),
    };

    /// Palette for a theme mode
    pub fn for_mode(mode: ThemeMode) -> &'static Self {
        match mode {
            ThemeMode::Dark => &Self::DARK,
            ThemeMode::Light => &Self::LIGHT,
        }
    }

    /// Badge color for an intent
    pub fn intent(&self, intent: IntentCategory) -> Color {
        match intent {
            IntentCategory::Quote => INTENT_QUOTE,
            IntentCategory::Claim => INTENT_CLAIM,
            IntentCategory::Renewal => INTENT_RENEWAL,
            IntentCategory::Service => INTENT_SERVICE,
        }
    }
}
