//! Draft Synthesis Stream Controller
//!
//! Reveals a precomputed reply one character per tick, like a model typing.
//!
//! # Cancellation
//!
//! There is no way to cancel a scheduled tick. Instead every stream is
//! stamped with a `generation`, and every tick carries the generation it
//! was scheduled for. Starting a stream or resetting bumps the generation,
//! so ticks that were already in flight arrive stale and do nothing.
//!
//! ```text
//!            begin_stream                 tick (last char)
//!   Idle ───────────────────► Streaming ──────────────────► Complete
//!    ▲                            │                            │
//!    └──────── reset ◄────────────┴────────── reset ◄──────────┘
//! ```
//!
//! `begin_stream` from any state discards whatever was there and starts
//! over at a fresh generation.

use serde::{Deserialize, Serialize};

use crate::message::{Message, ToneId};

/// Lifecycle of a draft stream
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamStatus {
    /// Nothing generated yet
    #[default]
    Idle,
    /// Characters are being revealed
    Streaming,
    /// All characters revealed
    Complete,
}

/// A scheduled reveal step, stamped with the generation it belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RevealTick {
    /// Generation the tick was scheduled for
    pub generation: u64,
}

/// What a tick did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// One more character revealed; schedule `next`
    Advanced {
        /// The follow-up tick to schedule
        next: RevealTick,
    },
    /// The last character was revealed; nothing more to schedule
    Completed,
    /// The tick belonged to a superseded stream and was ignored
    Stale,
}

/// Current stream state
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftStreamState {
    /// Lifecycle status
    pub status: StreamStatus,
    /// Tone the stream uses (or will use)
    pub tone: ToneId,
    /// Full reply being revealed
    pub source_text: String,
    /// Characters revealed so far
    pub revealed_length: usize,
    /// Stale-tick guard
    pub generation: u64,
}

/// Owns the draft stream state; the only writer of it
#[derive(Clone, Debug, Default)]
pub struct DraftStreamController {
    state: DraftStreamState,
    source_len: usize,
}

impl DraftStreamController {
    /// Idle controller for a tone
    #[must_use]
    pub fn new(tone: ToneId) -> Self {
        Self {
            state: DraftStreamState {
                tone,
                ..DraftStreamState::default()
            },
            source_len: 0,
        }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> &DraftStreamState {
        &self.state
    }

    /// Current tone
    #[must_use]
    pub fn tone(&self) -> ToneId {
        self.state.tone
    }

    /// Current status
    #[must_use]
    pub fn status(&self) -> StreamStatus {
        self.state.status
    }

    /// Current generation
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.state.generation
    }

    /// Change tone; resets the stream when the tone actually changes
    pub fn set_tone(&mut self, tone: ToneId) -> bool {
        if self.state.tone == tone {
            return false;
        }
        self.state.tone = tone;
        self.reset();
        true
    }

    /// Start revealing `message`'s reply in `tone`
    ///
    /// Returns the first tick to schedule, or `None` when the reply is empty
    /// and the stream completed on the spot.
    pub fn begin_stream(&mut self, message: &Message, tone: ToneId) -> Option<RevealTick> {
        let source_text = message.draft_for(tone).to_string();

        self.state.generation += 1;
        self.state.tone = tone;
        self.state.revealed_length = 0;
        self.source_len = source_text.chars().count();
        self.state.source_text = source_text;

        tracing::debug!(
            message = %message.id,
            tone = %tone,
            generation = self.state.generation,
            chars = self.source_len,
            "Draft stream started"
        );

        if self.source_len == 0 {
            self.state.status = StreamStatus::Complete;
            return None;
        }

        self.state.status = StreamStatus::Streaming;
        Some(RevealTick {
            generation: self.state.generation,
        })
    }

    /// Apply one reveal step
    pub fn tick(&mut self, tick: RevealTick) -> TickOutcome {
        if tick.generation != self.state.generation || self.state.status != StreamStatus::Streaming
        {
            tracing::trace!(
                tick_generation = tick.generation,
                current_generation = self.state.generation,
                "Stale reveal tick dropped"
            );
            return TickOutcome::Stale;
        }

        self.state.revealed_length += 1;

        if self.state.revealed_length >= self.source_len {
            self.state.revealed_length = self.source_len;
            self.state.status = StreamStatus::Complete;
            tracing::debug!(generation = self.state.generation, "Draft stream complete");
            TickOutcome::Completed
        } else {
            TickOutcome::Advanced { next: tick }
        }
    }

    /// Back to idle, invalidating any in-flight ticks
    pub fn reset(&mut self) {
        self.state.generation += 1;
        self.state.status = StreamStatus::Idle;
        self.state.source_text.clear();
        self.state.revealed_length = 0;
        self.source_len = 0;
    }

    /// The revealed prefix of the reply
    #[must_use]
    pub fn revealed_text(&self) -> &str {
        let text = &self.state.source_text;
        match text.char_indices().nth(self.state.revealed_length) {
            Some((byte_idx, _)) => &text[..byte_idx],
            None => text,
        }
    }

    /// Whether characters are still being revealed (drives the cursor)
    #[must_use]
    pub fn is_streaming(&self) -> bool {
        self.state.status == StreamStatus::Streaming
    }

    /// Whether a finished, non-empty draft is available for edit/send
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state.status == StreamStatus::Complete && !self.state.source_text.is_empty()
    }
}
