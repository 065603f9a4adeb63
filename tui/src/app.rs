//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, mouse, resize, reveal ticks)
//! - ConsoleClient for all triage logic
//! - DisplayState for theme and notices
//!
//! # Layout
//!
//! ```text
//! ┌─────────┬──────────────┬──────────────────────────────┐
//! │ sidebar │ message list │ reader                       │
//! │ facets  │ cards        │ header / body / extracted    │
//! │         │              │ AI draft box                 │
//! ├─────────┴──────────────┴──────────────────────────────┤
//! │ status bar                                            │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! Each pane is a compositor layer. The command palette is one more layer
//! at z 100, shown only while the console reports it open.

use std::time::{Duration, Instant};

use crossterm::event::{
    Event, EventStream, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, StatefulWidget, Widget};
use ratatui::Terminal;

use triage_core::{
    facet_count, facet_values, CommandCategory, Console, ConsoleEffect, ConsoleEvent,
    ConsoleSnapshot, DraftView, Facet, FacetKind, Message, MessageId, StreamStatus, ThemeMode,
    ToneId,
};

use crate::compositor::{Compositor, LayerId};
use crate::console_client::ConsoleClient;
use crate::display::DisplayState;
use crate::keymap::{map_key, InputMode, KeyAction};
use crate::theme::{Palette, DRAFT_INDIGO};
use crate::widgets::{columns, fit, TextBlock, TextBlockState, STREAM_CURSOR};

/// Sidebar width (columns, separator included)
const SIDEBAR_WIDTH: u16 = 24;

/// Message list width (columns, separator included)
const LIST_WIDTH: u16 = 38;

/// Rows above the first card (title, search line)
const LIST_HEADER: u16 = 2;

/// Rows per message card
const CARD_HEIGHT: u16 = 3;

/// Rows above the first sidebar entry
const SIDEBAR_TOP: u16 = 1;

/// Reader header rows (subject, sender, badges, rule)
const READER_HEADER: u16 = 4;

/// Draft box rows (title, text, hints)
const DRAFT_HEIGHT: u16 = 9;

/// Most rows the extracted-data block may take
const EXTRACTED_MAX: u16 = 6;

/// Palette overlay size
const PALETTE_WIDTH: u16 = 60;
const PALETTE_HEIGHT: u16 = 18;

/// Palette overlay z-index
const PALETTE_Z: i32 = 100;

/// Lines per mouse wheel notch in the reader
const MOUSE_SCROLL: i32 = 3;

/// Quick goodbye messages
const QUICK_GOODBYES: &[&str] = &[
    "Inbox zero is a state of mind.",
    "See you at renewal time!",
    "Claims can wait until tomorrow.",
    "All quiet on the carrier front.",
    "Go get a coffee, you earned it.",
    "Triage complete. Probably.",
    "Later!",
];

/// Screen rectangles for every layer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaneLayout {
    /// Facet sidebar
    pub sidebar: Rect,
    /// Message list
    pub list: Rect,
    /// Reader and draft box
    pub reader: Rect,
    /// Bottom status bar
    pub status: Rect,
    /// Palette overlay
    pub palette: Rect,
}

impl PaneLayout {
    /// Layout for a terminal of `width` x `height`
    pub fn for_size(width: u16, height: u16) -> Self {
        let body = height.saturating_sub(1);
        let sidebar_w = SIDEBAR_WIDTH.min(width);
        let list_w = LIST_WIDTH.min(width - sidebar_w);
        let reader_w = width - sidebar_w - list_w;

        let palette_w = PALETTE_WIDTH.min(width.saturating_sub(4));
        let palette_h = PALETTE_HEIGHT.min(body.saturating_sub(2));

        Self {
            sidebar: Rect::new(0, 0, sidebar_w, body),
            list: Rect::new(sidebar_w, 0, list_w, body),
            reader: Rect::new(sidebar_w + list_w, 0, reader_w, body),
            status: Rect::new(0, body, width, height.min(1)),
            palette: Rect::new(
                (width - palette_w) / 2,
                body.saturating_sub(palette_h) / 4,
                palette_w,
                palette_h,
            ),
        }
    }
}

/// Layer IDs for UI regions
struct AppLayers {
    sidebar: LayerId,
    list: LayerId,
    reader: LayerId,
    status: LayerId,
    palette: LayerId,
}

/// One clickable facet in the sidebar
#[derive(Clone, Debug, PartialEq, Eq)]
struct SidebarEntry {
    facet: Facet,
    label: String,
    count: usize,
    section: &'static str,
}

/// A sidebar row as drawn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SidebarRow {
    Blank,
    Heading(&'static str),
    Entry(usize),
}

/// A palette result row as drawn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PaletteRow {
    Heading(CommandCategory),
    Command(usize),
}

/// Main application state
pub struct App {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    /// Goodbye message to show on exit
    goodbye_message: Option<String>,

    // === Console Integration ===
    /// Client for the embedded Console
    client: ConsoleClient,
    /// Display state derived from ConsoleEffects
    display: DisplayState,

    // === UI Components ===
    /// The layered compositor
    compositor: Compositor,
    /// Layer assignments
    layers: AppLayers,
    /// Where each layer sits
    layout: PaneLayout,

    // === Input State ===
    /// Typing into the search box
    search_mode: bool,
    /// Facets offered in the sidebar
    sidebar: Vec<SidebarEntry>,
    /// Keyboard focus in the sidebar
    sidebar_focus: usize,
    /// First card shown in the list
    list_offset: usize,
    /// Reader body scroll
    reader_scroll: TextBlockState,
    /// Message the reader scroll belongs to
    reader_message: Option<MessageId>,

    // === Misc State ===
    /// Minimum time between frames
    frame_interval: Duration,
    /// Last frame time (for notice timers)
    last_frame: Instant,
}

impl App {
    /// Create a new App sized to the current terminal
    pub fn new(
        client: ConsoleClient,
        theme: ThemeMode,
        frame_interval: Duration,
    ) -> anyhow::Result<Self> {
        let size = crossterm::terminal::size()?;
        Ok(Self::with_size(client, theme, frame_interval, size))
    }

    /// Create an App for a known screen size
    pub fn with_size(
        client: ConsoleClient,
        theme: ThemeMode,
        frame_interval: Duration,
        size: (u16, u16),
    ) -> Self {
        let layout = PaneLayout::for_size(size.0, size.1);
        let mut compositor = Compositor::new(Rect::new(0, 0, size.0, size.1));

        // Panes at the back, status above them, palette on top
        let layers = AppLayers {
            sidebar: compositor.create_layer(layout.sidebar, 0),
            list: compositor.create_layer(layout.list, 0),
            reader: compositor.create_layer(layout.reader, 0),
            status: compositor.create_layer(layout.status, 10),
            palette: compositor.create_layer(layout.palette, PALETTE_Z),
        };
        compositor.set_visible(layers.palette, false);

        let sidebar = sidebar_entries(client.console());

        Self {
            running: true,
            goodbye_message: None,
            client,
            display: DisplayState::new(theme),
            compositor,
            layers,
            layout,
            search_mode: false,
            sidebar,
            sidebar_focus: 0,
            list_offset: 0,
            reader_scroll: TextBlockState::default(),
            reader_message: None,
            frame_interval,
            last_frame: Instant::now(),
        }
    }

    /// Main event loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        // Create async event stream for non-blocking terminal events
        let mut event_stream = EventStream::new();

        // Render initial frame immediately so user sees UI
        self.render(terminal)?;

        while self.running {
            let frame_start = Instant::now();

            tokio::select! {
                biased;

                // Terminal events - highest priority
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_terminal_event(event),
                        Some(Err(e)) => tracing::warn!(error = %e, "Terminal event error"),
                        None => {
                            tracing::info!("Terminal event stream closed");
                            self.running = false;
                        }
                    }
                }

                // A reveal step fired
                Some(tick) = self.client.next_tick() => {
                    self.client.deliver_tick(tick);
                }

                // Frame tick
                () = tokio::time::sleep(self.frame_interval) => {}
            }

            self.tick();
            self.render(terminal)?;

            // Frame rate limiting
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_interval {
                tokio::time::sleep(self.frame_interval - elapsed).await;
            }
        }

        Ok(())
    }

    /// Deliver fired reveal ticks, apply effects and advance timers
    pub fn tick(&mut self) {
        self.client.poll_reveals();
        self.process_effects();
        self.update();
    }

    /// Handle one terminal event
    pub fn handle_terminal_event(&mut self, event: Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(w, h) => self.handle_resize(w, h),
            _ => {}
        }
        self.process_effects();
    }

    /// Process all pending effects from the Console
    fn process_effects(&mut self) {
        for effect in self.client.recv_all() {
            if matches!(effect, ConsoleEffect::Quit) {
                self.generate_goodbye();
                self.running = false;
            }
            self.display.apply_effect(&effect);
        }
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyEvent) {
        match map_key(self.mode(), key) {
            KeyAction::Console(event) => self.client.send(event),
            KeyAction::EnterSearch => self.search_mode = true,
            KeyAction::LeaveSearch => self.search_mode = false,
            KeyAction::SearchInput(c) => {
                let mut query = self.client.console().filter().search_query().to_string();
                query.push(c);
                self.client.send(ConsoleEvent::SearchChanged(query));
            }
            KeyAction::SearchBackspace => {
                let mut query = self.client.console().filter().search_query().to_string();
                query.pop();
                self.client.send(ConsoleEvent::SearchChanged(query));
            }
            KeyAction::ClearFacet => self.client.send(ConsoleEvent::FacetSelected(Facet::All)),
            KeyAction::FocusNextFacet => {
                if !self.sidebar.is_empty() {
                    self.sidebar_focus = (self.sidebar_focus + 1) % self.sidebar.len();
                }
            }
            KeyAction::FocusPreviousFacet => {
                if !self.sidebar.is_empty() {
                    self.sidebar_focus =
                        (self.sidebar_focus + self.sidebar.len() - 1) % self.sidebar.len();
                }
            }
            KeyAction::ApplyFocusedFacet => {
                if let Some(entry) = self.sidebar.get(self.sidebar_focus) {
                    self.client.send(ConsoleEvent::FacetSelected(entry.facet.clone()));
                }
            }
            KeyAction::ScrollReader(delta) => self.reader_scroll.scroll(delta),
            KeyAction::None => {}
        }
    }

    /// Handle mouse input
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let Some(layer) = self.compositor.layer_at(mouse.column, mouse.row) else {
            return;
        };

        match mouse.kind {
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                let down = mouse.kind == MouseEventKind::ScrollDown;
                if layer == self.layers.reader {
                    self.reader_scroll
                        .scroll(if down { MOUSE_SCROLL } else { -MOUSE_SCROLL });
                } else if layer == self.layers.list {
                    self.client.send(if down {
                        ConsoleEvent::SelectNext
                    } else {
                        ConsoleEvent::SelectPrevious
                    });
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if layer == self.layers.list {
                    if let Some(id) = self.card_at(mouse.row) {
                        self.client.send(ConsoleEvent::MessageSelected(id));
                    }
                } else if layer == self.layers.sidebar {
                    if let Some(index) = self.sidebar_entry_at(mouse.row) {
                        self.sidebar_focus = index;
                        let facet = self.sidebar[index].facet.clone();
                        self.client.send(ConsoleEvent::FacetSelected(facet));
                    }
                }
            }
            _ => {}
        }
    }

    /// Message card under a screen row
    fn card_at(&self, row: u16) -> Option<MessageId> {
        let rel = row.checked_sub(self.layout.list.y + LIST_HEADER)?;
        let index = usize::from(rel / CARD_HEIGHT) + self.list_offset;
        self.client.console().visible_ids().get(index).copied()
    }

    /// Sidebar entry under a screen row
    fn sidebar_entry_at(&self, row: u16) -> Option<usize> {
        let rel = row.checked_sub(self.layout.sidebar.y + SIDEBAR_TOP)?;
        match sidebar_rows(&self.sidebar).get(usize::from(rel)) {
            Some(SidebarRow::Entry(index)) => Some(*index),
            _ => None,
        }
    }

    /// Handle terminal resize
    fn handle_resize(&mut self, width: u16, height: u16) {
        tracing::debug!(width, height, "Terminal resized");
        self.layout = PaneLayout::for_size(width, height);

        self.compositor.resize(Rect::new(0, 0, width, height));
        self.compositor.place_layer(self.layers.sidebar, self.layout.sidebar);
        self.compositor.place_layer(self.layers.list, self.layout.list);
        self.compositor.place_layer(self.layers.reader, self.layout.reader);
        self.compositor.place_layer(self.layers.status, self.layout.status);
        self.compositor.place_layer(self.layers.palette, self.layout.palette);
    }

    /// Update timers and overlay visibility
    fn update(&mut self) {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;

        self.display.update(delta);

        let palette_open = self.client.console().palette().open;
        self.compositor.set_visible(self.layers.palette, palette_open);
    }

    /// Render the UI
    pub fn render<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        self.draw_layers();

        terminal.draw(|frame| {
            let output = self.compositor.composite();
            let area = frame.area();
            let buf = frame.buffer_mut();

            for y in 0..area.height.min(output.area.height) {
                for x in 0..area.width.min(output.area.width) {
                    buf[(x, y)] = output[(x, y)].clone();
                }
            }
        })?;

        Ok(())
    }

    /// Draw every layer from a fresh snapshot
    fn draw_layers(&mut self) {
        let snapshot = self.client.snapshot();
        let mode = self.mode();
        let palette = Palette::for_mode(self.display.theme);

        if snapshot.current != self.reader_message {
            self.reader_scroll.scroll_to_top();
            self.reader_message = snapshot.current;
        }

        let console = self.client.console();

        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.sidebar) {
            render_sidebar(buf, &self.sidebar, self.sidebar_focus, snapshot.filter.facet(), palette);
        }
        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.list) {
            render_list(buf, console, &snapshot, mode, &mut self.list_offset, palette);
        }
        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.reader) {
            render_reader(
                buf,
                console.current_message(),
                &snapshot.draft,
                &mut self.reader_scroll,
                palette,
            );
        }
        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.status) {
            render_status(buf, &snapshot, &self.display, mode, palette);
        }

        self.compositor
            .set_visible(self.layers.palette, snapshot.palette.open);
        if snapshot.palette.open {
            if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.palette) {
                render_palette(buf, &snapshot, palette);
            }
        }
    }

    /// Which input the keyboard drives right now
    pub fn mode(&self) -> InputMode {
        if self.client.console().palette().open {
            InputMode::Palette
        } else if self.search_mode {
            InputMode::Search
        } else {
            InputMode::Normal
        }
    }

    /// Is the app still running?
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The console client
    pub fn client(&self) -> &ConsoleClient {
        &self.client
    }

    /// Surface display state
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Facet the sidebar focus is on
    pub fn focused_facet(&self) -> Option<&Facet> {
        self.sidebar.get(self.sidebar_focus).map(|e| &e.facet)
    }

    /// Where the layers currently sit
    pub fn layout(&self) -> PaneLayout {
        self.layout
    }

    /// Generate a quick goodbye message
    fn generate_goodbye(&mut self) {
        let idx = rand::random::<usize>() % QUICK_GOODBYES.len();
        self.goodbye_message = Some(QUICK_GOODBYES[idx].to_string());
    }

    /// Get the goodbye message for display after TUI closes
    pub fn goodbye(&self) -> Option<&str> {
        self.goodbye_message.as_deref()
    }
}

// ============================================================================
// Pane rendering
// ============================================================================

/// Sidebar facets: Inbox, then every category, account and carrier
fn sidebar_entries(console: &Console) -> Vec<SidebarEntry> {
    let store = console.store();
    let mut entries = vec![SidebarEntry {
        facet: Facet::All,
        label: "Inbox".to_string(),
        count: store.len(),
        section: "",
    }];

    for (kind, section) in [
        (FacetKind::Category, "Intents"),
        (FacetKind::Account, "Accounts"),
        (FacetKind::Carrier, "Carriers"),
    ] {
        for facet in facet_values(store, kind) {
            entries.push(SidebarEntry {
                label: facet.title().to_string(),
                count: facet_count(store, &facet),
                facet,
                section,
            });
        }
    }
    entries
}

/// Sidebar rows with a heading above each section
fn sidebar_rows(entries: &[SidebarEntry]) -> Vec<SidebarRow> {
    let mut rows = Vec::new();
    let mut section = "";
    for (index, entry) in entries.iter().enumerate() {
        if entry.section != section {
            rows.push(SidebarRow::Blank);
            rows.push(SidebarRow::Heading(entry.section));
            section = entry.section;
        }
        rows.push(SidebarRow::Entry(index));
    }
    rows
}

/// Palette rows with a heading wherever the category changes
fn palette_rows(categories: impl Iterator<Item = CommandCategory>) -> Vec<PaletteRow> {
    let mut rows = Vec::new();
    let mut last = None;
    for (index, category) in categories.enumerate() {
        if last != Some(category) {
            rows.push(PaletteRow::Heading(category));
            last = Some(category);
        }
        rows.push(PaletteRow::Command(index));
    }
    rows
}

/// First row to show so that `index` stays inside a window of `capacity`
fn keep_in_view(offset: usize, index: Option<usize>, capacity: usize, len: usize) -> usize {
    let offset = match index {
        Some(i) if i < offset => i,
        Some(i) if capacity > 0 && i >= offset + capacity => i + 1 - capacity,
        _ => offset,
    };
    offset.min(len.saturating_sub(capacity))
}

/// Screen row for a list position
fn row(i: usize) -> u16 {
    u16::try_from(i).unwrap_or(u16::MAX)
}

/// Write `text` at (x, y), clipped to the buffer; returns the column after it
fn put(buf: &mut Buffer, x: u16, y: u16, text: &str, style: Style) -> u16 {
    let area = buf.area;
    if x >= area.width || y >= area.height {
        return x;
    }
    let room = usize::from(area.width - x);
    let (next_x, _) = buf.set_stringn(x, y, fit(text, room), room, style);
    next_x
}

/// Write `text` flush against the right edge, `margin` columns in
fn put_right(buf: &mut Buffer, y: u16, margin: u16, text: &str, style: Style) -> u16 {
    let x = buf
        .area
        .width
        .saturating_sub(margin)
        .saturating_sub(row(columns(text)));
    put(buf, x, y, text, style);
    x
}

/// Clear a pane to its background
fn fill(buf: &mut Buffer, style: Style) {
    buf.reset();
    let area = buf.area;
    buf.set_style(area, style);
}

/// Vertical rule in the last column
fn separator(buf: &mut Buffer, p: &Palette) {
    let area = buf.area;
    if area.width == 0 {
        return;
    }
    for y in 0..area.height {
        put(buf, area.width - 1, y, "│", Style::default().fg(p.border));
    }
}

fn render_sidebar(
    buf: &mut Buffer,
    entries: &[SidebarEntry],
    focus: usize,
    active: &Facet,
    p: &Palette,
) {
    fill(buf, Style::default().bg(p.sidebar).fg(p.text));
    let inner = buf.area.width.saturating_sub(1);

    put(
        buf,
        1,
        0,
        "TRIAGE",
        Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
    );

    for (i, sidebar_row) in sidebar_rows(entries).into_iter().enumerate() {
        let y = SIDEBAR_TOP.saturating_add(row(i));
        if y >= buf.area.height {
            break;
        }
        match sidebar_row {
            SidebarRow::Blank => {}
            SidebarRow::Heading(heading) => {
                put(
                    buf,
                    1,
                    y,
                    &heading.to_uppercase(),
                    Style::default().fg(p.dim).add_modifier(Modifier::BOLD),
                );
            }
            SidebarRow::Entry(index) => {
                let entry = &entries[index];
                let mut style = Style::default().fg(p.text).bg(p.sidebar);
                if entry.facet == *active {
                    style = style.fg(p.accent).add_modifier(Modifier::BOLD);
                }
                if index == focus {
                    style = style.bg(p.highlight);
                    buf.set_style(Rect::new(0, y, inner, 1), style);
                    put(buf, 0, y, "›", style);
                }

                let count = entry.count.to_string();
                let room = usize::from(inner.saturating_sub(4)).saturating_sub(columns(&count));
                put(buf, 2, y, &fit(&entry.label, room), style);
                put_right(buf, y, 2, &count, style.fg(p.dim));
            }
        }
    }

    separator(buf, p);
}

fn render_list(
    buf: &mut Buffer,
    console: &Console,
    snapshot: &ConsoleSnapshot,
    mode: InputMode,
    offset: &mut usize,
    p: &Palette,
) {
    fill(buf, Style::default().bg(p.background).fg(p.text));
    let inner = buf.area.width.saturating_sub(1);
    let text = Style::default().fg(p.text);

    let found = format!("{} messages found", snapshot.visible_ids.len());
    let found_x = inner.saturating_sub(row(columns(&found)) + 1);
    let title_room = usize::from(found_x.saturating_sub(2));
    put(
        buf,
        1,
        0,
        &fit(snapshot.filter.facet().title(), title_room),
        text.add_modifier(Modifier::BOLD),
    );
    if found_x > 2 {
        put(buf, found_x, 0, &found, Style::default().fg(p.dim));
    }

    let query = snapshot.filter.search_query();
    if mode == InputMode::Search {
        let line = format!("/ {query}{STREAM_CURSOR}");
        put(buf, 1, 1, &line, Style::default().fg(p.accent));
    } else if query.is_empty() {
        put(buf, 1, 1, "/ search", Style::default().fg(p.dim));
    } else {
        put(buf, 1, 1, &format!("/ {query}"), text);
    }

    if snapshot.visible_ids.is_empty() {
        put(
            buf,
            1,
            LIST_HEADER + 1,
            &fit("No emails found in this category.", usize::from(inner.saturating_sub(2))),
            Style::default().fg(p.dim),
        );
        separator(buf, p);
        return;
    }

    let capacity = usize::from(buf.area.height.saturating_sub(LIST_HEADER) / CARD_HEIGHT);
    let selected_index = snapshot
        .selected
        .and_then(|id| snapshot.visible_ids.iter().position(|v| *v == id));
    *offset = keep_in_view(*offset, selected_index, capacity, snapshot.visible_ids.len());

    for (slot, id) in snapshot
        .visible_ids
        .iter()
        .skip(*offset)
        .take(capacity)
        .enumerate()
    {
        let Some(message) = console.store().get(*id) else {
            continue;
        };
        let top = LIST_HEADER.saturating_add(row(slot).saturating_mul(CARD_HEIGHT));
        render_card(buf, top, inner, message, snapshot.selected == Some(*id), p);
    }

    separator(buf, p);
}

fn render_card(buf: &mut Buffer, top: u16, width: u16, message: &Message, selected: bool, p: &Palette) {
    let bg = if selected { p.highlight } else { p.background };
    let base = Style::default().bg(bg).fg(p.text);
    buf.set_style(Rect::new(0, top, width, CARD_HEIGHT), base);

    if !message.read {
        put(buf, 1, top, "●", base.fg(p.unread));
    }

    let time_x = width.saturating_sub(row(columns(&message.timestamp)) + 1);
    let sender_style = if message.read {
        base
    } else {
        base.add_modifier(Modifier::BOLD)
    };
    let sender_room = usize::from(time_x.saturating_sub(4));
    put(buf, 3, top, &fit(&message.sender, sender_room), sender_style);
    put(buf, time_x, top, &message.timestamp, base.fg(p.dim));

    let text_room = usize::from(width.saturating_sub(4));
    put(buf, 3, top + 1, &fit(&message.subject, text_room), base);

    let mut next = put(
        buf,
        3,
        top + 2,
        message.intent.label(),
        base.fg(p.intent(message.intent)),
    );
    for tag in &message.tags {
        next = put(buf, next + 1, top + 2, &format!("#{tag}"), base.fg(p.notice));
    }
    let preview_room = usize::from(width.saturating_sub(next + 2));
    put(buf, next + 1, top + 2, &fit(&message.preview, preview_room), base.fg(p.dim));
}

fn render_reader(
    buf: &mut Buffer,
    message: Option<&Message>,
    draft: &DraftView,
    scroll: &mut TextBlockState,
    p: &Palette,
) {
    fill(buf, Style::default().bg(p.background).fg(p.text));
    let area = buf.area;
    let text = Style::default().fg(p.text);
    let dim = Style::default().fg(p.dim);

    let Some(message) = message else {
        put(buf, 2, 1, "No message selected.", dim);
        return;
    };

    let content_w = area.width.saturating_sub(4);
    let room = usize::from(content_w);

    // Header
    put(buf, 2, 0, &fit(&message.subject, room), text.add_modifier(Modifier::BOLD));
    let time_x = put_right(buf, 1, 2, &message.timestamp, dim);
    let initial = format!(" {} ", message.sender_initial());
    let x = put(
        buf,
        2,
        1,
        &initial,
        Style::default()
            .bg(p.accent)
            .fg(p.background)
            .add_modifier(Modifier::BOLD),
    );
    let sender_room = usize::from(time_x.saturating_sub(x + 2));
    put(buf, x + 1, 1, &fit(&message.sender_line(), sender_room), dim);

    let badge = format!("[{}]", message.intent.label());
    let mut x = put(buf, 2, 2, &badge, Style::default().fg(p.intent(message.intent)));
    x = put(buf, x + 1, 2, &format!("{} · {}", message.account, message.carrier), dim);
    for tag in &message.tags {
        x = put(buf, x + 1, 2, &format!("#{tag}"), Style::default().fg(p.accent));
    }
    put(buf, 2, 3, &"─".repeat(room), Style::default().fg(p.border));

    // Draft box at the bottom, extracted data above it, body in between
    let draft_height = DRAFT_HEIGHT.min(area.height.saturating_sub(READER_HEADER));
    let draft_top = area.height - draft_height;

    let extracted: Vec<String> = message
        .metadata
        .iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect();
    let extracted_height = if extracted.is_empty() {
        0
    } else {
        (row(extracted.len()) + 1).min(EXTRACTED_MAX)
    };
    let body_bottom = draft_top.saturating_sub(extracted_height).max(READER_HEADER);

    if content_w > 0 && body_bottom > READER_HEADER {
        TextBlock::new(message.body_text()).style(text).render(
            Rect::new(2, READER_HEADER, content_w, body_bottom - READER_HEADER),
            buf,
            scroll,
        );
    }

    if extracted_height > 0 {
        put(
            buf,
            2,
            body_bottom,
            "Extracted Data",
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
        );
        for (i, line) in extracted
            .iter()
            .take(usize::from(extracted_height - 1))
            .enumerate()
        {
            put(buf, 4, body_bottom + 1 + row(i), &fit(line, room.saturating_sub(2)), dim);
        }
    }

    if draft_height >= 3 && content_w > 0 {
        render_draft(buf, draft_top, draft_height, content_w, draft, p);
    }
}

fn render_draft(buf: &mut Buffer, top: u16, height: u16, width: u16, draft: &DraftView, p: &Palette) {
    let dim = Style::default().fg(p.dim);
    let title = Style::default().fg(DRAFT_INDIGO).add_modifier(Modifier::BOLD);

    let mut x = put(buf, 2, top, "AI Draft", title);
    for (i, tone) in ToneId::ALL.iter().enumerate() {
        let label = format!("[{}] {}", i + 1, tone.label());
        let style = if *tone == draft.tone {
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            dim
        };
        x = put(buf, x + 2, top, &label, style);
    }

    let text_area = Rect::new(2, top + 1, width, height - 2);
    match draft.status {
        StreamStatus::Idle => {
            put(buf, 2, top + 1, "Press g to generate a reply.", dim);
        }
        StreamStatus::Streaming | StreamStatus::Complete => {
            // Follow the tail while text arrives
            let mut state = TextBlockState {
                scroll_offset: if draft.streaming { usize::MAX } else { 0 },
                total_lines: 0,
            };
            TextBlock::new(&draft.text)
                .style(Style::default().fg(p.text))
                .cursor(draft.streaming)
                .render(text_area, buf, &mut state);
        }
    }

    let hint_y = top + height - 1;
    if draft.ready {
        put(buf, 2, hint_y, "[e] Edit  [s] Send", Style::default().fg(p.accent));
    } else if draft.streaming {
        put(buf, 2, hint_y, "Drafting…", dim);
    }
}

fn render_status(
    buf: &mut Buffer,
    snapshot: &ConsoleSnapshot,
    display: &DisplayState,
    mode: InputMode,
    p: &Palette,
) {
    fill(buf, Style::default().bg(p.status).fg(p.text));

    let (label, colour) = match mode {
        InputMode::Normal => (" NORMAL ", p.accent),
        InputMode::Search => (" SEARCH ", p.notice),
        InputMode::Palette => (" COMMAND ", DRAFT_INDIGO),
    };
    let x = put(
        buf,
        0,
        0,
        label,
        Style::default().bg(colour).fg(p.status).add_modifier(Modifier::BOLD),
    );

    let right = format!(
        "{} · {}",
        draft_label(&snapshot.draft),
        display.theme.as_str()
    );
    let right_x = buf
        .area
        .width
        .saturating_sub(row(columns(&right)) + 1);

    let (left, style) = match &display.notification {
        Some(notice) => (notice.message.as_str(), Style::default().fg(p.notice)),
        None => (mode_hint(mode), Style::default().fg(p.dim)),
    };
    let room = usize::from(right_x.saturating_sub(x + 2));
    put(buf, x + 1, 0, &fit(left, room), style);

    if right_x > x {
        put(buf, right_x, 0, &right, Style::default().fg(p.dim));
    }
}

fn mode_hint(mode: InputMode) -> &'static str {
    match mode {
        InputMode::Normal => {
            "j/k move  1-3 tone  g draft  c compose  t task  / search  Ctrl+K commands  q quit"
        }
        InputMode::Search => "type to filter  Enter/Esc done",
        InputMode::Palette => "↑/↓ choose  Enter run  Esc close",
    }
}

fn draft_label(draft: &DraftView) -> String {
    match draft.status {
        StreamStatus::Idle => "draft idle".to_string(),
        StreamStatus::Streaming => format!("drafting ({})", draft.tone.label()),
        StreamStatus::Complete => "draft ready".to_string(),
    }
}

fn render_palette(buf: &mut Buffer, snapshot: &ConsoleSnapshot, p: &Palette) {
    fill(buf, Style::default().bg(p.sidebar).fg(p.text));
    let area = buf.area;
    if area.width < 6 || area.height < 4 {
        return;
    }

    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.accent))
        .title(" Commands ")
        .render(area, buf);

    let room = usize::from(area.width.saturating_sub(4));
    let prompt = format!("> {}{STREAM_CURSOR}", snapshot.palette.query);
    put(buf, 2, 1, &fit(&prompt, room), Style::default().fg(p.text));

    let results = &snapshot.palette_results;
    if results.is_empty() {
        put(buf, 2, 3, "No results found.", Style::default().fg(p.dim));
        return;
    }

    let rows = palette_rows(results.iter().map(|c| c.category));
    let capacity = usize::from(area.height.saturating_sub(4));
    let selected_row = rows
        .iter()
        .position(|r| *r == PaletteRow::Command(snapshot.palette.selected));
    let offset = keep_in_view(0, selected_row, capacity, rows.len());

    for (i, palette_row) in rows.iter().skip(offset).take(capacity).enumerate() {
        let y = 3 + row(i);
        match palette_row {
            PaletteRow::Heading(category) => {
                put(
                    buf,
                    2,
                    y,
                    category.heading(),
                    Style::default().fg(p.dim).add_modifier(Modifier::BOLD),
                );
            }
            PaletteRow::Command(index) => {
                let command = &results[*index];
                if *index == snapshot.palette.selected {
                    let style = Style::default().bg(p.highlight).fg(p.accent);
                    buf.set_style(Rect::new(1, y, area.width - 2, 1), style);
                    put(buf, 2, y, &format!("› {}", fit(&command.label, room.saturating_sub(2))), style);
                } else {
                    put(buf, 4, y, &fit(&command.label, room.saturating_sub(2)), Style::default().fg(p.text));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use triage_core::{IntentCategory, MessageStore};

    #[test]
    fn test_layout_splits_width() {
        let layout = PaneLayout::for_size(120, 40);
        assert_eq!(layout.sidebar, Rect::new(0, 0, 24, 39));
        assert_eq!(layout.list, Rect::new(24, 0, 38, 39));
        assert_eq!(layout.reader, Rect::new(62, 0, 58, 39));
        assert_eq!(layout.status, Rect::new(0, 39, 120, 1));
        assert_eq!(layout.palette.width, PALETTE_WIDTH);
    }

    #[test]
    fn test_layout_survives_tiny_terminal() {
        let layout = PaneLayout::for_size(10, 0);
        assert_eq!(layout.sidebar.width, 10);
        assert_eq!(layout.list.width, 0);
        assert_eq!(layout.reader.width, 0);
        assert_eq!(layout.status.height, 0);
    }

    #[test]
    fn test_keep_in_view() {
        assert_eq!(keep_in_view(0, Some(2), 5, 10), 0);
        assert_eq!(keep_in_view(0, Some(7), 5, 10), 3);
        assert_eq!(keep_in_view(4, Some(1), 5, 10), 1);
        // Offset never runs past the last full window
        assert_eq!(keep_in_view(9, None, 5, 10), 5);
        assert_eq!(keep_in_view(3, None, 5, 2), 0);
    }

    #[test]
    fn test_sidebar_sections() {
        let console = Console::new(MessageStore::demo(), ToneId::Professional);
        let entries = sidebar_entries(&console);
        assert_eq!(entries[0].facet, Facet::All);
        assert_eq!(entries[0].count, console.store().len());

        let rows = sidebar_rows(&entries);
        assert_eq!(rows[0], SidebarRow::Entry(0));
        assert_eq!(rows[1], SidebarRow::Blank);
        assert_eq!(rows[2], SidebarRow::Heading("Intents"));
        assert_eq!(
            rows.iter().filter(|r| matches!(r, SidebarRow::Heading(_))).count(),
            3
        );
        assert!(entries
            .iter()
            .any(|e| e.facet == Facet::Category(IntentCategory::Claim)));
    }

    #[test]
    fn test_palette_rows_group_by_category() {
        let rows = palette_rows(
            [
                CommandCategory::Navigation,
                CommandCategory::Navigation,
                CommandCategory::Actions,
            ]
            .into_iter(),
        );
        assert_eq!(
            rows,
            vec![
                PaletteRow::Heading(CommandCategory::Navigation),
                PaletteRow::Command(0),
                PaletteRow::Command(1),
                PaletteRow::Heading(CommandCategory::Actions),
                PaletteRow::Command(2),
            ]
        );
    }
}
