//! Application model types: `App` and `InputMode`.
//!
//! The `App` struct holds the library, the decks, the cursor in the library
//! view and whatever the user is currently typing. It is also the control
//! surface: gain and speed are range-checked here before reaching a deck.

use std::path::PathBuf;

use ratatui::layout::Rect;
use tracing::{info, warn};

use crate::audio::AudioEngine;
use crate::config::DeckSettings;
use crate::deck::Deck;
use crate::library::{Outcome, Selection, TrackLibrary};
use crate::waveform::{PeaksReady, PointerKind};

pub const GAIN_RANGE: (f32, f32) = (0.0, 1.0);
pub const SPEED_RANGE: (f32, f32) = (0.1, 4.0);

/// What keystrokes currently feed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Navigation and transport keys.
    #[default]
    Normal,
    /// Typing a library search term.
    Search,
    /// Typing a file or folder to import.
    AddPath,
}

/// The main application model.
pub struct App<E: AudioEngine> {
    pub library: TrackLibrary,
    pub decks: Vec<Deck<E>>,
    /// Cursor into the library's visible list.
    pub selected: usize,
    /// Deck that receives the next loaded track and transport keys (0-based).
    pub target_deck: usize,
    pub mode: InputMode,
    pub search_query: String,
    pub prompt: String,
    pub status: Option<String>,
    /// Something changed since the last frame.
    pub dirty: bool,
    /// Screen rectangles of each deck's waveform row, written by the renderer.
    pub waveform_areas: Vec<Rect>,
    /// Deck that received the pointer press currently held down.
    pointer_deck: Option<usize>,
    gain_step: f32,
    speed_step: f32,
}

impl<E: AudioEngine> App<E> {
    pub fn new(library: TrackLibrary, decks: Vec<Deck<E>>, settings: &DeckSettings) -> Self {
        let deck_count = decks.len();
        Self {
            library,
            decks,
            selected: 0,
            target_deck: 0,
            mode: InputMode::Normal,
            search_query: String::new(),
            prompt: String::new(),
            status: None,
            dirty: true,
            waveform_areas: vec![Rect::default(); deck_count],
            pointer_deck: None,
            gain_step: settings.gain_step,
            speed_step: settings.speed_step,
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
        self.dirty = true;
    }

    // Library cursor

    pub fn next(&mut self) {
        let len = self.library.visible().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
            self.dirty = true;
        }
    }

    pub fn prev(&mut self) {
        let len = self.library.visible().len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
            self.dirty = true;
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.dirty = true;
    }

    pub fn select_last(&mut self) {
        self.selected = self.library.visible().len().saturating_sub(1);
        self.dirty = true;
    }

    fn clamp_selection(&mut self) {
        let len = self.library.visible().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    // Search

    pub fn enter_search_mode(&mut self) {
        self.mode = InputMode::Search;
        self.dirty = true;
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_query.push(c);
        self.apply_search();
    }

    pub fn pop_search_char(&mut self) {
        self.search_query.pop();
        self.apply_search();
    }

    /// Leave search mode keeping the filter.
    pub fn commit_search(&mut self) {
        self.mode = InputMode::Normal;
        self.dirty = true;
    }

    /// Leave search mode and show the whole library again.
    pub fn clear_search(&mut self) {
        self.search_query.clear();
        self.mode = InputMode::Normal;
        self.apply_search();
    }

    fn apply_search(&mut self) {
        self.library.search(&self.search_query);
        self.selected = 0;
        self.dirty = true;
    }

    // Import prompt

    pub fn enter_add_mode(&mut self) {
        self.prompt.clear();
        self.mode = InputMode::AddPath;
        self.dirty = true;
    }

    pub fn push_prompt_char(&mut self, c: char) {
        self.prompt.push(c);
        self.dirty = true;
    }

    pub fn pop_prompt_char(&mut self) {
        self.prompt.pop();
        self.dirty = true;
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt.clear();
        self.mode = InputMode::Normal;
        self.dirty = true;
    }

    /// Close the prompt and hand back the typed path, if any.
    pub fn take_prompt(&mut self) -> Option<PathBuf> {
        self.mode = InputMode::Normal;
        self.dirty = true;
        let text = std::mem::take(&mut self.prompt);
        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(PathBuf::from(expand_home(text)))
        }
    }

    // Library mutations

    /// Merge `paths` into the library (file chooser results and CLI paths alike).
    pub fn add_paths(&mut self, paths: &[PathBuf]) {
        let outcome = self.library.add(paths);
        self.clamp_selection();
        let added = outcome.changed;
        if self.report_persist(outcome) {
            self.set_status(format!(
                "added {added} track(s), {} in library",
                self.library.known().len()
            ));
        }
        info!(added, "library import merged");
    }

    pub fn delete_selected(&mut self) {
        let outcome = self.library.delete(self.selected);
        if outcome.changed == 0 {
            return;
        }
        self.clamp_selection();
        if self.report_persist(outcome) {
            self.set_status("removed from library");
        }
    }

    /// Show a persistence failure; returns `true` when there was none.
    fn report_persist(&mut self, outcome: Outcome) -> bool {
        self.dirty = true;
        match outcome.persist_error {
            Some(e) => {
                self.set_status(format!("library not saved: {e}"));
                false
            }
            None => true,
        }
    }

    /// Activate the library row under the cursor for `deck`.
    pub fn activate_selected(&mut self, deck: usize) {
        if deck < self.decks.len() {
            self.target_deck = deck;
        }
        let _ = self.library.select(self.selected);
    }

    /// Load a selection on the target deck.
    pub fn load_selection(&mut self, selection: Selection) {
        let Some(deck) = self.decks.get_mut(self.target_deck) else {
            return;
        };
        match deck.load_track(&selection.path) {
            Ok(()) => {
                let label = deck.label();
                self.set_status(format!("{label} playing"));
            }
            Err(e) => {
                warn!(error = %e, "load failed");
                self.set_status(e.to_string());
            }
        }
    }

    /// Paths dropped onto the terminal go to the target deck; only one is accepted.
    pub fn files_dropped(&mut self, paths: &[PathBuf]) {
        let Some(deck) = self.decks.get_mut(self.target_deck) else {
            return;
        };
        match deck.files_dropped(paths) {
            Some(Ok(())) => {
                let label = deck.label();
                self.set_status(format!("{label} playing"));
            }
            Some(Err(e)) => self.set_status(e.to_string()),
            None => self.set_status("drop a single file onto a deck"),
        }
    }

    // Transport

    pub fn cycle_target_deck(&mut self) {
        if !self.decks.is_empty() {
            self.target_deck = (self.target_deck + 1) % self.decks.len();
            self.dirty = true;
        }
    }

    pub fn set_target_deck(&mut self, deck: usize) {
        if deck < self.decks.len() {
            self.target_deck = deck;
            self.dirty = true;
        }
    }

    fn target(&mut self) -> Option<&mut Deck<E>> {
        self.dirty = true;
        self.decks.get_mut(self.target_deck)
    }

    pub fn toggle_playback(&mut self) {
        if let Some(d) = self.target() {
            d.toggle();
        }
    }

    pub fn play(&mut self) {
        if let Some(d) = self.target() {
            d.play();
        }
    }

    pub fn stop(&mut self) {
        if let Some(d) = self.target() {
            d.stop();
        }
    }

    /// Nudge the target deck's gain by `steps` increments, clamped to [`GAIN_RANGE`].
    pub fn adjust_gain(&mut self, steps: f32) {
        let step = self.gain_step;
        if let Some(d) = self.target() {
            let g = (d.gain() + steps * step).clamp(GAIN_RANGE.0, GAIN_RANGE.1);
            d.set_gain(g);
        }
    }

    /// Nudge the target deck's speed by `steps` increments, clamped to [`SPEED_RANGE`].
    pub fn adjust_speed(&mut self, steps: f32) {
        let step = self.speed_step;
        if let Some(d) = self.target() {
            let s = (d.speed() + steps * step).clamp(SPEED_RANGE.0, SPEED_RANGE.1);
            d.set_speed(s);
        }
    }

    // Cadences

    /// Position cadence: poll every deck.
    pub fn tick_positions(&mut self) {
        for deck in &mut self.decks {
            if deck.tick() {
                self.dirty = true;
            }
        }
    }

    /// Animation cadence: colour cycling only.
    pub fn animate(&mut self, hue_step: f32) {
        for deck in &mut self.decks {
            deck.animate(hue_step);
        }
        if self.decks.iter().any(|d| d.waveform().is_loaded()) {
            self.dirty = true;
        }
    }

    /// Hand finished waveform peaks to the deck they were computed for.
    pub fn peaks_ready(&mut self, ready: PeaksReady) {
        let Some(deck) = ready.deck.checked_sub(1).and_then(|i| self.decks.get_mut(i)) else {
            return;
        };
        if deck.peaks_ready(ready) {
            self.dirty = true;
        }
    }

    // Pointer

    /// Route a mouse event at terminal cell (`column`, `row`) to the deck
    /// whose waveform row was pressed.
    pub fn pointer(&mut self, kind: PointerKind, column: u16, row: u16) {
        let deck_idx = match kind {
            PointerKind::Down => {
                // A press whose release never arrived ends before a new one starts.
                if let Some(held) = self.pointer_deck.take() {
                    if let Some(deck) = self.decks.get_mut(held) {
                        deck.release_pointer();
                    }
                }
                let hit = self
                    .waveform_areas
                    .iter()
                    .position(|r| r.width > 0 && contains(r, column, row));
                self.pointer_deck = hit;
                hit
            }
            PointerKind::Drag => self.pointer_deck,
            PointerKind::Up => self.pointer_deck.take(),
        };
        let Some(idx) = deck_idx else {
            return;
        };
        let Some(area) = self.waveform_areas.get(idx).copied() else {
            return;
        };

        let width = f64::from(area.width);
        let x = cell_x(column.saturating_sub(area.x), area.width);
        if let Some(deck) = self.decks.get_mut(idx) {
            if deck.pointer(kind, x, width) {
                self.dirty = true;
            }
        }
        if kind == PointerKind::Down {
            self.target_deck = idx;
            self.dirty = true;
        }
    }
}

/// Spread the row's cells over `[0, width]` so the first column is the
/// start of the track and the last column is its end.
fn cell_x(offset: u16, width: u16) -> f64 {
    if width <= 1 {
        return 0.0;
    }
    let offset = offset.min(width - 1);
    f64::from(offset) * f64::from(width) / f64::from(width - 1)
}

fn contains(r: &Rect, column: u16, row: u16) -> bool {
    column >= r.x
        && column < r.x.saturating_add(r.width)
        && row >= r.y
        && row < r.y.saturating_add(r.height)
}

/// Expand a leading `~/` using `$HOME`.
fn expand_home(text: &str) -> String {
    match (text.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest).display().to_string(),
        _ => text.to_string(),
    }
}
