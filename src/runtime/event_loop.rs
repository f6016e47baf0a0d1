use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::{App, InputMode};
use crate::audio::AudioEngine;
use crate::config;
use crate::library::Selection;
use crate::library::import::{self, ImportBatch};
use crate::runtime::cadence::Cadence;
use crate::ui;
use crate::waveform::{PeaksReady, PointerKind};

/// Channel ends the loop drains or feeds.
pub struct Channels<'a> {
    pub selections: &'a Receiver<Selection>,
    pub imports: &'a Receiver<ImportBatch>,
    pub peaks: &'a Receiver<PeaksReady>,
    pub import_tx: &'a Sender<ImportBatch>,
}

/// Main terminal event loop: drains library and waveform messages, runs the position and
/// animation cadences, handles input and redraws when something changed.
/// Returns `Ok(())` when the user quits.
pub fn run<E: AudioEngine>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<E>,
    channels: Channels<'_>,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let mut position = Cadence::from_hz(settings.sync.tick_hz, start);
    let mut animation = Cadence::every(Duration::from_millis(settings.ui.animation_ms), start);
    let mut pending_gg = false;

    loop {
        while let Ok(selection) = channels.selections.try_recv() {
            app.load_selection(selection);
        }
        while let Ok(batch) = channels.imports.try_recv() {
            app.add_paths(&batch.paths);
        }
        while let Ok(ready) = channels.peaks.try_recv() {
            app.peaks_ready(ready);
        }

        let now = Instant::now();
        if position.fire(now) {
            app.tick_positions();
        }
        if animation.fire(now) {
            app.animate(settings.ui.hue_step);
        }

        if app.dirty {
            terminal.draw(|f| ui::draw(f, app, &settings.ui))?;
            app.dirty = false;
        }

        let now = Instant::now();
        let timeout = position.until_next(now).min(animation.until_next(now));
        if !event::poll(timeout)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if handle_key_event(key, settings, app, channels.import_tx, &mut pending_gg) {
                    break;
                }
            }
            Event::Mouse(mouse) => handle_mouse_event(mouse, app),
            Event::Paste(text) => handle_paste(&text, app),
            Event::Resize(..) => app.dirty = true,
            _ => {}
        }
    }

    Ok(())
}

fn handle_mouse_event<E: AudioEngine>(mouse: MouseEvent, app: &mut App<E>) {
    let kind = match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => PointerKind::Down,
        MouseEventKind::Drag(MouseButton::Left) => PointerKind::Drag,
        MouseEventKind::Up(MouseButton::Left) => PointerKind::Up,
        MouseEventKind::ScrollDown => return app.next(),
        MouseEventKind::ScrollUp => return app.prev(),
        _ => return,
    };
    app.pointer(kind, mouse.column, mouse.row);
}

fn handle_paste<E: AudioEngine>(text: &str, app: &mut App<E>) {
    match app.mode {
        InputMode::Normal => app.files_dropped(&dropped_paths(text)),
        InputMode::Search => text
            .chars()
            .filter(|c| !c.is_control())
            .for_each(|c| app.push_search_char(c)),
        InputMode::AddPath => text
            .chars()
            .filter(|c| !c.is_control())
            .for_each(|c| app.push_prompt_char(c)),
    }
}

/// Terminals paste dropped files as their paths, one per line, sometimes quoted.
fn dropped_paths(text: &str) -> Vec<PathBuf> {
    text.lines()
        .map(|l| l.trim().trim_matches(|c| c == '\'' || c == '"'))
        .filter(|l| !l.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Returns `true` when the user asked to quit.
fn handle_key_event<E: AudioEngine>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App<E>,
    import_tx: &Sender<ImportBatch>,
    pending_gg: &mut bool,
) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match app.mode {
        InputMode::Search => {
            match key.code {
                KeyCode::Esc => app.clear_search(),
                KeyCode::Enter => app.commit_search(),
                KeyCode::Backspace => app.pop_search_char(),
                KeyCode::Down => app.next(),
                KeyCode::Up => app.prev(),
                KeyCode::Char(c) if !c.is_control() => app.push_search_char(c),
                _ => {}
            }
            return false;
        }
        InputMode::AddPath => {
            match key.code {
                KeyCode::Esc => app.cancel_prompt(),
                KeyCode::Backspace => app.pop_prompt_char(),
                KeyCode::Enter => {
                    if let Some(path) = app.take_prompt() {
                        info!(path = %path.display(), "import requested");
                        app.set_status(format!("importing {}...", path.display()));
                        import::spawn_import(
                            vec![path],
                            settings.library.clone(),
                            import_tx.clone(),
                        );
                    }
                }
                KeyCode::Char(c) if !c.is_control() => app.push_prompt_char(c),
                _ => {}
            }
            return false;
        }
        InputMode::Normal => {}
    }

    if key.code != KeyCode::Char('g') {
        *pending_gg = false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Char('g') => {
            if *pending_gg {
                *pending_gg = false;
                app.select_first();
            } else {
                *pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.select_last(),
        KeyCode::Enter => app.activate_selected(app.target_deck),
        KeyCode::Char(c @ '1'..='4') => {
            let deck = c as usize - '1' as usize;
            if deck < app.decks.len() {
                app.activate_selected(deck);
            }
        }
        KeyCode::Tab => app.cycle_target_deck(),
        KeyCode::Char(' ') => app.toggle_playback(),
        KeyCode::Char('p') => app.play(),
        KeyCode::Char('s') => app.stop(),
        KeyCode::Char('-') => app.adjust_gain(-1.0),
        KeyCode::Char('=') | KeyCode::Char('+') => app.adjust_gain(1.0),
        KeyCode::Char('[') => app.adjust_speed(-1.0),
        KeyCode::Char(']') => app.adjust_speed(1.0),
        KeyCode::Char('/') => app.enter_search_mode(),
        KeyCode::Char('a') => app.enter_add_mode(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
        KeyCode::Esc if !app.library.term().is_empty() => app.clear_search(),
        _ => {}
    }

    false
}
