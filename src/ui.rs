//! UI rendering for the terminal user interface.
//!
//! Draws the header, one panel per deck with its waveform, the library list
//! and the status/controls footer using `ratatui`. The waveform rectangles
//! are recorded on the `App` so mouse input can be mapped back to a deck.

use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, InputMode};
use crate::audio::AudioEngine;
use crate::config::UiSettings;
use crate::deck::Deck;
use crate::waveform::peaks::resample;

const WAVEFORM_ROWS: u16 = 3;
const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("enter", "load on target deck"),
    ("1-4", "load on deck"),
    ("tab", "target deck"),
    ("space", "play/pause"),
    ("p", "play"),
    ("s", "stop"),
    ("-/=", "gain"),
    ("[/]", "speed"),
    ("/", "search"),
    ("a", "add path"),
    ("d", "remove"),
    ("q", "quit"),
];

fn controls_text() -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Fully saturated colour for `hue` in `[0, 1)`.
fn hue_color(hue: f32) -> Color {
    let h = hue.rem_euclid(1.0) * 6.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u8 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    let to_u8 = |v: f32| (v * 255.0).round() as u8;
    Color::Rgb(to_u8(r), to_u8(g), to_u8(b))
}

/// Glyph for row `row` (0 = top) of a bar `rows` tall filled to `peak`.
fn bar_glyph(peak: f32, row: u16, rows: u16) -> char {
    let level = peak.clamp(0.0, 1.0) * f32::from(rows);
    let below = f32::from(rows - 1 - row);
    let fill = level - below;
    if fill >= 1.0 {
        '█'
    } else if fill <= 0.0 {
        ' '
    } else {
        BARS[((fill * 8.0) as usize).min(7)]
    }
}

/// Column holding the playhead for `position` across `width` columns.
fn playhead_column(position: f64, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    let col = (position.clamp(0.0, 1.0) * f64::from(width)) as u16;
    col.min(width - 1)
}

/// Render the entire UI into `frame`, recording waveform areas on `app`.
pub fn draw<E: AudioEngine>(frame: &mut Frame, app: &mut App<E>, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(WAVEFORM_ROWS + 3),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" duodeck ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let deck_count = app.decks.len().max(1) as u32;
    let deck_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..deck_count).map(|_| Constraint::Ratio(1, deck_count)))
        .split(chunks[1]);
    let target = app.target_deck;
    let mut waveform_areas = Vec::with_capacity(app.decks.len());
    for (i, deck) in app.decks.iter().enumerate() {
        waveform_areas.push(draw_deck(frame, deck, deck_areas[i], i == target));
    }
    app.waveform_areas = waveform_areas;

    draw_library(frame, app, chunks[2]);

    let status_line = match app.mode {
        InputMode::AddPath => format!("add path: {}_", app.prompt),
        _ => app.status.clone().unwrap_or_default(),
    };
    let status = Paragraph::new(status_line)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[3]);

    let footer = Paragraph::new(controls_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}

/// Draw one deck panel; returns the waveform rectangle.
fn draw_deck<E: AudioEngine>(frame: &mut Frame, deck: &Deck<E>, area: Rect, targeted: bool) -> Rect {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", deck.label()));
    if targeted {
        block = block.border_style(Style::default().fg(Color::Yellow));
    }
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return Rect::default();
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let state = if deck.is_loading() {
        "Loading"
    } else if deck.is_playing() {
        "Playing"
    } else {
        "Paused"
    };
    let mut info = format!(
        "{state} • gain {:.2} • speed {:.2}x",
        deck.gain(),
        deck.speed()
    );
    if let Some((elapsed, total)) = deck.times() {
        info.push_str(&format!(" • {} / {}", format_mmss(elapsed), format_mmss(total)));
    }
    frame.render_widget(Paragraph::new(info), rows[0]);

    let wave_area = rows[1];
    let view = deck.waveform();
    if !view.is_loaded() {
        let text = if view.is_pending() {
            "Loading waveform..."
        } else {
            "File not loaded..."
        };
        let msg = Paragraph::new(text)
            .alignment(Alignment::Center)
            .dark_gray();
        frame.render_widget(msg, wave_area);
        return wave_area;
    }

    let columns = resample(view.peaks(), usize::from(wave_area.width));
    let head = playhead_column(view.position(), wave_area.width);
    let played = hue_color(view.hue());
    let lines: Vec<Line> = (0..wave_area.height)
        .map(|row| {
            let spans: Vec<Span> = columns
                .iter()
                .enumerate()
                .map(|(c, &peak)| {
                    let c = c as u16;
                    let style = if c == head {
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                    } else if c < head {
                        Style::default().fg(played)
                    } else {
                        Style::default().fg(Color::DarkGray)
                    };
                    let glyph = if c == head {
                        '┃'
                    } else {
                        bar_glyph(peak, row, wave_area.height)
                    };
                    Span::styled(glyph.to_string(), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), wave_area);
    wave_area
}

fn draw_library<E: AudioEngine>(frame: &mut Frame, app: &App<E>, area: Rect) {
    let term = app.library.term();
    let mut title = format!(
        " library ({}/{}) ",
        app.library.visible().len(),
        app.library.known().len()
    );
    if app.mode == InputMode::Search || !term.is_empty() {
        let cursor = if app.mode == InputMode::Search { "_" } else { "" };
        title = format!(" library • search: {}{cursor} ", app.search_query);
    }

    let visible = app.library.visible();
    // Only build ListItems for the window on screen, centred on the cursor.
    let total = visible.len();
    let height = area.height.saturating_sub(2) as usize;
    let sel = app.selected.min(total.saturating_sub(1));
    let (start, end) = if total <= height || height == 0 {
        (0, total)
    } else {
        let mut start = sel.saturating_sub(height / 2);
        if start + height > total {
            start = total - height;
        }
        (start, start + height)
    };

    let items: Vec<ListItem> = visible[start..end]
        .iter()
        .map(|t| ListItem::new(t.name()))
        .collect();
    let empty = total == 0;
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !empty {
        state.select(Some(sel - start));
    }
    frame.render_stateful_widget(list, area, &mut state);
}
