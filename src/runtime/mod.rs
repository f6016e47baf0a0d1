use std::sync::mpsc;

use clap::Parser;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::audio::{RodioEngine, open_output};
use crate::deck::Deck;
use crate::library::import::{self, ImportBatch};
use crate::library::{LibraryStore, Selection, TrackLibrary};
use crate::waveform::{PeaksReady, WaveformView};

mod cadence;
mod cli;
mod event_loop;
mod logging;
mod settings;

use cli::Cli;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    if cli.print_config {
        let (settings, problem) = settings::load_settings();
        if let Some(p) = problem {
            eprintln!("duodeck: {p}");
        }
        print!("{}", toml::to_string_pretty(&settings)?);
        return Ok(());
    }
    let paths = cli.paths;

    let (settings, problem) = settings::load_settings();
    match logging::init(&settings) {
        Ok(path) => info!(log = %path.display(), "duodeck starting"),
        // Logging is optional; the player works without it.
        Err(e) => eprintln!("duodeck: logging disabled: {e}"),
    }
    if let Some(p) = problem {
        warn!("{p}");
    }

    let library_file = settings
        .library_file()
        .ok_or("no location for the library file (set library.file or HOME)")?;
    let mut library = TrackLibrary::new(LibraryStore::new(library_file));
    let (selection_tx, selection_rx) = mpsc::channel::<Selection>();
    library.connect(selection_tx);
    let loaded = library.load();
    if let Some(e) = &loaded.persist_error {
        warn!(error = %e, "library could not be rewritten after load");
    }

    let stream = open_output()?;
    let (peaks_tx, peaks_rx) = mpsc::channel::<PeaksReady>();
    let decks: Vec<Deck<RodioEngine>> = (1..=settings.decks.count)
        .map(|i| {
            let engine = RodioEngine::new(
                stream.clone(),
                settings.decks.initial_gain,
                settings.decks.initial_speed,
            );
            let mut deck = Deck::new(
                i,
                engine,
                WaveformView::new(settings.ui.waveform_resolution),
                settings.decks.initial_gain,
                settings.decks.initial_speed,
            );
            deck.connect_peaks(peaks_tx.clone());
            deck
        })
        .collect();

    let mut app = App::new(library, decks, &settings.decks);
    if loaded.changed > 0 {
        app.set_status(format!("dropped {} stale library entries", loaded.changed));
    }

    let (import_tx, import_rx) = mpsc::channel::<ImportBatch>();
    if !paths.is_empty() {
        import::spawn_import(paths, settings.library.clone(), import_tx.clone());
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let channels = event_loop::Channels {
        selections: &selection_rx,
        imports: &import_rx,
        peaks: &peaks_rx,
        import_tx: &import_tx,
    };
    let run_result = event_loop::run(&mut terminal, &settings, &mut app, channels);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    info!("duodeck exiting");
    run_result
}
