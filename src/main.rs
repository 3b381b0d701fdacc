// folio - terminal portfolio showcase
// Persistent light/dark theming and a particle field that chases the mouse

mod app;
mod cli;
mod error;
mod logging;
mod particles;
mod theme;
mod ui;

use std::io;
use std::time::Instant;

use anyhow::{Context, Result};
use app::{config::load_config, event::handle_event, AppState};
use clap::Parser;
use cli::Cli;
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use particles::CursorAnimator;
use ratatui::{backend::CrosstermBackend, Terminal};
use theme::{
    BackgroundColorScheme, ColorSchemeSource, FileStore, MemoryStore, PreferenceStore,
    SystemColorScheme, ThemeManager, SYSTEM_POLL_INTERVAL,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;

    let config = load_config(cli.config.as_deref())?;
    let mut particle_config = config.particles.to_particle_config();
    cli.apply_overrides(&mut particle_config);

    // Resolve the theme before the terminal shows anything, so the first
    // frame is already drawn in the right scheme
    let source: Box<dyn ColorSchemeSource> =
        match BackgroundColorScheme::spawn(SystemColorScheme, SYSTEM_POLL_INTERVAL) {
            Ok(source) => Box::new(source),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to start color scheme thread, querying inline");
                Box::new(SystemColorScheme)
            }
        };
    let mut theme = ThemeManager::new(open_store(cli.ephemeral), source);
    theme.initialize();
    if let Some(preference) = cli.theme {
        theme.set_preference(preference);
    }

    let mut app = AppState::new(theme, CursorAnimator::new(particle_config), config.profile);

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let res = run_app(&mut terminal, &mut app);
    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "App exited with error");
        eprintln!("Error: {:?}", err);
    }
    Ok(())
}

/// Pick the preference store for this session
///
/// Falls back to memory when the config directory is unknown, so the
/// session still works, it just forgets the choice on exit.
fn open_store(ephemeral: bool) -> Box<dyn PreferenceStore> {
    if ephemeral {
        return Box::new(MemoryStore::new());
    }
    match FileStore::in_config_dir() {
        Ok(store) => {
            tracing::debug!(path = %store.path().display(), "Using preference file");
            Box::new(store)
        }
        Err(e) => {
            tracing::warn!(error = %e, "No preference file available, preferences won't persist");
            Box::new(MemoryStore::new())
        }
    }
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        app.on_tick(Instant::now());
        terminal.draw(|f| ui::draw(f, app))?;
        app.sync_viewport(Instant::now());

        if !app.running {
            return Ok(());
        }

        if event::poll(app.next_wakeup(Instant::now()))? {
            handle_event(app, event::read()?, Instant::now());
        }
    }
}
