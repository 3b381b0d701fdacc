// UI rendering module
//
// This module contains all UI rendering components for folio.
// The main draw() function paints the themed surface, then the banner,
// the particle field and the status bar on top of it.

mod banner;
mod field;
mod status_bar;

use crate::app::AppState;
use crate::theme::surface_style;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    widgets::Block,
    Frame,
};

use banner::render_banner;
use field::render_particle_field;
use status_bar::render_status_bar;

/// Main UI drawing function
///
/// Everything styles off the visual root marker, which stays `None` until
/// the theme resolves: the frame is then drawn in the terminal's own
/// colors instead of guessing light or dark.
pub fn draw(f: &mut Frame, app: &mut AppState) {
    let size = f.area();
    let marker = app.theme.root().marker();

    f.render_widget(Block::default().style(surface_style(marker)), size);

    // Main layout: banner, particle field, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Banner
            Constraint::Min(0),    // Particle field
            Constraint::Length(2), // Status bar
        ])
        .split(size);

    render_banner(f, chunks[0], app, marker);
    render_particle_field(f, chunks[1], app, marker);
    render_status_bar(f, chunks[2], app, marker);

    app.field_area = chunks[1];
}
