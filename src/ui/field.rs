// Particle field rendering
//
// Draws the animator's particles onto a canvas spanning the field area.
// Terminals have no alpha, so opacity is faked by blending each particle
// color into the surface background.

use crate::app::AppState;
use crate::theme::{blend_over, surface_background, MUTED};
use ratatui::{
    layout::Rect,
    style::Style,
    symbols::Marker,
    text::Span,
    widgets::canvas::Canvas,
    Frame,
};

/// Glyph marking the smoothed pointer while it moves
const POINTER_GLYPH: &str = "+";

pub fn render_particle_field(f: &mut Frame, area: Rect, app: &AppState, marker: Option<bool>) {
    let background = surface_background(marker);
    let width = f64::from(area.width.max(1));
    let height = f64::from(area.height.max(1));

    let config = app.animator.config();
    let nominal_size = config.particle_size;
    let base_opacity = config.particle_opacity;

    // Canvas y grows upward, field y grows downward
    let dots: Vec<(f64, f64, &'static str, Style)> = app
        .animator
        .draw_order()
        .into_iter()
        .map(|p| {
            let color = match background {
                Some(bg) => blend_over(p.color, bg, p.opacity(base_opacity)),
                None => p.color,
            };
            (
                f64::from(p.x),
                height - f64::from(p.y),
                p.glyph(nominal_size),
                Style::default().fg(color),
            )
        })
        .collect();

    let pointer = app
        .animator
        .pointer()
        .filter(|p| p.is_moving())
        .map(|p| {
            let (x, y) = p.position();
            (f64::from(x), height - f64::from(y))
        });

    let mut canvas = Canvas::default()
        .marker(Marker::Dot)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(move |ctx| {
            for (x, y, glyph, style) in &dots {
                ctx.print(*x, *y, Span::styled(*glyph, *style));
            }
            if let Some((x, y)) = pointer {
                ctx.print(x, y, Span::styled(POINTER_GLYPH, Style::default().fg(MUTED)));
            }
        });
    if let Some(bg) = background {
        canvas = canvas.background_color(bg);
    }

    f.render_widget(canvas, area);
}
