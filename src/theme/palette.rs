// Palette and surface colors
//
// Color constants for the light and dark surfaces, the default particle
// palettes, and the color math used to fake opacity on a terminal (which
// has no alpha channel): a translucent color is drawn as the blend of the
// color and the surface behind it.

use ratatui::style::{Color, Style};

/// Dark surface background (#111827)
pub const DARK_BACKGROUND: Color = Color::Rgb(17, 24, 39);

/// Dark surface foreground (#e5e7eb)
pub const DARK_FOREGROUND: Color = Color::Rgb(229, 231, 235);

/// Light surface background (#ffffff)
pub const LIGHT_BACKGROUND: Color = Color::Rgb(255, 255, 255);

/// Light surface foreground (#111827)
pub const LIGHT_FOREGROUND: Color = Color::Rgb(17, 24, 39);

/// Muted text on either surface (#6b7280)
pub const MUTED: Color = Color::Rgb(107, 114, 128);

/// Accent on the dark surface (#60a5fa)
pub const DARK_ACCENT: Color = Color::Rgb(96, 165, 250);

/// Accent on the light surface (#1e40af)
pub const LIGHT_ACCENT: Color = Color::Rgb(30, 64, 175);

/// Particle colors used on the dark surface
pub const DARK_PALETTE: [&str; 5] = ["#3b82f6", "#6366f1", "#8b5cf6", "#d946ef", "#ec4899"];

/// Particle colors used on the light surface
pub const LIGHT_PALETTE: [&str; 5] = ["#1e40af", "#3b82f6", "#60a5fa", "#93c5fd", "#3730a3"];

/// Parse a `#rrggbb` (or bare `rrggbb`) hex string
pub fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Parse a list of hex strings, skipping entries that are not colors
pub fn parse_palette<S: AsRef<str>>(values: &[S]) -> Vec<Color> {
    values
        .iter()
        .filter_map(|value| {
            let parsed = parse_hex_color(value.as_ref());
            if parsed.is_none() {
                tracing::warn!(value = value.as_ref(), "Ignoring invalid palette color");
            }
            parsed
        })
        .collect()
}

/// Interpolate between two RGB colors based on a ratio (0.0 ~ 1.0)
///
/// # Arguments
/// * `color1` - Starting color as (r, g, b) tuple
/// * `color2` - Ending color as (r, g, b) tuple
/// * `ratio` - Interpolation ratio (0.0 = color1, 1.0 = color2)
pub fn interpolate_color(color1: (u8, u8, u8), color2: (u8, u8, u8), ratio: f32) -> Color {
    let ratio = ratio.clamp(0.0, 1.0);
    let r = (color1.0 as f32 + (color2.0 as f32 - color1.0 as f32) * ratio) as u8;
    let g = (color1.1 as f32 + (color2.1 as f32 - color1.1 as f32) * ratio) as u8;
    let b = (color1.2 as f32 + (color2.2 as f32 - color1.2 as f32) * ratio) as u8;
    Color::Rgb(r, g, b)
}

/// Draw `color` at `opacity` over `background`
///
/// Non-RGB colors cannot be blended and are returned unchanged.
pub fn blend_over(color: Color, background: Color, opacity: f32) -> Color {
    match (color, background) {
        (Color::Rgb(r, g, b), Color::Rgb(br, bg, bb)) => {
            interpolate_color((br, bg, bb), (r, g, b), opacity)
        }
        _ => color,
    }
}

/// Base style of the whole frame for a root marker
///
/// `None` is the neutral presentation used before the theme resolves: the
/// terminal's own colors, so nothing flashes if the guess would be wrong.
pub fn surface_style(marker: Option<bool>) -> Style {
    match marker {
        Some(true) => Style::default().fg(DARK_FOREGROUND).bg(DARK_BACKGROUND),
        Some(false) => Style::default().fg(LIGHT_FOREGROUND).bg(LIGHT_BACKGROUND),
        None => Style::default(),
    }
}

/// Accent for headings and key hints; the terminal's cyan while neutral
pub fn accent_color(marker: Option<bool>) -> Color {
    match marker {
        Some(true) => DARK_ACCENT,
        Some(false) => LIGHT_ACCENT,
        None => Color::Cyan,
    }
}

/// Background color behind particles for a root marker
pub fn surface_background(marker: Option<bool>) -> Option<Color> {
    match marker {
        Some(true) => Some(DARK_BACKGROUND),
        Some(false) => Some(LIGHT_BACKGROUND),
        None => None,
    }
}
