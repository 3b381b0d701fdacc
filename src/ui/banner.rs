// Banner rendering module
//
// Renders the top banner: name, title and tagline on the themed surface.

use crate::app::AppState;
use crate::theme::{accent_color, MUTED};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Suffix appended to text cut short to fit the banner
const ELLIPSIS: &str = "…";

pub fn render_banner(f: &mut Frame, area: Rect, app: &AppState, marker: Option<bool>) {
    let accent = accent_color(marker);
    let max_width = usize::from(area.width.saturating_sub(2));
    let profile = &app.profile;

    let banner_text = vec![
        Line::from(Span::styled(
            truncate_to_width(&profile.name, max_width),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::raw(truncate_to_width(&profile.title, max_width))),
        Line::from(Span::styled(
            truncate_to_width(&profile.tagline, max_width),
            Style::default().fg(MUTED).add_modifier(Modifier::ITALIC),
        )),
    ];

    let banner = Paragraph::new(banner_text)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(MUTED)),
        )
        .alignment(Alignment::Center);

    f.render_widget(banner, area);
}

/// Cut `text` to at most `max_width` display columns, ending in an ellipsis
/// when anything was dropped
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let budget = max_width.saturating_sub(ELLIPSIS.width());
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    if max_width >= ELLIPSIS.width() {
        out.push_str(ELLIPSIS);
    }
    out
}
