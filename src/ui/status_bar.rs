// Status Bar rendering module
//
// Renders the bottom status bar with keyboard shortcuts, the theme
// indicators and the current notice.

use crate::app::AppState;
use crate::theme::{accent_color, ThemePhase, MUTED};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// A key hint; lower priority numbers survive narrower terminals
struct Hint {
    priority: u8,
    key: &'static str,
    desc: &'static str,
}

const HINTS: [Hint; 6] = [
    Hint {
        priority: 1,
        key: "Q:",
        desc: "Quit | ",
    },
    Hint {
        priority: 1,
        key: "T:",
        desc: "Toggle | ",
    },
    Hint {
        priority: 2,
        key: "L:",
        desc: "Light | ",
    },
    Hint {
        priority: 2,
        key: "D:",
        desc: "Dark | ",
    },
    Hint {
        priority: 2,
        key: "S:",
        desc: "System | ",
    },
    Hint {
        priority: 3,
        key: "Space:",
        desc: "Pause ",
    },
];

pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState, marker: Option<bool>) {
    let accent = accent_color(marker);
    let indicators = build_theme_indicators(app, accent);
    let indicator_width: usize = indicators.iter().map(|s| s.content.width()).sum();

    // Borders, leading space and indicators come out of the hint budget
    let available_width =
        usize::from(area.width.saturating_sub(3)).saturating_sub(indicator_width);

    let mut spans = vec![Span::raw(" ")];
    let mut current_length = 0;

    for priority in 1..=3 {
        for hint in HINTS.iter().filter(|h| h.priority == priority) {
            let hint_length = hint.key.width() + hint.desc.width();
            if current_length + hint_length <= available_width {
                spans.push(Span::styled(
                    hint.key,
                    Style::default().fg(accent).add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::raw(hint.desc));
                current_length += hint_length;
            }
        }
    }

    spans.extend(indicators);

    if let Some(notice) = app.notice() {
        spans.push(Span::styled(
            format!(" {notice}"),
            Style::default().fg(MUTED).add_modifier(Modifier::ITALIC),
        ));
    }

    let status_bar = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(MUTED)),
        )
        .alignment(Alignment::Left);

    f.render_widget(status_bar, area);
}

/// Indicator spans: `[theme:system→dark] [os:watching] [30 particles] [paused]`
pub fn build_theme_indicators(app: &AppState, accent: Color) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let bold = Style::default().fg(accent).add_modifier(Modifier::BOLD);

    let resolved = match app.theme.phase() {
        ThemePhase::Pending => "resolving",
        ThemePhase::Ready { is_dark: true } => "dark",
        ThemePhase::Ready { is_dark: false } => "light",
    };
    spans.push(Span::raw("[theme:"));
    spans.push(Span::styled(
        format!("{}→{}", app.theme.preference(), resolved),
        bold,
    ));
    spans.push(Span::raw("]"));

    if app.theme.is_watching_system() {
        spans.push(Span::raw(" [os:"));
        spans.push(Span::styled("watching", bold));
        spans.push(Span::raw("]"));
    }

    let count = app.animator.particles().len();
    if count > 0 {
        spans.push(Span::raw(format!(" [{count} particles]")));
    }

    if app.animator.is_paused() {
        spans.push(Span::raw(" ["));
        spans.push(Span::styled("paused", bold));
        spans.push(Span::raw("]"));
    }

    spans
}
