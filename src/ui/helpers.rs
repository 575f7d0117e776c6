use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders};
use unicode_width::UnicodeWidthStr;

use crate::theme::Theme;
use crate::types::HeaderButton;
use crate::util::to_u16_saturating;

const BUTTON_GAP: u16 = 1;

pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub(crate) fn help_keybind_line<'a>(
    entries: &[(&str, &str)],
    key_style: Style,
    desc_style: Style,
    sep_style: Style,
) -> Line<'a> {
    let mut spans = Vec::new();
    for (i, (key, desc)) in entries.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  |  ", sep_style));
        }
        spans.push(Span::styled(key.to_string(), key_style));
        spans.push(Span::styled(format!(" {desc}"), desc_style));
    }
    Line::from(spans)
}

pub(crate) fn list_item_style(selected: bool, theme: &Theme) -> Style {
    if selected {
        Style::default()
            .fg(theme.bg)
            .bg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.fg)
    }
}

pub(crate) fn themed_block(theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(theme.bg_alt))
        .border_style(Style::default().fg(theme.accent))
}

pub(crate) fn button_text(button: HeaderButton, running: bool) -> String {
    format!(" {} ", button.label(running))
}

/// Lays the header buttons out right-aligned on row `y`, ending at `right`.
/// Buttons that do not fit are dropped from the left.
pub(crate) fn layout_buttons(
    left: u16,
    right: u16,
    y: u16,
    running: bool,
) -> Vec<(HeaderButton, Rect)> {
    let mut rects = Vec::new();
    let mut x = right;
    for button in HeaderButton::all().into_iter().rev() {
        let width = to_u16_saturating(button_text(button, running).width());
        let Some(start) = x.checked_sub(width) else {
            break;
        };
        if start < left {
            break;
        }
        rects.push((button, Rect::new(start, y, width, 1)));
        x = start.saturating_sub(BUTTON_GAP);
    }
    rects.reverse();
    rects
}
