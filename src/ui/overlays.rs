use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph, Wrap};

use crate::app::App;
use crate::keybinds::KeyAction;
use crate::util::to_u16_saturating;

use super::helpers::{centered_rect, help_keybind_line, themed_block};

pub(crate) fn render_help(app: &mut App, frame: &mut Frame<'_>) {
    let theme = app.active_theme();
    let area = centered_rect(70, 70, frame.area());
    frame.render_widget(Clear, area);

    let kb = &app.keybinds;
    let heading = Style::default()
        .fg(theme.accent)
        .add_modifier(Modifier::BOLD);
    let key_s = Style::default().fg(theme.accent);
    let desc_s = Style::default().fg(theme.fg);
    let sep_s = Style::default().fg(theme.fg_muted);
    let muted = Style::default().fg(theme.fg_muted);

    let bound: Vec<(String, &str)> = KeyAction::all()
        .iter()
        .map(|a| (kb.display_for(*a), a.label()))
        .collect();
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled("Keyboard", heading)),
        Line::from(""),
    ];
    for pair in bound.chunks(3) {
        let entries: Vec<(&str, &str)> = pair.iter().map(|(k, d)| (k.as_str(), *d)).collect();
        lines.push(help_keybind_line(&entries, key_s, desc_s, sep_s));
    }
    lines.extend([
        Line::from(""),
        Line::from(Span::styled("Files pane", heading)),
        help_keybind_line(
            &[
                ("Up/Down", "move"),
                ("Enter", "open"),
                ("Tab", "to editor"),
            ],
            key_s,
            desc_s,
            sep_s,
        ),
        Line::from(""),
        Line::from(Span::styled("Editor", heading)),
        help_keybind_line(&[("Esc", "to files pane")], key_s, desc_s, sep_s),
        Line::from(""),
        Line::from(Span::styled("Mouse", heading)),
        Line::from(Span::styled(
            "Click a header button, a file name, or the editor.",
            desc_s,
        )),
        Line::from(""),
        Line::from(Span::styled("Esc or Enter to close", muted)),
    ]);

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(theme.fg).bg(theme.bg_alt))
        .block(themed_block(theme).title(" Help "));
    frame.render_widget(body, area);
}

pub(crate) fn render_prompt(app: &mut App, frame: &mut Frame<'_>) {
    let Some(prompt) = app.prompt.as_ref() else {
        return;
    };
    let title = prompt.title.clone();
    let value = prompt.value.clone();
    let cursor_pos = prompt.cursor;
    let theme = app.active_theme().clone();
    let area = centered_rect(70, 20, frame.area());
    app.prompt_rect = area;
    frame.render_widget(Clear, area);
    let input = Paragraph::new(value).block(
        themed_block(&theme)
            .title(title.as_str())
            .style(Style::default().bg(theme.bg_alt).fg(theme.fg)),
    );
    frame.render_widget(input, area);
    let cursor_x = area
        .x
        .saturating_add(1)
        .saturating_add(to_u16_saturating(cursor_pos));
    if cursor_x < area.right() {
        frame.set_cursor_position((cursor_x, area.y + 1));
    }
}
