mod helpers;
mod overlays;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use crate::app::App;
use crate::keybinds::KeyAction;
use crate::theme::Theme;
use crate::types::{Focus, HeaderButton};
use helpers::{button_text, layout_buttons, list_item_style};
use overlays::*;

const TITLE: &str = "Python IDE";

pub(crate) fn draw(app: &mut App, frame: &mut Frame<'_>) {
    let theme = app.active_theme().clone();
    let size = frame.area();
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(size);

    render_header(app, frame, vertical[0], &theme);

    app.clamp_pane_widths(vertical[1].width);
    let files_width = if app.files_view_open {
        app.files_pane_width
    } else {
        0
    };
    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(files_width),
            Constraint::Min(App::MIN_EDITOR_PANE_WIDTH),
            Constraint::Length(app.output_pane_width),
        ])
        .split(vertical[1]);
    app.files_rect = if app.files_view_open {
        main[0]
    } else {
        Rect::default()
    };
    app.editor_rect = main[1];

    if app.files_view_open {
        render_files(app, frame, main[0], &theme);
    }
    app.refresh_editor_title();
    frame.render_widget(&app.editor, main[1]);
    render_output(app, frame, main[2], &theme);

    let kb = &app.keybinds;
    let hints = format!(
        "{} Add   {} Save   {} Zip   {} Run   {} Help   {} Quit",
        kb.display_for(KeyAction::AddFiles),
        kb.display_for(KeyAction::DownloadFile),
        kb.display_for(KeyAction::DownloadAll),
        kb.display_for(KeyAction::Run),
        kb.display_for(KeyAction::Help),
        kb.display_for(KeyAction::Quit),
    );
    let status = Paragraph::new(Line::from(vec![
        Span::styled(app.status.clone(), Style::default().fg(theme.fg)),
        Span::styled(format!("   {hints}"), Style::default().fg(theme.fg_muted)),
    ]))
    .style(Style::default().bg(theme.bg_alt))
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border)),
    );
    frame.render_widget(status, vertical[2]);

    if app.help_open {
        render_help(app, frame);
    }
    if app.prompt.is_some() {
        render_prompt(app, frame);
    }
}

fn render_header(app: &mut App, frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.bg_alt));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let title = Paragraph::new(Span::styled(
        TITLE,
        Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(title, inner);

    let running = app.runner.is_running();
    let left = inner.x.saturating_add(TITLE.len() as u16 + 2);
    app.button_rects = layout_buttons(left, inner.right(), inner.y, running);
    for (button, rect) in &app.button_rects {
        let busy = *button == HeaderButton::Run && running;
        let style = if busy {
            Style::default().fg(theme.fg_muted).bg(theme.selection)
        } else {
            Style::default()
                .fg(theme.button_fg)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD)
        };
        frame.render_widget(Paragraph::new(button_text(*button, running)).style(style), *rect);
    }
}

fn render_files(app: &mut App, frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let visible = usize::from(area.height.saturating_sub(2)).max(1);
    if app.file_index < app.files_offset {
        app.files_offset = app.file_index;
    } else if app.file_index >= app.files_offset + visible {
        app.files_offset = app.file_index + 1 - visible;
    }

    let selected = app.selection.selected();
    let items: Vec<ListItem> = app
        .store
        .names()
        .map(|name| {
            let open = selected == Some(name);
            let marker = if open { "● " } else { "· " };
            let style = if open {
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.fg)
            };
            ListItem::new(Line::from(Span::styled(format!("{marker}{name}"), style)))
        })
        .collect();
    let border = if app.focus == Focus::Files {
        theme.accent
    } else {
        theme.border
    };
    let mut state = ListState::default()
        .with_offset(app.files_offset)
        .with_selected(Some(app.file_index));
    let list = List::new(items)
        .highlight_style(list_item_style(app.focus == Focus::Files, theme).bg(theme.selection))
        .block(
            Block::default()
                .title(format!(" Files ({}) ", app.store.len()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .style(Style::default().bg(theme.bg_alt).fg(theme.fg)),
        );
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_output(app: &App, frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let result = app.runner.result();
    let (output_area, error_area) = if result.stderr.is_empty() {
        (area, None)
    } else {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        (split[0], Some(split[1]))
    };

    let (text, style) = if result.running {
        ("Running...".to_string(), Style::default().fg(theme.fg_muted))
    } else if result.stdout.is_empty() {
        (
            "No output yet...".to_string(),
            Style::default().fg(theme.fg_muted),
        )
    } else {
        (result.stdout.clone(), Style::default().fg(theme.fg))
    };
    let output = Paragraph::new(text)
        .style(style)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" Output ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border))
                .style(Style::default().bg(theme.bg_alt)),
        );
    frame.render_widget(output, output_area);

    if let Some(error_area) = error_area {
        let error = Paragraph::new(result.stderr.clone())
            .style(Style::default().fg(theme.error))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(" Error ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.error))
                    .style(Style::default().bg(theme.error_bg)),
            );
        frame.render_widget(error, error_area);
    }
}
