use super::App;
use std::io;

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders};
use ratatui_textarea::{Input, TextArea};

use crate::keybinds::KeyScope;
use crate::theme::Theme;
use crate::types::Focus;
use crate::util::{line_ending, text_to_lines};

const TAB_WIDTH: u8 = 4;

impl App {
    pub(crate) fn build_editor(text: &str, theme: &Theme) -> TextArea<'static> {
        let mut ta = TextArea::from(text_to_lines(text));
        ta.set_tab_length(TAB_WIDTH);
        Self::style_editor(&mut ta, theme);
        ta
    }

    fn style_editor(ta: &mut TextArea<'static>, theme: &Theme) {
        ta.set_style(Style::default().fg(theme.fg).bg(theme.bg));
        ta.set_cursor_line_style(Style::default().bg(theme.bg_alt));
        ta.set_selection_style(Style::default().bg(theme.selection));
        ta.set_line_number_style(Style::default().fg(theme.fg_muted).bg(theme.bg));
        ta.set_cursor_style(Style::default().add_modifier(Modifier::REVERSED));
    }

    pub(crate) fn apply_editor_theme(&mut self) {
        let theme = self.active_theme().clone();
        Self::style_editor(&mut self.editor, &theme);
        self.refresh_editor_title();
    }

    pub(crate) fn refresh_editor_title(&mut self) {
        let theme = self.active_theme().clone();
        let title = self.selection.selected().unwrap_or("no file").to_string();
        let border = if self.focus == Focus::Editor {
            theme.accent
        } else {
            theme.border
        };
        self.editor.set_block(
            Block::default()
                .title(format!(" {title} "))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .style(Style::default().bg(theme.bg)),
        );
    }

    /// Replaces the editor widget with the selection's buffer.
    pub(crate) fn reload_editor(&mut self) {
        let theme = self.active_theme().clone();
        self.editor = Self::build_editor(self.selection.buffer(), &theme);
        self.line_ending = line_ending(self.selection.buffer());
        self.refresh_editor_title();
    }

    /// Flushes the widget text through the selection into the store.
    pub(crate) fn on_editor_content_changed(&mut self) {
        let text = self.editor.lines().join(self.line_ending);
        self.selection.edit(&mut self.store, text);
    }

    pub(crate) fn handle_editor_key(&mut self, key: KeyEvent) -> io::Result<()> {
        if key.modifiers == KeyModifiers::NONE && key.code == KeyCode::Esc {
            self.focus = Focus::Files;
            self.files_view_open = true;
            return Ok(());
        }
        if let Some(action) = self.keybinds.lookup(&key, KeyScope::Editor) {
            return self.run_key_action(action);
        }
        if self.editor.input(Input::from(key)) {
            self.on_editor_content_changed();
        }
        Ok(())
    }
}
