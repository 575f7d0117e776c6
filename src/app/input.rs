use super::App;
use std::io;

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::keybinds::KeyScope;
use crate::types::Focus;
use crate::util::inside;

impl App {
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> io::Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        if self.prompt.is_some() {
            return self.handle_prompt_key(key);
        }
        if self.help_open {
            return self.handle_help_key(key);
        }

        if let Some(action) = self.keybinds.lookup(&key, KeyScope::Global) {
            return self.run_key_action(action);
        }

        if key.modifiers == KeyModifiers::NONE
            && key.code == KeyCode::Tab
            && self.focus == Focus::Files
        {
            self.focus = Focus::Editor;
            return Ok(());
        }

        match self.focus {
            Focus::Files => self.handle_files_key(key),
            Focus::Editor => self.handle_editor_key(key),
        }
    }

    pub(crate) fn handle_prompt_key(&mut self, key: KeyEvent) -> io::Result<()> {
        let Some(prompt) = self.prompt.as_mut() else {
            return Ok(());
        };
        match key.code {
            KeyCode::Esc => {
                self.prompt = None;
                self.set_status("Canceled");
            }
            KeyCode::Enter => {
                let value = prompt.value.trim().to_string();
                let mode = prompt.mode;
                if value.is_empty() {
                    self.set_status("Enter at least one path");
                    return Ok(());
                }
                self.prompt = None;
                self.apply_prompt(mode, value);
            }
            KeyCode::Backspace => prompt.backspace(),
            KeyCode::Delete => prompt.delete(),
            KeyCode::Left => prompt.cursor = prompt.cursor.saturating_sub(1),
            KeyCode::Right => prompt.cursor = (prompt.cursor + 1).min(prompt.char_len()),
            KeyCode::Home => prompt.cursor = 0,
            KeyCode::End => prompt.cursor = prompt.char_len(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                prompt.insert(c);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_help_key(&mut self, key: KeyEvent) -> io::Result<()> {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            self.help_open = false;
        }
        Ok(())
    }

    pub(crate) fn handle_files_key(&mut self, key: KeyEvent) -> io::Result<()> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_file_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_file_cursor(1),
            KeyCode::Home => self.file_index = 0,
            KeyCode::End => self.file_index = self.store.len().saturating_sub(1),
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
                self.select_file_at(self.file_index);
            }
            _ => {}
        }
        Ok(())
    }

    pub(crate) fn handle_mouse(&mut self, mouse: MouseEvent) -> io::Result<()> {
        let MouseEventKind::Down(MouseButton::Left) = mouse.kind else {
            return Ok(());
        };
        if self.help_open {
            self.help_open = false;
            return Ok(());
        }
        if self.prompt.is_some() {
            if inside(mouse.column, mouse.row, self.prompt_rect) {
                let inner_x = mouse.column.saturating_sub(self.prompt_rect.x + 1) as usize;
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.cursor = inner_x.min(prompt.char_len());
                }
            } else {
                self.prompt = None;
            }
            return Ok(());
        }
        if let Some(button) = self
            .button_rects
            .iter()
            .find(|(_, rect)| inside(mouse.column, mouse.row, *rect))
            .map(|(button, _)| *button)
        {
            return self.press_button(button);
        }
        if self.files_view_open && inside(mouse.column, mouse.row, self.files_rect) {
            let first_row = self.files_rect.y.saturating_add(1);
            if mouse.row >= first_row {
                let index = self.files_offset + usize::from(mouse.row - first_row);
                if index < self.store.len() {
                    self.select_file_at(index);
                }
            }
            return Ok(());
        }
        if inside(mouse.column, mouse.row, self.editor_rect) {
            self.focus = Focus::Editor;
        }
        Ok(())
    }
}
