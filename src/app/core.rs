use super::{App, AppOptions};

use crate::config::save_settings;
use crate::keybinds::load_keybindings;
use crate::runner::Runner;
use crate::selection::Selection;
use crate::store::{DEFAULT_FILE_NAME, FileStore};
use crate::theme::{Theme, load_themes};
use crate::types::Focus;
use crate::util::line_ending;

const DEFAULT_THEME: &str = "Midnight";

impl App {
    pub(crate) const MIN_FILES_PANE_WIDTH: u16 = 14;
    pub(crate) const MIN_OUTPUT_PANE_WIDTH: u16 = 20;
    pub(crate) const MIN_EDITOR_PANE_WIDTH: u16 = 28;

    pub(crate) fn new(options: AppOptions) -> Self {
        let AppOptions {
            settings,
            download_dir,
            interpreter,
        } = options;
        let store = FileStore::new();
        let selection = Selection::new(DEFAULT_FILE_NAME, &store);
        let themes = load_themes();
        let wanted = settings.theme_name.as_deref().unwrap_or(DEFAULT_THEME);
        let active_theme_index = themes
            .iter()
            .position(|t| t.name.eq_ignore_ascii_case(wanted))
            .unwrap_or(0);
        let mut app = Self {
            editor: Self::build_editor(selection.buffer(), &themes[active_theme_index]),
            line_ending: line_ending(selection.buffer()),
            store,
            selection,
            runner: Runner::new(interpreter),
            uploads: Vec::new(),
            export_job: None,
            download_dir,
            focus: Focus::Editor,
            file_index: 0,
            files_offset: 0,
            status: String::new(),
            quit: false,
            files_view_open: true,
            files_pane_width: settings
                .files_pane_width
                .unwrap_or(24)
                .max(Self::MIN_FILES_PANE_WIDTH),
            output_pane_width: settings
                .output_pane_width
                .unwrap_or(36)
                .max(Self::MIN_OUTPUT_PANE_WIDTH),
            help_open: false,
            prompt: None,
            themes,
            active_theme_index,
            keybinds: load_keybindings(),
            settings,
            files_rect: Default::default(),
            editor_rect: Default::default(),
            prompt_rect: Default::default(),
            button_rects: Vec::new(),
        };
        app.refresh_editor_title();
        app.status = format!("Downloads go to {}", app.download_dir.display());
        app
    }

    pub(crate) fn active_theme(&self) -> &Theme {
        &self.themes[self.active_theme_index]
    }

    pub(crate) fn set_status<S: Into<String>>(&mut self, status: S) {
        self.status = status.into();
    }

    /// Makes `name` the active file and loads its text into the editor.
    pub(crate) fn select_file(&mut self, name: &str) {
        self.selection.select(&self.store, name);
        if let Some(idx) = self.store.position(name) {
            self.file_index = idx;
        }
        self.reload_editor();
        tracing::debug!(file = name, "selected");
    }

    pub(crate) fn select_file_at(&mut self, index: usize) {
        let Some(name) = self.store.entries().get(index).map(|e| e.name.clone()) else {
            return;
        };
        self.focus = Focus::Editor;
        self.select_file(&name);
    }

    pub(crate) fn move_file_cursor(&mut self, delta: isize) {
        let len = self.store.len();
        if len == 0 {
            return;
        }
        self.file_index = self.file_index.saturating_add_signed(delta).min(len - 1);
    }

    pub(crate) fn cycle_theme(&mut self) {
        if self.themes.is_empty() {
            return;
        }
        self.active_theme_index = (self.active_theme_index + 1) % self.themes.len();
        self.apply_editor_theme();
        let name = self.active_theme().name.clone();
        self.set_status(format!("Theme: {name}"));
        self.persist_settings();
    }

    pub(crate) fn toggle_files(&mut self) {
        self.files_view_open = !self.files_view_open;
        if !self.files_view_open && self.focus == Focus::Files {
            self.focus = Focus::Editor;
        }
    }

    pub(crate) fn persist_settings(&mut self) {
        self.settings.theme_name = Some(self.active_theme().name.clone());
        self.settings.files_pane_width = Some(self.files_pane_width);
        self.settings.output_pane_width = Some(self.output_pane_width);
        if let Err(err) = save_settings(&self.settings) {
            tracing::warn!(error = %err, "saving settings failed");
            self.set_status(format!("Failed to save settings: {err}"));
        }
    }

    /// Keeps both side panes inside `total_width` while leaving the editor usable.
    pub(crate) fn clamp_pane_widths(&mut self, total_width: u16) {
        let files = if self.files_view_open {
            self.files_pane_width
        } else {
            0
        };
        let max_output = total_width
            .saturating_sub(files)
            .saturating_sub(Self::MIN_EDITOR_PANE_WIDTH)
            .max(Self::MIN_OUTPUT_PANE_WIDTH.min(total_width / 3));
        self.output_pane_width = self.output_pane_width.min(max_output);
        if self.files_view_open {
            let max_files = total_width
                .saturating_sub(self.output_pane_width)
                .saturating_sub(Self::MIN_EDITOR_PANE_WIDTH)
                .max(Self::MIN_FILES_PANE_WIDTH.min(total_width / 4));
            self.files_pane_width = self.files_pane_width.min(max_files);
        }
    }
}
