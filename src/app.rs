use std::path::PathBuf;
use std::sync::Arc;

use ratatui::layout::Rect;
use ratatui_textarea::TextArea;

use crate::config::Settings;
use crate::export::ExportJob;
use crate::keybinds::KeyBindings;
use crate::runner::{Interpreter, Runner};
use crate::selection::Selection;
use crate::store::FileStore;
use crate::theme::Theme;
use crate::types::{Focus, HeaderButton, PromptState};
use crate::upload::UploadJob;

mod actions;
mod core;
mod editor;
mod input;

#[cfg(test)]
pub(crate) use self::core::tests::new_app;

/// Everything `App::new` needs from the command line and settings file.
pub(crate) struct AppOptions {
    pub(crate) settings: Settings,
    pub(crate) download_dir: PathBuf,
    pub(crate) interpreter: Arc<dyn Interpreter>,
}

pub(crate) struct App {
    pub(crate) store: FileStore,
    pub(crate) selection: Selection,
    pub(crate) editor: TextArea<'static>,
    /// Joins editor lines when flushing to the store.
    pub(crate) line_ending: &'static str,
    pub(crate) runner: Runner,
    pub(crate) uploads: Vec<UploadJob>,
    pub(crate) export_job: Option<ExportJob>,
    pub(crate) download_dir: PathBuf,
    pub(crate) settings: Settings,
    pub(crate) focus: Focus,
    pub(crate) file_index: usize,
    pub(crate) files_offset: usize,
    pub(crate) status: String,
    pub(crate) quit: bool,
    pub(crate) files_view_open: bool,
    pub(crate) files_pane_width: u16,
    pub(crate) output_pane_width: u16,
    pub(crate) help_open: bool,
    pub(crate) prompt: Option<PromptState>,
    pub(crate) themes: Vec<Theme>,
    pub(crate) active_theme_index: usize,
    pub(crate) keybinds: KeyBindings,
    pub(crate) files_rect: Rect,
    pub(crate) editor_rect: Rect,
    pub(crate) prompt_rect: Rect,
    pub(crate) button_rects: Vec<(HeaderButton, Rect)>,
}
