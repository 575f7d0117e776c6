use super::App;
use std::io;
use std::path::PathBuf;

use crate::export::{ARCHIVE_NAME, ExportJob, export_single};
use crate::keybinds::KeyAction;
use crate::types::{HeaderButton, PromptMode, PromptState};
use crate::upload::{UploadBatch, UploadJob};

/// Splits prompt input into paths. Double quotes group a path with spaces.
pub(crate) fn parse_path_list(input: &str) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for c in input.chars() {
        match c {
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    out.push(PathBuf::from(std::mem::take(&mut current)));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        out.push(PathBuf::from(current));
    }
    out
}

fn summarize_upload(landed: &[String], batch: &UploadBatch) -> String {
    let mut parts = Vec::new();
    match landed.len() {
        0 => parts.push("No files added".to_string()),
        1 => parts.push(format!("Added {}", landed[0])),
        n => parts.push(format!("Added {n} files")),
    }
    if !batch.rejected.is_empty() {
        parts.push(format!("ignored (not .py): {}", batch.rejected.join(", ")));
    }
    if !batch.failed.is_empty() {
        let failed: Vec<String> = batch
            .failed
            .iter()
            .map(|(name, err)| format!("{name} ({err})"))
            .collect();
        parts.push(format!("failed: {}", failed.join(", ")));
    }
    parts.join("; ")
}

impl App {
    pub(crate) fn open_add_files_prompt(&mut self) {
        self.prompt = Some(PromptState::new(
            "Add Files: paths to .py files or folders (Enter to add, Esc to cancel)",
            PromptMode::AddFiles,
        ));
    }

    pub(crate) fn apply_prompt(&mut self, mode: PromptMode, value: String) {
        match mode {
            PromptMode::AddFiles => self.add_files(parse_path_list(&value)),
        }
    }

    /// Starts reading `paths` in the background; `poll_uploads` merges them.
    pub(crate) fn add_files(&mut self, paths: Vec<PathBuf>) {
        if paths.is_empty() {
            return;
        }
        tracing::info!(count = paths.len(), "upload started");
        self.uploads.push(UploadJob::spawn(paths));
        self.set_status("Reading files...");
    }

    pub(crate) fn poll_uploads(&mut self) {
        let mut finished = Vec::new();
        self.uploads.retain(|job| match job.try_finish() {
            Some(batch) => {
                finished.push(batch);
                false
            }
            None => true,
        });
        for batch in finished {
            self.apply_upload(batch);
        }
    }

    pub(crate) fn apply_upload(&mut self, mut batch: UploadBatch) {
        let landed = batch.merge_into(&mut self.store);
        if !batch.rejected.is_empty() {
            tracing::info!(rejected = ?batch.rejected, "ignored files without .py extension");
        }
        for (name, err) in &batch.failed {
            tracing::warn!(file = %name, error = %err, "upload read failed");
        }
        // An upload may have replaced the file that is open in the editor.
        if let Some(selected) = self.selection.selected().map(str::to_string)
            && landed.iter().any(|n| *n == selected)
        {
            self.select_file(&selected);
        }
        self.set_status(summarize_upload(&landed, &batch));
    }

    pub(crate) fn run_active(&mut self) {
        let name = self.selection.selected().unwrap_or("buffer").to_string();
        let source = self.selection.buffer().to_string();
        if !self.runner.run(&source) {
            self.set_status("A run is already in progress");
            return;
        }
        tracing::info!(file = %name, bytes = source.len(), "run started");
        self.set_status(format!("Running {name}..."));
    }

    pub(crate) fn poll_runner(&mut self) {
        if !self.runner.poll() {
            return;
        }
        let failed = !self.runner.result().stderr.is_empty();
        tracing::info!(failed, "run completed");
        if failed {
            self.set_status("Run finished with errors");
        } else {
            self.set_status("Run finished");
        }
    }

    pub(crate) fn download_file(&mut self) -> io::Result<()> {
        let Some(name) = self.selection.selected().map(str::to_string) else {
            self.set_status("No file selected");
            return Ok(());
        };
        let path = export_single(&self.download_dir, &name, self.selection.buffer())?;
        tracing::info!(file = %name, path = %path.display(), "file downloaded");
        self.set_status(format!("Saved {}", path.display()));
        Ok(())
    }

    pub(crate) fn download_all(&mut self) {
        if self.export_job.is_some() {
            self.set_status("Archive already in progress");
            return;
        }
        let entries = self.store.entries().to_vec();
        tracing::info!(entries = entries.len(), "archive started");
        self.export_job = Some(ExportJob::spawn(self.download_dir.clone(), entries));
        self.set_status(format!("Building {ARCHIVE_NAME}..."));
    }

    pub(crate) fn poll_export(&mut self) {
        let Some(result) = self.export_job.as_ref().and_then(|job| job.try_finish()) else {
            return;
        };
        self.export_job = None;
        match result {
            Ok(path) => {
                tracing::info!(path = %path.display(), "archive written");
                self.set_status(format!("Saved {}", path.display()));
            }
            Err(err) => {
                tracing::warn!(error = %err, "archive failed");
                self.set_status(format!("Archive failed: {err}"));
            }
        }
    }

    /// Applies whatever background work finished since the last tick.
    pub(crate) fn poll_background(&mut self) {
        self.poll_uploads();
        self.poll_runner();
        self.poll_export();
    }

    pub(crate) fn press_button(&mut self, button: HeaderButton) -> io::Result<()> {
        match button {
            HeaderButton::AddFiles => self.open_add_files_prompt(),
            HeaderButton::DownloadFile => self.download_file()?,
            HeaderButton::DownloadAll => self.download_all(),
            HeaderButton::Run => self.run_active(),
        }
        Ok(())
    }

    pub(crate) fn run_key_action(&mut self, action: KeyAction) -> io::Result<()> {
        match action {
            KeyAction::AddFiles => self.press_button(HeaderButton::AddFiles)?,
            KeyAction::DownloadFile => self.press_button(HeaderButton::DownloadFile)?,
            KeyAction::DownloadAll => self.press_button(HeaderButton::DownloadAll)?,
            KeyAction::Run => self.press_button(HeaderButton::Run)?,
            KeyAction::Quit => self.quit = true,
            KeyAction::Help => self.help_open = true,
            KeyAction::ToggleFiles => self.toggle_files(),
            KeyAction::CycleTheme => self.cycle_theme(),
            KeyAction::Undo => {
                if self.editor.undo() {
                    self.on_editor_content_changed();
                }
            }
            KeyAction::Redo => {
                if self.editor.redo() {
                    self.on_editor_content_changed();
                }
            }
            KeyAction::SelectAll => self.editor.select_all(),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::core::tests::new_app;
    use crate::store::DEFAULT_FILE_NAME;
    use std::fs;
    use std::io::{Cursor, Read};
    use std::thread;
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    fn settle(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !app.uploads.is_empty() || app.export_job.is_some() || app.runner.is_running() {
            app.poll_background();
            assert!(Instant::now() < deadline, "background work never finished");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn parse_path_list_handles_quotes() {
        assert_eq!(
            parse_path_list(r#"a.py  "my dir/b.py" c"#),
            vec![
                PathBuf::from("a.py"),
                PathBuf::from("my dir/b.py"),
                PathBuf::from("c")
            ]
        );
        assert!(parse_path_list("   ").is_empty());
    }

    #[test]
    fn upload_merges_and_reports_rejected_names() {
        let tmp = tempdir().expect("tempdir");
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).expect("mkdir");
        fs::write(src.join("a.py"), "print(1)").expect("write");
        fs::write(src.join("a.txt"), "nope").expect("write");
        let mut app = new_app(tmp.path());

        app.add_files(vec![src.join("a.py"), src.join("a.txt")]);
        settle(&mut app);

        assert_eq!(app.store.get("a.py"), Some("print(1)"));
        assert!(!app.store.contains("a.txt"));
        assert!(app.store.contains(DEFAULT_FILE_NAME));
        assert_eq!(app.status, "Added a.py; ignored (not .py): a.txt");
    }

    #[test]
    fn upload_over_selected_file_refreshes_editor() {
        let tmp = tempdir().expect("tempdir");
        let mut app = new_app(tmp.path());
        let mut batch = UploadBatch::default();
        batch
            .accepted
            .push((DEFAULT_FILE_NAME.to_string(), "fresh = True".to_string()));

        app.apply_upload(batch);

        assert_eq!(app.editor.lines(), ["fresh = True"]);
        assert_eq!(app.selection.buffer(), "fresh = True");
    }

    #[test]
    fn run_uses_working_buffer_and_shows_output() {
        let tmp = tempdir().expect("tempdir");
        let mut app = new_app(tmp.path());
        app.selection.edit(&mut app.store, "print('hi')".to_string());

        app.run_active();
        assert!(app.runner.result().running);
        settle(&mut app);

        assert_eq!(app.runner.result().stdout, "print('hi')");
        assert_eq!(app.status, "Run finished");
    }

    #[test]
    fn download_file_writes_base_name() {
        let tmp = tempdir().expect("tempdir");
        let mut app = new_app(tmp.path());
        app.store.upload("sub/dir/a.py", "x=1".to_string());
        app.select_file("sub/dir/a.py");

        app.download_file().expect("download");

        assert_eq!(
            fs::read_to_string(tmp.path().join("a.py")).expect("read"),
            "x=1"
        );
    }

    #[test]
    fn download_all_writes_archive_of_store() {
        let tmp = tempdir().expect("tempdir");
        let mut app = new_app(tmp.path());
        app.store.upload("b.py", "2".to_string());

        app.download_all();
        settle(&mut app);

        let bytes = fs::read(tmp.path().join(ARCHIVE_NAME)).expect("archive");
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("zip");
        assert_eq!(archive.len(), 2);
        let mut text = String::new();
        archive
            .by_name("b.py")
            .expect("entry")
            .read_to_string(&mut text)
            .expect("read");
        assert_eq!(text, "2");
        assert!(app.status.starts_with("Saved"));
    }

    #[test]
    fn download_all_failure_is_reported() {
        let tmp = tempdir().expect("tempdir");
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "").expect("write");
        let mut app = new_app(&blocker);

        app.download_all();
        settle(&mut app);

        assert!(app.status.starts_with("Archive failed"), "{}", app.status);
    }

    #[test]
    fn second_archive_request_is_refused_while_building() {
        let tmp = tempdir().expect("tempdir");
        let mut app = new_app(tmp.path());
        app.download_all();
        app.download_all();
        assert_eq!(app.status, "Archive already in progress");
        settle(&mut app);
    }
}
