use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::store::FileStore;
use crate::util::{collect_all_files, store_name_for};

/// Result of reading one set of picked paths.
#[derive(Debug, Default)]
pub(crate) struct UploadBatch {
    pub(crate) accepted: Vec<(String, String)>,
    pub(crate) rejected: Vec<String>,
    pub(crate) failed: Vec<(String, String)>,
}

impl UploadBatch {
    /// Merges every accepted file into `store` in one pass. Returns the names
    /// that landed, in batch order.
    pub(crate) fn merge_into(&mut self, store: &mut FileStore) -> Vec<String> {
        let mut landed = Vec::with_capacity(self.accepted.len());
        for (name, content) in self.accepted.drain(..) {
            if store.upload(&name, content) {
                landed.push(name);
            }
        }
        landed
    }
}

/// Expands picked paths into `(store name, path)` candidates. Directories
/// contribute every file below them, named relative to the directory's parent.
pub(crate) fn expand_picked(paths: &[PathBuf]) -> Vec<(String, PathBuf)> {
    let mut out = Vec::new();
    for picked in paths {
        if picked.is_dir() {
            // `.` and `..` have no usable parent until resolved.
            let dir = fs::canonicalize(picked).unwrap_or_else(|_| picked.clone());
            let base = dir.parent().unwrap_or(Path::new(""));
            let mut files = Vec::new();
            collect_all_files(&dir, &mut files);
            files.sort();
            for file in files {
                out.push((store_name_for(base, &file), file));
            }
        } else {
            let name = picked
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| picked.display().to_string());
            out.push((name, picked.clone()));
        }
    }
    out
}

pub(crate) fn read_batch(paths: &[PathBuf]) -> UploadBatch {
    let mut batch = UploadBatch::default();
    for (name, path) in expand_picked(paths) {
        if !FileStore::is_source_name(&name) {
            batch.rejected.push(name);
            continue;
        }
        match fs::read(&path) {
            Ok(bytes) => {
                let content = String::from_utf8_lossy(&bytes).to_string();
                batch.accepted.push((name, content));
            }
            Err(err) => batch.failed.push((name, err.to_string())),
        }
    }
    batch
}

/// A batch being read on a worker thread.
pub(crate) struct UploadJob {
    rx: Receiver<UploadBatch>,
}

impl UploadJob {
    pub(crate) fn spawn(paths: Vec<PathBuf>) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(read_batch(&paths));
        });
        Self { rx }
    }

    /// Returns the finished batch once. A worker that died without sending
    /// yields an empty batch so the job never lingers.
    pub(crate) fn try_finish(&self) -> Option<UploadBatch> {
        match self.rx.try_recv() {
            Ok(batch) => Some(batch),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(UploadBatch::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    #[test]
    fn read_batch_filters_by_extension() {
        let tmp = tempdir().expect("tempdir");
        let a = tmp.path().join("a.py");
        let notes = tmp.path().join("a.txt");
        fs::write(&a, "print(1)").expect("write");
        fs::write(&notes, "hello").expect("write");

        let batch = read_batch(&[a, notes]);

        assert_eq!(batch.accepted, vec![("a.py".to_string(), "print(1)".to_string())]);
        assert_eq!(batch.rejected, vec!["a.txt".to_string()]);
        assert!(batch.failed.is_empty());
    }

    #[test]
    fn read_batch_records_unreadable_files() {
        let tmp = tempdir().expect("tempdir");
        let missing = tmp.path().join("gone.py");

        let batch = read_batch(&[missing]);

        assert!(batch.accepted.is_empty());
        assert_eq!(batch.failed.len(), 1);
        assert_eq!(batch.failed[0].0, "gone.py");
    }

    #[test]
    fn directory_pick_keeps_nested_names() {
        let tmp = tempdir().expect("tempdir");
        let proj = tmp.path().join("proj");
        fs::create_dir_all(proj.join("pkg")).expect("mkdir");
        fs::write(proj.join("main.py"), "import pkg").expect("write");
        fs::write(proj.join("pkg").join("util.py"), "X = 1").expect("write");
        fs::write(proj.join("README.md"), "# readme").expect("write");

        let batch = read_batch(&[proj]);

        let names: Vec<_> = batch.accepted.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["proj/main.py", "proj/pkg/util.py"]);
        assert_eq!(batch.rejected, vec!["proj/README.md".to_string()]);
    }

    #[test]
    fn relative_directory_pick_is_named_after_the_directory() {
        let tmp = tempdir().expect("tempdir");
        let proj = tmp.path().join("proj");
        fs::create_dir_all(proj.join("pkg")).expect("mkdir");
        fs::write(proj.join("a.py"), "A").expect("write");

        let batch = read_batch(&[proj.join("pkg").join(".."), proj.join(".")]);

        let names: Vec<_> = batch.accepted.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["proj/a.py", "proj/a.py"]);
    }

    #[test]
    fn merge_overwrites_duplicates_and_keeps_prior_entries() {
        let mut store = FileStore::new();
        store.upload("a.py", "old".to_string());
        let mut batch = UploadBatch {
            accepted: vec![
                ("a.py".to_string(), "new".to_string()),
                ("b.py".to_string(), "2".to_string()),
            ],
            ..UploadBatch::default()
        };

        let landed = batch.merge_into(&mut store);

        assert_eq!(landed, vec!["a.py".to_string(), "b.py".to_string()]);
        assert_eq!(store.get("a.py"), Some("new"));
        assert_eq!(store.get("b.py"), Some("2"));
        assert!(store.contains(crate::store::DEFAULT_FILE_NAME));
    }

    #[test]
    fn job_delivers_batch_from_worker() {
        let tmp = tempdir().expect("tempdir");
        let a = tmp.path().join("a.py");
        fs::write(&a, "x").expect("write");

        let job = UploadJob::spawn(vec![a]);
        let deadline = Instant::now() + Duration::from_secs(5);
        let batch = loop {
            if let Some(batch) = job.try_finish() {
                break batch;
            }
            assert!(Instant::now() < deadline, "upload worker timed out");
            std::thread::sleep(Duration::from_millis(5));
        };
        assert_eq!(batch.accepted.len(), 1);
    }
}
