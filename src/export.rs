use std::fs;
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::store::FileEntry;
use crate::util::base_name;

pub(crate) const ARCHIVE_NAME: &str = "python-files.zip";

/// Writes one file's text into `dir` under its base name.
pub(crate) fn export_single(dir: &Path, name: &str, content: &str) -> io::Result<PathBuf> {
    let file_name = base_name(name);
    if file_name.is_empty() {
        return Err(io::Error::other(format!("no file name in '{name}'")));
    }
    fs::create_dir_all(dir)?;
    let target = dir.join(file_name);
    fs::write(&target, content.as_bytes())?;
    Ok(target)
}

/// Packs every entry into a zip archive keyed by its stored name.
pub(crate) fn build_archive(entries: &[FileEntry]) -> io::Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for entry in entries {
        zip.start_file(entry.name.as_str(), options)
            .map_err(|e| io::Error::other(format!("archive entry {}: {e}", entry.name)))?;
        zip.write_all(entry.content.as_bytes())?;
    }
    let cursor = zip
        .finish()
        .map_err(|e| io::Error::other(format!("finish archive: {e}")))?;
    Ok(cursor.into_inner())
}

fn write_archive(dir: &Path, entries: &[FileEntry]) -> io::Result<PathBuf> {
    let bytes = build_archive(entries)?;
    fs::create_dir_all(dir)?;
    let target = dir.join(ARCHIVE_NAME);
    fs::write(&target, bytes)?;
    Ok(target)
}

/// An archive being built and written on a worker thread.
pub(crate) struct ExportJob {
    rx: Receiver<io::Result<PathBuf>>,
}

impl ExportJob {
    pub(crate) fn spawn(dir: PathBuf, entries: Vec<FileEntry>) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(write_archive(&dir, &entries));
        });
        Self { rx }
    }

    pub(crate) fn try_finish(&self) -> Option<io::Result<PathBuf>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(Err(io::Error::other("archive worker stopped unexpectedly")))
            }
        }
    }
}
