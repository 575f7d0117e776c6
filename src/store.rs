/// Extension a file name must carry to be accepted by [`FileStore::upload`].
pub(crate) const SOURCE_EXTENSION: &str = ".py";
pub(crate) const DEFAULT_FILE_NAME: &str = "main.py";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FileEntry {
    pub(crate) name: String,
    pub(crate) content: String,
}

/// In-memory files of the session, keyed by name.
///
/// Entries keep the order in which their names were first inserted; that order
/// is the order of the Files pane. Overwriting a name keeps its position.
#[derive(Debug, Clone)]
pub(crate) struct FileStore {
    entries: Vec<FileEntry>,
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FileStore {
    pub(crate) fn new() -> Self {
        Self {
            entries: vec![FileEntry {
                name: DEFAULT_FILE_NAME.to_string(),
                content: String::new(),
            }],
        }
    }

    pub(crate) fn is_source_name(name: &str) -> bool {
        name.ends_with(SOURCE_EXTENSION)
    }

    /// Inserts or overwrites `name`. Names without the source extension are
    /// ignored and `false` is returned.
    pub(crate) fn upload(&mut self, name: &str, content: String) -> bool {
        if !Self::is_source_name(name) {
            return false;
        }
        self.set(name, content);
        true
    }

    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.entries[i].content.as_str())
    }

    pub(crate) fn set(&mut self, name: &str, content: String) {
        match self.position(name) {
            Some(i) => self.entries[i].content = content,
            None => self.entries.push(FileEntry {
                name: name.to_string(),
                content,
            }),
        }
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub(crate) fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_holds_empty_default_entry() {
        let store = FileStore::new();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(DEFAULT_FILE_NAME), Some(""));
    }

    #[test]
    fn upload_source_file_merges_with_prior_entries() {
        let mut store = FileStore::new();
        assert!(store.upload("a.py", "print(1)".to_string()));
        assert_eq!(store.get("a.py"), Some("print(1)"));
        assert_eq!(store.get(DEFAULT_FILE_NAME), Some(""));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn upload_rejects_other_extensions() {
        let mut store = FileStore::new();
        assert!(!store.upload("a.txt", "hello".to_string()));
        assert!(!store.upload("py", "x".to_string()));
        assert!(!store.contains("a.txt"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn upload_overwrites_in_place() {
        let mut store = FileStore::new();
        store.upload("a.py", "1".to_string());
        store.upload("b.py", "2".to_string());
        store.upload("a.py", "3".to_string());
        let names: Vec<_> = store.names().collect();
        assert_eq!(names, vec![DEFAULT_FILE_NAME, "a.py", "b.py"]);
        assert_eq!(store.get("a.py"), Some("3"));
    }

    #[test]
    fn get_missing_name_is_none() {
        let store = FileStore::new();
        assert_eq!(store.get("missing.py"), None);
    }

    #[test]
    fn set_accepts_any_name() {
        let mut store = FileStore::new();
        store.set("notes", "n".to_string());
        assert_eq!(store.get("notes"), Some("n"));
    }
}
