use crate::store::FileStore;

/// The active file and the text shown in the editor for it.
#[derive(Debug, Clone, Default)]
pub(crate) struct Selection {
    selected: Option<String>,
    buffer: String,
}

impl Selection {
    pub(crate) fn new(name: &str, store: &FileStore) -> Self {
        let mut selection = Self::default();
        selection.select(store, name);
        selection
    }

    pub(crate) fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub(crate) fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Selects `name` and loads its stored text. A name the store does not
    /// hold yields an empty buffer.
    pub(crate) fn select(&mut self, store: &FileStore, name: &str) {
        self.selected = Some(name.to_string());
        self.buffer = store.get(name).unwrap_or_default().to_string();
    }

    /// Replaces the buffer and writes it through to the store. Without a
    /// selection the edit is dropped.
    pub(crate) fn edit(&mut self, store: &mut FileStore, text: String) {
        let Some(name) = self.selected.as_deref() else {
            return;
        };
        store.set(name, text.clone());
        self.buffer = text;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DEFAULT_FILE_NAME;

    #[test]
    fn select_loads_stored_content() {
        let mut store = FileStore::new();
        store.upload("a.py", "print(1)".to_string());
        let mut sel = Selection::new(DEFAULT_FILE_NAME, &store);
        sel.select(&store, "a.py");
        assert_eq!(sel.selected(), Some("a.py"));
        assert_eq!(sel.buffer(), "print(1)");
    }

    #[test]
    fn edit_survives_selecting_away_and_back() {
        let mut store = FileStore::new();
        store.upload("a.py", "old".to_string());
        let mut sel = Selection::new("a.py", &store);
        sel.edit(&mut store, "new".to_string());
        sel.select(&store, DEFAULT_FILE_NAME);
        assert_eq!(sel.buffer(), "");
        sel.select(&store, "a.py");
        assert_eq!(sel.buffer(), "new");
    }

    #[test]
    fn edit_updates_store_immediately() {
        let mut store = FileStore::new();
        let mut sel = Selection::new(DEFAULT_FILE_NAME, &store);
        sel.edit(&mut store, "x = 1".to_string());
        assert_eq!(store.get(DEFAULT_FILE_NAME), Some("x = 1"));
        assert_eq!(sel.buffer(), store.get(DEFAULT_FILE_NAME).unwrap());
    }

    #[test]
    fn edit_without_selection_is_dropped() {
        let mut store = FileStore::new();
        let mut sel = Selection::default();
        sel.edit(&mut store, "lost".to_string());
        assert_eq!(store.get(DEFAULT_FILE_NAME), Some(""));
        assert_eq!(store.len(), 1);
        assert_eq!(sel.buffer(), "");
    }

    #[test]
    fn selecting_unknown_name_gives_empty_buffer() {
        let store = FileStore::new();
        let mut sel = Selection::default();
        sel.select(&store, "ghost.py");
        assert_eq!(sel.selected(), Some("ghost.py"));
        assert_eq!(sel.buffer(), "");
    }
}
