#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Files,
    Editor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PromptMode {
    AddFiles,
}

#[derive(Debug, Clone)]
pub(crate) struct PromptState {
    pub(crate) title: String,
    pub(crate) value: String,
    /// Cursor position in chars.
    pub(crate) cursor: usize,
    pub(crate) mode: PromptMode,
}

impl PromptState {
    pub(crate) fn new(title: impl Into<String>, mode: PromptMode) -> Self {
        Self {
            title: title.into(),
            value: String::new(),
            cursor: 0,
            mode,
        }
    }

    fn byte_at(&self, cursor: usize) -> usize {
        self.value
            .char_indices()
            .nth(cursor)
            .map_or(self.value.len(), |(i, _)| i)
    }

    pub(crate) fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    pub(crate) fn insert(&mut self, c: char) {
        let at = self.byte_at(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    pub(crate) fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_at(self.cursor);
        self.value.remove(at);
    }

    pub(crate) fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_at(self.cursor);
            self.value.remove(at);
        }
    }
}

/// Header buttons, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HeaderButton {
    AddFiles,
    DownloadFile,
    DownloadAll,
    Run,
}

impl HeaderButton {
    pub(crate) fn all() -> [HeaderButton; 4] {
        [
            HeaderButton::AddFiles,
            HeaderButton::DownloadFile,
            HeaderButton::DownloadAll,
            HeaderButton::Run,
        ]
    }

    pub(crate) fn label(self, running: bool) -> &'static str {
        match self {
            HeaderButton::AddFiles => "Add Files",
            HeaderButton::DownloadFile => "Download File",
            HeaderButton::DownloadAll => "Download All",
            HeaderButton::Run if running => "Running...",
            HeaderButton::Run => "▶ Run",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_edits_by_char_not_byte() {
        let mut prompt = PromptState::new("Add Files", PromptMode::AddFiles);
        for c in "é/a.py".chars() {
            prompt.insert(c);
        }
        prompt.cursor = 1;
        prompt.backspace();
        assert_eq!(prompt.value, "/a.py");
        assert_eq!(prompt.cursor, 0);
        prompt.delete();
        assert_eq!(prompt.value, "a.py");
    }
}
