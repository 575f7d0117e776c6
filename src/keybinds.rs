use std::collections::HashMap;
use std::fs;

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

use crate::config::config_dir;

const KEYBINDS_FILE: &str = "keybinds.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum KeyAction {
    // Global
    AddFiles,
    DownloadFile,
    DownloadAll,
    Run,
    Quit,
    Help,
    ToggleFiles,
    CycleTheme,
    // Editor
    Undo,
    Redo,
    SelectAll,
}

impl KeyAction {
    pub(crate) fn is_global(self) -> bool {
        !matches!(
            self,
            KeyAction::Undo | KeyAction::Redo | KeyAction::SelectAll
        )
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            KeyAction::AddFiles => "Add Files",
            KeyAction::DownloadFile => "Download File",
            KeyAction::DownloadAll => "Download All",
            KeyAction::Run => "Run",
            KeyAction::Quit => "Quit",
            KeyAction::Help => "Help",
            KeyAction::ToggleFiles => "Toggle Files",
            KeyAction::CycleTheme => "Next Theme",
            KeyAction::Undo => "Undo",
            KeyAction::Redo => "Redo",
            KeyAction::SelectAll => "Select All",
        }
    }

    pub(crate) fn all() -> &'static [KeyAction] {
        &[
            KeyAction::AddFiles,
            KeyAction::DownloadFile,
            KeyAction::DownloadAll,
            KeyAction::Run,
            KeyAction::Quit,
            KeyAction::Help,
            KeyAction::ToggleFiles,
            KeyAction::CycleTheme,
            KeyAction::Undo,
            KeyAction::Redo,
            KeyAction::SelectAll,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KeyBind {
    pub(crate) modifiers: KeyModifiers,
    pub(crate) code: KeyCode,
}

impl KeyBind {
    /// Terminals may report Ctrl+letter as the ASCII control character.
    fn normalize_code(code: KeyCode, modifiers: KeyModifiers) -> KeyCode {
        match code {
            KeyCode::Char(c) if modifiers.contains(KeyModifiers::CONTROL) => {
                let u = c as u32;
                if (1..=26).contains(&u) {
                    KeyCode::Char((b'a' + (u as u8) - 1) as char)
                } else {
                    KeyCode::Char(c.to_ascii_lowercase())
                }
            }
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        }
    }

    pub(crate) fn parse(s: &str) -> Option<KeyBind> {
        let parts: Vec<&str> = s.split('+').collect();
        let (key_str, mods) = parts.split_last()?;
        let mut modifiers = KeyModifiers::NONE;
        for part in mods {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                "alt" => modifiers |= KeyModifiers::ALT,
                _ => return None,
            }
        }
        let lower = key_str.to_ascii_lowercase();
        let code = match lower.as_str() {
            "space" => KeyCode::Char(' '),
            "esc" | "escape" => KeyCode::Esc,
            "enter" | "return" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "backspace" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" => KeyCode::PageUp,
            "pagedown" => KeyCode::PageDown,
            f if f.len() > 1 && f.starts_with('f') => {
                let n: u8 = f[1..].parse().ok()?;
                if !(1..=12).contains(&n) {
                    return None;
                }
                KeyCode::F(n)
            }
            _ => {
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };
        Some(KeyBind { modifiers, code })
    }

    fn key_name(&self) -> String {
        match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::F(n) => format!("F{n}"),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Delete => "Delete".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            _ => "?".to_string(),
        }
    }

    pub(crate) fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        parts.push(self.key_name());
        parts.join("+")
    }

    /// Char keys compare case-insensitively, so SHIFT is ignored for them.
    pub(crate) fn matches(&self, key: &KeyEvent) -> bool {
        let bind_code = Self::normalize_code(self.code, self.modifiers);
        let ev_code = Self::normalize_code(key.code, key.modifiers);
        let mut bind_mods = self.modifiers;
        let mut ev_mods = key.modifiers;
        if matches!(ev_code, KeyCode::Char(_)) {
            ev_mods -= KeyModifiers::SHIFT;
        }
        if matches!(bind_code, KeyCode::Char(_)) {
            bind_mods -= KeyModifiers::SHIFT;
        }
        bind_code == ev_code && bind_mods == ev_mods
    }

    #[cfg(test)]
    pub(crate) fn conflicts_with(&self, other: &KeyBind) -> bool {
        self.matches(&KeyEvent::new(other.code, other.modifiers))
            || other.matches(&KeyEvent::new(self.code, self.modifiers))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyScope {
    Global,
    Editor,
}

#[derive(Debug, Clone)]
pub(crate) struct KeyBindings {
    pub(crate) map: HashMap<KeyAction, Vec<KeyBind>>,
}

impl KeyBindings {
    pub(crate) fn defaults() -> Self {
        let mut map: HashMap<KeyAction, Vec<KeyBind>> = HashMap::new();
        let mut bind = |action: KeyAction, s: &str| {
            map.entry(action)
                .or_default()
                .push(KeyBind::parse(s).expect("invalid default keybind"));
        };

        bind(KeyAction::AddFiles, "ctrl+o");
        bind(KeyAction::DownloadFile, "ctrl+s");
        bind(KeyAction::DownloadAll, "ctrl+e");
        bind(KeyAction::DownloadAll, "f6");
        bind(KeyAction::Run, "f5");
        bind(KeyAction::Run, "ctrl+r");
        bind(KeyAction::Quit, "ctrl+q");
        bind(KeyAction::Help, "f1");
        bind(KeyAction::ToggleFiles, "ctrl+b");
        bind(KeyAction::CycleTheme, "ctrl+t");

        bind(KeyAction::Undo, "ctrl+z");
        bind(KeyAction::Redo, "ctrl+y");
        bind(KeyAction::SelectAll, "ctrl+a");

        KeyBindings { map }
    }

    pub(crate) fn lookup(&self, key: &KeyEvent, scope: KeyScope) -> Option<KeyAction> {
        KeyAction::all().iter().copied().find(|action| {
            let in_scope = match scope {
                KeyScope::Global => action.is_global(),
                KeyScope::Editor => !action.is_global(),
            };
            in_scope
                && self
                    .map
                    .get(action)
                    .is_some_and(|binds| binds.iter().any(|b| b.matches(key)))
        })
    }

    pub(crate) fn display_for(&self, action: KeyAction) -> String {
        self.map
            .get(&action)
            .and_then(|v| v.first())
            .map(|b| b.display())
            .unwrap_or_else(|| "unbound".to_string())
    }

    #[cfg(test)]
    pub(crate) fn conflicts(&self) -> Vec<(KeyAction, KeyAction)> {
        let actions = KeyAction::all();
        let mut result = Vec::new();
        for (i, a1) in actions.iter().enumerate() {
            for a2 in &actions[i + 1..] {
                let (Some(b1), Some(b2)) = (self.map.get(a1), self.map.get(a2)) else {
                    continue;
                };
                if b1.iter().any(|x| b2.iter().any(|y| x.conflicts_with(y))) {
                    result.push((*a1, *a2));
                }
            }
        }
        result
    }

    /// Applies `{ "action_name": "key" | ["key", ...] }` on top of the current
    /// map. An empty list unbinds the action.
    pub(crate) fn apply_overrides(&mut self, root: &serde_json::Value, source: &str) {
        let Some(obj) = root.as_object() else {
            tracing::warn!(source, "keybinds file must hold an object");
            return;
        };
        for (action_name, raw) in obj {
            let Ok(action) =
                serde_json::from_value::<KeyAction>(serde_json::Value::String(action_name.clone()))
            else {
                tracing::warn!(source, action = %action_name, "unknown key action");
                continue;
            };
            let strings = match serde_json::from_value::<SingleOrVec>(raw.clone()) {
                Ok(SingleOrVec::Single(s)) => vec![s],
                Ok(SingleOrVec::Multiple(v)) => v,
                Err(_) => {
                    tracing::warn!(source, action = %action_name, "expected string or list of strings");
                    continue;
                }
            };
            if strings.is_empty() {
                self.map.insert(action, Vec::new());
                continue;
            }
            let (binds, invalid): (Vec<_>, Vec<_>) =
                strings.iter().partition(|s| KeyBind::parse(s).is_some());
            if !invalid.is_empty() {
                tracing::warn!(source, action = %action_name, ?invalid, "invalid keybinds");
            }
            if !binds.is_empty() {
                self.map
                    .insert(action, binds.iter().filter_map(|s| KeyBind::parse(s)).collect());
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SingleOrVec {
    Single(String),
    Multiple(Vec<String>),
}

pub(crate) fn load_keybindings() -> KeyBindings {
    let mut kb = KeyBindings::defaults();
    let Some(path) = config_dir().map(|dir| dir.join(KEYBINDS_FILE)) else {
        return kb;
    };
    let Ok(raw) = fs::read_to_string(&path) else {
        return kb;
    };
    let source = path.display().to_string();
    match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(root) => kb.apply_overrides(&root, &source),
        Err(err) => tracing::warn!(source, error = %err, "invalid keybinds json"),
    }
    kb
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_modifiers_and_keys() {
        let kb = KeyBind::parse("ctrl+shift+f").unwrap();
        assert_eq!(kb.modifiers, KeyModifiers::CONTROL | KeyModifiers::SHIFT);
        assert_eq!(kb.code, KeyCode::Char('f'));
        assert_eq!(KeyBind::parse("f5").unwrap().code, KeyCode::F(5));
        assert_eq!(KeyBind::parse("alt+space").unwrap().code, KeyCode::Char(' '));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(KeyBind::parse("").is_none());
        assert!(KeyBind::parse("hyper+s").is_none());
        assert!(KeyBind::parse("f13").is_none());
        assert!(KeyBind::parse("ctrl+unknown").is_none());
    }

    #[test]
    fn display_is_title_case() {
        assert_eq!(KeyBind::parse("ctrl+s").unwrap().display(), "Ctrl+S");
        assert_eq!(KeyBind::parse("f5").unwrap().display(), "F5");
    }

    #[test]
    fn matches_uppercase_and_control_chars() {
        let kb = KeyBind::parse("ctrl+o").unwrap();
        assert!(kb.matches(&KeyEvent::new(
            KeyCode::Char('O'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT
        )));
        assert!(kb.matches(&KeyEvent::new(KeyCode::Char('\u{f}'), KeyModifiers::CONTROL)));
        assert!(!kb.matches(&KeyEvent::new(KeyCode::Char('o'), KeyModifiers::NONE)));
    }

    #[test]
    fn defaults_cover_every_action_without_conflicts() {
        let kb = KeyBindings::defaults();
        for action in KeyAction::all() {
            assert!(kb.map.contains_key(action), "missing default for {action:?}");
        }
        assert!(kb.conflicts().is_empty(), "{:?}", kb.conflicts());
    }

    #[test]
    fn lookup_respects_scope() {
        let kb = KeyBindings::defaults();
        let f5 = KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE);
        assert_eq!(kb.lookup(&f5, KeyScope::Global), Some(KeyAction::Run));
        assert_eq!(kb.lookup(&f5, KeyScope::Editor), None);
        let undo = KeyEvent::new(KeyCode::Char('z'), KeyModifiers::CONTROL);
        assert_eq!(kb.lookup(&undo, KeyScope::Editor), Some(KeyAction::Undo));
    }

    #[test]
    fn overrides_replace_and_unbind() {
        let mut kb = KeyBindings::defaults();
        kb.apply_overrides(
            &json!({
                "run": ["f9", "ctrl+enter"],
                "help": [],
                "teleport": "ctrl+x",
                "quit": 7
            }),
            "test",
        );
        assert_eq!(kb.display_for(KeyAction::Run), "F9");
        assert_eq!(kb.map[&KeyAction::Run].len(), 2);
        assert_eq!(kb.display_for(KeyAction::Help), "unbound");
        assert_eq!(kb.display_for(KeyAction::Quit), "Ctrl+Q");
    }

    #[test]
    fn overrides_keep_default_when_all_invalid() {
        let mut kb = KeyBindings::defaults();
        kb.apply_overrides(&json!({ "download_file": "ctrl+nope" }), "test");
        assert_eq!(kb.display_for(KeyAction::DownloadFile), "Ctrl+S");
    }
}
