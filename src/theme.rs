use std::fs;
use std::path::PathBuf;

use include_dir::{Dir, include_dir};
use ratatui::style::Color;
use serde::Deserialize;

const LOCAL_THEME_DIR: &str = "themes";
static EMBEDDED_THEMES: Dir = include_dir!("$CARGO_MANIFEST_DIR/themes");

#[derive(Debug, Clone)]
pub(crate) struct Theme {
    pub(crate) name: String,
    pub(crate) theme_type: String,
    pub(crate) bg: Color,
    pub(crate) bg_alt: Color,
    pub(crate) fg: Color,
    pub(crate) fg_muted: Color,
    pub(crate) border: Color,
    pub(crate) accent: Color,
    pub(crate) button_fg: Color,
    pub(crate) selection: Color,
    pub(crate) error: Color,
    pub(crate) error_bg: Color,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ThemeFile {
    pub(crate) name: String,
    #[serde(rename = "type")]
    pub(crate) theme_type: String,
    pub(crate) colors: ThemeColors,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ThemeColors {
    pub(crate) background: String,
    #[serde(rename = "backgroundAlt")]
    pub(crate) background_alt: String,
    pub(crate) foreground: String,
    #[serde(rename = "foregroundMuted")]
    pub(crate) foreground_muted: String,
    pub(crate) border: String,
    pub(crate) accent: String,
    #[serde(default, rename = "buttonForeground")]
    pub(crate) button_foreground: Option<String>,
    pub(crate) selection: String,
    #[serde(default)]
    pub(crate) error: Option<String>,
    #[serde(default, rename = "errorBackground")]
    pub(crate) error_background: Option<String>,
}

pub(crate) fn color_from_hex(input: &str, fallback: Color) -> Color {
    let s = input.trim();
    if let Some(stripped) = s.strip_prefix('#')
        && stripped.len() == 6
    {
        let r = u8::from_str_radix(&stripped[0..2], 16).ok();
        let g = u8::from_str_radix(&stripped[2..4], 16).ok();
        let b = u8::from_str_radix(&stripped[4..6], 16).ok();
        if let (Some(r), Some(g), Some(b)) = (r, g, b) {
            return Color::Rgb(r, g, b);
        }
    }
    fallback
}

fn optional_color(input: Option<&String>, fallback: Color) -> Color {
    input.map_or(fallback, |c| color_from_hex(c, fallback))
}

pub(crate) fn theme_from_file(tf: ThemeFile) -> Theme {
    let c = &tf.colors;
    Theme {
        bg: color_from_hex(&c.background, Color::Rgb(30, 30, 30)),
        bg_alt: color_from_hex(&c.background_alt, Color::Rgb(18, 18, 18)),
        fg: color_from_hex(&c.foreground, Color::Rgb(238, 238, 238)),
        fg_muted: color_from_hex(&c.foreground_muted, Color::Rgb(128, 128, 128)),
        border: color_from_hex(&c.border, Color::Rgb(51, 51, 51)),
        accent: color_from_hex(&c.accent, Color::Rgb(15, 98, 254)),
        button_fg: optional_color(c.button_foreground.as_ref(), Color::Rgb(255, 255, 255)),
        selection: color_from_hex(&c.selection, Color::Rgb(16, 38, 80)),
        error: optional_color(c.error.as_ref(), Color::Rgb(255, 76, 76)),
        error_bg: optional_color(c.error_background.as_ref(), Color::Rgb(51, 0, 0)),
        name: tf.name,
        theme_type: tf.theme_type,
    }
}

fn parse_theme(raw: &str) -> Option<Theme> {
    match serde_json::from_str::<ThemeFile>(raw) {
        Ok(tf) => Some(theme_from_file(tf)),
        Err(err) => {
            tracing::warn!(error = %err, "skipping invalid theme");
            None
        }
    }
}

/// Themes from a local `themes/` directory, or the embedded set when none
/// are found there. Dark themes sort first.
pub(crate) fn load_themes() -> Vec<Theme> {
    let mut themes = Vec::new();

    let theme_dirs = [
        PathBuf::from(LOCAL_THEME_DIR),
        PathBuf::from("/usr/local/share/pyide/themes"),
    ];
    for theme_dir in &theme_dirs {
        if !theme_dir.exists() {
            continue;
        }
        let mut paths: Vec<PathBuf> = fs::read_dir(theme_dir)
            .ok()
            .into_iter()
            .flat_map(|rd| rd.filter_map(Result::ok))
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|e| e == "json"))
            .collect();
        paths.sort();
        for path in paths {
            if let Ok(raw) = fs::read_to_string(&path)
                && let Some(theme) = parse_theme(&raw)
            {
                themes.push(theme);
            }
        }
        if !themes.is_empty() {
            break;
        }
    }
    if themes.is_empty() {
        let mut files: Vec<_> = EMBEDDED_THEMES
            .files()
            .filter(|f| f.path().extension().is_some_and(|e| e == "json"))
            .collect();
        files.sort_by_key(|f| f.path());
        themes.extend(
            files
                .into_iter()
                .filter_map(|f| f.contents_utf8())
                .filter_map(parse_theme),
        );
    }
    themes.sort_by_key(|t| (t.theme_type != "dark", t.name.to_ascii_lowercase()));
    themes
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r##"{"name":"Test","type":"dark","colors":{"background":"#1e1e1e","backgroundAlt":"#121212","foreground":"#ffffff","foregroundMuted":"#808080","border":"#333333","accent":"#0f62fe","selection":"#0f62fe"}}"##;

    #[test]
    fn minimal_theme_uses_error_fallbacks() {
        let tf: ThemeFile = serde_json::from_str(MINIMAL).unwrap();
        let theme = theme_from_file(tf);
        assert_eq!(theme.bg, Color::Rgb(30, 30, 30));
        assert_eq!(theme.accent, Color::Rgb(15, 98, 254));
        assert_eq!(theme.error, Color::Rgb(255, 76, 76));
        assert_eq!(theme.error_bg, Color::Rgb(51, 0, 0));
    }

    #[test]
    fn invalid_hex_falls_back() {
        assert_eq!(color_from_hex("blue", Color::Red), Color::Red);
        assert_eq!(color_from_hex("#12345", Color::Red), Color::Red);
        assert_eq!(color_from_hex(" #ff4c4c ", Color::Red), Color::Rgb(255, 76, 76));
    }

    #[test]
    fn missing_accent_fails_to_parse() {
        let json = MINIMAL.replace(r##""accent":"#0f62fe","##, "");
        assert!(serde_json::from_str::<ThemeFile>(&json).is_err());
    }

    #[test]
    fn embedded_themes_all_parse() {
        let files: Vec<_> = EMBEDDED_THEMES
            .files()
            .filter(|f| f.path().extension().is_some_and(|e| e == "json"))
            .collect();
        assert!(!files.is_empty());
        for file in files {
            let raw = file.contents_utf8().expect("utf8 theme");
            let tf: ThemeFile = serde_json::from_str(raw)
                .unwrap_or_else(|e| panic!("{:?}: {e}", file.path()));
            assert!(tf.theme_type == "dark" || tf.theme_type == "light");
        }
    }

    #[test]
    fn load_themes_puts_dark_first() {
        let themes = load_themes();
        assert!(!themes.is_empty());
        assert_eq!(themes[0].theme_type, "dark");
    }
}
