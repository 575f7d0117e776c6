use std::fs;
use std::path::{Component, Path, PathBuf};

use ratatui::layout::Rect;

pub(crate) fn text_to_lines(text: &str) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }
    let mut lines: Vec<String> = text.lines().map(ToString::to_string).collect();
    if text.ends_with('\n') {
        lines.push(String::new());
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// The line ending to write `text` back with: CRLF when the text uses it.
pub(crate) fn line_ending(text: &str) -> &'static str {
    if text.contains("\r\n") { "\r\n" } else { "\n" }
}

/// Last `/`-separated component of a stored name.
pub(crate) fn base_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Store key for `path`: its named components below `base`, joined with `/`.
pub(crate) fn store_name_for(base: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(base).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

pub(crate) fn inside(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x
        && x < rect.x.saturating_add(rect.width)
        && y >= rect.y
        && y < rect.y.saturating_add(rect.height)
}

pub(crate) fn collect_all_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        let Ok(ft) = fs::symlink_metadata(&path).map(|m| m.file_type()) else {
            continue;
        };
        if ft.is_symlink() {
            continue;
        }
        if ft.is_dir() {
            let name = path.file_name().unwrap_or_default().to_string_lossy();
            // Hidden dirs, bytecode caches and virtualenvs
            if name.starts_with('.') || name == "__pycache__" || name == "venv" {
                continue;
            }
            collect_all_files(&path, out);
        } else {
            out.push(path);
        }
    }
}

pub(crate) fn to_u16_saturating(v: usize) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn text_to_lines_round_trips_through_join() {
        for text in ["", "print(1)", "a\nb", "a\n", "\n\n"] {
            assert_eq!(text_to_lines(text).join("\n"), text);
        }
    }

    #[test]
    fn crlf_text_round_trips_with_its_line_ending() {
        for text in ["a\r\nb", "a\r\nb\r\n", "plain\n"] {
            assert_eq!(text_to_lines(text).join(line_ending(text)), text);
        }
    }

    #[test]
    fn base_name_strips_directories() {
        assert_eq!(base_name("sub/dir/a.py"), "a.py");
        assert_eq!(base_name("a.py"), "a.py");
        assert_eq!(base_name("dir/"), "");
    }

    #[test]
    fn store_name_uses_forward_slashes() {
        let base = Path::new("/tmp/work");
        let path = base.join("proj").join("pkg").join("a.py");
        assert_eq!(store_name_for(base, &path), "proj/pkg/a.py");
    }

    #[test]
    fn store_name_skips_root_and_dot_components() {
        assert_eq!(store_name_for(Path::new(""), Path::new("./proj/a.py")), "proj/a.py");
        assert_eq!(store_name_for(Path::new(""), Path::new("/a.py")), "a.py");
    }

    #[test]
    fn collect_all_files_skips_caches() {
        let tmp = tempdir().expect("tempdir");
        let root = tmp.path();
        fs::create_dir_all(root.join("__pycache__")).expect("mkdir");
        fs::create_dir_all(root.join(".git")).expect("mkdir");
        fs::write(root.join("__pycache__").join("a.cpython-312.pyc"), "").expect("write");
        fs::write(root.join(".git").join("HEAD"), "").expect("write");
        fs::write(root.join("a.py"), "").expect("write");

        let mut out = Vec::new();
        collect_all_files(root, &mut out);

        assert_eq!(out, vec![root.join("a.py")]);
    }

    #[test]
    fn inside_respects_rect_bounds() {
        let rect = Rect::new(2, 3, 4, 1);
        assert!(inside(2, 3, rect));
        assert!(inside(5, 3, rect));
        assert!(!inside(6, 3, rect));
        assert!(!inside(2, 4, rect));
    }
}
