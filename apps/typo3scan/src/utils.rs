//! Supporting helpers: the stderr error prefix and source line excerpts.

use owo_colors::OwoColorize;
use std::fs::File;
use std::io::{BufRead, BufReader, IsTerminal};
use std::path::Path;

fn use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
}

pub fn error_prefix() -> String {
    if use_colors() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

fn read_lines(path: &Path) -> Option<impl Iterator<Item = String>> {
    match File::open(path) {
        Ok(f) => Some(BufReader::new(f).lines().map_while(Result::ok)),
        Err(e) => {
            log::debug!("cannot open {}: {}", path.display(), e);
            None
        }
    }
}

/// Trimmed text of 1-based `line` in `path`, or `""` when unavailable.
pub fn line_from_file(path: &Path, line: usize) -> String {
    if line == 0 {
        return String::new();
    }
    read_lines(path)
        .and_then(|mut lines| lines.nth(line - 1))
        .map(|l| l.trim().to_string())
        .unwrap_or_default()
}

/// Trimmed lines around 1-based `line`, joined by newlines.
///
/// The window always spans `before + after + 1` lines starting at
/// `line - 1 - before` (clamped to the first line), so excerpts near the top
/// of a file show more trailing context instead of shrinking.
pub fn lines_from_file(path: &Path, line: usize, before: usize, after: usize) -> String {
    let start = line.saturating_sub(1).saturating_sub(before);
    let len = before.saturating_add(after).saturating_add(1);
    match read_lines(path) {
        Some(lines) => lines
            .skip(start)
            .take(len)
            .map(|l| l.trim().to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn source() -> (tempfile::TempDir, std::path::PathBuf) {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("Foo.php");
        std::fs::write(&p, "<?php\n  $a = 1;\n  $b = 2;\n  $c = 3;\n  $d = 4;\n  $e = 5;\n").unwrap();
        (tmp, p)
    }

    #[test]
    fn test_line_from_file() {
        let (_tmp, p) = source();
        assert_eq!(line_from_file(&p, 1), "<?php");
        assert_eq!(line_from_file(&p, 3), "$b = 2;");
        assert_eq!(line_from_file(&p, 99), "");
        assert_eq!(line_from_file(&p, 0), "");
        assert_eq!(line_from_file(Path::new("/no/such/file.php"), 1), "");
    }

    #[test]
    fn test_lines_from_file_window() {
        let (_tmp, p) = source();
        assert_eq!(lines_from_file(&p, 4, 1, 1), "$b = 2;\n$c = 3;\n$d = 4;");
        // clamped at the top: window keeps its size
        assert_eq!(lines_from_file(&p, 1, 2, 2), "<?php\n$a = 1;\n$b = 2;\n$c = 3;\n$d = 4;");
        // clipped at the bottom
        assert_eq!(lines_from_file(&p, 6, 0, 5), "$e = 5;");
    }

    #[test]
    fn test_lines_from_file_huge_window_is_clamped() {
        let (_tmp, p) = source();
        let all = "<?php\n$a = 1;\n$b = 2;\n$c = 3;\n$d = 4;\n$e = 5;";
        assert_eq!(lines_from_file(&p, 1, usize::MAX, 0), all);
        assert_eq!(lines_from_file(&p, 1, usize::MAX, usize::MAX), all);
        assert_eq!(lines_from_file(&p, usize::MAX, 0, 0), "");
    }
}
