//! Filesystem helpers for loading tokenized text files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Read every line of `path` into memory.
///
/// The handle is released before returning. Line terminators (`\n` or `\r\n`) are stripped.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read data file {}", path.display()))?;
    Ok(data.lines().map(str::to_owned).collect())
}

/// Split a line into whitespace-separated tokens.
pub fn tokens(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_lines_without_terminators() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("data.txt");
        fs::write(&path, "a 1\r\nb 2\n\n")?;

        let lines = read_lines(&path)?;
        assert_eq!(lines, vec!["a 1", "b 2", ""]);
        Ok(())
    }

    #[test]
    fn empty_file_has_no_lines() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("empty.txt");
        fs::write(&path, "")?;
        assert!(read_lines(&path)?.is_empty());
        Ok(())
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_lines(Path::new("does/not/exist.txt")).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.txt"));
    }

    #[test]
    fn tokens_split_on_any_whitespace() {
        assert_eq!(tokens("  x\t y  z "), vec!["x", "y", "z"]);
        assert!(tokens("   ").is_empty());
    }
}
