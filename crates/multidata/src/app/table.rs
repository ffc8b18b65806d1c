//! Plain-text table rendering of extracted series.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::model::{Extraction, Orientation};

/// Default lower bound for the column width.
pub const DEFAULT_MIN_WIDTH: usize = 16;

/// Renders titles and series as a left-aligned, space separated table.
#[derive(Debug, Clone, Copy)]
pub struct TableWriter {
    orientation: Orientation,
    min_width: usize,
}

impl Default for TableWriter {
    fn default() -> Self {
        Self::new(Orientation::Row)
    }
}

impl TableWriter {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            min_width: DEFAULT_MIN_WIDTH,
        }
    }

    pub fn with_min_width(mut self, min_width: usize) -> Self {
        self.min_width = min_width;
        self
    }

    /// Column width: the longest title, but never less than the configured minimum.
    pub fn width(&self, extraction: &Extraction) -> usize {
        extraction
            .titles()
            .iter()
            .map(|title| title.chars().count())
            .max()
            .unwrap_or(0)
            .max(self.min_width)
    }

    /// Render the table. An extraction without series renders as an empty string.
    pub fn render(&self, extraction: &Extraction) -> String {
        if extraction.is_empty() {
            return String::new();
        }

        let width = self.width(extraction);
        match self.orientation {
            Orientation::Row => render_rows(extraction, width),
            Orientation::Column => render_columns(extraction, width),
        }
    }

    /// Render and write the table to `path`, creating parent directories as needed.
    pub fn write(&self, extraction: &Extraction, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create table directory: {}", parent.display())
            })?;
        }

        fs::write(path, self.render(extraction))
            .with_context(|| format!("failed to write table to {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            series = extraction.len(),
            orientation = %self.orientation,
            "wrote table"
        );
        Ok(())
    }
}

fn render_rows(extraction: &Extraction, width: usize) -> String {
    let mut out = String::new();
    for (title, series) in extraction.iter() {
        out.push_str(&format!("{title:<width$} {}\n", series.join(" ")));
    }
    out
}

fn render_columns(extraction: &Extraction, width: usize) -> String {
    let header: Vec<String> = extraction
        .titles()
        .iter()
        .map(|title| format!("{title:<width$}"))
        .collect();
    let mut out = header.join(" ");
    out.push('\n');

    let depth = extraction.contents().iter().map(Vec::len).max().unwrap_or(0);
    for row in 0..depth {
        let cells: Vec<String> = extraction
            .contents()
            .iter()
            .map(|series| match series.get(row) {
                Some(token) => format!("{token:<width$}"),
                None => " ".repeat(width),
            })
            .collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out
}
