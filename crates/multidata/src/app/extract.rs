//! Row and column extraction from whitespace-tokenized files.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;

use crate::domain::model::{Extraction, LabelMode, Orientation, Selection, UNKNOWN_TITLE};
use crate::infra::fs::{read_lines, tokens};

/// Titles recorded by a previous session, keyed by their running position.
pub type ExternalTitles = BTreeMap<usize, String>;

/// Running title position shared by every clause and file of one session.
///
/// Each processed index advances the cursor by exactly one, so external titles line up only when
/// clauses, files and indices are traversed in the order they were recorded.
#[derive(Debug, Clone)]
pub struct TitleCursor<'a> {
    position: usize,
    external: &'a ExternalTitles,
}

impl<'a> TitleCursor<'a> {
    pub fn new(external: &'a ExternalTitles) -> Self {
        Self::starting_at(0, external)
    }

    pub fn starting_at(position: usize, external: &'a ExternalTitles) -> Self {
        Self { position, external }
    }

    /// Current position, i.e. the number of indices processed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    fn advance(&mut self) -> usize {
        let current = self.position;
        self.position += 1;
        current
    }

    fn lookup(&self, position: usize) -> Option<&'a str> {
        self.external.get(&position).map(String::as_str)
    }
}

/// Reads the files of a [`Selection`] and produces titled series.
#[derive(Debug, Default, Clone, Copy)]
pub struct Extractor;

impl Extractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract every selected series from every matched file, in file order.
    pub fn extract(
        &self,
        selection: &Selection,
        cursor: &mut TitleCursor<'_>,
    ) -> Result<Extraction> {
        let mut extraction = Extraction::new();

        for path in &selection.files {
            let lines = read_lines(path)?;
            if lines.is_empty() {
                tracing::debug!(path = %path.display(), "skipping empty file");
                continue;
            }
            self.extract_file(selection, path, &lines, cursor, &mut extraction);
        }

        Ok(extraction)
    }

    fn extract_file(
        &self,
        selection: &Selection,
        path: &Path,
        lines: &[String],
        cursor: &mut TitleCursor<'_>,
        out: &mut Extraction,
    ) {
        let rows: Vec<Vec<&str>> = lines.iter().map(|line| tokens(line)).collect();
        let indices = self.indices_for(selection, path, &rows);

        for index in indices {
            let position = cursor.advance();
            let title = match selection.label_mode {
                LabelMode::Inline => inline_title(selection.orientation, &rows, index),
                LabelMode::Filename => file_name(path),
                LabelMode::External => match cursor.lookup(position) {
                    Some(title) => title.to_string(),
                    None => {
                        tracing::warn!(
                            key = %format!("title_{position}"),
                            path = %path.display(),
                            "no recorded title"
                        );
                        UNKNOWN_TITLE.to_string()
                    }
                },
            };
            let series = match selection.orientation {
                Orientation::Column => column_series(&rows, index, selection.skip_head),
                Orientation::Row => row_series(&rows, index, selection.skip_head),
            };
            out.push(title, series);
        }
    }

    /// Indices to visit for one file: the selection's own list, or the file's full extent.
    fn indices_for(&self, selection: &Selection, path: &Path, rows: &[Vec<&str>]) -> Vec<usize> {
        if !selection.indices.is_empty() {
            return selection.indices.clone();
        }

        let extent = match selection.orientation {
            Orientation::Column => rows.iter().map(Vec::len).max().unwrap_or(0),
            Orientation::Row => rows.len(),
        };
        tracing::debug!(path = %path.display(), extent, "auto-detected range");
        (0..extent).collect()
    }
}

fn inline_title(orientation: Orientation, rows: &[Vec<&str>], index: usize) -> String {
    let token = match orientation {
        Orientation::Column => rows.first().and_then(|header| header.get(index)),
        Orientation::Row => rows.get(index).and_then(|row| row.first()),
    };
    token.map_or_else(|| UNKNOWN_TITLE.to_string(), |token| (*token).to_string())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn column_series(rows: &[Vec<&str>], index: usize, skip_head: usize) -> Vec<String> {
    rows.iter()
        .skip(skip_head)
        .filter_map(|row| row.get(index))
        .map(|token| (*token).to_string())
        .collect()
}

fn row_series(rows: &[Vec<&str>], index: usize, skip_head: usize) -> Vec<String> {
    rows.get(index)
        .map(|row| row.iter().skip(skip_head).map(|token| (*token).to_string()).collect())
        .unwrap_or_default()
}
