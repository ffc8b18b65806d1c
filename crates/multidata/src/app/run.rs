//! Configure and reload runs over a session record.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::app::clause::parse_input;
use crate::app::extract::{ExternalTitles, Extractor, TitleCursor};
use crate::app::session::{SessionRecord, SessionStore};
use crate::app::table::TableWriter;
use crate::domain::errors::MissingSessionError;
use crate::domain::model::{Extraction, LabelMode, Selection, WriteOptions};
use crate::infra::config::Config;

/// Paths and defaults a run needs, usually derived from [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Directory that relative session and table paths resolve against.
    pub root: PathBuf,
    pub session_file: PathBuf,
    pub default_options: WriteOptions,
    pub min_width: usize,
}

impl RunSettings {
    pub fn from_config(root: impl Into<PathBuf>, config: &Config) -> Self {
        Self {
            root: root.into(),
            session_file: config.session.file.clone(),
            default_options: WriteOptions::new(
                config.table.file.clone(),
                config.table.orientation,
            ),
            min_width: config.table.min_width,
        }
    }

    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

/// Which kind of run produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Configure,
    Reload,
}

/// Result of a run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub mode: RunMode,
    pub extraction: Extraction,
    /// The record that was saved (configure) or replayed (reload).
    pub record: SessionRecord,
    pub table_path: Option<PathBuf>,
}

/// Drives extraction runs against one session file.
#[derive(Debug)]
pub struct Session {
    settings: RunSettings,
    store: SessionStore,
    extractor: Extractor,
}

impl Session {
    pub fn new(settings: RunSettings) -> Self {
        let store = SessionStore::new(settings.resolve(&settings.session_file));
        Self {
            settings,
            store,
            extractor: Extractor::new(),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Configure from `input` when it carries any text, otherwise replay the stored session.
    pub fn run(&self, input: Option<&str>) -> Result<RunOutcome> {
        match input.map(str::trim) {
            Some(text) if !is_blank_input(text) => self.configure(text),
            _ => self.reload(),
        }
    }

    /// Parse `input`, extract every clause, then overwrite the session record.
    ///
    /// Every clause is parsed before any file is read, so an invalid clause leaves the previous
    /// record untouched.
    pub fn configure(&self, input: &str) -> Result<RunOutcome> {
        let parsed = parse_input(input, &self.settings.default_options)?;
        let selections = parsed.selections()?;
        tracing::info!(clauses = selections.len(), "configuring session");

        let external = self.previous_titles(&selections);
        let extraction = self.extract_all(selections.iter(), &external)?;

        let record = SessionRecord::new(
            selections,
            parsed.options,
            extraction.titles().iter().cloned(),
        );
        self.store.save(&record)?;

        let table_path = self.write_table(&record.write_text, &extraction)?;
        Ok(RunOutcome {
            mode: RunMode::Configure,
            extraction,
            record,
            table_path,
        })
    }

    /// Replay every stored selection that names files. Fails when no record exists.
    pub fn reload(&self) -> Result<RunOutcome> {
        let record = self.store.load()?.ok_or_else(|| MissingSessionError {
            path: self.store.path().to_path_buf(),
        })?;

        let extraction = self.extract_all(record.replayable(), &record.titles)?;
        let table_path = self.write_table(&record.write_text, &extraction)?;
        Ok(RunOutcome {
            mode: RunMode::Reload,
            extraction,
            record,
            table_path,
        })
    }

    /// Titles of the stored record, read only when some clause labels externally.
    ///
    /// An unreadable record degrades to no titles, so every external label becomes unknown.
    fn previous_titles(&self, selections: &[Selection]) -> ExternalTitles {
        if !selections
            .iter()
            .any(|selection| selection.label_mode == LabelMode::External)
        {
            return ExternalTitles::new();
        }

        match self.store.load() {
            Ok(previous) => previous.map(|record| record.titles).unwrap_or_default(),
            Err(err) => {
                tracing::warn!(
                    path = %self.store.path().display(),
                    error = %format!("{err:#}"),
                    "ignoring unreadable session record"
                );
                ExternalTitles::new()
            }
        }
    }

    fn extract_all<'a>(
        &self,
        selections: impl Iterator<Item = &'a Selection>,
        external: &ExternalTitles,
    ) -> Result<Extraction> {
        let mut cursor = TitleCursor::new(external);
        let mut extraction = Extraction::new();
        for selection in selections {
            extraction.extend(self.extractor.extract(selection, &mut cursor)?);
        }
        Ok(extraction)
    }

    fn write_table(
        &self,
        options: &WriteOptions,
        extraction: &Extraction,
    ) -> Result<Option<PathBuf>> {
        if !options.txt.is_on() {
            return Ok(None);
        }

        let path = self.settings.resolve(Path::new(&options.name));
        TableWriter::new(options.orientation)
            .with_min_width(self.settings.min_width)
            .write(extraction, &path)?;
        Ok(Some(path))
    }
}

fn is_blank_input(text: &str) -> bool {
    matches!(text, "" | "''" | "\"\"")
}
