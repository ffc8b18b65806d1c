//! Parsing configuration strings into selections and output options.

use std::path::PathBuf;

use glob::MatchOptions;

use crate::app::range::parse_range;
use crate::domain::errors::ConfigError;
use crate::domain::model::{LabelMode, Orientation, Selection, WriteOptions};

const CLAUSE_SEPARATOR: char = ';';
const FIELD_SEPARATOR: char = ',';
const OPTION_SEPARATOR: char = '=';
const REQUIRED_FIELDS: usize = 3;

/// A configuration string split into extraction clauses and output options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInput {
    /// Raw clauses in the order they were written, blank ones included.
    pub clauses: Vec<String>,
    pub options: WriteOptions,
}

impl ParsedInput {
    /// Resolve every clause. Fails on the first invalid clause.
    pub fn selections(&self) -> Result<Vec<Selection>, ConfigError> {
        self.clauses
            .iter()
            .map(|clause| parse_clause(clause))
            .collect()
    }
}

/// Split `input` on `;`, separating `key=value` options from extraction clauses.
///
/// Options start from `defaults`; `txt`, `name` and `type` are interpreted and any other key is
/// kept verbatim in [`WriteOptions::extra`].
pub fn parse_input(input: &str, defaults: &WriteOptions) -> Result<ParsedInput, ConfigError> {
    let mut clauses = Vec::new();
    let mut options = defaults.clone();

    for segment in input.split(CLAUSE_SEPARATOR) {
        match segment.split_once(OPTION_SEPARATOR) {
            Some((key, value)) => apply_option(&mut options, key.trim(), value.trim())?,
            None => clauses.push(segment.trim().to_string()),
        }
    }

    Ok(ParsedInput { clauses, options })
}

fn apply_option(options: &mut WriteOptions, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "txt" => options.txt = value.parse()?,
        "name" => {
            if value.is_empty() {
                return Err(ConfigError::InvalidOption("name=".into()));
            }
            options.name = value.to_string();
        }
        "type" => options.orientation = value.parse()?,
        _ => {
            tracing::debug!(%key, %value, "storing unrecognized option");
            options.extra.insert(key.to_string(), value.to_string());
        }
    }
    Ok(())
}

/// Resolve one `glob,orientation,range[,label_mode[,skip_head]]` clause.
///
/// A blank clause yields [`Selection::default`], a placeholder that extracts nothing.
pub fn parse_clause(clause: &str) -> Result<Selection, ConfigError> {
    let clause = clause.trim();
    if clause.is_empty() {
        return Ok(Selection::default());
    }

    let fields: Vec<&str> = clause.split(FIELD_SEPARATOR).map(str::trim).collect();
    if fields.len() < REQUIRED_FIELDS {
        return Err(ConfigError::TooFewFields {
            clause: clause.to_string(),
        });
    }

    let orientation: Orientation = fields[1].parse()?;
    let indices = parse_range(fields[2])?;
    let label_mode = match fields.get(3).copied() {
        None | Some("") => LabelMode::default(),
        Some(raw) => raw.parse()?,
    };
    let skip_head = match fields.get(4).copied() {
        None | Some("") => Selection::default().skip_head,
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidSkipHead(raw.to_string()))?,
    };
    let files = expand_glob(fields[0])?;

    Ok(Selection {
        files,
        orientation,
        indices,
        label_mode,
        skip_head,
    })
}

/// Expand a filesystem glob into regular files sorted by their string form.
///
/// Zero matches is not an error. Entries that cannot be read are logged and skipped.
pub fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>, ConfigError> {
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let entries = glob::glob_with(pattern, options).map_err(|err| ConfigError::InvalidGlob {
        pattern: pattern.to_string(),
        message: err.msg.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(path) => tracing::debug!(path = %path.display(), "skipping non-file glob match"),
            Err(err) => tracing::warn!(error = %err, "unreadable glob match"),
        }
    }
    files.sort_by(|a, b| a.to_string_lossy().cmp(&b.to_string_lossy()));

    tracing::debug!(%pattern, matches = files.len(), "expanded glob");
    Ok(files)
}
