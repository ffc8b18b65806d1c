//! Session persistence utilities.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::app::extract::ExternalTitles;
use crate::domain::model::{Selection, WriteOptions};

const WRITE_TEXT_KEY: &str = "write_text";
const TITLES_KEY: &str = "titles";
const CONFIGURATION_PREFIX: &str = "configuration[";
const TITLE_PREFIX: &str = "title_";

/// Everything a configuring run resolved, persisted so later runs can replay it.
///
/// Serialized as a flat map: `configuration[1]`, `configuration[2]`, ... in numeric order, then
/// `write_text`, then `titles` holding `title_0`, `title_1`, ...
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionRecord {
    /// Resolved selections keyed by 1-based clause position.
    pub configurations: BTreeMap<usize, Selection>,
    pub write_text: WriteOptions,
    /// Titles keyed by 0-based running position.
    pub titles: ExternalTitles,
}

impl SessionRecord {
    /// Build a record from selections in clause order and titles in extraction order.
    pub fn new(
        selections: impl IntoIterator<Item = Selection>,
        write_text: WriteOptions,
        titles: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            configurations: selections
                .into_iter()
                .enumerate()
                .map(|(idx, selection)| (idx + 1, selection))
                .collect(),
            write_text,
            titles: titles.into_iter().enumerate().collect(),
        }
    }

    /// Stored selections that still name at least one file, in clause order.
    pub fn replayable(&self) -> impl Iterator<Item = &Selection> {
        self.configurations
            .values()
            .filter(|selection| !selection.files.is_empty())
    }
}

impl Serialize for SessionRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.configurations.len() + 2))?;
        for (position, selection) in &self.configurations {
            map.serialize_entry(&format!("{CONFIGURATION_PREFIX}{position}]"), selection)?;
        }
        map.serialize_entry(WRITE_TEXT_KEY, &self.write_text)?;
        map.serialize_entry(TITLES_KEY, &TitlesRef(&self.titles))?;
        map.end()
    }
}

struct TitlesRef<'a>(&'a ExternalTitles);

impl Serialize for TitlesRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (position, title) in self.0 {
            map.serialize_entry(&format!("{TITLE_PREFIX}{position}"), title)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SessionRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = SessionRecord;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a session record map")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut record = SessionRecord::default();

        while let Some(key) = access.next_key::<String>()? {
            if key == WRITE_TEXT_KEY {
                record.write_text = access.next_value()?;
            } else if key == TITLES_KEY {
                let raw: BTreeMap<String, String> = access.next_value()?;
                record.titles = raw
                    .into_iter()
                    .filter_map(|(key, title)| match title_position(&key) {
                        Some(position) => Some((position, title)),
                        None => {
                            tracing::debug!(%key, "ignoring malformed title key");
                            None
                        }
                    })
                    .collect();
            } else if let Some(position) = configuration_position(&key) {
                let selection: Selection = access.next_value()?;
                if record.configurations.insert(position, selection).is_some() {
                    return Err(de::Error::custom(format!("duplicate key '{key}'")));
                }
            } else {
                tracing::debug!(%key, "ignoring unknown session key");
                access.next_value::<IgnoredAny>()?;
            }
        }

        Ok(record)
    }
}

fn configuration_position(key: &str) -> Option<usize> {
    key.strip_prefix(CONFIGURATION_PREFIX)?
        .strip_suffix(']')?
        .parse()
        .ok()
}

fn title_position(key: &str) -> Option<usize> {
    key.strip_prefix(TITLE_PREFIX)?.parse().ok()
}

/// Storage format for session records.
pub trait SessionCodec: fmt::Debug + Send + Sync {
    fn encode(&self, record: &SessionRecord) -> Result<String>;
    fn decode(&self, data: &str) -> Result<SessionRecord>;
}

/// Pretty JSON with four-space indentation.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl SessionCodec for JsonCodec {
    fn encode(&self, record: &SessionRecord) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        record
            .serialize(&mut serializer)
            .context("failed to serialize session record")?;
        buf.push(b'\n');
        String::from_utf8(buf).context("session record is not valid UTF-8")
    }

    fn decode(&self, data: &str) -> Result<SessionRecord> {
        serde_json::from_str(data).context("invalid JSON session record")
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct YamlCodec;

impl SessionCodec for YamlCodec {
    fn encode(&self, record: &SessionRecord) -> Result<String> {
        serde_yaml::to_string(record).context("failed to serialize session record")
    }

    fn decode(&self, data: &str) -> Result<SessionRecord> {
        serde_yaml::from_str(data).context("invalid YAML session record")
    }
}

/// Pick a codec from the file extension; anything but `.yaml`/`.yml` is JSON.
pub fn codec_for_path(path: &Path) -> Box<dyn SessionCodec> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            Box::new(YamlCodec)
        }
        _ => Box::new(JsonCodec),
    }
}

/// Persists the session record to a single file.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    codec: Box<dyn SessionCodec>,
}

impl SessionStore {
    /// Create a store at `path`, choosing the codec from its extension.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let codec = codec_for_path(&path);
        Self { path, codec }
    }

    pub fn with_codec(path: impl Into<PathBuf>, codec: Box<dyn SessionCodec>) -> Self {
        Self {
            path: path.into(),
            codec,
        }
    }

    /// Location of the persisted session file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the most recently persisted record.
    pub fn load(&self) -> Result<Option<SessionRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read session file at {}", self.path.display()))?;
        let record = self
            .codec
            .decode(&data)
            .with_context(|| format!("invalid session data in {}", self.path.display()))?;
        tracing::info!(
            path = %self.path.display(),
            configurations = record.configurations.len(),
            titles = record.titles.len(),
            "loaded session"
        );
        Ok(Some(record))
    }

    /// Persist the record, replacing any previous one and creating parent directories as needed.
    pub fn save(&self, record: &SessionRecord) -> Result<()> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create session directory {}", dir.display()))?;
        }

        let data = self.codec.encode(record)?;
        fs::write(&self.path, data)
            .with_context(|| format!("failed to write session file to {}", self.path.display()))?;
        tracing::info!(path = %self.path.display(), "saved session");
        Ok(())
    }
}
