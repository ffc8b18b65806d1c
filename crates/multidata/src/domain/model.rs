//! Domain models for selections and extracted series.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::errors::ConfigError;

/// Title used whenever a label cannot be resolved.
pub const UNKNOWN_TITLE: &str = "unknown";

/// Direction along which series are read from a tokenized file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Row,
    Column,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Row => "row",
            Orientation::Column => "column",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "c" | "col" | "column" => Ok(Orientation::Column),
            "r" | "row" => Ok(Orientation::Row),
            _ => Err(ConfigError::UnsupportedOrientation(value.trim().to_string())),
        }
    }
}

/// Strategy for deriving the title of each extracted series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum LabelMode {
    /// Token taken from the file itself.
    #[default]
    Inline,
    /// Base name of the file the series came from.
    Filename,
    /// Looked up in the titles of a previously recorded session.
    External,
}

impl From<LabelMode> for u8 {
    fn from(value: LabelMode) -> Self {
        match value {
            LabelMode::Inline => 0,
            LabelMode::Filename => 1,
            LabelMode::External => 2,
        }
    }
}

impl TryFrom<u8> for LabelMode {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LabelMode::Inline),
            1 => Ok(LabelMode::Filename),
            2 => Ok(LabelMode::External),
            other => Err(ConfigError::InvalidLabelMode(other.to_string())),
        }
    }
}

impl FromStr for LabelMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        trimmed
            .parse::<u8>()
            .map_err(|_| ConfigError::InvalidLabelMode(trimmed.to_string()))
            .and_then(LabelMode::try_from)
    }
}

/// Fully resolved description of one clause of a configuration string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub files: Vec<PathBuf>,
    #[serde(rename = "type")]
    pub orientation: Orientation,
    #[serde(rename = "ranges")]
    pub indices: Vec<usize>,
    pub label_mode: LabelMode,
    pub skip_head: usize,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            orientation: Orientation::Row,
            indices: Vec::new(),
            label_mode: LabelMode::Inline,
            skip_head: 1,
        }
    }
}

/// Whether the plain-text table is written.
///
/// Stored records are read leniently: only `on` (any case) or `true` switches the table on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    On,
    #[default]
    Off,
}

impl Toggle {
    pub fn is_on(&self) -> bool {
        matches!(self, Toggle::On)
    }
}

impl FromStr for Toggle {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "on" => Ok(Toggle::On),
            "off" => Ok(Toggle::Off),
            other => Err(ConfigError::InvalidOption(format!("txt={other}"))),
        }
    }
}

impl<'de> Deserialize<'de> for Toggle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ToggleVisitor;

        impl Visitor<'_> for ToggleVisitor {
            type Value = Toggle;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a txt switch")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Toggle, E> {
                Ok(value.parse().unwrap_or(Toggle::Off))
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<Toggle, E> {
                Ok(if value { Toggle::On } else { Toggle::Off })
            }

            fn visit_i64<E: de::Error>(self, _: i64) -> Result<Toggle, E> {
                Ok(Toggle::Off)
            }

            fn visit_u64<E: de::Error>(self, _: u64) -> Result<Toggle, E> {
                Ok(Toggle::Off)
            }

            fn visit_f64<E: de::Error>(self, _: f64) -> Result<Toggle, E> {
                Ok(Toggle::Off)
            }

            fn visit_unit<E: de::Error>(self) -> Result<Toggle, E> {
                Ok(Toggle::Off)
            }
        }

        deserializer.deserialize_any(ToggleVisitor)
    }
}

/// Output options given as `key=value` segments of a configuration string.
///
/// Missing keys take their defaults when a record is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteOptions {
    pub txt: Toggle,
    pub name: String,
    #[serde(rename = "type", deserialize_with = "lenient_orientation")]
    pub orientation: Orientation,
    /// Unrecognized keys, kept so they survive a save/load cycle.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl WriteOptions {
    pub fn new(name: impl Into<String>, orientation: Orientation) -> Self {
        Self {
            txt: Toggle::Off,
            name: name.into(),
            orientation,
            extra: BTreeMap::new(),
        }
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self::new("infile.dat", Orientation::Row)
    }
}

/// Stored table orientations fall back to rows when the token is not recognized.
fn lenient_orientation<'de, D>(deserializer: D) -> Result<Orientation, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.parse().unwrap_or_default())
}

/// Titles and series extracted in lock-step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    titles: Vec<String>,
    contents: Vec<Vec<String>>,
}

impl Extraction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one titled series.
    pub fn push(&mut self, title: impl Into<String>, series: Vec<String>) {
        self.titles.push(title.into());
        self.contents.push(series);
    }

    /// Append every series of `other`, preserving order.
    pub fn extend(&mut self, other: Extraction) {
        self.titles.extend(other.titles);
        self.contents.extend(other.contents);
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn contents(&self) -> &[Vec<String>] {
        &self.contents
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Iterate over `(title, series)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.titles
            .iter()
            .map(String::as_str)
            .zip(self.contents.iter().map(Vec::as_slice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_accepts_aliases_in_any_case() {
        for alias in ["c", "col", "Column", "COL"] {
            assert_eq!(alias.parse::<Orientation>().unwrap(), Orientation::Column);
        }
        for alias in ["r", "row", "ROW"] {
            assert_eq!(alias.parse::<Orientation>().unwrap(), Orientation::Row);
        }
    }

    #[test]
    fn orientation_rejects_unknown_tokens() {
        let err = "diagonal".parse::<Orientation>().unwrap_err();
        assert_eq!(err, ConfigError::UnsupportedOrientation("diagonal".into()));
    }

    #[test]
    fn label_mode_round_trips_through_integers() {
        assert_eq!(" 2 ".parse::<LabelMode>().unwrap(), LabelMode::External);
        assert_eq!(u8::from(LabelMode::Filename), 1);
        assert!("3".parse::<LabelMode>().is_err());
        assert!("x".parse::<LabelMode>().is_err());
    }

    #[test]
    fn toggle_reads_any_stored_value() {
        let read = |raw: &str| serde_json::from_str::<Toggle>(raw).unwrap();
        assert_eq!(read(r#""on""#), Toggle::On);
        assert_eq!(read(r#""ON""#), Toggle::On);
        assert_eq!(read(r#""yes""#), Toggle::Off);
        assert_eq!(read("true"), Toggle::On);
        assert_eq!(read("1"), Toggle::Off);
        assert_eq!(serde_json::to_string(&Toggle::On).unwrap(), r#""on""#);
        assert!("yes".parse::<Toggle>().is_err());
    }

    #[test]
    fn write_options_fill_missing_keys_with_defaults() {
        let options: WriteOptions =
            serde_json::from_str(r#"{"txt": "yes", "type": "diagonal", "note": "kept"}"#)
                .unwrap();
        assert_eq!(options.txt, Toggle::Off);
        assert_eq!(options.name, "infile.dat");
        assert_eq!(options.orientation, Orientation::Row);
        assert_eq!(options.extra.get("note").map(String::as_str), Some("kept"));

        let empty: WriteOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, WriteOptions::default());
    }

    #[test]
    fn extraction_keeps_titles_and_contents_aligned() {
        let mut first = Extraction::new();
        first.push("a", vec!["1".into()]);
        let mut second = Extraction::new();
        second.push("b", Vec::new());
        first.extend(second);

        assert_eq!(first.len(), 2);
        assert_eq!(first.titles(), ["a", "b"]);
        assert_eq!(first.contents().len(), first.titles().len());
        let pairs: Vec<_> = first.iter().collect();
        assert_eq!(pairs[1], ("b", &[][..]));
    }
}
