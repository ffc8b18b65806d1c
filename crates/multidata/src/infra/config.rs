//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::model::Orientation;

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".multidata/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub table: TableSettings,
}

/// Where the session record lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "SessionSettings::default_file")]
    pub file: PathBuf,
}

impl SessionSettings {
    fn default_file() -> PathBuf {
        PathBuf::from("infile.json")
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            file: Self::default_file(),
        }
    }
}

/// Defaults for the plain-text table writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSettings {
    #[serde(default = "TableSettings::default_file")]
    pub file: String,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default = "TableSettings::default_min_width")]
    pub min_width: usize,
}

impl TableSettings {
    fn default_file() -> String {
        "infile.dat".into()
    }

    fn default_min_width() -> usize {
        16
    }
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            file: Self::default_file(),
            orientation: Orientation::Row,
            min_width: Self::default_min_width(),
        }
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    session_file: Option<String>,
    table_file: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            session_file: env::var("MULTIDATA_SESSION_FILE").ok(),
            table_file: env::var("MULTIDATA_TABLE_FILE").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(session_file: &str, table_file: &str) -> Self {
        Self {
            session_file: Some(session_file.to_owned()),
            table_file: Some(table_file.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            session: merge_session(self.session, other.session),
            table: merge_table(self.table, other.table),
        }
    }
}

fn merge_session(base: SessionSettings, overlay: SessionSettings) -> SessionSettings {
    SessionSettings {
        file: if overlay.file != SessionSettings::default_file() {
            overlay.file
        } else {
            base.file
        },
    }
}

fn merge_table(base: TableSettings, overlay: TableSettings) -> TableSettings {
    TableSettings {
        file: if overlay.file != TableSettings::default_file() {
            overlay.file
        } else {
            base.file
        },
        orientation: if overlay.orientation != Orientation::default() {
            overlay.orientation
        } else {
            base.orientation
        },
        min_width: if overlay.min_width != TableSettings::default_min_width() {
            overlay.min_width
        } else {
            base.min_width
        },
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("multidata/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir().context("unable to determine working directory")?;
    Ok(Some(cwd.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(session_file) = env.session_file {
        config.session.file = PathBuf::from(session_file);
    }
    if let Some(table_file) = env.table_file {
        config.table.file = table_file;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_uses_defaults_when_no_files() {
        let config = Config::load_with_layers(None, None, EnvOverrides::default())
            .expect("load default config");
        assert_eq!(config.session.file, PathBuf::from("infile.json"));
        assert_eq!(config.table.file, "infile.dat");
        assert_eq!(config.table.orientation, Orientation::Row);
        assert_eq!(config.table.min_width, 16);
    }

    #[test]
    fn merge_global_and_workspace() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("config.toml");
        fs::write(
            &global,
            r#"
[session]
file = "runs/last.json"
[table]
min_width = 24
"#,
        )?;

        let workspace_dir = temp.path().join("project");
        fs::create_dir_all(workspace_dir.join(".multidata"))?;
        fs::write(
            workspace_dir.join(".multidata/config.toml"),
            r#"
[table]
file = "series.dat"
orientation = "column"
"#,
        )?;

        let global_path = Some(global);
        let workspace_path = Some(workspace_dir.join(".multidata/config.toml"));

        let config =
            Config::load_with_layers(global_path, workspace_path, EnvOverrides::default())?;

        assert_eq!(config.session.file, PathBuf::from("runs/last.json"));
        assert_eq!(config.table.file, "series.dat");
        assert_eq!(config.table.orientation, Orientation::Column);
        assert_eq!(config.table.min_width, 24);

        Ok(())
    }

    #[test]
    fn env_overrides_take_precedence() -> Result<()> {
        let overrides = EnvOverrides::for_tests("state.yaml", "out.txt");
        let config = Config::load_with_layers(None, None, overrides)?;
        assert_eq!(config.session.file, PathBuf::from("state.yaml"));
        assert_eq!(config.table.file, "out.txt");
        Ok(())
    }

    #[test]
    fn invalid_config_returns_error() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let file = temp.path().join("broken.toml");
        fs::write(&file, "this is not toml")?;
        let result = Config::from_file(&file);
        assert!(result.is_err());
        Ok(())
    }
}
