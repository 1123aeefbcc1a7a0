//! Configuration for nametag.
//!
//! TOML settings layered with figment, the YAML-file tag store and the
//! language catalogs. The CLI resolves paths and turns a [`Config`] into
//! the core's [`Settings`].

mod language;
mod yaml_store;

pub use language::{bundled_languages, LanguageCatalog, DEFAULT_LANGUAGE};
pub use yaml_store::{YamlStore, DEFAULT_TAGS};

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use nametag_core::{
    CommandTemplates, DebugSettings, PermissionSettings, Settings,
    config::DEFAULT_MESSAGE_PREFIX,
};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("failed to parse {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Prepended to every message sent to players and the console.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Language code; selects `lang_<code>.yml`.
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub permission: PermissionSettings,

    /// Command templates run against the permission backend.
    #[serde(default)]
    pub command: CommandTemplates,

    #[serde(default)]
    pub debug: DebugSettings,

    #[serde(default)]
    pub files: Files,

    #[serde(default)]
    pub executor: ExecutorConfig,

    #[serde(default)]
    pub players: PlayersConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            language: default_language(),
            permission: PermissionSettings::default(),
            command: CommandTemplates::default(),
            debug: DebugSettings::default(),
            files: Files::default(),
            executor: ExecutorConfig::default(),
            players: PlayersConfig::default(),
        }
    }
}

fn default_prefix() -> String {
    DEFAULT_MESSAGE_PREFIX.into()
}
fn default_language() -> String {
    DEFAULT_LANGUAGE.into()
}

impl Config {
    /// The subset the core services read.
    pub fn to_settings(&self) -> Settings {
        Settings {
            prefix: self.prefix.clone(),
            permission: self.permission.clone(),
            command: self.command.clone(),
            debug: self.debug.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Files {
    /// Directory for the tag and language files. Defaults to the
    /// directory holding the config file.
    pub data_dir: Option<PathBuf>,

    /// Tag file, relative to the data directory.
    #[serde(default = "default_tags_file")]
    pub tags_file: PathBuf,
}

impl Default for Files {
    fn default() -> Self {
        Self {
            data_dir: None,
            tags_file: default_tags_file(),
        }
    }
}

fn default_tags_file() -> PathBuf {
    PathBuf::from("tags.yml")
}

/// How templated commands reach the permission backend.
///
/// Templates are split into words and run without a shell. `program` and
/// `args`, when set, are placed in front of every command's words.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExecutorConfig {
    /// Launcher each command is handed to, e.g. an RCON client.
    #[serde(default)]
    pub program: Option<String>,

    /// Arguments placed between the launcher and the command words.
    #[serde(default)]
    pub args: Vec<String>,

    /// Command whose exit status answers a permission query. Placeholders:
    /// `{player}`, `{permission}`.
    pub permission_check: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlayersConfig {
    /// Command printing one online player name per line.
    pub roster_command: Option<String>,
}

// ── Paths ───────────────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "nametag", "nametag").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("nametag");
    p
}

/// Directory holding the tag and language files.
pub fn data_dir(cfg: &Config, config_file: &Path) -> PathBuf {
    match &cfg.files.data_dir {
        Some(dir) => dir.clone(),
        None => config_file
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
    }
}

pub fn tags_path(cfg: &Config, config_file: &Path) -> PathBuf {
    data_dir(cfg, config_file).join(&cfg.files.tags_file)
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load the Config from defaults, the TOML file at `path` and
/// `NAMETAG_`-prefixed environment variables (`__` separates sections).
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("NAMETAG_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default(path: &Path) -> Config {
    load_config(path).unwrap_or_default()
}

// ── Saving ──────────────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(cfg.debug.log_commands);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
language = "zh_TW"

[permission]
tag_prefix = "ranks."

[command]
settag = ["say {player} {tag}", "log {display}"]
"#,
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.language, "zh_TW");
        assert_eq!(cfg.permission.tag_prefix, "ranks.");
        assert_eq!(cfg.permission.admin, "nametag.admin");
        assert_eq!(cfg.command.settag.len(), 2);
        assert_eq!(cfg.command.remove, CommandTemplates::default().remove);

        let settings = cfg.to_settings();
        assert_eq!(settings.permission.tag_prefix, "ranks.");
    }

    #[test]
    fn save_then_load_keeps_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.executor.program = Some("rcon-cli".into());
        cfg.executor.args = vec!["--port".into(), "25575".into()];
        cfg.executor.permission_check = Some("check {player} {permission}".into());
        cfg.players.roster_command = Some("cat players.txt".into());

        save_config(&cfg, &path).unwrap();
        assert_eq!(load_config(&path).unwrap(), cfg);
    }

    #[test]
    fn executor_runs_commands_directly_by_default() {
        let cfg = Config::default();
        assert_eq!(cfg.executor.program, None);
        assert!(cfg.executor.args.is_empty());
    }

    #[test]
    fn data_dir_defaults_next_to_config() {
        let cfg = Config::default();
        let file = Path::new("/srv/nametag/config.toml");
        assert_eq!(data_dir(&cfg, file), PathBuf::from("/srv/nametag"));
        assert_eq!(tags_path(&cfg, file), PathBuf::from("/srv/nametag/tags.yml"));
    }
}
