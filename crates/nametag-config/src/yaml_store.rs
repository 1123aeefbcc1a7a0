// ── YAML-file key-value store ──
//
// Backs the tag repository with a YAML document on disk. Mapping keys are
// normalized to strings on read so numeric ids address like any other.
// Saves go through a temp file and an atomic rename.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use nametag_core::{CoreError, KeyValueStore};

use crate::ConfigError;

/// Written when the tag file does not exist yet.
pub const DEFAULT_TAGS: &str = include_str!("../resources/tags.yml");

const MAX_TEMP_ATTEMPTS: u32 = 100;

#[derive(Debug)]
pub struct YamlStore {
    path: PathBuf,
    root: Mapping,
}

impl YamlStore {
    /// Open `path`, seeding it with the bundled default tags if missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            write_atomic(&path, DEFAULT_TAGS)?;
            debug!(path = %path.display(), "seeded default tag file");
        }
        let root = read_mapping(&path)?;
        Ok(Self { path, root })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lookup(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut node = self.root.get(parts.next()?)?;
        for part in parts {
            node = node.as_mapping()?.get(part)?;
        }
        Some(node)
    }
}

pub(crate) fn read_mapping(path: &Path) -> Result<Mapping, ConfigError> {
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Mapping::new());
    }
    let value: Value = serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    match normalize(value) {
        Value::Mapping(m) => Ok(m),
        Value::Null => Ok(Mapping::new()),
        _ => Err(ConfigError::Validation {
            field: path.display().to_string(),
            reason: "top level must be a mapping".into(),
        }),
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn normalize(value: Value) -> Value {
    match value {
        Value::Mapping(m) => Value::Mapping(
            m.into_iter()
                .filter_map(|(k, v)| Some((Value::String(scalar_string(&k)?), normalize(v))))
                .collect(),
        ),
        other => other,
    }
}

pub(crate) fn set_path(root: &mut Mapping, path: &str, value: Option<&str>) {
    let mut parts: Vec<&str> = path.split('.').collect();
    let Some(leaf) = parts.pop() else {
        return;
    };

    let mut section = root;
    for part in parts {
        if value.is_none() && !section.contains_key(part) {
            return;
        }
        let entry = section
            .entry(Value::String(part.to_owned()))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        if !entry.is_mapping() {
            *entry = Value::Mapping(Mapping::new());
        }
        let Value::Mapping(next) = entry else {
            return;
        };
        section = next;
    }

    match value {
        Some(v) => {
            section.insert(Value::String(leaf.to_owned()), Value::String(v.to_owned()));
        }
        None => {
            section.shift_remove(leaf);
        }
    }
}

impl KeyValueStore for YamlStore {
    fn child_keys(&self, path: &str) -> Option<Vec<String>> {
        let section = self.lookup(path)?.as_mapping()?;
        Some(section.keys().filter_map(scalar_string).collect())
    }

    fn get_string(&self, path: &str) -> Option<String> {
        scalar_string(self.lookup(path)?)
    }

    fn set(&mut self, path: &str, value: Option<&str>) {
        set_path(&mut self.root, path, value);
    }

    fn save(&mut self) -> Result<(), CoreError> {
        let content = serde_yaml::to_string(&self.root).map_err(|e| CoreError::store(e.to_string()))?;
        write_atomic(&self.path, &content).map_err(|e| CoreError::store(e.to_string()))
    }

    fn reload(&mut self) -> Result<(), CoreError> {
        self.root = read_mapping(&self.path).map_err(|e| CoreError::store(e.to_string()))?;
        Ok(())
    }
}

// ── Atomic write ────────────────────────────────────────────────────

/// Replace `path` with `content` via a sibling temp file and rename.
pub(crate) fn write_atomic(path: &Path, content: &str) -> Result<(), ConfigError> {
    let parent = path.parent().ok_or_else(|| ConfigError::Validation {
        field: path.display().to_string(),
        reason: "path has no parent directory".into(),
    })?;
    let (mut file, temp_path) = create_temp_file(parent, path)?;

    let written = file
        .write_all(content.as_bytes())
        .and_then(|()| file.sync_all())
        .and_then(|()| fs::rename(&temp_path, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    #[cfg(unix)]
    {
        if let Err(e) = fs::File::open(parent).and_then(|dir| dir.sync_all()) {
            warn!(dir = %parent.display(), error = %e, "directory sync failed");
        }
    }

    Ok(())
}

fn create_temp_file(parent: &Path, path: &Path) -> Result<(fs::File, PathBuf), ConfigError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ConfigError::Validation {
            field: path.display().to_string(),
            reason: "file name is not valid UTF-8".into(),
        })?;
    for attempt in 0..MAX_TEMP_ATTEMPTS {
        let temp_path = parent.join(format!(".{name}.tmp.{}.{attempt}", std::process::id()));
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
        {
            Ok(file) => return Ok((file, temp_path)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e.into()),
        }
    }
    Err(ConfigError::Validation {
        field: path.display().to_string(),
        reason: "could not create a temp file".into(),
    })
}
