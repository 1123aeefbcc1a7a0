// ── Language catalogs ──
//
// Messages live in `lang_<code>.yml` inside the data directory. Bundled
// languages are written out on first use, and keys added in newer
// releases are merged into existing files.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tracing::{info, warn};

use nametag_core::message::fill;
use nametag_core::MessageCatalog;

use crate::yaml_store::{read_mapping, write_atomic};
use crate::ConfigError;

pub const DEFAULT_LANGUAGE: &str = "en_US";

const BUNDLED: &[(&str, &str)] = &[
    ("en_US", include_str!("../lang/en_US.yml")),
    ("zh_TW", include_str!("../lang/zh_TW.yml")),
];

/// Codes of the languages shipped with the binary.
pub fn bundled_languages() -> impl Iterator<Item = &'static str> {
    BUNDLED.iter().map(|(code, _)| *code)
}

fn bundled_text(code: &str) -> Option<&'static str> {
    BUNDLED
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, text)| *text)
}

fn parse(text: &str) -> Mapping {
    serde_yaml::from_str(text).unwrap_or_default()
}

pub fn file_name(code: &str) -> String {
    format!("lang_{code}.yml")
}

#[derive(Debug, Clone)]
pub struct LanguageCatalog {
    language: String,
    messages: Mapping,
    path: Option<PathBuf>,
}

impl LanguageCatalog {
    /// In-memory catalog from the bundled files only.
    pub fn bundled(language: &str) -> Self {
        let (code, text) = match bundled_text(language) {
            Some(text) => (language, text),
            None => {
                warn!(language, "unknown language, using {DEFAULT_LANGUAGE}");
                (DEFAULT_LANGUAGE, bundled_text(DEFAULT_LANGUAGE).unwrap_or_default())
            }
        };
        Self {
            language: code.to_owned(),
            messages: parse(text),
            path: None,
        }
    }

    /// Load `lang_<language>.yml` from `dir`, writing or updating it from
    /// the bundled copy as needed.
    ///
    /// A language that is neither bundled nor present on disk falls back
    /// to [`DEFAULT_LANGUAGE`].
    pub fn load(dir: &Path, language: &str) -> Result<Self, ConfigError> {
        let on_disk = dir.join(file_name(language)).exists();
        let code = if bundled_text(language).is_some() || on_disk {
            language
        } else {
            warn!(language, "no language file found, using {DEFAULT_LANGUAGE}");
            DEFAULT_LANGUAGE
        };
        let path = dir.join(file_name(code));
        let defaults = bundled_text(code);

        if !path.exists() {
            fs::create_dir_all(dir)?;
            write_atomic(&path, defaults.unwrap_or_default())?;
            info!(path = %path.display(), "wrote language file");
        }

        let mut messages = read_mapping(&path)?;
        if let Some(defaults) = defaults {
            let added = merge_missing(&mut messages, &parse(defaults));
            if added > 0 {
                let content = serde_yaml::to_string(&messages).map_err(|source| {
                    ConfigError::Yaml {
                        path: path.clone(),
                        source,
                    }
                })?;
                write_atomic(&path, &content)?;
                info!(path = %path.display(), added, "language file updated");
            }
        }

        Ok(Self {
            language: code.to_owned(),
            messages,
            path: Some(path),
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn raw(&self, path: &str) -> Option<&str> {
        let mut parts = path.split('.');
        let mut node = self.messages.get(parts.next()?)?;
        for part in parts {
            node = node.as_mapping()?.get(part)?;
        }
        node.as_str()
    }
}

/// Copy keys present in `defaults` but absent from `target`. Returns the
/// number of entries added.
fn merge_missing(target: &mut Mapping, defaults: &Mapping) -> usize {
    let mut added = 0;
    for (key, default) in defaults {
        match target.get_mut(key) {
            None => {
                target.insert(key.clone(), default.clone());
                added += 1;
            }
            Some(Value::Mapping(existing)) => {
                if let Value::Mapping(nested) = default {
                    added += merge_missing(existing, nested);
                }
            }
            Some(_) => {}
        }
    }
    added
}

impl MessageCatalog for LanguageCatalog {
    fn message(&self, path: &str, placeholders: &[(&str, &str)]) -> String {
        match self.raw(path) {
            Some(template) => fill(template, placeholders),
            None => format!("&cMissing message: {path}"),
        }
    }
}
