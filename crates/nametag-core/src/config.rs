// ── Runtime settings ──
//
// Everything the core reads from configuration. The config crate builds a
// `Settings` from TOML + env and hands it in; core never reads files for it.
// Settings live behind a swappable handle so a reload is visible to every
// service on its next call.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

pub const DEFAULT_TAG_PREFIX: &str = "nametag.tags.";
pub const DEFAULT_ADMIN_NODE: &str = "nametag.admin";
pub const DEFAULT_MESSAGE_PREFIX: &str = "&7[&bNametag&7]&f";

/// Settings consumed by the core services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Prepended (plus a space) to every outgoing message.
    pub prefix: String,
    pub permission: PermissionSettings,
    pub command: CommandTemplates,
    pub debug: DebugSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_MESSAGE_PREFIX.into(),
            permission: PermissionSettings::default(),
            command: CommandTemplates::default(),
            debug: DebugSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionSettings {
    /// Prefix every tag id is appended to when deriving its permission key.
    pub tag_prefix: String,
    /// Node gating every administrative subcommand.
    pub admin: String,
}

impl Default for PermissionSettings {
    fn default() -> Self {
        Self {
            tag_prefix: DEFAULT_TAG_PREFIX.into(),
            admin: DEFAULT_ADMIN_NODE.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugSettings {
    /// Log every tag loaded from the backing store.
    pub enabled: bool,
    /// Log every command handed to the external executor.
    pub log_commands: bool,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            log_commands: true,
        }
    }
}

// ── Command templates ───────────────────────────────────────────────

/// Names of the configured template lists.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum TemplateKey {
    AddPermission,
    RemovePermission,
    RemovePermissionAll,
    #[strum(serialize = "settag")]
    SetTag,
    Remove,
}

/// Ordered command templates, one list per [`TemplateKey`].
///
/// Placeholders: `{player}`, `{tag}` and `{display}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandTemplates {
    pub add_permission: Vec<String>,
    pub remove_permission: Vec<String>,
    pub remove_permission_all: Vec<String>,
    pub settag: Vec<String>,
    pub remove: Vec<String>,
}

impl CommandTemplates {
    pub fn get(&self, key: TemplateKey) -> &[String] {
        match key {
            TemplateKey::AddPermission => &self.add_permission,
            TemplateKey::RemovePermission => &self.remove_permission,
            TemplateKey::RemovePermissionAll => &self.remove_permission_all,
            TemplateKey::SetTag => &self.settag,
            TemplateKey::Remove => &self.remove,
        }
    }
}

impl Default for CommandTemplates {
    fn default() -> Self {
        Self {
            add_permission: vec!["lp user {player} permission set {tag} true".into()],
            remove_permission: vec!["lp user {player} permission unset {tag}".into()],
            remove_permission_all: vec!["lp bulkupdate all delete \"permission == {tag}\"".into()],
            settag: vec!["lp user {player} meta setprefix 100 \"{tag}\"".into()],
            remove: vec!["lp user {player} meta removeprefix 100".into()],
        }
    }
}

// ── SettingsHandle ──────────────────────────────────────────────────

/// Shared, atomically replaceable view of the current [`Settings`].
#[derive(Clone)]
pub struct SettingsHandle {
    inner: Arc<ArcSwap<Settings>>,
}

impl SettingsHandle {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(settings)),
        }
    }

    /// Snapshot of the settings in force right now.
    pub fn current(&self) -> Arc<Settings> {
        self.inner.load_full()
    }

    pub fn replace(&self, settings: Settings) {
        self.inner.store(Arc::new(settings));
    }
}

impl Default for SettingsHandle {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl fmt::Debug for SettingsHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SettingsHandle")
            .field(&*self.current())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn template_keys_use_config_names() {
        let names: Vec<String> = TemplateKey::iter().map(|k| k.to_string()).collect();
        assert_eq!(
            names,
            [
                "add_permission",
                "remove_permission",
                "remove_permission_all",
                "settag",
                "remove"
            ]
        );
        assert_eq!("settag".parse::<TemplateKey>().ok(), Some(TemplateKey::SetTag));
    }

    #[test]
    fn handle_replace_is_visible_to_clones() {
        let handle = SettingsHandle::default();
        let clone = handle.clone();

        let mut next = Settings::default();
        next.permission.tag_prefix = "other.".into();
        handle.replace(next);

        assert_eq!(clone.current().permission.tag_prefix, "other.");
    }

    #[test]
    fn log_commands_defaults_on() {
        let settings = Settings::default();
        assert!(!settings.debug.enabled);
        assert!(settings.debug.log_commands);
    }
}
