// ── Messages ──
//
// Localized text lookup (`MessageCatalog`), delivery (`Messenger`) and the
// `Notifier` gluing them together with the configured prefix.

use std::sync::Arc;

use crate::config::SettingsHandle;
use crate::model::CommandSender;

/// Resolves a dotted message path to display text.
///
/// Implementations replace `{key}` placeholders and return a visible
/// error string for unknown paths instead of failing.
pub trait MessageCatalog: Send + Sync {
    fn message(&self, path: &str, placeholders: &[(&str, &str)]) -> String;
}

/// Delivers rendered text to a sender.
pub trait Messenger: Send + Sync {
    fn send(&self, to: &CommandSender, text: &str);
}

/// Replace every `{key}` token in `template`.
pub fn fill(template: &str, placeholders: &[(&str, &str)]) -> String {
    placeholders
        .iter()
        .fold(template.to_owned(), |acc, (key, value)| {
            acc.replace(&format!("{{{key}}}"), value)
        })
}

#[derive(Clone)]
pub struct Notifier {
    catalog: Arc<dyn MessageCatalog>,
    messenger: Arc<dyn Messenger>,
    settings: SettingsHandle,
}

impl Notifier {
    pub fn new(
        catalog: Arc<dyn MessageCatalog>,
        messenger: Arc<dyn Messenger>,
        settings: SettingsHandle,
    ) -> Self {
        Self {
            catalog,
            messenger,
            settings,
        }
    }

    /// Unprefixed text, for titles and item labels.
    pub fn text(&self, path: &str, placeholders: &[(&str, &str)]) -> String {
        self.catalog.message(path, placeholders)
    }

    /// Send `prefix + " " + message` to `to`.
    pub fn notify(&self, to: &CommandSender, path: &str, placeholders: &[(&str, &str)]) {
        let body = self.catalog.message(path, placeholders);
        let line = format!("{} {body}", self.settings.current().prefix);
        self.messenger.send(to, &line);
    }

    pub fn set_catalog(&mut self, catalog: Arc<dyn MessageCatalog>) {
        self.catalog = catalog;
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier").finish_non_exhaustive()
    }
}
