// ── Command dispatch ──
//
// Turns a template plus substitutions into a concrete command line and
// hands it to the executor. Submission is synchronous and ordered; a
// failing command is logged and the caller carries on.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{SettingsHandle, TemplateKey};
use crate::error::CoreError;

pub const PLAYER: &str = "player";
pub const TAG: &str = "tag";
pub const DISPLAY: &str = "display";

/// Executor that runs one fully substituted command.
pub trait CommandSink: Send + Sync {
    fn dispatch(&self, command: &str) -> Result<(), CoreError>;

    /// Run `template` with `subs` applied. Sinks that tokenize commands
    /// override this to substitute per word; the default renders the text.
    fn dispatch_template(&self, template: &str, subs: &Substitutions) -> Result<(), CoreError> {
        self.dispatch(&subs.apply(template))
    }
}

impl<T: CommandSink + ?Sized> CommandSink for &T {
    fn dispatch(&self, command: &str) -> Result<(), CoreError> {
        (**self).dispatch(command)
    }

    fn dispatch_template(&self, template: &str, subs: &Substitutions) -> Result<(), CoreError> {
        (**self).dispatch_template(template, subs)
    }
}

// ── Substitutions ───────────────────────────────────────────────────

/// Ordered `{key}` → value replacements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    pairs: Vec<(String, String)>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// Replace every `{key}` in order. Unknown placeholders are left as-is.
    pub fn apply(&self, template: &str) -> String {
        self.pairs
            .iter()
            .fold(template.to_owned(), |acc, (key, value)| {
                acc.replace(&format!("{{{key}}}"), value)
            })
    }
}

// ── Dispatcher ──────────────────────────────────────────────────────

/// Narrow submission capability shared by the delegation services.
#[derive(Clone)]
pub struct Dispatcher {
    sink: Arc<dyn CommandSink>,
    settings: SettingsHandle,
}

impl Dispatcher {
    pub fn new(sink: Arc<dyn CommandSink>, settings: SettingsHandle) -> Self {
        Self { sink, settings }
    }

    /// Substitute and submit one template. Failures never reach the caller.
    pub fn submit(&self, template: &str, subs: &Substitutions) {
        let command = subs.apply(template);
        if self.settings.current().debug.log_commands {
            info!(command = %command, "dispatching command");
        }
        if let Err(e) = self.sink.dispatch_template(template, subs) {
            warn!(command = %command, error = %e, "command failed");
        }
    }

    /// Submit every template configured under `key`, in order.
    ///
    /// Templates are read at call time so a settings reload applies to the
    /// very next submission. Returns how many commands were submitted.
    pub fn submit_all(&self, key: TemplateKey, subs: &Substitutions) -> usize {
        let settings = self.settings.current();
        let templates = settings.command.get(key);
        for template in templates {
            self.submit(template, subs);
        }
        templates.len()
    }

    pub fn settings(&self) -> &SettingsHandle {
        &self.settings
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}
