// ── Handler context ──
//
// Borrowed view of the system handed to command handlers and the menu for
// the duration of one event.

use crate::backend::{PermissionAuthority, PlayerDirectory};
use crate::config::Settings;
use crate::message::Notifier;
use crate::model::CommandSender;
use crate::orchestrator::TagOrchestrator;
use crate::router::Refusal;

pub struct Context<'a> {
    pub tags: &'a mut TagOrchestrator,
    pub players: &'a dyn PlayerDirectory,
    pub authority: &'a dyn PermissionAuthority,
    pub notifier: &'a Notifier,
    pub settings: &'a Settings,
    /// Set by a handler that turned the invocation down.
    pub refusal: Option<Refusal>,
}

impl Context<'_> {
    /// Console always passes; players need the admin node.
    pub fn is_admin(&self, sender: &CommandSender) -> bool {
        match sender {
            CommandSender::Console => true,
            CommandSender::Player(p) => self
                .authority
                .has_permission(p, &self.settings.permission.admin),
        }
    }

    pub fn notify(&self, to: &CommandSender, path: &str, placeholders: &[(&str, &str)]) {
        self.notifier.notify(to, path, placeholders);
    }

    /// Tell `to` why the invocation is refused and record the reason.
    pub fn refuse(
        &mut self,
        refusal: Refusal,
        to: &CommandSender,
        path: &str,
        placeholders: &[(&str, &str)],
    ) {
        self.notify(to, path, placeholders);
        self.refusal = Some(refusal);
    }
}
