// ── Composition root ──
//
// `TagSystem` owns every stateful piece (repository cache inside the
// orchestrator, menu sessions) and wires the services to a `Backend`.
// Hosts feed it commands and menu events from a single control thread.

use std::fmt::Display;
use std::sync::Arc;

use tracing::{info, warn};

use crate::backend::{PermissionAuthority, PlayerDirectory};
use crate::config::{Settings, SettingsHandle};
use crate::context::Context;
use crate::dispatch::{CommandSink, Dispatcher};
use crate::menu::{Click, ClickOutcome, MenuPresenter, SelectionMenu, UiHandle};
use crate::message::{MessageCatalog, Messenger, Notifier};
use crate::model::{CommandSender, Player};
use crate::orchestrator::TagOrchestrator;
use crate::router::{self, CommandRouter, RouteOutcome};
use crate::service::{CommandDisplayService, CommandPermissionService};
use crate::store::{KeyValueStore, StoreTagRepository};

/// Everything the system needs from its host.
pub struct Backend {
    pub store: Box<dyn KeyValueStore>,
    pub sink: Arc<dyn CommandSink>,
    pub authority: Arc<dyn PermissionAuthority>,
    pub players: Arc<dyn PlayerDirectory>,
    pub catalog: Arc<dyn MessageCatalog>,
    pub messenger: Arc<dyn Messenger>,
    pub presenter: Arc<dyn MenuPresenter>,
}

/// Result of the `reload` administrative command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminOutcome {
    NoPermission,
    Usage,
    Reloaded,
    ReloadFailed,
    UnknownSubcommand,
}

pub struct TagSystem {
    settings: SettingsHandle,
    tags: TagOrchestrator,
    router: CommandRouter,
    menu: SelectionMenu,
    authority: Arc<dyn PermissionAuthority>,
    players: Arc<dyn PlayerDirectory>,
    notifier: Notifier,
}

/// Borrow the pieces a handler needs as a [`Context`].
macro_rules! context {
    ($self:ident, $settings:ident) => {
        Context {
            tags: &mut $self.tags,
            players: &*$self.players,
            authority: &*$self.authority,
            notifier: &$self.notifier,
            settings: &$settings,
            refusal: None,
        }
    };
}

impl TagSystem {
    pub fn new(settings: Settings, backend: Backend) -> Self {
        let settings = SettingsHandle::new(settings);
        let dispatcher = Dispatcher::new(backend.sink, settings.clone());

        let repository = StoreTagRepository::new(backend.store, settings.clone());
        let permissions =
            CommandPermissionService::new(dispatcher.clone(), backend.authority.clone());
        let display = CommandDisplayService::new(dispatcher);
        let tags = TagOrchestrator::new(
            Box::new(repository),
            Box::new(permissions),
            Box::new(display),
        );

        let notifier = Notifier::new(backend.catalog, backend.messenger, settings.clone());
        info!(tags = tags.all_tags().len(), "tag system ready");

        Self {
            settings,
            tags,
            router: CommandRouter::standard(),
            menu: SelectionMenu::new(backend.presenter),
            authority: backend.authority,
            players: backend.players,
            notifier,
        }
    }

    // ── Entry points ─────────────────────────────────────────────────

    /// Run one `/tag` invocation. A bare invocation by a player opens the
    /// selection menu.
    pub fn execute(&mut self, sender: &CommandSender, args: &[String]) -> RouteOutcome {
        let settings = self.settings.current();
        let mut ctx = context!(self, settings);
        let outcome = self.router.route(&mut ctx, sender, args);
        if let RouteOutcome::OpenMenu(player) = &outcome {
            self.menu.open_menu(&ctx, player);
        }
        outcome
    }

    /// Completion candidates for a partial `/tag` invocation.
    pub fn complete(&self, sender: &CommandSender, args: &[String]) -> Vec<String> {
        if !self.is_admin(sender) {
            return Vec::new();
        }
        router::complete(&self.tags, &*self.players, args)
    }

    pub fn handle_click(&mut self, click: &Click) -> ClickOutcome {
        let settings = self.settings.current();
        let ctx = context!(self, settings);
        self.menu.handle_click(&ctx, click)
    }

    pub fn handle_close(&mut self, player: &Player, handle: UiHandle) {
        self.menu.handle_close(player, handle);
    }

    pub fn handle_disconnect(&mut self, player: &Player) {
        self.menu.handle_disconnect(player);
    }

    // ── Reload ───────────────────────────────────────────────────────

    /// Swap in new settings and catalog, then reload the repository.
    pub fn reload(&mut self, settings: Settings, catalog: Option<Arc<dyn MessageCatalog>>) {
        self.settings.replace(settings);
        if let Some(catalog) = catalog {
            self.notifier.set_catalog(catalog);
        }
        self.tags.reload();
        info!(tags = self.tags.all_tags().len(), "tag system reloaded");
    }

    /// The `<label> reload` administrative command.
    ///
    /// `loader` is only called for an authorized `reload`.
    pub fn execute_admin<E, F>(
        &mut self,
        sender: &CommandSender,
        label: &str,
        args: &[String],
        loader: F,
    ) -> AdminOutcome
    where
        E: Display,
        F: FnOnce() -> Result<(Settings, Arc<dyn MessageCatalog>), E>,
    {
        if !self.is_admin(sender) {
            self.notify(sender, "error.no_permission", &[]);
            return AdminOutcome::NoPermission;
        }
        let Some(sub) = args.first() else {
            self.notify(sender, "reload.usage", &[("label", label)]);
            return AdminOutcome::Usage;
        };
        if !sub.eq_ignore_ascii_case("reload") {
            self.notify(sender, "error.unknown_subcommand", &[("command", sub.as_str())]);
            return AdminOutcome::UnknownSubcommand;
        }

        match loader() {
            Ok((settings, catalog)) => {
                self.reload(settings, Some(catalog));
                self.notify(sender, "reload.success", &[]);
                AdminOutcome::Reloaded
            }
            Err(e) => {
                warn!(error = %e, "reload failed");
                let error = e.to_string();
                self.notify(sender, "reload.failed", &[("error", error.as_str())]);
                AdminOutcome::ReloadFailed
            }
        }
    }

    /// Completion for the administrative command.
    pub fn complete_admin(&self, sender: &CommandSender, args: &[String]) -> Vec<String> {
        match args {
            [first] if self.is_admin(sender) && "reload".starts_with(&first.to_lowercase()) => {
                vec!["reload".to_owned()]
            }
            _ => Vec::new(),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn notify(&self, to: &CommandSender, path: &str, placeholders: &[(&str, &str)]) {
        self.notifier.notify(to, path, placeholders);
    }

    pub fn is_admin(&self, sender: &CommandSender) -> bool {
        match sender {
            CommandSender::Console => true,
            CommandSender::Player(p) => self
                .authority
                .has_permission(p, &self.settings.current().permission.admin),
        }
    }

    pub fn tags(&self) -> &TagOrchestrator {
        &self.tags
    }

    pub fn tags_mut(&mut self) -> &mut TagOrchestrator {
        &mut self.tags
    }

    pub fn menu(&self) -> &SelectionMenu {
        &self.menu
    }

    pub fn players(&self) -> &dyn PlayerDirectory {
        &*self.players
    }

    pub fn settings(&self) -> Arc<Settings> {
        self.settings.current()
    }
}

impl std::fmt::Debug for TagSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagSystem")
            .field("tags", &self.tags)
            .field("router", &self.router)
            .field("menu", &self.menu)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::menu::ItemKind;
    use crate::store::MemoryStore;
    use crate::testing::{args, EchoCatalog, Fakes};
    use pretty_assertions::assert_eq;

    fn console() -> CommandSender {
        CommandSender::Console
    }

    #[test]
    fn beta_lifecycle_leaves_grant_in_place() {
        let (mut system, fakes) = Fakes::system(MemoryStore::new());
        fakes.directory.add_online("Pat");
        let pat = Player::new("Pat");

        system.execute(&console(), &args(&["create", "beta", "&7[&bBeta&7]&f"]));
        let beta = system.tags().find_tag("beta").unwrap();
        assert_eq!(beta.permission(), "nametag.tags.beta");

        system.execute(&console(), &args(&["Pat", "add", "beta"]));
        assert!(system.tags().has_permission(&pat, &beta));

        // Deleting through the orchestrator alone never revokes.
        assert!(system.tags_mut().delete_tag("beta"));
        assert!(system.tags().all_tags().is_empty());
        assert!(system.tags().has_permission(&pat, &beta));
    }

    #[test]
    fn remove_command_revokes_through_the_backend() {
        let (mut system, fakes) = Fakes::system(MemoryStore::new());
        fakes.directory.add_online("Pat");
        system.execute(&console(), &args(&["create", "beta", "&bBeta"]));
        system.execute(&console(), &args(&["Pat", "add", "beta"]));
        let beta = system.tags().find_tag("beta").unwrap();

        system.execute(&console(), &args(&["remove", "beta"]));

        assert!(system.tags().find_tag("beta").is_none());
        assert!(!system.tags().has_permission(&Player::new("Pat"), &beta));
    }

    #[test]
    fn bare_player_invocation_opens_menu() {
        let (mut system, fakes) = Fakes::system(MemoryStore::with_tags([("vip", "&6VIP")]));
        fakes.permissions.grant("Pat", "nametag.tags.vip");
        let pat = Player::new("Pat");

        let outcome = system.execute(&pat.clone().into(), &[]);

        assert_eq!(outcome, RouteOutcome::OpenMenu(pat.clone()));
        assert!(system.menu().is_open(&pat));

        let handle = fakes.presenter.opened().pop().unwrap();
        let click = Click {
            player: pat.clone(),
            handle,
            slot: Some(0),
            item: Some(ItemKind::Tag),
        };
        assert!(matches!(
            system.handle_click(&click),
            ClickOutcome::Selected { applied: true, .. }
        ));
        assert_eq!(
            fakes.sink_commands(),
            vec![
                "lp user Pat meta removeprefix 100",
                "lp user Pat meta setprefix 100 \"&6VIP\"",
            ]
        );
        assert!(!system.menu().is_open(&pat));
    }

    #[test]
    fn menu_with_nothing_to_show_stays_closed() {
        let (mut system, fakes) = Fakes::system(MemoryStore::with_tags([("vip", "&6VIP")]));
        let pat = Player::new("Pat");
        system.execute(&pat.clone().into(), &[]);
        assert!(!system.menu().is_open(&pat));
        assert!(fakes.presenter.opened().is_empty());
        assert!(system.menu().snapshot(&pat).is_none());
        assert_eq!(fakes.messages_for(&pat.into()), vec!["menu.no_tags"]);
    }

    #[test]
    fn completion_requires_admin() {
        let (system, fakes) = Fakes::system(MemoryStore::with_tags([("vip", "&6VIP")]));
        let pat: CommandSender = Player::new("Pat").into();
        assert!(system.complete(&pat, &args(&["re"])).is_empty());

        fakes.permissions.grant("Pat", "nametag.admin");
        assert_eq!(system.complete(&pat, &args(&["re"])), vec!["remove"]);
        assert_eq!(system.complete_admin(&pat, &args(&["RE"])), vec!["reload"]);
    }

    #[test]
    fn reload_command_paths() {
        let (mut system, fakes) = Fakes::system(MemoryStore::with_tags([("vip", "&6VIP")]));
        let pat: CommandSender = Player::new("Pat").into();
        let ok = || -> Result<_, String> {
            let mut settings = Settings::default();
            settings.permission.tag_prefix = "ranks.".into();
            Ok((settings, Arc::new(EchoCatalog) as Arc<dyn MessageCatalog>))
        };

        assert_eq!(
            system.execute_admin(&pat, "nametag", &args(&["reload"]), ok),
            AdminOutcome::NoPermission
        );
        assert_eq!(
            system.execute_admin(&console(), "nametag", &[], ok),
            AdminOutcome::Usage
        );
        assert_eq!(
            system.execute_admin(&console(), "nametag", &args(&["bogus"]), ok),
            AdminOutcome::UnknownSubcommand
        );
        assert_eq!(
            system.execute_admin(&console(), "nametag", &args(&["Reload"]), ok),
            AdminOutcome::Reloaded
        );
        assert_eq!(
            system.tags().find_tag("vip").unwrap().permission(),
            "ranks.vip"
        );
        assert_eq!(
            system.execute_admin(&console(), "nametag", &args(&["reload"]), || {
                Err::<(Settings, Arc<dyn MessageCatalog>), _>("bad toml")
            }),
            AdminOutcome::ReloadFailed
        );

        assert_eq!(
            fakes.messages_for(&console()),
            vec![
                "reload.usage label=nametag",
                "error.unknown_subcommand command=bogus",
                "reload.success",
                "reload.failed error=bad toml",
            ]
        );
    }
}
