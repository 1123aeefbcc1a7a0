// In-memory collaborators shared by the unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::backend::{PermissionAuthority, PlayerDirectory};
use crate::config::{Settings, SettingsHandle};
use crate::context::Context;
use crate::dispatch::{CommandSink, Dispatcher};
use crate::error::CoreError;
use crate::menu::{Click, ClickOutcome, MenuPresenter, MenuView, OpenOutcome, SelectionMenu, UiHandle};
use crate::message::{MessageCatalog, Messenger, Notifier};
use crate::model::{CommandSender, Player};
use crate::orchestrator::TagOrchestrator;
use crate::router::{CommandRouter, RouteOutcome};
use crate::service::{CommandDisplayService, CommandPermissionService};
use crate::store::{MemoryStore, StoreTagRepository};
use crate::system::{Backend, TagSystem};

pub fn args(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| (*t).to_owned()).collect()
}

// ── Sink ────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingSink {
    commands: Mutex<Vec<String>>,
    fail_prefix: Option<String>,
}

impl RecordingSink {
    pub fn failing_on(prefix: &str) -> Self {
        Self {
            fail_prefix: Some(prefix.to_owned()),
            ..Self::default()
        }
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

impl CommandSink for RecordingSink {
    fn dispatch(&self, command: &str) -> Result<(), CoreError> {
        self.commands.lock().unwrap().push(command.to_owned());
        match &self.fail_prefix {
            Some(prefix) if command.starts_with(prefix.as_str()) => Err(CoreError::Dispatch {
                command: command.to_owned(),
                reason: "scripted failure".into(),
            }),
            _ => Ok(()),
        }
    }
}

// ── Authority ───────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct ScriptedAuthority {
    grants: Mutex<HashSet<(String, String)>>,
}

impl ScriptedAuthority {
    pub fn grant(&self, player: &str, node: &str) {
        self.grants
            .lock()
            .unwrap()
            .insert((player.to_owned(), node.to_owned()));
    }

    pub fn revoke(&self, player: &str, node: &str) {
        self.grants
            .lock()
            .unwrap()
            .remove(&(player.to_owned(), node.to_owned()));
    }

    fn revoke_everywhere(&self, node: &str) {
        self.grants.lock().unwrap().retain(|(_, n)| n != node);
    }
}

impl PermissionAuthority for ScriptedAuthority {
    fn has_permission(&self, player: &Player, node: &str) -> bool {
        self.grants
            .lock()
            .unwrap()
            .contains(&(player.name().to_owned(), node.to_owned()))
    }
}

/// Authority that also executes the default `lp` templates, so grants
/// issued through commands become visible to later permission checks.
#[derive(Debug, Default)]
pub struct FakePermissionBackend {
    authority: ScriptedAuthority,
    sink: RecordingSink,
}

impl FakePermissionBackend {
    pub fn grant(&self, player: &str, node: &str) {
        self.authority.grant(player, node);
    }

    pub fn commands(&self) -> Vec<String> {
        self.sink.commands()
    }
}

impl CommandSink for FakePermissionBackend {
    fn dispatch(&self, command: &str) -> Result<(), CoreError> {
        self.sink.dispatch(command)?;
        let words: Vec<&str> = command.split_whitespace().collect();
        match words.as_slice() {
            ["lp", "user", player, "permission", "set", node, ..] => {
                self.authority.grant(player, node);
            }
            ["lp", "user", player, "permission", "unset", node] => {
                self.authority.revoke(player, node);
            }
            ["lp", "bulkupdate", "all", "delete", "\"permission", "==", node] => {
                self.authority.revoke_everywhere(node.trim_end_matches('"'));
            }
            _ => {}
        }
        Ok(())
    }
}

impl PermissionAuthority for FakePermissionBackend {
    fn has_permission(&self, player: &Player, node: &str) -> bool {
        self.authority.has_permission(player, node)
    }
}

// ── Directory ───────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct StaticDirectory {
    online: Mutex<Vec<Player>>,
}

impl StaticDirectory {
    pub fn add_online(&self, name: &str) {
        self.online.lock().unwrap().push(Player::new(name));
    }
}

impl PlayerDirectory for StaticDirectory {
    fn find_player(&self, name: &str) -> Option<Player> {
        self.online
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    fn online_players(&self) -> Vec<Player> {
        self.online.lock().unwrap().clone()
    }
}

// ── Messages ────────────────────────────────────────────────────────

/// Renders `path k=v ...` so assertions can see exactly what was asked for.
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoCatalog;

impl MessageCatalog for EchoCatalog {
    fn message(&self, path: &str, placeholders: &[(&str, &str)]) -> String {
        placeholders
            .iter()
            .fold(path.to_owned(), |acc, (k, v)| format!("{acc} {k}={v}"))
    }
}

#[derive(Debug, Default)]
pub struct RecordingMessenger {
    lines: Mutex<Vec<(CommandSender, String)>>,
}

impl RecordingMessenger {
    pub fn lines_for(&self, to: &CommandSender) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(sender, _)| sender == to)
            .map(|(_, line)| line.clone())
            .collect()
    }

    /// Lines for `to` with the message prefix removed.
    pub fn bodies_for(&self, to: &CommandSender, prefix: &str) -> Vec<String> {
        let strip = format!("{prefix} ");
        self.lines_for(to)
            .into_iter()
            .map(|line| line.strip_prefix(&strip).map(str::to_owned).unwrap_or(line))
            .collect()
    }
}

impl Messenger for RecordingMessenger {
    fn send(&self, to: &CommandSender, text: &str) {
        self.lines.lock().unwrap().push((to.clone(), text.to_owned()));
    }
}

// ── Presenter ───────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingPresenter {
    next: AtomicU64,
    views: Mutex<Vec<MenuView>>,
    opened: Mutex<Vec<UiHandle>>,
    closed: Mutex<Vec<UiHandle>>,
}

impl RecordingPresenter {
    pub fn views(&self) -> Vec<MenuView> {
        self.views.lock().unwrap().clone()
    }

    pub fn opened(&self) -> Vec<UiHandle> {
        self.opened.lock().unwrap().clone()
    }

    pub fn closed(&self) -> Vec<UiHandle> {
        self.closed.lock().unwrap().clone()
    }
}

impl MenuPresenter for RecordingPresenter {
    fn create(&self, _player: &Player, view: MenuView) -> UiHandle {
        self.views.lock().unwrap().push(view);
        UiHandle(self.next.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn open(&self, _player: &Player, handle: UiHandle) {
        self.opened.lock().unwrap().push(handle);
    }

    fn close(&self, _player: &Player, handle: UiHandle) {
        self.closed.lock().unwrap().push(handle);
    }
}

// ── Harness: services wired by hand ─────────────────────────────────

pub struct Harness {
    pub settings: SettingsHandle,
    pub orchestrator: TagOrchestrator,
    pub router: CommandRouter,
    pub menu: SelectionMenu,
    pub notifier: Notifier,
    pub sink: Arc<RecordingSink>,
    pub authority: Arc<ScriptedAuthority>,
    pub directory: Arc<StaticDirectory>,
    pub messenger: Arc<RecordingMessenger>,
    pub presenter: Arc<RecordingPresenter>,
}

impl Harness {
    pub fn new(store: MemoryStore) -> Self {
        let settings = SettingsHandle::default();
        let sink = Arc::new(RecordingSink::default());
        let authority = Arc::new(ScriptedAuthority::default());
        let directory = Arc::new(StaticDirectory::default());
        let messenger = Arc::new(RecordingMessenger::default());
        let presenter = Arc::new(RecordingPresenter::default());

        let dispatcher = Dispatcher::new(sink.clone(), settings.clone());
        let orchestrator = TagOrchestrator::new(
            Box::new(StoreTagRepository::new(Box::new(store), settings.clone())),
            Box::new(CommandPermissionService::new(dispatcher.clone(), authority.clone())),
            Box::new(CommandDisplayService::new(dispatcher)),
        );
        let notifier = Notifier::new(Arc::new(EchoCatalog), messenger.clone(), settings.clone());

        Self {
            settings,
            orchestrator,
            router: CommandRouter::standard(),
            menu: SelectionMenu::new(presenter.clone()),
            notifier,
            sink,
            authority,
            directory,
            messenger,
            presenter,
        }
    }

    pub fn route(&mut self, sender: &CommandSender, args: &[String]) -> RouteOutcome {
        let settings = self.settings.current();
        let mut ctx = Context {
            tags: &mut self.orchestrator,
            players: &*self.directory,
            authority: &*self.authority,
            notifier: &self.notifier,
            settings: &settings,
            refusal: None,
        };
        self.router.route(&mut ctx, sender, args)
    }

    pub fn open_menu(&mut self, player: &Player) -> OpenOutcome {
        let settings = self.settings.current();
        let ctx = Context {
            tags: &mut self.orchestrator,
            players: &*self.directory,
            authority: &*self.authority,
            notifier: &self.notifier,
            settings: &settings,
            refusal: None,
        };
        self.menu.open_menu(&ctx, player)
    }

    pub fn click(&mut self, click: &Click) -> ClickOutcome {
        let settings = self.settings.current();
        let ctx = Context {
            tags: &mut self.orchestrator,
            players: &*self.directory,
            authority: &*self.authority,
            notifier: &self.notifier,
            settings: &settings,
            refusal: None,
        };
        self.menu.handle_click(&ctx, click)
    }

    pub fn messages_for(&self, to: &CommandSender) -> Vec<String> {
        self.messenger
            .bodies_for(to, &self.settings.current().prefix)
    }
}

// ── Fakes: a full TagSystem over fake backends ──────────────────────

pub struct Fakes {
    pub permissions: Arc<FakePermissionBackend>,
    pub directory: Arc<StaticDirectory>,
    pub messenger: Arc<RecordingMessenger>,
    pub presenter: Arc<RecordingPresenter>,
}

impl Fakes {
    pub fn system(store: MemoryStore) -> (TagSystem, Self) {
        let fakes = Self {
            permissions: Arc::new(FakePermissionBackend::default()),
            directory: Arc::new(StaticDirectory::default()),
            messenger: Arc::new(RecordingMessenger::default()),
            presenter: Arc::new(RecordingPresenter::default()),
        };
        let backend = Backend {
            store: Box::new(store),
            sink: fakes.permissions.clone(),
            authority: fakes.permissions.clone(),
            players: fakes.directory.clone(),
            catalog: Arc::new(EchoCatalog),
            messenger: fakes.messenger.clone(),
            presenter: fakes.presenter.clone(),
        };
        (TagSystem::new(Settings::default(), backend), fakes)
    }

    pub fn sink_commands(&self) -> Vec<String> {
        self.permissions.commands()
    }

    pub fn messages_for(&self, to: &CommandSender) -> Vec<String> {
        self.messenger
            .bodies_for(to, crate::config::DEFAULT_MESSAGE_PREFIX)
    }
}
