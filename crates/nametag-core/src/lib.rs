//! Domain core for nametag: short-lived display tags backed by an external
//! permission authority.
//!
//! The crate never stores permissions or renders text itself. It talks to
//! the outside world through narrow ports and keeps only the tag cache and
//! the open-menu sessions in memory:
//!
//! - **[`Tag`]**: immutable id + display + derived permission key.
//!
//! - **[`TagRepository`]**: cache over a [`KeyValueStore`]; every write is
//!   persisted synchronously and reported as a `bool`.
//!
//! - **[`PermissionService`] / [`DisplayService`]**: turn tag operations
//!   into templated commands submitted, in order and fire-and-forget, to a
//!   [`CommandSink`]. Permission state is queried live from a
//!   [`PermissionAuthority`].
//!
//! - **[`TagOrchestrator`]**: facade composing the repository and both
//!   delegation services into player-facing operations.
//!
//! - **[`CommandRouter`]**: ordered chain of administrative handlers; first
//!   match wins, otherwise help is shown.
//!
//! - **[`SelectionMenu`]**: per-player grid session state machine driven by
//!   a [`MenuPresenter`].
//!
//! - **[`TagSystem`]**: composition root wiring everything above to a
//!   [`Backend`] and exposing the two entry points (commands and menu
//!   events). All of it runs on a single control thread; mutation goes
//!   through `&mut self`.

pub mod backend;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod menu;
pub mod message;
pub mod model;
pub mod orchestrator;
pub mod router;
pub mod service;
pub mod store;
pub mod system;

#[cfg(test)]
pub(crate) mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::{PermissionAuthority, PlayerDirectory};
pub use config::{
    CommandTemplates, DebugSettings, PermissionSettings, Settings, SettingsHandle, TemplateKey,
};
pub use context::Context;
pub use dispatch::{CommandSink, Dispatcher, Substitutions};
pub use error::CoreError;
pub use menu::{
    Click, ClickOutcome, ItemKind, MenuItem, MenuPresenter, MenuView, OpenOutcome,
    SelectionMenu, UiHandle,
};
pub use message::{MessageCatalog, Messenger, Notifier};
pub use model::{CommandSender, Player, Tag};
pub use orchestrator::TagOrchestrator;
pub use router::{CommandHandler, CommandRouter, Refusal, RouteOutcome};
pub use service::{
    CommandDisplayService, CommandPermissionService, DisplayService, PermissionService,
};
pub use store::{KeyValueStore, MemoryStore, StoreTagRepository, TagRepository};
pub use system::{AdminOutcome, Backend, TagSystem};
