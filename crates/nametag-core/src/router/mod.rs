// ── Administrative command router ──
//
// `/tag` with no arguments opens the selection menu (players only). Every
// other form needs the admin node and is offered to the handlers in
// registration order; the first one that accepts the arguments wins.

mod completion;
mod create;
mod player;
mod remove;

pub use completion::complete;
pub use create::CreateHandler;
pub use player::PlayerTagHandler;
pub use remove::RemoveHandler;

use strum::Display;
use tracing::debug;

use crate::context::Context;
use crate::model::{CommandSender, Player};

/// One administrative subcommand.
pub trait CommandHandler: Send + Sync {
    /// Stable name used in logs and outcomes.
    fn name(&self) -> &'static str;

    fn can_handle(&self, args: &[String]) -> bool;

    /// Run the subcommand. Returns `true` once the invocation was consumed.
    fn handle(&self, ctx: &mut Context<'_>, sender: &CommandSender, args: &[String]) -> bool;
}

/// Why a handler turned an invocation down. The sender has been told.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Refusal {
    Usage,
    InvalidId,
    TagExists,
    TagNotFound,
    PlayerNotFound,
    UnknownAction,
    /// The store or the backend reported failure.
    Failed,
}

/// What the router did with one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Bare invocation by a player; the caller opens the menu.
    OpenMenu(Player),
    /// Bare invocation from the console.
    PlayerOnly,
    NoPermission,
    Handled {
        handler: &'static str,
        result: bool,
        refused: Option<Refusal>,
    },
    /// No handler matched; help was sent.
    Help,
}

pub struct CommandRouter {
    handlers: Vec<Box<dyn CommandHandler>>,
}

impl CommandRouter {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Router with `create`, `remove` and the player operation, in that order.
    pub fn standard() -> Self {
        Self::new()
            .with_handler(CreateHandler)
            .with_handler(RemoveHandler)
            .with_handler(PlayerTagHandler)
    }

    #[must_use]
    pub fn with_handler(mut self, handler: impl CommandHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    pub fn route(
        &self,
        ctx: &mut Context<'_>,
        sender: &CommandSender,
        args: &[String],
    ) -> RouteOutcome {
        if args.is_empty() {
            return match sender {
                CommandSender::Player(p) => RouteOutcome::OpenMenu(p.clone()),
                CommandSender::Console => {
                    ctx.notify(sender, "error.player_only", &[]);
                    RouteOutcome::PlayerOnly
                }
            };
        }

        if !ctx.is_admin(sender) {
            ctx.notify(sender, "error.no_permission", &[]);
            return RouteOutcome::NoPermission;
        }

        match self.handlers.iter().find(|h| h.can_handle(args)) {
            Some(handler) => {
                debug!(handler = handler.name(), sender = sender.name(), "routing command");
                ctx.refusal = None;
                let result = handler.handle(ctx, sender, args);
                RouteOutcome::Handled {
                    handler: handler.name(),
                    result,
                    refused: ctx.refusal.take(),
                }
            }
            None => {
                ctx.notify(sender, "tag.help", &[]);
                RouteOutcome::Help
            }
        }
    }
}

impl Default for CommandRouter {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for CommandRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRouter")
            .field("handlers", &self.handler_names())
            .finish()
    }
}

/// First token equals `word`, ignoring ASCII case.
fn first_is(args: &[String], word: &str) -> bool {
    args.first().is_some_and(|a| a.eq_ignore_ascii_case(word))
}
