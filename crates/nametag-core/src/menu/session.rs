// Per-player menu sessions: closed → open → closed.
//
// A session is registered before the grid is shown and purged on every
// close path. Clicks are resolved against the snapshot taken at open time,
// so a tag deleted in between is still selectable.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::context::Context;
use crate::model::{CommandSender, Player, Tag};

use super::view::{rows_for, ItemKind, MenuItem, MenuPresenter, MenuView, UiHandle, COLUMNS};

#[derive(Debug)]
struct Session {
    tags: Vec<Tag>,
    handle: UiHandle,
    size: usize,
}

/// One interaction with a presented grid. `slot` is `None` for clicks
/// outside the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Click {
    pub player: Player,
    pub handle: UiHandle,
    pub slot: Option<usize>,
    pub item: Option<ItemKind>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Not a grid this menu owns.
    Ignored,
    /// Swallowed without further effect.
    Cancelled,
    Cleared,
    Selected { tag: Tag, applied: bool },
}

impl ClickOutcome {
    /// Whether the host should suppress its default click behaviour.
    pub fn cancels_default(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    Opened(UiHandle),
    NoTags,
}

pub struct SelectionMenu {
    presenter: Arc<dyn MenuPresenter>,
    sessions: HashMap<Player, Session>,
}

impl SelectionMenu {
    pub fn new(presenter: Arc<dyn MenuPresenter>) -> Self {
        Self {
            presenter,
            sessions: HashMap::new(),
        }
    }

    pub fn open_menu(&mut self, ctx: &Context<'_>, player: &Player) -> OpenOutcome {
        // Re-opening ends whatever was open before, even with nothing to show.
        self.close(player);

        let tags = ctx.tags.available_tags(player);
        if tags.is_empty() {
            ctx.notify(&player.clone().into(), "menu.no_tags", &[]);
            return OpenOutcome::NoTags;
        }

        let view = Self::layout(ctx, player, &tags);
        let size = view.size();

        let handle = self.presenter.create(player, view);
        self.sessions.insert(player.clone(), Session { tags, handle, size });
        debug!(player = %player, ?handle, "menu opened");
        self.presenter.open(player, handle);
        OpenOutcome::Opened(handle)
    }

    fn layout(ctx: &Context<'_>, player: &Player, tags: &[Tag]) -> MenuView {
        let rows = rows_for(tags.len());
        let size = rows * COLUMNS;
        let admin = ctx
            .authority
            .has_permission(player, &ctx.settings.permission.admin);

        let mut slots: Vec<Option<MenuItem>> = vec![None; size];
        for (slot, tag) in slots.iter_mut().zip(tags).take(size - 1) {
            let mut lore = vec![
                ctx.notifier.text("menu.select_tag", &[]),
                ctx.notifier.text("menu.tag_id", &[("id", tag.id())]),
            ];
            if admin {
                let permission = tag.permission();
                lore.push(
                    ctx.notifier
                        .text("menu.tag_permission", &[("permission", permission.as_str())]),
                );
            }
            *slot = Some(MenuItem {
                kind: ItemKind::Tag,
                name: tag.display().to_owned(),
                lore,
            });
        }
        if let Some(last) = slots.last_mut() {
            *last = Some(MenuItem {
                kind: ItemKind::Clear,
                name: ctx.notifier.text("menu.remove_button", &[]),
                lore: Vec::new(),
            });
        }

        MenuView {
            title: ctx.notifier.text("menu.title", &[]),
            rows,
            slots,
        }
    }

    pub fn handle_click(&mut self, ctx: &Context<'_>, click: &Click) -> ClickOutcome {
        let Some(session) = self.sessions.get(&click.player) else {
            return ClickOutcome::Ignored;
        };
        if session.handle != click.handle {
            return ClickOutcome::Ignored;
        }
        let Some(slot) = click.slot else {
            return ClickOutcome::Cancelled;
        };

        let sender: CommandSender = click.player.clone().into();
        if slot + 1 == session.size && click.item == Some(ItemKind::Clear) {
            ctx.tags.remove_active_tag(&click.player);
            ctx.notify(&sender, "menu.tag_removed", &[]);
            self.close(&click.player);
            return ClickOutcome::Cleared;
        }

        // The last slot never shows a tag, whatever the snapshot holds.
        if slot + 1 >= session.size {
            return ClickOutcome::Cancelled;
        }
        let Some(tag) = session.tags.get(slot).cloned() else {
            return ClickOutcome::Cancelled;
        };
        let applied = ctx.tags.set_active_tag(&click.player, &tag);
        if applied {
            ctx.notify(&sender, "menu.tag_set", &[("display", tag.display())]);
        } else {
            ctx.notify(&sender, "menu.tag_set_failed", &[]);
        }
        self.close(&click.player);
        ClickOutcome::Selected { tag, applied }
    }

    /// The player closed `handle`. Stale handles are ignored.
    pub fn handle_close(&mut self, player: &Player, handle: UiHandle) {
        if self.sessions.get(player).is_some_and(|s| s.handle == handle) {
            self.sessions.remove(player);
            debug!(player = %player, "menu closed");
        }
    }

    pub fn handle_disconnect(&mut self, player: &Player) {
        self.sessions.remove(player);
    }

    fn close(&mut self, player: &Player) {
        if let Some(session) = self.sessions.remove(player) {
            self.presenter.close(player, session.handle);
        }
    }

    pub fn is_open(&self, player: &Player) -> bool {
        self.sessions.contains_key(player)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Tags captured when the player's menu was opened.
    pub fn snapshot(&self, player: &Player) -> Option<&[Tag]> {
        self.sessions.get(player).map(|s| s.tags.as_slice())
    }
}

impl std::fmt::Debug for SelectionMenu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionMenu")
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}
