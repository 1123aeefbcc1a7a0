use serde::Serialize;

use crate::model::Player;

pub const COLUMNS: usize = 9;
pub const MAX_ROWS: usize = 6;

/// Rows needed for `tags` entries plus the clear action, capped at
/// [`MAX_ROWS`].
pub fn rows_for(tags: usize) -> usize {
    (tags + 1).div_ceil(COLUMNS).min(MAX_ROWS)
}

/// Opaque identity of one presented grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UiHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Tag,
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub kind: ItemKind,
    pub name: String,
    pub lore: Vec<String>,
}

/// Fully laid-out grid, `rows * COLUMNS` slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuView {
    pub title: String,
    pub rows: usize,
    pub slots: Vec<Option<MenuItem>>,
}

impl MenuView {
    pub fn size(&self) -> usize {
        self.rows * COLUMNS
    }

    pub fn item(&self, slot: usize) -> Option<&MenuItem> {
        self.slots.get(slot).and_then(Option::as_ref)
    }
}

/// UI surface able to show a grid to a player.
pub trait MenuPresenter: Send + Sync {
    /// Allocate a UI instance for `view` without showing it yet.
    fn create(&self, player: &Player, view: MenuView) -> UiHandle;

    fn open(&self, player: &Player, handle: UiHandle);

    fn close(&self, player: &Player, handle: UiHandle);
}
