//! Terminal stand-in for the selection grid.
//!
//! The core lays out a grid and asks the presenter to show it. Here the
//! grid is parked until the command loop asks for it, then offered as a
//! `dialoguer` list: picking an entry becomes a click on its slot,
//! escaping becomes a close.

use std::io::IsTerminal;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use dialoguer::Select;
use tracing::debug;

use nametag_core::{ItemKind, MenuPresenter, MenuView, Player, UiHandle};

use crate::error::CliError;
use crate::terminal;

/// A grid that has been created and opened but not yet answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenGrid {
    pub player: Player,
    pub handle: UiHandle,
    pub view: MenuView,
}

#[derive(Debug)]
struct Slot {
    grid: OpenGrid,
    shown: bool,
}

#[derive(Debug, Default)]
pub struct PickerPresenter {
    next: AtomicU64,
    current: Mutex<Option<Slot>>,
}

impl PickerPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    fn current(&self) -> MutexGuard<'_, Option<Slot>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take the grid most recently opened, if it is still showing.
    pub fn take_open(&self) -> Option<OpenGrid> {
        let mut current = self.current();
        match current.take() {
            Some(slot) if slot.shown => Some(slot.grid),
            other => {
                *current = other;
                None
            }
        }
    }
}

impl MenuPresenter for PickerPresenter {
    fn create(&self, player: &Player, view: MenuView) -> UiHandle {
        let handle = UiHandle(self.next.fetch_add(1, Ordering::Relaxed) + 1);
        *self.current() = Some(Slot {
            grid: OpenGrid {
                player: player.clone(),
                handle,
                view,
            },
            shown: false,
        });
        handle
    }

    fn open(&self, player: &Player, handle: UiHandle) {
        if let Some(slot) = self.current().as_mut() {
            if slot.grid.handle == handle {
                debug!(player = %player, handle = handle.0, "grid opened");
                slot.shown = true;
            }
        }
    }

    fn close(&self, player: &Player, handle: UiHandle) {
        let mut current = self.current();
        if current.as_ref().is_some_and(|s| s.grid.handle == handle) {
            debug!(player = %player, handle = handle.0, "grid closed");
            *current = None;
        }
    }
}

// ── Prompt ───────────────────────────────────────────────────────────

/// Filled slots in grid order, labelled for a list prompt.
pub fn entries(view: &MenuView, color: bool) -> Vec<(usize, ItemKind, String)> {
    view.slots
        .iter()
        .enumerate()
        .filter_map(|(slot, item)| {
            let item = item.as_ref()?;
            let mut label = terminal::render(&item.name, color);
            let lore: Vec<String> = item
                .lore
                .iter()
                .map(|line| terminal::render(line, color))
                .collect();
            if !lore.is_empty() {
                label = format!("{label}  ({})", lore.join(", "));
            }
            Some((slot, item.kind, label))
        })
        .collect()
}

/// Ask which entry to pick. `None` when the prompt is dismissed or no
/// terminal is attached.
pub fn choose(view: &MenuView, color: bool) -> Result<Option<(usize, ItemKind)>, CliError> {
    if !std::io::stdin().is_terminal() || !std::io::stderr().is_terminal() {
        tracing::warn!("no terminal attached, closing the tag menu");
        return Ok(None);
    }

    let entries = entries(view, color);
    let labels: Vec<&str> = entries.iter().map(|(_, _, label)| label.as_str()).collect();
    let picked = Select::new()
        .with_prompt(terminal::render(&view.title, color))
        .items(&labels)
        .default(0)
        .interact_opt()
        .map_err(|e| CliError::Validation {
            field: "interactive".into(),
            reason: format!("prompt failed: {e}"),
        })?;

    Ok(picked
        .and_then(|index| entries.get(index))
        .map(|(slot, kind, _)| (*slot, *kind)))
}
