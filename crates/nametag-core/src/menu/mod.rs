// ── Selection menu ──
//
// Grid layout types and the presenter port live in `view`; the per-player
// session state machine lives in `session`.

mod session;
mod view;

pub use session::{Click, ClickOutcome, OpenOutcome, SelectionMenu};
pub use view::{rows_for, ItemKind, MenuItem, MenuPresenter, MenuView, UiHandle, COLUMNS, MAX_ROWS};
