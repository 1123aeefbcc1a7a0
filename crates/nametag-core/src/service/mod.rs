// ── Delegation services ──
//
// Both services translate tag operations into configured command
// templates. Neither holds state beyond its collaborators.

mod display;
mod permission;

pub use display::{CommandDisplayService, DisplayService};
pub use permission::{CommandPermissionService, PermissionService};
