// ── Domain model ──
//
// Value types shared by every layer: tags, players and command senders.

mod player;
mod tag;

pub use player::{CommandSender, Player};
pub use tag::Tag;
