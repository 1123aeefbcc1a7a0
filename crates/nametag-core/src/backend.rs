// ── External authority ports ──
//
// The core never stores permissions or tracks player sessions itself.
// Both questions go to whatever the host wires in here.

use crate::model::Player;

/// Live permission lookups. Answers are never cached by the core.
pub trait PermissionAuthority: Send + Sync {
    fn has_permission(&self, player: &Player, node: &str) -> bool;
}

/// Resolves player names and enumerates who is online.
pub trait PlayerDirectory: Send + Sync {
    /// Exact-name lookup of a known player.
    fn find_player(&self, name: &str) -> Option<Player>;

    fn online_players(&self) -> Vec<Player>;
}

impl<T: PermissionAuthority + ?Sized> PermissionAuthority for &T {
    fn has_permission(&self, player: &Player, node: &str) -> bool {
        (**self).has_permission(player, node)
    }
}

impl<T: PlayerDirectory + ?Sized> PlayerDirectory for &T {
    fn find_player(&self, name: &str) -> Option<Player> {
        (**self).find_player(name)
    }

    fn online_players(&self) -> Vec<Player> {
        (**self).online_players()
    }
}
