// ── Tag orchestrator ──
//
// Facade over the repository and the two delegation services. Every
// player-facing tag operation goes through here.

use tracing::debug;

use crate::error::CoreError;
use crate::model::{Player, Tag};
use crate::service::{DisplayService, PermissionService};
use crate::store::TagRepository;

pub struct TagOrchestrator {
    repository: Box<dyn TagRepository>,
    permissions: Box<dyn PermissionService>,
    display: Box<dyn DisplayService>,
}

impl TagOrchestrator {
    pub fn new(
        repository: Box<dyn TagRepository>,
        permissions: Box<dyn PermissionService>,
        display: Box<dyn DisplayService>,
    ) -> Self {
        Self {
            repository,
            permissions,
            display,
        }
    }

    // ── Tag lifecycle ────────────────────────────────────────────────

    /// Build and persist a tag.
    ///
    /// `Err` for an invalid id, `Ok(None)` when the store rejects the
    /// write. Duplicates are not checked here.
    pub fn create_tag(&mut self, id: &str, display: &str) -> Result<Option<Tag>, CoreError> {
        let tag = Tag::new(id, display, self.repository.permission_prefix())?;
        if self.repository.save(tag.clone()) {
            debug!(tag = %tag.id(), "tag created");
            Ok(Some(tag))
        } else {
            Ok(None)
        }
    }

    /// Delete from the repository only. Revoking holders is up to the caller.
    pub fn delete_tag(&mut self, id: &str) -> bool {
        self.repository.delete(id)
    }

    pub fn find_tag(&self, id: &str) -> Option<Tag> {
        self.repository.find_by_id(id)
    }

    pub fn all_tags(&self) -> Vec<Tag> {
        self.repository.all()
    }

    pub fn reload(&mut self) {
        self.repository.reload();
    }

    // ── Permissions ──────────────────────────────────────────────────

    pub fn give_permission(&self, player: &Player, tag: &Tag) -> bool {
        self.permissions.give_permission(player, tag)
    }

    pub fn remove_permission(&self, player: &Player, tag: &Tag) -> bool {
        self.permissions.remove_permission(player, tag)
    }

    pub fn remove_permission_all(&self, tag: &Tag) -> bool {
        self.permissions.remove_permission_all(tag)
    }

    pub fn has_permission(&self, player: &Player, tag: &Tag) -> bool {
        self.permissions.has_permission(player, tag)
    }

    /// Tags the player currently holds, in repository order.
    pub fn available_tags(&self, player: &Player) -> Vec<Tag> {
        self.repository
            .all()
            .into_iter()
            .filter(|tag| self.permissions.has_permission(player, tag))
            .collect()
    }

    // ── Display ──────────────────────────────────────────────────────

    /// Activate `tag` for `player`, clearing the previous one first.
    ///
    /// Nothing is dispatched unless the player holds the tag.
    pub fn set_active_tag(&self, player: &Player, tag: &Tag) -> bool {
        if !self.permissions.has_permission(player, tag) {
            return false;
        }
        self.display.remove_active_tag(player);
        self.display.set_active_tag(player, tag)
    }

    pub fn remove_active_tag(&self, player: &Player) -> bool {
        self.display.remove_active_tag(player)
    }
}

impl std::fmt::Debug for TagOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagOrchestrator")
            .field("prefix", &self.repository.permission_prefix())
            .finish_non_exhaustive()
    }
}
