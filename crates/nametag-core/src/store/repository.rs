// ── Tag repository ──
//
// Write-through cache over a `KeyValueStore`. The cache is replaced
// wholesale on every load; writes go to the store immediately and a
// failed write surfaces as `false`.

use indexmap::IndexMap;
use tracing::{debug, error, warn};

use crate::config::SettingsHandle;
use crate::model::Tag;

use super::kv::KeyValueStore;

/// Root section holding one child per tag id.
pub const TAGS_SECTION: &str = "tags";

/// Persistence contract for tags.
pub trait TagRepository: Send {
    /// Drop the cache and re-read every tag from the backing store.
    fn load_all(&mut self) -> Vec<Tag>;

    fn find_by_id(&self, id: &str) -> Option<Tag>;

    /// Snapshot of the cache in load/insertion order.
    fn all(&self) -> Vec<Tag>;

    /// Insert or overwrite, then persist. Uniqueness is the caller's job.
    fn save(&mut self, tag: Tag) -> bool;

    /// Remove from cache and store. `false` when the id is unknown or the
    /// write fails.
    fn delete(&mut self, id: &str) -> bool;

    /// Re-read the permission prefix, then reload everything.
    fn reload(&mut self);

    /// Prefix new tags are constructed with.
    fn permission_prefix(&self) -> &str;
}

// ── StoreTagRepository ──────────────────────────────────────────────

pub struct StoreTagRepository {
    store: Box<dyn KeyValueStore>,
    settings: SettingsHandle,
    prefix: String,
    tags: IndexMap<String, Tag>,
}

impl StoreTagRepository {
    /// Build the repository and perform the initial load.
    pub fn new(store: Box<dyn KeyValueStore>, settings: SettingsHandle) -> Self {
        let prefix = settings.current().permission.tag_prefix.clone();
        let mut repo = Self {
            store,
            settings,
            prefix,
            tags: IndexMap::new(),
        };
        repo.load_all();
        repo
    }

    fn display_path(id: &str) -> String {
        format!("{TAGS_SECTION}.{id}.display")
    }

    fn persist(&mut self, action: &str, id: &str) -> bool {
        match self.store.save() {
            Ok(()) => true,
            Err(e) => {
                error!(tag = %id, action, error = %e, "failed to persist tag store");
                false
            }
        }
    }
}

impl TagRepository for StoreTagRepository {
    fn load_all(&mut self) -> Vec<Tag> {
        self.tags.clear();

        let Some(ids) = self.store.child_keys(TAGS_SECTION) else {
            warn!("no '{TAGS_SECTION}' section in tag store");
            return Vec::new();
        };

        let log_each = self.settings.current().debug.enabled;
        for id in ids {
            let display = self
                .store
                .get_string(&Self::display_path(&id))
                .unwrap_or_else(|| Tag::default_display(&id));
            match Tag::new(id.as_str(), display, self.prefix.as_str()) {
                Ok(tag) => {
                    if log_each {
                        debug!(tag = %tag.id(), display = %tag.display(), "loaded tag");
                    }
                    self.tags.insert(id, tag);
                }
                Err(e) => warn!(error = %e, "skipping stored tag"),
            }
        }

        self.all()
    }

    fn find_by_id(&self, id: &str) -> Option<Tag> {
        self.tags.get(id).cloned()
    }

    fn all(&self) -> Vec<Tag> {
        self.tags.values().cloned().collect()
    }

    fn save(&mut self, tag: Tag) -> bool {
        let id = tag.id().to_owned();
        self.store
            .set(&Self::display_path(&id), Some(tag.display()));
        self.tags.insert(id.clone(), tag);
        self.persist("save", &id)
    }

    fn delete(&mut self, id: &str) -> bool {
        if self.tags.shift_remove(id).is_none() {
            return false;
        }
        self.store.set(&format!("{TAGS_SECTION}.{id}"), None);
        self.persist("delete", id)
    }

    fn reload(&mut self) {
        self.prefix.clone_from(&self.settings.current().permission.tag_prefix);
        if let Err(e) = self.store.reload() {
            error!(error = %e, "failed to re-read tag store");
        }
        let count = self.load_all().len();
        debug!(count, prefix = %self.prefix, "tag repository reloaded");
    }

    fn permission_prefix(&self) -> &str {
        &self.prefix
    }
}

impl std::fmt::Debug for StoreTagRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreTagRepository")
            .field("prefix", &self.prefix)
            .field("tags", &self.tags.len())
            .finish_non_exhaustive()
    }
}
