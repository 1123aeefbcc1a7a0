// ── Tag persistence ──
//
// `KeyValueStore` is the file-backing port; `TagRepository` is the cache
// layered over it.

mod kv;
mod repository;

pub use kv::{KeyValueStore, MemoryStore};
pub use repository::{StoreTagRepository, TagRepository, TAGS_SECTION};
