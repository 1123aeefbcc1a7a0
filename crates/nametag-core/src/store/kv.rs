// ── Key-value store port ──
//
// Hierarchical store addressed by dotted paths (`tags.vip.display`).
// Writes land in a working copy; `save` makes them durable.

use indexmap::IndexMap;

use crate::error::CoreError;

/// Dotted-path store backing the tag repository.
pub trait KeyValueStore: Send {
    /// Keys directly below `path`, or `None` when `path` is not a section.
    fn child_keys(&self, path: &str) -> Option<Vec<String>>;

    fn get_string(&self, path: &str) -> Option<String>;

    /// Set a scalar at `path`, creating sections on the way. `None` removes
    /// the entry (scalar or whole section).
    fn set(&mut self, path: &str, value: Option<&str>);

    /// Persist the working copy.
    fn save(&mut self) -> Result<(), CoreError>;

    /// Discard the working copy and re-read from durable storage.
    fn reload(&mut self) -> Result<(), CoreError>;
}

// ── MemoryStore ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Value(String),
    Section(IndexMap<String, Node>),
}

/// In-process store with an explicit durable snapshot.
///
/// Useful for embedding and for exercising persistence failures.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    working: IndexMap<String, Node>,
    persisted: IndexMap<String, Node>,
    fail_saves: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already-durable set of tags (`id`, `display`).
    pub fn with_tags<'a>(tags: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut store = Self::new();
        store
            .working
            .insert(super::TAGS_SECTION.to_owned(), Node::Section(IndexMap::new()));
        for (id, display) in tags {
            store.set(&format!("{}.{id}.display", super::TAGS_SECTION), Some(display));
        }
        store.persisted = store.working.clone();
        store
    }

    /// Make every later `save` fail.
    pub fn set_failing(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    /// Value as last saved, ignoring unsaved writes.
    pub fn persisted_string(&self, path: &str) -> Option<String> {
        match lookup(&self.persisted, path)? {
            Node::Value(v) => Some(v.clone()),
            Node::Section(_) => None,
        }
    }
}

fn lookup<'a>(root: &'a IndexMap<String, Node>, path: &str) -> Option<&'a Node> {
    let mut parts = path.split('.');
    let mut node = root.get(parts.next()?)?;
    for part in parts {
        match node {
            Node::Section(children) => node = children.get(part)?,
            Node::Value(_) => return None,
        }
    }
    Some(node)
}

fn insert(root: &mut IndexMap<String, Node>, path: &str, value: Option<&str>) {
    let (parents, leaf) = match path.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, path),
    };

    let mut section = root;
    for part in parents.into_iter().flat_map(|p| p.split('.')) {
        if value.is_none() && !section.contains_key(part) {
            return;
        }
        let entry = section
            .entry(part.to_owned())
            .or_insert_with(|| Node::Section(IndexMap::new()));
        if let Node::Value(_) = entry {
            *entry = Node::Section(IndexMap::new());
        }
        let Node::Section(children) = entry else {
            return;
        };
        section = children;
    }

    match value {
        Some(v) => {
            section.insert(leaf.to_owned(), Node::Value(v.to_owned()));
        }
        None => {
            section.shift_remove(leaf);
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn child_keys(&self, path: &str) -> Option<Vec<String>> {
        match lookup(&self.working, path)? {
            Node::Section(children) => Some(children.keys().cloned().collect()),
            Node::Value(_) => None,
        }
    }

    fn get_string(&self, path: &str) -> Option<String> {
        match lookup(&self.working, path)? {
            Node::Value(v) => Some(v.clone()),
            Node::Section(_) => None,
        }
    }

    fn set(&mut self, path: &str, value: Option<&str>) {
        insert(&mut self.working, path, value);
    }

    fn save(&mut self) -> Result<(), CoreError> {
        if self.fail_saves {
            return Err(CoreError::store("memory store is read-only"));
        }
        self.persisted = self.working.clone();
        Ok(())
    }

    fn reload(&mut self) -> Result<(), CoreError> {
        self.working = self.persisted.clone();
        Ok(())
    }
}
