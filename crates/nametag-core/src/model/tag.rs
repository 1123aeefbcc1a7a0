// ── Tag entity ──
//
// A tag is an immutable (id, display, permission prefix) triple. The
// permission key is always derived, never stored on its own.

use std::fmt;

use serde::Serialize;

use crate::error::CoreError;

/// One display tag.
///
/// Equality covers the id, the display text and the permission prefix the
/// tag was built with, so the same id under two prefixes compares unequal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Tag {
    id: String,
    display: String,
    #[serde(skip)]
    permission_prefix: String,
}

impl Tag {
    /// Build a tag, rejecting ids outside `[a-zA-Z0-9_-]+`.
    pub fn new(
        id: impl Into<String>,
        display: impl Into<String>,
        permission_prefix: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let id = id.into();
        if !Self::is_valid_id(&id) {
            return Err(CoreError::InvalidTagId { id });
        }
        Ok(Self {
            id,
            display: display.into(),
            permission_prefix: permission_prefix.into(),
        })
    }

    pub fn is_valid_id(id: &str) -> bool {
        !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }

    /// Display used when the store has no `display` attribute for an id.
    pub fn default_display(id: &str) -> String {
        format!("&7[{id}]&f")
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn permission_prefix(&self) -> &str {
        &self.permission_prefix
    }

    /// Permission key: prefix followed by the id.
    pub fn permission(&self) -> String {
        format!("{}{}", self.permission_prefix, self.id)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn permission_is_prefix_plus_id() {
        let tag = Tag::new("vip", "&6[VIP]", "nametag.tags.").unwrap();
        assert_eq!(tag.permission(), "nametag.tags.vip");
    }

    #[test]
    fn rejects_empty_and_spaced_ids() {
        assert!(matches!(
            Tag::new("", "x", "p."),
            Err(CoreError::InvalidTagId { .. })
        ));
        assert!(Tag::new("two words", "x", "p.").is_err());
        assert!(Tag::new("dot.ted", "x", "p.").is_err());
    }

    #[test]
    fn equality_includes_prefix() {
        let a = Tag::new("vip", "&6VIP", "a.").unwrap();
        let b = Tag::new("vip", "&6VIP", "b.").unwrap();
        assert_ne!(a, b);
        assert_eq!(a, Tag::new("vip", "&6VIP", "a.").unwrap());
    }

    #[test]
    fn default_display_wraps_id() {
        assert_eq!(Tag::default_display("mvp"), "&7[mvp]&f");
    }

    proptest! {
        #[test]
        fn accepts_every_well_formed_id(id in "[a-zA-Z0-9_-]{1,32}") {
            let tag = Tag::new(id.clone(), "d", "pre.").unwrap();
            prop_assert_eq!(tag.permission(), format!("pre.{id}"));
        }

        #[test]
        fn rejects_ids_with_a_foreign_char(
            head in "[a-z]{0,8}",
            bad in "[^a-zA-Z0-9_-]",
            tail in "[a-z]{0,8}",
        ) {
            let id = format!("{head}{bad}{tail}");
            prop_assert!(Tag::new(id, "d", "pre.").is_err());
        }
    }
}
