use crate::config::TemplateKey;
use crate::dispatch::{self, Dispatcher, Substitutions};
use crate::model::{Player, Tag};

/// Activates and clears the visible tag of a player.
pub trait DisplayService: Send {
    fn set_active_tag(&self, player: &Player, tag: &Tag) -> bool;

    fn remove_active_tag(&self, player: &Player) -> bool;
}

/// [`DisplayService`] that submits the `settag` / `remove` templates.
///
/// `{tag}` and `{display}` both carry the display text here.
pub struct CommandDisplayService {
    dispatcher: Dispatcher,
}

impl CommandDisplayService {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

impl DisplayService for CommandDisplayService {
    fn set_active_tag(&self, player: &Player, tag: &Tag) -> bool {
        let subs = Substitutions::new()
            .with(dispatch::PLAYER, player.name())
            .with(dispatch::TAG, tag.display())
            .with(dispatch::DISPLAY, tag.display());
        self.dispatcher.submit_all(TemplateKey::SetTag, &subs);
        true
    }

    fn remove_active_tag(&self, player: &Player) -> bool {
        let subs = Substitutions::new().with(dispatch::PLAYER, player.name());
        self.dispatcher.submit_all(TemplateKey::Remove, &subs);
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::SettingsHandle;
    use crate::testing::RecordingSink;

    #[test]
    fn default_templates_carry_display_text() {
        let sink = Arc::new(RecordingSink::default());
        let svc = CommandDisplayService::new(Dispatcher::new(sink.clone(), SettingsHandle::default()));
        let tag = Tag::new("vip", "&6[VIP]", "nametag.tags.").unwrap();
        let alex = Player::new("Alex");

        svc.set_active_tag(&alex, &tag);
        svc.remove_active_tag(&alex);

        assert_eq!(
            sink.commands(),
            vec![
                "lp user Alex meta setprefix 100 \"&6[VIP]\"",
                "lp user Alex meta removeprefix 100",
            ]
        );
    }
}
