use std::sync::Arc;

use crate::backend::PermissionAuthority;
use crate::config::TemplateKey;
use crate::dispatch::{self, Dispatcher, Substitutions};
use crate::model::{Player, Tag};

/// Grants and revokes tag permissions on the external authority.
pub trait PermissionService: Send {
    fn give_permission(&self, player: &Player, tag: &Tag) -> bool;

    fn remove_permission(&self, player: &Player, tag: &Tag) -> bool;

    /// Revoke the tag from everyone, online or not.
    fn remove_permission_all(&self, tag: &Tag) -> bool;

    /// Live query; never cached.
    fn has_permission(&self, player: &Player, tag: &Tag) -> bool;
}

/// [`PermissionService`] that submits the `*_permission` templates.
pub struct CommandPermissionService {
    dispatcher: Dispatcher,
    authority: Arc<dyn PermissionAuthority>,
}

impl CommandPermissionService {
    pub fn new(dispatcher: Dispatcher, authority: Arc<dyn PermissionAuthority>) -> Self {
        Self {
            dispatcher,
            authority,
        }
    }

    fn player_subs(player: &Player, tag: &Tag) -> Substitutions {
        Substitutions::new()
            .with(dispatch::PLAYER, player.name())
            .with(dispatch::TAG, tag.permission())
            .with(dispatch::DISPLAY, tag.display())
    }
}

impl PermissionService for CommandPermissionService {
    fn give_permission(&self, player: &Player, tag: &Tag) -> bool {
        self.dispatcher
            .submit_all(TemplateKey::AddPermission, &Self::player_subs(player, tag));
        true
    }

    fn remove_permission(&self, player: &Player, tag: &Tag) -> bool {
        self.dispatcher
            .submit_all(TemplateKey::RemovePermission, &Self::player_subs(player, tag));
        true
    }

    fn remove_permission_all(&self, tag: &Tag) -> bool {
        let subs = Substitutions::new()
            .with(dispatch::TAG, tag.permission())
            .with(dispatch::DISPLAY, tag.display());
        self.dispatcher
            .submit_all(TemplateKey::RemovePermissionAll, &subs);
        true
    }

    fn has_permission(&self, player: &Player, tag: &Tag) -> bool {
        self.authority.has_permission(player, &tag.permission())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{Settings, SettingsHandle};
    use crate::testing::{RecordingSink, ScriptedAuthority};
    use pretty_assertions::assert_eq;

    fn service(sink: &Arc<RecordingSink>, authority: &Arc<ScriptedAuthority>) -> CommandPermissionService {
        let mut settings = Settings::default();
        settings.command.add_permission = vec![
            "grant {player} {tag}".into(),
            "say {player} got {display}".into(),
        ];
        settings.command.remove_permission_all = vec!["purge {tag} {display}".into()];
        let dispatcher = Dispatcher::new(sink.clone(), SettingsHandle::new(settings));
        CommandPermissionService::new(dispatcher, authority.clone())
    }

    #[test]
    fn give_submits_templates_in_order() {
        let sink = Arc::new(RecordingSink::default());
        let authority = Arc::new(ScriptedAuthority::default());
        let svc = service(&sink, &authority);
        let tag = Tag::new("vip", "&6VIP", "nametag.tags.").unwrap();

        assert!(svc.give_permission(&Player::new("Steve"), &tag));
        assert_eq!(
            sink.commands(),
            vec!["grant Steve nametag.tags.vip", "say Steve got &6VIP"]
        );
    }

    #[test]
    fn give_reports_true_even_when_commands_fail() {
        let sink = Arc::new(RecordingSink::failing_on("grant"));
        let authority = Arc::new(ScriptedAuthority::default());
        let svc = service(&sink, &authority);
        let tag = Tag::new("vip", "&6VIP", "nametag.tags.").unwrap();

        assert!(svc.give_permission(&Player::new("Steve"), &tag));
        assert_eq!(sink.commands().len(), 2);
    }

    #[test]
    fn remove_all_substitutes_permission_key() {
        let sink = Arc::new(RecordingSink::default());
        let authority = Arc::new(ScriptedAuthority::default());
        let svc = service(&sink, &authority);
        let tag = Tag::new("vip", "&6VIP", "nametag.tags.").unwrap();

        svc.remove_permission_all(&tag);
        assert_eq!(sink.commands(), vec!["purge nametag.tags.vip &6VIP"]);
    }

    #[test]
    fn has_permission_queries_live() {
        let sink = Arc::new(RecordingSink::default());
        let authority = Arc::new(ScriptedAuthority::default());
        let svc = service(&sink, &authority);
        let steve = Player::new("Steve");
        let tag = Tag::new("vip", "&6VIP", "nametag.tags.").unwrap();

        assert!(!svc.has_permission(&steve, &tag));
        authority.grant("Steve", "nametag.tags.vip");
        assert!(svc.has_permission(&steve, &tag));
        authority.revoke("Steve", "nametag.tags.vip");
        assert!(!svc.has_permission(&steve, &tag));
    }
}
