use crate::context::Context;
use crate::model::CommandSender;

use super::{CommandHandler, Refusal};

/// `<player> <add|remove> <id>`
///
/// Matched by shape only: three or more tokens with `add` or `remove` in
/// second position, whatever the first token is.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerTagHandler;

impl CommandHandler for PlayerTagHandler {
    fn name(&self) -> &'static str {
        "player-operation"
    }

    fn can_handle(&self, args: &[String]) -> bool {
        args.len() >= 3
            && (args[1].eq_ignore_ascii_case("add") || args[1].eq_ignore_ascii_case("remove"))
    }

    fn handle(&self, ctx: &mut Context<'_>, sender: &CommandSender, args: &[String]) -> bool {
        let [name, action, id, ..] = args else {
            ctx.refuse(Refusal::Usage, sender, "tag.help", &[]);
            return true;
        };

        let Some(target) = ctx.players.find_player(name) else {
            ctx.refuse(
                Refusal::PlayerNotFound,
                sender,
                "tag.player_not_found",
                &[("player", name.as_str())],
            );
            return true;
        };
        let Some(tag) = ctx.tags.find_tag(id) else {
            ctx.refuse(Refusal::TagNotFound, sender, "tag.tag_not_found", &[("tag", id.as_str())]);
            return true;
        };

        let action = action.to_lowercase();
        let (ok, done, own, failed) = match action.as_str() {
            "add" => (
                ctx.tags.give_permission(&target, &tag),
                "tag.tag_added",
                "tag.you_got_tag",
                "tag.tag_add_failed",
            ),
            "remove" => (
                ctx.tags.remove_permission(&target, &tag),
                "tag.tag_removed",
                "tag.your_tag_removed",
                "tag.tag_remove_failed",
            ),
            _ => {
                ctx.refuse(
                    Refusal::UnknownAction,
                    sender,
                    "tag.unknown_action",
                    &[("action", action.as_str())],
                );
                ctx.notify(sender, "tag.help", &[]);
                return true;
            }
        };

        if ok {
            ctx.notify(
                sender,
                done,
                &[("player", target.name()), ("display", tag.display())],
            );
            ctx.notify(&target.into(), own, &[("display", tag.display())]);
        } else {
            ctx.refuse(Refusal::Failed, sender, failed, &[]);
        }
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Player;
    use crate::store::MemoryStore;
    use crate::testing::{args, Harness};
    use pretty_assertions::assert_eq;

    #[test]
    fn shape_matching_is_permissive() {
        let handler = PlayerTagHandler;
        assert!(handler.can_handle(&args(&["Steve", "ADD", "vip"])));
        assert!(handler.can_handle(&args(&["create", "remove", "vip", "extra"])));
        assert!(!handler.can_handle(&args(&["Steve", "add"])));
        assert!(!handler.can_handle(&args(&["Steve", "give", "vip"])));
    }

    #[test]
    fn add_grants_and_notifies_both_sides() {
        let mut h = Harness::new(MemoryStore::with_tags([("vip", "&6VIP")]));
        h.directory.add_online("Steve");

        h.route(&CommandSender::Console, &args(&["Steve", "add", "vip"]));

        assert_eq!(
            h.sink.commands(),
            vec!["lp user Steve permission set nametag.tags.vip true"]
        );
        assert_eq!(
            h.messages_for(&CommandSender::Console),
            vec!["tag.tag_added player=Steve display=&6VIP"]
        );
        assert_eq!(
            h.messages_for(&Player::new("Steve").into()),
            vec!["tag.you_got_tag display=&6VIP"]
        );
    }

    #[test]
    fn remove_revokes() {
        let mut h = Harness::new(MemoryStore::with_tags([("vip", "&6VIP")]));
        h.directory.add_online("Steve");

        h.route(&CommandSender::Console, &args(&["Steve", "Remove", "vip"]));

        assert_eq!(
            h.sink.commands(),
            vec!["lp user Steve permission unset nametag.tags.vip"]
        );
        assert_eq!(
            h.messages_for(&Player::new("Steve").into()),
            vec!["tag.your_tag_removed display=&6VIP"]
        );
    }

    #[test]
    fn unknown_player_then_unknown_tag() {
        let mut h = Harness::new(MemoryStore::new());
        h.route(&CommandSender::Console, &args(&["Nobody", "add", "vip"]));
        h.directory.add_online("Steve");
        h.route(&CommandSender::Console, &args(&["Steve", "add", "vip"]));

        assert_eq!(
            h.messages_for(&CommandSender::Console),
            vec!["tag.player_not_found player=Nobody", "tag.tag_not_found tag=vip"]
        );
        assert!(h.sink.commands().is_empty());
    }
}
