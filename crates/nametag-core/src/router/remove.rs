use tracing::info;

use crate::context::Context;
use crate::model::CommandSender;

use super::{first_is, CommandHandler, Refusal};

/// `remove <id>`
///
/// Revokes the tag from every online holder (notifying each), submits the
/// bulk revocation for everyone else, then deletes the tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveHandler;

impl CommandHandler for RemoveHandler {
    fn name(&self) -> &'static str {
        "remove"
    }

    fn can_handle(&self, args: &[String]) -> bool {
        first_is(args, "remove")
    }

    fn handle(&self, ctx: &mut Context<'_>, sender: &CommandSender, args: &[String]) -> bool {
        let Some(id) = args.get(1) else {
            ctx.refuse(Refusal::Usage, sender, "tag.remove_usage", &[]);
            return true;
        };
        let Some(tag) = ctx.tags.find_tag(id) else {
            ctx.refuse(Refusal::TagNotFound, sender, "tag.tag_not_exists", &[("tag", id.as_str())]);
            return true;
        };

        let mut affected = 0_usize;
        for player in ctx.players.online_players() {
            if ctx.authority.has_permission(&player, &tag.permission()) {
                ctx.tags.remove_permission(&player, &tag);
                ctx.notify(
                    &player.into(),
                    "tag.tag_deleted_notice",
                    &[("display", tag.display())],
                );
                affected += 1;
            }
        }
        ctx.tags.remove_permission_all(&tag);

        if ctx.tags.delete_tag(id) {
            info!(tag = %id, affected, "tag deleted");
            ctx.notify(
                sender,
                "tag.deleted",
                &[("display", tag.display()), ("id", id.as_str())],
            );
            if affected > 0 {
                ctx.notify(
                    sender,
                    "tag.affected_players",
                    &[("count", affected.to_string().as_str())],
                );
            }
        } else {
            ctx.refuse(Refusal::Failed, sender, "tag.delete_failed", &[]);
        }
        true
    }
}
