use crate::context::Context;
use crate::model::CommandSender;
use crate::model::Tag;

use super::{first_is, CommandHandler, Refusal};

/// `create <id> <display>`
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateHandler;

impl CommandHandler for CreateHandler {
    fn name(&self) -> &'static str {
        "create"
    }

    fn can_handle(&self, args: &[String]) -> bool {
        first_is(args, "create")
    }

    fn handle(&self, ctx: &mut Context<'_>, sender: &CommandSender, args: &[String]) -> bool {
        let [_, id, display, ..] = args else {
            ctx.refuse(Refusal::Usage, sender, "tag.create_usage", &[]);
            return true;
        };

        if !Tag::is_valid_id(id) {
            ctx.refuse(Refusal::InvalidId, sender, "tag.invalid_id", &[]);
            return true;
        }
        if ctx.tags.find_tag(id).is_some() {
            ctx.refuse(Refusal::TagExists, sender, "tag.tag_exists", &[("tag", id.as_str())]);
            return true;
        }

        match ctx.tags.create_tag(id, display) {
            Ok(Some(tag)) => {
                ctx.notify(
                    sender,
                    "tag.created",
                    &[("display", tag.display()), ("id", tag.id())],
                );
            }
            Ok(None) => ctx.refuse(Refusal::Failed, sender, "tag.create_failed", &[]),
            Err(_) => ctx.refuse(Refusal::InvalidId, sender, "tag.invalid_id", &[]),
        }
        true
    }
}
