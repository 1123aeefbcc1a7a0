//! `reload`: re-read configuration, language and tags.

use crate::cli::ReloadArgs;
use crate::error::CliError;
use crate::runtime::{self, Runtime};

pub fn handle(runtime: &mut Runtime, args: &ReloadArgs) -> Result<(), CliError> {
    let sender = runtime::sender(args.player.as_deref());
    let outcome = runtime.admin(&sender, &["reload".to_owned()]);
    super::admin_result(&outcome, &sender)
}
