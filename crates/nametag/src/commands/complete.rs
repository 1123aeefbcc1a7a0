//! Completion candidates, one per line.

use crate::cli::{GlobalOpts, TagArgs};
use crate::error::CliError;
use crate::output;
use crate::runtime::{self, Runtime};

pub fn handle(runtime: &Runtime, args: &TagArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let sender = runtime::sender(args.player.as_deref());
    let candidates = runtime.system().complete(&sender, &args.args);
    output::print_output(&candidates.join("\n"), global.quiet);
    Ok(())
}
