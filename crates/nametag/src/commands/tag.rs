//! One-shot `/tag` invocation.

use tracing::debug;

use crate::cli::TagArgs;
use crate::error::CliError;
use crate::runtime::{self, Runtime};

pub fn handle(runtime: &mut Runtime, args: &TagArgs) -> Result<(), CliError> {
    let sender = runtime::sender(args.player.as_deref());
    let outcome = runtime.execute(&sender, &args.args);
    debug!(?outcome, "routed");

    if let Some(grid) = runtime.take_grid() {
        match runtime.prompt(grid)? {
            Some(click) => debug!(?click, "menu answered"),
            None => debug!("menu dismissed"),
        }
    }
    super::route_result(&outcome, &sender)
}
