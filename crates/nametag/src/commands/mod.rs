//! Command dispatch: bridges CLI args -> the tag system -> output.

pub mod complete;
pub mod config_cmd;
pub mod console;
pub mod list;
pub mod reload;
pub mod tag;

use nametag_core::{AdminOutcome, CommandSender, RouteOutcome};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::runtime::Runtime;

/// Dispatch a runtime-bound command to the appropriate handler.
pub fn dispatch(cmd: Command, runtime: &mut Runtime, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Tag(args) => tag::handle(runtime, &args),
        Command::Reload(args) => reload::handle(runtime, &args),
        Command::Console => console::handle(runtime, global),
        Command::List => list::handle(runtime, global),
        Command::Complete(args) => complete::handle(runtime, &args, global),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

/// Turn a refused or failed `/tag` into an error. The sender has already
/// been told why.
fn route_result(outcome: &RouteOutcome, sender: &CommandSender) -> Result<(), CliError> {
    match outcome {
        RouteOutcome::NoPermission => Err(CliError::PermissionDenied {
            sender: sender.name().to_owned(),
        }),
        RouteOutcome::PlayerOnly => Err(CliError::PlayerOnly),
        RouteOutcome::Handled {
            handler,
            refused: Some(refusal),
            ..
        } => Err(CliError::Refused {
            action: (*handler).to_owned(),
            refusal: *refusal,
        }),
        RouteOutcome::Handled {
            handler,
            result: false,
            ..
        } => Err(CliError::Rejected {
            action: (*handler).to_owned(),
        }),
        RouteOutcome::OpenMenu(_) | RouteOutcome::Handled { .. } | RouteOutcome::Help => Ok(()),
    }
}

fn admin_result(outcome: &AdminOutcome, sender: &CommandSender) -> Result<(), CliError> {
    match outcome {
        AdminOutcome::Reloaded => Ok(()),
        AdminOutcome::NoPermission => Err(CliError::PermissionDenied {
            sender: sender.name().to_owned(),
        }),
        AdminOutcome::Usage | AdminOutcome::ReloadFailed | AdminOutcome::UnknownSubcommand => {
            Err(CliError::Rejected {
                action: "reload".into(),
            })
        }
    }
}
