//! `console`: a line session over one runtime, so the tag cache and open
//! menus carry over from line to line.
//!
//! Lines may start with `@<player>` to act as that player. Without a
//! terminal, opened menus are printed and stay open until a `click` or
//! `close` line answers them.

use std::collections::HashMap;
use std::io::{self, IsTerminal, Write};

use tracing::debug;

use nametag_core::{CommandSender, Player};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;
use crate::picker::{self, OpenGrid};
use crate::runtime::Runtime;

use super::list;

const HELP: &str = "\
Prefix a line with @<player> to act as that player.

  tag [ARGS]...        run /tag (a bare tag opens the menu)
  nametag [ARGS]...    run the admin command
  reload               same as: nametag reload
  complete [ARGS]...   list completion candidates
  click <slot>         pick a slot in your open menu
  close                close your open menu
  leave [PLAYER]       disconnect a player
  list                 list tags
  help                 show this text
  exit                 end the session";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

struct Session<'a> {
    runtime: &'a mut Runtime,
    global: &'a GlobalOpts,
    grids: HashMap<Player, OpenGrid>,
    interactive: bool,
}

pub fn handle(runtime: &mut Runtime, global: &GlobalOpts) -> Result<(), CliError> {
    let interactive = io::stdin().is_terminal();
    let mut session = Session {
        runtime,
        global,
        grids: HashMap::new(),
        interactive,
    };

    let mut line = String::new();
    loop {
        if interactive {
            eprint!("> ");
            io::stderr().flush()?;
        }
        line.clear();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        match session.line(&line) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(err) => eprintln!("{:?}", miette::Report::new(err)),
        }
    }

    session.close_all();
    Ok(())
}

impl Session<'_> {
    fn line(&mut self, line: &str) -> Result<Flow, CliError> {
        let words = split_words(line)?;
        let addressed = words
            .split_first()
            .and_then(|(first, rest)| Some((first.strip_prefix('@')?, rest)))
            .filter(|(name, _)| !name.is_empty());
        let (sender, words) = match addressed {
            Some((name, rest)) => (CommandSender::from(Player::new(name)), rest),
            None => (CommandSender::Console, words.as_slice()),
        };
        let Some((command, args)) = words.split_first() else {
            return Ok(Flow::Continue);
        };

        match command.trim_start_matches('/').to_ascii_lowercase().as_str() {
            "exit" | "quit" => return Ok(Flow::Exit),
            "help" => println!("{HELP}"),
            "tag" => self.tag(&sender, args)?,
            "nametag" => {
                let outcome = self.runtime.admin(&sender, args);
                debug!(?outcome, "admin command");
            }
            "reload" => {
                let outcome = self.runtime.admin(&sender, &["reload".to_owned()]);
                debug!(?outcome, "admin command");
            }
            "complete" => {
                let candidates = self.runtime.system().complete(&sender, args);
                output::print_output(&candidates.join("\n"), self.global.quiet);
            }
            "click" => self.click(&sender, args)?,
            "close" => self.close(&sender)?,
            "leave" => self.leave(&sender, args)?,
            "list" => output::print_output(
                &list::render(&*self.runtime, self.global)?,
                self.global.quiet,
            ),
            other => {
                return Err(CliError::Validation {
                    field: "command".into(),
                    reason: format!("unknown console command '{other}'"),
                });
            }
        }
        Ok(Flow::Continue)
    }

    fn tag(&mut self, sender: &CommandSender, args: &[String]) -> Result<(), CliError> {
        let outcome = self.runtime.execute(sender, args);
        debug!(?outcome, "routed");

        let Some(grid) = self.runtime.take_grid() else {
            return Ok(());
        };
        if self.interactive {
            self.grids.remove(&grid.player);
            self.runtime.prompt(grid)?;
        } else {
            self.show(&grid);
            self.grids.insert(grid.player.clone(), grid);
        }
        Ok(())
    }

    fn show(&self, grid: &OpenGrid) {
        if self.global.quiet {
            return;
        }
        let color = self.runtime.color();
        println!(
            "@{}: {}",
            grid.player,
            crate::terminal::render(&grid.view.title, color)
        );
        for (slot, _, label) in picker::entries(&grid.view, color) {
            println!("  [{slot}] {label}");
        }
    }

    fn player<'s>(sender: &'s CommandSender, action: &str) -> Result<&'s Player, CliError> {
        sender.as_player().ok_or_else(|| CliError::Validation {
            field: action.to_owned(),
            reason: "needs a player, e.g. @Steve".into(),
        })
    }

    fn click(&mut self, sender: &CommandSender, args: &[String]) -> Result<(), CliError> {
        let player = Self::player(sender, "click")?;
        let slot: usize = args
            .first()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| CliError::Validation {
                field: "slot".into(),
                reason: "expected a slot number".into(),
            })?;
        let grid = self.grids.get(player).cloned().ok_or_else(|| CliError::Validation {
            field: "click".into(),
            reason: format!("{player} has no open menu"),
        })?;

        let item = grid.view.item(slot).map(|item| item.kind);
        let outcome = self.runtime.click(&grid, slot, item);
        debug!(?outcome, "menu click");
        if !self.runtime.system().menu().is_open(player) {
            self.grids.remove(player);
        }
        Ok(())
    }

    fn close(&mut self, sender: &CommandSender) -> Result<(), CliError> {
        let player = Self::player(sender, "close")?;
        if let Some(grid) = self.grids.remove(player) {
            self.runtime.close(&grid);
        }
        Ok(())
    }

    fn leave(&mut self, sender: &CommandSender, args: &[String]) -> Result<(), CliError> {
        let player = match args.first() {
            Some(name) => Player::new(name.as_str()),
            None => Self::player(sender, "leave")?.clone(),
        };
        self.grids.remove(&player);
        self.runtime.disconnect(&player);
        Ok(())
    }

    fn close_all(&mut self) {
        for grid in std::mem::take(&mut self.grids).into_values() {
            self.runtime.close(&grid);
        }
    }
}

/// Split a line into words the way the executor splits templates.
fn split_words(line: &str) -> Result<Vec<String>, CliError> {
    shlex::split(line).ok_or_else(|| CliError::Validation {
        field: "line".into(),
        reason: "unclosed quote".into(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn words_respect_quotes() {
        assert_eq!(
            split_words(r#"@Steve tag create vip "&6[VIP] &f" ''"#).unwrap(),
            vec!["@Steve", "tag", "create", "vip", "&6[VIP] &f", ""]
        );
        assert_eq!(split_words("  a\\ b  c\n").unwrap(), vec!["a b", "c"]);
        assert_eq!(
            split_words("tag create x '&a$VIP`id`'").unwrap(),
            vec!["tag", "create", "x", "&a$VIP`id`"]
        );
        assert!(split_words("tag create 'oops").is_err());
        assert!(split_words("   \n").unwrap().is_empty());
    }
}
