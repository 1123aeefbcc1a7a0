//! Subprocess-backed ports: command sink, permission authority and roster.
//!
//! Templates are split into words once and placeholders are substituted
//! per word, so a value always reaches the program as exactly the text
//! it holds. No shell is involved. An optional launcher prefix
//! (`program args...`) lets templates target whatever tool fronts the
//! permission backend.

use std::io;
use std::process::{Command, Output};

use tracing::{debug, warn};

use nametag_config::ExecutorConfig;
use nametag_core::dispatch::{PLAYER, Substitutions};
use nametag_core::{CommandSink, CoreError, PermissionAuthority, Player, PlayerDirectory};

const PERMISSION: &str = "permission";

// ── Launcher ─────────────────────────────────────────────────────────

/// Words every command is appended to. Empty runs commands directly.
#[derive(Debug, Clone, Default)]
pub struct Launcher {
    prefix: Vec<String>,
}

impl Launcher {
    pub fn new(prefix: Vec<String>) -> Self {
        Self { prefix }
    }

    pub fn from_config(cfg: &ExecutorConfig) -> Self {
        Self::new(cfg.program.iter().chain(&cfg.args).cloned().collect())
    }

    /// Split `template` into words, substitute each word and run the result.
    pub fn output(&self, template: &str, subs: &Substitutions) -> io::Result<Output> {
        let mut argv = self.argv(template, subs)?.into_iter();
        let program = argv
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty command"))?;
        Command::new(program).args(argv).output()
    }

    fn argv(&self, template: &str, subs: &Substitutions) -> io::Result<Vec<String>> {
        let words = shlex::split(template).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unbalanced quotes in '{template}'"),
            )
        })?;
        Ok(self
            .prefix
            .iter()
            .cloned()
            .chain(words.iter().map(|word| subs.apply(word)))
            .collect())
    }
}

// ── Command sink ─────────────────────────────────────────────────────

/// Runs each dispatched command, or prints it under `--dry-run`.
#[derive(Debug, Clone)]
pub struct ProcessSink {
    launcher: Launcher,
    dry_run: bool,
}

impl ProcessSink {
    pub fn new(launcher: Launcher, dry_run: bool) -> Self {
        Self { launcher, dry_run }
    }
}

impl CommandSink for ProcessSink {
    fn dispatch(&self, command: &str) -> Result<(), CoreError> {
        self.dispatch_template(command, &Substitutions::new())
    }

    fn dispatch_template(&self, template: &str, subs: &Substitutions) -> Result<(), CoreError> {
        let command = subs.apply(template);
        if self.dry_run {
            println!("$ {command}");
            return Ok(());
        }

        let output = self
            .launcher
            .output(template, subs)
            .map_err(|e| CoreError::Dispatch {
                command: command.clone(),
                reason: e.to_string(),
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CoreError::Dispatch {
                command,
                reason: format!(
                    "exit code {}: {}",
                    output.status.code().unwrap_or(-1),
                    stderr.trim()
                ),
            });
        }
        Ok(())
    }
}

// ── Permission authority ─────────────────────────────────────────────

/// Answers permission queries with the exit status of a check command.
///
/// Without a check template nobody holds any permission.
#[derive(Debug, Clone)]
pub struct CommandAuthority {
    launcher: Launcher,
    template: Option<String>,
}

impl CommandAuthority {
    pub fn new(launcher: Launcher, template: Option<String>) -> Self {
        Self { launcher, template }
    }
}

impl PermissionAuthority for CommandAuthority {
    fn has_permission(&self, player: &Player, permission: &str) -> bool {
        let Some(template) = &self.template else {
            return false;
        };
        let subs = Substitutions::new()
            .with(PLAYER, player.name())
            .with(PERMISSION, permission);

        match self.launcher.output(template, &subs) {
            Ok(output) => {
                let granted = output.status.success();
                debug!(player = %player, permission, granted, "permission check");
                granted
            }
            Err(e) => {
                warn!(command = %subs.apply(template), error = %e, "permission check failed to run");
                false
            }
        }
    }
}

// ── Player roster ────────────────────────────────────────────────────

/// Online players as printed by a roster command, one name per line.
///
/// Without a roster command any name resolves and nobody is listed
/// online.
#[derive(Debug, Clone)]
pub struct RosterDirectory {
    launcher: Launcher,
    command: Option<String>,
}

impl RosterDirectory {
    pub fn new(launcher: Launcher, command: Option<String>) -> Self {
        Self { launcher, command }
    }

    fn roster(&self, command: &str) -> Vec<Player> {
        match self.launcher.output(command, &Substitutions::new()) {
            Ok(output) if output.status.success() => parse_roster(&output.stdout),
            Ok(output) => {
                warn!(command, status = ?output.status.code(), "roster command failed");
                Vec::new()
            }
            Err(e) => {
                warn!(command, error = %e, "roster command failed to run");
                Vec::new()
            }
        }
    }
}

impl PlayerDirectory for RosterDirectory {
    fn find_player(&self, name: &str) -> Option<Player> {
        match &self.command {
            None => Some(Player::new(name)),
            Some(command) => self
                .roster(command)
                .into_iter()
                .find(|p| p.name().eq_ignore_ascii_case(name)),
        }
    }

    fn online_players(&self) -> Vec<Player> {
        self.command
            .as_deref()
            .map(|command| self.roster(command))
            .unwrap_or_default()
    }
}

fn parse_roster(stdout: &[u8]) -> Vec<Player> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Player::new)
        .collect()
}

#[cfg(all(test, unix))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use nametag_core::dispatch::DISPLAY;
    use pretty_assertions::assert_eq;

    const HOSTILE: &str = "&a$VIP`echo X`\"; touch pwned";

    fn direct() -> Launcher {
        Launcher::default()
    }

    #[test]
    fn values_reach_the_program_verbatim() {
        let subs = Substitutions::new().with(DISPLAY, HOSTILE);
        let output = direct()
            .output("printf %s \"{display}\"", &subs)
            .unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), HOSTILE);
    }

    #[test]
    fn sink_runs_substituted_words_without_a_shell() {
        let sink = ProcessSink::new(direct(), false);
        let subs = Substitutions::new().with(DISPLAY, HOSTILE);
        let exact = format!("test {{display}} = '{HOSTILE}'");
        assert!(sink.dispatch_template(&exact, &subs).is_ok());
        assert!(sink.dispatch_template("test {display} = '&a'", &subs).is_err());
    }

    #[test]
    fn launcher_prefix_comes_first() {
        let launcher = Launcher::new(vec!["printf".into(), "%s|".into()]);
        let subs = Substitutions::new().with(PLAYER, "Steve Jr");
        let output = launcher.output("lp user {player}", &subs).unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout), "lp|user|Steve Jr|");
    }

    #[test]
    fn unbalanced_template_is_rejected() {
        let err = direct()
            .output("lp user \"{player}", &Substitutions::new())
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn sink_reports_failing_commands() {
        let sink = ProcessSink::new(direct(), false);
        assert!(sink.dispatch("true").is_ok());

        let err = sink.dispatch("sh -c 'echo nope >&2; exit 3'").unwrap_err();
        assert!(err.to_string().contains("exit code 3: nope"), "{err}");
    }

    #[test]
    fn dry_run_never_executes() {
        let sink = ProcessSink::new(Launcher::new(vec!["/nonexistent/program".into()]), true);
        assert!(sink.dispatch("lp user Steve permission set x true").is_ok());
    }

    #[test]
    fn authority_uses_exit_status() {
        let steve = Player::new("Steve");
        let authority = CommandAuthority::new(
            direct(),
            Some(r#"test "{player}:{permission}" = "Steve:nametag.admin""#.into()),
        );
        assert!(authority.has_permission(&steve, "nametag.admin"));
        assert!(!authority.has_permission(&steve, "nametag.tags.vip"));
        assert!(!authority.has_permission(&Player::new("Alex"), "nametag.admin"));
    }

    #[test]
    fn authority_keeps_player_names_out_of_the_shell() {
        let authority = CommandAuthority::new(
            direct(),
            Some("test {player} = 'x;true'".into()),
        );
        assert!(authority.has_permission(&Player::new("x;true"), "nametag.admin"));
        assert!(!authority.has_permission(&Player::new("y;true"), "nametag.admin"));
    }

    #[test]
    fn authority_without_template_denies() {
        let authority = CommandAuthority::new(direct(), None);
        assert!(!authority.has_permission(&Player::new("Steve"), "nametag.admin"));
    }

    #[test]
    fn roster_lists_and_resolves_case_insensitively() {
        let dir = RosterDirectory::new(direct(), Some(r"printf 'Steve\n\n  Alex \n'".into()));
        assert_eq!(
            dir.online_players(),
            vec![Player::new("Steve"), Player::new("Alex")]
        );
        assert_eq!(dir.find_player("alex"), Some(Player::new("Alex")));
        assert_eq!(dir.find_player("Notch"), None);
    }

    #[test]
    fn roster_absent_resolves_anyone() {
        let dir = RosterDirectory::new(direct(), None);
        assert!(dir.online_players().is_empty());
        assert_eq!(dir.find_player("Notch"), Some(Player::new("Notch")));
    }
}
