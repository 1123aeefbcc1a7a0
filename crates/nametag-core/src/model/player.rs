// ── Players and senders ──

use std::fmt;

use serde::Serialize;

/// Identity of a player as understood by the external authority.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Player {
    name: String,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Origin of a command: the console or a player.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommandSender {
    Console,
    Player(Player),
}

impl CommandSender {
    pub const CONSOLE_NAME: &'static str = "CONSOLE";

    pub fn as_player(&self) -> Option<&Player> {
        match self {
            Self::Player(p) => Some(p),
            Self::Console => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Player(p) => p.name(),
            Self::Console => Self::CONSOLE_NAME,
        }
    }
}

impl From<Player> for CommandSender {
    fn from(player: Player) -> Self {
        Self::Player(player)
    }
}
