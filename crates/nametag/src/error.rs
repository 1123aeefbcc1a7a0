//! CLI error types with miette diagnostics.
//!
//! Maps `ConfigError` and `CoreError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use nametag_config::ConfigError;
use nametag_core::{CoreError, Refusal};

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const PERMISSION: i32 = 4;
    pub const CONFLICT: i32 = 5;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Routing ──────────────────────────────────────────────────────
    #[error("{sender} may not run this command")]
    #[diagnostic(
        code(nametag::no_permission),
        help("Grant the admin node, or run the command without --as")
    )]
    PermissionDenied { sender: String },

    #[error("A bare /tag needs a player")]
    #[diagnostic(
        code(nametag::player_only),
        help("Open the tag menu with: nametag tag --as <player>")
    )]
    PlayerOnly,

    #[error("The {action} command did not complete")]
    #[diagnostic(
        code(nametag::rejected),
        help("See the message above for the reason")
    )]
    Rejected { action: String },

    #[error("The {action} command was refused: {refusal}")]
    #[diagnostic(
        code(nametag::refused),
        help("See the message above for the reason")
    )]
    Refused { action: String, refusal: Refusal },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(nametag::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(nametag::config_exists),
        help("Use --force to overwrite it")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(
        code(nametag::config),
        help("Locate the file with: nametag config path")
    )]
    Config(#[from] ConfigError),

    // ── Backend ──────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(nametag::core))]
    Core(#[from] CoreError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(nametag::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(nametag::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to render TOML: {0}")]
    #[diagnostic(code(nametag::toml))]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::PlayerOnly | Self::Validation { .. } => exit_code::USAGE,
            Self::Refused { refusal, .. } => match refusal {
                Refusal::Usage | Refusal::UnknownAction => exit_code::USAGE,
                Refusal::TagExists => exit_code::CONFLICT,
                Refusal::InvalidId
                | Refusal::TagNotFound
                | Refusal::PlayerNotFound
                | Refusal::Failed => exit_code::GENERAL,
            },
            Self::ConfigExists { .. } => exit_code::CONFLICT,
            Self::Config(_) => exit_code::CONFIG,
            _ => exit_code::GENERAL,
        }
    }
}
