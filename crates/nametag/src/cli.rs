//! Clap derive structures for the `nametag` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// nametag -- chat tags backed by your permission plugin
#[derive(Debug, Parser)]
#[command(
    name = "nametag",
    version,
    about = "Manage chat tags and their permissions from the command line",
    long_about = "Create, grant and apply display tags.\n\n\
        Tags live in a YAML file; permissions and prefixes are delegated to\n\
        an external permission backend through configurable command templates.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "NAMETAG_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "NAMETAG_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Print backend commands instead of running them
    #[arg(long, short = 'n', global = true)]
    pub dry_run: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one /tag invocation
    #[command(alias = "t")]
    Tag(TagArgs),

    /// Reload configuration, language and tags
    Reload(ReloadArgs),

    /// Interactive line session keeping menus and cache alive
    Console,

    /// List known tags
    #[command(alias = "ls")]
    List,

    /// Print completion candidates for a partial /tag invocation
    Complete(TagArgs),

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Tag ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TagArgs {
    /// Act as this player instead of the console
    #[arg(long = "as", value_name = "PLAYER")]
    pub player: Option<String>,

    /// Arguments passed to /tag, e.g. `create vip &6[VIP]`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 1..)]
    pub args: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ReloadArgs {
    /// Act as this player instead of the console
    #[arg(long = "as", value_name = "PLAYER")]
    pub player: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
