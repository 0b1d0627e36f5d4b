//! Clap derive structures for the `bouncer` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

use bouncer_core::Vocabulary;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// bouncer -- control a barrier device from the command line
#[derive(Debug, Parser)]
#[command(
    name = "bouncer",
    version,
    about = "Check and toggle a bouncer barrier device from the command line",
    long_about = "Logs in to the device-management backend, reads the configured\n\
        barrier controller, and blocks or unblocks it. Sessions are refreshed\n\
        automatically; an expired access token is renewed and the request\n\
        retried once.",
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
    /// Deployment profile to use
    #[arg(long, short = 'p', env = "BOUNCER_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend base URL (overrides profile)
    #[arg(long, env = "BOUNCER_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Device identifier (overrides profile)
    #[arg(long, env = "BOUNCER_DEVICE_ID", global = true)]
    pub device_id: Option<String>,

    /// Status vocabulary: action or parking (overrides profile)
    #[arg(long, env = "BOUNCER_VOCABULARY", global = true)]
    pub vocabulary: Option<Vocabulary>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "BOUNCER_OUTPUT",
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

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "BOUNCER_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "BOUNCER_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
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
    /// Show the configured device and its command status
    #[command(alias = "st")]
    Status,

    /// List every device visible to the account
    #[command(alias = "ls")]
    Devices,

    /// Flip the configured device between blocked and unblocked
    #[command(alias = "t")]
    Toggle,

    /// Block the configured device
    Block,

    /// Unblock the configured device
    Unblock,

    /// Keep a live session open and stream the activity log
    Watch(WatchArgs),

    /// Explain every command status of the active vocabulary
    Legend,

    /// Inspect CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Re-read the device every N seconds
    #[arg(long, value_name = "SECS")]
    pub poll: Option<u64>,

    /// Session refresh period in seconds (overrides profile; 0 disables)
    #[arg(long, value_name = "SECS")]
    pub refresh_interval: Option<u64>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display the resolved profile (password redacted)
    Show,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
