//! Clap derive structures for the `panos-actions` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// panos-actions -- commit and push configuration on PAN-OS appliances
#[derive(Debug, Parser)]
#[command(
    name = "panos-actions",
    version,
    about = "Commit, push and key actions for PAN-OS firewalls and Panorama",
    long_about = "Runs the commit and push-to-devices actions against a firewall or\n\
        Panorama over the XML API, waiting on the resulting jobs.\n\n\
        Action models are JSON documents; results are reported as diagnostics.",
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
    /// Appliance profile to use
    #[arg(long, short = 'p', env = "PANOS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Appliance hostname or IP (overrides profile)
    #[arg(long, short = 'H', env = "PANOS_HOSTNAME", global = true)]
    pub hostname: Option<String>,

    /// XML API key
    #[arg(long, env = "PANOS_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Username, exchanged with the password for an API key
    #[arg(long, short = 'u', env = "PANOS_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password for --username
    #[arg(long, env = "PANOS_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PANOS_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "PANOS_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "PANOS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Seconds between job status polls
    #[arg(long, env = "PANOS_POLL_INTERVAL", global = true)]
    pub poll_interval: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
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
    /// Commit the candidate configuration, optionally pushing afterwards
    Commit(ModelArgs),

    /// Push committed Panorama configuration to managed devices
    Push(ModelArgs),

    /// Generate a VM auth key for bootstrapping VM-Series firewalls
    #[command(name = "vm-auth-key")]
    VmAuthKey(VmAuthKeyArgs),

    /// Build and decode resource import identifiers
    #[command(name = "import-id")]
    ImportId(ImportIdArgs),

    /// Validate a rule position block
    Position(PositionArgs),

    /// Show the appliance's system info and detected role
    #[command(name = "system-info")]
    SystemInfo,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Action models ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ModelArgs {
    /// JSON action model (`-` for stdin; omitted means an empty model)
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct VmAuthKeyArgs {
    /// Key lifetime in hours (1-8760)
    #[arg(long, short = 'l', default_value_t = panos_core::vm_auth_key::DEFAULT_LIFETIME_HOURS)]
    pub lifetime_hours: u32,
}

// ── Import ids ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ImportIdArgs {
    #[command(subcommand)]
    pub command: ImportIdCommand,
}

#[derive(Debug, Subcommand)]
pub enum ImportIdCommand {
    /// Encode an import id for a resource's identity object
    Generate {
        /// Resource type (e.g. panos_address)
        resource: String,

        /// JSON identity object (`-` for stdin)
        #[arg(long, short = 'f', default_value = "-")]
        file: PathBuf,
    },

    /// Decode an import id back into its identity object
    Decode {
        /// The base64 import id
        id: String,
    },

    /// List resource types with an import id routine
    Resources,
}

// ── Position ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PositionArgs {
    /// JSON position block (`-` for stdin)
    #[arg(long, short = 'f', default_value = "-")]
    pub file: PathBuf,

    /// Current rulebase order, to check whether the position holds
    #[arg(long, value_delimiter = ',', requires = "rules")]
    pub order: Vec<String>,

    /// Managed rule names, in order
    #[arg(long, value_delimiter = ',', requires = "order")]
    pub rules: Vec<String>,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
