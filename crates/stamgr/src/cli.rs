//! Clap derive structures for the `stamgr` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Kept free
//! of crate-internal types so `build.rs` can compile it standalone.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// stamgr -- station manager for UniFi network controllers
#[derive(Debug, Parser)]
#[command(
    name = "stamgr",
    version,
    about = "Manage stations on a UniFi network controller",
    long_about = "List, authorize, kick and block client stations through the\n\
        controller's session-authenticated JSON API.",
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
    /// Controller profile to use
    #[arg(long, short = 'p', env = "STAMGR_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller host name or IP (overrides profile)
    #[arg(long, env = "STAMGR_HOST", global = true)]
    pub host: Option<String>,

    /// Controller HTTPS port [default: 8443]
    #[arg(long, env = "STAMGR_PORT", global = true)]
    pub port: Option<u16>,

    /// Explicit controller root URL, replacing https://{host}:{port}/
    #[arg(long, env = "STAMGR_BASE_URL", global = true, hide = true)]
    pub base_url: Option<String>,

    /// Site identifier
    #[arg(long, short = 's', env = "STAMGR_SITE", global = true)]
    pub site: Option<String>,

    /// Login username
    #[arg(long, short = 'u', env = "STAMGR_USERNAME", global = true)]
    pub username: Option<String>,

    /// Controller API generation
    #[arg(long, env = "STAMGR_API_VERSION", global = true)]
    pub api_version: Option<ApiVersionArg>,

    /// Output format [default: table]
    #[arg(long, short = 'o', env = "STAMGR_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "STAMGR_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (no timeout when unset)
    #[arg(long, env = "STAMGR_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Value Enums ──────────────────────────────────────────────────────

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
    /// Plain text, one MAC per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ApiVersionArg {
    /// Legacy v2 controllers (no `ap_mac` on guest authorization)
    V2,
    /// v3 and later
    V3,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Query and manage client stations
    #[command(alias = "cl")]
    Clients(ClientsArgs),

    /// List adopted devices (access points, switches, gateways)
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CLIENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ClientsArgs {
    #[command(subcommand)]
    pub command: ClientsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClientsCommand {
    /// List connected clients
    #[command(alias = "ls")]
    List,

    /// Authorize guest access on the hotspot portal
    Authorize {
        /// Client MAC address
        mac: String,

        /// Authorization duration in minutes
        #[arg(long, required = true)]
        minutes: u32,

        /// Upload rate limit in Kbps
        #[arg(long)]
        up: Option<u32>,

        /// Download rate limit in Kbps
        #[arg(long)]
        down: Option<u32>,

        /// Data transfer limit in MB
        #[arg(long)]
        bytes: Option<u64>,

        /// MAC of the AP the client is connected to (faster authorization)
        #[arg(long)]
        ap_mac: Option<String>,
    },

    /// Revoke guest access
    Unauthorize {
        /// Client MAC address
        mac: String,
    },

    /// Disconnect a client without blocking it
    Kick {
        /// Client MAC address
        mac: String,
    },

    /// Block a client from connecting
    Block {
        /// Client MAC address
        mac: String,
    },

    /// Unblock a previously blocked client
    Unblock {
        /// Client MAC address
        mac: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DEVICES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List adopted devices
    #[command(alias = "ls")]
    List,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display the current configuration (secrets masked)
    Show,

    /// Store a profile's password in the system keyring
    SetPassword {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
