//! Clap derive structures for the `imou` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use imou_api::StreamProfile;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// imou -- command-line client for Imou cloud cameras
#[derive(Debug, Parser)]
#[command(
    name = "imou",
    version,
    about = "Manage Imou cloud cameras from the command line",
    long_about = "A CLI for the Imou open cloud API.\n\n\
        Authenticates with a developer app id and secret, then lists devices,\n\
        reads alarms, captures snapshots, and toggles camera features.",
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
    /// Account profile to use
    #[arg(long, short = 'p', env = "IMOU_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Developer app id (overrides profile)
    #[arg(long, env = "IMOU_APP_ID", global = true)]
    pub app_id: Option<String>,

    /// Developer app secret (overrides profile)
    #[arg(long, env = "IMOU_APP_SECRET", global = true, hide_env_values = true)]
    pub app_secret: Option<String>,

    /// Data center: sg, or, fk, cn, or a base URL (overrides profile)
    #[arg(long, short = 'd', env = "IMOU_DATA_CENTER", global = true)]
    pub data_center: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "IMOU_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Colorize online/offline labels
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print errors only
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "IMOU_INSECURE", global = true)]
    pub insecure: bool,

    /// HTTP timeout in seconds
    #[arg(long, env = "IMOU_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// Pretty-printed JSON
    Json,
    /// JSON on one line
    JsonCompact,
    /// One identifier per line
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Color only when stdout is a terminal and NO_COLOR is unset
    Auto,
    /// Force ANSI colors
    Always,
    /// No colors
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Quality {
    /// High definition (stream 0)
    Hd,
    /// Standard definition (stream 1)
    Sd,
}

impl From<Quality> for StreamProfile {
    fn from(q: Quality) -> Self {
        match q {
            Quality::Hd => Self::Hd,
            Quality::Sd => Self::Sd,
        }
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Verify credentials by requesting an access token
    Login,

    /// List, scan, and control devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Show recent alarm messages for a device
    Alarms {
        /// Device serial
        device: String,
    },

    /// Capture a snapshot and save it to a file
    Snapshot {
        /// Device serial
        device: String,

        /// Output file
        #[arg(long, short = 'O', value_name = "FILE")]
        out: PathBuf,
    },

    /// Live-stream bindings
    Live(LiveArgs),

    /// Show the night-vision mode
    NightVision {
        /// Device serial
        device: String,
    },

    /// Show SD card capacity
    #[command(alias = "sd")]
    Sdcard {
        /// Device serial
        device: String,
    },

    /// Alarm and status push callback
    Callback(CallbackArgs),

    /// Show or edit account profiles
    Config(ConfigArgs),

    /// Print a shell completion script
    Completions(CompletionsArgs),
}

//  DEVICES

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices on the account
    #[command(alias = "ls")]
    List {
        /// Fetch a single 100-device page instead of all pages
        #[arg(long)]
        page: Option<u32>,
    },

    /// Refresh the local device cache and report what changed
    Scan {
        /// Device cache file
        #[arg(long, value_name = "FILE")]
        cache: Option<PathBuf>,
    },

    /// Show online state of a device and its channels
    Status {
        /// Device serial
        device: String,
    },

    /// Reboot a device
    Restart {
        /// Device serial
        device: String,
    },

    /// Switch a camera feature on
    Enable {
        /// Device serial
        device: String,

        /// Vendor feature name (e.g. motionDetect, closeCamera, whiteLight)
        feature: String,
    },

    /// Switch a camera feature off
    Disable {
        /// Device serial
        device: String,

        /// Vendor feature name (e.g. motionDetect, closeCamera, whiteLight)
        feature: String,
    },
}

//  LIVE

#[derive(Debug, Args)]
pub struct LiveArgs {
    #[command(subcommand)]
    pub command: LiveCommand,
}

#[derive(Debug, Subcommand)]
pub enum LiveCommand {
    /// Create a live-stream binding
    Bind {
        /// Device serial
        device: String,

        /// Stream quality
        #[arg(long, default_value = "hd")]
        quality: Quality,
    },

    /// Show existing live-stream URLs
    Info {
        /// Device serial
        device: String,
    },
}

//  CALLBACK

#[derive(Debug, Args)]
pub struct CallbackArgs {
    #[command(subcommand)]
    pub command: CallbackCommand,
}

#[derive(Debug, Subcommand)]
pub enum CallbackCommand {
    /// Show the registered callback
    Get {
        /// Device serial
        device: String,
    },

    /// Register a callback URL; omit the URL to switch push off
    Set {
        /// Callback URL
        url: Option<String>,
    },
}

//  CONFIG

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current configuration (secrets masked)
    Show,

    /// Print the config file path
    Path,

    /// Set a value on the active profile
    Set {
        /// Profile key: app_id, app_secret_env, data_center, timeout, insecure, ca_cert
        key: String,

        /// Value to set
        value: String,
    },

    /// Store the active profile's app secret in the system keyring (read from stdin)
    SetSecret,
}

//  COMPLETIONS

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
