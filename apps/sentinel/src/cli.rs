//! Command line interface definition

use clap::{Parser, Subcommand};
use sentinel_types::{AlertKind, AlertStatus, ColorChoice, Severity};
use std::path::PathBuf;

/// sentinel - shopfloor access-scan and safety-alert journal
#[derive(Parser)]
#[command(name = "sentinel")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Shopfloor access-scan and safety-alert journal")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Use alternate data directory
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Worker access-scan history
    #[command(subcommand)]
    Scan(ScanCommands),

    /// Safety-alert triage
    #[command(subcommand)]
    Alert(AlertCommands),
}

/// Access-scan operations
#[derive(Subcommand)]
pub enum ScanCommands {
    /// Record a scan outcome for a worker
    Record {
        /// Worker identifier (e.g. W101)
        #[arg(long)]
        worker: String,

        /// Worker display name
        #[arg(long)]
        name: String,

        /// Helmet detected
        #[arg(long)]
        helmet: bool,

        /// Gloves detected
        #[arg(long)]
        gloves: bool,

        /// Boots detected
        #[arg(long)]
        boots: bool,
    },

    /// List recorded scans, newest first
    #[command(alias = "ls")]
    List {
        /// Show at most this many entries
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Wipe the scan history
    Clear,
}

/// Safety-alert operations
#[derive(Subcommand)]
pub enum AlertCommands {
    /// Raise a new alert
    Raise {
        /// Zone where the violation was detected
        #[arg(long)]
        zone: String,

        /// Worker identifier
        #[arg(long)]
        worker: String,

        /// Worker display name
        #[arg(long)]
        name: String,

        /// Violation category
        #[arg(long, value_enum)]
        kind: AlertKind,

        /// Alert severity
        #[arg(long, value_enum)]
        severity: Severity,

        /// Detection confidence percentage
        #[arg(long, default_value_t = 90, value_parser = clap::value_parser!(u8).range(0..=100))]
        confidence: u8,
    },

    /// Acknowledge an active alert
    Ack {
        /// Alert identifier (e.g. A001)
        id: String,
    },

    /// Resolve an alert
    Resolve {
        /// Alert identifier (e.g. A001)
        id: String,
    },

    /// List alerts, newest first
    #[command(alias = "ls")]
    List {
        /// Only alerts with this triage status
        #[arg(long, value_enum)]
        status: Option<AlertStatus>,

        /// Only alerts with this severity
        #[arg(long, value_enum)]
        severity: Option<Severity>,
    },

    /// Remove resolved alerts, keeping the rest
    ClearResolved,

    /// Wipe all alerts
    Clear,
}
