//! sentinel - Shopfloor access-scan and safety-alert journal
//!
//! This is the CLI application that wires configuration, the durable
//! key-value store, and the bounded journals together.

mod cli;
mod display;
mod error;

use crate::cli::{AlertCommands, Cli, Commands, GlobalArgs, ScanCommands};
use crate::display::{AlertStats, OutputRenderer};
use crate::error::CliError;
use clap::Parser;
use sentinel_config::{Config, SAFETY_ALERTS_KEY, SCAN_HISTORY_KEY};
use sentinel_journal::{EventRecord, Journal};
use sentinel_store::KvStore;
use sentinel_types::{AlertStatus, PpeStatus, SafetyAlert, ScanOutcome};
use std::process;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    init_tracing(json_mode, cli.global.debug);

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting sentinel v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration with proper precedence:
    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;

    // 2. Merge environment variables
    config.merge_env()?;

    // 3. Apply CLI flags (highest precedence)
    apply_cli_config(&mut config, &cli.global);

    let store = KvStore::new(config.data_path());
    store.init().await.map_err(CliError::from)?;

    let renderer = OutputRenderer::new(cli.global.json, config.general.color);

    match cli.command {
        Commands::Scan(command) => {
            let journal = Journal::open(store, SCAN_HISTORY_KEY, config.history.capacity).await?;
            execute_scan_command(command, journal, &renderer).await?;
        }
        Commands::Alert(command) => {
            let journal = Journal::open(store, SAFETY_ALERTS_KEY, config.alerts.capacity).await?;
            execute_alert_command(command, journal, &renderer).await?;
        }
    }

    info!("Command completed successfully");
    Ok(())
}

async fn execute_scan_command(
    command: ScanCommands,
    mut journal: Journal<ScanOutcome>,
    renderer: &OutputRenderer,
) -> Result<(), CliError> {
    match command {
        ScanCommands::Record {
            worker,
            name,
            helmet,
            gloves,
            boots,
        } => {
            if worker.trim().is_empty() {
                return Err(CliError::InvalidArguments(
                    "worker id must not be empty".to_string(),
                ));
            }
            let outcome =
                ScanOutcome::evaluate(worker.clone(), name, PpeStatus::new(helmet, gloves, boots));
            let record = EventRecord::new(scan_id(&worker), outcome);
            journal.append(record).await?;
            renderer.render_scan_outcome(&journal.entries()[0])?;
        }
        ScanCommands::List { limit } => {
            let entries = journal.entries();
            let shown = limit.map_or(entries, |n| &entries[..n.min(entries.len())]);
            renderer.render_scan_list(shown)?;
        }
        ScanCommands::Clear => {
            journal.clear().await?;
            renderer.render_message("Scan history cleared.")?;
        }
    }
    Ok(())
}

async fn execute_alert_command(
    command: AlertCommands,
    mut journal: Journal<SafetyAlert>,
    renderer: &OutputRenderer,
) -> Result<(), CliError> {
    match command {
        AlertCommands::Raise {
            zone,
            worker,
            name,
            kind,
            severity,
            confidence,
        } => {
            let alert = SafetyAlert {
                zone,
                worker_id: worker,
                worker_name: name,
                alert_type: kind,
                severity,
                status: AlertStatus::Active,
                confidence,
            };
            let id = next_alert_id(journal.entries());
            journal.append(EventRecord::new(id.clone(), alert)).await?;
            renderer.render_message(&format!("Alert {id} raised."))?;
        }
        AlertCommands::Ack { id } => {
            if journal.update(&id, SafetyAlert::acknowledge).await? {
                renderer.render_message(&format!("Alert {id} acknowledged."))?;
            } else {
                return Err(sentinel_errors::Error::from(
                    sentinel_errors::JournalError::RecordNotFound { id },
                )
                .into());
            }
        }
        AlertCommands::Resolve { id } => {
            if journal.update(&id, SafetyAlert::resolve).await? {
                renderer.render_message(&format!("Alert {id} resolved."))?;
            } else {
                return Err(sentinel_errors::Error::from(
                    sentinel_errors::JournalError::RecordNotFound { id },
                )
                .into());
            }
        }
        AlertCommands::List { status, severity } => {
            let stats = AlertStats::compute(journal.entries());
            let filtered: Vec<_> = journal
                .entries()
                .iter()
                .filter(|r| status.is_none_or(|s| r.payload.status == s))
                .filter(|r| severity.is_none_or(|s| r.payload.severity == s))
                .cloned()
                .collect();
            renderer.render_alert_list(&filtered, stats)?;
        }
        AlertCommands::ClearResolved => {
            let dropped = journal
                .retain(|r| r.payload.status != AlertStatus::Resolved)
                .await?;
            renderer.render_message(&format!("Removed {dropped} resolved alert(s)."))?;
        }
        AlertCommands::Clear => {
            journal.clear().await?;
            renderer.render_message("All alerts cleared.")?;
        }
    }
    Ok(())
}

/// Apply CLI flag overrides to the loaded configuration
fn apply_cli_config(config: &mut Config, global: &GlobalArgs) {
    if let Some(data_dir) = &global.data_dir {
        config.paths.data_path = Some(data_dir.clone());
    }
    if let Some(color) = global.color {
        config.general.color = color;
    }
}

/// Scan record id: worker id plus capture time in millis
fn scan_id(worker_id: &str) -> String {
    format!("{worker_id}-{}", chrono::Utc::now().timestamp_millis())
}

/// Next sequence-like alert id (A001, A002, ...) based on the ids present
fn next_alert_id(entries: &[EventRecord<SafetyAlert>]) -> String {
    let next = entries
        .iter()
        .filter_map(|r| r.id.strip_prefix('A'))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .max()
        .map_or(1, |max| max + 1);
    format!("A{next:03}")
}

fn init_tracing(json_mode: bool, debug_enabled: bool) {
    use tracing_subscriber::EnvFilter;

    let default_filter = if debug_enabled { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Logs go to stderr so JSON output on stdout stays machine-readable.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json_mode {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_ids_are_sequential() {
        let entries = vec![
            EventRecord::new(
                "A002",
                SafetyAlert {
                    zone: "Storage".into(),
                    worker_id: "W104".into(),
                    worker_name: "Arun Singh".into(),
                    alert_type: sentinel_types::AlertKind::RestrictedArea,
                    severity: sentinel_types::Severity::High,
                    status: AlertStatus::Active,
                    confidence: 96,
                },
            ),
            EventRecord::new(
                "A001",
                SafetyAlert {
                    zone: "Assembly Line".into(),
                    worker_id: "W105".into(),
                    worker_name: "Sneha Patel".into(),
                    alert_type: sentinel_types::AlertKind::NoGloves,
                    severity: sentinel_types::Severity::Medium,
                    status: AlertStatus::Active,
                    confidence: 87,
                },
            ),
        ];
        assert_eq!(next_alert_id(&entries), "A003");
        assert_eq!(next_alert_id(&[]), "A001");
    }

    #[test]
    fn scan_ids_embed_the_worker() {
        let id = scan_id("W101");
        assert!(id.starts_with("W101-"));
    }
}
