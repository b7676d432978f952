//! Output rendering and formatting

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use console::{Style, Term};
use sentinel_journal::EventRecord;
use sentinel_types::{AccessDecision, AlertStatus, ColorChoice, SafetyAlert, ScanOutcome, Severity};
use std::io;

/// Summary counts shown above the alert list
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct AlertStats {
    pub total: usize,
    pub active: usize,
    pub critical: usize,
    pub acknowledged: usize,
}

impl AlertStats {
    #[must_use]
    pub fn compute(entries: &[EventRecord<SafetyAlert>]) -> Self {
        Self {
            total: entries.len(),
            active: entries
                .iter()
                .filter(|r| r.payload.status == AlertStatus::Active)
                .count(),
            critical: entries
                .iter()
                .filter(|r| r.payload.severity == Severity::Critical)
                .count(),
            acknowledged: entries
                .iter()
                .filter(|r| r.payload.status == AlertStatus::Acknowledged)
                .count(),
        }
    }
}

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    /// Resolved color switch
    colors: bool,
}

impl OutputRenderer {
    /// Create new output renderer
    #[must_use]
    pub fn new(json_output: bool, color_choice: ColorChoice) -> Self {
        let colors = match color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => Term::stdout().features().colors_supported(),
        };
        Self {
            json_output,
            colors,
        }
    }

    /// Render a freshly recorded scan outcome
    pub fn render_scan_outcome(&self, record: &EventRecord<ScanOutcome>) -> io::Result<()> {
        if self.json_output {
            return self.render_json(record);
        }

        let outcome = &record.payload;
        let decision = match outcome.access {
            AccessDecision::Granted => self.style_ok().apply_to("ACCESS GRANTED"),
            AccessDecision::Denied => self.style_bad().apply_to("ACCESS DENIED"),
        };
        println!("{decision}  {} ({})", outcome.name, outcome.worker_id);
        println!(
            "  helmet: {}  gloves: {}  boots: {}",
            check(outcome.ppe_status.helmet),
            check(outcome.ppe_status.gloves),
            check(outcome.ppe_status.boots)
        );
        if let Some(reason) = &outcome.reason {
            println!("  reason: {reason}");
        }
        println!("  recorded: {} ({})", record.timestamp.to_rfc3339(), record.id);
        Ok(())
    }

    /// Render the scan history as a table
    pub fn render_scan_list(&self, entries: &[EventRecord<ScanOutcome>]) -> io::Result<()> {
        if self.json_output {
            return self.render_json(&entries);
        }
        if entries.is_empty() {
            println!("No scans recorded.");
            return Ok(());
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Time", "Worker", "Name", "PPE", "Access", "Reason"]);

        for record in entries {
            let outcome = &record.payload;
            let ppe = format!(
                "{}{}{}",
                check(outcome.ppe_status.helmet),
                check(outcome.ppe_status.gloves),
                check(outcome.ppe_status.boots)
            );
            let access = match outcome.access {
                AccessDecision::Granted => Cell::new("granted").fg(Color::Green),
                AccessDecision::Denied => Cell::new("denied").fg(Color::Red),
            };
            table.add_row(vec![
                Cell::new(record.timestamp.format("%Y-%m-%d %H:%M:%S")),
                Cell::new(&outcome.worker_id),
                Cell::new(&outcome.name),
                Cell::new(ppe),
                access,
                Cell::new(outcome.reason.as_deref().unwrap_or("-")),
            ]);
        }
        println!("{table}");
        Ok(())
    }

    /// Render alerts with summary counts
    pub fn render_alert_list(
        &self,
        entries: &[EventRecord<SafetyAlert>],
        stats: AlertStats,
    ) -> io::Result<()> {
        if self.json_output {
            #[derive(serde::Serialize)]
            struct Listing<'a> {
                stats: AlertStats,
                alerts: &'a [EventRecord<SafetyAlert>],
            }
            return self.render_json(&Listing {
                stats,
                alerts: entries,
            });
        }

        println!(
            "total: {}  active: {}  critical: {}  acknowledged: {}",
            stats.total, stats.active, stats.critical, stats.acknowledged
        );
        if entries.is_empty() {
            println!("No alerts match the selected filters.");
            return Ok(());
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                "Id", "Time", "Zone", "Worker", "Type", "Severity", "Status", "Conf",
            ]);

        for record in entries {
            let alert = &record.payload;
            table.add_row(vec![
                Cell::new(&record.id),
                Cell::new(record.timestamp.format("%Y-%m-%d %H:%M:%S")),
                Cell::new(&alert.zone),
                Cell::new(format!("{} ({})", alert.worker_name, alert.worker_id)),
                Cell::new(alert.alert_type),
                severity_cell(alert.severity),
                status_cell(alert.status),
                Cell::new(format!("{}%", alert.confidence)),
            ]);
        }
        println!("{table}");
        Ok(())
    }

    /// Render a plain confirmation message
    pub fn render_message(&self, message: &str) -> io::Result<()> {
        if self.json_output {
            #[derive(serde::Serialize)]
            struct Message<'a> {
                message: &'a str,
            }
            return self.render_json(&Message { message });
        }
        println!("{message}");
        Ok(())
    }

    fn render_json<T: serde::Serialize>(&self, value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        println!("{json}");
        Ok(())
    }

    fn style_ok(&self) -> Style {
        if self.colors {
            Style::new().green().bold()
        } else {
            Style::new()
        }
    }

    fn style_bad(&self) -> Style {
        if self.colors {
            Style::new().red().bold()
        } else {
            Style::new()
        }
    }
}

fn check(present: bool) -> &'static str {
    if present {
        "✓"
    } else {
        "✗"
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Low => Cell::new("low"),
        Severity::Medium => Cell::new("medium").fg(Color::Yellow),
        Severity::High => Cell::new("high").fg(Color::DarkYellow),
        Severity::Critical => Cell::new("critical").fg(Color::Red),
    }
}

fn status_cell(status: AlertStatus) -> Cell {
    match status {
        AlertStatus::Active => Cell::new("active").fg(Color::Yellow),
        AlertStatus::Acknowledged => Cell::new("acknowledged").fg(Color::Cyan),
        AlertStatus::Resolved => Cell::new("resolved").fg(Color::Green),
    }
}
