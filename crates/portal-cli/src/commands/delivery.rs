//! Delivery log CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use crate::output::{self, OutputFormat};
use portal_core::error::AppError;
use portal_core::types::pagination::PageRequest;
use portal_database::repositories::DeliveryRecordRepository;
use portal_entity::delivery::DeliveryRecord;

/// Arguments for delivery commands
#[derive(Debug, Args)]
pub struct DeliveryArgs {
    /// Delivery subcommand
    #[command(subcommand)]
    pub command: DeliveryCommand,
}

/// Delivery subcommands
#[derive(Debug, Subcommand)]
pub enum DeliveryCommand {
    /// List delivery records, newest first
    List {
        /// Filter by event name
        #[arg(short, long)]
        event: Option<String>,
        /// Page number
        #[arg(short, long, default_value = "1")]
        page: u64,
        /// Records per page
        #[arg(short, long, default_value = "20")]
        limit: u64,
    },
    /// Show one delivery record with its channel breakdown
    Show {
        /// Dispatch id
        id: Uuid,
    },
}

/// Delivery display row
#[derive(Debug, Serialize, Tabled)]
struct DeliveryRow {
    /// Time
    time: String,
    /// Event
    event: String,
    /// Title
    title: String,
    /// Status
    status: String,
    /// Notified of total recipients
    notified: String,
    /// Sends ok / attempted
    sends: String,
}

impl From<&DeliveryRecord> for DeliveryRow {
    fn from(r: &DeliveryRecord) -> Self {
        Self {
            time: r.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            event: r.event.clone(),
            title: r.title.chars().take(40).collect(),
            status: r.status.to_string(),
            notified: format!("{}/{}", r.notified_count, r.recipient_count),
            sends: format!("{}/{}", r.success_count, r.attempted_count),
        }
    }
}

/// Execute delivery commands
pub async fn execute(
    args: &DeliveryArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let pool = super::create_db_pool(&config).await?;
    let repo = DeliveryRecordRepository::new(pool);

    match &args.command {
        DeliveryCommand::List { event, page, limit } => {
            let response = repo
                .find_page(event.as_deref(), &PageRequest::new(*page, *limit))
                .await?;
            match format {
                OutputFormat::Json => output::print_json(&response, "{}"),
                OutputFormat::Table => {
                    let rows: Vec<DeliveryRow> =
                        response.items.iter().map(DeliveryRow::from).collect();
                    output::print_list(&rows, format);
                    println!(
                        "Page {} of {} ({} records)",
                        response.page, response.total_pages, response.total_items
                    );
                }
            }
        }
        DeliveryCommand::Show { id } => {
            let record = repo
                .find_by_id(*id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Delivery record {id} not found")))?;
            match format {
                OutputFormat::Json => output::print_json(&record, "{}"),
                OutputFormat::Table => {
                    output::print_kv("Event", &record.event);
                    output::print_kv("Title", &record.title);
                    output::print_kv("Status", record.status.as_str());
                    output::print_kv(
                        "Template",
                        record.template_slug.as_deref().unwrap_or("-"),
                    );
                    output::print_kv(
                        "Recipients",
                        &format!("{} notified of {}", record.notified_count, record.recipient_count),
                    );
                    output::print_kv("About", record.subject_ref.as_deref().unwrap_or("-"));
                    output::print_kv("Triggered by", record.triggered_by.as_deref().unwrap_or("-"));
                    for tally in record.channels.iter() {
                        output::print_kv(
                            tally.channel.as_str(),
                            &format!(
                                "{} attempted, {} sent, {} failed",
                                tally.attempted, tally.succeeded, tally.failed
                            ),
                        );
                    }
                }
            }
        }
    }

    Ok(())
}
