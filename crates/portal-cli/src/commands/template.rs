//! Notification template CLI commands.

use std::collections::BTreeMap;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use portal_core::error::AppError;
use portal_database::repositories::TemplateRepository;
use portal_entity::template::UpsertTemplate;
use portal_notify::MessageContent;
use portal_service::template::valid_slug;

/// Arguments for template commands
#[derive(Debug, Args)]
pub struct TemplateArgs {
    /// Template subcommand
    #[command(subcommand)]
    pub command: TemplateCommand,
}

/// Template subcommands
#[derive(Debug, Subcommand)]
pub enum TemplateCommand {
    /// List stored templates
    List,
    /// Show one template, optionally rendered
    Show {
        /// Template slug
        slug: String,
        /// Render with `key=value` variables
        #[arg(short, long = "var", value_parser = super::parse_var)]
        vars: Vec<(String, String)>,
    },
    /// Create or replace a template
    Set {
        /// Template slug
        slug: String,
        /// Subject pattern (prompted when omitted)
        #[arg(short, long)]
        subject: Option<String>,
        /// Body pattern
        #[arg(short, long, conflicts_with = "body_file")]
        body: Option<String>,
        /// Read the body pattern from a file
        #[arg(long)]
        body_file: Option<String>,
        /// Free-form description
        #[arg(short, long)]
        description: Option<String>,
    },
}

/// Template display row
#[derive(Debug, Serialize, Tabled)]
struct TemplateRow {
    /// Slug
    slug: String,
    /// Subject pattern
    subject: String,
    /// Description
    description: String,
    /// Last update
    updated: String,
}

/// Execute template commands
pub async fn execute(
    args: &TemplateArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let pool = super::create_db_pool(&config).await?;
    let repo = TemplateRepository::new(pool.clone());

    match &args.command {
        TemplateCommand::List => {
            let rows: Vec<TemplateRow> = repo
                .find_all()
                .await?
                .into_iter()
                .map(|t| TemplateRow {
                    slug: t.slug,
                    subject: t.subject,
                    description: t.description.unwrap_or_default(),
                    updated: t.updated_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
        TemplateCommand::Show { slug, vars } => {
            let template = repo
                .find_by_slug(slug)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Template '{slug}' not found")))?;

            if vars.is_empty() {
                match format {
                    OutputFormat::Json => output::print_json(&template, "{}"),
                    OutputFormat::Table => {
                        output::print_kv("Slug", &template.slug);
                        output::print_kv("Subject", &template.subject);
                        output::print_kv(
                            "Description",
                            template.description.as_deref().unwrap_or("-"),
                        );
                        println!();
                        println!("{}", template.body);
                    }
                }
                return Ok(());
            }

            let variables: BTreeMap<String, String> = vars.iter().cloned().collect();
            let state = portal_api::AppState::build(config, pool)?;
            let rendered = state
                .dispatcher
                .templates()
                .resolve(&MessageContent::template(slug.clone(), variables))
                .await?;
            match format {
                OutputFormat::Json => output::print_json(&rendered, "{}"),
                OutputFormat::Table => {
                    output::print_kv("Subject", &rendered.subject);
                    println!();
                    println!("{}", rendered.body);
                }
            }
        }
        TemplateCommand::Set {
            slug,
            subject,
            body,
            body_file,
            description,
        } => {
            if !valid_slug(slug) {
                return Err(AppError::validation(
                    "Template slug must be lowercase letters, digits and dashes",
                ));
            }

            let subject = match subject {
                Some(subject) => subject.clone(),
                None => dialoguer::Input::<String>::new()
                    .with_prompt("Subject")
                    .interact_text()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
            };
            let body = match (body, body_file) {
                (Some(body), _) => body.clone(),
                (None, Some(path)) => tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| AppError::internal(format!("Failed to read '{path}': {e}")))?,
                (None, None) => dialoguer::Input::<String>::new()
                    .with_prompt("Body")
                    .interact_text()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
            };
            if subject.trim().is_empty() || body.trim().is_empty() {
                return Err(AppError::validation("Subject and body must not be empty"));
            }

            let saved = repo
                .upsert(
                    slug,
                    &UpsertTemplate {
                        subject,
                        body,
                        description: description.clone(),
                    },
                )
                .await?;
            output::print_success(&format!("Template '{}' saved", saved.slug));
        }
    }

    Ok(())
}
