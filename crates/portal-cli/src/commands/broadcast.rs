//! Operator broadcast CLI command.

use clap::Args;

use crate::output::{self, OutputFormat};
use portal_core::error::AppError;
use portal_notify::{Audience, DispatchRequest, DispatchSummary, MessageContent};

/// Arguments for the broadcast command
#[derive(Debug, Args)]
pub struct BroadcastArgs {
    /// Title (inline message)
    #[arg(short, long, requires = "body", conflicts_with = "template")]
    pub title: Option<String>,
    /// Body (inline message)
    #[arg(short, long, requires = "title")]
    pub body: Option<String>,
    /// Stored template slug instead of inline text
    #[arg(long)]
    pub template: Option<String>,
    /// Template variables as `key=value`
    #[arg(long = "var", value_parser = super::parse_var)]
    pub vars: Vec<(String, String)>,
    /// Recipient identities (auth uid or employee id)
    #[arg(short, long = "to")]
    pub recipients: Vec<String>,
    /// Role labels
    #[arg(long = "role")]
    pub roles: Vec<String>,
    /// Every active employee
    #[arg(long)]
    pub everyone: bool,
    /// Also deliver to registered push tokens
    #[arg(long)]
    pub push: bool,
    /// Skip confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

impl BroadcastArgs {
    fn to_request(&self) -> DispatchRequest {
        let content = MessageContent {
            template: self.template.clone(),
            subject: self.title.clone(),
            body: self.body.clone(),
            variables: self.vars.iter().cloned().collect(),
        };
        let audience = Audience {
            recipients: self.recipients.clone(),
            roles: self.roles.clone(),
            everyone: self.everyone,
        };
        let request = DispatchRequest::new("broadcast", content, audience).triggered_by("cli");
        if self.push {
            request.with_push(None, None)
        } else {
            request
        }
    }
}

/// Execute the broadcast command
pub async fn execute(
    args: &BroadcastArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let request = args.to_request();
    if request.audience.is_empty() {
        return Err(AppError::validation(
            "Name at least one recipient, role or --everyone",
        ));
    }

    if !args.yes && args.everyone {
        let confirm = dialoguer::Confirm::new()
            .with_prompt("Send this broadcast to every active employee?")
            .default(false)
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?;
        if !confirm {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let config = super::load_config(config_path)?;
    let pool = super::create_db_pool(&config).await?;
    let state = portal_api::AppState::build(config, pool)?;

    let summary = state.dispatcher.dispatch(request).await?;
    print_summary(&summary, format);
    Ok(())
}

/// Print a dispatch summary.
pub fn print_summary(summary: &DispatchSummary, format: OutputFormat) {
    if format == OutputFormat::Json {
        output::print_json(summary, "{}");
        return;
    }

    let line = format!(
        "Dispatch {} {}: {} of {} recipients notified ({} sends, {} failed)",
        summary.dispatch_id,
        summary.status,
        summary.notified_count,
        summary.recipient_count,
        summary.attempted,
        summary.failed
    );
    if summary.failed > 0 || summary.attempted == 0 {
        output::print_warning(&line);
    } else {
        output::print_success(&line);
    }
    for tally in &summary.channels {
        output::print_kv(
            tally.channel.as_str(),
            &format!("{}/{} sent", tally.succeeded, tally.attempted),
        );
    }
    if !summary.recorded {
        output::print_warning("Delivery record could not be written");
    }
}
