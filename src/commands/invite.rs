//! Setup link commands for managers.

use chrono::{TimeZone, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::app::App;
use crate::output::{self, OutputFormat};
use nextsteps_core::error::AppError;
use nextsteps_entity::invitation::{NewInvitation, PendingInvitation};

/// Arguments for invite commands
#[derive(Debug, Args)]
pub struct InviteArgs {
    /// Invite subcommand
    #[command(subcommand)]
    pub command: InviteCommand,
}

/// Invite subcommands
#[derive(Debug, Subcommand)]
pub enum InviteCommand {
    /// Generate a PIN setup link for a new colleague
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Department; repeat for several
        #[arg(short, long = "department", required = true)]
        departments: Vec<String>,
    },
    /// List setup links nobody has used yet
    List,
}

/// Pending invitation row
#[derive(Debug, Serialize, Tabled)]
struct InvitationRow {
    /// Token
    token: String,
    /// Name
    name: String,
    /// Departments
    departments: String,
    /// Issued at
    created_at: String,
}

impl From<&PendingInvitation> for InvitationRow {
    fn from(inv: &PendingInvitation) -> Self {
        Self {
            token: inv.token.clone(),
            name: inv.name.clone(),
            departments: inv.departments.join(", "),
            created_at: Utc
                .timestamp_millis_opt(inv.created_at)
                .single()
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Execute invite commands
pub async fn execute(args: &InviteArgs, app: &App, format: OutputFormat) -> Result<(), AppError> {
    let ctx = app.actor().await?;

    match &args.command {
        InviteCommand::Create { name, departments } => {
            if name.trim().is_empty() || departments.is_empty() {
                return Err(AppError::validation(
                    "Please enter name and at least one department.",
                ));
            }
            let link = app
                .invitations
                .generate_link(
                    &ctx,
                    NewInvitation {
                        name: name.trim().to_string(),
                        departments: departments.clone(),
                    },
                )
                .await?;
            match format {
                OutputFormat::Table => {
                    output::print_success("Setup link created. Share it with the colleague:");
                    println!("{}", link.url);
                }
                OutputFormat::Json => output::print_json(&link),
            }
            Ok(())
        }
        InviteCommand::List => {
            let pending = app.invitations.pending(&ctx).await?;
            let rows: Vec<InvitationRow> = pending.iter().map(InvitationRow::from).collect();
            output::print_list(&rows, format);
            Ok(())
        }
    }
}
