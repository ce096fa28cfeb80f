//! Colleague management commands.

use clap::{Args, Subcommand};

use super::session::StaffRow;
use crate::app::App;
use crate::output::{self, OutputFormat};
use nextsteps_core::error::AppError;
use nextsteps_entity::staff::{NewStaff, StaffRole};

/// Arguments for staff commands
#[derive(Debug, Args)]
pub struct StaffArgs {
    /// Staff subcommand
    #[command(subcommand)]
    pub command: StaffCommand,
}

/// Staff subcommands
#[derive(Debug, Subcommand)]
pub enum StaffCommand {
    /// Add a colleague with a PIN you choose (managers)
    Add {
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Department; repeat for several
        #[arg(short, long = "department", required = true)]
        departments: Vec<String>,
        /// 6-digit PIN; prompted for when omitted
        #[arg(long)]
        pin: Option<String>,
        /// Make the colleague a manager
        #[arg(long)]
        manager: bool,
    },
    /// List colleagues (managers)
    List,
    /// Create the first manager on an empty store
    Bootstrap {
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Department; repeat for several
        #[arg(short, long = "department", required = true)]
        departments: Vec<String>,
        /// 6-digit PIN; prompted for when omitted
        #[arg(long)]
        pin: Option<String>,
    },
}

/// Execute staff commands
pub async fn execute(args: &StaffArgs, app: &App, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        StaffCommand::Add {
            name,
            departments,
            pin,
            manager,
        } => {
            let ctx = app.actor().await?;
            let data = new_staff(name, departments, pin.as_deref())?;
            let data = NewStaff {
                role: if *manager {
                    StaffRole::Manager
                } else {
                    StaffRole::Staff
                },
                ..data
            };
            let staff = app.staff.add_colleague(&ctx, data).await?;
            output::print_success(&format!("Colleague Added: {} has been added.", staff.name));
            output::print_item(&StaffRow::from(&staff), format);
            Ok(())
        }
        StaffCommand::List => {
            let ctx = app.actor().await?;
            let staff = app.staff.list_colleagues(&ctx).await?;
            let rows: Vec<StaffRow> = staff.iter().map(StaffRow::from).collect();
            output::print_list(&rows, format);
            Ok(())
        }
        StaffCommand::Bootstrap {
            name,
            departments,
            pin,
        } => {
            let data = new_staff(name, departments, pin.as_deref())?;
            let staff = app.staff.bootstrap_manager(data).await?;
            output::print_success(&format!(
                "{} is the first manager. Log in with the chosen PIN.",
                staff.name
            ));
            output::print_item(&StaffRow::from(&staff), format);
            Ok(())
        }
    }
}

fn new_staff(name: &str, departments: &[String], pin: Option<&str>) -> Result<NewStaff, AppError> {
    if name.trim().is_empty() || departments.is_empty() {
        return Err(AppError::validation(
            "Please enter name and at least one department.",
        ));
    }
    let pin = match pin {
        Some(pin) => pin.to_string(),
        None => super::prompt_pin("New colleague's PIN", true)?,
    };
    Ok(NewStaff {
        name: name.trim().to_string(),
        departments: departments.to_vec(),
        pin,
        role: StaffRole::Staff,
    })
}
