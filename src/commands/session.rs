//! Login, logout and identity commands.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::app::App;
use crate::output::{self, OutputFormat};
use nextsteps_core::error::AppError;
use nextsteps_entity::staff::Staff;

/// Arguments for `login`
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// PIN to log in with; prompted for when omitted
    #[arg(long)]
    pub pin: Option<String>,
}

/// Colleague display row
#[derive(Debug, Serialize, Tabled)]
pub(crate) struct StaffRow {
    /// Staff ID
    id: String,
    /// Name
    name: String,
    /// Role
    role: String,
    /// Departments
    departments: String,
}

impl From<&Staff> for StaffRow {
    fn from(staff: &Staff) -> Self {
        Self {
            id: staff.id.clone(),
            name: staff.name.clone(),
            role: staff.role.to_string(),
            departments: staff.departments.join(", "),
        }
    }
}

/// Log in with a PIN.
pub async fn login(args: &LoginArgs, app: &App) -> Result<(), AppError> {
    if let Some(staff) = app.session.restore().await {
        output::print_warning(&format!("Already logged in as {}.", staff.name));
        return Ok(());
    }

    let pin = match &args.pin {
        Some(pin) => pin.clone(),
        None => super::prompt_pin("PIN", false)?,
    };

    if !app.session.login(&pin).await {
        return Err(AppError::authentication("Invalid PIN. Please try again."));
    }

    match app.session.current_identity() {
        Some(staff) => output::print_success(&format!("Welcome, {}.", staff.name)),
        None => output::print_success("Logged in."),
    }
    Ok(())
}

/// Log out.
pub async fn logout(app: &App) -> Result<(), AppError> {
    app.session.restore().await;
    app.session.logout().await;
    output::print_success("Logged out.");
    Ok(())
}

/// Show the logged-in colleague.
pub async fn whoami(app: &App, format: OutputFormat) -> Result<(), AppError> {
    let ctx = app.actor().await?;
    output::print_item(&StaffRow::from(&ctx.staff), format);
    Ok(())
}
