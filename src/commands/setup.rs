//! PIN setup from an invitation link.

use clap::Args;

use crate::app::App;
use crate::output;
use nextsteps_core::error::AppError;
use nextsteps_service::invitation::token_from_link;

/// Arguments for `setup`
#[derive(Debug, Args)]
pub struct SetupArgs {
    /// Setup link as received from a manager
    #[arg(long)]
    pub link: Option<String>,
    /// Bare invitation token
    #[arg(long, conflicts_with = "link")]
    pub token: Option<String>,
    /// 6-digit PIN; prompted for when omitted
    #[arg(long)]
    pub pin: Option<String>,
}

/// Resolve the invitation, then claim it with the chosen PIN.
pub async fn execute(args: &SetupArgs, app: &App) -> Result<(), AppError> {
    let token = match (&args.link, &args.token) {
        (Some(link), _) => token_from_link(link)?,
        (None, Some(token)) => token.clone(),
        (None, None) => return Err(AppError::validation("Missing token.")),
    };

    let setup = app.invitations.lookup(&token).await?;
    output::print_kv("Welcome", &setup.name);
    output::print_kv("Departments", &setup.departments.join(", "));

    let pin = match &args.pin {
        Some(pin) => pin.clone(),
        None => super::prompt_pin("Choose a 6-digit PIN", true)?,
    };

    app.invitations.claim(setup, &pin).await?;
    output::print_success("PIN Set: You can now log in.");
    Ok(())
}
