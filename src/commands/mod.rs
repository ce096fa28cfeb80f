//! CLI command definitions and dispatch.

pub mod invite;
pub mod session;
pub mod setup;
pub mod staff;
pub mod task;

use clap::{Parser, Subcommand};

use crate::app::App;
use crate::output::OutputFormat;
use nextsteps_core::config::AppConfig;
use nextsteps_core::error::AppError;

/// Next Steps: the store task board for colleagues and managers
#[derive(Debug, Parser)]
#[command(name = "next-steps", version, about, long_about = None)]
pub struct Cli {
    /// Path to the base configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay to merge (config/<env>.toml)
    #[arg(short, long, env = "NEXTSTEPS_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log in with your 6-digit PIN
    Login(session::LoginArgs),
    /// Log out and forget the cached session
    Logout,
    /// Show who is logged in
    Whoami,
    /// Task board
    Task(task::TaskArgs),
    /// Colleague management
    Staff(staff::StaffArgs),
    /// PIN setup links
    Invite(invite::InviteArgs),
    /// Choose your PIN from a setup link
    Setup(setup::SetupArgs),
    /// List the departments tasks and colleagues can belong to
    Departments,
}

impl Cli {
    /// Load the configuration this invocation runs with.
    pub fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load_from(&self.config, &self.env)
            .map_err(|e| AppError::configuration(format!("Failed to load config: {}", e.message)))
    }

    /// Execute the CLI command
    pub async fn execute(&self, app: &App) -> Result<(), AppError> {
        match &self.command {
            Commands::Login(args) => session::login(args, app).await,
            Commands::Logout => session::logout(app).await,
            Commands::Whoami => session::whoami(app, self.format).await,
            Commands::Task(args) => task::execute(args, app, self.format).await,
            Commands::Staff(args) => staff::execute(args, app, self.format).await,
            Commands::Invite(args) => invite::execute(args, app, self.format).await,
            Commands::Setup(args) => setup::execute(args, app).await,
            Commands::Departments => task::departments(app, self.format),
        }
    }
}

/// Prompt for a PIN without echoing it.
pub(crate) fn prompt_pin(prompt: &str, confirm: bool) -> Result<String, AppError> {
    let mut input = dialoguer::Password::new().with_prompt(prompt);
    if confirm {
        input = input.with_confirmation("Confirm PIN", "PINs do not match");
    }
    input
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {}", e)))
}
