//! Table and JSON output formatting, plus the console notice sink.

use serde::Serialize;
use tabled::{Table, Tabled};

use nextsteps_core::error::{AppError, ErrorKind};
use nextsteps_core::traits::{Notice, NoticeLevel, Notifier};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}

/// Print a single item in the selected format
pub fn print_item<T: Serialize + Tabled>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{}", Table::new(std::iter::once(item))),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string());
            println!("{json}");
        }
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    println!("{json}");
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{key}:"), value);
}

/// Print a notice as a title line followed by its body.
pub fn print_notice(notice: &Notice) {
    let line = format!("{}: {}", notice.title, notice.body);
    match notice.level {
        NoticeLevel::Success => print_success(&line),
        NoticeLevel::Info => print_warning(&line),
        NoticeLevel::Error => print_error(&line),
    }
}

/// Turn a failed operation into the alert shown to the user.
///
/// Backend failures get a generic message; their detail goes to the log.
pub fn notice_for(err: &AppError) -> Notice {
    let title = match err.kind {
        ErrorKind::Validation => "Missing Info",
        ErrorKind::Conflict => "Already In Use",
        ErrorKind::NotFound => "Not Found",
        ErrorKind::Authentication => "Not Logged In",
        ErrorKind::Authorization => "Not Allowed",
        ErrorKind::Configuration => "Configuration Error",
        kind if kind.is_backend_failure() => {
            tracing::error!(error = %err, "Operation failed");
            return Notice::error("Error", "Something went wrong.");
        }
        _ => "Error",
    };
    Notice::error(title, err.message.clone())
}

/// Notifier that writes notices straight to the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        print_notice(&notice);
    }
}
