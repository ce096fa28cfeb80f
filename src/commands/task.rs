//! Task board commands.

use std::path::PathBuf;

use bytes::Bytes;
use chrono::{TimeZone, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::app::App;
use crate::output::{self, OutputFormat};
use nextsteps_core::error::AppError;
use nextsteps_entity::task::{NewTask, Task};
use nextsteps_service::{ActorContext, ViewToggle, VisibleTasks};

/// Arguments for task commands
#[derive(Debug, Args)]
pub struct TaskArgs {
    /// Task subcommand
    #[command(subcommand)]
    pub command: TaskCommand,
}

/// Task subcommands
#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// List open tasks
    List {
        /// View: default, all, department
        #[arg(short, long, default_value = "default")]
        view: ViewToggle,
        /// Keep the board open and redraw on every change
        #[arg(short, long)]
        watch: bool,
    },
    /// Show one task
    Show {
        /// Task ID
        id: String,
    },
    /// Create a task
    Create {
        /// Title
        #[arg(short, long)]
        title: String,
        /// Department
        #[arg(short, long)]
        department: String,
        /// Description
        #[arg(long, default_value = "")]
        description: String,
        /// Staff ID to assign the task to
        #[arg(long)]
        assigned_to: Option<String>,
        /// Photo to attach
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Mark a task as done
    Complete {
        /// Task ID
        id: String,
    },
    /// Return a completed task to the board (managers)
    Undo {
        /// Task ID
        id: String,
    },
    /// Tasks completed recently (managers)
    Completed,
}

/// Task display row for table output
#[derive(Debug, Serialize, Tabled)]
struct TaskRow {
    /// Task ID
    id: String,
    /// Title
    title: String,
    /// Department
    department: String,
    /// Assignee
    assigned_to: String,
    /// Photo
    image: String,
    /// Created at
    created_at: String,
    /// Completed at
    completed_at: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            department: task.department.clone(),
            assigned_to: task.assigned_to.clone().unwrap_or_default(),
            image: task.image_url.clone().unwrap_or_default(),
            created_at: format_millis(Some(task.created_at)),
            completed_at: format_millis(task.completed_at),
        }
    }
}

/// Department display row
#[derive(Debug, Serialize, Tabled)]
struct DepartmentRow {
    /// Department
    department: String,
}

/// Execute task commands
pub async fn execute(args: &TaskArgs, app: &App, format: OutputFormat) -> Result<(), AppError> {
    let ctx = &app.actor().await?;

    match &args.command {
        TaskCommand::List { view, watch } => {
            if *watch {
                watch_board(app, ctx, *view, format).await
            } else {
                let visible = app.tasks.visible_open_tasks(ctx, *view).await?;
                print_board(&visible, format);
                Ok(())
            }
        }
        TaskCommand::Show { id } => {
            let task = app.tasks.get_task(id).await?;
            output::print_item(&TaskRow::from(&task), format);
            if !task.description.is_empty() {
                output::print_kv("Description", &task.description);
            }
            Ok(())
        }
        TaskCommand::Create {
            title,
            department,
            description,
            assigned_to,
            image,
        } => {
            if title.trim().is_empty() || department.trim().is_empty() {
                return Err(AppError::validation("Please enter a title and department."));
            }
            let image = match image {
                Some(path) => Some(read_image(path).await?),
                None => None,
            };
            let data = NewTask {
                title: title.trim().to_string(),
                description: description.clone(),
                department: department.clone(),
                assigned_to: assigned_to.clone(),
            };
            let task = app.tasks.create_task(ctx, data, image).await?;
            output::print_success("Task Created: Task has been added successfully.");
            output::print_item(&TaskRow::from(&task), format);
            Ok(())
        }
        TaskCommand::Complete { id } => {
            app.tasks.complete_task(ctx, id).await?;
            output::print_success(&format!("Task {id} marked as done."));
            Ok(())
        }
        TaskCommand::Undo { id } => {
            app.tasks.undo_complete(ctx, id).await?;
            output::print_success(&format!("Task {id} is back on the board."));
            Ok(())
        }
        TaskCommand::Completed => {
            let tasks = app.tasks.recently_completed(ctx).await?;
            let rows: Vec<TaskRow> = tasks.iter().map(TaskRow::from).collect();
            output::print_list(&rows, format);
            Ok(())
        }
    }
}

/// List the department catalog. Needs no login.
pub fn departments(app: &App, format: OutputFormat) -> Result<(), AppError> {
    let rows: Vec<DepartmentRow> = app
        .tasks
        .departments()
        .iter()
        .map(|d| DepartmentRow {
            department: d.clone(),
        })
        .collect();
    output::print_list(&rows, format);
    Ok(())
}

/// Live board: redraws on every snapshot and reads view changes and
/// completions from stdin until `quit`, end of input or Ctrl-C.
async fn watch_board(
    app: &App,
    ctx: &ActorContext,
    view: ViewToggle,
    format: OutputFormat,
) -> Result<(), AppError> {
    let mut feed = app.tasks.open_feed(ctx, view).await?;
    let toggle = feed.toggle();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    output::print_kv("Commands", "all | mine | default | done <id> | quit");

    loop {
        tokio::select! {
            update = feed.next() => match update {
                Some(Ok(visible)) => print_board(&visible, format),
                Some(Err(e)) => {
                    output::print_notice(&output::notice_for(&e));
                    feed.restart().await?;
                }
                None => break,
            },
            line = lines.next_line() => {
                let line = line.map_err(|e| AppError::internal(format!("Input error: {}", e)))?;
                let Some(line) = line else { break };
                match line.split_whitespace().collect::<Vec<_>>().as_slice() {
                    ["all"] => toggle.set(ViewToggle::AllDepartments),
                    ["mine"] => toggle.set(ViewToggle::DepartmentOnly),
                    ["default"] => toggle.set(ViewToggle::Default),
                    ["done", id] => {
                        if let Err(e) = app.tasks.complete_task(ctx, id).await {
                            output::print_notice(&output::notice_for(&e));
                        }
                    }
                    ["quit"] | ["q"] => break,
                    [] => {}
                    _ => output::print_warning("Unknown command"),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    feed.unsubscribe();
    Ok(())
}

fn print_board(visible: &VisibleTasks, format: OutputFormat) {
    let rows: Vec<TaskRow> = visible.tasks.iter().map(TaskRow::from).collect();
    output::print_list(&rows, format);
    if visible.has_hidden() && format == OutputFormat::Table {
        output::print_kv(
            "Other departments",
            &format!("{} more task(s); use the 'all' view to see them", visible.hidden),
        );
    }
}

async fn read_image(path: &PathBuf) -> Result<Bytes, AppError> {
    let data = tokio::fs::read(path).await.map_err(|e| {
        AppError::validation(format!("Cannot read image '{}': {}", path.display(), e))
    })?;
    Ok(Bytes::from(data))
}

fn format_millis(millis: Option<i64>) -> String {
    millis
        .filter(|ms| *ms > 0)
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}
