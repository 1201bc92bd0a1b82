//! Task management commands for CLI.

use chronozen_core::{Event, Task};
use clap::Subcommand;

use super::load_app;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a new task
    Add {
        /// Task text
        text: String,
    },
    /// List tasks, pending first
    List {
        /// Only pending tasks
        #[arg(long, conflicts_with = "completed")]
        pending: bool,
        /// Only completed tasks
        #[arg(long)]
        completed: bool,
    },
    /// Change a task's text
    Edit {
        /// Task ID
        id: String,
        /// New text
        text: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Mark a task done, or reopen it
    Toggle {
        /// Task ID
        id: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = load_app()?;

    match action {
        TaskAction::Add { text } => {
            app.add_task(&text)?;
            let task = app
                .tasks()
                .all()
                .last()
                .ok_or("task was not stored")?;
            println!("Task added: {}", task.id);
            println!("{}", serde_json::to_string_pretty(task)?);
        }
        TaskAction::List { pending, completed } => {
            let tasks: Vec<&Task> = if pending {
                app.tasks().pending()
            } else if completed {
                app.tasks().completed()
            } else {
                app.tasks().display_order()
            };
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Edit { id, text } => {
            app.edit_task(&id, &text)?;
            println!("Task updated: {id}");
        }
        TaskAction::Delete { id } => {
            if app.delete_task(&id).is_empty() {
                return Err(format!("unknown task: {id}").into());
            }
            println!("Task deleted: {id}");
        }
        TaskAction::Toggle { id } => {
            let events = app.toggle_task(&id);
            if events.is_empty() {
                return Err(format!("unknown task: {id}").into());
            }
            for event in events {
                match event {
                    Event::TaskCompleted { task_id } => println!("Task completed: {task_id}"),
                    Event::TaskReopened { task_id } => println!("Task reopened: {task_id}"),
                    Event::CongratsRequested { name } => super::congrats::print_congrats(&name),
                    _ => {}
                }
            }
        }
    }
    Ok(())
}
