//! Task management commands.

use clap::Subcommand;
use focusdeck_core::storage::Database;
use focusdeck_core::Task;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a new task
    Add {
        /// Task title
        title: String,
    },
    /// List tasks
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a task as done
    Done {
        /// Task ID
        id: String,
        /// Reopen the task instead
        #[arg(long)]
        reopen: bool,
    },
    /// Remove a task
    Rm {
        /// Task ID
        id: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        TaskAction::Add { title } => {
            let task = Task::new(title);
            db.add_task(&task)?;
            println!("{}", task.id);
        }
        TaskAction::List { json } => {
            let tasks = db.list_tasks()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else {
                for task in tasks {
                    let mark = if task.done { "x" } else { " " };
                    println!("[{mark}] {}  {}", task.id, task.title);
                }
            }
        }
        TaskAction::Done { id, reopen } => {
            if db.set_task_done(&id, !reopen)? {
                println!("ok");
            } else {
                eprintln!("no such task: {id}");
                std::process::exit(1);
            }
        }
        TaskAction::Rm { id } => {
            if db.delete_task(&id)? {
                println!("ok");
            } else {
                eprintln!("no such task: {id}");
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
