use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tasks", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Path of the task data file (defaults to $TASKS_DATA_FILE, then tasks.json)
    #[arg(long = "data-file", value_name = "PATH", global = true)]
    pub data_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new task
    ///
    /// CATEGORY is one of work, study, personal.
    /// PRIORITY is one of low, normal, high.
    ///
    /// Example: tasks add "Report" "Quarterly report" work 2024-12-21 high
    Add {
        name: String,
        description: String,
        category: String,
        /// Date in YYYY-MM-DD format
        deadline: String,
        priority: String,
    },
    /// List all tasks, sorted by priority, status, deadline, category and name
    ///
    /// Example: tasks get_all
    #[command(name = "get_all", alias = "get-all")]
    GetAll,
    /// Show a task by id
    ///
    /// Example: tasks get_by_id 3f2b...
    #[command(name = "get_by_id", alias = "get-by-id")]
    GetById { task_id: String },
    /// List tasks of one category, in creation order
    ///
    /// Example: tasks get_by_category study
    #[command(name = "get_by_category", alias = "get-by-category")]
    GetByCategory { category: String },
    /// List tasks with one status, in creation order
    ///
    /// Example: tasks get_by_status completed
    #[command(name = "get_by_status", alias = "get-by-status")]
    GetByStatus { status: String },
    /// List tasks matching both a category and a status, in creation order
    ///
    /// Example: tasks get_by_category_and_status work not_completed
    #[command(
        name = "get_by_category_and_status",
        alias = "get-by-category-and-status"
    )]
    GetByCategoryAndStatus { category: String, status: String },
    /// Find tasks whose name or description contains any of the query words
    ///
    /// Example: tasks find "report draft"
    Find { query: String },
    /// Delete a task by id
    ///
    /// Example: tasks delete 3f2b...
    Delete { task_id: String },
    /// Update only the given fields of a task
    ///
    /// Example: tasks update -n "new name" 3f2b...
    /// Example: tasks update -n "new name" -s completed 3f2b...
    Update {
        task_id: String,
        #[arg(short = 'n', long)]
        name: Option<String>,
        #[arg(short = 'd', long)]
        description: Option<String>,
        #[arg(short = 'c', long)]
        category: Option<String>,
        /// Date in YYYY-MM-DD format
        #[arg(short = 'l', long, visible_alias = "dl")]
        deadline: Option<String>,
        #[arg(short = 'p', long)]
        priority: Option<String>,
        #[arg(short = 's', long)]
        status: Option<String>,
    },
}
