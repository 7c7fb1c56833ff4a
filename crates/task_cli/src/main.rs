use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::io::{self, BufRead};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use task_cli::cli::{Cli, Command};
use task_core::AppError;
use task_core::model::{Task, TaskCategory, TaskStatus, deadline_format};
use task_core::schema::{TaskDraft, TaskPatch};
use task_core::storage::json_store;
use task_core::task_service::TaskService;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "TASKS_LOG";

#[derive(Tabled)]
struct TaskRow {
    id: String,
    name: String,
    description: String,
    status: &'static str,
    priority: &'static str,
    category: &'static str,
    deadline: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            name: task.name.clone(),
            description: task.description.clone(),
            status: task.status.as_str(),
            priority: task.priority.as_str(),
            category: task.category.as_str(),
            deadline: deadline_format::render(task.deadline),
        }
    }
}

fn print_tasks_plain(tasks: &[Task]) {
    let mut table = Table::new(tasks.iter().map(TaskRow::from));
    table.with(Style::psql());
    println!("{table}");
}

fn print_tasks_json(tasks: &[Task]) -> Result<(), AppError> {
    let json =
        serde_json::to_string(tasks).map_err(|err| AppError::data_corruption(err.to_string()))?;
    println!("{json}");
    Ok(())
}

fn print_task_json(task: &Task) -> Result<(), AppError> {
    let json =
        serde_json::to_string(task).map_err(|err| AppError::data_corruption(err.to_string()))?;
    println!("{json}");
    Ok(())
}

/// Prints a lookup result, or `empty_message` when nothing matched.
fn print_tasks(tasks: &[Task], json: bool, empty_message: &str) -> Result<(), AppError> {
    if json {
        print_tasks_json(tasks)
    } else {
        if tasks.is_empty() {
            println!("{empty_message}");
        } else {
            print_tasks_plain(tasks);
        }
        Ok(())
    }
}

fn parse_category(value: &str) -> Result<TaskCategory, AppError> {
    value
        .parse::<TaskCategory>()
        .map_err(|err| AppError::invalid_field("category", err.to_string()))
}

fn parse_status(value: &str) -> Result<TaskStatus, AppError> {
    value
        .parse::<TaskStatus>()
        .map_err(|err| AppError::invalid_field("status", err.to_string()))
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn is_help_request(err: &clap::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    )
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            quoted = true;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() || quoted {
                args.push(std::mem::take(&mut current));
                quoted = false;
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() || quoted {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_command(command: Command, json: bool, service: &mut TaskService) -> Result<(), AppError> {
    match command {
        Command::Add {
            name,
            description,
            category,
            deadline,
            priority,
        } => {
            let input = TaskDraft {
                name,
                description,
                category,
                deadline,
                priority,
            }
            .validate()?;
            let task = service.create(input)?;
            if json {
                print_task_json(&task)?;
            } else {
                println!("Added task \"{}\" with id {}", task.name, task.id);
            }
        }
        Command::GetAll => {
            let tasks = service.list_all();
            print_tasks(&tasks, json, "There are no tasks.")?;
        }
        Command::GetById { task_id } => match service.get_by_id(&task_id)? {
            Some(task) if json => print_task_json(&task)?,
            Some(task) => print_tasks_plain(std::slice::from_ref(&task)),
            None if json => println!("null"),
            None => println!("The task with id '{task_id}' could not be found."),
        },
        Command::GetByCategory { category } => {
            let tasks = service.filter_by_category(parse_category(&category)?);
            print_tasks(
                &tasks,
                json,
                &format!("There are no tasks with the category '{category}'."),
            )?;
        }
        Command::GetByStatus { status } => {
            let tasks = service.filter_by_status(parse_status(&status)?);
            print_tasks(
                &tasks,
                json,
                &format!("There are no tasks with the status '{status}'."),
            )?;
        }
        Command::GetByCategoryAndStatus { category, status } => {
            let tasks = service
                .filter_by_category_and_status(parse_category(&category)?, parse_status(&status)?);
            print_tasks(
                &tasks,
                json,
                &format!(
                    "There are no tasks with the category '{category}' and status '{status}'."
                ),
            )?;
        }
        Command::Find { query } => {
            let tasks = service.find(&query);
            print_tasks(
                &tasks,
                json,
                &format!("There are no tasks matching the query '{query}'."),
            )?;
        }
        Command::Delete { task_id } => {
            let task = service.delete(&task_id)?;
            if json {
                print_task_json(&task)?;
            } else {
                println!("Deleted task {}", task.id);
            }
        }
        Command::Update {
            task_id,
            name,
            description,
            category,
            deadline,
            priority,
            status,
        } => {
            let update = TaskPatch {
                name,
                description,
                category,
                deadline,
                priority,
                status,
            }
            .validate()?;
            if update.is_empty() {
                tracing::warn!(id = %task_id, "no fields given, task left unchanged");
            }
            let task = service.update(&task_id, &update)?;
            if json {
                print_task_json(&task)?;
            } else {
                println!("Updated task {}", task.id);
            }
        }
    }

    Ok(())
}

fn run_interactive(service: &mut TaskService) -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("tasks".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) if is_help_request(&err) => {
                println!("{err}");
                continue;
            }
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Some(path) = cli.data_file.as_deref()
            && path != service.path()
        {
            tracing::warn!(
                path = %path.display(),
                "--data-file is ignored inside an interactive session"
            );
        }

        if let Err(err) = run_command(cli.command, cli.json, service) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn fail(err: AppError) -> ! {
    eprintln!("ERROR: {}", err);
    std::process::exit(1);
}

fn main() {
    init_tracing();

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        let path = json_store::store_path(None);
        let mut service = TaskService::open(path).unwrap_or_else(|err| fail(err));
        if let Err(err) = run_interactive(&mut service) {
            fail(err);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if is_help_request(&err) => err.exit(),
        Err(err) => fail(normalize_parse_error(err)),
    };

    let path = json_store::store_path(cli.data_file.as_deref());
    let mut service = TaskService::open(path).unwrap_or_else(|err| fail(err));

    if let Err(err) = run_command(cli.command, cli.json, &mut service) {
        fail(err);
    }
}
