//! Command-line front-end for the task tracker.
//!
//! Usage:
//!
//! ```text
//! tasx list
//! tasx add <title> [description]
//! tasx advance <id>
//! tasx delete <id>
//! ```
//!
//! The backend is chosen from the environment: `TASX_API_URL` selects the
//! remote task API, otherwise tasks are kept under `TASX_STORE_DIR`. Log
//! output is controlled with `RUST_LOG` and written to stderr.

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use tasx::config::{ConfigError, TaskBackend, TasxConfig};
use tasx::task::domain::{Task, TaskDomainError, TaskId};
use tasx::task::services::{CreateTaskRequest, Notice, TaskBoard, TaskBoardError, TaskClient};
use thiserror::Error;
use tokio::runtime::Builder;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum CliError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error(transparent)]
    InvalidId(#[from] TaskDomainError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Board(#[from] TaskBoardError),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] io::Error),
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
    #[error("{0}")]
    Failed(String),
}

#[derive(Debug)]
enum Command {
    List,
    Add {
        title: String,
        description: Option<String>,
    },
    Advance(TaskId),
    Delete(TaskId),
}

impl Command {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, CliError> {
        let operation = args
            .next()
            .ok_or_else(|| CliError::InvalidArgs("missing command".to_owned()))?;
        match operation.as_str() {
            "list" => Ok(Self::List),
            "add" => {
                let title = args
                    .next()
                    .ok_or_else(|| CliError::InvalidArgs("add requires a title".to_owned()))?;
                let rest: Vec<String> = args.collect();
                let description = (!rest.is_empty()).then(|| rest.join(" "));
                Ok(Self::Add { title, description })
            }
            "advance" => Ok(Self::Advance(parse_id(args.next())?)),
            "delete" => Ok(Self::Delete(parse_id(args.next())?)),
            other => Err(CliError::InvalidArgs(format!(
                "unknown command '{other}'; expected list, add, advance, or delete"
            ))),
        }
    }
}

fn parse_id(arg: Option<String>) -> Result<TaskId, CliError> {
    let raw = arg.ok_or_else(|| CliError::InvalidArgs("missing task id".to_owned()))?;
    Ok(raw.parse::<TaskId>()?)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    match Command::parse(env::args().skip(1)).and_then(run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Nothing more can be reported if stderr itself is gone.
            write_failure(&mut io::stderr().lock(), &err).ok();
            ExitCode::FAILURE
        }
    }
}

fn write_failure(out: &mut impl Write, err: &CliError) -> io::Result<()> {
    writeln!(out, "tasx: {err}")
}

fn run(command: Command) -> Result<(), CliError> {
    let config = TasxConfig::from_env()?;
    let backend = config.open_backend()?;
    tracing::debug!(backend = backend.kind(), "opened task backend");
    let board = TaskBoard::new(TaskClient::new(Arc::new(backend), config.lifecycle));

    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::RuntimeInit)?;
    runtime.block_on(execute(&board, command))
}

async fn execute(board: &TaskBoard<TaskBackend>, command: Command) -> Result<(), CliError> {
    let mut out = io::stdout().lock();
    match command {
        Command::List => {
            board.refresh().await?;
            print_list(&mut out, board).map_err(CliError::Output)
        }
        Command::Add { title, description } => {
            let mut request = CreateTaskRequest::new(title);
            if let Some(text) = description {
                request = request.with_description(text);
            }
            let notice = board.submit(request).await;
            report(&mut out, &notice, board.tasks().first())
        }
        Command::Advance(id) => {
            board.refresh().await?;
            let notice = board.advance(id).await;
            report(&mut out, &notice, board.task(id).as_ref())
        }
        Command::Delete(id) => {
            board.refresh().await?;
            let notice = board.remove(id).await;
            report(&mut out, &notice, None)
        }
    }
}

fn print_list(out: &mut impl Write, board: &TaskBoard<TaskBackend>) -> io::Result<()> {
    for task in board.tasks() {
        write_task(out, &task)?;
    }
    writeln!(out, "TOTAL ITEMS: {}", board.total_items())
}

fn write_task(out: &mut impl Write, task: &Task) -> io::Result<()> {
    writeln!(
        out,
        "#{} [{}] {} ({})",
        task.id(),
        task.status().label(),
        task.title(),
        task.created_at().format("%Y-%m-%d %H:%M")
    )?;
    if let Some(description) = task.description() {
        writeln!(out, "    {description}")?;
    }
    Ok(())
}

fn report(out: &mut impl Write, notice: &Notice, task: Option<&Task>) -> Result<(), CliError> {
    if notice.is_error() {
        let detail = notice.detail.as_deref().unwrap_or_default();
        return Err(CliError::Failed(format!("{}: {detail}", notice.message)));
    }
    writeln!(out, "{}", notice.message).map_err(CliError::Output)?;
    if let Some(shown) = task {
        write_task(out, shown).map_err(CliError::Output)?;
    }
    Ok(())
}
