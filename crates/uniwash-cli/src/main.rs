//! uniwash - command-line front end for the wash-job tracker.
//!
//! # Usage
//!
//! ```bash
//! uniwash uniform add U001 Blue --size M --emp-id E01
//! uniwash add U001 Blue --emp-id E01
//! uniwash list --status Completed
//! uniwash esd fail WASH-000001
//! uniwash export history -o history.csv
//! ```

mod args;
mod commands;
mod state;

use anyhow::Result;
use clap::Parser;
use uniwash::{ActiveQuery, Employee, NewWashJob};

use args::{Cli, Commands, EmployeeCommands, EsdCommands, UniformCommands};
use commands::{esd, format_notification, history, jobs, master, ApiResponse};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut state = AppState::init(cli.config.as_deref(), cli.database.as_deref())?;
    let json = cli.json;

    tracing::debug!("Running {:?}", cli.command);
    let result = run(&state, cli.command, json).await;

    // Notices go to stderr so JSON on stdout stays parseable.
    for notification in state.drain_notifications() {
        eprintln!("{}", format_notification(&notification));
    }

    if let Err(e) = &result {
        if json {
            println!("{}", serde_json::to_string_pretty(&ApiResponse::<()>::err(e.to_string()))?);
        }
    }
    result
}

async fn run(state: &AppState, command: Commands, json: bool) -> Result<()> {
    match command {
        Commands::Add {
            uniform_code,
            color,
            size,
            emp_id,
            emp_name,
        } => {
            let input = NewWashJob {
                uniform_code,
                color,
                size,
                emp_id,
                emp_name,
            };
            jobs::add(state, json, input).await
        }
        Commands::List {
            search,
            status,
            page,
            per_page,
        } => {
            let query = ActiveQuery {
                search,
                status,
                page,
                rows_per_page: per_page,
            };
            jobs::list(state, json, query).await
        }
        Commands::Delete { id } => jobs::delete(state, json, &id).await,
        Commands::Shift { wash_id, days } => jobs::shift(state, json, &wash_id, days).await,
        Commands::Watch => jobs::watch(state, json).await,

        Commands::Esd(EsdCommands::Begin { id }) => esd::begin(state, json, &id).await,
        Commands::Esd(EsdCommands::Pass { id }) => esd::pass(state, json, &id).await,
        Commands::Esd(EsdCommands::Fail { id }) => esd::fail(state, json, &id).await,

        Commands::History { page } => history::history(state, json, page).await,
        Commands::Summary => history::summary(state, json).await,
        Commands::Export { table, output } => history::export(state, table, output.as_deref()).await,

        Commands::Uniform(UniformCommands::Add {
            uniform_code,
            color,
            size,
            uniform_type,
            emp_id,
            emp_name,
        }) => {
            let input = master::UniformInput {
                uniform_code,
                color,
                size,
                uniform_type,
                emp_id,
                emp_name,
            };
            master::add_uniform(state, json, input).await
        }
        Commands::Uniform(UniformCommands::Options { uniform_code }) => {
            master::options(state, json, &uniform_code).await
        }
        Commands::Uniform(UniformCommands::Assignee { uniform_code, color }) => {
            master::assignee(state, json, &uniform_code, &color).await
        }
        Commands::Employee(EmployeeCommands::Add {
            emp_id,
            emp_name,
            department,
        }) => {
            let employee = Employee {
                emp_id,
                emp_name,
                department,
            };
            master::add_employee(state, json, employee).await
        }
    }
}
