//! Active wash-job commands.

use anyhow::Result;
use serde::Serialize;
use tokio::sync::broadcast;
use uniwash::{
    ActiveQuery, BoardWatcher, CreateOutcome, NewWashJob, Page, ShiftOutcome, WashHistoryEntry,
    WashJob, WashRow,
};

use super::{emit, render_table};
use crate::state::AppState;

const ROW_HEADERS: [&str; 7] = ["Wash ID", "Uniform", "Color", "Size", "Employee", "Status", "Created"];

/// What `add` produced.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum AddResponse {
    Created { job: WashJob },
    Scrapped { entry: WashHistoryEntry },
}

impl From<CreateOutcome> for AddResponse {
    fn from(outcome: CreateOutcome) -> Self {
        match outcome {
            CreateOutcome::Created(job) => AddResponse::Created { job },
            CreateOutcome::Scrapped(entry) => AddResponse::Scrapped { entry },
        }
    }
}

pub async fn add(state: &AppState, json: bool, input: NewWashJob) -> Result<()> {
    let outcome = state.lifecycle.create(input).await?;
    emit(json, &AddResponse::from(outcome), |response| match response {
        AddResponse::Created { job } => {
            println!("{}  {} ({})  {}", job.wash_id, job.uniform_code, job.color, job.status_text())
        }
        AddResponse::Scrapped { entry } => {
            println!("{} ({}) scrapped, no job created", entry.uniform_code, entry.color)
        }
    })
}

fn row_cells(row: &WashRow) -> Vec<String> {
    let job = &row.job;
    let employee = if job.emp_name == job.emp_id {
        job.emp_id.clone()
    } else {
        format!("{} {}", job.emp_id, job.emp_name)
    };
    vec![
        job.wash_id.clone(),
        job.uniform_code.clone(),
        job.color.clone(),
        job.size.clone(),
        employee,
        row.label.clone(),
        job.created_at.format("%Y-%m-%d").to_string(),
    ]
}

fn print_page(page: &Page<WashRow>) {
    if page.items.is_empty() {
        println!("No data found");
        return;
    }
    let rows: Vec<_> = page.items.iter().map(row_cells).collect();
    println!("{}", render_table(&ROW_HEADERS, &rows));
    println!("Page {} of {} ({} jobs)", page.page, page.total_pages, page.total);
}

pub async fn list(state: &AppState, json: bool, query: ActiveQuery) -> Result<()> {
    let page = state.lifecycle.list_active(&query).await?;
    emit(json, &page, print_page)
}

pub async fn delete(state: &AppState, json: bool, id: &str) -> Result<()> {
    state.lifecycle.delete(id).await?;
    emit(json, &id, |id| println!("Deleted {}", id))
}

pub async fn shift(state: &AppState, json: bool, wash_id: &str, days: i64) -> Result<()> {
    let job = match state.lifecycle.shift_date(wash_id, days).await? {
        ShiftOutcome::Shifted(job) => Some(job),
        ShiftOutcome::Unchanged => None,
    };
    emit(json, &job, |job| match job {
        Some(job) => println!(
            "{} now starts {} ({})",
            job.wash_id,
            job.created_at.format("%Y-%m-%d"),
            job.status_text()
        ),
        None => println!("No date change"),
    })
}

/// Prints every board update until Ctrl-C.
pub async fn watch(state: &AppState, json: bool) -> Result<()> {
    let watcher = BoardWatcher::spawn(state.lifecycle.clone(), state.config.notification_capacity);
    let mut updates = watcher.subscribe();

    // Initial board, then whatever the store pushes.
    let page = state.lifecycle.list_active(&ActiveQuery::default()).await?;
    emit(json, &page, print_page)?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            update = updates.recv() => match update {
                Ok(update) => {
                    emit(json, &update, |update| {
                        let rows: Vec<_> = update.rows.iter().map(row_cells).collect();
                        println!("{}", render_table(&ROW_HEADERS, &rows));
                        println!(
                            "total {}  waiting {}  washing {}  completed {}",
                            update.summary.total,
                            update.summary.waiting,
                            update.summary.washing,
                            update.summary.completed
                        );
                    })?;
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Board output lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }
    Ok(())
}
