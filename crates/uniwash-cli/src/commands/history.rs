//! History, summary and export commands.

use std::path::Path;

use anyhow::{Context, Result};
use uniwash::export::ExportTable;
use uniwash::lifecycle::{sort_history, HistoryItem, Page};
use uniwash::store::HistoryStore;

use super::{emit, render_table};
use crate::args::ExportKind;
use crate::state::AppState;

const HISTORY_HEADERS: [&str; 7] = ["Wash ID", "Uniform", "Color", "Employee", "Status", "Result", "Tested"];

fn history_cells(item: &HistoryItem) -> Vec<String> {
    let entry = &item.entry;
    vec![
        entry.wash_id.clone(),
        entry.uniform_code.clone(),
        entry.color.clone(),
        entry.emp_id.clone(),
        item.label.clone(),
        entry
            .test_result
            .map_or_else(|| "-".to_string(), |r| r.to_string()),
        entry
            .test_date
            .map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string()),
    ]
}

pub async fn history(state: &AppState, json: bool, page: usize) -> Result<()> {
    let page = state.lifecycle.list_history(page).await?;
    emit(json, &page, |page: &Page<HistoryItem>| {
        if page.items.is_empty() {
            println!("No wash history");
            return;
        }
        let rows: Vec<_> = page.items.iter().map(history_cells).collect();
        println!("{}", render_table(&HISTORY_HEADERS, &rows));
        println!("Page {} of {} ({} entries)", page.page, page.total_pages, page.total);
    })
}

pub async fn summary(state: &AppState, json: bool) -> Result<()> {
    let summary = state.lifecycle.summary_counts().await?;
    emit(json, &summary, |s| {
        println!("Total       {}", s.total);
        println!("Waiting     {}", s.waiting);
        println!("Washing     {}", s.washing);
        println!("Completed   {}", s.completed);
        println!("Rewash      {}", s.rewash);
        println!("Scrap       {}", s.scrap);
        println!("History     {}", s.history_count);
    })
}

/// Writes the chosen table as CSV, to `output` or stdout.
pub async fn export(state: &AppState, kind: ExportKind, output: Option<&Path>) -> Result<()> {
    let table = match kind {
        ExportKind::Active => ExportTable::active(&state.lifecycle.recompute_all().await?),
        ExportKind::History => {
            let mut entries = state.lifecycle.stores().history.query_all().await?;
            sort_history(&mut entries);
            ExportTable::history(&entries)
        }
    };

    if table.is_empty() {
        eprintln!("No data to export");
        return Ok(());
    }

    let csv = table.to_csv();
    match output {
        Some(path) => {
            std::fs::write(path, csv)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), rows = table.rows.len(), "Exported table");
        }
        None => println!("{}", csv),
    }
    Ok(())
}
