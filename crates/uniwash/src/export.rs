//! Tabular exports of the active set and the wash history.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{WashHistoryEntry, WashJob};

const ACTIVE_HEADERS: [&str; 9] = [
    "Wash ID",
    "Uniform Code",
    "Color",
    "Size",
    "Employee ID",
    "Employee Name",
    "Status",
    "Rewash Count",
    "Created At",
];

const HISTORY_HEADERS: [&str; 11] = [
    "Wash ID",
    "Uniform Code",
    "Color",
    "Size",
    "Employee ID",
    "Employee Name",
    "Status",
    "Rewash Count",
    "Test Result",
    "Test Date",
    "Created At",
];

/// Header row plus one string row per record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn format_date(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

impl ExportTable {
    pub fn active(jobs: &[WashJob]) -> Self {
        let rows = jobs
            .iter()
            .map(|job| {
                vec![
                    job.wash_id.clone(),
                    job.uniform_code.clone(),
                    job.color.clone(),
                    job.size.clone(),
                    job.emp_id.clone(),
                    job.emp_name.clone(),
                    job.status_text(),
                    job.rewash_count.to_string(),
                    format_date(Some(job.created_at)),
                ]
            })
            .collect();
        Self {
            headers: ACTIVE_HEADERS.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    pub fn history(entries: &[WashHistoryEntry]) -> Self {
        let rows = entries
            .iter()
            .map(|entry| {
                vec![
                    entry.wash_id.clone(),
                    entry.uniform_code.clone(),
                    entry.color.clone(),
                    entry.size.clone(),
                    entry.emp_id.clone(),
                    entry.emp_name.clone(),
                    entry.status_text(),
                    entry.rewash_count.to_string(),
                    entry
                        .test_result
                        .map_or_else(|| "-".to_string(), |r| r.as_str().to_string()),
                    format_date(entry.test_date),
                    format_date(Some(entry.created_at)),
                ]
            })
            .collect();
        Self {
            headers: HISTORY_HEADERS.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every cell double-quoted, quotes doubled, rows joined by `\n`.
    pub fn to_csv(&self) -> String {
        std::iter::once(&self.headers)
            .chain(self.rows.iter())
            .map(|row| {
                row.iter()
                    .map(|cell| format!("\"{}\"", cell.replace('"', "\"\"")))
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
