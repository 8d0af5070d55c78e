//! Command handlers, organized by domain:
//! - `jobs`: create, list, delete, shift and watch active wash jobs
//! - `esd`: ESD test outcomes
//! - `history`: history, summary and CSV export
//! - `master`: uniform stock and employees

pub mod esd;
pub mod history;
pub mod jobs;
pub mod master;

use serde::Serialize;
use uniwash::{Notification, NotificationLevel};

/// Envelope for `--json` output.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Prints `data` as a JSON envelope, or through `human` otherwise.
pub fn emit<T: Serialize>(json: bool, data: &T, human: impl FnOnce(&T)) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&ApiResponse::ok(data))?);
    } else {
        human(data);
    }
    Ok(())
}

/// One-line rendering of a notification for the terminal.
pub fn format_notification(notification: &Notification) -> String {
    let marker = match notification.level {
        NotificationLevel::Success => "ok",
        NotificationLevel::Info => "info",
        NotificationLevel::Warning => "warn",
        NotificationLevel::Error => "error",
    };
    match &notification.text {
        Some(text) => format!("[{}] {}: {}", marker, notification.title, text),
        None => format!("[{}] {}", marker, notification.title),
    }
}

/// Pads each column to its widest cell.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(headers.to_vec())];
    out.extend(rows.iter().map(|row| line(row.iter().map(String::as_str).collect())));
    out.join("\n")
}
