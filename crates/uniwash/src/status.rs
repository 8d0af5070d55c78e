//! Status engine: derives a wash job's lifecycle phase from elapsed time and
//! maps `(phase, rewash_count)` to display strings.
//!
//! Nothing in here performs I/O. Callers persist a derived phase when it
//! differs from the stored one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::WashJob;

const SECONDS_PER_DAY: i64 = 86_400;

/// Lifecycle phase of a wash job.
///
/// The rewash counter is kept on the job itself; strings such as
/// `"Re-Washing #2"` only exist at the display boundary (see [`status_text`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WashPhase {
    WaitingToSend,
    Washing,
    Completed,
    EsdPassed,
    EsdFailed,
    Scrap,
}

impl WashPhase {
    /// `EsdPassed` and `Scrap` end a job; nothing is derived past them.
    pub fn is_terminal(self) -> bool {
        matches!(self, WashPhase::EsdPassed | WashPhase::Scrap)
    }

    /// Storage key used in the database.
    pub fn as_key(self) -> &'static str {
        match self {
            WashPhase::WaitingToSend => "waiting_to_send",
            WashPhase::Washing => "washing",
            WashPhase::Completed => "completed",
            WashPhase::EsdPassed => "esd_passed",
            WashPhase::EsdFailed => "esd_failed",
            WashPhase::Scrap => "scrap",
        }
    }

    /// Parses a storage key. Unknown keys fall back to `WaitingToSend`; the
    /// next recompute pass replaces them with a derived phase.
    pub fn from_key(key: &str, wash_id: &str) -> Self {
        match key {
            "waiting_to_send" => WashPhase::WaitingToSend,
            "washing" => WashPhase::Washing,
            "completed" => WashPhase::Completed,
            "esd_passed" => WashPhase::EsdPassed,
            "esd_failed" => WashPhase::EsdFailed,
            "scrap" => WashPhase::Scrap,
            other => {
                log::warn!(
                    "Unknown wash status '{}' for {}, defaulting to waiting_to_send",
                    other,
                    wash_id
                );
                WashPhase::WaitingToSend
            }
        }
    }

    /// Parses the display encoding the status strings were historically
    /// stored in, e.g. `"Waiting-Rewash #2"`.
    pub fn from_status_text(text: &str) -> Option<Self> {
        match text {
            "Waiting to Send" => Some(WashPhase::WaitingToSend),
            "Washing" => Some(WashPhase::Washing),
            "Completed" => Some(WashPhase::Completed),
            "ESD Passed" => Some(WashPhase::EsdPassed),
            "ESD Failed" => Some(WashPhase::EsdFailed),
            "Scrap" => Some(WashPhase::Scrap),
            t if t.starts_with("Waiting-Rewash #") => Some(WashPhase::WaitingToSend),
            t if t.starts_with("Re-Washing #") => Some(WashPhase::Washing),
            _ => None,
        }
    }
}

impl std::fmt::Display for WashPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WashPhase::WaitingToSend => write!(f, "Waiting to Send"),
            WashPhase::Washing => write!(f, "Washing"),
            WashPhase::Completed => write!(f, "Completed"),
            WashPhase::EsdPassed => write!(f, "ESD Passed"),
            WashPhase::EsdFailed => write!(f, "ESD Failed"),
            WashPhase::Scrap => write!(f, "Scrap"),
        }
    }
}

/// Day boundaries between the time-driven phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusThresholds {
    pub washing_after_days: i64,
    pub completed_after_days: i64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            washing_after_days: 1,
            completed_after_days: 3,
        }
    }
}

/// Whole days between `created_at` and `now`, floored toward negative
/// infinity so a `created_at` in the future counts as less than one day.
pub fn days_elapsed(created_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - created_at).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// Derives the current phase of `job` at `now`.
pub fn derive_status(job: &WashJob, now: DateTime<Utc>, thresholds: &StatusThresholds) -> WashPhase {
    if job.status.is_terminal() {
        return job.status;
    }

    let days = days_elapsed(job.created_at, now);
    if days >= thresholds.completed_after_days {
        WashPhase::Completed
    } else if days >= thresholds.washing_after_days {
        WashPhase::Washing
    } else {
        WashPhase::WaitingToSend
    }
}

/// Canonical status string for a phase and rewash count.
pub fn status_text(phase: WashPhase, rewash_count: u32) -> String {
    match phase {
        WashPhase::WaitingToSend if rewash_count > 0 => format!("Waiting-Rewash #{}", rewash_count),
        WashPhase::Washing if rewash_count > 0 => format!("Re-Washing #{}", rewash_count),
        other => other.to_string(),
    }
}

/// Human label shown in tables.
pub fn label(phase: WashPhase, rewash_count: u32) -> String {
    match phase {
        WashPhase::WaitingToSend | WashPhase::Washing => status_text(phase, rewash_count),
        WashPhase::Completed => "Completed".to_string(),
        WashPhase::EsdPassed => "ESD Passed".to_string(),
        WashPhase::EsdFailed => format!("ESD Failed ({} times)", rewash_count),
        WashPhase::Scrap => "Scrap (Over limit)".to_string(),
    }
}

/// Style tag for the status badge.
pub fn css_class(phase: WashPhase, rewash_count: u32) -> &'static str {
    match phase {
        WashPhase::WaitingToSend if rewash_count == 0 => "status-waiting",
        WashPhase::WaitingToSend => "status-waiting-rewash",
        WashPhase::Washing if rewash_count == 0 => "status-washing",
        WashPhase::Washing => "status-rewashing",
        WashPhase::Completed => "status-completed",
        WashPhase::EsdPassed => "status-passed",
        WashPhase::EsdFailed => "status-failed",
        WashPhase::Scrap => "status-scrap",
    }
}

/// Label for a raw status string that may be unset or unrecognized.
pub fn label_for_text(status: Option<&str>, rewash_count: u32) -> String {
    match status.filter(|s| !s.is_empty()) {
        None => "-".to_string(),
        Some(text) => match WashPhase::from_status_text(text) {
            Some(phase) => label(phase, rewash_count),
            None => text.to_string(),
        },
    }
}

/// Style tag for a raw status string; empty when unrecognized.
pub fn css_class_for_text(status: Option<&str>, rewash_count: u32) -> &'static str {
    status
        .and_then(WashPhase::from_status_text)
        .map(|phase| css_class(phase, rewash_count))
        .unwrap_or("")
}
