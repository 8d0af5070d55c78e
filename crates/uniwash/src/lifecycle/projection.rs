//! Display rows, filtering, paging and summary counts.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::controller::{WashLifecycle, WashResult};
use crate::model::{WashHistoryEntry, WashJob};
use crate::status::{self, derive_status, StatusThresholds, WashPhase};

/// An active job ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WashRow {
    #[serde(flatten)]
    pub job: WashJob,
    pub status_text: String,
    pub label: String,
    pub css_class: &'static str,
    /// Only completed jobs can go to the ESD test.
    pub can_test_esd: bool,
}

impl WashRow {
    fn new(job: WashJob) -> Self {
        Self {
            status_text: job.status_text(),
            label: status::label(job.status, job.rewash_count),
            css_class: status::css_class(job.status, job.rewash_count),
            can_test_esd: job.status == WashPhase::Completed,
            job,
        }
    }
}

/// A history entry ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    #[serde(flatten)]
    pub entry: WashHistoryEntry,
    pub status_text: String,
    pub label: String,
    pub css_class: &'static str,
}

impl From<WashHistoryEntry> for HistoryItem {
    fn from(entry: WashHistoryEntry) -> Self {
        Self {
            status_text: entry.status_text(),
            label: status::label(entry.status, entry.rewash_count),
            css_class: status::css_class(entry.status, entry.rewash_count),
            entry,
        }
    }
}

/// Derives the current status of every job in `snapshot` without touching
/// any store.
pub fn project(snapshot: &[WashJob], now: DateTime<Utc>, thresholds: &StatusThresholds) -> Vec<WashRow> {
    snapshot
        .iter()
        .map(|job| {
            let mut job = job.clone();
            job.status = derive_status(&job, now, thresholds);
            WashRow::new(job)
        })
        .collect()
}

/// Rows for jobs whose status has already been recomputed.
pub fn rows(jobs: Vec<WashJob>) -> Vec<WashRow> {
    jobs.into_iter().map(WashRow::new).collect()
}

/// Active-table query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveQuery {
    /// Case-insensitive substring of uniform code, employee id or name.
    pub search: Option<String>,
    /// Exact status string, e.g. `Re-Washing #2`.
    pub status: Option<String>,
    /// 1-based.
    pub page: usize,
    /// Falls back to the configured page size.
    pub rows_per_page: Option<usize>,
}

impl ActiveQuery {
    fn matches(&self, row: &WashRow) -> bool {
        let search_ok = match self.search.as_deref().map(str::to_lowercase) {
            None => true,
            Some(needle) => [&row.job.uniform_code, &row.job.emp_id, &row.job.emp_name]
                .iter()
                .filter(|field| !field.is_empty())
                .any(|field| field.to_lowercase().contains(&needle)),
        };
        let status_ok = match self.status.as_deref().filter(|s| !s.is_empty()) {
            None => true,
            Some(wanted) => row.status_text == wanted,
        };
        search_ok && status_ok
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Items across all pages.
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
}

/// Cuts `page` (1-based; 0 is treated as 1) out of `items`.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(per_page);
    let items = items
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .collect();
    Page {
        items,
        total,
        page,
        total_pages,
    }
}

/// Dashboard counters over the active set.
///
/// `rewash` matches any status containing "Rewash", so it overlaps with the
/// waiting counts and is not a separate bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCounts {
    pub total: usize,
    pub waiting: usize,
    pub washing: usize,
    pub completed: usize,
    pub rewash: usize,
    pub scrap: usize,
    pub history_count: u64,
}

/// Counts rows by status string. `history_count` is left at 0.
pub fn summarize(rows: &[WashRow]) -> SummaryCounts {
    let count = |pred: &dyn Fn(&str) -> bool| {
        rows.iter().filter(|row| pred(row.status_text.as_str())).count()
    };
    SummaryCounts {
        total: rows.len(),
        waiting: count(&|s: &str| s == "Waiting to Send"),
        washing: count(&|s: &str| s == "Washing"),
        completed: count(&|s: &str| s == "Completed"),
        rewash: count(&|s: &str| s.contains("Rewash")),
        scrap: count(&|s: &str| s == "Scrap"),
        history_count: 0,
    }
}

impl WashLifecycle {
    /// Recomputes the active set and returns the requested page of rows.
    pub async fn list_active(&self, query: &ActiveQuery) -> WashResult<Page<WashRow>> {
        let result = self.list_active_inner(query).await;
        self.report(result, "load data", |_| None)
    }

    async fn list_active_inner(&self, query: &ActiveQuery) -> WashResult<Page<WashRow>> {
        let rows: Vec<WashRow> = rows(self.recompute_all().await?)
            .into_iter()
            .filter(|row| query.matches(row))
            .collect();
        let per_page = query.rows_per_page.unwrap_or(self.display().rows_per_page);
        Ok(paginate(rows, query.page, per_page))
    }

    /// History ordered by wash id.
    pub async fn list_history(&self, page: usize) -> WashResult<Page<HistoryItem>> {
        let result = self.list_history_inner(page).await;
        self.report(result, "load wash history", |_| None)
    }

    async fn list_history_inner(&self, page: usize) -> WashResult<Page<HistoryItem>> {
        let mut entries = self.stores().history.query_all().await?;
        sort_history(&mut entries);
        let items = entries.into_iter().map(HistoryItem::from).collect();
        Ok(paginate(items, page, self.display().history_rows_per_page))
    }

    /// Summary counters over the recomputed active set plus the history size.
    pub async fn summary_counts(&self) -> WashResult<SummaryCounts> {
        let result = self.summary_counts_inner().await;
        self.report(result, "load summary", |_| None)
    }

    async fn summary_counts_inner(&self) -> WashResult<SummaryCounts> {
        let rows = rows(self.recompute_all().await?);
        let mut summary = summarize(&rows);
        summary.history_count = self.stores().history.count().await?;
        Ok(summary)
    }
}

/// Orders history by the numeric part of the wash id, so `WASH-1000000`
/// follows `WASH-999999`. Entries sharing a wash id keep insertion order.
pub fn sort_history(entries: &mut [WashHistoryEntry]) {
    entries.sort_by(|a, b| wash_id_order(&a.wash_id, &b.wash_id));
}

fn wash_id_order(a: &str, b: &str) -> Ordering {
    // Ids without a numeric suffix go last, compared as text.
    let number = |id: &str| {
        id.rsplit_once('-').and_then(|(_, n)| n.parse::<u64>().ok())
    };
    match (number(a), number(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}
