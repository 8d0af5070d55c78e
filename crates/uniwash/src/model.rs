//! Domain records shared by the stores and the lifecycle controller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::{status_text, WashPhase};

/// Placeholder for an absent employee reference.
pub const NO_EMPLOYEE: &str = "-";

/// An in-progress wash job in the active store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WashJob {
    /// Store identity.
    pub id: String,
    /// Business identifier, e.g. `WASH-000042`.
    pub wash_id: String,
    pub uniform_code: String,
    pub color: String,
    #[serde(default)]
    pub size: String,
    pub emp_id: String,
    pub emp_name: String,
    /// Persisted phase. May be stale until recomputed.
    pub status: WashPhase,
    #[serde(default)]
    pub rewash_count: u32,
    /// Start of the current wash cycle.
    pub created_at: DateTime<Utc>,
}

impl WashJob {
    pub fn status_text(&self) -> String {
        status_text(self.status, self.rewash_count)
    }
}

/// Outcome of an ESD test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestResult {
    Pass,
    Fail,
}

impl TestResult {
    pub fn as_str(self) -> &'static str {
        match self {
            TestResult::Pass => "PASS",
            TestResult::Fail => "FAIL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PASS" => Some(TestResult::Pass),
            "FAIL" => Some(TestResult::Fail),
            _ => None,
        }
    }
}

impl std::fmt::Display for TestResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record of a terminal or test-gated wash event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WashHistoryEntry {
    pub id: String,
    pub wash_id: String,
    pub uniform_code: String,
    pub color: String,
    #[serde(default)]
    pub size: String,
    pub emp_id: String,
    pub emp_name: String,
    pub status: WashPhase,
    #[serde(default)]
    pub rewash_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_result: Option<TestResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub recorded_at: DateTime<Utc>,
}

impl WashHistoryEntry {
    /// Snapshots `job` into a history entry with a fresh id.
    pub fn from_job(job: &WashJob, status: WashPhase, recorded_at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            wash_id: job.wash_id.clone(),
            uniform_code: job.uniform_code.clone(),
            color: job.color.clone(),
            size: job.size.clone(),
            emp_id: job.emp_id.clone(),
            emp_name: job.emp_name.clone(),
            status,
            rewash_count: job.rewash_count,
            test_result: None,
            test_date: None,
            note: None,
            created_at: job.created_at,
            recorded_at,
        }
    }

    /// Marks the entry as an ESD test outcome taken at `tested_at`.
    pub fn with_test(mut self, result: TestResult, tested_at: DateTime<Utc>) -> Self {
        self.test_result = Some(result);
        self.test_date = Some(tested_at);
        self
    }

    pub fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }

    pub fn status_text(&self) -> String {
        status_text(self.status, self.rewash_count)
    }
}

/// Input for creating a wash job. Blank strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWashJob {
    pub uniform_code: String,
    pub color: String,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub emp_id: Option<String>,
    #[serde(default)]
    pub emp_name: Option<String>,
}

impl NewWashJob {
    pub fn new(uniform_code: &str, color: &str) -> Self {
        Self {
            uniform_code: uniform_code.to_string(),
            color: color.to_string(),
            ..Default::default()
        }
    }

    pub fn with_employee(mut self, emp_id: &str, emp_name: Option<&str>) -> Self {
        self.emp_id = Some(emp_id.to_string());
        self.emp_name = emp_name.map(|s| s.to_string());
        self
    }

    pub fn with_size(mut self, size: &str) -> Self {
        self.size = Some(size.to_string());
        self
    }
}

/// Trims `value` and drops it when empty.
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Stock state of a uniform unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Available,
    Assigned,
    Scrapped,
}

impl StockStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StockStatus::Available => "available",
            StockStatus::Assigned => "assigned",
            StockStatus::Scrapped => "scrapped",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "available" => Some(StockStatus::Available),
            "assigned" => Some(StockStatus::Assigned),
            "scrapped" => Some(StockStatus::Scrapped),
            _ => None,
        }
    }
}

/// One color variant of a uniform code in stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniformVariant {
    pub uniform_code: String,
    pub color: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub uniform_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emp_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emp_name: Option<String>,
    pub stock_status: StockStatus,
    #[serde(default)]
    pub rewash_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub emp_id: String,
    pub emp_name: String,
    #[serde(default)]
    pub department: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_job() -> WashJob {
        WashJob {
            id: "WASH-000007".to_string(),
            wash_id: "WASH-000007".to_string(),
            uniform_code: "U001".to_string(),
            color: "Blue".to_string(),
            size: "L".to_string(),
            emp_id: "E01".to_string(),
            emp_name: "Somchai".to_string(),
            status: WashPhase::Completed,
            rewash_count: 2,
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_history_entry_snapshot() {
        let job = sample_job();
        let at = Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap();
        let entry = WashHistoryEntry::from_job(&job, WashPhase::EsdFailed, at)
            .with_test(TestResult::Fail, at);

        assert_eq!(entry.wash_id, "WASH-000007");
        assert_eq!(entry.rewash_count, 2);
        assert_eq!(entry.created_at, job.created_at);
        assert_eq!(entry.test_result, Some(TestResult::Fail));
        assert_eq!(entry.test_date, Some(at));
        assert_eq!(entry.status_text(), "ESD Failed");
        assert!(!entry.id.is_empty());
    }

    #[test]
    fn test_job_serializes_camel_case() {
        let json = serde_json::to_value(sample_job()).unwrap();
        assert_eq!(json["washId"], "WASH-000007");
        assert_eq!(json["uniformCode"], "U001");
        assert_eq!(json["rewashCount"], 2);
        assert_eq!(json["status"], "completed");
    }

    #[test]
    fn test_test_result_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&TestResult::Pass).unwrap(), "\"PASS\"");
        assert_eq!(TestResult::parse("FAIL"), Some(TestResult::Fail));
        assert_eq!(TestResult::parse("fail"), None);
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  E01 ")), Some("E01".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
