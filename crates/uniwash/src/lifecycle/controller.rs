//! The wash-job state machine.
//!
//! Every multi-store operation writes the durable history record before it
//! removes the active job. There is no rollback: a failure between the two
//! writes leaves both records in place until someone deletes the job.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use super::clock::Clock;
use crate::broadcast::{Notification, NotificationBroadcaster};
use crate::config::{DisplayConfig, LifecycleConfig};
use crate::error::WashError;
use crate::model::{
    non_blank, NewWashJob, StockStatus, TestResult, WashHistoryEntry, WashJob, NO_EMPLOYEE,
};
use crate::status::{derive_status, StatusThresholds, WashPhase};
use crate::store::{ActiveFilter, StoreError, Stores, WashJobPatch};

pub type WashResult<T> = std::result::Result<T, WashError>;

const CONFIRM_MS: u64 = 1500;
const LONG_CONFIRM_MS: u64 = 2000;

/// Result of [`WashLifecycle::create`].
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// A new active job was started.
    Created(WashJob),
    /// The uniform was over the rewash limit and went straight to scrap.
    Scrapped(WashHistoryEntry),
}

/// Result of [`WashLifecycle::esd_fail`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EsdFailOutcome {
    /// The uniform may be washed again at `new_count`.
    Rewash { new_count: u32 },
    /// The uniform exceeded the rewash limit.
    Scrapped { new_count: u32 },
}

/// Result of [`WashLifecycle::shift_date`].
#[derive(Debug, Clone, PartialEq)]
pub enum ShiftOutcome {
    Shifted(WashJob),
    Unchanged,
}

/// Drives wash jobs through their lifecycle against a set of stores.
pub struct WashLifecycle {
    stores: Stores,
    clock: Arc<dyn Clock>,
    config: LifecycleConfig,
    display: DisplayConfig,
    thresholds: StatusThresholds,
    notifications: NotificationBroadcaster,
}

impl WashLifecycle {
    pub fn new(
        stores: Stores,
        clock: Arc<dyn Clock>,
        config: LifecycleConfig,
        notifications: NotificationBroadcaster,
    ) -> Self {
        let thresholds = config.thresholds();
        Self {
            stores,
            clock,
            config,
            display: DisplayConfig::default(),
            thresholds,
            notifications,
        }
    }

    pub fn with_display(mut self, display: DisplayConfig) -> Self {
        self.display = display;
        self
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    pub fn display(&self) -> &DisplayConfig {
        &self.display
    }

    pub fn thresholds(&self) -> &StatusThresholds {
        &self.thresholds
    }

    pub fn notifications(&self) -> &NotificationBroadcaster {
        &self.notifications
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Sends the outcome notice for an operation and hands the result back.
    pub(crate) fn report<T>(
        &self,
        result: WashResult<T>,
        action: &str,
        on_success: impl FnOnce(&T) -> Option<Notification>,
    ) -> WashResult<T> {
        match &result {
            Ok(value) => {
                if let Some(notification) = on_success(value) {
                    self.notifications.send(notification);
                }
            }
            Err(e @ WashError::Store(_)) => {
                log::error!("Failed to {}: {}", action, e);
                self.notifications.send(Notification::failure(e, action));
            }
            Err(e) => {
                log::warn!("Could not {}: {}", action, e);
                self.notifications.send(Notification::failure(e, action));
            }
        }
        result
    }

    /// Starts a wash job for a uniform.
    ///
    /// A uniform whose stock rewash counter is already over the limit is
    /// scrapped instead and no job is created. Stock that is already
    /// scrapped is rejected.
    pub async fn create(&self, input: NewWashJob) -> WashResult<CreateOutcome> {
        let limit = self.config.rewash_limit;
        let result = self.create_inner(input).await;
        self.report(result, "save the wash job", |outcome| {
            Some(match outcome {
                CreateOutcome::Created(_) => Notification::success("Saved Successfully", CONFIRM_MS),
                CreateOutcome::Scrapped(_) => Notification::warning(
                    "Uniform Scrapped",
                    &format!("Exceeded {} washes.", limit),
                ),
            })
        })
    }

    async fn create_inner(&self, input: NewWashJob) -> WashResult<CreateOutcome> {
        let uniform_code = non_blank(Some(input.uniform_code.as_str()));
        let color = non_blank(Some(input.color.as_str()));
        let (Some(uniform_code), Some(color)) = (uniform_code, color) else {
            return Err(WashError::Validation(
                "uniform code and color are required".to_string(),
            ));
        };

        let emp_id = non_blank(input.emp_id.as_deref());
        let emp_name = match (&emp_id, non_blank(input.emp_name.as_deref())) {
            (_, Some(name)) => name,
            (Some(id), None) => self
                .stores
                .master
                .find_employee(id)
                .await?
                .map(|e| e.emp_name)
                .ok_or_else(|| WashError::not_found("Employee", id.as_str()))?,
            (None, None) => NO_EMPLOYEE.to_string(),
        };
        let emp_id = emp_id.unwrap_or_else(|| NO_EMPLOYEE.to_string());
        let size = non_blank(input.size.as_deref()).unwrap_or_default();

        let existing = self
            .stores
            .active
            .query_active(&ActiveFilter::uniform(&uniform_code, &color))
            .await?;
        if existing.iter().any(|job| !job.status.is_terminal()) {
            return Err(WashError::Conflict { uniform_code, color });
        }

        let scrapped = self
            .stores
            .master
            .find_uniforms_by_code(&uniform_code, Some(&color))
            .await?
            .iter()
            .any(|variant| variant.stock_status == StockStatus::Scrapped);
        if scrapped {
            return Err(WashError::Scrapped { uniform_code, color });
        }

        let wash_id = self.stores.ids.generate_wash_id().await?;
        let rewash_count = self
            .stores
            .master
            .get_rewash_count(&uniform_code, &color)
            .await?;
        let now = self.now();

        let job = WashJob {
            id: wash_id.clone(),
            wash_id,
            uniform_code,
            color,
            size,
            emp_id,
            emp_name,
            status: WashPhase::WaitingToSend,
            rewash_count,
            created_at: now,
        };

        if rewash_count > self.config.rewash_limit {
            let entry = WashHistoryEntry::from_job(&job, WashPhase::Scrap, now)
                .with_test(TestResult::Fail, now);
            self.stores.history.append(&entry).await?;
            self.stores
                .master
                .scrap_uniform(&job.uniform_code, &job.color)
                .await?;
            log::warn!(
                "Uniform {} ({}) scrapped on arrival after {} washes",
                job.uniform_code,
                job.color,
                rewash_count
            );
            return Ok(CreateOutcome::Scrapped(entry));
        }

        if rewash_count > 0 {
            self.stores
                .master
                .set_rewash_count(&job.uniform_code, &job.color, rewash_count)
                .await?;
        }
        self.stores.active.create(&job).await?;
        log::info!(
            "Created wash job {} for {} ({}), {}",
            job.wash_id,
            job.uniform_code,
            job.color,
            job.status_text()
        );
        Ok(CreateOutcome::Created(job))
    }

    /// Brings the stored status of `job` up to date, persisting only when it
    /// changed.
    pub async fn recompute(&self, job: WashJob) -> WashResult<WashJob> {
        self.recompute_at(job, self.now()).await
    }

    async fn recompute_at(&self, mut job: WashJob, now: DateTime<Utc>) -> WashResult<WashJob> {
        let derived = derive_status(&job, now, &self.thresholds);
        if derived == job.status {
            return Ok(job);
        }

        match self
            .stores
            .active
            .update(&job.id, &WashJobPatch::status(derived))
            .await
        {
            Ok(()) => log::info!(
                "Status changed for {}: {} -> {}",
                job.wash_id,
                job.status_text(),
                crate::status::status_text(derived, job.rewash_count)
            ),
            // Removed while we were looking at it.
            Err(StoreError::Missing { .. }) => {
                log::debug!("Wash job {} vanished before status update", job.wash_id)
            }
            Err(e) => return Err(e.into()),
        }
        job.status = derived;
        Ok(job)
    }

    /// Recomputes every job in `snapshot` against a single "now".
    pub async fn recompute_snapshot(&self, snapshot: Vec<WashJob>) -> WashResult<Vec<WashJob>> {
        let now = self.now();
        let mut jobs = Vec::with_capacity(snapshot.len());
        for job in snapshot {
            jobs.push(self.recompute_at(job, now).await?);
        }
        Ok(jobs)
    }

    /// Loads and recomputes the whole active set.
    pub async fn recompute_all(&self) -> WashResult<Vec<WashJob>> {
        let snapshot = self
            .stores
            .active
            .query_active(&ActiveFilter::default())
            .await?;
        self.recompute_snapshot(snapshot).await
    }

    /// Opens an ESD test: the job must exist and be `Completed` after
    /// recomputation.
    pub async fn begin_esd(&self, id: &str) -> WashResult<WashJob> {
        let result = self.load_completed(id).await;
        self.report(result, "load ESD data", |_| None)
    }

    async fn load_completed(&self, id: &str) -> WashResult<WashJob> {
        let job = self
            .stores
            .active
            .get_by_id(id)
            .await?
            .ok_or_else(|| WashError::not_found("Wash job", id))?;
        let job = self.recompute(job).await?;
        if job.status != WashPhase::Completed {
            return Err(WashError::InvalidState {
                wash_id: job.wash_id,
                expected: WashPhase::Completed,
                found: job.status,
            });
        }
        Ok(job)
    }

    /// Records a passed ESD test and returns the uniform to stock.
    pub async fn esd_pass(&self, id: &str) -> WashResult<WashHistoryEntry> {
        let result = self.esd_pass_inner(id).await;
        self.report(result, "record ESD Pass", |_| {
            Some(Notification::success(
                "ESD Pass recorded successfully",
                CONFIRM_MS,
            ))
        })
    }

    async fn esd_pass_inner(&self, id: &str) -> WashResult<WashHistoryEntry> {
        let job = self.load_completed(id).await?;
        let now = self.now();

        if job.rewash_count > 0 {
            self.stores
                .master
                .set_rewash_count(&job.uniform_code, &job.color, 0)
                .await?;
        }

        let entry = WashHistoryEntry::from_job(&job, WashPhase::EsdPassed, now)
            .with_test(TestResult::Pass, now);
        self.stores.history.append(&entry).await?;
        self.stores.master.return_to_stock_after_esd(&entry).await?;
        self.stores.active.delete(&job.id).await?;

        log::info!("ESD pass recorded for {}", job.wash_id);
        Ok(entry)
    }

    /// Records a failed ESD test and bumps the stock counter. The uniform
    /// either goes back for another wash or, past the limit, is scrapped.
    pub async fn esd_fail(&self, id: &str) -> WashResult<EsdFailOutcome> {
        let result = self.esd_fail_inner(id).await;
        self.report(result, "record ESD Fail", |outcome| {
            let text = match outcome {
                EsdFailOutcome::Rewash { .. } => "Action completed successfully.".to_string(),
                EsdFailOutcome::Scrapped { new_count } => {
                    format!("Uniform scrapped after {} failed tests.", new_count)
                }
            };
            Some(Notification::warning("ESD Fail recorded", &text).dismiss_after(LONG_CONFIRM_MS))
        })
    }

    async fn esd_fail_inner(&self, id: &str) -> WashResult<EsdFailOutcome> {
        let job = self.load_completed(id).await?;
        let now = self.now();
        let new_count = job.rewash_count + 1;

        let entry = WashHistoryEntry::from_job(&job, WashPhase::EsdFailed, now)
            .with_test(TestResult::Fail, now);
        self.stores.history.append(&entry).await?;

        self.stores
            .master
            .set_rewash_count(&job.uniform_code, &job.color, new_count)
            .await?;
        let outcome = if new_count > self.config.rewash_limit {
            self.stores
                .master
                .scrap_uniform(&job.uniform_code, &job.color)
                .await?;
            EsdFailOutcome::Scrapped { new_count }
        } else {
            EsdFailOutcome::Rewash { new_count }
        };
        self.stores.active.delete(&job.id).await?;

        log::info!("ESD fail recorded for {}: {:?}", job.wash_id, outcome);
        Ok(outcome)
    }

    /// Discards an active job. Unknown ids are not an error.
    pub async fn delete(&self, id: &str) -> WashResult<()> {
        let result = self.delete_inner(id).await;
        self.report(result, "delete wash job", |_| {
            Some(Notification::success("Deleted Successfully", CONFIRM_MS))
        })
    }

    async fn delete_inner(&self, id: &str) -> WashResult<()> {
        if self.config.record_discards {
            if let Some(job) = self.stores.active.get_by_id(id).await? {
                let now = self.now();
                let status = derive_status(&job, now, &self.thresholds);
                let entry = WashHistoryEntry::from_job(&job, status, now).with_note("Discarded");
                self.stores.history.append(&entry).await?;
            }
        }
        self.stores.active.delete(id).await?;
        log::info!("Deleted wash job {}", id);
        Ok(())
    }

    /// Moves the start of a job's wash cycle by `delta_days` and recomputes
    /// its status.
    pub async fn shift_date(&self, wash_id: &str, delta_days: i64) -> WashResult<ShiftOutcome> {
        let result = self.shift_date_inner(wash_id, delta_days).await;
        self.report(result, "shift date", |outcome| {
            Some(match outcome {
                ShiftOutcome::Shifted(job) => Notification::success(
                    "Date shifted successfully",
                    LONG_CONFIRM_MS,
                )
                .with_text(&format!("-> {}", job.created_at.format("%-d %b %Y"))),
                ShiftOutcome::Unchanged => Notification::info("No date change"),
            })
        })
    }

    async fn shift_date_inner(&self, wash_id: &str, delta_days: i64) -> WashResult<ShiftOutcome> {
        let mut job = self
            .stores
            .active
            .query_active(&ActiveFilter::wash_id(wash_id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| WashError::not_found("Wash job", wash_id))?;

        if delta_days == 0 {
            return Ok(ShiftOutcome::Unchanged);
        }

        let shifted = Duration::try_days(delta_days)
            .and_then(|delta| job.created_at.checked_add_signed(delta))
            .ok_or_else(|| WashError::DateOutOfRange {
                wash_id: job.wash_id.clone(),
                delta_days,
            })?;

        self.stores
            .active
            .update(&job.id, &WashJobPatch::created_at(shifted))
            .await?;
        log::info!(
            "Shifted {} by {} days to {}",
            job.wash_id,
            delta_days,
            shifted
        );
        job.created_at = shifted;

        let job = self.recompute(job).await?;
        Ok(ShiftOutcome::Shifted(job))
    }
}
