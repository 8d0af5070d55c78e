//! Wash-job lifecycle: the controller, its clock, and the read side that
//! turns active jobs into display rows.

pub mod autofill;
pub mod clock;
pub mod controller;
pub mod projection;
pub mod watcher;

pub use autofill::{Assignee, UniformOptions};
pub use clock::{Clock, FixedClock, SystemClock};
pub use controller::{CreateOutcome, EsdFailOutcome, ShiftOutcome, WashLifecycle, WashResult};
pub use projection::{
    paginate, project, sort_history, summarize, ActiveQuery, HistoryItem, Page, SummaryCounts, WashRow,
};
pub use watcher::{BoardUpdate, BoardWatcher};
