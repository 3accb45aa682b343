//! The budgeting engine: a pure recurrence/repayment generator and the
//! monthly allocation planner, both invoked in-process by an HTTP layer
//! that handles routing and authentication elsewhere.

pub mod batch;
pub mod budget;
pub mod calendar;
pub mod error;
pub mod money;
pub mod recurrence;
pub mod retry;

pub use budget::stats::get_budget_stats;
pub use budget::upsert::upsert_budget_plan;
pub use recurrence::{generate_recurrence, generate_repayment_plan};
