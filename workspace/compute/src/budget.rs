//! The monthly allocation planner.
//!
//! `stats` is the read/derive path, `upsert` the write path; both resolve
//! the plan month lazily and share the query helpers in `queries`, which is
//! the whole persistence surface the planner needs. Isolation is the
//! storage layer's job: concurrent writers to the same plan month race and
//! the last commit wins.

pub mod queries;
pub mod stats;
pub mod upsert;

#[cfg(test)]
pub(crate) mod testing;

use model::entities::budget_plan_group_allocation::AllocationInputMode;

pub(crate) fn input_mode_str(mode: AllocationInputMode) -> &'static str {
    match mode {
        AllocationInputMode::Percent => "percent",
        AllocationInputMode::Amount => "amount",
    }
}
