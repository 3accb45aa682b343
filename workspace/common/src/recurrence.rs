//! Request shapes for the recurrence/repayment generator.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// "Day-of-month + optional end date" recurrence rule. The day is clamped to
/// the length of each visited month; with no end date the series stops at
/// December 31 of the start year.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct RecurrenceRule {
    /// 1-31; validated by the binding layer before the generator runs.
    pub day_of_month: u32,
    pub end_date: Option<NaiveDate>,
}

/// "Total amount + monthly installment" repayment rule. Non-positive values
/// yield an empty plan rather than an error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct RepaymentRule {
    pub total_amount: Decimal,
    pub monthly_amount: Decimal,
}
