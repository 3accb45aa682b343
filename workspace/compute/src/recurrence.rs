//! Pure expansion of a seed transaction into a dated monthly series.
//!
//! Both generators are synchronous, perform no I/O, and take `today` as an
//! argument instead of reading the system clock, so callers and tests get
//! deterministic output. Persisting the returned drafts is the caller's
//! concern (see [`crate::batch`]).

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::Set;
use uuid::Uuid;

use common::{RecurrenceRule, RepaymentRule};
use model::entities::transaction::{self, TransactionStatus};

use crate::calendar::{clamped_date, next_month};
use crate::money::round_amount;

/// Termination bound for recurrence expansion: ten years of monthly rows.
const MAX_RECURRENCE_MONTHS: u32 = 120;

/// Termination bound for repayment plans: twenty years of installments.
const MAX_REPAYMENT_MONTHS: u32 = 240;

/// The caller-described first transaction of a series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSeed {
    pub account_id: i32,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub note: Option<String>,
    pub status: TransactionStatus,
    pub is_auto: bool,
}

/// One not-yet-persisted row of an expanded series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub account_id: i32,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub note: Option<String>,
    pub status: TransactionStatus,
    pub is_auto: bool,
}

impl TransactionDraft {
    fn from_seed(seed: &TransactionSeed, date: NaiveDate, amount: Decimal, today: NaiveDate) -> Self {
        // Future occurrences are never born completed.
        let status = if date <= today {
            seed.status
        } else {
            TransactionStatus::Pending
        };
        TransactionDraft {
            account_id: seed.account_id,
            user_id: seed.user_id,
            date,
            amount,
            note: seed.note.clone(),
            status,
            is_auto: seed.is_auto,
        }
    }

    pub fn into_active_model(self, created_at: DateTime<Utc>) -> transaction::ActiveModel {
        transaction::ActiveModel {
            account_id: Set(self.account_id),
            user_id: Set(self.user_id),
            date: Set(self.date),
            amount: Set(self.amount),
            note: Set(self.note),
            status: Set(self.status),
            is_auto: Set(self.is_auto),
            created_at: Set(created_at),
            ..Default::default()
        }
    }
}

/// Expands a seed into one occurrence per month on the rule's day of month,
/// clamped to each month's length.
///
/// The series runs from the seed date (pushed forward to `today` for an
/// auto-debit still pending past its date, so it is not born overdue) to the
/// rule's end date, or December 31 of the start year when the rule has none.
pub fn generate_recurrence(
    seed: &TransactionSeed,
    rule: &RecurrenceRule,
    today: NaiveDate,
) -> Vec<TransactionDraft> {
    let mut drafts = Vec::new();
    if rule.day_of_month < 1 {
        return drafts;
    }

    let mut start = seed.date;
    if seed.is_auto && seed.status == TransactionStatus::Pending && start < today {
        start = today;
    }

    let end = rule
        .end_date
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(start.year(), 12, 31).unwrap());
    if end < start {
        return drafts;
    }

    let (mut year, mut month) = (start.year(), start.month());
    for _ in 0..MAX_RECURRENCE_MONTHS {
        let date = clamped_date(year, month, rule.day_of_month);
        if date > end {
            break;
        }
        // The first visited month can fall before the (possibly pushed
        // forward) start; every later occurrence is past it.
        if date >= start {
            drafts.push(TransactionDraft::from_seed(seed, date, seed.amount, today));
        }
        (year, month) = next_month(year, month);
    }

    drafts
}

/// Emits one installment of `min(remaining, monthly)` per month starting at
/// the seed's month, anchored on the seed's day of month, until the rounded
/// total is extinguished. Only the final installment may be smaller than the
/// monthly cap. Non-positive totals or installments yield an empty plan.
pub fn generate_repayment_plan(
    seed: &TransactionSeed,
    rule: &RepaymentRule,
    today: NaiveDate,
) -> Vec<TransactionDraft> {
    let mut drafts = Vec::new();
    let mut remaining = round_amount(rule.total_amount);
    let monthly = round_amount(rule.monthly_amount);
    if remaining <= Decimal::ZERO || monthly <= Decimal::ZERO {
        return drafts;
    }

    let anchor_day = seed.date.day();
    let (mut year, mut month) = (seed.date.year(), seed.date.month());
    for _ in 0..MAX_REPAYMENT_MONTHS {
        if remaining <= Decimal::ZERO {
            break;
        }
        let date = clamped_date(year, month, anchor_day);
        let installment = remaining.min(monthly);
        drafts.push(TransactionDraft::from_seed(seed, date, installment, today));
        remaining = round_amount(remaining - installment);
        (year, month) = next_month(year, month);
    }

    drafts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::days_in_month;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn seed(date: NaiveDate, amount: &str) -> TransactionSeed {
        TransactionSeed {
            account_id: 1,
            user_id: Uuid::new_v4(),
            date,
            amount: dec(amount),
            note: Some("seed".to_string()),
            status: TransactionStatus::Completed,
            is_auto: false,
        }
    }

    fn rule(day_of_month: u32, end_date: Option<NaiveDate>) -> RecurrenceRule {
        RecurrenceRule {
            day_of_month,
            end_date,
        }
    }

    #[test]
    fn march_seed_without_end_date_runs_to_december() {
        let today = ymd(2026, 12, 31);
        let drafts = generate_recurrence(&seed(ymd(2026, 3, 15), "100"), &rule(15, None), today);

        assert_eq!(drafts.len(), 10);
        for (i, draft) in drafts.iter().enumerate() {
            assert_eq!(draft.date, ymd(2026, 3 + i as u32, 15));
            assert_eq!(draft.amount, dec("100"));
            assert_eq!(draft.status, TransactionStatus::Completed);
        }
    }

    #[test]
    fn day_31_clamps_to_short_months() {
        let today = ymd(2026, 12, 31);
        let drafts = generate_recurrence(&seed(ymd(2026, 1, 31), "50"), &rule(31, None), today);

        assert_eq!(drafts.len(), 12);
        assert_eq!(drafts[0].date, ymd(2026, 1, 31));
        assert_eq!(drafts[1].date, ymd(2026, 2, 28)); // not a leap year
        assert_eq!(drafts[3].date, ymd(2026, 4, 30));
        assert_eq!(drafts[5].date, ymd(2026, 6, 30));
        assert_eq!(drafts[11].date, ymd(2026, 12, 31));
        for draft in &drafts {
            let day = draft.date.day();
            assert_eq!(day, 31u32.min(days_in_month(draft.date.year(), draft.date.month())));
        }
    }

    #[test]
    fn day_29_in_leap_february_is_kept() {
        let today = ymd(2024, 12, 31);
        let drafts = generate_recurrence(&seed(ymd(2024, 1, 29), "10"), &rule(29, None), today);
        assert_eq!(drafts[1].date, ymd(2024, 2, 29));
    }

    #[test]
    fn overdue_pending_auto_debit_is_reanchored_to_today() {
        let today = ymd(2026, 2, 14);
        let mut auto_seed = seed(ymd(2026, 2, 1), "25");
        auto_seed.is_auto = true;
        auto_seed.status = TransactionStatus::Pending;

        let drafts = generate_recurrence(&auto_seed, &rule(12, None), today);

        // 2026-02-12 precedes the pushed-forward start; the series begins in March.
        assert_eq!(drafts.first().map(|d| d.date), Some(ymd(2026, 3, 12)));
        assert!(drafts.iter().all(|d| d.date >= today));
    }

    #[test]
    fn overdue_completed_seed_is_not_reanchored() {
        let today = ymd(2026, 2, 14);
        let mut auto_seed = seed(ymd(2026, 2, 1), "25");
        auto_seed.is_auto = true; // completed, so no push forward

        let drafts = generate_recurrence(&auto_seed, &rule(12, None), today);
        assert_eq!(drafts.first().map(|d| d.date), Some(ymd(2026, 2, 12)));
    }

    #[test]
    fn future_occurrences_are_forced_pending() {
        let today = ymd(2026, 5, 20);
        let drafts = generate_recurrence(&seed(ymd(2026, 3, 15), "100"), &rule(15, None), today);

        assert_eq!(drafts.len(), 10);
        for draft in &drafts {
            if draft.date <= today {
                assert_eq!(draft.status, TransactionStatus::Completed);
            } else {
                assert_eq!(draft.status, TransactionStatus::Pending);
            }
        }
    }

    #[test]
    fn explicit_end_date_bounds_the_series() {
        let today = ymd(2026, 12, 31);
        let drafts = generate_recurrence(
            &seed(ymd(2026, 3, 10), "100"),
            &rule(10, Some(ymd(2026, 6, 9))),
            today,
        );
        // June 10 exceeds the end date; March through May remain.
        assert_eq!(drafts.len(), 3);
        assert_eq!(drafts.last().map(|d| d.date), Some(ymd(2026, 5, 10)));
    }

    #[test]
    fn end_date_before_start_yields_nothing() {
        let today = ymd(2026, 12, 31);
        let drafts = generate_recurrence(
            &seed(ymd(2026, 3, 10), "100"),
            &rule(10, Some(ymd(2026, 2, 1))),
            today,
        );
        assert!(drafts.is_empty());
    }

    #[test]
    fn pathological_end_date_stops_at_safety_bound() {
        let today = ymd(2026, 1, 1);
        let drafts = generate_recurrence(
            &seed(ymd(2026, 1, 5), "1"),
            &rule(5, Some(ymd(2099, 12, 31))),
            today,
        );
        assert_eq!(drafts.len(), 120);
    }

    #[test]
    fn dates_are_strictly_increasing() {
        let today = ymd(2026, 12, 31);
        let drafts = generate_recurrence(&seed(ymd(2026, 1, 31), "5"), &rule(31, None), today);
        assert!(drafts.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn repayment_splits_total_into_installments() {
        let today = ymd(2026, 12, 31);
        let plan = generate_repayment_plan(
            &seed(ymd(2026, 2, 10), "0"),
            &RepaymentRule {
                total_amount: dec("1000"),
                monthly_amount: dec("300"),
            },
            today,
        );

        let amounts: Vec<Decimal> = plan.iter().map(|d| d.amount).collect();
        assert_eq!(amounts, vec![dec("300"), dec("300"), dec("300"), dec("100")]);
        assert_eq!(plan.last().map(|d| d.date), Some(ymd(2026, 5, 10)));
        assert_eq!(plan[0].date, ymd(2026, 2, 10));
    }

    #[test]
    fn repayment_sum_matches_rounded_total() {
        let today = ymd(2026, 12, 31);
        let plan = generate_repayment_plan(
            &seed(ymd(2026, 1, 15), "0"),
            &RepaymentRule {
                total_amount: dec("1000.005"),
                monthly_amount: dec("333.333"),
            },
            today,
        );

        let sum: Decimal = plan.iter().map(|d| d.amount).sum();
        assert_eq!(sum, dec("1000.01")); // round-half-away-from-zero of the total
        assert_eq!(plan.len(), 4); // ceil(1000.01 / 333.33)
        // Only the final installment may undershoot the cap.
        for draft in &plan[..plan.len() - 1] {
            assert_eq!(draft.amount, dec("333.33"));
        }
        assert!(plan.last().unwrap().amount < dec("333.33"));
    }

    #[test]
    fn repayment_anchored_on_day_31_clamps() {
        let today = ymd(2026, 12, 31);
        let plan = generate_repayment_plan(
            &seed(ymd(2026, 1, 31), "0"),
            &RepaymentRule {
                total_amount: dec("90"),
                monthly_amount: dec("30"),
            },
            today,
        );
        let dates: Vec<NaiveDate> = plan.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![ymd(2026, 1, 31), ymd(2026, 2, 28), ymd(2026, 3, 31)]);
    }

    #[test]
    fn repayment_statuses_follow_today() {
        let today = ymd(2026, 3, 1);
        let plan = generate_repayment_plan(
            &seed(ymd(2026, 2, 10), "0"),
            &RepaymentRule {
                total_amount: dec("600"),
                monthly_amount: dec("300"),
            },
            today,
        );
        assert_eq!(plan[0].status, TransactionStatus::Completed);
        assert_eq!(plan[1].status, TransactionStatus::Pending);
    }

    #[test]
    fn degenerate_repayment_inputs_yield_empty_plans() {
        let today = ymd(2026, 12, 31);
        let s = seed(ymd(2026, 2, 10), "0");
        for (total, monthly) in [("0", "300"), ("-10", "300"), ("1000", "0"), ("1000", "-5")] {
            let plan = generate_repayment_plan(
                &s,
                &RepaymentRule {
                    total_amount: dec(total),
                    monthly_amount: dec(monthly),
                },
                today,
            );
            assert!(plan.is_empty(), "total={total} monthly={monthly}");
        }
    }

    #[test]
    fn repayment_stops_at_safety_bound() {
        let today = ymd(2026, 1, 1);
        let plan = generate_repayment_plan(
            &seed(ymd(2026, 1, 1), "0"),
            &RepaymentRule {
                total_amount: dec("100000"),
                monthly_amount: dec("0.01"),
            },
            today,
        );
        assert_eq!(plan.len(), 240);
    }

    #[test]
    fn drafts_copy_seed_fields() {
        let today = ymd(2026, 12, 31);
        let s = seed(ymd(2026, 3, 15), "42.50");
        let drafts = generate_recurrence(&s, &rule(15, None), today);
        for draft in &drafts {
            assert_eq!(draft.account_id, s.account_id);
            assert_eq!(draft.user_id, s.user_id);
            assert_eq!(draft.note, s.note);
            assert_eq!(draft.is_auto, s.is_auto);
            assert_eq!(draft.amount, dec("42.50"));
        }
    }
}
