//! Month-by-month amortization with prepayments and a linked savings offset.
//!
//! Each month applies, in order: the one-time prepayment (if its calendar
//! month matches), the recurring prepayment (if due), interest on the
//! offset-reduced balance, then the fixed installment split into interest
//! and principal. The savings balance drifts only after interest is charged.
//! All math in `rust_decimal::Decimal`; entry fields are rounded to 2 dp at
//! recording, running state stays unrounded.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use super::plans::{LoanTerms, PrepaymentPlan, SavingsOffsetPlan, MAX_SCHEDULE_MONTHS};
use crate::emi::compute_emi;
use crate::error::EmiPlannerError;
use crate::types::{round_money, with_metadata, ComputationOutput, Money};
use crate::EmiPlannerResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Outstanding balance at or below which the loan is considered repaid.
pub const BALANCE_EPSILON: Decimal = dec!(0.01);

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// How the monthly installment is determined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Installment {
    /// Level annuity EMI from the original principal and term.
    #[default]
    Annuity,
    /// A caller-pinned monthly payment.
    Fixed(Money),
}

/// When the monthly iteration stops if the balance is not yet cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Termination {
    /// Stop after `term_months`; any residual is reported, not extended.
    #[default]
    CapAtTerm,
    /// Keep paying past the term until the balance clears, at most `max_months`.
    UntilPayoff { max_months: u32 },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleOptions {
    #[serde(default)]
    pub installment: Installment,
    #[serde(default)]
    pub termination: Termination,
}

impl ScheduleOptions {
    fn validate(&self, terms: &LoanTerms) -> EmiPlannerResult<()> {
        if let Installment::Fixed(amount) = self.installment {
            if amount <= Decimal::ZERO {
                return Err(EmiPlannerError::InvalidInput {
                    field: "options.installment".into(),
                    reason: "Fixed installment must be positive".into(),
                });
            }
        }
        if let Termination::UntilPayoff { max_months } = self.termination {
            if max_months < terms.term_months {
                return Err(EmiPlannerError::InvalidInput {
                    field: "options.termination.max_months".into(),
                    reason: format!(
                        "Payoff ceiling {max_months} is shorter than the {} month term",
                        terms.term_months
                    ),
                });
            }
            if max_months > MAX_SCHEDULE_MONTHS {
                return Err(EmiPlannerError::InvalidInput {
                    field: "options.termination.max_months".into(),
                    reason: format!(
                        "Payoff ceiling {max_months} exceeds {MAX_SCHEDULE_MONTHS} months"
                    ),
                });
            }
        }
        Ok(())
    }

    fn month_limit(&self, terms: &LoanTerms) -> u32 {
        match self.termination {
            Termination::CapAtTerm => terms.term_months,
            Termination::UntilPayoff { max_months } => max_months,
        }
    }
}

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Everything needed to generate one schedule (or one scenario set).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub terms: LoanTerms,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepayment: Option<PrepaymentPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings: Option<SavingsOffsetPlan>,
    #[serde(default)]
    pub options: ScheduleOptions,
}

/// One paid month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// 1-based month index.
    pub month: u32,
    pub date: NaiveDate,
    /// principal_paid + interest_paid.
    pub payment: Money,
    pub principal_paid: Money,
    pub interest_paid: Money,
    /// Balance after this month's prepayments and principal.
    pub outstanding_balance: Money,
    /// Savings balance that offset this month's interest (0 when disabled).
    pub linked_savings_balance: Money,
}

/// A complete amortization schedule and its totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub entries: Vec<ScheduleEntry>,
    /// Installment used every month, rounded to 2 dp.
    pub emi: Money,
    pub total_interest: Money,
    /// Sum of installments actually paid (excludes prepayments).
    pub total_paid: Money,
    /// Sum of one-time and recurring prepayments actually applied.
    pub total_prepaid: Money,
    /// Date of the final installment when the loan was repaid.
    pub payoff_date: Option<NaiveDate>,
    /// Balance left when iteration stopped (0 when repaid).
    pub residual_balance: Money,
    /// False when the installment could not clear the loan within the limit.
    pub fully_amortized: bool,
}

impl ScheduleResult {
    /// Number of recorded months.
    pub fn months(&self) -> u32 {
        self.entries.len() as u32
    }

    pub fn last_entry(&self) -> Option<&ScheduleEntry> {
        self.entries.last()
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build a schedule with the default options (annuity EMI, capped at term).
pub fn build_schedule(
    terms: &LoanTerms,
    prepayment: Option<&PrepaymentPlan>,
    savings: Option<&SavingsOffsetPlan>,
) -> EmiPlannerResult<ScheduleResult> {
    build_schedule_with_options(terms, prepayment, savings, &ScheduleOptions::default())
}

/// Build a schedule, iterating at most the limit implied by `options`.
pub fn build_schedule_with_options(
    terms: &LoanTerms,
    prepayment: Option<&PrepaymentPlan>,
    savings: Option<&SavingsOffsetPlan>,
    options: &ScheduleOptions,
) -> EmiPlannerResult<ScheduleResult> {
    terms.validate()?;
    if let Some(plan) = prepayment {
        plan.validate()?;
    }
    if let Some(plan) = savings {
        plan.validate()?;
    }
    options.validate(terms)?;

    let emi = match options.installment {
        Installment::Annuity => {
            compute_emi(terms.principal, terms.annual_rate_percent, terms.term_months)?
        }
        Installment::Fixed(amount) => amount,
    };
    let monthly_rate = terms.monthly_rate();
    let limit = options.month_limit(terms);

    let one_time = prepayment.and_then(|p| p.one_time.as_ref());
    let recurring = prepayment.and_then(|p| p.recurring.as_ref());
    let offset = savings.filter(|s| s.enabled);
    check_range(terms, offset, monthly_rate, limit)?;

    let mut outstanding = terms.principal;
    let mut savings_balance = offset.map_or(Decimal::ZERO, |s| s.initial_balance);
    let mut one_time_applied = false;

    let mut entries: Vec<ScheduleEntry> = Vec::with_capacity(terms.term_months as usize);
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;
    let mut total_prepaid = Decimal::ZERO;

    for month in 1..=limit {
        let date = month_date(terms.start_date, month)?;

        if let Some(ot) = one_time {
            if !one_time_applied && ot.falls_in(date) {
                let applied = ot.amount.min(outstanding);
                outstanding -= applied;
                total_prepaid += applied;
                one_time_applied = true;
            }
        }

        if let Some(rec) = recurring {
            if rec.applies_in(month) {
                let applied = rec.amount.min(outstanding);
                outstanding -= applied;
                total_prepaid += applied;
            }
        }

        let interest_bearing = match offset {
            Some(_) => (outstanding - savings_balance).max(Decimal::ZERO),
            None => outstanding,
        };
        let interest = interest_bearing * monthly_rate;
        let principal = (emi - interest).max(Decimal::ZERO).min(outstanding);

        outstanding = (outstanding - principal).max(Decimal::ZERO);
        total_interest += interest;
        total_paid += principal + interest;

        let principal_paid = round_money(principal);
        let interest_paid = round_money(interest);
        entries.push(ScheduleEntry {
            month,
            date,
            payment: principal_paid + interest_paid,
            principal_paid,
            interest_paid,
            outstanding_balance: round_money(outstanding),
            linked_savings_balance: round_money(savings_balance),
        });

        if let Some(plan) = offset {
            savings_balance = (savings_balance + plan.monthly_drift).max(Decimal::ZERO);
        }

        if outstanding <= BALANCE_EPSILON {
            break;
        }
    }

    let fully_amortized = outstanding <= BALANCE_EPSILON;
    if fully_amortized {
        debug!(
            months = entries.len(),
            total_interest = %round_money(total_interest),
            "schedule repaid"
        );
    } else {
        warn!(
            months = entries.len(),
            residual = %round_money(outstanding),
            "schedule does not amortize within its limit"
        );
    }

    Ok(ScheduleResult {
        payoff_date: entries
            .last()
            .filter(|_| fully_amortized)
            .map(|e| e.date),
        entries,
        emi: round_money(emi),
        total_interest: round_money(total_interest),
        total_paid: round_money(total_paid),
        total_prepaid: round_money(total_prepaid),
        residual_balance: if fully_amortized {
            Decimal::ZERO
        } else {
            round_money(outstanding)
        },
        fully_amortized,
    })
}

/// Generate a schedule wrapped in the computation envelope, with advisory
/// warnings for plans that had no effect and for non-amortizing loans.
pub fn generate_schedule(
    input: &ScheduleInput,
) -> EmiPlannerResult<ComputationOutput<ScheduleResult>> {
    let start = Instant::now();

    let result = build_schedule_with_options(
        &input.terms,
        input.prepayment.as_ref(),
        input.savings.as_ref(),
        &input.options,
    )?;
    let warnings = schedule_warnings(input, &result);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monthly amortization with prepayment and savings offset",
        input,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Calendar date of `month` (1-based): the start date advanced `month - 1`
/// months, with the day clamped to the end of shorter months.
pub fn month_date(start: NaiveDate, month: u32) -> EmiPlannerResult<NaiveDate> {
    start
        .checked_add_months(Months::new(month.saturating_sub(1)))
        .ok_or_else(|| {
            EmiPlannerError::DateError(format!("Month {month} after {start} is out of range"))
        })
}

/// Reject inputs whose running totals could leave the Decimal range: monthly
/// interest never exceeds principal × rate, and the savings balance grows by
/// at most the positive drift each month.
fn check_range(
    terms: &LoanTerms,
    offset: Option<&SavingsOffsetPlan>,
    monthly_rate: Decimal,
    limit: u32,
) -> EmiPlannerResult<()> {
    let months = Decimal::from(limit);

    let paid_ceiling = terms
        .principal
        .checked_mul(monthly_rate)
        .and_then(|interest| interest.checked_mul(months))
        .and_then(|interest| interest.checked_add(terms.principal));
    if paid_ceiling.is_none() {
        return Err(EmiPlannerError::InvalidInput {
            field: "principal".into(),
            reason: format!(
                "Interest on {} at {}% over {limit} months exceeds the representable range",
                terms.principal, terms.annual_rate_percent
            ),
        });
    }

    if let Some(plan) = offset {
        let savings_ceiling = plan
            .monthly_drift
            .max(Decimal::ZERO)
            .checked_mul(months)
            .and_then(|growth| growth.checked_add(plan.initial_balance));
        if savings_ceiling.is_none() {
            return Err(EmiPlannerError::InvalidInput {
                field: "savings.monthly_drift".into(),
                reason: format!("Savings balance over {limit} months exceeds the representable range"),
            });
        }
    }

    Ok(())
}

pub(crate) fn schedule_warnings(input: &ScheduleInput, result: &ScheduleResult) -> Vec<String> {
    let mut warnings: Vec<String> = Vec::new();

    if !result.fully_amortized {
        warnings.push(format!(
            "Loan does not fully amortize within {} months; residual balance {}",
            result.months(),
            result.residual_balance
        ));
    }

    if let Some(plan) = &input.prepayment {
        if let Some(ot) = &plan.one_time {
            if !result.entries.iter().any(|e| ot.falls_in(e.date)) {
                warnings.push(format!(
                    "One-time prepayment dated {} falls outside the schedule and was not applied",
                    ot.date
                ));
            }
        }
        if let Some(rec) = &plan.recurring {
            if rec.start_month > result.months() {
                warnings.push(format!(
                    "Recurring prepayment starts in month {} but the schedule ends in month {}",
                    rec.start_month,
                    result.months()
                ));
            }
        }
    }

    if let Some(savings) = &input.savings {
        if !savings.enabled {
            warnings.push("Savings offset supplied but disabled; interest ignores it".into());
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::plans::{
        OneTimePrepayment, PrepaymentFrequency, RecurringPrepayment,
    };
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn standard_terms() -> LoanTerms {
        LoanTerms {
            principal: dec!(1_000_000),
            annual_rate_percent: dec!(12),
            term_months: 12,
            start_date: date(2024, 1, 15),
        }
    }

    fn one_time(amount: Money, on: NaiveDate) -> PrepaymentPlan {
        PrepaymentPlan {
            one_time: Some(OneTimePrepayment { amount, date: on }),
            recurring: None,
        }
    }

    fn recurring(amount: Money, frequency: PrepaymentFrequency, start_month: u32) -> PrepaymentPlan {
        PrepaymentPlan {
            one_time: None,
            recurring: Some(RecurringPrepayment {
                amount,
                frequency,
                start_month,
            }),
        }
    }

    fn savings(initial: Money, drift: Money) -> SavingsOffsetPlan {
        SavingsOffsetPlan {
            enabled: true,
            initial_balance: initial,
            monthly_drift: drift,
        }
    }

    // -----------------------------------------------------------------------
    // Base schedule
    // -----------------------------------------------------------------------

    #[test]
    fn test_base_schedule_runs_full_term() {
        let result = build_schedule(&standard_terms(), None, None).unwrap();
        assert_eq!(result.months(), 12);
        assert_eq!(result.emi, dec!(88848.79));
        assert!(result.fully_amortized);
        assert_eq!(result.residual_balance, Decimal::ZERO);
        assert_eq!(result.last_entry().unwrap().outstanding_balance, dec!(0.00));
        assert_eq!(result.payoff_date, Some(date(2024, 12, 15)));
        assert_eq!(result.total_prepaid, Decimal::ZERO);
    }

    #[test]
    fn test_first_month_split() {
        let result = build_schedule(&standard_terms(), None, None).unwrap();
        let first = &result.entries[0];
        // 1% of 1,000,000
        assert_eq!(first.interest_paid, dec!(10000.00));
        assert_eq!(first.principal_paid, dec!(78848.79));
        assert_eq!(first.outstanding_balance, dec!(921151.21));
        assert_eq!(first.linked_savings_balance, Decimal::ZERO);
    }

    #[test]
    fn test_payment_equals_principal_plus_interest() {
        let result = build_schedule(&standard_terms(), None, None).unwrap();
        for e in &result.entries {
            assert_eq!(e.payment, e.principal_paid + e.interest_paid);
        }
    }

    #[test]
    fn test_totals_are_consistent() {
        let terms = standard_terms();
        let result = build_schedule(&terms, None, None).unwrap();
        assert!((result.total_paid - result.total_interest - terms.principal).abs() < dec!(0.02));
        let summed: Money = result.entries.iter().map(|e| e.interest_paid).sum();
        assert!((summed - result.total_interest).abs() < dec!(0.10));
    }

    #[test]
    fn test_zero_rate_schedule_is_linear() {
        let terms = LoanTerms {
            principal: dec!(120_000),
            annual_rate_percent: dec!(0),
            term_months: 24,
            start_date: date(2024, 1, 1),
        };
        let result = build_schedule(&terms, None, None).unwrap();
        assert_eq!(result.months(), 24);
        assert_eq!(result.total_interest, Decimal::ZERO);
        assert!(result.entries.iter().all(|e| e.payment == dec!(5000.00)));
        assert!(result.fully_amortized);
    }

    #[test]
    fn test_dates_clamp_to_month_end() {
        let terms = LoanTerms {
            start_date: date(2024, 1, 31),
            ..standard_terms()
        };
        let result = build_schedule(&terms, None, None).unwrap();
        assert_eq!(result.entries[0].date, date(2024, 1, 31));
        assert_eq!(result.entries[1].date, date(2024, 2, 29));
        assert_eq!(result.entries[2].date, date(2024, 3, 31));
    }

    #[test]
    fn test_invalid_terms_rejected() {
        let terms = LoanTerms {
            term_months: 0,
            ..standard_terms()
        };
        assert!(build_schedule(&terms, None, None).is_err());

        let terms = LoanTerms {
            principal: dec!(-10),
            ..standard_terms()
        };
        assert!(build_schedule(&terms, None, None).is_err());
    }

    // -----------------------------------------------------------------------
    // Prepayments
    // -----------------------------------------------------------------------

    #[test]
    fn test_one_time_prepayment_applies_once_in_its_month() {
        let plan = one_time(dec!(200_000), date(2024, 3, 1));
        let result = build_schedule(&standard_terms(), Some(&plan), None).unwrap();
        let base = build_schedule(&standard_terms(), None, None).unwrap();

        assert_eq!(result.total_prepaid, dec!(200_000.00));
        // Months 1-2 unchanged
        assert_eq!(result.entries[1], base.entries[1]);
        // Month 3 interest is charged on the reduced balance
        assert!(result.entries[2].interest_paid < base.entries[2].interest_paid);
        assert!(result.months() < base.months());
        assert!(result.total_interest < base.total_interest);
    }

    #[test]
    fn test_one_time_prepayment_before_start_never_applies() {
        let plan = one_time(dec!(200_000), date(2023, 6, 1));
        let result = build_schedule(&standard_terms(), Some(&plan), None).unwrap();
        let base = build_schedule(&standard_terms(), None, None).unwrap();
        assert_eq!(result.total_interest, base.total_interest);
        assert_eq!(result.total_prepaid, Decimal::ZERO);
    }

    #[test]
    fn test_prepayment_larger_than_balance_clears_loan() {
        let plan = one_time(dec!(5_000_000), date(2024, 2, 10));
        let result = build_schedule(&standard_terms(), Some(&plan), None).unwrap();
        assert_eq!(result.months(), 2);
        let last = result.last_entry().unwrap();
        assert_eq!(last.payment, Decimal::ZERO);
        assert_eq!(last.outstanding_balance, Decimal::ZERO);
        // Only the balance actually outstanding is prepaid
        assert_eq!(result.total_prepaid, dec!(921151.21));
        assert!(result.fully_amortized);
    }

    #[test]
    fn test_recurring_prepayment_shortens_loan() {
        let plan = recurring(dec!(50_000), PrepaymentFrequency::Monthly, 1);
        let result = build_schedule(&standard_terms(), Some(&plan), None).unwrap();
        let base = build_schedule(&standard_terms(), None, None).unwrap();
        assert!(result.months() < base.months());
        assert!(result.total_interest < base.total_interest);
        assert!(result.fully_amortized);
    }

    #[test]
    fn test_zero_prepayment_matches_base() {
        let plan = recurring(dec!(0), PrepaymentFrequency::Quarterly, 1);
        let result = build_schedule(&standard_terms(), Some(&plan), None).unwrap();
        let base = build_schedule(&standard_terms(), None, None).unwrap();
        assert_eq!(result, base);
    }

    // -----------------------------------------------------------------------
    // Savings offset
    // -----------------------------------------------------------------------

    #[test]
    fn test_savings_offset_reduces_interest_not_debt() {
        let plan = savings(dec!(100_000), dec!(0));
        let result = build_schedule(&standard_terms(), None, Some(&plan)).unwrap();
        let first = &result.entries[0];
        // Interest on 900,000 at 1%
        assert_eq!(first.interest_paid, dec!(9000.00));
        assert_eq!(first.linked_savings_balance, dec!(100_000.00));
        // Whole EMI less interest goes to principal
        assert_eq!(first.principal_paid, dec!(79848.79));
        assert_eq!(result.total_prepaid, Decimal::ZERO);
    }

    #[test]
    fn test_savings_exceeding_balance_means_no_interest() {
        let plan = savings(dec!(2_000_000), dec!(0));
        let result = build_schedule(&standard_terms(), None, Some(&plan)).unwrap();
        assert_eq!(result.total_interest, Decimal::ZERO);
        assert!(result.fully_amortized);
    }

    #[test]
    fn test_savings_drift_applies_after_interest_and_floors_at_zero() {
        let plan = savings(dec!(1000), dec!(-600));
        let result = build_schedule(&standard_terms(), None, Some(&plan)).unwrap();
        assert_eq!(result.entries[0].linked_savings_balance, dec!(1000.00));
        assert_eq!(result.entries[1].linked_savings_balance, dec!(400.00));
        assert_eq!(result.entries[2].linked_savings_balance, Decimal::ZERO);
        assert_eq!(result.entries[3].linked_savings_balance, Decimal::ZERO);
    }

    #[test]
    fn test_disabled_savings_plan_is_ignored() {
        let mut plan = savings(dec!(500_000), dec!(1000));
        plan.enabled = false;
        let result = build_schedule(&standard_terms(), None, Some(&plan)).unwrap();
        let base = build_schedule(&standard_terms(), None, None).unwrap();
        assert_eq!(result, base);
    }

    // -----------------------------------------------------------------------
    // Installment / termination options
    // -----------------------------------------------------------------------

    #[test]
    fn test_fixed_installment_below_interest_is_non_amortizing() {
        let options = ScheduleOptions {
            installment: Installment::Fixed(dec!(5000)),
            termination: Termination::CapAtTerm,
        };
        let result =
            build_schedule_with_options(&standard_terms(), None, None, &options).unwrap();
        assert_eq!(result.months(), 12);
        assert!(!result.fully_amortized);
        assert_eq!(result.residual_balance, dec!(1_000_000.00));
        assert!(result.payoff_date.is_none());
        assert!(result.entries.iter().all(|e| e.principal_paid.is_zero()));
        // Interest is charged in full even when it exceeds the installment
        assert!(result.entries.iter().all(|e| e.payment == dec!(10000.00)));
    }

    #[test]
    fn test_until_payoff_extends_past_term() {
        let options = ScheduleOptions {
            installment: Installment::Fixed(dec!(60_000)),
            termination: Termination::UntilPayoff { max_months: 60 },
        };
        let result =
            build_schedule_with_options(&standard_terms(), None, None, &options).unwrap();
        assert!(result.months() > 12);
        assert!(result.months() <= 60);
        assert!(result.fully_amortized);

        let capped = build_schedule_with_options(
            &standard_terms(),
            None,
            None,
            &ScheduleOptions {
                installment: Installment::Fixed(dec!(60_000)),
                termination: Termination::CapAtTerm,
            },
        )
        .unwrap();
        assert_eq!(capped.months(), 12);
        assert!(!capped.fully_amortized);
    }

    #[test]
    fn test_until_payoff_ceiling_below_term_rejected() {
        let options = ScheduleOptions {
            installment: Installment::Annuity,
            termination: Termination::UntilPayoff { max_months: 6 },
        };
        let err =
            build_schedule_with_options(&standard_terms(), None, None, &options).unwrap_err();
        assert!(matches!(err, EmiPlannerError::InvalidInput { .. }));
    }

    #[test]
    fn test_until_payoff_ceiling_above_limit_rejected() {
        for max_months in [MAX_SCHEDULE_MONTHS + 1, u32::MAX] {
            let options = ScheduleOptions {
                installment: Installment::Fixed(dec!(1000)),
                termination: Termination::UntilPayoff { max_months },
            };
            let err = build_schedule_with_options(&standard_terms(), None, None, &options)
                .unwrap_err();
            match err {
                EmiPlannerError::InvalidInput { field, .. } => {
                    assert_eq!(field, "options.termination.max_months")
                }
                other => panic!("Expected InvalidInput, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_until_payoff_at_ceiling_stays_bounded() {
        let options = ScheduleOptions {
            installment: Installment::Fixed(dec!(1000)),
            termination: Termination::UntilPayoff {
                max_months: MAX_SCHEDULE_MONTHS,
            },
        };
        let result =
            build_schedule_with_options(&standard_terms(), None, None, &options).unwrap();
        // 1,000 a month never covers 10,000 of monthly interest
        assert_eq!(result.months(), MAX_SCHEDULE_MONTHS);
        assert!(!result.fully_amortized);
    }

    #[test]
    fn test_term_above_limit_rejected() {
        let terms = LoanTerms {
            annual_rate_percent: dec!(0),
            term_months: u32::MAX,
            ..standard_terms()
        };
        assert!(matches!(
            build_schedule(&terms, None, None).unwrap_err(),
            EmiPlannerError::InvalidInput { .. }
        ));
    }

    #[test]
    fn test_out_of_range_totals_rejected() {
        let huge = LoanTerms {
            principal: dec!(70_000_000_000_000_000_000_000_000_000),
            annual_rate_percent: dec!(1200),
            ..standard_terms()
        };
        let options = ScheduleOptions {
            installment: Installment::Fixed(dec!(1)),
            termination: Termination::CapAtTerm,
        };
        let err = build_schedule_with_options(&huge, None, None, &options).unwrap_err();
        assert!(matches!(err, EmiPlannerError::InvalidInput { .. }));

        let drifting = SavingsOffsetPlan {
            enabled: true,
            initial_balance: dec!(0),
            monthly_drift: dec!(70_000_000_000_000_000_000_000_000_000),
        };
        let err = build_schedule(&standard_terms(), None, Some(&drifting)).unwrap_err();
        match err {
            EmiPlannerError::InvalidInput { field, .. } => {
                assert_eq!(field, "savings.monthly_drift")
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_non_positive_fixed_installment_rejected() {
        let options = ScheduleOptions {
            installment: Installment::Fixed(dec!(0)),
            termination: Termination::CapAtTerm,
        };
        assert!(build_schedule_with_options(&standard_terms(), None, None, &options).is_err());
    }

    // -----------------------------------------------------------------------
    // Envelope
    // -----------------------------------------------------------------------

    #[test]
    fn test_generate_schedule_warnings() {
        let input = ScheduleInput {
            terms: standard_terms(),
            prepayment: Some(PrepaymentPlan {
                one_time: Some(OneTimePrepayment {
                    amount: dec!(1000),
                    date: date(2030, 1, 1),
                }),
                recurring: Some(RecurringPrepayment {
                    amount: dec!(1000),
                    frequency: PrepaymentFrequency::Yearly,
                    start_month: 24,
                }),
            }),
            savings: Some(SavingsOffsetPlan {
                enabled: false,
                initial_balance: dec!(10),
                monthly_drift: dec!(0),
            }),
            options: ScheduleOptions::default(),
        };
        let out = generate_schedule(&input).unwrap();
        assert_eq!(out.warnings.len(), 3);
        assert!(out.warnings[0].contains("One-time prepayment"));
        assert!(out.warnings[1].contains("Recurring prepayment"));
        assert!(out.warnings[2].contains("disabled"));
        assert!(out.result.fully_amortized);
    }

    #[test]
    fn test_generate_schedule_flags_non_amortizing() {
        let input = ScheduleInput {
            terms: standard_terms(),
            prepayment: None,
            savings: None,
            options: ScheduleOptions {
                installment: Installment::Fixed(dec!(1000)),
                termination: Termination::CapAtTerm,
            },
        };
        let out = generate_schedule(&input).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("does not fully amortize"));
    }

    #[test]
    fn test_month_date() {
        assert_eq!(month_date(date(2024, 1, 15), 1).unwrap(), date(2024, 1, 15));
        assert_eq!(month_date(date(2024, 1, 15), 13).unwrap(), date(2025, 1, 15));
    }
}
