//! Loan terms and the prepayment / savings-offset policies applied to them.
//!
//! Everything here is a fully resolved value: callers settle any
//! "use X if set, otherwise the what-if value" choices before building a plan
//! (see [`resolve_amount`]), so the engine never guesses.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::emi;
use crate::error::EmiPlannerError;
use crate::types::{Money, Rate};
use crate::EmiPlannerResult;

// ---------------------------------------------------------------------------
// Loan terms
// ---------------------------------------------------------------------------

/// Longest schedule the engine will iterate (500 years), for the term and
/// for any until-payoff ceiling.
pub const MAX_SCHEDULE_MONTHS: u32 = 6_000;

/// Immutable loan terms shared by every scenario of one computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// Annual rate as a percentage (e.g., 7.7 for 7.7%).
    pub annual_rate_percent: Decimal,
    pub term_months: u32,
    /// Date of the first installment.
    pub start_date: NaiveDate,
}

impl LoanTerms {
    pub fn monthly_rate(&self) -> Rate {
        emi::monthly_rate(self.annual_rate_percent)
    }

    /// Same loan, different tenure.
    pub fn with_term_months(&self, term_months: u32) -> Self {
        LoanTerms {
            term_months,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> EmiPlannerResult<()> {
        if self.principal <= Decimal::ZERO {
            return Err(EmiPlannerError::InvalidInput {
                field: "principal".into(),
                reason: "Principal must be positive".into(),
            });
        }
        if self.annual_rate_percent < Decimal::ZERO {
            return Err(EmiPlannerError::InvalidInput {
                field: "annual_rate_percent".into(),
                reason: "Interest rate cannot be negative".into(),
            });
        }
        if self.term_months == 0 {
            return Err(EmiPlannerError::InvalidInput {
                field: "term_months".into(),
                reason: "Term must be at least 1 month".into(),
            });
        }
        if self.term_months > MAX_SCHEDULE_MONTHS {
            return Err(EmiPlannerError::InvalidInput {
                field: "term_months".into(),
                reason: format!("Term cannot exceed {MAX_SCHEDULE_MONTHS} months"),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Prepayment
// ---------------------------------------------------------------------------

/// A single lump-sum prepayment made in the calendar month of `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneTimePrepayment {
    pub amount: Money,
    pub date: NaiveDate,
}

impl OneTimePrepayment {
    /// True when `date` falls in the same calendar month as the prepayment.
    pub fn falls_in(&self, date: NaiveDate) -> bool {
        self.date.year() == date.year() && self.date.month() == date.month()
    }
}

/// How often a recurring prepayment repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrepaymentFrequency {
    Monthly,
    Quarterly,
    Yearly,
}

impl PrepaymentFrequency {
    pub fn months(self) -> u32 {
        match self {
            PrepaymentFrequency::Monthly => 1,
            PrepaymentFrequency::Quarterly => 3,
            PrepaymentFrequency::Yearly => 12,
        }
    }

    pub fn from_months(months: u32) -> EmiPlannerResult<Self> {
        match months {
            1 => Ok(PrepaymentFrequency::Monthly),
            3 => Ok(PrepaymentFrequency::Quarterly),
            12 => Ok(PrepaymentFrequency::Yearly),
            other => Err(EmiPlannerError::InvalidInput {
                field: "frequency".into(),
                reason: format!("Frequency must be 1, 3 or 12 months (got {other})"),
            }),
        }
    }
}

/// An extra principal payment repeated every `frequency` from `start_month`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringPrepayment {
    pub amount: Money,
    pub frequency: PrepaymentFrequency,
    /// First eligible month (1-based schedule index).
    pub start_month: u32,
}

impl RecurringPrepayment {
    pub fn applies_in(&self, month: u32) -> bool {
        month >= self.start_month && (month - self.start_month) % self.frequency.months() == 0
    }
}

/// Optional one-time and recurring prepayments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrepaymentPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_time: Option<OneTimePrepayment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<RecurringPrepayment>,
}

impl PrepaymentPlan {
    /// Build a plan from loosely specified parts, dropping any component
    /// whose amount is absent or zero.
    pub fn from_parts(
        one_time_amount: Option<Money>,
        one_time_date: Option<NaiveDate>,
        recurring_amount: Option<Money>,
        frequency: PrepaymentFrequency,
        start_month: u32,
    ) -> Self {
        let one_time = match (one_time_amount, one_time_date) {
            (Some(amount), Some(date)) if !amount.is_zero() => {
                Some(OneTimePrepayment { amount, date })
            }
            _ => None,
        };
        let recurring = match recurring_amount {
            Some(amount) if !amount.is_zero() => Some(RecurringPrepayment {
                amount,
                frequency,
                start_month,
            }),
            _ => None,
        };
        PrepaymentPlan {
            one_time,
            recurring,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.one_time.is_none() && self.recurring.is_none()
    }

    pub fn validate(&self) -> EmiPlannerResult<()> {
        if let Some(ot) = &self.one_time {
            if ot.amount < Decimal::ZERO {
                return Err(EmiPlannerError::InvalidInput {
                    field: "prepayment.one_time.amount".into(),
                    reason: "Prepayment amount cannot be negative".into(),
                });
            }
        }
        if let Some(rec) = &self.recurring {
            if rec.amount < Decimal::ZERO {
                return Err(EmiPlannerError::InvalidInput {
                    field: "prepayment.recurring.amount".into(),
                    reason: "Prepayment amount cannot be negative".into(),
                });
            }
            if rec.start_month == 0 {
                return Err(EmiPlannerError::InvalidInput {
                    field: "prepayment.recurring.start_month".into(),
                    reason: "Start month is 1-based and must be at least 1".into(),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Savings offset
// ---------------------------------------------------------------------------

/// A linked savings balance that shields part of the outstanding principal
/// from interest without repaying it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsOffsetPlan {
    pub enabled: bool,
    pub initial_balance: Money,
    /// Signed change applied to the balance after each month; floored at 0.
    #[serde(default)]
    pub monthly_drift: Money,
}

impl SavingsOffsetPlan {
    /// Copy of this plan with the offset switched on.
    pub fn activated(&self) -> Self {
        SavingsOffsetPlan {
            enabled: true,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> EmiPlannerResult<()> {
        if self.initial_balance < Decimal::ZERO {
            return Err(EmiPlannerError::InvalidInput {
                field: "savings.initial_balance".into(),
                reason: "Savings balance cannot be negative".into(),
            });
        }
        Ok(())
    }
}

/// Pick `primary` when it is set and non-zero, otherwise `fallback`.
pub fn resolve_amount(primary: Option<Money>, fallback: Option<Money>) -> Option<Money> {
    primary.filter(|v| !v.is_zero()).or(fallback)
}
