//! Equated Monthly Installment (EMI) for a level-payment annuity loan.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::EmiPlannerError;
use crate::types::{round_money, with_metadata, ComputationOutput, Money, Rate};
use crate::EmiPlannerResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Convert an annual percentage rate (7.7 = 7.7%) into a monthly decimal rate.
pub fn monthly_rate(annual_rate_percent: Decimal) -> Rate {
    annual_rate_percent / MONTHS_PER_YEAR / PERCENT
}

/// Unrounded EMI for `principal` over `term_months` at `annual_rate_percent`.
///
/// A zero rate amortises linearly (`principal / term_months`); otherwise the
/// standard annuity formula `P·r·(1+r)^n / ((1+r)^n − 1)` applies.
pub fn compute_emi(
    principal: Money,
    annual_rate_percent: Decimal,
    term_months: u32,
) -> EmiPlannerResult<Money> {
    if term_months == 0 {
        return Err(EmiPlannerError::InvalidInput {
            field: "term_months".into(),
            reason: "Term must be at least 1 month".into(),
        });
    }
    if principal < Decimal::ZERO {
        return Err(EmiPlannerError::InvalidInput {
            field: "principal".into(),
            reason: "Principal cannot be negative".into(),
        });
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(EmiPlannerError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }

    let r = monthly_rate(annual_rate_percent);
    let n = Decimal::from(term_months);

    if r.is_zero() {
        return Ok(principal / n);
    }

    let overflow = || EmiPlannerError::InvalidInput {
        field: "term_months".into(),
        reason: format!("Compounding {annual_rate_percent}% over {term_months} months overflows"),
    };

    // P·r / (1 − (1+r)^−n): same annuity, without the P·r·(1+r)^n intermediate
    let growth = (Decimal::ONE + r)
        .checked_powu(u64::from(term_months))
        .ok_or_else(overflow)?;
    let discount = Decimal::ONE.checked_div(growth).ok_or_else(overflow)?;
    let denominator = Decimal::ONE - discount;
    if denominator <= Decimal::ZERO {
        return Err(EmiPlannerError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: format!("Rate {annual_rate_percent}% is too small to compound"),
        });
    }

    principal
        .checked_mul(r)
        .and_then(|interest| interest.checked_div(denominator))
        .ok_or_else(overflow)
}

/// Input for a standalone EMI quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiInput {
    pub principal: Money,
    /// Annual rate as a percentage (e.g., 8.5 for 8.5%).
    pub annual_rate_percent: Decimal,
    pub term_months: u32,
}

/// EMI quote for a level annuity with no prepayments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiOutput {
    /// Monthly installment, rounded to 2 dp.
    pub emi: Money,
    pub monthly_rate: Rate,
    /// EMI × term.
    pub total_payment: Money,
    /// Total payment less principal.
    pub total_interest: Money,
}

/// Quote the EMI and the level-annuity totals for a loan.
pub fn calculate_emi(input: &EmiInput) -> EmiPlannerResult<ComputationOutput<EmiOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.principal.is_zero() {
        warnings.push("Principal is zero; every installment is zero".into());
    }

    let emi = compute_emi(input.principal, input.annual_rate_percent, input.term_months)?;
    let total_payment = emi
        .checked_mul(Decimal::from(input.term_months))
        .ok_or_else(|| EmiPlannerError::InvalidInput {
            field: "term_months".into(),
            reason: "Total payment exceeds the representable range".into(),
        })?;

    let output = EmiOutput {
        emi: round_money(emi),
        monthly_rate: monthly_rate(input.annual_rate_percent),
        total_payment: round_money(total_payment),
        total_interest: round_money(total_payment - input.principal),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level annuity EMI",
        input,
        warnings,
        elapsed,
        output,
    ))
}
