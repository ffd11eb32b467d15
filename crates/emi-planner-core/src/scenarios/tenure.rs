//! Scenario sets re-run across alternative tenures.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::composer::{build_scenario_set_with_options, ScenarioKind, ScenarioSet};
use super::insights::analyze_scenarios;
use crate::amortization::plans::{LoanTerms, PrepaymentPlan, SavingsOffsetPlan};
use crate::amortization::schedule::ScheduleOptions;
use crate::error::EmiPlannerError;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::EmiPlannerResult;

/// Tenures compared when the caller does not name any.
pub const DEFAULT_TENURE_YEARS: [u32; 5] = [18, 20, 22, 25, 30];

const MONTHS_PER_YEAR: u32 = 12;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenureComparisonInput {
    /// Loan terms; `term_months` is replaced by each tenure in turn.
    pub terms: LoanTerms,
    #[serde(default = "default_tenure_years")]
    pub tenure_years: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepayment: Option<PrepaymentPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings: Option<SavingsOffsetPlan>,
    #[serde(default)]
    pub options: ScheduleOptions,
}

fn default_tenure_years() -> Vec<u32> {
    DEFAULT_TENURE_YEARS.to_vec()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenureComparisonRow {
    pub tenure_years: u32,
    pub term_months: u32,
    pub scenarios: ScenarioSet,
}

/// Headline figures for one tenure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenureSummary {
    pub tenure_years: u32,
    pub emi: Money,
    pub base_total_interest: Money,
    pub best_scenario: ScenarioKind,
    pub best_total_interest: Money,
    /// Months the best scenario takes to repay.
    pub best_months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenureComparisonOutput {
    pub rows: Vec<TenureComparisonRow>,
    pub summary: Vec<TenureSummary>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// One scenario set per tenure, in the order the tenures were given.
pub fn compare_tenures(
    base_terms: &LoanTerms,
    tenure_years: &[u32],
    prepayment: Option<&PrepaymentPlan>,
    savings: Option<&SavingsOffsetPlan>,
) -> EmiPlannerResult<Vec<TenureComparisonRow>> {
    compare_tenures_with_options(
        base_terms,
        tenure_years,
        prepayment,
        savings,
        &ScheduleOptions::default(),
    )
}

pub fn compare_tenures_with_options(
    base_terms: &LoanTerms,
    tenure_years: &[u32],
    prepayment: Option<&PrepaymentPlan>,
    savings: Option<&SavingsOffsetPlan>,
    options: &ScheduleOptions,
) -> EmiPlannerResult<Vec<TenureComparisonRow>> {
    tenure_years
        .iter()
        .map(|&years| {
            let term_months = tenure_months(years)?;
            let terms = base_terms.with_term_months(term_months);
            Ok(TenureComparisonRow {
                tenure_years: years,
                term_months,
                scenarios: build_scenario_set_with_options(&terms, prepayment, savings, options)?,
            })
        })
        .collect()
}

/// Sweep tenures and summarise each row's best scenario.
pub fn run_tenure_comparison(
    input: &TenureComparisonInput,
) -> EmiPlannerResult<ComputationOutput<TenureComparisonOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.tenure_years.is_empty() {
        warnings.push("No tenures requested; comparison is empty".into());
    }

    let rows = compare_tenures_with_options(
        &input.terms,
        &input.tenure_years,
        input.prepayment.as_ref(),
        input.savings.as_ref(),
        &input.options,
    )?;

    let summary: Vec<TenureSummary> = rows.iter().map(summarise_row).collect();

    for row in &rows {
        if row.scenarios.iter().any(|(_, r)| !r.fully_amortized) {
            warnings.push(format!(
                "{}-year tenure has scenarios that do not fully amortize",
                row.tenure_years
            ));
        }
    }

    let output = TenureComparisonOutput { rows, summary };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Tenure sensitivity across prepayment and savings-offset scenarios",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn tenure_months(years: u32) -> EmiPlannerResult<u32> {
    if years == 0 {
        return Err(EmiPlannerError::InvalidInput {
            field: "tenure_years".into(),
            reason: "Tenure must be at least 1 year".into(),
        });
    }
    years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| EmiPlannerError::InvalidInput {
            field: "tenure_years".into(),
            reason: format!("Tenure of {years} years is out of range"),
        })
}

fn summarise_row(row: &TenureComparisonRow) -> TenureSummary {
    let analysis = analyze_scenarios(&row.scenarios, ScenarioKind::Base);
    let best = row.scenarios.get(analysis.best_scenario);
    TenureSummary {
        tenure_years: row.tenure_years,
        emi: row.scenarios.base.emi,
        base_total_interest: row.scenarios.base.total_interest,
        best_scenario: analysis.best_scenario,
        best_total_interest: best.total_interest,
        best_months: best.months(),
    }
}
