//! Savings deltas of each scenario against a reference scenario.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::composer::{ScenarioKind, ScenarioSet};
use crate::types::Money;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsInsight {
    pub scenario: ScenarioKind,
    /// Reference total interest less this scenario's. Negative if it costs more.
    pub interest_saved: Money,
    /// interest_saved as a percentage of the reference interest (2 dp).
    pub percent_saved: Decimal,
    /// Reference schedule length less this scenario's.
    pub months_saved: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsAnalysis {
    /// Scenario the others are compared against.
    pub base: ScenarioKind,
    /// One insight per non-reference scenario, canonical order.
    pub insights: Vec<SavingsInsight>,
    /// Scenario with the largest interest saving (the reference counts as 0).
    pub best_scenario: ScenarioKind,
    pub best_interest_saved: Money,
}

impl SavingsAnalysis {
    pub fn insight(&self, kind: ScenarioKind) -> Option<&SavingsInsight> {
        self.insights.iter().find(|i| i.scenario == kind)
    }
}

/// Compare every scenario in `set` against `base`.
pub fn analyze_scenarios(set: &ScenarioSet, base: ScenarioKind) -> SavingsAnalysis {
    let reference = set.get(base);

    let insights: Vec<SavingsInsight> = set
        .iter()
        .filter(|(kind, _)| *kind != base)
        .map(|(kind, result)| {
            let interest_saved = reference.total_interest - result.total_interest;
            let percent_saved = if reference.total_interest.is_zero() {
                Decimal::ZERO
            } else {
                (interest_saved / reference.total_interest * dec!(100)).round_dp(2)
            };
            SavingsInsight {
                scenario: kind,
                interest_saved,
                percent_saved,
                months_saved: i64::from(reference.months()) - i64::from(result.months()),
            }
        })
        .collect();

    // The reference saves nothing; strict comparison keeps it (then the
    // earliest scenario) on ties.
    let (best_scenario, best_interest_saved) =
        insights.iter().fold((base, Decimal::ZERO), |best, insight| {
            if insight.interest_saved > best.1 {
                (insight.scenario, insight.interest_saved)
            } else {
                best
            }
        });

    SavingsAnalysis {
        base,
        insights,
        best_scenario,
        best_interest_saved,
    }
}
