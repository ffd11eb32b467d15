//! Named scenarios over one set of loan terms.
//!
//! Base, Prepay, SavingsLinked and PrepayPlusSavings are four independent
//! schedule runs that share only the (immutable) loan terms.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use super::insights::{analyze_scenarios, SavingsAnalysis};
use crate::amortization::plans::{LoanTerms, PrepaymentPlan, SavingsOffsetPlan};
use crate::amortization::schedule::{
    build_schedule_with_options, ScheduleInput, ScheduleOptions, ScheduleResult,
};
use crate::types::{with_metadata, ComputationOutput};
use crate::EmiPlannerResult;

/// A prepayment / offset policy combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScenarioKind {
    Base,
    Prepay,
    SavingsLinked,
    PrepayPlusSavings,
}

impl ScenarioKind {
    /// Canonical order used for iteration, output and tie-breaking.
    pub const ALL: [ScenarioKind; 4] = [
        ScenarioKind::Base,
        ScenarioKind::Prepay,
        ScenarioKind::SavingsLinked,
        ScenarioKind::PrepayPlusSavings,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScenarioKind::Base => "Base",
            ScenarioKind::Prepay => "Prepay",
            ScenarioKind::SavingsLinked => "SavingsLinked",
            ScenarioKind::PrepayPlusSavings => "PrepayPlusSavings",
        }
    }

    pub fn uses_prepayment(self) -> bool {
        matches!(self, ScenarioKind::Prepay | ScenarioKind::PrepayPlusSavings)
    }

    pub fn uses_savings(self) -> bool {
        matches!(
            self,
            ScenarioKind::SavingsLinked | ScenarioKind::PrepayPlusSavings
        )
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One schedule per scenario, all computed from the same loan terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScenarioSet {
    pub base: ScheduleResult,
    pub prepay: ScheduleResult,
    pub savings_linked: ScheduleResult,
    pub prepay_plus_savings: ScheduleResult,
}

impl ScenarioSet {
    pub fn get(&self, kind: ScenarioKind) -> &ScheduleResult {
        match kind {
            ScenarioKind::Base => &self.base,
            ScenarioKind::Prepay => &self.prepay,
            ScenarioKind::SavingsLinked => &self.savings_linked,
            ScenarioKind::PrepayPlusSavings => &self.prepay_plus_savings,
        }
    }

    /// Scenarios in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (ScenarioKind, &ScheduleResult)> + '_ {
        ScenarioKind::ALL.into_iter().map(move |k| (k, self.get(k)))
    }
}

/// A scenario set together with its savings comparison against Base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub scenarios: ScenarioSet,
    pub analysis: SavingsAnalysis,
}

/// Build all four scenarios with the default schedule options.
pub fn build_scenario_set(
    terms: &LoanTerms,
    prepayment: Option<&PrepaymentPlan>,
    savings: Option<&SavingsOffsetPlan>,
) -> EmiPlannerResult<ScenarioSet> {
    build_scenario_set_with_options(terms, prepayment, savings, &ScheduleOptions::default())
}

/// Build all four scenarios. A supplied savings plan is switched on for the
/// linked scenarios whatever its `enabled` flag says.
pub fn build_scenario_set_with_options(
    terms: &LoanTerms,
    prepayment: Option<&PrepaymentPlan>,
    savings: Option<&SavingsOffsetPlan>,
    options: &ScheduleOptions,
) -> EmiPlannerResult<ScenarioSet> {
    let linked = savings.map(SavingsOffsetPlan::activated);

    let run = |kind: ScenarioKind| {
        let prepay = prepayment.filter(|_| kind.uses_prepayment());
        let offset = linked.as_ref().filter(|_| kind.uses_savings());
        build_schedule_with_options(terms, prepay, offset, options)
    };

    Ok(ScenarioSet {
        base: run(ScenarioKind::Base)?,
        prepay: run(ScenarioKind::Prepay)?,
        savings_linked: run(ScenarioKind::SavingsLinked)?,
        prepay_plus_savings: run(ScenarioKind::PrepayPlusSavings)?,
    })
}

/// Compose the four scenarios for one loan and compare them against Base.
pub fn run_scenarios(input: &ScheduleInput) -> EmiPlannerResult<ComputationOutput<ScenarioReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let scenarios = build_scenario_set_with_options(
        &input.terms,
        input.prepayment.as_ref(),
        input.savings.as_ref(),
        &input.options,
    )?;

    if input.prepayment.as_ref().map_or(true, PrepaymentPlan::is_empty) {
        warnings.push("No prepayment supplied; Prepay scenarios match Base".into());
    }
    if input.savings.is_none() {
        warnings.push("No savings plan supplied; SavingsLinked scenarios match Base".into());
    }
    for (kind, result) in scenarios.iter() {
        if !result.fully_amortized {
            warnings.push(format!(
                "{kind} does not fully amortize; residual balance {}",
                result.residual_balance
            ));
        }
    }

    let analysis = analyze_scenarios(&scenarios, ScenarioKind::Base);
    let output = ScenarioReport {
        scenarios,
        analysis,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Scenario comparison: base, prepayment, savings offset, combined",
        input,
        warnings,
        elapsed,
        output,
    ))
}
