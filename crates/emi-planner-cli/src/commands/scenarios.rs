use clap::Args;
use serde_json::Value;

use emi_planner_core::scenarios::composer;
use emi_planner_core::scenarios::tenure::{self, TenureComparisonInput, DEFAULT_TENURE_YEARS};

use super::amortization::{schedule_input, LoanArgs};
use crate::input;

/// Arguments for the tenure sweep
#[derive(Args)]
pub struct TenureArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Tenures to compare, in years (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub tenures: Vec<u32>,
}

pub fn run_scenarios(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = schedule_input(&args)?;
    let result = composer::run_scenarios(&input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_tenures(args: TenureArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let tenure_input: TenureComparisonInput = if let Some(ref path) = args.loan.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let base = schedule_input(&args.loan)?;
        TenureComparisonInput {
            terms: base.terms,
            tenure_years: if args.tenures.is_empty() {
                DEFAULT_TENURE_YEARS.to_vec()
            } else {
                args.tenures
            },
            prepayment: base.prepayment,
            savings: base.savings,
            options: base.options,
        }
    };

    let result = tenure::run_tenure_comparison(&tenure_input)?;
    Ok(serde_json::to_value(result)?)
}
