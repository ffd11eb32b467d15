use chrono::{Local, NaiveDate};
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use emi_planner_core::amortization::export::export_records;
use emi_planner_core::amortization::plans::{
    resolve_amount, LoanTerms, PrepaymentFrequency, PrepaymentPlan, SavingsOffsetPlan,
};
use emi_planner_core::amortization::schedule::{
    self, Installment, ScheduleInput, ScheduleOptions, Termination,
};

use crate::input;
use crate::output::csv_out;

/// Loan, prepayment and savings flags shared by the schedule commands
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 7.7)
    #[arg(long, alias = "rate")]
    pub annual_rate_percent: Option<Decimal>,

    /// Loan term in months
    #[arg(long, alias = "months")]
    pub term_months: Option<u32>,

    /// Date of the first installment (YYYY-MM-DD, default today)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// One-time prepayment amount
    #[arg(long)]
    pub one_time_amount: Option<Decimal>,

    /// Month of the one-time prepayment (YYYY-MM-DD)
    #[arg(long)]
    pub one_time_date: Option<NaiveDate>,

    /// Recurring prepayment amount
    #[arg(long)]
    pub recurring_amount: Option<Decimal>,

    /// Recurring amount used when --recurring-amount is absent or zero
    #[arg(long)]
    pub what_if_recurring: Option<Decimal>,

    /// Recurring prepayment frequency in months: 1, 3 or 12
    #[arg(long, default_value_t = 1)]
    pub frequency: u32,

    /// First month (1-based) eligible for the recurring prepayment
    #[arg(long, default_value_t = 1)]
    pub recurring_start_month: u32,

    /// Linked savings balance offsetting interest
    #[arg(long)]
    pub savings_balance: Option<Decimal>,

    /// Monthly change in the linked savings balance (may be negative)
    #[arg(long, default_value = "0")]
    pub savings_drift: Decimal,

    /// Apply the savings offset to a single schedule
    #[arg(long)]
    pub link_savings: bool,

    /// Pay this fixed amount monthly instead of the annuity EMI
    #[arg(long)]
    pub fixed_installment: Option<Decimal>,

    /// Keep paying past the term until repaid, at most this many months
    #[arg(long)]
    pub until_payoff: Option<u32>,
}

/// Resolve flags (or a JSON document) into a fully specified schedule input.
pub fn schedule_input(args: &LoanArgs) -> Result<ScheduleInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }

    let terms = LoanTerms {
        principal: args
            .principal
            .ok_or("--principal is required (or provide --input)")?,
        annual_rate_percent: args
            .annual_rate_percent
            .ok_or("--annual-rate-percent is required (or provide --input)")?,
        term_months: args
            .term_months
            .ok_or("--term-months is required (or provide --input)")?,
        start_date: args
            .start_date
            .unwrap_or_else(|| Local::now().date_naive()),
    };

    let prepayment = PrepaymentPlan::from_parts(
        args.one_time_amount,
        args.one_time_date,
        resolve_amount(args.recurring_amount, args.what_if_recurring),
        PrepaymentFrequency::from_months(args.frequency)?,
        args.recurring_start_month,
    );

    let savings = args.savings_balance.map(|balance| SavingsOffsetPlan {
        enabled: args.link_savings,
        initial_balance: balance,
        monthly_drift: args.savings_drift,
    });

    let options = ScheduleOptions {
        installment: args
            .fixed_installment
            .map_or(Installment::Annuity, Installment::Fixed),
        termination: args
            .until_payoff
            .map_or(Termination::CapAtTerm, |max_months| {
                Termination::UntilPayoff { max_months }
            }),
    };

    Ok(ScheduleInput {
        terms,
        prepayment: (!prepayment.is_empty()).then_some(prepayment),
        savings,
        options,
    })
}

pub fn run_schedule(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = schedule_input(&args)?;
    let result = schedule::generate_schedule(&input)?;
    Ok(serde_json::to_value(result)?)
}

/// Write the schedule as export records, bypassing the generic formatters.
pub fn run_schedule_export(args: LoanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let input = schedule_input(&args)?;
    let result = schedule::generate_schedule(&input)?;
    for warning in &result.warnings {
        tracing::warn!("{warning}");
    }
    csv_out::print_export(&export_records(&result.result))
}
