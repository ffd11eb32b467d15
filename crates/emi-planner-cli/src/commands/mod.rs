pub mod amortization;
pub mod emi;
pub mod scenarios;
