use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use piti_core::amortization::schedule::{self, LoanTerms, ScheduledSplitInput};
use piti_core::amortization::split::{self, MortgageSplitInput, PaymentQuery};

use crate::input;

/// Loan origination terms, shared by every amortization subcommand.
#[derive(Args)]
pub struct TermsArgs {
    /// Amount financed (e.g. 200000)
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Nominal annual rate in percent (e.g. 6.5 for 6.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Total number of monthly payments (e.g. 360)
    #[arg(long)]
    pub term_months: Option<u32>,

    /// Date the loan funds (YYYY-MM-DD)
    #[arg(long)]
    pub origination: Option<NaiveDate>,

    /// Date of payment #1 (YYYY-MM-DD); falls back to the origination date
    #[arg(long)]
    pub first_payment: Option<NaiveDate>,

    /// Fixed monthly escrow for property taxes
    #[arg(long, default_value = "0")]
    pub escrow_taxes: Decimal,

    /// Fixed monthly escrow for insurance
    #[arg(long, default_value = "0")]
    pub escrow_insurance: Decimal,
}

impl TermsArgs {
    fn into_terms(self) -> Result<LoanTerms, Box<dyn std::error::Error>> {
        Ok(LoanTerms {
            original_principal: self
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: self.rate.ok_or("--rate is required (or provide --input)")?,
            term_months: self
                .term_months
                .ok_or("--term-months is required (or provide --input)")?,
            origination_date: self
                .origination
                .ok_or("--origination is required (or provide --input)")?,
            first_payment_date: self.first_payment,
            monthly_escrow_taxes: self.escrow_taxes,
            monthly_escrow_insurance: self.escrow_insurance,
        })
    }
}

/// Arguments for schedule projection
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub terms: TermsArgs,

    /// Path to JSON input file with loan terms (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a PITI payment split
#[derive(Args)]
pub struct SplitArgs {
    #[command(flatten)]
    pub terms: TermsArgs,

    /// Calendar date of the payment being recorded (YYYY-MM-DD)
    #[arg(long)]
    pub payment_date: Option<NaiveDate>,

    /// Actual cash amount paid
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Path to JSON input file with terms and query (overrides flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a single scheduled-payment split
#[derive(Args)]
pub struct ScheduledPaymentArgs {
    #[command(flatten)]
    pub terms: TermsArgs,

    /// 1-based payment number; out-of-range values are clamped with a warning
    #[arg(long)]
    pub payment_number: Option<i64>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: LoanTerms = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        args.terms.into_terms()?
    };
    let result = schedule::project_schedule(&terms)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_split(args: SplitArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let split_input: MortgageSplitInput = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        MortgageSplitInput {
            terms: args.terms.into_terms()?,
            query: PaymentQuery {
                payment_date: args
                    .payment_date
                    .ok_or("--payment-date is required (or provide --input)")?,
                total_payment_amount: args
                    .amount
                    .ok_or("--amount is required (or provide --input)")?,
            },
        }
    };
    let result = split::compute_mortgage_split(&split_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_scheduled_payment(
    args: ScheduledPaymentArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let split_input: ScheduledSplitInput = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        ScheduledSplitInput {
            terms: args.terms.into_terms()?,
            payment_number: args
                .payment_number
                .ok_or("--payment-number is required (or provide --input)")?,
        }
    };
    let result = schedule::compute_scheduled_split(&split_input)?;
    Ok(serde_json::to_value(result)?)
}
