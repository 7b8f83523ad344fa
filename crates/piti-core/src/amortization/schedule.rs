//! Fixed-rate amortization schedules: level payment, per-period splits,
//! and full schedule projection.
//!
//! Balances are carried through the standard amortization recurrence one
//! period at a time rather than a closed form, so per-period figures line up
//! with a printed amortization table. All math in `rust_decimal::Decimal`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::annuity;
use crate::dates::add_months;
use crate::error::PitiError;
use crate::types::{round_money, with_metadata, ComputationOutput, Money};
use crate::PitiResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Balances smaller than this are treated as paid off.
const BALANCE_EPSILON: Decimal = dec!(0.005);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Origination terms of a fixed-rate, fixed-term loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount financed.
    pub original_principal: Money,
    /// Nominal annual rate in percent (6.5 means 6.5%).
    pub annual_rate_percent: Decimal,
    /// Total number of scheduled monthly payments.
    pub term_months: u32,
    /// Date the loan funds.
    pub origination_date: NaiveDate,
    /// Date of payment #1. When absent the origination date anchors the
    /// schedule and callers get a fallback warning.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub first_payment_date: Option<NaiveDate>,
    /// Fixed monthly escrow collected for property taxes.
    #[serde(default)]
    pub monthly_escrow_taxes: Money,
    /// Fixed monthly escrow collected for insurance.
    #[serde(default)]
    pub monthly_escrow_insurance: Money,
}

/// Input for a single scheduled-payment split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledSplitInput {
    pub terms: LoanTerms,
    /// 1-based position in the schedule. Out-of-range values are clamped
    /// with a warning.
    pub payment_number: i64,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Principal/interest decomposition of one scheduled payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledSplit {
    /// 1-based payment number after clamping.
    pub payment_number: u32,
    /// Principal portion of the scheduled payment.
    pub principal: Money,
    /// Interest portion of the scheduled payment.
    pub interest: Money,
    /// The level payment for the loan.
    pub scheduled_payment: Money,
    /// Outstanding balance before this payment.
    pub balance_before: Money,
}

/// A single row of an amortization table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulePeriod {
    /// Payment number (1-indexed).
    pub payment_number: u32,
    /// Due date, anchored on the first payment date.
    pub due_date: NaiveDate,
    /// Total payment for this period.
    pub payment: Money,
    /// Principal portion.
    pub principal: Money,
    /// Interest portion.
    pub interest: Money,
    /// Remaining balance after this payment.
    pub balance_after: Money,
}

/// Full amortization table with totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    /// One row per scheduled payment.
    pub periods: Vec<SchedulePeriod>,
    /// The level payment.
    pub scheduled_payment: Money,
    /// Interest paid over the life of the loan.
    pub total_interest: Money,
    /// Principal repaid over the life of the loan.
    pub total_principal: Money,
    /// Balance remaining after the final payment.
    pub final_balance: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Principal/interest split of one scheduled payment, wrapped in the
/// standard output envelope.
pub fn compute_scheduled_split(
    input: &ScheduledSplitInput,
) -> PitiResult<ComputationOutput<ScheduledSplit>> {
    let start = Instant::now();
    let (split, warnings) = scheduled_split(&input.terms, input.payment_number)?;
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Rate Level-Payment Amortization",
        input,
        warnings,
        elapsed,
        split,
    ))
}

/// Project the full amortization table for a loan.
pub fn project_schedule(terms: &LoanTerms) -> PitiResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    validate_terms(terms)?;

    let (anchor, fallback) = schedule_anchor(terms);
    if let Some(w) = fallback {
        warnings.push(w);
    }

    let rate = annuity::monthly_rate(terms.annual_rate_percent);
    let payment = annuity::level_payment(terms.original_principal, rate, terms.term_months)?;

    let mut periods = Vec::with_capacity(terms.term_months as usize);
    let mut balance = terms.original_principal;
    let mut total_interest = Decimal::ZERO;
    let mut total_principal = Decimal::ZERO;

    for n in 1..=terms.term_months {
        let interest = balance * rate;
        let mut principal = payment - interest;

        // Final payment absorbs rounding: never overdraw the balance, and
        // sweep any residual on the last period.
        if principal > balance || n == terms.term_months {
            principal = balance;
        }

        balance -= principal;
        total_interest += interest;
        total_principal += principal;

        periods.push(SchedulePeriod {
            payment_number: n,
            due_date: add_months(anchor, n - 1),
            payment: round_money(principal + interest),
            principal: round_money(principal),
            interest: round_money(interest),
            balance_after: round_money(balance),
        });

        if balance < BALANCE_EPSILON {
            balance = Decimal::ZERO;
        }
    }

    let output = ScheduleOutput {
        periods,
        scheduled_payment: round_money(payment),
        total_interest: round_money(total_interest),
        total_principal: round_money(total_principal),
        final_balance: round_money(balance),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Rate Level-Payment Amortization",
        terms,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internals (shared with the payment-split module)
// ---------------------------------------------------------------------------

/// Reject structurally impossible loan terms.
pub(crate) fn validate_terms(terms: &LoanTerms) -> PitiResult<()> {
    if terms.original_principal <= Decimal::ZERO {
        return Err(PitiError::InvalidTerms {
            field: "original_principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if terms.term_months == 0 {
        return Err(PitiError::InvalidTerms {
            field: "term_months".into(),
            reason: "Term must be at least one month".into(),
        });
    }
    if terms.annual_rate_percent < Decimal::ZERO {
        return Err(PitiError::InvalidTerms {
            field: "annual_rate_percent".into(),
            reason: "Rate cannot be negative".into(),
        });
    }
    if terms.monthly_escrow_taxes < Decimal::ZERO || terms.monthly_escrow_insurance < Decimal::ZERO
    {
        return Err(PitiError::InvalidTerms {
            field: "monthly_escrow".into(),
            reason: "Escrow amounts cannot be negative".into(),
        });
    }
    Ok(())
}

/// Schedule anchor date: first payment date when known, otherwise the
/// origination date plus a caller-visible warning.
pub(crate) fn schedule_anchor(terms: &LoanTerms) -> (NaiveDate, Option<String>) {
    match terms.first_payment_date {
        Some(d) => (d, None),
        None => (
            terms.origination_date,
            Some("Using close/origination date as fallback".to_string()),
        ),
    }
}

/// Principal/interest for payment `payment_number`, clamping out-of-range
/// numbers into `[1, term_months]` with a warning.
///
/// The balance before the requested payment comes from iterating the
/// recurrence through the preceding periods, unrounded.
pub(crate) fn scheduled_split(
    terms: &LoanTerms,
    payment_number: i64,
) -> PitiResult<(ScheduledSplit, Vec<String>)> {
    validate_terms(terms)?;
    let mut warnings: Vec<String> = Vec::new();

    let clamped = if payment_number < 1 {
        warnings.push(format!(
            "Payment number {payment_number} is before the schedule start; clamped to 1"
        ));
        1
    } else if payment_number > terms.term_months as i64 {
        warnings.push(format!(
            "Payment number {payment_number} is past the {}-month term; clamped to {}",
            terms.term_months, terms.term_months
        ));
        terms.term_months
    } else {
        payment_number as u32
    };

    let rate = annuity::monthly_rate(terms.annual_rate_percent);
    let payment = annuity::level_payment(terms.original_principal, rate, terms.term_months)?;

    let mut balance = terms.original_principal;
    for _ in 1..clamped {
        let interest = balance * rate;
        let mut principal = payment - interest;
        if principal > balance {
            principal = balance;
        }
        balance -= principal;
    }

    let interest = balance * rate;
    let mut principal = payment - interest;
    if principal > balance || clamped == terms.term_months {
        principal = balance;
    }

    Ok((
        ScheduledSplit {
            payment_number: clamped,
            principal: round_money(principal),
            interest: round_money(interest),
            scheduled_payment: round_money(payment),
            balance_before: round_money(balance),
        },
        warnings,
    ))
}
