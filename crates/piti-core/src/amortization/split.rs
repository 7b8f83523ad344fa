//! PITI payment splitting: decompose an actual mortgage payment into
//! principal, interest, and escrow against the loan's amortization schedule.
//!
//! Only structurally invalid terms fail; every other irregularity (fallback
//! anchor date, out-of-range payment date, escrow back-solved from the cash
//! amount, reconciliation drift) degrades into the warnings vector alongside
//! a best-effort split.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::schedule::{schedule_anchor, scheduled_split, LoanTerms};
use crate::dates::elapsed_whole_months;
use crate::error::PitiError;
use crate::types::{round_money, with_metadata, ComputationOutput, Money};
use crate::PitiResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// A split reconciles when it matches the cash amount within two cents.
pub const RECONCILIATION_TOLERANCE: Decimal = dec!(0.02);

/// Taxes share of inferred escrow when no fixed amounts are configured.
const EVEN_SPLIT: Decimal = dec!(0.5);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// One payment being recorded against a loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentQuery {
    /// Calendar date of the payment.
    pub payment_date: NaiveDate,
    /// Actual cash amount paid.
    pub total_payment_amount: Money,
}

/// Top-level payment-split input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageSplitInput {
    pub terms: LoanTerms,
    pub query: PaymentQuery,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// A payment decomposed into its PITI components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSplit {
    /// 1-based position in the amortization schedule, clamped to the term.
    pub payment_number: u32,
    /// Principal portion.
    pub principal: Money,
    /// Interest portion.
    pub interest: Money,
    /// Escrow collected for property taxes.
    pub escrow_taxes: Money,
    /// Escrow collected for insurance.
    pub escrow_insurance: Money,
    /// The scheduled level payment, for reference.
    pub scheduled_payment: Money,
    /// Sum of the four components as returned.
    pub computed_total: Money,
    /// `computed_total - total_payment_amount`.
    pub reconciliation_delta: Money,
    /// True when escrow was back-solved from the payment difference rather
    /// than taken from the configured monthly amounts.
    pub escrow_inferred: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Split an actual payment into principal, interest, and escrow.
pub fn compute_mortgage_split(
    input: &MortgageSplitInput,
) -> PitiResult<ComputationOutput<PaymentSplit>> {
    let start = Instant::now();
    let (split, warnings) = mortgage_split(&input.terms, &input.query)?;
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "PITI Payment Split (Level-Payment Amortization)",
        input,
        warnings,
        elapsed,
        split,
    ))
}

// ---------------------------------------------------------------------------
// Split computation
// ---------------------------------------------------------------------------

fn mortgage_split(
    terms: &LoanTerms,
    query: &PaymentQuery,
) -> PitiResult<(PaymentSplit, Vec<String>)> {
    if query.total_payment_amount <= Decimal::ZERO {
        return Err(PitiError::InvalidInput {
            field: "total_payment_amount".into(),
            reason: "Payment amount must be positive".into(),
        });
    }

    let mut warnings: Vec<String> = Vec::new();

    let (anchor, fallback) = schedule_anchor(terms);
    if let Some(w) = fallback {
        warnings.push(w);
    }

    let payment_number = elapsed_whole_months(anchor, query.payment_date) + 1;
    let (scheduled, clamp_warnings) = scheduled_split(terms, payment_number)?;
    warnings.extend(clamp_warnings);

    let total = query.total_payment_amount;
    let (escrow_taxes, escrow_insurance, escrow_inferred) = resolve_escrow(
        terms,
        scheduled.principal,
        scheduled.interest,
        total,
        &mut warnings,
    );

    let computed_total =
        scheduled.principal + scheduled.interest + escrow_taxes + escrow_insurance;
    let delta = computed_total - total;
    if delta.abs() > RECONCILIATION_TOLERANCE {
        warnings.push(format!(
            "Computed split differs from total by {}",
            round_money(delta.abs())
        ));
    }

    Ok((
        PaymentSplit {
            payment_number: scheduled.payment_number,
            principal: scheduled.principal,
            interest: scheduled.interest,
            escrow_taxes,
            escrow_insurance,
            scheduled_payment: scheduled.scheduled_payment,
            computed_total: round_money(computed_total),
            reconciliation_delta: round_money(delta),
            escrow_inferred,
        },
        warnings,
    ))
}

/// Pick the escrow amounts: the configured fixed amounts when they reconcile
/// against the cash total, otherwise back-solve from the payment difference.
fn resolve_escrow(
    terms: &LoanTerms,
    principal: Money,
    interest: Money,
    total: Money,
    warnings: &mut Vec<String>,
) -> (Money, Money, bool) {
    let fixed_taxes = terms.monthly_escrow_taxes;
    let fixed_insurance = terms.monthly_escrow_insurance;

    let direct_total = principal + interest + fixed_taxes + fixed_insurance;
    if (direct_total - total).abs() <= RECONCILIATION_TOLERANCE {
        return (round_money(fixed_taxes), round_money(fixed_insurance), false);
    }

    let mut combined = total - principal - interest;
    if combined < Decimal::ZERO {
        combined = Decimal::ZERO;
    }
    combined = round_money(combined);

    let fixed_combined = fixed_taxes + fixed_insurance;
    let taxes_share = if fixed_combined.is_zero() {
        EVEN_SPLIT
    } else {
        fixed_taxes / fixed_combined
    };

    let escrow_taxes = round_money(combined * taxes_share);
    let escrow_insurance = combined - escrow_taxes;

    warnings.push("Escrow inferred from payment difference".to_string());
    (escrow_taxes, escrow_insurance, true)
}
