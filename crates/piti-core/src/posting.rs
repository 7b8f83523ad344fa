//! Translate a confirmed payment split into a balanced ledger-line set.
//!
//! The external posting procedure accepts a list of `{account_id, amount}`
//! lines that must sum to zero. The balancing cash credit is always the exact
//! sum of the debit lines, so every set built here satisfies that contract.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::split::RECONCILIATION_TOLERANCE;
use crate::error::PitiError;
use crate::types::{round_money, with_metadata, ComputationOutput, Currency, Money};
use crate::PitiResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Ledger accounts a mortgage payment posts against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostingAccounts {
    /// Checking/cash account credited for the full payment.
    pub cash_account: String,
    /// Loan liability account debited for the principal portion.
    pub loan_principal_account: String,
    /// Interest expense account.
    pub interest_expense_account: String,
    /// Escrow account for property taxes.
    pub escrow_taxes_account: String,
    /// Escrow account for insurance.
    pub escrow_insurance_account: String,
}

/// A payment split (possibly user-edited) ready to be turned into lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentLinesInput {
    pub payment_date: NaiveDate,
    pub principal: Money,
    pub interest: Money,
    #[serde(default)]
    pub escrow_taxes: Money,
    #[serde(default)]
    pub escrow_insurance: Money,
    pub accounts: PostingAccounts,
    #[serde(default)]
    pub currency: Currency,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub memo: Option<String>,
    /// Reconciliation delta carried over from the split preview, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reconciliation_delta: Option<Money>,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One ledger line as the posting procedure consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerLine {
    pub account_id: String,
    /// Positive for debits, negative for the balancing cash credit.
    pub amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

/// A balanced line set for one payment transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostingLines {
    pub payment_date: NaiveDate,
    pub currency: Currency,
    pub lines: Vec<LedgerLine>,
    /// Sum of the debit lines.
    pub total_debits: Money,
    /// The balancing credit on the cash account (negative).
    pub cash_credit: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the balanced ledger lines for a payment split.
pub fn build_payment_lines(
    input: &PaymentLinesInput,
) -> PitiResult<ComputationOutput<PostingLines>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_components(input)?;

    if let Some(delta) = input.reconciliation_delta {
        if delta.abs() > RECONCILIATION_TOLERANCE {
            warnings.push(format!(
                "Split carried a reconciliation delta of {}",
                round_money(delta)
            ));
        }
    }

    let components = [
        (&input.accounts.loan_principal_account, input.principal, "Principal"),
        (&input.accounts.interest_expense_account, input.interest, "Interest"),
        (&input.accounts.escrow_taxes_account, input.escrow_taxes, "Escrow taxes"),
        (
            &input.accounts.escrow_insurance_account,
            input.escrow_insurance,
            "Escrow insurance",
        ),
    ];

    let mut lines: Vec<LedgerLine> = Vec::with_capacity(5);
    let mut total_debits = Decimal::ZERO;
    for (account, amount, label) in components {
        let amount = round_money(amount);
        if amount.is_zero() {
            continue;
        }
        total_debits += amount;
        lines.push(LedgerLine {
            account_id: account.clone(),
            amount,
            memo: Some(label.to_string()),
        });
    }

    let cash_credit = -total_debits;
    lines.push(LedgerLine {
        account_id: input.accounts.cash_account.clone(),
        amount: cash_credit,
        memo: input.memo.clone(),
    });

    let output = PostingLines {
        payment_date: input.payment_date,
        currency: input.currency.clone(),
        lines,
        total_debits,
        cash_credit,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Double-Entry Line Construction",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Net sum of a line set. Zero for any set this module builds.
pub fn lines_balance(lines: &[LedgerLine]) -> Money {
    lines.iter().map(|l| l.amount).sum()
}

fn validate_components(input: &PaymentLinesInput) -> PitiResult<()> {
    let named = [
        ("principal", input.principal),
        ("interest", input.interest),
        ("escrow_taxes", input.escrow_taxes),
        ("escrow_insurance", input.escrow_insurance),
    ];
    for (field, amount) in named {
        if amount < Decimal::ZERO {
            return Err(PitiError::InvalidInput {
                field: field.into(),
                reason: "Component amounts cannot be negative".into(),
            });
        }
    }
    if named.iter().all(|(_, amount)| round_money(*amount).is_zero()) {
        return Err(PitiError::InvalidInput {
            field: "split".into(),
            reason: "At least one component must be non-zero".into(),
        });
    }
    Ok(())
}
