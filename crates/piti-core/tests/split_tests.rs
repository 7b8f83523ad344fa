use chrono::NaiveDate;
use piti_core::amortization::schedule::LoanTerms;
use piti_core::amortization::split::{
    compute_mortgage_split, MortgageSplitInput, PaymentQuery, RECONCILIATION_TOLERANCE,
};
use piti_core::PitiError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// PITI payment split tests
// ===========================================================================

fn sample_loan() -> LoanTerms {
    LoanTerms {
        original_principal: dec!(200_000),
        annual_rate_percent: dec!(6),
        term_months: 360,
        origination_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        first_payment_date: NaiveDate::from_ymd_opt(2024, 2, 1),
        monthly_escrow_taxes: Decimal::ZERO,
        monthly_escrow_insurance: Decimal::ZERO,
    }
}

fn split_input(terms: LoanTerms, date: (i32, u32, u32), amount: Decimal) -> MortgageSplitInput {
    MortgageSplitInput {
        terms,
        query: PaymentQuery {
            payment_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            total_payment_amount: amount,
        },
    }
}

#[test]
fn test_first_payment_with_inferred_escrow() {
    // 1500 paid against a scheduled payment of 1199.10 with no configured
    // escrow: the 300.90 difference is back-solved and split 50/50.
    let output =
        compute_mortgage_split(&split_input(sample_loan(), (2024, 2, 1), dec!(1500))).unwrap();
    let split = &output.result;

    assert_eq!(split.payment_number, 1);
    assert_eq!(split.interest, dec!(1000.00));
    assert_eq!(split.principal, dec!(199.10));
    assert_eq!(split.escrow_taxes, dec!(150.45));
    assert_eq!(split.escrow_insurance, dec!(150.45));
    assert!(split.escrow_inferred);
    assert_eq!(split.computed_total, dec!(1500.00));
    assert_eq!(split.reconciliation_delta, Decimal::ZERO);
    assert!(output
        .warnings
        .iter()
        .any(|w| w.contains("Escrow inferred from payment difference")));
}

#[test]
fn test_exact_level_payment_reconciles_silently() {
    let output =
        compute_mortgage_split(&split_input(sample_loan(), (2024, 2, 1), dec!(1199.10))).unwrap();
    let split = &output.result;

    assert!(!split.escrow_inferred);
    assert_eq!(split.escrow_taxes, Decimal::ZERO);
    assert_eq!(split.escrow_insurance, Decimal::ZERO);
    assert_eq!(split.reconciliation_delta, Decimal::ZERO);
    assert!(output.warnings.is_empty());
}

#[test]
fn test_configured_escrow_direct_mode() {
    let mut terms = sample_loan();
    terms.monthly_escrow_taxes = dec!(250);
    terms.monthly_escrow_insurance = dec!(80);
    // 1199.10 + 330 of fixed escrow
    let output =
        compute_mortgage_split(&split_input(terms, (2024, 2, 1), dec!(1529.10))).unwrap();
    let split = &output.result;

    assert!(!split.escrow_inferred);
    assert_eq!(split.escrow_taxes, dec!(250.00));
    assert_eq!(split.escrow_insurance, dec!(80.00));
    assert!(output.warnings.is_empty());
}

#[test]
fn test_payment_number_from_elapsed_months() {
    // Six whole months after the first payment date => payment #7
    let output =
        compute_mortgage_split(&split_input(sample_loan(), (2024, 8, 1), dec!(1199.10))).unwrap();
    assert_eq!(output.result.payment_number, 7);
}

#[test]
fn test_payment_before_anchor_clamps_with_warning() {
    let output =
        compute_mortgage_split(&split_input(sample_loan(), (2023, 11, 15), dec!(1199.10)))
            .unwrap();
    assert_eq!(output.result.payment_number, 1);
    assert!(output.warnings.iter().any(|w| w.contains("clamped to 1")));
}

#[test]
fn test_payment_past_term_clamps_with_warning() {
    let output =
        compute_mortgage_split(&split_input(sample_loan(), (2060, 1, 1), dec!(1199.10))).unwrap();
    assert_eq!(output.result.payment_number, 360);
    assert!(output.warnings.iter().any(|w| w.contains("clamped to 360")));
}

#[test]
fn test_missing_first_payment_date_falls_back() {
    let mut terms = sample_loan();
    terms.first_payment_date = None;
    let output =
        compute_mortgage_split(&split_input(terms, (2024, 1, 2), dec!(1199.10))).unwrap();

    assert_eq!(output.result.payment_number, 1);
    assert!(output
        .warnings
        .iter()
        .any(|w| w.contains("origination date as fallback")));
}

#[test]
fn test_underpayment_reports_delta_instead_of_failing() {
    // 500 doesn't even cover scheduled principal + interest. The split is
    // still returned, escrow clamps to zero, and the delta is reported.
    let output =
        compute_mortgage_split(&split_input(sample_loan(), (2024, 2, 1), dec!(500))).unwrap();
    let split = &output.result;

    assert_eq!(split.escrow_taxes, Decimal::ZERO);
    assert_eq!(split.escrow_insurance, Decimal::ZERO);
    assert_eq!(split.computed_total, dec!(1199.10));
    assert_eq!(split.reconciliation_delta, dec!(699.10));
    assert!(output
        .warnings
        .iter()
        .any(|w| w.contains("Computed split differs from total by 699.10")));
}

#[test]
fn test_split_invariant_balances_or_warns() {
    // Any total either reconciles within tolerance or carries a warning.
    for amount in [dec!(1), dec!(800), dec!(1199.10), dec!(1500), dec!(9000)] {
        let output =
            compute_mortgage_split(&split_input(sample_loan(), (2024, 2, 1), amount)).unwrap();
        let split = &output.result;
        let total = split.principal + split.interest + split.escrow_taxes + split.escrow_insurance;
        let balanced = (total - amount).abs() <= RECONCILIATION_TOLERANCE;
        assert!(
            balanced || !output.warnings.is_empty(),
            "amount {amount}: unbalanced split without warning"
        );
    }
}

#[test]
fn test_structurally_invalid_terms_fail() {
    let mut terms = sample_loan();
    terms.term_months = 0;
    assert!(matches!(
        compute_mortgage_split(&split_input(terms, (2024, 2, 1), dec!(1500))),
        Err(PitiError::InvalidTerms { .. })
    ));

    let mut terms = sample_loan();
    terms.original_principal = dec!(-100);
    assert!(matches!(
        compute_mortgage_split(&split_input(terms, (2024, 2, 1), dec!(1500))),
        Err(PitiError::InvalidTerms { .. })
    ));
}

#[test]
fn test_non_positive_payment_amount_fails() {
    assert!(matches!(
        compute_mortgage_split(&split_input(sample_loan(), (2024, 2, 1), dec!(-5))),
        Err(PitiError::InvalidInput { .. })
    ));
}
