use chrono::NaiveDate;
use piti_core::amortization::schedule::{
    compute_scheduled_split, project_schedule, LoanTerms, ScheduledSplitInput,
};
use piti_core::PitiError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Schedule projection tests
// ===========================================================================

fn sample_loan() -> LoanTerms {
    // The reference loan: 200k at 6% over 30 years, level payment ≈ 1199.10
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

#[test]
fn test_schedule_reproduces_level_payment_every_period_but_last() {
    let output = project_schedule(&sample_loan()).unwrap();
    let schedule = &output.result;

    let level = schedule.scheduled_payment;
    assert_eq!(level, dec!(1199.10));

    for row in &schedule.periods[..359] {
        assert_eq!(row.payment, level, "period {}", row.payment_number);
    }
    // The last payment absorbs accumulated rounding
    let last = schedule.periods.last().unwrap();
    assert_eq!(last.payment_number, 360);
    assert!((last.payment - level).abs() < dec!(1.0));
}

#[test]
fn test_schedule_totals_and_final_balance() {
    let output = project_schedule(&sample_loan()).unwrap();
    let schedule = &output.result;

    assert_eq!(schedule.final_balance, Decimal::ZERO);
    assert!((schedule.total_principal - dec!(200_000)).abs() <= dec!(0.02));

    // 30 years of 6% interest on 200k: roughly 231.7k of total interest
    assert!(schedule.total_interest > dec!(200_000));
    assert!(schedule.total_interest < dec!(250_000));

    let last = schedule.periods.last().unwrap();
    assert_eq!(last.balance_after, Decimal::ZERO);
}

#[test]
fn test_schedule_due_dates_follow_anchor() {
    let output = project_schedule(&sample_loan()).unwrap();
    let periods = &output.result.periods;

    assert_eq!(
        periods[0].due_date,
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
    );
    assert_eq!(
        periods[11].due_date,
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    );
    assert!(output.warnings.is_empty());
}

#[test]
fn test_schedule_fallback_anchor_warns() {
    let mut terms = sample_loan();
    terms.first_payment_date = None;
    let output = project_schedule(&terms).unwrap();

    assert_eq!(
        output.result.periods[0].due_date,
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    );
    assert!(output
        .warnings
        .iter()
        .any(|w| w.contains("origination date as fallback")));
}

#[test]
fn test_zero_rate_loan_straight_line() {
    let terms = LoanTerms {
        original_principal: dec!(180_000),
        annual_rate_percent: Decimal::ZERO,
        term_months: 360,
        origination_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        first_payment_date: NaiveDate::from_ymd_opt(2024, 2, 1),
        monthly_escrow_taxes: Decimal::ZERO,
        monthly_escrow_insurance: Decimal::ZERO,
    };
    let output = project_schedule(&terms).unwrap();

    // 180k / 360 = 500 flat, zero interest throughout
    for row in &output.result.periods {
        assert_eq!(row.principal, dec!(500.00), "period {}", row.payment_number);
        assert_eq!(row.interest, Decimal::ZERO);
    }
    assert_eq!(output.result.total_interest, Decimal::ZERO);
    assert_eq!(output.result.final_balance, Decimal::ZERO);
}

// ===========================================================================
// Scheduled-split tests
// ===========================================================================

#[test]
fn test_scheduled_split_first_payment() {
    let input = ScheduledSplitInput {
        terms: sample_loan(),
        payment_number: 1,
    };
    let output = compute_scheduled_split(&input).unwrap();
    let split = &output.result;

    // 200k * 0.5% = 1000 of interest in month one
    assert_eq!(split.interest, dec!(1000.00));
    assert_eq!(split.principal, dec!(199.10));
    assert_eq!(split.balance_before, dec!(200_000));
    assert!(output.warnings.is_empty());
}

#[test]
fn test_scheduled_split_matches_schedule_projection() {
    let schedule = project_schedule(&sample_loan()).unwrap();

    for n in [1_i64, 2, 60, 180, 359, 360] {
        let input = ScheduledSplitInput {
            terms: sample_loan(),
            payment_number: n,
        };
        let split = compute_scheduled_split(&input).unwrap().result;
        let row = &schedule.result.periods[(n - 1) as usize];
        assert_eq!(split.principal, row.principal, "period {n}");
        assert_eq!(split.interest, row.interest, "period {n}");
    }
}

#[test]
fn test_scheduled_split_is_idempotent() {
    let input = ScheduledSplitInput {
        terms: sample_loan(),
        payment_number: 42,
    };
    let first = compute_scheduled_split(&input).unwrap();
    let second = compute_scheduled_split(&input).unwrap();
    assert_eq!(
        serde_json::to_value(&first.result).unwrap(),
        serde_json::to_value(&second.result).unwrap()
    );
}

#[test]
fn test_scheduled_split_clamps_out_of_range() {
    let below = compute_scheduled_split(&ScheduledSplitInput {
        terms: sample_loan(),
        payment_number: -3,
    })
    .unwrap();
    assert_eq!(below.result.payment_number, 1);
    assert_eq!(below.warnings.len(), 1);

    let above = compute_scheduled_split(&ScheduledSplitInput {
        terms: sample_loan(),
        payment_number: 400,
    })
    .unwrap();
    assert_eq!(above.result.payment_number, 360);
    assert_eq!(above.warnings.len(), 1);
}

#[test]
fn test_invalid_terms_rejected() {
    let mut terms = sample_loan();
    terms.term_months = 0;
    assert!(matches!(
        project_schedule(&terms),
        Err(PitiError::InvalidTerms { .. })
    ));

    let mut terms = sample_loan();
    terms.original_principal = dec!(-100);
    assert!(matches!(
        project_schedule(&terms),
        Err(PitiError::InvalidTerms { .. })
    ));

    let mut terms = sample_loan();
    terms.annual_rate_percent = dec!(-0.5);
    assert!(project_schedule(&terms).is_err());
}
