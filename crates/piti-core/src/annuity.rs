use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::PitiError;
use crate::types::{Money, Rate};
use crate::PitiResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Monthly periodic rate from a nominal annual rate quoted in percent
/// (6.5 means 6.5% per annum).
pub fn monthly_rate(annual_rate_percent: Decimal) -> Rate {
    annual_rate_percent / PERCENT / MONTHS_PER_YEAR
}

/// Level payment for a fully amortizing fixed-rate loan:
/// `P = principal * r / (1 - (1 + r)^-n)`.
///
/// Degrades to straight-line `principal / n` when the periodic rate is zero,
/// so zero-interest loans never divide by zero.
pub fn level_payment(principal: Money, periodic_rate: Rate, periods: u32) -> PitiResult<Money> {
    if periods == 0 {
        return Err(PitiError::InvalidTerms {
            field: "term_months".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if periodic_rate.is_zero() {
        return Ok(principal / Decimal::from(periods));
    }

    let one_plus_r = Decimal::ONE + periodic_rate;
    let factor = one_plus_r.powd(Decimal::from(periods));
    if factor.is_zero() {
        return Err(PitiError::DivisionByZero {
            context: "level payment growth factor".into(),
        });
    }

    let annuity_factor = Decimal::ONE - Decimal::ONE / factor;
    if annuity_factor.is_zero() {
        return Err(PitiError::DivisionByZero {
            context: "level payment annuity factor".into(),
        });
    }

    Ok(principal * periodic_rate / annuity_factor)
}
