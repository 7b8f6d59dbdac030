use rust_decimal::prelude::*;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::DeskingError;
use crate::types::{Money, Months, Percent};
use crate::DeskingResult;

/// Terms the desk offers by default.
pub const STANDARD_TERMS: [Months; 5] = [36, 48, 60, 72, 84];

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Round a monetary amount to cents, half-up.
pub fn round_money(value: Money) -> Money {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Periodic rate for an APR quoted in percent: `(apr / 100) / 12`.
pub fn monthly_rate(apr: Percent) -> Decimal {
    apr / Decimal::ONE_HUNDRED / MONTHS_PER_YEAR
}

pub fn is_standard_term(term: Months) -> bool {
    STANDARD_TERMS.contains(&term)
}

pub fn validate_term(term: Months) -> DeskingResult<()> {
    if term <= 0 {
        return Err(DeskingError::invalid_term(
            term,
            "Loan term must be at least 1 month",
        ));
    }
    Ok(())
}

/// Level monthly installment before rounding.
///
/// `principal × r / (1 − (1 + r)^−n)`, or `principal / n` when the rate is
/// zero. If `(1 + r)^n` leaves the decimal range the discount term is zero
/// and the installment is the interest-only limit `principal × r`. Only a
/// rate whose interest alone is unrepresentable fails.
pub fn payment_unrounded(principal: Money, apr: Percent, term: Months) -> DeskingResult<Money> {
    validate_term(term)?;

    if principal.is_zero() {
        return Ok(Decimal::ZERO);
    }

    let n = Decimal::from(term);
    let rate = monthly_rate(apr);
    if rate.is_zero() {
        return Ok(principal / n);
    }

    let interest = principal
        .checked_mul(rate)
        .ok_or_else(|| DeskingError::invalid_input("interest_rate", "is too large to amortize"))?;

    let factor = match (Decimal::ONE + rate).checked_powi(term) {
        Some(f) => f,
        None => return Ok(interest),
    };

    // A rate too small to move the factor off 1.0 at 28 digits behaves like zero.
    let denominator = Decimal::ONE - Decimal::ONE / factor;
    match interest.checked_div(denominator) {
        Some(payment) if !denominator.is_zero() => Ok(payment),
        _ => Ok(principal / n),
    }
}

/// `payment × term`, failing on the term when the total leaves the decimal range.
pub fn total_of_payments(payment: Money, term: Months) -> DeskingResult<Money> {
    payment.checked_mul(Decimal::from(term)).ok_or_else(|| {
        DeskingError::invalid_term(term, "Total of payments exceeds the representable range")
    })
}

/// Level monthly installment, rounded to cents.
pub fn monthly_payment(principal: Money, apr: Percent, term: Months) -> DeskingResult<Money> {
    Ok(round_money(payment_unrounded(principal, apr, term)?))
}
