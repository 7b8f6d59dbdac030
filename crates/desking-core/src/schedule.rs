use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::{monthly_payment, monthly_rate, round_money, validate_term};
use crate::deal::{calculate, DealInputs};
use crate::error::DeskingError;
use crate::profile::{check_money, check_percent};
use crate::types::*;
use crate::DeskingResult;

/// Input for a level-payment amortization schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleInput {
    /// Amount financed
    pub principal: Money,
    /// Nominal APR in percent
    #[serde(alias = "interestRate")]
    pub interest_rate: Percent,
    #[serde(alias = "loanTerm")]
    pub loan_term: Months,
}

/// A single monthly installment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePeriod {
    pub payment_number: Months,
    pub opening_balance: Money,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub principal: Money,
    pub interest_rate: Percent,
    pub loan_term: Months,
    pub monthly_payment: Money,
    pub periods: Vec<SchedulePeriod>,
    pub total_interest: Money,
    pub total_paid: Money,
}

/// Longest schedule that will be itemized period by period.
pub const MAX_SCHEDULE_PERIODS: Months = 1200;

/// Build a month-by-month amortization schedule.
///
/// Interest is rounded to cents each month; the last installment absorbs the
/// rounding residue so the loan closes at exactly zero.
pub fn build_schedule(
    input: &ScheduleInput,
) -> DeskingResult<ComputationOutput<AmortizationSchedule>> {
    let mut warnings: Vec<String> = Vec::new();

    check_money("principal", input.principal)?;
    check_percent("interest_rate", input.interest_rate)?;
    validate_term(input.loan_term)?;
    if input.loan_term > MAX_SCHEDULE_PERIODS {
        return Err(DeskingError::invalid_term(
            input.loan_term,
            format!("Schedules are itemized for at most {MAX_SCHEDULE_PERIODS} months"),
        ));
    }

    let principal = round_money(input.principal);
    let payment = monthly_payment(principal, input.interest_rate, input.loan_term)?;
    let rate = monthly_rate(input.interest_rate);

    let mut periods = Vec::new();
    let mut balance = principal;
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;

    if principal.is_zero() {
        warnings.push("Nothing financed; schedule is empty".into());
    }

    let too_large = || DeskingError::invalid_input("interest_rate", "is too large to schedule");

    for n in 1..=input.loan_term {
        if balance.is_zero() {
            if n > 1 {
                warnings.push(format!(
                    "Loan retires after {} payments due to rounding",
                    n - 1
                ));
            }
            break;
        }

        let opening = balance;
        let interest = round_money(opening.checked_mul(rate).ok_or_else(too_large)?);

        let mut principal_paid = payment - interest;
        if n == input.loan_term || principal_paid > balance {
            principal_paid = balance;
        }
        let paid = principal_paid + interest;

        balance -= principal_paid;
        total_interest = total_interest.checked_add(interest).ok_or_else(too_large)?;
        total_paid = total_paid.checked_add(paid).ok_or_else(too_large)?;

        periods.push(SchedulePeriod {
            payment_number: n,
            opening_balance: opening,
            payment: paid,
            interest,
            principal: principal_paid,
            closing_balance: balance,
        });
    }

    let output = AmortizationSchedule {
        principal,
        interest_rate: input.interest_rate,
        loan_term: input.loan_term,
        monthly_payment: payment,
        periods,
        total_interest,
        total_paid,
    };

    Ok(with_metadata(
        "Level-payment amortization schedule",
        &serde_json::json!({
            "principal": principal.to_string(),
            "interest_rate": input.interest_rate.to_string(),
            "loan_term": input.loan_term,
        }),
        warnings,
        output,
    ))
}

/// Desk the deal, then schedule its amount financed.
pub fn build_deal_schedule(
    deal: &DealInputs,
) -> DeskingResult<ComputationOutput<AmortizationSchedule>> {
    let desked = calculate(deal)?;
    let mut schedule = build_schedule(&ScheduleInput {
        principal: desked.result.total_amount_financed,
        interest_rate: deal.interest_rate,
        loan_term: deal.loan_term,
    })?;

    let mut warnings = desked.warnings;
    warnings.append(&mut schedule.warnings);
    schedule.warnings = warnings;
    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeskingError;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_three_month_known_schedule() {
        let result = build_schedule(&ScheduleInput {
            principal: dec!(1000),
            interest_rate: dec!(12),
            loan_term: 3,
        })
        .unwrap();
        let s = &result.result;

        assert_eq!(s.monthly_payment, dec!(340.02));
        assert_eq!(
            s.periods[0],
            SchedulePeriod {
                payment_number: 1,
                opening_balance: dec!(1000),
                payment: dec!(340.02),
                interest: dec!(10.00),
                principal: dec!(330.02),
                closing_balance: dec!(669.98),
            }
        );
        assert_eq!(s.periods[1].interest, dec!(6.70));
        assert_eq!(s.periods[1].closing_balance, dec!(336.66));
        // Final installment absorbs the rounding residue
        assert_eq!(s.periods[2].principal, dec!(336.66));
        assert_eq!(s.periods[2].payment, dec!(340.03));
        assert_eq!(s.periods[2].closing_balance, Decimal::ZERO);
        assert_eq!(s.total_interest, dec!(20.07));
        assert_eq!(s.total_paid, dec!(1020.07));
    }

    #[test]
    fn test_schedule_principal_sums_to_amount_financed() {
        let result = build_schedule(&ScheduleInput {
            principal: dec!(26894.55),
            interest_rate: dec!(7.5),
            loan_term: 72,
        })
        .unwrap();
        let s = &result.result;

        assert_eq!(s.periods.len(), 72);
        let principal: Decimal = s.periods.iter().map(|p| p.principal).sum();
        assert_eq!(principal, dec!(26894.55));
        assert_eq!(s.total_paid, s.total_interest + dec!(26894.55));
        // All but the last installment are the level payment
        assert!(s.periods[..71].iter().all(|p| p.payment == dec!(465.01)));
    }

    #[test]
    fn test_zero_rate_schedule_has_no_interest() {
        let result = build_schedule(&ScheduleInput {
            principal: dec!(10000),
            interest_rate: Decimal::ZERO,
            loan_term: 3,
        })
        .unwrap();
        let s = &result.result;
        assert_eq!(s.total_interest, Decimal::ZERO);
        assert_eq!(s.periods[2].payment, dec!(3333.34));
    }

    #[test]
    fn test_zero_principal_is_empty() {
        let result = build_schedule(&ScheduleInput {
            principal: Decimal::ZERO,
            interest_rate: dec!(5),
            loan_term: 36,
        })
        .unwrap();
        assert!(result.result.periods.is_empty());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_bad_term_rejected() {
        let err = build_schedule(&ScheduleInput {
            principal: dec!(1000),
            interest_rate: dec!(5),
            loan_term: 0,
        })
        .unwrap_err();
        assert!(matches!(err, DeskingError::InvalidTerm { .. }));
    }

    #[test]
    fn test_itemized_length_is_capped() {
        let err = build_schedule(&ScheduleInput {
            principal: dec!(1000),
            interest_rate: dec!(5),
            loan_term: MAX_SCHEDULE_PERIODS + 1,
        })
        .unwrap_err();
        assert!(matches!(err, DeskingError::InvalidTerm { term: 1201, .. }));

        let result = build_schedule(&ScheduleInput {
            principal: dec!(1200),
            interest_rate: Decimal::ZERO,
            loan_term: MAX_SCHEDULE_PERIODS,
        })
        .unwrap();
        assert_eq!(result.result.periods.len(), 1200);
        assert_eq!(result.result.periods[1199].closing_balance, Decimal::ZERO);
    }

    #[test]
    fn test_unrepresentable_totals_are_input_errors() {
        // Interest-only installments whose running total leaves the decimal range
        let err = build_schedule(&ScheduleInput {
            principal: dec!(1_000_000_000_000),
            interest_rate: dec!(60_000_000_000_000_000_000),
            loan_term: 12,
        })
        .unwrap_err();
        assert_eq!(err.field(), "interest_rate");
    }
}
