use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::amortization::{
    is_standard_term, monthly_payment, round_money, total_of_payments as sum_of_payments,
    validate_term, STANDARD_TERMS,
};
use crate::error::DeskingError;
use crate::deal::model::*;
use crate::profile::{check_money, check_percent, high_rate_warning, DEFAULT_ALTERNATE_TERMS};
use crate::types::*;
use crate::DeskingResult;

const TAX_BASE_POLICY: &str =
    "vehicle_price - trade_value + total_add_ons, floored at zero; fees untaxed";

/// Desk a deal: derive tax, fees, amount financed and the monthly payment.
///
/// Pure and deterministic. Negative equity on the trade is a valid result,
/// never an error; only malformed inputs and bad terms fail.
pub fn calculate(input: &DealInputs) -> DeskingResult<ComputationOutput<DealResult>> {
    let mut warnings: Vec<String> = Vec::new();

    validate(input)?;

    for (field, rate) in [
        ("sales_tax_rate", input.sales_tax_rate),
        ("interest_rate", input.interest_rate),
    ] {
        if let Some(warning) = high_rate_warning(field, rate) {
            warn!(field, %rate, "rate above 100%");
            warnings.push(warning);
        }
    }

    let total_add_ons = input.add_ons.total();

    let subtotal = input.vehicle_price - input.trade_value + total_add_ons;
    let taxable_base = if subtotal < Decimal::ZERO {
        warn!(%subtotal, "trade allowance exceeds taxable amount; taxable base floored at zero");
        warnings.push(format!(
            "Trade allowance exceeds price plus add-ons by {}; no sales tax charged",
            round_money(-subtotal)
        ));
        Decimal::ZERO
    } else {
        subtotal
    };

    let sales_tax = taxable_base
        .checked_mul(input.sales_tax_rate)
        .map(|t| round_money(t / Decimal::ONE_HUNDRED))
        .ok_or_else(|| DeskingError::invalid_input("sales_tax_rate", "is too large to compute"))?;
    let total_fees = input.fees.total();

    let net_trade_difference = input.trade_value - input.amount_owed_on_trade;
    if net_trade_difference < Decimal::ZERO {
        warn!(%net_trade_difference, "negative trade equity rolled into amount financed");
        warnings.push(format!(
            "Negative equity of {} on the trade is rolled into the amount financed",
            round_money(-net_trade_difference)
        ));
    }

    // Every term but the tax is bounded by MAX_MONEY
    let financed = (input.vehicle_price - net_trade_difference - input.down_payment
        + total_add_ons
        + total_fees)
        .checked_add(sales_tax)
        .ok_or_else(|| DeskingError::invalid_input("sales_tax_rate", "is too large to compute"))?;
    let total_amount_financed = if financed < Decimal::ZERO {
        warn!(%financed, "credits exceed deal total; amount financed clamped to zero");
        warnings.push(format!(
            "Trade and down payment exceed the deal total by {}; amount financed clamped to zero",
            round_money(-financed)
        ));
        Decimal::ZERO
    } else {
        round_money(financed)
    };

    let payment = monthly_payment(total_amount_financed, input.interest_rate, input.loan_term)?;
    let total_of_payments = sum_of_payments(payment, input.loan_term)?;
    let finance_charge = (total_of_payments - total_amount_financed).max(Decimal::ZERO);

    if !is_standard_term(input.loan_term) {
        warnings.push(format!(
            "Loan term of {} months is outside the standard menu {:?}",
            input.loan_term, STANDARD_TERMS
        ));
    }

    let alternates = alternate_terms(input);
    let mut alternate_payments = Vec::with_capacity(alternates.len());
    for term in alternates {
        let alt_payment = monthly_payment(total_amount_financed, input.interest_rate, term)?;
        alternate_payments.push(TermPayment {
            loan_term: term,
            monthly_payment: alt_payment,
            total_of_payments: sum_of_payments(alt_payment, term)?,
        });
    }

    debug!(
        vehicle_price = %input.vehicle_price,
        %total_amount_financed,
        %sales_tax,
        monthly_payment = %payment,
        loan_term = input.loan_term,
        "deal calculated"
    );

    let output = DealResult {
        vehicle_price: input.vehicle_price,
        trade_value: input.trade_value,
        amount_owed_on_trade: input.amount_owed_on_trade,
        down_payment: input.down_payment,
        sales_tax_rate: input.sales_tax_rate,
        interest_rate: input.interest_rate,
        loan_term: input.loan_term,
        net_trade_difference,
        total_add_ons,
        taxable_base,
        sales_tax,
        total_fees,
        total_amount_financed,
        monthly_payment: payment,
        total_of_payments,
        finance_charge,
        alternate_terms: alternate_payments,
        breakdown: DealBreakdown::new(&input.add_ons, &input.fees),
    };

    Ok(with_metadata(
        "Desking: trade-adjusted sales tax, fixed-rate amortization",
        &serde_json::json!({
            "tax_base": TAX_BASE_POLICY,
            "payment_formula": "P * r / (1 - (1 + r)^-n), r = APR / 1200",
            "rounding": "half-up to cents; sales tax and amount financed rounded before amortization",
        }),
        warnings,
        output,
    ))
}

/// Reject anything the engine cannot price. Negative amounts are never clamped.
pub fn validate(input: &DealInputs) -> DeskingResult<()> {
    check_money("vehicle_price", input.vehicle_price)?;
    check_money("trade_value", input.trade_value)?;
    check_money("amount_owed_on_trade", input.amount_owed_on_trade)?;
    check_money("down_payment", input.down_payment)?;
    for (name, amount) in input.add_ons.items() {
        check_money(name, amount)?;
    }
    for (name, amount) in input.fees.items() {
        check_money(name, amount)?;
    }
    check_percent("sales_tax_rate", input.sales_tax_rate)?;
    check_percent("interest_rate", input.interest_rate)?;
    validate_term(input.loan_term)?;
    if let Some(terms) = &input.alternate_terms {
        for term in terms {
            validate_term(*term)?;
        }
    }
    Ok(())
}

fn alternate_terms(input: &DealInputs) -> Vec<Months> {
    match &input.alternate_terms {
        Some(terms) => terms.clone(),
        None => DEFAULT_ALTERNATE_TERMS.to_vec(),
    }
}
