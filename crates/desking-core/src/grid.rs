use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::{validate_term, STANDARD_TERMS};
use crate::deal::{calculate, validate, DealInputs};
use crate::error::DeskingError;
use crate::profile::{check_money, check_percent};
use crate::types::*;
use crate::DeskingResult;

/// Largest number of rows a payment grid may sweep.
pub const MAX_GRID_ROWS: usize = 100;

/// Deal variable swept down the rows of a payment grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridField {
    DownPayment,
    TradeValue,
    VehiclePrice,
    InterestRate,
}

impl GridField {
    pub fn name(&self) -> &'static str {
        match self {
            GridField::DownPayment => "down_payment",
            GridField::TradeValue => "trade_value",
            GridField::VehiclePrice => "vehicle_price",
            GridField::InterestRate => "interest_rate",
        }
    }

    fn read(&self, deal: &DealInputs) -> Decimal {
        match self {
            GridField::DownPayment => deal.down_payment,
            GridField::TradeValue => deal.trade_value,
            GridField::VehiclePrice => deal.vehicle_price,
            GridField::InterestRate => deal.interest_rate,
        }
    }

    fn apply(&self, deal: &DealInputs, value: Decimal, term: Months) -> DealInputs {
        let mut d = deal.clone();
        match self {
            GridField::DownPayment => d.down_payment = value,
            GridField::TradeValue => d.trade_value = value,
            GridField::VehiclePrice => d.vehicle_price = value,
            GridField::InterestRate => d.interest_rate = value,
        }
        d.loan_term = term;
        // Cells only need the headline payment
        d.alternate_terms = Some(Vec::new());
        d
    }
}

/// Row sweep: one deal variable from min to max by step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridVariable {
    pub field: GridField,
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
}

/// Input for a payment grid (the desk's "payment menu")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentGridInput {
    pub deal: DealInputs,
    pub rows: GridVariable,
    /// Column terms; the standard menu when empty
    #[serde(default)]
    pub terms: Vec<Months>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentGridOutput {
    pub row_field: String,
    pub row_values: Vec<Decimal>,
    pub terms: Vec<Months>,
    /// matrix[i][j] = monthly payment with row_values[i] at terms[j]
    pub matrix: Vec<Vec<Money>>,
    /// Cell closest to the deal as entered
    pub base_case_position: (usize, usize),
    pub base_case_payment: Money,
}

/// Generate the sweep values from min to max with step, max always included.
fn sweep_values(var: &GridVariable) -> DeskingResult<Vec<Decimal>> {
    let field = var.field.name();
    let check: fn(&str, Decimal) -> DeskingResult<()> = match var.field {
        GridField::InterestRate => check_percent,
        _ => check_money,
    };
    check(field, var.min)?;
    check(field, var.max)?;
    if var.step <= Decimal::ZERO {
        return Err(DeskingError::invalid_input(field, "Step must be positive"));
    }
    if var.min > var.max {
        return Err(DeskingError::invalid_input(field, "Min must be <= max"));
    }

    let too_many = || {
        DeskingError::invalid_input(field, format!("Sweep produces more than {MAX_GRID_ROWS} rows"))
    };
    let span = (var.max - var.min).checked_div(var.step).ok_or_else(too_many)?;
    if span.ceil() >= Decimal::from(MAX_GRID_ROWS) {
        return Err(too_many());
    }

    let mut values = Vec::new();
    let mut current = var.min;
    while current <= var.max {
        values.push(current);
        match current.checked_add(var.step) {
            Some(next) => current = next,
            None => break,
        }
    }
    if let Some(&last) = values.last() {
        if last < var.max {
            values.push(var.max);
        }
    }
    Ok(values)
}

fn closest_index<T: Copy>(values: &[T], distance: impl Fn(T) -> Decimal) -> usize {
    values
        .iter()
        .enumerate()
        .min_by_key(|(_, v)| distance(**v))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Price the deal at every (row value, term) combination.
pub fn build_payment_grid(
    input: &PaymentGridInput,
) -> DeskingResult<ComputationOutput<PaymentGridOutput>> {
    let warnings: Vec<String> = Vec::new();

    validate(&input.deal)?;
    let row_values = sweep_values(&input.rows)?;
    let terms = if input.terms.is_empty() {
        STANDARD_TERMS.to_vec()
    } else {
        input.terms.clone()
    };
    for term in &terms {
        validate_term(*term)?;
    }

    let mut matrix = Vec::with_capacity(row_values.len());
    for value in &row_values {
        let mut row = Vec::with_capacity(terms.len());
        for term in &terms {
            let cell = input.rows.field.apply(&input.deal, *value, *term);
            row.push(calculate(&cell)?.result.monthly_payment);
        }
        matrix.push(row);
    }

    let base_value = input.rows.field.read(&input.deal);
    let base_row = closest_index(&row_values, |v| (v - base_value).abs());
    let base_col = closest_index(&terms, |t| Decimal::from((t - input.deal.loan_term).abs()));
    let base_case_payment = matrix[base_row][base_col];

    let output = PaymentGridOutput {
        row_field: input.rows.field.name().to_string(),
        row_values,
        terms,
        matrix,
        base_case_position: (base_row, base_col),
        base_case_payment,
    };

    Ok(with_metadata(
        "Desking payment grid",
        &serde_json::json!({
            "row_field": input.rows.field.name(),
            "min": input.rows.min.to_string(),
            "max": input.rows.max.to_string(),
            "step": input.rows.step.to_string(),
        }),
        warnings,
        output,
    ))
}
