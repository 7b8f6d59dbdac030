//! Build [`DealInputs`] from loosely typed JSON, the way desk screens post it.
//!
//! Keys may be snake_case or camelCase, add-ons and fees may sit at the top
//! level or in nested objects, and numbers may arrive as strings. Anything the
//! request leaves out comes from the active [`DeskingProfile`].

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::deal::model::{AddOns, DealInputs, Fees};
use crate::error::DeskingError;
use crate::profile::DeskingProfile;
use crate::types::{Money, Months};
use crate::DeskingResult;

/// Parse a JSON request body with the default profile.
pub fn deal_from_json(body: &str) -> DeskingResult<DealInputs> {
    let value: Value = serde_json::from_str(body)?;
    deal_from_value(&value, &DeskingProfile::default())
}

pub fn deal_from_value(value: &Value, profile: &DeskingProfile) -> DeskingResult<DealInputs> {
    let obj = value
        .as_object()
        .ok_or_else(|| DeskingError::invalid_input("input", "expected a JSON object"))?;

    let vehicle_price = decimal_field(obj, "vehicle_price")?
        .ok_or_else(|| DeskingError::invalid_input("vehicle_price", "is required"))?;

    let add_ons_obj = nested(obj, &["add_ons", "addOns"])?;
    let fees_obj = nested(obj, &["fees"])?;

    let add_ons = AddOns {
        extended_warranty: grouped(obj, add_ons_obj, "extended_warranty")?.unwrap_or_default(),
        gap_insurance: grouped(obj, add_ons_obj, "gap_insurance")?.unwrap_or_default(),
        credit_life: grouped(obj, add_ons_obj, "credit_life")?.unwrap_or_default(),
        disability_insurance: grouped(obj, add_ons_obj, "disability_insurance")?
            .unwrap_or_default(),
        service_contract: grouped(obj, add_ons_obj, "service_contract")?.unwrap_or_default(),
    };

    let fees = Fees {
        doc_fee: grouped(obj, fees_obj, "doc_fee")?.unwrap_or(profile.doc_fee),
        title_fee: grouped(obj, fees_obj, "title_fee")?.unwrap_or(profile.title_fee),
        registration_fee: grouped(obj, fees_obj, "registration_fee")?
            .unwrap_or(profile.registration_fee),
    };

    let alternate_terms = match lookup(obj, "alternate_terms") {
        None => Some(profile.alternate_terms.clone()),
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .map(|v| months_value("alternate_terms", v))
                .collect::<DeskingResult<Vec<_>>>()?,
        ),
        Some(_) => {
            return Err(DeskingError::invalid_input(
                "alternate_terms",
                "must be a list of whole months",
            ))
        }
    };

    Ok(DealInputs {
        vehicle_price,
        trade_value: decimal_field(obj, "trade_value")?.unwrap_or_default(),
        amount_owed_on_trade: decimal_field(obj, "amount_owed_on_trade")?.unwrap_or_default(),
        down_payment: decimal_field(obj, "down_payment")?.unwrap_or_default(),
        add_ons,
        sales_tax_rate: decimal_field(obj, "sales_tax_rate")?.unwrap_or(profile.sales_tax_rate),
        fees,
        interest_rate: decimal_field(obj, "interest_rate")?.unwrap_or(profile.interest_rate),
        loan_term: months_field(obj, "loan_term")?.unwrap_or(profile.loan_term),
        alternate_terms,
    })
}

/// `vehicle_price` → `vehiclePrice`
fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Look up a key by its snake_case or camelCase name. `null` counts as absent.
fn lookup<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    obj.get(field)
        .or_else(|| obj.get(&camel_case(field)))
        .filter(|v| !v.is_null())
}

fn nested<'a>(
    obj: &'a Map<String, Value>,
    keys: &[&str],
) -> DeskingResult<Option<&'a Map<String, Value>>> {
    for key in keys {
        match obj.get(*key) {
            None | Some(Value::Null) => continue,
            Some(Value::Object(map)) => return Ok(Some(map)),
            Some(_) => return Err(DeskingError::invalid_input(*key, "must be an object")),
        }
    }
    Ok(None)
}

/// A nested group entry wins over a flat top-level key of the same name.
fn grouped(
    obj: &Map<String, Value>,
    group: Option<&Map<String, Value>>,
    field: &str,
) -> DeskingResult<Option<Money>> {
    if let Some(group) = group {
        if let Some(v) = decimal_field(group, field)? {
            return Ok(Some(v));
        }
    }
    decimal_field(obj, field)
}

fn decimal_field(obj: &Map<String, Value>, field: &str) -> DeskingResult<Option<Decimal>> {
    lookup(obj, field)
        .map(|v| decimal_value(field, v))
        .transpose()
}

fn decimal_value(field: &str, value: &Value) -> DeskingResult<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return Err(DeskingError::invalid_input(field, "must be a number")),
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| DeskingError::invalid_input(field, format!("'{text}' is not a finite number")))
}

fn months_field(obj: &Map<String, Value>, field: &str) -> DeskingResult<Option<Months>> {
    lookup(obj, field).map(|v| months_value(field, v)).transpose()
}

fn months_value(field: &str, value: &Value) -> DeskingResult<Months> {
    let months = decimal_value(field, value)?;
    if !months.fract().is_zero() {
        return Err(DeskingError::invalid_input(
            field,
            "must be a whole number of months",
        ));
    }
    i64::try_from(months)
        .map_err(|_| DeskingError::invalid_input(field, "is out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_flat_wire_shape_with_profile_defaults() {
        let deal = deal_from_value(
            &json!({ "vehicle_price": 18500, "service_contract": 2299, "gap_insurance": 789 }),
            &DeskingProfile::default(),
        )
        .unwrap();

        assert_eq!(deal.vehicle_price, dec!(18500));
        assert_eq!(deal.add_ons.total(), dec!(3088));
        assert_eq!(deal.fees.total(), dec!(798));
        assert_eq!(deal.sales_tax_rate, dec!(9.25));
        assert_eq!(deal.interest_rate, dec!(7.5));
        assert_eq!(deal.loan_term, 72);
        assert_eq!(deal.alternate_terms, Some(vec![48, 60, 84]));
    }

    #[test]
    fn test_camel_case_and_nested_groups() {
        let deal = deal_from_value(
            &json!({
                "vehiclePrice": "30000.00",
                "tradeValue": 4000,
                "amountOwedOnTrade": 6500.5,
                "addOns": { "extendedWarranty": 1800 },
                "fees": { "docFee": 0 },
                "salesTaxRate": 6.5,
                "loanTerm": 60
            }),
            &DeskingProfile::default(),
        )
        .unwrap();

        assert_eq!(deal.vehicle_price, dec!(30000.00));
        assert_eq!(deal.amount_owed_on_trade, dec!(6500.5));
        assert_eq!(deal.add_ons.extended_warranty, dec!(1800));
        assert_eq!(deal.fees.doc_fee, Decimal::ZERO);
        assert_eq!(deal.fees.title_fee, dec!(75));
        assert_eq!(deal.sales_tax_rate, dec!(6.5));
        assert_eq!(deal.loan_term, 60);
    }

    #[test]
    fn test_missing_price_is_input_error() {
        let err = deal_from_value(&json!({ "loan_term": 60 }), &DeskingProfile::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.field(), "vehicle_price");
    }

    #[test]
    fn test_null_price_is_missing() {
        let err = deal_from_value(&json!({ "vehicle_price": null }), &DeskingProfile::default())
            .unwrap_err();
        assert_eq!(err.field(), "vehicle_price");
    }

    #[test]
    fn test_non_numeric_field_named() {
        let err = deal_from_value(
            &json!({ "vehicle_price": 20000, "down_payment": "lots" }),
            &DeskingProfile::default(),
        )
        .unwrap_err();
        assert_eq!(err.field(), "down_payment");

        let err = deal_from_value(
            &json!({ "vehicle_price": 20000, "interest_rate": true }),
            &DeskingProfile::default(),
        )
        .unwrap_err();
        assert_eq!(err.field(), "interest_rate");
    }

    #[test]
    fn test_fractional_term_rejected() {
        let err = deal_from_value(
            &json!({ "vehicle_price": 20000, "loan_term": 60.5 }),
            &DeskingProfile::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.field(), "loan_term");
    }

    #[test]
    fn test_zero_term_passes_parse_for_engine_to_reject() {
        let deal = deal_from_value(
            &json!({ "vehicle_price": 20000, "loan_term": 0 }),
            &DeskingProfile::default(),
        )
        .unwrap();
        assert_eq!(deal.loan_term, 0);
    }

    #[test]
    fn test_non_object_body_rejected() {
        assert!(deal_from_value(&json!([1, 2]), &DeskingProfile::default()).is_err());
        assert!(deal_from_json("{ broken").is_err());
    }

    #[test]
    fn test_explicit_alternate_terms() {
        let deal =
            deal_from_json(r#"{ "vehicle_price": 1, "alternateTerms": [36, "48"] }"#).unwrap();
        assert_eq!(deal.alternate_terms, Some(vec![36, 48]));
    }

    #[test]
    fn test_camel_case_conversion() {
        assert_eq!(camel_case("amount_owed_on_trade"), "amountOwedOnTrade");
        assert_eq!(camel_case("doc_fee"), "docFee");
    }
}
