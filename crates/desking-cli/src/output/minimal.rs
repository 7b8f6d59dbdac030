use serde_json::Value;

use super::{cell, payload};

/// Headline figure per command, in lookup order.
const HEADLINE_KEYS: [&str; 4] = [
    "monthly_payment",
    "base_case_payment",
    "total_paid",
    "total_amount_financed",
];

/// Print only the headline figure, e.g. `465.01` for `desk calculate`.
pub fn print_minimal(value: &Value) {
    println!("{}", headline(payload(value)));
}

fn headline(result: &Value) -> String {
    let Value::Object(map) = result else {
        return cell(result, "null");
    };
    if let Some(val) = HEADLINE_KEYS
        .iter()
        .filter_map(|k| map.get(*k))
        .find(|v| !v.is_null())
    {
        return cell(val, "null");
    }
    match map.iter().next() {
        Some((key, val)) => format!("{key}: {}", cell(val, "null")),
        None => String::new(),
    }
}
