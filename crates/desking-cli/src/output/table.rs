use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{cell, payload};

/// Render as tables: headline fields first, then one table per nested
/// section (alternate terms, breakdown, schedule periods, grid matrix).
pub fn print_table(value: &Value) {
    match payload(value) {
        Value::Object(result) => {
            print_fields(result);
            print_sections(result);
        }
        other => println!("{}", cell(other, "null")),
    }

    if let Some(envelope) = value.as_object() {
        print_notes(envelope);
    }
}

fn print_fields(result: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in result {
        if is_scalar(val) {
            builder.push_record([key.as_str(), &cell(val, "")]);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_sections(result: &Map<String, Value>) {
    if let Some(grid) = grid_table(result) {
        println!("\nPayment grid:");
        println!("{grid}");
    }

    for (key, val) in result {
        match val {
            Value::Array(rows) if rows.first().is_some_and(Value::is_object) => {
                println!("\n{}:", title(key));
                println!("{}", records_table(rows));
            }
            Value::Object(fields) => {
                println!("\n{}:", title(key));
                let mut builder = Builder::default();
                builder.push_record(["Item", "Amount"]);
                for (k, v) in fields {
                    builder.push_record([k.as_str(), &cell(v, "")]);
                }
                println!("{}", Table::from(builder));
            }
            _ => {}
        }
    }
}

fn print_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }
    if let Some(Value::String(methodology)) = envelope.get("methodology") {
        println!("\nMethodology: {methodology}");
    }
}

/// Rows of a payment grid as `row value | term ... term`.
fn grid_table(result: &Map<String, Value>) -> Option<Table> {
    let field = result.get("row_field")?.as_str()?;
    let row_values = result.get("row_values")?.as_array()?;
    let terms = result.get("terms")?.as_array()?;
    let matrix = result.get("matrix")?.as_array()?;

    let mut builder = Builder::default();
    let mut header = vec![field.to_string()];
    header.extend(terms.iter().map(|t| format!("{} mo", cell(t, ""))));
    builder.push_record(header);

    for (value, row) in row_values.iter().zip(matrix) {
        let mut record = vec![cell(value, "")];
        if let Some(payments) = row.as_array() {
            record.extend(payments.iter().map(|p| cell(p, "")));
        }
        builder.push_record(record);
    }
    Some(Table::from(builder))
}

fn records_table(rows: &[Value]) -> Table {
    let headers: Vec<String> = rows
        .first()
        .and_then(Value::as_object)
        .map(|first| first.keys().cloned().collect())
        .unwrap_or_default();

    let mut builder = Builder::default();
    builder.push_record(&headers);
    for row in rows.iter().filter_map(Value::as_object) {
        builder.push_record(
            headers
                .iter()
                .map(|h| row.get(h).map(|v| cell(v, "")).unwrap_or_default()),
        );
    }
    Table::from(builder)
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

fn title(key: &str) -> String {
    let mut words = key.split('_');
    let mut out = String::new();
    if let Some(first) = words.next() {
        let mut chars = first.chars();
        if let Some(c) = chars.next() {
            out.extend(c.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    for w in words {
        out.push(' ');
        out.push_str(w);
    }
    out
}
