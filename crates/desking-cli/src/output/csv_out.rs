use serde_json::{Map, Value};
use std::io::{self, Write};

use super::{cell, payload};

/// Write CSV to stdout.
///
/// Schedules write one row per period, grids one row per sweep value,
/// anything else a `field,value` listing of its scalar fields.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(stdout.lock(), payload(value)) {
        eprintln!("CSV write error: {e}");
    }
}

fn write_csv<W: Write>(out: W, result: &Value) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(out);

    match result {
        Value::Object(map) => {
            if let Some(Value::Array(periods)) = map.get("periods") {
                write_records(&mut wtr, periods)?;
            } else if map.contains_key("matrix") {
                write_grid(&mut wtr, map)?;
            } else {
                wtr.write_record(["field", "value"])?;
                for (key, val) in map {
                    if !matches!(val, Value::Array(_) | Value::Object(_)) {
                        wtr.write_record([key.as_str(), &cell(val, "")])?;
                    }
                }
            }
        }
        Value::Array(rows) => write_records(&mut wtr, rows)?,
        other => wtr.write_record([cell(other, "")])?,
    }

    wtr.flush()?;
    Ok(())
}

fn write_records<W: Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> Result<(), csv::Error> {
    let Some(Value::Object(first)) = rows.first() else {
        return Ok(());
    };
    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    wtr.write_record(&headers)?;
    for row in rows.iter().filter_map(Value::as_object) {
        wtr.write_record(
            headers
                .iter()
                .map(|h| row.get(*h).map(|v| cell(v, "")).unwrap_or_default()),
        )?;
    }
    Ok(())
}

fn write_grid<W: Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) -> Result<(), csv::Error> {
    let empty = Vec::new();
    let field = map.get("row_field").and_then(Value::as_str).unwrap_or("row");
    let terms = map.get("terms").and_then(Value::as_array).unwrap_or(&empty);
    let rows = map.get("row_values").and_then(Value::as_array).unwrap_or(&empty);
    let matrix = map.get("matrix").and_then(Value::as_array).unwrap_or(&empty);

    let mut header = vec![field.to_string()];
    header.extend(terms.iter().map(|t| cell(t, "")));
    wtr.write_record(&header)?;

    for (value, payments) in rows.iter().zip(matrix) {
        let mut record = vec![cell(value, "")];
        if let Some(payments) = payments.as_array() {
            record.extend(payments.iter().map(|p| cell(p, "")));
        }
        wtr.write_record(&record)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(result: &Value) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, result).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_scalar_fields_listing() {
        let out = render(&json!({ "monthly_payment": 465.01, "alternate_terms": [] }));
        assert_eq!(out, "field,value\nmonthly_payment,465.01\n");
    }

    #[test]
    fn test_schedule_rows() {
        let out = render(&json!({
            "total_paid": 1020.07,
            "periods": [
                { "period": 1, "payment": 340.02 },
                { "period": 2, "payment": 340.02 }
            ]
        }));
        // Object keys come back sorted
        assert_eq!(out, "payment,period\n340.02,1\n340.02,2\n");
    }

    #[test]
    fn test_grid_rows() {
        let out = render(&json!({
            "row_field": "down_payment",
            "row_values": [0, 1000],
            "terms": [60, 72],
            "matrix": [[1.5, 1.25], [1.0, 0.75]]
        }));
        assert_eq!(out, "down_payment,60,72\n0,1.5,1.25\n1000,1.0,0.75\n");
    }
}
