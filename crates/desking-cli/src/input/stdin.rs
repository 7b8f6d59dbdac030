use serde_json::Value;
use std::io::{self, IsTerminal, Read};

/// Attempt to read JSON from stdin if data is being piped.
/// Returns None if stdin is a TTY (interactive).
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

/// An empty pipe means "no input"; malformed bodies surface as InvalidInput
/// on the "input" field.
fn parse_piped(buffer: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: Value =
        serde_json::from_str(trimmed).map_err(desking_core::DeskingError::from)?;
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use desking_core::DeskingError;

    #[test]
    fn test_empty_pipe_is_no_input() {
        assert!(parse_piped("  \n").unwrap().is_none());
    }

    #[test]
    fn test_piped_deal_parsed() {
        let value = parse_piped(r#"{ "vehicle_price": 18500 }"#).unwrap().unwrap();
        assert_eq!(value["vehicle_price"].to_string(), "18500");
    }

    #[test]
    fn test_malformed_pipe_is_input_error() {
        let err = parse_piped("{ broken").unwrap_err();
        let err = err.downcast_ref::<DeskingError>().unwrap();
        assert_eq!(err.field(), "input");
    }
}
