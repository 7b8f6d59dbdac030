use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Months;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeskingError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid loan term {term}: {reason}")]
    InvalidTerm { term: Months, reason: String },
}

/// Wire-level error kinds reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    #[serde(rename = "InvalidInputError")]
    InvalidInput,
    #[serde(rename = "InvalidTermError")]
    InvalidTerm,
}

/// Structured error body for callers that render validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub kind: ErrorKind,
    pub field: String,
    pub message: String,
}

impl DeskingError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        DeskingError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_term(term: Months, reason: impl Into<String>) -> Self {
        DeskingError::InvalidTerm {
            term,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DeskingError::InvalidInput { .. } => ErrorKind::InvalidInput,
            DeskingError::InvalidTerm { .. } => ErrorKind::InvalidTerm,
        }
    }

    /// Name of the offending field. Term errors always point at `loan_term`.
    pub fn field(&self) -> &str {
        match self {
            DeskingError::InvalidInput { field, .. } => field,
            DeskingError::InvalidTerm { .. } => "loan_term",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            kind: self.kind(),
            field: self.field().to_string(),
            message: self.to_string(),
        }
    }
}

impl From<serde_json::Error> for DeskingError {
    fn from(e: serde_json::Error) -> Self {
        DeskingError::InvalidInput {
            field: "input".into(),
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_invalid_input_response_names_field() {
        let err = DeskingError::invalid_input("down_payment", "must not be negative");
        let resp = err.to_response();
        assert_eq!(resp.kind, ErrorKind::InvalidInput);
        assert_eq!(resp.field, "down_payment");
        assert!(resp.message.contains("down_payment"));
    }

    #[test]
    fn test_term_error_kind_serializes_to_wire_name() {
        let err = DeskingError::invalid_term(0, "must be at least 1 month");
        let json = serde_json::to_value(err.to_response()).unwrap();
        assert_eq!(json["kind"], "InvalidTermError");
        assert_eq!(json["field"], "loan_term");
    }

    #[test]
    fn test_malformed_json_maps_to_input_field() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err: DeskingError = parse_err.into();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.field(), "input");
    }
}
