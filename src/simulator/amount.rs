//! Monetary amount parsing.
//!
//! Clients send amounts as JSON numbers or as numeric strings straight from
//! form inputs. Both are converted to exact decimals; binary floats never
//! enter the calculation.

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use crate::types::SimulationError;

/// Whether a field counts as absent: not sent, `null`, or a blank string.
pub fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Parse a JSON value into a decimal amount.
///
/// Numbers are read from their shortest textual form so `299.99` stays
/// `299.99`. Strings must contain a number and nothing else.
pub fn parse_amount(value: Option<&Value>) -> Result<Decimal, SimulationError> {
    if is_missing(value) {
        return Err(SimulationError::MissingField);
    }
    match value {
        Some(Value::Number(n)) => parse_decimal(&n.to_string()),
        Some(Value::String(s)) => parse_decimal(s.trim()),
        _ => Err(SimulationError::InvalidAmount),
    }
}

/// Parse plain (`12.50`) or scientific (`1.25e1`) notation.
fn parse_decimal(text: &str) -> Result<Decimal, SimulationError> {
    if text.is_empty() || text.contains('_') {
        return Err(SimulationError::InvalidAmount);
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map(|d| d.normalize())
        .map_err(|_| SimulationError::InvalidAmount)
}
