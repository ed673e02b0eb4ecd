//! Shared types for the storefront backend.
//!
//! The simulation request/result pair is the wire shape of
//! `/api/simulate` and the return type of the shared simulator, so the
//! HTTP layer and in-process callers see exactly the same values.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Simulation request
// ---------------------------------------------------------------------------

/// Incoming margin simulation request.
///
/// Amounts are kept as raw JSON values because clients send either numbers
/// or numeric strings (form inputs). They are interpreted by
/// [`crate::simulator::simulate_request`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    #[serde(default)]
    pub order_amount: Option<serde_json::Value>,
    #[serde(default)]
    pub supplier_cost: Option<serde_json::Value>,
    /// Carried through for record-keeping only; never validated.
    #[serde(default)]
    pub email: Option<String>,
}

// ---------------------------------------------------------------------------
// Simulation result
// ---------------------------------------------------------------------------

/// Derived result of a margin simulation. Never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub order_amount: Decimal,
    pub supplier_cost: Decimal,
    /// `order_amount - supplier_cost`, 2 dp.
    pub profit: Decimal,
    /// Profit as a percentage of the order amount, 2 dp.
    pub margin: Decimal,
    /// Estimated days funds are held: one day per started hundred of cost.
    pub hold_days: u128,
    /// ISO-8601 creation time. Informational only.
    pub timestamp: String,
}

/// Equality covers the business fields only; `timestamp` is ignored.
impl PartialEq for SimulationResult {
    fn eq(&self, other: &Self) -> bool {
        self.order_amount == other.order_amount
            && self.supplier_cost == other.supplier_cost
            && self.profit == other.profit
            && self.margin == other.margin
            && self.hold_days == other.hold_days
    }
}

impl Eq for SimulationResult {}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "order ${:.2} | cost ${:.2} | profit ${:.2} | margin {:.2}% | hold {}d",
            self.order_amount, self.supplier_cost, self.profit, self.margin, self.hold_days,
        )
    }
}

/// Envelope returned by `/api/simulate` on success.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResponse {
    pub success: bool,
    pub result: SimulationResult,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Simulation failures, in the order they are checked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    #[error("Missing required fields: orderAmount, supplierCost")]
    MissingField,

    #[error("Invalid amounts: must be positive numbers")]
    InvalidAmount,

    #[error("Supplier cost must be less than order amount")]
    InvalidRelation,

    /// Decimal overflow while deriving the result. Not a client error.
    #[error("Arithmetic overflow while computing {0}")]
    Arithmetic(&'static str),
}

impl SimulationError {
    /// Whether the failure was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, SimulationError::Arithmetic(_))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
