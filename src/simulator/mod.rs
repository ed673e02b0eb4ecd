//! Margin simulator.
//!
//! The single shared formula for profit, margin percentage and estimated
//! holding period. Every caller (the `/api/simulate` handler, previews,
//! tests) goes through [`simulate`] so results cannot drift apart.
//!
//! Validation order:
//! 1. both fields present
//! 2. both parse and are strictly positive
//! 3. supplier cost strictly below order amount

pub mod amount;

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::types::{SimulationError, SimulationRequest, SimulationResult};

pub use amount::{is_missing, parse_amount};

/// Decimal places for currency and percentage fields.
const MONEY_DP: u32 = 2;

/// Supplier cost covered by one hold day.
const COST_PER_HOLD_DAY: Decimal = Decimal::ONE_HUNDRED;

/// Round half-up to two decimal places. All rounded values are positive,
/// so midpoint-away-from-zero is half-up.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Simulate a sale stamped with the current time.
pub fn simulate(
    order_amount: Decimal,
    supplier_cost: Decimal,
) -> Result<SimulationResult, SimulationError> {
    simulate_at(order_amount, supplier_cost, Utc::now())
}

/// Simulate a sale with an explicit timestamp.
///
/// The timestamp is informational and never influences the figures.
pub fn simulate_at(
    order_amount: Decimal,
    supplier_cost: Decimal,
    at: DateTime<Utc>,
) -> Result<SimulationResult, SimulationError> {
    if order_amount <= Decimal::ZERO || supplier_cost <= Decimal::ZERO {
        return Err(SimulationError::InvalidAmount);
    }
    if supplier_cost >= order_amount {
        return Err(SimulationError::InvalidRelation);
    }

    let raw_profit = order_amount
        .checked_sub(supplier_cost)
        .ok_or(SimulationError::Arithmetic("profit"))?;
    let raw_margin = raw_profit
        .checked_div(order_amount)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or(SimulationError::Arithmetic("margin"))?;
    let hold_days = hold_days(supplier_cost)?;

    let result = SimulationResult {
        order_amount,
        supplier_cost,
        profit: round2(raw_profit),
        margin: round2(raw_margin),
        hold_days,
        timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    debug!(
        order_amount = %result.order_amount,
        supplier_cost = %result.supplier_cost,
        profit = %result.profit,
        margin = %result.margin,
        hold_days = result.hold_days,
        "Margin simulated"
    );

    Ok(result)
}

/// Validate and simulate a raw request.
///
/// Presence of both fields is checked before either is parsed, so a request
/// with one missing and one malformed amount reports the missing field.
pub fn simulate_request(request: &SimulationRequest) -> Result<SimulationResult, SimulationError> {
    let order = request.order_amount.as_ref();
    let cost = request.supplier_cost.as_ref();

    if is_missing(order) || is_missing(cost) {
        return Err(SimulationError::MissingField);
    }

    let order_amount = parse_amount(order)?;
    let supplier_cost = parse_amount(cost)?;
    simulate(order_amount, supplier_cost)
}

/// One day per started hundred of supplier cost.
///
/// Works on whole hundreds and the remainder instead of `cost / 100`, which
/// loses the fractional digits of very small costs to the 28-digit scale.
fn hold_days(supplier_cost: Decimal) -> Result<u128, SimulationError> {
    let whole_days = supplier_cost
        .checked_div(COST_PER_HOLD_DAY)
        .map(|days| days.floor())
        .ok_or(SimulationError::Arithmetic("hold days"))?;
    let remainder = whole_days
        .checked_mul(COST_PER_HOLD_DAY)
        .and_then(|covered| supplier_cost.checked_sub(covered))
        .ok_or(SimulationError::Arithmetic("hold days"))?;

    let days = whole_days
        .to_u128()
        .ok_or(SimulationError::Arithmetic("hold days"))?;
    Ok(if remainder > Decimal::ZERO { days + 1 } else { days })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
