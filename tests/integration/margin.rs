//! Margin simulator properties through the public API.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use storefront::simulator::{self, simulate, simulate_request};
use storefront::types::{SimulationError, SimulationRequest};

#[test]
fn test_reference_scenarios() {
    let r = simulate(dec!(299.99), dec!(199.99)).unwrap();
    assert_eq!((r.profit, r.margin, r.hold_days), (dec!(100.00), dec!(33.33), 2));

    let r = simulate(dec!(100), dec!(50)).unwrap();
    assert_eq!((r.profit, r.margin, r.hold_days), (dec!(50.00), dec!(50.00), 1));

    assert_eq!(simulate(dec!(10), dec!(10)), Err(SimulationError::InvalidRelation));
}

#[test]
fn test_margin_open_interval_over_grid() {
    // Every cent-valued pair on a coarse grid with cost < order.
    let mut checked = 0;
    for order_cents in (50..=100_000).step_by(997) {
        for cost_cents in (1..order_cents).step_by(613) {
            let order = Decimal::new(order_cents, 2);
            let cost = Decimal::new(cost_cents, 2);
            let r = simulate(order, cost).unwrap();

            assert_eq!(r.profit, order - cost);
            // Two-decimal rounding can land on a bound for extreme ratios.
            assert!(
                r.margin >= Decimal::ZERO && r.margin <= dec!(100),
                "{order}/{cost} -> {}",
                r.margin
            );
            assert_eq!(Some(r.hold_days), (cost / dec!(100)).ceil().to_u128());
            checked += 1;
        }
    }
    assert!(checked > 1000);
}

#[test]
fn test_hold_days_at_least_one_for_any_positive_cost() {
    for cost in [
        dec!(0.0000000000000000000000000001),
        dec!(0.000000000000000000000000001),
        dec!(0.00000001),
        dec!(0.01),
    ] {
        let r = simulate(dec!(1), cost).unwrap();
        assert_eq!(r.hold_days, 1, "cost {cost}");
    }
}

#[test]
fn test_hold_days_unbounded_above() {
    let r = simulate(Decimal::MAX, dec!(500_000_000_000_000_000_000_000_000)).unwrap();
    assert_eq!(r.hold_days, 5_000_000_000_000_000_000_000_000);
    assert!(r.hold_days > u128::from(u64::MAX));
}

#[test]
fn test_validation_order() {
    let req = |o: serde_json::Value, c: serde_json::Value| -> SimulationRequest {
        serde_json::from_value(json!({ "orderAmount": o, "supplierCost": c })).unwrap()
    };

    assert_eq!(simulate_request(&req(json!(null), json!("x"))), Err(SimulationError::MissingField));
    assert_eq!(simulate_request(&req(json!("x"), json!(5))), Err(SimulationError::InvalidAmount));
    assert_eq!(simulate_request(&req(json!(0), json!(5))), Err(SimulationError::InvalidAmount));
    assert_eq!(simulate_request(&req(json!(5), json!(0))), Err(SimulationError::InvalidAmount));
    assert_eq!(simulate_request(&req(json!(5), json!(6))), Err(SimulationError::InvalidRelation));
}

#[test]
fn test_round2_half_up() {
    assert_eq!(simulator::round2(dec!(1.005)), dec!(1.01));
    assert_eq!(simulator::round2(dec!(1.004)), dec!(1.00));
    assert_eq!(simulator::round2(dec!(33.334444)), dec!(33.33));
}
