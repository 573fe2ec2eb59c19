use lab_pricing_core::analytics::{
    analyze_profitability, calculate_profitability, AnalyticsInputs, ProfitabilityInput, Scenario,
};
use lab_pricing_core::pricing::price_panel;
use lab_pricing_core::types::LabTest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn lab_test(id: &str, reagent_cost: Decimal, list_price: Decimal) -> LabTest {
    LabTest {
        id: id.to_string(),
        name: id.to_string(),
        reagent_cost,
        list_price,
        category: String::new(),
        org_id: "org-1".to_string(),
    }
}

fn basic_panel() -> Vec<LabTest> {
    vec![
        lab_test("T-001", dec!(4.5), dec!(45.0)),
        lab_test("T-002", dec!(6.2), dec!(65.0)),
        lab_test("T-004", dec!(5.3), dec!(55.0)),
    ]
}

fn default_assumptions() -> AnalyticsInputs {
    AnalyticsInputs {
        current_daily_overhead: dec!(2500),
        current_panels_per_day: dec!(50),
        future_daily_overhead: dec!(3500),
        future_panels_per_day: dec!(80),
    }
}

// ===========================================================================
// Basic panel under the default dashboard assumptions
// ===========================================================================

#[test]
fn test_basic_panel_current_scenario() {
    let pricing = price_panel(&basic_panel());
    let result = analyze_profitability(&pricing, &default_assumptions());

    assert_eq!(result.panel_price, dec!(129.4));
    assert_eq!(result.total_reagent_cost, dec!(16.0));

    // 2500 / 50 = 50; cost = 16 + 50 = 66; margin = 129.4 - 66 = 63.4
    assert_eq!(result.current.overhead_per_panel, dec!(50.0));
    assert_eq!(result.current.total_cost, dec!(66.0));
    assert_eq!(result.current.gross_margin, dec!(63.4));
    assert!(
        (result.current.gross_margin_pct - dec!(48.9954)).abs() < dec!(0.001),
        "Expected margin ~49.0%, got {}",
        result.current.gross_margin_pct
    );
    assert!(result.current.profitable);
}

#[test]
fn test_basic_panel_future_scenario() {
    let pricing = price_panel(&basic_panel());
    let result = analyze_profitability(&pricing, &default_assumptions());

    // 3500 / 80 = 43.75; cost = 59.75; margin = 69.65
    assert_eq!(result.future.overhead_per_panel, dec!(43.75));
    assert_eq!(result.future.total_cost, dec!(59.75));
    assert_eq!(result.future.gross_margin, dec!(69.65));
    assert!(
        (result.future.gross_margin_pct - dec!(53.825)).abs() < dec!(0.001),
        "Expected margin ~53.8%, got {}",
        result.future.gross_margin_pct
    );
    assert!(result.future.profitable);
}

#[test]
fn test_pricing_is_not_mutated() {
    let pricing = price_panel(&basic_panel());
    let before = pricing.clone();
    let _ = analyze_profitability(&pricing, &default_assumptions());
    assert_eq!(pricing, before);
}

// ===========================================================================
// Guards and thresholds
// ===========================================================================

#[test]
fn test_zero_panels_per_day_gives_zero_overhead() {
    let pricing = price_panel(&basic_panel());
    let inputs = AnalyticsInputs {
        current_daily_overhead: dec!(2500),
        current_panels_per_day: Decimal::ZERO,
        ..default_assumptions()
    };
    let result = analyze_profitability(&pricing, &inputs);
    assert_eq!(result.current.overhead_per_panel, Decimal::ZERO);
    assert_eq!(result.current.total_cost, dec!(16.0));
    assert_eq!(result.future.overhead_per_panel, dec!(43.75));
}

#[test]
fn test_empty_selection_has_zero_margin_pct() {
    let pricing = price_panel(&[]);
    let result = analyze_profitability(&pricing, &default_assumptions());
    assert_eq!(result.panel_price, Decimal::ZERO);
    assert_eq!(result.current.gross_margin, dec!(-50));
    assert_eq!(result.current.gross_margin_pct, Decimal::ZERO);
    assert!(!result.current.profitable);
}

#[test]
fn test_break_even_is_not_profitable() {
    // price 129.4, reagents 16 => overhead per panel 113.4 breaks even
    let pricing = price_panel(&basic_panel());
    let inputs = AnalyticsInputs {
        current_daily_overhead: dec!(113.4),
        current_panels_per_day: dec!(1),
        future_daily_overhead: dec!(113.3),
        future_panels_per_day: dec!(1),
    };
    let result = analyze_profitability(&pricing, &inputs);
    assert_eq!(result.current.gross_margin, Decimal::ZERO);
    assert!(!result.current.profitable);
    assert!(result.future.profitable);
}

#[test]
fn test_profitable_matches_margin_sign() {
    let pricing = price_panel(&basic_panel());
    for overhead in [dec!(0), dec!(1000), dec!(5000), dec!(5670), dec!(10000)] {
        let inputs = AnalyticsInputs {
            current_daily_overhead: overhead,
            current_panels_per_day: dec!(50),
            future_daily_overhead: overhead,
            future_panels_per_day: dec!(0),
        };
        let result = analyze_profitability(&pricing, &inputs);
        for scenario in Scenario::ALL {
            let s = result.scenario(scenario);
            assert_eq!(s.profitable, s.gross_margin > Decimal::ZERO);
        }
    }
}

#[test]
fn test_enveloped_profitability() {
    let input = ProfitabilityInput {
        tests: basic_panel(),
        assumptions: default_assumptions(),
    };
    let output = calculate_profitability(&input).unwrap();
    assert_eq!(output.result.pricing.total_price, dec!(129.4));
    assert_eq!(output.result.analytics.current.overhead_per_panel, dec!(50));
    assert!(output.warnings.is_empty(), "{:?}", output.warnings);
    assert!(!output.metadata.version.is_empty());
}
