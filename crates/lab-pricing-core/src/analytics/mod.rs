pub mod profitability;

pub use profitability::{
    analyze_profitability, calculate_profitability, AnalyticsInputs, AnalyticsResult,
    ProfitabilityInput, ProfitabilityOutput, Scenario, ScenarioProfitability,
};
