//! Global projection assumptions and externally supplied factors

use serde::{Deserialize, Serialize};

/// Utility tariff substituted when a project has no finite baseline tariff
pub const DEFAULT_UTILITY_TARIFF: f64 = 4.5;

/// Grid emission factor: kg CO2 avoided per kWh generated
pub const DEFAULT_CO2_FACTOR: f64 = 0.5;

/// kg CO2 absorbed per tree per year
pub const DEFAULT_TREE_FACTOR: f64 = 22.0;

/// Portfolio-wide assumptions shared by every project calculation
///
/// The engine takes an owned snapshot of these at construction and never
/// observes later edits. Build a fresh engine after any change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalAssumptions {
    /// Projection horizon in years (at least 1)
    pub period: u32,

    /// Discount rate in percent (WACC)
    pub wacc: f64,

    /// Annual energy-output decline in percent
    pub degradation: f64,

    /// Annual tariff growth in percent
    pub tariff_escalation: f64,

    /// Annual operating-cost growth in percent
    pub opex_inflation: f64,
}

/// Environmental conversion factors, supplied as configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvFactors {
    /// kg CO2 avoided per kWh generated
    pub co2_per_kwh: f64,

    /// kg CO2 absorbed per tree per year
    pub co2_per_tree: f64,
}

impl Default for EnvFactors {
    fn default() -> Self {
        Self {
            co2_per_kwh: DEFAULT_CO2_FACTOR,
            co2_per_tree: DEFAULT_TREE_FACTOR,
        }
    }
}
