//! Result structures for project and supplier projections

use serde::{Deserialize, Serialize};

/// One projected year, 1-indexed through the horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyRecord {
    /// Year index (1..=period)
    pub year: u32,

    /// Energy generated in kWh, after degradation
    pub energy: f64,

    /// Effective sale tariff for the year
    pub tariff: f64,

    /// Revenue = energy * tariff
    pub revenue: f64,

    /// Operating cost after inflation
    pub opex: f64,

    /// Net cash flow = revenue - opex
    pub net_cashflow: f64,

    /// Net cash flow discounted to year 0
    pub pv_net_cashflow: f64,

    /// Running cash position, seeded with the year-0 capex outflow
    pub cumulative_cashflow: f64,
}

impl YearlyRecord {
    /// A zeroed record, used as the accumulator for supplier aggregation
    pub fn empty(year: u32) -> Self {
        Self {
            year,
            energy: 0.0,
            tariff: 0.0,
            revenue: 0.0,
            opex: 0.0,
            net_cashflow: 0.0,
            pv_net_cashflow: 0.0,
            cumulative_cashflow: 0.0,
        }
    }
}

/// Year-1 environmental impact derived from generated energy
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvImpact {
    /// kg CO2 avoided per year
    pub co2_kg_per_year: f64,

    /// Equivalent number of trees absorbing that CO2
    pub tree_equivalent: f64,
}

/// Derived investment metrics, attached to both project and supplier results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentMetrics {
    /// Capex share of the levelized cost, per discounted kWh
    pub lcoe_capex: f64,

    /// Opex share of the levelized cost, per discounted kWh
    pub lcoe_opex: f64,

    /// Levelized cost of electricity (capex + opex shares)
    pub lcoe: f64,

    /// Revenue per discounted kWh over the horizon
    pub avg_tariff: f64,

    /// avg_tariff - lcoe
    pub profit_margin: f64,

    /// Fractional years until cumulative cash flow turns non-negative;
    /// `period + 1` means it never does within the horizon
    pub payback_years: f64,

    /// Internal rate of return in percent
    pub irr_pct: f64,

    /// Net present value (discounted revenue less capex and discounted opex)
    pub npv: f64,

    /// Undiscounted return on investment in percent
    pub roi_pct: f64,

    /// Modified internal rate of return in percent
    pub mirr_pct: f64,

    /// Year-1 environmental impact
    pub env: EnvImpact,
}

/// Full projection output for one project
///
/// `cashflows[0]` is the capex outflow; indices 1..=period hold the yearly
/// net cash flows. Results are pure values: repeated calculation over the
/// same inputs compares equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResult {
    /// Per-year projection rows
    pub yearly: Vec<YearlyRecord>,

    /// Cash-flow series of length period + 1
    pub cashflows: Vec<f64>,

    /// Discounted energy over the horizon
    pub pv_energy: f64,

    /// Discounted operating cost over the horizon
    pub pv_opex: f64,

    /// Discounted revenue over the horizon
    pub pv_revenue: f64,

    /// Upfront investment
    pub total_capex: f64,

    /// Undiscounted revenue over the horizon
    pub total_revenue: f64,

    /// Undiscounted operating cost over the horizon
    pub total_opex_nominal: f64,

    /// Derived investment metrics
    pub metrics: InvestmentMetrics,
}

impl ProjectResult {
    /// Horizon length in years
    pub fn horizon(&self) -> u32 {
        self.yearly.len() as u32
    }

    /// Energy generated in the first projected year, 0 for an empty horizon
    pub fn year_one_energy(&self) -> f64 {
        self.yearly.first().map(|row| row.energy).unwrap_or(0.0)
    }
}

/// Source metadata and optional result for one project in a supplier breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBreakdown {
    /// Project label
    pub name: String,

    /// Installed capacity in kWp
    pub kwp: f64,

    /// Whether the project participated in the calculation
    pub enabled: bool,

    /// The project's own result, `None` when disabled
    pub result: Option<ProjectResult>,
}

/// Aggregated projection output for one supplier
///
/// The aggregate has the same shape as a project result: yearly rows and the
/// cash-flow series are element-wise sums over the enabled projects, the
/// cumulative series is rebuilt from the summed flows, and the metrics are
/// recomputed from the aggregate rather than averaged from children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierResult {
    /// Supplier label
    pub name: String,

    /// Installed capacity summed over enabled projects
    pub total_kwp: f64,

    /// Portfolio-level projection over the summed series
    pub aggregate: ProjectResult,

    /// Per-project results in source order, disabled projects kept as `None`
    pub projects: Vec<ProjectBreakdown>,
}

impl SupplierResult {
    /// Number of projects that contributed to the aggregate
    pub fn enabled_project_count(&self) -> usize {
        self.projects.iter().filter(|p| p.result.is_some()).count()
    }
}
