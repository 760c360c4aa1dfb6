//! Core projection engine for yearly project cash-flow projections

use crate::assumptions::{EnvFactors, GlobalAssumptions};
use crate::portfolio::Project;

use super::cashflows::{InvestmentMetrics, ProjectResult, YearlyRecord};
use super::metrics;

/// Main projection engine
///
/// Holds an immutable snapshot of the global assumptions and environmental
/// factors. Inputs are never retained across calls: every projection is a
/// pure function of the project passed in and the snapshot taken at
/// construction, so repeated calls with unchanged inputs yield equal results.
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    assumptions: GlobalAssumptions,
    env_factors: EnvFactors,
}

impl ProjectionEngine {
    /// Create a new engine over an assumption snapshot
    pub fn new(assumptions: GlobalAssumptions, env_factors: EnvFactors) -> Self {
        Self {
            assumptions,
            env_factors,
        }
    }

    /// The assumption snapshot this engine was built with
    pub fn assumptions(&self) -> &GlobalAssumptions {
        &self.assumptions
    }

    /// The environmental factors this engine was built with
    pub fn env_factors(&self) -> &EnvFactors {
        &self.env_factors
    }

    /// Project one project's yearly cash flows and derived metrics.
    ///
    /// Disabled projects are excluded from calculation and produce no result.
    pub fn project(&self, project: &Project) -> Option<ProjectResult> {
        if !project.enabled {
            return None;
        }

        let g = &self.assumptions;
        let period = g.period as usize;

        let e1 = project.year_one_energy();
        let sell_y1 = project.ppa_price();

        let discount = 1.0 + g.wacc / 100.0;
        let retention = 1.0 - g.degradation / 100.0;
        let escalation = 1.0 + g.tariff_escalation / 100.0;
        let inflation = 1.0 + g.opex_inflation / 100.0;

        let mut yearly = Vec::with_capacity(period);
        let mut cashflows = Vec::with_capacity(period + 1);
        cashflows.push(-project.capex);

        let mut pv_energy = 0.0;
        let mut pv_opex = 0.0;
        let mut pv_revenue = 0.0;
        let mut total_revenue = 0.0;
        let mut total_opex_nominal = 0.0;
        let mut cumulative = -project.capex;

        for t in 1..=period {
            let df = discount.powi(-(t as i32));
            let energy = e1 * retention.powi(t as i32 - 1);

            // Opex inflation compounds on the summed per-item base, uniformly
            // across item kinds
            let opex_base: f64 = project
                .opex
                .iter()
                .map(|item| item.annual_base(project.kwp, energy))
                .sum();
            let opex = opex_base * inflation.powi(t as i32 - 1);

            let tariff = sell_y1 * escalation.powi(t as i32 - 1);
            let revenue = energy * tariff;
            let net_cashflow = revenue - opex;

            pv_energy += energy * df;
            pv_opex += opex * df;
            pv_revenue += revenue * df;
            total_revenue += revenue;
            total_opex_nominal += opex;
            cumulative += net_cashflow;
            cashflows.push(net_cashflow);

            yearly.push(YearlyRecord {
                year: t as u32,
                energy,
                tariff,
                revenue,
                opex,
                net_cashflow,
                pv_net_cashflow: net_cashflow * df,
                cumulative_cashflow: cumulative,
            });
        }

        let mut result = ProjectResult {
            yearly,
            cashflows,
            pv_energy,
            pv_opex,
            pv_revenue,
            total_capex: project.capex,
            total_revenue,
            total_opex_nominal,
            metrics: InvestmentMetrics::default(),
        };
        result.metrics = metrics::derive(&result, g.wacc, &self.env_factors);

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::{OpexItem, OpexKind};
    use approx::assert_relative_eq;

    fn test_assumptions() -> GlobalAssumptions {
        GlobalAssumptions {
            period: 20,
            wacc: 6.0,
            degradation: 0.5,
            tariff_escalation: 2.0,
            opex_inflation: 2.0,
        }
    }

    fn test_project() -> Project {
        Project {
            name: "Rooftop 100".to_string(),
            kwp: 100.0,
            prod_hour: 3.65,
            capex: 3_500_000.0,
            utility_tariff: Some(4.5),
            ppa_discount: 10.0,
            enabled: true,
            opex: vec![OpexItem {
                name: "O&M".to_string(),
                kind: OpexKind::PerKwp,
                unit: 500.0,
                freq: 1.0,
            }],
        }
    }

    #[test]
    fn test_reference_first_year() {
        let engine = ProjectionEngine::new(test_assumptions(), EnvFactors::default());
        let result = engine.project(&test_project()).unwrap();

        assert_eq!(result.yearly.len(), 20);
        assert_eq!(result.cashflows.len(), 21);
        assert_eq!(result.cashflows[0], -3_500_000.0);

        let y1 = &result.yearly[0];
        assert_eq!(y1.energy, 133_225.0);
        assert_relative_eq!(y1.tariff, 4.05, max_relative = 1e-12);
        assert_relative_eq!(y1.revenue, 539_561.25, max_relative = 1e-12);
        assert_eq!(y1.opex, 50_000.0);
        assert_relative_eq!(y1.net_cashflow, 489_561.25, max_relative = 1e-12);
    }

    #[test]
    fn test_degradation_and_escalation_compound() {
        let engine = ProjectionEngine::new(test_assumptions(), EnvFactors::default());
        let result = engine.project(&test_project()).unwrap();

        let y3 = &result.yearly[2];
        assert_relative_eq!(y3.energy, 133_225.0 * 0.995_f64.powi(2), max_relative = 1e-12);
        assert_relative_eq!(y3.tariff, 4.05 * 1.02_f64.powi(2), max_relative = 1e-12);
        assert_relative_eq!(y3.opex, 50_000.0 * 1.02_f64.powi(2), max_relative = 1e-12);
    }

    #[test]
    fn test_disabled_project_yields_no_result() {
        let engine = ProjectionEngine::new(test_assumptions(), EnvFactors::default());
        let mut project = test_project();
        project.enabled = false;
        assert!(engine.project(&project).is_none());
    }

    #[test]
    fn test_free_project_net_equals_revenue() {
        // No capex, no opex, no drift: every year's net cash flow is its
        // revenue and the investment pays back immediately
        let assumptions = GlobalAssumptions {
            period: 10,
            wacc: 6.0,
            degradation: 0.0,
            tariff_escalation: 0.0,
            opex_inflation: 0.0,
        };
        let project = Project {
            name: "free".to_string(),
            kwp: 50.0,
            prod_hour: 4.0,
            capex: 0.0,
            utility_tariff: Some(4.5),
            ppa_discount: 0.0,
            enabled: true,
            opex: vec![],
        };

        let engine = ProjectionEngine::new(assumptions, EnvFactors::default());
        let result = engine.project(&project).unwrap();

        for row in &result.yearly {
            assert_eq!(row.net_cashflow, row.revenue);
            assert!(row.revenue > 0.0);
        }
        assert!(result.metrics.payback_years <= 1.0);
    }

    #[test]
    fn test_cumulative_matches_series_sum() {
        let engine = ProjectionEngine::new(test_assumptions(), EnvFactors::default());
        let result = engine.project(&test_project()).unwrap();

        let expected: f64 = result.cashflows[0] + result.cashflows[1..].iter().sum::<f64>();
        let last = result.yearly.last().unwrap();
        assert_eq!(last.cumulative_cashflow, expected);
    }

    #[test]
    fn test_zero_capacity_degenerates_to_zero_lcoe() {
        let mut project = test_project();
        project.kwp = 0.0;
        project.opex = vec![];

        let engine = ProjectionEngine::new(test_assumptions(), EnvFactors::default());
        let result = engine.project(&project).unwrap();

        assert_eq!(result.pv_energy, 0.0);
        assert_eq!(result.metrics.lcoe_capex, 0.0);
        assert_eq!(result.metrics.lcoe_opex, 0.0);
        assert_eq!(result.metrics.lcoe, 0.0);
        assert_eq!(result.metrics.avg_tariff, 0.0);
        assert_eq!(result.metrics.profit_margin, 0.0);
    }

    #[test]
    fn test_repeat_calls_are_deterministic() {
        let engine = ProjectionEngine::new(test_assumptions(), EnvFactors::default());
        let project = test_project();

        let first = engine.project(&project).unwrap();
        let second = engine.project(&project).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_env_impact_from_year_one_energy() {
        let factors = EnvFactors {
            co2_per_kwh: 0.5,
            co2_per_tree: 22.0,
        };
        let engine = ProjectionEngine::new(test_assumptions(), factors);
        let result = engine.project(&test_project()).unwrap();

        assert_eq!(result.metrics.env.co2_kg_per_year, 133_225.0 * 0.5);
    }
}
