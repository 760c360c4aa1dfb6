//! Supplier-level aggregation of project projections

use crate::portfolio::Supplier;

use super::cashflows::{
    InvestmentMetrics, ProjectBreakdown, ProjectResult, SupplierResult, YearlyRecord,
};
use super::engine::ProjectionEngine;
use super::metrics;

impl ProjectionEngine {
    /// Aggregate every enabled project of a supplier into one
    /// portfolio-level result.
    ///
    /// Yearly fields and the cash-flow series are element-wise sums over the
    /// enabled projects (all series share the horizon length fixed by the
    /// global assumptions). The cumulative series is rebuilt from the summed
    /// flows, the yearly tariff is the energy-weighted average, and the
    /// metrics are recomputed from the aggregate PV sums and series rather
    /// than averaged from the children.
    ///
    /// A disabled supplier, or one with no enabled project, produces no
    /// result.
    pub fn project_supplier(&self, supplier: &Supplier) -> Option<SupplierResult> {
        if !supplier.enabled {
            return None;
        }

        // Position-preserving per-project results, None for disabled entries
        let results: Vec<Option<ProjectResult>> =
            supplier.projects.iter().map(|p| self.project(p)).collect();
        if results.iter().all(|r| r.is_none()) {
            return None;
        }

        let period = self.assumptions().period as usize;
        let mut cashflows = vec![0.0; period + 1];
        let mut yearly: Vec<YearlyRecord> =
            (1..=period).map(|t| YearlyRecord::empty(t as u32)).collect();

        let mut pv_energy = 0.0;
        let mut pv_opex = 0.0;
        let mut pv_revenue = 0.0;
        let mut total_capex = 0.0;
        let mut total_revenue = 0.0;
        let mut total_opex_nominal = 0.0;

        for result in results.iter().flatten() {
            for (slot, value) in cashflows.iter_mut().zip(&result.cashflows) {
                *slot += value;
            }
            for (agg, row) in yearly.iter_mut().zip(&result.yearly) {
                agg.energy += row.energy;
                agg.revenue += row.revenue;
                agg.opex += row.opex;
                agg.net_cashflow += row.net_cashflow;
                agg.pv_net_cashflow += row.pv_net_cashflow;
            }
            pv_energy += result.pv_energy;
            pv_opex += result.pv_opex;
            pv_revenue += result.pv_revenue;
            total_capex += result.total_capex;
            total_revenue += result.total_revenue;
            total_opex_nominal += result.total_opex_nominal;
        }

        // The aggregate tariff is revenue-weighted, and the cumulative series
        // must be re-run over the summed flows, never copied from a child
        let mut cumulative = cashflows[0];
        for (agg, flow) in yearly.iter_mut().zip(cashflows.iter().skip(1)) {
            agg.tariff = if agg.energy > 0.0 {
                agg.revenue / agg.energy
            } else {
                0.0
            };
            cumulative += flow;
            agg.cumulative_cashflow = cumulative;
        }

        let mut aggregate = ProjectResult {
            yearly,
            cashflows,
            pv_energy,
            pv_opex,
            pv_revenue,
            total_capex,
            total_revenue,
            total_opex_nominal,
            metrics: InvestmentMetrics::default(),
        };
        aggregate.metrics =
            metrics::derive(&aggregate, self.assumptions().wacc, self.env_factors());

        let projects = supplier
            .projects
            .iter()
            .zip(results)
            .map(|(project, result)| ProjectBreakdown {
                name: project.name.clone(),
                kwp: project.kwp,
                enabled: project.enabled,
                result,
            })
            .collect();

        Some(SupplierResult {
            name: supplier.name.clone(),
            total_kwp: supplier.total_kwp(),
            aggregate,
            projects,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{EnvFactors, GlobalAssumptions};
    use crate::portfolio::{OpexItem, OpexKind, Project};
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

    fn project(name: &str, kwp: f64, enabled: bool) -> Project {
        Project {
            name: name.to_string(),
            kwp,
            prod_hour: 3.65,
            capex: kwp * 35_000.0,
            utility_tariff: Some(4.5),
            ppa_discount: 10.0,
            enabled,
            opex: vec![OpexItem {
                name: "O&M".to_string(),
                kind: OpexKind::PerKwp,
                unit: 500.0,
                freq: 1.0,
            }],
        }
    }

    fn supplier(projects: Vec<Project>) -> Supplier {
        Supplier {
            name: "Supplier A".to_string(),
            enabled: true,
            projects,
        }
    }

    #[test]
    fn test_disabled_supplier_yields_no_result() {
        let engine = ProjectionEngine::new(test_assumptions(), EnvFactors::default());
        let mut s = supplier(vec![project("a", 100.0, true)]);
        s.enabled = false;
        assert!(engine.project_supplier(&s).is_none());
    }

    #[test]
    fn test_no_enabled_projects_yields_no_result() {
        let engine = ProjectionEngine::new(test_assumptions(), EnvFactors::default());
        let s = supplier(vec![project("a", 100.0, false), project("b", 50.0, false)]);
        assert!(engine.project_supplier(&s).is_none());

        let empty = supplier(vec![]);
        assert!(engine.project_supplier(&empty).is_none());
    }

    #[test]
    fn test_single_project_aggregate_matches_project() {
        let engine = ProjectionEngine::new(test_assumptions(), EnvFactors::default());
        let p = project("only", 100.0, true);
        let own = engine.project(&p).unwrap();
        let s = supplier(vec![p]);
        let result = engine.project_supplier(&s).unwrap();

        assert_eq!(result.total_kwp, 100.0);
        assert_eq!(result.projects.len(), 1);
        assert_eq!(result.projects[0].result.as_ref().unwrap(), &own);

        // Sums over a single child reproduce it exactly; the tariff is
        // re-derived as revenue/energy, equal up to rounding
        let agg = &result.aggregate;
        assert_eq!(agg.cashflows, own.cashflows);
        assert_eq!(agg.pv_energy, own.pv_energy);
        assert_eq!(agg.pv_opex, own.pv_opex);
        assert_eq!(agg.pv_revenue, own.pv_revenue);
        assert_eq!(agg.total_capex, own.total_capex);
        assert_eq!(agg.total_revenue, own.total_revenue);
        assert_eq!(agg.total_opex_nominal, own.total_opex_nominal);
        assert_eq!(agg.metrics, own.metrics);
        for (a, o) in agg.yearly.iter().zip(&own.yearly) {
            assert_eq!(a.year, o.year);
            assert_eq!(a.energy, o.energy);
            assert_eq!(a.revenue, o.revenue);
            assert_eq!(a.opex, o.opex);
            assert_eq!(a.net_cashflow, o.net_cashflow);
            assert_eq!(a.pv_net_cashflow, o.pv_net_cashflow);
            assert_eq!(a.cumulative_cashflow, o.cumulative_cashflow);
            assert_relative_eq!(a.tariff, o.tariff, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_two_projects_sum_elementwise() {
        let engine = ProjectionEngine::new(test_assumptions(), EnvFactors::default());
        let a = project("a", 100.0, true);
        let b = project("b", 40.0, true);
        let ra = engine.project(&a).unwrap();
        let rb = engine.project(&b).unwrap();

        let result = engine.project_supplier(&supplier(vec![a, b])).unwrap();
        let agg = &result.aggregate;

        assert_eq!(result.total_kwp, 140.0);
        assert_eq!(agg.cashflows.len(), 21);
        for (i, flow) in agg.cashflows.iter().enumerate() {
            assert_eq!(*flow, ra.cashflows[i] + rb.cashflows[i]);
        }
        for (i, row) in agg.yearly.iter().enumerate() {
            assert_eq!(row.energy, ra.yearly[i].energy + rb.yearly[i].energy);
            assert_eq!(row.revenue, ra.yearly[i].revenue + rb.yearly[i].revenue);
            assert_eq!(row.opex, ra.yearly[i].opex + rb.yearly[i].opex);
        }
    }

    #[test]
    fn test_disabled_project_keeps_slot_in_breakdown() {
        let engine = ProjectionEngine::new(test_assumptions(), EnvFactors::default());
        let s = supplier(vec![
            project("a", 100.0, true),
            project("b", 40.0, false),
            project("c", 60.0, true),
        ]);
        let result = engine.project_supplier(&s).unwrap();

        assert_eq!(result.projects.len(), 3);
        assert!(result.projects[0].result.is_some());
        assert!(result.projects[1].result.is_none());
        assert!(result.projects[2].result.is_some());
        assert_eq!(result.projects[1].name, "b");
        assert_eq!(result.projects[1].kwp, 40.0);

        // Disabled capacity stays out of the aggregate
        assert_eq!(result.total_kwp, 160.0);
        assert_eq!(result.enabled_project_count(), 2);
    }

    #[test]
    fn test_aggregate_tariff_is_energy_weighted() {
        // Two projects selling at different prices: the aggregate tariff
        // must sit between them, weighted by generated energy
        let assumptions = GlobalAssumptions {
            period: 5,
            wacc: 6.0,
            degradation: 0.0,
            tariff_escalation: 0.0,
            opex_inflation: 0.0,
        };
        let engine = ProjectionEngine::new(assumptions, EnvFactors::default());

        let mut cheap = project("cheap", 100.0, true);
        cheap.ppa_discount = 50.0; // sells at 2.25
        let mut dear = project("dear", 300.0, true);
        dear.ppa_discount = 0.0; // sells at 4.5

        let result = engine.project_supplier(&supplier(vec![cheap, dear])).unwrap();
        let y1 = &result.aggregate.yearly[0];

        // 100 kWp at 2.25 and 300 kWp at 4.5, same production hours:
        // weighted tariff = (100*2.25 + 300*4.5) / 400
        let expected = (100.0 * 2.25 + 300.0 * 4.5) / 400.0;
        assert_relative_eq!(y1.tariff, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_aggregate_cumulative_rebuilt_from_summed_flows() {
        let engine = ProjectionEngine::new(test_assumptions(), EnvFactors::default());
        let s = supplier(vec![project("a", 100.0, true), project("b", 40.0, true)]);
        let result = engine.project_supplier(&s).unwrap();
        let agg = &result.aggregate;

        let mut running = agg.cashflows[0];
        for (row, flow) in agg.yearly.iter().zip(agg.cashflows.iter().skip(1)) {
            running += *flow;
            assert_eq!(row.cumulative_cashflow, running);
        }
    }

    #[test]
    fn test_supplier_repeat_calls_are_deterministic() {
        let engine = ProjectionEngine::new(test_assumptions(), EnvFactors::default());
        let s = supplier(vec![project("a", 100.0, true), project("b", 40.0, false)]);

        let first = engine.project_supplier(&s).unwrap();
        let second = engine.project_supplier(&s).unwrap();
        assert_eq!(first, second);
    }
}
