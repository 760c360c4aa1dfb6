//! Financial metric routines shared by project and supplier projections
//!
//! All functions here are pure: deterministic over their numeric inputs, no
//! I/O, no hidden state. Degenerate denominators (no energy, no capex, no
//! financing outflow) report 0 instead of raising, since the engine is
//! invoked continuously while inputs are being edited.

use crate::assumptions::EnvFactors;

use super::cashflows::{EnvImpact, InvestmentMetrics, ProjectResult};

const IRR_INITIAL_GUESS: f64 = 0.10;
const IRR_MAX_ITERATIONS: usize = 100;
const IRR_RATE_TOLERANCE: f64 = 1e-5;
const IRR_DERIVATIVE_FLOOR: f64 = 1e-6;

/// Levelized-cost decomposition over discounted energy
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LcoeBreakdown {
    pub lcoe_capex: f64,
    pub lcoe_opex: f64,
    pub lcoe: f64,
    pub avg_tariff: f64,
    pub profit_margin: f64,
}

/// Decompose the levelized cost of electricity into its capex and opex
/// shares, per discounted kWh. A horizon that produces no discounted energy
/// reports all fields as 0.
pub fn lcoe_breakdown(
    total_capex: f64,
    pv_opex: f64,
    pv_revenue: f64,
    pv_energy: f64,
) -> LcoeBreakdown {
    if pv_energy <= 0.0 {
        return LcoeBreakdown::default();
    }

    let lcoe_capex = total_capex / pv_energy;
    let lcoe_opex = pv_opex / pv_energy;
    let lcoe = lcoe_capex + lcoe_opex;
    let avg_tariff = pv_revenue / pv_energy;

    LcoeBreakdown {
        lcoe_capex,
        lcoe_opex,
        lcoe,
        avg_tariff,
        profit_margin: avg_tariff - lcoe,
    }
}

/// Fractional payback period in years over an annual cash-flow series
/// (index 0 = initial outflow).
///
/// Walks forward tracking the running cumulative. At the first year it turns
/// non-negative the crossing is interpolated within that year, unless the
/// year's own flow is non-positive (nothing to interpolate against), in which
/// case the whole-year index is reported. A series that never recovers
/// reports `period + 1`.
pub fn payback_years(cashflows: &[f64]) -> f64 {
    let period = cashflows.len().saturating_sub(1);
    let mut cumulative = cashflows.first().copied().unwrap_or(0.0);

    for year in 1..=period {
        let flow = cashflows[year];
        let previous = cumulative;
        cumulative += flow;

        if cumulative >= 0.0 {
            if flow <= 0.0 {
                return year as f64;
            }
            return (year - 1) as f64 + previous.abs() / flow;
        }
    }

    (period + 1) as f64
}

/// Internal rate of return in percent, via Newton-Raphson on the NPV of an
/// annual cash-flow series.
///
/// Starts from a 10% guess and iterates up to 100 times, accepting the rate
/// once successive guesses differ by less than 1e-5. A near-zero NPV
/// derivative stalls the iteration and reports 0.
pub fn irr_pct(cashflows: &[f64]) -> f64 {
    let mut rate = IRR_INITIAL_GUESS;

    for _ in 0..IRR_MAX_ITERATIONS {
        let (npv, dnpv) = npv_and_derivative(cashflows, rate);

        if dnpv.abs() < IRR_DERIVATIVE_FLOOR {
            return 0.0;
        }

        let next = rate - npv / dnpv;
        if (next - rate).abs() < IRR_RATE_TOLERANCE {
            return next * 100.0;
        }

        rate = next;
    }

    rate * 100.0
}

/// NPV of the series at `rate` and its derivative with respect to the rate
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        npv += cf / (1.0 + rate).powi(t as i32);
        if t > 0 {
            dnpv -= (t as f64) * cf / (1.0 + rate).powi(t as i32 + 1);
        }
    }

    (npv, dnpv)
}

/// Net present value from the three PV aggregates: discounted revenue less
/// upfront investment and discounted operating cost.
pub fn npv(pv_revenue: f64, pv_opex: f64, total_capex: f64) -> f64 {
    pv_revenue - (total_capex + pv_opex)
}

/// Undiscounted return on investment in percent over the whole horizon.
/// Reports 0 when there was no investment.
pub fn roi_pct(total_revenue: f64, total_opex_nominal: f64, total_capex: f64) -> f64 {
    if total_capex == 0.0 {
        return 0.0;
    }
    (total_revenue - total_opex_nominal - total_capex) / total_capex * 100.0
}

/// Modified internal rate of return in percent.
///
/// Non-negative flows are compounded forward to the final year at the
/// discount rate, negative flows discounted back to year 0 at the same rate.
/// Reports 0 when there is no financing outflow to measure against.
pub fn mirr_pct(cashflows: &[f64], wacc_pct: f64) -> f64 {
    let period = cashflows.len().saturating_sub(1);
    if period == 0 {
        return 0.0;
    }

    let rate = 1.0 + wacc_pct / 100.0;
    let mut fv_positive = 0.0;
    let mut pv_negative = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        if cf >= 0.0 {
            fv_positive += cf * rate.powi((period - t) as i32);
        } else {
            pv_negative += -cf / rate.powi(t as i32);
        }
    }

    if pv_negative == 0.0 {
        return 0.0;
    }

    ((fv_positive / pv_negative).powf(1.0 / period as f64) - 1.0) * 100.0
}

/// Year-1 environmental impact from generated energy
pub fn env_impact(year_one_energy: f64, factors: &EnvFactors) -> EnvImpact {
    let co2_kg_per_year = year_one_energy * factors.co2_per_kwh;
    let tree_equivalent = if factors.co2_per_tree > 0.0 {
        co2_kg_per_year / factors.co2_per_tree
    } else {
        0.0
    };

    EnvImpact {
        co2_kg_per_year,
        tree_equivalent,
    }
}

/// Derive the full metric block for a projection result from its PV
/// aggregates and cash-flow series.
pub fn derive(result: &ProjectResult, wacc_pct: f64, factors: &EnvFactors) -> InvestmentMetrics {
    let lcoe = lcoe_breakdown(
        result.total_capex,
        result.pv_opex,
        result.pv_revenue,
        result.pv_energy,
    );

    InvestmentMetrics {
        lcoe_capex: lcoe.lcoe_capex,
        lcoe_opex: lcoe.lcoe_opex,
        lcoe: lcoe.lcoe,
        avg_tariff: lcoe.avg_tariff,
        profit_margin: lcoe.profit_margin,
        payback_years: payback_years(&result.cashflows),
        irr_pct: irr_pct(&result.cashflows),
        npv: npv(result.pv_revenue, result.pv_opex, result.total_capex),
        roi_pct: roi_pct(
            result.total_revenue,
            result.total_opex_nominal,
            result.total_capex,
        ),
        mirr_pct: mirr_pct(&result.cashflows, wacc_pct),
        env: env_impact(result.year_one_energy(), factors),
    }
}
