//! Supplier and project data structures matching the portfolio document format

use serde::{Deserialize, Serialize};

use crate::assumptions::DEFAULT_UTILITY_TARIFF;

fn default_enabled() -> bool {
    true
}

fn default_freq() -> f64 {
    1.0
}

/// How an annual operating-cost item scales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpexKind {
    /// Rate per installed kWp, times the item frequency
    PerKwp,
    /// Fixed annual amount
    Flat,
    /// Rate per kWh generated in that year
    PerKwh,
}

/// One annual operating-cost component, before inflation is applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpexItem {
    /// Display label
    pub name: String,

    /// Scaling rule for this item
    #[serde(rename = "type")]
    pub kind: OpexKind,

    /// Numeric rate in the unit implied by `kind`
    pub unit: f64,

    /// Occurrences per year, defaults to 1
    #[serde(default = "default_freq")]
    pub freq: f64,
}

impl OpexItem {
    /// Annual cost contribution before inflation, given the project's
    /// capacity and the year's energy output.
    pub fn annual_base(&self, kwp: f64, energy: f64) -> f64 {
        match self.kind {
            OpexKind::PerKwp => self.unit * kwp * self.freq,
            OpexKind::Flat => self.unit,
            OpexKind::PerKwh => self.unit * energy,
        }
    }
}

/// A single solar project within a supplier's portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Display label
    pub name: String,

    /// Installed capacity in kWp
    pub kwp: f64,

    /// Equivalent full-load production hours per day
    pub prod_hour: f64,

    /// Upfront investment
    pub capex: f64,

    /// Baseline grid tariff; missing or non-finite values fall back to
    /// [`DEFAULT_UTILITY_TARIFF`]
    #[serde(default)]
    pub utility_tariff: Option<f64>,

    /// Percent discount off the utility tariff fixing the year-1 sale price
    pub ppa_discount: f64,

    /// Disabled projects are excluded from calculation and yield no result
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Ordered operating-cost schedule
    #[serde(default)]
    pub opex: Vec<OpexItem>,
}

impl Project {
    /// First-year energy yield in kWh
    pub fn year_one_energy(&self) -> f64 {
        self.kwp * self.prod_hour * 365.0
    }

    /// Baseline tariff with the non-finite fallback applied
    pub fn effective_utility_tariff(&self) -> f64 {
        match self.utility_tariff {
            Some(t) if t.is_finite() => t,
            _ => DEFAULT_UTILITY_TARIFF,
        }
    }

    /// Year-1 sale price after the negotiated PPA discount
    pub fn ppa_price(&self) -> f64 {
        self.effective_utility_tariff() * (1.0 - self.ppa_discount / 100.0)
    }
}

/// A supplier owning an ordered list of projects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    /// Display label
    pub name: String,

    /// Disabled suppliers yield no result
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Ordered project list
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Supplier {
    /// Installed capacity summed over enabled projects
    pub fn total_kwp(&self) -> f64 {
        self.projects
            .iter()
            .filter(|p| p.enabled)
            .map(|p| p.kwp)
            .sum()
    }

    /// Number of projects that participate in calculation
    pub fn enabled_project_count(&self) -> usize {
        self.projects.iter().filter(|p| p.enabled).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(kind: OpexKind, unit: f64, freq: f64) -> OpexItem {
        OpexItem {
            name: "test".to_string(),
            kind,
            unit,
            freq,
        }
    }

    #[test]
    fn test_opex_item_scaling() {
        assert_eq!(item(OpexKind::PerKwp, 500.0, 1.0).annual_base(100.0, 0.0), 50_000.0);
        assert_eq!(item(OpexKind::PerKwp, 500.0, 2.0).annual_base(100.0, 0.0), 100_000.0);
        assert_eq!(item(OpexKind::Flat, 1200.0, 1.0).annual_base(100.0, 99.0), 1200.0);
        assert_eq!(item(OpexKind::PerKwh, 0.1, 1.0).annual_base(100.0, 50_000.0), 5000.0);
    }

    #[test]
    fn test_tariff_fallback() {
        let mut project = Project {
            name: "p".to_string(),
            kwp: 100.0,
            prod_hour: 3.65,
            capex: 0.0,
            utility_tariff: None,
            ppa_discount: 0.0,
            enabled: true,
            opex: vec![],
        };
        assert_eq!(project.effective_utility_tariff(), DEFAULT_UTILITY_TARIFF);

        project.utility_tariff = Some(f64::NAN);
        assert_eq!(project.effective_utility_tariff(), DEFAULT_UTILITY_TARIFF);

        project.utility_tariff = Some(f64::INFINITY);
        assert_eq!(project.effective_utility_tariff(), DEFAULT_UTILITY_TARIFF);

        project.utility_tariff = Some(3.8);
        assert_eq!(project.effective_utility_tariff(), 3.8);
    }

    #[test]
    fn test_ppa_price_discount() {
        let project = Project {
            name: "p".to_string(),
            kwp: 100.0,
            prod_hour: 3.65,
            capex: 0.0,
            utility_tariff: Some(4.5),
            ppa_discount: 10.0,
            enabled: true,
            opex: vec![],
        };
        assert_eq!(project.ppa_price(), 4.05);
        assert_eq!(project.year_one_energy(), 133_225.0);
    }

    #[test]
    fn test_opex_kind_tags() {
        let json = serde_json::to_string(&OpexKind::PerKwp).unwrap();
        assert_eq!(json, "\"per_kwp\"");
        let kind: OpexKind = serde_json::from_str("\"per_kwh\"").unwrap();
        assert_eq!(kind, OpexKind::PerKwh);
    }

    #[test]
    fn test_total_kwp_skips_disabled() {
        let supplier = Supplier {
            name: "s".to_string(),
            enabled: true,
            projects: vec![
                Project {
                    name: "a".to_string(),
                    kwp: 100.0,
                    prod_hour: 4.0,
                    capex: 0.0,
                    utility_tariff: None,
                    ppa_discount: 0.0,
                    enabled: true,
                    opex: vec![],
                },
                Project {
                    name: "b".to_string(),
                    kwp: 250.0,
                    prod_hour: 4.0,
                    capex: 0.0,
                    utility_tariff: None,
                    ppa_discount: 0.0,
                    enabled: false,
                    opex: vec![],
                },
            ],
        };
        assert_eq!(supplier.total_kwp(), 100.0);
        assert_eq!(supplier.enabled_project_count(), 1);
    }
}
