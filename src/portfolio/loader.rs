//! Portfolio document import and export
//!
//! The engine assumes well-formed numeric input; everything malformed is
//! rejected here at the boundary. Two formats are supported: the JSON
//! portfolio document `{version, global, suppliers}` and a flat projects CSV
//! with one row per project.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assumptions::GlobalAssumptions;
use crate::portfolio::{OpexItem, OpexKind, Project, Supplier};

/// Portfolio document version this build reads and writes
pub const PORTFOLIO_FORMAT_VERSION: u32 = 1;

/// Errors raised while importing a portfolio document
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read portfolio file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed portfolio document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed projects CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("unsupported portfolio format version {0}")]
    UnsupportedVersion(u32),

    #[error("invalid portfolio data: {0}")]
    Invalid(String),
}

/// External portfolio document: global assumptions plus the supplier list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioFile {
    pub version: u32,
    pub global: GlobalAssumptions,
    pub suppliers: Vec<Supplier>,
}

/// Parse and validate a portfolio document from a JSON string
pub fn portfolio_from_str(text: &str) -> Result<PortfolioFile, ImportError> {
    let file: PortfolioFile = serde_json::from_str(text)?;
    validate(&file)?;
    Ok(file)
}

/// Load a portfolio document from a JSON file
pub fn load_portfolio<P: AsRef<Path>>(path: P) -> Result<PortfolioFile, ImportError> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let file = portfolio_from_str(&text)?;

    info!(
        "loaded portfolio: {} suppliers, {} projects",
        file.suppliers.len(),
        file.suppliers.iter().map(|s| s.projects.len()).sum::<usize>(),
    );
    Ok(file)
}

/// Write a portfolio document as pretty-printed JSON
pub fn save_portfolio<P: AsRef<Path>>(path: P, file: &PortfolioFile) -> Result<(), ImportError> {
    let mut out = File::create(path)?;
    serde_json::to_writer_pretty(&mut out, file)?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Reject documents the engine would mishandle: wrong version, empty
/// horizon, or projects violating the capacity and production invariants
fn validate(file: &PortfolioFile) -> Result<(), ImportError> {
    if file.version != PORTFOLIO_FORMAT_VERSION {
        return Err(ImportError::UnsupportedVersion(file.version));
    }
    if file.global.period < 1 {
        return Err(ImportError::Invalid(
            "projection period must be at least 1 year".to_string(),
        ));
    }

    for supplier in &file.suppliers {
        for project in &supplier.projects {
            let label = format!("{}/{}", supplier.name, project.name);
            if !(project.kwp > 0.0) {
                return Err(ImportError::Invalid(format!(
                    "{label}: kwp must be positive"
                )));
            }
            if !(project.prod_hour > 0.0) {
                return Err(ImportError::Invalid(format!(
                    "{label}: prodHour must be positive"
                )));
            }
            if !(project.capex >= 0.0) {
                return Err(ImportError::Invalid(format!(
                    "{label}: capex must not be negative"
                )));
            }
        }
    }

    Ok(())
}

fn default_true() -> bool {
    true
}

/// Raw CSV row, one project per line with supplier grouping by name
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Supplier")]
    supplier: String,
    #[serde(rename = "Project")]
    project: String,
    #[serde(rename = "Enabled", default = "default_true")]
    enabled: bool,
    #[serde(rename = "kWp")]
    kwp: f64,
    #[serde(rename = "ProdHour")]
    prod_hour: f64,
    #[serde(rename = "Capex")]
    capex: f64,
    #[serde(rename = "UtilityTariff", default)]
    utility_tariff: Option<f64>,
    #[serde(rename = "PpaDiscount", default)]
    ppa_discount: f64,
    #[serde(rename = "OmPerKwp", default)]
    om_per_kwp: Option<f64>,
}

impl CsvRow {
    fn to_project(&self) -> Project {
        let opex = match self.om_per_kwp {
            Some(unit) => vec![OpexItem {
                name: "O&M".to_string(),
                kind: OpexKind::PerKwp,
                unit,
                freq: 1.0,
            }],
            None => vec![],
        };

        Project {
            name: self.project.clone(),
            kwp: self.kwp,
            prod_hour: self.prod_hour,
            capex: self.capex,
            utility_tariff: self.utility_tariff,
            ppa_discount: self.ppa_discount,
            enabled: self.enabled,
            opex,
        }
    }
}

/// Load suppliers from a flat projects CSV, grouping rows by supplier name
/// in first-seen order. All suppliers load as enabled; row order within a
/// supplier is preserved.
pub fn load_projects_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Supplier>, ImportError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut suppliers: Vec<Supplier> = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        let project = row.to_project();

        if !(project.kwp > 0.0) || !(project.prod_hour > 0.0) {
            return Err(ImportError::Invalid(format!(
                "{}/{}: kWp and ProdHour must be positive",
                row.supplier, row.project
            )));
        }

        match suppliers.iter_mut().find(|s| s.name == row.supplier) {
            Some(supplier) => supplier.projects.push(project),
            None => suppliers.push(Supplier {
                name: row.supplier.clone(),
                enabled: true,
                projects: vec![project],
            }),
        }
    }

    info!("loaded {} suppliers from CSV", suppliers.len());
    Ok(suppliers)
}
