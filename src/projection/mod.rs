//! Projection engine for single-project and supplier-level calculations

mod aggregate;
mod cashflows;
mod engine;
pub mod metrics;

pub use cashflows::{
    EnvImpact, InvestmentMetrics, ProjectBreakdown, ProjectResult, SupplierResult, YearlyRecord,
};
pub use engine::ProjectionEngine;
