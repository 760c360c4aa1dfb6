//! Solar Portfolio - LCOE, PPA pricing and investment-return engine for
//! multi-project solar portfolios
//!
//! This library provides:
//! - Per-project discounted cash-flow projections over a configurable horizon
//! - Supplier-level aggregation with metrics recomputed from summed flows
//! - Financial metrics (LCOE decomposition, IRR, MIRR, NPV, ROI, payback)
//! - Portfolio document import (JSON and CSV) and batch parallel runs

pub mod assumptions;
pub mod portfolio;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use assumptions::{EnvFactors, GlobalAssumptions};
pub use portfolio::{OpexItem, OpexKind, Project, Supplier};
pub use projection::{
    InvestmentMetrics, ProjectionEngine, ProjectResult, SupplierResult, YearlyRecord,
};
pub use scenario::PortfolioRunner;
