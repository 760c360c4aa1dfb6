//! Portfolio runner for batch supplier projections
//!
//! Wraps a projection engine so a whole supplier list can be recomputed on
//! every input change. Suppliers are independent snapshots, so portfolio
//! runs parallelize across them without any shared state.

use rayon::prelude::*;

use crate::assumptions::{EnvFactors, GlobalAssumptions};
use crate::portfolio::Supplier;
use crate::projection::{ProjectionEngine, SupplierResult};

/// Pre-configured runner for whole-portfolio recomputation
///
/// # Example
/// ```ignore
/// let runner = PortfolioRunner::new(global);
/// let results = runner.run_portfolio(&suppliers);
/// ```
#[derive(Debug, Clone)]
pub struct PortfolioRunner {
    engine: ProjectionEngine,
}

impl PortfolioRunner {
    /// Create a runner with default environmental factors
    pub fn new(assumptions: GlobalAssumptions) -> Self {
        Self {
            engine: ProjectionEngine::new(assumptions, EnvFactors::default()),
        }
    }

    /// Create a runner with explicit environmental factors
    pub fn with_env_factors(assumptions: GlobalAssumptions, env_factors: EnvFactors) -> Self {
        Self {
            engine: ProjectionEngine::new(assumptions, env_factors),
        }
    }

    /// Run a single supplier
    pub fn run(&self, supplier: &Supplier) -> Option<SupplierResult> {
        self.engine.project_supplier(supplier)
    }

    /// Run every supplier in order, keeping `None` slots for disabled ones
    pub fn run_portfolio(&self, suppliers: &[Supplier]) -> Vec<Option<SupplierResult>> {
        suppliers
            .iter()
            .map(|s| self.engine.project_supplier(s))
            .collect()
    }

    /// Parallel portfolio run. Suppliers are independent, so the
    /// order-preserving parallel map returns exactly what the sequential
    /// run would.
    pub fn run_portfolio_par(&self, suppliers: &[Supplier]) -> Vec<Option<SupplierResult>> {
        suppliers
            .par_iter()
            .map(|s| self.engine.project_supplier(s))
            .collect()
    }

    /// The underlying engine, for single-project calls
    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }
}
