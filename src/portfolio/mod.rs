//! Supplier and project data structures and portfolio import

mod data;
pub mod loader;

pub use data::{OpexItem, OpexKind, Project, Supplier};
pub use loader::{
    load_portfolio, load_projects_csv, portfolio_from_str, save_portfolio, ImportError,
    PortfolioFile, PORTFOLIO_FORMAT_VERSION,
};
