//! Rank a portfolio's suppliers against each other on a chosen metric
//!
//! Usage: cargo run --bin compare_suppliers -- portfolio.json --sort-by irr

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use solar_portfolio::portfolio::load_portfolio;
use solar_portfolio::{PortfolioRunner, SupplierResult};

#[derive(Parser)]
#[command(about = "Rank suppliers in a portfolio document by a derived metric")]
struct Args {
    /// Portfolio document (JSON)
    input: PathBuf,

    /// Metric to rank by
    #[arg(long, value_enum, default_value = "irr")]
    sort_by: SortKey,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortKey {
    /// Internal rate of return, highest first
    Irr,
    /// Net present value, highest first
    Npv,
    /// Levelized cost of electricity, lowest first
    Lcoe,
    /// Payback period, shortest first
    Payback,
    /// Return on investment, highest first
    Roi,
}

impl SortKey {
    /// Ranking score; ascending sort puts the best supplier first
    fn score(&self, result: &SupplierResult) -> f64 {
        let m = &result.aggregate.metrics;
        match self {
            SortKey::Irr => -m.irr_pct,
            SortKey::Npv => -m.npv,
            SortKey::Lcoe => m.lcoe,
            SortKey::Payback => m.payback_years,
            SortKey::Roi => -m.roi_pct,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let file = load_portfolio(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;

    let period = file.global.period;
    let runner = PortfolioRunner::new(file.global);
    let results = runner.run_portfolio_par(&file.suppliers);

    let mut ranked: Vec<&SupplierResult> = results.iter().flatten().collect();
    let skipped = results.len() - ranked.len();
    ranked.sort_by(|a, b| {
        args.sort_by
            .score(a)
            .partial_cmp(&args.sort_by.score(b))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    println!(
        "{:>4} {:<24} {:>9} {:>8} {:>9} {:>14} {:>8} {:>9}",
        "Rank", "Supplier", "kWp", "IRR %", "LCOE", "NPV", "ROI %", "Payback"
    );
    println!("{}", "-".repeat(92));

    for (rank, result) in ranked.iter().enumerate() {
        let m = &result.aggregate.metrics;
        let payback = if m.payback_years > period as f64 {
            format!("> {period}")
        } else {
            format!("{:.2}", m.payback_years)
        };
        println!(
            "{:>4} {:<24} {:>9.1} {:>8.2} {:>9.4} {:>14.2} {:>8.2} {:>9}",
            rank + 1,
            result.name,
            result.total_kwp,
            m.irr_pct,
            m.lcoe,
            m.npv,
            m.roi_pct,
            payback
        );
    }

    if skipped > 0 {
        println!("\n({} disabled or empty suppliers skipped)", skipped);
    }

    Ok(())
}
