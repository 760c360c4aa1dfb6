//! Run projections for an entire portfolio document
//!
//! Loads a JSON portfolio document (or a flat projects CSV plus assumption
//! flags), runs every supplier in parallel and writes the aggregated yearly
//! tables to CSV. Supports JSON output for API integration via --json.

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use solar_portfolio::portfolio::{load_portfolio, load_projects_csv};
use solar_portfolio::{
    EnvFactors, GlobalAssumptions, PortfolioRunner, Supplier, SupplierResult,
};

#[derive(Parser)]
#[command(about = "Run LCOE and investment projections for a solar portfolio")]
struct Args {
    /// Portfolio document (.json) or flat projects CSV (.csv)
    input: PathBuf,

    /// Write aggregated yearly tables to this CSV file
    #[arg(long, default_value = "portfolio_output.csv")]
    output: PathBuf,

    /// Emit full results as JSON on stdout instead of the summary
    #[arg(long)]
    json: bool,

    /// Projection horizon in years (required for CSV input, overrides JSON)
    #[arg(long)]
    period: Option<u32>,

    /// Discount rate in percent (required for CSV input)
    #[arg(long)]
    wacc: Option<f64>,

    /// Annual output degradation in percent (CSV input)
    #[arg(long, default_value_t = 0.0)]
    degradation: f64,

    /// Annual tariff escalation in percent (CSV input)
    #[arg(long, default_value_t = 0.0)]
    tariff_escalation: f64,

    /// Annual opex inflation in percent (CSV input)
    #[arg(long, default_value_t = 0.0)]
    opex_inflation: f64,

    /// kg CO2 avoided per kWh generated
    #[arg(long)]
    co2_factor: Option<f64>,

    /// kg CO2 absorbed per tree per year
    #[arg(long)]
    tree_factor: Option<f64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PortfolioResponse {
    supplier_count: usize,
    enabled_result_count: usize,
    total_kwp: f64,
    period: u32,
    suppliers: Vec<Option<SupplierResult>>,
    execution_time_ms: u64,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let start = Instant::now();

    let is_csv = args
        .input
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    let (mut global, suppliers): (GlobalAssumptions, Vec<Supplier>) = if is_csv {
        let (Some(period), Some(wacc)) = (args.period, args.wacc) else {
            bail!("CSV input requires --period and --wacc");
        };
        let global = GlobalAssumptions {
            period,
            wacc,
            degradation: args.degradation,
            tariff_escalation: args.tariff_escalation,
            opex_inflation: args.opex_inflation,
        };
        let suppliers = load_projects_csv(&args.input)
            .with_context(|| format!("loading {}", args.input.display()))?;
        (global, suppliers)
    } else {
        let file = load_portfolio(&args.input)
            .with_context(|| format!("loading {}", args.input.display()))?;
        (file.global, file.suppliers)
    };

    if let Some(period) = args.period {
        global.period = period;
    }
    if global.period < 1 {
        bail!("projection period must be at least 1 year");
    }

    let mut env_factors = EnvFactors::default();
    if let Some(co2) = args.co2_factor {
        env_factors.co2_per_kwh = co2;
    }
    if let Some(tree) = args.tree_factor {
        env_factors.co2_per_tree = tree;
    }

    if !args.json {
        println!(
            "Loaded {} suppliers ({} projects) in {:?}",
            suppliers.len(),
            suppliers.iter().map(|s| s.projects.len()).sum::<usize>(),
            start.elapsed()
        );
        println!("Running projections over {} years...", global.period);
    }

    let proj_start = Instant::now();
    let runner = PortfolioRunner::with_env_factors(global.clone(), env_factors);
    let results = runner.run_portfolio_par(&suppliers);

    if !args.json {
        println!("Projections complete in {:?}", proj_start.elapsed());
    }

    // Write the aggregated yearly tables, one block of rows per supplier
    let mut file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    writeln!(
        file,
        "Supplier,Year,Energy,Tariff,Revenue,Opex,NetCashflow,PVNetCashflow,CumulativeCashflow"
    )?;
    for result in results.iter().flatten() {
        for row in &result.aggregate.yearly {
            writeln!(
                file,
                "{},{},{:.4},{:.6},{:.4},{:.4},{:.4},{:.4},{:.4}",
                result.name,
                row.year,
                row.energy,
                row.tariff,
                row.revenue,
                row.opex,
                row.net_cashflow,
                row.pv_net_cashflow,
                row.cumulative_cashflow,
            )?;
        }
    }

    let enabled_result_count = results.iter().flatten().count();
    let total_kwp: f64 = results.iter().flatten().map(|r| r.total_kwp).sum();
    let execution_time_ms = start.elapsed().as_millis() as u64;

    if args.json {
        let response = PortfolioResponse {
            supplier_count: suppliers.len(),
            enabled_result_count,
            total_kwp,
            period: global.period,
            suppliers: results,
            execution_time_ms,
        };
        println!("{}", serde_json::to_string(&response)?);
    } else {
        println!("\nYearly tables written to: {}", args.output.display());

        println!("\nPortfolio Summary:");
        println!("  Suppliers with results: {}/{}", enabled_result_count, suppliers.len());
        println!("  Total capacity: {:.1} kWp", total_kwp);

        println!(
            "\n{:<24} {:>9} {:>9} {:>8} {:>14} {:>9}",
            "Supplier", "kWp", "LCOE", "IRR %", "NPV", "Payback"
        );
        println!("{}", "-".repeat(78));
        for result in results.iter().flatten() {
            let m = &result.aggregate.metrics;
            let payback = if m.payback_years > global.period as f64 {
                format!("> {}", global.period)
            } else {
                format!("{:.2}", m.payback_years)
            };
            println!(
                "{:<24} {:>9.1} {:>9.4} {:>8.2} {:>14.2} {:>9}",
                result.name, result.total_kwp, m.lcoe, m.irr_pct, m.npv, payback
            );
        }

        println!("\nTotal time: {:?}", start.elapsed());
    }

    Ok(())
}
