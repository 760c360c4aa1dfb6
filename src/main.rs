//! Solar Portfolio CLI
//!
//! Runs a sample supplier through the projection engine and prints the
//! yearly table plus the derived investment metrics

use solar_portfolio::portfolio::{save_portfolio, PortfolioFile, PORTFOLIO_FORMAT_VERSION};
use solar_portfolio::{
    EnvFactors, GlobalAssumptions, OpexItem, OpexKind, Project, ProjectionEngine, Supplier,
};
use std::fs::File;
use std::io::Write;

fn main() {
    env_logger::init();

    println!("Solar Portfolio v0.1.0");
    println!("======================\n");

    let global = GlobalAssumptions {
        period: 20,
        wacc: 6.0,
        degradation: 0.5,
        tariff_escalation: 2.0,
        opex_inflation: 2.0,
    };

    let supplier = Supplier {
        name: "Demo Supplier".to_string(),
        enabled: true,
        projects: vec![
            Project {
                name: "Rooftop 100".to_string(),
                kwp: 100.0,
                prod_hour: 3.65,
                capex: 3_500_000.0,
                utility_tariff: Some(4.5),
                ppa_discount: 10.0,
                enabled: true,
                opex: vec![OpexItem {
                    name: "O&M".to_string(),
                    kind: OpexKind::PerKwp,
                    unit: 500.0,
                    freq: 1.0,
                }],
            },
            Project {
                name: "Carport 40".to_string(),
                kwp: 40.0,
                prod_hour: 3.4,
                capex: 1_520_000.0,
                utility_tariff: Some(4.2),
                ppa_discount: 12.0,
                enabled: true,
                opex: vec![
                    OpexItem {
                        name: "O&M".to_string(),
                        kind: OpexKind::PerKwp,
                        unit: 450.0,
                        freq: 1.0,
                    },
                    OpexItem {
                        name: "Insurance".to_string(),
                        kind: OpexKind::Flat,
                        unit: 12_000.0,
                        freq: 1.0,
                    },
                ],
            },
        ],
    };

    println!("Supplier: {}", supplier.name);
    println!("  Projects: {}", supplier.projects.len());
    println!("  Total kWp: {:.1}", supplier.total_kwp());
    println!();

    let engine = ProjectionEngine::new(global.clone(), EnvFactors::default());
    let result = engine
        .project_supplier(&supplier)
        .expect("demo supplier is enabled");
    let agg = &result.aggregate;

    // Print header
    println!("Aggregated Projection ({} years):", agg.horizon());
    println!(
        "{:>4} {:>14} {:>8} {:>14} {:>12} {:>14} {:>16}",
        "Year", "Energy kWh", "Tariff", "Revenue", "Opex", "Net CF", "Cumulative"
    );
    println!("{}", "-".repeat(90));

    for row in agg.yearly.iter().take(10) {
        println!(
            "{:>4} {:>14.0} {:>8.4} {:>14.2} {:>12.2} {:>14.2} {:>16.2}",
            row.year,
            row.energy,
            row.tariff,
            row.revenue,
            row.opex,
            row.net_cashflow,
            row.cumulative_cashflow,
        );
    }
    if agg.yearly.len() > 10 {
        println!("... ({} more years)", agg.yearly.len() - 10);
    }

    // Write full yearly table to CSV
    let csv_path = "projection_output.csv";
    let mut file = File::create(csv_path).expect("Unable to create CSV file");
    writeln!(
        file,
        "Year,Energy,Tariff,Revenue,Opex,NetCashflow,PVNetCashflow,CumulativeCashflow"
    )
    .unwrap();
    for row in &agg.yearly {
        writeln!(
            file,
            "{},{:.4},{:.6},{:.4},{:.4},{:.4},{:.4},{:.4}",
            row.year,
            row.energy,
            row.tariff,
            row.revenue,
            row.opex,
            row.net_cashflow,
            row.pv_net_cashflow,
            row.cumulative_cashflow,
        )
        .unwrap();
    }
    println!("\nFull results written to: {}", csv_path);

    // Print metric summary
    let m = &agg.metrics;
    println!("\nInvestment Metrics:");
    println!("  LCOE:          {:.4} ({:.4} capex + {:.4} opex)", m.lcoe, m.lcoe_capex, m.lcoe_opex);
    println!("  Avg Tariff:    {:.4}", m.avg_tariff);
    println!("  Profit Margin: {:.4}", m.profit_margin);
    println!("  NPV:           {:.2}", m.npv);
    println!("  IRR:           {:.2}%", m.irr_pct);
    println!("  MIRR:          {:.2}%", m.mirr_pct);
    println!("  ROI:           {:.2}%", m.roi_pct);
    if m.payback_years > agg.horizon() as f64 {
        println!("  Payback:       > {} years", agg.horizon());
    } else {
        println!("  Payback:       {:.2} years", m.payback_years);
    }
    println!("  CO2 avoided:   {:.0} kg/year (~{:.0} trees)", m.env.co2_kg_per_year, m.env.tree_equivalent);

    // Per-project breakdown
    println!("\nPer-Project Breakdown:");
    for entry in &result.projects {
        match &entry.result {
            Some(r) => println!(
                "  {:<16} {:>8.1} kWp  IRR {:>6.2}%  LCOE {:>7.4}  Payback {:>5.2}",
                entry.name, entry.kwp, r.metrics.irr_pct, r.metrics.lcoe, r.metrics.payback_years
            ),
            None => println!("  {:<16} {:>8.1} kWp  (disabled)", entry.name, entry.kwp),
        }
    }

    // Dump the demo input as a portfolio document usable with run_portfolio
    let portfolio = PortfolioFile {
        version: PORTFOLIO_FORMAT_VERSION,
        global,
        suppliers: vec![supplier],
    };
    let portfolio_path = "demo_portfolio.json";
    save_portfolio(portfolio_path, &portfolio).expect("Unable to write portfolio document");
    println!("\nDemo portfolio document written to: {}", portfolio_path);
}
