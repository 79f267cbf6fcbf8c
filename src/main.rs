use analytics::{Aggregator, Metric, RecordFilter, top_n};
use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::{FilterSettings, Overrides};
use core_types::GroupField;
use features::FeatureEngineer;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

mod pages;
mod render;

use pages::{CustomersPage, OverviewPage, ProductsPage};
use render::{Column, summary_table};

/// The main entry point for the Superstore analytics tool.
fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Layer the config file, environment and command line
    let mut config = configuration::load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from '{}'", cli.config.display()))?;
    cli.overrides.apply(&mut config);
    config.validate()?;

    let _log_guard = configuration::init_logging(&config.logging)?;

    // Load and enrich the dataset once; every view below reads from it.
    let orders = dataset::load_orders(&config.dataset.path).with_context(|| {
        format!(
            "Could not load the sales dataset from '{}'",
            config.dataset.path.display()
        )
    })?;
    let engineer = FeatureEngineer::new(config.late_delivery.to_rules()?);
    let enriched = engineer.enrich(&orders);

    let filter = record_filter(&config.filters);
    let filtered = if filter.is_unrestricted() {
        enriched
    } else {
        filter.apply(&enriched)
    };
    info!(rows = filtered.len(), "Rows after filters");
    if filtered.is_empty() {
        warn!("No rows left after filtering; every table will be empty");
    }

    let aggregator = Aggregator::new(&filtered);
    let output = Output { json: cli.json };

    // Execute the appropriate command
    match cli.command {
        Commands::Overview => output.emit(&OverviewPage::build(&aggregator)?, OverviewPage::print)?,
        Commands::Products => {
            let page = ProductsPage::build(
                &aggregator,
                config.report.top_n,
                config.report.unprofitable_preview,
            )?;
            output.emit(&page, ProductsPage::print)?;
        }
        Commands::Customers => output.emit(
            &CustomersPage::build(&aggregator, config.report.top_n)?,
            CustomersPage::print,
        )?,
        Commands::ExportUnprofitable(args) => {
            let path = args.out.unwrap_or(config.export.path);
            handle_export(&aggregator, &path)?;
        }
        Commands::Group(args) => handle_group(&aggregator, args, &output)?,
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Sales and profitability reports over a cleaned retail sales export.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file. A missing file means built-in defaults.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Print JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Headline KPIs, the monthly sales trend and sales by region.
    Overview,
    /// Category and sub-category performance and unprofitable products.
    Products,
    /// Top customers, segments and shipping performance.
    Customers,
    /// Write every unprofitable product to a CSV file.
    ExportUnprofitable(ExportArgs),
    /// Summarise by any combination of fields.
    Group(GroupArgs),
}

#[derive(Parser)]
struct ExportArgs {
    /// Output file. Defaults to `export.path` from the configuration.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser)]
struct GroupArgs {
    /// Fields to group by, e.g. `--by category --by region`.
    #[arg(long = "by", required = true)]
    by: Vec<GroupField>,

    /// Metric to rank by.
    #[arg(long, default_value = "sales")]
    sort: Metric,

    /// Keep only the first N rows after ranking.
    #[arg(long)]
    top: Option<usize>,
}

// ==============================================================================
// Output
// ==============================================================================

struct Output {
    json: bool,
}

impl Output {
    fn emit<T: Serialize>(&self, value: &T, print: impl FnOnce(&T)) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print(value);
        }
        Ok(())
    }
}

fn record_filter(settings: &FilterSettings) -> RecordFilter {
    RecordFilter {
        years: settings.years.clone(),
        regions: settings.regions.clone(),
        segments: settings.segments.clone(),
    }
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_export(aggregator: &Aggregator<'_>, path: &std::path::Path) -> anyhow::Result<()> {
    let rows = aggregator.unprofitable_products()?;
    let written = dataset::write_product_rows(path, &rows)
        .with_context(|| format!("Failed to export unprofitable products to '{}'", path.display()))?;
    println!("Wrote {} unprofitable products to {}", written, path.display());
    Ok(())
}

fn handle_group(aggregator: &Aggregator<'_>, args: GroupArgs, output: &Output) -> anyhow::Result<()> {
    let rows = aggregator.summarise(&args.by)?;
    let limit = args.top.unwrap_or(rows.len());
    let ranked = top_n(&rows, args.sort, limit);

    output.emit(&ranked, |rows| {
        let columns = [
            Column::Sales,
            Column::Profit,
            Column::Margin,
            Column::Orders,
            Column::Customers,
            Column::AvgShippingDays,
            Column::LateRate,
        ];
        println!("{}", summary_table(&args.by, &columns, rows));
    })
}
