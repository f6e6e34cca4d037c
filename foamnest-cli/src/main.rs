//! foamnest - CLI tool to nest foam panels onto stock sheets.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use foamnest_core::model::default_catalog;
use foamnest_core::{nest, validate_inputs, NestConfig, Part, StockClass, Strategy};

/// Nest foam panels onto stock sheets and plan lamination layers.
#[derive(Parser, Debug)]
#[command(name = "foamnest")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input parts catalog (JSON array of parts)
    #[arg(short, long)]
    parts: PathBuf,

    /// Stock catalog (JSON array); built-in foam catalog when omitted
    #[arg(short, long)]
    stock: Option<PathBuf>,

    /// Output report path (JSON); stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Packing strategy: shelf or smart
    #[arg(long, default_value = "smart")]
    strategy: String,

    /// Minimum clearance between placed parts (mm)
    #[arg(long, default_value_t = 6.0)]
    spacing: f64,

    /// Margin kept clear along every sheet edge (mm)
    #[arg(long, default_value_t = 0.0)]
    margin: f64,

    /// Maximum stacked layers for laminated parts
    #[arg(long, default_value_t = 3)]
    max_layers: u32,

    /// Reject parts thicker than a single sheet instead of laminating
    #[arg(long)]
    no_lamination: bool,

    /// Keep small parts off the large-part sheets
    #[arg(long)]
    no_mixed: bool,

    /// Keep every part on its own stock class
    #[arg(long)]
    no_cross_class: bool,

    /// Skip the leftover-space fill pass
    #[arg(long)]
    no_void_nesting: bool,

    /// Exit with an error when any part cannot be placed
    #[arg(long)]
    fail_on_unplaced: bool,

    /// Validate inputs only, don't pack
    #[arg(long)]
    validate: bool,

    /// Output the resolved catalogs as JSON and exit
    #[arg(long)]
    debug: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let strategy = Strategy::from_name(&args.strategy)
        .with_context(|| format!("Unknown strategy '{}' (use shelf or smart)", args.strategy))?;

    let config = NestConfig {
        strategy,
        min_part_spacing: args.spacing,
        sheet_margin: args.margin,
        allow_lamination: !args.no_lamination,
        lamination_max_layers: args.max_layers,
        mixed_small_large: !args.no_mixed,
        allow_cross_class: !args.no_cross_class,
        void_nesting: !args.no_void_nesting,
        ..NestConfig::default()
    };

    info!("Processing: {}", args.parts.display());

    let parts: Vec<Part> = read_json(&args.parts)?;
    info!("Loaded {} part(s)", parts.len());

    let catalog: Vec<StockClass> = match &args.stock {
        Some(path) => read_json(path)?,
        None => default_catalog(),
    };
    info!("Stock catalog: {} class(es)", catalog.len());

    // Debug output
    if args.debug {
        let json = serde_json::json!({
            "parts": parts,
            "stock": catalog,
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    // Validate-only mode
    if args.validate {
        let validation = validate_inputs(&parts, &catalog, &config)?;
        for warning in &validation.warnings {
            warn!("{}", warning);
        }
        info!("Validation passed");
        return Ok(());
    }

    let report = nest(&parts, &catalog, &config)?;

    for sheet in &report.sheets {
        info!(
            "{}: {} ({:.0} x {:.0} mm), {} part(s), {:.1}% utilization",
            sheet.label(&config.sheet_base_name),
            sheet.stock_name,
            sheet.width,
            sheet.height,
            sheet.placements.len(),
            sheet.utilization * 100.0
        );
    }
    info!(
        "Sheets: {}, waste: {:.1}%, unplaced: {}",
        report.sheet_count(),
        report.total_waste_percent,
        report.unplaced.len()
    );

    let json = report.to_json_pretty()?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Report written: {}", path.display());
        }
        None => println!("{}", json),
    }

    if args.fail_on_unplaced && !report.all_placed() {
        anyhow::bail!("{} part(s) could not be placed", report.unplaced.len());
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
