//! foamnest-core - Core library for nesting foam panels onto stock sheets.
//!
//! This library places rectangular panels onto catalog stock sheets,
//! resolving lamination (stacked layers) for parts thicker than one sheet
//! and minimizing sheet count and waste. The resulting placement report is
//! the sole artifact handed to downstream toolpath generation.
//!
//! # Example
//!
//! ```no_run
//! use foamnest_core::{nest, NestConfig, Part};
//! use foamnest_core::model::default_catalog;
//!
//! let parts = vec![
//!     Part::new("wall_01", 1200.0, 2400.0, 38.0),
//!     Part::new("shelf_02", 600.0, 1200.0, 38.0),
//! ];
//! let report = nest(&parts, &default_catalog(), &NestConfig::default()).unwrap();
//! println!("{} sheet(s), {:.1}% waste", report.sheet_count(), report.total_waste_percent);
//! ```

pub mod config;
pub mod error;
pub mod fit;
pub mod model;
pub mod pack;
pub mod report;
pub mod validation;

// Re-exports for convenience
pub use config::{NestConfig, Strategy};
pub use error::{ErrorCode, NestError, Result};
pub use model::{LaminationPlan, Part, Placement, Sheet, StockClass, UnplacedReason};
pub use pack::{PackOutcome, Packer};
pub use report::{PlacementRecord, PlacementReport, Unplaced};
pub use validation::{validate_inputs, validate_layout, ValidationResult};

/// Run the full nesting pipeline.
///
/// 1. Validate catalogs and configuration
/// 2. Resolve lamination plans and pack every feasible part
/// 3. Aggregate the placement report
/// 4. Defensively re-check the finished layout
///
/// Configuration errors abort the run; per-part infeasibility is
/// collected in the report's unplaced list and the run completes for the
/// other parts.
pub fn nest(parts: &[Part], catalog: &[StockClass], config: &NestConfig) -> Result<PlacementReport> {
    let validation = validate_inputs(parts, catalog, config)?;
    for warning in &validation.warnings {
        tracing::warn!("{}", warning);
    }

    let outcome = Packer::new(parts, catalog, config).pack();
    for unplaced in &outcome.unplaced {
        tracing::warn!(
            "Part '{}' not placed: {}",
            parts[unplaced.0].id,
            unplaced.1
        );
    }

    let report = PlacementReport::build(parts, config.strategy, outcome);
    validate_layout(&report, config)?;

    tracing::info!(
        sheets = report.sheet_count(),
        unplaced = report.unplaced.len(),
        waste_percent = report.total_waste_percent,
        "nesting complete"
    );

    Ok(report)
}
