//! Validation logic for nesting runs.

use std::collections::HashSet;

use crate::config::{NestConfig, MIN_PART_HEIGHT_MM, MIN_PART_WIDTH_MM};
use crate::error::{NestError, Result};
use crate::model::{Part, StockClass};
use crate::report::PlacementReport;

/// Validation result with warnings.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Whether validation passed.
    pub passed: bool,
    /// Warning messages.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Create a passing result.
    pub fn ok() -> Self {
        Self {
            passed: true,
            ..Default::default()
        }
    }

    /// Add a warning.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Validate catalogs and configuration before packing starts.
///
/// Configuration problems are fatal; questionable part geometry (for
/// example parts too small to cut reliably) only produces warnings.
pub fn validate_inputs(
    parts: &[Part],
    catalog: &[StockClass],
    config: &NestConfig,
) -> Result<ValidationResult> {
    let mut result = ValidationResult::ok();

    if catalog.is_empty() {
        return Err(NestError::EmptyStockCatalog);
    }
    if config.min_part_spacing < 0.0 {
        return Err(NestError::NegativeSpacing {
            value: config.min_part_spacing,
        });
    }
    if config.sheet_margin < 0.0 {
        return Err(NestError::NegativeMargin {
            value: config.sheet_margin,
        });
    }
    if config.lamination_max_layers < 1 {
        return Err(NestError::InvalidMaxLayers {
            value: config.lamination_max_layers,
        });
    }

    for sc in catalog {
        if sc.sheet_width <= 0.0 || sc.sheet_height <= 0.0 || sc.thickness_per_layer <= 0.0 {
            return Err(NestError::InvalidStockDimensions {
                name: sc.name.clone(),
                width: sc.sheet_width,
                height: sc.sheet_height,
                thickness: sc.thickness_per_layer,
            });
        }
    }

    let mut seen = HashSet::new();
    for part in parts {
        if part.width <= 0.0 || part.height <= 0.0 || part.depth <= 0.0 {
            return Err(NestError::InvalidPartDimensions {
                id: part.id.clone(),
                width: part.width,
                height: part.height,
                depth: part.depth,
            });
        }
        if !seen.insert(part.id.as_str()) {
            return Err(NestError::DuplicatePartId {
                id: part.id.clone(),
            });
        }
        if part.width < MIN_PART_WIDTH_MM || part.height < MIN_PART_HEIGHT_MM {
            result.add_warning(format!(
                "Part '{}' is tiny ({:.1} x {:.1} mm) and may be difficult to cut",
                part.id, part.width, part.height
            ));
        }
    }

    Ok(result)
}

/// Defensive post-hoc check of a finished report: every placement within
/// its sheet, and no two placements closer than the configured spacing.
///
/// A violation signals a packing bug, never expected in correct
/// operation.
pub fn validate_layout(report: &PlacementReport, config: &NestConfig) -> Result<()> {
    for sheet in &report.sheets {
        for p in &sheet.placements {
            if !sheet.contains(p) {
                return Err(NestError::LayoutInvariant {
                    sheet: sheet.id,
                    message: format!(
                        "part '{}' at ({:.1}, {:.1}) size {:.1} x {:.1} exceeds sheet {:.1} x {:.1}",
                        p.part_id, p.x, p.y, p.width, p.height, sheet.width, sheet.height
                    ),
                });
            }
        }

        for i in 0..sheet.placements.len() {
            for j in i + 1..sheet.placements.len() {
                let a = &sheet.placements[i];
                let b = &sheet.placements[j];
                if a.violates_clearance(b, config.min_part_spacing) {
                    return Err(NestError::LayoutInvariant {
                        sheet: sheet.id,
                        message: format!(
                            "parts '{}' and '{}' are closer than {:.1} mm",
                            a.part_id, b.part_id, config.min_part_spacing
                        ),
                    });
                }
            }
        }
    }
    Ok(())
}
