//! Configuration constants and settings for the nesting engine.

use serde::{Deserialize, Serialize};

/// Floating-point comparison epsilon (mm).
pub const EPS: f64 = 0.0001;

/// Default minimum clearance between placed parts, bbox-to-bbox (mm).
pub const DEFAULT_MIN_PART_SPACING: f64 = 6.0;

/// Default margin kept clear along every sheet edge (mm).
pub const DEFAULT_SHEET_MARGIN: f64 = 0.0;

/// Default cap on stacked stock layers when laminating thick parts.
pub const DEFAULT_LAMINATION_MAX_LAYERS: u32 = 3;

/// Parts at or below this dimension qualify as gap-fill candidates (mm).
pub const DEFAULT_SMALL_PART_MAX_DIM: f64 = 300.0;

/// Parts at or below this area qualify as gap-fill candidates (mm^2).
pub const DEFAULT_SMALL_PART_MAX_AREA: f64 = 90_000.0;

/// Minimum part width before a tiny-part warning is logged (mm).
pub const MIN_PART_WIDTH_MM: f64 = 25.0;

/// Minimum part height before a tiny-part warning is logged (mm).
pub const MIN_PART_HEIGHT_MM: f64 = 25.0;

/// Base name for generated sheet labels (`SHEET_LAYOUT_01`, ...).
pub const DEFAULT_SHEET_BASE_NAME: &str = "SHEET_LAYOUT";

/// Packing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Left-to-right rows, tallest parts first. Fast and predictable.
    Shelf,
    /// Maximal-rectangles best-area-fit. Better density.
    #[default]
    Smart,
}

impl Strategy {
    /// Parse a strategy from its configuration name.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "shelf" => Some(Strategy::Shelf),
            "smart" => Some(Strategy::Smart),
            _ => None,
        }
    }

    /// Configuration name for this strategy.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Shelf => "shelf",
            Strategy::Smart => "smart",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Nesting run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestConfig {
    /// Packing strategy.
    pub strategy: Strategy,
    /// Minimum clearance between placed parts, bbox-to-bbox (mm).
    pub min_part_spacing: f64,
    /// Margin kept clear along every sheet edge (mm).
    pub sheet_margin: f64,
    /// Allow stacking stock layers for parts thicker than one sheet.
    pub allow_lamination: bool,
    /// Maximum stacked layers per laminated part.
    pub lamination_max_layers: u32,
    /// Pack small parts into leftover space alongside large parts.
    pub mixed_small_large: bool,
    /// Allow moving parts onto a larger stock class when it reduces waste.
    pub allow_cross_class: bool,
    /// Scan leftover free rectangles for small parts before opening sheets.
    pub void_nesting: bool,
    /// Maximum dimension for a part to count as small (mm).
    pub small_part_max_dim: f64,
    /// Maximum area for a part to count as small (mm^2).
    pub small_part_max_area: f64,
    /// Base name for generated sheet labels.
    pub sheet_base_name: String,
}

impl Default for NestConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            min_part_spacing: DEFAULT_MIN_PART_SPACING,
            sheet_margin: DEFAULT_SHEET_MARGIN,
            allow_lamination: true,
            lamination_max_layers: DEFAULT_LAMINATION_MAX_LAYERS,
            mixed_small_large: true,
            allow_cross_class: true,
            void_nesting: true,
            small_part_max_dim: DEFAULT_SMALL_PART_MAX_DIM,
            small_part_max_area: DEFAULT_SMALL_PART_MAX_AREA,
            sheet_base_name: DEFAULT_SHEET_BASE_NAME.to_string(),
        }
    }
}

impl NestConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the packing strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the minimum part spacing.
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.min_part_spacing = spacing;
        self
    }

    /// Set the sheet edge margin.
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.sheet_margin = margin;
        self
    }

    /// Set the lamination layer cap.
    pub fn with_max_layers(mut self, layers: u32) -> Self {
        self.lamination_max_layers = layers;
        self
    }
}

/// Utility functions for floating-point comparisons.
pub mod float_cmp {
    use super::EPS;

    /// Check if two values are approximately equal.
    #[inline]
    pub fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    /// Check if a value is approximately zero.
    #[inline]
    pub fn approx_zero(a: f64) -> bool {
        a.abs() < EPS
    }

    /// Check if `a <= b` with epsilon tolerance.
    #[inline]
    pub fn le(a: f64, b: f64) -> bool {
        a <= b + EPS
    }

    /// Check if `a >= b` with epsilon tolerance.
    #[inline]
    pub fn ge(a: f64, b: f64) -> bool {
        a + EPS >= b
    }
}
