//! Stock class definition: a sheet size available in the material catalog.

use serde::{Deserialize, Serialize};

/// A class of raw stock sheets of fixed catalog dimensions.
///
/// No `sheet_width >= sheet_height` ordering is assumed; the two
/// orientations of a sheet are distinct catalog entries, or are covered
/// by part rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockClass {
    /// Catalog identifier.
    pub name: String,
    /// Sheet width (mm).
    pub sheet_width: f64,
    /// Sheet height (mm).
    pub sheet_height: f64,
    /// Thickness of a single sheet of this class (mm).
    pub thickness_per_layer: f64,
}

impl StockClass {
    /// Create a new stock class.
    pub fn new(
        name: impl Into<String>,
        sheet_width: f64,
        sheet_height: f64,
        thickness_per_layer: f64,
    ) -> Self {
        Self {
            name: name.into(),
            sheet_width,
            sheet_height,
            thickness_per_layer,
        }
    }

    /// Sheet area (mm^2).
    pub fn area(&self) -> f64 {
        self.sheet_width * self.sheet_height
    }

    /// Width-to-height ratio of the sheet.
    pub fn aspect(&self) -> f64 {
        self.sheet_width / self.sheet_height
    }
}

/// Built-in foam stock catalog (4x8 foot sheets and the common oversizes,
/// all 1.5 inch thick).
pub fn default_catalog() -> Vec<StockClass> {
    vec![
        StockClass::new("STD_4x8", 1219.2, 2438.4, 38.1),
        StockClass::new("EXT_4x10", 1219.2, 3048.0, 38.1),
        StockClass::new("EXT_4x12", 1219.2, 3657.6, 38.1),
        StockClass::new("WIDE_6x10", 1828.8, 3048.0, 38.1),
    ]
}
