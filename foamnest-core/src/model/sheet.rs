//! Sheet instances and part placements.

use serde::{Deserialize, Serialize};

/// A single part placed on a sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Placement {
    /// Id of the placed part.
    pub part_id: String,
    /// X origin on the sheet (mm).
    pub x: f64,
    /// Y origin on the sheet (mm).
    pub y: f64,
    /// Whether the part was rotated 90 degrees.
    pub rotated: bool,
    /// Placed footprint width (mm, after rotation).
    pub width: f64,
    /// Placed footprint height (mm, after rotation).
    pub height: f64,
}

impl Placement {
    /// Right edge X coordinate.
    pub fn x_max(&self) -> f64 {
        self.x + self.width
    }

    /// Top edge Y coordinate.
    pub fn y_max(&self) -> f64 {
        self.y + self.height
    }

    /// Footprint area (mm^2).
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Check whether this placement and `other`, each inflated by
    /// `clearance / 2` on all sides, overlap (epsilon-tolerant).
    pub fn violates_clearance(&self, other: &Placement, clearance: f64) -> bool {
        use crate::config::EPS;
        let half = clearance / 2.0;
        let x_overlap = self.x - half < other.x_max() + half - EPS
            && other.x - half < self.x_max() + half - EPS;
        let y_overlap = self.y - half < other.y_max() + half - EPS
            && other.y - half < self.y_max() + half - EPS;
        x_overlap && y_overlap
    }
}

/// A sheet instance opened by the packer, with its placements in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sheet {
    /// Sequential sheet number (1-based).
    pub id: usize,
    /// Index of the sheet's stock class in the catalog.
    pub stock_class: usize,
    /// Stock class name, for reporting.
    pub stock_name: String,
    /// Sheet width (mm).
    pub width: f64,
    /// Sheet height (mm).
    pub height: f64,
    /// Placements in the order they were made.
    pub placements: Vec<Placement>,
    /// Fraction of the sheet area consumed by placed parts.
    pub utilization: f64,
}

impl Sheet {
    /// Display label for this sheet, e.g. `SHEET_LAYOUT_03`.
    pub fn label(&self, base_name: &str) -> String {
        format!("{}_{:02}", base_name, self.id)
    }

    /// Total placed part area (mm^2).
    pub fn used_area(&self) -> f64 {
        self.placements.iter().map(Placement::area).sum()
    }

    /// Recompute [`Sheet::utilization`] from the current placements.
    pub fn computed_utilization(&self) -> f64 {
        let area = self.width * self.height;
        if area <= 0.0 {
            return 0.0;
        }
        self.used_area() / area
    }

    /// Check whether a placement lies fully within the sheet bounds
    /// (epsilon-tolerant).
    pub fn contains(&self, p: &Placement) -> bool {
        use crate::config::float_cmp::{ge, le};
        ge(p.x, 0.0) && ge(p.y, 0.0) && le(p.x_max(), self.width) && le(p.y_max(), self.height)
    }
}
