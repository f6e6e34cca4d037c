//! Part definition representing a single panel to cut from stock.

use serde::{Deserialize, Serialize};

/// A rectangular (bounding-box-reduced) panel to be cut from sheet stock.
///
/// Parts are created once per source panel at the start of a nesting run
/// and are immutable thereafter; the assigned placement lives in the
/// placement report, not on the part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    /// Unique identifier.
    pub id: String,
    /// Planar footprint width (mm).
    pub width: f64,
    /// Planar footprint height (mm).
    pub height: f64,
    /// Through-thickness dimension (mm).
    pub depth: f64,
    /// Whether 90-degree rotation is permitted when packing.
    #[serde(default = "default_rotation")]
    pub rotation_allowed: bool,
    /// Source label (panel/body name), if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

fn default_rotation() -> bool {
    true
}

impl Part {
    /// Create a new part.
    pub fn new(id: impl Into<String>, width: f64, height: f64, depth: f64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            depth,
            rotation_allowed: true,
            tag: None,
        }
    }

    /// Disallow 90-degree rotation for this part.
    pub fn fixed_orientation(mut self) -> Self {
        self.rotation_allowed = false;
        self
    }

    /// Attach a source label.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Planar footprint in the requested orientation.
    pub fn footprint(&self, rotated: bool) -> (f64, f64) {
        if rotated {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    /// Footprint area (mm^2).
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Larger of the two footprint dimensions.
    pub fn max_dim(&self) -> f64 {
        self.width.max(self.height)
    }

    /// Check whether the footprint fits inside `w x h` in any allowed
    /// orientation (epsilon-tolerant).
    pub fn fits_within(&self, w: f64, h: f64) -> bool {
        use crate::config::float_cmp::le;
        if le(self.width, w) && le(self.height, h) {
            return true;
        }
        self.rotation_allowed && le(self.height, w) && le(self.width, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footprint_orientations() {
        let part = Part::new("p1", 100.0, 50.0, 38.0);
        assert_eq!(part.footprint(false), (100.0, 50.0));
        assert_eq!(part.footprint(true), (50.0, 100.0));
        assert_eq!(part.area(), 5000.0);
        assert_eq!(part.max_dim(), 100.0);
    }

    #[test]
    fn test_fits_within_rotation() {
        let part = Part::new("p1", 100.0, 50.0, 38.0);
        assert!(part.fits_within(100.0, 50.0));
        assert!(part.fits_within(50.0, 100.0)); // via rotation
        assert!(!part.fits_within(60.0, 60.0));

        let fixed = Part::new("p2", 100.0, 50.0, 38.0).fixed_orientation();
        assert!(!fixed.fits_within(50.0, 100.0));
    }
}
