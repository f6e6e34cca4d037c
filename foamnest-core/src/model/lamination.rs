//! Lamination plan: how a part's thickness maps onto stacked stock layers.

use serde::{Deserialize, Serialize};

/// Resolved thickness plan for one part.
///
/// Invariant: `layer_count * thickness_per_layer >= part.depth`, and
/// `layer_count` never exceeds the configured layer cap. Lamination is
/// layer bookkeeping for the later physical-stacking step; it does not
/// change the part's 2D footprint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaminationPlan {
    /// Index of the chosen stock class in the catalog.
    pub stock_class: usize,
    /// Number of stacked layers required to reach the part's depth.
    pub layer_count: u32,
}

impl LaminationPlan {
    /// Single-layer plan on the given stock class.
    pub fn single(stock_class: usize) -> Self {
        Self {
            stock_class,
            layer_count: 1,
        }
    }

    /// Total stock thickness consumed by this plan (mm).
    pub fn consumed_thickness(&self, thickness_per_layer: f64) -> f64 {
        self.layer_count as f64 * thickness_per_layer
    }
}

/// Why a part could not be placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UnplacedReason {
    /// Depth exceeds what the catalog can reach within the layer cap.
    TooThick {
        /// Required depth (mm).
        depth: f64,
        /// Best achievable stacked thickness (mm).
        max_thickness: f64,
    },
    /// Footprint does not fit any stock sheet, even alone.
    Oversize {
        /// Footprint width (mm).
        width: f64,
        /// Footprint height (mm).
        height: f64,
    },
}

impl UnplacedReason {
    /// Short machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            UnplacedReason::TooThick { .. } => "too_thick",
            UnplacedReason::Oversize { .. } => "oversize",
        }
    }
}

impl std::fmt::Display for UnplacedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnplacedReason::TooThick {
                depth,
                max_thickness,
            } => write!(
                f,
                "depth {depth:.1} mm exceeds achievable stack of {max_thickness:.1} mm"
            ),
            UnplacedReason::Oversize { width, height } => write!(
                f,
                "footprint {width:.1} x {height:.1} mm fits no stock sheet"
            ),
        }
    }
}
