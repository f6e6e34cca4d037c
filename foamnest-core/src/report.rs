//! Placement report: the artifact handed to toolpath generation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::Strategy;
use crate::model::{LaminationPlan, Part, Sheet, UnplacedReason};
use crate::pack::PackOutcome;

/// Where one part ended up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    /// Sheet number (1-based).
    pub sheet: usize,
    /// X origin on the sheet (mm).
    pub x: f64,
    /// Y origin on the sheet (mm).
    pub y: f64,
    /// Whether the part was rotated 90 degrees.
    pub rotated: bool,
}

/// A part that could not be placed, with the reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unplaced {
    /// Part id.
    pub part_id: String,
    /// Why the part was rejected.
    #[serde(flatten)]
    pub reason: UnplacedReason,
}

/// Complete result of one nesting run.
///
/// Produced fresh per run and never mutated after return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementReport {
    /// Strategy the run used.
    pub strategy: Strategy,
    /// Sheets in creation order.
    pub sheets: Vec<Sheet>,
    /// Part id to placement.
    pub placements: BTreeMap<String, PlacementRecord>,
    /// Part id to lamination plan (layer bookkeeping for stacking).
    pub plans: BTreeMap<String, LaminationPlan>,
    /// Parts that could not be placed; never silently dropped.
    pub unplaced: Vec<Unplaced>,
    /// Waste across the run, percent of total sheet area.
    pub total_waste_percent: f64,
}

impl PlacementReport {
    /// Aggregate a packing outcome into the final report.
    pub fn build(parts: &[Part], strategy: Strategy, outcome: PackOutcome) -> Self {
        let PackOutcome {
            sheets,
            plans,
            unplaced,
        } = outcome;

        let mut placements = BTreeMap::new();
        for sheet in &sheets {
            for p in &sheet.placements {
                placements.insert(
                    p.part_id.clone(),
                    PlacementRecord {
                        sheet: sheet.id,
                        x: p.x,
                        y: p.y,
                        rotated: p.rotated,
                    },
                );
            }
        }

        let plans = plans
            .into_iter()
            .map(|(idx, plan)| (parts[idx].id.clone(), plan))
            .collect();

        let unplaced = unplaced
            .into_iter()
            .map(|(idx, reason)| Unplaced {
                part_id: parts[idx].id.clone(),
                reason,
            })
            .collect();

        let total_waste_percent = compute_waste_percent(&sheets);

        Self {
            strategy,
            sheets,
            placements,
            plans,
            unplaced,
            total_waste_percent,
        }
    }

    /// Number of sheets the run opened.
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// True when every part was placed.
    pub fn all_placed(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Look up the placement for one part id.
    pub fn placement(&self, part_id: &str) -> Option<&PlacementRecord> {
        self.placements.get(part_id)
    }

    /// Serialize the report as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn compute_waste_percent(sheets: &[Sheet]) -> f64 {
    let total_area: f64 = sheets.iter().map(|s| s.width * s.height).sum();
    if total_area <= 0.0 {
        return 0.0;
    }
    let used_area: f64 = sheets.iter().map(Sheet::used_area).sum();
    (1.0 - used_area / total_area) * 100.0
}
