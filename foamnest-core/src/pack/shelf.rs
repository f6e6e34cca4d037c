//! Shelf packing: left-to-right rows, tallest parts first.

use super::FreeRect;
use crate::config::float_cmp::le;
use crate::config::EPS;
use crate::model::{Part, Placement};

/// Cursor state for one sheet being filled with shelf rows.
///
/// Coordinates are relative to the usable origin (the sheet margin);
/// `try_place` returns placements in absolute sheet coordinates.
#[derive(Debug)]
pub(crate) struct ShelfState {
    x: f64,
    y: f64,
    row_h: f64,
    leftovers: Vec<FreeRect>,
}

impl ShelfState {
    pub fn new() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            row_h: 0.0,
            leftovers: Vec::new(),
        }
    }

    /// Try to place a part on this sheet: first in the current row, then
    /// on a fresh row above it. Returns `None` when the part must wait
    /// for the next sheet.
    pub fn try_place(
        &mut self,
        part: &Part,
        usable_w: f64,
        usable_h: f64,
        margin: f64,
        spacing: f64,
    ) -> Option<Placement> {
        let mut tries = vec![(false, part.width, part.height)];
        if part.rotation_allowed && part.width != part.height {
            tries.push((true, part.height, part.width));
        }

        // Current row, first orientation that fits.
        for &(rotated, w, h) in &tries {
            if le(self.x + w, usable_w) && le(self.y + h, usable_h) {
                let placement = self.commit(part, rotated, w, h, margin, spacing);
                return Some(placement);
            }
        }

        // New row at the current maximum shelf height plus spacing.
        if self.x > 0.0 {
            for &(rotated, w, h) in &tries {
                let row_y = self.y + self.row_h + spacing;
                if le(w, usable_w) && le(row_y + h, usable_h) {
                    self.close_row(usable_w, spacing);
                    let placement = self.commit(part, rotated, w, h, margin, spacing);
                    return Some(placement);
                }
            }
        }

        None
    }

    fn commit(
        &mut self,
        part: &Part,
        rotated: bool,
        w: f64,
        h: f64,
        margin: f64,
        spacing: f64,
    ) -> Placement {
        let placement = Placement {
            part_id: part.id.clone(),
            x: margin + self.x,
            y: margin + self.y,
            rotated,
            width: w,
            height: h,
        };
        self.x += w + spacing;
        self.row_h = self.row_h.max(h);
        placement
    }

    /// Record the tail of the current row as leftover space and advance
    /// the cursor to the next row.
    fn close_row(&mut self, usable_w: f64, spacing: f64) {
        let tail_w = usable_w + spacing - self.x;
        if tail_w > EPS && self.row_h > EPS {
            self.leftovers.push(FreeRect {
                x: self.x,
                y: self.y,
                width: tail_w,
                height: self.row_h + spacing,
            });
        }
        self.y += self.row_h + spacing;
        self.x = 0.0;
        self.row_h = 0.0;
    }

    /// Finish the sheet: close the open row and return all leftover
    /// rectangles in absolute sheet coordinates, spacing-extended for the
    /// void-nesting pass.
    pub fn finish(mut self, usable_w: f64, usable_h: f64, margin: f64, spacing: f64) -> Vec<FreeRect> {
        if self.x > 0.0 {
            self.close_row(usable_w, spacing);
        }
        // Everything above the last row is free.
        let top_h = usable_h + spacing - self.y;
        if top_h > EPS {
            self.leftovers.push(FreeRect {
                x: 0.0,
                y: self.y,
                width: usable_w + spacing,
                height: top_h,
            });
        }
        self.leftovers
            .iter()
            .map(|r| FreeRect {
                x: margin + r.x,
                y: margin + r.y,
                width: r.width,
                height: r.height,
            })
            .collect()
    }
}
