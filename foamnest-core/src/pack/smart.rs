//! Maximal-rectangles packing with best-area-fit scoring.
//!
//! Free-space bookkeeping follows the standard maximal-rectangles scheme:
//! placing a part splits every intersecting free rectangle into up to four
//! sub-rectangles, then rectangles fully contained in another are pruned.

use super::{FreeRect, OpenSheet};
use crate::config::float_cmp::le;
use crate::config::EPS;
use crate::model::{Part, Placement};

/// A scored placement candidate on one sheet.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate {
    pub rect_idx: usize,
    pub rotated: bool,
    /// (leftover area, leftover short side): lower is better.
    pub score: (f64, f64),
}

/// Find the best-area-fit placement for a part on a sheet, trying both
/// orientations when rotation is allowed. Strict improvement keeps the
/// earliest-declared free rectangle and the unrotated orientation.
pub(crate) fn find_best(sheet: &OpenSheet, part: &Part, spacing: f64) -> Option<Candidate> {
    let mut orientations = vec![(false, part.width + spacing, part.height + spacing)];
    if part.rotation_allowed && part.width != part.height {
        orientations.push((true, part.height + spacing, part.width + spacing));
    }

    let mut best: Option<Candidate> = None;
    for (rect_idx, rect) in sheet.free.iter().enumerate() {
        for &(rotated, w_eff, h_eff) in &orientations {
            if !le(w_eff, rect.width) || !le(h_eff, rect.height) {
                continue;
            }
            let leftover = rect.area() - w_eff * h_eff;
            let short_side = (rect.width - w_eff).min(rect.height - h_eff);
            let score = (leftover, short_side);
            let better = match &best {
                None => true,
                Some(b) => score < b.score,
            };
            if better {
                best = Some(Candidate {
                    rect_idx,
                    rotated,
                    score,
                });
            }
        }
    }
    best
}

/// Place a part at the origin of the chosen free rectangle and update the
/// sheet's free-space list.
pub(crate) fn place(sheet: &mut OpenSheet, part: &Part, cand: Candidate, spacing: f64) {
    let rect = sheet.free[cand.rect_idx];
    let (w, h) = part.footprint(cand.rotated);
    let placed = FreeRect {
        x: rect.x,
        y: rect.y,
        width: w + spacing,
        height: h + spacing,
    };

    sheet.placements.push(Placement {
        part_id: part.id.clone(),
        x: rect.x,
        y: rect.y,
        rotated: cand.rotated,
        width: w,
        height: h,
    });

    split_free_rects(&mut sheet.free, &placed);
    prune_contained(&mut sheet.free);
}

/// Split every free rectangle intersecting `placed` into the sub-
/// rectangles that remain around it.
fn split_free_rects(free: &mut Vec<FreeRect>, placed: &FreeRect) {
    let mut result = Vec::with_capacity(free.len() + 4);
    for rect in free.drain(..) {
        if !rect.intersects(placed) {
            result.push(rect);
            continue;
        }
        // Left sliver
        if placed.x - rect.x > EPS {
            result.push(FreeRect {
                width: placed.x - rect.x,
                ..rect
            });
        }
        // Right sliver
        if rect.x_max() - placed.x_max() > EPS {
            result.push(FreeRect {
                x: placed.x_max(),
                width: rect.x_max() - placed.x_max(),
                ..rect
            });
        }
        // Bottom sliver
        if placed.y - rect.y > EPS {
            result.push(FreeRect {
                height: placed.y - rect.y,
                ..rect
            });
        }
        // Top sliver
        if rect.y_max() - placed.y_max() > EPS {
            result.push(FreeRect {
                y: placed.y_max(),
                height: rect.y_max() - placed.y_max(),
                ..rect
            });
        }
    }
    *free = result;
}

/// Drop every free rectangle fully contained in another. The earlier of
/// two identical rectangles survives.
fn prune_contained(free: &mut Vec<FreeRect>) {
    let mut i = 0;
    while i < free.len() {
        let mut removed = false;
        for j in 0..free.len() {
            if i == j {
                continue;
            }
            if free[j].contains(&free[i]) && !(free[i].contains(&free[j]) && j > i) {
                free.remove(i);
                removed = true;
                break;
            }
        }
        if !removed {
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sheet(w: f64, h: f64) -> OpenSheet {
        OpenSheet {
            class_idx: 0,
            width: w,
            height: h,
            placements: Vec::new(),
            free: vec![FreeRect {
                x: 0.0,
                y: 0.0,
                width: w,
                height: h,
            }],
        }
    }

    #[test]
    fn test_place_splits_free_space() {
        let mut s = sheet(1000.0, 1000.0);
        let part = Part::new("a", 400.0, 300.0, 38.0).fixed_orientation();
        let cand = find_best(&s, &part, 0.0).unwrap();
        place(&mut s, &part, cand, 0.0);

        assert_eq!(s.placements.len(), 1);
        assert_eq!((s.placements[0].x, s.placements[0].y), (0.0, 0.0));
        // right sliver 600 x 1000 and top sliver 1000 x 700
        assert_eq!(s.free.len(), 2);
        assert_eq!((s.free[0].x, s.free[0].width), (400.0, 600.0));
        assert_eq!((s.free[1].y, s.free[1].height), (300.0, 700.0));
    }

    #[test]
    fn test_best_area_fit_prefers_tighter_rect() {
        let mut s = sheet(1000.0, 1000.0);
        s.free = vec![
            FreeRect {
                x: 0.0,
                y: 0.0,
                width: 900.0,
                height: 900.0,
            },
            FreeRect {
                x: 0.0,
                y: 0.0,
                width: 320.0,
                height: 320.0,
            },
        ];
        let part = Part::new("a", 300.0, 300.0, 38.0);
        let cand = find_best(&s, &part, 0.0).unwrap();
        assert_eq!(cand.rect_idx, 1);
    }

    #[test]
    fn test_equal_score_keeps_earliest_rect() {
        let mut s = sheet(1000.0, 1000.0);
        s.free = vec![
            FreeRect {
                x: 0.0,
                y: 500.0,
                width: 400.0,
                height: 400.0,
            },
            FreeRect {
                x: 500.0,
                y: 0.0,
                width: 400.0,
                height: 400.0,
            },
        ];
        let part = Part::new("a", 200.0, 200.0, 38.0);
        let cand = find_best(&s, &part, 0.0).unwrap();
        assert_eq!(cand.rect_idx, 0);
        assert!(!cand.rotated);
    }

    #[test]
    fn test_rotation_when_only_rotated_fits() {
        let s = sheet(500.0, 1000.0);
        let part = Part::new("a", 800.0, 400.0, 38.0);
        let cand = find_best(&s, &part, 0.0).unwrap();
        assert!(cand.rotated);

        let fixed = Part::new("b", 800.0, 400.0, 38.0).fixed_orientation();
        assert!(find_best(&s, &fixed, 0.0).is_none());
    }

    #[test]
    fn test_spacing_inflates_requirement() {
        let s = sheet(1000.0, 1000.0);
        // 995 wide part at 10 mm spacing needs 1005 of free width
        let part = Part::new("a", 995.0, 200.0, 38.0).fixed_orientation();
        assert!(find_best(&s, &part, 10.0).is_none());
        assert!(find_best(&s, &part, 0.0).is_some());
    }

    #[test]
    fn test_prune_drops_contained_rects() {
        let mut free = vec![
            FreeRect {
                x: 0.0,
                y: 0.0,
                width: 500.0,
                height: 500.0,
            },
            FreeRect {
                x: 100.0,
                y: 100.0,
                width: 100.0,
                height: 100.0,
            },
            FreeRect {
                x: 400.0,
                y: 400.0,
                width: 300.0,
                height: 300.0,
            },
        ];
        prune_contained(&mut free);
        assert_eq!(free.len(), 2);
        assert_eq!(free[0].width, 500.0);
        assert_eq!(free[1].x, 400.0);
    }

    #[test]
    fn test_prune_keeps_one_of_identical() {
        let r = FreeRect {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
        };
        let mut free = vec![r, r];
        prune_contained(&mut free);
        assert_eq!(free.len(), 1);
    }

    #[test]
    fn test_overlapping_free_rects_both_split() {
        // Two overlapping maximal rects; placing in the overlap zone
        // must carve both.
        let mut s = sheet(1000.0, 1000.0);
        s.free = vec![
            FreeRect {
                x: 0.0,
                y: 0.0,
                width: 1000.0,
                height: 600.0,
            },
            FreeRect {
                x: 0.0,
                y: 0.0,
                width: 600.0,
                height: 1000.0,
            },
        ];
        let part = Part::new("a", 600.0, 600.0, 38.0).fixed_orientation();
        let cand = find_best(&s, &part, 0.0).unwrap();
        place(&mut s, &part, cand, 0.0);
        // remaining: 400 x 600 right sliver and 600 x 400 top sliver
        assert_eq!(s.free.len(), 2);
        for rect in &s.free {
            assert!(!rect.intersects(&FreeRect {
                x: 0.0,
                y: 0.0,
                width: 600.0,
                height: 600.0,
            }));
        }
    }
}
