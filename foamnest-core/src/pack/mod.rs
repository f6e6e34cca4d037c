//! Packing: assign every feasible part to a sheet and a position.
//!
//! Two strategies are available (see [`Strategy`](crate::config::Strategy)):
//! shelf rows for speed and predictability, maximal-rectangles best-area-fit
//! for density. Both honor the same clearance model: a placement may touch
//! the sheet rim (inside the configured margin), and any two placements on
//! a sheet keep at least `min_part_spacing` between their bounding boxes.

mod shelf;
mod smart;

use crate::config::{float_cmp, NestConfig, Strategy, EPS};
use crate::fit::{layers_needed, select_plan};
use crate::model::{LaminationPlan, Part, Placement, Sheet, StockClass, UnplacedReason};
use shelf::ShelfState;

/// An axis-aligned free rectangle on an open sheet.
///
/// Free rectangles live in the spacing-extended coordinate model: the
/// usable region is widened by one spacing on the far edges so that a
/// part inflated to `(w + spacing, h + spacing)` can still touch the rim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FreeRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FreeRect {
    pub fn x_max(&self) -> f64 {
        self.x + self.width
    }

    pub fn y_max(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Whether `other` lies fully inside this rectangle (epsilon-tolerant).
    pub fn contains(&self, other: &FreeRect) -> bool {
        float_cmp::le(self.x, other.x)
            && float_cmp::le(self.y, other.y)
            && float_cmp::ge(self.x_max(), other.x_max())
            && float_cmp::ge(self.y_max(), other.y_max())
    }

    /// Whether the rectangles overlap by more than epsilon.
    pub fn intersects(&self, other: &FreeRect) -> bool {
        self.x < other.x_max() - EPS
            && other.x < self.x_max() - EPS
            && self.y < other.y_max() - EPS
            && other.y < self.y_max() - EPS
    }
}

/// A sheet being filled by the packer, with its free-space bookkeeping.
#[derive(Debug, Clone)]
pub(crate) struct OpenSheet {
    pub class_idx: usize,
    pub width: f64,
    pub height: f64,
    pub placements: Vec<Placement>,
    pub free: Vec<FreeRect>,
}

/// Result of a packing run, before report aggregation.
#[derive(Debug)]
pub struct PackOutcome {
    /// Sheets in creation order, ids assigned 1-based.
    pub sheets: Vec<Sheet>,
    /// Lamination plan per placed part (part index, plan).
    pub plans: Vec<(usize, LaminationPlan)>,
    /// Parts that could not be placed (part index, reason).
    pub unplaced: Vec<(usize, UnplacedReason)>,
}

/// The packer: places every feasible part onto sheets of the catalog.
pub struct Packer<'a> {
    parts: &'a [Part],
    catalog: &'a [StockClass],
    config: &'a NestConfig,
}

impl<'a> Packer<'a> {
    pub fn new(parts: &'a [Part], catalog: &'a [StockClass], config: &'a NestConfig) -> Self {
        Self {
            parts,
            catalog,
            config,
        }
    }

    /// Run the full packing pipeline: fit selection, footprint
    /// feasibility, optional cross-class compression, placement.
    pub fn pack(&self) -> PackOutcome {
        let mut unplaced: Vec<(usize, UnplacedReason)> = Vec::new();
        let mut plans: Vec<(usize, LaminationPlan)> = Vec::new();

        for (idx, part) in self.parts.iter().enumerate() {
            match select_plan(part, self.catalog, self.config) {
                Ok(plan) => match self.footprint_feasible(part, plan) {
                    Ok(plan) => plans.push((idx, plan)),
                    Err(reason) => unplaced.push((idx, reason)),
                },
                Err(reason) => unplaced.push((idx, reason)),
            }
        }

        let assignment: Vec<(usize, usize)> = plans
            .iter()
            .map(|&(idx, plan)| (idx, plan.stock_class))
            .collect();

        let (sheets, extra_unplaced) = self.pack_with_compression(&assignment, &mut plans);
        for (idx, reason) in extra_unplaced {
            plans.retain(|&(i, _)| i != idx);
            unplaced.push((idx, reason));
        }
        unplaced.sort_by_key(|&(idx, _)| idx);

        let sheets = self.number_sheets(sheets);
        PackOutcome {
            sheets,
            plans,
            unplaced,
        }
    }

    /// Check that the part's footprint fits its planned class; fall back
    /// to the first declared class that covers both thickness and
    /// footprint, or report the part as oversize.
    fn footprint_feasible(
        &self,
        part: &Part,
        plan: LaminationPlan,
    ) -> Result<LaminationPlan, UnplacedReason> {
        if self.fits_class(part, plan.stock_class) {
            return Ok(plan);
        }
        for idx in 0..self.catalog.len() {
            if idx == plan.stock_class || !self.fits_class(part, idx) {
                continue;
            }
            if let Some(replan) = self.plan_on_class(part, idx) {
                return Ok(replan);
            }
        }
        Err(UnplacedReason::Oversize {
            width: part.width,
            height: part.height,
        })
    }

    fn usable(&self, class_idx: usize) -> (f64, f64) {
        let sc = &self.catalog[class_idx];
        (
            sc.sheet_width - 2.0 * self.config.sheet_margin,
            sc.sheet_height - 2.0 * self.config.sheet_margin,
        )
    }

    fn fits_class(&self, part: &Part, class_idx: usize) -> bool {
        let (uw, uh) = self.usable(class_idx);
        part.fits_within(uw, uh)
    }

    /// Lamination plan for the part on one specific class, if the class
    /// can reach the part's depth within the layer cap.
    fn plan_on_class(&self, part: &Part, class_idx: usize) -> Option<LaminationPlan> {
        let sc = &self.catalog[class_idx];
        let layers = layers_needed(part.depth, sc.thickness_per_layer);
        if layers > 1 && !self.config.allow_lamination {
            return None;
        }
        if layers > self.config.lamination_max_layers {
            return None;
        }
        Some(LaminationPlan {
            stock_class: class_idx,
            layer_count: layers,
        })
    }

    /// Pack the natural assignment and, when cross-class packing is
    /// enabled for the shelf strategy, compare it against compressing
    /// everything onto the largest class; the lower total sheet area wins.
    /// (The smart strategy already mixes classes of equal thickness via
    /// its new-sheet selection, so no second pass is needed there.)
    fn pack_with_compression(
        &self,
        assignment: &[(usize, usize)],
        plans: &mut Vec<(usize, LaminationPlan)>,
    ) -> (Vec<OpenSheet>, Vec<(usize, UnplacedReason)>) {
        let (sheets, extra) = self.pack_assignment(assignment);

        if !self.config.allow_cross_class
            || self.config.strategy != Strategy::Shelf
            || self.catalog.len() < 2
        {
            return (sheets, extra);
        }

        let largest = self.largest_class();
        if assignment.iter().all(|&(_, c)| c == largest) {
            return (sheets, extra);
        }

        // Compression candidate: every part on the largest class. Only
        // viable when every part still fits, thickness included.
        let mut compressed: Vec<(usize, usize)> = Vec::with_capacity(assignment.len());
        let mut replans: Vec<(usize, LaminationPlan)> = Vec::with_capacity(assignment.len());
        for &(idx, _) in assignment {
            let part = &self.parts[idx];
            if !self.fits_class(part, largest) {
                return (sheets, extra);
            }
            match self.plan_on_class(part, largest) {
                Some(plan) => {
                    compressed.push((idx, largest));
                    replans.push((idx, plan));
                }
                None => return (sheets, extra),
            }
        }

        let (alt_sheets, alt_extra) = self.pack_assignment(&compressed);
        let total_area =
            |s: &[OpenSheet]| -> f64 { s.iter().map(|sh| sh.width * sh.height).sum::<f64>() };
        if alt_extra.is_empty() && total_area(&alt_sheets) < total_area(&sheets) - EPS {
            tracing::debug!(
                sheets = alt_sheets.len(),
                class = %self.catalog[largest].name,
                "cross-class compression wins"
            );
            *plans = replans;
            return (alt_sheets, alt_extra);
        }
        (sheets, extra)
    }

    fn largest_class(&self) -> usize {
        let mut best = 0usize;
        for (idx, sc) in self.catalog.iter().enumerate() {
            if sc.area() > self.catalog[best].area() + EPS {
                best = idx;
            }
        }
        best
    }

    /// Pack one concrete part-to-class assignment.
    fn pack_assignment(
        &self,
        assignment: &[(usize, usize)],
    ) -> (Vec<OpenSheet>, Vec<(usize, UnplacedReason)>) {
        let mut sheets: Vec<OpenSheet> = Vec::new();
        let mut extra: Vec<(usize, UnplacedReason)> = Vec::new();

        match self.config.strategy {
            Strategy::Shelf => {
                // Shelf groups are per stock class, catalog order.
                for class_idx in 0..self.catalog.len() {
                    let group: Vec<usize> = assignment
                        .iter()
                        .filter(|&&(_, c)| c == class_idx)
                        .map(|&(i, _)| i)
                        .collect();
                    if group.is_empty() {
                        continue;
                    }
                    self.pack_group_shelf(&mut sheets, class_idx, group, &mut extra);
                }
            }
            Strategy::Smart => {
                // Smart groups are per thickness; classes of equal
                // thickness stay interchangeable when cross-class packing
                // is allowed.
                let mut seen: Vec<f64> = Vec::new();
                for sc in self.catalog {
                    if seen
                        .iter()
                        .any(|&t| float_cmp::approx_eq(t, sc.thickness_per_layer))
                    {
                        continue;
                    }
                    seen.push(sc.thickness_per_layer);
                    let group: Vec<(usize, usize)> = assignment
                        .iter()
                        .filter(|&&(_, c)| {
                            float_cmp::approx_eq(
                                self.catalog[c].thickness_per_layer,
                                sc.thickness_per_layer,
                            )
                        })
                        .copied()
                        .collect();
                    if group.is_empty() {
                        continue;
                    }
                    self.pack_group_smart(&mut sheets, sc.thickness_per_layer, group, &mut extra);
                }
            }
        }

        (sheets, extra)
    }

    fn is_small(&self, part: &Part) -> bool {
        part.max_dim() <= self.config.small_part_max_dim + EPS
            && part.area() <= self.config.small_part_max_area + EPS
    }

    // ----------------------------------------------------------------
    // Shelf strategy
    // ----------------------------------------------------------------

    fn pack_group_shelf(
        &self,
        sheets: &mut Vec<OpenSheet>,
        class_idx: usize,
        mut group: Vec<usize>,
        extra: &mut Vec<(usize, UnplacedReason)>,
    ) {
        // Tallest first, then widest; stable sort keeps input order on ties.
        group.sort_by(|&a, &b| {
            let (pa, pb) = (&self.parts[a], &self.parts[b]);
            pb.height
                .total_cmp(&pa.height)
                .then(pb.width.total_cmp(&pa.width))
        });

        let (stream, small_stream) = if self.config.mixed_small_large {
            (group, Vec::new())
        } else {
            let (small, large): (Vec<usize>, Vec<usize>) = group
                .into_iter()
                .partition(|&i| self.is_small(&self.parts[i]));
            (large, small)
        };

        let first_sheet = sheets.len();
        let deferred =
            self.shelf_stream(sheets, class_idx, stream, self.config.void_nesting, extra);

        let mut pending = deferred;
        pending.extend(small_stream);
        if pending.is_empty() {
            return;
        }

        if self.config.void_nesting {
            pending = self.void_fill(sheets, first_sheet, pending);
        }
        if !pending.is_empty() {
            // Whatever the void pass could not absorb goes onto fresh
            // sheets with no further deferral.
            let leftover = self.shelf_stream(sheets, class_idx, pending, false, extra);
            debug_assert!(leftover.is_empty());
        }
    }

    /// Pack a stream of parts onto shelf sheets of one class, opening
    /// sheets as needed. With `defer_smalls`, a new sheet is not opened
    /// when only small parts remain; those are returned for the
    /// void-nesting pass instead.
    fn shelf_stream(
        &self,
        sheets: &mut Vec<OpenSheet>,
        class_idx: usize,
        stream: Vec<usize>,
        defer_smalls: bool,
        extra: &mut Vec<(usize, UnplacedReason)>,
    ) -> Vec<usize> {
        let sc = &self.catalog[class_idx];
        let (uw, uh) = self.usable(class_idx);
        let margin = self.config.sheet_margin;
        let spacing = self.config.min_part_spacing;

        let mut remaining = stream;
        let mut opened_any = false;

        while !remaining.is_empty() {
            if defer_smalls && opened_any && remaining.iter().all(|&i| self.is_small(&self.parts[i]))
            {
                return remaining;
            }

            let mut sheet = OpenSheet {
                class_idx,
                width: sc.sheet_width,
                height: sc.sheet_height,
                placements: Vec::new(),
                free: Vec::new(),
            };
            let mut state = ShelfState::new();
            let mut next_remaining = Vec::new();

            for &idx in &remaining {
                let part = &self.parts[idx];
                match state.try_place(part, uw, uh, margin, spacing) {
                    Some(placement) => sheet.placements.push(placement),
                    None => next_remaining.push(idx),
                }
            }

            if sheet.placements.is_empty() {
                // No progress possible: the head of the stream fits no
                // empty sheet of this class. Pre-filtering makes this
                // unreachable, but never loop on it.
                let idx = remaining.remove(0);
                let part = &self.parts[idx];
                extra.push((
                    idx,
                    UnplacedReason::Oversize {
                        width: part.width,
                        height: part.height,
                    },
                ));
                continue;
            }

            sheet.free = state.finish(uw, uh, margin, spacing);
            sheets.push(sheet);
            opened_any = true;
            remaining = next_remaining;
        }

        Vec::new()
    }

    // ----------------------------------------------------------------
    // Smart strategy
    // ----------------------------------------------------------------

    fn pack_group_smart(
        &self,
        sheets: &mut Vec<OpenSheet>,
        thickness: f64,
        mut group: Vec<(usize, usize)>,
        extra: &mut Vec<(usize, UnplacedReason)>,
    ) {
        // Largest area first; stable sort keeps input order on ties.
        group.sort_by(|&(a, _), &(b, _)| {
            let (pa, pb) = (&self.parts[a], &self.parts[b]);
            pb.area()
                .total_cmp(&pa.area())
                .then(pb.height.total_cmp(&pa.height))
        });

        let (stream, small_stream) = if self.config.mixed_small_large {
            (group, Vec::new())
        } else {
            let (small, large): (Vec<(usize, usize)>, Vec<(usize, usize)>) = group
                .into_iter()
                .partition(|&(i, _)| self.is_small(&self.parts[i]));
            (large, small)
        };

        let first_sheet = sheets.len();
        let deferred = self.smart_stream(
            sheets,
            first_sheet,
            thickness,
            stream,
            self.config.void_nesting,
            extra,
        );

        let mut pending: Vec<(usize, usize)> = deferred;
        pending.extend(small_stream);
        if pending.is_empty() {
            return;
        }

        if self.config.void_nesting {
            let indices: Vec<usize> = pending.iter().map(|&(i, _)| i).collect();
            let still = self.void_fill(sheets, first_sheet, indices);
            pending.retain(|&(i, _)| still.contains(&i));
        }
        if !pending.is_empty() {
            // Remaining parts open fresh sheets only; with small/large
            // mixing disabled this keeps them off the large-part sheets.
            let start = sheets.len();
            let leftover = self.smart_stream(sheets, start, thickness, pending, false, extra);
            debug_assert!(leftover.is_empty());
        }
    }

    /// Place a stream of parts onto maximal-rectangles sheets of one
    /// thickness group, scanning sheets from `start` onward.
    fn smart_stream(
        &self,
        sheets: &mut Vec<OpenSheet>,
        start: usize,
        thickness: f64,
        stream: Vec<(usize, usize)>,
        defer_smalls: bool,
        extra: &mut Vec<(usize, UnplacedReason)>,
    ) -> Vec<(usize, usize)> {
        let spacing = self.config.min_part_spacing;
        let margin = self.config.sheet_margin;
        let mut deferred = Vec::new();

        for (idx, assigned_class) in stream {
            let part = &self.parts[idx];

            // Best placement across every open sheet of this group, in
            // sheet order; strict improvement keeps the earliest.
            let mut best: Option<(smart::Candidate, usize)> = None;
            for pos in start..sheets.len() {
                let sheet = &sheets[pos];
                if !float_cmp::approx_eq(
                    self.catalog[sheet.class_idx].thickness_per_layer,
                    thickness,
                ) {
                    continue;
                }
                if !self.config.allow_cross_class && sheet.class_idx != assigned_class {
                    continue;
                }
                if let Some(cand) = smart::find_best(sheet, part, spacing) {
                    let better = match &best {
                        None => true,
                        Some((b, _)) => cand.score < b.score,
                    };
                    if better {
                        best = Some((cand, pos));
                    }
                }
            }

            if let Some((cand, pos)) = best {
                smart::place(&mut sheets[pos], part, cand, spacing);
                continue;
            }

            if defer_smalls && sheets.len() > start && self.is_small(part) {
                deferred.push((idx, assigned_class));
                continue;
            }

            // Open a new sheet of the smallest class able to contain the
            // part: by area, then by aspect match, then catalog order.
            let class_idx = match self.choose_new_sheet_class(part, assigned_class, thickness) {
                Some(c) => c,
                None => {
                    extra.push((
                        idx,
                        UnplacedReason::Oversize {
                            width: part.width,
                            height: part.height,
                        },
                    ));
                    continue;
                }
            };

            let sc = &self.catalog[class_idx];
            let (uw, uh) = self.usable(class_idx);
            let mut sheet = OpenSheet {
                class_idx,
                width: sc.sheet_width,
                height: sc.sheet_height,
                placements: Vec::new(),
                free: vec![FreeRect {
                    x: margin,
                    y: margin,
                    width: uw + spacing,
                    height: uh + spacing,
                }],
            };
            match smart::find_best(&sheet, part, spacing) {
                Some(cand) => {
                    smart::place(&mut sheet, part, cand, spacing);
                    sheets.push(sheet);
                }
                None => {
                    extra.push((
                        idx,
                        UnplacedReason::Oversize {
                            width: part.width,
                            height: part.height,
                        },
                    ));
                }
            }
        }

        deferred
    }

    /// Class for a fresh smart sheet. Without cross-class packing the
    /// part stays on its assigned class; otherwise every class of the
    /// group's thickness competes.
    fn choose_new_sheet_class(
        &self,
        part: &Part,
        assigned_class: usize,
        thickness: f64,
    ) -> Option<usize> {
        if !self.config.allow_cross_class {
            return self
                .fits_class(part, assigned_class)
                .then_some(assigned_class);
        }

        let part_aspects = {
            let mut aspects = vec![part.width / part.height];
            if part.rotation_allowed {
                aspects.push(part.height / part.width);
            }
            aspects
        };

        let mut best: Option<(f64, f64, usize)> = None;
        for (idx, sc) in self.catalog.iter().enumerate() {
            if !float_cmp::approx_eq(sc.thickness_per_layer, thickness) {
                continue;
            }
            if !self.fits_class(part, idx) {
                continue;
            }
            let aspect_diff = part_aspects
                .iter()
                .map(|a| (sc.aspect() - a).abs())
                .fold(f64::INFINITY, f64::min);
            let better = match best {
                None => true,
                Some((b_area, b_aspect, _)) => {
                    sc.area() < b_area - EPS
                        || (float_cmp::approx_eq(sc.area(), b_area) && aspect_diff < b_aspect - EPS)
                }
            };
            if better {
                best = Some((sc.area(), aspect_diff, idx));
            }
        }
        best.map(|(_, _, idx)| idx)
    }

    // ----------------------------------------------------------------
    // Void-nesting pass
    // ----------------------------------------------------------------

    /// One scan over the leftover free rectangles of already-open sheets,
    /// absorbing small parts before any further sheet is opened. Returns
    /// the part indices that found no leftover space.
    fn void_fill(
        &self,
        sheets: &mut [OpenSheet],
        first_sheet: usize,
        pending: Vec<usize>,
    ) -> Vec<usize> {
        let spacing = self.config.min_part_spacing;
        let mut still = Vec::new();

        for idx in pending {
            let part = &self.parts[idx];
            let mut best: Option<(smart::Candidate, usize)> = None;
            for pos in first_sheet..sheets.len() {
                if let Some(cand) = smart::find_best(&sheets[pos], part, spacing) {
                    let better = match &best {
                        None => true,
                        Some((b, _)) => cand.score < b.score,
                    };
                    if better {
                        best = Some((cand, pos));
                    }
                }
            }
            match best {
                Some((cand, pos)) => {
                    tracing::debug!(part = %part.id, sheet = pos, "void-nested into leftover space");
                    smart::place(&mut sheets[pos], part, cand, spacing);
                }
                None => still.push(idx),
            }
        }

        still
    }

    // ----------------------------------------------------------------

    fn number_sheets(&self, open: Vec<OpenSheet>) -> Vec<Sheet> {
        open.into_iter()
            .enumerate()
            .map(|(i, s)| {
                let mut sheet = Sheet {
                    id: i + 1,
                    stock_class: s.class_idx,
                    stock_name: self.catalog[s.class_idx].name.clone(),
                    width: s.width,
                    height: s.height,
                    placements: s.placements,
                    utilization: 0.0,
                };
                sheet.utilization = sheet.computed_utilization();
                sheet
            })
            .collect()
    }
}
