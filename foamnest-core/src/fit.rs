//! Fit selection: resolve each part's stock thickness and layer count.

use crate::config::{NestConfig, EPS};
use crate::model::{LaminationPlan, Part, StockClass, UnplacedReason};

/// Number of stacked layers of `thickness` needed to cover `depth`.
///
/// Epsilon-tolerant so that exact multiples (e.g. 76.2 / 38.1) do not
/// round up on floating-point noise.
pub fn layers_needed(depth: f64, thickness: f64) -> u32 {
    let layers = ((depth - EPS) / thickness).ceil();
    if layers < 1.0 {
        1
    } else {
        layers as u32
    }
}

/// Choose a lamination plan for one part.
///
/// Pure function of part + catalog + config:
/// - a single layer on the class with the smallest covering thickness
///   when one exists;
/// - otherwise, with lamination enabled, the class minimizing the layer
///   count within the cap, ties broken by total consumed thickness, then
///   by catalog declaration order;
/// - otherwise the part is infeasible.
pub fn select_plan(
    part: &Part,
    catalog: &[StockClass],
    config: &NestConfig,
) -> Result<LaminationPlan, UnplacedReason> {
    // Single-layer pass: smallest thickness that still covers the depth.
    let mut single: Option<(f64, usize)> = None;
    for (idx, sc) in catalog.iter().enumerate() {
        if sc.thickness_per_layer + EPS >= part.depth {
            match single {
                Some((best, _)) if sc.thickness_per_layer >= best => {}
                _ => single = Some((sc.thickness_per_layer, idx)),
            }
        }
    }
    if let Some((_, idx)) = single {
        return Ok(LaminationPlan::single(idx));
    }

    let max_single = catalog
        .iter()
        .map(|sc| sc.thickness_per_layer)
        .fold(0.0_f64, f64::max);

    if !config.allow_lamination {
        return Err(UnplacedReason::TooThick {
            depth: part.depth,
            max_thickness: max_single,
        });
    }

    // Lamination pass: fewest layers within the cap, then least consumed
    // thickness, then declaration order.
    let mut best: Option<(u32, f64, usize)> = None;
    for (idx, sc) in catalog.iter().enumerate() {
        let layers = layers_needed(part.depth, sc.thickness_per_layer);
        if layers > config.lamination_max_layers {
            continue;
        }
        let consumed = layers as f64 * sc.thickness_per_layer;
        let better = match best {
            None => true,
            Some((b_layers, b_consumed, _)) => {
                layers < b_layers || (layers == b_layers && consumed < b_consumed - EPS)
            }
        };
        if better {
            best = Some((layers, consumed, idx));
        }
    }

    match best {
        Some((layers, _, idx)) => Ok(LaminationPlan {
            stock_class: idx,
            layer_count: layers,
        }),
        None => Err(UnplacedReason::TooThick {
            depth: part.depth,
            max_thickness: max_single * config.lamination_max_layers as f64,
        }),
    }
}
