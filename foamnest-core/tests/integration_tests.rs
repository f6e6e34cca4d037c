//! Integration tests for the nesting pipeline.
//!
//! These tests validate the structural correctness of placement reports
//! (bounds, clearance, feasibility bookkeeping) rather than pinning exact
//! coordinates, so that placement-order refinements do not churn the
//! suite. Every valid run must satisfy the layout invariants checked by
//! `assert_report_valid`.

use foamnest_core::model::default_catalog;
use foamnest_core::{nest, NestConfig, NestError, Part, PlacementReport, StockClass, Strategy};

/// Validates a complete report:
/// 1. Every placement lies within its sheet's bounds
/// 2. No two placements on a sheet are closer than the spacing
/// 3. Every part is either placed or listed as unplaced, never both
fn assert_report_valid(report: &PlacementReport, parts: &[Part], config: &NestConfig) {
    for sheet in &report.sheets {
        for p in &sheet.placements {
            assert!(
                sheet.contains(p),
                "sheet {}: part '{}' at ({}, {}) size {}x{} exceeds {}x{}",
                sheet.id,
                p.part_id,
                p.x,
                p.y,
                p.width,
                p.height,
                sheet.width,
                sheet.height
            );
        }
        for i in 0..sheet.placements.len() {
            for j in (i + 1)..sheet.placements.len() {
                let a = &sheet.placements[i];
                let b = &sheet.placements[j];
                assert!(
                    !a.violates_clearance(b, config.min_part_spacing),
                    "sheet {}: '{}' and '{}' closer than {} mm",
                    sheet.id,
                    a.part_id,
                    b.part_id,
                    config.min_part_spacing
                );
            }
        }
    }

    for part in parts {
        let placed = report.placement(&part.id).is_some();
        let listed = report.unplaced.iter().any(|u| u.part_id == part.id);
        assert!(
            placed ^ listed,
            "part '{}': placed={} unplaced-listed={}",
            part.id,
            placed,
            listed
        );
    }
}

fn std_only() -> Vec<StockClass> {
    vec![StockClass::new("STD", 1219.2, 2438.4, 38.1)]
}

fn config(strategy: Strategy, spacing: f64) -> NestConfig {
    NestConfig::default()
        .with_strategy(strategy)
        .with_spacing(spacing)
        .with_margin(0.0)
}

// ==================== Basic placement ====================

#[test]
fn test_two_panels_on_standard_stock() {
    // A full wall panel and a half panel, both a single layer of 38.1 mm
    // stock. Together they exceed one STD sheet's area, so two sheets.
    let parts = vec![
        Part::new("wall_01", 1200.0, 2400.0, 38.0),
        Part::new("shelf_02", 600.0, 1200.0, 38.0),
    ];
    for strategy in [Strategy::Shelf, Strategy::Smart] {
        let cfg = config(strategy, 5.0);
        let report = nest(&parts, &std_only(), &cfg).unwrap();
        assert_report_valid(&report, &parts, &cfg);
        assert!(report.all_placed(), "strategy {:?}", strategy);
        assert_eq!(report.plans["wall_01"].layer_count, 1);
        assert_eq!(report.plans["shelf_02"].layer_count, 1);
        assert_eq!(report.sheet_count(), 2);
        for sheet in &report.sheets {
            assert!(sheet.utilization > 0.0 && sheet.utilization <= 1.0);
        }
    }
}

#[test]
fn test_two_panels_share_a_wide_sheet() {
    // On 6x10 stock the half panel fits beside the wall panel.
    let parts = vec![
        Part::new("wall_01", 1200.0, 2400.0, 38.0),
        Part::new("shelf_02", 600.0, 1200.0, 38.0),
    ];
    let catalog = vec![StockClass::new("WIDE_6x10", 1828.8, 3048.0, 38.1)];
    let cfg = config(Strategy::Smart, 5.0);
    let report = nest(&parts, &catalog, &cfg).unwrap();
    assert_report_valid(&report, &parts, &cfg);
    assert!(report.all_placed());
    assert_eq!(report.sheet_count(), 1);
}

#[test]
fn test_empty_part_list() {
    let report = nest(&[], &std_only(), &NestConfig::default()).unwrap();
    assert_eq!(report.sheet_count(), 0);
    assert!(report.all_placed());
    assert_eq!(report.total_waste_percent, 0.0);
}

// ==================== Lamination ====================

#[test]
fn test_lamination_three_layers() {
    // depth 100 on 38.1 stock: ceil(100 / 38.1) = 3, and 3 x 38.1 covers it
    let parts = vec![Part::new("block", 500.0, 500.0, 100.0)];
    let mut cfg = config(Strategy::Smart, 5.0);
    cfg.lamination_max_layers = 3;
    let report = nest(&parts, &std_only(), &cfg).unwrap();
    assert!(report.all_placed());
    assert_eq!(report.plans["block"].layer_count, 3);
}

#[test]
fn test_lamination_cap_too_low_reports_unplaced() {
    // Same part at a cap of 2: 2 x 38.1 = 76.2 < 100, infeasible; the
    // rest of the run still completes.
    let parts = vec![
        Part::new("block", 500.0, 500.0, 100.0),
        Part::new("panel", 800.0, 800.0, 38.0),
    ];
    let mut cfg = config(Strategy::Smart, 5.0);
    cfg.lamination_max_layers = 2;
    let report = nest(&parts, &std_only(), &cfg).unwrap();
    assert_report_valid(&report, &parts, &cfg);
    assert_eq!(report.unplaced.len(), 1);
    assert_eq!(report.unplaced[0].part_id, "block");
    assert_eq!(report.unplaced[0].reason.code(), "too_thick");
    assert!(report.placement("panel").is_some());
    assert_eq!(report.sheet_count(), 1);
}

#[test]
fn test_lamination_disabled_rejects_thick_part() {
    let parts = vec![Part::new("block", 500.0, 500.0, 100.0)];
    let mut cfg = config(Strategy::Smart, 5.0);
    cfg.allow_lamination = false;
    let report = nest(&parts, &std_only(), &cfg).unwrap();
    assert_eq!(report.unplaced.len(), 1);
    assert_eq!(report.sheet_count(), 0);
}

// ==================== Feasibility boundaries ====================

#[test]
fn test_spacing_feasibility_boundary() {
    // Two 700 x 700 parts on a 1219.2 mm square: 700 + 10 + 700 = 1410
    // exceeds the sheet side in every arrangement, so two sheets.
    let parts = vec![
        Part::new("a", 700.0, 700.0, 38.0),
        Part::new("b", 700.0, 700.0, 38.0),
    ];
    let catalog = vec![StockClass::new("SQ", 1219.2, 1219.2, 38.1)];
    let cfg = config(Strategy::Smart, 10.0);
    let report = nest(&parts, &catalog, &cfg).unwrap();
    assert_report_valid(&report, &parts, &cfg);
    assert!(report.all_placed());
    assert_eq!(report.sheet_count(), 2);

    // At 600 wide they fit side by side on one sheet: 600+10+600 = 1210.
    let parts = vec![
        Part::new("a", 600.0, 700.0, 38.0),
        Part::new("b", 600.0, 700.0, 38.0),
    ];
    let report = nest(&parts, &catalog, &cfg).unwrap();
    assert_report_valid(&report, &parts, &cfg);
    assert_eq!(report.sheet_count(), 1);
}

#[test]
fn test_rotation_required_to_fit() {
    // 1300 wide only fits the 1219.2 mm sheet width after rotation.
    let parts = vec![Part::new("long", 1300.0, 600.0, 38.0)];
    let cfg = config(Strategy::Smart, 5.0);
    let report = nest(&parts, &std_only(), &cfg).unwrap();
    assert!(report.all_placed());
    assert!(report.placement("long").unwrap().rotated);

    let fixed = vec![Part::new("long", 1300.0, 600.0, 38.0).fixed_orientation()];
    let report = nest(&fixed, &std_only(), &cfg).unwrap();
    assert_eq!(report.unplaced.len(), 1);
    assert_eq!(report.unplaced[0].reason.code(), "oversize");
}

// ==================== Determinism and monotonicity ====================

#[test]
fn test_identical_runs_identical_reports() {
    let parts = mixed_batch();
    for strategy in [Strategy::Shelf, Strategy::Smart] {
        let cfg = config(strategy, 6.0);
        let a = nest(&parts, &default_catalog(), &cfg).unwrap();
        let b = nest(&parts, &default_catalog(), &cfg).unwrap();
        assert_eq!(
            a.to_json_pretty().unwrap(),
            b.to_json_pretty().unwrap(),
            "strategy {:?} not deterministic",
            strategy
        );
    }
}

#[test]
fn test_more_spacing_never_fewer_sheets() {
    // Uniform squares keep the comparison clean across spacing levels.
    let parts: Vec<Part> = (0..12)
        .map(|i| Part::new(format!("sq_{:02}", i), 500.0, 500.0, 38.0))
        .collect();
    for strategy in [Strategy::Shelf, Strategy::Smart] {
        let mut last = 0;
        for spacing in [0.0, 5.0, 20.0, 100.0, 250.0] {
            let cfg = config(strategy, spacing);
            let report = nest(&parts, &std_only(), &cfg).unwrap();
            assert_report_valid(&report, &parts, &cfg);
            assert!(report.all_placed());
            assert!(
                report.sheet_count() >= last,
                "strategy {:?}: spacing {} used {} sheets, below previous {}",
                strategy,
                spacing,
                report.sheet_count(),
                last
            );
            last = report.sheet_count();
        }
    }
}

// ==================== Mixed batches ====================

fn mixed_batch() -> Vec<Part> {
    vec![
        Part::new("Layer_01_part_01", 800.0, 600.0, 38.0),
        Part::new("Layer_01_part_02", 400.0, 300.0, 38.0),
        Part::new("Layer_02_part_01", 600.0, 400.0, 38.0),
        Part::new("Layer_02_part_02", 1200.0, 600.0, 38.0),
        Part::new("Layer_03_part_01", 300.0, 200.0, 38.0),
        Part::new("Layer_03_part_02", 500.0, 500.0, 38.0).fixed_orientation(),
        Part::new("Layer_04_part_01", 700.0, 500.0, 38.0),
        Part::new("Layer_04_part_02", 350.0, 250.0, 38.0),
        Part::new("Layer_05_part_01", 1000.0, 400.0, 38.0),
        Part::new("Layer_05_part_02", 450.0, 450.0, 38.0).fixed_orientation(),
        Part::new("Layer_06_part_01", 600.0, 300.0, 38.0),
        Part::new("Layer_06_part_02", 250.0, 150.0, 38.0),
        Part::new("Layer_07_part_01", 800.0, 400.0, 38.0),
        Part::new("Layer_07_part_02", 900.0, 600.0, 38.0),
        Part::new("Layer_08_part_01", 500.0, 250.0, 38.0),
        Part::new("Layer_08_part_02", 300.0, 300.0, 38.0),
    ]
}

#[test]
fn test_mixed_batch_all_placed_both_strategies() {
    let parts = mixed_batch();
    let total_area: f64 = parts.iter().map(Part::area).sum();
    for strategy in [Strategy::Shelf, Strategy::Smart] {
        let cfg = config(strategy, 6.0);
        let report = nest(&parts, &std_only(), &cfg).unwrap();
        assert_report_valid(&report, &parts, &cfg);
        assert!(report.all_placed(), "strategy {:?}", strategy);

        // Area lower bound on sheet count.
        let sheet_area = 1219.2 * 2438.4;
        let min_sheets = (total_area / sheet_area).ceil() as usize;
        assert!(report.sheet_count() >= min_sheets);
        assert!(report.total_waste_percent >= 0.0 && report.total_waste_percent < 100.0);
    }
}

#[test]
fn test_default_catalog_run_with_margin() {
    let parts = mixed_batch();
    for strategy in [Strategy::Shelf, Strategy::Smart] {
        let cfg = config(strategy, 6.0).with_margin(10.0);
        let report = nest(&parts, &default_catalog(), &cfg).unwrap();
        assert_report_valid(&report, &parts, &cfg);
        assert!(report.all_placed());
        // The margin keeps every placement off the sheet rim.
        for sheet in &report.sheets {
            for p in &sheet.placements {
                assert!(p.x >= 10.0 - 1e-6 && p.y >= 10.0 - 1e-6);
                assert!(p.x_max() <= sheet.width - 10.0 + 1e-6);
                assert!(p.y_max() <= sheet.height - 10.0 + 1e-6);
            }
        }
    }
}

// ==================== Configuration errors ====================

#[test]
fn test_empty_catalog_is_fatal() {
    let parts = vec![Part::new("a", 100.0, 100.0, 38.0)];
    let err = nest(&parts, &[], &NestConfig::default()).unwrap_err();
    assert!(matches!(err, NestError::EmptyStockCatalog));
}

#[test]
fn test_negative_spacing_is_fatal() {
    let parts = vec![Part::new("a", 100.0, 100.0, 38.0)];
    let cfg = NestConfig::default().with_spacing(-2.0);
    let err = nest(&parts, &std_only(), &cfg).unwrap_err();
    assert!(matches!(err, NestError::NegativeSpacing { .. }));
}

#[test]
fn test_zero_layer_cap_is_fatal() {
    let parts = vec![Part::new("a", 100.0, 100.0, 38.0)];
    let cfg = NestConfig::default().with_max_layers(0);
    let err = nest(&parts, &std_only(), &cfg).unwrap_err();
    assert!(matches!(err, NestError::InvalidMaxLayers { .. }));
}

// ==================== Small-part handling ====================

#[test]
fn test_small_parts_share_sheets_when_mixed() {
    let mut parts = vec![Part::new("big", 1100.0, 2200.0, 38.0).fixed_orientation()];
    for i in 0..4 {
        parts.push(Part::new(format!("small_{}", i), 100.0, 100.0, 38.0));
    }
    let mut cfg = config(Strategy::Smart, 5.0);
    cfg.mixed_small_large = true;
    let report = nest(&parts, &std_only(), &cfg).unwrap();
    assert_report_valid(&report, &parts, &cfg);
    assert!(report.all_placed());
    // The 100 mm squares fit in the leftover strip beside the big part.
    assert_eq!(report.sheet_count(), 1);
}

#[test]
fn test_small_parts_dedicated_sheet_when_unmixed() {
    let mut parts = vec![Part::new("big", 1100.0, 2200.0, 38.0).fixed_orientation()];
    for i in 0..4 {
        parts.push(Part::new(format!("small_{}", i), 100.0, 100.0, 38.0));
    }
    let mut cfg = config(Strategy::Smart, 5.0);
    cfg.mixed_small_large = false;
    cfg.void_nesting = false;
    let report = nest(&parts, &std_only(), &cfg).unwrap();
    assert_report_valid(&report, &parts, &cfg);
    assert!(report.all_placed());
    assert_eq!(report.sheet_count(), 2);
    // The big part's sheet carries only the big part.
    let big_sheet = report.placement("big").unwrap().sheet;
    let sheet = report.sheets.iter().find(|s| s.id == big_sheet).unwrap();
    assert_eq!(sheet.placements.len(), 1);
}

#[test]
fn test_void_nesting_rescues_unmixed_smalls() {
    // Same batch with void nesting on: the smalls land in the leftover
    // strip instead of opening a dedicated sheet.
    let mut parts = vec![Part::new("big", 1100.0, 2200.0, 38.0).fixed_orientation()];
    for i in 0..4 {
        parts.push(Part::new(format!("small_{}", i), 100.0, 100.0, 38.0));
    }
    let mut cfg = config(Strategy::Smart, 5.0);
    cfg.mixed_small_large = false;
    cfg.void_nesting = true;
    let report = nest(&parts, &std_only(), &cfg).unwrap();
    assert_report_valid(&report, &parts, &cfg);
    assert!(report.all_placed());
    assert_eq!(report.sheet_count(), 1);
}
