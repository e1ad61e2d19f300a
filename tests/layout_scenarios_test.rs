use chrono::Utc;
use smart_slotting::domain::model::Score;
use smart_slotting::{
    build_layout, compute_priority_and_zone, normalize, LayoutFile, Metrics, SkuItem,
    WarehouseLayout, ZoneBand,
};
use smart_slotting::domain::ports::LayoutSource;
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn item(code: &str, metrics: Metrics, seq: u64) -> SkuItem {
    let score = compute_priority_and_zone(metrics.f, metrics.w, metrics.s, metrics.i).unwrap();
    SkuItem {
        sku_code: code.to_string(),
        product_name: Some(format!("{} product", code)),
        metrics,
        score,
        seq,
        created_at: Utc::now(),
    }
}

fn manual(code: &str, priority: f64, zone: &str, seq: u64) -> SkuItem {
    SkuItem {
        sku_code: code.to_string(),
        product_name: None,
        metrics: Metrics::default(),
        score: Score {
            priority,
            zone: zone.to_string(),
        },
        seq,
        created_at: Utc::now(),
    }
}

fn ranked(mut items: Vec<SkuItem>) -> Vec<SkuItem> {
    items.sort_by(SkuItem::rank_cmp);
    items
}

#[test]
fn test_twenty_by_eight_single_zone_scenario() {
    let layout = WarehouseLayout {
        width_m: 20.0,
        height_m: 8.0,
        cell_size_m: 4.0,
        zones: vec![ZoneBand::new("A", 0.0, 20.0)],
        rack: None,
    };
    let items = vec![
        manual("P1", 0.9, "A", 1),
        manual("P2", 0.8, "A", 2),
        manual("P3", 0.5, "A", 3),
    ];

    let report = build_layout(&layout, &items, None);

    let p1 = &report.placements[0];
    assert_eq!(p1.sku_code, "P1");
    assert_eq!(p1.x_m, 2.0);
    assert_eq!(p1.y_m, 2.0);
    assert_eq!(p1.position_id, "A-1-1");
    assert_eq!(report.counts["A"], 3);
}

#[test]
fn test_scored_items_spread_over_default_warehouse() {
    let items = ranked(vec![
        item("FAST", Metrics::new(1.0, 1.0, 1.0, 1.0), 1),
        item("BUSY", Metrics::new(0.8, 0.5, 0.2, 0.6), 2),
        item("MID", Metrics::new(0.5, 0.5, 0.5, 0.5), 3),
        item("SLOW", Metrics::new(0.1, 0.1, 0.1, 0.1), 4),
        item("IDLE", Metrics::new(0.0, 0.0, 0.0, 0.0), 5),
    ]);

    let report = build_layout(&WarehouseLayout::default(), &items, None);

    assert_eq!(report.placements.len(), 5);
    assert_eq!(report.counts["A"], 1);
    assert_eq!(report.counts["B"], 2);
    assert_eq!(report.counts["C"], 0);
    assert_eq!(report.counts["D"], 2);

    // every placement lies inside its zone band
    for placement in &report.placements {
        let band = report.warehouse.find_zone(&placement.zone).unwrap();
        assert!(placement.x_m > band.from_m && placement.x_m < band.to_m);
        assert!(placement.y_m > 0.0);
    }

    let idle = report
        .placements
        .iter()
        .find(|p| p.sku_code == "IDLE")
        .unwrap();
    assert_eq!(idle.position_id, "D-1-3");
}

#[test]
fn test_count_invariant_with_unresolvable_items() {
    let items = vec![
        manual("A1", 0.9, "A", 1),
        manual("X1", 0.8, "X", 2),
        manual("B1", 0.6, "B", 3),
        manual("X2", 0.4, "", 4),
        manual("X3", 0.35, "Y", 5),
    ];
    let overrides = HashMap::from([
        ("X3".to_string(), "c".to_string()),
        ("X2".to_string(), "nope".to_string()),
    ]);

    let report = build_layout(&WarehouseLayout::default(), &items, Some(&overrides));

    let total: usize = report.counts.values().sum();
    assert_eq!(total, 3);
    assert_eq!(total, report.placements.len());
    assert_eq!(report.counts["C"], 1);
}

#[test]
fn test_override_precedence() {
    let items = vec![manual("SKU", 0.1, "D", 1)];
    let overrides = HashMap::from([("SKU".to_string(), "A".to_string())]);

    let report = build_layout(&WarehouseLayout::default(), &items, Some(&overrides));

    assert_eq!(report.placements[0].zone, "A");
    assert_eq!(report.placements[0].position_id, "A-1-1");
    assert_eq!(report.placements[0].x_m, 2.08);
}

#[test]
fn test_build_layout_twice_is_identical() {
    let items = ranked(
        (0..25)
            .map(|n| {
                let v = (n % 10) as f64 / 10.0;
                item(&format!("SKU{:02}", n), Metrics::new(v, 1.0 - v, v, 0.5), n)
            })
            .collect(),
    );
    let layout = WarehouseLayout::default();

    let first = build_layout(&layout, &items, None);
    let second = build_layout(&layout, &items, None);

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_normalize_examples() {
    assert_eq!(normalize(300.0, 200.0), 1.0);
    assert_eq!(normalize(0.5, 200.0), 0.5);
}

#[test]
fn test_layout_from_json_file_drives_builder() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let content = r#"{
        "warehouse": {
            "width_m": 30,
            "height_m": 12,
            "cell_size_m": 3,
            "zones": [
                {"id": "FAST", "from_m": 0, "to_m": 12},
                {"id": "SLOW", "from_m": 12, "to_m": 30}
            ]
        }
    }"#;
    temp_file.write_all(content.as_bytes()).unwrap();

    let layout = LayoutFile::new(temp_file.path()).load_layout().unwrap();
    let items = vec![manual("P1", 0.9, "fast", 1), manual("P2", 0.2, "A", 2)];
    let report = build_layout(&layout, &items, None);

    assert_eq!(report.placements.len(), 1);
    assert_eq!(report.placements[0].zone, "FAST");
    assert_eq!(report.placements[0].position_id, "FAST-1-1");
    assert_eq!((report.placements[0].x_m, report.placements[0].y_m), (1.5, 1.5));
    assert_eq!(report.counts["SLOW"], 0);
}
