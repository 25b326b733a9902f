// Property-based tests for templated row insertion.
// CI: 64 cases (default). Soak: PROPTEST_CASES=2000 cargo test --release

use calc_fields::{CellAccess, CellAddress, CellContent, MemoryDocument, RowInserter};
use proptest::prelude::*;

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(64),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

fn template_value(column: i32) -> CellContent {
    CellContent::from(format!("F{}.1", column + 1))
}

/// Document with a template row below `anchor_row` and a marker below that
fn template_doc(anchor_row: i32, width: i32) -> MemoryDocument {
    let mut doc = MemoryDocument::with_sheet("Sheet1");
    doc.set_cell_string(CellAddress::new(0, 0, anchor_row), "anchor")
        .unwrap();
    for column in 0..width {
        doc.set(CellAddress::new(0, column, anchor_row + 1), template_value(column))
            .unwrap();
    }
    doc.set_cell_string(CellAddress::new(0, 0, anchor_row + 2), "end")
        .unwrap();
    doc
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn every_group_starts_with_the_template(
        anchor_row in 0..40i32,
        groups in 1..5i32,
        stride in 1..4i32,
        width in 1..6i32,
    ) {
        let mut doc = template_doc(anchor_row, width);
        let anchor = CellAddress::new(0, 0, anchor_row);

        let inserted = RowInserter::new(&mut doc)
            .insert_rows(anchor, groups, stride, width)
            .unwrap();
        prop_assert!(inserted);

        for k in 0..groups {
            let row = anchor_row + 1 + k * stride;
            for column in 0..width {
                prop_assert_eq!(doc.get(CellAddress::new(0, column, row)), template_value(column));
            }
        }
    }

    #[test]
    fn spacer_rows_stay_blank(
        anchor_row in 0..40i32,
        groups in 1..5i32,
        stride in 2..4i32,
    ) {
        let mut doc = template_doc(anchor_row, 3);
        RowInserter::new(&mut doc)
            .insert_rows(CellAddress::new(0, 0, anchor_row), groups, stride, 3)
            .unwrap();

        for k in 0..groups {
            for gap in 1..stride {
                let row = anchor_row + 1 + k * stride + gap;
                prop_assert_eq!(doc.get(CellAddress::new(0, 0, row)), CellContent::Empty);
            }
        }
    }

    #[test]
    fn rows_below_move_by_the_inserted_count(
        anchor_row in 0..40i32,
        groups in 1..5i32,
        stride in 1..4i32,
    ) {
        let mut doc = template_doc(anchor_row, 2);
        RowInserter::new(&mut doc)
            .insert_rows(CellAddress::new(0, 0, anchor_row), groups, stride, 2)
            .unwrap();

        let end_row = anchor_row + 2 + groups * stride;
        prop_assert_eq!(doc.get(CellAddress::new(0, 0, end_row)), CellContent::from("end"));
        prop_assert_eq!(doc.get(CellAddress::new(0, 0, anchor_row)), CellContent::from("anchor"));
    }
}
