//! Write engine integration tests: template and active-cell placement,
//! overwrite protection, and workbook picker behavior.

use mtf_workbench::config::TemplateParams;
use mtf_workbench::excel::{
    Cell, MemoryWorkbooks, Selection, SpreadsheetWriter, WriteEngine, WriteMode,
};
use mtf_workbench::MtfError;
use pretty_assertions::assert_eq;

fn sample_data(rows: usize) -> Vec<Vec<f64>> {
    // frequency, left, right, top, bottom; dyadic steps so cell values
    // compare exactly
    (0..rows)
        .map(|i| {
            let i = i as f64;
            vec![
                i * 0.5,
                1.0 - i * 0.125,
                1.0 - i * 0.25,
                1.0 - i * 0.375,
                1.0 - i * 0.5,
            ]
        })
        .collect()
}

fn engine_with_book() -> WriteEngine<MemoryWorkbooks> {
    let mut host = MemoryWorkbooks::new();
    host.add_book("qc.xlsx", &["MTF", "Scratch"]);
    let mut engine = WriteEngine::new(host, TemplateParams::default());
    engine.select_book("qc.xlsx");
    engine
}

// ========== Template Strategy Tests ==========

#[test]
fn test_template_write_places_configured_edge_pairs() {
    let mut engine = engine_with_book();
    let data = sample_data(3);

    engine
        .write_data("a.dcm", "hologic", "contact", &data)
        .unwrap();

    // Default hologic template: edges [left, top] from cell E3 = (3, 5),
    // emitted as (frequency, value) pairs.
    let host = engine.host();
    assert_eq!(host.cell("qc.xlsx", "MTF", 3, 5), Cell::Number(0.0));
    assert_eq!(host.cell("qc.xlsx", "MTF", 3, 6), Cell::Number(1.0));
    assert_eq!(host.cell("qc.xlsx", "MTF", 3, 7), Cell::Number(0.0));
    assert_eq!(host.cell("qc.xlsx", "MTF", 3, 8), Cell::Number(1.0));
    // second row: f = 0.5, left = 0.875, top = 0.625
    assert_eq!(host.cell("qc.xlsx", "MTF", 4, 5), Cell::Number(0.5));
    assert_eq!(host.cell("qc.xlsx", "MTF", 4, 6), Cell::Number(0.875));
    assert_eq!(host.cell("qc.xlsx", "MTF", 4, 8), Cell::Number(0.625));
    // only two edge pairs wide
    assert_eq!(host.cell("qc.xlsx", "MTF", 3, 9), Cell::Empty);
}

#[test]
fn test_template_write_missing_sheet_is_template_error() {
    let mut host = MemoryWorkbooks::new();
    host.add_book("qc.xlsx", &["Summary"]); // no MTF sheet
    let mut engine = WriteEngine::new(host, TemplateParams::default());
    engine.select_book("qc.xlsx");

    let err = engine
        .write_data("a.dcm", "hologic", "contact", &sample_data(2))
        .unwrap_err();
    assert!(matches!(err, MtfError::TemplateConfig(_)), "{:?}", err);
}

#[test]
fn test_template_write_unknown_mode_is_template_error() {
    let mut engine = engine_with_book();
    let err = engine
        .write_data("a.dcm", "hologic", "spot", &sample_data(2))
        .unwrap_err();
    assert!(matches!(err, MtfError::TemplateConfig(_)), "{:?}", err);
}

#[test]
fn test_template_write_unknown_manufacturer() {
    let mut engine = engine_with_book();
    let err = engine
        .write_data("a.dcm", "siemens", "contact", &sample_data(2))
        .unwrap_err();
    assert!(matches!(err, MtfError::UnsupportedManufacturer(_)));
}

#[test]
fn test_overwrite_protection_leaves_sheet_unmodified() {
    let mut engine = engine_with_book();
    // one value inside the destination rectangle
    engine
        .host_mut()
        .set_cell("qc.xlsx", "MTF", 4, 6, Cell::Text("taken".to_string()));

    let err = engine
        .write_data("a.dcm", "hologic", "contact", &sample_data(3))
        .unwrap_err();
    match err {
        MtfError::Overwrite(region) => {
            assert_eq!((region.row, region.col), (3, 5));
            assert_eq!(region.bottom_right(), (5, 8));
        }
        other => panic!("expected overwrite error, got {:?}", other),
    }

    // nothing else was written
    let host = engine.host();
    assert_eq!(host.cell("qc.xlsx", "MTF", 3, 5), Cell::Empty);
    assert_eq!(host.cell("qc.xlsx", "MTF", 4, 6), Cell::Text("taken".to_string()));
}

#[test]
fn test_write_into_fully_empty_region_succeeds() {
    let mut engine = engine_with_book();
    // value just outside the 3x4 destination block anchored at (3, 5)
    engine
        .host_mut()
        .set_cell("qc.xlsx", "MTF", 6, 5, Cell::Number(9.0));

    engine
        .write_data("a.dcm", "hologic", "contact", &sample_data(3))
        .unwrap();
    assert_eq!(engine.host().cell("qc.xlsx", "MTF", 5, 5), Cell::Number(1.0));
}

#[test]
fn test_short_rows_pad_missing_columns_as_empty() {
    let mut engine = engine_with_book();
    // second row carries frequency and left only
    let data = vec![vec![0.0, 1.0, 1.0, 1.0, 1.0], vec![0.5, 0.875]];

    engine
        .write_data("a.dcm", "hologic", "contact", &data)
        .unwrap();

    let host = engine.host();
    assert_eq!(host.cell("qc.xlsx", "MTF", 4, 5), Cell::Number(0.5));
    assert_eq!(host.cell("qc.xlsx", "MTF", 4, 6), Cell::Number(0.875));
    // the top pair has no value to draw from
    assert_eq!(host.cell("qc.xlsx", "MTF", 4, 8), Cell::Empty);
}

#[test]
fn test_nan_values_written_as_empty_cells() {
    let mut engine = engine_with_book();
    let mut data = sample_data(2);
    data[0][1] = f64::NAN; // left response missing in the first row

    engine
        .write_data("a.dcm", "hologic", "contact", &data)
        .unwrap();
    assert_eq!(engine.host().cell("qc.xlsx", "MTF", 3, 6), Cell::Empty);
    assert_eq!(engine.host().cell("qc.xlsx", "MTF", 3, 5), Cell::Number(0.0));
}

// ========== Active-Cell Strategy Tests ==========

fn select_cell(engine: &mut WriteEngine<MemoryWorkbooks>, address: &str, size: u32) {
    engine.host_mut().set_selection(Selection {
        book: "qc.xlsx".to_string(),
        sheet: "Scratch".to_string(),
        address: address.to_string(),
        size,
    });
}

#[test]
fn test_active_cell_requires_capture() {
    let mut engine = engine_with_book();
    engine.set_write_mode(WriteMode::ActiveCell);

    let err = engine
        .write_data("a.dcm", "hologic", "contact", &sample_data(2))
        .unwrap_err();
    assert!(matches!(err, MtfError::ActiveCell(_)));
}

#[test]
fn test_capture_rejects_multi_cell_selection() {
    let mut engine = engine_with_book();
    select_cell(&mut engine, "E3", 4);
    let err = engine.capture_active_cell().unwrap_err();
    assert!(matches!(err, MtfError::ActiveCell(_)));
}

#[test]
fn test_capture_rejects_selection_outside_selected_book() {
    let mut engine = engine_with_book();
    engine.host_mut().add_book("other.xlsx", &["Sheet1"]);
    engine.host_mut().set_selection(Selection {
        book: "other.xlsx".to_string(),
        sheet: "Sheet1".to_string(),
        address: "B2".to_string(),
        size: 1,
    });

    let err = engine.capture_active_cell().unwrap_err();
    assert!(matches!(err, MtfError::ActiveCell(_)));
    assert_eq!(engine.active_cell(), None);
}

#[test]
fn test_capture_strips_dollar_anchors() {
    let mut engine = engine_with_book();
    select_cell(&mut engine, "$E$3", 1);
    assert_eq!(engine.capture_active_cell().unwrap(), "E3");
    assert_eq!(engine.active_cell(), Some("E3"));
}

#[test]
fn test_active_cell_writes_headers_then_data() {
    let mut engine = engine_with_book();
    engine.set_write_mode(WriteMode::ActiveCell);
    select_cell(&mut engine, "E3", 1);
    engine.capture_active_cell().unwrap();

    engine
        .write_data("edge_01.dcm", "hologic", "contact", &sample_data(2))
        .unwrap();

    let host = engine.host();
    assert_eq!(
        host.cell("qc.xlsx", "Scratch", 3, 5),
        Cell::Text("edge_01.dcm".to_string())
    );
    assert_eq!(
        host.cell("qc.xlsx", "Scratch", 3, 6),
        Cell::Text("contact".to_string())
    );
    let labels: Vec<Cell> = (5..10)
        .map(|col| host.cell("qc.xlsx", "Scratch", 4, col))
        .collect();
    assert_eq!(
        labels,
        vec![
            Cell::Text("f".to_string()),
            Cell::Text("left".to_string()),
            Cell::Text("right".to_string()),
            Cell::Text("top".to_string()),
            Cell::Text("bottom".to_string()),
        ]
    );
    // data starts below the two header rows
    assert_eq!(host.cell("qc.xlsx", "Scratch", 5, 5), Cell::Number(0.0));
    assert_eq!(host.cell("qc.xlsx", "Scratch", 6, 9), Cell::Number(0.5));
}

#[test]
fn test_repeated_active_cell_writes_advance_by_stride() {
    let mut engine = engine_with_book();
    engine.set_write_mode(WriteMode::ActiveCell);
    select_cell(&mut engine, "E3", 1);
    engine.capture_active_cell().unwrap();

    for _ in 0..3 {
        engine
            .write_data("a.dcm", "hologic", "contact", &sample_data(2))
            .unwrap();
    }

    // anchors at columns 5, 10, 15
    let host = engine.host();
    for col in [5, 10, 15] {
        assert_eq!(
            host.cell("qc.xlsx", "Scratch", 3, col),
            Cell::Text("a.dcm".to_string()),
            "missing block at column {}",
            col
        );
    }
    assert_eq!(host.cell("qc.xlsx", "Scratch", 3, 20), Cell::Empty);
}

#[test]
fn test_recapture_resets_cursor() {
    let mut engine = engine_with_book();
    engine.set_write_mode(WriteMode::ActiveCell);
    select_cell(&mut engine, "E3", 1);
    engine.capture_active_cell().unwrap();
    engine
        .write_data("a.dcm", "hologic", "contact", &sample_data(1))
        .unwrap();

    // operator reselects a new anchor below the first block
    select_cell(&mut engine, "E20", 1);
    engine.capture_active_cell().unwrap();
    engine
        .write_data("b.dcm", "hologic", "contact", &sample_data(1))
        .unwrap();

    assert_eq!(
        engine.host().cell("qc.xlsx", "Scratch", 20, 5),
        Cell::Text("b.dcm".to_string())
    );
}

#[test]
fn test_active_cell_overwrite_protection() {
    let mut engine = engine_with_book();
    engine.set_write_mode(WriteMode::ActiveCell);
    select_cell(&mut engine, "A1", 1);
    engine.capture_active_cell().unwrap();
    engine
        .host_mut()
        .set_cell("qc.xlsx", "Scratch", 2, 3, Cell::Number(1.0));

    let err = engine
        .write_data("a.dcm", "hologic", "contact", &sample_data(2))
        .unwrap_err();
    assert!(matches!(err, MtfError::Overwrite(_)));
    assert_eq!(engine.host().cell("qc.xlsx", "Scratch", 1, 1), Cell::Empty);
}

// ========== Workbook Picker Tests ==========

#[test]
fn test_book_names_lists_sentinel_first_and_skips_selected() {
    let mut engine = engine_with_book();
    engine.host_mut().add_book("august.xlsx", &["MTF"]);

    let names = engine.book_names().unwrap();
    assert_eq!(names[0], "-");
    assert!(names.contains(&"august.xlsx".to_string()));
    assert!(!names.contains(&"qc.xlsx".to_string()));
}

#[test]
fn test_book_names_propagates_unavailable_host() {
    let mut engine = engine_with_book();
    engine.host_mut().set_connected(false);
    assert!(matches!(
        engine.book_names().unwrap_err(),
        MtfError::SpreadsheetUnavailable(_)
    ));
}
