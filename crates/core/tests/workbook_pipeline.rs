//! Integration test: build real workbooks in memory, run them through
//! ingestion and the studio, and check what lands on each surface.

use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook;
use shelfmark_core::model::CodeKind;
use shelfmark_core::surface::FrameSurface;
use shelfmark_core::symbology::{self, Symbol};
use shelfmark_core::views::SurfaceFrame;
use shelfmark_core::{Studio, parse_workbook};
use shelfmark_protocol::RenderCommand;

const HEADERS: [&str; 5] = ["Flecha", "code", "Estante", "Modulo", "Nivel"];

/// One sheet with the standard header row followed by `rows`.
fn workbook(rows: &[[&str; 5]]) -> Vec<u8> {
    let mut book = Workbook::new();
    let sheet = book.add_worksheet();
    for (col, header) in HEADERS.iter().enumerate() {
        sheet
            .write_string(0, col as u16, *header)
            .expect("write header");
    }
    for (r, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            if !value.is_empty() {
                sheet
                    .write_string(r as u32 + 1, col as u16, *value)
                    .expect("write cell");
            }
        }
    }
    book.save_to_buffer().expect("serialize workbook")
}

fn codes(studio: &Studio<FrameSurface>) -> Vec<String> {
    studio.records().iter().map(|r| r.code.clone()).collect()
}

fn load(studio: &mut Studio<FrameSurface>, bytes: &[u8]) {
    let ticket = studio.begin_load();
    let outcome = studio
        .finish_load(ticket, bytes, Some("labels.xlsx".into()))
        .expect("load workbook");
    assert!(outcome.applied);
}

fn drawn_texts(frame: &SurfaceFrame) -> Vec<String> {
    frame
        .commands
        .iter()
        .filter_map(|c| match c {
            RenderCommand::DrawText { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn rows_become_records_in_order() {
    let bytes = workbook(&[
        ["→", "A-001", "E1", "M1", "1"],
        ["←", "A-002", "E1", "M1", "2"],
        ["↑", "A-003", "E2", "M4", "3"],
    ]);
    let ingested = parse_workbook(&bytes).expect("parse");
    assert_eq!(ingested.sheet_name, "Sheet1");
    assert_eq!(ingested.records.len(), 3);

    let first = &ingested.records[0];
    assert_eq!(first.arrow, "→");
    assert_eq!(first.code, "A-001");
    assert_eq!(first.shelf, "E1");
    assert_eq!(first.module, "M1");
    assert_eq!(first.level, "1");
    assert_eq!(first.row, 2);
    assert_eq!(ingested.records[2].row, 4);
}

#[test]
fn numeric_cells_read_as_plain_text() {
    let mut book = Workbook::new();
    let sheet = book.add_worksheet();
    sheet.write_string(0, 0, "code").expect("header");
    sheet.write_string(0, 1, "level").expect("header");
    sheet.write_number(1, 0, 4711.0).expect("code");
    sheet.write_number(1, 1, 3.0).expect("level");
    let bytes = book.save_to_buffer().expect("serialize");

    let ingested = parse_workbook(&bytes).expect("parse");
    assert_eq!(ingested.records[0].code, "4711");
    assert_eq!(ingested.records[0].level, "3");
}

#[test]
fn only_the_first_sheet_is_read() {
    let mut book = Workbook::new();
    {
        let first = book.add_worksheet();
        first.set_name("Labels").expect("name");
        first.write_string(0, 0, "code").expect("header");
        first.write_string(1, 0, "FIRST").expect("cell");
    }
    {
        let second = book.add_worksheet();
        second.write_string(0, 0, "code").expect("header");
        second.write_string(1, 0, "SECOND").expect("cell");
        second.write_string(2, 0, "SECOND-2").expect("cell");
    }
    let bytes = book.save_to_buffer().expect("serialize");

    let ingested = parse_workbook(&bytes).expect("parse");
    assert_eq!(ingested.sheet_name, "Labels");
    let codes: Vec<_> = ingested.records.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, vec!["FIRST"]);
}

#[test]
fn header_only_sheet_is_empty_not_an_error() {
    let mut studio = Studio::<FrameSurface>::default();
    load(&mut studio, &workbook(&[]));
    assert!(studio.records().is_empty());

    let report = studio.render_all();
    assert_eq!(report.drawn, 0);
    assert_eq!(report.skipped, 0);
    assert!(studio.surfaces().is_empty());
}

#[test]
fn reload_replaces_previous_records() {
    let mut studio = Studio::<FrameSurface>::default();
    load(
        &mut studio,
        &workbook(&[["", "A", "", "", ""], ["", "B", "", "", ""]]),
    );
    assert_eq!(codes(&studio), vec!["A", "B"]);

    load(&mut studio, &workbook(&[["", "C", "", "", ""]]));
    assert_eq!(codes(&studio), vec!["C"]);
}

#[test]
fn malformed_bytes_leave_state_untouched() {
    let mut studio = Studio::<FrameSurface>::default();
    load(&mut studio, &workbook(&[["", "KEEP", "", "", ""]]));

    let ticket = studio.begin_load();
    assert!(studio.finish_load(ticket, b"PK\x03\x04 broken", None).is_err());
    assert_eq!(codes(&studio), vec!["KEEP"]);
}

#[test]
fn abc123_renders_as_both_kinds() {
    let mut studio = Studio::<FrameSurface>::default();
    load(&mut studio, &workbook(&[["", "ABC123", "", "", ""]]));
    studio.attach(0, FrameSurface::new()).expect("attach");

    let frame = studio
        .surfaces()
        .get(0)
        .and_then(FrameSurface::frame)
        .cloned()
        .expect("barcode frame");
    assert_eq!(drawn_texts(&frame), vec!["ABC123"]);
    assert!(frame.error.is_none());

    studio.select_kind(CodeKind::QrCode);
    let Ok(Symbol::Matrix(ours)) = symbology::encode("ABC123", CodeKind::QrCode) else {
        panic!("QR encoding failed");
    };
    let reference = qrcode::QrCode::new(b"ABC123").expect("reference QR");
    let dark: Vec<bool> = reference
        .to_colors()
        .into_iter()
        .map(|c| c == qrcode::Color::Dark)
        .collect();
    assert_eq!(ours.width, reference.width());
    assert_eq!(ours.modules, dark);

    let frame = studio
        .surfaces()
        .get(0)
        .and_then(FrameSurface::frame)
        .cloned()
        .expect("qr frame");
    assert_eq!(frame.width, studio.style().qr_width);
    assert!(drawn_texts(&frame).is_empty());
}

#[test]
fn toggling_kind_back_and_forth_is_idempotent() {
    let mut studio = Studio::<FrameSurface>::default();
    load(
        &mut studio,
        &workbook(&[["→", "X-1", "E", "M", "1"], ["", "12345678", "", "", ""]]),
    );
    let before = studio.print_sheet();

    studio.select_kind(CodeKind::QrCode);
    assert_ne!(studio.print_sheet(), before);
    studio.select_kind(CodeKind::Barcode);
    assert_eq!(studio.print_sheet(), before);
}

#[test]
fn duplicate_codes_get_distinct_surfaces() {
    let mut studio = Studio::<FrameSurface>::default();
    load(
        &mut studio,
        &workbook(&[["", "DUP", "E1", "", ""], ["", "DUP", "E2", "", ""]]),
    );
    studio.attach(0, FrameSurface::new()).expect("attach 0");
    studio.attach(1, FrameSurface::new()).expect("attach 1");

    let report = studio.render_all();
    assert_eq!(report.drawn, 2);
    assert_eq!(studio.surfaces().len(), 2);
    for index in 0..2 {
        let paints = studio.surfaces().get(index).map(FrameSurface::paints);
        assert_eq!(paints, Some(2), "surface {index}");
    }
}

#[test]
fn stale_load_is_ignored() {
    let mut studio = Studio::<FrameSurface>::default();
    let slow = studio.begin_load();
    let fast = studio.begin_load();

    let newer = workbook(&[["", "NEW", "", "", ""]]);
    let older = workbook(&[["", "OLD", "", "", ""], ["", "OLDER", "", "", ""]]);

    let applied = studio.finish_load(fast, &newer, None).expect("fast load");
    assert!(applied.applied);
    let ignored = studio.finish_load(slow, &older, None).expect("slow load");
    assert!(!ignored.applied);
    assert_eq!(codes(&studio), vec!["NEW"]);
}

#[test]
fn bad_rows_degrade_without_aborting() {
    let mut studio = Studio::<FrameSurface>::default();
    let bytes = workbook(&[
        ["", "GOOD", "", "", ""],
        ["→", "", "E9", "", ""],
        ["", "Estantería", "", "", ""],
    ]);
    let ticket = studio.begin_load();
    let outcome = studio.finish_load(ticket, &bytes, None).expect("load");
    assert_eq!(outcome.records, 2);
    assert_eq!(outcome.issues.len(), 1);

    for index in 0..2 {
        studio.attach(index, FrameSurface::new()).expect("attach");
    }
    let report = studio.render_all();
    assert_eq!(report.drawn, 2);
    assert_eq!(report.encode_failures.len(), 1);
    assert_eq!(report.encode_failures[0].code, "Estantería");
}
