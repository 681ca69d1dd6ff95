//! Spreadsheet ingestion: workbook bytes to an ordered list of [`Record`]s.
//!
//! Only the first worksheet is read. Its first row is the header row; every
//! following non-blank row with a code becomes one record, in sheet order.
//! Any format calamine can open (xlsx, xlsm, xlsb, xls, ods) is accepted.

pub mod schema;

use std::fmt;
use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Record;
use schema::{ColumnMap, Field};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("not a readable spreadsheet: {0}")]
    Open(String),
    #[error("workbook contains no worksheet")]
    NoWorksheet,
    #[error("failed to read sheet '{sheet}': {message}")]
    Sheet { sheet: String, message: String },
}

/// A non-fatal problem found while reading rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum RowIssue {
    /// Row had content but an empty code cell; it was skipped.
    MissingCode { row: u32 },
    /// A cell held a spreadsheet error value (`#N/A`, `#REF!`...); read as empty.
    ErrorCell { row: u32, field: Field },
    /// No header named a code column, so columns were taken in positional
    /// order (arrow, code, shelf, module, level).
    PositionalFallback { headers: Vec<String> },
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCode { row } => write!(f, "row {row}: empty code, skipped"),
            Self::ErrorCell { row, field } => {
                write!(f, "row {row}: error value in {} column", field.name())
            }
            Self::PositionalFallback { headers } => write!(
                f,
                "no code column among headers [{}], using column order",
                headers.join(", ")
            ),
        }
    }
}

/// Result of reading one workbook.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ingested {
    pub sheet_name: String,
    pub records: Vec<Record>,
    pub issues: Vec<RowIssue>,
}

/// Parse spreadsheet bytes and read the first worksheet into records.
pub fn parse_workbook(data: &[u8]) -> Result<Ingested, IngestError> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(data)).map_err(|e| IngestError::Open(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(IngestError::NoWorksheet)?;
    log::debug!("reading first sheet '{sheet_name}'");

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| IngestError::Sheet {
            sheet: sheet_name.clone(),
            message: e.to_string(),
        })?;

    let first_row = range.start().map_or(0, |(row, _)| row);
    let ingested = ingest_rows(sheet_name, first_row, range.rows());
    log::info!(
        "read {} records from sheet '{}' ({} issues)",
        ingested.records.len(),
        ingested.sheet_name,
        ingested.issues.len()
    );
    Ok(ingested)
}

/// Turn raw rows into records. `first_row` is the 0-based sheet row of the
/// first item, used for 1-based row numbers in records and issues.
pub fn ingest_rows<'a>(
    sheet_name: String,
    first_row: u32,
    mut rows: impl Iterator<Item = &'a [Data]>,
) -> Ingested {
    let mut out = Ingested {
        sheet_name,
        ..Ingested::default()
    };

    let Some(header_row) = rows.next() else {
        log::debug!("sheet '{}' is empty", out.sheet_name);
        return out;
    };
    let headers: Vec<String> = header_row
        .iter()
        .map(|c| cell_text(c).unwrap_or_default())
        .collect();

    let mut columns = ColumnMap::from_headers(&headers);
    if !columns.has(Field::Code) {
        log::warn!("no code column in headers {headers:?}, falling back to column order");
        columns = ColumnMap::positional();
        out.issues.push(RowIssue::PositionalFallback { headers });
    }
    log::debug!("column map: {columns:?}");

    for (offset, cells) in rows.enumerate() {
        // +1 for the header, +1 for 1-based numbering
        let row = first_row + offset as u32 + 2;
        if cells.iter().all(is_blank) {
            continue;
        }

        let mut record = Record {
            row,
            ..Record::default()
        };
        for field in Field::ALL {
            let Some(cell) = columns.index(field).and_then(|i| cells.get(i)) else {
                continue;
            };
            let value = match cell_text(cell) {
                Some(text) => text,
                None => {
                    out.issues.push(RowIssue::ErrorCell { row, field });
                    String::new()
                }
            };
            *slot(&mut record, field) = value;
        }

        if record.code.is_empty() {
            log::warn!("row {row}: empty code, skipping");
            out.issues.push(RowIssue::MissingCode { row });
            continue;
        }
        out.records.push(record);
    }
    out
}

fn slot(record: &mut Record, field: Field) -> &mut String {
    match field {
        Field::Arrow => &mut record.arrow,
        Field::Code => &mut record.code,
        Field::Shelf => &mut record.shelf,
        Field::Module => &mut record.module,
        Field::Level => &mut record.level,
    }
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Display text of a cell, or `None` for spreadsheet error values.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => Some(String::new()),
        Data::String(s) => Some(s.trim().to_string()),
        Data::Float(v) => Some(format_number(*v)),
        Data::Int(v) => Some(v.to_string()),
        Data::Bool(v) => Some(v.to_string()),
        Data::Error(_) => None,
        other => Some(other.to_string().trim().to_string()),
    }
}

/// Integral floats print without a fractional part, as a spreadsheet shows
/// them: `12.0` becomes `"12"`.
fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    fn ingest(rows: Vec<Vec<Data>>) -> Ingested {
        ingest_rows("Sheet1".into(), 0, rows.iter().map(Vec::as_slice))
    }

    #[test]
    fn empty_sheet_yields_nothing() {
        let out = ingest(vec![]);
        assert!(out.records.is_empty());
        assert!(out.issues.is_empty());
    }

    #[test]
    fn header_only_yields_no_records() {
        let out = ingest(vec![vec![s("Flecha"), s("code")]]);
        assert!(out.records.is_empty());
        assert!(out.issues.is_empty());
    }

    #[test]
    fn rows_follow_header_mapping() {
        let out = ingest(vec![
            vec![s("Nivel"), s("Código"), s("Estante")],
            vec![Data::Int(3), s("ABC123"), s("E-01")],
        ]);
        assert_eq!(out.records.len(), 1);
        let r = &out.records[0];
        assert_eq!(r.code, "ABC123");
        assert_eq!(r.level, "3");
        assert_eq!(r.shelf, "E-01");
        assert_eq!(r.module, "");
        assert_eq!(r.row, 2);
    }

    #[test]
    fn integral_floats_lose_the_fraction() {
        let out = ingest(vec![
            vec![s("code"), s("module")],
            vec![Data::Float(4711.0), Data::Float(2.5)],
        ]);
        assert_eq!(out.records[0].code, "4711");
        assert_eq!(out.records[0].module, "2.5");
    }

    #[test]
    fn blank_rows_are_skipped_silently() {
        let out = ingest(vec![
            vec![s("code")],
            vec![s("A")],
            vec![Data::Empty, s("  ")],
            vec![s("B")],
        ]);
        let codes: Vec<_> = out.records.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["A", "B"]);
        assert_eq!(out.records[1].row, 4);
        assert!(out.issues.is_empty());
    }

    #[test]
    fn missing_code_is_reported_and_skipped() {
        let out = ingest(vec![
            vec![s("code"), s("shelf")],
            vec![Data::Empty, s("E-02")],
            vec![s("X"), s("E-03")],
        ]);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.issues, vec![RowIssue::MissingCode { row: 2 }]);
    }

    #[test]
    fn error_cells_read_as_empty() {
        let out = ingest(vec![
            vec![s("code"), s("level")],
            vec![s("X"), Data::Error(CellErrorType::NA)],
        ]);
        assert_eq!(out.records[0].level, "");
        assert_eq!(
            out.issues,
            vec![RowIssue::ErrorCell {
                row: 2,
                field: Field::Level
            }]
        );
    }

    #[test]
    fn unknown_headers_fall_back_to_column_order() {
        let out = ingest(vec![
            vec![s("a"), s("b"), s("c")],
            vec![s("→"), s("ABC"), s("E-1")],
        ]);
        assert_eq!(out.records[0].arrow, "→");
        assert_eq!(out.records[0].code, "ABC");
        assert_eq!(out.records[0].shelf, "E-1");
        assert!(matches!(
            out.issues.as_slice(),
            [RowIssue::PositionalFallback { .. }]
        ));
    }

    #[test]
    fn row_numbers_account_for_range_offset() {
        let rows = [vec![s("code")], vec![s("A")]];
        let out = ingest_rows("S".into(), 4, rows.iter().map(Vec::as_slice));
        assert_eq!(out.records[0].row, 6);
    }

    #[test]
    fn garbage_bytes_fail_to_open() {
        let err = parse_workbook(b"definitely not a workbook").unwrap_err();
        assert!(matches!(err, IngestError::Open(_)));
    }
}
