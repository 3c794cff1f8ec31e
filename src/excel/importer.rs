//! Excel importer implementation - workbook → Dataset

use crate::core::dates::{excel_serial_to_datetime, parse_date_text};
use crate::core::validator::normalize_column;
use crate::error::{ConstanciaError, ConstanciaResult};
use crate::types::{CellValue, Dataset, Record};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::{Path, PathBuf};

/// Reads the first worksheet of a workbook (.xlsx, .xlsm, .xls, .ods)
pub struct ExcelImporter {
    path: PathBuf,
}

impl ExcelImporter {
    /// Create a new Excel importer
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Import the first sheet: header row plus data rows
    pub fn import(&self) -> ConstanciaResult<Dataset> {
        let mut workbook = open_workbook_auto(&self.path).map_err(|e| {
            ConstanciaError::Excel(format!(
                "Failed to open Excel file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ConstanciaError::Excel("Workbook has no worksheets".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            ConstanciaError::Excel(format!("Failed to read sheet '{}': {}", sheet_name, e))
        })?;

        Ok(self.process_sheet(&range))
    }

    /// Header row becomes normalized column names; fully empty rows are skipped
    fn process_sheet(&self, range: &Range<Data>) -> Dataset {
        let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
        let mut rows = range.rows();

        let columns = match rows.next() {
            Some(header) => header
                .iter()
                .enumerate()
                .map(|(idx, cell)| self.header_name(idx, cell))
                .collect(),
            None => return Dataset::default(),
        };

        let mut dataset = Dataset::new(columns);
        for (idx, row) in rows.enumerate() {
            let cells: Vec<CellValue> = row.iter().map(convert_cell).collect();
            if cells.iter().all(CellValue::is_blank) {
                continue;
            }
            dataset.add_record(Record {
                // header is spreadsheet row first_row + 1
                number: first_row + idx + 2,
                cells,
            });
        }

        dataset
    }

    fn header_name(&self, idx: usize, cell: &Data) -> String {
        let name = match cell {
            Data::String(s) => s.clone(),
            Data::Int(i) => i.to_string(),
            Data::Float(f) => f.to_string(),
            Data::Empty => format!("unnamed_{}", idx),
            other => other.to_string(),
        };
        normalize_column(&name)
    }
}

/// Convert a calamine cell; date-formatted numbers and ISO datetimes become
/// [`CellValue::Date`]
pub fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            if dt.is_duration() {
                CellValue::Number(serial)
            } else {
                excel_serial_to_datetime(serial)
                    .map(CellValue::Date)
                    .unwrap_or(CellValue::Number(serial))
            }
        }
        Data::DateTimeIso(s) => parse_date_text(s)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}
