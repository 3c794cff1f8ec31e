//! Excel exporter implementation - blank dataset template

use crate::error::{ConstanciaError, ConstanciaResult};
use crate::types::REQUIRED_COLUMNS;
use rust_xlsxwriter::{Format, Note, Workbook, Worksheet};
use std::fs;
use std::path::Path;

const SHEET_NAME: &str = "Constancias";
const COLUMN_WIDTH: f64 = 18.0;

/// Writes a workbook holding only the header row users must fill in
pub struct ExcelExporter {
    columns: Vec<String>,
}

impl Default for ExcelExporter {
    fn default() -> Self {
        Self::new(REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect())
    }
}

impl ExcelExporter {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// Save the template workbook, creating the parent directory if needed
    pub fn export(&self, output_path: &Path) -> ConstanciaResult<()> {
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(SHEET_NAME)
            .map_err(|e| ConstanciaError::Export(format!("Failed to set worksheet name: {}", e)))?;
        self.write_header(worksheet)?;

        workbook
            .save(output_path)
            .map_err(|e| ConstanciaError::Export(format!("Failed to save Excel file: {}", e)))?;

        Ok(())
    }

    fn write_header(&self, worksheet: &mut Worksheet) -> ConstanciaResult<()> {
        let bold = Format::new().set_bold();

        for (col_idx, col_name) in self.columns.iter().enumerate() {
            let col = col_idx as u16;
            worksheet
                .write_string_with_format(0, col, col_name, &bold)
                .map_err(|e| ConstanciaError::Export(format!("Failed to write header: {}", e)))?;
            worksheet
                .set_column_width(col, COLUMN_WIDTH)
                .map_err(|e| ConstanciaError::Export(format!("Failed to size column: {}", e)))?;

            if col_name.starts_with("fecha") {
                let note = Note::new("Fecha: celda de fecha, AAAA-MM-DD o DD/MM/AAAA")
                    .set_author("constancias");
                worksheet
                    .insert_note(0, col, &note)
                    .map_err(|e| ConstanciaError::Export(format!("Failed to add note: {}", e)))?;
            }
        }

        Ok(())
    }
}
