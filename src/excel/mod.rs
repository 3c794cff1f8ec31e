//! Excel import/export
//!
//! - Import: first worksheet → `Dataset` (header + rows)
//! - Export: blank template workbook with the required headers

mod exporter;
mod importer;

pub use exporter::ExcelExporter;
pub use importer::{convert_cell, ExcelImporter};
