//! Row-to-document driver
//!
//! Loads the dataset once, validates its columns once, then produces one
//! document per row. A failing row is logged and skipped; only a template
//! that cannot be opened stops the batch.

use super::dates::{format_cell_date, format_issue_date};
use super::scanner::scan_fields;
use super::substitution::{substitute, unresolved_fields};
use super::validator::validate_columns;
use crate::config::{Config, OUTPUT_EXTENSION, OUTPUT_PREFIX};
use crate::docx::DocxPackage;
use crate::error::{ConstanciaError, ConstanciaResult};
use crate::excel::ExcelImporter;
use crate::types::{
    BatchReport, Dataset, Placeholder, Record, Row, RowFailure, SubstitutionMap, REQUIRED_COLUMNS,
};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Build the eleven-entry mapping for one row
pub fn build_mapping(row: &Row, issue_date: &str) -> ConstanciaResult<SubstitutionMap> {
    let mut map = SubstitutionMap::new()
        .with(Placeholder::Nombre, row.nombre.render())
        .with(Placeholder::TipoDeDocumento, row.tipo.render())
        .with(Placeholder::NumeroIdentificacion, row.id.render())
        .with(Placeholder::NombreDelPrograma, row.programa.render())
        .with(Placeholder::NumeroFicha, row.ficha.render())
        .with(Placeholder::Interesar, row.interesar.render())
        .with(Placeholder::DiaRealiza, issue_date);

    for (idx, (placeholder, cell)) in Placeholder::dates().iter().zip(&row.fechas).enumerate() {
        let column = format!("fecha{}", idx + 1);
        map.insert(*placeholder, format_cell_date(&column, cell)?);
    }

    Ok(map)
}

/// Replace anything outside letters, digits, `_`, `-` and the Spanish
/// accented letters with `_`
pub fn sanitize_file_stem(name: &str) -> ConstanciaResult<String> {
    let pattern = Regex::new(r"[^a-zA-Z0-9áéíóúÁÉÍÓÚñÑ_\-]")
        .map_err(|e| ConstanciaError::Template(format!("Regex error: {}", e)))?;
    Ok(pattern.replace_all(name, "_").into_owned())
}

/// `CONSTANCIA_<sanitized name>.docx`
pub fn output_file_name(name: &str) -> ConstanciaResult<String> {
    Ok(format!(
        "{}{}.{}",
        OUTPUT_PREFIX,
        sanitize_file_stem(name)?,
        OUTPUT_EXTENSION
    ))
}

pub struct Generator<'a> {
    config: &'a Config,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Read the workbook at `excel_path` and generate every row.
    ///
    /// Unreadable workbooks and missing columns fail before any document is
    /// written.
    pub fn generate_from_excel<P: AsRef<Path>>(&self, excel_path: P) -> ConstanciaResult<BatchReport> {
        let dataset = ExcelImporter::new(excel_path.as_ref()).import()?;
        self.generate(&dataset)
    }

    pub fn generate(&self, dataset: &Dataset) -> ConstanciaResult<BatchReport> {
        validate_columns(&dataset.columns, &REQUIRED_COLUMNS)?;
        let output_dir = self.config.ensure_output_dir()?.to_path_buf();
        let issue_date = format_issue_date(self.config.today);

        info!(
            rows = dataset.records.len(),
            template = %self.config.template_path.display(),
            "generating certificates"
        );

        let mut report = BatchReport {
            output_dir: output_dir.clone(),
            ..Default::default()
        };

        for record in &dataset.records {
            match self.process_record(dataset, record, &issue_date, &output_dir) {
                Ok(path) => {
                    debug!(row = record.number, path = %path.display(), "document written");
                    report.generated.push(path);
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    error!(
                        row = record.number,
                        "Error procesando la fila: {{{}}}\n{}",
                        dataset.dump(record),
                        e
                    );
                    report.failures.push(RowFailure {
                        row_number: record.number,
                        name: dataset
                            .cell(record, "nombre")
                            .map(|c| c.render())
                            .unwrap_or_default(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            generated = report.generated_count(),
            skipped = report.failures.len(),
            output = %output_dir.display(),
            "batch finished"
        );
        Ok(report)
    }

    /// Load, map, warn, substitute, name and write one row's document
    fn process_record(
        &self,
        dataset: &Dataset,
        record: &Record,
        issue_date: &str,
        output_dir: &Path,
    ) -> ConstanciaResult<PathBuf> {
        let package = DocxPackage::open(&self.config.template_path)?;

        let row = Row::from_record(dataset, record)?;
        let mapping = build_mapping(&row, issue_date)?;

        let fields = scan_fields(package.document())?;
        for field in unresolved_fields(&fields, &mapping) {
            warn!(row = record.number, "El campo {{{{{}}}}} no tiene un valor definido.", field);
        }

        let document = substitute(package.document(), &mapping)?;

        let path = output_dir.join(output_file_name(&row.name()?)?);
        package.save_with(&document, &path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;
    use chrono::NaiveDate;

    fn row() -> Row {
        Row {
            number: 2,
            nombre: CellValue::Text("Ana Gómez".into()),
            tipo: CellValue::Text("CC".into()),
            id: CellValue::Number(1032456789.0),
            programa: CellValue::Text("Cocina".into()),
            ficha: CellValue::Number(2758412.0),
            fechas: [
                CellValue::Date(
                    NaiveDate::from_ymd_opt(2024, 3, 15)
                        .unwrap()
                        .and_hms_opt(0, 0, 0)
                        .unwrap(),
                ),
                CellValue::Text("2024-06-30".into()),
                CellValue::Empty,
                CellValue::Empty,
            ],
            interesar: CellValue::Text("el interesado".into()),
        }
    }

    #[test]
    fn test_build_mapping_has_every_placeholder() {
        let map = build_mapping(&row(), "a los 1 días del mes de enero").unwrap();
        assert_eq!(map.len(), Placeholder::ALL.len());
        assert_eq!(map.get("NOMBRE"), Some("Ana Gómez"));
        assert_eq!(map.get("NUMERO_IDENTIFICACION"), Some("1032456789"));
        assert_eq!(map.get("NOMBRE DEL PROGRAMA"), Some("Cocina"));
        assert_eq!(map.get("FECHA_ONE"), Some("15 de marzo de 2024"));
        assert_eq!(map.get("FECHA_TWO"), Some("30 de junio de 2024"));
        assert_eq!(map.get("FECHA_THREE"), Some(""));
        assert_eq!(map.get("interesar"), Some("el interesado"));
        assert_eq!(map.get("DIA_REALIZA"), Some("a los 1 días del mes de enero"));
    }

    #[test]
    fn test_build_mapping_rejects_bad_date() {
        let mut bad = row();
        bad.fechas[2] = CellValue::Text("ayer".into());
        match build_mapping(&bad, "") {
            Err(ConstanciaError::InvalidDate { column, .. }) => assert_eq!(column, "fecha3"),
            other => panic!("expected invalid date, got {other:?}"),
        }
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(
            output_file_name("José/Pérez").unwrap(),
            "CONSTANCIA_José_Pérez.docx"
        );
        assert_eq!(
            output_file_name("María Ñuñez-Ortiz").unwrap(),
            "CONSTANCIA_María_Ñuñez-Ortiz.docx"
        );
        assert_eq!(sanitize_file_stem("a:b*c?.d").unwrap(), "a_b_c__d");
    }
}
