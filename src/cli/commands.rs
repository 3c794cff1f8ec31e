use crate::config::Config;
use crate::core::scanner::extract_tokens;
use crate::core::Generator;
use crate::docx::{Document, DocxPackage};
use crate::error::{ConstanciaError, ConstanciaResult};
use crate::excel::ExcelExporter;
use crate::types::{BatchReport, Placeholder};
use colored::Colorize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Execute the generate command: one certificate per spreadsheet row
pub fn generate(config: &Config, excel: PathBuf, json: bool) -> ConstanciaResult<BatchReport> {
    if !json {
        println!("{}", "📄 Constancias - Generando certificados".bold().green());
        println!("   Excel:     {}", excel.display());
        println!("   Plantilla: {}", config.template_path.display());
        println!();
    }

    let report = match Generator::new(config).generate_from_excel(&excel) {
        Ok(report) => report,
        Err(e) => {
            if !json {
                println!("{}", format!("❌ Error: {e}").bold().red());
            }
            return Err(e);
        }
    };

    if json {
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| ConstanciaError::Export(format!("Failed to serialize report: {}", e)))?;
        println!("{}", out);
        return Ok(report);
    }

    print_report(&report);
    Ok(report)
}

fn print_report(report: &BatchReport) {
    println!("{}", "✅ Proceso finalizado".bold().green());
    println!(
        "   {} certificados generados en:",
        report.generated_count().to_string().bold()
    );
    println!("   {}", report.output_dir.display().to_string().bright_blue());

    if !report.failures.is_empty() {
        println!();
        println!(
            "{}",
            format!("⚠️  {} filas omitidas:", report.failures.len()).yellow()
        );
        for failure in &report.failures {
            println!(
                "   fila {} ({}): {}",
                failure.row_number,
                failure.name.bright_blue(),
                failure.error.red()
            );
        }
    }
}

/// Execute the template command: blank workbook with the required headers
pub fn template(config: &Config, destination: Option<PathBuf>) -> ConstanciaResult<PathBuf> {
    let path = destination.unwrap_or_else(|| config.template_workbook_path());

    if let Err(e) = ExcelExporter::default().export(&path) {
        println!(
            "{}",
            format!("❌ No se pudo crear la plantilla: {e}").bold().red()
        );
        return Err(e);
    }

    println!("{}", "✅ Descarga completada".bold().green());
    println!("   Plantilla Excel creada en:");
    println!("   {}", path.display().to_string().bright_blue());
    Ok(path)
}

/// How a template field will be treated during generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldStatus {
    pub name: String,
    /// A row value exists for this token
    pub mapped: bool,
    /// The token only appears inside tables, which are never filled in
    pub tables_only: bool,
}

/// Classify every placeholder in the template
pub fn field_statuses(document: &Document) -> ConstanciaResult<Vec<FieldStatus>> {
    let paragraph_text = document
        .paragraphs()
        .map(|p| p.text())
        .collect::<Vec<_>>()
        .join("\n");
    let in_paragraphs = extract_tokens(&paragraph_text)?;

    let table_text = document
        .tables()
        .flat_map(|t| t.cells().map(|c| c.text()))
        .collect::<Vec<_>>()
        .join("\n");
    let in_tables = extract_tokens(&table_text)?;

    let all: BTreeSet<&String> = in_paragraphs.iter().chain(in_tables.iter()).collect();
    Ok(all
        .into_iter()
        .map(|name| FieldStatus {
            name: name.clone(),
            mapped: Placeholder::from_token(name).is_some(),
            tables_only: !in_paragraphs.contains(name),
        })
        .collect())
}

/// Execute the fields command: list the template's placeholders
pub fn fields(config: &Config) -> ConstanciaResult<Vec<FieldStatus>> {
    println!("{}", "🔍 Constancias - Campos de la plantilla".bold().green());
    println!("   Plantilla: {}\n", config.template_path.display());

    let package = DocxPackage::open(&config.template_path)?;
    let statuses = field_statuses(package.document())?;

    if statuses.is_empty() {
        println!("{}", "⚠️  La plantilla no contiene campos {{...}}".yellow());
        return Ok(statuses);
    }

    for status in &statuses {
        let token = format!("{{{{{}}}}}", status.name);
        if !status.mapped {
            println!(
                "   {} {} {}",
                "⚠️".yellow(),
                token.bright_blue(),
                "sin valor definido".yellow()
            );
        } else if status.tables_only {
            println!(
                "   {} {} {}",
                "⚠️".yellow(),
                token.bright_blue(),
                "solo en tablas: no se reemplaza".yellow()
            );
        } else {
            println!("   {} {}", "✅".green(), token.bright_blue());
        }
    }

    let missing: Vec<_> = Placeholder::ALL
        .iter()
        .filter(|p| !statuses.iter().any(|s| s.name == p.token()))
        .collect();
    if !missing.is_empty() {
        println!();
        println!("   Campos disponibles no usados:");
        for p in missing {
            println!("      {}", p.to_string().cyan());
        }
    }

    Ok(statuses)
}

/// Execute the paths command: show the effective configuration
pub fn paths(config: &Config) -> ConstanciaResult<()> {
    println!("{}", "📁 Constancias - Rutas".bold().green());
    println!("   Los certificados se guardarán en:");
    println!("   {}", config.output_dir.display().to_string().bright_blue());
    println!();
    println!("   Plantilla Word:  {}", config.template_path.display());
    println!("   Descargas:       {}", config.downloads_dir.display());
    println!("   Fecha de emisión: {}", config.today.format("%Y-%m-%d"));
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
