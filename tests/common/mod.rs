//! Fixture builders shared by the integration tests

#![allow(dead_code)]

use rust_xlsxwriter::{Format, Workbook};
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const REQUIRED: [&str; 10] = [
    "nombre", "tipo", "id", "programa", "ficha", "fecha1", "fecha2", "fecha3", "fecha4",
    "interesar",
];

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// `word/document.xml` wrapping `body`
pub fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:sectPr><w:pgSz w:w="12240" w:h="15840"/></w:sectPr></w:body></w:document>"#,
        body
    )
}

/// A minimal .docx package whose body is `body`
pub fn docx_bytes(body: &str) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, data) in [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", RELS.to_string()),
        ("word/document.xml", document_xml(body)),
    ] {
        writer.start_file(name, options).unwrap();
        writer.write_all(data.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub fn write_docx(path: &Path, body: &str) {
    fs::write(path, docx_bytes(body)).unwrap();
}

/// A paragraph with a single run
pub fn para(text: &str) -> String {
    format!(r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#, text)
}

/// A one-row table with one paragraph per cell
pub fn table(cells: &[&str]) -> String {
    let cells: String = cells
        .iter()
        .map(|c| format!("<w:tc>{}</w:tc>", para(c)))
        .collect();
    format!("<w:tbl><w:tblPr/><w:tr>{}</w:tr></w:tbl>", cells)
}

/// The certificate body used by most tests
pub fn certificate_body() -> String {
    [
        r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t>CONSTANCIA</w:t></w:r></w:p>"#.to_string(),
        para("Se hace constar que {{NOMBRE}}, identificado(a) con {{TIPO_DE_DOCUMENTO}} No. {{NUMERO_IDENTIFICACION}},"),
        para("cursa el programa {{NOMBRE DEL PROGRAMA}} ficha {{NUMERO_FICHA}}."),
        para("Inicio: {{FECHA_ONE}}. Fin lectiva: {{FECHA_TWO}}. Productiva: {{FECHA_THREE}} a {{FECHA_FOUR}}."),
        para("Se expide a solicitud de {{interesar}} {{DIA_REALIZA}}."),
    ]
    .concat()
}

/// Spreadsheet cell fixture
#[derive(Debug, Clone)]
pub enum Cell {
    Text(&'static str),
    Number(f64),
    /// Excel serial date written with a date number format
    Date(f64),
    Empty,
}

pub fn write_xlsx(path: &Path, headers: &[&str], rows: &[Vec<Cell>]) {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let worksheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        let r = (r + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(s) => {
                    worksheet.write_string(r, col, *s).unwrap();
                }
                Cell::Number(n) => {
                    worksheet.write_number(r, col, *n).unwrap();
                }
                Cell::Date(serial) => {
                    worksheet
                        .write_number_with_format(r, col, *serial, &date_format)
                        .unwrap();
                }
                Cell::Empty => {}
            }
        }
    }

    workbook.save(path).unwrap();
}

/// A complete row; 45366 = 2024-03-15, 45473 = 2024-06-30
pub fn person(name: &'static str, id: f64) -> Vec<Cell> {
    vec![
        Cell::Text(name),
        Cell::Text("CC"),
        Cell::Number(id),
        Cell::Text("Técnico en Cocina"),
        Cell::Number(2758412.0),
        Cell::Date(45366.0),
        Cell::Date(45473.0),
        Cell::Empty,
        Cell::Text("2024-12-01"),
        Cell::Text("la empresa interesada"),
    ]
}
