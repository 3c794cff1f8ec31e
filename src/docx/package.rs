//! `.docx` zip container

use super::document::Document;
use crate::error::{ConstanciaError, ConstanciaResult};
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const DOCUMENT_PART: &str = "word/document.xml";

/// All entries of a Word package, in archive order, with the main document
/// part parsed
#[derive(Debug, Clone)]
pub struct DocxPackage {
    entries: Vec<(String, Vec<u8>)>,
    document: Document,
}

impl DocxPackage {
    /// Open a template from disk. Any failure here means the template is
    /// unusable and is reported as [`ConstanciaError::Template`].
    pub fn open<P: AsRef<Path>>(path: P) -> ConstanciaResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| {
            ConstanciaError::Template(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_bytes(&bytes).map_err(|e| match e {
            ConstanciaError::Template(msg) => {
                ConstanciaError::Template(format!("{}: {}", path.display(), msg))
            }
            other => ConstanciaError::Template(format!("{}: {}", path.display(), other)),
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> ConstanciaResult<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ConstanciaError::Template(format!("not a .docx package ({})", e)))?;

        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let mut buffer = Vec::new();
            file.read_to_end(&mut buffer)?;
            entries.push((file.name().to_string(), buffer));
        }

        let xml = entries
            .iter()
            .find(|(name, _)| name == DOCUMENT_PART)
            .map(|(_, data)| String::from_utf8_lossy(data).into_owned())
            .ok_or_else(|| ConstanciaError::Template(format!("missing {}", DOCUMENT_PART)))?;
        let document = Document::parse(&xml)?;

        Ok(Self { entries, document })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Package bytes with `document` as the main part; the package itself is
    /// left untouched
    pub fn to_bytes_with(&self, document: &Document) -> ConstanciaResult<Vec<u8>> {
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for (name, data) in &self.entries {
            writer.start_file(name.as_str(), options)?;
            if name == DOCUMENT_PART {
                writer.write_all(document.to_xml().as_bytes())?;
            } else {
                writer.write_all(data)?;
            }
        }

        Ok(writer.finish()?.into_inner())
    }

    /// Write the package with `document` as its main part to `path`
    pub fn save_with<P: AsRef<Path>>(&self, document: &Document, path: P) -> ConstanciaResult<()> {
        let bytes = self.to_bytes_with(document)?;
        fs::write(path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        writer.start_file("[Content_Types].xml", options).unwrap();
        writer.write_all(b"<Types/>").unwrap();
        writer.start_file(DOCUMENT_PART, options).unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    const XML: &str = r#"<w:document xmlns:w="urn:w"><w:body><w:p><w:r><w:t>{{NOMBRE}}</w:t></w:r></w:p></w:body></w:document>"#;

    #[test]
    fn test_from_bytes_reads_entries_in_order() {
        let package = DocxPackage::from_bytes(&build_docx(XML)).unwrap();
        let names: Vec<_> = package.entry_names().collect();
        assert_eq!(names, vec!["[Content_Types].xml", DOCUMENT_PART]);
        assert_eq!(package.document().paragraphs().count(), 1);
    }

    #[test]
    fn test_to_bytes_replaces_only_document_part() {
        let package = DocxPackage::from_bytes(&build_docx(XML)).unwrap();
        let changed = package
            .document()
            .map_paragraphs(|p| p.with_text("Ana"));
        let bytes = package.to_bytes_with(&changed).unwrap();

        let reopened = DocxPackage::from_bytes(&bytes).unwrap();
        let texts: Vec<_> = reopened.document().paragraphs().map(|p| p.text()).collect();
        assert_eq!(texts, vec!["Ana".to_string()]);

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut types = String::new();
        archive
            .by_name("[Content_Types].xml")
            .unwrap()
            .read_to_string(&mut types)
            .unwrap();
        assert_eq!(types, "<Types/>");
    }

    #[test]
    fn test_not_a_zip_is_template_error() {
        let err = DocxPackage::from_bytes(b"plain text").unwrap_err();
        assert!(matches!(err, ConstanciaError::Template(_)));
    }

    #[test]
    fn test_missing_document_part_is_template_error() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/styles.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<w:styles/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = DocxPackage::from_bytes(&bytes).unwrap_err();
        assert!(err.to_string().contains(DOCUMENT_PART));
    }

    #[test]
    fn test_open_missing_file() {
        let err = DocxPackage::open("/nonexistent/plantilla.docx").unwrap_err();
        assert!(err.is_fatal());
    }
}
