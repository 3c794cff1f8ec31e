//! Word (.docx) templates
//!
//! - `package`: the zip container, read once and written back per row
//! - `document`: body paragraphs and tables as values
//! - `xml`: element span helpers used by the document parser

mod document;
mod package;
mod xml;

pub use document::{Block, Document, Paragraph, Run, Table, TableCell, TableRow};
pub use package::{DocxPackage, DOCUMENT_PART};
