//! Placeholder discovery in a template

use crate::docx::Document;
use crate::error::{ConstanciaError, ConstanciaResult};
use regex::Regex;
use std::collections::BTreeSet;

/// `{{name}}`, non-greedy, no newlines inside the braces
pub fn token_pattern() -> ConstanciaResult<Regex> {
    Regex::new(r"\{\{(.*?)\}\}")
        .map_err(|e| ConstanciaError::Template(format!("Regex error: {}", e)))
}

/// Every paragraph's text, then every table cell's text (row-major), one
/// per line
pub fn document_text(document: &Document) -> String {
    let mut parts: Vec<String> = document.paragraphs().map(|p| p.text()).collect();
    for table in document.tables() {
        parts.extend(table.cells().map(|c| c.text()));
    }
    parts.join("\n")
}

/// Unique placeholder names referenced anywhere in the document, including
/// table cells
pub fn scan_fields(document: &Document) -> ConstanciaResult<BTreeSet<String>> {
    extract_tokens(&document_text(document))
}

/// Unique token names in `text`
pub fn extract_tokens(text: &str) -> ConstanciaResult<BTreeSet<String>> {
    Ok(token_pattern()?
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect())
}
