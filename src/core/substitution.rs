//! Placeholder substitution over body paragraphs
//!
//! Each paragraph's text is scanned once for `{{...}}` spans and every span
//! is resolved on its own, so token names that contain one another cannot
//! interfere. Spans without a mapping stay in the text literally.
//!
//! Table cells are not rewritten. The scanner reads them, so a token placed
//! inside a table shows up as a field but is never filled in.

use super::scanner::token_pattern;
use crate::docx::Document;
use crate::error::ConstanciaResult;
use crate::types::SubstitutionMap;
use regex::{Captures, Regex};
use std::collections::BTreeSet;

/// Replace every mapped `{{token}}` in `text`
pub fn substitute_text(text: &str, map: &SubstitutionMap, pattern: &Regex) -> String {
    pattern
        .replace_all(text, |caps: &Captures| match map.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// A new document whose paragraphs have their mapped tokens filled in.
///
/// Paragraphs whose text does not change are carried over untouched,
/// formatting included. A changed paragraph becomes a single plain run.
pub fn substitute(document: &Document, map: &SubstitutionMap) -> ConstanciaResult<Document> {
    let pattern = token_pattern()?;
    Ok(document.map_paragraphs(|paragraph| {
        let original = paragraph.text();
        let replaced = substitute_text(&original, map, &pattern);
        if replaced == original {
            paragraph.clone()
        } else {
            paragraph.with_text(&replaced)
        }
    }))
}

/// Template fields with no value in `map`
pub fn unresolved_fields<'a>(fields: &'a BTreeSet<String>, map: &SubstitutionMap) -> Vec<&'a str> {
    fields
        .iter()
        .map(String::as_str)
        .filter(|field| !map.contains(field))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scanner::scan_fields;
    use crate::types::Placeholder;
    use pretty_assertions::assert_eq;

    fn doc(body: &str) -> Document {
        Document::parse(&format!("<w:document><w:body>{}</w:body></w:document>", body)).unwrap()
    }

    fn texts(d: &Document) -> Vec<String> {
        d.paragraphs().map(|p| p.text()).collect()
    }

    #[test]
    fn test_replaces_token_without_residual_braces() {
        let d = doc("<w:p><w:r><w:t>Se certifica que {{NOMBRE}} asistió</w:t></w:r></w:p>");
        let map = SubstitutionMap::new().with(Placeholder::Nombre, "Ana");
        let out = substitute(&d, &map).unwrap();
        assert_eq!(texts(&out), vec!["Se certifica que Ana asistió".to_string()]);
        assert!(!out.to_xml().contains("{{"));
    }

    #[test]
    fn test_paragraph_without_tokens_is_byte_identical() {
        let plain = r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t>CONSTANCIA</w:t></w:r></w:p>"#;
        let d = doc(&format!(
            "{}<w:p><w:r><w:t>{{{{NOMBRE}}}}</w:t></w:r></w:p>",
            plain
        ));
        let map = SubstitutionMap::new().with(Placeholder::Nombre, "Ana");
        let out = substitute(&d, &map).unwrap();
        assert_eq!(out.paragraphs().next().unwrap().xml(), plain);
        assert!(out.to_xml().contains("<w:b/>"));
    }

    #[test]
    fn test_tokens_split_across_runs_are_merged() {
        let d = doc(
            "<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>{{NUMERO_</w:t></w:r><w:r><w:t>FICHA}}</w:t></w:r></w:p>",
        );
        let map = SubstitutionMap::new().with(Placeholder::NumeroFicha, "2758412");
        let out = substitute(&d, &map).unwrap();
        assert_eq!(texts(&out), vec!["2758412".to_string()]);
        assert_eq!(out.paragraphs().next().unwrap().runs().len(), 1);
    }

    #[test]
    fn test_unmapped_token_stays_literal() {
        let d = doc("<w:p><w:r><w:t>{{NOMBRE}} - {{CIUDAD}}</w:t></w:r></w:p>");
        let map = SubstitutionMap::new().with(Placeholder::Nombre, "Ana");
        let out = substitute(&d, &map).unwrap();
        assert_eq!(texts(&out), vec!["Ana - {{CIUDAD}}".to_string()]);
    }

    #[test]
    fn test_table_cells_are_never_substituted() {
        let table = "<w:tbl><w:tr><w:tc><w:p><w:r><w:t>{{NOMBRE}}</w:t></w:r></w:p></w:tc></w:tr></w:tbl>";
        let d = doc(table);
        let map = SubstitutionMap::new().with(Placeholder::Nombre, "Ana");
        let out = substitute(&d, &map).unwrap();
        assert_eq!(out.tables().next().unwrap().xml(), table);
        assert!(scan_fields(&out).unwrap().contains("NOMBRE"));
    }

    #[test]
    fn test_single_pass_resolution_ignores_values_that_look_like_tokens() {
        let pattern = token_pattern().unwrap();
        let map = SubstitutionMap::new()
            .with(Placeholder::Nombre, "{{NUMERO_FICHA}}")
            .with(Placeholder::NumeroFicha, "99");
        assert_eq!(
            substitute_text("{{NOMBRE}}/{{NUMERO_FICHA}}", &map, &pattern),
            "{{NUMERO_FICHA}}/99"
        );
    }

    #[test]
    fn test_overlapping_names_resolve_independently() {
        let pattern = token_pattern().unwrap();
        let map = SubstitutionMap::new()
            .with(Placeholder::Nombre, "Ana")
            .with(Placeholder::NombreDelPrograma, "Cocina");
        assert_eq!(
            substitute_text("{{NOMBRE DEL PROGRAMA}} {{NOMBRE}}", &map, &pattern),
            "Cocina Ana"
        );
    }

    #[test]
    fn test_unresolved_fields() {
        let fields: BTreeSet<String> = ["NOMBRE", "CIUDAD", "interesar"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let map = SubstitutionMap::new()
            .with(Placeholder::Nombre, "Ana")
            .with(Placeholder::Interesar, "x");
        assert_eq!(unresolved_fields(&fields, &map), vec!["CIUDAD"]);
    }
}
