//! `word/document.xml` as a value: body paragraphs and tables over the
//! original XML.
//!
//! Every block remembers the exact slice it was parsed from. Serializing a
//! document that was never modified reproduces the input byte-for-byte; only
//! paragraphs replaced through [`Paragraph::with_text`] are re-emitted.

use super::xml::{element_layout, escape_text, run_text, ElementSpan};
use crate::error::{ConstanciaError, ConstanciaResult};

/// The body of a Word document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    prologue: String,
    blocks: Vec<Block>,
    epilogue: String,
}

/// A top-level body element
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
    /// Anything else (section properties, bookmarks, whitespace), kept as-is
    Other(String),
}

impl Block {
    fn to_xml(&self) -> &str {
        match self {
            Block::Paragraph(p) => &p.xml,
            Block::Table(t) => &t.xml,
            Block::Other(xml) => xml,
        }
    }
}

impl Document {
    /// Parse the XML of `word/document.xml`
    pub fn parse(xml: &str) -> ConstanciaResult<Self> {
        let root = element_layout(xml)?;
        let body = root
            .children
            .iter()
            .find(|c| c.name == "body")
            .ok_or_else(|| ConstanciaError::Template("document has no body".to_string()))?;

        let body_xml = body.slice(xml);
        let layout = element_layout(body_xml)?;
        let Some(content) = layout.content else {
            // <w:body/>
            return Ok(Self {
                prologue: xml.to_string(),
                blocks: Vec::new(),
                epilogue: String::new(),
            });
        };

        let offset = body.range.start;
        let mut blocks = Vec::new();
        let mut cursor = content.start;
        for child in &layout.children {
            if child.range.start > cursor {
                blocks.push(Block::Other(body_xml[cursor..child.range.start].to_string()));
            }
            blocks.push(parse_block(body_xml, child)?);
            cursor = child.range.end;
        }
        if content.end > cursor {
            blocks.push(Block::Other(body_xml[cursor..content.end].to_string()));
        }

        Ok(Self {
            prologue: xml[..offset + content.start].to_string(),
            blocks,
            epilogue: xml[offset + content.end..].to_string(),
        })
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Body paragraphs in document order (table cells excluded)
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }

    /// New document with each body paragraph passed through `f`; tables and
    /// other blocks are carried over unchanged
    pub fn map_paragraphs<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&Paragraph) -> Paragraph,
    {
        let blocks = self
            .blocks
            .iter()
            .map(|block| match block {
                Block::Paragraph(p) => Block::Paragraph(f(p)),
                other => other.clone(),
            })
            .collect();

        Self {
            prologue: self.prologue.clone(),
            blocks,
            epilogue: self.epilogue.clone(),
        }
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::with_capacity(
            self.prologue.len()
                + self.epilogue.len()
                + self.blocks.iter().map(|b| b.to_xml().len()).sum::<usize>(),
        );
        out.push_str(&self.prologue);
        for block in &self.blocks {
            out.push_str(block.to_xml());
        }
        out.push_str(&self.epilogue);
        out
    }
}

fn parse_block(body_xml: &str, child: &ElementSpan) -> ConstanciaResult<Block> {
    let slice = child.slice(body_xml);
    Ok(match child.name.as_str() {
        "p" => Block::Paragraph(Paragraph::parse(slice)?),
        "tbl" => Block::Table(Table::parse(slice)?),
        _ => Block::Other(slice.to_string()),
    })
}

//==============================================================================
// Paragraphs
//==============================================================================

/// A styled segment of paragraph text
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    /// Raw `w:rPr` element, if the run has formatting
    pub properties: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    xml: String,
    start_tag: String,
    end_tag: String,
    properties: Option<String>,
    runs: Vec<Run>,
}

impl Paragraph {
    pub fn parse(xml: &str) -> ConstanciaResult<Self> {
        let layout = element_layout(xml)?;
        let (start_tag, end_tag) = match &layout.content {
            Some(content) => (
                xml[..content.start].to_string(),
                xml[content.end..].to_string(),
            ),
            None => ("<w:p>".to_string(), "</w:p>".to_string()),
        };

        let mut properties = None;
        let mut runs = Vec::new();
        for child in &layout.children {
            let slice = child.slice(xml);
            match child.name.as_str() {
                "pPr" => properties = Some(slice.to_string()),
                "r" => runs.push(Run::parse(slice)?),
                "hyperlink" => {
                    for inner in element_layout(slice)?.children {
                        if inner.name == "r" {
                            runs.push(Run::parse(inner.slice(slice))?);
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(Self {
            xml: xml.to_string(),
            start_tag,
            end_tag,
            properties,
            runs,
        })
    }

    /// Plain text of the paragraph: all run texts concatenated
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn properties(&self) -> Option<&str> {
        self.properties.as_deref()
    }

    pub fn xml(&self) -> &str {
        &self.xml
    }

    /// A copy holding `text` as a single unformatted run.
    ///
    /// Paragraph properties (style, alignment) survive; run formatting and
    /// any other paragraph content is dropped. Tabs and newlines become
    /// `w:tab` and `w:br`.
    pub fn with_text(&self, text: &str) -> Self {
        let mut run_xml = String::from("<w:r>");
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                run_xml.push_str("<w:br/>");
            }
            for (j, piece) in line.split('\t').enumerate() {
                if j > 0 {
                    run_xml.push_str("<w:tab/>");
                }
                if !piece.is_empty() {
                    run_xml.push_str(r#"<w:t xml:space="preserve">"#);
                    run_xml.push_str(&escape_text(piece));
                    run_xml.push_str("</w:t>");
                }
            }
        }
        run_xml.push_str("</w:r>");

        let properties = self.properties.clone();
        let mut xml = self.start_tag.clone();
        if let Some(ppr) = &properties {
            xml.push_str(ppr);
        }
        xml.push_str(&run_xml);
        xml.push_str(&self.end_tag);

        Self {
            xml,
            start_tag: self.start_tag.clone(),
            end_tag: self.end_tag.clone(),
            properties,
            runs: vec![Run {
                properties: None,
                text: text.to_string(),
            }],
        }
    }
}

impl Run {
    fn parse(xml: &str) -> ConstanciaResult<Self> {
        let properties = element_layout(xml)?
            .children
            .iter()
            .find(|c| c.name == "rPr")
            .map(|c| c.slice(xml).to_string());
        Ok(Self {
            properties,
            text: run_text(xml)?,
        })
    }
}

//==============================================================================
// Tables
//==============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub paragraphs: Vec<Paragraph>,
}

impl TableCell {
    /// Paragraph texts joined with newlines
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

/// A body table; read-only, always written back as parsed
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    xml: String,
    rows: Vec<TableRow>,
}

impl Table {
    pub fn parse(xml: &str) -> ConstanciaResult<Self> {
        let mut rows = Vec::new();
        for row in element_layout(xml)?.children.iter().filter(|c| c.name == "tr") {
            let row_xml = row.slice(xml);
            let mut cells = Vec::new();
            for cell in element_layout(row_xml)?.children.iter().filter(|c| c.name == "tc") {
                let cell_xml = cell.slice(row_xml);
                let paragraphs = element_layout(cell_xml)?
                    .children
                    .iter()
                    .filter(|c| c.name == "p")
                    .map(|p| Paragraph::parse(p.slice(cell_xml)))
                    .collect::<ConstanciaResult<Vec<_>>>()?;
                cells.push(TableCell { paragraphs });
            }
            rows.push(TableRow { cells });
        }

        Ok(Self {
            xml: xml.to_string(),
            rows,
        })
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Cells row-major: top to bottom, left to right
    pub fn cells(&self) -> impl Iterator<Item = &TableCell> {
        self.rows.iter().flat_map(|r| r.cells.iter())
    }

    pub fn xml(&self) -> &str {
        &self.xml
    }
}
