//! Element span helpers over WordprocessingML text
//!
//! The document model keeps original XML slices so untouched content can be
//! written back byte-for-byte. These helpers locate child elements of a root
//! element as byte ranges into the source string.

use crate::error::{ConstanciaError, ConstanciaResult};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::ops::Range;

/// A child element: its local name (without namespace prefix) and byte range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSpan {
    pub name: String,
    pub range: Range<usize>,
}

impl ElementSpan {
    pub fn slice<'a>(&self, xml: &'a str) -> &'a str {
        &xml[self.range.clone()]
    }
}

/// The root element's start tag end and end tag start, plus its direct children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementLayout {
    /// Byte range of the root element's content (between its tags). Empty
    /// root elements (`<w:p/>`) have no content.
    pub content: Option<Range<usize>>,
    pub children: Vec<ElementSpan>,
}

/// Locate the direct children of the first element in `xml`.
///
/// Anything before the root element (declaration, comments) is skipped.
pub fn element_layout(xml: &str) -> ConstanciaResult<ElementLayout> {
    let mut reader = Reader::from_str(xml);
    let mut depth: usize = 0;
    let mut content_start: Option<usize> = None;
    let mut children = Vec::new();
    let mut open_child: Option<(String, usize)> = None;

    loop {
        let before = reader.buffer_position() as usize;
        let event = reader.read_event()?;
        let after = reader.buffer_position() as usize;

        match event {
            Event::Start(e) => {
                depth += 1;
                if depth == 1 {
                    content_start = Some(after);
                } else if depth == 2 {
                    open_child = Some((local_name(e.local_name().as_ref()), before));
                }
            }
            Event::Empty(e) => {
                if depth == 0 {
                    return Ok(ElementLayout {
                        content: None,
                        children,
                    });
                }
                if depth == 1 {
                    children.push(ElementSpan {
                        name: local_name(e.local_name().as_ref()),
                        range: before..after,
                    });
                }
            }
            Event::End(_) => {
                if depth == 2 {
                    if let Some((name, start)) = open_child.take() {
                        children.push(ElementSpan {
                            name,
                            range: start..after,
                        });
                    }
                }
                if depth == 1 {
                    let start = content_start.unwrap_or(before);
                    return Ok(ElementLayout {
                        content: Some(start..before),
                        children,
                    });
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Err(ConstanciaError::Template(
        "unexpected end of XML while reading element".to_string(),
    ))
}

/// Text of a run: its direct `w:t` children, `w:tab` as a tab and
/// `w:br`/`w:cr` as a newline. Nested content (drawings, text boxes,
/// alternate content, field codes) does not belong to the run's text.
pub fn run_text(xml: &str) -> ConstanciaResult<String> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut depth: usize = 0;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if depth == 1 {
                    match e.local_name().as_ref() {
                        b"t" => in_text = true,
                        b"tab" => text.push('\t'),
                        b"br" | b"cr" => text.push('\n'),
                        _ => {}
                    }
                }
                depth += 1;
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 1 {
                    in_text = false;
                }
            }
            Event::Empty(e) if depth == 1 => match e.local_name().as_ref() {
                b"tab" => text.push('\t'),
                b"br" | b"cr" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text => text.push_str(&t.unescape()?),
            Event::CData(t) if in_text => text.push_str(&String::from_utf8_lossy(&t)),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

/// Escape text for a `w:t` element
pub fn escape_text(text: &str) -> String {
    quick_xml::escape::escape(text).into_owned()
}

fn local_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).into_owned()
}
