// src/document/docx.rs
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use roxmltree::Node;

use super::{Cell, Document, Row, Table};
use crate::utils::error::DocumentError;

const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const DOCUMENT_PART: &str = "word/document.xml";

/// Opens a .docx file and loads its paragraphs and tables.
pub fn load_docx<P: AsRef<Path>>(path: P) -> Result<Document, DocumentError> {
    let path = path.as_ref();
    tracing::debug!("Loading docx from {}", path.display());
    let bytes = fs::read(path)?;
    parse_docx_bytes(&bytes)
}

/// Loads a document from the raw bytes of a .docx (zip) container.
pub fn parse_docx_bytes(bytes: &[u8]) -> Result<Document, DocumentError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;

    let mut xml = String::new();
    match archive.by_name(DOCUMENT_PART) {
        Ok(mut part) => {
            part.read_to_string(&mut xml)?;
        }
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(DocumentError::MissingPart(DOCUMENT_PART.to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    parse_document_xml(&xml)
}

/// Builds the document model from the WordprocessingML main part.
///
/// Paragraphs are the direct `w:p` children of `w:body`; tables are every
/// `w:tbl` in document order, nested ones included.
pub fn parse_document_xml(xml: &str) -> Result<Document, DocumentError> {
    let xml_doc = roxmltree::Document::parse(xml)?;

    let body = xml_doc
        .descendants()
        .find(|n| n.has_tag_name((WORDML_NS, "body")))
        .ok_or_else(|| DocumentError::MissingPart("w:body".to_string()))?;

    let paragraphs: Vec<String> = children_named(body, "p").map(paragraph_text).collect();

    let tables: Vec<Table> = body
        .descendants()
        .filter(|n| n.has_tag_name((WORDML_NS, "tbl")))
        .map(table_from_node)
        .collect();

    tracing::debug!(
        "Parsed document: {} paragraphs, {} tables",
        paragraphs.len(),
        tables.len()
    );

    Ok(Document::new(paragraphs, tables))
}

fn children_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |n| n.has_tag_name((WORDML_NS, name)))
}

fn table_from_node(tbl: Node) -> Table {
    let rows = children_named(tbl, "tr")
        .map(|tr| {
            let cells = children_named(tr, "tc")
                .map(|tc| Cell::new(children_named(tc, "p").map(paragraph_text)))
                .collect();
            Row::new(cells)
        })
        .collect();
    Table::new(rows)
}

// Text runs of one paragraph, concatenated.
fn paragraph_text(p: Node) -> String {
    let mut text = String::new();
    for node in p.descendants() {
        if node.has_tag_name((WORDML_NS, "t")) {
            if let Some(t) = node.text() {
                text.push_str(t);
            }
        } else if node.has_tag_name((WORDML_NS, "tab")) {
            text.push('\t');
        } else if node.has_tag_name((WORDML_NS, "br")) || node.has_tag_name((WORDML_NS, "cr")) {
            text.push(' ');
        }
    }
    text
}
