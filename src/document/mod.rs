// src/document/mod.rs
//! In-memory document model: ordered paragraphs and ordered tables.
//!
//! A `Document` is built once (usually by [`docx::load_docx`]) and never
//! mutated afterwards; extractors only borrow it.

pub mod docx;

pub use docx::{load_docx, parse_docx_bytes};

/// A loaded document snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    paragraphs: Vec<String>,
    tables: Vec<Table>,
}

impl Document {
    pub fn new(paragraphs: Vec<String>, tables: Vec<Table>) -> Self {
        Self { paragraphs, tables }
    }

    /// Body-level paragraph texts, in document order.
    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    /// Every table, in document order.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Joined text of the top-left cell, or `None` for an empty table.
    pub fn heading(&self) -> Option<String> {
        self.rows
            .first()
            .and_then(|row| row.cells().first())
            .map(Cell::text)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// A table cell holding the raw text of each of its paragraphs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    paragraphs: Vec<String>,
}

impl Cell {
    pub fn new<S: Into<String>>(paragraphs: impl IntoIterator<Item = S>) -> Self {
        Self {
            paragraphs: paragraphs.into_iter().map(Into::into).collect(),
        }
    }

    /// Raw paragraph texts, untouched.
    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    /// Trimmed paragraph texts with blank paragraphs removed.
    pub fn paragraph_texts(&self) -> Vec<String> {
        self.paragraphs
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// All non-blank paragraphs joined with a single space.
    pub fn text(&self) -> String {
        self.paragraph_texts().join(" ")
    }
}
