// src/extractors/section.rs

// --- Imports ---
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::document::{Cell, Document, Row, Table};
use crate::extractors::locator::{HeadingRule, TableLocator};
use crate::utils::error::ExtractError;

// --- Sections ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Attendance,
    BylawsFirstReading,
    BylawsPassed,
    NoticeOfMotions,
    Motions,
    Reports,
    RecordedVotes,
    ConflictOfInterestDeclarations,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Attendance => "attendance",
            Section::BylawsFirstReading => "bylaws_first_reading",
            Section::BylawsPassed => "bylaws_passed",
            Section::NoticeOfMotions => "notice_of_motions",
            Section::Motions => "motions",
            Section::Reports => "reports",
            Section::RecordedVotes => "recorded_votes",
            Section::ConflictOfInterestDeclarations => "conflict_of_interest_declarations",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Column contract ---
/// How a column's cell is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRead {
    /// Joined text of all non-blank paragraphs.
    Text,
    /// One entry per non-blank paragraph.
    Lines,
    /// Joined text split on `/`, each name trimmed.
    Movers,
    /// Like `Lines`, with the `NIL` placeholder removed.
    Voters,
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub field: &'static str,
    pub read: CellRead,
}

const fn col(field: &'static str, read: CellRead) -> ColumnSpec {
    ColumnSpec { field, read }
}

/// Everything needed to pull one section out of a document.
#[derive(Debug, Clone)]
pub struct SectionSpec {
    pub section: Section,
    pub heading: HeadingRule,
    pub header_rows: usize,
    pub columns: &'static [ColumnSpec],
}

/// Cell placeholder meaning "no voters".
pub const NIL_VOTER: &str = "NIL";

const ATTENDANCE_COLUMNS: &[ColumnSpec] = &[
    col("council", CellRead::Text),
    col("public_service", CellRead::Text),
];
const BYLAW_COLUMNS: &[ColumnSpec] = &[
    col("number", CellRead::Text),
    col("subject", CellRead::Text),
    col("disposition", CellRead::Text),
];
const NOTICE_OF_MOTION_COLUMNS: &[ColumnSpec] = &[
    col("movers", CellRead::Movers),
    col("subject", CellRead::Text),
    col("disposition", CellRead::Text),
];
const MOTION_COLUMNS: &[ColumnSpec] = &[
    col("number", CellRead::Text),
    col("movers", CellRead::Movers),
    col("subject", CellRead::Text),
    col("disposition", CellRead::Text),
];
const REPORT_ITEM_COLUMNS: &[ColumnSpec] = &[
    col("number", CellRead::Text),
    col("title", CellRead::Text),
    col("disposition", CellRead::Text),
];
const RECORDED_VOTE_COLUMNS: &[ColumnSpec] = &[
    col("subject", CellRead::Text),
    col("yeas", CellRead::Voters),
    col("nays", CellRead::Voters),
    col("disposition", CellRead::Text),
];
const DECLARATION_COLUMNS: &[ColumnSpec] = &[
    col("subject", CellRead::Text),
    col("members", CellRead::Lines),
];

// --- Section table (Lazy Static) ---
pub static ATTENDANCE: Lazy<SectionSpec> = Lazy::new(|| SectionSpec {
    section: Section::Attendance,
    heading: HeadingRule::Contains("MEMBERS PRESENT".to_string()),
    header_rows: 1,
    columns: ATTENDANCE_COLUMNS,
});

pub static BYLAWS_FIRST_READING: Lazy<SectionSpec> = Lazy::new(|| SectionSpec {
    section: Section::BylawsFirstReading,
    heading: HeadingRule::Contains("BY-LAWS RECEIVING FIRST READING ONLY".to_string()),
    header_rows: 2,
    columns: BYLAW_COLUMNS,
});

pub static BYLAWS_PASSED: Lazy<SectionSpec> = Lazy::new(|| SectionSpec {
    section: Section::BylawsPassed,
    heading: HeadingRule::Contains("BY-LAWS PASSED (RECEIVED THIRD READING)".to_string()),
    header_rows: 2,
    columns: BYLAW_COLUMNS,
});

pub static NOTICE_OF_MOTIONS: Lazy<SectionSpec> = Lazy::new(|| SectionSpec {
    section: Section::NoticeOfMotions,
    heading: HeadingRule::Contains("NOTICE OF MOTION".to_string()),
    header_rows: 2,
    columns: NOTICE_OF_MOTION_COLUMNS,
});

pub static MOTIONS: Lazy<SectionSpec> = Lazy::new(|| SectionSpec {
    section: Section::Motions,
    heading: HeadingRule::Contains("COUNCIL MOTIONS".to_string()),
    header_rows: 2,
    columns: MOTION_COLUMNS,
});

/// Matches every committee report table; row 0 is the report title.
pub static REPORTS: Lazy<SectionSpec> = Lazy::new(|| SectionSpec {
    section: Section::Reports,
    heading: HeadingRule::Prefix("REPORT".to_string()),
    header_rows: 1,
    columns: REPORT_ITEM_COLUMNS,
});

// The heading is labelled both "RECORDS" and "REPORTS" in the wild.
pub static RECORDED_VOTES: Lazy<SectionSpec> = Lazy::new(|| SectionSpec {
    section: Section::RecordedVotes,
    heading: HeadingRule::Pattern(
        Regex::new(r"RECORDED VOTES FOR R\w{6}, MOTIONS AND BY-LAWS")
            .expect("Failed to compile RECORDED_VOTES heading"),
    ),
    header_rows: 2,
    columns: RECORDED_VOTE_COLUMNS,
});

pub static CONFLICT_OF_INTEREST_DECLARATIONS: Lazy<SectionSpec> = Lazy::new(|| SectionSpec {
    section: Section::ConflictOfInterestDeclarations,
    heading: HeadingRule::Contains("CONFLICT OF INTEREST DECLARATIONS".to_string()),
    header_rows: 2,
    columns: DECLARATION_COLUMNS,
});

// --- Extracted cell values ---
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    List(Vec<String>),
}

impl CellValue {
    fn read(cell: &Cell, read: CellRead) -> Self {
        match read {
            CellRead::Text => CellValue::Text(cell.text()),
            CellRead::Lines => CellValue::List(cell.paragraph_texts()),
            CellRead::Movers => CellValue::List(split_movers(&cell.text())),
            CellRead::Voters => CellValue::List(
                cell.paragraph_texts()
                    .into_iter()
                    .filter(|voter| voter.trim() != NIL_VOTER)
                    .collect(),
            ),
        }
    }
}

/// Mover names in the order written: `"Eadie / Allard"` -> `["Eadie", "Allard"]`.
pub fn split_movers(movers: &str) -> Vec<String> {
    movers.split('/').map(|name| name.trim().to_string()).collect()
}

/// The values of one data row, in column order, consumed field by field.
///
/// Each read names the field it expects; reading a field out of order, or
/// as the wrong kind of value, is a `FieldMismatch`.
#[derive(Debug)]
pub struct RowValues {
    section: Section,
    row: usize,
    next_column: usize,
    values: std::vec::IntoIter<(ColumnSpec, CellValue)>,
}

impl RowValues {
    pub fn text(&mut self, field: &'static str) -> Result<String, ExtractError> {
        match self.next_field(field)? {
            (_, CellValue::Text(text)) => Ok(text),
            (column, CellValue::List(_)) => Err(self.mismatch(
                column,
                format!("text '{}'", field),
                format!("list '{}'", field),
            )),
        }
    }

    pub fn list(&mut self, field: &'static str) -> Result<Vec<String>, ExtractError> {
        match self.next_field(field)? {
            (_, CellValue::List(items)) => Ok(items),
            (column, CellValue::Text(_)) => Err(self.mismatch(
                column,
                format!("list '{}'", field),
                format!("text '{}'", field),
            )),
        }
    }

    fn next_field(&mut self, field: &'static str) -> Result<(usize, CellValue), ExtractError> {
        let column = self.next_column;
        self.next_column += 1;

        match self.values.next() {
            Some((spec, value)) if spec.field == field => Ok((column, value)),
            Some((spec, _)) => Err(self.mismatch(
                column,
                format!("'{}'", field),
                format!("'{}'", spec.field),
            )),
            None => Err(self.mismatch(column, format!("'{}'", field), "no column".to_string())),
        }
    }

    fn mismatch(&self, column: usize, expected: String, found: String) -> ExtractError {
        ExtractError::FieldMismatch {
            section: self.section,
            row: self.row,
            column,
            expected,
            found,
        }
    }
}

/// A record type built from one data row of a section table.
pub trait FromRow: Sized {
    fn from_row(values: RowValues) -> Result<Self, ExtractError>;
}

// --- Generic extraction ---
impl SectionSpec {
    /// Reads the data rows of `table` per this section's column contract.
    ///
    /// Rows with fewer cells than the contract fail the whole section.
    pub fn read_table<T: FromRow>(&self, table: &Table) -> Result<Vec<T>, ExtractError> {
        table
            .rows()
            .iter()
            .enumerate()
            .skip(self.header_rows)
            .map(|(index, row)| self.read_row(index, row).and_then(T::from_row))
            .collect()
    }

    fn read_row(&self, index: usize, row: &Row) -> Result<RowValues, ExtractError> {
        let cells = row.cells();
        if let Some(missing) = self.columns.get(cells.len()) {
            return Err(ExtractError::ColumnCountMismatch {
                section: self.section,
                row: index,
                expected: self.columns.len(),
                found: cells.len(),
                missing: missing.field,
            });
        }

        let values: Vec<(ColumnSpec, CellValue)> = self
            .columns
            .iter()
            .zip(cells)
            .map(|(column, cell)| (*column, CellValue::read(cell, column.read)))
            .collect();

        Ok(RowValues {
            section: self.section,
            row: index,
            next_column: 0,
            values: values.into_iter(),
        })
    }

    /// Locates the section's table and reads its rows.
    /// A document without the table yields an empty collection.
    pub fn extract<T: FromRow>(&self, document: &Document) -> Result<Vec<T>, ExtractError> {
        match TableLocator::new(document).find_first(&self.heading) {
            Some(table) => {
                let items: Vec<T> = self.read_table(table)?;
                tracing::debug!("{}: extracted {} rows", self.section, items.len());
                Ok(items)
            }
            None => {
                tracing::debug!("{}: no matching table, section is empty", self.section);
                Ok(Vec::new())
            }
        }
    }
}
