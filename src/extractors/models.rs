// src/extractors/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::extractors::section::{FromRow, RowValues, Section};
use crate::utils::error::ExtractError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    pub council: Vec<String>,
    pub public_service: Vec<String>,
}

// One attendance row: a council member and a public servant side by side.
pub(crate) struct AttendanceRow {
    pub council: String,
    pub public_service: String,
}

impl FromRow for AttendanceRow {
    fn from_row(mut values: RowValues) -> Result<Self, ExtractError> {
        Ok(AttendanceRow {
            council: values.text("council")?,
            public_service: values.text("public_service")?,
        })
    }
}

impl FromIterator<AttendanceRow> for Attendance {
    fn from_iter<I: IntoIterator<Item = AttendanceRow>>(rows: I) -> Self {
        let mut attendance = Attendance::default();
        for row in rows {
            attendance.council.push(row.council);
            if !row.public_service.is_empty() {
                attendance.public_service.push(row.public_service);
            }
        }
        attendance
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BylawItem {
    pub number: String,
    pub subject: String,
    pub disposition: String,
}

impl FromRow for BylawItem {
    fn from_row(mut values: RowValues) -> Result<Self, ExtractError> {
        Ok(BylawItem {
            number: values.text("number")?,
            subject: values.text("subject")?,
            disposition: values.text("disposition")?,
        })
    }
}

/// A council motion, or a notice of motion when `number` is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    pub movers: Vec<String>,
    pub subject: String,
    pub disposition: String,
}

// Notices of motion carry no number column.
pub(crate) struct NoticeOfMotionRow(pub MotionItem);

impl FromRow for NoticeOfMotionRow {
    fn from_row(mut values: RowValues) -> Result<Self, ExtractError> {
        Ok(NoticeOfMotionRow(MotionItem {
            number: None,
            movers: values.list("movers")?,
            subject: values.text("subject")?,
            disposition: values.text("disposition")?,
        }))
    }
}

impl FromRow for MotionItem {
    fn from_row(mut values: RowValues) -> Result<Self, ExtractError> {
        Ok(MotionItem {
            number: Some(values.text("number")?),
            movers: values.list("movers")?,
            subject: values.text("subject")?,
            disposition: values.text("disposition")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportGroup {
    pub title: String,
    pub date: NaiveDate,
    pub committee: String,
    pub items: Vec<ReportItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportItem {
    pub number: String,
    pub title: String,
    pub disposition: String,
}

impl FromRow for ReportItem {
    fn from_row(mut values: RowValues) -> Result<Self, ExtractError> {
        Ok(ReportItem {
            number: values.text("number")?,
            title: values.text("title")?,
            disposition: values.text("disposition")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteItem {
    pub subject: String,
    pub disposition: String,
    pub yeas: Vec<String>,
    pub nays: Vec<String>,
}

impl FromRow for VoteItem {
    fn from_row(mut values: RowValues) -> Result<Self, ExtractError> {
        // Column order: subject, yeas, nays, disposition
        let subject = values.text("subject")?;
        let yeas = values.list("yeas")?;
        let nays = values.list("nays")?;
        let disposition = values.text("disposition")?;
        Ok(VoteItem {
            subject,
            disposition,
            yeas,
            nays,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationItem {
    pub subject: String,
    pub members: Vec<String>,
}

impl FromRow for DeclarationItem {
    fn from_row(mut values: RowValues) -> Result<Self, ExtractError> {
        Ok(DeclarationItem {
            subject: values.text("subject")?,
            members: values.list("members")?,
        })
    }
}

/// A section that could not be extracted; its collection is left empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionFailure {
    pub section: Section,
    pub message: String,
}

/// Everything extracted from one disposition document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispositionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_date: Option<NaiveDate>,
    pub attendance: Attendance,
    pub reports: Vec<ReportGroup>,
    pub notice_of_motions: Vec<MotionItem>,
    pub motions: Vec<MotionItem>,
    pub bylaws_first_reading: Vec<BylawItem>,
    pub bylaws_passed: Vec<BylawItem>,
    pub recorded_votes: Vec<VoteItem>,
    pub conflict_of_interest_declarations: Vec<DeclarationItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<SectionFailure>,
}
