// src/extractors/disposition.rs
//! Council disposition documents.
//!
//! A disposition is the clerk's record of what happened to each agenda item
//! at one council meeting. Each kind of item lives in its own table, found by
//! the text of the table's top-left cell:
//!
//! - Attendance (council and public service)
//! - By-laws receiving first reading, by-laws passed on third reading
//! - Notices of motion and council motions
//! - Committee reports, one table per report
//! - Recorded votes
//! - Conflict of interest declarations

use std::path::Path;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::{self, Document, Table};
use crate::extractors::dates::parse_date;
use crate::extractors::locator::TableLocator;
use crate::extractors::models::{
    Attendance, AttendanceRow, BylawItem, DeclarationItem, DispositionRecord, MotionItem,
    NoticeOfMotionRow, ReportGroup, ReportItem, SectionFailure, VoteItem,
};
use crate::extractors::section::{self, Section};
use crate::utils::error::{DocumentError, ExtractError};

/// The meeting date is looked for in this many leading paragraphs.
const MEETING_DATE_SCAN_DEPTH: usize = 20;

// "REPORT OF THE EXECUTIVE POLICY COMMITTEE dated September 16, 2015"
// Committee runs from the last "OF THE" to the last "dated".
static REPORT_TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)REPORT.*\bOF THE\s+(.+)\s+dated\s+(.+)$")
        .expect("Failed to compile REPORT_TITLE_RE")
});

pub struct Disposition {
    document: Document,
}

impl Disposition {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Loads a disposition from a .docx file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        Ok(Self::new(document::load_docx(path)?))
    }

    /// First date found among the leading paragraphs.
    pub fn meeting_date(&self) -> Option<NaiveDate> {
        self.document
            .paragraphs()
            .iter()
            .take(MEETING_DATE_SCAN_DEPTH)
            .find_map(|paragraph| parse_date(paragraph))
    }

    pub fn attendance(&self) -> Result<Attendance, ExtractError> {
        let rows: Vec<AttendanceRow> = section::ATTENDANCE.extract(&self.document)?;
        Ok(rows.into_iter().collect())
    }

    pub fn attendance_council(&self) -> Result<Vec<String>, ExtractError> {
        Ok(self.attendance()?.council)
    }

    pub fn attendance_public_service(&self) -> Result<Vec<String>, ExtractError> {
        Ok(self.attendance()?.public_service)
    }

    pub fn bylaws_first_reading(&self) -> Result<Vec<BylawItem>, ExtractError> {
        section::BYLAWS_FIRST_READING.extract(&self.document)
    }

    pub fn bylaws_passed(&self) -> Result<Vec<BylawItem>, ExtractError> {
        section::BYLAWS_PASSED.extract(&self.document)
    }

    pub fn notice_of_motions(&self) -> Result<Vec<MotionItem>, ExtractError> {
        let rows: Vec<NoticeOfMotionRow> = section::NOTICE_OF_MOTIONS.extract(&self.document)?;
        Ok(rows.into_iter().map(|NoticeOfMotionRow(item)| item).collect())
    }

    pub fn motions(&self) -> Result<Vec<MotionItem>, ExtractError> {
        section::MOTIONS.extract(&self.document)
    }

    /// Committee reports, one per report table, in document order.
    pub fn reports(&self) -> Result<Vec<ReportGroup>, ExtractError> {
        let spec = &*section::REPORTS;
        TableLocator::new(&self.document)
            .find_all(&spec.heading)
            .into_iter()
            .map(read_report)
            .collect()
    }

    pub fn recorded_votes(&self) -> Result<Vec<VoteItem>, ExtractError> {
        section::RECORDED_VOTES.extract(&self.document)
    }

    pub fn conflict_of_interest_declarations(&self) -> Result<Vec<DeclarationItem>, ExtractError> {
        section::CONFLICT_OF_INTEREST_DECLARATIONS.extract(&self.document)
    }

    /// Extracts every section. A section that fails is left empty and
    /// reported in `failures`; the others are unaffected.
    pub fn to_record(&self) -> DispositionRecord {
        let mut failures = Vec::new();

        let record = DispositionRecord {
            meeting_date: self.meeting_date(),
            attendance: settle(self.attendance(), &mut failures),
            reports: settle(self.reports(), &mut failures),
            notice_of_motions: settle(self.notice_of_motions(), &mut failures),
            motions: settle(self.motions(), &mut failures),
            bylaws_first_reading: settle(self.bylaws_first_reading(), &mut failures),
            bylaws_passed: settle(self.bylaws_passed(), &mut failures),
            recorded_votes: settle(self.recorded_votes(), &mut failures),
            conflict_of_interest_declarations: settle(
                self.conflict_of_interest_declarations(),
                &mut failures,
            ),
            failures: Vec::new(),
        };

        if record.meeting_date.is_none() {
            tracing::warn!("No meeting date found in the first {} paragraphs", MEETING_DATE_SCAN_DEPTH);
        }

        DispositionRecord { failures, ..record }
    }
}

fn settle<T: Default>(result: Result<T, ExtractError>, failures: &mut Vec<SectionFailure>) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!("Section {} skipped: {}", e.section(), e);
        failures.push(SectionFailure {
            section: e.section(),
            message: e.to_string(),
        });
        T::default()
    })
}

fn read_report(table: &Table) -> Result<ReportGroup, ExtractError> {
    let title = table.heading().unwrap_or_default();

    let caps = REPORT_TITLE_RE
        .captures(&title)
        .ok_or_else(|| ExtractError::MalformedHeading {
            section: Section::Reports,
            heading: title.clone(),
        })?;

    let committee = capitalize_words(&caps[1]);
    let date_text = caps[2].trim().to_string();
    let date = parse_date(&date_text).ok_or(ExtractError::UnparseableEmbeddedDate {
        section: Section::Reports,
        text: date_text,
    })?;

    let items: Vec<ReportItem> = section::REPORTS.read_table(table)?;

    tracing::debug!("Report '{}': {} items", committee, items.len());
    Ok(ReportGroup {
        title,
        date,
        committee,
        items,
    })
}

/// `"EXECUTIVE POLICY COMMITTEE"` -> `"Executive Policy Committee"`.
fn capitalize_words(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Cell, Row};

    fn row(cells: &[&[&str]]) -> Row {
        Row::new(cells.iter().map(|c| Cell::new(c.iter().copied())).collect())
    }

    fn table(rows: Vec<Row>) -> Table {
        Table::new(rows)
    }

    fn paragraphs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    fn attendance_table() -> Table {
        table(vec![
            row(&[&["MEMBERS PRESENT"], &["PUBLIC SERVICE"]]),
            row(&[&["His Worship Mayor Bowman"], &[""]]),
            row(&[&["Councillor Allard"], &["Mr. R. Kachur, City Clerk"]]),
            row(&[&[""], &["Mr. D. Joshi,", "Chief Administrative Officer"]]),
        ])
    }

    fn bylaws_passed_table() -> Table {
        table(vec![
            row(&[&["BY-LAWS PASSED (RECEIVED THIRD READING)"]]),
            row(&[&["By-law No."], &["Subject"], &["Disposition"]]),
            row(&[
                &["43/2015"],
                &["To amend the North Henderson Highway Secondary Plan By-law No. 1300/1976 – SPA 1/2015"],
                &["PASSED"],
            ]),
            row(&[&["81/2015"], &["To close a lane"], &["PASSED"]]),
        ])
    }

    fn bylaws_first_reading_table() -> Table {
        table(vec![
            row(&[&["BY-LAWS RECEIVING FIRST READING ONLY"]]),
            row(&[&["By-law No."], &["Subject"], &["Disposition"]]),
            row(&[
                &["81/2015"],
                &["To amend the North Henderson Highway Secondary Plan By-law No. 1300/1976. - SPA 4/2015"],
                &["RECEIVED FIRST READING ONLY"],
            ]),
        ])
    }

    fn motions_table() -> Table {
        table(vec![
            row(&[&["COUNCIL MOTIONS"]]),
            row(&[&["No."], &["Movers"], &["Subject"], &["Disposition"]]),
            row(&[
                &["1"],
                &["Eadie / Allard"],
                &["THEREFORE BE IT RESOLVED", "THAT the matter be referred."],
                &["ADOPTED"],
            ]),
        ])
    }

    fn notice_of_motions_table() -> Table {
        table(vec![
            row(&[&["NOTICE OF MOTION"]]),
            row(&[&["Movers"], &["Subject"], &["Disposition"]]),
            row(&[&["Schreyer / Wyatt"], &["Refer water rates to the PUB"], &["LOST"]]),
        ])
    }

    fn report_table() -> Table {
        table(vec![
            row(&[&["REPORT OF THE EXECUTIVE POLICY COMMITTEE dated September 16, 2015"]]),
            row(&[
                &["1"],
                &["CentreVenture Development Corporation – Long-term Funding Solution"],
                &["60 DAY EXTENSION OF TIME GRANTED"],
            ]),
            row(&[&["2"], &["Capital Budget"], &["ADOPTED"]]),
        ])
    }

    fn second_report_table() -> Table {
        table(vec![
            row(&[&["REPORT OF THE STANDING POLICY COMMITTEE ON FINANCE dated September 3, 2015"]]),
            row(&[&["1"], &["Tax credits"], &["ADOPTED"]]),
        ])
    }

    fn recorded_votes_table() -> Table {
        table(vec![
            row(&[&["RECORDED VOTES FOR RECORDS, MOTIONS AND BY-LAWS"]]),
            row(&[&["Subject"], &["Yeas"], &["Nays"], &["Disposition"]]),
            row(&[
                &["Water rates"],
                &["Councillor A", "NIL", "", "Councillor B"],
                &["NIL"],
                &["CARRIED"],
            ]),
        ])
    }

    fn declarations_table() -> Table {
        table(vec![
            row(&[&["CONFLICT OF INTEREST DECLARATIONS"]]),
            row(&[&["Subject"], &["Members"]]),
            row(&[&["Item 4 – Zoning"], &["Councillor Orlikow", "", "Councillor Lukes"]]),
        ])
    }

    fn full_document() -> Document {
        Document::new(
            paragraphs(&["MINUTES", "DISPOSITION", "Regular Meeting", "September 30, 2015"]),
            vec![
                attendance_table(),
                report_table(),
                second_report_table(),
                notice_of_motions_table(),
                motions_table(),
                bylaws_first_reading_table(),
                bylaws_passed_table(),
                recorded_votes_table(),
                declarations_table(),
            ],
        )
    }

    #[test]
    fn test_meeting_date_scans_leading_paragraphs() {
        let disposition = Disposition::new(full_document());
        assert_eq!(disposition.meeting_date(), NaiveDate::from_ymd_opt(2015, 9, 30));
    }

    #[test]
    fn test_meeting_date_beyond_scan_depth_is_absent() {
        let mut texts: Vec<String> = (0..20).map(|i| format!("Paragraph {}", i)).collect();
        texts.push("September 30, 2015".to_string());
        let disposition = Disposition::new(Document::new(texts, vec![]));
        assert_eq!(disposition.meeting_date(), None);
    }

    #[test]
    fn test_attendance() {
        let disposition = Disposition::new(full_document());
        let council = disposition.attendance_council().unwrap();
        let public_service = disposition.attendance_public_service().unwrap();

        assert_eq!(council.first().map(String::as_str), Some("His Worship Mayor Bowman"));
        // Blank council cells are kept, blank public service cells are not
        assert_eq!(council, vec!["His Worship Mayor Bowman", "Councillor Allard", ""]);
        assert_eq!(
            public_service,
            vec!["Mr. R. Kachur, City Clerk", "Mr. D. Joshi, Chief Administrative Officer"]
        );
        assert!(!public_service.contains(&"His Worship Mayor Bowman".to_string()));
    }

    #[test]
    fn test_bylaws() {
        let disposition = Disposition::new(full_document());

        let passed = disposition.bylaws_passed().unwrap();
        assert_eq!(passed.len(), 2);
        assert_eq!(
            passed[0],
            BylawItem {
                number: "43/2015".into(),
                subject: "To amend the North Henderson Highway Secondary Plan By-law No. 1300/1976 – SPA 1/2015".into(),
                disposition: "PASSED".into(),
            }
        );

        let first_reading = disposition.bylaws_first_reading().unwrap();
        assert_eq!(first_reading.len(), 1);
        assert_eq!(first_reading[0].disposition, "RECEIVED FIRST READING ONLY");
    }

    #[test]
    fn test_motions_and_notices() {
        let disposition = Disposition::new(full_document());

        let motions = disposition.motions().unwrap();
        assert_eq!(
            motions,
            vec![MotionItem {
                number: Some("1".into()),
                movers: vec!["Eadie".into(), "Allard".into()],
                subject: "THEREFORE BE IT RESOLVED THAT the matter be referred.".into(),
                disposition: "ADOPTED".into(),
            }]
        );

        let notices = disposition.notice_of_motions().unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].number, None);
        assert_eq!(notices[0].movers, vec!["Schreyer", "Wyatt"]);
        assert_eq!(notices[0].disposition, "LOST");
    }

    #[test]
    fn test_reports() {
        let disposition = Disposition::new(full_document());
        let reports = disposition.reports().unwrap();

        assert_eq!(reports.len(), 2);
        let first = &reports[0];
        assert_eq!(
            first.title,
            "REPORT OF THE EXECUTIVE POLICY COMMITTEE dated September 16, 2015"
        );
        assert_eq!(first.committee, "Executive Policy Committee");
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2015, 9, 16).unwrap());
        assert_eq!(first.items.len(), 2);
        assert_eq!(
            first.items[0],
            ReportItem {
                number: "1".into(),
                title: "CentreVenture Development Corporation – Long-term Funding Solution".into(),
                disposition: "60 DAY EXTENSION OF TIME GRANTED".into(),
            }
        );
        assert_eq!(reports[1].committee, "Standing Policy Committee On Finance");
        assert_eq!(reports[1].date, NaiveDate::from_ymd_opt(2015, 9, 3).unwrap());
    }

    #[test]
    fn test_report_with_bad_date_is_an_error() {
        let doc = Document::new(
            vec![],
            vec![table(vec![row(&[&["REPORT OF THE EXECUTIVE POLICY COMMITTEE dated Septober 99"]])])],
        );
        let err = Disposition::new(doc).reports().unwrap_err();
        assert_eq!(
            err,
            ExtractError::UnparseableEmbeddedDate {
                section: Section::Reports,
                text: "Septober 99".into(),
            }
        );
    }

    #[test]
    fn test_report_without_committee_is_malformed() {
        let doc = Document::new(vec![], vec![table(vec![row(&[&["REPORTS TO FOLLOW"]])])]);
        let err = Disposition::new(doc).reports().unwrap_err();
        assert!(matches!(err, ExtractError::MalformedHeading { section: Section::Reports, .. }));
    }

    #[test]
    fn test_recorded_votes() {
        let disposition = Disposition::new(full_document());
        let votes = disposition.recorded_votes().unwrap();

        assert_eq!(
            votes,
            vec![VoteItem {
                subject: "Water rates".into(),
                disposition: "CARRIED".into(),
                yeas: vec!["Councillor A".into(), "Councillor B".into()],
                nays: vec![],
            }]
        );
    }

    #[test]
    fn test_conflict_of_interest_declarations() {
        let disposition = Disposition::new(full_document());
        let declarations = disposition.conflict_of_interest_declarations().unwrap();

        assert_eq!(declarations.len(), 1);
        assert_eq!(declarations[0].subject, "Item 4 – Zoning");
        assert_eq!(declarations[0].members, vec!["Councillor Orlikow", "Councillor Lukes"]);
    }

    #[test]
    fn test_empty_document_yields_empty_sections() {
        let disposition = Disposition::new(Document::default());
        let record = disposition.to_record();

        assert_eq!(record, DispositionRecord::default());
        assert!(disposition.attendance_council().unwrap().is_empty());
        assert!(disposition.reports().unwrap().is_empty());
    }

    #[test]
    fn test_to_record_is_idempotent() {
        let disposition = Disposition::new(full_document());
        let first = disposition.to_record();
        let second = disposition.to_record();

        assert_eq!(first, second);
        assert!(first.failures.is_empty());
        assert_eq!(first.reports.len(), 2);
        assert_eq!(first.conflict_of_interest_declarations.len(), 1);
    }

    #[test]
    fn test_failing_section_does_not_block_others() {
        let mut tables = vec![
            table(vec![
                row(&[&["COUNCIL MOTIONS"]]),
                row(&[&["No."], &["Movers"], &["Subject"], &["Disposition"]]),
                row(&[&["1"], &["Eadie"]]),
            ]),
        ];
        tables.push(bylaws_passed_table());
        let disposition = Disposition::new(Document::new(vec![], tables));

        let record = disposition.to_record();
        assert!(record.motions.is_empty());
        assert_eq!(record.bylaws_passed.len(), 2);
        assert_eq!(record.failures.len(), 1);
        assert_eq!(record.failures[0].section, Section::Motions);
        assert!(record.failures[0].message.contains("row 2"));
    }

    #[test]
    fn test_report_date_follows_last_dated() {
        let doc = Document::new(
            vec![],
            vec![table(vec![row(&[&[
                "REPORT OF THE COMMITTEE dated June 1, 2015 AS AMENDED dated June 3, 2015",
            ]])])],
        );
        let reports = Disposition::new(doc).reports().unwrap();
        assert_eq!(reports[0].date, NaiveDate::from_ymd_opt(2015, 6, 3).unwrap());
        assert_eq!(reports[0].committee, "Committee Dated June 1, 2015 As Amended");
    }

    #[test]
    fn test_one_bad_report_date_fails_all_reports() {
        let doc = Document::new(
            vec![],
            vec![
                report_table(),
                table(vec![row(&[&["REPORT OF THE AUDIT COMMITTEE dated sometime soon"]])]),
                second_report_table(),
                bylaws_passed_table(),
            ],
        );
        let disposition = Disposition::new(doc);

        assert!(matches!(
            disposition.reports(),
            Err(ExtractError::UnparseableEmbeddedDate { section: Section::Reports, .. })
        ));

        // The valid reports are dropped with it; other sections are untouched
        let record = disposition.to_record();
        assert!(record.reports.is_empty());
        assert_eq!(record.bylaws_passed.len(), 2);
        assert_eq!(record.failures.len(), 1);
        assert_eq!(record.failures[0].section, Section::Reports);
    }

    #[test]
    fn test_recorded_votes_with_reports_heading() {
        let doc = Document::new(
            vec![],
            vec![table(vec![
                row(&[&["RECORDED VOTES FOR REPORTS, MOTIONS AND BY-LAWS"]]),
                row(&[&["Subject"], &["Yeas"], &["Nays"], &["Disposition"]]),
                row(&[&["Budget"], &["Councillor A"], &["Councillor C", "NIL"], &["LOST"]]),
            ])],
        );
        let disposition = Disposition::new(doc);

        let votes = disposition.recorded_votes().unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].yeas, vec!["Councillor A"]);
        assert_eq!(votes[0].nays, vec!["Councillor C"]);
        assert_eq!(votes[0].disposition, "LOST");
        // The heading starts with "RECORDED", so it is not taken for a report
        assert!(disposition.reports().unwrap().is_empty());
    }

    #[test]
    fn test_extraction_runs_concurrently() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Disposition>();

        let disposition = Disposition::new(full_document());
        let (first, second) = std::thread::scope(|scope| {
            let a = scope.spawn(|| disposition.to_record());
            let b = scope.spawn(|| disposition.to_record());
            (a.join().unwrap(), b.join().unwrap())
        });

        assert_eq!(first, second);
        assert_eq!(first, disposition.to_record());
        assert_eq!(first.motions.len(), 1);
    }

    #[test]
    fn test_capitalize_words() {
        assert_eq!(capitalize_words("EXECUTIVE  POLICY COMMITTEE"), "Executive Policy Committee");
        assert_eq!(capitalize_words("standing policy committee"), "Standing Policy Committee");
    }
}
