// src/render/html.rs
use chrono::NaiveDate;

use crate::extractors::models::DispositionRecord;

/// `2015-09-30` -> `September 30, 2015`
pub fn humanized_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

/// Portrait file for an attendee: `"His Worship Mayor Bowman"` -> `"Mayor_Bowman.jpg"`.
pub fn image_filename(attendee: &str) -> String {
    let words: Vec<&str> = attendee.split_whitespace().collect();
    let start = words.len().saturating_sub(2);
    format!("{}.jpg", words[start..].join("_"))
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn push_table(html: &mut String, id: &str, caption: &str, headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }
    html.push_str(&format!("<section id=\"{}\">\n<h2>{}</h2>\n<table>\n<tr>", id, escape(caption)));
    for header in headers {
        html.push_str(&format!("<th>{}</th>", escape(header)));
    }
    html.push_str("</tr>\n");
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", escape(cell)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n</section>\n");
}

/// Renders a disposition record as a standalone HTML page.
pub fn render_disposition(record: &DispositionRecord) -> String {
    let heading = match record.meeting_date {
        Some(date) => format!("Council Disposition: {}", humanized_date(date)),
        None => "Council Disposition".to_string(),
    };

    let mut html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape(&heading)));
    html.push_str("<style>\n");
    html.push_str("table { border-collapse: collapse; }\n");
    html.push_str("td, th { border: 1px solid #ccc; padding: 4px; vertical-align: top; }\n");
    html.push_str(".attendee img { width: 48px; }\n");
    html.push_str("</style>\n</head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape(&heading)));

    // Attendance
    let council: Vec<&String> = record
        .attendance
        .council
        .iter()
        .filter(|name| !name.is_empty())
        .collect();
    if !council.is_empty() || !record.attendance.public_service.is_empty() {
        html.push_str("<section id=\"attendance\">\n<h2>Attendance</h2>\n<ul class=\"council\">\n");
        for name in council {
            html.push_str(&format!(
                "<li class=\"attendee\"><img src=\"{}\" alt=\"\"> {}</li>\n",
                escape(&image_filename(name)),
                escape(name)
            ));
        }
        html.push_str("</ul>\n<ul class=\"public-service\">\n");
        for name in &record.attendance.public_service {
            html.push_str(&format!("<li>{}</li>\n", escape(name)));
        }
        html.push_str("</ul>\n</section>\n");
    }

    // Reports, one table each
    for (index, report) in record.reports.iter().enumerate() {
        let rows: Vec<Vec<String>> = report
            .items
            .iter()
            .map(|item| vec![item.number.clone(), item.title.clone(), item.disposition.clone()])
            .collect();
        let caption = format!("{} ({})", report.committee, humanized_date(report.date));
        push_table(&mut html, &format!("report-{}", index + 1), &caption, &["No.", "Item", "Disposition"], &rows);
    }

    let notices: Vec<Vec<String>> = record
        .notice_of_motions
        .iter()
        .map(|m| vec![m.movers.join(" / "), m.subject.clone(), m.disposition.clone()])
        .collect();
    push_table(&mut html, "notice-of-motions", "Notice of Motions", &["Movers", "Subject", "Disposition"], &notices);

    let motions: Vec<Vec<String>> = record
        .motions
        .iter()
        .map(|m| {
            vec![
                m.number.clone().unwrap_or_default(),
                m.movers.join(" / "),
                m.subject.clone(),
                m.disposition.clone(),
            ]
        })
        .collect();
    push_table(&mut html, "motions", "Motions", &["No.", "Movers", "Subject", "Disposition"], &motions);

    let bylaw_rows = |items: &[crate::extractors::models::BylawItem]| -> Vec<Vec<String>> {
        items
            .iter()
            .map(|b| vec![b.number.clone(), b.subject.clone(), b.disposition.clone()])
            .collect()
    };
    push_table(
        &mut html,
        "bylaws-first-reading",
        "By-laws Receiving First Reading",
        &["By-law No.", "Subject", "Disposition"],
        &bylaw_rows(&record.bylaws_first_reading),
    );
    push_table(
        &mut html,
        "bylaws-passed",
        "By-laws Passed",
        &["By-law No.", "Subject", "Disposition"],
        &bylaw_rows(&record.bylaws_passed),
    );

    let votes: Vec<Vec<String>> = record
        .recorded_votes
        .iter()
        .map(|v| vec![v.subject.clone(), v.yeas.join(", "), v.nays.join(", "), v.disposition.clone()])
        .collect();
    push_table(&mut html, "recorded-votes", "Recorded Votes", &["Subject", "Yeas", "Nays", "Disposition"], &votes);

    let declarations: Vec<Vec<String>> = record
        .conflict_of_interest_declarations
        .iter()
        .map(|d| vec![d.subject.clone(), d.members.join(", ")])
        .collect();
    push_table(
        &mut html,
        "conflict-of-interest-declarations",
        "Conflict of Interest Declarations",
        &["Subject", "Members"],
        &declarations,
    );

    html.push_str("</body>\n</html>\n");
    html
}
