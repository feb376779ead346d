// src/extractors/locator.rs
use regex::Regex;

use crate::document::{Document, Table};

/// How a table's heading cell is recognised.
#[derive(Debug, Clone)]
pub enum HeadingRule {
    Exact(String),
    Prefix(String),
    Contains(String),
    Pattern(Regex),
}

impl HeadingRule {
    pub fn matches(&self, heading: &str) -> bool {
        match self {
            HeadingRule::Exact(s) => heading == s,
            HeadingRule::Prefix(s) => heading.starts_with(s.as_str()),
            HeadingRule::Contains(s) => heading.contains(s.as_str()),
            HeadingRule::Pattern(re) => re.is_match(heading),
        }
    }
}

/// Finds tables in a document by the text of their heading cell
/// (row 0, cell 0, joined text).
pub struct TableLocator<'d> {
    document: &'d Document,
}

impl<'d> TableLocator<'d> {
    pub fn new(document: &'d Document) -> Self {
        Self { document }
    }

    /// First table, in document order, whose heading satisfies `rule`.
    pub fn find_first(&self, rule: &HeadingRule) -> Option<&'d Table> {
        self.matching(rule).next()
    }

    /// Every table whose heading satisfies `rule`, in document order.
    pub fn find_all(&self, rule: &HeadingRule) -> Vec<&'d Table> {
        self.matching(rule).collect()
    }

    fn matching<'r>(&self, rule: &'r HeadingRule) -> impl Iterator<Item = &'d Table> + 'r
    where
        'd: 'r,
    {
        self.document.tables().iter().filter(move |table| {
            table
                .heading()
                .map_or(false, |heading| rule.matches(&heading))
        })
    }
}
