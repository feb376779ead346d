// src/extractors/mod.rs
pub mod dates;
pub mod disposition;
pub mod locator;
pub mod models;
pub mod section;

// Re-export key extraction types for convenience
pub use disposition::Disposition;
pub use locator::{HeadingRule, TableLocator};
pub use models::{
    Attendance, BylawItem, DeclarationItem, DispositionRecord, MotionItem, ReportGroup,
    ReportItem, SectionFailure, VoteItem,
};
pub use section::{Section, SectionSpec};
