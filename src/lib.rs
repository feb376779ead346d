// src/lib.rs
//! Extracts structured records from City Council disposition documents
//! (.docx files organised as a sequence of headed tables).
pub mod document;
pub mod extractors;
pub mod feed;
pub mod render;
pub mod storage;
pub mod utils;

pub use document::Document;
pub use extractors::{Disposition, DispositionRecord};
pub use utils::AppError;
