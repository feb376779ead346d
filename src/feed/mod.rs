// src/feed/mod.rs
//! Open-data feed listing council meetings and their disposition documents.
pub mod client;
pub mod models;

pub use models::{DispositionFeed, FeedEntry};
