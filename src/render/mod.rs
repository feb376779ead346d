// src/render/mod.rs
pub mod html;

pub use html::render_disposition;
