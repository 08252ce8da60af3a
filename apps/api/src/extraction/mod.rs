//! Document ingestion: raw text out of uploaded files, structured fields out of raw text.

pub mod fields;
pub mod prompts;
pub mod text;
