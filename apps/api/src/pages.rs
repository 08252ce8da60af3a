//! HTML views. Templates live under `templates/`.

use askama::Template;

use crate::models::resume::ResumeRecord;
use crate::resumes::search::SearchFilters;

const MISSING: &str = "N/A";

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub messages: Vec<String>,
}

#[derive(Template)]
#[template(path = "upload.html")]
pub struct UploadPage {
    pub messages: Vec<String>,
}

#[derive(Template)]
#[template(path = "search.html")]
pub struct SearchPage {
    pub messages: Vec<String>,
    pub filters: SearchFilters,
    pub searched: bool,
    pub results: Vec<ResumeView>,
}

#[derive(Template)]
#[template(path = "view_resume.html")]
pub struct ResumePage {
    pub messages: Vec<String>,
    pub resume: ResumeView,
}

/// Display-ready copy of a record; absent values render as "N/A".
pub struct ResumeView {
    pub id: i64,
    pub filename: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub education: String,
    pub skills: Vec<String>,
    pub companies: Vec<String>,
    pub raw_text: String,
    pub upload_date: String,
}

impl From<ResumeRecord> for ResumeView {
    fn from(record: ResumeRecord) -> Self {
        Self {
            id: record.id,
            filename: record.filename,
            name: or_missing(record.name),
            email: or_missing(record.email),
            phone: or_missing(record.phone),
            location: or_missing(record.current_location),
            education: or_missing(record.education),
            skills: record.skills,
            companies: record.companies,
            raw_text: record.raw_text.unwrap_or_default(),
            upload_date: record.upload_date.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

fn or_missing(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| MISSING.to_string())
}
