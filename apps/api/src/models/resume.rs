use chrono::NaiveDateTime;
use sqlx::FromRow;

use crate::extraction::fields::ExtractedFields;

/// Name written into the placeholder record when field extraction fails.
/// A record carrying it is never persisted.
pub const PARSE_FAILURE_NAME: &str = "Error Parsing";

/// Only this many characters of extracted text are kept.
pub const RAW_TEXT_LIMIT: usize = 2000;

pub const EDUCATION_SEPARATOR: &str = "; ";

/// Row as stored. List columns stay as raw JSON text until decoded.
#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: i64,
    pub filename: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Option<String>,
    pub current_location: Option<String>,
    pub education: Option<String>,
    pub companies: Option<String>,
    pub raw_text: Option<String>,
    pub upload_date: NaiveDateTime,
}

/// A persisted resume with its list columns decoded.
#[derive(Debug, Clone)]
pub struct ResumeRecord {
    pub id: i64,
    pub filename: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Vec<String>,
    pub current_location: Option<String>,
    pub education: Option<String>,
    pub companies: Vec<String>,
    pub raw_text: Option<String>,
    pub upload_date: NaiveDateTime,
}

impl From<ResumeRow> for ResumeRecord {
    fn from(row: ResumeRow) -> Self {
        Self {
            id: row.id,
            filename: row.filename,
            name: row.name,
            email: row.email,
            phone: row.phone,
            skills: decode_list(row.skills.as_deref()),
            current_location: row.current_location,
            education: row.education,
            companies: decode_list(row.companies.as_deref()),
            raw_text: row.raw_text,
            upload_date: row.upload_date,
        }
    }
}

/// Decodes a stored JSON string list. Anything unreadable becomes empty.
pub fn decode_list(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default()
}

/// A resume ready for insertion; `id` and `upload_date` are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewResume {
    pub filename: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Vec<String>,
    pub current_location: Option<String>,
    pub education: String,
    pub companies: Vec<String>,
    pub raw_text: String,
}

impl NewResume {
    /// Maps extracted fields onto the stored shape, or builds the failure
    /// placeholder when there are none.
    pub fn from_extraction(filename: String, fields: Option<ExtractedFields>, text: &str) -> Self {
        let raw_text = truncate_chars(text, RAW_TEXT_LIMIT);
        match fields {
            Some(fields) => Self {
                filename,
                name: fields.name,
                email: fields.email,
                phone: fields.phone,
                skills: fields.skills,
                current_location: fields.location,
                education: fields.education.join(EDUCATION_SEPARATOR),
                companies: fields.companies,
                raw_text,
            },
            None => Self {
                filename,
                name: Some(PARSE_FAILURE_NAME.to_string()),
                email: None,
                phone: None,
                skills: Vec::new(),
                current_location: None,
                education: String::new(),
                companies: Vec::new(),
                raw_text,
            },
        }
    }

    pub fn is_parse_failure(&self) -> bool {
        self.name.as_deref() == Some(PARSE_FAILURE_NAME)
    }
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
