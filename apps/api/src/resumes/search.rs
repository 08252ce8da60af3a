//! Keyword search over stored resumes.
//!
//! Each non-empty filter becomes a conjunctive `LIKE` substring match. The
//! skill filter is wrapped in double quotes so it lines up with the JSON
//! encoding of the `skills` column (`["Go","Rust"]`), which approximates an
//! exact element match: `Python` does not hit a stored `"Pythonic"`.

use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::models::resume::{ResumeRecord, ResumeRow};

/// Query-string filters for `GET /search`. Missing and blank values are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub skill: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
}

impl SearchFilters {
    /// Trims every filter in place.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            skill: self.skill.trim().to_string(),
            company: self.company.trim().to_string(),
            location: self.location.trim().to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.skill.is_empty()
            && self.company.is_empty()
            && self.location.is_empty()
    }
}

/// Runs the search. No filters means no results, not "everything".
/// Matches are ordered most recent upload first.
pub async fn search_resumes(
    pool: &SqlitePool,
    filters: &SearchFilters,
) -> Result<Vec<ResumeRecord>, sqlx::Error> {
    let filters = filters.clone().normalized();
    if filters.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = build_query(&filters);
    let rows = query.build_query_as::<ResumeRow>().fetch_all(pool).await?;
    Ok(rows.into_iter().map(ResumeRecord::from).collect())
}

fn build_query(filters: &SearchFilters) -> QueryBuilder<'static, Sqlite> {
    let mut qb = QueryBuilder::new("SELECT * FROM resumes WHERE 1=1");

    if !filters.name.is_empty() {
        qb.push(" AND name LIKE ")
            .push_bind(format!("%{}%", filters.name));
    }
    if !filters.skill.is_empty() {
        qb.push(" AND skills LIKE ")
            .push_bind(format!("%\"{}\"%", filters.skill));
    }
    if !filters.company.is_empty() {
        qb.push(" AND companies LIKE ")
            .push_bind(format!("%{}%", filters.company));
    }
    if !filters.location.is_empty() {
        qb.push(" AND current_location LIKE ")
            .push_bind(format!("%{}%", filters.location));
    }

    qb.push(" ORDER BY upload_date DESC, id DESC");
    qb
}
