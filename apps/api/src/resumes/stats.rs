use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::SqlitePool;
use tracing::debug;

use crate::resumes::store::{all_skill_blobs, count_resumes};

const TOP_SKILLS_LIMIT: usize = 10;

/// Body of `GET /api/stats`.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_resumes: i64,
    pub top_skills: Map<String, Value>,
}

pub async fn compute_stats(pool: &SqlitePool) -> Result<StatsResponse, sqlx::Error> {
    let total_resumes = count_resumes(pool).await?;
    let blobs = all_skill_blobs(pool).await?;

    let top_skills = top_skills(&blobs, TOP_SKILLS_LIMIT)
        .into_iter()
        .map(|(skill, count)| (skill, Value::from(count)))
        .collect();

    Ok(StatsResponse {
        total_resumes,
        top_skills,
    })
}

/// Counts skills across JSON-encoded skill lists and returns the `limit` most
/// frequent. Equal counts keep first-seen order. Undecodable blobs are skipped.
pub fn top_skills(blobs: &[String], limit: usize) -> Vec<(String, u64)> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();

    for blob in blobs {
        let skills: Vec<String> = match serde_json::from_str(blob) {
            Ok(skills) => skills,
            Err(e) => {
                debug!("Skipping unreadable skills column: {e}");
                continue;
            }
        };
        for skill in skills {
            let count = counts.entry(skill.clone()).or_insert(0);
            if *count == 0 {
                first_seen.push(skill);
            }
            *count += 1;
        }
    }

    let mut ranked: Vec<(String, u64)> = first_seen
        .into_iter()
        .map(|skill| {
            let count = counts[&skill];
            (skill, count)
        })
        .collect();
    // stable sort keeps first-seen order among ties
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}
