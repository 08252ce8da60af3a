use sqlx::types::Json;
use sqlx::SqlitePool;
use tracing::info;

use crate::models::resume::{NewResume, ResumeRecord, ResumeRow};

/// Inserts a resume and returns its assigned id.
pub async fn insert_resume(pool: &SqlitePool, resume: &NewResume) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO resumes
            (filename, name, email, phone, skills, current_location,
             education, companies, raw_text)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&resume.filename)
    .bind(&resume.name)
    .bind(&resume.email)
    .bind(&resume.phone)
    .bind(Json(&resume.skills))
    .bind(&resume.current_location)
    .bind(&resume.education)
    .bind(Json(&resume.companies))
    .bind(&resume.raw_text)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    info!("Inserted resume {id} ({})", resume.filename);
    Ok(id)
}

pub async fn get_resume(pool: &SqlitePool, id: i64) -> Result<Option<ResumeRecord>, sqlx::Error> {
    let row: Option<ResumeRow> = sqlx::query_as("SELECT * FROM resumes WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(ResumeRecord::from))
}

pub async fn count_resumes(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM resumes")
        .fetch_one(pool)
        .await
}

/// Raw `skills` column of every row that has one.
pub async fn all_skill_blobs(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT skills FROM resumes WHERE skills IS NOT NULL AND skills != ''")
        .fetch_all(pool)
        .await
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::state::testing::{test_state, FailingExtractor};

    pub fn new_resume(name: &str, skills: &[&str], companies: &[&str]) -> NewResume {
        NewResume {
            filename: format!("20240101000000_{}.pdf", name.replace(' ', "_")),
            name: Some(name.to_string()),
            email: None,
            phone: None,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            current_location: None,
            education: String::new(),
            companies: companies.iter().map(|s| s.to_string()).collect(),
            raw_text: String::new(),
        }
    }

    #[tokio::test]
    async fn test_insert_then_get_round_trips_lists() {
        let (state, _dir) = test_state(Arc::new(FailingExtractor)).await;
        let mut resume = new_resume("Ada", &["Go", "SQL"], &["Acme"]);
        resume.education = "BSc CS, MIT; MSc AI, CMU".into();

        let id = insert_resume(&state.db, &resume).await.unwrap();
        let record = get_resume(&state.db, id).await.unwrap().unwrap();

        assert_eq!(record.id, id);
        assert_eq!(record.skills, vec!["Go", "SQL"]);
        assert_eq!(record.companies, vec!["Acme"]);
        assert_eq!(record.education.as_deref(), Some("BSc CS, MIT; MSc AI, CMU"));
        assert_eq!(record.filename, resume.filename);
    }

    #[tokio::test]
    async fn test_ids_are_monotonic() {
        let (state, _dir) = test_state(Arc::new(FailingExtractor)).await;
        let first = insert_resume(&state.db, &new_resume("A", &[], &[])).await.unwrap();
        let second = insert_resume(&state.db, &new_resume("B", &[], &[])).await.unwrap();
        assert!(second > first);
        assert_eq!(count_resumes(&state.db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_get_missing_resume_is_none() {
        let (state, _dir) = test_state(Arc::new(FailingExtractor)).await;
        assert!(get_resume(&state.db, 42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_list_column_reads_as_empty() {
        let (state, _dir) = test_state(Arc::new(FailingExtractor)).await;
        sqlx::query("INSERT INTO resumes (filename, skills, companies) VALUES ('x.pdf', 'Go, Rust', NULL)")
            .execute(&state.db)
            .await
            .unwrap();

        let record = get_resume(&state.db, 1).await.unwrap().unwrap();
        assert!(record.skills.is_empty());
        assert!(record.companies.is_empty());
    }
}
