use askama::Template;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::CookieJar;

use crate::errors::AppError;
use crate::flash;
use crate::pages::{IndexPage, ResumePage, SearchPage, UploadPage};
use crate::resumes::search::{search_resumes, SearchFilters};
use crate::resumes::stats::{compute_stats, StatsResponse};
use crate::resumes::store::get_resume;
use crate::resumes::upload::{process_upload, UploadOutcome, UploadedFile};
use crate::state::AppState;

const PARSING_NOTICE: &str = "File uploaded, now parsing with AI. This may take a moment...";
const PARSE_FAILED: &str =
    "Error parsing resume with AI. Please check the file format or server logs.";

/// GET /
pub async fn handle_index(jar: CookieJar) -> Result<(CookieJar, Html<String>), AppError> {
    let (jar, messages) = flash::take(jar);
    Ok((jar, Html(IndexPage { messages }.render()?)))
}

/// GET /upload
pub async fn handle_upload_form(jar: CookieJar) -> Result<(CookieJar, Html<String>), AppError> {
    let (jar, messages) = flash::take(jar);
    Ok((jar, Html(UploadPage { messages }.render()?)))
}

/// POST /upload
pub async fn handle_upload(
    State(state): State<AppState>,
    jar: CookieJar,
    multipart: Option<Multipart>,
) -> Result<(CookieJar, Redirect), AppError> {
    // A body that is not multipart has no file part at all.
    let upload = match multipart {
        Some(mut multipart) => read_file_part(&mut multipart).await?,
        None => None,
    };

    let response = match process_upload(&state, upload).await? {
        UploadOutcome::Rejected(rejection) => (
            flash::push(jar, [rejection.message()]),
            Redirect::to("/upload"),
        ),
        UploadOutcome::ExtractionFailed => (
            flash::push(jar, [PARSING_NOTICE, PARSE_FAILED]),
            Redirect::to("/upload"),
        ),
        UploadOutcome::Persisted { id, file_name } => {
            tracing::info!("Resume {id} parsed from {file_name}");
            let done = format!("Resume \"{file_name}\" parsed successfully with AI!");
            (
                flash::push(jar, [PARSING_NOTICE.to_string(), done]),
                Redirect::to("/search"),
            )
        }
    };
    Ok(response)
}

/// Pulls the `file` part out of the form. Other parts are ignored.
async fn read_file_part(multipart: &mut Multipart) -> Result<Option<UploadedFile>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
        return Ok(Some(UploadedFile { file_name, data }));
    }
    Ok(None)
}

/// GET /search?name=&skill=&company=&location=
pub async fn handle_search(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(filters): Query<SearchFilters>,
) -> Result<(CookieJar, Html<String>), AppError> {
    let filters = filters.normalized();
    let results = search_resumes(&state.db, &filters).await?;

    let (jar, messages) = flash::take(jar);
    let page = SearchPage {
        messages,
        searched: !filters.is_empty(),
        filters,
        results: results.into_iter().map(Into::into).collect(),
    };
    Ok((jar, Html(page.render()?)))
}

/// GET /resume/:id
pub async fn handle_view_resume(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let Some(record) = get_resume(&state.db, id).await? else {
        let jar = flash::push(jar, ["Resume not found"]);
        return Ok((jar, Redirect::to("/search")).into_response());
    };

    let (jar, messages) = flash::take(jar);
    let page = ResumePage {
        messages,
        resume: record.into(),
    };
    Ok((jar, Html(page.render()?)).into_response())
}

/// GET /api/stats
pub async fn handle_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    Ok(Json(compute_stats(&state.db).await?))
}
