pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};

use crate::resumes::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Pages
        .route("/", get(handlers::handle_index))
        .route(
            "/upload",
            get(handlers::handle_upload_form).post(handlers::handle_upload),
        )
        .route("/search", get(handlers::handle_search))
        .route("/resume/:id", get(handlers::handle_view_resume))
        // JSON API
        .route("/api/stats", get(handlers::handle_stats))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::extraction::fields::ExtractedFields;
    use crate::extraction::text::fixtures::make_docx;
    use crate::resumes::store::tests::new_resume;
    use crate::resumes::store::{count_resumes, insert_resume};
    use crate::state::testing::{test_state, uploaded_files, FailingExtractor, FixedExtractor};

    const BOUNDARY: &str = "X-RESUME-BOUNDARY";

    fn multipart_upload(file_name: &str, data: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    fn sets_flash(response: &Response) -> bool {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .any(|v| v.to_str().unwrap().starts_with("flash="))
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (state, _dir) = test_state(Arc::new(FailingExtractor)).await;
        let response = build_router(state).oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("\"ok\""));
    }

    #[tokio::test]
    async fn test_upload_disallowed_type_redirects_back() {
        let (state, _dir) = test_state(Arc::new(FailingExtractor)).await;
        let response = build_router(state.clone())
            .oneshot(multipart_upload("notes.txt", b"hello"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/upload");
        assert!(sets_flash(&response));
        assert!(uploaded_files(&state).is_empty());
    }

    #[tokio::test]
    async fn test_upload_without_multipart_body_redirects_back() {
        let (state, _dir) = test_state(Arc::new(FailingExtractor)).await;
        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("file=cv.pdf"))
            .unwrap();
        let response = build_router(state.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/upload");
        assert!(sets_flash(&response));
        assert!(uploaded_files(&state).is_empty());
        assert_eq!(count_resumes(&state.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_upload_success_redirects_to_search() {
        let fields = ExtractedFields {
            name: Some("Jane Doe".into()),
            skills: vec!["Rust".into()],
            ..Default::default()
        };
        let (state, _dir) = test_state(Arc::new(FixedExtractor(fields))).await;
        let response = build_router(state.clone())
            .oneshot(multipart_upload("cv.docx", &make_docx(&["Jane Doe"])))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/search");
        assert!(sets_flash(&response));
        assert_eq!(count_resumes(&state.db).await.unwrap(), 1);
        assert_eq!(uploaded_files(&state).len(), 1);
    }

    #[tokio::test]
    async fn test_upload_extraction_failure_redirects_back() {
        let (state, _dir) = test_state(Arc::new(FailingExtractor)).await;
        let response = build_router(state.clone())
            .oneshot(multipart_upload("cv.docx", &make_docx(&["Jane Doe"])))
            .await
            .unwrap();

        assert_eq!(location(&response), "/upload");
        assert_eq!(count_resumes(&state.db).await.unwrap(), 0);
        assert!(uploaded_files(&state).is_empty());
    }

    #[tokio::test]
    async fn test_view_missing_resume_redirects_to_search() {
        let (state, _dir) = test_state(Arc::new(FailingExtractor)).await;
        let response = build_router(state).oneshot(get("/resume/999")).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/search");
        assert!(sets_flash(&response));
    }

    #[tokio::test]
    async fn test_view_and_search_render_records() {
        let (state, _dir) = test_state(Arc::new(FailingExtractor)).await;
        let id = insert_resume(&state.db, &new_resume("Grace Hopper", &["COBOL"], &["Navy"]))
            .await
            .unwrap();
        let app = build_router(state);

        let response = app.clone().oneshot(get(&format!("/resume/{id}"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Grace Hopper"));
        assert!(html.contains("<li>COBOL</li>"));

        let response = app.clone().oneshot(get("/search?skill=COBOL")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains(&format!("/resume/{id}")));

        let response = app.oneshot(get("/search")).await.unwrap();
        assert!(!body_string(response).await.contains("Grace Hopper"));
    }

    #[tokio::test]
    async fn test_stats_json_shape() {
        let (state, _dir) = test_state(Arc::new(FailingExtractor)).await;
        insert_resume(&state.db, &new_resume("A", &["Go", "Rust"], &[]))
            .await
            .unwrap();
        let response = build_router(state).oneshot(get("/api/stats")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["total_resumes"], 1);
        assert_eq!(body["top_skills"]["Go"], 1);
        assert_eq!(body["top_skills"]["Rust"], 1);
    }
}
