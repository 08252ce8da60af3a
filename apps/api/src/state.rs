use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::extraction::fields::FieldExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
    /// Pluggable field extractor. Default: `LlmFieldExtractor`.
    pub extractor: Arc<dyn FieldExtractor>,
}
