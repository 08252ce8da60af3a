//! Field extraction — turns raw resume text into structured fields via the LLM.
//!
//! The capability is a trait so the LLM can be swapped out (tests use stubs).
//! Every failure is absorbed here: callers only ever see `Some(fields)` or `None`.

use async_trait::async_trait;
use serde::de::Unexpected;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::extraction::prompts::{RESUME_PARSE_PROMPT, RESUME_PARSE_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};

const JSON_FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// Structured fields as returned by the model. Missing scalars are `None`,
/// missing or null lists are empty. Numbers and booleans are kept as text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExtractedFields {
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub education: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub companies: Vec<String>,
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Objects and arrays in a scalar slot read as absent.
fn lenient_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

/// A list slot must hold an array or null; elements that are not scalars are dropped.
fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items.into_iter().filter_map(scalar_text).collect()),
        other => Err(serde::de::Error::invalid_type(
            unexpected(&other),
            &"a list of strings",
        )),
    }
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::String(s) => Unexpected::Str(s),
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(_) => Unexpected::Other("number"),
        _ => Unexpected::Map,
    }
}

#[derive(Debug, Error)]
pub enum FieldExtractionError {
    #[error("no LLM credential configured")]
    NotConfigured,

    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("reply contained no ```json block")]
    MissingJsonBlock,

    #[error("malformed JSON block: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The extraction capability. Carried in `AppState` as `Arc<dyn FieldExtractor>`.
#[async_trait]
pub trait FieldExtractor: Send + Sync {
    /// Returns `None` on any failure; never errors.
    async fn extract_fields(&self, text: &str) -> Option<ExtractedFields>;
}

/// Production extractor backed by the Claude API.
/// Without a client every call fails closed.
pub struct LlmFieldExtractor {
    llm: Option<LlmClient>,
}

impl LlmFieldExtractor {
    pub fn new(llm: Option<LlmClient>) -> Self {
        Self { llm }
    }

    async fn try_extract(&self, text: &str) -> Result<ExtractedFields, FieldExtractionError> {
        let llm = self.llm.as_ref().ok_or(FieldExtractionError::NotConfigured)?;
        let prompt = RESUME_PARSE_PROMPT.replace("{resume_text}", text);
        let reply = llm.call_text(&prompt, RESUME_PARSE_SYSTEM).await?;
        parse_reply(&reply)
    }
}

#[async_trait]
impl FieldExtractor for LlmFieldExtractor {
    async fn extract_fields(&self, text: &str) -> Option<ExtractedFields> {
        match self.try_extract(text).await {
            Ok(fields) => {
                debug!(
                    "Extracted {} skills, {} companies",
                    fields.skills.len(),
                    fields.companies.len()
                );
                Some(fields)
            }
            Err(FieldExtractionError::NotConfigured) => {
                debug!("Field extraction skipped: no LLM credential configured");
                None
            }
            Err(e) => {
                warn!("Field extraction failed: {e}");
                None
            }
        }
    }
}

/// Parses the model reply: the fenced ```json block must exist and decode.
pub fn parse_reply(reply: &str) -> Result<ExtractedFields, FieldExtractionError> {
    let block = find_json_block(reply).ok_or(FieldExtractionError::MissingJsonBlock)?;
    Ok(serde_json::from_str(block)?)
}

/// Returns the contents of the first ```json fence, up to the next closing fence.
/// An unterminated fence counts as absent.
fn find_json_block(text: &str) -> Option<&str> {
    let start = text.find(JSON_FENCE_OPEN)? + JSON_FENCE_OPEN.len();
    let rest = &text[start..];
    let end = rest.find(FENCE_CLOSE)?;
    Some(rest[..end].trim())
}
