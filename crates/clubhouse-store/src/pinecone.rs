//! Pinecone records API client
//!
//! Uses an index with integrated inference: records carry raw text and
//! Pinecone computes embeddings on upsert and on search.

use crate::{PineconeSettings, StoreError};
use async_trait::async_trait;
use clubhouse_domain::{Chunk, ChunkMetadata, Filter, FilterOp, FilterValue, SearchMatch, VectorStore};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Metadata fields requested back from a search
const METADATA_FIELDS: [&str; 8] = [
    "club_name",
    "dues",
    "meeting_frequency",
    "last_updated",
    "membership_requirements",
    "source_file",
    "chunk_index",
    "total_chunks",
];

/// Longest response body kept in an error message
const MAX_ERROR_BODY: usize = 500;

/// Vector store backed by a Pinecone index
pub struct PineconeStore {
    host: String,
    api_key: String,
    api_version: String,
    text_field: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct SearchResponse {
    result: SearchResult,
}

#[derive(Deserialize)]
struct SearchResult {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Deserialize)]
struct Hit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_score")]
    score: f64,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl PineconeStore {
    /// Connect using validated settings
    pub fn new(settings: &PineconeSettings) -> Result<Self, StoreError> {
        let host = settings
            .host
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| StoreError::Config("Pinecone host is required (PINECONE_HOST)".to_string()))?;
        let api_key = settings
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| StoreError::Config("Pinecone API key is required (PINECONE_API_KEY)".to_string()))?;

        let host = host.trim().trim_end_matches('/');
        let host = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        };

        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| StoreError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            host,
            api_key: api_key.to_string(),
            api_version: settings.api_version.clone(),
            text_field: settings.text_field.clone(),
            client,
        })
    }

    fn url(&self, namespace: &str, action: &str) -> String {
        format!("{}/records/namespaces/{}/{}", self.host, namespace, action)
    }

    /// One NDJSON line per chunk: id, text, and flat metadata
    pub(crate) fn upsert_body(&self, chunks: &[Chunk]) -> Result<String, StoreError> {
        let mut body = String::new();
        for chunk in chunks {
            let mut record = match serde_json::to_value(&chunk.metadata)? {
                Value::Object(map) => map,
                _ => return Err(StoreError::InvalidData("metadata is not an object".to_string())),
            };
            record.insert("_id".to_string(), Value::String(chunk.id.clone()));
            record.insert(self.text_field.clone(), Value::String(chunk.text.clone()));
            body.push_str(&serde_json::to_string(&record)?);
            body.push('\n');
        }
        Ok(body)
    }

    pub(crate) fn search_body(&self, query: &str, top_k: usize, filter: &Filter) -> Value {
        let mut search = json!({
            "inputs": { "text": query },
            "top_k": top_k,
        });
        if let Some(filter) = translate_filter(filter) {
            search["filter"] = filter;
        }

        let mut fields: Vec<&str> = METADATA_FIELDS.to_vec();
        fields.push(&self.text_field);
        json!({ "query": search, "fields": fields })
    }

    pub(crate) fn parse_hits(&self, body: &str) -> Result<Vec<SearchMatch>, StoreError> {
        let response: SearchResponse = serde_json::from_str(body)
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse search response: {}", e)))?;

        response
            .result
            .hits
            .into_iter()
            .map(|mut hit| {
                let text = match hit.fields.remove(&self.text_field) {
                    Some(Value::String(text)) => text,
                    _ => String::new(),
                };
                let metadata: ChunkMetadata = serde_json::from_value(Value::Object(hit.fields))
                    .map_err(|e| StoreError::InvalidResponse(format!("Bad metadata on {}: {}", hit.id, e)))?;
                Ok(SearchMatch {
                    id: hit.id,
                    score: hit.score.clamp(0.0, 1.0),
                    text,
                    metadata,
                })
            })
            .collect()
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, StoreError> {
        let response = request
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", &self.api_version)
            .send()
            .await
            .map_err(request_error)?;
        let status = response.status();
        let body = response.text().await.map_err(request_error)?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(status_error(status, &body))
        }
    }
}

/// Translate a filter into Pinecone's metadata filter language
///
/// Returns `None` for an empty filter.
pub(crate) fn translate_filter(filter: &Filter) -> Option<Value> {
    let mut clauses: Vec<Value> = filter
        .predicates()
        .iter()
        .map(|p| {
            let op = match p.op {
                FilterOp::Lte => "$lte",
                FilterOp::Eq => "$eq",
            };
            let value = match &p.value {
                FilterValue::Number(n) => json!(n),
                FilterValue::Text(s) => json!(s),
            };
            json!({ p.field.as_str(): { op: value } })
        })
        .collect();

    match clauses.len() {
        0 => None,
        1 => clauses.pop(),
        _ => Some(json!({ "$and": clauses })),
    }
}

fn request_error(e: reqwest::Error) -> StoreError {
    if e.is_timeout() {
        StoreError::Timeout
    } else {
        StoreError::Communication(format!("Request failed: {}", e))
    }
}

fn status_error(status: StatusCode, body: &str) -> StoreError {
    StoreError::Http {
        status: status.as_u16(),
        body: body.chars().take(MAX_ERROR_BODY).collect(),
    }
}

#[async_trait]
impl VectorStore for PineconeStore {
    type Error = StoreError;

    async fn upsert(&self, namespace: &str, chunks: &[Chunk]) -> Result<usize, Self::Error> {
        if chunks.is_empty() {
            return Ok(0);
        }
        let body = self.upsert_body(chunks)?;
        let request = self
            .client
            .post(self.url(namespace, "upsert"))
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(body);
        self.send(request).await?;

        tracing::debug!(namespace, count = chunks.len(), "Upserted records to Pinecone");
        Ok(chunks.len())
    }

    async fn search(
        &self,
        namespace: &str,
        query: &str,
        top_k: usize,
        filter: &Filter,
    ) -> Result<Vec<SearchMatch>, Self::Error> {
        let request = self
            .client
            .post(self.url(namespace, "search"))
            .json(&self.search_body(query, top_k, filter));
        let body = self.send(request).await?;
        let matches = self.parse_hits(&body)?;

        tracing::debug!(namespace, hits = matches.len(), "Pinecone search complete");
        Ok(matches)
    }

    async fn delete_namespace(&self, namespace: &str) -> Result<(), Self::Error> {
        let request = self
            .client
            .post(format!("{}/vectors/delete", self.host))
            .json(&json!({ "deleteAll": true, "namespace": namespace }));
        match self.send(request).await {
            // Deleting a namespace that was never written is not an error
            Err(StoreError::Http { status: 404, .. }) => Ok(()),
            other => other.map(|_| ()),
        }
    }
}
