//! Request and response DTOs for the Momo v1 REST API.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Free-form metadata object attached to documents and memories.
pub type Metadata = HashMap<String, serde_json::Value>;

/// Explicit `null` decodes like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Which corpus a search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    Documents,
    Memories,
    Hybrid,
    /// Any value this client does not know yet.
    #[serde(other)]
    Unknown,
}

/// Kind of memory (v1 API).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryType {
    Fact,
    Preference,
    Episode,
    #[serde(other)]
    Unknown,
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// Create-document request (POST /api/v1/documents).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract_memories: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Metadata,
}

impl CreateDocumentRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }
}

/// One entry of a batch create.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDocumentItem {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Batch create request (POST /api/v1/documents:batch).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreateDocumentsRequest {
    pub documents: Vec<BatchDocumentItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_tag: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Metadata,
}

/// Partial document update (PATCH /api/v1/documents/{id}).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Metadata,
}

/// Query for GET /api/v1/documents.
#[derive(Debug, Clone, Default)]
pub struct ListDocumentsQuery {
    pub container_tags: Option<Vec<String>>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

/// Optional multipart fields sent alongside an uploaded file.
#[derive(Debug, Clone, Default)]
pub struct UploadDocumentParams {
    pub container_tag: Option<String>,
    /// JSON-encoded metadata, sent verbatim as a form field.
    pub metadata: Option<String>,
    pub extract_memories: Option<bool>,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentResponse {
    #[serde(alias = "id")]
    pub document_id: String,
    #[serde(default)]
    pub ingestion_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreateDocumentResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub documents: Vec<CreateDocumentResponse>,
    #[serde(default)]
    pub ingestion_id: Option<String>,
}

/// Full document as returned by GET/PATCH.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    #[serde(alias = "id")]
    pub document_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub container_tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Metadata,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Listing entry (no content).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummaryResponse {
    #[serde(alias = "id")]
    pub document_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub container_tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Pagination metadata on list responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub documents: Vec<DocumentSummaryResponse>,
    #[serde(default)]
    pub meta: Option<ResponseMeta>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionStatusResponse {
    #[serde(alias = "id")]
    pub ingestion_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Memories
// ---------------------------------------------------------------------------

/// Create-memory request (POST /api/v1/memories).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemoryRequest {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_type: Option<MemoryType>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Metadata,
}

impl CreateMemoryRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }
}

/// PATCH /api/v1/memories/{id}.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemoryRequest {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_static: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Metadata,
}

/// Query for GET /api/v1/memories.
#[derive(Debug, Clone, Default)]
pub struct ListMemoriesQuery {
    pub container_tag: Option<String>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

/// Forget by content match (POST /api/v1/memories:forget).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgetMemoryRequest {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Body of DELETE /api/v1/memories/{id}.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForgetMemoryByIdRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryResponse {
    #[serde(alias = "memoryId")]
    pub id: String,
    #[serde(default, alias = "memory", deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default)]
    pub container_tag: Option<String>,
    #[serde(default)]
    pub memory_type: Option<MemoryType>,
    #[serde(default)]
    pub is_static: Option<bool>,
    #[serde(default)]
    pub is_forgotten: Option<bool>,
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Metadata,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub memories: Vec<MemoryResponse>,
    #[serde(default)]
    pub meta: Option<ResponseMeta>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemoryResponse {
    pub id: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForgetMemoryResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub forgotten: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgettingRunResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub forgotten_count: u64,
    #[serde(default)]
    pub evaluated_count: Option<u64>,
}

// ---------------------------------------------------------------------------
// Search, graph, conversations, profile, health
// ---------------------------------------------------------------------------

/// Which extra payloads to attach to search hits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchInclude {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunks: Option<bool>,
}

/// POST /api/v1/search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub q: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<SearchScope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rerank: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<SearchInclude>,
}

impl SearchRequest {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub id: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(default)]
    pub container_tag: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<SearchResultItem>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub timing_ms: Option<u64>,
}

/// Query for GET /api/v1/memories/{id}/graph.
#[derive(Debug, Clone, Default)]
pub struct MemoryGraphQuery {
    pub depth: Option<u32>,
    pub max_nodes: Option<u32>,
    /// Comma-separated relation type filter.
    pub relation_types: Option<String>,
}

/// Query for GET /api/v1/containers/{tag}/graph.
#[derive(Debug, Clone, Default)]
pub struct ContainerGraphQuery {
    pub max_nodes: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub relation: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<GraphNode>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: Vec<GraphEdge>,
}

/// Single chat message (user/assistant/system).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: String,
    pub content: String,
}

/// POST /api/v1/conversations:ingest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestConversationRequest {
    pub messages: Vec<ConversationMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_type: Option<MemoryType>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationIngestResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub memories_extracted: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub memory_ids: Vec<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// POST /api/v1/profile:compute.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeProfileRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_dynamic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_narrative: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(default)]
    pub container_tag: Option<String>,
    #[serde(default, rename = "static", deserialize_with = "null_as_default")]
    pub static_facts: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dynamic: Vec<String>,
    #[serde(default)]
    pub narrative: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentHealth {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
}

/// GET /api/v1/health. Returned without an envelope by some servers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub uptime: Option<u64>,
    #[serde(default)]
    pub database: Option<ComponentHealth>,
}
