use crate::client::MomoClientConfig;
use crate::error::ClientError;
use crate::middleware::{api_error, bearer, normalize_response, resolve_api_key};
use crate::options::RequestOptions;
use crate::raw::{
    apply_options, read_response, with_cancel, Query, RawClient, RawRequest, RawResponse,
    RequestInfo,
};
use momo_types::{
    BatchCreateDocumentResponse, BatchCreateDocumentsRequest, CreateDocumentRequest,
    CreateDocumentResponse, DocumentList, DocumentResponse, Envelope, IngestionStatusResponse,
    ListDocumentsQuery, UpdateDocumentRequest, UploadDocumentParams,
};
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, instrument};

const UPLOAD_PATH: &str = "/api/v1/documents:upload";

/// File content for a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub bytes: Vec<u8>,
    /// Defaults to `blob` when unset.
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
}

impl UploadFile {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            file_name: None,
            mime_type: None,
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }
}

pub struct DocumentsGroup<'a> {
    raw: &'a RawClient,
    config: &'a MomoClientConfig,
}

impl<'a> DocumentsGroup<'a> {
    pub(crate) fn new(raw: &'a RawClient, config: &'a MomoClientConfig) -> Self {
        Self { raw, config }
    }

    /// Ingest a text document.
    pub async fn create(
        &self,
        mut body: CreateDocumentRequest,
        opts: &RequestOptions,
    ) -> Result<CreateDocumentResponse, ClientError> {
        body.container_tag = self.config.container_tag(body.container_tag.take());
        self.raw
            .json(RawRequest::post("/api/v1/documents").json(&body)?, opts)
            .await
    }

    pub async fn batch_create(
        &self,
        mut body: BatchCreateDocumentsRequest,
        opts: &RequestOptions,
    ) -> Result<BatchCreateDocumentResponse, ClientError> {
        body.container_tag = self.config.container_tag(body.container_tag.take());
        self.raw
            .json(RawRequest::post("/api/v1/documents:batch").json(&body)?, opts)
            .await
    }

    /// Multipart upload. Bypasses the middleware chain: auth and envelope
    /// handling are applied here with the same rules.
    #[instrument(skip(self, file, params, opts), fields(size = file.bytes.len()))]
    pub async fn upload(
        &self,
        file: UploadFile,
        params: UploadDocumentParams,
        opts: &RequestOptions,
    ) -> Result<CreateDocumentResponse, ClientError> {
        let container_tag = self
            .config
            .container_tag(params.container_tag)
            .filter(|t| !t.is_empty());

        let mut part = Part::bytes(file.bytes)
            .file_name(file.file_name.unwrap_or_else(|| "blob".to_string()));
        if let Some(ref mime) = file.mime_type {
            part = part.mime_str(mime)?;
        }
        let mut form = Form::new().part("file", part);
        if let Some(tag) = container_tag {
            form = form.text("containerTag", tag);
        }
        if let Some(metadata) = params.metadata.filter(|m| !m.is_empty()) {
            form = form.text("metadata", metadata);
        }
        if let Some(extract) = params.extract_memories {
            form = form.text("extractMemories", extract.to_string());
        }
        if let Some(content_type) = params.content_type {
            form = form.text("contentType", content_type);
        }

        let url = self.raw.url_for(&RawRequest::post(UPLOAD_PATH))?;
        let mut req = self.raw.http().post(url).multipart(form).build()?;
        apply_options(&mut req, opts)?;
        if let Some(key) = resolve_api_key(self.config).await {
            req.headers_mut().insert(AUTHORIZATION, bearer(&key)?);
        }

        let info = RequestInfo {
            method: req.method().clone(),
            path: req.url().path().to_string(),
        };
        debug!(path = %info.path, "uploading document");
        let http = self.raw.http().clone();
        let response = with_cancel(opts, async move {
            let res = http.execute(req).await?;
            read_response(res).await
        })
        .await?;
        decode_upload(&info, response)
    }

    /// Read a file from disk and upload it under its base name.
    pub async fn upload_from_path(
        &self,
        path: impl AsRef<Path>,
        params: UploadDocumentParams,
        opts: &RequestOptions,
    ) -> Result<CreateDocumentResponse, ClientError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let mut file = UploadFile::new(bytes);
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            file = file.with_file_name(name);
        }
        self.upload(file, params, opts).await
    }

    pub async fn get(
        &self,
        document_id: &str,
        opts: &RequestOptions,
    ) -> Result<DocumentResponse, ClientError> {
        self.raw
            .json(RawRequest::get("/api/v1/documents").segment(document_id), opts)
            .await
    }

    pub async fn update(
        &self,
        document_id: &str,
        body: &UpdateDocumentRequest,
        opts: &RequestOptions,
    ) -> Result<DocumentResponse, ClientError> {
        let req = RawRequest::patch("/api/v1/documents")
            .segment(document_id)
            .json(body)?;
        self.raw.json(req, opts).await
    }

    pub async fn delete(&self, document_id: &str, opts: &RequestOptions) -> Result<(), ClientError> {
        self.raw
            .send(RawRequest::delete("/api/v1/documents").segment(document_id), opts)
            .await?;
        Ok(())
    }

    /// List documents. The default container tag is not applied here.
    pub async fn list(
        &self,
        query: ListDocumentsQuery,
        opts: &RequestOptions,
    ) -> Result<DocumentList, ClientError> {
        let req = RawRequest::get("/api/v1/documents").query(
            Query::new()
                .list("containerTags", query.container_tags.as_deref())
                .opt("limit", query.limit)
                .opt("cursor", query.cursor),
        );
        self.raw.json(req, opts).await
    }

    pub async fn ingestion_status(
        &self,
        ingestion_id: &str,
        opts: &RequestOptions,
    ) -> Result<IngestionStatusResponse, ClientError> {
        self.raw
            .json(RawRequest::get("/api/v1/ingestions").segment(ingestion_id), opts)
            .await
    }
}

/// Upload responses fail on non-2xx or on any `error` envelope (even with a 2xx
/// status); otherwise `data` is returned when present, else the bare body.
fn decode_upload<T: DeserializeOwned>(
    info: &RequestInfo,
    response: RawResponse,
) -> Result<T, ClientError> {
    if let Some(Envelope::Error(body)) = Envelope::parse(&response.body) {
        return Err(api_error(info, &response, Some(body)).into());
    }
    let response = normalize_response(info, response)?;
    Ok(serde_json::from_slice(&response.body)?)
}
