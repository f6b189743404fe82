use crate::client::MomoClientConfig;
use crate::error::ClientError;
use crate::options::RequestOptions;
use crate::raw::{Query, RawClient, RawRequest};
use momo_types::{
    CreateMemoryRequest, ForgetMemoryByIdRequest, ForgetMemoryRequest, ForgetMemoryResponse,
    ListMemoriesQuery, MemoryList, MemoryResponse, UpdateMemoryRequest, UpdateMemoryResponse,
};

pub struct MemoriesGroup<'a> {
    raw: &'a RawClient,
    config: &'a MomoClientConfig,
}

impl<'a> MemoriesGroup<'a> {
    pub(crate) fn new(raw: &'a RawClient, config: &'a MomoClientConfig) -> Self {
        Self { raw, config }
    }

    pub async fn create(
        &self,
        mut body: CreateMemoryRequest,
        opts: &RequestOptions,
    ) -> Result<MemoryResponse, ClientError> {
        body.container_tag = self.config.container_tag(body.container_tag.take());
        self.raw
            .json(RawRequest::post("/api/v1/memories").json(&body)?, opts)
            .await
    }

    pub async fn get(
        &self,
        memory_id: &str,
        opts: &RequestOptions,
    ) -> Result<MemoryResponse, ClientError> {
        self.raw
            .json(RawRequest::get("/api/v1/memories").segment(memory_id), opts)
            .await
    }

    /// Creates a new version of the memory.
    pub async fn update(
        &self,
        memory_id: &str,
        body: &UpdateMemoryRequest,
        opts: &RequestOptions,
    ) -> Result<UpdateMemoryResponse, ClientError> {
        let req = RawRequest::patch("/api/v1/memories")
            .segment(memory_id)
            .json(body)?;
        self.raw.json(req, opts).await
    }

    pub async fn list(
        &self,
        query: ListMemoriesQuery,
        opts: &RequestOptions,
    ) -> Result<MemoryList, ClientError> {
        let container_tag = self.config.container_tag(query.container_tag);
        let req = RawRequest::get("/api/v1/memories").query(
            Query::new()
                .opt("containerTag", container_tag)
                .opt("limit", query.limit)
                .opt("cursor", query.cursor),
        );
        self.raw.json(req, opts).await
    }

    /// Forget the memory matching `content` within a container.
    pub async fn forget(
        &self,
        mut body: ForgetMemoryRequest,
        opts: &RequestOptions,
    ) -> Result<ForgetMemoryResponse, ClientError> {
        body.container_tag = self.config.container_tag(body.container_tag.take());
        self.raw
            .json(RawRequest::post("/api/v1/memories:forget").json(&body)?, opts)
            .await
    }

    /// DELETE with a JSON body carrying the optional reason.
    pub async fn forget_by_id(
        &self,
        memory_id: &str,
        reason: Option<String>,
        opts: &RequestOptions,
    ) -> Result<ForgetMemoryResponse, ClientError> {
        let req = RawRequest::delete("/api/v1/memories")
            .segment(memory_id)
            .json(&ForgetMemoryByIdRequest { reason })?;
        self.raw.json(req, opts).await
    }
}
