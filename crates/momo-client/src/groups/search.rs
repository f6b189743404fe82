use crate::client::MomoClientConfig;
use crate::error::ClientError;
use crate::options::RequestOptions;
use crate::raw::{RawClient, RawRequest};
use momo_types::{SearchRequest, SearchResponse};

pub struct SearchGroup<'a> {
    raw: &'a RawClient,
    config: &'a MomoClientConfig,
}

impl<'a> SearchGroup<'a> {
    pub(crate) fn new(raw: &'a RawClient, config: &'a MomoClientConfig) -> Self {
        Self { raw, config }
    }

    /// Search documents and/or memories. Without explicit `container_tags`
    /// the default container tag (if any) is used as a one-element list.
    pub async fn search(
        &self,
        mut body: SearchRequest,
        opts: &RequestOptions,
    ) -> Result<SearchResponse, ClientError> {
        if body.container_tags.is_none() {
            body.container_tags = self.config.default_container_tag.clone().map(|t| vec![t]);
        }
        self.raw
            .json(RawRequest::post("/api/v1/search").json(&body)?, opts)
            .await
    }
}
