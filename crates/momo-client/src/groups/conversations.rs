use crate::client::MomoClientConfig;
use crate::error::ClientError;
use crate::options::RequestOptions;
use crate::raw::{RawClient, RawRequest};
use momo_types::{ConversationIngestResponse, IngestConversationRequest};

pub struct ConversationsGroup<'a> {
    raw: &'a RawClient,
    config: &'a MomoClientConfig,
}

impl<'a> ConversationsGroup<'a> {
    pub(crate) fn new(raw: &'a RawClient, config: &'a MomoClientConfig) -> Self {
        Self { raw, config }
    }

    /// Extract memories from a chat transcript.
    pub async fn ingest(
        &self,
        mut body: IngestConversationRequest,
        opts: &RequestOptions,
    ) -> Result<ConversationIngestResponse, ClientError> {
        body.container_tag = self.config.container_tag(body.container_tag.take());
        self.raw
            .json(RawRequest::post("/api/v1/conversations:ingest").json(&body)?, opts)
            .await
    }
}
