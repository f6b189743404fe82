use crate::client::MomoClientConfig;
use crate::error::ClientError;
use crate::options::RequestOptions;
use crate::raw::{RawClient, RawRequest};
use momo_types::{ComputeProfileRequest, ProfileResponse};

pub struct ProfileGroup<'a> {
    raw: &'a RawClient,
    config: &'a MomoClientConfig,
}

impl<'a> ProfileGroup<'a> {
    pub(crate) fn new(raw: &'a RawClient, config: &'a MomoClientConfig) -> Self {
        Self { raw, config }
    }

    pub async fn compute(
        &self,
        mut body: ComputeProfileRequest,
        opts: &RequestOptions,
    ) -> Result<ProfileResponse, ClientError> {
        body.container_tag = self.config.container_tag(body.container_tag.take());
        self.raw
            .json(RawRequest::post("/api/v1/profile:compute").json(&body)?, opts)
            .await
    }
}
