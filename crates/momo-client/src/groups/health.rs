use crate::error::ClientError;
use crate::options::RequestOptions;
use crate::raw::{RawClient, RawRequest};
use momo_types::HealthData;

pub struct HealthGroup<'a> {
    raw: &'a RawClient,
}

impl<'a> HealthGroup<'a> {
    pub(crate) fn new(raw: &'a RawClient) -> Self {
        Self { raw }
    }

    /// Works whether or not the server wraps the payload in `data`.
    pub async fn check(&self, opts: &RequestOptions) -> Result<HealthData, ClientError> {
        self.raw.json(RawRequest::get("/api/v1/health"), opts).await
    }
}
