use crate::error::ClientError;
use crate::options::RequestOptions;
use crate::raw::{RawClient, RawRequest};
use momo_types::ForgettingRunResponse;

pub struct AdminGroup<'a> {
    raw: &'a RawClient,
}

impl<'a> AdminGroup<'a> {
    pub(crate) fn new(raw: &'a RawClient) -> Self {
        Self { raw }
    }

    /// Trigger one forgetting pass on the server.
    pub async fn run_forgetting(
        &self,
        opts: &RequestOptions,
    ) -> Result<ForgettingRunResponse, ClientError> {
        self.raw
            .json(RawRequest::post("/api/v1/admin/forgetting:run"), opts)
            .await
    }
}
