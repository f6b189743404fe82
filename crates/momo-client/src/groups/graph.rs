use crate::error::ClientError;
use crate::options::RequestOptions;
use crate::raw::{Query, RawClient, RawRequest};
use momo_types::{ContainerGraphQuery, GraphResponse, MemoryGraphQuery};

pub struct GraphGroup<'a> {
    raw: &'a RawClient,
}

impl<'a> GraphGroup<'a> {
    pub(crate) fn new(raw: &'a RawClient) -> Self {
        Self { raw }
    }

    /// Neighbourhood of one memory.
    pub async fn memory_graph(
        &self,
        memory_id: &str,
        query: &MemoryGraphQuery,
        opts: &RequestOptions,
    ) -> Result<GraphResponse, ClientError> {
        let req = RawRequest::get("/api/v1/memories")
            .segment(memory_id)
            .segment("graph")
            .query(
                Query::new()
                    .opt("depth", query.depth)
                    .opt("maxNodes", query.max_nodes)
                    .opt("relationTypes", query.relation_types.as_deref()),
            );
        self.raw.json(req, opts).await
    }

    /// Whole graph of a container.
    pub async fn container_graph(
        &self,
        tag: &str,
        query: &ContainerGraphQuery,
        opts: &RequestOptions,
    ) -> Result<GraphResponse, ClientError> {
        let req = RawRequest::get("/api/v1/containers")
            .segment(tag)
            .segment("graph")
            .query(Query::new().opt("maxNodes", query.max_nodes));
        self.raw.json(req, opts).await
    }
}
