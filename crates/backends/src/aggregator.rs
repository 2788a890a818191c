use crate::{
    Result,
    http::{HttpBackend, path_segment},
    types::{Fact, FactSummary},
};

/// Client for the collection aggregator.
#[derive(Debug, Clone)]
pub struct AggregatorClient {
    http: HttpBackend,
}

impl AggregatorClient {
    #[must_use]
    pub fn new(http: HttpBackend) -> Self {
        Self { http }
    }

    /// `GET /coleccion/{name}/hechos`. An absent body is an empty collection.
    pub async fn list_by_parent(&self, collection: &str) -> Result<Vec<FactSummary>> {
        let path = format!("/coleccion/{}/hechos", path_segment(collection));
        Ok(self.http.get(&path, &[]).await?.unwrap_or_default())
    }

    /// `GET /hechos/{id}`. `None` when the backend has no record.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Fact>> {
        let path = format!("/hechos/{}", path_segment(id));
        self.http.get(&path, &[]).await
    }
}
