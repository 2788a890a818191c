use crate::{Result, http::HttpBackend, types::Pdi};

/// Client for the image/PDI service.
#[derive(Debug, Clone)]
pub struct PdiClient {
    http: HttpBackend,
}

impl PdiClient {
    #[must_use]
    pub fn new(http: HttpBackend) -> Self {
        Self { http }
    }

    /// `GET /pdi?hechoId={fact_id}`.
    pub async fn list_by_parent(&self, fact_id: &str) -> Result<Vec<Pdi>> {
        Ok(self
            .http
            .get("/pdi", &[("hechoId", fact_id)])
            .await?
            .unwrap_or_default())
    }
}
