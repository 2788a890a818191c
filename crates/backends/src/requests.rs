use crate::{
    Result,
    http::{HttpBackend, path_segment},
    types::{Created, NewDeletionRequest, StatusPatch},
};

/// Client for the deletion-request service.
#[derive(Debug, Clone)]
pub struct RequestsClient {
    http: HttpBackend,
}

impl RequestsClient {
    #[must_use]
    pub fn new(http: HttpBackend) -> Self {
        Self { http }
    }

    /// `POST /solicitudes`.
    pub async fn create(&self, request: &NewDeletionRequest) -> Result<Option<Created>> {
        self.http.post("/solicitudes", request).await
    }

    /// `PATCH /solicitudes/{id}`. Any 2xx counts as accepted.
    pub async fn patch(&self, id: &str, patch: &StatusPatch) -> Result<()> {
        let path = format!("/solicitudes/{}", path_segment(id));
        self.http.patch_ack(&path, patch).await
    }
}
