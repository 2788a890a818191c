use crate::{
    Result,
    http::HttpBackend,
    types::{Created, NewFact, NewPdi},
};

/// Client for the facts/sources service.
#[derive(Debug, Clone)]
pub struct SourcesClient {
    http: HttpBackend,
}

impl SourcesClient {
    #[must_use]
    pub fn new(http: HttpBackend) -> Self {
        Self { http }
    }

    /// `POST /hechos`.
    pub async fn create(&self, fact: &NewFact) -> Result<Option<Created>> {
        self.http.post("/hechos", fact).await
    }

    /// `POST /pdis`.
    pub async fn create_pdi(&self, pdi: &NewPdi) -> Result<Option<Created>> {
        self.http.post("/pdis", pdi).await
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, mockito::Matcher, serde_json::json};

    #[tokio::test]
    async fn create_posts_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/hechos")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "nombre_coleccion": "Rio",
                "titulo": "Inundacion",
                "descripcion": "Zona norte anegada"
            })))
            .with_status(201)
            .with_body(r#"{"id": 99}"#)
            .create_async()
            .await;

        let client =
            SourcesClient::new(HttpBackend::new("sources", &server.url(), reqwest::Client::new()));
        let created = client
            .create(&NewFact {
                nombre_coleccion: "Rio".into(),
                titulo: "Inundacion".into(),
                descripcion: Some("Zona norte anegada".into()),
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(created.and_then(|c| c.id).as_deref(), Some("99"));
    }

    #[tokio::test]
    async fn create_pdi_posts_fact_id_and_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/pdis")
            .match_body(Matcher::Json(json!({
                "hechoId": "3",
                "contenido": "https://img.example/x.png"
            })))
            .with_status(200)
            .with_body(r#"{"id": "pdi-1"}"#)
            .create_async()
            .await;

        let client =
            SourcesClient::new(HttpBackend::new("sources", &server.url(), reqwest::Client::new()));
        let created = client
            .create_pdi(&NewPdi {
                hecho_id: "3".into(),
                contenido: "https://img.example/x.png".into(),
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(created.and_then(|c| c.id).as_deref(), Some("pdi-1"));
    }
}
