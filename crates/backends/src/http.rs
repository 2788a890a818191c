use std::{borrow::Cow, time::Duration};

use {
    reqwest::{Client, RequestBuilder, header::ACCEPT},
    serde::{Serialize, de::DeserializeOwned},
    tracing::{debug, warn},
};

use crate::{Error, Result};

/// Build the shared HTTP client. `timeout` bounds every backend call end to end.
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(concat!("metamapa/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|source| Error::external("failed to build HTTP client", source))
}

/// Strip a single trailing slash from a base URL.
#[must_use]
pub fn normalize_base_url(base_url: &str) -> &str {
    base_url.strip_suffix('/').unwrap_or(base_url)
}

/// Percent-encode a value for use as one URL path segment.
#[must_use]
pub fn path_segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// JSON-over-HTTP core shared by the typed clients.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    name: &'static str,
    base_url: String,
    client: Client,
}

impl HttpBackend {
    #[must_use]
    pub fn new(name: &'static str, base_url: &str, client: Client) -> Self {
        Self {
            name,
            base_url: normalize_base_url(base_url).to_string(),
            client,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `GET path?query`. An empty or `null` body yields `None`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>> {
        let request = self.client.get(self.url(path)).query(query);
        self.execute("GET", path, request).await
    }

    /// `POST path` with a JSON body.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(self.url(path)).json(body);
        self.execute("POST", path, request).await
    }

    /// `PATCH path` with a JSON body. Only the status is checked; a 2xx body
    /// is discarded whatever its content.
    pub async fn patch_ack<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let request = self.client.patch(self.url(path)).json(body);
        self.send("PATCH", path, request).await.map(drop)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: &'static str,
        path: &str,
        request: RequestBuilder,
    ) -> Result<Option<T>> {
        let backend = self.name;
        let body = self.send(method, path, request).await?;

        decode_body(&body).map_err(|source| Error::Decode {
            context: format!("failed to parse {backend} {method} {path} response"),
            source,
        })
    }

    /// Send `request` and return the raw body of a 2xx response.
    async fn send(
        &self,
        method: &'static str,
        path: &str,
        request: RequestBuilder,
    ) -> Result<String> {
        let backend = self.name;
        debug!(backend, method, path, "backend request");

        let resp = request
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| {
                Error::from_transport(format!("{backend} {method} {path} failed"), source)
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|source| {
            Error::from_transport(
                format!("failed to read {backend} {method} {path} response"),
                source,
            )
        })?;

        if !status.is_success() {
            warn!(backend, method, path, status = status.as_u16(), "backend returned error status");
            return Err(Error::Http {
                backend,
                status: status.as_u16(),
                body,
            });
        }

        debug!(backend, method, path, status = status.as_u16(), body_len = body.len(), "backend response");
        Ok(body)
    }
}

/// Decode a response body, treating an empty body or JSON `null` as absent.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &str) -> serde_json::Result<Option<T>> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: serde_json::Value = serde_json::from_str(trimmed)?;
    if value.is_null() {
        return Ok(None);
    }
    serde_json::from_value(value).map(Some)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        rstest::rstest,
        serde::Deserialize,
        tokio::{io::AsyncReadExt, net::TcpListener},
    };

    #[derive(Debug, Deserialize, PartialEq)]
    struct Ping {
        ok: bool,
    }

    #[rstest]
    #[case("http://svc:8080/", "http://svc:8080")]
    #[case("http://svc:8080", "http://svc:8080")]
    #[case("http://svc:8080/api/", "http://svc:8080/api")]
    #[case("http://svc:8080//", "http://svc:8080/")]
    fn strips_single_trailing_slash(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_base_url(input), expected);
        let backend = HttpBackend::new("test", input, Client::new());
        assert_eq!(backend.base_url(), expected);
    }

    #[test]
    fn path_segment_encodes_spaces_and_slashes() {
        assert_eq!(path_segment("Rio de la Plata"), "Rio%20de%20la%20Plata");
        assert_eq!(path_segment("a/b"), "a%2Fb");
    }

    #[rstest]
    #[case("")]
    #[case("   \n")]
    #[case("null")]
    fn empty_bodies_decode_as_absent(#[case] body: &str) {
        let decoded: Option<Ping> = decode_body(body).unwrap();
        assert!(decoded.is_none());
    }

    #[test]
    fn json_body_decodes() {
        let decoded: Option<Ping> = decode_body(r#"{"ok": true, "extra": 1}"#).unwrap();
        assert_eq!(decoded, Some(Ping { ok: true }));
    }

    #[test]
    fn malformed_body_is_decode_error() {
        assert!(decode_body::<Ping>("<html>").is_err());
    }

    #[tokio::test]
    async fn non_success_status_carries_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/hechos/9")
            .with_status(404)
            .with_body("no existe")
            .create_async()
            .await;

        let backend = HttpBackend::new("aggregator", &server.url(), Client::new());
        let err = backend.get::<Ping>("/hechos/9", &[]).await.unwrap_err();

        assert_eq!(err.status(), Some(404));
        match err {
            Error::Http {
                backend,
                status,
                body,
            } => {
                assert_eq!(backend, "aggregator");
                assert_eq!(status, 404);
                assert_eq!(body, "no existe");
            },
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_success_body_is_none() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/hechos/1")
            .with_status(200)
            .create_async()
            .await;

        let backend = HttpBackend::new("aggregator", &format!("{}/", server.url()), Client::new());
        let got = backend.get::<Ping>("/hechos/1", &[]).await.unwrap();
        assert!(got.is_none());
    }

    #[rstest]
    #[case(200, "OK")]
    #[case(200, "<html>actualizado</html>")]
    #[case(204, "")]
    #[tokio::test]
    async fn patch_ack_ignores_success_body(#[case] status: usize, #[case] body: &str) {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PATCH", "/solicitudes/42")
            .with_status(status)
            .with_header("content-type", "text/plain")
            .with_body(body)
            .create_async()
            .await;

        let backend = HttpBackend::new("requests", &server.url(), Client::new());
        backend
            .patch_ack("/solicitudes/42", &serde_json::json!({"estado": "aprobada"}))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn patch_ack_still_reports_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("PATCH", "/solicitudes/42")
            .with_status(409)
            .with_body("conflicto")
            .create_async()
            .await;

        let backend = HttpBackend::new("requests", &server.url(), Client::new());
        let err = backend
            .patch_ack("/solicitudes/42", &serde_json::json!({"estado": "aprobada"}))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(409));
    }

    #[tokio::test]
    async fn closed_port_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let backend = HttpBackend::new(
            "sources",
            &format!("http://{addr}"),
            build_client(Duration::from_secs(2)).unwrap(),
        );
        let err = backend
            .post::<_, Ping>("/hechos", &serde_json::json!({}))
            .await
            .unwrap_err();

        assert!(err.is_unreachable(), "got {err:?}");
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn stalled_backend_times_out_as_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            // Read the request, never answer.
            let _ = socket.read(&mut buf).await;
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let backend = HttpBackend::new(
            "pdi",
            &format!("http://{addr}"),
            build_client(Duration::from_millis(200)).unwrap(),
        );
        let err = backend.get::<Ping>("/pdi", &[("hechoId", "1")]).await.unwrap_err();

        match err {
            Error::Unreachable { timed_out, .. } => assert!(timed_out),
            other => panic!("expected Unreachable, got {other:?}"),
        }
        server.abort();
    }
}
