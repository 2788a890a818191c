//! Typed HTTP clients for the four MetaMapa backend services.
//!
//! Every client shares one [`http::HttpBackend`] core that normalizes the base
//! URL, applies the per-call timeout carried by the `reqwest::Client`, decodes
//! JSON once at the boundary and classifies failures into [`Error`] variants.

pub mod aggregator;
pub mod error;
pub mod http;
pub mod pdi;
pub mod requests;
pub mod sources;
pub mod types;

pub use {
    aggregator::AggregatorClient,
    error::{Error, Result},
    http::{HttpBackend, build_client},
    pdi::PdiClient,
    requests::RequestsClient,
    sources::SourcesClient,
};

/// The four backend clients a dispatcher needs, built from one shared
/// connection pool.
#[derive(Debug, Clone)]
pub struct Backends {
    pub aggregator: AggregatorClient,
    pub sources: SourcesClient,
    pub pdi: PdiClient,
    pub requests: RequestsClient,
}

/// Base URLs for [`Backends::new`].
#[derive(Debug, Clone, Copy)]
pub struct BackendUrls<'a> {
    pub aggregator: &'a str,
    pub sources: &'a str,
    pub pdi: &'a str,
    pub requests: &'a str,
}

impl Backends {
    #[must_use]
    pub fn new(client: &reqwest::Client, urls: BackendUrls<'_>) -> Self {
        Self {
            aggregator: AggregatorClient::new(HttpBackend::new(
                "aggregator",
                urls.aggregator,
                client.clone(),
            )),
            sources: SourcesClient::new(HttpBackend::new("sources", urls.sources, client.clone())),
            pdi: PdiClient::new(HttpBackend::new("pdi", urls.pdi, client.clone())),
            requests: RequestsClient::new(HttpBackend::new(
                "requests",
                urls.requests,
                client.clone(),
            )),
        }
    }
}
