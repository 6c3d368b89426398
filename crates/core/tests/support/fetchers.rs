//! In-memory resource server for exercising the request protocol.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use meridian_core::{FetchError, ResourceFetcher};
use meridian_domain::{ClassifiedError, Credential, RepresentationFormat, ResourceEnvelope};
use parking_lot::Mutex;
use serde_json::json;

pub const TREE_MEDIA: &str = "application/vnd.meridian.api.segments-tree-node+json";

/// Resource server that only accepts the access tokens it was told about.
///
/// Each URI serves a fixed body. Requests carrying an unknown access token
/// are rejected the way the API rejects expired bearer tokens.
#[derive(Default)]
pub struct TokenCheckingServer {
    pages: HashMap<String, String>,
    accepted: Mutex<Vec<String>>,
    scripted: Mutex<VecDeque<Result<ResourceEnvelope, FetchError>>>,
    requests: Mutex<Vec<(String, String)>>,
}

impl TokenCheckingServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, uri: &str, body: String) -> Self {
        self.pages.insert(uri.to_string(), body);
        self
    }

    pub fn accept(&self, access_token: &str) {
        self.accepted.lock().push(access_token.to_string());
    }

    /// Queue a response that overrides normal serving for the next request.
    pub fn push_response(&self, response: Result<ResourceEnvelope, FetchError>) {
        self.scripted.lock().push_back(response);
    }

    /// `(uri, access_token)` of every request, in order.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().clone()
    }

    pub fn tokens_used(&self) -> Vec<String> {
        self.requests().into_iter().map(|(_, token)| token).collect()
    }
}

#[async_trait]
impl ResourceFetcher for TokenCheckingServer {
    async fn fetch(
        &self,
        uri: &str,
        credential: &Credential,
        _format: RepresentationFormat,
    ) -> Result<ResourceEnvelope, FetchError> {
        self.requests.lock().push((uri.to_string(), credential.access_token().to_string()));
        tokio::task::yield_now().await;

        if let Some(response) = self.scripted.lock().pop_front() {
            return response;
        }

        if !self.accepted.lock().iter().any(|token| token == credential.access_token()) {
            return Err(rejected());
        }

        match self.pages.get(uri) {
            Some(body) => Ok(ResourceEnvelope::new(body.clone(), TREE_MEDIA)?),
            None => Err(ClassifiedError::ProtocolError {
                status: 404,
                domain_code: None,
                raw_code: None,
                message: "Not Found".to_string(),
            }
            .into()),
        }
    }
}

pub fn rejected() -> FetchError {
    ClassifiedError::CredentialRejected { status: 401, message: "Unauthorized".to_string() }.into()
}

/// A segments tree node page with `count` child segments named `<prefix><n>`.
pub fn child_segments_page(prefix: &str, count: usize, next: Option<&str>) -> String {
    let items: Vec<_> = (1..=count)
        .map(|n| {
            json!({
                "name": format!("{prefix}{n}"),
                "timePeriods": [
                    { "code": "YTD", "measures": [
                        { "id": "Wp", "ty": "real", "val": 0.05 },
                        { "id": "Ccy", "ty": "string", "val": null }
                    ] }
                ]
            })
        })
        .collect();

    json!({
        "segmentsTreeNode": {
            "href": "https://api.example.com/analyses/7/segments-tree-node",
            "name": "Total Portfolio",
            "timePeriods": [
                { "code": "YTD", "measures": [ { "id": "Rp", "ty": "real", "val": 0.031 } ] }
            ],
            "childSegments": { "items": items, "next": next }
        }
    })
    .to_string()
}
