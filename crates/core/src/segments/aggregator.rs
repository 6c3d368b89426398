//! Paginated segments tree aggregation
//!
//! The first page of a segments tree node is the master. Every following
//! page repeats the node and carries the next slice of its children; those
//! children are appended to the master's in page order. The walk ends when a
//! page carries no cursor. Any failure aborts the walk and nothing partial
//! is returned.

use std::collections::HashSet;
use std::sync::Arc;

use meridian_domain::wire::decode_segments_tree_node;
use meridian_domain::{RepresentationFormat, ResourceKind, StructuralError, TreeNode};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::resources::{RequestError, RetryCoordinator, SessionContext};

/// Failure to load a complete segments tree node
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregationError {
    /// Fetching a page failed
    #[error(transparent)]
    Request(#[from] RequestError),

    /// A page violated the representation contract
    #[error(transparent)]
    Structural(#[from] StructuralError),
}

impl AggregationError {
    /// Whether the session was logged off while loading.
    #[must_use]
    pub const fn forces_logout(&self) -> bool {
        match self {
            Self::Request(err) => err.forces_logout(),
            Self::Structural(_) => false,
        }
    }
}

/// Loads every page of a segments tree node for one session
pub struct PageAggregator {
    coordinator: Arc<RetryCoordinator>,
    session: SessionContext,
}

impl PageAggregator {
    #[must_use]
    pub fn new(coordinator: Arc<RetryCoordinator>, session: SessionContext) -> Self {
        Self { coordinator, session }
    }

    /// Load the node at `first_page_uri` with all of its children
    ///
    /// The returned node carries no paging cursor.
    ///
    /// # Errors
    /// Returns [`AggregationError::Request`] when any page fails to load and
    /// [`AggregationError::Structural`] when a page does not decode, is not a
    /// segments tree node, changes child kind, or the cursor chain loops
    #[instrument(skip(self))]
    pub async fn load_complete(&self, first_page_uri: &str) -> Result<TreeNode, AggregationError> {
        let mut master = self.load_page(first_page_uri).await?;
        let mut cursor = master.children.take_next_page();
        let mut visited = HashSet::from([first_page_uri.to_string()]);
        let mut pages = 1_usize;

        while let Some(uri) = cursor {
            if !visited.insert(uri.clone()) {
                return Err(StructuralError::Malformed(format!("paging cursor revisits {uri}")).into());
            }

            let mut page = self.load_page(&uri).await?;
            cursor = page.children.take_next_page();
            debug!(page = pages + 1, children = page.children.len(), "Appending page");
            master.children.append_page(page.children)?;
            pages += 1;
        }

        master.clear_next_page();
        info!(pages, children = master.children.len(), "Segments tree node loaded");
        Ok(master)
    }

    async fn load_page(&self, uri: &str) -> Result<TreeNode, AggregationError> {
        let envelope =
            self.coordinator.fetch(&self.session, uri, RepresentationFormat::TaggedObject).await?;

        if envelope.kind() != ResourceKind::SegmentsTreeNode
            || envelope.format() != RepresentationFormat::TaggedObject
        {
            return Err(StructuralError::UnexpectedResource {
                expected: ResourceKind::SegmentsTreeNode.to_string(),
                found: envelope.media_type().to_string(),
            }
            .into());
        }

        Ok(decode_segments_tree_node(envelope.representation())?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use meridian_common::auth::{CredentialStore, InMemorySessionStore};
    use meridian_common::testing::{credential, MockAuthorizationClient};
    use meridian_domain::{ClassifiedError, Credential, ResourceEnvelope};
    use parking_lot::Mutex;
    use serde_json::json;

    use super::*;
    use crate::resources::{FetchError, ResourceFetcher};

    const TREE_MEDIA: &str = "application/vnd.meridian.api.segments-tree-node+json";

    #[derive(Default)]
    struct PageServer {
        pages: HashMap<String, Result<ResourceEnvelope, FetchError>>,
        requested: Mutex<Vec<String>>,
    }

    impl PageServer {
        fn with_page(mut self, uri: &str, body: String) -> Self {
            self.pages.insert(uri.to_string(), Ok(ResourceEnvelope::new(body, TREE_MEDIA).unwrap()));
            self
        }

        fn with_failure(mut self, uri: &str, err: ClassifiedError) -> Self {
            self.pages.insert(uri.to_string(), Err(err.into()));
            self
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().clone()
        }
    }

    #[async_trait]
    impl ResourceFetcher for PageServer {
        async fn fetch(
            &self,
            uri: &str,
            _credential: &Credential,
            _format: RepresentationFormat,
        ) -> Result<ResourceEnvelope, FetchError> {
            self.requested.lock().push(uri.to_string());
            self.pages.get(uri).cloned().unwrap_or_else(|| {
                Err(ClassifiedError::ProtocolError {
                    status: 404,
                    domain_code: None,
                    raw_code: None,
                    message: "Not Found".into(),
                }
                .into())
            })
        }
    }

    fn page(kind: &str, names: &[&str], next: Option<&str>) -> String {
        let items: Vec<_> = names
            .iter()
            .map(|name| {
                json!({
                    "name": name,
                    "timePeriods": [
                        { "code": "1Y", "measures": [ { "id": "Wp", "ty": "real", "val": 0.1 } ] }
                    ]
                })
            })
            .collect();
        json!({
            "segmentsTreeNode": {
                "href": "https://api/tree",
                "name": "Total",
                kind: { "items": items, "next": next }
            }
        })
        .to_string()
    }

    async fn aggregator(server: PageServer) -> (PageAggregator, Arc<PageServer>) {
        let store = Arc::new(CredentialStore::new(Arc::new(InMemorySessionStore::new())));
        store.set(credential("a1")).await.unwrap();
        let session = SessionContext::new(store, Arc::new(MockAuthorizationClient::new()));
        let server = Arc::new(server);
        let coordinator = Arc::new(RetryCoordinator::new(server.clone()));
        (PageAggregator::new(coordinator, session), server)
    }

    #[tokio::test]
    async fn test_single_page_is_returned_as_is() {
        let server = PageServer::default().with_page("/p1", page("securities", &["A", "B"], None));
        let (aggregator, server) = aggregator(server).await;

        let node = aggregator.load_complete("/p1").await.unwrap();
        assert_eq!(node.children.len(), 2);
        assert_eq!(node.next_page(), None);
        assert_eq!(server.requested(), vec!["/p1"]);
    }

    #[tokio::test]
    async fn test_pages_are_appended_in_order_and_each_fetched_once() {
        let server = PageServer::default()
            .with_page("/p1", page("childSegments", &["a", "b"], Some("/p2")))
            .with_page("/p2", page("childSegments", &["c"], Some("/p3")))
            .with_page("/p3", page("childSegments", &["d", "e"], None));
        let (aggregator, server) = aggregator(server).await;

        let node = aggregator.load_complete("/p1").await.unwrap();
        let names: Vec<_> = node.children.items().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d", "e"]);
        assert_eq!(node.next_page(), None);
        assert_eq!(server.requested(), vec!["/p1", "/p2", "/p3"]);
    }

    #[tokio::test]
    async fn test_child_kind_change_aborts() {
        let server = PageServer::default()
            .with_page("/p1", page("childSegments", &["a"], Some("/p2")))
            .with_page("/p2", page("securities", &["x"], None));
        let (aggregator, _server) = aggregator(server).await;

        let err = aggregator.load_complete("/p1").await.unwrap_err();
        assert!(matches!(err, AggregationError::Structural(StructuralError::ChildKindMismatch { .. })));
    }

    #[tokio::test]
    async fn test_failed_page_aborts_without_partial_result() {
        let server = PageServer::default()
            .with_page("/p1", page("childSegments", &["a"], Some("/p2")))
            .with_failure(
                "/p2",
                ClassifiedError::TransportFailure { message: "connection reset".into() },
            );
        let (aggregator, _server) = aggregator(server).await;

        let err = aggregator.load_complete("/p1").await.unwrap_err();
        assert!(matches!(
            err,
            AggregationError::Request(RequestError::Classified(
                ClassifiedError::TransportFailure { .. }
            ))
        ));
        assert!(!err.forces_logout());
    }

    #[tokio::test]
    async fn test_cursor_loop_is_structural_error() {
        let server = PageServer::default()
            .with_page("/p1", page("childSegments", &["a"], Some("/p2")))
            .with_page("/p2", page("childSegments", &["b"], Some("/p1")));
        let (aggregator, server) = aggregator(server).await;

        let err = aggregator.load_complete("/p1").await.unwrap_err();
        assert!(matches!(err, AggregationError::Structural(StructuralError::Malformed(_))));
        assert_eq!(server.requested().len(), 2);
    }

    #[tokio::test]
    async fn test_other_resource_kind_is_rejected() {
        let mut server = PageServer::default();
        server.pages.insert(
            "/p1".to_string(),
            Ok(ResourceEnvelope::new("{}", "application/vnd.meridian.api.portfolio+json").unwrap()),
        );
        let (aggregator, _server) = aggregator(server).await;

        let err = aggregator.load_complete("/p1").await.unwrap_err();
        assert!(matches!(
            err,
            AggregationError::Structural(StructuralError::UnexpectedResource { .. })
        ));
    }
}
