//! Integration tests for the two-attempt request protocol

mod support;

use std::sync::Arc;
use std::time::Duration;

use meridian_common::auth::AuthorizationError;
use meridian_core::{RequestError, RetryCoordinator};
use meridian_domain::{ClassifiedError, DomainErrorCode, RepresentationFormat};
use support::fetchers::{child_segments_page, rejected, TokenCheckingServer};
use support::logged_in_session;

const URI: &str = "/analyses/7/segments-tree-node";

fn server() -> Arc<TokenCheckingServer> {
    Arc::new(TokenCheckingServer::new().with_page(URI, child_segments_page("s", 2, None)))
}

/// Expired access token: refresh once, retry once, keep the new credential.
#[tokio::test]
async fn test_rejected_credential_is_refreshed_and_request_retried() {
    let (session, store, authorization) = logged_in_session("expired").await;
    let server = server();
    server.accept("refreshed-1");
    let coordinator = RetryCoordinator::new(server.clone());

    let envelope =
        coordinator.fetch(&session, URI, RepresentationFormat::TaggedObject).await.unwrap();

    assert!(envelope.representation().contains("Total Portfolio"));
    assert_eq!(authorization.refresh_calls(), 1);
    assert_eq!(server.tokens_used(), vec!["expired", "refreshed-1"]);
    assert_eq!(store.get().await.unwrap().access_token(), "refreshed-1");
}

/// Revoked refresh token: the session is logged off and nothing is retried.
#[tokio::test]
async fn test_invalid_grant_on_refresh_logs_off() {
    let (session, store, authorization) = logged_in_session("expired").await;
    authorization.push_refresh_result(Err(AuthorizationError::GrantInvalid));
    let server = server();
    let coordinator = RetryCoordinator::new(server.clone());

    let err = coordinator
        .fetch(&session, URI, RepresentationFormat::TaggedObject)
        .await
        .unwrap_err();

    assert_eq!(err, RequestError::LoggedOff);
    assert!(err.forces_logout());
    assert!(store.get().await.is_none());
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_non_credential_failures_never_refresh() {
    let failures = [
        ClassifiedError::TransportFailure { message: "connection refused".to_string() },
        ClassifiedError::ProtocolError {
            status: 404,
            domain_code: Some(DomainErrorCode::ResourceNotFound),
            raw_code: Some(201),
            message: "The requested resource does not exist.".to_string(),
        },
        ClassifiedError::PolicyBlocked {
            status: 403,
            domain_code: DomainErrorCode::TenancyAppBlacklisted,
            message: "Application blocked".to_string(),
        },
        ClassifiedError::ProtocolError {
            status: 401,
            domain_code: None,
            raw_code: None,
            message: "Unauthorized".to_string(),
        },
    ];

    for failure in failures {
        let (session, store, authorization) = logged_in_session("a1").await;
        let server = server();
        server.push_response(Err(failure.clone().into()));
        let coordinator = RetryCoordinator::new(server.clone());

        let err = coordinator
            .fetch(&session, URI, RepresentationFormat::TaggedObject)
            .await
            .unwrap_err();

        assert_eq!(err, RequestError::Classified(failure.clone()), "{failure:?}");
        assert_eq!(err.status(), failure.status());
        assert_eq!(authorization.refresh_calls(), 0, "{failure:?}");
        assert_eq!(server.requests().len(), 1, "{failure:?}");
        assert!(store.is_authenticated().await);
    }
}

/// After a successful refresh the re-fetch happens exactly once, whatever it
/// returns.
#[tokio::test]
async fn test_exactly_one_refresh_and_refetch() {
    let second_attempts = [
        rejected(),
        ClassifiedError::ProtocolError {
            status: 500,
            domain_code: Some(DomainErrorCode::UnspecifiedFailure),
            raw_code: Some(100),
            message: "Internal failure".to_string(),
        }
        .into(),
    ];

    for second in second_attempts {
        let (session, store, authorization) = logged_in_session("a1").await;
        let server = server();
        server.push_response(Err(rejected()));
        server.push_response(Err(second.clone()));
        let coordinator = RetryCoordinator::new(server.clone());

        let err = coordinator
            .fetch(&session, URI, RepresentationFormat::TaggedObject)
            .await
            .unwrap_err();

        assert_eq!(authorization.refresh_calls(), 1);
        assert_eq!(server.requests().len(), 2);
        assert!(!err.forces_logout());
        assert!(store.is_authenticated().await);
        if second == rejected() {
            assert!(matches!(err, RequestError::AccessDenied { status: 401, .. }));
        } else {
            assert_eq!(err.domain_code(), Some(DomainErrorCode::UnspecifiedFailure));
        }
    }
}

/// Concurrent requests that all saw the same expired token share a single
/// refresh.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_rejections_share_one_refresh() {
    let (session, store, authorization) = logged_in_session("expired").await;
    authorization.set_delay(Duration::from_millis(50));
    let server = server();
    server.accept("refreshed-1");
    let coordinator = Arc::new(RetryCoordinator::new(server.clone()));

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let coordinator = Arc::clone(&coordinator);
            let session = session.clone();
            tokio::spawn(async move {
                coordinator.fetch(&session, URI, RepresentationFormat::TaggedObject).await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(authorization.refresh_calls(), 1);
    assert_eq!(store.get().await.unwrap().access_token(), "refreshed-1");
    let retries = server.tokens_used().into_iter().filter(|t| t == "refreshed-1").count();
    assert_eq!(retries, 5);
}

/// Concurrent rejections and a revoked refresh token: every waiting request
/// is told to log off, not only the one that performed the exchange.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_rejections_with_revoked_grant_all_log_off() {
    let (session, store, authorization) = logged_in_session("expired").await;
    authorization.set_delay(Duration::from_millis(50));
    authorization.push_refresh_result(Err(AuthorizationError::GrantInvalid));
    let server = server();
    let coordinator = Arc::new(RetryCoordinator::new(server.clone()));

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let coordinator = Arc::clone(&coordinator);
            let session = session.clone();
            tokio::spawn(async move {
                coordinator.fetch(&session, URI, RepresentationFormat::TaggedObject).await
            })
        })
        .collect();

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap().unwrap_err());
    }

    assert_eq!(authorization.refresh_calls(), 1);
    assert!(outcomes.iter().all(RequestError::forces_logout), "outcomes: {outcomes:?}");
    assert!(store.get().await.is_none());
    assert_eq!(server.requests().len(), 5);
}
