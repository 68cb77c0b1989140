//! Integration tests for upcheck
//!
//! These tests verify:
//! - Descriptor fetching and validation over real HTTP
//! - Primary → backup fallback ordering
//! - Request headers and per-attempt timeouts
//! - Background checks deliver exactly one outcome

use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::Router;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use upcheck::error::FetchError;
use upcheck::source::{DescriptorSource, FetchContext, HttpClient, HttpSource};
use upcheck::{ChannelListener, CheckOutcome, CheckRequest, OfflinePolicy, UpdateChecker};

const NEWER: &str = r#"{"latest_version":"2.2.0","release_date":"2024-12-15","download_url":"https://example/dl"}"#;
const SAME: &str = r#"{"latest_version":"2.1.0","release_date":"2024-11-22","download_url":"https://example/dl"}"#;
const OLDER: &str = r#"{"latest_version":"2.0.0","release_date":"2024-01-01","download_url":"https://example/old"}"#;
const FULL: &str = r#"{
    "latest_version": "v3.0.0",
    "release_date": "2025-02-01",
    "download_url": "https://example/dl3",
    "changelog": "https://example/CHANGELOG.md",
    "update_priority": "high",
    "changes": ["one", "two", "three"],
    "channel": "stable"
}"#;
const NULL_VERSION: &str = r#"{"latest_version":null,"release_date":"2025-01-01","download_url":"https://example/dl"}"#;
const LOOSE_OPTIONALS: &str = r#"{"latest_version":"2.2.0","release_date":"2024-12-15","download_url":"https://example/dl","update_priority":1,"changes":"see changelog"}"#;
const MISSING_DOWNLOAD: &str = r#"{"latest_version":"9.0.0","release_date":"2025-01-01","changes":["x"]}"#;

/// Start an HTTP server on an ephemeral port and return its base URL
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Router with one fixed route per scenario, plus a hit counter on /error
async fn fixture_server() -> (String, Arc<AtomicUsize>) {
    let error_hits = Arc::new(AtomicUsize::new(0));
    let hits = error_hits.clone();

    let app = Router::new()
        .route("/newer.json", get(|| async { (StatusCode::OK, NEWER) }))
        .route("/same.json", get(|| async { (StatusCode::OK, SAME) }))
        .route("/older.json", get(|| async { (StatusCode::OK, OLDER) }))
        .route("/full.json", get(|| async { (StatusCode::OK, FULL) }))
        .route(
            "/missing.json",
            get(|| async { (StatusCode::OK, MISSING_DOWNLOAD) }),
        )
        .route("/null.json", get(|| async { (StatusCode::OK, NULL_VERSION) }))
        .route(
            "/loose.json",
            get(|| async { (StatusCode::OK, LOOSE_OPTIONALS) }),
        )
        .route(
            "/html",
            get(|| async { (StatusCode::OK, "<html><body>maintenance</body></html>") }),
        )
        .route(
            "/created.json",
            get(|| async { (StatusCode::CREATED, NEWER) }),
        )
        .route(
            "/error",
            get(move || {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
                }
            }),
        )
        .route(
            "/slow.json",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                (StatusCode::OK, NEWER)
            }),
        );

    (serve(app).await, error_hits)
}

fn checker() -> UpdateChecker {
    UpdateChecker::with_client(HttpClient::new().unwrap())
}

async fn check(primary: String, backup: String, timeout: Duration) -> CheckOutcome {
    let request = CheckRequest::new("2.1.0", primary, backup).with_timeout(timeout);
    checker().check(&request, &CancellationToken::new()).await
}

mod fetching {
    use super::*;

    fn ctx() -> FetchContext {
        FetchContext {
            user_agent: "test/1.0".to_string(),
            timeout: Duration::from_secs(2),
        }
    }

    #[tokio::test]
    async fn test_fetch_full_descriptor() {
        let (base, _) = fixture_server().await;
        let source = HttpSource::new(HttpClient::new().unwrap(), format!("{}/full.json", base));
        let d = source.fetch(&ctx()).await.unwrap();

        assert_eq!(d.latest_version, "v3.0.0");
        assert_eq!(d.changelog_url.as_deref(), Some("https://example/CHANGELOG.md"));
        assert_eq!(d.update_priority.as_deref(), Some("high"));
        assert_eq!(d.changes, vec!["one", "two", "three"]);
        assert_eq!(d.extra.get("channel").and_then(|v| v.as_str()), Some("stable"));
    }

    #[tokio::test]
    async fn test_fetch_missing_field_is_schema_error() {
        let (base, _) = fixture_server().await;
        let source = HttpSource::new(HttpClient::new().unwrap(), format!("{}/missing.json", base));
        let err = source.fetch(&ctx()).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Schema {
                field: "download_url",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_fetch_html_is_decode_error() {
        let (base, _) = fixture_server().await;
        let source = HttpSource::new(HttpClient::new().unwrap(), format!("{}/html", base));
        let err = source.fetch(&ctx()).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_fetch_non_200_is_status_error() {
        let (base, _) = fixture_server().await;
        let client = HttpClient::new().unwrap();

        let err = HttpSource::new(client.clone(), format!("{}/error", base))
            .fetch(&ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 500, .. }));

        let err = HttpSource::new(client.clone(), format!("{}/created.json", base))
            .fetch(&ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 201, .. }));

        let err = HttpSource::new(client, format!("{}/nope", base))
            .fetch(&ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let (base, _) = fixture_server().await;
        let source = HttpSource::new(HttpClient::new().unwrap(), format!("{}/slow.json", base));
        let ctx = FetchContext {
            user_agent: "test/1.0".to_string(),
            timeout: Duration::from_millis(200),
        };
        let err = source.fetch(&ctx).await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout { .. }), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_request_headers() {
        let seen: Arc<Mutex<Vec<(String, String)>>> = Arc::new(Mutex::new(Vec::new()));
        let record = seen.clone();
        let app = Router::new().route(
            "/v.json",
            get(move |headers: HeaderMap| {
                let record = record.clone();
                async move {
                    let value = |name: &str| {
                        headers
                            .get(name)
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or_default()
                            .to_string()
                    };
                    record
                        .lock()
                        .unwrap()
                        .push((value("user-agent"), value("accept")));
                    (StatusCode::OK, SAME)
                }
            }),
        );
        let base = serve(app).await;

        let request = CheckRequest::with_sources("2.1.0", [format!("{}/v.json", base)]);
        let outcome = checker()
            .with_client_id("PyroBrowser")
            .check(&request, &CancellationToken::new())
            .await;

        assert_eq!(outcome, CheckOutcome::UpToDate);
        assert_eq!(
            seen.lock().unwrap().clone(),
            vec![("PyroBrowser/2.1.0".to_string(), "application/json".to_string())]
        );
    }
}

mod orchestration {
    use super::*;

    #[tokio::test]
    async fn test_primary_reports_update() {
        let (base, _) = fixture_server().await;
        let outcome = check(
            format!("{}/newer.json", base),
            format!("{}/older.json", base),
            Duration::from_secs(2),
        )
        .await;

        match outcome {
            CheckOutcome::UpdateAvailable { descriptor } => {
                assert_eq!(descriptor.latest_version, "2.2.0");
                assert_eq!(descriptor.release_date, "2024-12-15");
                assert_eq!(descriptor.download_url, "https://example/dl");
            }
            other => panic!("expected update, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_primary_reports_up_to_date() {
        let (base, _) = fixture_server().await;
        let outcome = check(
            format!("{}/same.json", base),
            format!("{}/newer.json", base),
            Duration::from_secs(2),
        )
        .await;
        assert_eq!(outcome, CheckOutcome::UpToDate);
    }

    #[tokio::test]
    async fn test_primary_500_uses_backup() {
        let (base, error_hits) = fixture_server().await;
        let outcome = check(
            format!("{}/error", base),
            format!("{}/full.json", base),
            Duration::from_secs(2),
        )
        .await;

        assert_eq!(outcome.descriptor().unwrap().latest_version, "v3.0.0");
        assert_eq!(error_hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_primary_timeout_backup_older() {
        let (base, _) = fixture_server().await;
        let outcome = check(
            format!("{}/slow.json", base),
            format!("{}/older.json", base),
            Duration::from_millis(300),
        )
        .await;
        assert_eq!(outcome, CheckOutcome::UpToDate);
    }

    #[tokio::test]
    async fn test_schema_failure_falls_through() {
        let (base, _) = fixture_server().await;
        let outcome = check(
            format!("{}/missing.json", base),
            format!("{}/same.json", base),
            Duration::from_secs(2),
        )
        .await;
        assert_eq!(outcome, CheckOutcome::UpToDate);
    }

    #[tokio::test]
    async fn test_null_latest_version_falls_through() {
        let (base, _) = fixture_server().await;
        let outcome = check(
            format!("{}/null.json", base),
            format!("{}/newer.json", base),
            Duration::from_secs(2),
        )
        .await;
        assert_eq!(outcome.descriptor().unwrap().latest_version, "2.2.0");
    }

    #[tokio::test]
    async fn test_mistyped_optional_fields_still_valid() {
        let (base, error_hits) = fixture_server().await;
        let outcome = check(
            format!("{}/loose.json", base),
            format!("{}/error", base),
            Duration::from_secs(2),
        )
        .await;

        let descriptor = outcome.descriptor().expect("update expected");
        assert_eq!(descriptor.update_priority, None);
        assert!(descriptor.changes.is_empty());
        assert_eq!(
            descriptor.extra.get("changes").and_then(|v| v.as_str()),
            Some("see changelog")
        );
        assert_eq!(error_hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_both_fail_reports_failure() {
        let (base, error_hits) = fixture_server().await;
        let outcome = check(
            format!("{}/error", base),
            format!("{}/html", base),
            Duration::from_secs(2),
        )
        .await;

        assert!(outcome.is_failure());
        assert_eq!(error_hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_both_fail_simulated_up_to_date() {
        let (base, _) = fixture_server().await;
        let request = CheckRequest::new(
            "2.1.0",
            format!("{}/error", base),
            format!("{}/error", base),
        );
        let outcome = checker()
            .with_offline_policy(OfflinePolicy::Simulate {
                delay: Duration::from_millis(10),
                update_probability: 0.0,
            })
            .check(&request, &CancellationToken::new())
            .await;
        assert_eq!(outcome, CheckOutcome::UpToDate);
    }
}

mod background {
    use super::*;

    #[tokio::test]
    async fn test_start_check_delivers_one_outcome() {
        let (base, _) = fixture_server().await;
        let (listener, mut rx) = ChannelListener::new();
        let request = CheckRequest::new(
            "2.1.0",
            format!("{}/error", base),
            format!("{}/newer.json", base),
        );

        let handle = checker().start_check(request, listener);
        handle.wait().await;

        let outcome = rx.recv().await.expect("one outcome");
        assert!(outcome.is_update_available());
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_cancel_slow_check() {
        let (base, _) = fixture_server().await;
        let (listener, mut rx) = ChannelListener::new();
        let request = CheckRequest::new(
            "2.1.0",
            format!("{}/slow.json", base),
            format!("{}/newer.json", base),
        )
        .with_timeout(Duration::from_secs(30));

        let handle = checker().start_check(request, listener);
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.cancel();

        let outcome = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("cancellation should be prompt");
        assert_eq!(outcome, Some(CheckOutcome::failed("update check cancelled")));
        assert_eq!(rx.recv().await, None);
    }
}
