//! End-to-end tests over real HTTP.
//!
//! Uses [`wiremock`] to stand up a local server, exercising the full
//! reqwest streaming path together with the SQLite store.
//!
//! Coverage:
//! - Download, persist, then serve repeat fetches from the cache
//! - Progress reporting ends at 100% and never decreases
//! - HTTP error statuses propagate and leave the store empty
//! - Eviction forces a re-download

use std::sync::{Arc, Mutex};

use modelcache::{CacheManager, HttpDownloader, ModelCacheError, SqliteStore};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_manager(temp: &TempDir) -> CacheManager {
    let store = SqliteStore::open(temp.path().join("assets.sqlite")).unwrap();
    let downloader = HttpDownloader::new().unwrap();
    CacheManager::new(Arc::new(store), Arc::new(downloader))
}

fn test_payload() -> Vec<u8> {
    (0..=255).cycle().take(64 * 1024).map(|b| b as u8).collect()
}

#[tokio::test]
async fn fetch_downloads_persists_and_reuses_cache() {
    let server = MockServer::start().await;
    let payload = test_payload();

    // Exactly one request may reach the server; the second fetch must be a
    // cache hit.
    Mock::given(method("GET"))
        .and(path("/model-a.bin"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let manager = test_manager(&temp);
    let url = format!("{}/model-a.bin", server.uri());

    let percents: Mutex<Vec<f64>> = Mutex::new(Vec::new());
    let callback = |p: f64| percents.lock().unwrap().push(p);

    let bytes = manager
        .fetch_resource("model-a", &url, Some(&callback))
        .await
        .unwrap();

    assert_eq!(bytes, payload);
    assert!(manager.is_cached("model-a").unwrap());
    assert_eq!(manager.cache_size().unwrap(), payload.len() as u64);

    let percents = percents.lock().unwrap();
    assert!(!percents.is_empty());
    assert!(percents.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(*percents.last().unwrap(), 100.0);
    drop(percents);

    let again = manager
        .fetch_resource("model-a", &url, None)
        .await
        .unwrap();
    assert_eq!(again, payload);

    // `expect(1)` on the mock verifies no second request was made.
}

#[tokio::test]
async fn cache_hit_survives_unreachable_location() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/model-a.bin"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"payload".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let manager = test_manager(&temp);
    let url = format!("{}/model-a.bin", server.uri());

    let first = manager.fetch_resource("model-a", &url, None).await.unwrap();

    // Identity is the cache key; the location is irrelevant on a hit.
    let second = manager
        .fetch_resource("model-a", "http://127.0.0.1:1/unreachable", None)
        .await
        .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn http_error_status_propagates_and_nothing_is_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing.bin"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let manager = test_manager(&temp);
    let url = format!("{}/missing.bin", server.uri());

    let err = manager
        .fetch_resource("missing", &url, None)
        .await
        .unwrap_err();

    match err {
        ModelCacheError::DownloadHttp { status, .. } => assert_eq!(status, 404),
        other => panic!("expected DownloadHttp, got {:?}", other),
    }

    assert!(!manager.is_cached("missing").unwrap());
    assert_eq!(manager.cache_size().unwrap(), 0);
    assert!(manager.cache_entries().unwrap().is_empty());
}

#[tokio::test]
async fn connection_failure_is_a_stream_error() {
    let temp = TempDir::new().unwrap();
    let manager = test_manager(&temp);

    // Port 1 is never listening.
    let err = manager
        .fetch_resource("model-a", "http://127.0.0.1:1/model.bin", None)
        .await
        .unwrap_err();

    assert!(matches!(err, ModelCacheError::DownloadStream { .. }));
    assert!(!manager.is_cached("model-a").unwrap());
}

#[tokio::test]
async fn evict_then_refetch_hits_network_again() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/model-a.bin"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"immutable".to_vec()))
        .expect(2)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let manager = test_manager(&temp);
    let url = format!("{}/model-a.bin", server.uri());

    manager.fetch_resource("model-a", &url, None).await.unwrap();
    assert!(manager.is_cached("model-a").unwrap());

    manager.evict_one("model-a").unwrap();
    assert!(!manager.is_cached("model-a").unwrap());
    assert_eq!(manager.cache_size().unwrap(), 0);

    let bytes = manager.fetch_resource("model-a", &url, None).await.unwrap();
    assert_eq!(bytes, b"immutable");
    assert!(manager.is_cached("model-a").unwrap());
}

#[tokio::test]
async fn evict_all_clears_every_entry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 32]))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let manager = test_manager(&temp);

    for name in ["a", "b", "c"] {
        let url = format!("{}/{}.bin", server.uri(), name);
        manager.fetch_resource(name, &url, None).await.unwrap();
    }
    assert_eq!(manager.cache_entries().unwrap().len(), 3);
    assert_eq!(manager.cache_size().unwrap(), 96);

    manager.evict_all().unwrap();
    assert_eq!(manager.cache_size().unwrap(), 0);
    assert!(manager.cache_entries().unwrap().is_empty());
}
