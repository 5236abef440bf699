//! Single-flight and TTL behaviour of the response cache

use async_trait::async_trait;
use espn_client::{CachingClient, UpstreamClient, UpstreamError, UpstreamPayload, UpstreamRequest};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Counts upstream calls; each call takes `delay` and fails while `failing` is set
struct CountingClient {
    calls: AtomicUsize,
    delay: Duration,
    failing: std::sync::atomic::AtomicBool,
}

impl CountingClient {
    fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            delay,
            failing: std::sync::atomic::AtomicBool::new(false),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UpstreamClient for CountingClient {
    async fn fetch(
        &self,
        request: &UpstreamRequest,
        _cancel: &CancellationToken,
    ) -> espn_client::Result<UpstreamPayload> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        if self.failing.load(Ordering::SeqCst) {
            return Err(UpstreamError::Unavailable {
                status: 503,
                endpoint: request.to_string(),
            });
        }
        Ok(Arc::new(json!({"request": request.to_string(), "call": call})))
    }
}

#[tokio::test]
async fn test_concurrent_identical_fetches_share_one_call() {
    let upstream = CountingClient::new(Duration::from_millis(50));
    let cache = Arc::new(CachingClient::new(upstream.clone(), Duration::from_secs(60)));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                cache
                    .fetch(&UpstreamRequest::team("13"), &CancellationToken::new())
                    .await
            })
        })
        .collect();

    for handle in futures::future::join_all(handles).await {
        let payload = handle.unwrap().unwrap();
        assert_eq!(payload["call"], 1);
    }
    assert_eq!(upstream.calls(), 1);

    // Served from cache afterwards
    cache
        .fetch(&UpstreamRequest::team("13"), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn test_distinct_requests_are_fetched_separately() {
    let upstream = CountingClient::new(Duration::from_millis(5));
    let cache = CachingClient::new(upstream.clone(), Duration::from_secs(60));
    let cancel = CancellationToken::new();

    cache.fetch(&UpstreamRequest::team("13"), &cancel).await.unwrap();
    cache.fetch(&UpstreamRequest::team_roster("13"), &cancel).await.unwrap();
    cache.fetch(&UpstreamRequest::scoreboard(Some("20240115")), &cancel).await.unwrap();
    cache.fetch(&UpstreamRequest::scoreboard(Some("20240116")), &cancel).await.unwrap();

    assert_eq!(upstream.calls(), 4);
    assert_eq!(cache.len().await, 4);
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let upstream = CountingClient::new(Duration::from_millis(5));
    upstream.failing.store(true, Ordering::SeqCst);
    let cache = CachingClient::new(upstream.clone(), Duration::from_secs(60));
    let cancel = CancellationToken::new();

    let err = cache.fetch(&UpstreamRequest::team("13"), &cancel).await.unwrap_err();
    assert!(matches!(err, UpstreamError::Unavailable { status: 503, .. }));
    assert!(cache.is_empty().await);

    upstream.failing.store(false, Ordering::SeqCst);
    cache.fetch(&UpstreamRequest::team("13"), &cancel).await.unwrap();
    assert_eq!(upstream.calls(), 2);
}

#[tokio::test]
async fn test_entries_expire_after_ttl() {
    let upstream = CountingClient::new(Duration::from_millis(1));
    let cache = CachingClient::new(upstream.clone(), Duration::from_millis(30));
    let cancel = CancellationToken::new();

    cache.fetch(&UpstreamRequest::standings(), &cancel).await.unwrap();
    tokio::time::sleep(Duration::from_millis(60)).await;
    let payload = cache.fetch(&UpstreamRequest::standings(), &cancel).await.unwrap();

    assert_eq!(payload["call"], 2);
    assert_eq!(upstream.calls(), 2);
}

#[tokio::test]
async fn test_cancelled_waiter_does_not_disturb_others() {
    let upstream = CountingClient::new(Duration::from_millis(100));
    let cache = Arc::new(CachingClient::new(upstream.clone(), Duration::from_secs(60)));

    let impatient = CancellationToken::new();
    let first = {
        let cache = Arc::clone(&cache);
        let token = impatient.clone();
        tokio::spawn(async move { cache.fetch(&UpstreamRequest::team("2"), &token).await })
    };
    let second = {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move {
            cache
                .fetch(&UpstreamRequest::team("2"), &CancellationToken::new())
                .await
        })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;
    impatient.cancel();

    assert_eq!(first.await.unwrap().unwrap_err(), UpstreamError::Cancelled);
    let payload = second.await.unwrap().unwrap();
    assert_eq!(payload["call"], 1);
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn test_already_cancelled_token_short_circuits() {
    let upstream = CountingClient::new(Duration::from_millis(1));
    let cache = CachingClient::new(upstream.clone(), Duration::from_secs(60));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = cache.fetch(&UpstreamRequest::team("13"), &cancel).await.unwrap_err();
    assert_eq!(err, UpstreamError::Cancelled);
    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn test_call_settles_after_its_only_waiter_cancels() {
    let upstream = CountingClient::new(Duration::from_millis(100));
    let cache = Arc::new(CachingClient::new(upstream.clone(), Duration::from_secs(60)));

    let only_waiter = CancellationToken::new();
    let first = {
        let cache = Arc::clone(&cache);
        let token = only_waiter.clone();
        tokio::spawn(async move { cache.fetch(&UpstreamRequest::team("7"), &token).await })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;
    only_waiter.cancel();
    assert_eq!(first.await.unwrap().unwrap_err(), UpstreamError::Cancelled);

    // Nobody is waiting any more, the upstream call still finishes and is cached
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(cache.len().await, 1);

    let payload = cache
        .fetch(&UpstreamRequest::team("7"), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(payload["call"], 1);
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn test_abandoned_failure_is_forgotten() {
    let upstream = CountingClient::new(Duration::from_millis(50));
    upstream.failing.store(true, Ordering::SeqCst);
    let cache = CachingClient::new(upstream.clone(), Duration::from_secs(60));

    let cancel = CancellationToken::new();
    let request = UpstreamRequest::standings();
    let abandoned = cache.fetch(&request, &cancel);
    let _ = tokio::time::timeout(Duration::from_millis(10), abandoned).await;

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert!(cache.is_empty().await);
}
