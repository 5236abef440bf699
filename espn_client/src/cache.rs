use crate::client::UpstreamClient;
use crate::endpoint::UpstreamRequest;
use crate::error::UpstreamError;
use crate::{Result, UpstreamPayload};
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

type Flight = Shared<BoxFuture<'static, Result<UpstreamPayload>>>;
type Slots = Arc<Mutex<HashMap<UpstreamRequest, Slot>>>;

enum Lookup {
    Hit(UpstreamPayload),
    Wait { generation: u64, flight: Flight },
}

enum Slot {
    InFlight { generation: u64, flight: Flight },
    Ready { payload: UpstreamPayload, expires_at: Instant },
}

/// TTL response cache with single-flight fetching.
///
/// At most one upstream call is in flight per distinct request. Concurrent
/// callers for the same request await that call. Failures are handed to the
/// callers that were waiting and then forgotten.
///
/// The upstream call runs on its own task and is not tied to any caller's
/// cancellation token: a cancelled caller stops waiting, the call still
/// completes and settles its slot even when nobody is left waiting.
pub struct CachingClient {
    inner: Arc<dyn UpstreamClient>,
    ttl: Duration,
    slots: Slots,
    generation: AtomicU64,
}

impl CachingClient {
    pub fn new(inner: Arc<dyn UpstreamClient>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            slots: Arc::new(Mutex::new(HashMap::new())),
            generation: AtomicU64::new(0),
        }
    }

    /// Number of cached or in-flight entries
    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Cached payload, or the in-flight call to join
    async fn lookup(&self, request: &UpstreamRequest) -> Lookup {
        let mut slots = self.slots.lock().await;
        let now = Instant::now();

        match slots.get(request) {
            Some(Slot::Ready { payload, expires_at }) if *expires_at > now => {
                debug!("💾 Cache hit for {}", request);
                return Lookup::Hit(payload.clone());
            }
            Some(Slot::InFlight { generation, flight }) => {
                debug!("🔗 Joining in-flight call for {}", request);
                return Lookup::Wait {
                    generation: *generation,
                    flight: flight.clone(),
                };
            }
            _ => {}
        }

        slots.retain(|_, slot| match slot {
            Slot::Ready { expires_at, .. } => *expires_at > now,
            Slot::InFlight { .. } => true,
        });

        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let inner = Arc::clone(&self.inner);
        let task_slots = Arc::clone(&self.slots);
        let owned = request.clone();
        let ttl = self.ttl;
        let task = tokio::spawn(async move {
            let detached = CancellationToken::new();
            let result = inner.fetch(&owned, &detached).await;
            settle(&task_slots, &owned, generation, &result, ttl).await;
            result
        });
        let flight = task
            .map(|joined| {
                joined.unwrap_or_else(|e| {
                    Err(UpstreamError::Transport {
                        message: format!("upstream task failed: {}", e),
                    })
                })
            })
            .boxed()
            .shared();

        debug!("📡 Cache miss for {}, starting upstream call", request);
        slots.insert(
            request.clone(),
            Slot::InFlight {
                generation,
                flight: flight.clone(),
            },
        );
        Lookup::Wait { generation, flight }
    }
}

/// Replace the in-flight slot of `generation` with its outcome. A slot that
/// was already settled or replaced is left alone.
async fn settle(
    slots: &Mutex<HashMap<UpstreamRequest, Slot>>,
    request: &UpstreamRequest,
    generation: u64,
    result: &Result<UpstreamPayload>,
    ttl: Duration,
) {
    let mut slots = slots.lock().await;
    let current = matches!(
        slots.get(request),
        Some(Slot::InFlight { generation: g, .. }) if *g == generation
    );
    if !current {
        return;
    }

    match result {
        Ok(payload) => {
            slots.insert(
                request.clone(),
                Slot::Ready {
                    payload: payload.clone(),
                    expires_at: Instant::now() + ttl,
                },
            );
        }
        Err(_) => {
            slots.remove(request);
        }
    }
}

#[async_trait]
impl UpstreamClient for CachingClient {
    async fn fetch(
        &self,
        request: &UpstreamRequest,
        cancel: &CancellationToken,
    ) -> Result<UpstreamPayload> {
        if cancel.is_cancelled() {
            return Err(UpstreamError::Cancelled);
        }

        let (generation, flight) = match self.lookup(request).await {
            Lookup::Hit(payload) => return Ok(payload),
            Lookup::Wait { generation, flight } => (generation, flight),
        };

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(UpstreamError::Cancelled),
            result = flight => result,
        };

        // Normally a no-op; covers a flight task that panicked before settling
        settle(&self.slots, request, generation, &result, self.ttl).await;
        result
    }
}
