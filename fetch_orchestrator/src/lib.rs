//! Concurrent, role-keyed fan-out of upstream calls for one entrypoint
//! invocation.

use chrono::{DateTime, Utc};
use espn_client::{UpstreamClient, UpstreamError, UpstreamPayload, UpstreamRequest};
use futures::future::join_all;
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub use config_manager::AggregationPolicy;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrchestratorError {
    #[error("Upstream call '{role}' failed: {source}")]
    Upstream { role: String, source: UpstreamError },
    #[error("Request cancelled")]
    Cancelled,
    #[error("Fetch plan declares role '{0}' more than once")]
    DuplicateRole(String),
    #[error("Role '{0}' is not part of the aggregate")]
    MissingRole(String),
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;

/// One upstream call in a plan
#[derive(Debug, Clone)]
pub struct PlannedCall {
    pub role: String,
    pub request: UpstreamRequest,
    /// Whether the entrypoint can produce any output without this call
    pub required: bool,
}

/// The upstream calls an entrypoint needs, each under a unique role name
#[derive(Debug, Clone, Default)]
pub struct FetchPlan {
    calls: Vec<PlannedCall>,
}

impl FetchPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, role: impl Into<String>, request: UpstreamRequest) -> Self {
        self.calls.push(PlannedCall {
            role: role.into(),
            request,
            required: true,
        });
        self
    }

    pub fn optional(mut self, role: impl Into<String>, request: UpstreamRequest) -> Self {
        self.calls.push(PlannedCall {
            role: role.into(),
            request,
            required: false,
        });
        self
    }

    pub fn calls(&self) -> &[PlannedCall] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    fn check_roles(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for call in &self.calls {
            if !seen.insert(call.role.as_str()) {
                return Err(OrchestratorError::DuplicateRole(call.role.clone()));
            }
        }
        Ok(())
    }
}

/// Settled results of a plan, keyed by role
#[derive(Debug, Clone)]
pub struct Aggregate {
    payloads: BTreeMap<String, UpstreamPayload>,
    failures: BTreeMap<String, UpstreamError>,
    settled_at: DateTime<Utc>,
}

impl Aggregate {
    pub fn get(&self, role: &str) -> Option<&UpstreamPayload> {
        self.payloads.get(role)
    }

    /// Payload of a role the plan marked required
    pub fn require(&self, role: &str) -> Result<&UpstreamPayload> {
        self.payloads
            .get(role)
            .ok_or_else(|| OrchestratorError::MissingRole(role.to_string()))
    }

    /// Optional calls that failed under best-effort aggregation
    pub fn failures(&self) -> &BTreeMap<String, UpstreamError> {
        &self.failures
    }

    pub fn degraded_roles(&self) -> Vec<String> {
        self.failures.keys().cloned().collect()
    }

    /// When the last call settled
    pub fn settled_at(&self) -> DateTime<Utc> {
        self.settled_at
    }
}

/// Issues every call of a [`FetchPlan`] concurrently and aggregates the
/// outcome under an [`AggregationPolicy`].
#[derive(Clone)]
pub struct FetchOrchestrator {
    client: Arc<dyn UpstreamClient>,
    policy: AggregationPolicy,
}

impl FetchOrchestrator {
    pub fn new(client: Arc<dyn UpstreamClient>, policy: AggregationPolicy) -> Self {
        Self { client, policy }
    }

    /// Run a plan.
    ///
    /// The aggregate is keyed by role, so its contents never depend on the
    /// order in which calls complete. Cancelling `cancel` abandons every
    /// outstanding call.
    pub async fn execute(&self, plan: FetchPlan, cancel: &CancellationToken) -> Result<Aggregate> {
        plan.check_roles()?;
        if cancel.is_cancelled() {
            return Err(OrchestratorError::Cancelled);
        }

        // Siblings share a child token so a fail-fast abort does not touch the caller's token
        let calls = cancel.child_token();
        let _abort_on_drop = calls.clone().drop_guard();

        debug!(
            "🚀 Fetching {} upstream calls ({:?})",
            plan.len(),
            plan.calls().iter().map(|c| c.role.as_str()).collect::<Vec<_>>()
        );

        let aggregate = match self.policy {
            AggregationPolicy::FailFast => self.fail_fast(&plan, &calls).await,
            AggregationPolicy::BestEffort => self.best_effort(&plan, &calls).await,
        };

        if cancel.is_cancelled() {
            return Err(OrchestratorError::Cancelled);
        }
        aggregate
    }

    async fn fail_fast(&self, plan: &FetchPlan, calls: &CancellationToken) -> Result<Aggregate> {
        let mut pending: FuturesUnordered<_> = plan
            .calls()
            .iter()
            .map(|call| async move { (call, self.client.fetch(&call.request, calls).await) })
            .collect();

        let mut payloads = BTreeMap::new();
        while let Some((call, result)) = pending.next().await {
            match result {
                Ok(payload) => {
                    payloads.insert(call.role.clone(), payload);
                }
                Err(source) => {
                    warn!(
                        "❌ '{}' failed, abandoning {} sibling calls: {}",
                        call.role,
                        pending.len(),
                        source
                    );
                    calls.cancel();
                    return Err(upstream_failure(&call.role, source));
                }
            }
        }

        Ok(Aggregate {
            payloads,
            failures: BTreeMap::new(),
            settled_at: Utc::now(),
        })
    }

    async fn best_effort(&self, plan: &FetchPlan, calls: &CancellationToken) -> Result<Aggregate> {
        let results = join_all(
            plan.calls()
                .iter()
                .map(|call| self.client.fetch(&call.request, calls)),
        )
        .await;

        let mut payloads = BTreeMap::new();
        let mut failures = BTreeMap::new();

        // Plan order, so the reported failure does not depend on timing
        for (call, result) in plan.calls().iter().zip(results) {
            match result {
                Ok(payload) => {
                    payloads.insert(call.role.clone(), payload);
                }
                Err(source) if call.required => {
                    warn!("❌ Required call '{}' failed: {}", call.role, source);
                    return Err(upstream_failure(&call.role, source));
                }
                Err(source) => {
                    warn!("⚠️ Optional call '{}' failed, degrading: {}", call.role, source);
                    failures.insert(call.role.clone(), source);
                }
            }
        }

        if !failures.is_empty() {
            info!(
                "📉 Returning degraded aggregate without {:?}",
                failures.keys().collect::<Vec<_>>()
            );
        }

        Ok(Aggregate {
            payloads,
            failures,
            settled_at: Utc::now(),
        })
    }
}

fn upstream_failure(role: &str, source: UpstreamError) -> OrchestratorError {
    match source {
        UpstreamError::Cancelled => OrchestratorError::Cancelled,
        source => OrchestratorError::Upstream {
            role: role.to_string(),
            source,
        },
    }
}
