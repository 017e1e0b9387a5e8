//! External collaborator interfaces (§6).
//!
//! The teacher talks to `sqlx::PgPool`/`redis` directly rather than
//! through an abstract repository trait, so this module is enriched
//! from the rest of the pack's repository-trait idiom (`async_trait`
//! storage/service boundaries used throughout the retrieved repos) —
//! the routing core depends only on these traits, never on a concrete
//! store, per §1 ("persistence schema... out of scope; they appear
//! only as external collaborator interfaces").

use crate::decision::RoutingDecision;
use crate::domain::{Bid, Call, CallStatus};
use async_trait::async_trait;
use std::time::Duration;
use uuid::Uuid;

/// A call was not found by `CallStore::get_by_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("call not found")]
pub struct NotFound;

/// The outcome of a compare-and-set update (§6, GLOSSARY "CAS on
/// status").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Ok,
    /// The row's current status no longer equals the expected status
    /// passed to `update_with_status_check` (§4.5 step 10).
    StatusMismatch,
}

/// Call persistence (§6). Implementations own the storage format;
/// this core only requires atomic CAS semantics on `status`.
#[async_trait]
pub trait CallStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Call, NotFound>;

    /// Persist `call` only if its stored status still equals
    /// `expected_status` (compare-and-set). Returns
    /// `UpdateOutcome::StatusMismatch` — not an error — when the row
    /// moved out from under the caller; that's the expected outcome
    /// of a lost claim-and-route race (§4.5 step 10, §8 invariant 1).
    async fn update_with_status_check(
        &self,
        call: &Call,
        expected_status: crate::domain::CallStatus,
    ) -> anyhow::Result<UpdateOutcome>;

    /// Calls currently in `status` (§10.8). Used by
    /// [`crate::reconcile::sweep`] to find `Queued` calls left behind
    /// by a `PartialCommit`; not part of the `RouteCall` path itself.
    async fn list_by_status(&self, status: CallStatus) -> anyhow::Result<Vec<Call>>;
}

/// Bid persistence (§6).
#[async_trait]
pub trait BidStore: Send + Sync {
    /// Bids whose `status == Active` *and* `expires_at > now` at
    /// query time (GLOSSARY "Active bid") — the activeness half of
    /// C2's filter is already applied by the time this returns; the
    /// coordinator still runs them through [`crate::filter`] as a
    /// defensive second pass in case a caller wires in a looser store.
    async fn get_active_bids_for_call(&self, call_id: Uuid) -> anyhow::Result<Vec<Bid>>;

    async fn get_by_id(&self, id: Uuid) -> Result<Bid, NotFound>;

    async fn update(&self, bid: &Bid) -> anyhow::Result<()>;
}

/// Best-effort telemetry (§6). A failure here must never fail the
/// surrounding `RouteCall` (§4.5 step 12, §7 "Metrics failures are
/// swallowed").
#[async_trait]
pub trait Metrics: Send + Sync {
    async fn record_decision(&self, decision: &RoutingDecision);

    async fn record_latency(&self, algorithm: &str, duration: Duration);
}

/// A `Metrics` implementation that drops everything — the default for
/// callers that don't care about telemetry, mirroring the
/// "best-effort, may be no-op" language in §6.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

#[async_trait]
impl Metrics for NoopMetrics {
    async fn record_decision(&self, _decision: &RoutingDecision) {}

    async fn record_latency(&self, _algorithm: &str, _duration: Duration) {}
}
