//! Routing Coordinator (C4, §4.5) — the claim-and-route transaction.
//!
//! Grounded on the teacher's `AppState`-held, multi-collaborator
//! orchestration shape (`main.rs`'s `AppState` wiring `db`, `cache`,
//! `lb`, `pricing` together) and on `smart_router::select_route`'s
//! filter-then-dispatch flow, generalized into the 13-step protocol of
//! §4.5.

use crate::clock::{Clock, SystemClock};
use crate::collaborators::{BidStore, CallStore, Metrics, NotFound, UpdateOutcome};
use crate::decision::{DecisionBuilder, RoutingDecision};
use crate::domain::{BidStatus, CallStatus};
use crate::error::RoutingError;
use crate::filter;
use crate::rule_store::RuleStore;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// The result of one `RouteCall` invocation. Cancellation is not
/// modeled as a `RoutingError` — it isn't a caller fault or a storage
/// failure, it's a cooperative stop — so it surfaces as a distinct
/// `Ok` variant instead (§5 "Cancellation").
#[derive(Debug)]
pub enum RouteOutcome {
    /// Steps 1–13 all completed: the call is `Queued` and its winning
    /// bid is `Won`.
    Routed(RoutingDecision),
    /// Step 10 (the call CAS) succeeded but step 11 (marking the bid
    /// `Won`) did not complete — either it failed, or the caller's
    /// cancellation token fired after the commit point (§5, §7
    /// `PartialCommit`). The call is `Queued`; the bid may still be
    /// `Active`. Callers should retry the bid update (directly, or via
    /// [`crate::reconcile::sweep`]) rather than treating this as a
    /// failed route.
    PartialCommit(RoutingDecision),
    /// Cancelled before step 10; no state was changed (§5).
    Cancelled,
}

/// Orchestrates `RouteCall` (C4). Cheaply cloneable — holds only
/// `Arc`s to its collaborators and the rule store.
pub struct RoutingCoordinator<C, B, M> {
    calls: Arc<C>,
    bids: Arc<B>,
    metrics: Arc<M>,
    rules: Arc<RuleStore>,
    clock: Arc<dyn Clock>,
}

// A hand-written impl rather than `#[derive(Clone)]`: the derive macro
// would add `C: Clone, B: Clone, M: Clone` bounds, but every field is
// already an `Arc`, so the collaborator types themselves never need to
// be `Clone`.
impl<C, B, M> Clone for RoutingCoordinator<C, B, M> {
    fn clone(&self) -> Self {
        RoutingCoordinator {
            calls: self.calls.clone(),
            bids: self.bids.clone(),
            metrics: self.metrics.clone(),
            rules: self.rules.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl<C, B, M> RoutingCoordinator<C, B, M>
where
    C: CallStore,
    B: BidStore,
    M: Metrics,
{
    pub fn new(calls: Arc<C>, bids: Arc<B>, metrics: Arc<M>, rules: Arc<RuleStore>) -> Self {
        RoutingCoordinator { calls, bids, metrics, rules, clock: Arc::new(SystemClock) }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Accessors for [`crate::reconcile::sweep`], which needs to list
    /// and inspect collaborator state outside the `RouteCall` path.
    pub(crate) fn calls(&self) -> &Arc<C> {
        &self.calls
    }

    pub(crate) fn bids(&self) -> &Arc<B> {
        &self.bids
    }

    /// Run the claim-and-route protocol for `call_id` (§4.5). Honors
    /// `cancel` at every suspension point (§5).
    pub async fn route_call(
        &self,
        call_id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<RouteOutcome, RoutingError> {
        // Step 1 — start the latency timer.
        let t0 = self.clock.now_instant();

        if cancel.is_cancelled() {
            return Ok(RouteOutcome::Cancelled);
        }

        // Step 2 — fetch the call.
        let mut call = match self.calls.get_by_id(call_id).await {
            Ok(call) => call,
            Err(NotFound) => {
                warn!(%call_id, "route_call: call not found");
                return Err(RoutingError::call_not_found(call_id));
            }
        };

        if cancel.is_cancelled() {
            return Ok(RouteOutcome::Cancelled);
        }

        // Step 3 — the call must still be Pending.
        if call.status != CallStatus::Pending {
            warn!(%call_id, status = call.status.as_str(), "route_call: call not in a routable state");
            return Err(RoutingError::invalid_call_state(call_id, call.status.as_str()));
        }

        // Step 4 — fetch active bids.
        let bids = self.bids.get_active_bids_for_call(call_id).await.map_err(|e| {
            error!(%call_id, error = %e, "route_call: failed to fetch bids");
            RoutingError::internal("fetch_bids", e)
        })?;

        if cancel.is_cancelled() {
            return Ok(RouteOutcome::Cancelled);
        }

        // Step 5 — no bids at all.
        if bids.is_empty() {
            warn!(%call_id, "route_call: no bids on this call");
            return Err(RoutingError::no_bids(call_id, "no bids on this call"));
        }

        // C2 — the bid filter; defensive even though the store
        // contract already promises the status half of activeness
        // (§6, §4.1). `active_bids_at` also drops anything that has
        // expired since it was fetched.
        let active = filter::active_bids_at(&bids, self.clock.now_utc());
        if active.is_empty() {
            warn!(%call_id, fetched = bids.len(), "route_call: no active bids");
            return Err(RoutingError::no_bids(call_id, "no active bids"));
        }

        // Step 6 — snapshot (rules, router). This snapshot is used for
        // the remainder of the call even if `UpdateRoutingRules` swaps
        // in a new one concurrently (§5 "Rule swap atomicity", §8
        // invariant 8).
        let snapshot = self.rules.snapshot();

        if cancel.is_cancelled() {
            return Ok(RouteOutcome::Cancelled);
        }

        // Step 7 — run the algorithm.
        let (winner, score, metadata) = snapshot.router.route(&call, &active).map_err(|_| {
            warn!(%call_id, algorithm = snapshot.router.algorithm(), "route_call: no eligible bid");
            RoutingError::no_bids(call_id, "no eligible bid")
        })?;

        // Step 8 — build the decision.
        let algorithm = snapshot.router.algorithm();
        debug!(%call_id, bid_id = %winner.id, algorithm, score, "route_call: algorithm selected a winner");
        let reason = describe(algorithm, score);
        let latency = self.clock.now_instant().saturating_duration_since(t0);
        let decision = DecisionBuilder::build(
            &call,
            &winner,
            algorithm,
            score,
            metadata,
            reason,
            self.clock.now_utc(),
            latency,
        );

        if cancel.is_cancelled() {
            return Ok(RouteOutcome::Cancelled);
        }

        // Step 9 — stage the call transition.
        call.status = CallStatus::Queued;
        call.route_id = Some(winner.id);
        call.buyer_id = Some(winner.buyer_id);
        call.updated_at = self.clock.now_utc();

        // Step 10 — the linearization point: CAS the call from
        // Pending to Queued.
        let cas_result = self.calls.update_with_status_check(&call, CallStatus::Pending).await.map_err(
            |e| {
                error!(%call_id, bid_id = %winner.id, error = %e, "route_call: failed to commit call state");
                RoutingError::internal("commit_call", e)
            },
        )?;

        match cas_result {
            UpdateOutcome::StatusMismatch => {
                warn!(%call_id, bid_id = %winner.id, "route_call: lost the race, call already routed");
                return Err(RoutingError::already_routed(call_id));
            }
            UpdateOutcome::Ok => {}
        }

        // From here on the call is durably Queued. A cancellation past
        // this point must not be swallowed — it becomes PartialCommit
        // so the caller can retry step 11 (§5).
        if cancel.is_cancelled() {
            warn!(
                %call_id,
                bid_id = %winner.id,
                "route_call: cancelled after call commit, returning PartialCommit"
            );
            self.metrics.record_decision(&decision).await;
            return Ok(RouteOutcome::PartialCommit(decision));
        }

        // Step 11 — mark the winning bid Won.
        let bid_committed = self.commit_winning_bid(&winner).await;

        // Step 12 — best-effort metrics; never fails the operation.
        self.metrics.record_decision(&decision).await;
        self.metrics.record_latency(algorithm, latency).await;

        // Step 13.
        if bid_committed {
            info!(
                algorithm,
                call_id = %decision.call_id,
                bid_id = %decision.bid_id,
                score = decision.score,
                latency_ms = latency.as_millis() as u64,
                "route_call: routed"
            );
            Ok(RouteOutcome::Routed(decision))
        } else {
            warn!(
                algorithm,
                call_id = %decision.call_id,
                bid_id = %decision.bid_id,
                "route_call: call committed but bid commit failed, returning PartialCommit"
            );
            Ok(RouteOutcome::PartialCommit(decision))
        }
    }

    /// Step 11 in isolation, reusable by [`crate::reconcile::sweep`]
    /// to retry a `PartialCommit`. Returns `true` on success; storage
    /// failures are logged and reported as `false` rather than
    /// propagated, since a failed retry here is, at worst, still a
    /// `PartialCommit` (§7).
    pub(crate) async fn commit_winning_bid(&self, winning_bid: &crate::domain::Bid) -> bool {
        let mut bid = match self.bids.get_by_id(winning_bid.id).await {
            Ok(bid) => bid,
            Err(NotFound) => {
                error!(bid_id = %winning_bid.id, "commit_winning_bid: bid vanished after routing");
                return false;
            }
        };
        bid.status = BidStatus::Won;
        match self.bids.update(&bid).await {
            Ok(()) => true,
            Err(e) => {
                error!(bid_id = %bid.id, error = %e, "commit_winning_bid: failed to persist Won status");
                false
            }
        }
    }
}

fn describe(algorithm: &str, score: f64) -> String {
    match algorithm {
        "round-robin" => format!("Round-robin rotation (slot score: {score:.2})"),
        "skill-based" => format!("Best skill/quality match (score: {score:.2})"),
        "cost-based" => format!("Optimal cost-quality balance (score: {score:.2})"),
        other => format!("{other} selection (score: {score:.2})"),
    }
}
