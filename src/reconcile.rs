//! Reconciliation sweep (§10.8) — supplemental to the core protocol.
//!
//! Grounded on `jobs::budget_checker::run_budget_check`'s shape: a
//! periodic, idempotent pass that re-reads a small amount of state and
//! repairs what it finds wrong, logging counts rather than individual
//! rows at `info`. Here it closes the one gap the claim-and-route
//! protocol can leave open — a `Queued` call whose winning bid never
//! made it to `Won` because step 11 (§4.5) failed or was cancelled
//! (`RouteOutcome::PartialCommit`).

use crate::collaborators::{BidStore, CallStore, Metrics, NotFound};
use crate::coordinator::RoutingCoordinator;
use crate::domain::{BidStatus, CallStatus};
use tracing::{debug, info, warn};

/// Counts from one [`sweep`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// `Queued` calls examined.
    pub examined: usize,
    /// Winning bids repaired from `Active` to `Won`.
    pub repaired: usize,
    /// Calls skipped because their bid was already in a terminal
    /// state, or had no `route_id` at all (shouldn't happen, but the
    /// sweep doesn't assume it can't).
    pub skipped: usize,
}

/// Find every `Queued` call whose winning bid is still `Active` and
/// commit it to `Won`. Safe to run concurrently with `RouteCall` and
/// with itself — it only ever writes a bid that is observed `Active`,
/// the same idempotent step 11 does.
pub async fn sweep<C, B, M>(coordinator: &RoutingCoordinator<C, B, M>) -> anyhow::Result<SweepReport>
where
    C: CallStore,
    B: BidStore,
    M: Metrics,
{
    let queued = coordinator.calls().list_by_status(CallStatus::Queued).await?;
    let mut report = SweepReport::default();

    for call in queued {
        report.examined += 1;
        let Some(bid_id) = call.route_id else {
            debug!(call_id = %call.id, "reconcile: queued call has no route_id, skipping");
            report.skipped += 1;
            continue;
        };

        let bid = match coordinator.bids().get_by_id(bid_id).await {
            Ok(bid) => bid,
            Err(NotFound) => {
                warn!(call_id = %call.id, bid_id = %bid_id, "reconcile: winning bid vanished");
                report.skipped += 1;
                continue;
            }
        };

        if bid.status != BidStatus::Active {
            report.skipped += 1;
            continue;
        }

        if coordinator.commit_winning_bid(&bid).await {
            report.repaired += 1;
        } else {
            report.skipped += 1;
        }
    }

    info!(
        examined = report.examined,
        repaired = report.repaired,
        skipped = report.skipped,
        "reconcile: sweep complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::collaborators::UpdateOutcome;
    use crate::domain::{BidCriteria, BidQuality, Call, Direction, Geography, Location};
    use crate::rule_store::RuleStore;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    #[derive(Default)]
    struct FakeCalls {
        calls: Mutex<HashMap<Uuid, Call>>,
    }

    #[async_trait]
    impl CallStore for FakeCalls {
        async fn get_by_id(&self, id: Uuid) -> Result<Call, NotFound> {
            self.calls.lock().unwrap().get(&id).cloned().ok_or(NotFound)
        }

        async fn update_with_status_check(
            &self,
            call: &Call,
            expected_status: CallStatus,
        ) -> anyhow::Result<UpdateOutcome> {
            let mut calls = self.calls.lock().unwrap();
            if calls.get(&call.id).unwrap().status != expected_status {
                return Ok(UpdateOutcome::StatusMismatch);
            }
            calls.insert(call.id, call.clone());
            Ok(UpdateOutcome::Ok)
        }

        async fn list_by_status(&self, status: CallStatus) -> anyhow::Result<Vec<Call>> {
            Ok(self.calls.lock().unwrap().values().filter(|c| c.status == status).cloned().collect())
        }
    }

    #[derive(Default)]
    struct FakeBids {
        bids: Mutex<HashMap<Uuid, crate::domain::Bid>>,
    }

    #[async_trait]
    impl BidStore for FakeBids {
        async fn get_active_bids_for_call(&self, _call_id: Uuid) -> anyhow::Result<Vec<crate::domain::Bid>> {
            Ok(vec![])
        }

        async fn get_by_id(&self, id: Uuid) -> Result<crate::domain::Bid, NotFound> {
            self.bids.lock().unwrap().get(&id).cloned().ok_or(NotFound)
        }

        async fn update(&self, bid: &crate::domain::Bid) -> anyhow::Result<()> {
            self.bids.lock().unwrap().insert(bid.id, bid.clone());
            Ok(())
        }
    }

    fn call(status: CallStatus, route_id: Option<Uuid>) -> Call {
        Call {
            id: Uuid::new_v4(),
            source_number: "+15551230000".into(),
            destination_number: "+15551230001".into(),
            direction: Direction::Inbound,
            seller_id: Uuid::new_v4(),
            buyer_id: None,
            location: Location { country: "US".into(), state: "CA".into() },
            status,
            route_id,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn bid(status: BidStatus) -> crate::domain::Bid {
        crate::domain::Bid {
            id: Uuid::new_v4(),
            call_id: Uuid::new_v4(),
            buyer_id: Uuid::new_v4(),
            amount: 5.0,
            criteria: BidCriteria {
                call_type: vec!["inbound".into()],
                geography: Geography::default(),
                keywords: vec![],
                max_budget: 100.0,
            },
            quality: BidQuality {
                conversion_rate: 0.5,
                historical_rating: 5.0,
                fraud_score: 0.1,
                average_call_time_secs: 180.0,
            },
            status,
            placed_at: chrono::Utc::now(),
            expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
        }
    }

    #[tokio::test]
    async fn repairs_a_partial_commit() {
        let calls = Arc::new(FakeCalls::default());
        let bids = Arc::new(FakeBids::default());
        let b = bid(BidStatus::Active);
        let c = call(CallStatus::Queued, Some(b.id));
        calls.calls.lock().unwrap().insert(c.id, c.clone());
        bids.bids.lock().unwrap().insert(b.id, b.clone());

        let coord = RoutingCoordinator::new(
            calls.clone(),
            bids.clone(),
            Arc::new(crate::collaborators::NoopMetrics),
            Arc::new(RuleStore::default()),
        )
        .with_clock(Arc::new(SystemClock));

        let report = sweep(&coord).await.unwrap();
        assert_eq!(report, SweepReport { examined: 1, repaired: 1, skipped: 0 });
        assert_eq!(bids.get_by_id(b.id).await.unwrap().status, BidStatus::Won);
    }

    #[tokio::test]
    async fn leaves_already_won_bids_alone() {
        let calls = Arc::new(FakeCalls::default());
        let bids = Arc::new(FakeBids::default());
        let b = bid(BidStatus::Won);
        let c = call(CallStatus::Queued, Some(b.id));
        calls.calls.lock().unwrap().insert(c.id, c.clone());
        bids.bids.lock().unwrap().insert(b.id, b.clone());

        let coord = RoutingCoordinator::new(
            calls.clone(),
            bids.clone(),
            Arc::new(crate::collaborators::NoopMetrics),
            Arc::new(RuleStore::default()),
        )
        .with_clock(Arc::new(SystemClock));

        let report = sweep(&coord).await.unwrap();
        assert_eq!(report, SweepReport { examined: 1, repaired: 0, skipped: 1 });
    }

    #[tokio::test]
    async fn no_queued_calls_is_a_quiet_no_op() {
        let calls = Arc::new(FakeCalls::default());
        let bids = Arc::new(FakeBids::default());
        let coord = RoutingCoordinator::new(
            calls,
            bids,
            Arc::new(crate::collaborators::NoopMetrics),
            Arc::new(RuleStore::default()),
        )
        .with_clock(Arc::new(SystemClock));

        let report = sweep(&coord).await.unwrap();
        assert_eq!(report, SweepReport::default());
    }
}
