//! In-memory collaborator fakes for black-box integration tests.
//!
//! Grounded on the teacher's own `LoadBalancer`'s `DashMap`-backed
//! in-memory state, adapted to the async `CallStore`/`BidStore`
//! traits with `tokio::sync::Mutex`.

use async_trait::async_trait;
use routing_engine::{
    Bid, BidStatus, Call, CallStatus, NotFound, RoutingDecision, UpdateOutcome,
};
use std::collections::HashMap;
use std::sync::Mutex as StdMutex;
use std::time::Duration;
use uuid::Uuid;

#[derive(Default)]
pub struct FakeCalls {
    inner: StdMutex<HashMap<Uuid, Call>>,
}

impl FakeCalls {
    pub fn insert(&self, call: Call) {
        self.inner.lock().unwrap().insert(call.id, call);
    }

    pub fn get(&self, id: Uuid) -> Call {
        self.inner.lock().unwrap().get(&id).cloned().expect("call present")
    }
}

#[async_trait]
impl routing_engine::CallStore for FakeCalls {
    async fn get_by_id(&self, id: Uuid) -> Result<Call, NotFound> {
        self.inner.lock().unwrap().get(&id).cloned().ok_or(NotFound)
    }

    async fn update_with_status_check(
        &self,
        call: &Call,
        expected_status: CallStatus,
    ) -> anyhow::Result<UpdateOutcome> {
        let mut inner = self.inner.lock().unwrap();
        let current = inner.get(&call.id).expect("call exists");
        if current.status != expected_status {
            return Ok(UpdateOutcome::StatusMismatch);
        }
        inner.insert(call.id, call.clone());
        Ok(UpdateOutcome::Ok)
    }

    async fn list_by_status(&self, status: CallStatus) -> anyhow::Result<Vec<Call>> {
        Ok(self.inner.lock().unwrap().values().filter(|c| c.status == status).cloned().collect())
    }
}

#[derive(Default)]
pub struct FakeBids {
    inner: StdMutex<HashMap<Uuid, Bid>>,
}

impl FakeBids {
    pub fn insert(&self, bid: Bid) {
        self.inner.lock().unwrap().insert(bid.id, bid);
    }

    pub fn get(&self, id: Uuid) -> Bid {
        self.inner.lock().unwrap().get(&id).cloned().expect("bid present")
    }
}

#[async_trait]
impl routing_engine::BidStore for FakeBids {
    async fn get_active_bids_for_call(&self, call_id: Uuid) -> anyhow::Result<Vec<Bid>> {
        let mut bids: Vec<Bid> =
            self.inner.lock().unwrap().values().filter(|b| b.call_id == call_id).cloned().collect();
        bids.sort_by_key(|b| b.placed_at);
        Ok(bids)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Bid, NotFound> {
        self.inner.lock().unwrap().get(&id).cloned().ok_or(NotFound)
    }

    async fn update(&self, bid: &Bid) -> anyhow::Result<()> {
        self.inner.lock().unwrap().insert(bid.id, bid.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingMetrics {
    pub decisions: StdMutex<Vec<RoutingDecision>>,
}

#[async_trait]
impl routing_engine::Metrics for RecordingMetrics {
    async fn record_decision(&self, decision: &RoutingDecision) {
        self.decisions.lock().unwrap().push(decision.clone());
    }

    async fn record_latency(&self, _algorithm: &str, _duration: Duration) {}
}

pub fn sample_call(status: CallStatus, direction: routing_engine::Direction) -> Call {
    Call {
        id: Uuid::new_v4(),
        source_number: "+15551230000".into(),
        destination_number: "+15551230001".into(),
        direction,
        seller_id: Uuid::new_v4(),
        buyer_id: None,
        location: routing_engine::domain::Location { country: "US".into(), state: "CA".into() },
        status,
        route_id: None,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    }
}

pub fn sample_bid(call_id: Uuid, amount: f64) -> Bid {
    Bid {
        id: Uuid::new_v4(),
        call_id,
        buyer_id: Uuid::new_v4(),
        amount,
        criteria: routing_engine::domain::BidCriteria {
            call_type: vec!["inbound".into()],
            geography: routing_engine::domain::Geography::default(),
            keywords: vec![],
            max_budget: 100.0,
        },
        quality: routing_engine::domain::BidQuality {
            conversion_rate: 0.5,
            historical_rating: 5.0,
            fraud_score: 0.1,
            average_call_time_secs: 180.0,
        },
        status: BidStatus::Active,
        placed_at: chrono::Utc::now(),
        expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
    }
}
