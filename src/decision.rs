//! Decision Record Builder (C6, §4.6) and the `RoutingDecision`
//! artifact (§3).
//!
//! The source's free-form metadata map is re-expressed as a tagged
//! `DecisionMetadata` enum per DESIGN NOTES §9, mirroring the
//! teacher's `smart_router::RouteDecision` (`model`, `upstream_url`,
//! `strategy_used`, `reason`) generalized to this spec's fields.

use crate::domain::{Bid, Call};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// The immutable outcome of one successful `RouteCall` (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub call_id: Uuid,
    pub bid_id: Uuid,
    pub buyer_id: Uuid,
    /// Present for marketplace calls (§3, GLOSSARY); `None` otherwise.
    pub seller_id: Option<Uuid>,
    pub algorithm: String,
    pub score: f64,
    pub amount: f64,
    /// A short human-readable string, e.g. `"Optimal cost-quality
    /// balance (score: 0.73)"`. Consumers must not parse this —
    /// machine-readable context lives in `metadata` (§4.6).
    pub reason: String,
    pub timestamp: DateTime<Utc>,
    #[serde(with = "latency_nanos")]
    pub latency: Duration,
    pub metadata: DecisionMetadata,
}

/// Per-algorithm scoring breakdown (DESIGN NOTES §9). Consumers
/// pattern-match on the variant rather than reflecting over an
/// untyped map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum DecisionMetadata {
    RoundRobin { index: usize, total: usize },
    SkillBased { scores: Vec<SkillScore> },
    CostBased { components: Vec<CostComponents>, weights: NormalizedWeights },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillScore {
    pub bid_id: Uuid,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostComponents {
    pub bid_id: Uuid,
    pub quality: f64,
    pub price: f64,
    pub capacity: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NormalizedWeights {
    pub quality: f64,
    pub price: f64,
    pub capacity: f64,
}

impl From<crate::rules::Weights> for NormalizedWeights {
    fn from(w: crate::rules::Weights) -> Self {
        NormalizedWeights { quality: w.quality, price: w.price, capacity: w.capacity }
    }
}

/// Pure assembly of the decision record (C6, §4.6): never fails once
/// algorithm output is in hand.
pub struct DecisionBuilder;

impl DecisionBuilder {
    /// Assemble the immutable decision record for a winning `bid` on
    /// `call`, scored `score` by `algorithm`, taking `latency` to
    /// produce.
    pub fn build(
        call: &Call,
        bid: &Bid,
        algorithm: &str,
        score: f64,
        metadata: DecisionMetadata,
        reason: String,
        timestamp: DateTime<Utc>,
        latency: Duration,
    ) -> RoutingDecision {
        RoutingDecision {
            call_id: call.id,
            bid_id: bid.id,
            buyer_id: bid.buyer_id,
            seller_id: Some(call.seller_id),
            algorithm: algorithm.to_string(),
            score,
            amount: bid.amount,
            reason,
            timestamp,
            latency,
            metadata,
        }
    }
}

mod latency_nanos {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u128(d.as_nanos())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let nanos = u128::deserialize(d)?;
        Ok(Duration::from_nanos(nanos.min(u64::MAX as u128) as u64))
    }
}
