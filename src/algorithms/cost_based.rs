//! Cost-Based (§4.2.3).

use super::{NoEligibleBid, Router};
use crate::decision::{CostComponents, DecisionMetadata};
use crate::domain::{Bid, Call};
use crate::filter;
use crate::rules::Weights;

/// The ideal average call time (seconds) the capacity component peaks
/// at (§4.2.3: `1 - |avg - 180| / 180`).
const IDEAL_AVG_CALL_TIME_SECS: f64 = 180.0;

#[derive(Debug, Clone, Copy)]
pub struct CostBasedRouter {
    weights: Weights,
}

impl CostBasedRouter {
    /// Construct a router with the given raw weights; they are
    /// re-normalized immediately so they sum to 1.0 within 1 ulp
    /// (§8 invariant 5).
    pub fn new(quality_weight: f64, price_weight: f64, capacity_weight: f64) -> Self {
        CostBasedRouter {
            weights: Weights::new(quality_weight, price_weight, capacity_weight).normalized(),
        }
    }

    fn quality(bid: &Bid) -> f64 {
        let q = (bid.quality.conversion_rate
            + (1.0 - bid.quality.fraud_score)
            + bid.quality.historical_rating / 5.0)
            / 3.0;
        q.clamp(0.0, 1.0)
    }

    fn price(bid: &Bid, min: f64, max: f64) -> f64 {
        if min == max {
            return 1.0;
        }
        1.0 - (bid.amount - min) / (max - min)
    }

    fn capacity(bid: &Bid) -> f64 {
        if bid.quality.average_call_time_secs == 0.0 {
            return 0.5;
        }
        let raw = 1.0
            - (bid.quality.average_call_time_secs - IDEAL_AVG_CALL_TIME_SECS).abs()
                / IDEAL_AVG_CALL_TIME_SECS;
        raw.clamp(0.0, 1.0)
    }
}

impl Router for CostBasedRouter {
    fn algorithm(&self) -> &'static str {
        "cost-based"
    }

    fn route(
        &self,
        _call: &Call,
        active_bids: &[Bid],
    ) -> Result<(Bid, f64, DecisionMetadata), NoEligibleBid> {
        if active_bids.is_empty() {
            return Err(NoEligibleBid);
        }

        let (min, max) = filter::price_range(active_bids);

        let components: Vec<CostComponents> = active_bids
            .iter()
            .map(|b| {
                let quality = Self::quality(b);
                let price = Self::price(b, min, max);
                let capacity = Self::capacity(b);
                let total = self.weights.quality * quality
                    + self.weights.price * price
                    + self.weights.capacity * capacity;
                CostComponents { bid_id: b.id, quality, price, capacity, total }
            })
            .collect();

        // Winner: maximal total, ties broken by input order — `max_by`
        // returns the *last* maximal element, so iterate in reverse to
        // get the first-in-input-order winner on ties.
        let (winner_idx, winner) = components
            .iter()
            .enumerate()
            .rev()
            .max_by(|(_, a), (_, b)| {
                a.total.partial_cmp(&b.total).unwrap_or(std::cmp::Ordering::Equal)
            })
            .expect("active_bids is non-empty");

        let score = winner.total.clamp(0.0, 1.0);

        Ok((
            active_bids[winner_idx].clone(),
            score,
            DecisionMetadata::CostBased { components, weights: self.weights.into() },
        ))
    }
}
