//! Bid Filter (C2, §4.1).
//!
//! Pure, non-blocking CPU work (§5) over an already-fetched slice of
//! bids — no repository calls here. Shaped after the teacher's
//! `parse_upstreams`: a small free function that degrades to an empty
//! result rather than erroring on bad/empty input, leaving the caller
//! to interpret an empty set.

use crate::domain::Bid;
use chrono::{DateTime, Utc};

/// The subsequence of `bids` with `status == Active`, preserving input
/// order. `filter(filter(x)) == filter(x)` (§8 invariant 6) holds
/// trivially since the predicate has no side effects and is
/// idempotent on its own output.
pub fn active_bids(bids: &[Bid]) -> Vec<Bid> {
    bids.iter().filter(|b| b.status == crate::domain::BidStatus::Active).cloned().collect()
}

/// The full GLOSSARY "Active bid" definition: `status == Active` *and*
/// not yet expired as of `now`. The coordinator uses this rather than
/// [`active_bids`] since a store's `get_active_bids_for_call` is only
/// contractually required to apply the status half (§6).
pub fn active_bids_at(bids: &[Bid], now: DateTime<Utc>) -> Vec<Bid> {
    bids.iter().filter(|b| b.is_active_at(now)).cloned().collect()
}

/// `(min, max)` over bid amounts. Returns `(0.0, 0.0)` for an empty
/// slice; `min == max` is permitted and triggers the degenerate-range
/// handling documented on the cost-based algorithm (§4.2.3).
pub fn price_range(bids: &[Bid]) -> (f64, f64) {
    if bids.is_empty() {
        return (0.0, 0.0);
    }
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for b in bids {
        min = min.min(b.amount);
        max = max.max(b.amount);
    }
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BidCriteria, BidQuality, BidStatus, Geography};
    use chrono::Utc;
    use uuid::Uuid;

    fn bid(status: BidStatus, amount: f64) -> Bid {
        Bid {
            id: Uuid::new_v4(),
            call_id: Uuid::new_v4(),
            buyer_id: Uuid::new_v4(),
            amount,
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
            placed_at: Utc::now(),
            expires_at: Utc::now() + chrono::Duration::hours(1),
        }
    }

    #[test]
    fn keeps_only_active_in_order() {
        let bids = vec![
            bid(BidStatus::Active, 1.0),
            bid(BidStatus::Expired, 2.0),
            bid(BidStatus::Active, 3.0),
            bid(BidStatus::Won, 4.0),
        ];
        let active = active_bids(&bids);
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].amount, 1.0);
        assert_eq!(active[1].amount, 3.0);
    }

    #[test]
    fn idempotent() {
        let bids = vec![bid(BidStatus::Active, 1.0), bid(BidStatus::Lost, 2.0)];
        let once = active_bids(&bids);
        let twice = active_bids(&once);
        assert_eq!(once.len(), twice.len());
        assert_eq!(once[0].id, twice[0].id);
    }

    #[test]
    fn empty_active_set_is_empty() {
        let bids = vec![bid(BidStatus::Expired, 1.0), bid(BidStatus::Canceled, 2.0)];
        assert!(active_bids(&bids).is_empty());
    }

    #[test]
    fn price_range_empty_is_zero_zero() {
        assert_eq!(price_range(&[]), (0.0, 0.0));
    }

    #[test]
    fn price_range_degenerate_when_equal() {
        let bids = vec![bid(BidStatus::Active, 5.0), bid(BidStatus::Active, 5.0)];
        assert_eq!(price_range(&bids), (5.0, 5.0));
    }

    #[test]
    fn active_bids_at_excludes_expired() {
        let now = Utc::now();
        let mut fresh = bid(BidStatus::Active, 1.0);
        fresh.expires_at = now + chrono::Duration::hours(1);
        let mut stale = bid(BidStatus::Active, 2.0);
        stale.expires_at = now - chrono::Duration::seconds(1);
        let bids = vec![fresh.clone(), stale];
        let active = active_bids_at(&bids, now);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, fresh.id);
    }

    #[test]
    fn price_range_min_max() {
        let bids = vec![
            bid(BidStatus::Active, 3.0),
            bid(BidStatus::Active, 1.0),
            bid(BidStatus::Active, 9.0),
        ];
        assert_eq!(price_range(&bids), (1.0, 9.0));
    }
}
