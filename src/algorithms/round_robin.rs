//! Round-Robin (§4.2.1).

use super::{NoEligibleBid, Router};
use crate::decision::DecisionMetadata;
use crate::domain::{Bid, Call};
use std::sync::atomic::{AtomicI64, Ordering};

/// Maintains a zero-initialized cursor starting at -1, advanced
/// `(k+1) mod |active|` on each call (§4.2.1). The cursor is
/// per-router-instance — rebuilding the router (C3) discards it — and
/// its increment is atomic per §5, matching the teacher's
/// `AtomicU64`-behind-`Arc` cursor in `LoadBalancer`/`smart_router`,
/// narrowed here to a single instance since this spec has one router
/// live at a time rather than one per token.
#[derive(Debug)]
pub struct RoundRobinRouter {
    cursor: AtomicI64,
}

impl Default for RoundRobinRouter {
    fn default() -> Self {
        RoundRobinRouter { cursor: AtomicI64::new(-1) }
    }
}

impl RoundRobinRouter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Router for RoundRobinRouter {
    fn algorithm(&self) -> &'static str {
        "round-robin"
    }

    fn route(
        &self,
        _call: &Call,
        active_bids: &[Bid],
    ) -> Result<(Bid, f64, DecisionMetadata), NoEligibleBid> {
        if active_bids.is_empty() {
            return Err(NoEligibleBid);
        }
        let total = active_bids.len() as i64;
        // `fetch_add` returns the value *before* the increment; adding
        // one more gives the post-increment cursor without a second
        // atomic op. Starting at -1 makes the first call land on 0.
        let prev = self.cursor.fetch_add(1, Ordering::SeqCst);
        let k = (prev + 1).rem_euclid(total);
        let bid = active_bids[k as usize].clone();
        Ok((
            bid,
            1.0,
            DecisionMetadata::RoundRobin { index: k as usize, total: active_bids.len() },
        ))
    }
}
