//! Selection Algorithms (C1, §4.2).
//!
//! All algorithms share one contract: `route(call, active_bids) ->
//! (winner, score, metadata)`. They are pure apart from round-robin's
//! internal counter (§4.2.1) and fail with `RouterError::NoEligibleBid`
//! when their eligible subset is empty. Shaped after the teacher's
//! `smart_router::select_route` strategy dispatch, but raised to a
//! trait object so `RouterRegistry` (C3) can hot-swap instances
//! without the caller knowing which algorithm is live (§4.3, §4.4).

mod cost_based;
mod round_robin;
mod skill_based;

pub use cost_based::CostBasedRouter;
pub use round_robin::RoundRobinRouter;
pub use skill_based::SkillBasedRouter;

use crate::decision::DecisionMetadata;
use crate::domain::{Bid, Call};
use std::fmt;

/// An algorithm's eligible subset was empty (§4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoEligibleBid;

impl fmt::Display for NoEligibleBid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no eligible bid for this call under the current algorithm")
    }
}

impl std::error::Error for NoEligibleBid {}

/// One selection algorithm instance (§4.2). `route` takes
/// already-filtered active bids (the caller applies C2 first, per
/// §2's data-flow: "the router calls C2 then a C1 algorithm").
pub trait Router: Send + Sync {
    /// The algorithm tag this router implements, used to populate
    /// `RoutingDecision::algorithm`.
    fn algorithm(&self) -> &'static str;

    /// Select a winner among `active_bids` for `call`. `score` is
    /// always in `[0, 1]` (§8 invariant 3); `active_bids` must be
    /// non-empty or `NoEligibleBid` is returned unconditionally.
    fn route(
        &self,
        call: &Call,
        active_bids: &[Bid],
    ) -> Result<(Bid, f64, DecisionMetadata), NoEligibleBid>;
}
