//! Router Registry (C3, §4.3).
//!
//! Grounded on the teacher's `smart_router::select_route` dispatch
//! (`match strategy { ... }`), turned into a factory that builds a
//! fresh, boxed `Router` instance from a `RoutingRules` snapshot. Each
//! rebuild discards any prior round-robin cursor state (§4.2.1, §4.3).

use crate::algorithms::{CostBasedRouter, Router, RoundRobinRouter, SkillBasedRouter};
use crate::rules::{AlgorithmTag, RoutingRules};
use std::sync::Arc;

/// Build a `Router` for `rules`. An unknown algorithm tag — and the
/// absence of a `rules` object entirely, represented by `None` —
/// both fall back to round-robin (§4.3: "permissive").
pub fn build(rules: Option<&RoutingRules>) -> Arc<dyn Router> {
    let Some(rules) = rules else {
        return Arc::new(RoundRobinRouter::new());
    };
    match rules.algorithm {
        AlgorithmTag::RoundRobin | AlgorithmTag::Unknown => Arc::new(RoundRobinRouter::new()),
        AlgorithmTag::SkillBased => Arc::new(SkillBasedRouter::new()),
        AlgorithmTag::CostBased => {
            let w = rules.weights();
            Arc::new(CostBasedRouter::new(w.quality, w.price, w.capacity))
        }
    }
}
