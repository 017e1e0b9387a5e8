//! Rule Store (C5, §4.4).
//!
//! Holds the current `RoutingRules` and its derived router behind one
//! `ArcSwap<Snapshot>`, grounded on the pack's `ArcSwap<CompiledPolicy>`
//! idiom (`labiium-edurouter/src/engine.rs`; also depended on by
//! `cowprotocol-services` and `smoelius-litellm-rs`) rather than the
//! teacher's own `DashMap`/`RwLock` shape, which is built for
//! *per-token* maps and doesn't fit a single hot-swapped pair. Readers
//! never block: `snapshot()` is a single atomic load, so many
//! concurrent `RouteCall`s can take it without contending with each
//! other or with a concurrent `update`.

use crate::algorithms::Router;
use crate::error::RoutingError;
use crate::registry;
use crate::rules::RoutingRules;
use arc_swap::ArcSwap;
use std::sync::Arc;

/// The `(rules, router)` pair published atomically (§4.4, §9).
pub struct Snapshot {
    pub rules: RoutingRules,
    pub router: Arc<dyn Router>,
}

pub struct RuleStore {
    current: ArcSwap<Snapshot>,
}

impl RuleStore {
    /// Start with the given rules (or round-robin defaults if `None`).
    pub fn new(rules: Option<RoutingRules>) -> Self {
        let rules = rules.unwrap_or_default();
        let router = registry::build(Some(&rules));
        RuleStore { current: ArcSwap::from_pointee(Snapshot { rules, router }) }
    }

    /// A stable `(rules, router)` snapshot, obtained under a shared
    /// critical section that is released before any I/O (§4.4). The
    /// returned `Arc` keeps the snapshot alive even if a concurrent
    /// `update` swaps in a new one immediately after this call
    /// returns — the caller's in-flight decision always sees the pair
    /// it snapshotted (§5 "Rule swap atomicity", §8 invariant 8).
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Atomically install new rules and their derived router (§4.4).
    /// Rejects `None` with `InvalidRules` rather than silently keeping
    /// the old snapshot.
    pub fn update(&self, rules: Option<RoutingRules>) -> Result<(), RoutingError> {
        let Some(rules) = rules else {
            return Err(RoutingError::invalid_rules("rules must not be nil"));
        };
        let router = registry::build(Some(&rules));
        self.current.store(Arc::new(Snapshot { rules, router }));
        Ok(())
    }
}

impl Default for RuleStore {
    fn default() -> Self {
        RuleStore::new(None)
    }
}
