//! Routing Engine — the real-time call-auction routing core.
//!
//! Pluggable selection algorithms, the claim-and-route transaction
//! protocol, hot-swappable configuration, and the observable
//! `RoutingDecision` record. HTTP/gRPC delivery, persistence, consent
//! lookup, audit chains, telemetry sinks, and bid-ingestion are all
//! adjacent subsystems that live outside this crate — they are
//! represented here only by the collaborator traits in
//! [`collaborators`].
//!
//! An application embedding this crate installs its own `tracing`
//! subscriber (the core only emits events, per §10.2); a `fmt`
//! subscriber from `tracing-subscriber` is the simplest choice:
//!
//! ```
//! use routing_engine::algorithms::Router;
//! use routing_engine::{AlgorithmTag, RoutingRules, RuleStore};
//!
//! tracing_subscriber::fmt().with_test_writer().try_init().ok();
//!
//! let rules = RoutingRules { algorithm: AlgorithmTag::SkillBased, ..Default::default() };
//! let store = RuleStore::new(Some(rules));
//! assert_eq!(store.snapshot().router.algorithm(), "skill-based");
//! ```

pub mod algorithms;
pub mod clock;
pub mod collaborators;
pub mod coordinator;
pub mod decision;
pub mod domain;
pub mod error;
pub mod filter;
pub mod reconcile;
pub mod registry;
pub mod rule_store;
pub mod rules;

pub use clock::{Clock, SystemClock};
pub use collaborators::{BidStore, CallStore, Metrics, NotFound, UpdateOutcome};
pub use coordinator::{RouteOutcome, RoutingCoordinator};
pub use decision::{DecisionMetadata, RoutingDecision};
pub use domain::{Bid, BidStatus, Call, CallStatus, Direction};
pub use error::RoutingError;
pub use reconcile::SweepReport;
pub use rule_store::RuleStore;
pub use rules::{AlgorithmTag, RoutingRules, Weights};
