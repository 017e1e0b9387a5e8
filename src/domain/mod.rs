//! The routable entities (§3): `Call` and `Bid`.
//!
//! Calls and bids are owned by external repositories (§3 "Ownership")
//! and are consumed by value during a routing call — this module only
//! defines their shape, not their persistence.

mod bid;
mod call;

pub use bid::{Bid, BidCriteria, BidQuality, BidStatus, Geography};
pub use call::{Call, CallStatus, Direction, Location};
