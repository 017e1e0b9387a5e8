//! `RoutingRules` — selection configuration (§3, §6).
//!
//! Shaped after the teacher's `proxy::loadbalancer::CircuitBreakerConfig`:
//! a small `Deserialize` config struct where every field has a
//! `#[serde(default = ...)]` fallback, so a partial or legacy JSON
//! document still parses.

use serde::{Deserialize, Serialize};

fn default_algorithm() -> AlgorithmTag {
    AlgorithmTag::RoundRobin
}

fn default_weight_third() -> f64 {
    0.33
}

fn default_bool_false() -> bool {
    false
}

fn default_min_bid_amount() -> f64 {
    0.0
}

/// Selection configuration (§3). `weights` are re-normalized to sum
/// to 1 before use (`Weights::normalized`); an unknown or absent
/// algorithm tag defaults to round-robin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingRules {
    #[serde(default = "default_algorithm")]
    pub algorithm: AlgorithmTag,

    /// Parsed and stored for the upstream admission filter (§9 Open
    /// Questions); no shipped algorithm consults it (§10.4).
    #[serde(default = "default_min_bid_amount")]
    pub min_bid_amount: f64,

    #[serde(default = "default_weight_third")]
    pub quality_weight: f64,
    #[serde(default = "default_weight_third")]
    pub price_weight: f64,
    #[serde(default = "default_weight_third")]
    pub capacity_weight: f64,

    /// Optional skill-weight map (§3); reserved for a future
    /// skill-cost hybrid algorithm, unused by the algorithms in §4.2.
    #[serde(default)]
    pub skill_weights: std::collections::HashMap<String, f64>,

    /// Parsed and stored for the upstream admission filter (§9); not
    /// consulted by the selection algorithms (§10.4).
    #[serde(default = "default_bool_false")]
    pub require_consent: bool,
    #[serde(default = "default_bool_false")]
    pub geographic_match: bool,
}

impl Default for RoutingRules {
    fn default() -> Self {
        RoutingRules {
            algorithm: default_algorithm(),
            min_bid_amount: default_min_bid_amount(),
            quality_weight: default_weight_third(),
            price_weight: default_weight_third(),
            capacity_weight: default_weight_third(),
            skill_weights: Default::default(),
            require_consent: default_bool_false(),
            geographic_match: default_bool_false(),
        }
    }
}

impl RoutingRules {
    /// The cost-based weight vector, normalized per §4.2.3: if the
    /// three weights sum to 0, use `(0.33, 0.33, 0.34)`; otherwise
    /// divide each by the sum so they total 1.0.
    pub fn weights(&self) -> Weights {
        Weights::new(self.quality_weight, self.price_weight, self.capacity_weight).normalized()
    }
}

/// `algorithm` tag (§3). Unknown strings deserialize to `Unknown`
/// rather than failing, so `RouterRegistry::build` can apply the
/// "unknown → round-robin" fallback (§4.3) at the point of use instead
/// of at parse time — a malformed config document is still a valid
/// `RoutingRules` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlgorithmTag {
    RoundRobin,
    SkillBased,
    CostBased,
    #[serde(other)]
    Unknown,
}

/// The cost-based algorithm's quality/price/capacity weight triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub quality: f64,
    pub price: f64,
    pub capacity: f64,
}

impl Weights {
    pub fn new(quality: f64, price: f64, capacity: f64) -> Self {
        Weights { quality, price, capacity }
    }

    /// Normalize so the three components sum to 1.0 (§4.2.3, §8
    /// invariant 5). A zero sum falls back to `(0.33, 0.33, 0.34)`.
    pub fn normalized(self) -> Self {
        let sum = self.quality + self.price + self.capacity;
        if sum == 0.0 {
            return Weights::new(0.33, 0.33, 0.34);
        }
        Weights::new(self.quality / sum, self.price / sum, self.capacity / sum)
    }
}
