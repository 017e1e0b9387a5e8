use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A buyer's offer on one call (§3 Bid).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bid {
    pub id: Uuid,
    pub call_id: Uuid,
    pub buyer_id: Uuid,
    pub amount: f64,
    pub criteria: BidCriteria,
    pub quality: BidQuality,
    pub status: BidStatus,
    pub placed_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Bid {
    /// An active bid per the GLOSSARY: `status == Active` and
    /// `expires_at > now`. The filter (§4.1) additionally applies the
    /// `status` half of this check; callers that need the full
    /// definition (e.g. a `BidStore::get_active_bids_for_call`
    /// implementation) should also check `expires_at`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.status == BidStatus::Active && self.expires_at > now
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidCriteria {
    /// Accepted call directions, matched against `Call::direction`
    /// (§4.2.2) — e.g. `["inbound"]`, `["inbound", "outbound"]`.
    pub call_type: Vec<String>,
    pub geography: Geography,
    pub keywords: Vec<String>,
    pub max_budget: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Geography {
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub states: Vec<String>,
}

/// Read-only inputs to selection (§3 invariant). `conversion_rate` ∈
/// [0,1], `historical_rating` ∈ [0,10], `fraud_score` ∈ [0,1],
/// `average_call_time_secs` in seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BidQuality {
    pub conversion_rate: f64,
    pub historical_rating: f64,
    pub fraud_score: f64,
    pub average_call_time_secs: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidStatus {
    Active,
    Won,
    Lost,
    Expired,
    Canceled,
}

impl BidStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BidStatus::Active => "active",
            BidStatus::Won => "won",
            BidStatus::Lost => "lost",
            BidStatus::Expired => "expired",
            BidStatus::Canceled => "canceled",
        }
    }
}
