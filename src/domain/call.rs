use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A routable lead (§3 Call).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Call {
    pub id: Uuid,
    pub source_number: String,
    pub destination_number: String,
    pub direction: Direction,
    pub seller_id: Uuid,
    /// Set once routing assigns a buyer; empty before routing for a
    /// marketplace call.
    pub buyer_id: Option<Uuid>,
    pub location: Location,
    pub status: CallStatus,
    /// Set to the winning bid's ID on a successful `Pending → Queued`
    /// transition (§4.5 step 9).
    pub route_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inbound/outbound, matched verbatim against `BidCriteria::call_type`
/// entries (§4.2.2) via `as_str`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub country: String,
    pub state: String,
}

/// The call lifecycle DAG (§3, §4.5):
/// `Pending → Queued → Ringing → InProgress → {Completed, Failed,
/// NoAnswer, Busy, Canceled}`. Status advances monotonically; only
/// the routing core's own `Pending → Queued` edge is exercised by this
/// crate — the remaining edges are driven by the out-of-scope
/// telephony hand-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    Pending,
    Queued,
    Ringing,
    InProgress,
    Completed,
    Failed,
    NoAnswer,
    Busy,
    Canceled,
}

impl CallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Pending => "pending",
            CallStatus::Queued => "queued",
            CallStatus::Ringing => "ringing",
            CallStatus::InProgress => "in_progress",
            CallStatus::Completed => "completed",
            CallStatus::Failed => "failed",
            CallStatus::NoAnswer => "no_answer",
            CallStatus::Busy => "busy",
            CallStatus::Canceled => "canceled",
        }
    }
}
