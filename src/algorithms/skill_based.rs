//! Skill-Based (§4.2.2).

use super::{NoEligibleBid, Router};
use crate::decision::{DecisionMetadata, SkillScore};
use crate::domain::{Bid, Call};

/// The inherited divisor in the §4.2.2 scoring formula. The source has
/// no explanatory comment for this constant (§9 Open Questions); it is
/// preserved verbatim rather than re-derived.
const SKILL_SCORE_NORMALIZER: f64 = 4.5;

#[derive(Debug, Default)]
pub struct SkillBasedRouter;

impl SkillBasedRouter {
    pub fn new() -> Self {
        Self
    }

    /// Score a single bid against `call` per §4.2.2. Ineligible bids
    /// (direction mismatch) score 0.
    fn is_eligible(call: &Call, bid: &Bid) -> bool {
        bid.criteria.call_type.iter().any(|ct| ct == call.direction.as_str())
    }

    fn score(call: &Call, bid: &Bid) -> f64 {
        if !Self::is_eligible(call, bid) {
            return 0.0;
        }
        let geo_bonus = if bid.criteria.geography.states.iter().any(|s| s == &call.location.state) {
            0.5
        } else {
            0.0
        };
        let s = 2.0 * bid.quality.conversion_rate
            + (1.0 - bid.quality.fraud_score)
            + bid.quality.historical_rating / 5.0
            + geo_bonus;
        (s / SKILL_SCORE_NORMALIZER).min(1.0)
    }
}

impl Router for SkillBasedRouter {
    fn algorithm(&self) -> &'static str {
        "skill-based"
    }

    fn route(
        &self,
        call: &Call,
        active_bids: &[Bid],
    ) -> Result<(Bid, f64, DecisionMetadata), NoEligibleBid> {
        if active_bids.is_empty() {
            return Err(NoEligibleBid);
        }

        let scores: Vec<SkillScore> = active_bids
            .iter()
            .map(|b| SkillScore { bid_id: b.id, score: Self::score(call, b) })
            .collect();
        let eligible: Vec<bool> = active_bids.iter().map(|b| Self::is_eligible(call, b)).collect();

        if !eligible.iter().any(|&e| e) {
            return Err(NoEligibleBid);
        }

        // Stable sort: eligible bids before ineligible ones (which
        // "never win", §4.2.2), then by descending score, keeping
        // input order on ties.
        let mut indexed: Vec<usize> = (0..active_bids.len()).collect();
        indexed.sort_by(|&a, &b| {
            eligible[b].cmp(&eligible[a]).then_with(|| {
                scores[b].score.partial_cmp(&scores[a].score).unwrap_or(std::cmp::Ordering::Equal)
            })
        });

        let winner_idx = indexed[0];
        let winner_score = scores[winner_idx].score;

        Ok((
            active_bids[winner_idx].clone(),
            winner_score,
            DecisionMetadata::SkillBased { scores },
        ))
    }
}
