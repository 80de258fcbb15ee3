//! Weighted qualification scoring.
//!
//! Each judgment earns points (HIGHLY_QUALIFIED=4, QUALIFIED=3, MEETS=2,
//! NOT_QUALIFIED=0) multiplied by its list weight (minimum=2, preferred=1).
//! The score is earned / max × 100 rounded to two decimals, 0 when there is
//! nothing to score.

use serde::{Deserialize, Serialize};

use crate::models::screen::{ReasonStatus, ScreeningReason};

pub const MAX_POINTS: u32 = 4;
pub const MINIMUM_WEIGHT: u32 = 2;
pub const PREFERRED_WEIGHT: u32 = 1;

impl ReasonStatus {
    pub fn points(self) -> u32 {
        match self {
            ReasonStatus::HighlyQualified => 4,
            ReasonStatus::Qualified => 3,
            ReasonStatus::Meets => 2,
            ReasonStatus::NotQualified => 0,
        }
    }
}

/// Earned and attainable points for one judgment list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListScore {
    pub earned: u32,
    pub max: u32,
}

pub fn score_reasons(reasons: &[ScreeningReason], weight: u32) -> ListScore {
    ListScore {
        earned: reasons.iter().map(|r| r.status.points() * weight).sum(),
        max: reasons.len() as u32 * MAX_POINTS * weight,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub minimum_score: u32,
    pub minimum_max_score: u32,
    pub preferred_score: u32,
    pub preferred_max_score: u32,
    pub total_score: u32,
    pub max_score: u32,
    pub match_percentage: f64,
}

pub fn compute_score(
    minimum: &[ScreeningReason],
    preferred: &[ScreeningReason],
) -> ScoreBreakdown {
    let min = score_reasons(minimum, MINIMUM_WEIGHT);
    let pref = score_reasons(preferred, PREFERRED_WEIGHT);
    let total_score = min.earned + pref.earned;
    let max_score = min.max + pref.max;

    ScoreBreakdown {
        minimum_score: min.earned,
        minimum_max_score: min.max,
        preferred_score: pref.earned,
        preferred_max_score: pref.max,
        total_score,
        max_score,
        match_percentage: percentage(total_score, max_score),
    }
}

fn percentage(earned: u32, max: u32) -> f64 {
    if max == 0 {
        return 0.0;
    }
    let raw = f64::from(earned) / f64::from(max) * 100.0;
    (raw * 100.0).round() / 100.0
}
