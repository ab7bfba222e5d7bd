//! Tier and stability evaluation.
//!
//! Reduces a [`SatisfactionScores`] record into the overall score, the final
//! tier verdict and the live stability indicator, plus the small lookups the
//! presentation layer shows alongside them. Tier and stability thresholds are
//! independent and may disagree (a "warning" deal can still earn bronze).

use moneymaker_types::{
    Allocation, BalanceRating, LowestStakeholder, Mood, SatisfactionScores, StabilityRules,
    StabilityStatus, Stakeholder, StakeholderProfiles, Tier, TierResult, TierThreshold, Tuning,
};
use tracing::debug;

use crate::math::to_score;

const BONUS_TIERS: [(f64, u8); 3] = [(0.8, 5), (0.6, 3), (0.4, 1)];
const TEAMS: f64 = 30.0;

/// Rounded mean of the four scores.
#[must_use]
pub fn overall_score(scores: &SatisfactionScores) -> u8 {
    to_score(f64::from(scores.sum()) / 4.0)
}

/// Tier verdict. Rules are checked in order and the first match wins:
/// collapse floor, then gold, silver and bronze, then fail.
#[must_use]
pub fn determine_tier(scores: &SatisfactionScores, tuning: &Tuning) -> TierResult {
    let rules = tuning.tiers();
    let overall = overall_score(scores);
    let min_satisfaction = scores.min();

    let qualifies = |threshold: TierThreshold| {
        overall >= threshold.overall && min_satisfaction >= threshold.min
    };

    let tier = if min_satisfaction < rules.collapse_below {
        Tier::Fail
    } else if qualifies(rules.gold) {
        Tier::Gold
    } else if qualifies(rules.silver) {
        Tier::Silver
    } else if qualifies(rules.bronze) {
        Tier::Bronze
    } else {
        Tier::Fail
    };

    debug!(%tier, overall, min_satisfaction, "Determined tier");

    let copy = tuning.tier_copy().for_tier(tier);
    TierResult {
        tier,
        overall,
        min_satisfaction,
        label: copy.label.clone(),
        message: copy.message.clone(),
    }
}

#[must_use]
pub fn check_stability(scores: &SatisfactionScores, rules: &StabilityRules) -> StabilityStatus {
    let min = scores.min();
    let below = scores.count_below(rules.concern_below);

    if min < rules.collapsed_below {
        StabilityStatus::Collapsed
    } else if min < rules.danger_below || below >= rules.danger_count {
        StabilityStatus::Danger
    } else if min < rules.warning_below || below >= rules.warning_count {
        StabilityStatus::Warning
    } else {
        StabilityStatus::Stable
    }
}

/// The least satisfied stakeholder. Ties go to the first in canonical order,
/// so an all-100 record reports players.
#[must_use]
pub fn lowest_stakeholder(scores: &SatisfactionScores) -> LowestStakeholder {
    let (key, value) = scores
        .iter()
        .fold((Stakeholder::Players, u8::MAX), |lowest, current| {
            if current.1 < lowest.1 { current } else { lowest }
        });
    LowestStakeholder {
        key,
        name: key.display_name(),
        value,
    }
}

#[must_use]
pub fn mood(satisfaction: u8) -> Mood {
    Mood::from_satisfaction(satisfaction)
}

/// Reaction line for a stakeholder at the given satisfaction.
#[must_use]
pub fn comment(
    profiles: &StakeholderProfiles,
    stakeholder: Stakeholder,
    satisfaction: u8,
) -> &str {
    let comments = &profiles.for_stakeholder(stakeholder).comments;
    match satisfaction {
        85.. => comments.very_happy.as_str(),
        70..=84 => comments.happy.as_str(),
        55..=69 => comments.neutral.as_str(),
        40..=54 => comments.unhappy.as_str(),
        _ => comments.very_unhappy.as_str(),
    }
}

#[must_use]
pub fn balance_text(revenue_share: f64) -> &'static str {
    BalanceRating::from_revenue_share(revenue_share).text()
}

/// Impact text for a start-time index, empty when the index is unknown.
#[must_use]
pub fn start_time_impact(tuning: &Tuning, start_time: u32) -> &str {
    tuning
        .start_time(start_time)
        .map(|option| option.impact.as_str())
        .unwrap_or("")
}

/// Bonus points for a mini-game round: 5, 3 or 1 at 80%, 60% and 40% correct.
/// A round with no questions earns nothing.
#[must_use]
pub fn mini_game_bonus(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let ratio = f64::from(correct) / f64::from(total);
    BONUS_TIERS
        .iter()
        .find(|(threshold, _)| ratio >= *threshold)
        .map(|(_, bonus)| *bonus)
        .unwrap_or(0)
}

/// Soft check that the buckets add up to the deal. Scoring never depends on it.
#[must_use]
pub fn validate_allocation(allocation: &Allocation, total_deal: f64, tolerance: f64) -> bool {
    allocation.matches_total(total_deal, tolerance)
}

/// Per-team salary cap for a revenue figure and player share percentage.
#[must_use]
pub fn salary_cap(revenue: f64, player_share: f64) -> f64 {
    (revenue * (player_share / 100.0) / TEAMS).round()
}
