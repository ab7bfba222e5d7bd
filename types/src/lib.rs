//! Core domain types for the negotiation engine.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod claim;
mod outcome;
mod tuning;

pub use claim::{ClaimCode, ClaimCodeError};
pub use outcome::{
    BalanceRating, LowestStakeholder, Mood, ResultRecord, ResultRecordError, StabilityStatus,
    StoredResult, Tier, TierResult,
};
pub use tuning::{
    CommentSet, Factor, FactorInput, ScoringModel, StabilityRules, StakeholderModel,
    StakeholderProfile, StakeholderProfiles, StartTimeOption, TierCopy, TierCopyTable,
    TierRules, TierThreshold, Transform, Tuning, TuningError,
};

use serde::{Deserialize, Serialize};

/// Default tolerance when checking that allocations add up to the deal total.
pub const DEFAULT_ALLOCATION_TOLERANCE: f64 = 0.1;

/// Upper bound of every satisfaction score.
pub const MAX_SATISFACTION: u8 = 100;

// ============================================================================
// Stakeholders
// ============================================================================

/// The four parties whose satisfaction is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stakeholder {
    Players,
    Owners,
    Networks,
    Fans,
}

impl Stakeholder {
    /// Canonical order. Tie-breaks and iteration follow this order.
    pub const ALL: [Stakeholder; 4] = [
        Stakeholder::Players,
        Stakeholder::Owners,
        Stakeholder::Networks,
        Stakeholder::Fans,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Stakeholder::Players => "players",
            Stakeholder::Owners => "owners",
            Stakeholder::Networks => "networks",
            Stakeholder::Fans => "fans",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Stakeholder::Players => "Players Union",
            Stakeholder::Owners => "Team Owners",
            Stakeholder::Networks => "Broadcast Networks",
            Stakeholder::Fans => "Baseball Fans",
        }
    }

    /// Parse a stakeholder key. Unknown keys are `None`, never an error.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "players" => Some(Stakeholder::Players),
            "owners" => Some(Stakeholder::Owners),
            "networks" => Some(Stakeholder::Networks),
            "fans" => Some(Stakeholder::Fans),
            _ => None,
        }
    }
}

impl std::fmt::Display for Stakeholder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Negotiation State
// ============================================================================

/// Division of the deal across the four allocation buckets.
///
/// Fans have no bucket; the league keeps the remainder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Allocation {
    pub players: f64,
    pub owners: f64,
    pub networks: f64,
    pub league: f64,
}

impl Allocation {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.players + self.owners + self.networks + self.league
    }

    /// Amount allocated to a stakeholder, `None` for fans.
    #[must_use]
    pub fn amount_for(&self, stakeholder: Stakeholder) -> Option<f64> {
        match stakeholder {
            Stakeholder::Players => Some(self.players),
            Stakeholder::Owners => Some(self.owners),
            Stakeholder::Networks => Some(self.networks),
            Stakeholder::Fans => None,
        }
    }

    /// Soft check: the buckets add up to `total_deal` within `tolerance`.
    #[must_use]
    pub fn matches_total(&self, total_deal: f64, tolerance: f64) -> bool {
        (self.total() - total_deal).abs() <= tolerance
    }
}

impl Default for Allocation {
    fn default() -> Self {
        Self {
            players: 3.6,
            owners: 2.4,
            networks: 1.2,
            league: 0.8,
        }
    }
}

/// Snapshot of every slider the player controls.
///
/// Owned by the caller and passed into the engine whenever scores are needed.
/// Nothing here is validated: the engine scores whatever the numbers imply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NegotiationState {
    pub allocation: Allocation,
    /// Total deal size, same unit as the allocation buckets.
    pub total_deal: f64,
    /// Minimum salary in thousands.
    pub min_salary: f64,
    /// Percent of revenue redistributed for competitive balance.
    pub revenue_share: f64,
    /// Index into the start-time options table.
    pub start_time: u32,
    /// Percent of rights allocated to streaming.
    pub streaming: f64,
    /// Percent of revenue going to players.
    pub salary_share: f64,
}

impl NegotiationState {
    /// Percent of the total deal allocated to `stakeholder`, `None` for fans.
    #[must_use]
    pub fn allocation_percent(&self, stakeholder: Stakeholder) -> Option<f64> {
        self.allocation
            .amount_for(stakeholder)
            .map(|amount| 100.0 * amount / self.total_deal)
    }

    #[must_use]
    pub fn allocation_is_balanced(&self, tolerance: f64) -> bool {
        self.allocation.matches_total(self.total_deal, tolerance)
    }
}

impl Default for NegotiationState {
    fn default() -> Self {
        Self {
            allocation: Allocation::default(),
            total_deal: 8.0,
            min_salary: 750.0,
            revenue_share: 35.0,
            start_time: 2,
            streaming: 25.0,
            salary_share: 48.5,
        }
    }
}

// ============================================================================
// Satisfaction Scores
// ============================================================================

#[derive(Deserialize)]
struct RawSatisfactionScores {
    players: u8,
    owners: u8,
    networks: u8,
    fans: u8,
}

impl From<RawSatisfactionScores> for SatisfactionScores {
    fn from(raw: RawSatisfactionScores) -> Self {
        Self::new(raw.players, raw.owners, raw.networks, raw.fans)
    }
}

/// One score per stakeholder.
///
/// Invariant: every score is in `0..=100` (enforced by [`SatisfactionScores::new`]
/// and at the deserialization boundary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawSatisfactionScores")]
pub struct SatisfactionScores {
    players: u8,
    owners: u8,
    networks: u8,
    fans: u8,
}

impl SatisfactionScores {
    /// Build a score record, capping each value at 100.
    #[must_use]
    pub fn new(players: u8, owners: u8, networks: u8, fans: u8) -> Self {
        Self {
            players: players.min(MAX_SATISFACTION),
            owners: owners.min(MAX_SATISFACTION),
            networks: networks.min(MAX_SATISFACTION),
            fans: fans.min(MAX_SATISFACTION),
        }
    }

    #[must_use]
    pub const fn get(&self, stakeholder: Stakeholder) -> u8 {
        match stakeholder {
            Stakeholder::Players => self.players,
            Stakeholder::Owners => self.owners,
            Stakeholder::Networks => self.networks,
            Stakeholder::Fans => self.fans,
        }
    }

    /// Look up a score by string key. Unknown keys yield `None`; callers must guard.
    #[must_use]
    pub fn get_by_key(&self, key: &str) -> Option<u8> {
        Stakeholder::from_key(key).map(|stakeholder| self.get(stakeholder))
    }

    /// Scores in canonical stakeholder order.
    pub fn iter(&self) -> impl Iterator<Item = (Stakeholder, u8)> + '_ {
        Stakeholder::ALL
            .into_iter()
            .map(move |stakeholder| (stakeholder, self.get(stakeholder)))
    }

    #[must_use]
    pub fn min(&self) -> u8 {
        self.players
            .min(self.owners)
            .min(self.networks)
            .min(self.fans)
    }

    #[must_use]
    pub fn sum(&self) -> u32 {
        self.iter().map(|(_, value)| u32::from(value)).sum()
    }

    /// Number of scores strictly below `threshold`.
    #[must_use]
    pub fn count_below(&self, threshold: u8) -> usize {
        self.iter().filter(|(_, value)| *value < threshold).count()
    }

    /// Add `bonus` to every score, capped at 100.
    #[must_use]
    pub fn with_bonus(self, bonus: u8) -> Self {
        Self::new(
            self.players.saturating_add(bonus),
            self.owners.saturating_add(bonus),
            self.networks.saturating_add(bonus),
            self.fans.saturating_add(bonus),
        )
    }
}
