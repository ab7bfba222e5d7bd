//! Resolved tuning tables shared across crates.
//!
//! These types represent fully-validated scoring configuration. The raw TOML
//! layer lives in `moneymaker-config`; it resolves into these types at the parse
//! boundary. Existence of a [`Tuning`] value is the proof of its validity.
//!
//! `Tuning::default()` reproduces the hand-tuned tables the game ships with.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Stakeholder, Tier};

const WEIGHT_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuningError {
    #[error("{stakeholder} has no scoring factors")]
    NoFactors { stakeholder: Stakeholder },
    #[error("{stakeholder} weights sum to {sum}, expected 1.0")]
    WeightSum { stakeholder: Stakeholder, sum: f64 },
    #[error("{stakeholder} has a negative or non-finite weight ({weight})")]
    BadWeight { stakeholder: Stakeholder, weight: f64 },
    #[error("{stakeholder} linear transform has an empty input range ({bound})")]
    DegenerateRange { stakeholder: Stakeholder, bound: f64 },
    #[error("{stakeholder} bell transform spread must be positive and finite (got {spread})")]
    BadSpread { stakeholder: Stakeholder, spread: f64 },
    #[error("{stakeholder} transform has a non-finite parameter")]
    NonFinite { stakeholder: Stakeholder },
    #[error("{0} has no allocation bucket to score")]
    NoAllocationBucket(Stakeholder),
    #[error("{tier} thresholds must not exceed 100")]
    ThresholdRange { tier: Tier },
    #[error("tier thresholds must tighten from bronze to gold")]
    ThresholdOrder,
    #[error("stability thresholds must satisfy collapsed <= danger <= warning")]
    StabilityOrder,
    #[error("start-time table must not be empty")]
    NoStartTimes,
}

// ============================================================================
// Factors
// ============================================================================

/// Which state field a factor reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorInput {
    /// Percent of the total deal allocated to the scored stakeholder.
    Allocation,
    MinSalary,
    SalaryShare,
    RevenueShare,
    Streaming,
    StartTime,
}

/// Sub-score transform. Both variants produce values on the 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transform {
    /// Affine map from `[in_min, in_max]` onto `[out_min, out_max]`, clamped.
    /// A reversed input range expresses an inverse relationship.
    Linear {
        in_min: f64,
        in_max: f64,
        out_min: f64,
        out_max: f64,
    },
    /// Gaussian closeness to `optimal`, scaled by 100.
    Bell { optimal: f64, spread: f64 },
}

impl Transform {
    #[must_use]
    pub const fn linear(in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> Self {
        Transform::Linear {
            in_min,
            in_max,
            out_min,
            out_max,
        }
    }

    #[must_use]
    pub const fn bell(optimal: f64, spread: f64) -> Self {
        Transform::Bell { optimal, spread }
    }

    fn validate(&self, stakeholder: Stakeholder) -> Result<(), TuningError> {
        match *self {
            Transform::Linear {
                in_min,
                in_max,
                out_min,
                out_max,
            } => {
                if ![in_min, in_max, out_min, out_max]
                    .iter()
                    .all(|v| v.is_finite())
                {
                    return Err(TuningError::NonFinite { stakeholder });
                }
                if in_min == in_max {
                    return Err(TuningError::DegenerateRange {
                        stakeholder,
                        bound: in_min,
                    });
                }
            }
            Transform::Bell { optimal, spread } => {
                if !optimal.is_finite() {
                    return Err(TuningError::NonFinite { stakeholder });
                }
                if !(spread.is_finite() && spread > 0.0) {
                    return Err(TuningError::BadSpread {
                        stakeholder,
                        spread,
                    });
                }
            }
        }
        Ok(())
    }
}

/// One weighted term of a stakeholder score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub input: FactorInput,
    pub transform: Transform,
    pub weight: f64,
}

impl Factor {
    #[must_use]
    pub const fn new(input: FactorInput, transform: Transform, weight: f64) -> Self {
        Self {
            input,
            transform,
            weight,
        }
    }
}

// ============================================================================
// Scoring Model
// ============================================================================

/// Validated factor list for one stakeholder.
///
/// Invariant: at least one factor, weights non-negative and summing to 1.0,
/// every transform well-formed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StakeholderModel {
    stakeholder: Stakeholder,
    factors: Vec<Factor>,
}

impl StakeholderModel {
    pub fn new(stakeholder: Stakeholder, factors: Vec<Factor>) -> Result<Self, TuningError> {
        if factors.is_empty() {
            return Err(TuningError::NoFactors { stakeholder });
        }
        for factor in &factors {
            if !(factor.weight.is_finite() && factor.weight >= 0.0) {
                return Err(TuningError::BadWeight {
                    stakeholder,
                    weight: factor.weight,
                });
            }
            if factor.input == FactorInput::Allocation
                && crate::Allocation::default()
                    .amount_for(stakeholder)
                    .is_none()
            {
                return Err(TuningError::NoAllocationBucket(stakeholder));
            }
            factor.transform.validate(stakeholder)?;
        }
        let sum: f64 = factors.iter().map(|f| f.weight).sum();
        if (sum - 1.0).abs() > WEIGHT_EPSILON {
            return Err(TuningError::WeightSum { stakeholder, sum });
        }
        Ok(Self {
            stakeholder,
            factors,
        })
    }

    #[must_use]
    pub const fn stakeholder(&self) -> Stakeholder {
        self.stakeholder
    }

    #[must_use]
    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    // Literal tables: validated by `default_models_are_valid`.
    fn builtin(stakeholder: Stakeholder, factors: Vec<Factor>) -> Self {
        Self {
            stakeholder,
            factors,
        }
    }
}

/// Factor tables for all four stakeholders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringModel {
    players: StakeholderModel,
    owners: StakeholderModel,
    networks: StakeholderModel,
    fans: StakeholderModel,
}

impl ScoringModel {
    #[must_use]
    pub fn new(
        players: StakeholderModel,
        owners: StakeholderModel,
        networks: StakeholderModel,
        fans: StakeholderModel,
    ) -> Self {
        Self {
            players,
            owners,
            networks,
            fans,
        }
    }

    #[must_use]
    pub const fn for_stakeholder(&self, stakeholder: Stakeholder) -> &StakeholderModel {
        match stakeholder {
            Stakeholder::Players => &self.players,
            Stakeholder::Owners => &self.owners,
            Stakeholder::Networks => &self.networks,
            Stakeholder::Fans => &self.fans,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: StakeholderModel) -> Self {
        match model.stakeholder {
            Stakeholder::Players => self.players = model,
            Stakeholder::Owners => self.owners = model,
            Stakeholder::Networks => self.networks = model,
            Stakeholder::Fans => self.fans = model,
        }
        self
    }
}

impl Default for ScoringModel {
    fn default() -> Self {
        use FactorInput::{
            Allocation, MinSalary, RevenueShare, SalaryShare, StartTime, Streaming,
        };

        Self {
            players: StakeholderModel::builtin(
                Stakeholder::Players,
                vec![
                    Factor::new(Allocation, Transform::linear(25.0, 55.0, 0.0, 100.0), 0.35),
                    Factor::new(MinSalary, Transform::linear(400.0, 1500.0, 30.0, 100.0), 0.20),
                    Factor::new(SalaryShare, Transform::linear(40.0, 65.0, 20.0, 100.0), 0.30),
                    Factor::new(RevenueShare, Transform::linear(10.0, 60.0, 40.0, 100.0), 0.15),
                ],
            ),
            owners: StakeholderModel::builtin(
                Stakeholder::Owners,
                vec![
                    Factor::new(Allocation, Transform::linear(15.0, 45.0, 20.0, 100.0), 0.40),
                    // Inverted: a smaller player share leaves more profit.
                    Factor::new(SalaryShare, Transform::linear(70.0, 40.0, 0.0, 100.0), 0.25),
                    Factor::new(Streaming, Transform::linear(0.0, 60.0, 50.0, 90.0), 0.15),
                    Factor::new(RevenueShare, Transform::bell(30.0, 20.0), 0.20),
                ],
            ),
            networks: StakeholderModel::builtin(
                Stakeholder::Networks,
                vec![
                    Factor::new(Allocation, Transform::linear(5.0, 30.0, 30.0, 100.0), 0.25),
                    Factor::new(StartTime, Transform::bell(2.0, 1.5), 0.35),
                    Factor::new(Streaming, Transform::bell(35.0, 25.0), 0.25),
                    Factor::new(RevenueShare, Transform::linear(10.0, 50.0, 50.0, 90.0), 0.15),
                ],
            ),
            fans: StakeholderModel::builtin(
                Stakeholder::Fans,
                vec![
                    Factor::new(RevenueShare, Transform::linear(10.0, 60.0, 30.0, 100.0), 0.35),
                    Factor::new(StartTime, Transform::bell(1.5, 1.5), 0.25),
                    Factor::new(Streaming, Transform::bell(30.0, 30.0), 0.20),
                    Factor::new(MinSalary, Transform::linear(400.0, 1200.0, 50.0, 100.0), 0.20),
                ],
            ),
        }
    }
}

// ============================================================================
// Tier & Stability Rules
// ============================================================================

/// Minimum overall and minimum single score required for a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierThreshold {
    pub overall: u8,
    pub min: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierRules {
    /// Any score below this fails the deal outright.
    pub collapse_below: u8,
    pub gold: TierThreshold,
    pub silver: TierThreshold,
    pub bronze: TierThreshold,
}

impl TierRules {
    pub fn validate(&self) -> Result<(), TuningError> {
        for (tier, threshold) in [
            (Tier::Gold, self.gold),
            (Tier::Silver, self.silver),
            (Tier::Bronze, self.bronze),
        ] {
            if threshold.overall > 100 || threshold.min > 100 {
                return Err(TuningError::ThresholdRange { tier });
            }
        }
        let ordered = self.gold.overall >= self.silver.overall
            && self.silver.overall >= self.bronze.overall
            && self.gold.min >= self.silver.min
            && self.silver.min >= self.bronze.min;
        if !ordered {
            return Err(TuningError::ThresholdOrder);
        }
        Ok(())
    }
}

impl Default for TierRules {
    fn default() -> Self {
        Self {
            collapse_below: 40,
            gold: TierThreshold {
                overall: 90,
                min: 75,
            },
            silver: TierThreshold {
                overall: 80,
                min: 60,
            },
            bronze: TierThreshold {
                overall: 70,
                min: 45,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StabilityRules {
    pub collapsed_below: u8,
    pub danger_below: u8,
    pub warning_below: u8,
    /// Scores below this count toward `danger_count` / `warning_count`.
    pub concern_below: u8,
    pub danger_count: usize,
    pub warning_count: usize,
}

impl StabilityRules {
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.collapsed_below <= self.danger_below
            && self.danger_below <= self.warning_below
            && self.warning_count <= self.danger_count
        {
            Ok(())
        } else {
            Err(TuningError::StabilityOrder)
        }
    }
}

impl Default for StabilityRules {
    fn default() -> Self {
        Self {
            collapsed_below: 40,
            danger_below: 50,
            warning_below: 60,
            concern_below: 50,
            danger_count: 2,
            warning_count: 1,
        }
    }
}

// ============================================================================
// Reference Copy
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCopy {
    pub label: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCopyTable {
    pub gold: TierCopy,
    pub silver: TierCopy,
    pub bronze: TierCopy,
    pub fail: TierCopy,
}

impl TierCopyTable {
    #[must_use]
    pub const fn for_tier(&self, tier: Tier) -> &TierCopy {
        match tier {
            Tier::Gold => &self.gold,
            Tier::Silver => &self.silver,
            Tier::Bronze => &self.bronze,
            Tier::Fail => &self.fail,
        }
    }
}

impl Default for TierCopyTable {
    fn default() -> Self {
        fn copy(label: &str, message: &str) -> TierCopy {
            TierCopy {
                label: label.to_string(),
                message: message.to_string(),
            }
        }
        Self {
            gold: copy(
                "GOLD",
                "CHAMPIONSHIP DEAL! You've balanced every stakeholder perfectly. The league is thriving!",
            ),
            silver: copy(
                "SILVER",
                "SOLID DEAL! The league accepted your proposal. One group had to compromise.",
            ),
            bronze: copy(
                "BRONZE",
                "ACCEPTABLE DEAL! The league signed your proposal, but some are unhappy.",
            ),
            fail: copy("FAILED", "DEAL COLLAPSED! Try again."),
        }
    }
}

/// A broadcast start-time option. `NegotiationState::start_time` indexes this table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartTimeOption {
    pub time: String,
    pub label: String,
    pub impact: String,
}

fn default_start_times() -> Vec<StartTimeOption> {
    [
        ("6:00 PM", "Early Evening", "Great for families, less prime TV"),
        ("7:00 PM", "Prime Time Start", "Good balance for most viewers"),
        ("7:30 PM", "Traditional", "Classic baseball time slot"),
        ("8:00 PM", "Late Prime", "Better for West Coast, worse for East"),
        ("9:00 PM+", "Late Night", "Streaming-focused, loses East Coast"),
    ]
    .into_iter()
    .map(|(time, label, impact)| StartTimeOption {
        time: time.to_string(),
        label: label.to_string(),
        impact: impact.to_string(),
    })
    .collect()
}

/// Reaction lines, from most to least satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentSet {
    pub very_happy: String,
    pub happy: String,
    pub neutral: String,
    pub unhappy: String,
    pub very_unhappy: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeholderProfile {
    pub representative: String,
    pub title: String,
    pub comments: CommentSet,
}

impl StakeholderProfile {
    fn new(representative: &str, title: &str, comments: [&str; 5]) -> Self {
        let [very_happy, happy, neutral, unhappy, very_unhappy] = comments.map(str::to_string);
        Self {
            representative: representative.to_string(),
            title: title.to_string(),
            comments: CommentSet {
                very_happy,
                happy,
                neutral,
                unhappy,
                very_unhappy,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeholderProfiles {
    pub players: StakeholderProfile,
    pub owners: StakeholderProfile,
    pub networks: StakeholderProfile,
    pub fans: StakeholderProfile,
}

impl StakeholderProfiles {
    #[must_use]
    pub const fn for_stakeholder(&self, stakeholder: Stakeholder) -> &StakeholderProfile {
        match stakeholder {
            Stakeholder::Players => &self.players,
            Stakeholder::Owners => &self.owners,
            Stakeholder::Networks => &self.networks,
            Stakeholder::Fans => &self.fans,
        }
    }
}

impl Default for StakeholderProfiles {
    fn default() -> Self {
        Self {
            players: StakeholderProfile::new(
                "Tony Clark",
                "MLBPA Executive Director",
                [
                    "This is a championship deal for the players! \u{26BE}",
                    "The players are pleased with these terms.",
                    "We can work with this, but we'd like more.",
                    "The players deserve better than this!",
                    "This is unacceptable. We're walking away!",
                ],
            ),
            owners: StakeholderProfile::new(
                "Owner Coalition",
                "30 MLB Franchise Owners",
                [
                    "Excellent! This ensures franchise profitability!",
                    "A reasonable deal for sustainable business.",
                    "Margins are tight, but it could work.",
                    "Our profit margins are too thin!",
                    "We can't operate under these terms!",
                ],
            ),
            networks: StakeholderProfile::new(
                "Network Coalition",
                "ESPN, FOX, Apple TV+, Amazon",
                [
                    "Prime content at prime times! Perfect!",
                    "Good package, solid viewership potential.",
                    "We need better time slots for this price.",
                    "The viewership projections are concerning.",
                    "We can't justify this investment!",
                ],
            ),
            fans: StakeholderProfile::new(
                "The Fans",
                "Millions of Baseball Supporters",
                [
                    "Best. Season. Ever! Go baseball! \u{1F389}",
                    "Excited for competitive baseball!",
                    "Hope we can actually watch the games...",
                    "Same teams winning, games too late!",
                    "Baseball is losing us as fans!",
                ],
            ),
        }
    }
}

// ============================================================================
// Tuning
// ============================================================================

/// Everything the engine needs besides the negotiation state itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuning {
    scoring: ScoringModel,
    tiers: TierRules,
    stability: StabilityRules,
    tier_copy: TierCopyTable,
    start_times: Vec<StartTimeOption>,
    profiles: StakeholderProfiles,
}

impl Tuning {
    pub fn new(
        scoring: ScoringModel,
        tiers: TierRules,
        stability: StabilityRules,
        tier_copy: TierCopyTable,
        start_times: Vec<StartTimeOption>,
        profiles: StakeholderProfiles,
    ) -> Result<Self, TuningError> {
        tiers.validate()?;
        stability.validate()?;
        if start_times.is_empty() {
            return Err(TuningError::NoStartTimes);
        }
        Ok(Self {
            scoring,
            tiers,
            stability,
            tier_copy,
            start_times,
            profiles,
        })
    }

    #[must_use]
    pub const fn scoring(&self) -> &ScoringModel {
        &self.scoring
    }

    #[must_use]
    pub const fn tiers(&self) -> &TierRules {
        &self.tiers
    }

    #[must_use]
    pub const fn stability(&self) -> &StabilityRules {
        &self.stability
    }

    #[must_use]
    pub const fn tier_copy(&self) -> &TierCopyTable {
        &self.tier_copy
    }

    #[must_use]
    pub fn start_times(&self) -> &[StartTimeOption] {
        &self.start_times
    }

    #[must_use]
    pub fn start_time(&self, index: u32) -> Option<&StartTimeOption> {
        self.start_times.get(usize::try_from(index).ok()?)
    }

    #[must_use]
    pub const fn profiles(&self) -> &StakeholderProfiles {
        &self.profiles
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            scoring: ScoringModel::default(),
            tiers: TierRules::default(),
            stability: StabilityRules::default(),
            tier_copy: TierCopyTable::default(),
            start_times: default_start_times(),
            profiles: StakeholderProfiles::default(),
        }
    }
}
