//! Derived verdicts: tiers, stability, moods, and finalized result records.

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::{ClaimCode, SatisfactionScores, Stakeholder};

// ============================================================================
// Tier
// ============================================================================

/// Final verdict of a finalized negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Gold,
    Silver,
    Bronze,
    Fail,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Gold, Tier::Silver, Tier::Bronze, Tier::Fail];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Tier::Gold => "gold",
            Tier::Silver => "silver",
            Tier::Bronze => "bronze",
            Tier::Fail => "fail",
        }
    }

    /// Uppercase form used inside claim codes.
    #[must_use]
    pub const fn code_label(self) -> &'static str {
        match self {
            Tier::Gold => "GOLD",
            Tier::Silver => "SILVER",
            Tier::Bronze => "BRONZE",
            Tier::Fail => "FAIL",
        }
    }

    #[must_use]
    pub fn from_code_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.code_label() == label)
    }

    /// Ranking used when picking the best stored result.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Tier::Gold => 3,
            Tier::Silver => 2,
            Tier::Bronze => 1,
            Tier::Fail => 0,
        }
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        !matches!(self, Tier::Fail)
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Tier::Gold => "CHAMPIONSHIP DEAL!",
            Tier::Silver => "SOLID DEAL!",
            Tier::Bronze => "ACCEPTABLE DEAL",
            Tier::Fail => "DEAL COLLAPSED",
        }
    }

    #[must_use]
    pub const fn subtitle(self) -> &'static str {
        match self {
            Tier::Gold => "Gold Tier Achievement",
            Tier::Silver => "Silver Tier Achievement",
            Tier::Bronze => "Bronze Tier Achievement",
            Tier::Fail => "Negotiation Failed",
        }
    }

    /// Display color as a hex string.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Tier::Gold => "#FFD700",
            Tier::Silver => "#C0C0C0",
            Tier::Bronze => "#CD7F32",
            Tier::Fail => "#DC3545",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tier verdict together with the numbers it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierResult {
    pub tier: Tier,
    pub overall: u8,
    pub min_satisfaction: u8,
    pub label: String,
    pub message: String,
}

// ============================================================================
// Stability
// ============================================================================

/// Live health indicator, independent of the final tier verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StabilityStatus {
    Stable,
    Warning,
    Danger,
    Collapsed,
}

impl StabilityStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StabilityStatus::Stable => "stable",
            StabilityStatus::Warning => "warning",
            StabilityStatus::Danger => "danger",
            StabilityStatus::Collapsed => "collapsed",
        }
    }
}

impl std::fmt::Display for StabilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The least satisfied stakeholder, used for the failure narrative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LowestStakeholder {
    pub key: Stakeholder,
    pub name: &'static str,
    pub value: u8,
}

// ============================================================================
// Mood & Balance
// ============================================================================

/// Coarse satisfaction level shown next to each stakeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mood {
    Ecstatic,
    Happy,
    Neutral,
    Unhappy,
    Angry,
}

impl Mood {
    #[must_use]
    pub const fn from_satisfaction(satisfaction: u8) -> Self {
        match satisfaction {
            80.. => Mood::Ecstatic,
            65..=79 => Mood::Happy,
            50..=64 => Mood::Neutral,
            40..=49 => Mood::Unhappy,
            _ => Mood::Angry,
        }
    }

    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Mood::Ecstatic => "\u{1F604}",
            Mood::Happy => "\u{1F60A}",
            Mood::Neutral => "\u{1F610}",
            Mood::Unhappy => "\u{1F61F}",
            Mood::Angry => "\u{1F620}",
        }
    }

    /// ASCII fallback for terminals without emoji support.
    #[must_use]
    pub const fn ascii(self) -> &'static str {
        match self {
            Mood::Ecstatic => ":D",
            Mood::Happy => ":)",
            Mood::Neutral => ":|",
            Mood::Unhappy => ":(",
            Mood::Angry => ">:(",
        }
    }
}

/// Qualitative reading of the revenue-share slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BalanceRating {
    VeryFair,
    Fair,
    Moderate,
    Uneven,
    VeryUneven,
}

impl BalanceRating {
    #[must_use]
    pub fn from_revenue_share(revenue_share: f64) -> Self {
        if revenue_share >= 50.0 {
            BalanceRating::VeryFair
        } else if revenue_share >= 40.0 {
            BalanceRating::Fair
        } else if revenue_share >= 30.0 {
            BalanceRating::Moderate
        } else if revenue_share >= 20.0 {
            BalanceRating::Uneven
        } else {
            BalanceRating::VeryUneven
        }
    }

    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            BalanceRating::VeryFair => "Very Fair",
            BalanceRating::Fair => "Fair",
            BalanceRating::Moderate => "Moderate",
            BalanceRating::Uneven => "Uneven",
            BalanceRating::VeryUneven => "Very Uneven",
        }
    }
}

// ============================================================================
// Result Records
// ============================================================================

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResultRecordError {
    #[error("successful result for tier {0} is missing its claim code")]
    MissingCode(Tier),
    #[error("failed result must not carry a claim code")]
    UnexpectedCode,
    #[error("claim code tier {code} does not match result tier {tier}")]
    TierMismatch { code: Tier, tier: Tier },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResultRecord {
    tier: Tier,
    #[serde(default)]
    code: Option<ClaimCode>,
    message: String,
    overall: u8,
    satisfactions: SatisfactionScores,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

impl TryFrom<RawResultRecord> for ResultRecord {
    type Error = ResultRecordError;

    fn try_from(raw: RawResultRecord) -> Result<Self, Self::Error> {
        match (raw.tier.is_success(), &raw.code) {
            (true, None) => return Err(ResultRecordError::MissingCode(raw.tier)),
            (false, Some(_)) => return Err(ResultRecordError::UnexpectedCode),
            (true, Some(code)) if code.tier() != raw.tier => {
                return Err(ResultRecordError::TierMismatch {
                    code: code.tier(),
                    tier: raw.tier,
                });
            }
            _ => {}
        }
        Ok(Self {
            tier: raw.tier,
            code: raw.code,
            message: raw.message,
            overall: raw.overall,
            satisfactions: raw.satisfactions,
            timestamp: raw.timestamp,
        })
    }
}

/// Outcome of finalizing a negotiation.
///
/// Invariant: a code is present exactly when the tier is a success, and the
/// code's tier matches. Failed results carry no code and no timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawResultRecord")]
pub struct ResultRecord {
    tier: Tier,
    code: Option<ClaimCode>,
    message: String,
    overall: u8,
    satisfactions: SatisfactionScores,
    timestamp: Option<DateTime<Utc>>,
}

impl ResultRecord {
    #[must_use]
    pub fn failed(message: String, overall: u8, satisfactions: SatisfactionScores) -> Self {
        Self {
            tier: Tier::Fail,
            code: None,
            message,
            overall,
            satisfactions,
            timestamp: None,
        }
    }

    /// A winning result. The tier is taken from the code.
    #[must_use]
    pub fn claimed(
        code: ClaimCode,
        message: String,
        overall: u8,
        satisfactions: SatisfactionScores,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            tier: code.tier(),
            code: Some(code),
            message,
            overall,
            satisfactions,
            timestamp: Some(timestamp),
        }
    }

    #[must_use]
    pub const fn success(&self) -> bool {
        self.code.is_some()
    }

    #[must_use]
    pub const fn tier(&self) -> Tier {
        self.tier
    }

    #[must_use]
    pub fn code(&self) -> Option<&ClaimCode> {
        self.code.as_ref()
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn overall(&self) -> u8 {
        self.overall
    }

    #[must_use]
    pub const fn satisfactions(&self) -> SatisfactionScores {
        self.satisfactions
    }

    #[must_use]
    pub const fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }
}

impl Serialize for ResultRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.timestamp.is_some() { 7 } else { 6 };
        let mut record = serializer.serialize_struct("ResultRecord", len)?;
        record.serialize_field("success", &self.success())?;
        record.serialize_field("tier", &self.tier)?;
        record.serialize_field("code", &self.code)?;
        record.serialize_field("message", &self.message)?;
        record.serialize_field("overall", &self.overall)?;
        record.serialize_field("satisfactions", &self.satisfactions)?;
        if let Some(timestamp) = &self.timestamp {
            record.serialize_field("timestamp", timestamp)?;
        }
        record.end()
    }
}

/// A result as kept in the history, stamped with when it was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredResult {
    #[serde(flatten)]
    pub result: ResultRecord,
    pub stored_at: DateTime<Utc>,
}
