//! Claim code value type.
//!
//! A claim code is `MLB-{TIER}-{HASH}-{YEAR}` where `TIER` is one of the winning
//! tiers, `HASH` is six uppercase ASCII letters or digits, and `YEAR` is four digits.
//! Existence of a [`ClaimCode`] proves the string has that shape.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Tier;

const PREFIX: &str = "MLB";
const HASH_LEN: usize = 6;
const YEAR_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimCodeError {
    #[error("claim code must have four dash-separated parts (got {0})")]
    Shape(usize),
    #[error("claim code must start with MLB")]
    Prefix,
    #[error("claim code tier must be GOLD, SILVER or BRONZE (got {0})")]
    Tier(String),
    #[error("claim code hash must be 6 uppercase letters or digits (got {0})")]
    Hash(String),
    #[error("claim code year must be 4 digits (got {0})")]
    Year(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClaimCode {
    raw: String,
    tier: Tier,
    year: u16,
}

impl ClaimCode {
    /// Assemble a code from its parts.
    ///
    /// Returns an error for `Tier::Fail`: failed deals never receive a code.
    pub fn from_parts(tier: Tier, hash: &str, year: i32) -> Result<Self, ClaimCodeError> {
        Self::parse(&format!("{PREFIX}-{}-{hash}-{year:04}", tier.code_label()))
    }

    pub fn parse(raw: &str) -> Result<Self, ClaimCodeError> {
        let parts: Vec<&str> = raw.split('-').collect();
        let [prefix, tier, hash, year] = parts.as_slice() else {
            return Err(ClaimCodeError::Shape(parts.len()));
        };

        if *prefix != PREFIX {
            return Err(ClaimCodeError::Prefix);
        }

        let tier = Tier::from_code_label(tier)
            .filter(|tier| tier.is_success())
            .ok_or_else(|| ClaimCodeError::Tier((*tier).to_string()))?;

        let hash_ok = hash.len() == HASH_LEN
            && hash
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());
        if !hash_ok {
            return Err(ClaimCodeError::Hash((*hash).to_string()));
        }

        let year_ok = year.len() == YEAR_LEN && year.bytes().all(|b| b.is_ascii_digit());
        let year = year
            .parse::<u16>()
            .ok()
            .filter(|_| year_ok)
            .ok_or_else(|| ClaimCodeError::Year((*year).to_string()))?;

        Ok(Self {
            raw: raw.to_string(),
            tier,
            year,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub const fn tier(&self) -> Tier {
        self.tier
    }

    #[must_use]
    pub const fn year(&self) -> u16 {
        self.year
    }

    /// The six-character hash segment.
    #[must_use]
    pub fn hash(&self) -> &str {
        self.raw.split('-').nth(2).unwrap_or_default()
    }
}

impl TryFrom<String> for ClaimCode {
    type Error = ClaimCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ClaimCode> for String {
    fn from(value: ClaimCode) -> Self {
        value.raw
    }
}

impl std::fmt::Display for ClaimCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
