//! Claim code generation.
//!
//! Codes look like `MLB-GOLD-JT4XJV-2025`. The six-character hash comes from a
//! seed that mixes the negotiation state with the current time, stretched by a
//! linear congruential generator. It is flavor, not a uniqueness guarantee.
//!
//! All seed arithmetic is exact: intermediates are widened to `i128` and `%`
//! keeps the dividend's sign.

use moneymaker_types::{
    ClaimCode, ClaimCodeError, NegotiationState, ResultRecord, SatisfactionScores, Tier,
    TierResult,
};
use tracing::{debug, info};

use crate::clock::Clock;

/// Code alphabet. Omits 0, O, 1 and I.
pub const ALPHABET: &[u8; 32] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

const HASH_LEN: usize = 6;
const MODULUS: i128 = 2_147_483_647;
const MULTIPLIER: i128 = 1_103_515_245;
const INCREMENT: i128 = 12_345;
const TIME_WINDOW: i128 = 1_000_000;
const FOLD_FACTOR: i128 = 31;

/// Round half up: 0.5 always goes up, negative halves toward zero.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

fn lcg(value: i128) -> i128 {
    (value * MULTIPLIER + INCREMENT) % MODULUS
}

/// Zero or NaN seed inputs fall back to the opening-offer value.
fn or_opening(value: f64, opening: f64) -> f64 {
    if value == 0.0 || value.is_nan() {
        opening
    } else {
        value
    }
}

/// The seven integer terms folded into the seed, in fold order. Unset (zero)
/// fields contribute their opening-offer value instead.
#[must_use]
pub fn seed_terms(state: &NegotiationState) -> [i64; 7] {
    let opening = NegotiationState::default();
    let start_time = if state.start_time == 0 {
        opening.start_time
    } else {
        state.start_time
    };
    [
        round_half_up(or_opening(state.allocation.players, opening.allocation.players) * 100.0),
        round_half_up(or_opening(state.allocation.owners, opening.allocation.owners) * 100.0),
        round_half_up(or_opening(state.min_salary, opening.min_salary)),
        round_half_up(or_opening(state.revenue_share, opening.revenue_share)),
        round_half_up(or_opening(state.streaming, opening.streaming)),
        round_half_up(or_opening(state.salary_share, opening.salary_share) * 10.0),
        i64::from(start_time),
    ]
}

/// Mix the state with a millisecond timestamp.
#[must_use]
pub fn create_seed(state: &NegotiationState, timestamp_ms: i64) -> i64 {
    let mut seed = i128::from(timestamp_ms) % TIME_WINDOW;
    for (weight, term) in (1_i128..).zip(seed_terms(state)) {
        seed = (seed * FOLD_FACTOR + i128::from(term) * weight) % MODULUS;
    }
    // |lcg(..)| < MODULUS, so this always fits.
    lcg(seed) as i64
}

/// Six alphabet characters drawn from successive LCG steps.
#[must_use]
pub fn generate_hash(seed: i64) -> String {
    let mut current = i128::from(seed);
    let mut hash = String::with_capacity(HASH_LEN);
    for _ in 0..HASH_LEN {
        current = lcg(current);
        let index = (current.unsigned_abs() % ALPHABET.len() as u128) as usize;
        hash.push(char::from(ALPHABET[index]));
    }
    hash
}

/// Build a claim code for a winning tier. `Tier::Fail` is rejected.
pub fn generate_code(
    tier: Tier,
    state: &NegotiationState,
    clock: &dyn Clock,
) -> Result<ClaimCode, ClaimCodeError> {
    let seed = create_seed(state, clock.now_ms());
    let hash = generate_hash(seed);
    debug!(seed, %hash, %tier, "Generated claim hash");
    ClaimCode::from_parts(tier, &hash, clock.current_year())
}

/// Turn a tier verdict into a result record. Failed deals get no code and no
/// timestamp; winning deals get both.
pub fn generate_result(
    tier_result: &TierResult,
    state: &NegotiationState,
    satisfactions: SatisfactionScores,
    clock: &dyn Clock,
) -> Result<ResultRecord, ClaimCodeError> {
    if !tier_result.tier.is_success() {
        info!(overall = tier_result.overall, "Deal collapsed, no claim code issued");
        return Ok(ResultRecord::failed(
            tier_result.message.clone(),
            tier_result.overall,
            satisfactions,
        ));
    }

    let code = generate_code(tier_result.tier, state, clock)?;
    info!(%code, overall = tier_result.overall, "Issued claim code");
    Ok(ResultRecord::claimed(
        code,
        tier_result.message.clone(),
        tier_result.overall,
        satisfactions,
        clock.now(),
    ))
}

#[must_use]
pub fn validate_code_format(code: &str) -> bool {
    ClaimCode::parse(code).is_ok()
}

/// Tier of a well-formed code, `None` otherwise.
#[must_use]
pub fn extract_tier(code: &str) -> Option<Tier> {
    ClaimCode::parse(code).ok().map(|code| code.tier())
}

/// Year of a well-formed code, `None` otherwise.
#[must_use]
pub fn extract_year(code: &str) -> Option<u16> {
    ClaimCode::parse(code).ok().map(|code| code.year())
}

/// Message offered for sharing a claimed result.
#[must_use]
pub fn share_text(code: &ClaimCode) -> String {
    format!(
        "I just completed MLB Money Maker with a {} tier deal!\nClaim Code: {code}\nCan you do better?",
        code.tier().code_label()
    )
}
