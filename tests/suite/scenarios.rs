//! End-to-end negotiations through the public session API.

use moneymaker_core::{
    Glyphs, determine_tier, extract_tier, extract_year, render_outcome, validate_code_format,
};
use moneymaker_types::{
    Allocation, ClaimCode, SatisfactionScores, StabilityStatus, Stakeholder, Tier, TierThreshold,
    Tuning,
};
use regex::Regex;

use crate::common::{balanced_state, league_heavy_state, memory_session, play};

fn code_pattern() -> Regex {
    Regex::new(r"^MLB-(GOLD|SILVER|BRONZE)-[A-Z0-9]{6}-\d{4}$").unwrap()
}

#[test]
fn opening_offer_finalizes_to_bronze() {
    let mut session = memory_session();
    assert_eq!(session.stability(), StabilityStatus::Warning);

    let outcome = session.finalize().unwrap();
    assert_eq!(outcome.tier.tier, Tier::Bronze);
    assert_eq!(outcome.tier.overall, 73);
    assert_eq!(outcome.tier.min_satisfaction, 58);
    assert_eq!(outcome.tier.label, "BRONZE");

    let code = outcome.result.code().unwrap();
    assert!(code_pattern().is_match(code.as_str()));
    assert_eq!(code.as_str(), "MLB-BRONZE-JT4XJV-2023");
}

#[test]
fn playing_the_sliders_then_the_mini_game_reaches_silver() {
    let mut session = memory_session();
    play(&mut session, &balanced_state());

    assert_eq!(session.scores(), SatisfactionScores::new(67, 70, 83, 89));
    assert_eq!(session.stability(), StabilityStatus::Stable);
    assert_eq!(session.tier_preview().tier, Tier::Bronze);
    assert_eq!(session.progress(), 35);

    assert_eq!(session.record_mini_game(5, 5), 5);
    let outcome = session.finalize().unwrap();
    assert_eq!(outcome.tier.tier, Tier::Silver);
    assert_eq!(outcome.tier.overall, 82);

    let code = outcome.result.code().unwrap().as_str().to_owned();
    assert!(validate_code_format(&code));
    assert_eq!(extract_tier(&code), Some(Tier::Silver));
    assert_eq!(extract_year(&code), Some(2023));
    assert_eq!(session.history().history().len(), 1);
}

#[test]
fn league_grab_collapses_the_deal() {
    let mut session = memory_session();
    play(&mut session, &league_heavy_state());

    assert_eq!(session.scores(), SatisfactionScores::new(18, 53, 30, 28));
    assert_eq!(session.stability(), StabilityStatus::Collapsed);
    assert_eq!(session.lowest().key, Stakeholder::Players);

    let outcome = session.finalize().unwrap();
    assert_eq!(outcome.tier.tier, Tier::Fail);
    assert!(!outcome.result.success());
    assert!(outcome.result.code().is_none());
    assert!(outcome.result.timestamp().is_none());

    let text = render_outcome(&outcome, Glyphs::Ascii);
    assert!(text.ends_with("Players Union walked away at 18."));
}

#[test]
fn unbalanced_allocation_still_scores() {
    let mut session = memory_session();
    session.set_allocation(Allocation {
        players: 5.0,
        ..Allocation::default()
    });
    assert!(!session.allocation_is_valid());
    assert!(session.finalize().is_ok());
}

#[test]
fn same_deal_same_moment_same_code() {
    let first = memory_session().finalize().unwrap();
    let second = memory_session().finalize().unwrap();
    assert_eq!(first.result.code(), second.result.code());
}

#[test]
fn codes_survive_parsing() {
    let outcome = memory_session().finalize().unwrap();
    let issued = outcome.result.code().unwrap();
    let parsed = ClaimCode::parse(issued.as_str()).unwrap();
    assert_eq!(&parsed, issued);
    assert_eq!(parsed.hash(), "JT4XJV");
    assert_eq!(parsed.year(), 2023);

    assert!(ClaimCode::parse("MLB-FAIL-JT4XJV-2023").is_err());
    assert!(ClaimCode::parse("MLB-GOLD-JT4XJ-2023").is_err());
    assert!(!validate_code_format("mlb-gold-jt4xjv-2023"));
}

#[test]
fn stricter_tuning_changes_the_verdict() {
    let default = Tuning::default();
    let mut tiers = *default.tiers();
    tiers.bronze = TierThreshold {
        overall: 75,
        min: 45,
    };
    let tuning = Tuning::new(
        default.scoring().clone(),
        tiers,
        *default.stability(),
        default.tier_copy().clone(),
        default.start_times().to_vec(),
        default.profiles().clone(),
    )
    .unwrap();

    let verdict = determine_tier(&SatisfactionScores::new(58, 71, 84, 80), &tuning);
    assert_eq!(verdict.tier, Tier::Fail);
}
