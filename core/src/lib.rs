//! Core domain logic for the negotiation engine.
//!
//! Scoring and evaluation are pure functions over a [`NegotiationState`]
//! snapshot and an injected [`Tuning`]. Wall-clock access sits behind
//! [`Clock`]; the result history is the only mutable resource.
//!
//! [`NegotiationState`]: moneymaker_types::NegotiationState
//! [`Tuning`]: moneymaker_types::Tuning

pub mod clock;
pub mod codegen;
pub mod evaluation;
pub mod history;
pub mod math;
pub mod report;
pub mod satisfaction;
pub mod session;

pub use clock::{Clock, FixedClock, SystemClock};
pub use codegen::{
    create_seed, extract_tier, extract_year, generate_code, generate_hash, generate_result,
    share_text, validate_code_format,
};
pub use evaluation::{
    balance_text, check_stability, comment, determine_tier, lowest_stakeholder,
    mini_game_bonus, mood, overall_score, salary_cap, start_time_impact, validate_allocation,
};
pub use history::{
    HISTORY_CAPACITY, HistoryError, HistoryStore, JsonFileStore, MemoryStore, ResultHistory,
};
pub use math::{bell_curve, map_range};
pub use report::{Glyphs, render_outcome, render_status};
pub use satisfaction::calculate_all_satisfactions;
pub use session::{Finalized, Negotiation};
