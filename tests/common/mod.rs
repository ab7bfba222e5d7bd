//! Shared test utilities and fixtures

#![allow(dead_code)]

use std::path::Path;

use moneymaker_core::{
    FixedClock, HistoryStore, JsonFileStore, MemoryStore, Negotiation, ResultHistory,
};
use moneymaker_types::{Allocation, NegotiationState, Tuning};

/// 2023-11-14T22:13:20Z
pub const FIXED_MILLIS: i64 = 1_700_000_000_000;

pub fn fixed_clock() -> FixedClock {
    FixedClock::from_millis(FIXED_MILLIS).expect("fixed timestamp is in range")
}

pub fn memory_session() -> Negotiation<MemoryStore, FixedClock> {
    Negotiation::new(
        Tuning::default(),
        ResultHistory::with_clock(MemoryStore::default(), fixed_clock()),
    )
}

pub fn file_session(path: &Path) -> Negotiation<JsonFileStore, FixedClock> {
    Negotiation::new(
        Tuning::default(),
        ResultHistory::with_clock(JsonFileStore::new(path), fixed_clock()),
    )
}

/// Scores 67/70/83/89: bronze at overall 77, stable.
pub fn balanced_state() -> NegotiationState {
    NegotiationState {
        allocation: Allocation {
            players: 3.6,
            owners: 2.8,
            networks: 1.6,
            league: 0.0,
        },
        total_deal: 8.0,
        min_salary: 1000.0,
        revenue_share: 45.0,
        start_time: 1,
        streaming: 30.0,
        salary_share: 52.0,
    }
}

/// Scores 18/53/30/28: everyone but the owners walks.
pub fn league_heavy_state() -> NegotiationState {
    NegotiationState {
        allocation: Allocation {
            players: 0.0,
            owners: 0.0,
            networks: 0.0,
            league: 8.0,
        },
        total_deal: 8.0,
        min_salary: 0.0,
        revenue_share: 0.0,
        start_time: 4,
        streaming: 100.0,
        salary_share: 0.0,
    }
}

/// Apply every slider of `state` through the session mutators.
pub fn play<S: HistoryStore>(session: &mut Negotiation<S, FixedClock>, state: &NegotiationState) {
    session.set_total_deal(state.total_deal);
    session.set_allocation(state.allocation);
    session.set_min_salary(state.min_salary);
    session.set_revenue_share(state.revenue_share);
    session.set_start_time(state.start_time);
    session.set_streaming(state.streaming);
    session.set_salary_share(state.salary_share);
}
