//! A single play-through of the negotiation.
//!
//! [`Negotiation`] owns the state snapshot and keeps the derived scores and
//! stability current after every mutation. Finalizing folds in the mini-game
//! bonus, issues a result and hands it to the history.

use moneymaker_config::Settings;
use moneymaker_types::{
    Allocation, ClaimCodeError, DEFAULT_ALLOCATION_TOLERANCE, LowestStakeholder,
    NegotiationState, ResultRecord, SatisfactionScores, StabilityStatus, TierResult, Tuning,
};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::codegen::{generate_result, share_text};
use crate::evaluation::{
    check_stability, determine_tier, lowest_stakeholder, mini_game_bonus, validate_allocation,
};
use crate::history::{HistoryStore, ResultHistory};
use crate::satisfaction::calculate_all_satisfactions;

const PROGRESS_PER_INTERACTION: u32 = 5;
const MAX_PROGRESS: u32 = 100;

/// What [`Negotiation::finalize`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finalized {
    pub tier: TierResult,
    pub result: ResultRecord,
    /// Scores the tier was judged on, bonus included.
    pub satisfactions: SatisfactionScores,
    pub lowest: LowestStakeholder,
    /// `false` when the history could not be written.
    pub stored: bool,
}

impl Finalized {
    /// Share message for winning results.
    #[must_use]
    pub fn share_text(&self) -> Option<String> {
        self.result.code().map(share_text)
    }
}

pub struct Negotiation<S, C> {
    tuning: Tuning,
    allocation_tolerance: f64,
    state: NegotiationState,
    scores: SatisfactionScores,
    stability: StabilityStatus,
    interactions: u32,
    bonus: u8,
    history: ResultHistory<S, C>,
}

impl<S: HistoryStore, C: Clock> Negotiation<S, C> {
    pub fn new(tuning: Tuning, history: ResultHistory<S, C>) -> Self {
        Self::with_state(tuning, history, NegotiationState::default())
    }

    pub fn with_state(
        tuning: Tuning,
        history: ResultHistory<S, C>,
        state: NegotiationState,
    ) -> Self {
        let scores = calculate_all_satisfactions(&state, tuning.scoring());
        let stability = check_stability(&scores, tuning.stability());
        Self {
            tuning,
            allocation_tolerance: DEFAULT_ALLOCATION_TOLERANCE,
            state,
            scores,
            stability,
            interactions: 0,
            bonus: 0,
            history,
        }
    }

    /// Session over resolved settings: their tuning and allocation tolerance.
    pub fn from_settings(settings: Settings, history: ResultHistory<S, C>) -> Self {
        Self::new(settings.tuning, history)
            .with_allocation_tolerance(settings.app.allocation_tolerance)
    }

    pub fn with_allocation_tolerance(mut self, tolerance: f64) -> Self {
        self.allocation_tolerance = tolerance;
        self
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn state(&self) -> &NegotiationState {
        &self.state
    }

    /// Live scores, without the mini-game bonus.
    pub fn scores(&self) -> SatisfactionScores {
        self.scores
    }

    /// Live scores with the accumulated bonus applied, as finalize will see them.
    pub fn boosted_scores(&self) -> SatisfactionScores {
        self.scores.with_bonus(self.bonus)
    }

    pub fn stability(&self) -> StabilityStatus {
        self.stability
    }

    /// Tier the deal would get if finalized now.
    pub fn tier_preview(&self) -> TierResult {
        determine_tier(&self.boosted_scores(), &self.tuning)
    }

    pub fn lowest(&self) -> LowestStakeholder {
        lowest_stakeholder(&self.scores)
    }

    pub fn allocation_is_valid(&self) -> bool {
        validate_allocation(
            &self.state.allocation,
            self.state.total_deal,
            self.allocation_tolerance,
        )
    }

    pub fn interactions(&self) -> u32 {
        self.interactions
    }

    /// Percent progress, saturating after twenty interactions.
    pub fn progress(&self) -> u8 {
        self.interactions
            .saturating_mul(PROGRESS_PER_INTERACTION)
            .min(MAX_PROGRESS) as u8
    }

    pub fn bonus(&self) -> u8 {
        self.bonus
    }

    pub fn history(&self) -> &ResultHistory<S, C> {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut ResultHistory<S, C> {
        &mut self.history
    }

    /// Apply an arbitrary edit to the state. Counts as one interaction.
    pub fn update(&mut self, edit: impl FnOnce(&mut NegotiationState)) {
        edit(&mut self.state);
        self.interactions = self.interactions.saturating_add(1);
        self.recompute();
    }

    pub fn set_allocation(&mut self, allocation: Allocation) {
        self.update(|state| state.allocation = allocation);
    }

    pub fn set_total_deal(&mut self, total_deal: f64) {
        self.update(|state| state.total_deal = total_deal);
    }

    pub fn set_min_salary(&mut self, min_salary: f64) {
        self.update(|state| state.min_salary = min_salary);
    }

    pub fn set_revenue_share(&mut self, revenue_share: f64) {
        self.update(|state| state.revenue_share = revenue_share);
    }

    pub fn set_start_time(&mut self, start_time: u32) {
        self.update(|state| state.start_time = start_time);
    }

    pub fn set_streaming(&mut self, streaming: f64) {
        self.update(|state| state.streaming = streaming);
    }

    pub fn set_salary_share(&mut self, salary_share: f64) {
        self.update(|state| state.salary_share = salary_share);
    }

    /// Score a mini-game round and bank its bonus. Returns the points earned.
    pub fn record_mini_game(&mut self, correct: u32, total: u32) -> u8 {
        let earned = mini_game_bonus(correct, total);
        self.add_bonus(earned);
        earned
    }

    pub fn add_bonus(&mut self, bonus: u8) {
        self.bonus = self.bonus.saturating_add(bonus);
        debug!(bonus, total = self.bonus, "Banked mini-game bonus");
    }

    /// Judge the deal, issue a result and store it.
    pub fn finalize(&mut self) -> Result<Finalized, ClaimCodeError> {
        let satisfactions =
            calculate_all_satisfactions(&self.state, self.tuning.scoring()).with_bonus(self.bonus);
        let tier = determine_tier(&satisfactions, &self.tuning);
        let result = generate_result(&tier, &self.state, satisfactions, self.history.clock())?;
        let stored = self.history.store_result(result.clone());

        info!(
            tier = %tier.tier,
            overall = tier.overall,
            bonus = self.bonus,
            stored,
            "Finalized negotiation"
        );

        Ok(Finalized {
            lowest: lowest_stakeholder(&satisfactions),
            tier,
            result,
            satisfactions,
            stored,
        })
    }

    /// Back to the opening offer. History is kept.
    pub fn restart(&mut self) {
        self.state = NegotiationState::default();
        self.interactions = 0;
        self.bonus = 0;
        self.recompute();
        debug!("Restarted negotiation");
    }

    fn recompute(&mut self) {
        self.scores = calculate_all_satisfactions(&self.state, self.tuning.scoring());
        self.stability = check_stability(&self.scores, self.tuning.stability());
    }
}
