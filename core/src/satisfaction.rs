//! Stakeholder satisfaction scoring.
//!
//! Each stakeholder score is a weighted sum of factor sub-scores, every one of
//! them on the 0-100 scale, rounded and clamped into `0..=100`. The factor
//! tables come from [`ScoringModel`]; nothing here holds state.

use moneymaker_types::{
    FactorInput, NegotiationState, SatisfactionScores, ScoringModel, Stakeholder,
    StakeholderModel, Transform,
};
use tracing::debug;

use crate::math::{bell_curve, map_range, to_score};

/// Raw state value a factor reads for `stakeholder`.
#[must_use]
pub fn factor_input(state: &NegotiationState, stakeholder: Stakeholder, input: FactorInput) -> f64 {
    match input {
        // Validated models never ask for the fans' allocation.
        FactorInput::Allocation => state.allocation_percent(stakeholder).unwrap_or(f64::NAN),
        FactorInput::MinSalary => state.min_salary,
        FactorInput::SalaryShare => state.salary_share,
        FactorInput::RevenueShare => state.revenue_share,
        FactorInput::Streaming => state.streaming,
        FactorInput::StartTime => f64::from(state.start_time),
    }
}

/// Sub-score on the 0-100 scale.
#[must_use]
pub fn apply_transform(transform: &Transform, value: f64) -> f64 {
    match *transform {
        Transform::Linear {
            in_min,
            in_max,
            out_min,
            out_max,
        } => map_range(value, in_min, in_max, out_min, out_max),
        Transform::Bell { optimal, spread } => bell_curve(value, optimal, spread) * 100.0,
    }
}

#[must_use]
pub fn calculate_satisfaction(state: &NegotiationState, model: &StakeholderModel) -> u8 {
    let stakeholder = model.stakeholder();
    let raw: f64 = model
        .factors()
        .iter()
        .map(|factor| {
            let input = factor_input(state, stakeholder, factor.input);
            apply_transform(&factor.transform, input) * factor.weight
        })
        .sum();
    let score = to_score(raw);
    debug!(%stakeholder, raw, score, "Scored stakeholder");
    score
}

#[must_use]
pub fn calculate_player_satisfaction(state: &NegotiationState, scoring: &ScoringModel) -> u8 {
    calculate_satisfaction(state, scoring.for_stakeholder(Stakeholder::Players))
}

#[must_use]
pub fn calculate_owner_satisfaction(state: &NegotiationState, scoring: &ScoringModel) -> u8 {
    calculate_satisfaction(state, scoring.for_stakeholder(Stakeholder::Owners))
}

#[must_use]
pub fn calculate_network_satisfaction(state: &NegotiationState, scoring: &ScoringModel) -> u8 {
    calculate_satisfaction(state, scoring.for_stakeholder(Stakeholder::Networks))
}

#[must_use]
pub fn calculate_fan_satisfaction(state: &NegotiationState, scoring: &ScoringModel) -> u8 {
    calculate_satisfaction(state, scoring.for_stakeholder(Stakeholder::Fans))
}

/// Score all four stakeholders. The entry point after any state change.
#[must_use]
pub fn calculate_all_satisfactions(
    state: &NegotiationState,
    scoring: &ScoringModel,
) -> SatisfactionScores {
    SatisfactionScores::new(
        calculate_player_satisfaction(state, scoring),
        calculate_owner_satisfaction(state, scoring),
        calculate_network_satisfaction(state, scoring),
        calculate_fan_satisfaction(state, scoring),
    )
}

#[cfg(test)]
mod tests {
    use moneymaker_types::{Allocation, Factor};

    use super::*;

    fn scores_of(state: &NegotiationState) -> [u8; 4] {
        let scores = calculate_all_satisfactions(state, &ScoringModel::default());
        Stakeholder::ALL.map(|stakeholder| scores.get(stakeholder))
    }

    #[test]
    fn default_state_scores() {
        assert_eq!(scores_of(&NegotiationState::default()), [58, 71, 84, 80]);
    }

    #[test]
    fn balanced_state_scores() {
        let state = NegotiationState {
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
        };
        assert_eq!(scores_of(&state), [67, 70, 83, 89]);
    }

    #[test]
    fn league_heavy_state_scores() {
        let state = NegotiationState {
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
        };
        assert_eq!(scores_of(&state), [18, 53, 30, 28]);
    }

    #[test]
    fn player_heavy_state_scores() {
        let state = NegotiationState {
            allocation: Allocation {
                players: 8.0,
                owners: 0.0,
                networks: 0.0,
                league: 0.0,
            },
            total_deal: 8.0,
            min_salary: 2000.0,
            revenue_share: 100.0,
            start_time: 0,
            streaming: 0.0,
            salary_share: 100.0,
        };
        assert_eq!(scores_of(&state), [100, 16, 45, 82]);
    }

    #[test]
    fn scores_stay_in_range_for_extreme_inputs() {
        let extremes = [-1e12, -1.0, 0.0, 1e-9, 50.0, 1e12];
        for &value in &extremes {
            for &total in &[0.0, -8.0, 8.0, 1e12] {
                let state = NegotiationState {
                    allocation: Allocation {
                        players: value,
                        owners: -value,
                        networks: value,
                        league: value,
                    },
                    total_deal: total,
                    min_salary: value,
                    revenue_share: -value,
                    start_time: u32::MAX,
                    streaming: value,
                    salary_share: value,
                };
                for score in scores_of(&state) {
                    assert!(score <= 100);
                }
            }
        }
    }

    #[test]
    fn zero_total_deal_does_not_poison_scores() {
        let state = NegotiationState {
            total_deal: 0.0,
            allocation: Allocation {
                players: 0.0,
                owners: 0.0,
                networks: 0.0,
                league: 0.0,
            },
            ..NegotiationState::default()
        };
        let scores = calculate_all_satisfactions(&state, &ScoringModel::default());
        assert!(scores.iter().all(|(_, value)| value <= 100));
    }

    #[test]
    fn allocation_input_is_percent_of_deal() {
        let state = NegotiationState::default();
        assert_eq!(
            factor_input(&state, Stakeholder::Players, FactorInput::Allocation),
            45.0
        );
        assert_eq!(
            factor_input(&state, Stakeholder::Owners, FactorInput::StartTime),
            2.0
        );
    }

    #[test]
    fn bell_transform_is_scaled_to_percent() {
        assert_eq!(apply_transform(&Transform::bell(30.0, 20.0), 30.0), 100.0);
    }

    #[test]
    fn custom_model_is_honored() {
        let model = StakeholderModel::new(
            Stakeholder::Fans,
            vec![Factor::new(
                FactorInput::Streaming,
                Transform::linear(0.0, 100.0, 0.0, 100.0),
                1.0,
            )],
        )
        .unwrap();
        let scoring = ScoringModel::default().with_model(model);
        let state = NegotiationState {
            streaming: 42.0,
            ..NegotiationState::default()
        };
        assert_eq!(calculate_fan_satisfaction(&state, &scoring), 42);
    }
}
