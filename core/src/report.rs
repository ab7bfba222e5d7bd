//! Plain-text rendering for terminals.

use std::fmt::Write;

use moneymaker_types::{Mood, Stakeholder};

use crate::clock::Clock;
use crate::evaluation::{balance_text, comment, lowest_stakeholder, overall_score};
use crate::history::HistoryStore;
use crate::session::{Finalized, Negotiation};

const NAME_WIDTH: usize = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Glyphs {
    #[default]
    Ascii,
    Emoji,
}

impl Glyphs {
    fn mood(self, mood: Mood) -> &'static str {
        match self {
            Glyphs::Ascii => mood.ascii(),
            Glyphs::Emoji => mood.emoji(),
        }
    }
}

/// Live view: per-stakeholder scores and reactions, stability and the tier the
/// deal would get right now.
pub fn render_status<S: HistoryStore, C: Clock>(
    session: &Negotiation<S, C>,
    glyphs: Glyphs,
) -> String {
    let tuning = session.tuning();
    let state = session.state();
    let scores = session.boosted_scores();
    let mut out = String::new();

    for (stakeholder, value) in scores.iter() {
        let _ = writeln!(
            out,
            "{:<NAME_WIDTH$}  {value:>3}  {:<3}  {}",
            stakeholder.display_name(),
            glyphs.mood(Mood::from_satisfaction(value)),
            comment(tuning.profiles(), stakeholder, value),
        );
    }
    out.push('\n');

    let lowest = lowest_stakeholder(&scores);
    let _ = writeln!(
        out,
        "Overall: {}  Lowest: {} ({})",
        overall_score(&scores),
        lowest.name,
        lowest.value
    );
    let _ = writeln!(out, "Stability: {}", session.stability());
    let _ = writeln!(
        out,
        "Balance: {} (revenue share {}%)",
        balance_text(state.revenue_share),
        state.revenue_share
    );
    match tuning.start_time(state.start_time) {
        Some(option) => {
            let _ = writeln!(
                out,
                "Start time: {} {} ({})",
                option.time, option.label, option.impact
            );
        }
        None => {
            let _ = writeln!(out, "Start time: option {}", state.start_time);
        }
    }
    let _ = writeln!(
        out,
        "Allocation: {} ({:.1} of {:.1})",
        if session.allocation_is_valid() {
            "ok"
        } else {
            "does not add up"
        },
        state.allocation.total(),
        state.total_deal
    );
    if session.bonus() > 0 {
        let _ = writeln!(out, "Mini-game bonus: +{}", session.bonus());
    }

    let preview = session.tier_preview();
    let _ = write!(
        out,
        "Verdict: {} ({})",
        preview.tier.title(),
        preview.tier
    );
    out
}

/// Result screen for a finalized negotiation.
#[must_use]
pub fn render_outcome(outcome: &Finalized, glyphs: Glyphs) -> String {
    let tier = outcome.tier.tier;
    let mut out = String::new();

    let _ = writeln!(out, "{} - {}", tier.title(), tier.subtitle());
    let _ = writeln!(out, "{}", outcome.tier.message);
    let _ = writeln!(
        out,
        "Overall: {} (min {})",
        outcome.tier.overall, outcome.tier.min_satisfaction
    );
    for stakeholder in Stakeholder::ALL {
        let value = outcome.satisfactions.get(stakeholder);
        let _ = writeln!(
            out,
            "  {:<NAME_WIDTH$}  {value:>3}  {}",
            stakeholder.display_name(),
            glyphs.mood(Mood::from_satisfaction(value))
        );
    }

    match outcome.result.code() {
        Some(code) => {
            let _ = write!(out, "Claim code: {code}");
        }
        None => {
            let _ = write!(
                out,
                "{} walked away at {}.",
                outcome.lowest.name, outcome.lowest.value
            );
        }
    }
    if !outcome.stored {
        out.push_str("\n(result not saved)");
    }
    out
}
