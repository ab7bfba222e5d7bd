//! Config files driving a live session.

use std::fs;

use moneymaker_config::{ConfigError, load_settings};
use moneymaker_core::{JsonFileStore, Negotiation, ResultHistory};
use moneymaker_types::{SatisfactionScores, Stakeholder, Tier};

use crate::common::fixed_clock;

#[test]
fn tuned_config_changes_scores_and_verdict() {
    let dir = tempfile::tempdir().unwrap();
    let history_path = dir.path().join("custom").join("results.json");
    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!(
            r#"
[app]
history_path = "{}"
allocation_tolerance = 0.5

[scoring.fans]
factors = [
  {{ input = "start_time", weight = 1.0, transform = {{ kind = "linear", in_min = 0.0, in_max = 4.0, out_min = 100.0, out_max = 0.0 }} }},
]

[tiers]
bronze = {{ overall = 60, min = 40 }}
"#,
            history_path.display()
        ),
    )
    .unwrap();

    let settings = load_settings(Some(&config_path)).unwrap();
    assert_eq!(settings.app.history_path.as_deref(), Some(history_path.as_path()));

    let store = JsonFileStore::new(settings.app.history_path.clone().unwrap());
    let mut session =
        Negotiation::from_settings(settings, ResultHistory::with_clock(store, fixed_clock()));

    // Opening offer starts at 7:30 PM (index 2): halfway down the fans' line.
    assert_eq!(session.scores().get(Stakeholder::Fans), 50);
    assert_eq!(session.scores(), SatisfactionScores::new(58, 71, 84, 50));

    session.set_total_deal(8.4);
    assert!(session.allocation_is_valid());
    session.set_total_deal(8.0);

    let outcome = session.finalize().unwrap();
    assert_eq!(outcome.tier.tier, Tier::Bronze);
    assert!(history_path.exists());
}

#[test]
fn invalid_tuning_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "[stability]\nwarning_below = 30\n").unwrap();

    let err = load_settings(Some(&config_path)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }));
    assert_eq!(err.path(), &config_path);
}
