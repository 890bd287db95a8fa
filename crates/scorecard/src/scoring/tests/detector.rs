use super::common::*;
use crate::scoring::{EngineConfig, LowPerformerVerdict, Scale, ScoringEngine};

fn rolling_ten_point_engine() -> ScoringEngine {
    let config = EngineConfig::builder(Scale::TEN_POINT)
        .band("pass", 5.0, 5.0, "Meets expectations")
        .band("fail", 0.0, 0.0, "Below expectations")
        .low_performer(5.0, 2, 2)
        .build()
        .expect("valid detector config");
    ScoringEngine::new(config)
}

#[test]
fn flags_sustained_low_scores() {
    let engine = rolling_ten_point_engine();
    let periods = vec![
        period_score("emp-1", "2025-01", 4.0),
        period_score("emp-1", "2025-02", 4.0),
    ];

    let verdict = engine.low_performer(&periods);

    assert_eq!(
        verdict,
        LowPerformerVerdict::Flagged {
            rolling_average: 4.0,
            window: 2
        }
    );
}

#[test]
fn single_period_below_gate_is_insufficient_data() {
    let engine = rolling_ten_point_engine();
    let periods = vec![period_score("emp-1", "2025-01", 4.0)];

    let verdict = engine.low_performer(&periods);

    assert_eq!(
        verdict,
        LowPerformerVerdict::InsufficientData {
            available: 1,
            required: 2
        }
    );
    assert!(!verdict.is_flagged());
}

#[test]
fn recovery_in_the_window_clears_the_flag() {
    let engine = rolling_ten_point_engine();
    let periods = vec![
        period_score("emp-1", "2025-01", 4.0),
        period_score("emp-1", "2025-02", 9.0),
    ];

    let verdict = engine.low_performer(&periods);

    assert_eq!(
        verdict,
        LowPerformerVerdict::Clear {
            rolling_average: 6.5,
            window: 2
        }
    );
}

#[test]
fn old_history_outside_the_window_is_ignored() {
    let engine = rolling_ten_point_engine();
    let periods = vec![
        period_score("emp-1", "2025-01", 2.0),
        period_score("emp-1", "2025-02", 2.0),
        period_score("emp-1", "2025-03", 8.0),
        period_score("emp-1", "2025-04", 8.0),
    ];

    let verdict = engine.low_performer(&periods);

    assert!(matches!(verdict, LowPerformerVerdict::Clear { .. }));
}

#[test]
fn employee_policy_flags_a_single_bad_month() {
    let engine = employee_engine();
    let periods = vec![period_score("emp-1", "2025-01", 4.5)];

    assert!(engine.low_performer(&periods).is_flagged());
}

#[test]
fn seo_policy_waits_for_two_months_of_history() {
    let engine = seo_engine();
    let one_month = vec![period_score("client-1", "2025-01", 40.0)];
    let two_months = vec![
        period_score("client-1", "2025-01", 40.0),
        period_score("client-1", "2025-02", 50.0),
    ];

    assert!(matches!(
        engine.low_performer(&one_month),
        LowPerformerVerdict::InsufficientData { .. }
    ));
    assert!(engine.low_performer(&two_months).is_flagged());
}
