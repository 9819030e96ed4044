// src/pipeline/decide.rs

//! Decision step: page text, rules and prior marker in; [`Decision`] out.
//!
//! No I/O happens here. Persisting the marker is left to the caller, who
//! does it only after the notification is confirmed sent.

use crate::models::{AlertRules, AlertState, Decision, SuppressReason};
use crate::services::{exceeds, extract};

/// Decide what to do about `fragment`.
///
/// An existing marker for the same draw wins over the threshold check, so
/// re-running for a draw that already alerted never alerts again.
pub fn decide(fragment: &str, rules: &AlertRules, prior: Option<&AlertState>) -> Decision {
    if fragment.trim().is_empty() {
        return Decision::NoData;
    }

    let estimate = match extract(fragment) {
        Ok(estimate) => estimate,
        Err(reason) => return Decision::ParseError(reason),
    };

    let draw_key = estimate.draw_key(rules.dedup);

    if prior.is_some_and(|state| state.last_alerted_draw_key == draw_key) {
        return Decision::Suppressed {
            estimate,
            reason: SuppressReason::AlreadyAlerted { draw_key },
        };
    }

    if !exceeds(estimate.amount, &rules.threshold) {
        return Decision::Suppressed {
            estimate,
            reason: SuppressReason::BelowThreshold {
                threshold: rules.threshold.amount,
            },
        };
    }

    Decision::Alert { estimate, draw_key }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DedupScope, DrawEstimate, Threshold};
    use crate::services::NotFound;
    use rust_decimal::Decimal;

    const PAGE: &str = r#"
        <div>Next Jackpot Estimate</div><div>$16,000,000</div>
        <div>Next Draw</div><div>2025-07-01</div>
    "#;

    fn rules(threshold: i64) -> AlertRules {
        AlertRules {
            threshold: Threshold::new(Decimal::from(threshold)),
            dedup: DedupScope::Draw,
        }
    }

    fn expected_estimate() -> DrawEstimate {
        DrawEstimate {
            amount: Decimal::from(16_000_000),
            draw_datetime: "2025-07-01".to_string(),
        }
    }

    #[test]
    fn scenario_a_alerts_above_threshold() {
        let decision = decide(PAGE, &rules(15_000_000), None);
        assert_eq!(
            decision,
            Decision::Alert {
                estimate: expected_estimate(),
                draw_key: "2025-07-01".to_string(),
            }
        );
    }

    #[test]
    fn scenario_b_equal_amount_is_below_threshold() {
        let decision = decide(PAGE, &rules(16_000_000), None);
        assert_eq!(
            decision,
            Decision::Suppressed {
                estimate: expected_estimate(),
                reason: SuppressReason::BelowThreshold {
                    threshold: Decimal::from(16_000_000),
                },
            }
        );
    }

    #[test]
    fn scenario_c_already_alerted() {
        let prior = AlertState::new("2025-07-01");
        let decision = decide(PAGE, &rules(15_000_000), Some(&prior));
        assert!(matches!(
            decision,
            Decision::Suppressed {
                reason: SuppressReason::AlreadyAlerted { .. },
                ..
            }
        ));
    }

    #[test]
    fn already_alerted_wins_over_threshold() {
        let prior = AlertState::new("2025-07-01");
        let decision = decide(PAGE, &rules(20_000_000), Some(&prior));
        assert_eq!(decision.label(), "suppressed_already_alerted");
    }

    #[test]
    fn scenario_d_no_label_is_parse_error() {
        let decision = decide("<p>Results for last draw</p>", &rules(1), None);
        assert_eq!(decision, Decision::ParseError(NotFound::Jackpot));
    }

    #[test]
    fn empty_page_is_no_data() {
        assert_eq!(decide("  \n ", &rules(1), None), Decision::NoData);
    }

    #[test]
    fn marker_for_other_draw_does_not_suppress() {
        let prior = AlertState::new("2025-06-28");
        let decision = decide(PAGE, &rules(15_000_000), Some(&prior));
        assert_eq!(decision.label(), "alert");
    }

    #[test]
    fn amount_scope_realerts_when_jackpot_grows() {
        let rules = AlertRules {
            threshold: Threshold::new(Decimal::from(15_000_000)),
            dedup: DedupScope::DrawAndAmount,
        };
        let prior = AlertState::new("2025-07-01|15500000");
        let decision = decide(PAGE, &rules, Some(&prior));
        assert_eq!(
            decision,
            Decision::Alert {
                estimate: expected_estimate(),
                draw_key: "2025-07-01|16000000".to_string(),
            }
        );

        let prior = AlertState::new("2025-07-01|16000000");
        let decision = decide(PAGE, &rules, Some(&prior));
        assert_eq!(decision.label(), "suppressed_already_alerted");
    }

    #[test]
    fn repeated_runs_alert_once_when_marker_is_kept() {
        let rules = rules(15_000_000);
        let first = decide(PAGE, &rules, None);
        let Decision::Alert { draw_key, .. } = first else {
            panic!("expected an alert, got {first:?}");
        };

        let marker = AlertState::new(draw_key);
        let second = decide(PAGE, &rules, Some(&marker));
        assert_eq!(second.label(), "suppressed_already_alerted");
    }
}
