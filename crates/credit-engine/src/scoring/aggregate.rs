use super::application::ApplicationRecord;
use super::components::{clamp, ComponentScores, ComponentValues, Contributions};
use super::config::{EngineConfig, PenaltyPolicy, SCORE_CEILING};
use serde::{Deserialize, Serialize};

/// Business rule that forced a hard block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyReason {
    PriorDefault,
    LegalDispute,
}

/// Weighted total, penalties, and policy overrides for one application.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub contributions: Contributions,
    pub weighted_total: f64,
    pub penalty_points: f64,
    /// Final score in `[0, 100]`, unrounded.
    pub score: f64,
    pub hard_block: bool,
    pub policy_reasons: Vec<PolicyReason>,
}

/// Share of the penalty budget consumed, in `[0, 1]`.
pub fn penalty_fraction(record: &ApplicationRecord, policy: &PenaltyPolicy) -> f64 {
    let mut penalty = 0.0;
    if record.defaulted_loans {
        penalty += policy.default_share;
    }
    if record.legal_issues {
        penalty += policy.legal_issue_share;
    }
    penalty += clamp(
        record.payment_delays as f64 / policy.delays_for_full_share,
        0.0,
        policy.max_delay_share,
    );
    clamp(penalty, 0.0, 1.0)
}

pub fn aggregate(
    record: &ApplicationRecord,
    scores: &ComponentScores,
    config: &EngineConfig,
) -> Aggregate {
    let mut contributions = ComponentValues::default();
    let mut weighted_total = 0.0;
    for (component, score) in scores.iter() {
        let contribution = clamp(score, 0.0, 1.0) * config.weights.weight(component);
        weighted_total += contribution;
        contributions.set(component, contribution);
    }

    let penalty_points = penalty_fraction(record, &config.penalty) * config.penalty.budget;
    let mut score = clamp(weighted_total - penalty_points, 0.0, SCORE_CEILING);

    let mut policy_reasons = Vec::new();
    if record.defaulted_loans {
        policy_reasons.push(PolicyReason::PriorDefault);
    }
    if record.legal_issues {
        policy_reasons.push(PolicyReason::LegalDispute);
    }
    let hard_block = !policy_reasons.is_empty();
    if hard_block {
        score = score.min(config.penalty.hard_block_cap);
    }

    Aggregate {
        contributions,
        weighted_total,
        penalty_points,
        score,
        hard_block,
        policy_reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::components::Component;

    fn perfect_scores() -> ComponentScores {
        let mut scores = ComponentValues::default();
        for component in Component::ordered() {
            scores.set(component, 1.0);
        }
        scores
    }

    #[test]
    fn perfect_profile_reaches_the_weight_total() {
        let config = EngineConfig::standard();
        let result = aggregate(&ApplicationRecord::default(), &perfect_scores(), &config);
        assert_eq!(result.weighted_total, 98.0);
        assert_eq!(result.score, 98.0);
        assert_eq!(result.contributions.get(Component::KkbCreditHistory), 25.0);
        assert!(!result.hard_block);
    }

    #[test]
    fn delays_are_capped_at_a_fifth_of_the_budget() {
        let policy = EngineConfig::standard().penalty;
        let three = ApplicationRecord {
            payment_delays: 3,
            ..ApplicationRecord::default()
        };
        let many = ApplicationRecord {
            payment_delays: 40,
            ..ApplicationRecord::default()
        };
        assert!((penalty_fraction(&three, &policy) - 0.2).abs() < 1e-12);
        assert!((penalty_fraction(&many, &policy) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn hard_block_caps_after_subtraction_and_records_reasons() {
        let config = EngineConfig::standard();
        let record = ApplicationRecord {
            defaulted_loans: true,
            legal_issues: true,
            ..ApplicationRecord::default()
        };
        let result = aggregate(&record, &perfect_scores(), &config);

        assert!((result.penalty_points - 14.0).abs() < 1e-9);
        assert_eq!(result.score, 60.0);
        assert!(result.hard_block);
        assert_eq!(
            result.policy_reasons,
            vec![PolicyReason::PriorDefault, PolicyReason::LegalDispute]
        );
    }

    #[test]
    fn cap_never_raises_a_low_score() {
        let config = EngineConfig::standard();
        let record = ApplicationRecord {
            legal_issues: true,
            ..ApplicationRecord::default()
        };
        let result = aggregate(&record, &ComponentValues::default(), &config);
        assert_eq!(result.score, 0.0);
        assert!(result.hard_block);
    }
}
