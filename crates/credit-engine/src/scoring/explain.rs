use super::catalog::{Bucket, Locale};
use super::components::{Component, ComponentScores, Contributions};
use super::rounding::round_to;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

const TOP_FEATURES: usize = 5;
const HIGH_IMPACT_POINTS: f64 = 12.0;
const MEDIUM_IMPACT_POINTS: f64 = 6.0;

/// A sub-score threshold that selects a narrative message.
#[derive(Debug, Clone, Copy)]
struct NarrativeRule {
    component: Component,
    bucket: Bucket,
    threshold: f64,
}

impl NarrativeRule {
    const fn strong(component: Component, threshold: f64) -> Self {
        Self {
            component,
            bucket: Bucket::Strong,
            threshold,
        }
    }

    const fn weak(component: Component, threshold: f64) -> Self {
        Self {
            component,
            bucket: Bucket::Weak,
            threshold,
        }
    }

    fn matches(&self, scores: &ComponentScores) -> bool {
        let score = scores.get(self.component);
        match self.bucket {
            Bucket::Strong => score >= self.threshold,
            Bucket::Weak => score < self.threshold,
        }
    }
}

const POSITIVE_RULES: [NarrativeRule; 7] = [
    NarrativeRule::strong(Component::KkbCreditHistory, 0.7),
    NarrativeRule::strong(Component::DtiRatio, 0.7),
    NarrativeRule::strong(Component::CreditUtilization, 0.7),
    NarrativeRule::strong(Component::Liquidity, 0.6),
    NarrativeRule::strong(Component::CollateralAssets, 0.4),
    NarrativeRule::strong(Component::Stability, 0.6),
    NarrativeRule::strong(Component::BankingRelationship, 0.5),
];

const NEGATIVE_RULES: [NarrativeRule; 5] = [
    NarrativeRule::weak(Component::KkbCreditHistory, 0.4),
    NarrativeRule::weak(Component::DtiRatio, 0.4),
    NarrativeRule::weak(Component::CreditUtilization, 0.4),
    NarrativeRule::weak(Component::Liquidity, 0.4),
    NarrativeRule::weak(Component::Stability, 0.4),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    pub fn from_points(points: f64) -> Self {
        if points >= HIGH_IMPACT_POINTS {
            Self::High
        } else if points >= MEDIUM_IMPACT_POINTS {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// One of the highest weighted contributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImpact {
    pub feature: String,
    pub impact: Impact,
    pub direction: String,
    pub contribution: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Explainability {
    pub positives: Vec<String>,
    pub negatives: Vec<String>,
    pub top_five_features: Vec<FeatureImpact>,
}

/// Components ordered by contribution, largest first; equal values keep canonical order.
pub fn rank_contributions(contributions: &Contributions) -> Vec<(Component, f64)> {
    let mut ranked: Vec<(Component, f64)> = contributions.iter().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked
}

pub fn explain(
    scores: &ComponentScores,
    contributions: &Contributions,
    penalty_points: f64,
    locale: Locale,
) -> Explainability {
    let render = |rules: &[NarrativeRule]| -> Vec<String> {
        rules
            .iter()
            .filter(|rule| rule.matches(scores))
            .filter_map(|rule| locale.narrative(rule.component, rule.bucket))
            .map(str::to_string)
            .collect()
    };

    let positives = render(&POSITIVE_RULES[..]);
    let mut negatives = render(&NEGATIVE_RULES[..]);
    if penalty_points > 0.0 {
        negatives.push(locale.penalty_note(penalty_points));
    }

    let top_five_features = rank_contributions(contributions)
        .into_iter()
        .take(TOP_FEATURES)
        .map(|(component, contribution)| FeatureImpact {
            feature: locale.feature_name(component).to_string(),
            impact: Impact::from_points(contribution),
            direction: if contribution > 0.0 { "+" } else { "-" }.to_string(),
            contribution: round_to(contribution, 1),
            reason: locale.contribution_reason(contribution),
        })
        .collect();

    Explainability {
        positives,
        negatives,
        top_five_features,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::components::ComponentValues;

    fn values(pairs: &[(Component, f64)]) -> ComponentValues {
        let mut values = ComponentValues::default();
        for (component, value) in pairs {
            values.set(*component, *value);
        }
        values
    }

    #[test]
    fn ties_keep_canonical_component_order() {
        let contributions = values(&[
            (Component::Liquidity, 5.0),
            (Component::Stability, 5.0),
            (Component::DtiRatio, 5.0),
            (Component::KkbCreditHistory, 20.0),
        ]);

        let ranked: Vec<Component> = rank_contributions(&contributions)
            .into_iter()
            .map(|(component, _)| component)
            .collect();

        assert_eq!(
            &ranked[..4],
            &[
                Component::KkbCreditHistory,
                Component::DtiRatio,
                Component::Liquidity,
                Component::Stability,
            ]
        );
    }

    #[test]
    fn classifies_impact_and_direction() {
        let contributions = values(&[
            (Component::KkbCreditHistory, 12.0),
            (Component::DtiRatio, 11.99),
            (Component::IncomeAdequacy, 6.0),
            (Component::CreditUtilization, 5.99),
        ]);

        let explanation = explain(
            &ComponentValues::default(),
            &contributions,
            0.0,
            Locale::Turkish,
        );
        let impacts: Vec<Impact> = explanation
            .top_five_features
            .iter()
            .map(|feature| feature.impact)
            .collect();

        assert_eq!(
            impacts,
            vec![
                Impact::High,
                Impact::Medium,
                Impact::Medium,
                Impact::Low,
                Impact::Low
            ]
        );
        assert_eq!(explanation.top_five_features[0].direction, "+");
        assert_eq!(explanation.top_five_features[4].direction, "-");
        assert_eq!(explanation.top_five_features[4].contribution, 0.0);
        assert_eq!(explanation.top_five_features[1].contribution, 12.0);
        assert_eq!(explanation.top_five_features[1].feature, "Borç/Gelir Oranı");
    }

    #[test]
    fn narrative_thresholds_and_penalty_note() {
        let scores = values(&[
            (Component::KkbCreditHistory, 0.7),
            (Component::DtiRatio, 0.39),
            (Component::CreditUtilization, 1.0),
            (Component::Liquidity, 0.5),
            (Component::CollateralAssets, 0.4),
            (Component::Stability, 0.6),
            (Component::BankingRelationship, 0.1),
        ]);

        let explanation = explain(&scores, &ComponentValues::default(), 3.3, Locale::English);

        assert_eq!(
            explanation.positives,
            vec![
                "High KKB score - reliable credit history",
                "Low credit card utilisation - disciplined spending",
                "Valuable assets and collateral support",
                "Stable employment and residence",
            ]
        );
        assert_eq!(
            explanation.negatives,
            vec![
                "High total debt burden - sustainability risk",
                "Risk penalty: 3.3 points",
            ]
        );
    }

    #[test]
    fn no_penalty_note_without_penalty() {
        let scores = values(&[(Component::Liquidity, 0.5), (Component::Stability, 0.5)]);
        let explanation = explain(&scores, &ComponentValues::default(), 0.0, Locale::Turkish);
        assert!(explanation
            .negatives
            .iter()
            .all(|note| !note.starts_with("Risk cezası")));
        assert_eq!(
            explanation.negatives,
            vec![
                "Düşük KKB skoru - kredi geçmişi risk taşıyor",
                "Yüksek toplam borç yükü - sürdürülebilirlik riski",
                "Yüksek kredi kartı kullanım oranı",
            ]
        );
    }
}
