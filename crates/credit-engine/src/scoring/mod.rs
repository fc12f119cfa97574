//! Deterministic multi-factor credit scoring.
//!
//! Data flows linearly: [`ApplicationRecord`] → [`DerivedMetrics`] → [`ComponentScores`] →
//! [`Aggregate`] → [`Decision`]. The limit recommender and the explainability generator both
//! read the aggregate independently and everything is merged into a [`ScoringResult`].
//!
//! The engine holds only immutable configuration, so one instance can be shared across threads.

pub mod aggregate;
pub mod application;
pub mod catalog;
pub mod components;
pub mod config;
pub mod decision;
pub mod derivation;
pub mod explain;
pub mod limits;
pub mod result;
pub mod rounding;

#[cfg(test)]
mod tests;

pub use aggregate::{Aggregate, PolicyReason};
pub use application::{ApplicationRecord, NormalizationError};
pub use catalog::Locale;
pub use components::{Component, ComponentScores, Contributions};
pub use config::{EngineConfig, EngineConfigError};
pub use decision::Decision;
pub use derivation::{annuity_payment, DebtSource, DerivedMetrics};
pub use explain::{Explainability, FeatureImpact, Impact};
pub use limits::LoanLimits;
pub use result::{Assumptions, Calculations, PolicyFlags, ScoringResult};

use chrono::{Local, NaiveDateTime};
use rounding::round_to;

/// Seam between the request-handling layer and a scoring strategy.
pub trait CreditScorer: Send + Sync {
    /// Label stamped on every result this scorer produces.
    fn version(&self) -> &str;

    fn score_at(&self, record: &ApplicationRecord, timestamp: NaiveDateTime) -> ScoringResult;

    fn score(&self, record: &ApplicationRecord) -> ScoringResult {
        self.score_at(record, Local::now().naive_local())
    }
}

/// Every intermediate stage of one evaluation, before rounding and rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub metrics: DerivedMetrics,
    pub scores: ComponentScores,
    pub aggregate: Aggregate,
    pub decision: Decision,
    pub limits: LoanLimits,
}

/// The weighted scorecard engine.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: EngineConfig,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl ScoringEngine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineConfigError> {
        Ok(Self {
            config: config.validate()?,
        })
    }

    /// Engine with the standard configuration, which is known to validate.
    pub fn standard() -> Self {
        Self {
            config: EngineConfig::standard(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn evaluate(&self, record: &ApplicationRecord) -> Evaluation {
        let monthly_rate = self.config.monthly_rate();
        let metrics = DerivedMetrics::derive(record, monthly_rate);
        let scores = components::score_components(record, &metrics);
        let aggregate = aggregate::aggregate(record, &scores, &self.config);
        let decision = Decision::classify(aggregate.score, &self.config.thresholds);
        let limits = limits::recommend(
            &metrics,
            record.loan_amount,
            record.loan_term_months,
            monthly_rate,
            decision,
            &self.config.limits,
        );

        Evaluation {
            metrics,
            scores,
            aggregate,
            decision,
            limits,
        }
    }

    fn assemble(&self, evaluation: Evaluation, timestamp: NaiveDateTime) -> ScoringResult {
        let locale = self.config.locale;
        let Evaluation {
            metrics,
            scores,
            aggregate,
            decision,
            limits,
        } = evaluation;

        let explainability = explain::explain(
            &scores,
            &aggregate.contributions,
            aggregate.penalty_points,
            locale,
        );

        ScoringResult {
            score: round_to(aggregate.score, 2),
            decision,
            limits,
            assumptions: Assumptions {
                monthly_interest_rate_used: self.config.monthly_rate(),
                annual_rate: self.config.annual_rate,
                notes: locale.assumption_notes(metrics.debt_source, self.config.annual_rate),
            },
            explainability,
            calculations: Calculations::from(&metrics),
            policy_flags: PolicyFlags {
                hard_block: aggregate.hard_block,
                reasons: aggregate
                    .policy_reasons
                    .iter()
                    .map(|reason| locale.policy_reason(*reason).to_string())
                    .collect(),
            },
            timestamp,
            engine_version: self.config.engine_version.clone(),
        }
    }
}

impl CreditScorer for ScoringEngine {
    fn version(&self) -> &str {
        &self.config.engine_version
    }

    fn score_at(&self, record: &ApplicationRecord, timestamp: NaiveDateTime) -> ScoringResult {
        let evaluation = self.evaluate(record);
        self.assemble(evaluation, timestamp)
    }
}
