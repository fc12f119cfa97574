use super::catalog::Locale;
use super::components::Component;
use serde::{Deserialize, Serialize};

/// Sum of the standard component weights. The final score is still clamped to `SCORE_CEILING`.
pub const EXPECTED_WEIGHT_TOTAL: f64 = 98.0;
pub const SCORE_CEILING: f64 = 100.0;

const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Points awarded to each component at a perfect sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentWeights {
    pub kkb_credit_history: f64,
    pub dti_ratio: f64,
    pub income_adequacy: f64,
    pub credit_utilization: f64,
    pub liquidity: f64,
    pub collateral_assets: f64,
    pub stability: f64,
    pub banking_relationship: f64,
}

impl ComponentWeights {
    pub const fn standard() -> Self {
        Self {
            kkb_credit_history: 25.0,
            dti_ratio: 20.0,
            income_adequacy: 15.0,
            credit_utilization: 8.0,
            liquidity: 10.0,
            collateral_assets: 8.0,
            stability: 7.0,
            banking_relationship: 5.0,
        }
    }

    pub const fn weight(&self, component: Component) -> f64 {
        match component {
            Component::KkbCreditHistory => self.kkb_credit_history,
            Component::DtiRatio => self.dti_ratio,
            Component::IncomeAdequacy => self.income_adequacy,
            Component::CreditUtilization => self.credit_utilization,
            Component::Liquidity => self.liquidity,
            Component::CollateralAssets => self.collateral_assets,
            Component::Stability => self.stability,
            Component::BankingRelationship => self.banking_relationship,
        }
    }

    pub fn total(&self) -> f64 {
        Component::ordered()
            .into_iter()
            .map(|component| self.weight(component))
            .sum()
    }
}

/// Score cut-offs; a score equal to a threshold belongs to the higher band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionThresholds {
    pub approve: f64,
    pub conditional: f64,
}

/// Parameters of the affordability search and term recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimitPolicy {
    /// Largest installment allowed, as a share of net income.
    pub target_payment_ratio: f64,
    /// Candidates are searched up to `loan_amount * ceiling_multiplier`.
    pub ceiling_multiplier: f64,
    /// The search step is `loan_amount / step_divisor`, never below `min_step`.
    pub step_divisor: f64,
    pub min_step: f64,
    pub rounding_quantum: f64,
    pub extension_dti_trigger: f64,
    pub term_extension_months: i64,
    pub max_term_months: i64,
}

/// Penalty shares and the hard-block cap applied after subtraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyPolicy {
    pub budget: f64,
    pub default_share: f64,
    pub legal_issue_share: f64,
    /// Delays are divided by this before being capped at `max_delay_share`.
    pub delays_for_full_share: f64,
    pub max_delay_share: f64,
    pub hard_block_cap: f64,
}

/// Immutable scoring configuration, validated once when the engine is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fixed annual rate in percent.
    pub annual_rate: f64,
    pub weights: ComponentWeights,
    pub penalty: PenaltyPolicy,
    pub thresholds: DecisionThresholds,
    pub limits: LimitPolicy,
    pub locale: Locale,
    pub engine_version: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl EngineConfig {
    pub fn standard() -> Self {
        Self {
            annual_rate: 4.09,
            weights: ComponentWeights::standard(),
            penalty: PenaltyPolicy {
                budget: 20.0,
                default_share: 0.35,
                legal_issue_share: 0.35,
                delays_for_full_share: 6.0,
                max_delay_share: 0.2,
                hard_block_cap: 60.0,
            },
            thresholds: DecisionThresholds {
                approve: 75.0,
                conditional: 60.0,
            },
            limits: LimitPolicy {
                target_payment_ratio: 0.35,
                ceiling_multiplier: 1.5,
                step_divisor: 50.0,
                min_step: 1000.0,
                rounding_quantum: 1000.0,
                extension_dti_trigger: 0.45,
                term_extension_months: 12,
                max_term_months: 84,
            },
            locale: Locale::Turkish,
            engine_version: "Finiş Bankası Advanced Scoring v3.0 (Fixed 4.09%)".to_string(),
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Periodic rate used by every annuity computation.
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / 100.0 / 12.0
    }

    pub fn validate(self) -> Result<Self, EngineConfigError> {
        if !self.annual_rate.is_finite() || self.annual_rate < 0.0 {
            return Err(EngineConfigError::InvalidRate(self.annual_rate));
        }

        for component in Component::ordered() {
            let weight = self.weights.weight(component);
            if !weight.is_finite() || weight < 0.0 {
                return Err(EngineConfigError::NegativeWeight {
                    component: component.key(),
                    weight,
                });
            }
        }

        let total = self.weights.total();
        if (total - EXPECTED_WEIGHT_TOTAL).abs() > WEIGHT_TOLERANCE {
            return Err(EngineConfigError::WeightTotal {
                expected: EXPECTED_WEIGHT_TOTAL,
                actual: total,
            });
        }

        if !(self.penalty.budget >= 0.0 && self.penalty.budget <= SCORE_CEILING) {
            return Err(EngineConfigError::PenaltyBudget(self.penalty.budget));
        }

        if !(self.penalty.hard_block_cap >= 0.0 && self.penalty.hard_block_cap <= SCORE_CEILING) {
            return Err(EngineConfigError::HardBlockCap(self.penalty.hard_block_cap));
        }

        let DecisionThresholds {
            approve,
            conditional,
        } = self.thresholds;
        if !(SCORE_CEILING >= approve && approve > conditional && conditional >= 0.0) {
            return Err(EngineConfigError::ThresholdOrder {
                approve,
                conditional,
            });
        }

        let ratio = self.limits.target_payment_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(EngineConfigError::TargetPaymentRatio(ratio));
        }

        if self.limits.min_step <= 0.0 || self.limits.step_divisor <= 0.0 {
            return Err(EngineConfigError::SearchStep);
        }

        Ok(self)
    }
}

/// Reasons an engine configuration is refused at startup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineConfigError {
    #[error("annual rate must be a non-negative finite percentage, found {0}")]
    InvalidRate(f64),
    #[error("weight for {component} must be non-negative, found {weight}")]
    NegativeWeight { component: &'static str, weight: f64 },
    #[error("component weights must sum to {expected}, found {actual}")]
    WeightTotal { expected: f64, actual: f64 },
    #[error("penalty budget must lie within 0..=100, found {0}")]
    PenaltyBudget(f64),
    #[error("hard block cap must lie within 0..=100, found {0}")]
    HardBlockCap(f64),
    #[error("thresholds must descend within 0..=100 (approve {approve}, conditional {conditional})")]
    ThresholdOrder { approve: f64, conditional: f64 },
    #[error("target payment ratio must be in (0, 1], found {0}")]
    TargetPaymentRatio(f64),
    #[error("limit search step must be positive")]
    SearchStep,
}
