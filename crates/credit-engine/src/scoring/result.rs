use super::decision::Decision;
use super::derivation::DerivedMetrics;
use super::explain::Explainability;
use super::limits::LoanLimits;
use super::rounding::round_to;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

const CURRENCY_DIGITS: usize = 2;
const RATIO_DIGITS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    pub monthly_interest_rate_used: f64,
    pub annual_rate: f64,
    pub notes: Vec<String>,
}

/// Derived metrics as reported: currency to 2 decimals, ratios to 4.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calculations {
    pub net_income: f64,
    pub current_monthly_debt_payment: f64,
    pub new_installment: f64,
    pub new_dti: f64,
    pub credit_utilization: f64,
    pub liquidity_ratio: f64,
    pub collateral_factor: f64,
}

impl From<&DerivedMetrics> for Calculations {
    fn from(metrics: &DerivedMetrics) -> Self {
        Self {
            net_income: round_to(metrics.net_income, CURRENCY_DIGITS),
            current_monthly_debt_payment: round_to(metrics.current_monthly_debt, CURRENCY_DIGITS),
            new_installment: round_to(metrics.new_installment, CURRENCY_DIGITS),
            new_dti: round_to(metrics.new_dti, RATIO_DIGITS),
            credit_utilization: round_to(metrics.credit_utilization, RATIO_DIGITS),
            liquidity_ratio: round_to(metrics.liquidity_ratio, RATIO_DIGITS),
            collateral_factor: round_to(metrics.collateral_factor, RATIO_DIGITS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PolicyFlags {
    pub hard_block: bool,
    pub reasons: Vec<String>,
}

/// Terminal output of one scoring invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    /// 0–100, rounded to 2 decimals.
    pub score: f64,
    pub decision: Decision,
    pub limits: LoanLimits,
    pub assumptions: Assumptions,
    pub explainability: Explainability,
    pub calculations: Calculations,
    pub policy_flags: PolicyFlags,
    pub timestamp: NaiveDateTime,
    pub engine_version: String,
}

impl ScoringResult {
    /// Equality ignoring the timestamp.
    pub fn same_outcome(&self, other: &Self) -> bool {
        self.score == other.score
            && self.decision == other.decision
            && self.limits == other.limits
            && self.assumptions == other.assumptions
            && self.explainability == other.explainability
            && self.calculations == other.calculations
            && self.policy_flags == other.policy_flags
            && self.engine_version == other.engine_version
    }
}
