use super::config::LimitPolicy;
use super::decision::Decision;
use super::derivation::{annuity_payment, DerivedMetrics};
use super::rounding::round_to_quantum;
use serde::{Deserialize, Serialize};

/// Recommended loan ceiling and term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanLimits {
    pub max_approved_amount: f64,
    pub recommended_term_months: i64,
}

/// Largest principal, in whole search steps, whose installment stays within the target share of
/// net income. The search walks upward and stops at the first unaffordable candidate.
pub fn max_affordable_amount(
    net_income: f64,
    loan_amount: f64,
    term_months: i64,
    monthly_rate: f64,
    policy: &LimitPolicy,
) -> f64 {
    if net_income <= 0.0 || monthly_rate <= 0.0 {
        return 0.0;
    }

    let target_installment = net_income * policy.target_payment_ratio;
    let step = (loan_amount / policy.step_divisor).max(policy.min_step);
    let ceiling = loan_amount * policy.ceiling_multiplier;

    let mut max_amount = 0.0;
    let mut candidate = step;
    while candidate <= ceiling {
        if annuity_payment(candidate, monthly_rate, term_months) <= target_installment {
            max_amount = candidate;
            candidate += step;
        } else {
            break;
        }
    }

    round_to_quantum(max_amount, policy.rounding_quantum)
}

/// Conditional approvals carrying a heavy debt load get a longer term, capped by policy.
pub fn recommended_term(
    term_months: i64,
    new_dti: f64,
    decision: Decision,
    policy: &LimitPolicy,
) -> i64 {
    if decision == Decision::Conditional && new_dti > policy.extension_dti_trigger {
        (term_months + policy.term_extension_months).min(policy.max_term_months)
    } else {
        term_months
    }
}

pub fn recommend(
    metrics: &DerivedMetrics,
    loan_amount: f64,
    term_months: i64,
    monthly_rate: f64,
    decision: Decision,
    policy: &LimitPolicy,
) -> LoanLimits {
    LoanLimits {
        max_approved_amount: max_affordable_amount(
            metrics.net_income,
            loan_amount,
            term_months,
            monthly_rate,
            policy,
        ),
        recommended_term_months: recommended_term(term_months, metrics.new_dti, decision, policy),
    }
}
