use super::application::ApplicationRecord;
use serde::{Deserialize, Serialize};

/// Months over which existing loans are assumed to amortize when no DTI is declared.
const EXISTING_LOAN_TERM_MONTHS: i64 = 24;
/// Minimum monthly card payment as a share of the outstanding balance.
const CARD_MINIMUM_PAYMENT: f64 = 0.04;
/// Investments count toward liquidity at this haircut.
const INVESTMENT_LIQUIDITY_SHARE: f64 = 0.8;

/// Fixed installment that fully amortizes `principal` over `months` at periodic `rate`.
///
/// A non-positive rate or term degrades to straight-line repayment over `max(months, 1)`. A term
/// long enough to overflow the compounding factor pays interest only, the limit as `months` grows.
pub fn annuity_payment(principal: f64, rate: f64, months: i64) -> f64 {
    if rate <= 0.0 || months <= 0 {
        return principal / months.max(1) as f64;
    }
    let growth = (1.0 + rate).powf(months as f64);
    if !growth.is_finite() {
        return principal * rate;
    }
    if growth <= 1.0 {
        return principal / months as f64;
    }
    let factor = (rate * growth) / (growth - 1.0);
    principal * factor
}

/// Where the current monthly debt service figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtSource {
    Declared,
    Estimated,
}

/// Ratios and amounts derived once from an application.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub net_income: f64,
    pub current_monthly_debt: f64,
    pub new_installment: f64,
    pub new_dti: f64,
    pub credit_utilization: f64,
    pub liquidity_ratio: f64,
    pub collateral_factor: f64,
    pub debt_source: DebtSource,
}

impl DerivedMetrics {
    pub fn derive(record: &ApplicationRecord, monthly_rate: f64) -> Self {
        let net_income = (record.monthly_income + record.additional_income
            - record.expenses
            - record.rent_payment)
            .max(0.0);

        let (current_monthly_debt, debt_source) = match record.debt_to_income_ratio {
            Some(ratio) => {
                let debt = if net_income > 0.0 {
                    ratio * net_income
                } else {
                    0.0
                };
                (debt, DebtSource::Declared)
            }
            None => {
                let card_minimum = CARD_MINIMUM_PAYMENT * record.credit_card_debt;
                let loan_service = if record.existing_loans > 0.0 {
                    annuity_payment(
                        record.existing_loans,
                        monthly_rate,
                        EXISTING_LOAN_TERM_MONTHS,
                    )
                } else {
                    0.0
                };
                (card_minimum + loan_service, DebtSource::Estimated)
            }
        };

        let new_installment =
            annuity_payment(record.loan_amount, monthly_rate, record.loan_term_months);

        let new_dti = if net_income > 0.0 {
            (current_monthly_debt + new_installment) / net_income
        } else {
            1.0
        };

        let credit_utilization = if record.credit_card_limit > 0.0 {
            record.credit_card_debt / record.credit_card_limit
        } else {
            0.0
        };

        let liquidity_ratio = if record.loan_amount > 0.0 {
            (record.bank_balance + INVESTMENT_LIQUIDITY_SHARE * record.investments)
                / record.loan_amount
        } else {
            0.0
        };

        let collateral_factor = if record.loan_amount > 0.0 && record.home_ownership == "owner" {
            record.real_estate_value / record.loan_amount
        } else {
            0.0
        };

        Self {
            net_income,
            current_monthly_debt,
            new_installment,
            new_dti,
            credit_utilization,
            liquidity_ratio,
            collateral_factor,
            debt_source,
        }
    }

    /// New installment over net income; 1.0 when there is no net income.
    pub fn payment_ratio(&self) -> f64 {
        if self.net_income > 0.0 {
            self.new_installment / self.net_income
        } else {
            1.0
        }
    }
}
