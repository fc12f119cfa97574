//! Decision service composing request gatekeeping, scoring, and the customer-facing envelope.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::intake::{
    RateLimitDecision, RateLimitStore, RateLimiter, RequestValidator, ValidationIssue,
};
use crate::scoring::rounding::round_to;
use crate::scoring::{
    ApplicationRecord, Assumptions, Calculations, CreditScorer, Decision, Explainability,
    LoanLimits, PolicyFlags, ScoringResult,
};

const TAX_SHARE: f64 = 0.15;
const TAXED_RATE_MULTIPLIER: f64 = 1.3;
const RISK_FACTOR_FEATURES: usize = 3;
const MALFORMED_PAYLOAD: &str = "Geçersiz veri formatı";

/// Decision label shown to the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionLabel {
    #[serde(rename = "ONAYLANDI")]
    Approved,
    #[serde(rename = "CONDITIONAL")]
    Conditional,
    #[serde(rename = "REDDEDILDI")]
    Rejected,
}

impl From<Decision> for DecisionLabel {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Approve => Self::Approved,
            Decision::Conditional => Self::Conditional,
            Decision::Reject => Self::Rejected,
        }
    }
}

impl DecisionLabel {
    fn reason(self, score: f64) -> String {
        let score = display_float(score);
        match self {
            Self::Approved => {
                format!("Kredi onaylandı - Risk skoru: {score}/100. Güçlü finansal profil.")
            }
            Self::Conditional => {
                format!("Koşullu onay - Risk skoru: {score}/100. Ek şartlar gerekli.")
            }
            Self::Rejected => format!(
                "Kredi reddedildi - Risk skoru: {score}/100. Risk kriterleri karşılanmadı."
            ),
        }
    }

    fn next_steps(self) -> [&'static str; 3] {
        match self {
            Self::Approved => ["Hızlı onay süreci", "Belge kontrolü", "Sözleşme hazırlama"],
            Self::Conditional => [
                "Ek belge talep edilecek",
                "Risk analizi",
                "Koşullu değerlendirme",
            ],
            Self::Rejected => [
                "Ret gerekçesi",
                "Alternatif öneriler",
                "Yeniden başvuru koşulları",
            ],
        }
    }
}

/// Service tier derived from the score alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerSegment {
    #[serde(rename = "Private Banking")]
    PrivateBanking,
    #[serde(rename = "Corporate")]
    Corporate,
    #[serde(rename = "Mass Market")]
    MassMarket,
}

impl CustomerSegment {
    pub fn from_score(score: f64) -> Self {
        if score >= 75.0 {
            Self::PrivateBanking
        } else if score >= 60.0 {
            Self::Corporate
        } else {
            Self::MassMarket
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PrivateBanking => "Private Banking",
            Self::Corporate => "Corporate",
            Self::MassMarket => "Mass Market",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::PrivateBanking => {
                "Private Banking segmenti - premium faiz oranları ve özel danışman"
            }
            Self::Corporate => "Kurumsal müşteri segmenti - özel koşullar ve hızlı işlem",
            Self::MassMarket => "Bireysel müşteri segmenti - standart koşullar ve süreçler",
        }
    }
}

/// Headline rates in percent. Taxes are KKDF and BSMV at 15% each.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterestRates {
    pub base_rate: f64,
    pub monthly_rate: f64,
    pub annual_rate: f64,
    pub kkdf_tax: f64,
    pub bsmv_tax: f64,
    pub final_annual_rate: f64,
}

impl InterestRates {
    fn from_annual(annual_rate: f64) -> Self {
        Self {
            base_rate: annual_rate,
            monthly_rate: annual_rate / 12.0,
            annual_rate,
            kkdf_tax: annual_rate * TAX_SHARE,
            bsmv_tax: annual_rate * TAX_SHARE,
            final_annual_rate: annual_rate * TAXED_RATE_MULTIPLIER,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanDetails {
    pub requested_amount: f64,
    pub term_months: i64,
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
    pub effective_annual_rate: f64,
}

impl LoanDetails {
    fn new(record: &ApplicationRecord, result: &ScoringResult) -> Self {
        let monthly_payment = result.calculations.new_installment;
        let total_payment = monthly_payment * record.loan_term_months as f64;
        Self {
            requested_amount: record.loan_amount,
            term_months: record.loan_term_months,
            monthly_payment: round_to(monthly_payment, 2),
            total_payment: round_to(total_payment, 2),
            total_interest: round_to(total_payment - record.loan_amount, 2),
            effective_annual_rate: result.assumptions.annual_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingInfo {
    pub processing_time: String,
    pub required_documents: Vec<String>,
    pub next_steps: Vec<String>,
}

impl ProcessingInfo {
    fn new(label: DecisionLabel, segment: CustomerSegment) -> Self {
        let mut required_documents = vec!["Nüfus cüzdanı", "Gelir belgesi", "İkametgah belgesi"];
        if label == DecisionLabel::Conditional {
            required_documents.extend(["Ek teminat belgesi", "Kefil bilgileri"]);
        }

        Self {
            processing_time: format!("{} müşteriler için özel işlem süresi", segment.label()),
            required_documents: required_documents.into_iter().map(String::from).collect(),
            next_steps: label.next_steps().into_iter().map(String::from).collect(),
        }
    }
}

/// The scorer's full output, minus the headline fields already lifted into the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedAnalysis {
    pub explainability: Explainability,
    pub calculations: Calculations,
    pub assumptions: Assumptions,
    pub policy_flags: PolicyFlags,
    pub limits: LoanLimits,
}

/// Customer-facing decision envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditDecision {
    pub decision: DecisionLabel,
    pub decision_reason: String,
    pub credit_score: f64,
    pub risk_factors: Vec<String>,
    pub customer_segment: CustomerSegment,
    pub segment_description: String,
    pub interest_rates: InterestRates,
    pub loan_details: LoanDetails,
    pub processing_info: ProcessingInfo,
    pub advanced_analysis: AdvancedAnalysis,
    pub timestamp: NaiveDateTime,
    pub engine_version: String,
}

impl CreditDecision {
    pub fn from_result(record: &ApplicationRecord, result: ScoringResult) -> Self {
        let label = DecisionLabel::from(result.decision);
        let segment = CustomerSegment::from_score(result.score);

        Self {
            decision: label,
            decision_reason: label.reason(result.score),
            credit_score: result.score,
            risk_factors: risk_factors(&result),
            customer_segment: segment,
            segment_description: segment.description().to_string(),
            interest_rates: InterestRates::from_annual(result.assumptions.annual_rate),
            loan_details: LoanDetails::new(record, &result),
            processing_info: ProcessingInfo::new(label, segment),
            timestamp: result.timestamp,
            engine_version: result.engine_version,
            advanced_analysis: AdvancedAnalysis {
                explainability: result.explainability,
                calculations: result.calculations,
                assumptions: result.assumptions,
                policy_flags: result.policy_flags,
                limits: result.limits,
            },
        }
    }
}

fn risk_factors(result: &ScoringResult) -> Vec<String> {
    let calc = &result.calculations;
    let mut factors = vec![
        format!("Net Gelir: {} TL", group_thousands(calc.net_income)),
        format!("Yeni DTI Oranı: %{:.1}", calc.new_dti * 100.0),
        format!("Aylık Taksit: {} TL", group_thousands(calc.new_installment)),
        format!(
            "Kredi Kartı Kullanım: %{:.1}",
            calc.credit_utilization * 100.0
        ),
        format!("Likidite Oranı: {:.2}", calc.liquidity_ratio),
    ];
    factors.extend(
        result
            .explainability
            .top_five_features
            .iter()
            .take(RISK_FACTOR_FEATURES)
            .map(|feature| format!("{}: {:.1} puan", feature.feature, feature.contribution)),
    );
    factors
}

/// Whole-number rendering with comma thousands separators, e.g. `15,000`.
fn group_thousands(value: f64) -> String {
    let rendered = format!("{value:.0}");
    let (sign, digits) = match rendered.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", rendered.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{sign}{grouped}")
}

/// Whole floats keep one decimal so `60.0` does not render as `60`.
fn display_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Error raised by the decision service.
#[derive(Debug, thiserror::Error)]
pub enum DecisionServiceError {
    #[error("{reason}")]
    RateLimited { retry_after: u64, reason: String },
    #[error("request validation failed with {} issue(s)", .0.len())]
    Invalid(Vec<ValidationIssue>),
    #[error("{0}")]
    Malformed(String),
}

/// Rate limit, validate, normalize, score, then wrap the result in a [`CreditDecision`].
pub struct CreditDecisionService<S, L> {
    scorer: Arc<S>,
    limiter: RateLimiter<L>,
    validator: RequestValidator,
}

impl<S, L> CreditDecisionService<S, L>
where
    S: CreditScorer + 'static,
    L: RateLimitStore + 'static,
{
    pub fn new(scorer: Arc<S>, limiter: RateLimiter<L>) -> Self {
        Self::with_validator(scorer, limiter, RequestValidator::standard())
    }

    pub fn with_validator(
        scorer: Arc<S>,
        limiter: RateLimiter<L>,
        validator: RequestValidator,
    ) -> Self {
        Self {
            scorer,
            limiter,
            validator,
        }
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    pub fn evaluate(
        &self,
        client_id: &str,
        raw: &Value,
    ) -> Result<CreditDecision, DecisionServiceError> {
        self.evaluate_at(client_id, raw, Local::now())
    }

    pub fn evaluate_at(
        &self,
        client_id: &str,
        raw: &Value,
        now: DateTime<Local>,
    ) -> Result<CreditDecision, DecisionServiceError> {
        if let RateLimitDecision::Denied {
            reason,
            retry_after,
        } = self.limiter.check_at(client_id, now.with_timezone(&Utc))
        {
            warn!(client_id, ?reason, retry_after, "credit evaluation rate limited");
            return Err(DecisionServiceError::RateLimited {
                retry_after,
                reason: reason.message().to_string(),
            });
        }

        if !raw.is_object() {
            debug!(client_id, "credit evaluation payload is not an object");
            return Err(DecisionServiceError::Malformed(MALFORMED_PAYLOAD.to_string()));
        }

        let sanitized = self.validator.validate(raw).into_result().map_err(|issues| {
            debug!(client_id, issues = issues.len(), "credit evaluation rejected by validator");
            DecisionServiceError::Invalid(issues)
        })?;

        let record = ApplicationRecord::from_map(&sanitized);
        let result = self.scorer.score_at(&record, now.naive_local());

        info!(
            client_id,
            decision = result.decision.label(),
            score = result.score,
            hard_block = result.policy_flags.hard_block,
            "credit application evaluated"
        );

        Ok(CreditDecision::from_result(&record, result))
    }
}
