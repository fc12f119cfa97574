use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};

use crate::scoring::{ApplicationRecord, Locale, ScoringEngine};

pub(super) fn record(payload: Value) -> ApplicationRecord {
    ApplicationRecord::from_json(&payload).expect("fixture is an object")
}

pub(super) fn fixed_timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 14)
        .and_then(|date| date.and_hms_opt(9, 30, 0))
        .expect("valid timestamp")
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::standard()
}

pub(super) fn english_engine() -> ScoringEngine {
    ScoringEngine::new(crate::scoring::EngineConfig::standard().with_locale(Locale::English))
        .expect("standard config valid")
}

/// Established customer with savings and no outstanding debt.
pub(super) fn strong_applicant() -> ApplicationRecord {
    record(json!({
        "monthly_income": 15000,
        "loan_amount": 100000,
        "loan_term_months": 36,
        "kkb_score": 750,
        "bank_balance": 100000,
        "work_experience": 5,
        "existing_relationship": 60,
    }))
}

/// Only the three required fields plus a bureau score.
pub(super) fn minimal_applicant() -> ApplicationRecord {
    record(json!({
        "monthly_income": 15000,
        "loan_amount": 100000,
        "loan_term_months": 36,
        "kkb_score": 750,
    }))
}

/// Excellent finances but a prior default on file.
pub(super) fn defaulted_applicant() -> ApplicationRecord {
    record(json!({
        "monthly_income": 30000,
        "loan_amount": 100000,
        "loan_term_months": 36,
        "kkb_score": 850,
        "defaulted_loans": true,
        "bank_balance": 200000,
        "work_experience": 10,
        "existing_relationship": 60,
    }))
}

/// Heavily indebted applicant asking for a large short loan.
pub(super) fn stretched_applicant() -> ApplicationRecord {
    record(json!({
        "monthly_income": 20000,
        "loan_amount": 300000,
        "loan_term_months": 24,
        "kkb_score": 650,
        "existing_loans": 120000,
        "credit_card_debt": 20000,
        "credit_card_limit": 25000,
    }))
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
