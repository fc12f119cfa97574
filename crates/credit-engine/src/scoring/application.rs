use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fully typed applicant attributes after normalization.
///
/// Amounts are non-negative and finite; string fields are trimmed and lowercased so the scorer
/// can compare them against fixed vocabulary (`"stable"`, `"owner"`, `"private"`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub loan_amount: f64,
    pub loan_term_months: i64,

    pub monthly_income: f64,
    pub additional_income: f64,
    pub expenses: f64,
    pub rent_payment: f64,
    pub existing_loans: f64,
    pub credit_card_debt: f64,
    pub credit_card_limit: f64,
    pub bank_balance: f64,
    pub investments: f64,
    pub real_estate_value: f64,
    /// When present, current debt service is taken from this ratio instead of being estimated.
    pub debt_to_income_ratio: Option<f64>,

    pub age: i64,
    pub employment_type: String,
    /// Years.
    pub work_experience: f64,
    pub kkb_score: f64,
    pub payment_delays: i64,
    pub home_ownership: String,
    /// Months.
    pub residence_duration: f64,

    /// Months as a customer of the bank.
    pub existing_relationship: f64,
    pub total_banking_products: i64,
    pub customer_segment: String,

    pub defaulted_loans: bool,
    pub legal_issues: bool,
    pub has_insurance: bool,
    pub job_stability: String,
}

impl Default for ApplicationRecord {
    fn default() -> Self {
        Self {
            loan_amount: 0.0,
            loan_term_months: 12,
            monthly_income: 0.0,
            additional_income: 0.0,
            expenses: 0.0,
            rent_payment: 0.0,
            existing_loans: 0.0,
            credit_card_debt: 0.0,
            credit_card_limit: 0.0,
            bank_balance: 0.0,
            investments: 0.0,
            real_estate_value: 0.0,
            debt_to_income_ratio: None,
            age: 30,
            employment_type: String::new(),
            work_experience: 0.0,
            kkb_score: 500.0,
            payment_delays: 0,
            home_ownership: String::new(),
            residence_duration: 0.0,
            existing_relationship: 0.0,
            total_banking_products: 0,
            customer_segment: "mass".to_string(),
            defaulted_loans: false,
            legal_issues: false,
            has_insurance: false,
            job_stability: "stable".to_string(),
        }
    }
}

/// Raised only when the payload is not a JSON object at all; field-level problems never fail.
#[derive(Debug, thiserror::Error)]
pub enum NormalizationError {
    #[error("application payload must be a JSON object, found {0}")]
    NotAnObject(&'static str),
}

impl ApplicationRecord {
    pub fn from_json(raw: &Value) -> Result<Self, NormalizationError> {
        match raw {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(NormalizationError::NotAnObject(json_kind(other))),
        }
    }

    /// Coerce a loosely typed mapping, substituting the default for every absent or malformed field.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let defaults = Self::default();
        let fields = Fields(map);

        Self {
            loan_amount: fields.amount("loan_amount"),
            loan_term_months: fields.integer("loan_term_months", defaults.loan_term_months),
            monthly_income: fields.amount("monthly_income"),
            additional_income: fields.amount("additional_income"),
            expenses: fields.amount("expenses"),
            rent_payment: fields.amount("rent_payment"),
            existing_loans: fields.amount("existing_loans"),
            credit_card_debt: fields.amount("credit_card_debt"),
            credit_card_limit: fields.amount("credit_card_limit"),
            bank_balance: fields.amount("bank_balance"),
            investments: fields.amount("investments"),
            real_estate_value: fields.amount("real_estate_value"),
            debt_to_income_ratio: fields.number("debt_to_income_ratio").filter(|v| *v >= 0.0),
            age: fields.integer("age", defaults.age),
            employment_type: fields.text("employment_type", &defaults.employment_type),
            work_experience: fields.amount("work_experience"),
            kkb_score: fields.number("kkb_score").unwrap_or(defaults.kkb_score),
            payment_delays: fields.count("payment_delays"),
            home_ownership: fields.text("home_ownership", &defaults.home_ownership),
            residence_duration: fields.amount("residence_duration"),
            existing_relationship: fields.amount("existing_relationship"),
            total_banking_products: fields.count("total_banking_products"),
            customer_segment: fields.text("customer_segment", &defaults.customer_segment),
            defaulted_loans: fields.flag("defaulted_loans"),
            legal_issues: fields.flag("legal_issues"),
            has_insurance: fields.flag("has_insurance"),
            job_stability: fields.text("job_stability", &defaults.job_stability),
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Finite number from a JSON number, numeric string, or boolean.
pub(crate) fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

struct Fields<'a>(&'a Map<String, Value>);

impl Fields<'_> {
    fn number(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(coerce_number)
    }

    fn amount(&self, key: &str) -> f64 {
        self.number(key).filter(|v| *v >= 0.0).unwrap_or(0.0)
    }

    fn integer(&self, key: &str, default: i64) -> i64 {
        self.number(key).map(|v| v.trunc() as i64).unwrap_or(default)
    }

    fn count(&self, key: &str) -> i64 {
        self.number(key)
            .map(|v| v.trunc() as i64)
            .filter(|v| *v >= 0)
            .unwrap_or(0)
    }

    fn text(&self, key: &str, default: &str) -> String {
        match self.0.get(key) {
            Some(Value::String(raw)) => raw.trim().to_lowercase(),
            Some(Value::Number(number)) => number.to_string(),
            Some(Value::Bool(flag)) => flag.to_string(),
            _ => default.to_string(),
        }
    }

    fn flag(&self, key: &str) -> bool {
        match self.0.get(key) {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::Number(number)) => number.as_f64().is_some_and(|v| v != 0.0),
            Some(Value::String(raw)) => matches!(
                raw.trim().to_lowercase().as_str(),
                "true" | "1" | "yes" | "evet" | "on"
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_takes_every_default() {
        let record = ApplicationRecord::from_json(&json!({})).expect("object normalizes");
        assert_eq!(record, ApplicationRecord::default());
        assert_eq!(record.loan_term_months, 12);
        assert_eq!(record.kkb_score, 500.0);
        assert_eq!(record.job_stability, "stable");
        assert_eq!(record.customer_segment, "mass");
    }

    #[test]
    fn coerces_strings_numbers_and_booleans() {
        let record = ApplicationRecord::from_json(&json!({
            "loan_amount": "100000",
            "loan_term_months": 36.9,
            "monthly_income": 15000,
            "kkb_score": " 750 ",
            "payment_delays": "2",
            "employment_type": "  Kamu ",
            "home_ownership": "OWNER",
            "defaulted_loans": "evet",
            "legal_issues": 0,
            "has_insurance": true,
            "debt_to_income_ratio": "0.25",
        }))
        .expect("object normalizes");

        assert_eq!(record.loan_amount, 100000.0);
        assert_eq!(record.loan_term_months, 36);
        assert_eq!(record.monthly_income, 15000.0);
        assert_eq!(record.kkb_score, 750.0);
        assert_eq!(record.payment_delays, 2);
        assert_eq!(record.employment_type, "kamu");
        assert_eq!(record.home_ownership, "owner");
        assert!(record.defaulted_loans);
        assert!(!record.legal_issues);
        assert!(record.has_insurance);
        assert_eq!(record.debt_to_income_ratio, Some(0.25));
    }

    #[test]
    fn malformed_fields_fall_back_silently() {
        let record = ApplicationRecord::from_json(&json!({
            "loan_amount": "lots",
            "monthly_income": -500,
            "kkb_score": null,
            "loan_term_months": [36],
            "payment_delays": -3,
            "bank_balance": "NaN",
            "defaulted_loans": "false",
            "debt_to_income_ratio": {"value": 0.3},
            "customer_segment": ["private"],
        }))
        .expect("object normalizes");

        assert_eq!(record.loan_amount, 0.0);
        assert_eq!(record.monthly_income, 0.0);
        assert_eq!(record.kkb_score, 500.0);
        assert_eq!(record.loan_term_months, 12);
        assert_eq!(record.payment_delays, 0);
        assert_eq!(record.bank_balance, 0.0);
        assert!(!record.defaulted_loans);
        assert_eq!(record.debt_to_income_ratio, None);
        assert_eq!(record.customer_segment, "mass");
    }

    #[test]
    fn rejects_non_object_payloads() {
        let err = ApplicationRecord::from_json(&json!([1, 2, 3])).expect_err("arrays rejected");
        assert!(err.to_string().contains("an array"));
    }
}
