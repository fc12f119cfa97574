use crate::scoring::application::{coerce_number, json_kind};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

const REQUIRED_FIELDS: [&str; 3] = ["loan_amount", "loan_term_months", "monthly_income"];
const TRIMMED_TEXT_FIELDS: [&str; 3] = ["employment_type", "customer_segment", "home_ownership"];
const MAX_TEXT_CHARS: usize = 100;

/// Inclusive bounds for a numeric request field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub field: &'static str,
    pub min: f64,
    pub max: f64,
}

const fn range(field: &'static str, min: f64, max: f64) -> FieldRange {
    FieldRange { field, min, max }
}

const FIELD_RANGES: [FieldRange; 7] = [
    range("loan_amount", 1_000.0, 2_000_000.0),
    range("loan_term_months", 3.0, 240.0),
    range("monthly_income", 0.0, 1_000_000.0),
    range("debt_to_income_ratio", 0.0, 5.0),
    range("kkb_score", 300.0, 900.0),
    range("age", 18.0, 80.0),
    range("work_experience", 0.0, 50.0),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    NotAnObject { found: &'static str },
    Missing,
    NotANumber,
    OutOfRange { min: f64, max: f64 },
}

/// One rejected field, rendered as a human readable message by `Display`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl ValidationIssue {
    fn new(field: &str, kind: IssueKind) -> Self {
        Self {
            field: field.to_string(),
            kind,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::NotAnObject { found } => {
                write!(f, "request body must be a JSON object, found {found}")
            }
            IssueKind::Missing => write!(f, "Missing required field: {}", self.field),
            IssueKind::NotANumber => write!(f, "{} must be a valid number", self.field),
            IssueKind::OutOfRange { min, max } => {
                write!(f, "{} must be between {min} and {max}", self.field)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    /// The submitted object with checked numbers coerced and text fields trimmed.
    pub sanitized: Map<String, Value>,
}

impl ValidationReport {
    fn rejected(errors: Vec<ValidationIssue>) -> Self {
        Self {
            valid: false,
            errors,
            sanitized: Map::new(),
        }
    }

    pub fn into_result(self) -> Result<Map<String, Value>, Vec<ValidationIssue>> {
        if self.valid {
            Ok(self.sanitized)
        } else {
            Err(self.errors)
        }
    }
}

/// Structural checks on a raw application payload: required fields, numeric bounds and
/// text length. Fields it does not know about pass through untouched.
#[derive(Debug, Clone)]
pub struct RequestValidator {
    required: &'static [&'static str],
    ranges: &'static [FieldRange],
    max_text_chars: usize,
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self::standard()
    }
}

impl RequestValidator {
    pub const fn standard() -> Self {
        Self {
            required: &REQUIRED_FIELDS,
            ranges: &FIELD_RANGES,
            max_text_chars: MAX_TEXT_CHARS,
        }
    }

    pub fn ranges(&self) -> &[FieldRange] {
        self.ranges
    }

    pub fn validate(&self, raw: &Value) -> ValidationReport {
        let Value::Object(input) = raw else {
            return ValidationReport::rejected(vec![ValidationIssue::new(
                "body",
                IssueKind::NotAnObject {
                    found: json_kind(raw),
                },
            )]);
        };

        let missing: Vec<ValidationIssue> = self
            .required
            .iter()
            .filter(|field| !input.contains_key(**field))
            .map(|field| ValidationIssue::new(field, IssueKind::Missing))
            .collect();
        if !missing.is_empty() {
            return ValidationReport::rejected(missing);
        }

        let mut sanitized = input.clone();
        let mut errors = Vec::new();

        for bounds in self.ranges {
            let Some(value) = input.get(bounds.field) else {
                continue;
            };
            match coerce_number(value) {
                None => errors.push(ValidationIssue::new(bounds.field, IssueKind::NotANumber)),
                Some(number) if number < bounds.min || number > bounds.max => {
                    errors.push(ValidationIssue::new(
                        bounds.field,
                        IssueKind::OutOfRange {
                            min: bounds.min,
                            max: bounds.max,
                        },
                    ))
                }
                Some(number) => {
                    if let Some(number) = serde_json::Number::from_f64(number) {
                        sanitized.insert(bounds.field.to_string(), Value::Number(number));
                    }
                }
            }
        }

        for field in TRIMMED_TEXT_FIELDS {
            let text = match input.get(field) {
                Some(Value::String(raw)) => raw.trim().to_string(),
                Some(Value::Number(number)) => number.to_string(),
                Some(Value::Bool(flag)) => flag.to_string(),
                _ => continue,
            };
            let text: String = text.chars().take(self.max_text_chars).collect();
            sanitized.insert(field.to_string(), Value::String(text));
        }

        ValidationReport {
            valid: errors.is_empty(),
            errors,
            sanitized,
        }
    }
}
