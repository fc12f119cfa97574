use super::config::DecisionThresholds;
use serde::{Deserialize, Serialize};

/// Three-way outcome of the scorecard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Approve,
    Conditional,
    Reject,
}

impl Decision {
    pub fn classify(score: f64, thresholds: &DecisionThresholds) -> Self {
        if score >= thresholds.approve {
            Self::Approve
        } else if score >= thresholds.conditional {
            Self::Conditional
        } else {
            Self::Reject
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Approve => "APPROVE",
            Self::Conditional => "CONDITIONAL",
            Self::Reject => "REJECT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::config::EngineConfig;

    #[test]
    fn boundaries_belong_to_the_higher_band() {
        let thresholds = EngineConfig::standard().thresholds;
        assert_eq!(Decision::classify(75.0, &thresholds), Decision::Approve);
        assert_eq!(Decision::classify(74.99, &thresholds), Decision::Conditional);
        assert_eq!(Decision::classify(60.0, &thresholds), Decision::Conditional);
        assert_eq!(Decision::classify(59.99, &thresholds), Decision::Reject);
        assert_eq!(Decision::classify(0.0, &thresholds), Decision::Reject);
        assert_eq!(Decision::classify(100.0, &thresholds), Decision::Approve);
    }

    #[test]
    fn serializes_as_upper_case_labels() {
        let json = serde_json::to_string(&Decision::Conditional).expect("serializes");
        assert_eq!(json, "\"CONDITIONAL\"");
        assert_eq!(Decision::Reject.label(), "REJECT");
    }
}
