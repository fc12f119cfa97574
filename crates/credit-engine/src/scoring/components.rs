use super::application::ApplicationRecord;
use super::derivation::DerivedMetrics;
use serde::{Deserialize, Serialize};

/// The eight weighted factors of the scorecard, in their canonical order.
///
/// The order matters: contribution ranking breaks ties by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    KkbCreditHistory,
    DtiRatio,
    IncomeAdequacy,
    CreditUtilization,
    Liquidity,
    CollateralAssets,
    Stability,
    BankingRelationship,
}

impl Component {
    pub const COUNT: usize = 8;

    pub const fn ordered() -> [Self; Self::COUNT] {
        [
            Self::KkbCreditHistory,
            Self::DtiRatio,
            Self::IncomeAdequacy,
            Self::CreditUtilization,
            Self::Liquidity,
            Self::CollateralAssets,
            Self::Stability,
            Self::BankingRelationship,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::KkbCreditHistory => "kkb_credit_history",
            Self::DtiRatio => "dti_ratio",
            Self::IncomeAdequacy => "income_adequacy",
            Self::CreditUtilization => "credit_utilization",
            Self::Liquidity => "liquidity",
            Self::CollateralAssets => "collateral_assets",
            Self::Stability => "stability",
            Self::BankingRelationship => "banking_relationship",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// One value per component. Used for both sub-scores and weighted contributions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ComponentValues([f64; Component::COUNT]);

/// Normalized sub-scores in `[0, 1]`.
pub type ComponentScores = ComponentValues;

/// Sub-score multiplied by the component weight, in score points.
pub type Contributions = ComponentValues;

impl ComponentValues {
    pub fn get(&self, component: Component) -> f64 {
        self.0[component.index()]
    }

    pub(crate) fn set(&mut self, component: Component, value: f64) {
        self.0[component.index()] = value;
    }

    /// Iterates in canonical component order.
    pub fn iter(&self) -> impl Iterator<Item = (Component, f64)> + '_ {
        Component::ordered()
            .into_iter()
            .map(move |component| (component, self.get(component)))
    }
}

/// Bounds `value` to `[lo, hi]`. NaN is the worst case and maps to `lo`.
pub(crate) fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        return lo;
    }
    lo.max(hi.min(value))
}

/// Full marks at or below `best`, zero at or above `worst`, linear in between. NaN scores zero.
fn descending_band(value: f64, best: f64, worst: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else if value <= best {
        1.0
    } else if value >= worst {
        0.0
    } else {
        1.0 - (value - best) / (worst - best)
    }
}

pub fn kkb_score(bureau_score: f64) -> f64 {
    clamp((bureau_score - 300.0) / 600.0, 0.0, 1.0)
}

pub fn dti_score(new_dti: f64) -> f64 {
    descending_band(new_dti, 0.2, 0.6)
}

pub fn income_adequacy_score(payment_ratio: f64) -> f64 {
    descending_band(payment_ratio, 0.3, 0.7)
}

pub fn utilization_score(utilization: f64) -> f64 {
    1.0 - clamp(utilization, 0.0, 1.0)
}

pub fn liquidity_score(liquidity_ratio: f64) -> f64 {
    clamp(liquidity_ratio / 2.0, 0.0, 1.0)
}

pub fn collateral_score(collateral_factor: f64) -> f64 {
    clamp(collateral_factor / 3.0, 0.0, 1.0)
}

pub fn stability_score(record: &ApplicationRecord) -> f64 {
    let mut base = 0.0;
    if record.job_stability == "stable" {
        base += 0.6;
    }
    base += clamp(record.work_experience / 10.0, 0.0, 0.3);
    base += clamp(record.residence_duration / 120.0, 0.0, 0.1);
    if matches!(record.employment_type.as_str(), "kamu" | "public") {
        base += 0.2;
    }
    clamp(base, 0.0, 1.0)
}

pub fn relationship_score(record: &ApplicationRecord) -> f64 {
    let mut score = clamp(record.existing_relationship / 60.0, 0.0, 0.6);
    score += clamp(record.total_banking_products as f64 / 6.0, 0.0, 0.3);
    if record.customer_segment == "private" {
        score += 0.1;
    }
    clamp(score, 0.0, 1.0)
}

pub fn score_components(record: &ApplicationRecord, metrics: &DerivedMetrics) -> ComponentScores {
    let mut scores = ComponentValues::default();
    scores.set(Component::KkbCreditHistory, kkb_score(record.kkb_score));
    scores.set(Component::DtiRatio, dti_score(metrics.new_dti));
    scores.set(
        Component::IncomeAdequacy,
        income_adequacy_score(metrics.payment_ratio()),
    );
    scores.set(
        Component::CreditUtilization,
        utilization_score(metrics.credit_utilization),
    );
    scores.set(Component::Liquidity, liquidity_score(metrics.liquidity_ratio));
    scores.set(
        Component::CollateralAssets,
        collateral_score(metrics.collateral_factor),
    );
    scores.set(Component::Stability, stability_score(record));
    scores.set(Component::BankingRelationship, relationship_score(record));
    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kkb_rescales_and_saturates() {
        assert_eq!(kkb_score(300.0), 0.0);
        assert_eq!(kkb_score(900.0), 1.0);
        assert_eq!(kkb_score(600.0), 0.5);
        assert_eq!(kkb_score(120.0), 0.0);
        assert_eq!(kkb_score(990.0), 1.0);
    }

    #[test]
    fn dti_band_edges() {
        assert_eq!(dti_score(0.2), 1.0);
        assert_eq!(dti_score(0.6), 0.0);
        assert!((dti_score(0.4) - 0.5).abs() < 1e-12);
        assert_eq!(dti_score(1.0), 0.0);
    }

    #[test]
    fn income_adequacy_band_edges() {
        assert_eq!(income_adequacy_score(0.3), 1.0);
        assert_eq!(income_adequacy_score(0.7), 0.0);
        assert!((income_adequacy_score(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn saturating_ratios() {
        assert_eq!(utilization_score(1.4), 0.0);
        assert_eq!(utilization_score(0.25), 0.75);
        assert_eq!(liquidity_score(5.0), 1.0);
        assert_eq!(liquidity_score(1.0), 0.5);
        assert_eq!(collateral_score(1.5), 0.5);
        assert_eq!(collateral_score(9.0), 1.0);
    }

    #[test]
    fn undefined_ratios_score_as_worst_case() {
        assert_eq!(clamp(f64::NAN, 0.0, 1.0), 0.0);
        assert_eq!(dti_score(f64::NAN), 0.0);
        assert_eq!(income_adequacy_score(f64::NAN), 0.0);
        assert_eq!(kkb_score(f64::NAN), 0.0);
        assert_eq!(liquidity_score(f64::NAN), 0.0);
        assert_eq!(collateral_score(f64::NAN), 0.0);
    }

    #[test]
    fn stability_caps_each_term() {
        let record = ApplicationRecord {
            job_stability: "stable".to_string(),
            work_experience: 25.0,
            residence_duration: 500.0,
            employment_type: "kamu".to_string(),
            ..ApplicationRecord::default()
        };
        assert_eq!(stability_score(&record), 1.0);

        let unstable = ApplicationRecord {
            job_stability: "unstable".to_string(),
            work_experience: 1.0,
            ..ApplicationRecord::default()
        };
        assert!((stability_score(&unstable) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn relationship_combines_tenure_products_and_segment() {
        let record = ApplicationRecord {
            existing_relationship: 30.0,
            total_banking_products: 3,
            customer_segment: "private".to_string(),
            ..ApplicationRecord::default()
        };
        assert!((relationship_score(&record) - 0.9).abs() < 1e-12);

        let saturated = ApplicationRecord {
            existing_relationship: 600.0,
            total_banking_products: 60,
            customer_segment: "private".to_string(),
            ..ApplicationRecord::default()
        };
        assert!((relationship_score(&saturated) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn values_iterate_in_canonical_order() {
        let keys: Vec<&str> = ComponentValues::default()
            .iter()
            .map(|(component, _)| component.key())
            .collect();
        assert_eq!(keys.first(), Some(&"kkb_credit_history"));
        assert_eq!(keys.last(), Some(&"banking_relationship"));
        assert_eq!(keys.len(), Component::COUNT);
    }
}
