//! Message rendering for narrative output.
//!
//! Scoring only decides *which* message applies (a component and a bucket, a policy reason, an
//! assumption); the catalogue turns that key into text for the configured locale.

use super::aggregate::PolicyReason;
use super::components::Component;
use super::derivation::DebtSource;
use serde::{Deserialize, Serialize};

/// Language used for narrative strings in a scoring result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    Turkish,
    English,
}

/// Which side of a component's narrative thresholds a sub-score fell on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Strong,
    Weak,
}

impl Locale {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tr" | "tr-tr" | "tr_tr" | "turkish" => Some(Self::Turkish),
            "en" | "en-us" | "en-gb" | "en_us" | "english" => Some(Self::English),
            _ => None,
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Turkish => "tr",
            Self::English => "en",
        }
    }

    pub const fn feature_name(self, component: Component) -> &'static str {
        match (self, component) {
            (Self::Turkish, Component::KkbCreditHistory) => "KKB Kredi Geçmişi",
            (Self::Turkish, Component::DtiRatio) => "Borç/Gelir Oranı",
            (Self::Turkish, Component::IncomeAdequacy) => "Gelir Yeterliliği",
            (Self::Turkish, Component::CreditUtilization) => "Kredi Kartı Kullanımı",
            (Self::Turkish, Component::Liquidity) => "Likidite Durumu",
            (Self::Turkish, Component::CollateralAssets) => "Teminat Varlıkları",
            (Self::Turkish, Component::Stability) => "İstikrar Faktörü",
            (Self::Turkish, Component::BankingRelationship) => "Banka İlişkisi",
            (Self::English, Component::KkbCreditHistory) => "KKB Credit History",
            (Self::English, Component::DtiRatio) => "Debt-to-Income Ratio",
            (Self::English, Component::IncomeAdequacy) => "Income Adequacy",
            (Self::English, Component::CreditUtilization) => "Credit Card Utilisation",
            (Self::English, Component::Liquidity) => "Liquidity",
            (Self::English, Component::CollateralAssets) => "Collateral Assets",
            (Self::English, Component::Stability) => "Stability",
            (Self::English, Component::BankingRelationship) => "Banking Relationship",
        }
    }

    /// `None` when the component has no message for that bucket.
    pub const fn narrative(self, component: Component, bucket: Bucket) -> Option<&'static str> {
        use Bucket::{Strong, Weak};
        use Component::*;

        let message = match (self, component, bucket) {
            (Self::Turkish, KkbCreditHistory, Strong) => "Yüksek KKB skoru - güvenilir kredi geçmişi",
            (Self::Turkish, DtiRatio, Strong) => "Sürdürülebilir borç/gelir oranı",
            (Self::Turkish, CreditUtilization, Strong) => {
                "Düşük kredi kartı kullanım oranı - disiplinli harcama"
            }
            (Self::Turkish, Liquidity, Strong) => "Güçlü nakit rezervi ve yatırım portföyü",
            (Self::Turkish, CollateralAssets, Strong) => "Değerli varlık ve teminat desteği",
            (Self::Turkish, Stability, Strong) => "İstikrarlı iş ve ikamet durumu",
            (Self::Turkish, BankingRelationship, Strong) => "Uzun vadeli banka müşteri ilişkisi",
            (Self::Turkish, KkbCreditHistory, Weak) => "Düşük KKB skoru - kredi geçmişi risk taşıyor",
            (Self::Turkish, DtiRatio, Weak) => "Yüksek toplam borç yükü - sürdürülebilirlik riski",
            (Self::Turkish, CreditUtilization, Weak) => "Yüksek kredi kartı kullanım oranı",
            (Self::Turkish, Liquidity, Weak) => "Yetersiz nakit rezervi",
            (Self::Turkish, Stability, Weak) => "İş veya ikamet istikrarsızlığı",
            (Self::English, KkbCreditHistory, Strong) => "High KKB score - reliable credit history",
            (Self::English, DtiRatio, Strong) => "Sustainable debt-to-income ratio",
            (Self::English, CreditUtilization, Strong) => {
                "Low credit card utilisation - disciplined spending"
            }
            (Self::English, Liquidity, Strong) => "Strong cash reserves and investment portfolio",
            (Self::English, CollateralAssets, Strong) => "Valuable assets and collateral support",
            (Self::English, Stability, Strong) => "Stable employment and residence",
            (Self::English, BankingRelationship, Strong) => "Long-standing banking relationship",
            (Self::English, KkbCreditHistory, Weak) => "Low KKB score - credit history carries risk",
            (Self::English, DtiRatio, Weak) => "High total debt burden - sustainability risk",
            (Self::English, CreditUtilization, Weak) => "High credit card utilisation",
            (Self::English, Liquidity, Weak) => "Insufficient cash reserves",
            (Self::English, Stability, Weak) => "Employment or residence instability",
            _ => return None,
        };
        Some(message)
    }

    pub fn penalty_note(self, penalty_points: f64) -> String {
        match self {
            Self::Turkish => format!("Risk cezası: {penalty_points:.1} puan"),
            Self::English => format!("Risk penalty: {penalty_points:.1} points"),
        }
    }

    pub fn contribution_reason(self, contribution: f64) -> String {
        match self {
            Self::Turkish => format!("{contribution:.1} puan katkı"),
            Self::English => format!("{contribution:.1} points contributed"),
        }
    }

    pub const fn policy_reason(self, reason: PolicyReason) -> &'static str {
        match (self, reason) {
            (Self::Turkish, PolicyReason::PriorDefault) => "Geçmiş temerrüt",
            (Self::Turkish, PolicyReason::LegalDispute) => "Hukuki ihtilaf",
            (Self::English, PolicyReason::PriorDefault) => "Prior loan default",
            (Self::English, PolicyReason::LegalDispute) => "Pending legal dispute",
        }
    }

    pub const fn debt_source_note(self, source: DebtSource) -> &'static str {
        match (self, source) {
            (Self::Turkish, DebtSource::Declared) => "DTI girdiden alındı",
            (Self::Turkish, DebtSource::Estimated) => "DTI hesaplandı (CC=%4, krediler=24ay)",
            (Self::English, DebtSource::Declared) => "DTI taken from the application",
            (Self::English, DebtSource::Estimated) => {
                "DTI estimated (cards at 4%, existing loans over 24 months)"
            }
        }
    }

    pub fn assumption_notes(self, source: DebtSource, annual_rate: f64) -> Vec<String> {
        let (annuity, rate, investments) = match self {
            Self::Turkish => (
                "Annüite formülü kullanıldı".to_string(),
                format!("Sabit faiz oranı: %{annual_rate}"),
                "Yatırımlar %80 ağırlıkla likidite hesabında".to_string(),
            ),
            Self::English => (
                "Annuity formula applied".to_string(),
                format!("Fixed interest rate: {annual_rate}%"),
                "Investments weighted at 80% for liquidity".to_string(),
            ),
        };

        vec![
            self.debt_source_note(source).to_string(),
            annuity,
            rate,
            investments,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_locale_codes_case_insensitively() {
        assert_eq!(Locale::parse("TR"), Some(Locale::Turkish));
        assert_eq!(Locale::parse(" en-GB "), Some(Locale::English));
        assert_eq!(Locale::parse("de"), None);
    }

    #[test]
    fn income_adequacy_has_no_narrative() {
        for locale in [Locale::Turkish, Locale::English] {
            assert!(locale
                .narrative(Component::IncomeAdequacy, Bucket::Strong)
                .is_none());
            assert!(locale
                .narrative(Component::IncomeAdequacy, Bucket::Weak)
                .is_none());
        }
    }

    #[test]
    fn rate_note_renders_the_plain_decimal() {
        let notes = Locale::Turkish.assumption_notes(DebtSource::Estimated, 4.09);
        assert_eq!(notes[0], "DTI hesaplandı (CC=%4, krediler=24ay)");
        assert_eq!(notes[2], "Sabit faiz oranı: %4.09");
        assert_eq!(notes.len(), 4);
    }

    #[test]
    fn one_decimal_rendering_for_points() {
        assert_eq!(Locale::Turkish.penalty_note(7.0), "Risk cezası: 7.0 puan");
        assert_eq!(Locale::Turkish.contribution_reason(18.75), "18.8 puan katkı");
        assert_eq!(
            Locale::English.contribution_reason(4.2),
            "4.2 points contributed"
        );
    }
}
