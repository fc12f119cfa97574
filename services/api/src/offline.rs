use clap::Args;
use credit_engine::config::AppConfig;
use credit_engine::error::AppError;
use credit_engine::scoring::{
    ApplicationRecord, CreditScorer, EngineConfig, Locale, ScoringEngine, ScoringResult,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file holding a single application object
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Pretty-print the scoring result
    #[arg(long)]
    pub(crate) pretty: bool,
    /// Narrative language (`tr` or `en`); defaults to CREDIT_LOCALE
    #[arg(long)]
    pub(crate) locale: Option<String>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let locale = match args.locale.as_deref() {
        Some(raw) => Locale::parse(raw).ok_or_else(|| {
            AppError::Config(credit_engine::config::ConfigError::InvalidLocale(
                raw.to_string(),
            ))
        })?,
        None => AppConfig::load()?.scoring.locale,
    };

    let result = score_file(&args.input, locale)?;
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{rendered}");
    Ok(())
}

pub(crate) fn score_file(path: &Path, locale: Locale) -> Result<ScoringResult, AppError> {
    let raw = fs::read_to_string(path)?;
    let payload: serde_json::Value = serde_json::from_str(&raw)?;
    let record = ApplicationRecord::from_json(&payload)?;
    let engine = ScoringEngine::new(EngineConfig::standard().with_locale(locale))?;
    Ok(engine.score(&record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use credit_engine::scoring::Decision;

    fn write_fixture(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "credit-engine-{}-{name}.json",
            std::process::id()
        ));
        fs::write(&path, contents).expect("fixture written");
        path
    }

    #[test]
    fn scores_application_file() {
        let path = write_fixture(
            "strong",
            r#"{"monthly_income": 15000, "loan_amount": 100000, "loan_term_months": 36,
                "kkb_score": 750, "bank_balance": 100000, "work_experience": 5,
                "existing_relationship": 60}"#,
        );

        let result = score_file(&path, Locale::English).expect("file scores");
        fs::remove_file(&path).ok();

        assert_eq!(result.score, 76.05);
        assert_eq!(result.decision, Decision::Approve);
        assert_eq!(
            result.explainability.top_five_features[0].feature,
            "Debt-to-Income Ratio"
        );
    }

    #[test]
    fn rejects_files_that_are_not_objects() {
        let path = write_fixture("array", "[1, 2, 3]");
        let err = score_file(&path, Locale::Turkish).expect_err("arrays rejected");
        fs::remove_file(&path).ok();
        assert!(matches!(err, AppError::Input(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = score_file(Path::new("/nonexistent/application.json"), Locale::Turkish)
            .expect_err("missing file");
        assert!(matches!(err, AppError::Io(_)));
    }
}
