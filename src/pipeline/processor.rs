//! Report processing orchestrator.
//!
//! Drives one report through ingest → extract → predict and, on request,
//! runs the summarizer alongside. Every stage degrades to a partial result:
//! a failed ingest yields empty text, a failed model yields `Failed` for that
//! model only, a failed summary yields `SummaryOutcome::Failed`.

use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::pipeline::features::{
    extract_all_features, extract_patient_header, FeatureRecord, PatientHeader,
};
use crate::pipeline::ingestion::ingest_path;
use crate::pipeline::prediction::{BundleCache, DiseaseModel, PredictionOutcome};
use crate::pipeline::summary::Summarizer;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SummaryOutcome {
    Completed { text: String },
    Failed { error: String },
}

/// Everything handed to the presentation layer for one report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutcome {
    pub header: PatientHeader,
    pub features: FeatureRecord,
    pub diabetes: PredictionOutcome,
    pub breast_cancer: PredictionOutcome,
    /// Set when the document could not be read; features are then all absent.
    pub ingestion_error: Option<String>,
    /// Present only when a summary was requested.
    pub summary: Option<SummaryOutcome>,
}

impl ReportOutcome {
    pub fn prediction(&self, disease: DiseaseModel) -> &PredictionOutcome {
        match disease {
            DiseaseModel::Diabetes => &self.diabetes,
            DiseaseModel::BreastCancer => &self.breast_cancer,
        }
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

pub struct ReportProcessor {
    bundles: BundleCache,
}

impl ReportProcessor {
    pub fn new(bundles: BundleCache) -> Self {
        Self { bundles }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(BundleCache::new(&config.models_dir))
    }

    pub fn bundles(&self) -> &BundleCache {
        &self.bundles
    }

    /// Run one disease model. The bundle is only loaded when the driver
    /// field is present.
    pub fn predict(&self, disease: DiseaseModel, record: &FeatureRecord) -> PredictionOutcome {
        let adapter = disease.adapter();
        if let Some(reason) = adapter.unavailable_reason(record) {
            info!(model = %disease, "{reason}");
            return PredictionOutcome::Unavailable { reason };
        }

        let bundle = match self.bundles.get(disease) {
            Ok(bundle) => bundle,
            Err(e) => {
                return PredictionOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        adapter
            .predict(record, &bundle)
            .unwrap_or_else(|e| {
                warn!(model = %disease, error = %e, "Prediction failed");
                PredictionOutcome::Failed {
                    error: e.to_string(),
                }
            })
    }

    /// Extract features and run both models on report text.
    pub fn analyze_text(&self, text: &str) -> ReportOutcome {
        let features = extract_all_features(text);
        info!(
            found = features.present_count(),
            "Processing: features extracted"
        );

        let diabetes = self.predict(DiseaseModel::Diabetes, &features);
        let breast_cancer = self.predict(DiseaseModel::BreastCancer, &features);

        ReportOutcome {
            header: extract_patient_header(text),
            features,
            diabetes,
            breast_cancer,
            ingestion_error: None,
            summary: None,
        }
    }

    /// `analyze_text` with the summarizer running on a separate thread.
    ///
    /// The summary's latency or failure never changes the predictions.
    pub fn analyze_text_with_summary(
        &self,
        text: &str,
        summarizer: &(dyn Summarizer + Sync),
        model: &str,
    ) -> ReportOutcome {
        std::thread::scope(|scope| {
            let summary = scope.spawn(|| summarize_report(summarizer, text, model));
            let mut outcome = self.analyze_text(text);
            outcome.summary = Some(summary.join().unwrap_or_else(|_| SummaryOutcome::Failed {
                error: "Summarizer thread panicked".to_string(),
            }));
            outcome
        })
    }

    /// Ingest a document from disk and analyze it.
    pub fn process_path(&self, path: &Path) -> ReportOutcome {
        let (text, ingestion_error) = read_report(path);
        let mut outcome = self.analyze_text(&text);
        outcome.ingestion_error = ingestion_error;
        outcome
    }

    pub fn process_path_with_summary(
        &self,
        path: &Path,
        summarizer: &(dyn Summarizer + Sync),
        model: &str,
    ) -> ReportOutcome {
        let (text, ingestion_error) = read_report(path);
        let mut outcome = self.analyze_text_with_summary(&text, summarizer, model);
        outcome.ingestion_error = ingestion_error;
        outcome
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Ingestion failures become empty text so extraction still runs.
fn read_report(path: &Path) -> (String, Option<String>) {
    match ingest_path(path) {
        Ok(text) => (text, None),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ingestion failed, continuing with empty text");
            (String::new(), Some(e.to_string()))
        }
    }
}

/// Call the summarizer, folding any failure into the outcome.
pub fn summarize_report(
    summarizer: &(dyn Summarizer + Sync),
    text: &str,
    model: &str,
) -> SummaryOutcome {
    if text.trim().is_empty() {
        return SummaryOutcome::Failed {
            error: "Report contains no text to summarize".to_string(),
        };
    }

    match summarizer.summarize(text, model) {
        Ok(text) => SummaryOutcome::Completed { text },
        Err(e) => {
            warn!(error = %e, "Summary failed");
            SummaryOutcome::Failed {
                error: e.to_string(),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::pipeline::features::{FeatureValue, Field};
    use crate::pipeline::prediction::adapter::tests::{
        glucose_threshold_bundle, radius_threshold_bundle,
    };
    use crate::pipeline::prediction::RiskLabel;
    use crate::pipeline::summary::MockSummarizer;

    const JANE_DOE: &str = "Patient: Jane Doe, a 50-year-old. Glucose level of 160 mg/dl, \
BMI calculated to 32.5, blood pressure reading at 140/90 mmHg.";

    fn loaded_processor() -> ReportProcessor {
        let cache = BundleCache::new("/nonexistent/models");
        cache
            .insert(DiseaseModel::Diabetes, glucose_threshold_bundle())
            .unwrap();
        cache
            .insert(DiseaseModel::BreastCancer, radius_threshold_bundle())
            .unwrap();
        ReportProcessor::new(cache)
    }

    #[test]
    fn end_to_end_jane_doe() {
        let outcome = loaded_processor().analyze_text(JANE_DOE);

        assert_eq!(outcome.features.get(Field::Glucose), Some(FeatureValue::Float(160.0)));
        assert_eq!(outcome.features.get(Field::Bmi), Some(FeatureValue::Float(32.5)));
        assert_eq!(
            outcome.features.get(Field::BloodPressure),
            Some(FeatureValue::Int(140))
        );
        assert_eq!(outcome.features.get(Field::Age), Some(FeatureValue::Int(50)));

        let diabetes = outcome.diabetes.prediction().expect("diabetes predicted");
        assert_eq!(diabetes.label, RiskLabel::Positive);
        assert_eq!(diabetes.defaulted.len(), 4);

        assert!(matches!(
            outcome.breast_cancer,
            PredictionOutcome::Unavailable { .. }
        ));
        assert_eq!(outcome.header.name.as_deref().map(|n| n.starts_with("Jane Doe")), Some(true));
        assert!(outcome.summary.is_none());
    }

    #[test]
    fn missing_models_fail_per_model_only() {
        let dir = tempfile::tempdir().unwrap();
        let processor = ReportProcessor::new(BundleCache::new(dir.path()));
        let outcome = processor.analyze_text(JANE_DOE);

        assert!(matches!(outcome.diabetes, PredictionOutcome::Failed { .. }));
        // Driver absent: unavailable, and the missing bundle is never touched.
        assert!(matches!(
            outcome.breast_cancer,
            PredictionOutcome::Unavailable { .. }
        ));
        assert_eq!(outcome.features.present_count(), 4);
    }

    #[test]
    fn one_failed_model_does_not_block_the_other() {
        let dir = tempfile::tempdir().unwrap();
        let cache = BundleCache::new(dir.path());
        cache
            .insert(DiseaseModel::BreastCancer, radius_threshold_bundle())
            .unwrap();
        let processor = ReportProcessor::new(cache);

        let text = "Glucose: 150. Radius mean 18.2 mm.";
        let outcome = processor.analyze_text(text);
        assert!(matches!(outcome.diabetes, PredictionOutcome::Failed { .. }));
        assert_eq!(outcome.breast_cancer.label(), Some(RiskLabel::Positive));
    }

    #[test]
    fn unreadable_document_degrades_to_empty_record() {
        let outcome = loaded_processor().process_path(Path::new("/nonexistent/report.pdf"));
        assert!(outcome.ingestion_error.is_some());
        assert_eq!(outcome.features.present_count(), 0);
        assert!(matches!(outcome.diabetes, PredictionOutcome::Unavailable { .. }));
        assert!(matches!(
            outcome.breast_cancer,
            PredictionOutcome::Unavailable { .. }
        ));
    }

    #[test]
    fn text_file_is_processed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        std::fs::write(&path, JANE_DOE).unwrap();

        let outcome = loaded_processor().process_path(&path);
        assert!(outcome.ingestion_error.is_none());
        assert_eq!(outcome.diabetes.label(), Some(RiskLabel::Positive));
    }

    #[test]
    fn summary_is_attached() {
        let summarizer = MockSummarizer::new("Hyperglycaemia noted.");
        let outcome =
            loaded_processor().analyze_text_with_summary(JANE_DOE, &summarizer, "gemini-1.5-flash");
        assert_eq!(
            outcome.summary,
            Some(SummaryOutcome::Completed {
                text: "Hyperglycaemia noted.".into()
            })
        );
    }

    #[test]
    fn summary_failure_keeps_predictions() {
        let summarizer = MockSummarizer::failing("503 from upstream");
        let with_summary =
            loaded_processor().analyze_text_with_summary(JANE_DOE, &summarizer, "m");
        let without = loaded_processor().analyze_text(JANE_DOE);

        assert!(matches!(
            with_summary.summary,
            Some(SummaryOutcome::Failed { .. })
        ));
        assert_eq!(with_summary.diabetes, without.diabetes);
        assert_eq!(with_summary.features, without.features);
    }

    #[test]
    fn slow_summary_runs_alongside_prediction() {
        let delay = Duration::from_millis(200);
        let summarizer = MockSummarizer::new("ok").with_delay(delay);
        let started = Instant::now();
        let outcome = loaded_processor().analyze_text_with_summary(JANE_DOE, &summarizer, "m");

        assert!(started.elapsed() >= delay);
        assert_eq!(outcome.diabetes.label(), Some(RiskLabel::Positive));
    }

    #[test]
    fn empty_text_is_not_sent_to_summarizer() {
        let summarizer = MockSummarizer::new("should not be used");
        assert!(matches!(
            summarize_report(&summarizer, "   ", "m"),
            SummaryOutcome::Failed { .. }
        ));
    }

    #[test]
    fn outcome_serializes_for_presentation() {
        let outcome = loaded_processor().analyze_text(JANE_DOE);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["features"]["glucose"], serde_json::json!(160.0));
        assert_eq!(json["diabetes"]["status"], "predicted");
        assert_eq!(json["breast_cancer"]["status"], "unavailable");
        assert!(json["ingestion_error"].is_null());
    }
}
