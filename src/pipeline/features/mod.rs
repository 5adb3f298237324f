//! Clinical feature extraction from report text.
//!
//! A declarative pattern table (`patterns`) recognises each field's phrasings;
//! `extract_all_features` runs every entry once and assembles the fixed-key
//! `FeatureRecord`. A miss is an absent value, never an error.

pub mod header;
pub mod patterns;
pub mod types;

pub use header::*;
pub use patterns::*;
pub use types::*;

use tracing::debug;

/// Run every field extractor against the same text.
///
/// Deterministic and side-effect free: identical text yields an identical
/// record, and the record always carries every field.
pub fn extract_all_features(text: &str) -> FeatureRecord {
    let lowered = text.to_lowercase();
    let record = FeatureRecord::from_values(
        Field::ALL
            .iter()
            .map(|&field| (field, patterns::extract_lowered(field, &lowered))),
    );

    debug!(
        found = record.present_count(),
        total = Field::ALL.len(),
        "Feature extraction complete"
    );
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    const JANE_DOE: &str = "Patient: Jane Doe, a 50-year-old. Glucose level of 160 mg/dl, \
BMI calculated to 32.5, blood pressure reading at 140/90 mmHg.";

    #[test]
    fn end_to_end_report_fields() {
        let record = extract_all_features(JANE_DOE);

        assert_eq!(record.get(Field::Glucose), Some(FeatureValue::Float(160.0)));
        assert_eq!(record.get(Field::Bmi), Some(FeatureValue::Float(32.5)));
        assert_eq!(record.get(Field::BloodPressure), Some(FeatureValue::Int(140)));
        assert_eq!(record.get(Field::Age), Some(FeatureValue::Int(50)));

        for f in [
            Field::RadiusMean,
            Field::TextureMean,
            Field::PerimeterMean,
            Field::AreaMean,
            Field::SmoothnessMean,
        ] {
            assert_eq!(record.get(f), None, "{f} should be absent");
        }
    }

    #[test]
    fn record_always_has_every_key() {
        for text in ["", "nothing clinical here", JANE_DOE, "glucose: 99"] {
            let record = extract_all_features(text);
            assert_eq!(record.iter().count(), Field::ALL.len());
            let json = serde_json::to_value(&record).unwrap();
            assert_eq!(json.as_object().unwrap().len(), Field::ALL.len());
        }
    }

    #[test]
    fn assembly_is_deterministic() {
        assert_eq!(extract_all_features(JANE_DOE), extract_all_features(JANE_DOE));
    }

    #[test]
    fn assembler_agrees_with_single_field_extractors() {
        let record = extract_all_features(JANE_DOE);
        for f in Field::ALL {
            assert_eq!(record.get(*f), extract(*f, JANE_DOE), "field {f}");
        }
    }

    #[test]
    fn no_cross_field_inference() {
        // Blood pressure without its unit is not found, even with glucose present.
        let record = extract_all_features("glucose: 120, blood pressure 130/80");
        assert!(record.is_present(Field::Glucose));
        assert!(!record.is_present(Field::BloodPressure));
    }
}
