use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::types::{FeatureValue, Field, ValueKind};

/// Ordered candidate patterns for one field.
///
/// Candidates are tried in order; the first candidate with any match wins,
/// and within a candidate the leftmost match wins. Capture group 1 holds the
/// numeric token.
struct FieldPattern {
    field: Field,
    candidates: Vec<Regex>,
}

/// Extraction table. All patterns run against lowercased text.
static FIELD_PATTERNS: LazyLock<Vec<FieldPattern>> = LazyLock::new(|| {
    vec![
        field(
            Field::Glucose,
            &[r"glucose(?:\s*level)?(?:\s*reading)?(?:\s*of)?\s*[:\-]?\s*(\d+\.?\d*)\s*(?:mg/dl)?"],
        ),
        field(
            Field::BloodPressure,
            // Systolic only; the diastolic half is consumed but not captured.
            &[r"blood[\s_]?pressure(?:\s*reading)?(?:\s*was)?(?:\s*recorded)?(?:\s*at)?\s*[:\-]?\s*(\d+)(?:/\d+)?\s*mmhg"],
        ),
        field(
            Field::Bmi,
            &[r"bmi(?:\s*index)?(?:\s*calculated\s*to)?\s*[:\-]?\s*(\d+\.?\d*)"],
        ),
        field(
            Field::Age,
            &[
                r"(?:\b|_)age(?:\s*of)?\s*[:\-]?\s*(\d+)",
                r"(\d+)[-\s]?year[-\s]?old",
            ],
        ),
        field(
            Field::Insulin,
            &[r"insulin(?:\s*levels?)?(?:\s*at)?\s*[:\-]?\s*(\d+\.?\d*)\s*(?:μu/ml|uu/ml)?"],
        ),
        field(
            Field::SkinThickness,
            &[r"skin[\s_]?thickness(?:\s*of)?\s*[:\-]?\s*(\d+\.?\d*)\s*mm"],
        ),
        field(
            Field::Pregnancies,
            &[
                r"history\s+of\s+(\d+)\s+pregnancies",
                r"pregnancies\s*[:\-]?\s*(\d+)",
            ],
        ),
        field(
            Field::DiabetesPedigreeFunction,
            &[r"diabetes[\s_]?pedigree[\s_]?function(?:\s*(?:yielded|score|of|at|:|=))?\s*[:\-]?\s*(\d+\.?\d*)"],
        ),
        field(
            Field::RadiusMean,
            &[r"radius[_\s]?mean(?:\s*measurement)?(?:\s*was)?(?:\s*documented)?(?:\s*at)?\s*[:\-]?\s*(\d+\.?\d*)\s*mm"],
        ),
        field(
            Field::TextureMean,
            &[r"texture[_\s]?mean(?:\s*values)?(?:\s*of)?(?:\s*at)?\s*[:\-]?\s*(\d+\.?\d*)"],
        ),
        field(
            Field::PerimeterMean,
            &[r"perimeter[_\s]?mean(?:\s*calculations)?(?:\s*showed)?(?:\s*at)?\s*[:\-]?\s*(\d+\.?\d*)\s*mm"],
        ),
        field(
            Field::AreaMean,
            &[r"area[_\s]?mean(?:\s*was)?(?:\s*measured)?(?:\s*at)?\s*[:\-]?\s*(\d+\.?\d*)\s*mm[²2]"],
        ),
        field(
            Field::SmoothnessMean,
            &[r"smoothness[_\s]?mean(?:\s*parameter)?(?:\s*was)?(?:\s*recorded)?(?:\s*as)?\s*[:\-]?\s*(\d+\.?\d*)"],
        ),
    ]
});

fn field(field: Field, patterns: &[&str]) -> FieldPattern {
    FieldPattern {
        field,
        candidates: patterns
            .iter()
            .map(|p| Regex::new(p).expect("Invalid field extraction pattern"))
            .collect(),
    }
}

fn parse_value(token: &str, kind: ValueKind) -> Option<FeatureValue> {
    match kind {
        ValueKind::Int => token.parse::<i64>().ok().map(FeatureValue::Int),
        ValueKind::Float => token.parse::<f64>().ok().map(FeatureValue::Float),
    }
}

/// Run one field's candidates against text that is already lowercase.
pub(crate) fn extract_lowered(field: Field, lowered: &str) -> Option<FeatureValue> {
    let entry = FIELD_PATTERNS.iter().find(|p| p.field == field)?;

    for regex in &entry.candidates {
        let Some(token) = regex.captures(lowered).and_then(|c| c.get(1)) else {
            continue;
        };
        match parse_value(token.as_str(), field.kind()) {
            Some(value) => return Some(value),
            None => {
                debug!(field = %field, token = token.as_str(), "Matched token is not a valid number");
            }
        }
    }

    debug!(field = %field, "No match");
    None
}

/// Extract one field from raw report text (case-insensitive).
pub fn extract(field: Field, text: &str) -> Option<FeatureValue> {
    extract_lowered(field, &text.to_lowercase())
}

pub fn extract_glucose(text: &str) -> Option<FeatureValue> {
    extract(Field::Glucose, text)
}

/// Systolic pressure only.
pub fn extract_blood_pressure(text: &str) -> Option<FeatureValue> {
    extract(Field::BloodPressure, text)
}

pub fn extract_bmi(text: &str) -> Option<FeatureValue> {
    extract(Field::Bmi, text)
}

/// "age: N" first, then "N-year-old".
pub fn extract_age(text: &str) -> Option<FeatureValue> {
    extract(Field::Age, text)
}

pub fn extract_insulin(text: &str) -> Option<FeatureValue> {
    extract(Field::Insulin, text)
}

pub fn extract_skin_thickness(text: &str) -> Option<FeatureValue> {
    extract(Field::SkinThickness, text)
}

/// "history of N pregnancies" takes precedence over "pregnancies: N".
pub fn extract_pregnancies(text: &str) -> Option<FeatureValue> {
    extract(Field::Pregnancies, text)
}

pub fn extract_diabetes_pedigree(text: &str) -> Option<FeatureValue> {
    extract(Field::DiabetesPedigreeFunction, text)
}

pub fn extract_radius_mean(text: &str) -> Option<FeatureValue> {
    extract(Field::RadiusMean, text)
}

pub fn extract_texture_mean(text: &str) -> Option<FeatureValue> {
    extract(Field::TextureMean, text)
}

pub fn extract_perimeter_mean(text: &str) -> Option<FeatureValue> {
    extract(Field::PerimeterMean, text)
}

pub fn extract_area_mean(text: &str) -> Option<FeatureValue> {
    extract(Field::AreaMean, text)
}

pub fn extract_smoothness_mean(text: &str) -> Option<FeatureValue> {
    extract(Field::SmoothnessMean, text)
}
