use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static RE_PATIENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Patient:\s*([^\n]+)").unwrap());
static RE_YEAR_OLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)[-\s]?year[-\s]?old").unwrap());
static RE_EXAM_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Date of Examination:\s*([^\n]+)").unwrap());

/// Identification block shown above the extracted measurements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatientHeader {
    pub name: Option<String>,
    pub age: Option<String>,
    pub examination_date: Option<String>,
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Read the patient header lines. Labels are matched case-sensitively, as
/// they appear on report templates.
pub fn extract_patient_header(text: &str) -> PatientHeader {
    PatientHeader {
        name: first_capture(&RE_PATIENT, text),
        age: first_capture(&RE_YEAR_OLD, text),
        examination_date: first_capture(&RE_EXAM_DATE, text),
    }
}
