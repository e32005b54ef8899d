use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::super::domain::{InputKind, QualifierField};
use super::super::error::ValidationError;

/// Qualifier answers collected alongside the score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualifierValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academic_profile: Option<String>,
    /// Months of full-time work experience.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_experience: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preferred_branches: Vec<String>,
}

impl QualifierValues {
    /// Text answers that are blank after trimming count as absent.
    pub fn is_present(&self, field: QualifierField) -> bool {
        match field {
            QualifierField::Category => non_blank(&self.category).is_some(),
            QualifierField::Gender => non_blank(&self.gender).is_some(),
            QualifierField::HomeState => non_blank(&self.home_state).is_some(),
            QualifierField::LocalRegion => non_blank(&self.local_region).is_some(),
            QualifierField::QuotaType => non_blank(&self.quota_type).is_some(),
            QualifierField::AcademicProfile => non_blank(&self.academic_profile).is_some(),
            QualifierField::WorkExperience => self.work_experience.is_some(),
        }
    }

    pub fn home_state(&self) -> Option<&str> {
        non_blank(&self.home_state)
    }

    pub fn category(&self) -> Option<&str> {
        non_blank(&self.category)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Loosely typed predictor form as it arrives from a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub exam_id: String,
    #[serde(default)]
    pub input_type: Option<String>,
    #[serde(default)]
    pub raw_value: Option<Value>,
    #[serde(flatten)]
    pub qualifiers: QualifierValues,
}

impl ScoreSubmission {
    pub fn new(exam_id: impl Into<String>, kind: InputKind, raw_value: f64) -> Self {
        Self {
            exam_id: exam_id.into(),
            input_type: Some(kind.as_str().to_string()),
            raw_value: Some(
                serde_json::Number::from_f64(raw_value)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::String(raw_value.to_string())),
            ),
            qualifiers: QualifierValues::default(),
        }
    }

    pub fn with_qualifiers(mut self, qualifiers: QualifierValues) -> Self {
        self.qualifiers = qualifiers;
        self
    }

    /// Type-check the form into a normalization input.
    pub fn to_input(&self) -> Result<NormalizationInput, ValidationError> {
        let raw_value = parse_raw_value(self.raw_value.as_ref())?;
        let kind = match self.input_type.as_deref().map(str::trim) {
            None | Some("") => return Err(ValidationError::MissingInputType),
            Some(raw) => InputKind::parse(raw)
                .ok_or_else(|| ValidationError::UnsupportedInputType(raw.to_string()))?,
        };

        Ok(NormalizationInput {
            exam_id: self.exam_id.trim().to_string(),
            kind,
            raw_value,
            qualifiers: self.qualifiers.clone(),
        })
    }
}

fn parse_raw_value(raw: Option<&Value>) -> Result<f64, ValidationError> {
    let value = match raw {
        None | Some(Value::Null) => return Err(ValidationError::MissingValue),
        Some(Value::Number(number)) => number
            .as_f64()
            .ok_or_else(|| ValidationError::NonNumeric(number.to_string()))?,
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::MissingValue);
            }
            trimmed
                .parse::<f64>()
                .map_err(|_| ValidationError::NonNumeric(trimmed.to_string()))?
        }
        Some(other) => return Err(ValidationError::NonNumeric(other.to_string())),
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NonNumeric(value.to_string()))
    }
}

/// A single, type-checked predictor submission.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationInput {
    pub exam_id: String,
    pub kind: InputKind,
    pub raw_value: f64,
    pub qualifiers: QualifierValues,
}

impl NormalizationInput {
    pub fn new(exam_id: impl Into<String>, kind: InputKind, raw_value: f64) -> Self {
        Self {
            exam_id: exam_id.into(),
            kind,
            raw_value,
            qualifiers: QualifierValues::default(),
        }
    }
}

/// The single comparable rank sent downstream. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationResult {
    pub canonical_rank: u32,
}
