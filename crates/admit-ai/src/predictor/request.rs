use serde::{Deserialize, Serialize};

use super::domain::{Category, ExamDefinition, QualifierField};
use super::error::ValidationError;
use super::normalizer::{NormalizationResult, QualifierValues};

/// Body of the external `POST /api/predictor` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictorRequest {
    pub rank: u32,
    pub category: Category,
    pub home_state: Option<String>,
    pub preferred_branches: Vec<String>,
}

/// Package a normalized rank with the qualifier answers the exam requires.
pub fn assemble(
    exam: &ExamDefinition,
    result: &NormalizationResult,
    qualifiers: &QualifierValues,
) -> Result<PredictorRequest, ValidationError> {
    let raw_category = qualifiers
        .category()
        .ok_or(ValidationError::MissingField(QualifierField::Category))?;
    let category = Category::parse(raw_category)
        .ok_or_else(|| ValidationError::InvalidCategory(raw_category.to_string()))?;

    if let Some(missing) = exam
        .required_fields
        .iter()
        .find(|field| !qualifiers.is_present(*field))
    {
        return Err(ValidationError::MissingField(missing));
    }

    let preferred_branches = qualifiers
        .preferred_branches
        .iter()
        .map(|branch| branch.trim())
        .filter(|branch| !branch.is_empty())
        .map(str::to_string)
        .collect();

    Ok(PredictorRequest {
        rank: result.canonical_rank,
        category,
        home_state: qualifiers.home_state().map(str::to_string),
        preferred_branches,
    })
}
