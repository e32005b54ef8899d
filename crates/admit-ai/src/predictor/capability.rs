use serde::Serialize;

use super::domain::{ExamDefinition, InputKind, QualifierField, Stream};
use super::registry::ExamRegistry;

/// Whether the predictor form must collect `field_name` for `exam_id`.
///
/// Unknown exams and unknown field names answer `false`; a missing requirement is never a fault.
pub fn requires_field(registry: &ExamRegistry, exam_id: &str, field_name: &str) -> bool {
    match QualifierField::from_wire_name(field_name) {
        Some(field) => requires(registry, exam_id, field),
        None => false,
    }
}

pub fn requires(registry: &ExamRegistry, exam_id: &str, field: QualifierField) -> bool {
    registry
        .get_exam(exam_id)
        .map(|exam| exam.requires(field))
        .unwrap_or(false)
}

/// Everything a form renderer needs to lay out the predictor inputs for one exam.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormCapabilities {
    pub exam_id: &'static str,
    pub display_name: &'static str,
    pub stream: Stream,
    pub score_scale: u32,
    pub primary_input: InputKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_input: Option<InputKind>,
    pub required_fields: Vec<FieldCapability>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldCapability {
    pub field: QualifierField,
    pub label: &'static str,
}

impl From<&ExamDefinition> for FormCapabilities {
    fn from(exam: &ExamDefinition) -> Self {
        Self {
            exam_id: exam.id,
            display_name: exam.display_name,
            stream: exam.stream,
            score_scale: exam.score_scale,
            primary_input: exam.input_modes.primary,
            secondary_input: exam.input_modes.secondary,
            required_fields: exam
                .required_fields
                .iter()
                .map(|field| FieldCapability {
                    field,
                    label: field.label(),
                })
                .collect(),
        }
    }
}

pub fn form_fields(registry: &ExamRegistry, exam_id: &str) -> Option<FormCapabilities> {
    registry.get_exam(exam_id).map(FormCapabilities::from)
}
