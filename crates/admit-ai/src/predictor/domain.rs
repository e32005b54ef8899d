use serde::{Deserialize, Serialize};
use std::fmt;

/// Academic stream an exam feeds into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stream {
    Engineering,
    Medical,
    Management,
    Law,
    Design,
}

impl Stream {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Engineering,
            Self::Medical,
            Self::Management,
            Self::Law,
            Self::Design,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Engineering => "Engineering",
            Self::Medical => "Medical",
            Self::Management => "Management",
            Self::Law => "Law",
            Self::Design => "Design",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ordered()
            .into_iter()
            .find(|stream| stream.label().eq_ignore_ascii_case(value))
    }
}

/// The kind of number a candidate types into the predictor form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Rank,
    Percentile,
    Marks,
    Score,
}

impl InputKind {
    pub const fn ordered() -> [Self; 4] {
        [Self::Rank, Self::Percentile, Self::Marks, Self::Score]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rank => "rank",
            Self::Percentile => "percentile",
            Self::Marks => "marks",
            Self::Score => "score",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Rank => "Rank",
            Self::Percentile => "Percentile",
            Self::Marks => "Marks",
            Self::Score => "Score",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ordered()
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepted input kinds for an exam: exactly one primary, at most one secondary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InputModes {
    pub primary: InputKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<InputKind>,
}

impl InputModes {
    pub const fn only(primary: InputKind) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }

    pub const fn with_secondary(primary: InputKind, secondary: InputKind) -> Self {
        Self {
            primary,
            secondary: Some(secondary),
        }
    }

    pub fn accepts(&self, kind: InputKind) -> bool {
        self.primary == kind || self.secondary == Some(kind)
    }

    pub fn kinds(&self) -> Vec<InputKind> {
        std::iter::once(self.primary).chain(self.secondary).collect()
    }
}

/// Qualifier fields a predictor form may ask for beyond the score itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QualifierField {
    Category,
    Gender,
    HomeState,
    LocalRegion,
    QuotaType,
    AcademicProfile,
    WorkExperience,
}

impl QualifierField {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Category,
            Self::Gender,
            Self::HomeState,
            Self::LocalRegion,
            Self::QuotaType,
            Self::AcademicProfile,
            Self::WorkExperience,
        ]
    }

    /// Field name used by form payloads.
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Gender => "gender",
            Self::HomeState => "homeState",
            Self::LocalRegion => "localRegion",
            Self::QuotaType => "quotaType",
            Self::AcademicProfile => "academicProfile",
            Self::WorkExperience => "workExperience",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Gender => "Gender",
            Self::HomeState => "Home State",
            Self::LocalRegion => "Local Region",
            Self::QuotaType => "Quota Type",
            Self::AcademicProfile => "Academic Profile",
            Self::WorkExperience => "Work Experience",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|field| field.wire_name() == name)
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for QualifierField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Bitset of required qualifier fields. `Category` is always a member.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldSet(u8);

impl FieldSet {
    pub const fn new(extra: &[QualifierField]) -> Self {
        let mut bits = QualifierField::Category.bit();
        let mut idx = 0;
        while idx < extra.len() {
            bits |= extra[idx].bit();
            idx += 1;
        }
        Self(bits)
    }

    pub const fn contains(self, field: QualifierField) -> bool {
        self.0 & field.bit() != 0
    }

    pub fn iter(self) -> impl Iterator<Item = QualifierField> {
        QualifierField::ordered()
            .into_iter()
            .filter(move |field| self.contains(*field))
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Serialize for FieldSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

/// Static description of a supported entrance exam.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamDefinition {
    pub id: &'static str,
    pub display_name: &'static str,
    pub stream: Stream,
    pub score_scale: u32,
    pub candidate_pool_size: u32,
    pub input_modes: InputModes,
    pub required_fields: FieldSet,
}

impl ExamDefinition {
    pub fn accepts(&self, kind: InputKind) -> bool {
        self.input_modes.accepts(kind)
    }

    pub fn requires(&self, field: QualifierField) -> bool {
        self.required_fields.contains(field)
    }
}

/// Reservation category accepted by the predictor backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    General,
    #[serde(rename = "EWS")]
    Ews,
    #[serde(rename = "OBC")]
    Obc,
    #[serde(rename = "SC")]
    Sc,
    #[serde(rename = "ST")]
    St,
    #[serde(rename = "PwD")]
    PwD,
}

impl Category {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::General,
            Self::Ews,
            Self::Obc,
            Self::Sc,
            Self::St,
            Self::PwD,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Ews => "EWS",
            Self::Obc => "OBC",
            Self::Sc => "SC",
            Self::St => "ST",
            Self::PwD => "PwD",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ordered()
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(value))
    }
}
