use std::collections::HashMap;

use super::domain::{
    ExamDefinition, FieldSet, InputKind, InputModes, QualifierField, Stream,
};

/// Curated catalogue of supported exams, keyed by slug.
#[derive(Debug)]
pub struct ExamRegistry {
    exams: Vec<ExamDefinition>,
    index: HashMap<&'static str, usize>,
}

impl ExamRegistry {
    pub fn standard() -> Self {
        Self::from_definitions(standard_exam_definitions())
    }

    /// Later duplicates of an id are ignored so the first curated entry wins.
    pub fn from_definitions(definitions: Vec<ExamDefinition>) -> Self {
        let mut exams = Vec::with_capacity(definitions.len());
        let mut index = HashMap::with_capacity(definitions.len());
        for definition in definitions {
            if index.contains_key(definition.id) {
                continue;
            }
            index.insert(definition.id, exams.len());
            exams.push(definition);
        }
        Self { exams, index }
    }

    pub fn get_exam(&self, exam_id: &str) -> Option<&ExamDefinition> {
        self.index.get(exam_id).map(|&idx| &self.exams[idx])
    }

    pub fn exams_for_stream(&self, stream: Stream) -> Vec<&ExamDefinition> {
        self.exams
            .iter()
            .filter(|exam| exam.stream == stream)
            .collect()
    }

    pub fn exams(&self) -> &[ExamDefinition] {
        &self.exams
    }

    pub fn len(&self) -> usize {
        self.exams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exams.is_empty()
    }
}

fn standard_exam_definitions() -> Vec<ExamDefinition> {
    use InputKind::{Marks, Percentile, Rank, Score};
    use QualifierField::{
        AcademicProfile, Gender, HomeState, LocalRegion, QuotaType, WorkExperience,
    };

    vec![
        ExamDefinition {
            id: "jee-main",
            display_name: "JEE Main",
            stream: Stream::Engineering,
            score_scale: 300,
            candidate_pool_size: 1_100_000,
            input_modes: InputModes::with_secondary(Percentile, Rank),
            required_fields: FieldSet::new(&[Gender, HomeState]),
        },
        ExamDefinition {
            id: "jee-advanced",
            display_name: "JEE Advanced",
            stream: Stream::Engineering,
            score_scale: 360,
            candidate_pool_size: 180_000,
            input_modes: InputModes::with_secondary(Rank, Marks),
            required_fields: FieldSet::new(&[Gender]),
        },
        ExamDefinition {
            id: "bitsat",
            display_name: "BITSAT",
            stream: Stream::Engineering,
            score_scale: 390,
            candidate_pool_size: 300_000,
            input_modes: InputModes::only(Score),
            required_fields: FieldSet::new(&[]),
        },
        ExamDefinition {
            id: "ts-eamcet",
            display_name: "TS EAMCET",
            stream: Stream::Engineering,
            score_scale: 160,
            candidate_pool_size: 250_000,
            input_modes: InputModes::with_secondary(Rank, Marks),
            required_fields: FieldSet::new(&[Gender, LocalRegion]),
        },
        ExamDefinition {
            id: "ap-eamcet",
            display_name: "AP EAPCET",
            stream: Stream::Engineering,
            score_scale: 160,
            candidate_pool_size: 260_000,
            input_modes: InputModes::with_secondary(Rank, Marks),
            required_fields: FieldSet::new(&[Gender, LocalRegion]),
        },
        ExamDefinition {
            id: "mht-cet",
            display_name: "MHT CET",
            stream: Stream::Engineering,
            score_scale: 200,
            candidate_pool_size: 600_000,
            input_modes: InputModes::with_secondary(Percentile, Marks),
            required_fields: FieldSet::new(&[HomeState, QuotaType]),
        },
        ExamDefinition {
            id: "kcet",
            display_name: "KCET",
            stream: Stream::Engineering,
            score_scale: 180,
            candidate_pool_size: 300_000,
            input_modes: InputModes::only(Rank),
            required_fields: FieldSet::new(&[HomeState]),
        },
        ExamDefinition {
            id: "wbjee",
            display_name: "WBJEE",
            stream: Stream::Engineering,
            score_scale: 200,
            candidate_pool_size: 120_000,
            input_modes: InputModes::with_secondary(Rank, Marks),
            required_fields: FieldSet::new(&[HomeState]),
        },
        ExamDefinition {
            id: "comedk",
            display_name: "COMEDK UGET",
            stream: Stream::Engineering,
            score_scale: 180,
            candidate_pool_size: 100_000,
            input_modes: InputModes::with_secondary(Rank, Marks),
            required_fields: FieldSet::new(&[]),
        },
        ExamDefinition {
            id: "viteee",
            display_name: "VITEEE",
            stream: Stream::Engineering,
            score_scale: 125,
            candidate_pool_size: 200_000,
            input_modes: InputModes::only(Rank),
            required_fields: FieldSet::new(&[]),
        },
        ExamDefinition {
            id: "neet",
            display_name: "NEET UG",
            stream: Stream::Medical,
            score_scale: 720,
            candidate_pool_size: 2_300_000,
            input_modes: InputModes::with_secondary(Rank, Marks),
            required_fields: FieldSet::new(&[HomeState, QuotaType]),
        },
        ExamDefinition {
            id: "neet-pg",
            display_name: "NEET PG",
            stream: Stream::Medical,
            score_scale: 800,
            candidate_pool_size: 220_000,
            input_modes: InputModes::with_secondary(Rank, Score),
            required_fields: FieldSet::new(&[HomeState, QuotaType]),
        },
        ExamDefinition {
            id: "aiims-inicet",
            display_name: "INI-CET",
            stream: Stream::Medical,
            score_scale: 200,
            candidate_pool_size: 80_000,
            input_modes: InputModes::with_secondary(Rank, Percentile),
            required_fields: FieldSet::new(&[]),
        },
        ExamDefinition {
            id: "cat",
            display_name: "CAT",
            stream: Stream::Management,
            score_scale: 198,
            candidate_pool_size: 300_000,
            input_modes: InputModes::with_secondary(Percentile, Score),
            required_fields: FieldSet::new(&[Gender, AcademicProfile, WorkExperience]),
        },
        ExamDefinition {
            id: "xat",
            display_name: "XAT",
            stream: Stream::Management,
            score_scale: 100,
            candidate_pool_size: 100_000,
            input_modes: InputModes::with_secondary(Percentile, Score),
            required_fields: FieldSet::new(&[AcademicProfile, WorkExperience]),
        },
        ExamDefinition {
            id: "cmat",
            display_name: "CMAT",
            stream: Stream::Management,
            score_scale: 400,
            candidate_pool_size: 75_000,
            input_modes: InputModes::with_secondary(Percentile, Score),
            required_fields: FieldSet::new(&[]),
        },
        ExamDefinition {
            id: "mat",
            display_name: "MAT",
            stream: Stream::Management,
            score_scale: 800,
            candidate_pool_size: 60_000,
            input_modes: InputModes::with_secondary(Percentile, Score),
            required_fields: FieldSet::new(&[]),
        },
        ExamDefinition {
            id: "clat",
            display_name: "CLAT",
            stream: Stream::Law,
            score_scale: 120,
            candidate_pool_size: 75_000,
            input_modes: InputModes::with_secondary(Rank, Marks),
            required_fields: FieldSet::new(&[HomeState]),
        },
        ExamDefinition {
            id: "ailet",
            display_name: "AILET",
            stream: Stream::Law,
            score_scale: 150,
            candidate_pool_size: 20_000,
            input_modes: InputModes::with_secondary(Rank, Marks),
            required_fields: FieldSet::new(&[]),
        },
        ExamDefinition {
            id: "lsat-india",
            display_name: "LSAT India",
            stream: Stream::Law,
            score_scale: 100,
            candidate_pool_size: 10_000,
            input_modes: InputModes::with_secondary(Percentile, Score),
            required_fields: FieldSet::new(&[]),
        },
        ExamDefinition {
            id: "uceed",
            display_name: "UCEED",
            stream: Stream::Design,
            score_scale: 300,
            candidate_pool_size: 15_000,
            input_modes: InputModes::with_secondary(Rank, Marks),
            required_fields: FieldSet::new(&[Gender]),
        },
        ExamDefinition {
            id: "nid-dat",
            display_name: "NID DAT",
            stream: Stream::Design,
            score_scale: 100,
            candidate_pool_size: 30_000,
            input_modes: InputModes::only(Rank),
            required_fields: FieldSet::new(&[AcademicProfile]),
        },
        ExamDefinition {
            id: "nift",
            display_name: "NIFT",
            stream: Stream::Design,
            score_scale: 250,
            candidate_pool_size: 35_000,
            input_modes: InputModes::only(Rank),
            required_fields: FieldSet::new(&[HomeState]),
        },
    ]
}
