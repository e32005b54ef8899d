use admit_ai::error::AppError;
use admit_ai::predictor::{
    assemble, form_fields, BandPlacement, ExamDefinition, ExamRegistry, InputKind, LookupError,
    PredictorError, PredictorRequest, QualifierValues, ScoreNormalizer, ScoreSubmission, Stream,
};
use clap::Args;

#[derive(Args, Debug, Default)]
pub(crate) struct ExamListArgs {
    /// Only list exams for one stream (engineering, medical, management, law, design)
    #[arg(long, value_parser = parse_stream)]
    pub(crate) stream: Option<Stream>,
}

#[derive(Args, Debug)]
pub(crate) struct ExamFieldsArgs {
    /// Exam identifier, e.g. jee-main
    pub(crate) exam_id: String,
}

#[derive(Args, Debug)]
pub(crate) struct NormalizeArgs {
    /// Exam identifier, e.g. jee-main
    #[arg(long)]
    pub(crate) exam: String,
    /// Kind of value entered: rank, percentile, marks, or score
    #[arg(long = "input-type", value_parser = parse_input_kind)]
    pub(crate) input_type: InputKind,
    /// The rank, percentile, marks, or score itself
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) value: f64,
    /// Reservation category (General, EWS, OBC, SC, ST, PwD)
    #[arg(long)]
    pub(crate) category: Option<String>,
    #[arg(long)]
    pub(crate) gender: Option<String>,
    #[arg(long)]
    pub(crate) home_state: Option<String>,
    #[arg(long)]
    pub(crate) local_region: Option<String>,
    #[arg(long)]
    pub(crate) quota_type: Option<String>,
    #[arg(long)]
    pub(crate) academic_profile: Option<String>,
    /// Months of full-time work experience
    #[arg(long)]
    pub(crate) work_experience: Option<u32>,
    /// Preferred branch; repeat for several
    #[arg(long = "branch")]
    pub(crate) branches: Vec<String>,
    /// Rank placement inside a marks band: midpoint or jitter
    #[arg(long, value_parser = parse_placement, default_value = "midpoint")]
    pub(crate) placement: BandPlacement,
    /// Seed for jitter placement, for reproducible output
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

fn parse_stream(value: &str) -> Result<Stream, String> {
    Stream::parse(value).ok_or_else(|| format!("unknown stream '{value}'"))
}

fn parse_input_kind(value: &str) -> Result<InputKind, String> {
    InputKind::parse(value).ok_or_else(|| format!("unknown input type '{value}'"))
}

fn parse_placement(value: &str) -> Result<BandPlacement, String> {
    BandPlacement::parse(value).ok_or_else(|| format!("unknown placement '{value}'"))
}

pub(crate) fn run_exam_list(args: ExamListArgs) -> Result<(), AppError> {
    let registry = ExamRegistry::standard();
    let streams: Vec<Stream> = match args.stream {
        Some(stream) => vec![stream],
        None => Stream::ordered().to_vec(),
    };

    for stream in streams {
        println!("{}", stream.label());
        for exam in registry.exams_for_stream(stream) {
            println!("  {}", describe_exam(exam));
        }
    }
    Ok(())
}

pub(crate) fn run_exam_fields(args: ExamFieldsArgs) -> Result<(), AppError> {
    let registry = ExamRegistry::standard();
    let form = form_fields(&registry, args.exam_id.trim())
        .ok_or_else(|| PredictorError::from(LookupError::ExamNotFound(args.exam_id.clone())))?;

    println!("{} ({})", form.display_name, form.exam_id);
    println!("  Stream:      {}", form.stream.label());
    println!("  Score scale: {}", form.score_scale);
    match form.secondary_input {
        Some(secondary) => println!(
            "  Inputs:      {} or {}",
            form.primary_input.label(),
            secondary.label()
        ),
        None => println!("  Inputs:      {}", form.primary_input.label()),
    }
    println!("  Required fields:");
    for field in &form.required_fields {
        println!("    - {} ({})", field.label, field.field.wire_name());
    }
    Ok(())
}

pub(crate) fn run_normalize(args: NormalizeArgs) -> Result<(), AppError> {
    let registry = ExamRegistry::standard();
    let normalizer = ScoreNormalizer::new(args.placement, args.seed);
    let request = normalize_and_assemble(&registry, &normalizer, args)?;
    render_request(&request)?;
    Ok(())
}

fn normalize_and_assemble(
    registry: &ExamRegistry,
    normalizer: &ScoreNormalizer,
    args: NormalizeArgs,
) -> Result<PredictorRequest, PredictorError> {
    let exam = registry
        .get_exam(args.exam.trim())
        .ok_or_else(|| LookupError::ExamNotFound(args.exam.trim().to_string()))?;

    let submission = ScoreSubmission::new(exam.id, args.input_type, args.value).with_qualifiers(
        QualifierValues {
            category: args.category,
            gender: args.gender,
            home_state: args.home_state,
            local_region: args.local_region,
            quota_type: args.quota_type,
            academic_profile: args.academic_profile,
            work_experience: args.work_experience,
            preferred_branches: args.branches,
        },
    );

    let input = submission.to_input()?;
    let result = normalizer.normalize(exam, &input)?;
    println!(
        "{} {} {} -> canonical rank {}",
        exam.display_name,
        args.input_type.label().to_lowercase(),
        args.value,
        result.canonical_rank
    );
    Ok(assemble(exam, &result, &submission.qualifiers)?)
}

fn render_request(request: &PredictorRequest) -> Result<(), AppError> {
    let payload = serde_json::to_string_pretty(request)
        .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
    println!("Predictor payload:\n{payload}");
    Ok(())
}

fn describe_exam(exam: &ExamDefinition) -> String {
    let inputs = exam
        .input_modes
        .kinds()
        .into_iter()
        .map(InputKind::as_str)
        .collect::<Vec<_>>()
        .join("/");
    format!(
        "{:<14} {:<40} scale {:>4}  inputs {}",
        exam.id, exam.display_name, exam.score_scale, inputs
    )
}
