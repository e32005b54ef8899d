mod bands;
mod input;

pub use bands::{band_for_percentage, RankBand};
pub use input::{NormalizationInput, NormalizationResult, QualifierValues, ScoreSubmission};

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::domain::{ExamDefinition, InputKind};
use super::error::ValidationError;

/// Where inside a rank band a marks/score conversion lands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandPlacement {
    /// Reproducible midpoint of the band.
    #[default]
    Midpoint,
    /// Uniform draw inside the band.
    Jitter,
}

impl BandPlacement {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "midpoint" | "mid" => Some(Self::Midpoint),
            "jitter" | "random" => Some(Self::Jitter),
            _ => None,
        }
    }
}

/// Converts rank, percentile, marks or score input into one canonical rank.
#[derive(Debug)]
pub struct ScoreNormalizer {
    placement: BandPlacement,
    rng: Mutex<StdRng>,
}

impl Default for ScoreNormalizer {
    fn default() -> Self {
        Self::new(BandPlacement::Midpoint, None)
    }
}

impl ScoreNormalizer {
    /// `seed` makes jittered placement reproducible; without one the generator is seeded from
    /// OS entropy.
    pub fn new(placement: BandPlacement, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            placement,
            rng: Mutex::new(rng),
        }
    }

    pub fn placement(&self) -> BandPlacement {
        self.placement
    }

    pub fn normalize(
        &self,
        exam: &ExamDefinition,
        input: &NormalizationInput,
    ) -> Result<NormalizationResult, ValidationError> {
        if !exam.accepts(input.kind) {
            return Err(ValidationError::InputKindNotAccepted {
                exam_id: exam.id.to_string(),
                kind: input.kind,
            });
        }

        let rank = match input.kind {
            InputKind::Rank => rank_from_rank(input.raw_value)?,
            InputKind::Percentile => rank_from_percentile(input.raw_value, exam)?,
            InputKind::Marks | InputKind::Score => {
                let band = band_for_marks(input.kind, input.raw_value, exam)?;
                self.place(band)
            }
        };

        Ok(NormalizationResult {
            canonical_rank: rank.max(1),
        })
    }

    fn place(&self, band: RankBand) -> u32 {
        match self.placement {
            BandPlacement::Midpoint => band.midpoint(),
            BandPlacement::Jitter => {
                let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
                rng.gen_range(band.low..band.high)
            }
        }
    }
}

fn rank_from_rank(value: f64) -> Result<u32, ValidationError> {
    if value < 1.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(ValidationError::InvalidRank(value));
    }
    Ok(value as u32)
}

fn rank_from_percentile(percentile: f64, exam: &ExamDefinition) -> Result<u32, ValidationError> {
    if !(0.0..=100.0).contains(&percentile) {
        return Err(ValidationError::PercentileOutOfRange(percentile));
    }

    let pool = exam.candidate_pool_size as f64;
    let rank = ((100.0 - percentile) / 100.0 * pool).round();
    Ok((rank as u32).max(1))
}

/// Negative marks are valid under negative marking and fall into the lowest band.
fn band_for_marks(
    kind: InputKind,
    value: f64,
    exam: &ExamDefinition,
) -> Result<RankBand, ValidationError> {
    if value > exam.score_scale as f64 {
        return Err(ValidationError::ScoreOutOfRange {
            kind,
            value,
            max: exam.score_scale,
        });
    }

    let percentage = value / exam.score_scale as f64 * 100.0;
    Ok(band_for_percentage(percentage))
}
