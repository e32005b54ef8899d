use serde::Serialize;

/// Half-open rank interval `[low, high)` that a marks percentage maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankBand {
    pub low: u32,
    pub high: u32,
}

impl RankBand {
    pub const fn new(low: u32, high: u32) -> Self {
        Self { low, high }
    }

    pub const fn midpoint(self) -> u32 {
        self.low + (self.high - self.low) / 2
    }

    pub const fn contains(self, rank: u32) -> bool {
        rank >= self.low && rank < self.high
    }
}

/// Percentage floors checked top-down; the bands overlap where the product tables do.
const RANK_BANDS: [(f64, RankBand); 5] = [
    (99.0, RankBand::new(1, 1_000)),
    (95.0, RankBand::new(1_000, 6_000)),
    (90.0, RankBand::new(5_000, 15_000)),
    (80.0, RankBand::new(15_000, 35_000)),
    (70.0, RankBand::new(35_000, 65_000)),
];

const FALLBACK_BAND: RankBand = RankBand::new(65_000, 115_000);

pub fn band_for_percentage(percentage: f64) -> RankBand {
    RANK_BANDS
        .iter()
        .find(|(floor, _)| percentage >= *floor)
        .map(|(_, band)| *band)
        .unwrap_or(FALLBACK_BAND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges_are_inclusive_floors() {
        assert_eq!(band_for_percentage(100.0), RankBand::new(1, 1_000));
        assert_eq!(band_for_percentage(99.0), RankBand::new(1, 1_000));
        assert_eq!(band_for_percentage(98.999), RankBand::new(1_000, 6_000));
        assert_eq!(band_for_percentage(95.0), RankBand::new(1_000, 6_000));
        assert_eq!(band_for_percentage(90.0), RankBand::new(5_000, 15_000));
        assert_eq!(band_for_percentage(80.0), RankBand::new(15_000, 35_000));
        assert_eq!(band_for_percentage(70.0), RankBand::new(35_000, 65_000));
        assert_eq!(band_for_percentage(69.99), FALLBACK_BAND);
        assert_eq!(band_for_percentage(-5.0), FALLBACK_BAND);
    }

    #[test]
    fn midpoints_sit_inside_their_band() {
        for (_, band) in RANK_BANDS.iter().chain(std::iter::once(&(0.0, FALLBACK_BAND))) {
            assert!(band.contains(band.midpoint()), "{band:?}");
        }
        assert_eq!(RankBand::new(1, 1_000).midpoint(), 500);
        assert_eq!(RankBand::new(65_000, 115_000).midpoint(), 90_000);
    }
}
