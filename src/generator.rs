// LucidQuant - Value Generator
// Plausible demo numbers for named indicators, bucketed by name

use crate::models::Trend;
use rand::seq::SliceRandom;
use rand::Rng;

/// Numeric range and rounding for one bucket of indicators
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
    /// Digits after the decimal point (0 = whole number)
    pub decimals: i32,
}

impl ValueRange {
    const fn new(min: f64, max: f64, decimals: i32) -> Self {
        ValueRange { min, max, decimals }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let raw = rng.gen_range(self.min..=self.max);
        let scale = 10f64.powi(self.decimals);
        // Bounds are exact at this precision, so rounding stays in range
        ((raw * scale).round() / scale).clamp(self.min, self.max)
    }
}

/// First matching substring wins
const RANGES: [(&str, ValueRange); 6] = [
    ("VIX", ValueRange::new(15.0, 35.0, 2)),
    ("Baltic", ValueRange::new(800.0, 2500.0, 0)),
    ("PMI", ValueRange::new(45.0, 65.0, 1)),
    ("Unemployment", ValueRange::new(3.5, 8.0, 1)),
    ("Inflation", ValueRange::new(1.5, 6.0, 1)),
    ("Confidence", ValueRange::new(85.0, 125.0, 1)),
];

const DEFAULT_RANGE: ValueRange = ValueRange::new(50.0, 150.0, 2);

/// Range an indicator name falls into
pub fn range_for(name: &str) -> ValueRange {
    RANGES
        .iter()
        .find(|(needle, _)| name.contains(needle))
        .map(|(_, range)| *range)
        .unwrap_or(DEFAULT_RANGE)
}

/// Random value inside the indicator's range
pub fn value_for<R: Rng + ?Sized>(name: &str, rng: &mut R) -> f64 {
    range_for(name).sample(rng)
}

/// Uniform pick from up/down/stable, independent of any value
pub fn trend<R: Rng + ?Sized>(rng: &mut R) -> Trend {
    *Trend::ALL.choose(rng).unwrap_or(&Trend::Stable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn decimals_of(value: f64, decimals: i32) -> bool {
        let scaled = value * 10f64.powi(decimals);
        (scaled - scaled.round()).abs() < 1e-6
    }

    #[test]
    fn test_vix_values_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..2_000 {
            let value = value_for("VIX Fear Index", &mut rng);
            assert!((15.0..=35.0).contains(&value), "VIX value {} out of range", value);
            assert!(decimals_of(value, 2));
        }
    }

    #[test]
    fn test_baltic_values_are_whole_numbers() {
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..2_000 {
            let value = value_for("Baltic Dry Index", &mut rng);
            assert!((800.0..=2500.0).contains(&value), "Baltic value {} out of range", value);
            assert_eq!(value, value.trunc(), "Baltic value {} is not whole", value);
        }
    }

    #[test]
    fn test_each_bucket_matches_its_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let cases = [
            ("Manufacturing PMI", 45.0, 65.0, 1),
            ("Unemployment Rate", 3.5, 8.0, 1),
            ("Inflation Rate", 1.5, 6.0, 1),
            ("Consumer Confidence", 85.0, 125.0, 1),
            ("Google Search Trends", 50.0, 150.0, 2),
            ("Insider Trading Patterns", 50.0, 150.0, 2),
        ];

        for (name, min, max, decimals) in cases {
            for _ in 0..500 {
                let value = value_for(name, &mut rng);
                assert!(value >= min && value <= max, "{} -> {}", name, value);
                assert!(decimals_of(value, decimals), "{} -> {} has too many decimals", name, value);
            }
        }
    }

    #[test]
    fn test_first_matching_substring_wins() {
        // Contains both "VIX" and "Confidence": the VIX row comes first
        let range = range_for("VIX Confidence Blend");
        assert_eq!(range, ValueRange::new(15.0, 35.0, 2));
        assert_eq!(range_for("Unknown Signal"), DEFAULT_RANGE);
    }

    #[test]
    fn test_trend_hits_every_label() {
        let mut rng = StdRng::seed_from_u64(3);
        let seen: Vec<Trend> = (0..300).map(|_| trend(&mut rng)).collect();

        for label in Trend::ALL {
            assert!(seen.contains(&label), "trend {} never drawn", label);
        }
    }
}
