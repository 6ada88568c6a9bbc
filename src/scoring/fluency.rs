//! Banded fluency scoring over [`FluencyMetrics`].
//!
//! Five independently thresholded bands add up to the base score, small
//! bonuses and penalties adjust it, then plausibility guards cap it so that a
//! single strong metric cannot carry a weak or very short sample. Bonuses are
//! applied before the guards.

use crate::types::{FluencyAnalysis, FluencyMetrics};

/// `(minimum, points, message)` bands, checked top to bottom.
pub const ACTIVITY_BANDS: [(f64, i32, &str); 4] = [
    (0.70, 25, "Excellent speech activity - good use of speaking time"),
    (0.55, 22, "Good speech activity - reasonable speaking time"),
    (0.40, 17, "Moderate speech activity - some silence"),
    (0.25, 12, "Low speech activity - too much silence"),
];
pub const ACTIVITY_FLOOR: (i32, &str) = (6, "Very low speech activity - mostly silence");

/// `(low, high, points, message)` bands; each range contains the previous one.
pub const RATE_BANDS: [(f64, f64, i32, &str); 4] = [
    (0.62, 0.95, 25, "Excellent speech rate - natural and engaging pace"),
    (0.50, 1.10, 22, "Good speech rate - clear and understandable"),
    (0.38, 1.30, 16, "Moderate speech rate - could be improved"),
    (0.25, 1.50, 10, "Below average speech rate - needs improvement"),
];
pub const RATE_FLOOR: (i32, &str) = (5, "Poor speech rate - significantly needs improvement");

pub const RHYTHM_BANDS: [(f64, i32, &str); 4] = [
    (0.70, 25, "Excellent rhythm consistency - smooth flow"),
    (0.55, 22, "Good rhythm consistency - generally smooth"),
    (0.40, 16, "Moderate rhythm - some irregularity"),
    (0.25, 10, "Irregular rhythm - needs improvement"),
];
pub const RHYTHM_FLOOR: (i32, &str) = (5, "Very irregular rhythm - significant improvement needed");

/// `(maximum pauses per minute, points, message)` bands; lower is better.
pub const PAUSE_BANDS: [(f64, i32, &str); 4] = [
    (3.0, 25, "Excellent pause control - minimal hesitation"),
    (6.0, 21, "Good pause control - reasonable pauses"),
    (9.0, 17, "Moderate pause control - some hesitation"),
    (14.0, 12, "Frequent pauses - indicates nervousness"),
];
pub const PAUSE_FLOOR: (i32, &str) = (6, "Excessive pauses - significant improvement needed");

/// Energy variation considered natural.
pub const NATURAL_ENERGY_RANGE: (f64, f64) = (0.3, 0.8);

pub const QUALITY_RATE_RANGE: (f64, f64) = (0.65, 0.90);
pub const QUALITY_MIN_DURATION_SECS: f64 = 20.0;
pub const MIN_RELIABLE_ACTIVITY: f64 = 0.20;
pub const MIN_RELIABLE_DURATION_SECS: f64 = 8.0;
pub const LOW_SIGNAL_CAP: i32 = 40;
pub const SHORT_SAMPLE_CAP: i32 = 70;

fn lower_bound_band(
    value: f64,
    bands: &[(f64, i32, &'static str)],
    floor: (i32, &'static str),
) -> (i32, &'static str) {
    bands
        .iter()
        .find(|(min, _, _)| value >= *min)
        .map(|&(_, points, msg)| (points, msg))
        .unwrap_or(floor)
}

fn speech_rate_band(rate: f64) -> (i32, &'static str) {
    RATE_BANDS
        .iter()
        .find(|(lo, hi, _, _)| rate >= *lo && rate <= *hi)
        .map(|&(_, _, points, msg)| (points, msg))
        .unwrap_or(RATE_FLOOR)
}

fn pause_band(pause_frequency: f64) -> (i32, &'static str) {
    PAUSE_BANDS
        .iter()
        .find(|(max, _, _)| pause_frequency <= *max)
        .map(|&(_, points, msg)| (points, msg))
        .unwrap_or(PAUSE_FLOOR)
}

/// Non-monotonic: peaks in the natural range and falls off on both sides.
fn energy_band(variation: f64) -> (i32, &'static str) {
    let (lo, hi) = NATURAL_ENERGY_RANGE;
    if (lo..=hi).contains(&variation) {
        (10, "Natural energy variation - engaging delivery")
    } else if (0.15..lo).contains(&variation) {
        (7, "Good energy variation - expressive speech")
    } else if variation > hi && variation <= 1.2 {
        (5, "High energy variation - very expressive")
    } else if variation > 1.2 {
        (3, "Very high energy variation - overly dramatic")
    } else {
        (2, "Low energy variation - somewhat monotone")
    }
}

/// Number of independent quality signals that hold.
pub fn quality_flags(m: &FluencyMetrics) -> usize {
    let (rate_lo, rate_hi) = QUALITY_RATE_RANGE;
    let (energy_lo, energy_hi) = NATURAL_ENERGY_RANGE;
    [
        m.speech_activity_ratio >= 0.70,
        m.speech_rate >= rate_lo && m.speech_rate <= rate_hi,
        m.rhythm_consistency >= 0.70,
        m.pause_frequency <= 3.0,
        m.energy_variation >= energy_lo && m.energy_variation <= energy_hi,
        m.duration_sec >= QUALITY_MIN_DURATION_SECS,
    ]
    .iter()
    .filter(|&&f| f)
    .count()
}

/// Score cap implied by how many quality flags hold.
pub fn quality_cap(flags: usize) -> Option<i32> {
    match flags {
        0 | 1 => Some(70),
        2 => Some(85),
        3 => Some(95),
        _ => None,
    }
}

pub fn score_fluency(metrics: &FluencyMetrics) -> FluencyAnalysis {
    let m = metrics;
    let mut score = 0i32;
    let mut analysis = Vec::new();

    let bands = [
        lower_bound_band(m.speech_activity_ratio, &ACTIVITY_BANDS, ACTIVITY_FLOOR),
        speech_rate_band(m.speech_rate),
        lower_bound_band(m.rhythm_consistency, &RHYTHM_BANDS, RHYTHM_FLOOR),
        pause_band(m.pause_frequency),
        energy_band(m.energy_variation),
    ];
    for (points, msg) in bands {
        score += points;
        analysis.push(msg.to_string());
    }

    // Duration bonus depends on the running score.
    if m.duration_sec >= 40.0 && m.speech_bursts >= 6 {
        if score >= 70 {
            score += 5;
            analysis.push("Sustained fluency over extended speech".to_string());
        } else if score >= 50 {
            score += 3;
            analysis.push("Good sustained performance".to_string());
        }
    } else if m.duration_sec >= 20.0 && m.speech_bursts >= 4 && score >= 60 {
        score += 2;
        analysis.push("Consistent performance".to_string());
    }

    if m.speech_bursts >= 8 {
        if m.rhythm_consistency >= 0.5 {
            score += 2;
            analysis.push("Good speech segmentation".to_string());
        }
    } else if m.speech_bursts <= 2 {
        score -= 3;
        analysis.push("Limited speech segments - may indicate hesitation".to_string());
    }

    let flags = quality_flags(m);
    if let Some(cap) = quality_cap(flags) {
        score = score.min(cap);
    }
    if m.speech_activity_ratio < MIN_RELIABLE_ACTIVITY || m.speech_bursts <= 1 {
        score = score.min(LOW_SIGNAL_CAP);
        analysis.push("Very limited speech activity detected".to_string());
    }
    if m.duration_sec < MIN_RELIABLE_DURATION_SECS {
        score = score.min(SHORT_SAMPLE_CAP);
        analysis.push("Short recording limits fluency assessment confidence".to_string());
    }

    let score = score.clamp(0, 100) as u32;
    log::debug!("fluency: score {} ({} quality flags)", score, flags);

    FluencyAnalysis {
        score,
        analysis,
        metrics: metrics.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strong_metrics() -> FluencyMetrics {
        FluencyMetrics {
            duration_sec: 60.0,
            speech_activity_ratio: 0.75,
            speech_rate: 0.8,
            rhythm_consistency: 0.75,
            energy_variation: 0.5,
            pause_count: 2,
            pause_frequency: 2.0,
            estimated_wpm: 150,
            speech_bursts: 10,
        }
    }

    #[test]
    fn test_zeroed_metrics_lowest_bands() {
        let a = score_fluency(&FluencyMetrics::zeroed(3.0));
        // 6 + 5 + 5 + 25 + 2 - 3 = 40, capped at 40
        assert_eq!(a.score, 40);
        assert_eq!(a.analysis[0], ACTIVITY_FLOOR.1);
        assert!(a
            .analysis
            .iter()
            .any(|l| l == "Short recording limits fluency assessment confidence"));
    }

    #[test]
    fn test_strong_sample_reaches_100() {
        let a = score_fluency(&strong_metrics());
        // 25 * 4 + 10 + 5 + 2, all six flags hold
        assert_eq!(quality_flags(&strong_metrics()), 6);
        assert_eq!(a.score, 100);
        assert_eq!(a.analysis.len(), 7);
    }

    #[test]
    fn test_three_flags_cap_at_95() {
        let m = FluencyMetrics {
            speech_rate: 1.0,
            pause_frequency: 5.0,
            energy_variation: 1.0,
            ..strong_metrics()
        };
        // activity, rhythm, duration hold
        assert_eq!(quality_flags(&m), 3);
        // 25 + 22 + 25 + 21 + 5 + 5 + 2 = 105 -> 95
        assert_eq!(score_fluency(&m).score, 95);
    }

    #[test]
    fn test_rate_band_edges() {
        assert_eq!(speech_rate_band(0.62).0, 25);
        assert_eq!(speech_rate_band(0.95).0, 25);
        assert_eq!(speech_rate_band(0.61).0, 22);
        assert_eq!(speech_rate_band(1.05).0, 22);
        assert_eq!(speech_rate_band(1.2).0, 16);
        assert_eq!(speech_rate_band(0.3).0, 10);
        assert_eq!(speech_rate_band(1.6).0, 5);
        assert_eq!(speech_rate_band(0.1).0, 5);
    }

    #[test]
    fn test_energy_band_non_monotonic() {
        assert_eq!(energy_band(0.5).0, 10);
        assert_eq!(energy_band(0.2).0, 7);
        assert_eq!(energy_band(1.0).0, 5);
        assert_eq!(energy_band(2.0).0, 3);
        assert_eq!(energy_band(0.05).0, 2);
    }

    #[test]
    fn test_pause_bands() {
        assert_eq!(pause_band(3.0).0, 25);
        assert_eq!(pause_band(6.0).0, 21);
        assert_eq!(pause_band(9.0).0, 17);
        assert_eq!(pause_band(14.0).0, 12);
        assert_eq!(pause_band(14.5).0, 6);
    }

    #[test]
    fn test_single_burst_capped_at_40() {
        let m = FluencyMetrics {
            speech_bursts: 1,
            ..strong_metrics()
        };
        let a = score_fluency(&m);
        assert_eq!(a.score, 40);
        assert!(a.analysis.iter().any(|l| l == "Very limited speech activity detected"));
    }

    #[test]
    fn test_short_duration_capped_at_70() {
        let m = FluencyMetrics {
            duration_sec: 6.0,
            ..strong_metrics()
        };
        assert_eq!(score_fluency(&m).score, 70);
    }

    #[test]
    fn test_score_always_in_range() {
        for activity in [0.0, 0.3, 0.6, 0.9] {
            for bursts in [0, 1, 3, 9] {
                let m = FluencyMetrics {
                    speech_activity_ratio: activity,
                    speech_bursts: bursts,
                    ..strong_metrics()
                };
                assert!(score_fluency(&m).score <= 100);
            }
        }
    }
}
