use crate::dsp::energy::{compute_energy, EnergyEnvelope, FrameEnergy};
use crate::dsp::segment::{segment, Segmentation};
use crate::dsp::stats::{mean, std_dev};
use crate::types::{AudioData, FluencyMetrics};

/// Words per minute assumed for a speech rate of 1.0.
pub const WPM_AT_FULL_RATE: f64 = 150.0;
/// Scale applied to energy variation when adjusting the WPM estimate.
pub const WPM_ENERGY_WEIGHT: f64 = 0.5;
/// Rhythm consistency reported when fewer than two bursts exist.
pub const NEUTRAL_RHYTHM: f64 = 0.5;
/// Coefficient of variation assumed when the mean burst length is ~0.
pub const WORST_CASE_CV: f64 = 1.0;

const MIN_MEAN_BURST_SECS: f64 = 1e-6;
const MIN_MEAN_ENERGY: f64 = 1e-8;

/// Extract delivery metrics from a mono waveform.
pub fn extract_fluency(samples: &[f32], sample_rate: u32) -> FluencyMetrics {
    let duration = if sample_rate > 0 {
        samples.len() as f64 / sample_rate as f64
    } else {
        0.0
    };

    match compute_energy(samples, sample_rate) {
        FrameEnergy::Envelope(envelope) => {
            let segmentation = segment(&envelope);
            aggregate_features(&envelope, &segmentation, duration)
        }
        FrameEnergy::Degenerate => {
            log::warn!(
                "no measurable signal in {:.2}s of audio, reporting zeroed metrics",
                duration
            );
            FluencyMetrics::zeroed(duration)
        }
    }
}

pub fn extract_fluency_from_audio(audio: &AudioData) -> FluencyMetrics {
    extract_fluency(&audio.samples, audio.sample_rate)
}

/// Reduce an envelope and its segmentation to scalar metrics.
pub fn aggregate_features(
    envelope: &EnergyEnvelope,
    segmentation: &Segmentation,
    duration: f64,
) -> FluencyMetrics {
    let frames = envelope.len();
    let speech_activity_ratio = if frames > 0 {
        segmentation.speech_frames() as f64 / frames as f64
    } else {
        0.0
    };

    let speech_rate = if duration > 0.0 {
        segmentation.total_burst_secs() / duration
    } else {
        0.0
    };

    let rhythm_consistency = rhythm_consistency(&segmentation.bursts);
    let energy_variation = energy_variation(&envelope.values, &segmentation.speech_mask);

    let pause_count = segmentation.pause_count();
    let pause_frequency = if duration > 0.0 {
        pause_count as f64 / (duration / 60.0)
    } else {
        0.0
    };

    FluencyMetrics {
        duration_sec: duration,
        speech_activity_ratio,
        speech_rate,
        rhythm_consistency,
        energy_variation,
        pause_count,
        pause_frequency,
        estimated_wpm: estimated_wpm(speech_rate, energy_variation),
        speech_bursts: segmentation.bursts.len(),
    }
}

/// `1 / (1 + CV)` of burst durations.
pub fn rhythm_consistency(bursts: &[f64]) -> f64 {
    if bursts.len() < 2 {
        return NEUTRAL_RHYTHM;
    }
    let m = mean(bursts);
    let cv = if m > MIN_MEAN_BURST_SECS {
        std_dev(bursts) / m
    } else {
        WORST_CASE_CV
    };
    1.0 / (1.0 + cv)
}

/// Coefficient of variation of energy over speech frames.
pub fn energy_variation(energy: &[f64], speech_mask: &[bool]) -> f64 {
    let speech: Vec<f64> = energy
        .iter()
        .zip(speech_mask)
        .filter(|(_, &s)| s)
        .map(|(&e, _)| e)
        .collect();
    if speech.is_empty() {
        return 0.0;
    }
    let m = mean(&speech);
    if m > MIN_MEAN_ENERGY {
        std_dev(&speech) / m
    } else {
        0.0
    }
}

pub fn estimated_wpm(speech_rate: f64, energy_variation: f64) -> u32 {
    let wpm = speech_rate.max(0.0)
        * WPM_AT_FULL_RATE
        * (1.0 + energy_variation.max(0.0) * WPM_ENERGY_WEIGHT);
    wpm.round() as u32
}
