/// Analysis window length in seconds.
pub const FRAME_SECS: f64 = 0.025;
/// Step between consecutive window starts in seconds.
pub const HOP_SECS: f64 = 0.010;
/// Width of the centered moving average applied to the envelope.
pub const SMOOTHING_TAPS: usize = 5;

/// Short-time RMS energy, one value per hop.
#[derive(Clone, Debug)]
pub struct EnergyEnvelope {
    pub values: Vec<f64>,
    pub frame_length: usize,
    pub hop_length: usize,
    pub sample_rate: u32,
}

impl EnergyEnvelope {
    /// Seconds of signal represented by one frame step.
    pub fn frame_secs(&self) -> f64 {
        self.hop_length as f64 / self.sample_rate as f64
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Result of energy extraction. `Degenerate` covers digital silence, signals
/// shorter than one window and envelopes with no energy anywhere.
#[derive(Clone, Debug)]
pub enum FrameEnergy {
    Envelope(EnergyEnvelope),
    Degenerate,
}

/// Window and hop lengths in samples for the given sample rate.
pub fn frame_lengths(sample_rate: u32) -> (usize, usize) {
    let frame = ((FRAME_SECS * sample_rate as f64).round() as usize).max(1);
    let hop = ((HOP_SECS * sample_rate as f64).round() as usize).max(1);
    (frame, hop)
}

/// Scale samples so the peak absolute value is 1.0.
///
/// Returns `None` for digital silence (peak of exactly zero) or empty input.
pub fn normalize_peak(samples: &[f32]) -> Option<Vec<f32>> {
    let peak = samples.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
    if peak <= 0.0 || !peak.is_finite() {
        return None;
    }
    Some(samples.iter().map(|&s| s / peak).collect())
}

/// RMS of each full window, advancing by `hop_length`.
pub fn frame_rms(samples: &[f32], frame_length: usize, hop_length: usize) -> Vec<f64> {
    if frame_length == 0 || hop_length == 0 || samples.len() < frame_length {
        return Vec::new();
    }

    let mut energy = Vec::with_capacity((samples.len() - frame_length) / hop_length + 1);
    let mut pos = 0;
    while pos + frame_length <= samples.len() {
        let sum_sq: f64 = samples[pos..pos + frame_length]
            .iter()
            .map(|&s| (s as f64) * (s as f64))
            .sum();
        energy.push((sum_sq / frame_length as f64).sqrt());
        pos += hop_length;
    }
    energy
}

/// Centered moving average with "same" output length.
///
/// Edge frames sum only the taps that exist but still divide by the full
/// width, matching a zero-padded convolution with a uniform kernel.
pub fn smooth_moving_average(values: &[f64], taps: usize) -> Vec<f64> {
    if taps <= 1 || values.is_empty() {
        return values.to_vec();
    }
    let before = (taps - 1) / 2;
    let after = taps - 1 - before;

    (0..values.len())
        .map(|i| {
            let lo = i.saturating_sub(before);
            let hi = (i + after).min(values.len() - 1);
            values[lo..=hi].iter().sum::<f64>() / taps as f64
        })
        .collect()
}

/// Compute the smoothed energy envelope of a mono waveform.
pub fn compute_energy(samples: &[f32], sample_rate: u32) -> FrameEnergy {
    if sample_rate == 0 {
        return FrameEnergy::Degenerate;
    }

    let Some(normalized) = normalize_peak(samples) else {
        log::debug!("energy: digital silence ({} samples)", samples.len());
        return FrameEnergy::Degenerate;
    };

    let (frame_length, hop_length) = frame_lengths(sample_rate);
    let mut values = frame_rms(&normalized, frame_length, hop_length);
    if values.is_empty() || values.iter().all(|&e| e <= 0.0) {
        log::debug!(
            "energy: no usable frames ({} samples, window {})",
            normalized.len(),
            frame_length
        );
        return FrameEnergy::Degenerate;
    }

    if values.len() >= SMOOTHING_TAPS {
        values = smooth_moving_average(&values, SMOOTHING_TAPS);
    }

    log::debug!(
        "energy: {} frames (window {}, hop {}, sr {})",
        values.len(),
        frame_length,
        hop_length,
        sample_rate
    );

    FrameEnergy::Envelope(EnergyEnvelope {
        values,
        frame_length,
        hop_length,
        sample_rate,
    })
}
