use crate::dsp::energy::EnergyEnvelope;
use crate::dsp::stats::{mean, percentile};

/// Percentile of the envelope used as the floor of the speech threshold.
pub const SPEECH_PERCENTILE: f64 = 30.0;
/// Fraction of the mean envelope used as the other speech threshold candidate.
pub const SPEECH_MEAN_FACTOR: f64 = 0.6;
/// Percentile of the envelope at or below which a frame is silence.
pub const SILENCE_PERCENTILE: f64 = 15.0;
/// Shortest speech burst that is counted, in seconds.
pub const MIN_BURST_SECS: f64 = 0.1;
/// Shortest pause that is counted, in seconds.
pub const MIN_PAUSE_SECS: f64 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Active { start: usize },
}

/// Two-state scanner that turns a per-frame flag into closed runs.
///
/// Frames must be fed in temporal order, each exactly once. A run opens on a
/// rising edge and closes on the following falling edge (or at `finish`);
/// runs shorter than `min_secs` are dropped.
#[derive(Clone, Debug)]
pub struct RunDetector {
    state: RunState,
    next_index: usize,
    frame_secs: f64,
    min_secs: f64,
    runs: Vec<f64>,
}

impl RunDetector {
    pub fn new(frame_secs: f64, min_secs: f64) -> Self {
        Self {
            state: RunState::Idle,
            next_index: 0,
            frame_secs,
            min_secs,
            runs: Vec::new(),
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Advance one frame.
    pub fn step(&mut self, active: bool) {
        let i = self.next_index;
        self.next_index += 1;
        match (self.state, active) {
            (RunState::Idle, true) => self.state = RunState::Active { start: i },
            (RunState::Active { start }, false) => {
                self.close(start, i);
                self.state = RunState::Idle;
            }
            _ => {}
        }
    }

    /// Close any open run at the end of the signal and return run durations
    /// in seconds, in temporal order.
    pub fn finish(mut self) -> Vec<f64> {
        if let RunState::Active { start } = self.state {
            let end = self.next_index;
            self.close(start, end);
        }
        self.runs
    }

    fn close(&mut self, start: usize, end: usize) {
        let duration = (end - start) as f64 * self.frame_secs;
        if duration >= self.min_secs {
            self.runs.push(duration);
        }
    }
}

/// Speech/silence classification of an energy envelope.
#[derive(Clone, Debug)]
pub struct Segmentation {
    pub speech_mask: Vec<bool>,
    pub speech_threshold: f64,
    pub silence_threshold: f64,
    /// Burst durations in seconds.
    pub bursts: Vec<f64>,
    /// Pause durations in seconds.
    pub pauses: Vec<f64>,
}

impl Segmentation {
    pub fn speech_frames(&self) -> usize {
        self.speech_mask.iter().filter(|&&s| s).count()
    }

    pub fn pause_count(&self) -> usize {
        self.pauses.len()
    }

    pub fn total_burst_secs(&self) -> f64 {
        self.bursts.iter().fold(0.0, |acc, d| acc + d)
    }
}

/// Adaptive speech threshold: the higher of the 30th percentile and 60% of
/// the mean energy.
pub fn speech_threshold(energy: &[f64]) -> f64 {
    percentile(energy, SPEECH_PERCENTILE).max(mean(energy) * SPEECH_MEAN_FACTOR)
}

pub fn silence_threshold(energy: &[f64]) -> f64 {
    percentile(energy, SILENCE_PERCENTILE)
}

/// Classify frames and extract bursts and pauses in one forward pass.
///
/// A frame is speech at or above the speech threshold and silence at or
/// below the silence threshold. The two are independent; frames between them belong
/// to neither a burst nor a pause.
pub fn segment(envelope: &EnergyEnvelope) -> Segmentation {
    let energy = &envelope.values;
    let speech_threshold = speech_threshold(energy);
    let silence_threshold = silence_threshold(energy);
    let frame_secs = envelope.frame_secs();

    let mut speech_mask = Vec::with_capacity(energy.len());
    let mut bursts = RunDetector::new(frame_secs, MIN_BURST_SECS);
    let mut pauses = RunDetector::new(frame_secs, MIN_PAUSE_SECS);

    for &e in energy {
        let is_speech = e >= speech_threshold;
        speech_mask.push(is_speech);
        bursts.step(is_speech);
        pauses.step(e <= silence_threshold);
    }

    let bursts = bursts.finish();
    let pauses = pauses.finish();

    log::debug!(
        "segment: speech>{:.4} silence<={:.4} bursts={} pauses={}",
        speech_threshold,
        silence_threshold,
        bursts.len(),
        pauses.len()
    );

    Segmentation {
        speech_mask,
        speech_threshold,
        silence_threshold,
        bursts,
        pauses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(detector: &mut RunDetector, flags: &[bool]) {
        for &f in flags {
            detector.step(f);
        }
    }

    #[test]
    fn test_run_detector_edges() {
        let mut d = RunDetector::new(0.01, 0.0);
        assert_eq!(d.state(), RunState::Idle);
        feed(&mut d, &[false, true, true]);
        assert_eq!(d.state(), RunState::Active { start: 1 });
        feed(&mut d, &[false, true, false]);
        assert_eq!(d.state(), RunState::Idle);
        let runs = d.finish();
        assert_eq!(runs.len(), 2);
        assert!((runs[0] - 0.02).abs() < 1e-12);
        assert!((runs[1] - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_run_detector_closes_open_run_at_end() {
        let mut d = RunDetector::new(0.01, 0.0);
        feed(&mut d, &[false, true, true, true]);
        assert_eq!(d.finish().len(), 1);
    }

    #[test]
    fn test_run_detector_minimum_duration() {
        let mut d = RunDetector::new(0.01, MIN_BURST_SECS);
        // 9 frames (90 ms) dropped, 10 frames (100 ms) kept
        let mut flags = vec![true; 9];
        flags.push(false);
        flags.extend(std::iter::repeat(true).take(10));
        feed(&mut d, &flags);
        let runs = d.finish();
        assert_eq!(runs.len(), 1);
        assert!((runs[0] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_thresholds() {
        // 10 frames: 3 quiet, 7 loud
        let energy = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        // P30 rank 2.7 -> 0.0 + 0.7 * 1.0; mean 0.7 * 0.6 = 0.42
        assert!((speech_threshold(&energy) - 0.7).abs() < 1e-12);
        assert_eq!(silence_threshold(&energy), 0.0);
    }

    #[test]
    fn test_segment_square_envelope() {
        let mut values = vec![0.0; 40];
        values.extend(vec![1.0; 30]);
        values.extend(vec![0.0; 40]);
        let env = EnergyEnvelope {
            values,
            frame_length: 400,
            hop_length: 160,
            sample_rate: 16_000,
        };
        let seg = segment(&env);
        assert_eq!(seg.speech_frames(), 30);
        assert_eq!(seg.bursts.len(), 1);
        assert!((seg.bursts[0] - 0.3).abs() < 1e-9);
        assert_eq!(seg.pause_count(), 2);
    }

    #[test]
    fn test_plateau_at_threshold_is_speech() {
        // short gaps: P30 lands on the flat speech level itself
        let mut values = Vec::new();
        for i in 0..3 {
            if i > 0 {
                values.extend(vec![0.0; 10]);
            }
            values.extend(vec![1.0; 30]);
        }
        let env = EnergyEnvelope {
            values,
            frame_length: 400,
            hop_length: 160,
            sample_rate: 16_000,
        };
        let seg = segment(&env);
        assert_eq!(seg.speech_threshold, 1.0);
        assert_eq!(seg.speech_frames(), 90);
        assert_eq!(seg.bursts.len(), 3);
    }

    #[test]
    fn test_no_bursts_total_is_positive_zero() {
        let seg = Segmentation {
            speech_mask: vec![false; 4],
            speech_threshold: 0.5,
            silence_threshold: 0.0,
            bursts: Vec::new(),
            pauses: Vec::new(),
        };
        let total = seg.total_burst_secs();
        assert_eq!(total, 0.0);
        assert!(total.is_sign_positive());
    }
}
