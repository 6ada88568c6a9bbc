use serde::{Deserialize, Serialize};

/// Decoded audio, downmixed to mono.
#[derive(Clone, Debug)]
pub struct AudioData {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    /// Channel count of the source before downmixing.
    pub channels: u32,
    pub duration_secs: f64,
}

impl AudioData {
    pub fn from_mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        let duration_secs = if sample_rate > 0 {
            samples.len() as f64 / sample_rate as f64
        } else {
            0.0
        };
        Self {
            samples,
            sample_rate,
            channels: 1,
            duration_secs,
        }
    }
}

/// Scalar delivery metrics derived from the energy envelope.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FluencyMetrics {
    pub duration_sec: f64,
    pub speech_activity_ratio: f64,
    pub speech_rate: f64,
    pub rhythm_consistency: f64,
    /// Normalized (coefficient of variation over speech frames).
    pub energy_variation: f64,
    pub pause_count: usize,
    /// Pauses per minute.
    pub pause_frequency: f64,
    pub estimated_wpm: u32,
    pub speech_bursts: usize,
}

impl FluencyMetrics {
    /// Metrics for input with no measurable signal.
    pub fn zeroed(duration_sec: f64) -> Self {
        Self {
            duration_sec,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct FluencyAnalysis {
    pub score: u32,
    pub analysis: Vec<String>,
    pub metrics: FluencyMetrics,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditOp {
    Equal(String),
    Substitute { reference: String, hypothesis: String },
    Insert(String),
    Delete(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct AlignmentResult {
    pub ops: Vec<EditOp>,
    /// Total weighted path cost.
    pub cost: f64,
    pub wer: f64,
}

impl AlignmentResult {
    pub fn substitutions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.ops.iter().filter_map(|op| match op {
            EditOp::Substitute {
                reference,
                hypothesis,
            } => Some((reference.as_str(), hypothesis.as_str())),
            _ => None,
        })
    }

    pub fn insertions(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            EditOp::Insert(word) => Some(word.as_str()),
            _ => None,
        })
    }

    pub fn deletions(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            EditOp::Delete(word) => Some(word.as_str()),
            _ => None,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Substitution {
    pub from: String,
    pub to: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EditErrors {
    pub substitutions: Vec<Substitution>,
    pub insertions: Vec<String>,
    pub deletions: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SimilarityAnalysis {
    pub score: f64,
    pub errors: EditErrors,
    pub summary: Vec<String>,
}

/// One finding reported by the external grammar checker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarFinding {
    pub rule_id: String,
    pub message: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct GrammarAnalysis {
    pub score: i32,
    pub analysis: Vec<String>,
    pub errors: Vec<String>,
    pub error_count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProfessionalismMetrics {
    pub informal_words: usize,
    pub confident_phrases: usize,
    pub vocabulary_richness: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct ProfessionalismAnalysis {
    pub score: i32,
    pub analysis: Vec<String>,
    pub metrics: ProfessionalismMetrics,
}
