//! Report assembly for the three assessment modes.
//!
//! Each entry point takes already-computed collaborator output (fluency
//! metrics, transcript, grammar findings) so the whole pipeline stays
//! synchronous and testable without audio or network access.

use serde::Serialize;

use crate::scoring::aggregate::aggregate;
use crate::scoring::fluency::score_fluency;
use crate::scoring::grammar::score_grammar;
use crate::scoring::professionalism::score_professionalism;
use crate::scoring::similarity::score_similarity;
use crate::text::align::align;
use crate::types::{
    FluencyAnalysis, FluencyMetrics, GrammarAnalysis, GrammarFinding, ProfessionalismAnalysis,
    SimilarityAnalysis,
};

#[derive(Clone, Debug, Serialize)]
pub struct FluencySection {
    pub score: u32,
    pub analysis: Vec<String>,
}

impl From<FluencyAnalysis> for FluencySection {
    fn from(f: FluencyAnalysis) -> Self {
        Self {
            score: f.score,
            analysis: f.analysis,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ProfessionalismSection {
    pub score: i32,
    pub analysis: Vec<String>,
}

impl From<ProfessionalismAnalysis> for ProfessionalismSection {
    fn from(p: ProfessionalismAnalysis) -> Self {
        Self {
            score: p.score,
            analysis: p.analysis,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SpeakingSections {
    pub fluency_analysis: FluencySection,
    pub grammar_analysis: GrammarAnalysis,
    pub professionalism_analysis: ProfessionalismSection,
}

#[derive(Clone, Debug, Serialize)]
pub struct SpeakingReport {
    pub overall_score: f64,
    pub report: SpeakingSections,
}

#[derive(Clone, Debug, Serialize)]
pub struct ListeningSections {
    pub fluency_analysis: FluencySection,
    pub grammar_analysis: GrammarAnalysis,
    pub similarity_analysis: SimilarityAnalysis,
}

#[derive(Clone, Debug, Serialize)]
pub struct ListeningReport {
    pub overall_score: f64,
    pub report: ListeningSections,
}

#[derive(Clone, Debug, Serialize)]
pub struct TextSections {
    pub grammar_analysis: GrammarAnalysis,
    pub professionalism_analysis: ProfessionalismSection,
}

#[derive(Clone, Debug, Serialize)]
pub struct TextReport {
    pub score: f64,
    pub report: TextSections,
}

/// Free-form speaking: fluency, grammar and professionalism.
pub fn assess_speaking(
    metrics: &FluencyMetrics,
    transcript: &str,
    findings: &[GrammarFinding],
) -> SpeakingReport {
    let fluency = score_fluency(metrics);
    let grammar = score_grammar(transcript, findings);
    let professionalism = score_professionalism(transcript);

    let overall_score = aggregate(
        fluency.score as f64,
        grammar.score as f64,
        Some(professionalism.score as f64),
        None,
    );
    log::info!(
        "speaking: overall {} (fluency {}, grammar {}, professionalism {})",
        overall_score,
        fluency.score,
        grammar.score,
        professionalism.score
    );

    SpeakingReport {
        overall_score,
        report: SpeakingSections {
            fluency_analysis: fluency.into(),
            grammar_analysis: grammar,
            professionalism_analysis: professionalism.into(),
        },
    }
}

/// Read-aloud: the transcript is aligned against the reference text and
/// similarity dominates the overall score.
pub fn assess_listening(
    metrics: &FluencyMetrics,
    reference_text: &str,
    transcript: &str,
    findings: &[GrammarFinding],
) -> ListeningReport {
    let fluency = score_fluency(metrics);
    let grammar = score_grammar(transcript, findings);
    let similarity = score_similarity(&align(reference_text, transcript));

    let overall_score = aggregate(
        fluency.score as f64,
        grammar.score as f64,
        None,
        Some(similarity.score),
    );
    log::info!(
        "listening: overall {} (similarity {}, fluency {}, grammar {})",
        overall_score,
        similarity.score,
        fluency.score,
        grammar.score
    );

    ListeningReport {
        overall_score,
        report: ListeningSections {
            fluency_analysis: fluency.into(),
            grammar_analysis: grammar,
            similarity_analysis: similarity,
        },
    }
}

/// Text only. Fluency contributes 0 under the audio-only weights.
pub fn assess_text(text: &str, findings: &[GrammarFinding]) -> TextReport {
    let grammar = score_grammar(text, findings);
    let professionalism = score_professionalism(text);
    let score = aggregate(
        0.0,
        grammar.score as f64,
        Some(professionalism.score as f64),
        None,
    );

    TextReport {
        score,
        report: TextSections {
            grammar_analysis: grammar,
            professionalism_analysis: professionalism.into(),
        },
    }
}
