use crate::scoring::similarity::round1;

/// Audio-only weights.
pub const FLUENCY_WEIGHT: f64 = 0.50;
pub const GRAMMAR_WEIGHT: f64 = 0.30;
pub const PROFESSIONALISM_WEIGHT: f64 = 0.20;

/// Weights when a reference script was supplied.
pub const SCRIPTED_SIMILARITY_WEIGHT: f64 = 0.60;
pub const SCRIPTED_FLUENCY_WEIGHT: f64 = 0.20;
pub const SCRIPTED_GRAMMAR_WEIGHT: f64 = 0.20;

/// Overall score for audio-only assessment.
pub fn overall_audio_only(fluency: f64, grammar: f64, professionalism: f64) -> f64 {
    finish(
        fluency * FLUENCY_WEIGHT
            + grammar * GRAMMAR_WEIGHT
            + professionalism * PROFESSIONALISM_WEIGHT,
    )
}

/// Overall score when the transcript was compared against a reference text.
/// Professionalism does not contribute in this mode.
pub fn overall_with_reference(similarity: f64, fluency: f64, grammar: f64) -> f64 {
    finish(
        similarity * SCRIPTED_SIMILARITY_WEIGHT
            + fluency * SCRIPTED_FLUENCY_WEIGHT
            + grammar * SCRIPTED_GRAMMAR_WEIGHT,
    )
}

/// Combine component scores; the policy is chosen by whether a similarity
/// score is present.
pub fn aggregate(
    fluency: f64,
    grammar: f64,
    professionalism: Option<f64>,
    similarity: Option<f64>,
) -> f64 {
    match similarity {
        Some(similarity) => overall_with_reference(similarity, fluency, grammar),
        None => overall_audio_only(fluency, grammar, professionalism.unwrap_or(0.0)),
    }
}

fn finish(weighted: f64) -> f64 {
    round1(weighted.min(100.0))
}
