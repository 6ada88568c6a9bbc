pub mod assess;
pub mod audio;
pub mod dsp;
pub mod error;
pub mod scoring;
pub mod text;
pub mod types;

pub use assess::{assess_listening, assess_speaking, assess_text};
pub use audio::decode::load_audio;
pub use dsp::features::{extract_fluency, extract_fluency_from_audio};
pub use error::AssessError;
pub use scoring::aggregate::aggregate;
pub use scoring::fluency::score_fluency;
pub use scoring::grammar::score_grammar;
pub use scoring::professionalism::score_professionalism;
pub use scoring::similarity::score_similarity;
pub use text::align::align;
pub use types::{
    AlignmentResult, AudioData, EditOp, FluencyAnalysis, FluencyMetrics, GrammarAnalysis,
    GrammarFinding, ProfessionalismAnalysis, SimilarityAnalysis,
};
