pub mod error;
pub mod grammar;
pub mod transcription;

pub use error::ClientError;
pub use grammar::GrammarClient;
pub use transcription::{transcribe_with_fallback, Transcriber, TranscriptionClient};
