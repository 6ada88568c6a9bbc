use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Score spoken delivery from audio recordings and transcripts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Write the JSON report here instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub services: ServiceArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Free-form speaking: fluency, grammar and professionalism
    Speaking(AudioArgs),

    /// Read-aloud against a reference text
    Listening(ListeningArgs),

    /// Grammar and professionalism of a text, no audio
    AnalyzeText(TextArgs),
}

#[derive(Args, Debug)]
pub struct AudioArgs {
    /// Audio file (wav, flac, ogg, mp3, m4a, aac)
    pub audio: PathBuf,

    /// Use this transcript instead of calling the transcription service
    #[arg(long)]
    pub transcript: Option<String>,
}

#[derive(Args, Debug)]
pub struct ListeningArgs {
    #[command(flatten)]
    pub audio: AudioArgs,

    /// Reference text the speaker was asked to read
    #[arg(long)]
    pub text: String,
}

#[derive(Args, Debug)]
pub struct TextArgs {
    /// Text to analyze
    #[arg(long)]
    pub text: String,
}

/// Service endpoint overrides; each falls back to its environment variable.
#[derive(Args, Debug, Default)]
pub struct ServiceArgs {
    /// Transcription service base URL [env: SPEECHSCORE_ASR_URL]
    #[arg(long, global = true)]
    pub asr_url: Option<String>,

    /// Transcription service tried once when the primary fails [env: SPEECHSCORE_ASR_FALLBACK_URL]
    #[arg(long, global = true)]
    pub asr_fallback_url: Option<String>,

    /// Transcription model name [env: SPEECHSCORE_ASR_MODEL]
    #[arg(long, global = true)]
    pub asr_model: Option<String>,

    /// Grammar service base URL [env: SPEECHSCORE_GRAMMAR_URL]
    #[arg(long, global = true)]
    pub grammar_url: Option<String>,

    /// Grammar-check language code [env: SPEECHSCORE_LANGUAGE]
    #[arg(long, global = true)]
    pub language: Option<String>,
}
