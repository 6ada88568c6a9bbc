use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use serde::Serialize;

use speechscore::{
    assess_listening, assess_speaking, assess_text, extract_fluency_from_audio, load_audio,
    GrammarFinding,
};
use speechscore_client::{transcribe_with_fallback, GrammarClient, TranscriptionClient};

mod cli;
mod config;

use cli::{AudioArgs, Cli, Command};
use config::ServiceConfig;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let mut config = ServiceConfig::from_env();
    config.apply(&cli.services);

    let json = match cli.command {
        Command::Speaking(args) => {
            let (metrics, transcript) = analyze_audio(&config, args).await?;
            let findings = check_grammar(&config, &transcript).await;
            to_json(&assess_speaking(&metrics, &transcript, &findings))?
        }
        Command::Listening(args) => {
            let reference = non_empty(&args.text, "--text")?.to_string();
            let (metrics, transcript) = analyze_audio(&config, args.audio).await?;
            let findings = check_grammar(&config, &transcript).await;
            to_json(&assess_listening(
                &metrics,
                &reference,
                &transcript,
                &findings,
            ))?
        }
        Command::AnalyzeText(args) => {
            let text = non_empty(&args.text, "--text")?;
            let findings = check_grammar(&config, text).await;
            to_json(&assess_text(text, &findings))?
        }
    };

    write_output(cli.output.as_deref(), &json)
}

async fn analyze_audio(
    config: &ServiceConfig,
    args: AudioArgs,
) -> Result<(speechscore::FluencyMetrics, String), String> {
    if !args.audio.is_file() {
        return Err(format!("audio file not found: {}", args.audio.display()));
    }
    let audio = load_audio(&args.audio).map_err(|e| e.to_string())?;

    let metrics = tokio::task::spawn_blocking(move || extract_fluency_from_audio(&audio))
        .await
        .map_err(|e| format!("feature extraction task failed: {e}"))?;

    let transcript = match args.transcript {
        Some(t) => t,
        None => transcribe(config, &args.audio).await?,
    };
    if transcript.is_empty() {
        log::warn!("transcript is empty; text scores reflect no speech content");
    }
    Ok((metrics, transcript))
}

async fn transcribe(config: &ServiceConfig, path: &Path) -> Result<String, String> {
    let primary = TranscriptionClient::new(&config.asr_url, &config.asr_model)
        .map_err(|e| format!("failed to build transcription client: {e}"))?;
    let fallback = match &config.asr_fallback_url {
        Some(url) => Some(
            TranscriptionClient::new(url, &config.asr_model)
                .map_err(|e| format!("failed to build fallback transcription client: {e}"))?,
        ),
        None => None,
    };
    Ok(transcribe_with_fallback(&primary, fallback.as_ref(), path).await)
}

async fn check_grammar(config: &ServiceConfig, text: &str) -> Vec<GrammarFinding> {
    let client = match GrammarClient::new(&config.grammar_url, &config.language) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("grammar client unavailable: {e}; continuing without findings");
            return Vec::new();
        }
    };
    match client.check(text).await {
        Ok(findings) => findings,
        Err(e) => {
            log::warn!("grammar check failed: {e}; continuing without findings");
            Vec::new()
        }
    }
}

fn non_empty<'a>(text: &'a str, flag: &str) -> Result<&'a str, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(format!("{flag} must not be empty"));
    }
    Ok(trimmed)
}

fn to_json<T: Serialize>(report: &T) -> Result<String, String> {
    serde_json::to_string_pretty(report).map_err(|e| format!("failed to serialize report: {e}"))
}

fn write_output(path: Option<&Path>, json: &str) -> Result<(), String> {
    match path {
        Some(p) => {
            std::fs::write(p, json).map_err(|e| format!("failed to write {}: {e}", p.display()))?;
            log::info!("report written to {}", p.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_non_empty_trims() {
        assert_eq!(non_empty("  hi ", "--text").unwrap(), "hi");
        assert_eq!(
            non_empty("   ", "--text").unwrap_err(),
            "--text must not be empty"
        );
    }

    #[test]
    fn test_cli_parses_listening() {
        let cli = Cli::try_parse_from([
            "speechscore",
            "listening",
            "take.wav",
            "--text",
            "good morning",
            "--transcript",
            "good morning",
            "-o",
            "out.json",
        ])
        .unwrap();
        assert_eq!(cli.output, Some(PathBuf::from("out.json")));
        match cli.command {
            Command::Listening(args) => {
                assert_eq!(args.text, "good morning");
                assert_eq!(args.audio.audio, PathBuf::from("take.wav"));
                assert_eq!(args.audio.transcript.as_deref(), Some("good morning"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_listening_requires_text() {
        assert!(Cli::try_parse_from(["speechscore", "listening", "take.wav"]).is_err());
    }

    #[tokio::test]
    async fn test_missing_audio_is_error() {
        let config = ServiceConfig::from_lookup(|_| None);
        let args = AudioArgs {
            audio: PathBuf::from("/nonexistent/take.wav"),
            transcript: Some(String::new()),
        };
        let err = analyze_audio(&config, args).await.unwrap_err();
        assert!(err.starts_with("audio file not found"));
    }
}
