use std::future::Future;
use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::error::{read_success, ClientError};

pub const TRANSCRIPTIONS_PATH: &str = "/v1/audio/transcriptions";
pub const DEFAULT_MODEL: &str = "whisper-1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Something that turns an audio file into text.
pub trait Transcriber {
    fn transcribe<'a>(
        &'a self,
        path: &'a Path,
    ) -> impl Future<Output = Result<String, ClientError>> + Send + 'a;

    /// Label used in log messages.
    fn label(&self) -> &str;
}

/// Client for a Whisper-compatible `/v1/audio/transcriptions` endpoint.
#[derive(Clone, Debug)]
pub struct TranscriptionClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl TranscriptionClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, model, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            TRANSCRIPTIONS_PATH
        )
    }
}

impl Transcriber for TranscriptionClient {
    fn transcribe<'a>(
        &'a self,
        path: &'a Path,
    ) -> impl Future<Output = Result<String, ClientError>> + Send + 'a {
        async move {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| ClientError::io("reading audio for upload", e))?;
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("audio")
                .to_string();

            let form = Form::new()
                .part("file", Part::bytes(bytes).file_name(file_name))
                .text("model", self.model.clone());

            log::debug!("POST {} ({})", self.endpoint(), path.display());
            let resp = self.http.post(self.endpoint()).multipart(form).send().await?;
            let body = read_success("transcription", resp).await?;
            parse_transcription(&body)
        }
    }

    fn label(&self) -> &str {
        &self.base_url
    }
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Extract the transcript text from a JSON response body.
pub fn parse_transcription(body: &str) -> Result<String, ClientError> {
    let resp: TranscriptionResponse =
        serde_json::from_str(body).map_err(|e| ClientError::parse("transcription", e))?;
    Ok(resp.text.trim().to_string())
}

/// Transcribe with `primary`, retrying once on `fallback` (or on `primary`
/// again when no fallback is configured).
///
/// Never fails: when both attempts error the transcript is empty and the
/// downstream scorers run on empty text.
pub async fn transcribe_with_fallback<T: Transcriber>(
    primary: &T,
    fallback: Option<&T>,
    path: &Path,
) -> String {
    match primary.transcribe(path).await {
        Ok(text) => return text,
        Err(e) => log::warn!("transcription via {} failed: {}", primary.label(), e),
    }

    let retry = fallback.unwrap_or(primary);
    log::info!("retrying transcription via {}", retry.label());
    match retry.transcribe(path).await {
        Ok(text) => text,
        Err(e) => {
            log::warn!(
                "retry via {} failed: {}; using empty transcript",
                retry.label(),
                e
            );
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Canned {
        reply: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl Canned {
        fn new(reply: Option<&'static str>) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Transcriber for Canned {
        fn transcribe<'a>(
            &'a self,
            _path: &'a Path,
        ) -> impl Future<Output = Result<String, ClientError>> + Send + 'a {
            async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                match self.reply {
                    Some(text) => Ok(text.to_string()),
                    None => Err(ClientError::Status {
                        service: "transcription",
                        status: 503,
                        body: String::new(),
                    }),
                }
            }
        }

        fn label(&self) -> &str {
            "canned"
        }
    }

    /// Fails the first call, succeeds afterwards.
    struct Flaky {
        calls: AtomicUsize,
    }

    impl Transcriber for Flaky {
        fn transcribe<'a>(
            &'a self,
            _path: &'a Path,
        ) -> impl Future<Output = Result<String, ClientError>> + Send + 'a {
            async move {
                if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(ClientError::Status {
                        service: "transcription",
                        status: 500,
                        body: String::new(),
                    })
                } else {
                    Ok("second try".to_string())
                }
            }
        }

        fn label(&self) -> &str {
            "flaky"
        }
    }

    #[test]
    fn test_parse_transcription() {
        assert_eq!(
            parse_transcription(r#"{"text": "  hello there "}"#).unwrap(),
            "hello there"
        );
        assert!(parse_transcription(r#"{"error": "busy"}"#).is_err());
    }

    #[test]
    fn test_endpoint_joins_cleanly() {
        let c = TranscriptionClient::new("http://localhost:9000/", DEFAULT_MODEL).unwrap();
        assert_eq!(c.endpoint(), "http://localhost:9000/v1/audio/transcriptions");
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let primary = Canned::new(Some("first"));
        let fallback = Canned::new(Some("second"));
        let text = transcribe_with_fallback(&primary, Some(&fallback), Path::new("a.wav")).await;
        assert_eq!(text, "first");
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fallback_used_once() {
        let primary = Canned::new(None);
        let fallback = Canned::new(Some("second"));
        let text = transcribe_with_fallback(&primary, Some(&fallback), Path::new("a.wav")).await;
        assert_eq!(text, "second");
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_total_failure_gives_empty_transcript() {
        let primary = Canned::new(None);
        let fallback = Canned::new(None);
        assert_eq!(
            transcribe_with_fallback(&primary, Some(&fallback), Path::new("a.wav")).await,
            ""
        );
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);

        let alone = Canned::new(None);
        assert_eq!(
            transcribe_with_fallback(&alone, None, Path::new("a.wav")).await,
            ""
        );
        assert_eq!(alone.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_primary_retried_without_fallback() {
        let primary = Flaky {
            calls: AtomicUsize::new(0),
        };
        let text = transcribe_with_fallback(&primary, None, Path::new("a.wav")).await;
        assert_eq!(text, "second try");
        assert_eq!(primary.calls.load(Ordering::SeqCst), 2);
    }
}
