use std::time::Duration;

use serde::Deserialize;
use speechscore::GrammarFinding;

use crate::error::{read_success, ClientError};

pub const CHECK_PATH: &str = "/v2/check";
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for a LanguageTool-compatible `/v2/check` endpoint.
#[derive(Clone, Debug)]
pub struct GrammarClient {
    http: reqwest::Client,
    base_url: String,
    language: String,
}

impl GrammarClient {
    pub fn new(base_url: impl Into<String>, language: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            language: language.into(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), CHECK_PATH)
    }

    pub async fn check(&self, text: &str) -> Result<Vec<GrammarFinding>, ClientError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let resp = self
            .http
            .post(self.endpoint())
            .form(&[("text", text), ("language", self.language.as_str())])
            .send()
            .await?;
        let body = read_success("grammar", resp).await?;
        let findings = parse_matches(&body)?;
        log::debug!("grammar: {} findings", findings.len());
        Ok(findings)
    }
}

#[derive(Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<Match>,
}

#[derive(Deserialize)]
struct Match {
    message: String,
    rule: Rule,
}

#[derive(Deserialize)]
struct Rule {
    id: String,
}

/// Convert a check response body into findings, in service order.
pub fn parse_matches(body: &str) -> Result<Vec<GrammarFinding>, ClientError> {
    let resp: CheckResponse =
        serde_json::from_str(body).map_err(|e| ClientError::parse("grammar", e))?;
    Ok(resp
        .matches
        .into_iter()
        .map(|m| GrammarFinding {
            rule_id: m.rule.id,
            message: m.message,
        })
        .collect())
}
