use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{service} service returned {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },
    #[error("unexpected {service} response: {source}")]
    Parse {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    pub(crate) fn parse(service: &'static str, source: serde_json::Error) -> Self {
        Self::Parse { service, source }
    }

    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }
}

/// Read the body of a response, turning non-2xx statuses into errors.
pub(crate) async fn read_success(
    service: &'static str,
    resp: reqwest::Response,
) -> Result<String, ClientError> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(ClientError::Status {
            service,
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}
