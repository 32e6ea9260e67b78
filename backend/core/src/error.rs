use thiserror::Error;

/// Failures surfaced by an [`Uploader`](crate::Uploader) for one upload
/// attempt. Every variant is terminal for the event that produced it; the
/// relay never retries.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The request never produced an HTTP response.
    #[error("upload request failed: {0}")]
    Transport(String),

    /// The remote API answered with a non-2xx status.
    #[error("API error: status {status}, body: {body}")]
    Api { status: u16, body: String },

    /// The remote API answered 2xx but the body was not the expected JSON.
    #[error("malformed API response: {0}")]
    MalformedResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_carries_status_and_body() {
        let err = UploadError::Api {
            status: 413,
            body: "payload too large".into(),
        };
        let text = err.to_string();
        assert!(text.contains("413"));
        assert!(text.contains("payload too large"));
    }
}
