//! Client for the external signing service ("firmador").

use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Signing failure. `EmptyBody` and `Transport` are distinct because a
/// response without a signed payload maps to its own terminal diagnostic.
#[derive(Debug, Error)]
pub enum SignError {
    /// The request never produced a usable HTTP response.
    #[error("firmador transport error: {0}")]
    Transport(String),
    /// The service answered but the response carried no signed payload.
    #[error("firmador response carried no signed body")]
    EmptyBody,
    /// The cancellation token fired before the response arrived.
    #[error("signing request was cancelled")]
    Cancelled,
}

/// POST the signing envelope and return the opaque signed-payload string from
/// the `{"body": ...}` response. The token is polled with priority, so a
/// token that is already cancelled returns without touching the network.
pub async fn sign_document<T: Serialize>(
    client: &reqwest::Client,
    url: &str,
    envelope: &T,
    cancel: &CancellationToken,
) -> Result<String, SignError> {
    let request = async {
        let response = client
            .post(url)
            .json(envelope)
            .send()
            .await
            .map_err(|e| SignError::Transport(e.to_string()))?;
        let status = response.status();
        tracing::debug!(%status, url, "firmador responded");
        let text = response
            .text()
            .await
            .map_err(|e| SignError::Transport(e.to_string()))?;
        extract_body(&text)
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(SignError::Cancelled),
        result = request => result,
    }
}

fn extract_body(text: &str) -> Result<String, SignError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| SignError::Transport(e.to_string()))?;
    match value.get("body").and_then(|b| b.as_str()) {
        Some(body) if !body.is_empty() => Ok(body.to_string()),
        _ => Err(SignError::EmptyBody),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_is_extracted() {
        let signed = extract_body(r#"{"body":"eyJhbGciOiJSUzUxMiJ9.abc.def"}"#).unwrap();
        assert_eq!(signed, "eyJhbGciOiJSUzUxMiJ9.abc.def");
    }

    #[test]
    fn missing_or_empty_body_is_distinguished_from_garbage() {
        assert!(matches!(
            extract_body(r#"{"status":"ERROR"}"#),
            Err(SignError::EmptyBody)
        ));
        assert!(matches!(extract_body(r#"{"body":""}"#), Err(SignError::EmptyBody)));
        assert!(matches!(
            extract_body("<html>502</html>"),
            Err(SignError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let client = reqwest::Client::new();
        let result = sign_document(
            &client,
            "http://127.0.0.1:1/firmardocumento/",
            &serde_json::json!({"nit": "0"}),
            &cancel,
        )
        .await;
        assert!(matches!(result, Err(SignError::Cancelled)));
    }
}
