//! Transmission of signed documents to the MH reception services.

use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::core::{Ambiente, DteType, RespuestaMh};

use super::endpoints::{MH_CHECK, invalidation_url, reception_url};
use super::outcome::{AuthorityOutcome, classify};

/// Reception payload wrapping one signed sale document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadMh {
    pub ambiente: Ambiente,
    pub id_envio: u32,
    pub version: u8,
    pub tipo_dte: DteType,
    /// Signed JWS string returned by the firmador.
    pub documento: String,
}

impl PayloadMh {
    pub fn new(ambiente: Ambiente, tipo: DteType, documento: String) -> Self {
        Self {
            ambiente,
            id_envio: 1,
            version: tipo.schema_version(),
            tipo_dte: tipo,
            documento,
        }
    }
}

/// Payload for the annulment service. Fixed version 2 regardless of the
/// annulled document's kind.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidationPayload {
    pub version: u8,
    pub id_envio: u32,
    pub ambiente: Ambiente,
    pub documento: String,
}

impl InvalidationPayload {
    pub fn new(ambiente: Ambiente, documento: String) -> Self {
        Self {
            version: 2,
            id_envio: 1,
            ambiente,
            documento,
        }
    }
}

/// Status query for an already transmitted document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckPayload {
    pub nit_emisor: String,
    pub tdte: DteType,
    pub codigo_generacion: String,
}

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("status-check transport error: {0}")]
    Transport(String),
    #[error("status-check response could not be parsed: {0}")]
    Parse(String),
}

/// Submit a signed sale document to the reception endpoint selected by the
/// payload's ambiente. Always returns a definite [`AuthorityOutcome`].
pub async fn send_to_mh(
    client: &reqwest::Client,
    payload: &PayloadMh,
    token: &str,
    cancel: &CancellationToken,
) -> AuthorityOutcome {
    post_classified(client, reception_url(payload.ambiente), payload, token, cancel).await
}

/// Submit a signed invalidation document to the annulment endpoint pair.
pub async fn send_invalidation_to_mh(
    client: &reqwest::Client,
    payload: &InvalidationPayload,
    token: &str,
    cancel: &CancellationToken,
) -> AuthorityOutcome {
    post_classified(client, invalidation_url(payload.ambiente), payload, token, cancel).await
}

/// Query the current status of a transmitted document. Read-only; no
/// substitute degradation applies here.
pub async fn check_dte(
    client: &reqwest::Client,
    payload: &CheckPayload,
    token: &str,
) -> Result<RespuestaMh, CheckError> {
    let response = client
        .post(MH_CHECK)
        .header(AUTHORIZATION, token)
        .json(payload)
        .send()
        .await
        .map_err(|e| CheckError::Transport(e.to_string()))?;
    let text = response
        .text()
        .await
        .map_err(|e| CheckError::Transport(e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| CheckError::Parse(e.to_string()))
}

/// POST with the auth header and map the result: any HTTP response with a
/// parseable body is classified verbatim (MH returns rejection bodies on
/// error statuses too), everything else degrades to a transport or timeout
/// outcome.
async fn post_classified<T: Serialize>(
    client: &reqwest::Client,
    url: &str,
    body: &T,
    token: &str,
    cancel: &CancellationToken,
) -> AuthorityOutcome {
    let request = async {
        let response = match client
            .post(url)
            .header(AUTHORIZATION, token)
            .json(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return AuthorityOutcome::TransportFailed(e.to_string()),
        };
        let status = response.status();
        tracing::debug!(%status, url, "reception service responded");
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return AuthorityOutcome::TransportFailed(e.to_string()),
        };
        match serde_json::from_str::<RespuestaMh>(&text) {
            Ok(respuesta) => classify(respuesta),
            Err(e) => AuthorityOutcome::TransportFailed(format!("HTTP {status}: {e}")),
        }
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => AuthorityOutcome::TimedOut,
        outcome = request => outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reception_payload_shape() {
        let payload = PayloadMh::new(Ambiente::Test, DteType::CreditoFiscal, "JWS".into());
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(
            json,
            r#"{"ambiente":"00","idEnvio":1,"version":3,"tipoDte":"03","documento":"JWS"}"#
        );
    }

    #[test]
    fn invalidation_payload_is_always_version_two() {
        let payload = InvalidationPayload::new(Ambiente::Production, "JWS".into());
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(
            json,
            r#"{"version":2,"idEnvio":1,"ambiente":"01","documento":"JWS"}"#
        );
    }

    #[test]
    fn check_payload_field_names() {
        let payload = CheckPayload {
            nit_emisor: "06140101231035".into(),
            tdte: DteType::Factura,
            codigo_generacion: "A1B2".into(),
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains(r#""nitEmisor":"06140101231035""#));
        assert!(json.contains(r#""tdte":"01""#));
        assert!(json.contains(r#""codigoGeneracion":"A1B2""#));
    }

    #[tokio::test]
    async fn cancelled_token_times_out_without_network() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let client = reqwest::Client::new();
        let payload = PayloadMh::new(Ambiente::Test, DteType::Factura, "JWS".into());
        let outcome = send_to_mh(&client, &payload, "token", &cancel).await;
        assert!(matches!(outcome, AuthorityOutcome::TimedOut));
    }
}
