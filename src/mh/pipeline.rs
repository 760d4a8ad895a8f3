//! Emission pipeline: assemble, sign, transmit, classify. One dispatcher
//! method per document kind; every network stage is bounded by its own
//! timeout and every exit path yields a complete response record.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::core::{
    Ambiente, CartItem, Customer, DteError, DteType, FseItem, RespuestaMh, Transmitter,
};
use crate::dte::{
    Clock, CodeGenerator, DocumentoRelacionado, Emission, Factura, FacturaSujetoExcluido,
    FiscalDocumento, FiscalOptions, Invalidacion, InvalidationRequest, Nota, SalvadorClock,
    SignRequest, UuidGenerator, credito_fiscal, factura, invalidacion, nota_credito, nota_debito,
    sujeto_excluido,
};

use super::firmador::{SignError, sign_document};
use super::outcome::{
    AuthorityOutcome, MSG_MH_UNRESPONSIVE, MSG_SEND_FAILED, MSG_SIGNATURE_MISSING,
    MSG_SIGNING_FAILED, MSG_TIMEOUT, OBS_NO_MH_RESPONSE, OBS_NO_SERVER_RESPONSE,
    OBS_SIGNER_UNREACHABLE, OBS_TIMEOUT, substitute,
};
use super::transmision::{
    CheckError, CheckPayload, InvalidationPayload, PayloadMh, check_dte, send_invalidation_to_mh,
    send_to_mh,
};

/// Per-stage deadlines. Each invocation gets fresh timers; nothing is shared
/// across calls.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutPolicy {
    pub sign: Duration,
    pub transmit: Duration,
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self {
            sign: Duration::from_secs(20),
            transmit: Duration::from_secs(20),
        }
    }
}

/// The assembled document enriched with the authority's acceptance and the
/// signed payload, ready for archival.
#[derive(Debug, Clone, Serialize)]
pub struct DteFirmado<T> {
    #[serde(flatten)]
    pub dte: T,
    #[serde(rename = "respuestaMH")]
    pub respuesta_mh: RespuestaMh,
    pub firma: String,
}

/// Outcome of one pipeline run. `firmado` is populated only when the
/// authority answered `PROCESADO`.
#[derive(Debug, Clone)]
pub struct Dispatch<T> {
    pub respuesta: RespuestaMh,
    pub firmado: Option<DteFirmado<T>>,
}

/// Orchestrates the sign-and-transmit flow against one firmador and one MH
/// account.
pub struct Dispatcher {
    http: reqwest::Client,
    firmador_url: String,
    auth_token: String,
    timeouts: TimeoutPolicy,
    generator: Box<dyn CodeGenerator + Send + Sync>,
    clock: Box<dyn Clock + Send + Sync>,
}

impl Dispatcher {
    pub fn new(
        firmador_url: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            firmador_url: firmador_url.into(),
            auth_token: auth_token.into(),
            timeouts: TimeoutPolicy::default(),
            generator: Box::new(UuidGenerator),
            clock: Box::new(SalvadorClock),
        })
    }

    pub fn with_timeouts(mut self, timeouts: TimeoutPolicy) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Swap the identifier generator and clock, for deterministic assembly.
    pub fn with_collaborators(
        mut self,
        generator: Box<dyn CodeGenerator + Send + Sync>,
        clock: Box<dyn Clock + Send + Sync>,
    ) -> Self {
        self.generator = generator;
        self.clock = clock;
        self
    }

    pub async fn emit_factura(
        &self,
        emission: &Emission<'_>,
        customer: &Customer,
        items: &[CartItem],
        iva_rete1: Decimal,
    ) -> Result<Dispatch<Factura>, DteError> {
        let document = factura(
            emission,
            customer,
            items,
            iva_rete1,
            self.generator.as_ref(),
            self.clock.as_ref(),
        )?;
        let codigo = document.identificacion.codigo_generacion.clone();
        Ok(self
            .run_sale(
                emission.transmitter,
                emission.ambiente,
                DteType::Factura,
                codigo,
                document,
            )
            .await)
    }

    pub async fn emit_credito_fiscal(
        &self,
        emission: &Emission<'_>,
        customer: &Customer,
        items: &[CartItem],
        options: &FiscalOptions,
    ) -> Result<Dispatch<FiscalDocumento>, DteError> {
        let document = credito_fiscal(
            emission,
            customer,
            items,
            options,
            self.generator.as_ref(),
            self.clock.as_ref(),
        )?;
        let codigo = document.identificacion.codigo_generacion.clone();
        Ok(self
            .run_sale(
                emission.transmitter,
                emission.ambiente,
                DteType::CreditoFiscal,
                codigo,
                document,
            )
            .await)
    }

    pub async fn emit_nota_credito(
        &self,
        emission: &Emission<'_>,
        customer: &Customer,
        items: &[CartItem],
        related: Vec<DocumentoRelacionado>,
        options: &FiscalOptions,
    ) -> Result<Dispatch<Nota>, DteError> {
        let document = nota_credito(
            emission,
            customer,
            items,
            related,
            options,
            self.generator.as_ref(),
            self.clock.as_ref(),
        )?;
        let codigo = document.identificacion.codigo_generacion.clone();
        Ok(self
            .run_sale(
                emission.transmitter,
                emission.ambiente,
                DteType::NotaCredito,
                codigo,
                document,
            )
            .await)
    }

    pub async fn emit_nota_debito(
        &self,
        emission: &Emission<'_>,
        customer: &Customer,
        items: &[CartItem],
        related: Vec<DocumentoRelacionado>,
        options: &FiscalOptions,
    ) -> Result<Dispatch<Nota>, DteError> {
        let document = nota_debito(
            emission,
            customer,
            items,
            related,
            options,
            self.generator.as_ref(),
            self.clock.as_ref(),
        )?;
        let codigo = document.identificacion.codigo_generacion.clone();
        Ok(self
            .run_sale(
                emission.transmitter,
                emission.ambiente,
                DteType::NotaDebito,
                codigo,
                document,
            )
            .await)
    }

    pub async fn emit_sujeto_excluido(
        &self,
        emission: &Emission<'_>,
        supplier: &Customer,
        items: &[FseItem],
        observaciones: &str,
    ) -> Result<Dispatch<FacturaSujetoExcluido>, DteError> {
        let document = sujeto_excluido(
            emission,
            supplier,
            items,
            observaciones,
            self.generator.as_ref(),
            self.clock.as_ref(),
        )?;
        let codigo = document.identificacion.codigo_generacion.clone();
        Ok(self
            .run_sale(
                emission.transmitter,
                emission.ambiente,
                DteType::SujetoExcluido,
                codigo,
                document,
            )
            .await)
    }

    /// Sign and submit an annulment request. Same flow as a sale, against
    /// the invalidation endpoint pair and envelope.
    pub async fn invalidate(
        &self,
        request: &InvalidationRequest<'_>,
    ) -> Result<Dispatch<Invalidacion>, DteError> {
        let document = invalidacion(request, self.generator.as_ref(), self.clock.as_ref())?;
        let codigo = document.identificacion.codigo_generacion.clone();
        let envelope = SignRequest::invalidation(request.transmitter, &document);
        let firma = match self.sign_stage(&envelope).await {
            Ok(firma) => firma,
            Err(e) => {
                return Ok(Dispatch {
                    respuesta: self.sign_failure(request.ambiente, &codigo, &e),
                    firmado: None,
                });
            }
        };
        let payload = InvalidationPayload::new(request.ambiente, firma.clone());
        let cancel = CancellationToken::new();
        let timer = spawn_deadline(cancel.clone(), self.timeouts.transmit);
        let outcome = send_invalidation_to_mh(&self.http, &payload, &self.auth_token, &cancel).await;
        timer.abort();
        Ok(self.conclude(document, firma, request.ambiente, &codigo, outcome))
    }

    /// Query the status of an already transmitted document.
    pub async fn check(
        &self,
        nit_emisor: &str,
        tipo: DteType,
        codigo_generacion: &str,
    ) -> Result<RespuestaMh, CheckError> {
        let payload = CheckPayload {
            nit_emisor: nit_emisor.to_string(),
            tdte: tipo,
            codigo_generacion: codigo_generacion.to_string(),
        };
        check_dte(&self.http, &payload, &self.auth_token).await
    }

    async fn run_sale<T: Serialize>(
        &self,
        transmitter: &Transmitter,
        ambiente: Ambiente,
        tipo: DteType,
        codigo: String,
        document: T,
    ) -> Dispatch<T> {
        let envelope = SignRequest::new(transmitter, &document);
        let firma = match self.sign_stage(&envelope).await {
            Ok(firma) => firma,
            Err(e) => {
                return Dispatch {
                    respuesta: self.sign_failure(ambiente, &codigo, &e),
                    firmado: None,
                };
            }
        };
        let payload = PayloadMh::new(ambiente, tipo, firma.clone());
        let cancel = CancellationToken::new();
        let timer = spawn_deadline(cancel.clone(), self.timeouts.transmit);
        let outcome = send_to_mh(&self.http, &payload, &self.auth_token, &cancel).await;
        timer.abort();
        self.conclude(document, firma, ambiente, &codigo, outcome)
    }

    async fn sign_stage<E: Serialize>(&self, envelope: &E) -> Result<String, SignError> {
        let cancel = CancellationToken::new();
        let timer = spawn_deadline(cancel.clone(), self.timeouts.sign);
        let result = sign_document(&self.http, &self.firmador_url, envelope, &cancel).await;
        timer.abort();
        result
    }

    fn conclude<T>(
        &self,
        document: T,
        firma: String,
        ambiente: Ambiente,
        codigo: &str,
        outcome: AuthorityOutcome,
    ) -> Dispatch<T> {
        match outcome {
            AuthorityOutcome::Processed(respuesta) => {
                tracing::info!(codigo, sello = ?respuesta.sello_recibido, "document processed");
                Dispatch {
                    respuesta: respuesta.clone(),
                    firmado: Some(DteFirmado {
                        dte: document,
                        respuesta_mh: respuesta,
                        firma,
                    }),
                }
            }
            AuthorityOutcome::Rejected(respuesta) => {
                tracing::warn!(codigo, descripcion = %respuesta.descripcion_msg, "document rejected");
                Dispatch {
                    respuesta,
                    firmado: None,
                }
            }
            AuthorityOutcome::TimedOut => Dispatch {
                respuesta: self.substitute(ambiente, codigo, MSG_TIMEOUT, OBS_TIMEOUT),
                firmado: None,
            },
            AuthorityOutcome::TransportFailed(reason) => {
                tracing::warn!(codigo, %reason, "transmission failed");
                Dispatch {
                    respuesta: self.substitute(ambiente, codigo, MSG_MH_UNRESPONSIVE, OBS_NO_MH_RESPONSE),
                    firmado: None,
                }
            }
            AuthorityOutcome::UnrecognizedStatus(respuesta) => {
                tracing::warn!(codigo, estado = %respuesta.estado, "unrecognized authority status");
                Dispatch {
                    respuesta: self.substitute(ambiente, codigo, MSG_SEND_FAILED, OBS_NO_SERVER_RESPONSE),
                    firmado: None,
                }
            }
        }
    }

    fn sign_failure(&self, ambiente: Ambiente, codigo: &str, error: &SignError) -> RespuestaMh {
        tracing::warn!(codigo, %error, "signing failed");
        let (descripcion, observacion) = match error {
            SignError::Cancelled => (MSG_TIMEOUT, OBS_TIMEOUT),
            SignError::EmptyBody => (MSG_SIGNATURE_MISSING, OBS_NO_SERVER_RESPONSE),
            SignError::Transport(_) => (MSG_SIGNING_FAILED, OBS_SIGNER_UNREACHABLE),
        };
        self.substitute(ambiente, codigo, descripcion, observacion)
    }

    fn substitute(
        &self,
        ambiente: Ambiente,
        codigo: &str,
        descripcion: &str,
        observacion: &str,
    ) -> RespuestaMh {
        let now = self.clock.now();
        substitute(
            ambiente.code(),
            codigo,
            format!("{} {}", now.fec_emi, now.hor_emi),
            descripcion,
            observacion,
        )
    }
}

fn spawn_deadline(cancel: CancellationToken, after: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        cancel.cancel();
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeouts_are_twenty_seconds() {
        let policy = TimeoutPolicy::default();
        assert_eq!(policy.sign, Duration::from_secs(20));
        assert_eq!(policy.transmit, Duration::from_secs(20));
    }

    #[test]
    fn transport_failure_names_the_authority_as_unresponsive() {
        let dispatcher = Dispatcher::new("http://127.0.0.1:9/firmardocumento/", "token").unwrap();
        let dispatch = dispatcher.conclude(
            (),
            "JWS".into(),
            Ambiente::Test,
            "A1B2",
            AuthorityOutcome::TransportFailed("connection refused".into()),
        );
        assert!(dispatch.firmado.is_none());
        assert_eq!(dispatch.respuesta.descripcion_msg, MSG_MH_UNRESPONSIVE);
        assert_eq!(
            dispatch.respuesta.observaciones,
            vec![OBS_NO_MH_RESPONSE.to_string()]
        );
    }

    #[test]
    fn unrecognized_status_names_a_server_error() {
        let dispatcher = Dispatcher::new("http://127.0.0.1:9/firmardocumento/", "token").unwrap();
        let respuesta = RespuestaMh {
            version: 2,
            ambiente: "00".into(),
            version_app: 2,
            estado: "PENDIENTE".into(),
            codigo_generacion: "A1B2".into(),
            sello_recibido: None,
            fh_procesamiento: "2025-03-01 14:30:00".into(),
            clasifica_msg: None,
            codigo_msg: "001".into(),
            descripcion_msg: "EN COLA".into(),
            observaciones: vec![],
        };
        let dispatch = dispatcher.conclude(
            (),
            "JWS".into(),
            Ambiente::Test,
            "A1B2",
            AuthorityOutcome::UnrecognizedStatus(respuesta),
        );
        assert!(dispatch.firmado.is_none());
        assert_eq!(dispatch.respuesta.descripcion_msg, MSG_SEND_FAILED);
        assert_eq!(
            dispatch.respuesta.observaciones,
            vec![OBS_NO_SERVER_RESPONSE.to_string()]
        );
    }

    #[test]
    fn firmado_flattens_the_document() {
        let firmado = DteFirmado {
            dte: serde_json::json!({"identificacion": {"codigoGeneracion": "A1B2"}}),
            respuesta_mh: RespuestaMh {
                version: 2,
                ambiente: "00".into(),
                version_app: 2,
                estado: "PROCESADO".into(),
                codigo_generacion: "A1B2".into(),
                sello_recibido: Some("SELLO".into()),
                fh_procesamiento: "2025-03-01 14:30:00".into(),
                clasifica_msg: None,
                codigo_msg: "001".into(),
                descripcion_msg: "RECIBIDO".into(),
                observaciones: vec![],
            },
            firma: "JWS".into(),
        };
        let json = serde_json::to_string(&firmado).unwrap();
        // Document fields sit at the top level next to the response.
        assert!(json.contains(r#""identificacion":{"codigoGeneracion":"A1B2"}"#));
        assert!(json.contains(r#""respuestaMH":{"#));
        assert!(json.contains(r#""firma":"JWS""#));
    }
}
