//! Signing envelope wrapping an assembled document for the firmador service.

use serde::Serialize;

use crate::core::Transmitter;

/// Body POSTed to the signing endpoint: issuer credentials plus the document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest<T> {
    pub nit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activo: Option<bool>,
    pub password_pri: String,
    pub dte_json: T,
}

impl<T: Serialize> SignRequest<T> {
    /// Envelope for sale documents.
    pub fn new(transmitter: &Transmitter, document: T) -> Self {
        Self {
            nit: transmitter.nit.clone(),
            activo: Some(true),
            password_pri: transmitter.clave_privada.clone(),
            dte_json: document,
        }
    }

    /// Envelope for invalidation documents, which omit the `activo` flag.
    pub fn invalidation(transmitter: &Transmitter, document: T) -> Self {
        Self {
            nit: transmitter.nit.clone(),
            activo: None,
            password_pri: transmitter.clave_privada.clone(),
            dte_json: document,
        }
    }
}
