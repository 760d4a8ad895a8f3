//! Classification of the authority's answer and the substitute responses the
//! pipeline emits when no usable answer arrived.

use crate::core::{ESTADO_PROCESADO, ESTADO_RECHAZADO, RespuestaMh};

pub const MSG_TIMEOUT: &str = "TIEMPO DE RESPUESTA EXCEDIDO";
pub const OBS_TIMEOUT: &str = "SE TERMINO EL TIEMPO DE RESPUESTA";
pub const MSG_SIGNATURE_MISSING: &str = "FIRMA NO ENCONTRADA";
pub const MSG_SIGNING_FAILED: &str = "NO SE PUDO FIRMAR";
pub const OBS_SIGNER_UNREACHABLE: &str = "NO SE ENCONTRO EL SISTEMA DE FIRMAS";
pub const MSG_SEND_FAILED: &str = "ERROR EN ENVIO AL SERVIDOR";
pub const OBS_NO_SERVER_RESPONSE: &str = "NO SE OBTUVO RESPUESTA DEL SERVIDOR";
pub const MSG_MH_UNRESPONSIVE: &str = "EL SISTEMA DE TRANSMISION DE DTE NO RESPONDIO";
pub const OBS_NO_MH_RESPONSE: &str = "NO SE OBTUVO RESPUESTA DEL MINISTERIO DE HACIENDA";

/// Definite result of one transmission attempt. Every attempt ends in exactly
/// one of these; callers never see a raw transport error.
#[derive(Debug, Clone)]
pub enum AuthorityOutcome {
    /// The authority accepted the document (estado `PROCESADO`).
    Processed(RespuestaMh),
    /// The authority answered and rejected it (estado `RECHAZADO`).
    Rejected(RespuestaMh),
    /// The authority answered with a status string the pipeline does not
    /// recognize; the verbatim response is preserved for inspection.
    UnrecognizedStatus(RespuestaMh),
    /// The bounded wait elapsed before any response arrived.
    TimedOut,
    /// The request never produced an HTTP response.
    TransportFailed(String),
}

/// Classify a response the server actually returned. The estado string is the
/// single discriminator; HTTP status codes play no role because MH returns
/// rejection bodies on error statuses too.
pub fn classify(respuesta: RespuestaMh) -> AuthorityOutcome {
    match respuesta.estado.as_str() {
        ESTADO_PROCESADO => AuthorityOutcome::Processed(respuesta),
        ESTADO_RECHAZADO => AuthorityOutcome::Rejected(respuesta),
        _ => AuthorityOutcome::UnrecognizedStatus(respuesta),
    }
}

/// Build the substitute response emitted when no usable server answer exists.
/// Shape mirrors a real rejection: version 0, estado `RECHAZADO`, no sello,
/// and a fixed diagnostic pair.
pub fn substitute(
    ambiente: &str,
    codigo_generacion: &str,
    fh_procesamiento: String,
    descripcion: &str,
    observacion: &str,
) -> RespuestaMh {
    RespuestaMh {
        version: 0,
        ambiente: ambiente.to_string(),
        version_app: 1,
        estado: ESTADO_RECHAZADO.to_string(),
        codigo_generacion: codigo_generacion.to_string(),
        sello_recibido: None,
        fh_procesamiento,
        clasifica_msg: Some("0".to_string()),
        codigo_msg: "0".to_string(),
        descripcion_msg: descripcion.to_string(),
        observaciones: vec![observacion.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn respuesta(estado: &str) -> RespuestaMh {
        RespuestaMh {
            version: 2,
            ambiente: "00".into(),
            version_app: 2,
            estado: estado.into(),
            codigo_generacion: "A1B2".into(),
            sello_recibido: Some("2025SELLO".into()),
            fh_procesamiento: "2025-03-01 14:30:00".into(),
            clasifica_msg: None,
            codigo_msg: "001".into(),
            descripcion_msg: "RECIBIDO".into(),
            observaciones: vec![],
        }
    }

    #[test]
    fn processed_and_rejected_are_recognized() {
        assert!(matches!(
            classify(respuesta("PROCESADO")),
            AuthorityOutcome::Processed(_)
        ));
        assert!(matches!(
            classify(respuesta("RECHAZADO")),
            AuthorityOutcome::Rejected(_)
        ));
    }

    #[test]
    fn anything_else_is_unrecognized() {
        for estado in ["", "PENDIENTE", "procesado", "OK"] {
            assert!(matches!(
                classify(respuesta(estado)),
                AuthorityOutcome::UnrecognizedStatus(_)
            ));
        }
    }

    #[test]
    fn unrecognized_preserves_the_verbatim_response() {
        let AuthorityOutcome::UnrecognizedStatus(r) = classify(respuesta("PENDIENTE")) else {
            panic!("expected UnrecognizedStatus");
        };
        assert_eq!(r.estado, "PENDIENTE");
        assert_eq!(r.sello_recibido.as_deref(), Some("2025SELLO"));
    }

    #[test]
    fn substitute_is_a_complete_rejection() {
        let r = substitute(
            "00",
            "A1B2",
            "2025-03-01 14:30:00".into(),
            MSG_TIMEOUT,
            OBS_TIMEOUT,
        );
        assert_eq!(r.version, 0);
        assert_eq!(r.estado, "RECHAZADO");
        assert_eq!(r.codigo_generacion, "A1B2");
        assert_eq!(r.sello_recibido, None);
        assert_eq!(r.descripcion_msg, "TIEMPO DE RESPUESTA EXCEDIDO");
        assert_eq!(r.observaciones, vec!["SE TERMINO EL TIEMPO DE RESPUESTA"]);
    }
}
