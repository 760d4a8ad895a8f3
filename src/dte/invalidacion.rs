//! Invalidación (annulment) of a previously accepted document.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{
    Ambiente, DteError, DteType, Transmitter, ValidationError, normalize_optional,
};

use super::identificacion::{Clock, CodeGenerator};
use super::parties::PointOfSale;

/// Reference to the accepted sale being annulled.
#[derive(Debug, Clone)]
pub struct SaleReference {
    /// Generation code of the document to annul.
    pub codigo_generacion: String,
    /// Generation code of the replacement document, when one exists.
    pub codigo_generacion_r: String,
    /// Receipt stamp MH issued on acceptance.
    pub sello_recibido: String,
    pub numero_control: String,
    /// Emission date of the annulled document (`YYYY-MM-DD`).
    pub fec_emi: String,
    pub monto_iva: Decimal,
    /// Counterparty of the annulled sale.
    pub tipo_documento: String,
    pub num_documento: String,
    pub nombre: String,
}

/// Annulment reason and the people responsible for it.
#[derive(Debug, Clone)]
pub struct InvalidationReason {
    /// 1 = error in the document, 2 = rescinded operation, 3 = other.
    pub tipo_anulacion: u8,
    pub motivo_anulacion: String,
    pub nombre_responsable: String,
    pub tip_doc_responsable: String,
    pub num_doc_responsable: String,
    pub nombre_solicita: String,
    pub tip_doc_solicita: String,
    pub num_doc_solicita: String,
}

/// Everything the invalidation assembler needs for one annulment.
#[derive(Debug, Clone)]
pub struct InvalidationRequest<'a> {
    pub transmitter: &'a Transmitter,
    pub point_of_sale: &'a PointOfSale,
    pub nombre_establecimiento: String,
    pub ambiente: Ambiente,
    /// Kind of the document being annulled.
    pub tipo_dte: DteType,
    pub sale: SaleReference,
    pub motivo: InvalidationReason,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidacionIdentificacion {
    pub version: u8,
    pub ambiente: Ambiente,
    pub codigo_generacion: String,
    pub fec_anula: String,
    pub hor_anula: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidacionEmisor {
    pub nit: String,
    pub nombre: String,
    pub tipo_establecimiento: String,
    pub telefono: String,
    pub correo: String,
    pub cod_estable: String,
    pub cod_punto_venta: String,
    pub nom_establecimiento: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidacionDocumento {
    pub tipo_dte: DteType,
    pub codigo_generacion: String,
    pub codigo_generacion_r: Option<String>,
    pub sello_recibido: String,
    pub numero_control: String,
    pub fec_emi: String,
    pub monto_iva: Decimal,
    pub tipo_documento: Option<String>,
    pub num_documento: Option<String>,
    pub nombre: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidacionMotivo {
    pub tipo_anulacion: u8,
    pub motivo_anulacion: String,
    pub nombre_responsable: String,
    pub tip_doc_responsable: String,
    pub num_doc_responsable: String,
    pub nombre_solicita: String,
    pub tip_doc_solicita: String,
    pub num_doc_solicita: String,
}

/// Assembled invalidation document ("dteJson").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invalidacion {
    pub identificacion: InvalidacionIdentificacion,
    pub emisor: InvalidacionEmisor,
    pub documento: InvalidacionDocumento,
    pub motivo: InvalidacionMotivo,
}

/// Assemble an invalidation request document. The identificación carries a
/// freshly generated code of its own; the annulled document's code lives in
/// the documento block.
pub fn invalidacion(
    request: &InvalidationRequest<'_>,
    generator: &dyn CodeGenerator,
    clock: &dyn Clock,
) -> Result<Invalidacion, DteError> {
    let mut errors = Vec::new();
    for (field, value) in [
        ("documento.codigoGeneracion", &request.sale.codigo_generacion),
        ("documento.selloRecibido", &request.sale.sello_recibido),
        ("documento.numeroControl", &request.sale.numero_control),
        ("documento.fecEmi", &request.sale.fec_emi),
        ("motivo.nombreResponsable", &request.motivo.nombre_responsable),
        ("motivo.nombreSolicita", &request.motivo.nombre_solicita),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::new(field, "required field is empty"));
        }
    }
    if !errors.is_empty() {
        return Err(DteError::Validation(errors));
    }

    let now = clock.now();
    Ok(Invalidacion {
        identificacion: InvalidacionIdentificacion {
            version: 2,
            ambiente: request.ambiente,
            codigo_generacion: generator.generate().to_uppercase(),
            fec_anula: now.fec_emi,
            hor_anula: now.hor_emi,
        },
        emisor: InvalidacionEmisor {
            nit: request.transmitter.nit.clone(),
            nombre: request.transmitter.nombre.clone(),
            tipo_establecimiento: request.point_of_sale.tipo_establecimiento.clone(),
            telefono: request.transmitter.telefono.clone(),
            correo: request.transmitter.correo.clone(),
            cod_estable: request.point_of_sale.cod_estable.clone(),
            cod_punto_venta: request.point_of_sale.cod_punto_venta.clone(),
            nom_establecimiento: request.nombre_establecimiento.clone(),
        },
        documento: InvalidacionDocumento {
            tipo_dte: request.tipo_dte,
            codigo_generacion: request.sale.codigo_generacion.clone(),
            codigo_generacion_r: normalize_optional(&request.sale.codigo_generacion_r),
            sello_recibido: request.sale.sello_recibido.clone(),
            numero_control: request.sale.numero_control.clone(),
            fec_emi: request.sale.fec_emi.clone(),
            monto_iva: request.sale.monto_iva,
            tipo_documento: normalize_optional(&request.sale.tipo_documento),
            num_documento: normalize_optional(&request.sale.num_documento),
            nombre: request.sale.nombre.clone(),
        },
        motivo: InvalidacionMotivo {
            tipo_anulacion: request.motivo.tipo_anulacion,
            motivo_anulacion: request.motivo.motivo_anulacion.clone(),
            nombre_responsable: request.motivo.nombre_responsable.clone(),
            tip_doc_responsable: request.motivo.tip_doc_responsable.clone(),
            num_doc_responsable: request.motivo.num_doc_responsable.clone(),
            nombre_solicita: request.motivo.nombre_solicita.clone(),
            tip_doc_solicita: request.motivo.tip_doc_solicita.clone(),
            num_doc_solicita: request.motivo.num_doc_solicita.clone(),
        },
    })
}
