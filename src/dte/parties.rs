//! Party blocks (emisor, receptor, sujeto excluido) and the assembly inputs
//! they are mapped from.

use serde::{Deserialize, Serialize};

use crate::core::{
    Address, Ambiente, Customer, Pago, Transmitter, normalize_optional, with_dash,
};

/// Establishment / point-of-sale codes for one emission location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfSale {
    pub cod_estable: String,
    pub cod_punto_venta: String,
    /// Establishment code registered with MH (may be a sentinel).
    #[serde(rename = "codEstableMH")]
    pub cod_estable_mh: String,
    /// Point-of-sale code registered with MH (may be a sentinel).
    #[serde(rename = "codPuntoVentaMH")]
    pub cod_punto_venta_mh: String,
    /// Establishment-type code (e.g. "01" casa matriz).
    pub tipo_establecimiento: String,
}

/// Per-invocation emission parameters shared by every document kind.
#[derive(Debug, Clone)]
pub struct Emission<'a> {
    pub transmitter: &'a Transmitter,
    pub point_of_sale: &'a PointOfSale,
    /// Caller-supplied sequential number for the control number. Callers are
    /// responsible for serializing correlative issuance across invocations.
    pub correlative: u64,
    pub ambiente: Ambiente,
    /// Operation condition (1 contado, 2 crédito, 3 otro).
    pub condicion_operacion: u8,
    pub pagos: Vec<Pago>,
}

/// Emisor block embedded in sale documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Emisor {
    pub nit: String,
    pub nrc: String,
    pub nombre: String,
    pub nombre_comercial: String,
    pub cod_actividad: String,
    pub desc_actividad: String,
    pub tipo_establecimiento: String,
    pub direccion: Address,
    pub telefono: String,
    pub correo: String,
    pub cod_estable: String,
    #[serde(rename = "codEstableMH")]
    pub cod_estable_mh: Option<String>,
    pub cod_punto_venta: String,
    #[serde(rename = "codPuntoVentaMH")]
    pub cod_punto_venta_mh: Option<String>,
}

impl Emisor {
    pub fn from_transmitter(transmitter: &Transmitter, pos: &PointOfSale) -> Self {
        Self {
            nit: transmitter.nit.clone(),
            nrc: transmitter.nrc.clone(),
            nombre: transmitter.nombre.clone(),
            nombre_comercial: transmitter.nombre_comercial.clone(),
            cod_actividad: transmitter.cod_actividad.clone(),
            desc_actividad: transmitter.desc_actividad.clone(),
            tipo_establecimiento: pos.tipo_establecimiento.clone(),
            direccion: transmitter.direccion.clone(),
            telefono: transmitter.telefono.clone(),
            correo: transmitter.correo.clone(),
            cod_estable: pos.cod_estable.clone(),
            cod_estable_mh: normalize_optional(&pos.cod_estable_mh),
            cod_punto_venta: pos.cod_punto_venta.clone(),
            cod_punto_venta_mh: normalize_optional(&pos.cod_punto_venta_mh),
        }
    }
}

/// Emisor block of the excluded-subject document — same identity, different
/// schema shape (no commercial name or establishment type).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmisorFse {
    pub nit: String,
    pub nrc: String,
    pub nombre: String,
    pub cod_actividad: String,
    pub desc_actividad: String,
    pub direccion: Address,
    pub telefono: String,
    pub correo: String,
    pub cod_estable: Option<String>,
    #[serde(rename = "codEstableMH")]
    pub cod_estable_mh: Option<String>,
    pub cod_punto_venta: Option<String>,
    #[serde(rename = "codPuntoVentaMH")]
    pub cod_punto_venta_mh: Option<String>,
}

impl EmisorFse {
    pub fn from_transmitter(transmitter: &Transmitter, pos: &PointOfSale) -> Self {
        Self {
            nit: transmitter.nit.clone(),
            nrc: transmitter.nrc.clone(),
            nombre: transmitter.nombre.clone(),
            cod_actividad: transmitter.cod_actividad.clone(),
            desc_actividad: transmitter.desc_actividad.clone(),
            direccion: transmitter.direccion.clone(),
            telefono: transmitter.telefono.clone(),
            correo: transmitter.correo.clone(),
            cod_estable: normalize_optional(&pos.cod_estable),
            cod_estable_mh: normalize_optional(&pos.cod_estable_mh),
            cod_punto_venta: normalize_optional(&pos.cod_punto_venta),
            cod_punto_venta_mh: normalize_optional(&pos.cod_punto_venta_mh),
        }
    }
}

/// Receptor block. One struct serves every document kind that carries a
/// counterparty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receptor {
    pub tipo_documento: Option<String>,
    pub num_documento: Option<String>,
    pub nrc: Option<String>,
    pub nombre: String,
    pub cod_actividad: Option<String>,
    pub desc_actividad: Option<String>,
    pub direccion: Address,
    pub telefono: Option<String>,
    pub correo: String,
}

impl Receptor {
    /// Map a customer into the receptor block.
    ///
    /// A non-zero NRC marks a tax-credit-eligible entity: the document type
    /// is forced to "36" (NIT) and the NIT becomes the document number.
    /// Otherwise the customer's own document type is kept and the number
    /// gets its check-digit dash. Every optional field goes through the
    /// sentinel normalization.
    pub fn from_customer(customer: &Customer) -> Self {
        let credit_eligible = normalize_optional(&customer.nrc)
            .as_deref()
            .and_then(|nrc| nrc.parse::<u64>().ok())
            .is_some_and(|nrc| nrc != 0);

        let (tipo_documento, num_documento) = if credit_eligible {
            (Some("36".to_string()), Some(customer.nit.clone()))
        } else {
            (
                normalize_optional(&customer.tipo_documento),
                normalize_optional(&customer.num_documento).map(|n| with_dash(&n)),
            )
        };

        Self {
            tipo_documento,
            num_documento,
            nrc: normalize_optional(&customer.nrc),
            nombre: customer.nombre.clone(),
            cod_actividad: normalize_optional(&customer.cod_actividad),
            desc_actividad: normalize_optional(&customer.desc_actividad),
            direccion: customer.direccion.clone(),
            telefono: normalize_optional(&customer.telefono),
            correo: customer.correo.clone(),
        }
    }
}

/// Sujeto excluido block: the supplier side of an excluded-subject purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SujetoExcluido {
    pub tipo_documento: String,
    pub num_documento: String,
    pub nombre: String,
    pub cod_actividad: Option<String>,
    pub desc_actividad: Option<String>,
    pub direccion: Address,
    pub telefono: Option<String>,
    pub correo: Option<String>,
}

impl SujetoExcluido {
    pub fn from_customer(customer: &Customer) -> Self {
        Self {
            tipo_documento: customer.tipo_documento.clone(),
            num_documento: customer.num_documento.clone(),
            nombre: customer.nombre.clone(),
            cod_actividad: normalize_optional(&customer.cod_actividad),
            desc_actividad: normalize_optional(&customer.desc_actividad),
            direccion: customer.direccion.clone(),
            telefono: normalize_optional(&customer.telefono),
            correo: normalize_optional(&customer.correo),
        }
    }
}
