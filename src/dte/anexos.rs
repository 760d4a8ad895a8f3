//! Document-level annex blocks that most documents carry as explicit nulls:
//! related documents, third-party sales, extension, and appendix entries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reference to a previously issued document (required on notas de
/// crédito/débito, optional elsewhere).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentoRelacionado {
    /// tipoDte of the referenced document.
    pub tipo_documento: String,
    /// 1 = físico, 2 = electrónico.
    pub tipo_generacion: u8,
    /// Generation code (electrónico) or document number (físico).
    pub numero_documento: String,
    pub fecha_emision: String,
}

/// Sale on behalf of a third party.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VentaTercero {
    pub nit: String,
    pub nombre: String,
}

/// Associated-document entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtroDocumento {
    pub cod_docto_asociado: u8,
    pub desc_documento: Option<String>,
    pub detalle_documento: Option<String>,
}

/// Delivery/receiver extension block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    pub nomb_entrega: Option<String>,
    pub docu_entrega: Option<String>,
    pub nomb_recibe: Option<String>,
    pub docu_recibe: Option<String>,
    pub observaciones: Option<String>,
    pub placa_vehiculo: Option<String>,
}

/// Free-form appendix entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApendiceItem {
    pub campo: String,
    pub etiqueta: String,
    pub valor: String,
}

/// Tax entry of a resumen tributos list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tributo {
    pub codigo: String,
    pub descripcion: String,
    pub valor: Decimal,
}

impl Tributo {
    /// Code "20" — IVA 13%, the tributo every fiscal document carries.
    pub fn iva(valor: Decimal) -> Self {
        Self {
            codigo: "20".into(),
            descripcion: "Impuesto al Valor Agregado 13%".into(),
            valor,
        }
    }
}
