//! Factura electrónica de venta (tipoDte 01).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{CartItem, Customer, DteError, DteType, validate_customer, validate_items,
    validate_transmitter};

use super::anexos::{ApendiceItem, DocumentoRelacionado, Extension, OtroDocumento, VentaTercero};
use super::cuerpo::{FacturaItem, factura_items};
use super::identificacion::{Clock, CodeGenerator, Identificacion};
use super::parties::{Emission, Emisor, Receptor};
use super::resumen::{FacturaResumen, factura_resumen};

/// Assembled factura document ("dteJson").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Factura {
    pub identificacion: Identificacion,
    pub documento_relacionado: Option<Vec<DocumentoRelacionado>>,
    pub emisor: Emisor,
    pub receptor: Receptor,
    pub otros_documentos: Option<Vec<OtroDocumento>>,
    pub venta_tercero: Option<VentaTercero>,
    pub cuerpo_documento: Vec<FacturaItem>,
    pub resumen: FacturaResumen,
    pub extension: Option<Extension>,
    pub apendice: Option<Vec<ApendiceItem>>,
}

/// Assemble a factura for a consumer sale.
///
/// `iva_rete1` is the optional IVA retention already agreed with the
/// customer; pass zero when none applies. Fails with
/// [`DteError::Validation`] listing every missing required input field.
pub fn factura(
    emission: &Emission,
    customer: &Customer,
    items: &[CartItem],
    iva_rete1: Decimal,
    generator: &dyn CodeGenerator,
    clock: &dyn Clock,
) -> Result<Factura, DteError> {
    let mut errors = validate_transmitter(emission.transmitter);
    errors.extend(validate_customer(customer));
    errors.extend(validate_items(items));
    if !errors.is_empty() {
        return Err(DteError::Validation(errors));
    }

    Ok(Factura {
        identificacion: Identificacion::new(
            DteType::Factura,
            emission.ambiente,
            emission.point_of_sale,
            emission.correlative,
            generator,
            clock,
        ),
        documento_relacionado: None,
        emisor: Emisor::from_transmitter(emission.transmitter, emission.point_of_sale),
        receptor: Receptor::from_customer(customer),
        otros_documentos: None,
        venta_tercero: None,
        cuerpo_documento: factura_items(items),
        resumen: factura_resumen(
            items,
            iva_rete1,
            emission.condicion_operacion,
            emission.pagos.clone(),
        )?,
        extension: None,
        apendice: None,
    })
}
