//! Factura de sujeto excluido (tipoDte 14): a purchase receipt issued on
//! behalf of a supplier excluded from the IVA regime.

use serde::{Deserialize, Serialize};

use crate::core::{Customer, DteError, DteType, FseItem, validate_fse_items, validate_transmitter};

use super::anexos::ApendiceItem;
use super::cuerpo::{FseBodyItem, fse_items};
use super::identificacion::{Clock, CodeGenerator, Identificacion};
use super::parties::{Emission, EmisorFse, SujetoExcluido};
use super::resumen::{FseResumen, fse_resumen};

/// Assembled excluded-subject document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacturaSujetoExcluido {
    pub identificacion: Identificacion,
    pub emisor: EmisorFse,
    pub sujeto_excluido: SujetoExcluido,
    pub cuerpo_documento: Vec<FseBodyItem>,
    pub resumen: FseResumen,
    pub apendice: Option<Vec<ApendiceItem>>,
}

/// Assemble an excluded-subject document. The resumen applies the fixed 10%
/// renta retention on the subtotal as the only deduction.
pub fn sujeto_excluido(
    emission: &Emission,
    supplier: &Customer,
    items: &[FseItem],
    observaciones: &str,
    generator: &dyn CodeGenerator,
    clock: &dyn Clock,
) -> Result<FacturaSujetoExcluido, DteError> {
    let mut errors = validate_transmitter(emission.transmitter);
    errors.extend(validate_fse_items(items));
    if supplier.nombre.trim().is_empty() {
        errors.push(crate::core::ValidationError::new(
            "sujetoExcluido.nombre",
            "required field is empty",
        ));
    }
    if !errors.is_empty() {
        return Err(DteError::Validation(errors));
    }

    let cuerpo = fse_items(items);
    let resumen = fse_resumen(&cuerpo, observaciones)?;

    Ok(FacturaSujetoExcluido {
        identificacion: Identificacion::new(
            DteType::SujetoExcluido,
            emission.ambiente,
            emission.point_of_sale,
            emission.correlative,
            generator,
            clock,
        ),
        emisor: EmisorFse::from_transmitter(emission.transmitter, emission.point_of_sale),
        sujeto_excluido: SujetoExcluido::from_customer(supplier),
        cuerpo_documento: cuerpo,
        resumen,
        apendice: None,
    })
}
