//! Tax-credit documents: comprobante de crédito fiscal (03), nota de
//! crédito (05), and nota de débito (06). The three share one body mapper
//! and one summary derivation; only the resumen shape and the related
//! document requirement differ.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{
    CartItem, Customer, DteError, DteType, ValidationError, validate_customer, validate_items,
    validate_transmitter,
};

use super::anexos::{ApendiceItem, DocumentoRelacionado, Extension, OtroDocumento, VentaTercero};
use super::cuerpo::{FiscalItem, fiscal_items};
use super::identificacion::{Clock, CodeGenerator, Identificacion};
use super::parties::{Emission, Emisor, Receptor};
use super::resumen::{FiscalResumen, NotaResumen, fiscal_resumen, nota_resumen};

/// Kind-independent options of the tax-credit documents.
#[derive(Debug, Clone)]
pub struct FiscalOptions {
    /// IVA retention ("ivaRete1") agreed with the receptor; zero when none.
    pub iva_retention: Decimal,
    /// Income-tax retention rate in percent ("reteRenta"); zero when none.
    pub renta_rate: Decimal,
    /// When set, cart prices already embed the 13% IVA and the embedded
    /// portion is stripped before the taxable base is computed.
    pub price_includes_iva: bool,
}

impl Default for FiscalOptions {
    fn default() -> Self {
        Self {
            iva_retention: Decimal::ZERO,
            renta_rate: Decimal::ZERO,
            price_includes_iva: false,
        }
    }
}

/// Assembled crédito fiscal document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiscalDocumento {
    pub identificacion: Identificacion,
    pub documento_relacionado: Option<Vec<DocumentoRelacionado>>,
    pub emisor: Emisor,
    pub receptor: Receptor,
    pub otros_documentos: Option<Vec<OtroDocumento>>,
    pub venta_tercero: Option<VentaTercero>,
    pub cuerpo_documento: Vec<FiscalItem>,
    pub resumen: FiscalResumen,
    pub extension: Option<Extension>,
    pub apendice: Option<Vec<ApendiceItem>>,
}

/// Assembled nota de crédito / nota de débito.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nota {
    pub identificacion: Identificacion,
    pub documento_relacionado: Vec<DocumentoRelacionado>,
    pub emisor: Emisor,
    pub receptor: Receptor,
    pub venta_tercero: Option<VentaTercero>,
    pub cuerpo_documento: Vec<FiscalItem>,
    pub resumen: NotaResumen,
    pub extension: Option<Extension>,
    pub apendice: Option<Vec<ApendiceItem>>,
}

fn validate_fiscal(
    emission: &Emission,
    customer: &Customer,
    items: &[CartItem],
) -> Result<(), DteError> {
    let mut errors = validate_transmitter(emission.transmitter);
    errors.extend(validate_customer(customer));
    errors.extend(validate_items(items));
    // Tax-credit documents are only valid against a registered receptor.
    if crate::core::normalize_optional(&customer.nrc).is_none() {
        errors.push(ValidationError::new(
            "receptor.nrc",
            "tax-credit documents require a receptor with a registry number",
        ));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(DteError::Validation(errors))
    }
}

/// Assemble a comprobante de crédito fiscal (03).
pub fn credito_fiscal(
    emission: &Emission,
    customer: &Customer,
    items: &[CartItem],
    options: &FiscalOptions,
    generator: &dyn CodeGenerator,
    clock: &dyn Clock,
) -> Result<FiscalDocumento, DteError> {
    validate_fiscal(emission, customer, items)?;

    let cuerpo = fiscal_items(options.price_includes_iva, items);
    let resumen = fiscal_resumen(
        &cuerpo,
        items,
        options.iva_retention,
        options.renta_rate,
        emission.condicion_operacion,
        emission.pagos.clone(),
    )?;

    Ok(FiscalDocumento {
        identificacion: Identificacion::new(
            DteType::CreditoFiscal,
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
        cuerpo_documento: cuerpo,
        resumen,
        extension: None,
        apendice: None,
    })
}

fn nota(
    tipo: DteType,
    emission: &Emission,
    customer: &Customer,
    items: &[CartItem],
    related: Vec<DocumentoRelacionado>,
    options: &FiscalOptions,
    generator: &dyn CodeGenerator,
    clock: &dyn Clock,
) -> Result<Nota, DteError> {
    validate_fiscal(emission, customer, items)?;
    if related.is_empty() {
        return Err(DteError::Validation(vec![ValidationError::new(
            "documentoRelacionado",
            "notes must reference at least one issued document",
        )]));
    }

    let cuerpo = fiscal_items(options.price_includes_iva, items);
    let resumen = nota_resumen(
        &cuerpo,
        items,
        options.iva_retention,
        options.renta_rate,
        emission.condicion_operacion,
    )?;

    Ok(Nota {
        identificacion: Identificacion::new(
            tipo,
            emission.ambiente,
            emission.point_of_sale,
            emission.correlative,
            generator,
            clock,
        ),
        documento_relacionado: related,
        emisor: Emisor::from_transmitter(emission.transmitter, emission.point_of_sale),
        receptor: Receptor::from_customer(customer),
        venta_tercero: None,
        cuerpo_documento: cuerpo,
        resumen,
        extension: None,
        apendice: None,
    })
}

/// Assemble a nota de crédito (05) referencing previously issued documents.
pub fn nota_credito(
    emission: &Emission,
    customer: &Customer,
    items: &[CartItem],
    related: Vec<DocumentoRelacionado>,
    options: &FiscalOptions,
    generator: &dyn CodeGenerator,
    clock: &dyn Clock,
) -> Result<Nota, DteError> {
    nota(
        DteType::NotaCredito,
        emission,
        customer,
        items,
        related,
        options,
        generator,
        clock,
    )
}

/// Assemble a nota de débito (06) referencing previously issued documents.
pub fn nota_debito(
    emission: &Emission,
    customer: &Customer,
    items: &[CartItem],
    related: Vec<DocumentoRelacionado>,
    options: &FiscalOptions,
    generator: &dyn CodeGenerator,
    clock: &dyn Clock,
) -> Result<Nota, DteError> {
    nota(
        DteType::NotaDebito,
        emission,
        customer,
        items,
        related,
        options,
        generator,
        clock,
    )
}
