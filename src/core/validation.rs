//! Required-field validation applied before assembly.
//!
//! Assemblers refuse to build a document from structurally incomplete input
//! and return every offending field at once, so callers can fix a whole form
//! in one pass.

use rust_decimal::Decimal;

use super::error::ValidationError;
use super::types::{CartItem, Customer, FseItem, Transmitter};

fn require(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(ValidationError::new(field, "required field is empty"));
    }
}

/// Validate the issuer identity fields every document kind embeds.
pub fn validate_transmitter(transmitter: &Transmitter) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    require(&mut errors, "emisor.nit", &transmitter.nit);
    require(&mut errors, "emisor.nrc", &transmitter.nrc);
    require(&mut errors, "emisor.nombre", &transmitter.nombre);
    require(&mut errors, "emisor.codActividad", &transmitter.cod_actividad);
    require(&mut errors, "emisor.descActividad", &transmitter.desc_actividad);
    require(&mut errors, "emisor.correo", &transmitter.correo);
    require(
        &mut errors,
        "emisor.direccion.departamento",
        &transmitter.direccion.departamento,
    );
    require(
        &mut errors,
        "emisor.direccion.municipio",
        &transmitter.direccion.municipio,
    );
    require(&mut errors, "emisor.clavePrivada", &transmitter.clave_privada);
    errors
}

/// Validate the counterparty fields the receptor mapping depends on.
pub fn validate_customer(customer: &Customer) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    require(&mut errors, "receptor.nombre", &customer.nombre);
    require(&mut errors, "receptor.correo", &customer.correo);
    require(
        &mut errors,
        "receptor.direccion.departamento",
        &customer.direccion.departamento,
    );
    require(
        &mut errors,
        "receptor.direccion.municipio",
        &customer.direccion.municipio,
    );
    errors
}

/// Validate a sale cart: non-empty, positive quantities, non-negative prices.
pub fn validate_items(items: &[CartItem]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if items.is_empty() {
        errors.push(ValidationError::new(
            "cuerpoDocumento",
            "at least one line item is required",
        ));
    }
    for (i, item) in items.iter().enumerate() {
        require(
            &mut errors,
            &format!("cuerpoDocumento[{i}].descripcion"),
            &item.product_name,
        );
        if item.quantity <= Decimal::ZERO {
            errors.push(ValidationError::new(
                format!("cuerpoDocumento[{i}].cantidad"),
                "quantity must be positive",
            ));
        }
        if item.price < Decimal::ZERO {
            errors.push(ValidationError::new(
                format!("cuerpoDocumento[{i}].precioUni"),
                "price must not be negative",
            ));
        }
    }
    errors
}

/// Validate excluded-subject purchase lines.
pub fn validate_fse_items(items: &[FseItem]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if items.is_empty() {
        errors.push(ValidationError::new(
            "cuerpoDocumento",
            "at least one line item is required",
        ));
    }
    for (i, item) in items.iter().enumerate() {
        require(
            &mut errors,
            &format!("cuerpoDocumento[{i}].descripcion"),
            &item.descripcion,
        );
        if item.cantidad <= Decimal::ZERO {
            errors.push(ValidationError::new(
                format!("cuerpoDocumento[{i}].cantidad"),
                "quantity must be positive",
            ));
        }
        if item.precio_uni < Decimal::ZERO {
            errors.push(ValidationError::new(
                format!("cuerpoDocumento[{i}].precioUni"),
                "price must not be negative",
            ));
        }
    }
    errors
}
