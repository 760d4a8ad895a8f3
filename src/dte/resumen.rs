//! Resumen (summary) blocks and their shared computation.
//!
//! Every monetary field is rounded to two decimals independently before it
//! enters the block, and the grand total plus its word rendering are derived
//! from those already-rounded values — so "totalLetras" always matches
//! "totalPagar" by construction.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::core::{
    CartItem, DteError, IVA_RATE, Pago, amount_in_words, discount_from_prices, discount_total,
    income_tax_retention, non_subject_total, non_taxed_total, round2, taxed_total, total,
    total_without_discount, exempt_total,
};

use super::anexos::Tributo;
use super::cuerpo::{FiscalItem, FseBodyItem};

/// Renta retention rate fixed by law for excluded-subject purchases.
const FSE_RETENTION_RATE: Decimal = dec!(10);

/// Factura (01) resumen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacturaResumen {
    pub total_no_suj: Decimal,
    pub total_exenta: Decimal,
    pub total_gravada: Decimal,
    pub sub_total_ventas: Decimal,
    pub descu_no_suj: Decimal,
    pub descu_exenta: Decimal,
    pub descu_gravada: Decimal,
    pub porcentaje_descuento: Decimal,
    pub total_descu: Decimal,
    pub tributos: Option<Vec<Tributo>>,
    pub sub_total: Decimal,
    pub iva_rete1: Decimal,
    pub rete_renta: Decimal,
    pub total_iva: Decimal,
    pub monto_total_operacion: Decimal,
    pub total_no_gravado: Decimal,
    pub total_pagar: Decimal,
    pub total_letras: String,
    pub saldo_favor: Decimal,
    pub condicion_operacion: u8,
    pub pagos: Vec<Pago>,
    pub num_pago_electronico: Option<String>,
}

/// Crédito fiscal (03) resumen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiscalResumen {
    pub total_no_suj: Decimal,
    pub total_exenta: Decimal,
    pub total_gravada: Decimal,
    pub sub_total_ventas: Decimal,
    pub descu_no_suj: Decimal,
    pub descu_exenta: Decimal,
    pub descu_gravada: Decimal,
    pub porcentaje_descuento: Decimal,
    pub total_descu: Decimal,
    pub tributos: Vec<Tributo>,
    pub sub_total: Decimal,
    pub iva_perci1: Decimal,
    pub iva_rete1: Decimal,
    pub rete_renta: Decimal,
    pub monto_total_operacion: Decimal,
    pub total_no_gravado: Decimal,
    pub total_pagar: Decimal,
    pub total_letras: String,
    pub saldo_favor: Decimal,
    pub condicion_operacion: u8,
    pub pagos: Vec<Pago>,
    pub num_pago_electronico: Option<String>,
}

/// Nota de crédito / nota de débito (05/06) resumen — the reduced fiscal
/// shape without payment fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotaResumen {
    pub total_no_suj: Decimal,
    pub total_exenta: Decimal,
    pub total_gravada: Decimal,
    pub sub_total_ventas: Decimal,
    pub descu_no_suj: Decimal,
    pub descu_exenta: Decimal,
    pub descu_gravada: Decimal,
    pub total_descu: Decimal,
    pub tributos: Vec<Tributo>,
    pub sub_total: Decimal,
    pub iva_perci1: Decimal,
    pub iva_rete1: Decimal,
    pub rete_renta: Decimal,
    pub monto_total_operacion: Decimal,
    pub total_letras: String,
    pub condicion_operacion: u8,
}

/// Sujeto excluido (14) resumen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FseResumen {
    pub total_compra: Decimal,
    pub descu: Decimal,
    pub total_descu: Decimal,
    pub sub_total: Decimal,
    pub iva_rete1: Decimal,
    pub rete_renta: Decimal,
    pub total_pagar: Decimal,
    pub total_letras: String,
    pub condicion_operacion: u8,
    pub pagos: Option<Vec<Pago>>,
    pub observaciones: Option<String>,
}

/// Tax-inclusive sale totals aggregated for a factura.
pub(crate) fn factura_resumen(
    items: &[CartItem],
    iva_rete1: Decimal,
    condicion_operacion: u8,
    pagos: Vec<Pago>,
) -> Result<FacturaResumen, DteError> {
    let gravada = round2(taxed_total(items));
    let exenta = round2(exempt_total(items));
    let no_suj = round2(non_subject_total(items));
    let no_gravado = round2(non_taxed_total(items));
    let iva_rete1 = round2(iva_rete1);

    let total_pagar = gravada + exenta + no_suj + no_gravado - iva_rete1;
    let total_letras = amount_in_words(total_pagar)?;

    Ok(FacturaResumen {
        total_no_suj: no_suj,
        total_exenta: exenta,
        total_gravada: gravada,
        sub_total_ventas: gravada,
        descu_no_suj: Decimal::ZERO,
        descu_exenta: Decimal::ZERO,
        descu_gravada: Decimal::ZERO,
        porcentaje_descuento: round2(
            discount_from_prices(total_without_discount(items), total(items)).percentage,
        ),
        total_descu: round2(discount_total(items)),
        tributos: None,
        sub_total: gravada,
        iva_rete1,
        rete_renta: Decimal::ZERO,
        total_iva: round2(crate::core::tax_extracted(items)),
        monto_total_operacion: gravada,
        total_no_gravado: no_gravado,
        total_pagar,
        total_letras,
        saldo_favor: Decimal::ZERO,
        condicion_operacion,
        pagos,
        num_pago_electronico: None,
    })
}

/// Shared fiscal aggregation: taxed amount comes from the mapped body lines,
/// never from the raw cart.
pub(crate) struct FiscalTotals {
    pub gravada: Decimal,
    pub iva: Decimal,
    pub monto_total: Decimal,
    pub rete_renta: Decimal,
}

pub(crate) fn fiscal_totals(lines: &[FiscalItem], renta_rate: Decimal) -> FiscalTotals {
    let gravada = round2(lines.iter().map(|l| l.venta_gravada).sum::<Decimal>());
    let iva = round2(gravada * IVA_RATE);
    let monto_total = gravada + iva;
    FiscalTotals {
        gravada,
        iva,
        monto_total,
        rete_renta: round2(income_tax_retention(renta_rate, monto_total)),
    }
}

pub(crate) fn fiscal_resumen(
    lines: &[FiscalItem],
    cart: &[CartItem],
    iva_retention: Decimal,
    renta_rate: Decimal,
    condicion_operacion: u8,
    pagos: Vec<Pago>,
) -> Result<FiscalResumen, DteError> {
    let totals = fiscal_totals(lines, renta_rate);
    let iva_rete1 = round2(iva_retention);
    let total_pagar = totals.monto_total - iva_rete1 - totals.rete_renta;
    let total_letras = amount_in_words(total_pagar)?;

    Ok(FiscalResumen {
        total_no_suj: Decimal::ZERO,
        total_exenta: Decimal::ZERO,
        total_gravada: totals.gravada,
        sub_total_ventas: totals.gravada,
        descu_no_suj: Decimal::ZERO,
        descu_exenta: Decimal::ZERO,
        descu_gravada: Decimal::ZERO,
        porcentaje_descuento: round2(
            discount_from_prices(total_without_discount(cart), totals.gravada).percentage,
        ),
        total_descu: round2(discount_total(cart)),
        tributos: vec![Tributo::iva(totals.iva)],
        sub_total: totals.gravada,
        iva_perci1: Decimal::ZERO,
        iva_rete1,
        rete_renta: totals.rete_renta,
        monto_total_operacion: totals.monto_total,
        total_no_gravado: Decimal::ZERO,
        total_pagar,
        total_letras,
        saldo_favor: Decimal::ZERO,
        condicion_operacion,
        pagos,
        num_pago_electronico: None,
    })
}

pub(crate) fn nota_resumen(
    lines: &[FiscalItem],
    cart: &[CartItem],
    iva_retention: Decimal,
    renta_rate: Decimal,
    condicion_operacion: u8,
) -> Result<NotaResumen, DteError> {
    let totals = fiscal_totals(lines, renta_rate);
    let iva_rete1 = round2(iva_retention);
    // Notas carry no totalPagar field; the letras render the operation total
    // net of retentions, same derivation as the fiscal resumen.
    let total_letras = amount_in_words(totals.monto_total - iva_rete1 - totals.rete_renta)?;

    Ok(NotaResumen {
        total_no_suj: Decimal::ZERO,
        total_exenta: Decimal::ZERO,
        total_gravada: totals.gravada,
        sub_total_ventas: totals.gravada,
        descu_no_suj: Decimal::ZERO,
        descu_exenta: Decimal::ZERO,
        descu_gravada: Decimal::ZERO,
        total_descu: round2(discount_total(cart)),
        tributos: vec![Tributo::iva(totals.iva)],
        sub_total: totals.gravada,
        iva_perci1: Decimal::ZERO,
        iva_rete1,
        rete_renta: totals.rete_renta,
        monto_total_operacion: totals.monto_total,
        total_letras,
        condicion_operacion,
    })
}

/// Excluded-subject aggregation: the fixed 10% renta retention on the
/// subtotal is the only deduction from the grand total.
pub(crate) fn fse_resumen(
    lines: &[FseBodyItem],
    observaciones: &str,
) -> Result<FseResumen, DteError> {
    let sub_total = round2(lines.iter().map(|l| l.compra).sum::<Decimal>());
    let rete_renta = round2(income_tax_retention(FSE_RETENTION_RATE, sub_total));
    let total_pagar = sub_total - rete_renta;
    let total_letras = amount_in_words(total_pagar)?;

    Ok(FseResumen {
        total_compra: sub_total,
        descu: Decimal::ZERO,
        total_descu: Decimal::ZERO,
        sub_total,
        iva_rete1: Decimal::ZERO,
        rete_renta,
        total_pagar,
        total_letras,
        condicion_operacion: 1,
        pagos: Some(vec![Pago {
            codigo: "01".into(),
            monto_pago: total_pagar,
            referencia: String::new(),
            plazo: None,
            periodo: None,
        }]),
        observaciones: crate::core::normalize_optional(observaciones),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn fse_retention_is_ten_percent_of_subtotal() {
        let lines = vec![FseBodyItem {
            num_item: 1,
            tipo_item: 1,
            cantidad: dec!(2),
            codigo: None,
            uni_medida: 59,
            descripcion: "Insumo".into(),
            precio_uni: dec!(50.00),
            monto_descu: dec!(0),
            compra: dec!(100.00),
        }];
        let resumen = fse_resumen(&lines, "").unwrap();
        assert_eq!(resumen.sub_total, dec!(100.00));
        assert_eq!(resumen.rete_renta, dec!(10.00));
        assert_eq!(resumen.total_pagar, dec!(90.00));
        assert_eq!(resumen.total_letras, "NOVENTA 00/100 DOLARES AMERICANOS");
        let pagos = resumen.pagos.unwrap();
        assert_eq!(pagos[0].monto_pago, dec!(90.00));
        assert_eq!(resumen.observaciones, None);
    }
}
