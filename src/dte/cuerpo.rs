//! Line-item mappers: cart products into the per-kind cuerpoDocumento shapes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{CartItem, FseItem, IVA_DIVISOR, iva_portion, normalize_optional, round2};

/// Factura (01) body line. Carries the per-line IVA extracted from the
/// tax-inclusive taxed amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacturaItem {
    pub num_item: u32,
    pub tipo_item: u8,
    pub uni_medida: u16,
    pub numero_documento: Option<String>,
    pub cantidad: Decimal,
    pub codigo: Option<String>,
    pub cod_tributo: Option<String>,
    pub descripcion: String,
    pub precio_uni: Decimal,
    pub monto_descu: Decimal,
    pub venta_no_suj: Decimal,
    pub venta_exenta: Decimal,
    pub venta_gravada: Decimal,
    pub iva_item: Decimal,
    pub tributos: Option<Vec<String>>,
    pub psv: Decimal,
    pub no_gravado: Decimal,
}

/// Fiscal (03/05/06) body line. No per-line IVA; the tax rides in the
/// resumen tributos list instead, so every line declares tributo "20".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiscalItem {
    pub num_item: u32,
    pub tipo_item: u8,
    pub uni_medida: u16,
    pub numero_documento: Option<String>,
    pub cantidad: Decimal,
    pub codigo: Option<String>,
    pub cod_tributo: Option<String>,
    pub descripcion: String,
    pub precio_uni: Decimal,
    pub monto_descu: Decimal,
    pub venta_no_suj: Decimal,
    pub venta_exenta: Decimal,
    pub venta_gravada: Decimal,
    pub tributos: Option<Vec<String>>,
    pub psv: Decimal,
    pub no_gravado: Decimal,
}

/// Excluded-subject (14) body line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FseBodyItem {
    pub num_item: u32,
    pub tipo_item: u8,
    pub cantidad: Decimal,
    pub codigo: Option<String>,
    pub uni_medida: u16,
    pub descripcion: String,
    pub precio_uni: Decimal,
    pub monto_descu: Decimal,
    pub compra: Decimal,
}

/// Map cart products to factura body lines. Items are numbered from 1;
/// the per-line IVA is extracted from the taxed amount at the fixed 13%
/// inclusive rate.
pub(crate) fn factura_items(items: &[CartItem]) -> Vec<FacturaItem> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| FacturaItem {
            num_item: index as u32 + 1,
            tipo_item: item.tipo_item,
            uni_medida: item.uni_medida,
            numero_documento: None,
            cantidad: item.quantity,
            codigo: normalize_optional(&item.product_code),
            cod_tributo: None,
            descripcion: item.product_name.clone(),
            precio_uni: round2(item.price),
            monto_descu: item.discount_amount,
            venta_no_suj: item.non_subject_total,
            venta_exenta: item.exempt_total,
            venta_gravada: item.taxed_total,
            iva_item: round2(iva_portion(item.taxed_total)),
            tributos: None,
            psv: Decimal::ZERO,
            no_gravado: item.non_taxed,
        })
        .collect()
}

/// Map cart products to fiscal body lines. With `price_includes_iva` the
/// embedded 13% is stripped from the unit price before the taxed amount is
/// computed, so the tax rides only in the resumen tributo.
pub(crate) fn fiscal_items(price_includes_iva: bool, items: &[CartItem]) -> Vec<FiscalItem> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let price = if price_includes_iva {
                round2(item.price / IVA_DIVISOR)
            } else {
                round2(item.price)
            };
            FiscalItem {
                num_item: index as u32 + 1,
                tipo_item: item.tipo_item,
                uni_medida: item.uni_medida,
                numero_documento: None,
                cantidad: item.quantity,
                codigo: normalize_optional(&item.product_code),
                cod_tributo: None,
                descripcion: item.product_name.clone(),
                precio_uni: price,
                monto_descu: round2(item.discount_amount * item.quantity),
                venta_no_suj: Decimal::ZERO,
                venta_exenta: Decimal::ZERO,
                venta_gravada: round2(price * item.quantity),
                tributos: Some(vec!["20".into()]),
                psv: Decimal::ZERO,
                no_gravado: item.non_taxed,
            }
        })
        .collect()
}

/// Map purchase lines to the excluded-subject body.
pub(crate) fn fse_items(items: &[FseItem]) -> Vec<FseBodyItem> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| FseBodyItem {
            num_item: index as u32 + 1,
            tipo_item: item.tipo_item,
            cantidad: item.cantidad,
            codigo: normalize_optional(&item.codigo),
            uni_medida: item.uni_medida,
            descripcion: item.descripcion.clone(),
            precio_uni: round2(item.precio_uni),
            monto_descu: round2(item.monto_descu),
            compra: round2(item.precio_uni * item.cantidad),
        })
        .collect()
}
