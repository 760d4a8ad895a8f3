//! The identificación block shared by every document kind, plus the two
//! collaborators it depends on: an identifier generator and a clock.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{Ambiente, DteType, pad_correlative};

use super::parties::PointOfSale;

/// Generates the random document identifier ("codigoGeneracion").
/// The assembler upper-cases whatever this returns.
pub trait CodeGenerator {
    fn generate(&self) -> String;
}

/// Default generator: random UUID v4.
pub struct UuidGenerator;

impl CodeGenerator for UuidGenerator {
    fn generate(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Emission date and time in the issuer's local calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmissionDateTime {
    /// `YYYY-MM-DD`.
    pub fec_emi: String,
    /// `HH:MM:SS`, 24-hour.
    pub hor_emi: String,
}

/// Current date/time source in the issuer's local timezone.
pub trait Clock {
    fn now(&self) -> EmissionDateTime;
}

/// El Salvador local time. The country is UTC−6 year-round (no DST), so a
/// fixed offset from UTC is exact.
pub struct SalvadorClock;

impl Clock for SalvadorClock {
    fn now(&self) -> EmissionDateTime {
        let local = Utc::now() - Duration::hours(6);
        EmissionDateTime {
            fec_emi: local.format("%Y-%m-%d").to_string(),
            hor_emi: local.format("%H:%M:%S").to_string(),
        }
    }
}

/// Control number: `DTE-{tipoDte}-{codEstable}{codPuntoVenta}-{correlative}`
/// with the correlative zero-padded to 15 digits.
pub fn control_number(
    tipo: DteType,
    cod_estable: &str,
    cod_punto_venta: &str,
    correlative: u64,
) -> String {
    format!(
        "DTE-{}-{}{}-{}",
        tipo.code(),
        cod_estable,
        cod_punto_venta,
        pad_correlative(correlative)
    )
}

/// Identificación block common to the five sale document kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identificacion {
    pub version: u8,
    pub ambiente: Ambiente,
    pub tipo_dte: DteType,
    pub numero_control: String,
    pub codigo_generacion: String,
    pub tipo_modelo: u8,
    pub tipo_operacion: u8,
    pub tipo_contingencia: Option<u8>,
    pub motivo_contin: Option<String>,
    pub fec_emi: String,
    pub hor_emi: String,
    pub tipo_moneda: String,
}

impl Identificacion {
    /// Fresh identificación for one assembly call: a newly generated
    /// upper-cased identifier, the derived control number, and the current
    /// local date/time. Model and operation types are fixed at 1 (normal
    /// transmission, no contingency).
    pub(crate) fn new(
        tipo: DteType,
        ambiente: Ambiente,
        pos: &PointOfSale,
        correlative: u64,
        generator: &dyn CodeGenerator,
        clock: &dyn Clock,
    ) -> Self {
        let emitted = clock.now();
        Self {
            version: tipo.schema_version(),
            ambiente,
            tipo_dte: tipo,
            numero_control: control_number(tipo, &pos.cod_estable, &pos.cod_punto_venta, correlative),
            codigo_generacion: generator.generate().to_uppercase(),
            tipo_modelo: 1,
            tipo_operacion: 1,
            tipo_contingencia: None,
            motivo_contin: None,
            fec_emi: emitted.fec_emi,
            hor_emi: emitted.hor_emi,
            tipo_moneda: "USD".into(),
        }
    }
}
