use rust_decimal::Decimal;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Environment flag ("ambiente") selecting the test or production member of
/// every MH endpoint pair. Serialized as the schema code (`"00"` / `"01"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ambiente {
    /// "00" — pruebas.
    Test,
    /// "01" — producción.
    Production,
}

impl Ambiente {
    /// Schema code for this environment.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Test => "00",
            Self::Production => "01",
        }
    }

    /// `"00"` selects the test environment; any other value is production.
    /// This mapping is applied uniformly to every endpoint pair.
    pub fn from_code(code: &str) -> Self {
        if code == "00" { Self::Test } else { Self::Production }
    }
}

impl Serialize for Ambiente {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Ambiente {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Self::from_code(&code))
    }
}

/// DTE document-type codes ("tipoDte"). Serialized as the two-digit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DteType {
    /// 01 — Factura electrónica de venta.
    Factura,
    /// 03 — Comprobante de crédito fiscal.
    CreditoFiscal,
    /// 05 — Nota de crédito.
    NotaCredito,
    /// 06 — Nota de débito.
    NotaDebito,
    /// 14 — Factura de sujeto excluido.
    SujetoExcluido,
}

impl DteType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Factura => "01",
            Self::CreditoFiscal => "03",
            Self::NotaCredito => "05",
            Self::NotaDebito => "06",
            Self::SujetoExcluido => "14",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "01" => Some(Self::Factura),
            "03" => Some(Self::CreditoFiscal),
            "05" => Some(Self::NotaCredito),
            "06" => Some(Self::NotaDebito),
            "14" => Some(Self::SujetoExcluido),
            _ => None,
        }
    }

    /// Schema version carried in the identificación block and the MH payload.
    pub fn schema_version(&self) -> u8 {
        match self {
            Self::Factura | Self::SujetoExcluido => 1,
            Self::CreditoFiscal | Self::NotaCredito | Self::NotaDebito => 3,
        }
    }
}

impl Serialize for DteType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for DteType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Self::from_code(&code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown tipoDte code '{code}'")))
    }
}

/// Postal address as the schema carries it on every party block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Departamento code (e.g. "06" for San Salvador).
    pub departamento: String,
    /// Municipio code within the departamento.
    pub municipio: String,
    /// Free-text address line.
    pub complemento: String,
}

/// Issuer identity, supplied entirely by the caller per invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transmitter {
    /// Tax ID (NIT).
    pub nit: String,
    /// Registry number (NRC).
    pub nrc: String,
    /// Legal name.
    pub nombre: String,
    /// Commercial name.
    pub nombre_comercial: String,
    /// Economic-activity code.
    pub cod_actividad: String,
    /// Economic-activity description.
    pub desc_actividad: String,
    pub direccion: Address,
    pub telefono: String,
    pub correo: String,
    /// Private signing key forwarded to the firmador service.
    pub clave_privada: String,
    /// API key for the MH services.
    pub clave_api: String,
}

/// Counterparty identity. A customer whose NRC parses to a non-zero number is
/// treated as a tax-credit-eligible entity during receptor mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub nombre: String,
    pub nombre_comercial: String,
    pub nrc: String,
    pub nit: String,
    pub tipo_documento: String,
    pub num_documento: String,
    pub cod_actividad: String,
    pub desc_actividad: String,
    pub telefono: String,
    pub correo: String,
    pub direccion: Address,
}

/// One sale line. Read-only input; all totals aggregate over these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_name: String,
    pub product_code: String,
    /// Item-type code (1 bien, 2 servicio, ...).
    pub tipo_item: u8,
    /// Unit-of-measure code.
    pub uni_medida: u16,
    pub quantity: Decimal,
    /// Effective sale price per unit.
    pub price: Decimal,
    /// Catalog floor price; a sale price below it means a discount was applied.
    pub base_price: Decimal,
    /// Per-unit discount amount.
    pub discount_amount: Decimal,
    pub discount_percentage: Decimal,
    /// Pre-classified per-line totals.
    pub non_subject_total: Decimal,
    pub exempt_total: Decimal,
    pub taxed_total: Decimal,
    pub non_taxed: Decimal,
}

/// One purchase line of an excluded-subject document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FseItem {
    pub tipo_item: u8,
    pub cantidad: Decimal,
    pub codigo: String,
    pub uni_medida: u16,
    pub descripcion: String,
    pub precio_uni: Decimal,
    pub monto_descu: Decimal,
}

/// Payment entry of a resumen block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pago {
    /// Payment-means code (e.g. "01" cash).
    pub codigo: String,
    pub monto_pago: Decimal,
    pub referencia: String,
    pub plazo: Option<String>,
    pub periodo: Option<u32>,
}

/// Authority response shape. Every pipeline exit path produces one of these,
/// fully populated — failures are degraded into substitute instances rather
/// than surfaced as raw transport errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespuestaMh {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub ambiente: String,
    #[serde(default)]
    pub version_app: u32,
    #[serde(default)]
    pub estado: String,
    #[serde(default)]
    pub codigo_generacion: String,
    #[serde(default)]
    pub sello_recibido: Option<String>,
    #[serde(default)]
    pub fh_procesamiento: String,
    #[serde(default)]
    pub clasifica_msg: Option<String>,
    #[serde(default)]
    pub codigo_msg: String,
    #[serde(default)]
    pub descripcion_msg: String,
    #[serde(default)]
    pub observaciones: Vec<String>,
}

/// Authority status strings the pipeline recognizes.
pub const ESTADO_PROCESADO: &str = "PROCESADO";
pub const ESTADO_RECHAZADO: &str = "RECHAZADO";
