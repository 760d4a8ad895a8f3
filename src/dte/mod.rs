//! Document assembly — one construction function per DTE kind.
//!
//! Each builder validates its inputs, derives the resumen through the tax
//! arithmetic engine in [`crate::core`], and returns the exact nested wire
//! structure the MH schema requires for that document type.

mod anexos;
mod cuerpo;
mod envelope;
mod factura;
mod fiscal;
mod identificacion;
mod invalidacion;
mod parties;
mod resumen;
mod sujeto_excluido;

pub use anexos::*;
pub use cuerpo::{FacturaItem, FiscalItem, FseBodyItem};
pub use envelope::SignRequest;
pub use factura::{Factura, factura};
pub use fiscal::{
    FiscalDocumento, FiscalOptions, Nota, credito_fiscal, nota_credito, nota_debito,
};
pub use identificacion::{
    Clock, CodeGenerator, EmissionDateTime, Identificacion, SalvadorClock, UuidGenerator,
    control_number,
};
pub use invalidacion::{
    Invalidacion, InvalidationReason, InvalidationRequest, SaleReference, invalidacion,
};
pub use parties::{Emisor, EmisorFse, Emission, PointOfSale, Receptor, SujetoExcluido};
pub use resumen::{FacturaResumen, FiscalResumen, FseResumen, NotaResumen};
pub use sujeto_excluido::{FacturaSujetoExcluido, sujeto_excluido};
