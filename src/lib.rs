//! # svfe
//!
//! El Salvador electronic invoicing (DTE) library: document assembly,
//! deterministic tax totals, signing, and transmission to the Ministerio
//! de Hacienda (MH).
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating point.
//! Wire types serialize to the exact Spanish camelCase field names the MH
//! JSON schema requires.
//!
//! ## Quick Start
//!
//! ```rust
//! use rust_decimal_macros::dec;
//! use svfe::core::*;
//! use svfe::dte::{self, Emission, PointOfSale, SalvadorClock, UuidGenerator};
//!
//! # fn demo(transmitter: Transmitter, pos: PointOfSale, customer: Customer, items: Vec<CartItem>) {
//! let emission = Emission {
//!     transmitter: &transmitter,
//!     point_of_sale: &pos,
//!     correlative: 42,
//!     ambiente: Ambiente::Test,
//!     condicion_operacion: 1,
//!     pagos: vec![],
//! };
//! let factura = dte::factura(&emission, &customer, &items, dec!(0),
//!     &UuidGenerator, &SalvadorClock).unwrap();
//! assert!(factura.identificacion.numero_control.starts_with("DTE-01-"));
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Tax arithmetic, document assembly, validation |
//! | `transmit` | Signing client, MH transmission, pipeline orchestrator |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod dte;

#[cfg(feature = "transmit")]
pub mod mh;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
