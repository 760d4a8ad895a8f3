//! Core types, tax arithmetic, normalization, and validation.
//!
//! Everything in this module is pure: no network, no clock, no identifiers.
//! The assembly layer in [`crate::dte`] builds on these pieces.

mod amounts;
mod error;
mod letras;
mod normalize;
mod types;
mod validation;

pub use amounts::*;
pub use error::*;
pub use letras::amount_in_words;
pub use normalize::{normalize_optional, pad_correlative, with_dash};
pub use types::*;
pub use validation::*;
