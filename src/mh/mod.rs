//! Signing and transmission against the Ministerio de Hacienda services.
//!
//! Enabled by the `transmit` feature. [`pipeline::Dispatcher`] is the
//! high-level entry point; the per-stage clients live in [`firmador`] and
//! [`transmision`].

pub mod endpoints;
pub mod firmador;
pub mod outcome;
pub mod pipeline;
pub mod transmision;

pub use endpoints::{invalidation_url, reception_url};
pub use firmador::{SignError, sign_document};
pub use outcome::{AuthorityOutcome, classify};
pub use pipeline::{Dispatch, Dispatcher, DteFirmado, TimeoutPolicy};
pub use transmision::{
    CheckError, CheckPayload, InvalidationPayload, PayloadMh, check_dte,
    send_invalidation_to_mh, send_to_mh,
};
