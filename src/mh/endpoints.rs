//! Ministerio de Hacienda service URLs.

use crate::core::Ambiente;

pub const MH_RECEPTION: &str = "https://api.dtes.mh.gob.sv/fesv/recepciondte";
pub const MH_RECEPTION_TEST: &str = "https://apitest.dtes.mh.gob.sv/fesv/recepciondte";

pub const MH_INVALIDATION: &str = "https://api.dtes.mh.gob.sv/fesv/anulardte";
pub const MH_INVALIDATION_TEST: &str = "https://apitest.dtes.mh.gob.sv/fesv/anulardte";

/// Status-check service. A single URL; the query itself carries no
/// environment flag.
pub const MH_CHECK: &str = "https://api.dtes.mh.gob.sv/fesv/recepcion/consultadte";

/// Reception endpoint for the given environment.
pub fn reception_url(ambiente: Ambiente) -> &'static str {
    match ambiente {
        Ambiente::Test => MH_RECEPTION_TEST,
        Ambiente::Production => MH_RECEPTION,
    }
}

/// Invalidation endpoint for the given environment.
pub fn invalidation_url(ambiente: Ambiente) -> &'static str {
    match ambiente {
        Ambiente::Test => MH_INVALIDATION_TEST,
        Ambiente::Production => MH_INVALIDATION,
    }
}
