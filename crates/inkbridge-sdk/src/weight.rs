//! Gas (weight) estimation

use inkbridge_primitives::Weight;

use crate::config::WeightConfig;

/// Weight limit for one contract call.
///
/// Returns the configured conservative bound; no dry-run is performed.
pub fn estimate_weight(config: &WeightConfig) -> Weight {
    Weight::from_parts(config.ref_time, config.proof_size)
}
