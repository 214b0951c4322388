mod external_communications;
mod network_identifiers;
mod package_management;
mod process_spawning;
mod unsafe_inputs;

use super::PatternCategory;

/// Returns the built-in categories in matching order.
///
/// The broad free-text network matchers sit after the specific call
/// detectors; every category still reports independently on a line.
pub fn all_categories() -> Vec<PatternCategory> {
    vec![
        process_spawning::category(),
        external_communications::category(),
        package_management::category(),
        network_identifiers::category(),
        unsafe_inputs::category(),
    ]
}
