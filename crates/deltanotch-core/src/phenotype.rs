//! Phenotype classification from the Delta signalling level.
//!
//! Lateral inhibition drives neighbouring cells towards opposite Delta
//! levels. Cells that end up Delta-high keep proliferating; every other cell
//! stops dividing. The bands are evaluated fresh on every call with no
//! memory of the previous label, so a cell whose Delta hovers around a
//! threshold can change phenotype every step.

use crate::types::{Classification, Phenotype, ProliferativeCapability};

/// Cell data key holding the Delta concentration.
pub const DELTA_KEY: &str = "delta";

/// Delta above this level is Delta-high.
pub const HIGH_DELTA_THRESHOLD: f64 = 0.6;

/// Delta below this level is Delta-low.
pub const LOW_DELTA_THRESHOLD: f64 = 0.2;

/// Classify a Delta level into a phenotype and proliferative capability.
///
/// | Delta            | Phenotype | Capability     |
/// |------------------|-----------|----------------|
/// | `> 0.6`          | High      | Proliferative  |
/// | `< 0.2`          | Low       | Differentiated |
/// | `[0.2, 0.6]`     | None      | Differentiated |
///
/// NaN satisfies neither bound and lands in the intermediate band.
pub fn classify(delta: f64) -> Classification {
    if delta > HIGH_DELTA_THRESHOLD {
        Classification {
            phenotype: Phenotype::High,
            capability: ProliferativeCapability::Proliferative,
        }
    } else if delta < LOW_DELTA_THRESHOLD {
        Classification {
            phenotype: Phenotype::Low,
            capability: ProliferativeCapability::Differentiated,
        }
    } else {
        Classification {
            phenotype: Phenotype::None,
            capability: ProliferativeCapability::Differentiated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn thresholds_are_exclusive_bounds() {
        assert_eq!(classify(0.6).phenotype, Phenotype::None);
        assert_eq!(classify(0.2).phenotype, Phenotype::None);
        assert_eq!(classify(0.600_000_1).phenotype, Phenotype::High);
        assert_eq!(classify(0.199_999_9).phenotype, Phenotype::Low);
    }

    #[test]
    fn nan_is_intermediate() {
        let c = classify(f64::NAN);
        assert_eq!(c.phenotype, Phenotype::None);
        assert_eq!(c.capability, ProliferativeCapability::Differentiated);
    }

    #[test]
    fn flicker_sequence_flips_every_step() {
        let phenotypes: Vec<Phenotype> = [0.65, 0.15, 0.65]
            .iter()
            .map(|&d| classify(d).phenotype)
            .collect();
        assert_eq!(
            phenotypes,
            vec![Phenotype::High, Phenotype::Low, Phenotype::High]
        );
    }

    proptest! {
        #[test]
        fn high_band_is_proliferative(delta in 0.600_000_1f64..1.0e3) {
            let c = classify(delta);
            prop_assert_eq!(c.phenotype, Phenotype::High);
            prop_assert_eq!(c.capability, ProliferativeCapability::Proliferative);
        }

        #[test]
        fn low_band_is_differentiated(delta in -1.0e3f64..0.199_999_9) {
            let c = classify(delta);
            prop_assert_eq!(c.phenotype, Phenotype::Low);
            prop_assert_eq!(c.capability, ProliferativeCapability::Differentiated);
        }

        #[test]
        fn intermediate_band_is_unlabelled(delta in 0.2f64..=0.6) {
            let c = classify(delta);
            prop_assert_eq!(c.phenotype, Phenotype::None);
            prop_assert_eq!(c.capability, ProliferativeCapability::Differentiated);
        }

        #[test]
        fn classification_is_idempotent(delta in proptest::num::f64::ANY) {
            prop_assert_eq!(classify(delta), classify(delta));
        }
    }
}
