//! Shared types used across the Delta-Notch crates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Simulation time, in hours.
pub type SimTime = f64;

/// Unique identifier for a cell in the population.
///
/// Assigned by the population at creation and never reused while the cell
/// is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(pub u64);

impl CellId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell-{}", self.0)
    }
}

/// Delta phenotype of a cell.
///
/// Exactly one variant holds at any time, so a cell can never be Delta-high
/// and Delta-low at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phenotype {
    /// Delta level in the intermediate band.
    #[default]
    None,
    /// Delta level below the low threshold.
    Low,
    /// Delta level above the high threshold.
    High,
}

impl Phenotype {
    /// Integer code used by reporting and visualization consumers.
    pub fn code(&self) -> u8 {
        match self {
            Phenotype::None => 0,
            Phenotype::Low => 1,
            Phenotype::High => 2,
        }
    }

    /// Inverse of [`Phenotype::code`].
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Phenotype::None),
            1 => Some(Phenotype::Low),
            2 => Some(Phenotype::High),
            _ => None,
        }
    }

    /// Visualizer colour index. Unlabelled cells use 0.
    pub fn colour(&self) -> u32 {
        match self {
            Phenotype::None => 0,
            Phenotype::Low => 32,
            Phenotype::High => 31,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phenotype::None => "none",
            Phenotype::Low => "delta-low",
            Phenotype::High => "delta-high",
        }
    }
}

impl fmt::Display for Phenotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether a cell is currently allowed to divide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProliferativeCapability {
    Proliferative,
    #[default]
    Differentiated,
}

impl ProliferativeCapability {
    pub fn is_proliferative(&self) -> bool {
        matches!(self, ProliferativeCapability::Proliferative)
    }
}

impl fmt::Display for ProliferativeCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProliferativeCapability::Proliferative => f.write_str("proliferative"),
            ProliferativeCapability::Differentiated => f.write_str("differentiated"),
        }
    }
}

/// Result of classifying a Delta level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub phenotype: Phenotype,
    pub capability: ProliferativeCapability,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phenotype_codes_match_reporting_convention() {
        assert_eq!(Phenotype::None.code(), 0);
        assert_eq!(Phenotype::Low.code(), 1);
        assert_eq!(Phenotype::High.code(), 2);
        assert_eq!(Phenotype::from_code(2), Some(Phenotype::High));
        assert_eq!(Phenotype::from_code(3), None);
    }

    #[test]
    fn new_cells_default_to_unlabelled_and_differentiated() {
        assert_eq!(Phenotype::default(), Phenotype::None);
        assert_eq!(
            ProliferativeCapability::default(),
            ProliferativeCapability::Differentiated
        );
    }

    #[test]
    fn cell_id_display() {
        assert_eq!(CellId::new(7).to_string(), "cell-7");
    }
}
