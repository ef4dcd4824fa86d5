//! Error types for Delta-Notch operations.
//!
//! Both error classes are fatal for the current step: they indicate a
//! misconfigured run or broken upstream wiring, never a transient condition.

use crate::types::CellId;
use thiserror::Error;

/// Result type for Delta-Notch operations.
pub type Result<T> = std::result::Result<T, DeltaError>;

/// Errors that can occur while classifying cells or computing target areas.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeltaError {
    /// Configuration errors.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    /// Missing or inconsistent per-cell data.
    #[error("Data error: {0}")]
    Data(#[from] DataError),
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A coefficient or duration was negative.
    #[error("{parameter} must be non-negative, got {value}")]
    Negative { parameter: &'static str, value: f64 },
    /// Growth duration is unset and the cell's cycle model exposes no G1 phase.
    #[error(
        "{cell}: growth duration is unset and its cell-cycle model is not phase based; \
         set a growth duration or use a phase-based model"
    )]
    NotPhaseBased { cell: CellId },
    /// Invalid value.
    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Per-cell data errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    /// A named item was not present in the cell's data.
    #[error("{cell} has no \"{key}\" item in its cell data")]
    MissingItem { cell: CellId, key: String },
    /// A cell id did not refer to a live cell.
    #[error("Unknown cell: {0}")]
    UnknownCell(CellId),
}

// Convenience constructors
impl DeltaError {
    pub fn negative(parameter: &'static str, value: f64) -> Self {
        DeltaError::Config(ConfigError::Negative { parameter, value })
    }

    pub fn not_phase_based(cell: CellId) -> Self {
        DeltaError::Config(ConfigError::NotPhaseBased { cell })
    }

    pub fn missing_item(cell: CellId, key: impl Into<String>) -> Self {
        DeltaError::Data(DataError::MissingItem {
            cell,
            key: key.into(),
        })
    }

    pub fn invalid_config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        DeltaError::Config(ConfigError::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        })
    }

    /// Whether this is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self, DeltaError::Config(_))
    }
}

/// Reject negative (or NaN) parameter values.
pub fn ensure_non_negative(parameter: &'static str, value: f64) -> Result<f64> {
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(DeltaError::negative(parameter, value))
    }
}
