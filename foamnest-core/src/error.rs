//! Error types for the nesting engine.

use thiserror::Error;

/// Error codes for nesting failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Empty stock catalog (-1)
    EmptyStockCatalog = -1,
    /// Invalid configuration value (-2)
    InvalidConfig = -2,
    /// Invalid part or stock catalog entry (-3)
    InvalidCatalog = -3,
    /// Placement overlap or out-of-bounds detected after packing (E100)
    LayoutInvariant = 100,
}

/// Main error type for the nesting engine.
///
/// Per-part infeasibility (a part too thick to laminate, or too large for
/// any sheet) is NOT an error variant: it is collected into the placement
/// report's unplaced list so the run can complete for the other parts.
#[derive(Debug, Error)]
pub enum NestError {
    #[error("Stock catalog is empty")]
    EmptyStockCatalog,

    #[error("Minimum part spacing must not be negative, got {value}")]
    NegativeSpacing { value: f64 },

    #[error("Sheet margin must not be negative, got {value}")]
    NegativeMargin { value: f64 },

    #[error("Lamination layer cap must be at least 1, got {value}")]
    InvalidMaxLayers { value: u32 },

    #[error("Stock class '{name}': invalid dimensions ({width} x {height} x {thickness})")]
    InvalidStockDimensions {
        name: String,
        width: f64,
        height: f64,
        thickness: f64,
    },

    #[error("Part '{id}': invalid dimensions ({width} x {height} x {depth})")]
    InvalidPartDimensions {
        id: String,
        width: f64,
        height: f64,
        depth: f64,
    },

    #[error("Duplicate part id '{id}'")]
    DuplicatePartId { id: String },

    #[error("Layout invariant violated on sheet {sheet}: {message}")]
    LayoutInvariant { sheet: usize, message: String },
}

impl NestError {
    /// Get the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            NestError::EmptyStockCatalog => ErrorCode::EmptyStockCatalog,
            NestError::NegativeSpacing { .. } => ErrorCode::InvalidConfig,
            NestError::NegativeMargin { .. } => ErrorCode::InvalidConfig,
            NestError::InvalidMaxLayers { .. } => ErrorCode::InvalidConfig,
            NestError::InvalidStockDimensions { .. } => ErrorCode::InvalidCatalog,
            NestError::InvalidPartDimensions { .. } => ErrorCode::InvalidCatalog,
            NestError::DuplicatePartId { .. } => ErrorCode::InvalidCatalog,
            NestError::LayoutInvariant { .. } => ErrorCode::LayoutInvariant,
        }
    }

    /// Get the numeric error code value.
    pub fn code_value(&self) -> i32 {
        self.code() as i32
    }
}

/// Result type alias for nesting operations.
pub type Result<T> = std::result::Result<T, NestError>;
