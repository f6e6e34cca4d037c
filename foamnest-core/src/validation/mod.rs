//! Input validation and post-hoc layout checks.

mod validate;

pub use validate::{validate_inputs, validate_layout, ValidationResult};
