//! Result and error types for Fingir.

use thiserror::Error;

/// Result type for Fingir operations
pub type FingirResult<T> = Result<T, FingirError>;

/// Errors that can occur while resolving a stubbed call.
///
/// Neither variant should ever propagate to production code paths; they exist
/// solely for test compilation units, where both indicate a defect in the
/// test's mock setup rather than in the system under test.
#[derive(Debug, Error)]
pub enum FingirError {
    /// No registered stub pattern matches a recorded interaction
    #[error("no stub registered for call: {interaction}")]
    UnstubbedCall {
        /// Rendered recorded interaction
        interaction: String,
    },

    /// A stored closure's erased type could not be cast back to the
    /// expected argument/return shape at resolution time
    #[error("stubbed closure signature mismatch for call: {interaction}")]
    SignatureMismatch {
        /// Rendered recorded interaction
        interaction: String,
    },
}
