//! Error types for NextStat combine

use thiserror::Error;

/// NextStat combine error type
#[derive(Error, Debug)]
pub enum Error {
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A concrete histogram was requested but there is neither a shape nor a dataset to build one from
    #[error("Missing shape: {0}")]
    MissingShape(String),

    /// A histogram handed over by an external subsystem has no supported concrete representation
    #[error("Unsupported histogram type: {0}")]
    UnsupportedHistogramType(String),

    /// Allocating storage for a histogram copy failed
    #[error("Allocation failure: {0}")]
    Allocation(String),

    /// Shape rejected before ownership was taken (e.g. negative bins)
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    /// Handle does not resolve in the arena it is looked up in
    #[error("Dangling handle: {0}")]
    DanglingHandle(String),
}

impl From<std::collections::TryReserveError> for Error {
    fn from(e: std::collections::TryReserveError) -> Self {
        Error::Allocation(e.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let e = Error::MissingShape("process ttbar".into());
        assert_eq!(e.to_string(), "Missing shape: process ttbar");
        let e = Error::UnsupportedHistogramType("TH2F".into());
        assert_eq!(e.to_string(), "Unsupported histogram type: TH2F");
    }

    #[test]
    fn test_try_reserve_maps_to_allocation() {
        let mut v: Vec<f64> = Vec::new();
        let err = v.try_reserve_exact(usize::MAX).unwrap_err();
        let e: Error = err.into();
        assert!(matches!(e, Error::Allocation(_)));
    }
}
