//! Common data types for NextStat combine

use serde::{Deserialize, Serialize};

/// Negative bin content handling when a process takes ownership of a shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeBinPolicy {
    /// Keep negative bins as-is (logged at warn level).
    #[default]
    Allow,
    /// Reject the shape on the first negative bin encountered.
    Error,
}

impl NegativeBinPolicy {
    /// Whether a shape with negative bins must be rejected.
    pub fn rejects_negative(self) -> bool {
        matches!(self, NegativeBinPolicy::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allows_negative() {
        assert_eq!(NegativeBinPolicy::default(), NegativeBinPolicy::Allow);
        assert!(!NegativeBinPolicy::Allow.rejects_negative());
        assert!(NegativeBinPolicy::Error.rejects_negative());
    }

    #[test]
    fn test_serde_snake_case() {
        let s = serde_json::to_string(&NegativeBinPolicy::Error).unwrap();
        assert_eq!(s, "\"error\"");
        let p: NegativeBinPolicy = serde_json::from_str("\"allow\"").unwrap();
        assert_eq!(p, NegativeBinPolicy::Allow);
    }
}
