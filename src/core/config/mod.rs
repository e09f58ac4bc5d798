use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;

/// Fewest priority levels a queue will have.
pub const MIN_PRIORITIES: i32 = 3;
/// Most priority levels a queue will have.
pub const MAX_PRIORITIES: i32 = 99;
/// Level count used when nothing else is said.
pub const DEFAULT_PRIORITY_COUNT: i32 = 3;
/// Level used by `enqueue_default` when nothing else is said.
pub const DEFAULT_PRIORITY: i32 = 2;

/// Construction parameters for a `PriorityQueue`.
///
/// Values are taken as given here and clamped when the queue is built,
/// never rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    pub priority_count: i32,
    pub default_priority: i32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            priority_count: DEFAULT_PRIORITY_COUNT,
            default_priority: DEFAULT_PRIORITY,
        }
    }
}

impl QueueConfig {
    pub fn new(priority_count: i32) -> Self {
        Self { priority_count, ..Self::default() }
    }

    /// Parse from a JSON document; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Level count after clamping to `[MIN_PRIORITIES, MAX_PRIORITIES]`
    pub fn clamped_priority_count(&self) -> usize {
        self.priority_count.clamp(MIN_PRIORITIES, MAX_PRIORITIES) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::QueueError;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = QueueConfig::from_json_str(r#"{"priority_count": 10}"#).unwrap();
        assert_eq!(cfg.priority_count, 10);
        assert_eq!(cfg.default_priority, DEFAULT_PRIORITY);

        let empty = QueueConfig::from_json_str("{}").unwrap();
        assert_eq!(empty, QueueConfig::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = QueueConfig::from_json_str("{priority_count:").unwrap_err();
        assert!(matches!(err, QueueError::Json(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = QueueConfig::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, QueueError::Io(_)));
    }

    #[test]
    fn priority_count_is_clamped() {
        assert_eq!(QueueConfig::new(-4).clamped_priority_count(), 3);
        assert_eq!(QueueConfig::new(0).clamped_priority_count(), 3);
        assert_eq!(QueueConfig::new(42).clamped_priority_count(), 42);
        assert_eq!(QueueConfig::new(1000).clamped_priority_count(), 99);
    }
}
