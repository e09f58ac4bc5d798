use std::fmt::{Display, Formatter};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::error::Result;

/// Copy of one priority level
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelSnapshot<T> {
    pub priority: usize,
    pub items: Vec<T>,
}

/// Point-in-time copy of a whole queue, taken under one lock acquisition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueueSnapshot<T> {
    pub priority_count: usize,
    /// Cursor value at the time of the copy; `priority_count + 1` means nothing known yet.
    pub head_priority: usize,
    pub count: usize,
    pub levels: Vec<LevelSnapshot<T>>,
}

impl<T> QueueSnapshot<T> {
    /// Items at `priority`, or an empty slice for a level that does not exist
    pub fn level(&self, priority: usize) -> &[T] {
        self.levels
            .iter()
            .find(|level| level.priority == priority)
            .map(|level| level.items.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Items in the order they would be dequeued
    pub fn drain_order(&self) -> impl Iterator<Item = &T> {
        self.levels.iter().flat_map(|level| level.items.iter())
    }
}

impl<T: Serialize> QueueSnapshot<T> {
    /// One compact JSON object, no trailing newline
    pub fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<T: std::fmt::Debug> Display for QueueSnapshot<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "QueueSnapshot {{ priority_count: {}, head_priority: {}, count: {}",
            self.priority_count, self.head_priority, self.count,
        )?;
        for level in self.levels.iter().filter(|level| !level.items.is_empty()) {
            write!(f, ", p{}: {:?}", level.priority, level.items)?;
        }
        write!(f, " }}")
    }
}

/// Append snapshots to `path` as NDJSON, creating the file if needed.
pub fn append_snapshots<T: Serialize>(snapshots: &[QueueSnapshot<T>], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut file = OpenOptions::new().append(true).create(true).open(path)?;

    for snapshot in snapshots {
        let json = snapshot.to_json_line()?;
        writeln!(file, "{json}")?; // one JSON object per line
    }

    debug!(path = %path.display(), snapshots = snapshots.len(), "appended queue snapshots");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> QueueSnapshot<u32> {
        QueueSnapshot {
            priority_count: 3,
            head_priority: 2,
            count: 3,
            levels: vec![
                LevelSnapshot { priority: 1, items: vec![] },
                LevelSnapshot { priority: 2, items: vec![7, 8] },
                LevelSnapshot { priority: 3, items: vec![9] },
            ],
        }
    }

    #[test]
    fn level_lookup() {
        let snap = sample();
        assert_eq!(snap.level(2), &[7, 8]);
        assert!(snap.level(1).is_empty());
        assert!(snap.level(42).is_empty());
    }

    #[test]
    fn drain_order_walks_levels_ascending() {
        let order: Vec<u32> = sample().drain_order().copied().collect();
        assert_eq!(order, vec![7, 8, 9]);
    }

    #[test]
    fn json_line_has_no_newline_and_parses_back() {
        let snap = sample();
        let line = snap.to_json_line().unwrap();
        assert!(!line.contains('\n'));
        let back: QueueSnapshot<u32> = serde_json::from_str(&line).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn display_skips_empty_levels() {
        let text = sample().to_string();
        assert!(text.contains("p2: [7, 8]"));
        assert!(!text.contains("p1:"));
    }
}
