use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace};

use crate::core::bucket::Bucket;
use crate::core::config::{QueueConfig, DEFAULT_PRIORITY_COUNT};
use crate::core::snapshot::{LevelSnapshot, QueueSnapshot};

/// Everything the lock guards: the levels and the head cursor.
struct Levels<T> {
    /// `buckets[p - 1]` holds priority level `p`.
    buckets: Vec<Bucket<T>>,
    /// Lowest level not known to be empty. Every level below it is empty;
    /// `buckets.len() + 1` means nothing is known yet.
    head_priority: usize,
}

impl<T> Levels<T> {
    fn new(priority_count: usize) -> Self {
        Self {
            buckets: (0..priority_count).map(|_| Bucket::new()).collect(),
            head_priority: priority_count + 1,
        }
    }

    /// Buckets from the cursor to the last level, in ascending priority order.
    fn live(&self) -> &[Bucket<T>] {
        let start = (self.head_priority - 1).min(self.buckets.len());
        &self.buckets[start..]
    }

    fn live_mut(&mut self) -> &mut [Bucket<T>] {
        let start = (self.head_priority - 1).min(self.buckets.len());
        &mut self.buckets[start..]
    }

    /// Advance the cursor past empty levels. Returns the index of the first
    /// non-empty bucket, or `None` if every level is empty.
    fn settle_head(&mut self) -> Option<usize> {
        let priority_count = self.buckets.len();
        while self.head_priority <= priority_count && self.buckets[self.head_priority - 1].is_empty() {
            self.head_priority += 1;
            trace!(head_priority = self.head_priority, "advanced head cursor");
        }
        (self.head_priority <= priority_count).then(|| self.head_priority - 1)
    }

    fn count(&self) -> usize {
        self.live().iter().map(Bucket::count).sum()
    }
}

/// Bounded-priority FIFO queue guarded by a single lock.
///
/// Priority 1 is the highest. `dequeue` returns the oldest item of the
/// highest-priority non-empty level. Out-of-range priorities are clamped,
/// never rejected.
pub struct PriorityQueue<T> {
    priority_count: usize,
    default_priority: usize,
    levels: Mutex<Levels<T>>,
}

/// Queue shared between threads
pub type SafeQueue<T> = Arc<PriorityQueue<T>>;

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new(DEFAULT_PRIORITY_COUNT)
    }
}

impl<T> PriorityQueue<T> {
    /// Create a queue with `priority_count` levels, clamped to `[3, 99]`.
    pub fn new(priority_count: i32) -> Self {
        Self::from_config(&QueueConfig::new(priority_count))
    }

    pub fn from_config(config: &QueueConfig) -> Self {
        let priority_count = config.clamped_priority_count();
        let default_priority = clamp_priority(config.default_priority, priority_count);
        if priority_count as i64 != config.priority_count as i64 {
            debug!(requested = config.priority_count, priority_count, "clamped priority count");
        }
        debug!(priority_count, default_priority, "created priority queue");
        Self {
            priority_count,
            default_priority,
            levels: Mutex::new(Levels::new(priority_count)),
        }
    }

    /// Wrap in an `Arc` for sharing across threads
    pub fn into_shared(self) -> SafeQueue<T> {
        Arc::new(self)
    }

    /// Number of priority levels
    pub fn nr_of_priorities(&self) -> usize {
        self.priority_count
    }

    /// Level used by `enqueue_default`
    pub fn default_priority(&self) -> usize {
        self.default_priority
    }

    fn lock(&self) -> MutexGuard<'_, Levels<T>> {
        // No operation leaves the buckets half-updated, so a poisoned guard is still consistent.
        self.levels.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add `item` at `priority` (clamped to `[1, nr_of_priorities]`).
    pub fn enqueue(&self, item: T, priority: i32) {
        let level = clamp_priority(priority, self.priority_count);
        if level as i64 != priority as i64 {
            trace!(requested = priority, level, "clamped priority");
        }

        let mut levels = self.lock();
        levels.buckets[level - 1].append(item);
        if level < levels.head_priority {
            levels.head_priority = level;
        }
    }

    /// Add `item` at the queue's default priority
    pub fn enqueue_default(&self, item: T) {
        self.enqueue(item, self.default_priority as i32);
    }

    /// Remove and return the oldest item of the highest-priority non-empty level.
    pub fn dequeue(&self) -> Option<T> {
        let mut levels = self.lock();
        let index = levels.settle_head()?;
        levels.buckets[index].pop_head()
    }

    /// Total items held
    pub fn count(&self) -> usize {
        self.lock().count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Empty every level. The cursor is left where it is and corrects itself
    /// on the next `dequeue` or `first`.
    pub fn clear(&self) {
        let mut levels = self.lock();
        let head_priority = levels.head_priority;
        for bucket in levels.live_mut() {
            bucket.clear();
        }
        debug!(head_priority, "cleared priority queue");
    }
}

impl<T: Clone> PriorityQueue<T> {
    /// Copy of the item `dequeue` would return, without removing it.
    /// May advance the cursor past empty levels.
    pub fn first(&self) -> Option<T> {
        let mut levels = self.lock();
        let index = levels.settle_head()?;
        levels.buckets[index].peek_head().cloned()
    }

    /// Copy of one level's items in FIFO order. Priorities outside
    /// `[1, nr_of_priorities]` yield an empty vec rather than being clamped.
    pub fn get_queue_copy(&self, priority: i32) -> Vec<T> {
        let Some(index) = level_index(priority, self.priority_count) else {
            return Vec::new();
        };
        self.lock().buckets[index].snapshot()
    }

    /// Copy of every level, taken atomically.
    pub fn snapshot(&self) -> QueueSnapshot<T> {
        let levels = self.lock();
        let level_copies: Vec<LevelSnapshot<T>> = levels
            .buckets
            .iter()
            .enumerate()
            .map(|(index, bucket)| LevelSnapshot { priority: index + 1, items: bucket.snapshot() })
            .collect();
        let count = level_copies.iter().map(|level| level.items.len()).sum();
        debug_assert_eq!(count, levels.count(), "levels below the cursor must be empty");

        QueueSnapshot {
            priority_count: self.priority_count,
            head_priority: levels.head_priority,
            count,
            levels: level_copies,
        }
    }
}

impl<T: PartialEq> PriorityQueue<T> {
    /// Whether any level holds an item equal to `item`
    pub fn contains(&self, item: &T) -> bool {
        self.lock().live().iter().any(|bucket| bucket.contains(item))
    }

    /// Remove the first item equal to `item`, scanning from the highest
    /// priority. Leaves the cursor alone.
    pub fn remove(&self, item: &T) -> bool {
        let mut levels = self.lock();
        let count_before = levels.count();
        let removed = levels.live_mut().iter_mut().any(|bucket| bucket.remove_value(item));
        // -- post op assertion: exactly one item gone on success
        debug_assert_eq!(levels.count() + usize::from(removed), count_before);
        removed
    }
}

/// Clamp a caller-supplied priority into `[1, priority_count]`.
fn clamp_priority(priority: i32, priority_count: usize) -> usize {
    (priority.max(1) as usize).min(priority_count)
}

/// Bucket index for `priority` if it names an existing level.
fn level_index(priority: i32, priority_count: usize) -> Option<usize> {
    usize::try_from(priority)
        .ok()
        .filter(|level| (1..=priority_count).contains(level))
        .map(|level| level - 1)
}
