pub mod core;

pub use crate::core::{
    bucket::Bucket,
    config::QueueConfig,
    error::{QueueError, Result},
    queue::{PriorityQueue, SafeQueue},
    snapshot::{append_snapshots, LevelSnapshot, QueueSnapshot},
};
