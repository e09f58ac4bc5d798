pub mod bucket;
pub mod config;
pub mod error;
pub mod queue;
pub mod snapshot;
