//! The sync pipeline coordinating all mirror operations.

mod pipeline;

pub use pipeline::{SyncOutcome, SyncPipeline};
