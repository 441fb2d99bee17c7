pub mod cache;
pub mod signals;

pub use cache::SnapshotCache;
pub use signals::{SignalAggregator, SignalHistory, SignalStore};
