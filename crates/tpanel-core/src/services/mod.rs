//! Stateful services shared between adapters.

mod change_detector;

pub use change_detector::SnapshotStore;
