// Core modules: export handles, snapshotting, prefix partitioning, loading and re-export.
pub mod error;
pub mod export;
pub mod loader;
pub mod partition;
pub mod reexport;
pub mod surface;
