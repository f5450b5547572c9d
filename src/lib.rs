//! Purpose: Library crate behind the `graphacean` CLI and its integration tests.
//! Exports: `api` (adapter boundary), `core` (snapshot, partition, re-export), `math` (reference module).
//! Role: Re-exposes a wrapped module's flat export table as pass-through names plus frozen namespaces.
//! Invariants: Every export of the wrapped module is reachable through exactly one path.
//! Invariants: Core modules are pure after initialization; the loader is the only async step.
pub mod api;
pub mod core;
pub mod math;
