//! Purpose: Define the stable public Rust API boundary for graphacean.
//! Exports: Adapter entry point plus the core types consumers and wrapped-module bindings need.
//! Role: Public, additive-only surface; the CLI only goes through this module.
//! Invariants: Consumers reach namespaces and pass-through exports only via `Exports`.

mod adapter;

pub use crate::core::error::{Error, ErrorKind, to_exit_code};
pub use crate::core::export::{Callable, Export, ExportKind};
pub use crate::core::loader::{Loader, Ready, WrappedModule};
pub use crate::core::partition::{Namespace, Partition, PrefixRule, partition};
pub use crate::core::reexport::{Exports, re_export};
pub use crate::core::surface::{ExportSource, ExportSurface, snapshot};
pub use adapter::{Adapter, AdapterConfig, ApiResult};
