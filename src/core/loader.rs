//! Purpose: Drive the wrapped module's asynchronous initialization exactly once.
//! Exports: `WrappedModule`, `Loader`, `Ready`.
//! Role: The only suspension point of the adapter; everything after `Ready` is synchronous.
//! Invariants: Init errors reach the caller as the module produced them (no wrapping, no retry).
//! Invariants: Concurrent or repeated calls share one successful initialization.
//! Invariants: A failed initialization leaves the loader uninitialized.
use std::future::Future;

use serde_json::Value;
use tokio::sync::OnceCell;

use super::error::Error;
use super::surface::ExportSource;

/// A precompiled computation unit with a flat export table.
pub trait WrappedModule: Send + Sync {
    /// The module's own init entry point. `config` is forwarded verbatim.
    fn instantiate(&self, config: Option<Value>) -> impl Future<Output = Result<(), Error>> + Send;

    /// Live export surface; only meaningful after `instantiate` resolved.
    fn surface(&self) -> &dyn ExportSource;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ready;

#[derive(Debug)]
pub struct Loader<M> {
    module: M,
    ready: OnceCell<Ready>,
}

impl<M: WrappedModule> Loader<M> {
    pub fn new(module: M) -> Self {
        Self {
            module,
            ready: OnceCell::new(),
        }
    }

    pub fn module(&self) -> &M {
        &self.module
    }

    pub fn is_ready(&self) -> bool {
        self.ready.initialized()
    }

    /// Initializes the wrapped module. Once ready, later calls return
    /// immediately and their `config` is ignored.
    pub async fn initialize(&self, config: Option<Value>) -> Result<Ready, Error> {
        let module = &self.module;
        self.ready
            .get_or_try_init(|| async move {
                tracing::info!("initializing wrapped module");
                match module.instantiate(config).await {
                    Ok(()) => {
                        tracing::info!("wrapped module ready");
                        Ok(Ready)
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "wrapped module failed to initialize");
                        Err(err)
                    }
                }
            })
            .await
            .copied()
    }
}
