//! Purpose: Reference wrapped module: complex and 2-D vector math behind a flat export table.
//! Exports: `MathModule`, `DEFAULT_RULES`, `PASS_THROUGH`, `default_config`, `shared`, `initialize`.
//! Role: Concrete collaborator for the adapter; the CLI and integration tests run against it.
//! Invariants: The export table exists only after `instantiate`; before that the surface is not enumerable.
//! Invariants: Init config must be absent, `null`, or a JSON object.
use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde_json::Value;

use crate::api::{Adapter, AdapterConfig, PrefixRule};
use crate::core::error::{Error, ErrorKind};
use crate::core::export::Export;
use crate::core::loader::WrappedModule;
use crate::core::reexport::Exports;
use crate::core::surface::ExportSource;

pub mod complex;
mod exports;
pub mod vec2;

pub use complex::Complex;
pub use vec2::Vec2;

pub const DEFAULT_RULES: [PrefixRule; 2] = [
    PrefixRule::new("ComplexFunctions_", "ComplexFunctions"),
    PrefixRule::new("VectorFunctions_", "VectorFunctions"),
];

/// Value types re-exported under their own names.
pub const PASS_THROUGH: [&str; 2] = ["Complex", "Vec2"];

#[derive(Debug, Default)]
pub struct MathModule {
    table: OnceLock<BTreeMap<String, Export>>,
}

impl MathModule {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExportSource for MathModule {
    fn export_names(&self) -> Option<Vec<String>> {
        self.table
            .get()
            .map(|table| table.keys().cloned().collect())
    }

    fn export(&self, name: &str) -> Option<Export> {
        self.table.get()?.get(name).cloned()
    }
}

impl WrappedModule for MathModule {
    async fn instantiate(&self, config: Option<Value>) -> Result<(), Error> {
        match config {
            None | Some(Value::Null) | Some(Value::Object(_)) => {}
            Some(other) => {
                return Err(Error::new(ErrorKind::Initialization)
                    .with_message("unsupported init config")
                    .with_hint(format!("Expected a JSON object or null, got `{other}`.")));
            }
        }
        let table = self.table.get_or_init(exports::build_table);
        tracing::debug!(exports = table.len(), "math module instantiated");
        Ok(())
    }

    fn surface(&self) -> &dyn ExportSource {
        self
    }
}

pub fn default_config() -> AdapterConfig {
    AdapterConfig::new()
        .with_rules(DEFAULT_RULES)
        .with_pass_through(PASS_THROUGH)
}

/// Process-wide adapter over the math module.
pub fn shared() -> &'static Adapter<MathModule> {
    static SHARED: OnceLock<Adapter<MathModule>> = OnceLock::new();
    SHARED.get_or_init(|| Adapter::new(MathModule::new(), default_config()))
}

/// Initializes the process-wide adapter and returns its exports.
pub async fn initialize(config: Option<Value>) -> Result<&'static Exports, Error> {
    shared().initialize(config).await
}
