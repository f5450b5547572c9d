//! Purpose: Tie loader, snapshot, partitioner and re-exporter into one initialize call.
//! Exports: `Adapter`, `AdapterConfig`, `ApiResult`.
//! Role: Stable entry point for consumers; the CLI and the math module's process-wide instance use it.
//! Invariants: No namespace or pass-through export is reachable before `initialize` resolves.
//! Invariants: Any failure (config, init, snapshot, re-export) leaves the adapter with no exports.
//! Invariants: Prefix rules and the pass-through whitelist are fixed when the adapter is built.
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::core::error::{Error, ErrorKind};
use crate::core::loader::{Loader, WrappedModule};
use crate::core::partition::{PrefixRule, partition};
use crate::core::reexport::{Exports, re_export};
use crate::core::surface::snapshot;

pub type ApiResult<T> = Result<T, Error>;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AdapterConfig {
    rules: Vec<PrefixRule>,
    pass_through: Vec<&'static str>,
}

impl AdapterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule; earlier rules win when prefixes overlap.
    pub fn with_rule(mut self, rule: PrefixRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_rules(mut self, rules: impl IntoIterator<Item = PrefixRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn with_pass_through(mut self, names: impl IntoIterator<Item = &'static str>) -> Self {
        self.pass_through.extend(names);
        self
    }

    pub fn rules(&self) -> &[PrefixRule] {
        &self.rules
    }

    pub fn pass_through(&self) -> &[&'static str] {
        &self.pass_through
    }

    pub fn validate(&self) -> ApiResult<()> {
        for (idx, rule) in self.rules.iter().enumerate() {
            if rule.prefix().is_empty() {
                return Err(Error::new(ErrorKind::Configuration)
                    .with_message("prefix rule has an empty prefix")
                    .with_hint(format!(
                        "Rule for namespace `{}` would claim every export.",
                        rule.namespace()
                    )));
            }
            let duplicate = self.rules[..idx]
                .iter()
                .any(|earlier| earlier.namespace() == rule.namespace());
            if duplicate {
                return Err(Error::new(ErrorKind::Configuration)
                    .with_message(format!(
                        "namespace `{}` is published by more than one rule",
                        rule.namespace()
                    ))
                    .with_hint("Give every prefix rule its own namespace name."));
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct Adapter<M> {
    loader: Loader<M>,
    config: AdapterConfig,
    exports: OnceCell<Exports>,
}

impl<M: WrappedModule> Adapter<M> {
    pub fn new(module: M, config: AdapterConfig) -> Self {
        Self {
            loader: Loader::new(module),
            config,
            exports: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn module(&self) -> &M {
        self.loader.module()
    }

    /// Initializes the wrapped module (once) and builds the adapted surface.
    ///
    /// `config` is forwarded verbatim to the module's own init entry point
    /// and is ignored once the adapter is initialized. Init errors come back
    /// exactly as the module returned them.
    pub async fn initialize(&self, config: Option<Value>) -> ApiResult<&Exports> {
        self.exports
            .get_or_try_init(|| async move {
                self.config.validate()?;
                self.loader.initialize(config).await?;
                let surface = snapshot(self.loader.module().surface())?;
                let parts = partition(&surface, &self.config.rules, &self.config.pass_through);
                let exports = re_export(&surface, parts, &self.config.pass_through)?;
                tracing::info!(
                    pass_through = exports.names().count(),
                    namespaces = exports.namespaces().len(),
                    "exports ready"
                );
                Ok(exports)
            })
            .await
    }

    /// The adapted surface, or `None` until `initialize` has resolved.
    pub fn exports(&self) -> Option<&Exports> {
        self.exports.get()
    }
}
