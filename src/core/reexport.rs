//! Purpose: Assemble the adapter's public surface from a partitioned snapshot.
//! Exports: `Exports`, `re_export`.
//! Role: Pass-through re-exporter; ungrouped and whitelisted names keep their original names.
//! Invariants: Values are never transformed; every handle is the snapshot's own `Export`.
//! Invariants: A whitelisted name missing from the snapshot fails the whole re-export.
use std::collections::BTreeMap;

use serde_json::{Map, Value, json};

use super::error::{Error, ErrorKind};
use super::export::Export;
use super::partition::{Namespace, Partition};
use super::surface::ExportSurface;

#[derive(Clone, Debug, Default)]
pub struct Exports {
    pass_through: BTreeMap<String, Export>,
    namespaces: Vec<Namespace>,
}

impl Exports {
    /// Top-level pass-through binding.
    pub fn get(&self, name: &str) -> Option<&Export> {
        self.pass_through.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pass_through.keys().map(String::as_str)
    }

    pub fn namespace(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.iter().find(|ns| ns.name() == name)
    }

    pub fn namespaces(&self) -> &[Namespace] {
        &self.namespaces
    }

    /// Looks up `name` (pass-through) or `Namespace.member`.
    pub fn resolve(&self, path: &str) -> Result<&Export, Error> {
        if let Some(export) = self.pass_through.get(path) {
            return Ok(export);
        }
        let Some((ns_name, member)) = path.split_once('.') else {
            return Err(Error::new(ErrorKind::NotFound)
                .with_message("no pass-through export with this name")
                .with_export(path)
                .with_hint("Namespace members are addressed as `Namespace.member`."));
        };
        let namespace = self.namespace(ns_name).ok_or_else(|| {
            Error::new(ErrorKind::NotFound)
                .with_message("unknown namespace")
                .with_export(path)
        })?;
        namespace.get(member).ok_or_else(|| {
            Error::new(ErrorKind::NotFound)
                .with_message("unknown namespace member")
                .with_export(path)
        })
    }

    pub fn call(&self, path: &str, args: &[Value]) -> Result<Value, Error> {
        let export = self.resolve(path)?;
        export.call(args).map_err(|err| {
            if err.export().is_some() {
                err
            } else {
                err.with_export(path)
            }
        })
    }

    pub fn describe(&self) -> Value {
        let pass_through = self
            .pass_through
            .iter()
            .map(|(name, export)| json!({ "name": name, "kind": export.kind().as_str() }))
            .collect::<Vec<_>>();

        let mut namespaces = Map::new();
        for ns in &self.namespaces {
            let members = ns.member_names().collect::<Vec<_>>();
            namespaces.insert(ns.name().to_string(), json!(members));
        }

        json!({
            "pass_through": pass_through,
            "namespaces": Value::Object(namespaces),
        })
    }
}

pub fn re_export(
    surface: &ExportSurface,
    partition: Partition,
    pinned: &[&str],
) -> Result<Exports, Error> {
    if let Some(missing) = pinned.iter().find(|name| !surface.contains(name)) {
        return Err(Error::new(ErrorKind::Configuration)
            .with_message("pass-through export is missing from the module surface")
            .with_export(*missing));
    }

    let (namespaces, pass_through) = partition.into_parts();
    Ok(Exports {
        pass_through,
        namespaces,
    })
}
