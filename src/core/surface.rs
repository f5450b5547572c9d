//! Purpose: Take a read-only snapshot of a wrapped module's export surface.
//! Exports: `ExportSource`, `ExportSurface`, `snapshot`.
//! Role: The one place the adapter reads the live surface; everything downstream sees the copy.
//! Invariants: A snapshot is immutable; later changes to the live surface never reach it.
//! Invariants: A non-enumerable or inconsistent source is a configuration error and yields no snapshot.
use std::collections::{BTreeMap, HashMap};

use super::error::{Error, ErrorKind};
use super::export::Export;

/// A live export surface that can list its bound names.
///
/// Bindings for wrapped modules implement this instead of relying on
/// reflection over the module object.
pub trait ExportSource {
    /// Every name currently bound, or `None` when the source cannot be enumerated.
    fn export_names(&self) -> Option<Vec<String>>;

    fn export(&self, name: &str) -> Option<Export>;
}

impl ExportSource for BTreeMap<String, Export> {
    fn export_names(&self) -> Option<Vec<String>> {
        Some(self.keys().cloned().collect())
    }

    fn export(&self, name: &str) -> Option<Export> {
        self.get(name).cloned()
    }
}

impl ExportSource for HashMap<String, Export> {
    fn export_names(&self) -> Option<Vec<String>> {
        Some(self.keys().cloned().collect())
    }

    fn export(&self, name: &str) -> Option<Export> {
        self.get(name).cloned()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ExportSurface {
    entries: BTreeMap<String, Export>,
}

impl ExportSurface {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Export> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Export)> {
        self.entries.iter().map(|(name, export)| (name.as_str(), export))
    }
}

pub fn snapshot<S: ExportSource + ?Sized>(source: &S) -> Result<ExportSurface, Error> {
    let names = source.export_names().ok_or_else(|| {
        Error::new(ErrorKind::Configuration)
            .with_message("export surface is not enumerable")
            .with_hint("Initialize the wrapped module before adapting it.")
    })?;

    let mut entries = BTreeMap::new();
    for name in names {
        let export = source.export(&name).ok_or_else(|| {
            Error::new(ErrorKind::Configuration)
                .with_message("listed export is not bound")
                .with_export(name.clone())
        })?;
        entries.insert(name, export);
    }

    tracing::debug!(exports = entries.len(), "export surface snapshot taken");
    Ok(ExportSurface { entries })
}
