//! Purpose: Partition a flat export snapshot into prefix-grouped namespaces plus a residual set.
//! Exports: `PrefixRule`, `Namespace`, `Partition`, `partition`.
//! Role: Core transform behind the adapter; pure function of (snapshot, rules, pinned names).
//! Invariants: Every snapshot name lands in exactly one namespace or in the residual set.
//! Invariants: The first rule (in list order) whose prefix matches a name claims it.
//! Invariants: Pinned names always go to the residual set, even when a prefix matches.
//! Invariants: Rules with no matches produce no namespace at all.
//! Invariants: Namespaces are frozen at construction; no mutator is exposed.
use std::collections::BTreeMap;
use std::sync::Arc;

use super::export::Export;
use super::surface::ExportSurface;

/// Maps `<prefix><member>` export names into the namespace `namespace`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PrefixRule {
    prefix: &'static str,
    namespace: &'static str,
}

impl PrefixRule {
    pub const fn new(prefix: &'static str, namespace: &'static str) -> Self {
        Self { prefix, namespace }
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    fn strip<'n>(&self, name: &'n str) -> Option<&'n str> {
        name.strip_prefix(self.prefix)
    }
}

#[derive(Clone, Debug)]
pub struct Namespace {
    name: String,
    members: Arc<BTreeMap<String, Export>>,
}

impl Namespace {
    fn freeze(name: &str, members: BTreeMap<String, Export>) -> Self {
        Self {
            name: name.to_string(),
            members: Arc::new(members),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, member: &str) -> Option<&Export> {
        self.members.get(member)
    }

    pub fn contains(&self, member: &str) -> bool {
        self.members.contains_key(member)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Export)> {
        self.members.iter().map(|(member, export)| (member.as_str(), export))
    }

    /// Detached copy of the member table; edits to it never reach the namespace.
    pub fn to_map(&self) -> BTreeMap<String, Export> {
        self.members.as_ref().clone()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Partition {
    namespaces: Vec<Namespace>,
    residual: BTreeMap<String, Export>,
}

impl Partition {
    /// Namespaces in rule order.
    pub fn namespaces(&self) -> &[Namespace] {
        &self.namespaces
    }

    pub fn namespace(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.iter().find(|ns| ns.name() == name)
    }

    pub fn residual(&self) -> &BTreeMap<String, Export> {
        &self.residual
    }

    pub fn into_parts(self) -> (Vec<Namespace>, BTreeMap<String, Export>) {
        (self.namespaces, self.residual)
    }
}

pub fn partition(surface: &ExportSurface, rules: &[PrefixRule], pinned: &[&str]) -> Partition {
    let mut groups: Vec<BTreeMap<String, Export>> = vec![BTreeMap::new(); rules.len()];
    let mut residual = BTreeMap::new();

    for (name, export) in surface.iter() {
        if pinned.iter().any(|pin| *pin == name) {
            residual.insert(name.to_string(), export.clone());
            continue;
        }
        let claim = rules
            .iter()
            .enumerate()
            .find_map(|(idx, rule)| rule.strip(name).map(|member| (idx, member)));
        match claim {
            Some((idx, member)) => {
                groups[idx].insert(member.to_string(), export.clone());
            }
            None => {
                residual.insert(name.to_string(), export.clone());
            }
        }
    }

    let mut namespaces = Vec::new();
    for (rule, members) in rules.iter().zip(groups) {
        if members.is_empty() {
            tracing::debug!(prefix = rule.prefix(), "prefix rule matched no exports");
            continue;
        }
        tracing::debug!(
            namespace = rule.namespace(),
            members = members.len(),
            "namespace built"
        );
        namespaces.push(Namespace::freeze(rule.namespace(), members));
    }

    Partition {
        namespaces,
        residual,
    }
}
