//! Command registry: name and alias resolution with fan-out lookup.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::warn;

use crate::cog::{Cog, RegisteredCog};
use crate::command::{Command, CommandGroup};

/// Anything the registry accepts for insertion: a bare command (wrapped
/// into a group on the way in) or a prepared group.
pub enum Registration {
    /// A single command; aliases are materialized during insertion.
    Command(Command),
    /// A prepared group, possibly shared with other owners.
    Group(Arc<CommandGroup>),
}

impl From<Command> for Registration {
    fn from(command: Command) -> Self {
        Registration::Command(command)
    }
}

impl From<CommandGroup> for Registration {
    fn from(group: CommandGroup) -> Self {
        Registration::Group(Arc::new(group))
    }
}

impl From<Arc<CommandGroup>> for Registration {
    fn from(group: Arc<CommandGroup>) -> Self {
        Registration::Group(group)
    }
}

/// Registry of command groups.
///
/// The registry owns the registered groups in registration order and keeps
/// two indices in sync on every insertion: the flat name list (canonical
/// names and alias names, duplicates permitted) and the name-to-groups
/// mapping used for dispatch.
///
/// Several distinct commands may share one name; lookups return all of
/// them, in registration order. The registry grows monotonically; there
/// is no removal.
#[derive(Debug, Default)]
pub struct Registry {
    /// Registered groups, registration order.
    groups: Vec<Arc<CommandGroup>>,
    /// Every canonical and alias name, insertion order, duplicates kept.
    all_names: Vec<String>,
    /// Any name to the groups registered under it, as indices into
    /// `groups`.
    by_name: HashMap<String, Vec<usize>>,
}

impl Registry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command or a prepared group.
    ///
    /// Duplicate names are permitted; see [`Registry::detect_duplicates`]
    /// for the diagnostic side.
    pub fn insert(&mut self, entry: impl Into<Registration>) {
        let group = match entry.into() {
            Registration::Command(command) => Arc::new(CommandGroup::new(command)),
            Registration::Group(group) => group,
        };
        self.insert_group(group);
    }

    fn insert_group(&mut self, group: Arc<CommandGroup>) {
        let index = self.groups.len();
        self.index_name(group.command.name.clone(), index);
        for alias in &group.aliases {
            self.index_name(alias.name.clone(), index);
        }
        self.groups.push(group);
    }

    fn index_name(&mut self, name: String, index: usize) {
        self.by_name.entry(name.clone()).or_default().push(index);
        self.all_names.push(name);
    }

    /// Bind and register every member of a cog.
    ///
    /// Warns and registers nothing when the cog declares no members.
    pub fn register_cog(&mut self, cog: &dyn Cog) -> RegisteredCog {
        let members = cog.members();
        if members.is_empty() {
            warn!(cog = cog.name(), "no commands found in cog");
            return RegisteredCog::empty(cog.name());
        }

        let mut groups = Vec::with_capacity(members.len());
        for member in members {
            let group = Arc::new(member.decl.bind(&member.name, member.handler));
            self.insert_group(group.clone());
            groups.push(group);
        }

        RegisteredCog::new(cog.name(), groups)
    }

    /// Every command registered under `name`, directly or via alias, in
    /// registration order. Empty for unknown names.
    pub fn lookup(&self, name: &str) -> Vec<&Command> {
        self.by_name
            .get(name)
            .map(|indices| {
                indices
                    .iter()
                    .map(|&i| &self.groups[i].command)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// True iff `name` appears as a canonical or alias name in any
    /// registered group.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Every canonical and alias name, insertion order, duplicates kept.
    pub fn all_names(&self) -> &[String] {
        &self.all_names
    }

    /// Iterate over the registered groups in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CommandGroup>> {
        self.groups.iter()
    }

    /// Number of registered groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True when nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Walk the registered groups and report each one whose identity was
    /// already seen, meaning the same group value was registered more than once.
    ///
    /// Structurally identical groups constructed independently are not
    /// duplicates. This is a diagnostic only; registration is never
    /// blocked.
    pub fn detect_duplicates(&self) -> Vec<Arc<CommandGroup>> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();

        for group in &self.groups {
            if !seen.insert(Arc::as_ptr(group)) {
                duplicates.push(group.clone());
            }
        }

        duplicates
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Arc<CommandGroup>;
    type IntoIter = std::slice::Iter<'a, Arc<CommandGroup>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

impl FromIterator<Command> for Registry {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        let mut registry = Self::new();
        for command in iter {
            registry.insert(command);
        }
        registry
    }
}
