//! Grouped registration: cogs contribute several related actions at once.

use std::sync::Arc;

use crate::command::{Alias, Command, CommandDecl, CommandGroup, Handler};

/// One declared member of a cog: the member name, its declaration, and the
/// concrete handler bound to this cog instance.
///
/// The member name doubles as the default canonical name when the
/// declaration does not set one.
pub struct CogMember {
    /// Identifier of the member inside the cog.
    pub name: String,

    /// The pending declaration.
    pub decl: CommandDecl,

    /// The handler, already bound to the cog instance.
    pub handler: Handler,
}

impl CogMember {
    /// Pair a declaration with its bound handler.
    pub fn new(name: impl Into<String>, decl: CommandDecl, handler: Handler) -> Self {
        Self {
            name: name.into(),
            decl,
            handler,
        }
    }
}

/// A caller-defined grouping of related actions.
///
/// A cog exposes an explicit declaration table rather than being scanned
/// for tagged members: each entry names the member and carries its
/// declaration and handler. A registry binds and registers every entry as
/// one batch.
pub trait Cog {
    /// Name of the cog, used in diagnostics.
    fn name(&self) -> &str;

    /// The declaration table, in registration order.
    fn members(&self) -> Vec<CogMember>;
}

/// The view produced by registering a [`Cog`]: the same group values the
/// registry now holds, with read-only iteration over their commands and
/// aliases.
#[derive(Debug, Clone)]
pub struct RegisteredCog {
    name: String,
    groups: Vec<Arc<CommandGroup>>,
}

impl RegisteredCog {
    pub(crate) fn new(name: impl Into<String>, groups: Vec<Arc<CommandGroup>>) -> Self {
        Self {
            name: name.into(),
            groups,
        }
    }

    pub(crate) fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    /// Name of the cog this view was registered from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The registered groups, in registration order.
    pub fn groups(&self) -> &[Arc<CommandGroup>] {
        &self.groups
    }

    /// True when registration was a no-op (the cog declared no members).
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate over the member commands.
    pub fn walk_commands(&self) -> impl Iterator<Item = &Command> {
        self.groups.iter().map(|g| &g.command)
    }

    /// Iterate over the member aliases.
    pub fn walk_aliases(&self) -> impl Iterator<Item = &Alias> {
        self.groups.iter().flat_map(|g| g.aliases.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::handler;

    struct PairCog;

    impl Cog for PairCog {
        fn name(&self) -> &str {
            "pair"
        }

        fn members(&self) -> Vec<CogMember> {
            vec![
                CogMember::new(
                    "first",
                    CommandDecl::new().alias("f"),
                    handler(|_args| Ok(())),
                ),
                CogMember::new("second", CommandDecl::new(), handler(|_args| Ok(()))),
            ]
        }
    }

    #[test]
    fn test_member_table_order() {
        let members = PairCog.members();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].name, "first");
        assert_eq!(members[1].name, "second");
    }

    #[test]
    fn test_registered_cog_walks() {
        let groups: Vec<Arc<CommandGroup>> = PairCog
            .members()
            .into_iter()
            .map(|m| Arc::new(m.decl.bind(&m.name, m.handler)))
            .collect();
        let view = RegisteredCog::new("pair", groups);

        let names: Vec<&str> = view.walk_commands().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);

        let aliases: Vec<&str> = view.walk_aliases().map(|a| a.name.as_str()).collect();
        assert_eq!(aliases, vec!["f"]);
    }
}
