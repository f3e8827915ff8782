//! Command model and the two-phase declaration builder.

use std::fmt;
use std::sync::Arc;

/// Result type returned by command handlers.
pub type HandlerResult = anyhow::Result<()>;

/// A command handler: a callable over the positional argument tokens of an
/// input line.
///
/// Handlers are reference-counted because a `threaded` invocation moves a
/// clone of the handler onto a detached thread.
pub type Handler = Arc<dyn Fn(&[String]) -> HandlerResult + Send + Sync>;

/// Placeholder description used when a declaration carries none.
pub const NO_DESCRIPTION: &str = "...";

/// Wrap a closure into a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&[String]) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A registered action: canonical invocation token, handler, and metadata.
///
/// Commands are immutable after creation. Two commands are equal when all
/// fields are equal; handler equality is pointer identity.
#[derive(Clone)]
pub struct Command {
    /// Canonical invocation token. Must be non-empty.
    pub name: String,

    /// The callable invoked with the positional argument tokens.
    pub handler: Handler,

    /// Alternate invocation tokens, in declaration order.
    pub aliases: Vec<String>,

    /// Human-readable description.
    pub description: String,

    /// When true, invocations run on a detached thread and the dispatch
    /// loop does not wait for them.
    pub threaded: bool,
}

impl Command {
    /// Create a command with no aliases, the placeholder description, and
    /// inline (non-threaded) execution.
    pub fn new(name: impl Into<String>, handler: Handler) -> Self {
        Self {
            name: name.into(),
            handler,
            aliases: Vec::new(),
            description: NO_DESCRIPTION.to_string(),
            threaded: false,
        }
    }

    /// Set the alias list.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the threaded flag.
    pub fn with_threaded(mut self, threaded: bool) -> Self {
        self.threaded = threaded;
        self
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("description", &self.description)
            .field("threaded", &self.threaded)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Command {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && Arc::ptr_eq(&self.handler, &other.handler)
            && self.aliases == other.aliases
            && self.description == other.description
            && self.threaded == other.threaded
    }
}

/// An alternate invocation token bound to the same handler as its owning
/// [`Command`].
///
/// The alias never owns the command; the structural link is the
/// [`CommandGroup`] both live in, and `command` records the owner's
/// canonical name.
#[derive(Clone)]
pub struct Alias {
    /// Alternate invocation token.
    pub name: String,

    /// Copy of the owning command's handler, kept in sync by
    /// [`CommandGroup::rebind`].
    pub handler: Handler,

    /// Canonical name of the owning command.
    pub command: String,

    /// Mirrors the owning command's threaded flag.
    pub threaded: bool,
}

impl fmt::Debug for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alias")
            .field("name", &self.name)
            .field("command", &self.command)
            .field("threaded", &self.threaded)
            .finish_non_exhaustive()
    }
}

/// A command bundled with the aliases derived from it, registered as one
/// unit.
///
/// Invariant: every alias in the group names the group's command as its
/// owner.
#[derive(Debug, Clone)]
pub struct CommandGroup {
    /// The owning command.
    pub command: Command,

    /// Aliases derived from the command, in declaration order.
    pub aliases: Vec<Alias>,
}

impl CommandGroup {
    /// Wrap a command, materializing one [`Alias`] per alias name with a
    /// copy of the command's handler.
    pub fn new(command: Command) -> Self {
        let aliases = command
            .aliases
            .iter()
            .map(|name| Alias {
                name: name.clone(),
                handler: command.handler.clone(),
                command: command.name.clone(),
                threaded: command.threaded,
            })
            .collect();

        Self { command, aliases }
    }

    /// The canonical name of the group's command.
    pub fn name(&self) -> &str {
        &self.command.name
    }

    /// True iff `token` equals the canonical name or any alias name.
    pub fn contains(&self, token: &str) -> bool {
        self.command.name == token || self.aliases.iter().any(|a| a.name == token)
    }

    /// Replace the handler on the command and propagate the identical
    /// value to every alias.
    ///
    /// Used when a declared action must be bound to a different concrete
    /// receiver after the group was built.
    pub fn rebind(&mut self, handler: Handler) {
        self.command.handler = handler.clone();
        for alias in &mut self.aliases {
            alias.handler = handler.clone();
        }
    }
}

/// A pending action declaration: name, aliases, description, and the
/// threaded flag, with no concrete handler yet.
///
/// This is phase one of the two-phase registration flow. Phase two is
/// [`CommandDecl::bind`], which supplies the concrete handler and produces
/// a fully bound [`CommandGroup`]. Declarations are plain values; nothing
/// is registered until the group reaches a registry.
#[derive(Debug, Clone, Default)]
pub struct CommandDecl {
    name: Option<String>,
    aliases: Vec<String>,
    description: Option<String>,
    threaded: bool,
}

impl CommandDecl {
    /// Start an empty declaration. The canonical name defaults to the
    /// member name supplied at bind time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the canonical name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append one alias.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Append several aliases.
    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Set the description. Defaults to [`NO_DESCRIPTION`].
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the threaded flag.
    pub fn threaded(mut self, threaded: bool) -> Self {
        self.threaded = threaded;
        self
    }

    /// Bind the declaration to a concrete handler, producing the group.
    ///
    /// `member_name` supplies the canonical name when the declaration did
    /// not set one. The handler is not invoked.
    pub fn bind(&self, member_name: &str, handler: Handler) -> CommandGroup {
        let command = Command {
            name: self
                .name
                .clone()
                .unwrap_or_else(|| member_name.to_string()),
            handler,
            aliases: self.aliases.clone(),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            threaded: self.threaded,
        };

        CommandGroup::new(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn noop() -> Handler {
        handler(|_args| Ok(()))
    }

    #[test]
    fn test_bind_defaults() {
        let group = CommandDecl::new().bind("status", noop());

        assert_eq!(group.command.name, "status");
        assert_eq!(group.command.description, NO_DESCRIPTION);
        assert!(!group.command.threaded);
        assert!(group.aliases.is_empty());
    }

    #[test]
    fn test_bind_overrides() {
        let group = CommandDecl::new()
            .name("ping")
            .alias("p")
            .alias("pn")
            .describe("Check liveness")
            .threaded(true)
            .bind("ignored_member", noop());

        assert_eq!(group.command.name, "ping");
        assert_eq!(group.command.aliases, vec!["p", "pn"]);
        assert_eq!(group.command.description, "Check liveness");
        assert!(group.command.threaded);
    }

    #[test]
    fn test_aliases_materialized_with_owner_handler() {
        let group = CommandDecl::new().alias("a").alias("b").bind("x", noop());

        assert_eq!(group.aliases.len(), 2);
        for alias in &group.aliases {
            assert_eq!(alias.command, "x");
            assert!(Arc::ptr_eq(&alias.handler, &group.command.handler));
            assert_eq!(alias.threaded, group.command.threaded);
        }
    }

    #[test]
    fn test_group_contains() {
        let group = CommandDecl::new().alias("p").bind("ping", noop());

        assert!(group.contains("ping"));
        assert!(group.contains("p"));
        assert!(!group.contains("pong"));
    }

    #[test]
    fn test_rebind_propagates_to_aliases() {
        let mut group = CommandDecl::new().aliases(["a", "b"]).bind("x", noop());

        let replacement = noop();
        group.rebind(replacement.clone());

        assert!(Arc::ptr_eq(&group.command.handler, &replacement));
        for alias in &group.aliases {
            assert!(Arc::ptr_eq(&alias.handler, &replacement));
        }
    }

    #[test]
    fn test_command_equality_is_by_value_with_handler_identity() {
        let shared = noop();
        let a = Command::new("x", shared.clone()).with_aliases(["y"]);
        let b = Command::new("x", shared).with_aliases(["y"]);
        assert_eq!(a, b);

        // Same shape, different handler allocation: not equal.
        let c = Command::new("x", noop()).with_aliases(["y"]);
        assert!(a != c);
    }

    #[test]
    fn test_group_from_command_copies_handler() {
        let cmd = Command::new("x", noop()).with_aliases(["a", "b"]);
        let group = CommandGroup::new(cmd);

        assert_eq!(group.aliases.len(), 2);
        assert!(group.aliases.iter().all(|a| a.command == "x"));
        assert!(
            group
                .aliases
                .iter()
                .all(|a| Arc::ptr_eq(&a.handler, &group.command.handler))
        );
    }
}
