//! Extension loading: resolve a module by identifier and run its setup
//! entry point against the shell.
//!
//! Resolution is a capability: [`ExtensionResolver`] may be backed by a
//! compile-time module table ([`StaticResolver`]), dynamic library
//! loading, or a scripting-engine embedding. Whatever the mechanism, the
//! loader's contract holds: a given identifier loads at most once, and a
//! failed load leaves no trace: the identifier stays loadable and the
//! module does not remain visible.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::shell::Shell;

/// A module's setup entry point. Receives the owning shell and registers
/// commands and cogs against it.
pub type SetupFn = Box<dyn FnOnce(&mut Shell) -> anyhow::Result<()> + Send>;

/// A resolved extension module: a name plus an optional setup entry
/// point.
///
/// The entry point is optional because a module can genuinely resolve
/// without exposing one; the loader reports that as
/// [`ExtensionError::MissingSetup`].
pub struct ExtensionModule {
    name: String,
    setup: Option<SetupFn>,
}

impl ExtensionModule {
    /// A module with a setup entry point.
    pub fn new<F>(name: impl Into<String>, setup: F) -> Self
    where
        F: FnOnce(&mut Shell) -> anyhow::Result<()> + Send + 'static,
    {
        Self {
            name: name.into(),
            setup: Some(Box::new(setup)),
        }
    }

    /// A module that resolves but lacks the setup entry point.
    pub fn without_setup(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            setup: None,
        }
    }

    /// The module's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a setup entry point is present.
    pub fn has_setup(&self) -> bool {
        self.setup.is_some()
    }

    fn take_setup(&mut self) -> Option<SetupFn> {
        self.setup.take()
    }
}

impl std::fmt::Debug for ExtensionModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionModule")
            .field("name", &self.name)
            .field("has_setup", &self.setup.is_some())
            .finish()
    }
}

/// Resolves module identifiers to modules.
pub trait ExtensionResolver {
    /// Resolve `id` to a module, or fail with the underlying import
    /// error.
    fn resolve(&self, id: &str) -> anyhow::Result<ExtensionModule>;
}

/// A compile-time module table: identifiers mapped to module factories.
///
/// The factory runs on every resolution so a module can be resolved again
/// after a failed load attempt.
#[derive(Default)]
pub struct StaticResolver {
    modules: HashMap<String, Box<dyn Fn() -> ExtensionModule + Send + Sync>>,
}

impl StaticResolver {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module factory under `id`, replacing any previous entry.
    pub fn insert<F>(&mut self, id: impl Into<String>, factory: F)
    where
        F: Fn() -> ExtensionModule + Send + Sync + 'static,
    {
        self.modules.insert(id.into(), Box::new(factory));
    }

    /// Builder-style [`StaticResolver::insert`].
    pub fn with<F>(mut self, id: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> ExtensionModule + Send + Sync + 'static,
    {
        self.insert(id, factory);
        self
    }
}

impl ExtensionResolver for StaticResolver {
    fn resolve(&self, id: &str) -> anyhow::Result<ExtensionModule> {
        match self.modules.get(id) {
            Some(factory) => Ok(factory()),
            None => Err(anyhow::anyhow!("module '{id}' is not in the module table")),
        }
    }
}

/// A failure of one [`ExtensionLoader::load`] call.
///
/// Every variant leaves the loader as if the call never happened. Registry
/// mutations a partially-run setup performed before failing are not rolled
/// back.
#[derive(Debug, Error)]
pub enum ExtensionError {
    /// The identifier was already loaded successfully in this process.
    #[error("extension '{0}' is already loaded")]
    AlreadyLoaded(String),

    /// The resolver could not produce a module for the identifier.
    #[error("extension '{id}' could not be resolved")]
    NotFound {
        /// The requested identifier.
        id: String,
        /// The resolver's error.
        #[source]
        source: anyhow::Error,
    },

    /// The module resolved but exposes no setup entry point.
    #[error("extension '{0}' has no setup entry point")]
    MissingSetup(String),

    /// The module's setup entry point failed.
    #[error("setup failed for extension '{id}'")]
    Setup {
        /// The requested identifier.
        id: String,
        /// The setup function's error, unmodified.
        #[source]
        source: anyhow::Error,
    },
}

/// Loads extension modules into a shell, each identifier at most once.
pub struct ExtensionLoader {
    resolver: Box<dyn ExtensionResolver + Send>,
    loaded: Vec<String>,
}

impl ExtensionLoader {
    /// Create a loader over a resolver.
    pub fn new<R>(resolver: R) -> Self
    where
        R: ExtensionResolver + Send + 'static,
    {
        Self {
            resolver: Box::new(resolver),
            loaded: Vec::new(),
        }
    }

    /// Identifiers loaded so far, in load order.
    pub fn loaded(&self) -> &[String] {
        &self.loaded
    }

    /// Whether `id` has been loaded successfully.
    pub fn is_loaded(&self, id: &str) -> bool {
        self.loaded.iter().any(|loaded| loaded == id)
    }

    /// Resolve `id` and run its setup entry point against `shell`.
    ///
    /// Only a fully successful call records the identifier; any failure
    /// leaves it loadable again. Best-effort caveat: commands a failing
    /// setup registered before its error are not removed, since the
    /// registry has no removal operation.
    pub fn load(&mut self, id: &str, shell: &mut Shell) -> Result<(), ExtensionError> {
        if self.is_loaded(id) {
            return Err(ExtensionError::AlreadyLoaded(id.to_string()));
        }

        let mut module = self
            .resolver
            .resolve(id)
            .map_err(|source| ExtensionError::NotFound {
                id: id.to_string(),
                source,
            })?;

        let setup = module
            .take_setup()
            .ok_or_else(|| ExtensionError::MissingSetup(id.to_string()))?;

        setup(shell).map_err(|source| ExtensionError::Setup {
            id: id.to_string(),
            source,
        })?;

        debug!(extension = id, module = module.name(), "extension loaded");
        self.loaded.push(id.to_string());
        Ok(())
    }
}

impl std::fmt::Debug for ExtensionLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionLoader")
            .field("loaded", &self.loaded)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogwheel_commands::{Command, handler};

    fn greeter_resolver() -> StaticResolver {
        StaticResolver::new().with("greeter", || {
            ExtensionModule::new("greeter", |shell: &mut Shell| {
                shell.add_command(Command::new("hello", handler(|_args| Ok(()))));
                Ok(())
            })
        })
    }

    #[test]
    fn test_load_registers_commands() {
        let mut shell = Shell::new();
        let mut loader = ExtensionLoader::new(greeter_resolver());

        loader.load("greeter", &mut shell).unwrap();

        assert!(shell.registry().contains("hello"));
        assert!(loader.is_loaded("greeter"));
        assert_eq!(loader.loaded(), ["greeter"]);
    }

    #[test]
    fn test_second_load_is_already_loaded_and_registry_is_untouched() {
        let mut shell = Shell::new();
        let mut loader = ExtensionLoader::new(greeter_resolver());

        loader.load("greeter", &mut shell).unwrap();
        let registered = shell.registry().len();

        let err = loader.load("greeter", &mut shell).unwrap_err();
        assert!(matches!(err, ExtensionError::AlreadyLoaded(id) if id == "greeter"));
        assert_eq!(shell.registry().len(), registered);
    }

    #[test]
    fn test_unknown_identifier_is_not_found() {
        let mut shell = Shell::new();
        let mut loader = ExtensionLoader::new(StaticResolver::new());

        let err = loader.load("ghost", &mut shell).unwrap_err();
        assert!(matches!(err, ExtensionError::NotFound { id, .. } if id == "ghost"));
        assert!(!loader.is_loaded("ghost"));
    }

    #[test]
    fn test_module_without_setup_is_rejected_and_stays_loadable() {
        let mut shell = Shell::new();
        let resolver =
            StaticResolver::new().with("bare", || ExtensionModule::without_setup("bare"));
        let mut loader = ExtensionLoader::new(resolver);

        let err = loader.load("bare", &mut shell).unwrap_err();
        assert!(matches!(err, ExtensionError::MissingSetup(id) if id == "bare"));

        // Not recorded: the retry fails the same way, not with
        // AlreadyLoaded.
        let err = loader.load("bare", &mut shell).unwrap_err();
        assert!(matches!(err, ExtensionError::MissingSetup(_)));
    }

    #[test]
    fn test_failed_setup_keeps_cause_and_records_nothing() {
        let mut shell = Shell::new();
        let resolver = StaticResolver::new().with("flaky", || {
            ExtensionModule::new("flaky", |shell: &mut Shell| {
                // Partial registration before the failure; it stays, by
                // the documented best-effort contract.
                shell.add_command(Command::new("partial", handler(|_args| Ok(()))));
                Err(anyhow::anyhow!("setup exploded"))
            })
        });
        let mut loader = ExtensionLoader::new(resolver);

        let err = loader.load("flaky", &mut shell).unwrap_err();
        match err {
            ExtensionError::Setup { id, source } => {
                assert_eq!(id, "flaky");
                assert_eq!(source.to_string(), "setup exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(!loader.is_loaded("flaky"));
        assert!(shell.registry().contains("partial"));
    }
}
