//! The interactive dispatch loop.

use std::thread;

use thiserror::Error;
use tracing::{debug, error, warn};

use cogwheel_commands::{Cog, Registration, RegisteredCog, Registry, split_line};

use crate::editor::{EditorError, LineEditor, Signal};

/// What the loop does when the interrupt key is pressed.
///
/// Evaluated once at startup; there is no per-line override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterruptPolicy {
    /// End the loop (the embedding binary typically exits afterwards).
    #[default]
    Exit,
    /// Swallow the interrupt and read the next line.
    Resume,
}

/// Startup configuration for a [`Shell`].
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Prompt shown before each read.
    pub prompt: String,
    /// Warn about command groups registered more than once before the
    /// first read.
    pub check_duplicates: bool,
    /// Interrupt-key behavior.
    pub interrupt: InterruptPolicy,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: ">>> ".to_string(),
            check_duplicates: true,
            interrupt: InterruptPolicy::default(),
        }
    }
}

/// Builder for [`Shell`].
#[derive(Debug, Default)]
pub struct ShellBuilder {
    config: ShellConfig,
}

impl ShellBuilder {
    /// Set the prompt string.
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.prompt = prompt.into();
        self
    }

    /// Enable or disable the startup duplicate warning.
    pub fn check_duplicates(mut self, check: bool) -> Self {
        self.config.check_duplicates = check;
        self
    }

    /// Set the interrupt-key behavior.
    pub fn on_interrupt(mut self, policy: InterruptPolicy) -> Self {
        self.config.interrupt = policy;
        self
    }

    /// Build the shell with an empty registry.
    pub fn build(self) -> Shell {
        Shell {
            config: self.config,
            registry: Registry::new(),
        }
    }
}

/// How one input line was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The line tokenized to nothing; no lookup was performed.
    Empty,
    /// The line could not be tokenized and was discarded.
    Malformed,
    /// The leading token matched no registered name; silently ignored.
    Unknown,
    /// The given number of commands were invoked (inline or detached).
    Dispatched(usize),
}

/// A failure that ends the dispatch loop.
#[derive(Debug, Error)]
pub enum ShellError {
    /// The line editor failed.
    #[error(transparent)]
    Editor(#[from] EditorError),

    /// An inline command handler failed. The cause is the handler's own
    /// error, unmodified.
    #[error("command '{name}' failed")]
    Command {
        /// Canonical name of the failing command.
        name: String,
        /// The handler's error.
        #[source]
        source: anyhow::Error,
    },
}

/// An interactive command shell: a registry plus the loop that reads,
/// resolves, and invokes.
///
/// Registration is expected to complete before [`Shell::run`]; the
/// registry is deliberately unsynchronized, and registering from inside a
/// running handler is unsupported.
#[derive(Debug, Default)]
pub struct Shell {
    config: ShellConfig,
    registry: Registry,
}

impl Shell {
    /// Create a shell with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shell from an explicit configuration.
    pub fn with_config(config: ShellConfig) -> Self {
        Self {
            config,
            registry: Registry::new(),
        }
    }

    /// Start building a shell.
    pub fn builder() -> ShellBuilder {
        ShellBuilder::default()
    }

    /// The startup configuration.
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// The command registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Register a single command or a prepared group.
    pub fn add_command(&mut self, entry: impl Into<Registration>) {
        self.registry.insert(entry);
    }

    /// Bind and register every member of a cog.
    pub fn add_cog(&mut self, cog: &dyn Cog) -> RegisteredCog {
        self.registry.register_cog(cog)
    }

    /// Drive the read-dispatch loop until end of input, an exiting
    /// interrupt, or a failure.
    pub fn run(&mut self, editor: &mut dyn LineEditor) -> Result<(), ShellError> {
        if self.config.check_duplicates {
            for group in self.registry.detect_duplicates() {
                warn!(command = group.name(), "command group registered more than once");
            }
        }

        loop {
            editor.set_candidates(self.registry.all_names().to_vec());

            match editor.read_line(&self.config.prompt)? {
                Signal::Line(line) => {
                    if !line.trim().is_empty() {
                        editor.add_history(&line);
                    }
                    self.dispatch_line(&line)?;
                }
                Signal::Interrupt => match self.config.interrupt {
                    InterruptPolicy::Exit => return Ok(()),
                    InterruptPolicy::Resume => continue,
                },
                Signal::Eof => return Ok(()),
            }
        }
    }

    /// Resolve and invoke one input line.
    ///
    /// The first token selects the commands; the remaining tokens are
    /// passed to every match as its argument list, in registration order.
    /// A `threaded` command runs on a detached thread the loop never
    /// waits for; an inline handler failure propagates as
    /// [`ShellError::Command`].
    pub fn dispatch_line(&self, line: &str) -> Result<DispatchOutcome, ShellError> {
        let tokens = match split_line(line) {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(error = %e, "discarding input line");
                return Ok(DispatchOutcome::Malformed);
            }
        };

        let Some((key, args)) = tokens.split_first() else {
            return Ok(DispatchOutcome::Empty);
        };

        if !self.registry.contains(key) {
            return Ok(DispatchOutcome::Unknown);
        }

        let matches = self.registry.lookup(key);
        let invoked = matches.len();

        for command in matches {
            if command.threaded {
                let handler = command.handler.clone();
                let name = command.name.clone();
                let args = args.to_vec();
                thread::spawn(move || {
                    // Detached: completion, results, and failures are
                    // invisible to the loop.
                    if let Err(error) = handler(&args) {
                        error!(command = %name, error = %error, "detached command failed");
                    }
                });
            } else {
                (command.handler)(args).map_err(|source| ShellError::Command {
                    name: command.name.clone(),
                    source,
                })?;
            }
        }

        debug!(key = %key, invoked, "dispatched line");
        Ok(DispatchOutcome::Dispatched(invoked))
    }
}
