//! Command registry and dispatch model for cogwheel shells.
//!
//! This crate is the core of the cogwheel engine: the data model for
//! registered actions, the registry that resolves typed-in tokens to
//! them, and the leaf pieces the interactive loop composes: shell-style
//! tokenization and prefix completion.
//!
//! # Declaring and registering actions
//!
//! Actions go through a two-phase flow: a [`CommandDecl`] carries the
//! name, aliases, description, and threaded flag without a handler;
//! binding it produces a [`CommandGroup`] ready for registration.
//!
//! ```
//! use cogwheel_commands::{CommandDecl, Registry, handler};
//!
//! let mut registry = Registry::new();
//! registry.insert(
//!     CommandDecl::new()
//!         .alias("p")
//!         .describe("Check liveness")
//!         .bind("ping", handler(|_args| Ok(()))),
//! );
//!
//! assert!(registry.contains("ping"));
//! assert!(registry.contains("p"));
//! ```
//!
//! # Cogs
//!
//! Related actions are contributed together through the [`Cog`] trait: a
//! cog exposes an explicit table of declared members, and
//! [`Registry::register_cog`] binds and registers them as one batch.
//!
//! # Fan-out
//!
//! Several distinct commands may share one invocation token. Lookups
//! return *all* of them in registration order; callers dispatching a line
//! invoke every match, not just the first. Registering the same group
//! value twice is permitted and only surfaces through
//! [`Registry::detect_duplicates`].

mod cog;
mod command;
mod completion;
mod registry;
mod tokenize;

pub use cog::{Cog, CogMember, RegisteredCog};
pub use command::{
    Alias, Command, CommandDecl, CommandGroup, Handler, HandlerResult, NO_DESCRIPTION, handler,
};
pub use completion::{CompletionProvider, complete};
pub use registry::{Registration, Registry};
pub use tokenize::{TokenizeError, split_line};

/// Re-export common types for convenience.
pub mod prelude {
    pub use crate::{
        Cog, CogMember, Command, CommandDecl, CommandGroup, CompletionProvider, Handler, Registry,
        handler, split_line,
    };
}
