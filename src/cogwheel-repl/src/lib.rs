//! Interactive surface for cogwheel shells.
//!
//! This crate hosts the read-dispatch loop ([`Shell`]), the line-editing
//! capability it reads from ([`LineEditor`], with a rustyline-backed
//! implementation and a scripted one for tests), and the extension
//! loader that lets external modules register commands at startup.
//!
//! ```no_run
//! use cogwheel_commands::{CommandDecl, handler};
//! use cogwheel_repl::{RustylineEditor, Shell};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut shell = Shell::builder().prompt(">>> ").build();
//!     shell.add_command(
//!         CommandDecl::new()
//!             .alias("p")
//!             .describe("Check liveness")
//!             .bind("ping", handler(|_args| {
//!                 println!("pong");
//!                 Ok(())
//!             })),
//!     );
//!
//!     let mut editor = RustylineEditor::new()?;
//!     shell.run(&mut editor)?;
//!     Ok(())
//! }
//! ```
//!
//! # Execution model
//!
//! One loop thread reads and dispatches. Commands marked `threaded` run
//! on detached threads the loop never joins or observes; everything else
//! runs inline and blocks the next read. Registration is expected to
//! finish before [`Shell::run`]; the registry is not synchronized for
//! concurrent mutation.

mod editor;
mod extension;
mod shell;

pub use editor::{EditorError, LineEditor, RustylineEditor, ScriptedEditor, Signal};
pub use extension::{
    ExtensionError, ExtensionLoader, ExtensionModule, ExtensionResolver, SetupFn, StaticResolver,
};
pub use shell::{DispatchOutcome, InterruptPolicy, Shell, ShellBuilder, ShellConfig, ShellError};
