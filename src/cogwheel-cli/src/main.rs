//! cogwheel demo shell.
//!
//! A small interactive shell that exercises the engine end to end:
//! cog-based registration, aliases, a threaded background command,
//! tab completion, and history via the rustyline editor.

use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cogwheel_commands::{Cog, CogMember, CommandDecl, handler};
use cogwheel_repl::{InterruptPolicy, RustylineEditor, Shell};

#[derive(Parser, Debug)]
#[command(name = "cogwheel", version, about = "Interactive demo shell for the cogwheel engine")]
struct Cli {
    /// Prompt shown before each input line.
    #[arg(long, default_value = ">>> ")]
    prompt: String,

    /// Skip the duplicate-command warning pass at startup.
    #[arg(long)]
    no_duplicate_check: bool,

    /// Keep the shell alive on Ctrl-C instead of exiting.
    #[arg(long)]
    stay_on_interrupt: bool,
}

struct DemoCog;

impl Cog for DemoCog {
    fn name(&self) -> &str {
        "demo"
    }

    fn members(&self) -> Vec<CogMember> {
        vec![
            CogMember::new(
                "greet",
                CommandDecl::new().alias("hi").describe("Greet someone by name"),
                handler(|args| {
                    match args.first() {
                        Some(name) => println!("hello, {name}!"),
                        None => println!("hello!"),
                    }
                    Ok(())
                }),
            ),
            CogMember::new(
                "echo",
                CommandDecl::new().describe("Print the arguments back"),
                handler(|args| {
                    println!("{}", args.join(" "));
                    Ok(())
                }),
            ),
            CogMember::new(
                "spin",
                CommandDecl::new()
                    .describe("Sleep N seconds in the background, then report")
                    .threaded(true),
                handler(|args| {
                    let secs: u64 = args
                        .first()
                        .and_then(|raw| raw.parse().ok())
                        .unwrap_or(2);
                    thread::sleep(Duration::from_secs(secs));
                    println!("spin finished after {secs}s");
                    Ok(())
                }),
            ),
        ]
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut shell = Shell::builder()
        .prompt(cli.prompt)
        .check_duplicates(!cli.no_duplicate_check)
        .on_interrupt(if cli.stay_on_interrupt {
            InterruptPolicy::Resume
        } else {
            InterruptPolicy::Exit
        })
        .build();

    shell.add_cog(&DemoCog);

    shell.add_command(
        CommandDecl::new()
            .alias("q")
            .describe("Leave the shell")
            .bind("quit", handler(|_args| std::process::exit(0))),
    );

    // Snapshot of everything registered so far; `help` itself shows up
    // because it is registered from the same snapshot's tail.
    let mut entries: Vec<(String, String)> = shell
        .registry()
        .iter()
        .map(|group| (group.command.name.clone(), group.command.description.clone()))
        .collect();
    entries.push(("help".to_string(), "Show available commands".to_string()));

    shell.add_command(
        CommandDecl::new()
            .alias("?")
            .describe("Show available commands")
            .bind(
                "help",
                handler(move |_args| {
                    for (name, description) in &entries {
                        println!("{name:<10} {description}");
                    }
                    Ok(())
                }),
            ),
    );

    tracing::debug!(commands = shell.registry().len(), "registry initialized");
    println!("cogwheel demo shell. Tab completes; 'help' lists commands; Ctrl-D quits.");

    let mut editor = RustylineEditor::new()?;
    shell.run(&mut editor)?;
    Ok(())
}
