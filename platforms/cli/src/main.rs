mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use ndtm::{analyze, ProgramLoader, ProgramManager, Protocol, Session};
use std::io::{self, Read, Write};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout only carries results.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    if cli.list {
        for name in ProgramManager::list_program_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let protocol = load_protocol(&cli)?;

    if cli.check {
        print!("{}", protocol.machine);
        for warning in analyze(&protocol.machine) {
            println!("warning: {warning}");
        }
        return Ok(());
    }

    let context = cli.context(&protocol);
    let inputs = cli.inputs(&protocol);
    let session = Session::new(protocol.machine, context);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.stats {
        for input in &inputs {
            let report = session.report(input);
            writeln!(out, "{}", serde_json::to_string(&report)?)?;
        }
    } else {
        session.run_all(&inputs, &mut out)?;
    }

    out.flush()?;
    Ok(())
}

/// Loads the protocol from a file, a built-in demo, or piped stdin, in that order.
fn load_protocol(cli: &Cli) -> Result<Protocol> {
    if let Some(path) = &cli.program {
        ProgramLoader::load_program(path)
            .with_context(|| format!("Failed to load '{}'", path.display()))
    } else if let Some(name) = &cli.demo {
        Ok(ProgramManager::get_program_by_name(name)?.protocol)
    } else if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(ProgramLoader::load_program_from_string(&buffer)?)
    } else {
        bail!("No protocol given: pass a file, use --demo NAME, or pipe one on stdin")
    }
}
