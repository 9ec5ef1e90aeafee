use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use miette::Result;

use gbdb::error::session_failed;
use gbdb::module::RomLoader;
use gbdb::session::Session;
use gbdb::{Debugger, DebuggerOptions, Output};

/// gbdb is a terminal debugger for Game Boy CPU emulator modules.
#[derive(Parser)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Quickly provide a ROM image to debug
    path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Open a ROM image in the debugger
    Debug {
        /// `.gb` or `.gbc` ROM image
        name: PathBuf,
        /// Read debugger commands from argument
        #[arg(short, long)]
        command: Option<String>,
        /// Produce minimal output, suited for blackbox tests
        #[arg(short, long)]
        minimal: bool,
        /// Milliseconds between steps of `run`
        #[arg(short, long)]
        interval: Option<u64>,
        /// Rows shown by `list`
        #[arg(long)]
        rows: Option<usize>,
    },
    /// Print every decoded instruction of a ROM image
    Disasm {
        /// `.gb` or `.gbc` ROM image
        name: PathBuf,
    },
    /// Load and decode a ROM image without debugging it
    Check {
        /// File to check
        name: PathBuf,
    },
}

fn main() -> miette::Result<()> {
    use MsgColor::*;
    env_logger::init();
    let args = Args::parse();
    gbdb::env::init();

    match args.command {
        Some(Command::Debug {
            name,
            command,
            minimal,
            interval,
            rows,
        }) => {
            let opts = DebuggerOptions {
                command,
                interval: interval.map(Duration::from_millis),
                rows,
            };
            debug(&name, opts, minimal)
        }
        Some(Command::Disasm { name }) => {
            file_message(Green, "Decoding", &name);
            let session = load(&name)?;
            let table = session
                .instruction_table()
                .map_err(|error| session_failed(&error))?;
            for (address, instruction) in table.iter() {
                Output::Normal.print_str(&format!(
                    "0x{:04x}  {:02x}  {}\n",
                    address, instruction.opcode, instruction
                ));
            }
            message(Green, "Finished", format!("{} instructions", table.len()).as_str());
            Ok(())
        }
        Some(Command::Check { name }) => {
            file_message(Green, "Checking", &name);
            let session = load(&name)?;
            let table = session
                .instruction_table()
                .map_err(|error| session_failed(&error))?;
            message(
                Green,
                "Success",
                format!("decoded {} instructions", table.len()).as_str(),
            );
            Ok(())
        }
        None => {
            if let Some(path) = args.path {
                debug(&path, DebuggerOptions::default(), false)
            } else {
                println!("\n~ gbdb v{VERSION} ~");
                println!("{SHORT_INFO}");
                std::process::exit(0);
            }
        }
    }
}

enum MsgColor {
    Green,
    Cyan,
}

fn file_message(color: MsgColor, left: &str, right: &Path) {
    let right = format!("target {}", right.display());
    message(color, left, right.as_str());
}

/// Status line on stderr, so stdout carries only program output.
fn message<S>(color: MsgColor, left: S, right: S)
where
    S: Colorize + std::fmt::Display,
{
    let left = match color {
        MsgColor::Green => left.green(),
        MsgColor::Cyan => left.cyan(),
    };
    eprintln!("{left:>12} {right}");
}

fn load(name: &Path) -> Result<Session<RomLoader>> {
    let mut session = Session::new(RomLoader::from_path(name));
    session
        .initialize()
        .map_err(|error| session_failed(&error))?;
    Ok(session)
}

fn debug(name: &Path, opts: DebuggerOptions, minimal: bool) -> Result<()> {
    Output::set_minimal(minimal);

    if !minimal {
        file_message(MsgColor::Green, "Debugging", name);
        message(MsgColor::Cyan, "Help", "type `help` for a list of commands");
    }
    let mut debugger = Debugger::new(opts, RomLoader::from_path(name));
    debugger.run().map_err(|error| session_failed(&error))?;

    if !minimal {
        file_message(MsgColor::Green, "Completed", name);
    }
    Ok(())
}

const SHORT_INFO: &str = r"
A terminal debugger for Game Boy CPU emulator modules.
Please use `-h` or `--help` to access the usage instructions and documentation.
";

const VERSION: &str = env!("CARGO_PKG_VERSION");
