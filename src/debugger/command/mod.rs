pub mod error;
mod parse;
mod reader;

use std::fmt;

use self::parse::Arguments;

pub use self::reader::{CommandReader, Read};

/// Highest address of the ROM segment.
const ROM_END: u32 = 0x7fff;
/// Upper bound for counts, so a typo cannot hang the session.
const MAX_COUNT: u32 = 0xffff;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    /// Execute `count` instructions.
    Step { count: u32 },
    /// Start auto-run. `None` runs until interrupted.
    Run { ticks: Option<u32> },
    Registers,
    Next,
    /// `None` uses the configured row count.
    List { rows: Option<usize> },
    View,
    Rom { address: u16, count: u16 },
    Reset,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandName {
    Help,
    Step,
    Run,
    Registers,
    Next,
    List,
    View,
    Rom,
    Reset,
    Quit,
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Help => write!(f, "help"),
            Self::Step => write!(f, "step"),
            Self::Run => write!(f, "run"),
            Self::Registers => write!(f, "registers"),
            Self::Next => write!(f, "next"),
            Self::List => write!(f, "list"),
            Self::View => write!(f, "view"),
            Self::Rom => write!(f, "rom"),
            Self::Reset => write!(f, "reset"),
            Self::Quit => write!(f, "quit"),
        }
    }
}

impl TryFrom<&str> for Command {
    type Error = error::Command;

    /// Assumes line is non-empty.
    fn try_from(line: &str) -> Result<Self, Self::Error> {
        let mut iter = Arguments::from(line);

        let command_name = iter.get_command_name()?;
        Command::parse_arguments(command_name, &mut iter).map_err(|error| {
            error::Command::InvalidArgument {
                command_name,
                error,
            }
        })
    }
}

impl Command {
    /// Read commands until one parses. Returns `None` on EOF.
    pub fn read_from<F>(source: &mut impl Read, handle_error: F) -> Option<Self>
    where
        F: Fn(error::Command),
    {
        loop {
            let line = source.read()?.trim();

            // Necessary, since `Command::try_from` assumes non-empty line
            if line.is_empty() {
                continue;
            }

            match Command::try_from(line) {
                Ok(command) => return Some(command),
                Err(error) => handle_error(error),
            }
        }
    }

    fn parse_arguments(name: CommandName, iter: &mut Arguments) -> Result<Self, error::Argument> {
        let mut expected_args = 0;

        let command = match name {
            // Allow trailing arguments
            CommandName::Help => return Ok(Self::Help),

            CommandName::Quit => Self::Quit,
            CommandName::Registers => Self::Registers,
            CommandName::Next => Self::Next,
            CommandName::View => Self::View,
            CommandName::Reset => Self::Reset,

            CommandName::Step => {
                expected_args = 1;
                let count = iter.next_positive_integer_or_none("count", MAX_COUNT)?;
                Self::Step {
                    count: count.unwrap_or(1),
                }
            }
            CommandName::Run => {
                expected_args = 1;
                let ticks = iter.next_positive_integer_or_none("ticks", MAX_COUNT)?;
                Self::Run { ticks }
            }
            CommandName::List => {
                expected_args = 1;
                let rows = iter.next_positive_integer_or_none("rows", ROM_END)?;
                Self::List {
                    rows: rows.map(|rows| rows as usize),
                }
            }
            CommandName::Rom => {
                expected_args = 2;
                let address = iter.next_integer("address", expected_args, ROM_END)?;
                let count = iter.next_positive_integer_or_none("count", ROM_END + 1)?;
                Self::Rom {
                    address: address as u16,
                    count: count.unwrap_or(0x40) as u16,
                }
            }
        };

        iter.expect_end(expected_args)?;

        Ok(command)
    }
}
