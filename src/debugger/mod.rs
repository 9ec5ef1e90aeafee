mod autorun;
mod command;
mod print;

use std::time::{Duration, Instant};

use self::autorun::AutoRun;
use self::command::{Command, CommandReader};
use crate::env;
use crate::error::SessionError;
use crate::module::ModuleLoader;
use crate::output::{Category, Condition, Output};
use crate::dprintln;
use crate::session::Session;

/// Overrides for a debugging session. Unset fields fall back to the environment.
#[derive(Debug, Default)]
pub struct DebuggerOptions {
    /// Commands to run before reading from stdin.
    pub command: Option<String>,
    /// Auto-run interval. Falls back to `$GBDB_RUN_INTERVAL`.
    pub interval: Option<Duration>,
    /// Instruction list rows. Falls back to `$GBDB_LIST_ROWS`.
    pub rows: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Failed,
}

pub struct Debugger<L: ModuleLoader> {
    session: Session<L>,
    phase: Phase,
    reader: CommandReader,
    autorun: AutoRun,
    rows: usize,
    /// Amount of instructions executed since last command.
    instruction_count: u32,
}

/// Whether the command loop keeps going.
enum Flow {
    Continue,
    Quit,
}

impl<L: ModuleLoader> Debugger<L> {
    /// Unset options come from `$GBDB_*` if [`env::init`] was called, or built-in defaults.
    pub fn new(opts: DebuggerOptions, loader: L) -> Self {
        let interval = opts.interval.unwrap_or_else(env::run_interval);
        Self {
            session: Session::new(loader),
            phase: Phase::Loading,
            reader: CommandReader::from(opts.command),
            autorun: AutoRun::new(interval),
            rows: opts.rows.unwrap_or_else(env::list_rows),
            instruction_count: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> &Session<L> {
        &self.session
    }

    /// Load the module, then execute commands until `quit` or end of input.
    ///
    /// Only a load failure ends the session early, including one from `reset`. Other errors
    /// abort the current command.
    pub fn run(&mut self) -> Result<(), SessionError> {
        self.load()?;
        if let Err(error) = self.print_view() {
            report_error(&error);
        }

        loop {
            if self.autorun.is_running() {
                if let Err(error) = self.run_tick() {
                    self.autorun.stop();
                    report_error(&error);
                }
                continue;
            }

            Output::Debugger(Condition::Always, Category::Normal).start_new_line();
            self.report_instruction_count();

            // Convert `EOF` to `quit` command
            let command = Command::read_from(&mut self.reader, |error| {
                dprintln!(Always, Error, "{}", error);
                dprintln!(Always, Error, "Type `help` for a list of commands.");
            })
            .unwrap_or(Command::Quit);

            match self.execute(command) {
                Ok(Flow::Continue) => (),
                Ok(Flow::Quit) => break,
                Err(error @ SessionError::Load(_)) => {
                    self.phase = Phase::Failed;
                    return Err(error);
                }
                Err(error) => report_error(&error),
            }
        }

        Ok(())
    }

    fn load(&mut self) -> Result<(), SessionError> {
        dprintln!(Sometimes, Info, "Loading emulator...");
        let loaded = self
            .session
            .initialize()
            .and_then(|()| self.session.instruction_table().map(|table| table.len()));
        match loaded {
            Ok(count) => {
                self.phase = Phase::Ready;
                dprintln!(Sometimes, Info, "Decoded {} instructions.", count);
                Ok(())
            }
            Err(error) => {
                self.phase = Phase::Failed;
                Err(error)
            }
        }
    }

    fn execute(&mut self, command: Command) -> Result<Flow, SessionError> {
        match command {
            Command::Quit => return Ok(Flow::Quit),

            Command::Help => {
                dprintln!(Always, Special, "\n{}", include_str!("./help.txt"));
            }

            Command::Step { count } => {
                for _ in 0..count {
                    self.session.step()?;
                    self.instruction_count += 1;
                }
                self.report_instruction_count();
                self.print_view()?;
            }

            Command::Run { ticks } => {
                if ticks.is_none() && !self.reader.is_interactive() {
                    dprintln!(
                        Always,
                        Error,
                        "Cannot run without a tick count when input is not a terminal."
                    );
                    dprintln!(Always, Error, "Try `run 10`.");
                    return Ok(Flow::Continue);
                }
                self.autorun.toggle(Instant::now(), ticks);
                dprintln!(
                    Always,
                    Info,
                    "Running every {} ms{}...",
                    self.autorun.interval().as_millis(),
                    if self.reader.is_interactive() {
                        " (press any key to stop)"
                    } else {
                        ""
                    },
                );
            }

            Command::Registers => {
                print::registers(&self.session.registers()?);
            }
            Command::Next => {
                self.print_next()?;
            }
            Command::List { rows } => {
                self.print_list(rows.unwrap_or(self.rows))?;
            }
            Command::View => {
                self.print_view()?;
            }

            Command::Rom { address, count } => {
                print::rom(self.session.rom()?, address, count);
            }

            Command::Reset => {
                self.autorun.stop();
                self.session.reset()?;
                dprintln!(Always, Warning, "Reset program to initial state.");
            }
        }

        Ok(Flow::Continue)
    }

    /// Wait for the next tick, unless interrupted by a key press.
    fn run_tick(&mut self) -> Result<(), SessionError> {
        let wait = self
            .autorun
            .time_until_tick(Instant::now())
            .unwrap_or_default();
        match self.reader.wait_for_key(wait) {
            Ok(false) => (),
            Ok(true) => {
                self.autorun.stop();
                dprintln!(Always, Info, "Stopped.");
                self.report_instruction_count();
                return self.print_view();
            }
            Err(error) => {
                log::warn!("Stopping auto-run: cannot poll terminal: {}", error);
                self.autorun.stop();
                return Ok(());
            }
        }

        if !self.autorun.poll(Instant::now()) {
            return Ok(());
        }
        self.session.step()?;
        self.instruction_count += 1;
        let pc = self.session.registers()?.pc();
        print::tick(pc, &self.session.next_instruction()?);

        if !self.autorun.is_running() {
            self.report_instruction_count();
            self.print_view()?;
        }
        Ok(())
    }

    fn print_view(&self) -> Result<(), SessionError> {
        print::registers(&self.session.registers()?);
        self.print_next()?;
        self.print_list(self.rows)
    }

    fn print_next(&self) -> Result<(), SessionError> {
        let pc = self.session.registers()?.pc();
        print::next_instruction(pc, &self.session.next_instruction()?);
        Ok(())
    }

    fn print_list(&self, rows: usize) -> Result<(), SessionError> {
        let pc = self.session.registers()?.pc();
        print::instruction_list(self.session.instruction_table()?, pc, rows);
        Ok(())
    }

    fn report_instruction_count(&mut self) {
        if self.instruction_count > 0 {
            dprintln!(
                Always,
                Info,
                "Executed {} instruction{}.",
                self.instruction_count,
                if self.instruction_count == 1 { "" } else { "s" },
            );
            self.instruction_count = 0;
        }
    }
}

fn report_error(error: &SessionError) {
    dprintln!(Always, Error, "{}", error);
}
