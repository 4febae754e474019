//! Platform-independent REPL core and the session runners built on it.
//!
//! The core talks only to an `IoHost`. A runner owns the transaction: it
//! hands the root bucket to a core, waits for the core to finish, then
//! commits or rolls back depending on how the session ended.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thunder_store::{Bucket, RedbStore, Transaction, DEFAULT_LOCK_TIMEOUT};

use crate::commands::{self, CommandResult};
use crate::host::{StdioHost, TerminalHost};
use crate::io::{ExitReason, IoError, IoHost, Output, Signal};
use crate::mode::Mode;
use crate::session::Session;

/// The platform-independent REPL core.
pub struct ReplCore<B> {
    session: Session<B>,
    interrupts: u32,
    failures: usize,
}

impl<B: Bucket> ReplCore<B> {
    pub fn new(session: Session<B>) -> Self {
        Self {
            session,
            interrupts: 0,
            failures: 0,
        }
    }

    /// Run the REPL loop, reading/writing through the provided I/O host.
    ///
    /// Returns the reason for exiting. Two interrupts in a row end the loop
    /// with [`ExitReason::Interrupted`].
    pub fn run(&mut self, io: &mut impl IoHost) -> Result<ExitReason, IoError> {
        if self.session.mode() == Mode::Interactive {
            io.write_output(Output::banner(BANNER))?;
        }

        loop {
            io.write_prompt(self.session.prompt())?;
            io.wait_for_input(&self.session)?;

            if let Some(signal) = io.read_signal()? {
                match signal {
                    Signal::Eof => {
                        io.flush()?;
                        return Ok(ExitReason::Eof);
                    }
                    Signal::Interrupt => {
                        self.interrupts += 1;
                        if self.interrupts >= 2 {
                            io.write_output(Output::info("Interrupted"))?;
                            io.flush()?;
                            return Ok(ExitReason::Interrupted);
                        }
                        io.write_output(Output::info(
                            "Press Ctrl-C once more to exit without saving the database",
                        ))?;
                        continue;
                    }
                }
            }

            let input = match io.read_input()? {
                Some(input) => input,
                None => continue,
            };
            self.interrupts = 0;

            let result = commands::execute(&input.line, &mut self.session);
            if let Some(reason) = self.render(result, io)? {
                io.flush()?;
                return Ok(reason);
            }
            io.flush()?;
        }
    }

    /// Execute a single, already tokenized command.
    pub fn run_args(&mut self, args: &[String], io: &mut impl IoHost) -> Result<(), IoError> {
        let result = commands::execute_args(args, &mut self.session);
        self.render(result, io)?;
        io.flush()
    }

    /// Commands that failed so far.
    pub fn failures(&self) -> usize {
        self.failures
    }

    fn render(
        &mut self,
        result: CommandResult,
        io: &mut impl IoHost,
    ) -> Result<Option<ExitReason>, IoError> {
        match result {
            CommandResult::Ok { display: None } => {}
            CommandResult::Ok {
                display: Some(output),
            } => {
                io.write_output(Output::normal(output))?;
            }
            CommandResult::Error(e) => {
                self.failures += 1;
                log::debug!("Command failed: {:?}", e);
                io.write_output(Output::error(e.to_string()))?;
            }
            CommandResult::Exit => return Ok(Some(ExitReason::UserExit)),
        }
        Ok(None)
    }
}

const BANNER: &str = "Thunder, an interactive shell for bucket stores\nType \"help\" for help.\n";

/// Failures that end a session before or outside any command.
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("Unable to stat database file '{path}': {source}")]
    Stat {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to open database file: '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: thunder_store::Error,
    },

    #[error(transparent)]
    Storage(#[from] thunder_store::Error),

    #[error(transparent)]
    Io(#[from] IoError),
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// Whether the session's changes were committed.
    pub committed: bool,
    /// Commands that reported an error.
    pub failed_commands: usize,
}

impl Outcome {
    /// 0 for a committed session without failed commands, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.committed && self.failed_commands == 0 {
            0
        } else {
            1
        }
    }
}

fn settle<T: Transaction>(
    tx: T,
    ended: Result<(bool, usize), IoError>,
) -> Result<Outcome, SessionError> {
    match ended {
        Ok((true, failed_commands)) => {
            tx.commit()?;
            Ok(Outcome {
                committed: true,
                failed_commands,
            })
        }
        Ok((false, failed_commands)) => {
            log::warn!("Discarding all changes made in this session");
            tx.rollback()?;
            Ok(Outcome {
                committed: false,
                failed_commands,
            })
        }
        Err(e) => {
            log::warn!("Rolling back after host failure: {}", e);
            tx.rollback()?;
            Err(e.into())
        }
    }
}

/// Run an interactive shell over `tx`.
///
/// `exit` and end of input commit; a double interrupt rolls back.
pub fn run_interactive<T: Transaction>(
    tx: T,
    file_name: &str,
    io: &mut impl IoHost,
) -> Result<Outcome, SessionError> {
    let ended = {
        let mut core = ReplCore::new(Session::new(tx.root(), file_name, Mode::Interactive));
        core.run(io)
            .map(|reason| (reason != ExitReason::Interrupted, core.failures()))
    };
    settle(tx, ended)
}

/// Run commands read from `io` in batch mode, then commit.
///
/// Failing commands are reported and skipped.
pub fn run_batch<T: Transaction>(
    tx: T,
    file_name: &str,
    io: &mut impl IoHost,
) -> Result<Outcome, SessionError> {
    let ended = {
        let mut core = ReplCore::new(Session::new(tx.root(), file_name, Mode::Batch));
        core.run(io)
            .map(|reason| (reason != ExitReason::Interrupted, core.failures()))
    };
    settle(tx, ended)
}

/// Run one command in batch mode. It commits if the command succeeded and
/// rolls back otherwise.
pub fn run_command<T: Transaction>(
    tx: T,
    file_name: &str,
    args: &[String],
    io: &mut impl IoHost,
) -> Result<Outcome, SessionError> {
    let ended = {
        let mut core = ReplCore::new(Session::new(tx.root(), file_name, Mode::Batch));
        core.run_args(args, io)
            .map(|()| (core.failures() == 0, core.failures()))
    };
    settle(tx, ended)
}

/// Everything `run` needs from the command line.
#[derive(Debug, Clone)]
pub struct Options {
    pub store_file: PathBuf,
    /// A single command to run instead of a shell. Empty for a shell.
    pub command: Vec<String>,
    pub lock_timeout: Duration,
}

impl Options {
    pub fn new(store_file: impl Into<PathBuf>) -> Self {
        Self {
            store_file: store_file.into(),
            command: Vec::new(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }
}

/// Open the store file. It must already exist; an empty file becomes an
/// empty store.
pub fn open_store(path: &Path, lock_timeout: Duration) -> Result<RedbStore, SessionError> {
    let display = path.display().to_string();
    std::fs::metadata(path).map_err(|source| SessionError::Stat {
        path: display.clone(),
        source,
    })?;
    RedbStore::open(path, lock_timeout).map_err(|source| SessionError::Open {
        path: display,
        source,
    })
}

/// Open the store and run a one-shot command, a terminal shell, or a batch
/// read from piped stdin.
pub fn run(options: &Options) -> Result<Outcome, SessionError> {
    let store = open_store(&options.store_file, options.lock_timeout)?;
    let tx = store.begin()?;
    let file_name = options.store_file.display().to_string();

    if !options.command.is_empty() {
        return run_command(tx, &file_name, &options.command, &mut StdioHost::new(std::io::empty()));
    }

    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        let mut host = TerminalHost::new().map_err(IoError::from)?;
        run_interactive(tx, &file_name, &mut host)
    } else {
        run_batch(tx, &file_name, &mut StdioHost::new(stdin.lock()))
    }
}
