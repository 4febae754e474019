//! # thunder-repl
//!
//! An interactive shell for browsing and editing a thunder bucket store.
//!
//! The whole session runs inside one read-write transaction. Leaving with
//! `exit`, `quit` or Ctrl-D commits it; pressing Ctrl-C twice in a row
//! discards it.
//!
//! ## Features
//!
//! - Navigate buckets with `cd`, `ls` and `pwd`, using `/`, `..` and `.`
//! - Read and write keys, including JSON Pointer reads and JSON Patch writes
//! - Tab completion for commands, modes and store paths
//! - Syntax highlighting
//! - Vi mode support (detected from EDITOR, .inputrc, or THUNDER_EDIT_MODE)
//! - Command history
//! - Batch mode for piped input, and one-shot commands from the command line
//!
//! ## Usage
//!
//! ```bash
//! # Open a shell on an existing store file
//! thunder data.db
//!
//! # Inside the shell:
//! [data.db /] # mkdir users
//! [data.db /] # put users/alice '{"age": 30}'
//! [data.db /] # put users/alice --json /age 31
//! [data.db /] # get users/alice --json /age
//! 31
//!
//! # One command, no shell
//! thunder data.db get users/alice
//!
//! # Batch mode
//! printf 'cd users\nls\n' | thunder data.db
//! ```

pub mod commands;
pub mod completer;
pub mod highlighter;
pub mod host;
pub mod io;
pub mod mode;
pub mod repl;
pub mod session;

pub use commands::{CommandError, CommandResult};
pub use mode::Mode;
pub use repl::{run, Options, Outcome, ReplCore, SessionError};
pub use session::Session;
