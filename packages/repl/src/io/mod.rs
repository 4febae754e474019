//! I/O abstraction for the REPL.
//!
//! This module defines the interface between the REPL core and its host environment.
//! The core interacts only through the `IoHost` trait, so the terminal, piped
//! stdin and tests each provide their own implementation.

pub mod types;

#[cfg(test)]
pub mod test_host;

pub use types::*;

#[cfg(test)]
pub use test_host::TestHost;

/// Error type for I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Io(e.to_string())
    }
}

/// Answers path completion requests against the current session.
///
/// Lookup failures yield an empty list; they are never errors.
pub trait PathSource {
    fn complete_path(&self, partial: &str, kind: CompletionKind) -> Vec<String>;
}

/// Host interface for REPL I/O operations.
///
/// The REPL core calls these methods to interact with the user.
pub trait IoHost {
    /// Wait for input to become available.
    ///
    /// Hosts that offer completion answer queries from `paths` while they
    /// wait. After this returns, `read_input()` should return
    /// `Some(InputLine)` if input is ready, or `read_signal()` should return
    /// `Some(Signal)` if a signal was received.
    fn wait_for_input(&mut self, paths: &dyn PathSource) -> Result<(), IoError>;

    /// Read the next input line, if available.
    fn read_input(&mut self) -> Result<Option<InputLine>, IoError>;

    /// Read any pending signal (Ctrl+C, Ctrl+D, end of input).
    fn read_signal(&mut self) -> Result<Option<Signal>, IoError>;

    /// Write output to the user.
    fn write_output(&mut self, output: Output) -> Result<(), IoError>;

    /// Update the prompt configuration.
    ///
    /// The host uses this to render the prompt before the next input.
    fn write_prompt(&mut self, config: PromptConfig) -> Result<(), IoError>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), IoError> {
        Ok(())
    }
}
