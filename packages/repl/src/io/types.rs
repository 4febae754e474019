//! I/O types for the REPL.
//!
//! These types define the interface between the REPL core and its host environment.

/// A line of input from the user.
#[derive(Debug, Clone)]
pub struct InputLine {
    pub line: String,
}

/// A signal from the host (Ctrl+C, Ctrl+D, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// User pressed Ctrl+C (interrupt).
    Interrupt,
    /// User pressed Ctrl+D, or the input ran out.
    Eof,
}

/// Output to be written by the REPL.
///
/// Stored values are opaque bytes, so output is carried as bytes and written
/// unchanged. Hosts that style output decode it lossily.
#[derive(Debug, Clone)]
pub struct Output {
    pub data: Vec<u8>,
    pub style: OutputStyle,
}

impl Output {
    pub fn normal(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            style: OutputStyle::Normal,
        }
    }

    pub fn error(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            style: OutputStyle::Error,
        }
    }

    pub fn info(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            style: OutputStyle::Info,
        }
    }

    pub fn banner(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            style: OutputStyle::Banner,
        }
    }
}

/// Style hint for output rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputStyle {
    /// Command results, printed as-is.
    #[default]
    Normal,
    /// Error message (host adds an `Error:` prefix).
    Error,
    /// Informational message (host may style in cyan).
    Info,
    /// Banner/startup message.
    Banner,
}

/// Prompt configuration sent from core to host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptConfig {
    /// Name of the open store file, as given on the command line.
    pub file_name: String,
    /// Canonical path of the working bucket.
    pub current_path: String,
    /// Batch mode shows no prompt at all.
    pub interactive: bool,
}

impl PromptConfig {
    /// The prompt text without styling: `[<file> <path>] # `.
    pub fn render(&self) -> String {
        if self.interactive {
            format!("[{} {}] # ", self.file_name, self.current_path)
        } else {
            String::new()
        }
    }
}

/// Which children a path completion offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    /// Keys and buckets, for commands that take a key name.
    Keys,
    /// Buckets only, for commands that take a bucket.
    Buckets,
}

/// Reason the REPL exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// User typed 'exit' or 'quit'.
    UserExit,
    /// User pressed Ctrl+D, or the input ran out.
    Eof,
    /// User pressed Ctrl+C twice in a row; changes must be discarded.
    Interrupted,
}
