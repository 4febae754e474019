//! Host implementations for the REPL.
//!
//! The terminal host uses Reedline for interactive terminal I/O. The stdio
//! host reads piped commands line by line.

pub mod stdio;
pub mod terminal;

pub use stdio::StdioHost;
pub use terminal::TerminalHost;
