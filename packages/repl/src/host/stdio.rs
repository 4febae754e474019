//! Line-oriented host for piped input and one-shot commands.
//!
//! Reads one command per line and writes plain, uncolored output. Errors go
//! to the error stream prefixed with `Error:`. There is no prompt and no
//! completion.

use std::io::{self, BufRead, Stderr, Stdout, Write};

use crate::io::{InputLine, IoError, IoHost, Output, OutputStyle, PathSource, PromptConfig, Signal};

pub struct StdioHost<R, W = Stdout, E = Stderr> {
    input: R,
    out: W,
    err: E,
    pending_input: Option<InputLine>,
    pending_signal: Option<Signal>,
}

impl<R: BufRead> StdioHost<R> {
    /// Read from `input`, write to the process's stdout and stderr.
    pub fn new(input: R) -> Self {
        Self::with_writers(input, io::stdout(), io::stderr())
    }
}

impl<R: BufRead, W: Write, E: Write> StdioHost<R, W, E> {
    pub fn with_writers(input: R, out: W, err: E) -> Self {
        Self {
            input,
            out,
            err,
            pending_input: None,
            pending_signal: None,
        }
    }

    /// Give back the output and error writers.
    pub fn into_writers(self) -> (W, E) {
        (self.out, self.err)
    }
}

impl<R: BufRead, W: Write, E: Write> IoHost for StdioHost<R, W, E> {
    fn wait_for_input(&mut self, _paths: &dyn PathSource) -> Result<(), IoError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            self.pending_signal = Some(Signal::Eof);
            return Ok(());
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        self.pending_input = Some(InputLine { line });
        Ok(())
    }

    fn read_input(&mut self) -> Result<Option<InputLine>, IoError> {
        Ok(self.pending_input.take())
    }

    fn read_signal(&mut self) -> Result<Option<Signal>, IoError> {
        Ok(self.pending_signal.take())
    }

    fn write_output(&mut self, output: Output) -> Result<(), IoError> {
        let stream: &mut dyn Write = match output.style {
            OutputStyle::Error => {
                self.err.write_all(b"Error: ")?;
                &mut self.err
            }
            OutputStyle::Info => &mut self.err,
            OutputStyle::Normal | OutputStyle::Banner => &mut self.out,
        };
        stream.write_all(&output.data)?;
        stream.write_all(b"\n")?;
        Ok(())
    }

    fn write_prompt(&mut self, _config: PromptConfig) -> Result<(), IoError> {
        Ok(())
    }

    fn flush(&mut self) -> Result<(), IoError> {
        self.out.flush()?;
        self.err.flush()?;
        Ok(())
    }
}
