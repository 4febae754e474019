//! Per-session shell state: the working bucket, the display mode and the
//! store file name shown in the prompt.

use thunder_store::Bucket;

use crate::completer;
use crate::io::{CompletionKind, PathSource, PromptConfig};
use crate::mode::Mode;

pub struct Session<B> {
    cwd: B,
    mode: Mode,
    file_name: String,
}

impl<B: Bucket> Session<B> {
    pub fn new(root: B, file_name: impl Into<String>, mode: Mode) -> Self {
        Self {
            cwd: root,
            mode,
            file_name: file_name.into(),
        }
    }

    /// The working bucket.
    pub fn cwd(&self) -> &B {
        &self.cwd
    }

    pub fn set_cwd(&mut self, bucket: B) {
        self.cwd = bucket;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn prompt(&self) -> PromptConfig {
        PromptConfig {
            file_name: self.file_name.clone(),
            current_path: self.cwd.to_string(),
            interactive: self.mode == Mode::Interactive,
        }
    }
}

impl<B: Bucket> PathSource for Session<B> {
    fn complete_path(&self, partial: &str, kind: CompletionKind) -> Vec<String> {
        completer::complete_path(&self.cwd, partial, kind)
    }
}
