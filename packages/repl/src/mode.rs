//! Shell display modes.

use std::fmt;

/// How command results are rendered.
///
/// Interactive mode adds the `ls` count footer and shows a prompt; batch
/// mode prints bare results, suitable for scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Batch,
    Interactive,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Batch, Mode::Interactive];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Batch => "batch",
            Mode::Interactive => "interactive",
        }
    }

    pub fn parse(name: &str) -> Option<Mode> {
        Mode::ALL.into_iter().find(|mode| mode.as_str() == name)
    }

    /// `[batch interactive]`, for usage messages.
    pub fn list() -> String {
        let names: Vec<_> = Mode::ALL.iter().map(Mode::as_str).collect();
        format!("[{}]", names.join(" "))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_modes() {
        assert_eq!(Mode::parse("batch"), Some(Mode::Batch));
        assert_eq!(Mode::parse("interactive"), Some(Mode::Interactive));
        assert_eq!(Mode::parse("Batch"), None);
        assert_eq!(Mode::parse(""), None);
    }

    #[test]
    fn list_matches_usage_text() {
        assert_eq!(Mode::list(), "[batch interactive]");
    }
}
