use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};

use crate::commands::{find_command, ArgCompletion};

/// Syntax highlighter for the shell
#[derive(Debug, Default)]
pub struct ReplHighlighter;

impl ReplHighlighter {
    pub fn new() -> Self {
        Self
    }
}

/// Split `rest` into chunks of leading whitespace plus one word.
fn chunks(rest: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_word = false;
    for (i, c) in rest.char_indices() {
        if c.is_whitespace() {
            if in_word {
                out.push(&rest[start..i]);
                start = i;
                in_word = false;
            }
        } else {
            in_word = true;
        }
    }
    if start < rest.len() {
        out.push(&rest[start..]);
    }
    out
}

fn looks_like_json(word: &str) -> bool {
    word.starts_with(['{', '[', '"', '\''])
}

impl Highlighter for ReplHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();

        let leading = line.len() - line.trim_start().len();
        if leading > 0 {
            styled.push((Style::new(), line[..leading].to_string()));
        }
        let line = &line[leading..];
        if line.is_empty() {
            return styled;
        }

        let (command, rest) = match line.find(char::is_whitespace) {
            Some(pos) => (&line[..pos], &line[pos..]),
            None => (line, ""),
        };

        let spec = find_command(command);
        let cmd_style = if spec.is_some() {
            Style::new().bold().fg(Color::Cyan)
        } else {
            Style::new().fg(Color::Red)
        };
        styled.push((cmd_style, command.to_string()));

        let path_first = matches!(spec.map(|s| s.completion), Some(ArgCompletion::Path(_)));
        let mut arg = 0;
        let mut chunks = chunks(rest).into_iter();
        while let Some(chunk) = chunks.next() {
            let word = chunk.trim_start();
            let style = if word.is_empty() {
                Style::new()
            } else if word.starts_with("--") {
                Style::new().fg(Color::Magenta)
            } else if arg > 0 && looks_like_json(word) {
                // JSON may contain spaces; color the rest of the line
                let remainder: String = std::iter::once(chunk).chain(chunks.by_ref()).collect();
                styled.push((Style::new().fg(Color::Green), remainder));
                break;
            } else if arg == 0 && path_first {
                Style::new().fg(Color::Yellow)
            } else {
                Style::new()
            };
            styled.push((style, chunk.to_string()));
            if !word.is_empty() {
                arg += 1;
            }
        }

        styled
    }
}
