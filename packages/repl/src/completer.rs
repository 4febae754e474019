use reedline::{Completer, Span, Suggestion};
use thunder_store::{printable_list, travel, Bucket};

use crate::commands::{find_command, ArgCompletion, COMMANDS};
use crate::io::CompletionKind;
use crate::mode::Mode;

/// Complete a partial path against `cwd`.
///
/// Everything up to the last `/` must resolve to a bucket; its printable
/// children that start with the rest are offered with that prefix kept.
/// An unresolvable prefix offers nothing.
pub fn complete_path<B: Bucket>(cwd: &B, partial: &str, kind: CompletionKind) -> Vec<String> {
    let (dir, leaf) = match partial.rfind('/') {
        Some(slash) => partial.split_at(slash + 1),
        None => ("", partial),
    };
    let Ok(target) = travel(cwd, dir) else {
        return Vec::new();
    };
    let names = match kind {
        CompletionKind::Keys => target.list(),
        CompletionKind::Buckets => target.buckets(true),
    };
    let Ok(names) = names else {
        return Vec::new();
    };
    printable_list(&names)
        .into_iter()
        .filter(|name| name.starts_with(leaf))
        .map(|name| format!("{}{}", dir, name))
        .collect()
}

/// What the word under the cursor should complete to.
#[derive(Debug, PartialEq, Eq)]
pub enum Target<'a> {
    Command(&'a str),
    Mode(&'a str),
    Path(&'a str, CompletionKind),
    Nothing,
}

/// Classify the word being typed at the end of `line`.
///
/// Only the command name and a command's first argument complete.
pub fn target(line: &str) -> Target<'_> {
    let word_start = line
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let current = &line[word_start..];
    let before: Vec<&str> = line[..word_start].split_whitespace().collect();

    match before.as_slice() {
        [] => Target::Command(current),
        [command] => match find_command(command).map(|spec| spec.completion) {
            Some(ArgCompletion::Path(kind)) => Target::Path(current, kind),
            Some(ArgCompletion::Mode) => Target::Mode(current),
            Some(ArgCompletion::Command) => Target::Command(current),
            Some(ArgCompletion::Nothing) | None => Target::Nothing,
        },
        _ => Target::Nothing,
    }
}

type PathLookup = Box<dyn Fn(&str, CompletionKind) -> Vec<String> + Send>;

/// Line editor completer.
///
/// Command and mode names complete locally. Paths are looked up through
/// `paths`, which reaches the session owning the store.
pub struct ReplCompleter {
    paths: PathLookup,
}

impl ReplCompleter {
    pub fn new(paths: impl Fn(&str, CompletionKind) -> Vec<String> + Send + 'static) -> Self {
        Self {
            paths: Box::new(paths),
        }
    }
}

fn suggestion(value: String, description: Option<String>, span: Span, append_whitespace: bool) -> Suggestion {
    Suggestion {
        value,
        description,
        style: None,
        extra: None,
        span,
        append_whitespace,
        match_indices: None,
    }
}

impl Completer for ReplCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let line_to_pos = &line[..pos];
        let target = target(line_to_pos);
        let start = |word: &str| Span::new(pos - word.len(), pos);

        match target {
            Target::Command(prefix) => COMMANDS
                .iter()
                .filter(|spec| spec.name.starts_with(prefix))
                .map(|spec| {
                    suggestion(
                        spec.name.to_string(),
                        Some(spec.help.to_string()),
                        start(prefix),
                        true,
                    )
                })
                .collect(),
            Target::Mode(prefix) => Mode::ALL
                .iter()
                .filter(|mode| mode.as_str().starts_with(prefix))
                .map(|mode| suggestion(mode.to_string(), None, start(prefix), true))
                .collect(),
            Target::Path(partial, kind) => (self.paths)(partial, kind)
                .into_iter()
                .map(|path| suggestion(path, None, start(partial), false))
                .collect(),
            Target::Nothing => Vec::new(),
        }
    }
}
